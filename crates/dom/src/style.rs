use std::fmt;

/// Declarations of an inline `style` attribute.
///
/// Property names are trimmed and lower-cased. A repeated property keeps the
/// position of its first declaration and the value of its last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn parse(value: &str) -> Self {
        let mut declarations: Vec<(String, String)> = Vec::new();
        for declaration in value.split(';') {
            let Some((property, val)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let val = val.trim();
            if property.is_empty() || val.is_empty() {
                continue;
            }
            match declarations.iter_mut().find(|(p, _)| *p == property) {
                Some(existing) => existing.1 = val.to_string(),
                None => declarations.push((property, val.to_string())),
            }
        }
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.trim().to_ascii_lowercase();
        self.declarations.iter().find(|(p, _)| *p == property).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{property}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn later_declaration_wins_in_first_position() {
        let style = InlineStyle::parse("Color: red; margin:0 ;color: blue");
        assert_eq!(style.properties().collect::<Vec<_>>(), vec![("color", "blue"), ("margin", "0")]);
        assert_eq!(style.get("COLOR"), Some("blue"));
        assert_eq!(style.to_string(), "color: blue; margin: 0");
    }

    #[rstest]
    #[case("")]
    #[case(";;")]
    #[case("color")]
    #[case(": red")]
    #[case("color:")]
    fn invalid_declarations_are_skipped(#[case] value: &str) {
        let style = InlineStyle::parse(value);
        assert!(style.is_empty());
        assert!(!style.contains("color"));
    }

    #[rstest]
    fn values_may_contain_colons() {
        let style = InlineStyle::parse("background: url(http://x/y.png)");
        assert_eq!(style.get("background"), Some("url(http://x/y.png)"));
        assert_eq!(style.len(), 1);
    }
}

use std::fmt;

use smallvec::SmallVec;

/// Tokens of a `class` attribute, first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: SmallVec<[String; 4]>,
}

impl ClassList {
    pub fn parse(value: &str) -> Self {
        let mut classes: SmallVec<[String; 4]> = SmallVec::new();
        for token in value.split_whitespace() {
            if !classes.iter().any(|c| c == token) {
                classes.push(token.to_string());
            }
        }
        Self { classes }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(class)?;
        }
        Ok(())
    }
}

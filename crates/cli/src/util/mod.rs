use owo_colors::{OwoColorize, Stream};
use std::error::Error;

pub type CliResult<T> = Result<T, Box<dyn Error>>;

pub fn colorize_xpath(xpath: &str) -> String {
    xpath.if_supports_color(Stream::Stdout, |text| text.fg_rgb::<136, 192, 74>().to_string()).to_string()
}

pub fn colorize_label(label: &str) -> String {
    label.if_supports_color(Stream::Stdout, |text| text.bold().fg_rgb::<79, 166, 255>().to_string()).to_string()
}

pub fn dimmed(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.dimmed().to_string()).to_string()
}

#[cfg(test)]
pub(crate) fn strip_ansi(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }
    result
}

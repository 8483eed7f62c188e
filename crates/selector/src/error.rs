use thiserror::Error;

/// Errors produced while turning a selector into XPath.
///
/// Every error is terminal for the call that produced it; the compiler never
/// returns partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("invalid selector {selector:?} at byte {offset}: {reason}")]
    InvalidSelector { selector: String, offset: usize, reason: String },
    #[error("unknown pseudo-class ':{name}'")]
    UnknownPseudoClass { name: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SelectorError {
    pub fn invalid(selector: impl Into<String>, offset: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSelector { selector: selector.into(), offset, reason: reason.into() }
    }

    pub fn unknown_pseudo(name: impl Into<String>) -> Self {
        Self::UnknownPseudoClass { name: name.into() }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Byte offset into the selector for `InvalidSelector`, `None` otherwise.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidSelector { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

pub type SelectorResult<T> = Result<T, SelectorError>;

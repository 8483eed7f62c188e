use csspath_selector::SelectorError;
use thiserror::Error;

use crate::query::QueryError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

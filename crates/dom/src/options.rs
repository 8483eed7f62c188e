use csspath_selector::{CompilationCache, ExpressionType};

/// Settings applied when a [`Document`](crate::Document) is created.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    default_type: ExpressionType,
    cache: Option<CompilationCache>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expression type used by [`Document::select`](crate::Document::select).
    pub fn with_default_type(mut self, ty: ExpressionType) -> Self {
        self.default_type = ty;
        self
    }

    pub fn default_type(&self) -> ExpressionType {
        self.default_type
    }

    /// Start from a pre-filled compilation cache instead of an empty one.
    pub fn with_cache(mut self, cache: CompilationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub(crate) fn take_cache(&mut self) -> CompilationCache {
        self.cache.take().unwrap_or_default()
    }
}

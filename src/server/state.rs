use crate::ToyCatalog;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Catalog handle. Owns the single pooled store connection shared by
    /// every request.
    pub catalog: ToyCatalog,
}

impl AppState {
    pub fn new(catalog: ToyCatalog) -> Self {
        Self { catalog }
    }
}

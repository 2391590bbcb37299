//! Query-string types shared by several handlers.

use serde::Deserialize;

/// `?search=&ordering=` for catalog listings.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams<O> {
    pub search: Option<String>,
    pub ordering: Option<O>,
}

impl<O> SearchParams<O> {
    /// The search term, ignoring blank input.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

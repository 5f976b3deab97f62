//! Hash routing: maps URL fragments to filter selection.
//!
//! Exactly three paths are handled: `/`, `/active` and `/completed`.
//! Anything else falls through without effect.

use crate::types::Filter;

/// Resolves fragment paths to filters
#[derive(Clone, Debug)]
pub struct Router {
    routes: Vec<(&'static str, Filter)>,
}

impl Router {
    /// Router with the three filter routes
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Filter::ALL.iter().map(|filter| (filter.path(), *filter)).collect(),
        }
    }

    /// Filter selected by `path`, or `None` for an unhandled path
    ///
    /// Accepts bare paths (`/active`) and fragments (`#/active`). An empty
    /// fragment is the root.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<Filter> {
        let path = path.trim();
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = if path.is_empty() { "/" } else { path };

        self.routes
            .iter()
            .find(|(route, _)| *route == path)
            .map(|(_, filter)| *filter)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

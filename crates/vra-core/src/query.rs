//! Convenience builder for OData query parameters.
//!
//! vRA list endpoints accept OData-style `$filter`, `page` and `limit` parameters. This
//! module assembles them as URL query pairs.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append an equality `$filter` such as `request eq 'abc'`.
    ///
    /// Single quotes inside the value are doubled, as OData string literals require.
    pub fn filter_eq(&mut self, field: &str, value: &str) {
        let escaped = value.replace('\'', "''");
        self.pairs
            .push(("$filter", format!("{field} eq '{escaped}'")));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

//! Type-safe model identifier wrapper
//!
//! Keys of the endpoint registry. Borrows as `str` so lookups by the raw
//! `model` field of a request need no allocation.

use crate::config::ModelRoute;
use std::borrow::Borrow;
use std::fmt;

/// Model identifier as it appears in the `model` field of a chat request
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ModelId(String);

impl ModelId {
    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ModelId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&ModelRoute> for ModelId {
    fn from(route: &ModelRoute) -> Self {
        Self(route.name().to_string())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one exercise page; derived from its route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for a page route. Query string and fragment are not part of the
    /// route; an empty route is the site root.
    pub fn from_route(route: &str) -> Self {
        let path = route
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        if path.is_empty() {
            Self("/".to_string())
        } else {
            Self(path.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key for this session's content, e.g. `code_/challenges/3`.
    pub fn storage_key(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }

    /// Inverse of [`storage_key`](Self::storage_key).
    pub fn from_storage_key(storage_key: &str, prefix: &str) -> Option<Self> {
        storage_key
            .strip_prefix(prefix)
            .map(|rest| Self(rest.to_string()))
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

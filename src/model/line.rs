//! Line names.

use std::borrow::Borrow;
use serde::{Deserialize, Serialize};

/// Name of a transit line. Each line has its own score namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineName(String);

impl LineName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LineName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LineName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&LineName> for LineName {
    fn from(l: &LineName) -> Self {
        l.clone()
    }
}

impl Borrow<str> for LineName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LineName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LineName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LineName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

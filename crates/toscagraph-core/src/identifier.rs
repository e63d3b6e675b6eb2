use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved namespace infix for built-in (normative) library types.
const NORMATIVE_INFIX: &str = "/tosca.";

/// Globally unique, URI-like resource identifier. Used as entity identity
/// and as a map/set key throughout the resolver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fragment after the last `#` or `/` separator.
    pub fn local_name(&self) -> &str {
        self.0
            .rfind(['#', '/'])
            .map(|i| &self.0[i + 1..])
            .unwrap_or(&self.0)
    }

    /// True when the identifier lies in the reserved built-in namespace.
    /// Normative library types are never materialized in full.
    pub fn is_normative(&self) -> bool {
        self.0.contains(NORMATIVE_INFIX)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

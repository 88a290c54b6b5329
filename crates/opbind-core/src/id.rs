//! Strongly-typed identifiers used across the compiler stages.
//!
//! Downstream crates should *not* use raw integers or bare strings for IDs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

new_id!(OpId);

/// Separator between the package path and the operator name in a [`Kind`].
pub const KIND_SEPARATOR: char = '.';

/// Process-wide operator identifier shared by the function-value, plan, and
/// execution registries.
///
/// Formed as `<package path>.<operator name>`, e.g. `experimental/table.fill`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(String);

impl Kind {
    pub fn new(package: &str, name: &str) -> Self {
        Self(format!("{package}{KIND_SEPARATOR}{name}"))
    }

    /// Wrap an already-joined identifier (upstream references, tests).
    pub fn from_raw(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split back into `(package, name)` at the last separator.
    pub fn split(&self) -> Option<(&str, &str)> {
        self.0.rsplit_once(KIND_SEPARATOR)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Kind {
    fn from(s: &str) -> Self {
        Self::from_raw(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_joins_package_and_name() {
        let kind = Kind::new("experimental/table", "fill");
        assert_eq!(kind.as_str(), "experimental/table.fill");
        assert_eq!(kind.split(), Some(("experimental/table", "fill")));
    }

    #[test]
    fn kind_split_uses_last_separator() {
        let kind = Kind::new("contrib/a.b", "op");
        assert_eq!(kind.split(), Some(("contrib/a.b", "op")));
    }

    #[test]
    fn op_id_display() {
        assert_eq!(OpId::new(7).to_string(), "OpId(7)");
    }
}

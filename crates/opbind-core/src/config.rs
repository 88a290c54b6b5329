//! Binding configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Maximum nesting (records inside records, arrays inside arrays) the
    /// decoder descends before giving up on an argument.
    pub max_depth: usize,

    /// Close a registry for writes on its first lookup, so a late
    /// registration can never race query compilation.
    pub seal_on_first_read: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            seal_on_first_read: false,
        }
    }
}

impl BindConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `OPBIND_MAX_DEPTH`: decoder nesting limit
    /// - `OPBIND_SEAL_ON_FIRST_READ`: `true`/`false`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("OPBIND_MAX_DEPTH") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_depth = v;
            }
        }

        if let Ok(s) = std::env::var("OPBIND_SEAL_ON_FIRST_READ") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.seal_on_first_read = v;
            }
        }

        cfg
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn sealing_on_first_read(mut self) -> Self {
        self.seal_on_first_read = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: BindConfig = serde_json::from_str(r#"{"max_depth": 4}"#).unwrap();
        assert_eq!(cfg.max_depth, 4);
        assert!(!cfg.seal_on_first_read);
    }
}

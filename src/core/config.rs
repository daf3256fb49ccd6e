//! Per-module configuration supplied by the host build file.
//!
//! The recognized key set is exactly `{args, delete, with, min}`; any
//! other key is rejected before probing begins. List-valued keys accept
//! either a TOML array or a single whitespace-separated string, matching
//! the scalar form build files historically used.

use std::fmt;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;

use crate::core::version::PythonVersion;

/// Keys the module recognizes; everything else is a hard error.
pub const RECOGNIZED_KEYS: &[&str] = &["args", "delete", "with", "min"];

/// Configuration validation errors, raised before any probing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unrecognized key `{key}` in python module config (recognized: args, delete, with, min)")]
    UnrecognizedKey { key: String },

    #[error("invalid python module config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Caller-supplied module configuration, read-only per invocation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ModuleConfig {
    /// Free-form extra arguments appended to config-tool invocations.
    #[serde(deserialize_with = "string_or_seq")]
    pub args: Vec<String>,

    /// Substrings deleted from the raw linker-flag text.
    #[serde(deserialize_with = "string_or_seq")]
    pub delete: Vec<String>,

    /// Auxiliary module names whose include directories are appended.
    #[serde(deserialize_with = "string_or_seq")]
    pub with: Vec<String>,

    /// Minimum interpreter version, `major[.minor]`.
    pub min: Option<PythonVersion>,
}

impl ModuleConfig {
    /// Parse a TOML document, rejecting unrecognized keys first.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let value: toml::Value = toml::from_str(s)?;

        if let Some(table) = value.as_table() {
            for key in table.keys() {
                if !RECOGNIZED_KEYS.contains(&key.as_str()) {
                    return Err(ConfigError::UnrecognizedKey { key: key.clone() });
                }
            }
        }

        Ok(value.try_into()?)
    }
}

/// Accept either `"a b c"` or `["a", "b", "c"]`.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrSeq;

    impl<'de> Visitor<'de> for StringOrSeq {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.split_whitespace().map(String::from).collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut out = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                out.push(item);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(StringOrSeq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg = ModuleConfig::from_toml_str(
            r#"
            with = ["numpy", "scipy"]
            delete = "-Wstrict-prototypes"
            min = "3.8"
            args = []
            "#,
        )
        .unwrap();

        assert_eq!(cfg.with, vec!["numpy".to_string(), "scipy".to_string()]);
        assert_eq!(cfg.delete, vec!["-Wstrict-prototypes".to_string()]);
        assert_eq!(cfg.min, Some(PythonVersion::new(3, 8)));
        assert!(cfg.args.is_empty());
    }

    #[test]
    fn test_scalar_form_splits_on_whitespace() {
        let cfg = ModuleConfig::from_toml_str(r#"with = "numpy scipy""#).unwrap();
        assert_eq!(cfg.with, vec!["numpy".to_string(), "scipy".to_string()]);
    }

    #[test]
    fn test_unrecognized_key_rejected() {
        let err = ModuleConfig::from_toml_str("includes = true").unwrap_err();
        match err {
            ConfigError::UnrecognizedKey { key } => assert_eq!(key, "includes"),
            other => panic!("expected UnrecognizedKey, got {other}"),
        }
    }

    #[test]
    fn test_empty_config_defaults() {
        let cfg = ModuleConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ModuleConfig::default());
        assert_eq!(cfg.min, None);
    }

    #[test]
    fn test_invalid_min_rejected_at_parse() {
        assert!(ModuleConfig::from_toml_str(r#"min = "three""#).is_err());
    }
}

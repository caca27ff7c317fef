//! Program-wide policy configuration.
//!
//! Two behaviors are left open by the language and must be chosen explicitly:
//! how angles are narrowed and whether an array may be concatenated with
//! itself in a call argument list. Neither has a default.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with ARVAK_ prefix)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

use crate::angle::AngleNarrowing;
use crate::error::{ClassicalError, ClassicalResult};

/// Whether `f(a ++ a)` is accepted when `a` is an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfConcatPolicy {
    /// Arrays are copied on concatenation, so self-concatenation is harmless.
    Permit,
    /// Treat array self-concatenation like register self-concatenation.
    Forbid,
}

impl fmt::Display for SelfConcatPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfConcatPolicy::Permit => write!(f, "permit"),
            SelfConcatPolicy::Forbid => write!(f, "forbid"),
        }
    }
}

/// Policy switches for one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassicalConfig {
    /// How angle-to-angle casts drop least-significant bits.
    pub angle_narrowing: AngleNarrowing,

    /// Array self-concatenation in call arguments.
    pub array_call_self_concat: SelfConcatPolicy,
}

impl ClassicalConfig {
    pub fn new(angle_narrowing: AngleNarrowing, array_call_self_concat: SelfConcatPolicy) -> Self {
        Self {
            angle_narrowing,
            array_call_self_concat,
        }
    }

    /// Parse from YAML text.
    pub fn from_yaml_str(text: &str) -> ClassicalResult<Self> {
        serde_yaml_ng::from_str(text)
            .map_err(|e| ClassicalError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> ClassicalResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClassicalError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_yaml_str(&contents)?;
        info!(path = %path.display(), %config, "loaded classical config");
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `ARVAK_ANGLE_NARROWING` (`round` | `truncate`) and
    /// `ARVAK_ARRAY_CALL_SELF_CONCAT` (`permit` | `forbid`). Both must be set.
    pub fn from_env() -> ClassicalResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClassicalResult<Self> {
        let require = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_ascii_lowercase())
                .ok_or_else(|| ClassicalError::Config(format!("{key} is not set")))
        };

        let angle_narrowing = match require("ARVAK_ANGLE_NARROWING")?.as_str() {
            "round" => AngleNarrowing::Round,
            "truncate" => AngleNarrowing::Truncate,
            other => {
                return Err(ClassicalError::Config(format!(
                    "Invalid ARVAK_ANGLE_NARROWING '{other}', expected 'round' or 'truncate'"
                )));
            }
        };
        let array_call_self_concat = match require("ARVAK_ARRAY_CALL_SELF_CONCAT")?.as_str() {
            "permit" => SelfConcatPolicy::Permit,
            "forbid" => SelfConcatPolicy::Forbid,
            other => {
                return Err(ClassicalError::Config(format!(
                    "Invalid ARVAK_ARRAY_CALL_SELF_CONCAT '{other}', expected 'permit' or 'forbid'"
                )));
            }
        };

        let config = Self::new(angle_narrowing, array_call_self_concat);
        info!(%config, "loaded classical config from environment");
        Ok(config)
    }
}

impl fmt::Display for ClassicalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let narrowing = match self.angle_narrowing {
            AngleNarrowing::Round => "round",
            AngleNarrowing::Truncate => "truncate",
        };
        write!(
            f,
            "angle_narrowing={narrowing}, array_call_self_concat={}",
            self.array_call_self_concat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_yaml_roundtrip() {
        let config = ClassicalConfig::from_yaml_str(
            "angle_narrowing: truncate\narray_call_self_concat: permit\n",
        )
        .unwrap();
        assert_eq!(
            config,
            ClassicalConfig::new(AngleNarrowing::Truncate, SelfConcatPolicy::Permit)
        );

        let text = serde_yaml_ng::to_string(&config).unwrap();
        assert_eq!(ClassicalConfig::from_yaml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let err = ClassicalConfig::from_yaml_str("angle_narrowing: round\n").unwrap_err();
        assert!(matches!(err, ClassicalError::Config(_)));
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert!(
            ClassicalConfig::from_yaml_str(
                "angle_narrowing: nearest\narray_call_self_concat: permit\n"
            )
            .is_err()
        );
    }

    #[test]
    fn test_env_lookup() {
        let mut vars = FxHashMap::default();
        vars.insert("ARVAK_ANGLE_NARROWING", "Round");
        vars.insert("ARVAK_ARRAY_CALL_SELF_CONCAT", "forbid");
        let config =
            ClassicalConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
        assert_eq!(config.angle_narrowing, AngleNarrowing::Round);
        assert_eq!(config.array_call_self_concat, SelfConcatPolicy::Forbid);

        vars.remove("ARVAK_ARRAY_CALL_SELF_CONCAT");
        let err = ClassicalConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ClassicalError::Config("ARVAK_ARRAY_CALL_SELF_CONCAT is not set".into())
        );
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            ClassicalConfig::from_file("/nonexistent/classical.yaml"),
            Err(ClassicalError::Config(_))
        ));
    }
}

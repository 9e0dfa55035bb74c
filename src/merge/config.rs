//! Serializable merge configuration.

use super::array::{ArrayMergeById, ConcatArrayMerge};
use super::options::{MergeOptions, DEFAULT_IDENTITY_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// ConfigError represents a failure to load a [`MergeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown array merge strategy: {0} (expected concat or by-id)")]
    UnknownArrayMerge(String),
}

/// ArrayMergeKind names one of the built-in array strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayMergeKind {
    #[default]
    Concat,
    #[serde(alias = "by-id")]
    ById,
}

impl FromStr for ArrayMergeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concat" => Ok(ArrayMergeKind::Concat),
            "by-id" | "by_id" => Ok(ArrayMergeKind::ById),
            other => Err(ConfigError::UnknownArrayMerge(other.to_string())),
        }
    }
}

impl fmt::Display for ArrayMergeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayMergeKind::Concat => write!(f, "concat"),
            ArrayMergeKind::ById => write!(f, "by-id"),
        }
    }
}

fn default_clone() -> bool {
    true
}

fn default_identity_key() -> String {
    DEFAULT_IDENTITY_KEY.to_string()
}

/// MergeConfig is the serializable subset of [`MergeOptions`].
///
/// Custom classifiers and strategies can only be set in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MergeConfig {
    #[serde(default)]
    pub array_merge: ArrayMergeKind,
    #[serde(default = "default_clone")]
    pub clone: bool,
    #[serde(default = "default_identity_key")]
    pub identity_key: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            array_merge: ArrayMergeKind::default(),
            clone: default_clone(),
            identity_key: default_identity_key(),
        }
    }
}

impl MergeConfig {
    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a config file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Builds the equivalent [`MergeOptions`].
    pub fn into_options(self) -> MergeOptions {
        let options = MergeOptions::new()
            .with_clone(self.clone)
            .with_identity_key(self.identity_key);
        match self.array_merge {
            ArrayMergeKind::Concat => options.with_array_merge(ConcatArrayMerge),
            ArrayMergeKind::ById => options.with_array_merge(ArrayMergeById),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_with;
    use crate::value::from_json;

    #[test]
    fn test_defaults_from_empty_document() {
        assert_eq!(MergeConfig::from_json("{}").unwrap(), MergeConfig::default());
        let config = MergeConfig::default();
        assert_eq!(config.array_merge, ArrayMergeKind::Concat);
        assert!(config.clone);
        assert_eq!(config.identity_key, "_id");
    }

    #[test]
    fn test_from_yaml() {
        let config = MergeConfig::from_yaml("arrayMerge: by-id\nclone: false\nidentityKey: name\n")
            .unwrap();
        assert_eq!(config.array_merge, ArrayMergeKind::ById);
        assert!(!config.clone);
        assert_eq!(config.identity_key, "name");
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let err = MergeConfig::from_json(r#"{"arrayMerge":"concat","deep":true}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_array_merge_kind_from_str() {
        assert_eq!("concat".parse::<ArrayMergeKind>().unwrap(), ArrayMergeKind::Concat);
        assert_eq!("by-id".parse::<ArrayMergeKind>().unwrap(), ArrayMergeKind::ById);
        assert!(matches!(
            "zip".parse::<ArrayMergeKind>(),
            Err(ConfigError::UnknownArrayMerge(s)) if s == "zip"
        ));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = MergeConfig::from_path("/nonexistent/deepmerge.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_into_options_selects_strategy() {
        let options = MergeConfig {
            array_merge: ArrayMergeKind::ById,
            ..MergeConfig::default()
        }
        .into_options();
        let out = merge_with(
            &from_json(r#"[{"_id":1,"a":1}]"#).unwrap(),
            &from_json(r#"[{"_id":1,"b":2}]"#).unwrap(),
            &options,
        );
        assert_eq!(out, from_json(r#"[{"_id":1,"a":1,"b":2}]"#).unwrap());
    }
}

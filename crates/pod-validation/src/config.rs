//! Schema constants for Pod validation.
//!
//! The rule set never hard-codes the accepted values. They live in a
//! [`SchemaConfig`] handed to the validator, so a variant of the schema
//! (another registry, another API version) is a configuration change.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

const DEFAULT_CONTAINER_NAME_PATTERN: &str = r"^[a-z][a-z0-9_]*$";
const DEFAULT_IMAGE_PATTERN: &str = r"^registry\.bigbrother\.io/[^:]+:.+$";
const DEFAULT_MEMORY_PATTERN: &str = r"^\d+(Gi|Mi|Ki)$";

static CONTAINER_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_CONTAINER_NAME_PATTERN).expect("Invalid regex pattern for container names")
});

static IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_IMAGE_PATTERN).expect("Invalid regex pattern for images")
});

static MEMORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_MEMORY_PATTERN).expect("Invalid regex pattern for memory quantities")
});

/// How integer-typed fields treat quoted numbers such as `cpu: "4"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerPolicy {
    /// Only scalars resolved as integers are accepted
    #[default]
    Strict,
    /// String scalars holding a decimal integer are accepted too
    Coerce,
}

/// Errors raised while building a [`SchemaConfig`] from settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid pattern for `{field}`: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("invalid port range {min}..={max}")]
    InvalidPortRange { min: i64, max: i64 },

    #[error("`{field}` must list at least one value")]
    EmptyAllowList { field: &'static str },
}

/// The fixed Pod schema's constants.
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    /// Required value of `apiVersion`
    pub api_version: String,
    /// Required value of `kind`
    pub kind: String,
    /// Allowed values of `spec.os.name`
    pub os_names: Vec<String>,
    /// Allowed values of a port's `protocol`
    pub protocols: Vec<String>,
    pub container_name_pattern: Regex,
    pub image_pattern: Regex,
    pub memory_pattern: Regex,
    /// Smallest valid port number (inclusive)
    pub port_min: i64,
    /// Largest valid port number (inclusive)
    pub port_max: i64,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "Pod".to_string(),
            os_names: vec!["linux".to_string(), "windows".to_string()],
            protocols: vec!["TCP".to_string(), "UDP".to_string()],
            container_name_pattern: CONTAINER_NAME_PATTERN.clone(),
            image_pattern: IMAGE_PATTERN.clone(),
            memory_pattern: MEMORY_PATTERN.clone(),
            port_min: 1,
            port_max: 65535,
        }
    }
}

/// Serializable overrides for [`SchemaConfig`].
///
/// Every field is optional; absent fields keep the default schema value.
///
/// ```toml
/// api-version = "v1"
/// image-pattern = '^registry\.example\.com/[^:]+:.+$'
/// os-names = ["linux"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SchemaSettings {
    pub api_version: Option<String>,
    pub kind: Option<String>,
    pub os_names: Option<Vec<String>>,
    pub protocols: Option<Vec<String>>,
    pub container_name_pattern: Option<String>,
    pub image_pattern: Option<String>,
    pub memory_pattern: Option<String>,
    pub port_min: Option<i64>,
    pub port_max: Option<i64>,
}

impl SchemaSettings {
    /// Apply the overrides on top of the default schema.
    pub fn into_config(self) -> Result<SchemaConfig, ConfigError> {
        let defaults = SchemaConfig::default();

        let config = SchemaConfig {
            api_version: self.api_version.unwrap_or(defaults.api_version),
            kind: self.kind.unwrap_or(defaults.kind),
            os_names: non_empty("os-names", self.os_names)?.unwrap_or(defaults.os_names),
            protocols: non_empty("protocols", self.protocols)?.unwrap_or(defaults.protocols),
            container_name_pattern: compile(
                "container-name-pattern",
                self.container_name_pattern,
                defaults.container_name_pattern,
            )?,
            image_pattern: compile("image-pattern", self.image_pattern, defaults.image_pattern)?,
            memory_pattern: compile("memory-pattern", self.memory_pattern, defaults.memory_pattern)?,
            port_min: self.port_min.unwrap_or(defaults.port_min),
            port_max: self.port_max.unwrap_or(defaults.port_max),
        };

        if config.port_min > config.port_max {
            return Err(ConfigError::InvalidPortRange {
                min: config.port_min,
                max: config.port_max,
            });
        }
        Ok(config)
    }
}

fn compile(
    field: &'static str,
    pattern: Option<String>,
    default: Regex,
) -> Result<Regex, ConfigError> {
    match pattern {
        Some(pattern) => {
            Regex::new(&pattern).map_err(|source| ConfigError::InvalidPattern { field, source })
        }
        None => Ok(default),
    }
}

fn non_empty(
    field: &'static str,
    values: Option<Vec<String>>,
) -> Result<Option<Vec<String>>, ConfigError> {
    match values {
        Some(values) if values.is_empty() => Err(ConfigError::EmptyAllowList { field }),
        other => Ok(other),
    }
}

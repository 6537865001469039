//! The `--config` settings file.
//!
//! ```toml
//! [schema]
//! api-version = "v1"
//! image-pattern = '^registry\.example\.com/[^:]+:.+$'
//! port-max = 32767
//!
//! [validation]
//! fail-fast = true
//! integer-policy = "coerce"
//! ```
//!
//! Every key is optional. Command-line flags win over the file.

use anyhow::{Context, Result};
use pod_validation::{IntegerPolicy, ReportPolicy, SchemaSettings, ValidationOptions};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    pub schema: SchemaSettings,
    pub validation: ValidationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ValidationSettings {
    pub fail_fast: Option<bool>,
    pub integer_policy: Option<IntegerPolicy>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge the file's validation settings with the command-line flags.
    pub fn options(&self, fail_fast: bool, integer_policy: Option<IntegerPolicy>) -> ValidationOptions {
        let policy = if fail_fast || self.validation.fail_fast.unwrap_or(false) {
            ReportPolicy::FailFast
        } else {
            ReportPolicy::CollectAll
        };
        ValidationOptions {
            policy,
            integer_policy: integer_policy
                .or(self.validation.integer_policy)
                .unwrap_or_default(),
        }
    }
}

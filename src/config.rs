//! Options of the [CalverScheme](crate::CalverScheme).
//!
//! Options can be read from a bare TOML table:
//!
//! ```toml
//! scheme-template = "YYYY.0M.DD"
//! validate-monotonicity = true
//! ```
//!
//! or from the `[tool.hatch.version]` table of a `pyproject.toml`, where the keys may also be
//! spelled `calver-scheme` and `validate-bump`:
//!
//! ```toml
//! [tool.hatch.version]
//! scheme = "calver"
//! calver-scheme = "YYYY.0M.DD"
//! validate-bump = false
//! ```
//!
//! Keys this crate doesn't know about are ignored.

use crate::{bump::DEFAULT_SCHEME_TEMPLATE, error::ConfigError};
use serde::Deserialize;

/// Options of the [CalverScheme](crate::CalverScheme).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SchemeConfig {
    /// The dot-separated calendar scheme. Defaults to `YYYY.MM.DD`.
    #[serde(alias = "calver-scheme")]
    pub scheme_template: String,

    /// Whether a bumped version must sort after the original one. Defaults to `true`.
    #[serde(alias = "validate-bump")]
    pub validate_monotonicity: bool,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            scheme_template: DEFAULT_SCHEME_TEMPLATE.to_string(),
            validate_monotonicity: true,
        }
    }
}

#[derive(Deserialize)]
struct PyProject {
    tool: Option<Tool>,
}

#[derive(Deserialize)]
struct Tool {
    hatch: Option<Hatch>,
}

#[derive(Deserialize)]
struct Hatch {
    version: Option<SchemeConfig>,
}

impl SchemeConfig {
    /// Reads options from a TOML table. Missing options get their defaults.
    ///
    /// # Errors
    ///
    /// Returns [ConfigError::Toml] if `toml_str` is not TOML, or an option has the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads options from the `[tool.hatch.version]` table of a `pyproject.toml`. If there is no
    /// such table, all options get their defaults.
    ///
    /// # Errors
    ///
    /// Same as [SchemeConfig::from_toml_str].
    pub fn from_pyproject_str(toml_str: &str) -> Result<Self, ConfigError> {
        let pyproject: PyProject = toml::from_str(toml_str)?;
        Ok(pyproject
            .tool
            .and_then(|tool| tool.hatch)
            .and_then(|hatch| hatch.version)
            .unwrap_or_default())
    }
}

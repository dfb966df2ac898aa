//! TOML configuration file.
//!
//! ```toml
//! [rules]
//! ignoreOptionalProperty = true
//! reportMissingAsError = false
//! ```

use std::path::Path;

use serde::Deserialize;

use super::class_loader::{read, LoadError};
use crate::domain::config::{Configuration, Rule};

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    rules: RulesSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RulesSection {
    ignore_optional_property: Option<bool>,
    report_missing_as_error: Option<bool>,
    report_missing_to_controller: Option<bool>,
}

pub fn parse_configuration(contents: &str, path: &Path) -> Result<Configuration, LoadError> {
    let file: ConfigFile = toml::from_str(contents).map_err(|source| LoadError::Toml {
        path: path.to_path_buf(),
        source,
    })?;

    let mut configuration = Configuration::new();
    for (rule, value) in [
        (Rule::IgnoreOptionalProperty, file.rules.ignore_optional_property),
        (Rule::ReportMissingAsError, file.rules.report_missing_as_error),
        (Rule::ReportMissingToController, file.rules.report_missing_to_controller),
    ] {
        if let Some(enabled) = value {
            configuration.set(rule, enabled);
        }
    }
    Ok(configuration)
}

pub fn load_configuration(path: &Path) -> Result<Configuration, LoadError> {
    let contents = read(path)?;
    parse_configuration(&contents, path)
}

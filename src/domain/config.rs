//! Reporting rules.
//!
//! Rules only change how issues are presented or filtered. The analyzer
//! always computes the full issue set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Don't report unused outlets that are declared optional.
    #[serde(rename = "ignoreOptionalProperty")]
    IgnoreOptionalProperty,
    /// Report missing outlets/actions as errors instead of warnings.
    #[serde(rename = "reportMissingAsError")]
    ReportMissingAsError,
    /// Report missing outlets at the owning class instead of the document.
    #[serde(rename = "reportMissingToController")]
    ReportMissingToController,
}

impl Rule {
    pub const ALL: [Rule; 3] = [
        Rule::IgnoreOptionalProperty,
        Rule::ReportMissingAsError,
        Rule::ReportMissingToController,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::IgnoreOptionalProperty => "ignoreOptionalProperty",
            Rule::ReportMissingAsError => "reportMissingAsError",
            Rule::ReportMissingToController => "reportMissingToController",
        }
    }

    pub fn from_name(name: &str) -> Option<Rule> {
        Self::ALL.into_iter().find(|rule| rule.name() == name)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Enabled rules. Every rule is off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    enabled: BTreeSet<Rule>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables every argument that names a rule; other arguments are ignored.
    pub fn from_arguments<I, S>(arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut configuration = Self::default();
        for argument in arguments {
            if let Some(rule) = Rule::from_name(argument.as_ref()) {
                configuration.enable(rule);
            }
        }
        configuration
    }

    pub fn with(mut self, rule: Rule) -> Self {
        self.enable(rule);
        self
    }

    pub fn enable(&mut self, rule: Rule) {
        self.enabled.insert(rule);
    }

    pub fn set(&mut self, rule: Rule, enabled: bool) {
        if enabled {
            self.enabled.insert(rule);
        } else {
            self.enabled.remove(&rule);
        }
    }

    pub fn is_enabled(&self, rule: Rule) -> bool {
        self.enabled.contains(&rule)
    }

    /// Rules enabled in either configuration.
    pub fn union(mut self, other: &Configuration) -> Self {
        for rule in Rule::ALL {
            if other.is_enabled(rule) {
                self.enable(rule);
            }
        }
        self
    }

    pub fn missing_severity(&self) -> Severity {
        if self.is_enabled(Rule::ReportMissingAsError) {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}

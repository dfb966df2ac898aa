//! Issues found while cross-checking documents against classes.

use crate::domain::class::ClassMap;
use crate::domain::config::{Configuration, Rule, Severity};
use crate::domain::declaration::{Declaration, SegueIdentifier};
use crate::domain::segue::SegueDeclaration;
use std::fmt;

/// `<file>:<line>:<column>` prefix of a diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionIssue {
    MissingOutlet { class_name: String, outlet: Declaration },
    MissingAction { class_name: String, action: Declaration },
    UnnecessaryOutlet { class_name: String, outlet: Declaration },
    UnnecessaryAction { class_name: String, action: Declaration },
    UnknownSegueIdentifier { class_name: String, segue_identifier: SegueIdentifier },
    BrokenUnwindSegue { class_name: String, segue: SegueDeclaration },
}

impl ConnectionIssue {
    pub fn class_name(&self) -> &str {
        match self {
            ConnectionIssue::MissingOutlet { class_name, .. }
            | ConnectionIssue::MissingAction { class_name, .. }
            | ConnectionIssue::UnnecessaryOutlet { class_name, .. }
            | ConnectionIssue::UnnecessaryAction { class_name, .. }
            | ConnectionIssue::UnknownSegueIdentifier { class_name, .. }
            | ConnectionIssue::BrokenUnwindSegue { class_name, .. } => class_name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConnectionIssue::MissingOutlet { .. } => "missingOutlet",
            ConnectionIssue::MissingAction { .. } => "missingAction",
            ConnectionIssue::UnnecessaryOutlet { .. } => "unnecessaryOutlet",
            ConnectionIssue::UnnecessaryAction { .. } => "unnecessaryAction",
            ConnectionIssue::UnknownSegueIdentifier { .. } => "unknownSegueIdentifier",
            ConnectionIssue::BrokenUnwindSegue { .. } => "brokenUnwindSegue",
        }
    }

    /// Issues that should fail a build.
    pub fn is_serious(&self) -> bool {
        matches!(
            self,
            ConnectionIssue::MissingOutlet { .. }
                | ConnectionIssue::MissingAction { .. }
                | ConnectionIssue::BrokenUnwindSegue { .. }
        )
    }

    pub fn severity(&self, configuration: &Configuration) -> Severity {
        if self.is_serious() {
            configuration.missing_severity()
        } else {
            Severity::Warning
        }
    }

    /// Optional unused outlets are hidden under `ignoreOptionalProperty`.
    pub fn is_suppressed(&self, configuration: &Configuration) -> bool {
        match self {
            ConnectionIssue::UnnecessaryOutlet { outlet, .. } => {
                outlet.is_optional && configuration.is_enabled(Rule::IgnoreOptionalProperty)
            }
            _ => false,
        }
    }

    /// Where the offending declaration lives.
    pub fn position(&self, classes: &ClassMap) -> Position {
        match self {
            ConnectionIssue::MissingOutlet { outlet: declaration, .. }
            | ConnectionIssue::UnnecessaryOutlet { outlet: declaration, .. }
            | ConnectionIssue::MissingAction { action: declaration, .. }
            | ConnectionIssue::UnnecessaryAction { action: declaration, .. } => Position {
                file: declaration
                    .parent_class_path
                    .clone()
                    .unwrap_or_else(|| declaration.file_path()),
                line: declaration.line,
                column: declaration.column,
            },
            ConnectionIssue::UnknownSegueIdentifier { segue_identifier, .. } => Position {
                file: segue_identifier.source_location.file.clone(),
                line: segue_identifier.source_location.line,
                column: segue_identifier.source_location.column,
            },
            ConnectionIssue::BrokenUnwindSegue { segue, .. } => {
                let (file, line) = segue.owner_anchor(classes);
                Position { file, line, column: 0 }
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConnectionIssue::MissingOutlet { class_name, outlet } => {
                let interface_object = outlet
                    .parent_class
                    .as_ref()
                    .map(|parent| format!("in {parent} "))
                    .unwrap_or_default();
                format!(
                    "IBOutlet missing: {} is not connected {}in {}",
                    outlet.name,
                    interface_object,
                    outlet.file_name(class_name)
                )
            }
            ConnectionIssue::MissingAction { class_name, action } => format!(
                "IBAction missing: '{}' is not implemented in {}",
                action.name,
                action.file_name(class_name)
            ),
            ConnectionIssue::UnnecessaryOutlet { class_name, outlet } => {
                let suggestion = if outlet.is_optional {
                    format!(", remove warning by adding '{}' argument", Rule::IgnoreOptionalProperty)
                } else {
                    format!(", consider set '{}' Optional", outlet.name)
                };
                format!(
                    "IBOutlet unused: {} not linked in {}{}",
                    outlet.name,
                    outlet.file_name(class_name),
                    suggestion
                )
            }
            ConnectionIssue::UnnecessaryAction { class_name, action } => format!(
                "IBAction unused: '{}' not linked in {}",
                action.name,
                action.file_name(class_name)
            ),
            ConnectionIssue::UnknownSegueIdentifier { class_name, segue_identifier } => format!(
                "Unknown Identifier: '{}' does not identify any segues from {}",
                segue_identifier.identifier, class_name
            ),
            ConnectionIssue::BrokenUnwindSegue { class_name, segue } => format!(
                "Broken Connection: '{}' does not identify any @IBAction functions ({})",
                segue.unwind_action().unwrap_or_default(),
                class_name
            ),
        }
    }

    /// One diagnostic line, or `None` when the configuration hides the issue.
    pub fn render(&self, configuration: &Configuration, classes: &ClassMap) -> Option<String> {
        if self.is_suppressed(configuration) {
            return None;
        }
        Some(format!(
            "{}: {}: {}",
            self.position(classes),
            self.severity(configuration),
            self.message()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::class::ClassRecord;

    fn label() -> Declaration {
        Declaration::new("label", 1, 0)
    }

    #[test]
    fn test_missing_outlet_warning() {
        let issue = ConnectionIssue::MissingOutlet { class_name: "A".into(), outlet: label() };
        assert_eq!(
            issue.render(&Configuration::new(), &ClassMap::new()).unwrap(),
            "label:1:0: warning: IBOutlet missing: label is not connected in A"
        );
    }

    #[test]
    fn test_missing_outlet_error_names_interface_object() {
        let outlet = Declaration::new("label", 14, 8)
            .in_file("/project/Base.lproj/Main.storyboard")
            .owned_by("LoginViewController");
        let issue = ConnectionIssue::MissingOutlet { class_name: "LoginViewController".into(), outlet };
        let configuration = Configuration::new().with(Rule::ReportMissingAsError);
        assert_eq!(
            issue.render(&configuration, &ClassMap::new()).unwrap(),
            "/project/Base.lproj/Main.storyboard:14:8: error: IBOutlet missing: label is not connected in LoginViewController in Main.storyboard"
        );
    }

    #[test]
    fn test_missing_action() {
        let issue = ConnectionIssue::MissingAction {
            class_name: "A".into(),
            action: Declaration::new("didTapButton:", 1, 0),
        };
        assert_eq!(
            issue.render(&Configuration::new(), &ClassMap::new()).unwrap(),
            "didTapButton:1:0: warning: IBAction missing: 'didTapButton:' is not implemented in A"
        );
    }

    #[test]
    fn test_unnecessary_outlet_suggestions() {
        let required = ConnectionIssue::UnnecessaryOutlet { class_name: "A".into(), outlet: label() };
        assert!(required.message().ends_with(", consider set 'label' Optional"));

        let optional = ConnectionIssue::UnnecessaryOutlet {
            class_name: "A".into(),
            outlet: label().optional(true),
        };
        assert!(optional
            .message()
            .ends_with(", remove warning by adding 'ignoreOptionalProperty' argument"));
    }

    #[test]
    fn test_ignore_optional_suppresses_only_optional_outlets() {
        let configuration = Configuration::new().with(Rule::IgnoreOptionalProperty);
        let optional = ConnectionIssue::UnnecessaryOutlet {
            class_name: "A".into(),
            outlet: label().optional(true),
        };
        let required = ConnectionIssue::UnnecessaryOutlet { class_name: "A".into(), outlet: label() };

        assert!(optional.render(&configuration, &ClassMap::new()).is_none());
        assert!(required.render(&configuration, &ClassMap::new()).is_some());
        assert!(optional.render(&Configuration::new(), &ClassMap::new()).is_some());
    }

    #[test]
    fn test_unnecessary_issues_stay_warnings() {
        let configuration = Configuration::new().with(Rule::ReportMissingAsError);
        let issue = ConnectionIssue::UnnecessaryAction {
            class_name: "A".into(),
            action: Declaration::new("tap:", 3, 4).in_file("A.swift"),
        };
        assert!(!issue.is_serious());
        assert_eq!(
            issue.render(&configuration, &ClassMap::new()).unwrap(),
            "A.swift:3:4: warning: IBAction unused: 'tap:' not linked in A.swift"
        );
    }

    #[test]
    fn test_broken_unwind_segue_uses_owner_location() {
        let mut segue = SegueDeclaration::builder()
            .attributes([
                ("id", "u1"),
                ("kind", "unwind"),
                ("destination", "exit"),
                ("unwindAction", "unwindToMenu:"),
            ])
            .build()
            .unwrap();
        segue.parent_class_name = Some("DetailViewController".into());

        let classes: ClassMap = [("DetailViewController", ClassRecord::default().at("Detail.swift", 7))]
            .into_iter()
            .collect();
        let issue = ConnectionIssue::BrokenUnwindSegue {
            class_name: "DetailViewController".into(),
            segue,
        };
        assert!(issue.is_serious());
        assert_eq!(
            issue.render(&Configuration::new(), &classes).unwrap(),
            "Detail.swift:7:0: warning: Broken Connection: 'unwindToMenu:' does not identify any @IBAction functions (DetailViewController)"
        );
    }
}

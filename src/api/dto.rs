use serde::{Deserialize, Serialize};

use crate::domain::class::ClassMap;
use crate::domain::config::{Configuration, Severity};
use crate::domain::issue::ConnectionIssue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDto {
    pub kind: String,
    pub class_name: String,
    pub severity: Severity,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl IssueDto {
    pub fn from_issue(issue: &ConnectionIssue, configuration: &Configuration, classes: &ClassMap) -> Self {
        let position = issue.position(classes);
        IssueDto {
            kind: issue.kind().to_string(),
            class_name: issue.class_name().to_string(),
            severity: issue.severity(configuration),
            file: position.file,
            line: position.line,
            column: position.column,
            message: issue.message(),
        }
    }
}

//! Issue exporters
//!
//! Text output is one compiler-style line per issue so IDE build phases can
//! pick them up; JSON output is an array of `IssueDto`.

use std::io::{Result, Write};

use crate::api::dto::IssueDto;
use crate::domain::class::ClassMap;
use crate::domain::config::Configuration;
use crate::domain::issue::ConnectionIssue;
use crate::ports::IssueExporter;

pub struct TextExporter;

impl TextExporter {
    /// Rendered lines, with suppressed issues left out.
    pub fn to_lines(issues: &[ConnectionIssue], configuration: &Configuration, classes: &ClassMap) -> Vec<String> {
        issues
            .iter()
            .filter_map(|issue| issue.render(configuration, classes))
            .collect()
    }
}

impl IssueExporter for TextExporter {
    fn export(
        &self,
        issues: &[ConnectionIssue],
        configuration: &Configuration,
        classes: &ClassMap,
        out: &mut dyn Write,
    ) -> Result<()> {
        for line in Self::to_lines(issues, configuration, classes) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

pub struct JsonExporter;

impl JsonExporter {
    pub fn to_dtos(issues: &[ConnectionIssue], configuration: &Configuration, classes: &ClassMap) -> Vec<IssueDto> {
        issues
            .iter()
            .filter(|issue| !issue.is_suppressed(configuration))
            .map(|issue| IssueDto::from_issue(issue, configuration, classes))
            .collect()
    }
}

impl IssueExporter for JsonExporter {
    fn export(
        &self,
        issues: &[ConnectionIssue],
        configuration: &Configuration,
        classes: &ClassMap,
        out: &mut dyn Write,
    ) -> Result<()> {
        let dtos = Self::to_dtos(issues, configuration, classes);
        serde_json::to_writer_pretty(&mut *out, &dtos)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::Rule;
    use crate::domain::declaration::Declaration;

    fn issues() -> Vec<ConnectionIssue> {
        vec![
            ConnectionIssue::MissingOutlet {
                class_name: "A".to_string(),
                outlet: Declaration::new("label", 1, 0),
            },
            ConnectionIssue::UnnecessaryOutlet {
                class_name: "A".to_string(),
                outlet: Declaration::new("hidden", 2, 0).optional(true),
            },
        ]
    }

    #[test]
    fn test_text_export() {
        let mut out = Vec::new();
        TextExporter
            .export(&issues(), &Configuration::new(), &ClassMap::new(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("label:1:0: warning: IBOutlet missing"));
    }

    #[test]
    fn test_suppressed_issues_are_not_exported() {
        let configuration = Configuration::new().with(Rule::IgnoreOptionalProperty);

        let mut out = Vec::new();
        TextExporter.export(&issues(), &configuration, &ClassMap::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);

        let mut out = Vec::new();
        JsonExporter.export(&issues(), &configuration, &ClassMap::new(), &mut out).unwrap();
        let dtos: Vec<IssueDto> = serde_json::from_slice(&out).unwrap();
        assert_eq!(dtos.len(), 1);
        assert_eq!(dtos[0].kind, "missingOutlet");
    }
}

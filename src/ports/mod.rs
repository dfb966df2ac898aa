use std::io::Write;
use std::path::Path;

use crate::domain::class::ClassMap;
use crate::domain::config::Configuration;
use crate::domain::connection_analyzer::AnalysisContext;
use crate::domain::issue::ConnectionIssue;
use crate::infrastructure::nib_parser::{NibParseError, ParsedNib};

pub mod issue_exporter;

/// Reads one interface document into per-class connections.
pub trait NibParser: Send + Sync {
    fn mapping_for_file(&self, path: &Path) -> Result<ParsedNib, NibParseError>;
}

/// The source symbol extractor: class name to declared members.
pub trait ClassSource {
    fn classes(&self) -> anyhow::Result<ClassMap>;
}

pub trait Analyzer: Send + Sync {
    fn issues(&self, ctx: &AnalysisContext<'_>, configuration: &Configuration) -> Vec<ConnectionIssue>;
}

pub trait IssueExporter {
    fn export(
        &self,
        issues: &[ConnectionIssue],
        configuration: &Configuration,
        classes: &ClassMap,
        out: &mut dyn Write,
    ) -> std::io::Result<()>;
}

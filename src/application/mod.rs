use std::collections::HashMap;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::class::ClassMap;
use crate::domain::config::{Configuration, Severity};
use crate::domain::connection_analyzer::AnalysisContext;
use crate::domain::declaration::SegueIdentifier;
use crate::domain::framework::FrameworkClasses;
use crate::domain::issue::ConnectionIssue;
use crate::domain::nib::NibMap;
use crate::domain::segue::SegueDeclaration;
use crate::infrastructure::nib_parser::{NibParseError, ParsedNib};
use crate::ports::{Analyzer, NibParser};

/// A document that could not be read. Other documents are unaffected.
#[derive(Debug)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: NibParseError,
}

#[derive(Debug)]
pub struct RunReport {
    pub issues: Vec<ConnectionIssue>,
    pub failures: Vec<DocumentFailure>,
    pub documents: usize,
    pub nibs: NibMap,
    /// Symbol table after side-channel identifiers were merged in.
    pub classes: ClassMap,
    pub segues: Vec<SegueDeclaration>,
}

impl RunReport {
    pub fn has_errors(&self, configuration: &Configuration) -> bool {
        !self.failures.is_empty()
            || self
                .issues
                .iter()
                .any(|issue| issue.severity(configuration) == Severity::Error)
    }
}

/// Merges per-document mappings by class name, in the calling thread.
pub fn merge_documents<I>(documents: I) -> (NibMap, Vec<SegueDeclaration>)
where
    I: IntoIterator<Item = ParsedNib>,
{
    let mut nibs = NibMap::new();
    let mut segues: Vec<SegueDeclaration> = Vec::new();
    for document in documents {
        nibs.merge(document.nibs);
        for segue in document.segues {
            if !segues.iter().any(|s| s.same_site(&segue)) {
                segues.push(segue);
            }
        }
    }
    (nibs, segues)
}

pub struct AnalyzeUsecase<'a> {
    pub nib_parser: &'a dyn NibParser,
    pub analyzers: &'a [&'a dyn Analyzer],
    pub framework: &'a FrameworkClasses,
}

impl<'a> AnalyzeUsecase<'a> {
    pub fn run(
        &self,
        documents: &[PathBuf],
        mut classes: ClassMap,
        segue_identifiers: HashMap<String, Vec<SegueIdentifier>>,
        configuration: &Configuration,
    ) -> RunReport {
        let results: Vec<Result<ParsedNib, NibParseError>> = documents
            .par_iter()
            .map(|path| self.nib_parser.mapping_for_file(path))
            .collect();

        let mut parsed = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(document) => parsed.push(document),
                Err(error) => {
                    warn!(%error, "skipping interface document");
                    failures.push(DocumentFailure {
                        path: error.path().to_path_buf(),
                        error,
                    });
                }
            }
        }

        let (nibs, segues) = merge_documents(parsed);
        classes.merge_segue_identifiers(segue_identifiers);

        let ctx = AnalysisContext::new(&nibs, &classes, self.framework);
        let issues: Vec<ConnectionIssue> = self
            .analyzers
            .iter()
            .flat_map(|analyzer| analyzer.issues(&ctx, configuration))
            .filter(|issue| !issue.is_suppressed(configuration))
            .collect();

        info!(
            documents = documents.len(),
            failed = failures.len(),
            classes = classes.len(),
            framework_classes = self.framework.len(),
            issues = issues.len(),
            "analysis finished"
        );

        RunReport {
            issues,
            failures,
            documents: documents.len(),
            nibs,
            classes,
            segues,
        }
    }
}

//! Named connection points and source locations.
//!
//! A `Declaration` is either an outlet or an action, coming from an interface
//! document or from the class symbol table. Two declarations are equal when
//! their names are equal; where they were found is diagnostic data only.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An outlet or action, wherever it was declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub name: String,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub column: usize,
    /// File the declaration was read from, if any.
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub is_optional: bool,
    /// Custom class of the interface object that owns the connection.
    #[serde(default)]
    pub parent_class: Option<String>,
    /// Path of the owning class, back-filled when missing outlets are
    /// reported against the controller instead of the document.
    #[serde(skip)]
    pub parent_class_path: Option<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            name: name.into(),
            line,
            column,
            file: None,
            is_optional: false,
            parent_class: None,
            parent_class_path: None,
        }
    }

    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn optional(mut self, is_optional: bool) -> Self {
        self.is_optional = is_optional;
        self
    }

    pub fn owned_by(mut self, custom_class: impl Into<String>) -> Self {
        self.parent_class = Some(custom_class.into());
        self
    }

    /// `<path>:<line>:<column>` used as the prefix of a diagnostic line.
    pub fn location(&self) -> String {
        format!(
            "{}:{}:{}",
            self.parent_class_path.clone().unwrap_or_else(|| self.file_path()),
            self.line,
            self.column
        )
    }

    /// The declaring file, or the name stripped of selector colons when the
    /// declaration has no file.
    pub fn file_path(&self) -> String {
        match &self.file {
            Some(path) => path.display().to_string(),
            None => self.name.replace(':', ""),
        }
    }

    pub fn file_name(&self, class_name: &str) -> String {
        self.file
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| class_name.to_string())
    }

    /// Same name found at the same place. Used to keep merges idempotent.
    pub fn same_site(&self, other: &Declaration) -> bool {
        self.name == other.name
            && self.file == other.file
            && self.line == other.line
            && self.column == other.column
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Declaration {}

/// A location in a source file, as reported by the symbol extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    /// Byte offset from the beginning of the line.
    pub column: usize,
    /// Byte offset from the beginning of the file.
    pub offset: usize,
    pub file: String,
}

/// A segue identifier string referenced from source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegueIdentifier {
    pub source_location: SourceLocation,
    pub identifier: String,
}

impl SegueIdentifier {
    pub fn new(identifier: impl Into<String>, source_location: SourceLocation) -> Self {
        Self {
            source_location,
            identifier: identifier.into(),
        }
    }

    pub fn location(&self) -> String {
        format!(
            "{}:{}:{}",
            self.source_location.file, self.source_location.line, self.source_location.column
        )
    }
}

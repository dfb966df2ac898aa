//! Segue declarations read from storyboards.
//!
//! Attributes are mapped onto fields through a fixed table rather than by
//! name lookup at runtime; anything not in the table is ignored.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::class::ClassMap;

/// Fields of a segue that can be populated from XML attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegueField {
    Id,
    Kind,
    Destination,
    Identifier,
    Relationship,
    UnwindAction,
}

const SEGUE_ATTRIBUTES: &[(&str, SegueField)] = &[
    ("id", SegueField::Id),
    ("kind", SegueField::Kind),
    ("destination", SegueField::Destination),
    ("identifier", SegueField::Identifier),
    ("relationship", SegueField::Relationship),
    ("unwindAction", SegueField::UnwindAction),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegueAttributeError {
    #[error("segue is missing required attribute '{0}'")]
    Missing(&'static str),
    #[error("segue '{id}' has an empty unwindAction")]
    EmptyUnwindAction { id: String },
}

/// A `<segue>` element inside a `<connections>` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegueDeclaration {
    pub id: String,
    pub kind: String,
    /// Object id of the destination scene.
    pub destination: String,
    pub identifier: Option<String>,
    pub relationship: Option<String>,
    unwind_action: Option<String>,
    /// Custom class of the destination, filled in once the whole document
    /// has been read.
    pub destination_class_name: Option<String>,
    /// Custom class of the nearest enclosing object.
    pub parent_class_name: Option<String>,
    pub document: Option<PathBuf>,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Default)]
pub struct SegueBuilder {
    id: Option<String>,
    kind: Option<String>,
    destination: Option<String>,
    identifier: Option<String>,
    relationship: Option<String>,
    unwind_action: Option<String>,
}

impl SegueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field mapped to `name`. Returns false for attributes that
    /// have no field.
    pub fn attribute(&mut self, name: &str, value: &str) -> bool {
        let Some((_, field)) = SEGUE_ATTRIBUTES.iter().find(|(attr, _)| *attr == name) else {
            return false;
        };
        let slot = match field {
            SegueField::Id => &mut self.id,
            SegueField::Kind => &mut self.kind,
            SegueField::Destination => &mut self.destination,
            SegueField::Identifier => &mut self.identifier,
            SegueField::Relationship => &mut self.relationship,
            SegueField::UnwindAction => &mut self.unwind_action,
        };
        *slot = Some(value.to_string());
        true
    }

    pub fn attributes<'a, I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in attributes {
            self.attribute(name, value);
        }
        self
    }

    pub fn build(self) -> Result<SegueDeclaration, SegueAttributeError> {
        let id = self.id.ok_or(SegueAttributeError::Missing("id"))?;
        let kind = self.kind.ok_or(SegueAttributeError::Missing("kind"))?;
        let destination = self
            .destination
            .ok_or(SegueAttributeError::Missing("destination"))?;
        if matches!(self.unwind_action.as_deref(), Some("")) {
            return Err(SegueAttributeError::EmptyUnwindAction { id });
        }

        Ok(SegueDeclaration {
            id,
            kind,
            destination,
            identifier: self.identifier,
            relationship: self.relationship,
            unwind_action: self.unwind_action,
            destination_class_name: None,
            parent_class_name: None,
            document: None,
            line: 0,
            column: 0,
        })
    }
}

impl SegueDeclaration {
    pub fn builder() -> SegueBuilder {
        SegueBuilder::new()
    }

    pub fn is_unwind(&self) -> bool {
        self.unwind_action.is_some()
    }

    /// Never empty when present.
    pub fn unwind_action(&self) -> Option<&str> {
        self.unwind_action.as_deref()
    }

    /// Same segue read from the same document.
    pub fn same_site(&self, other: &SegueDeclaration) -> bool {
        self.id == other.id && self.document == other.document
    }

    /// File and line of the owning class, looked up on demand. The owner is
    /// referenced by name only.
    pub fn owner_anchor(&self, classes: &ClassMap) -> (String, usize) {
        let owner = self
            .parent_class_name
            .as_deref()
            .and_then(|name| classes.get(name).map(|class| (name, class)));

        match owner {
            Some((name, class)) => (
                class.path.clone().unwrap_or_else(|| name.to_string()),
                class.line.unwrap_or(1),
            ),
            None => (String::new(), 1),
        }
    }

    pub fn location(&self, classes: &ClassMap) -> String {
        let (file, line) = self.owner_anchor(classes);
        format!("{file}:{line}:0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::class::ClassRecord;

    fn unwind(action: &str) -> Result<SegueDeclaration, SegueAttributeError> {
        SegueDeclaration::builder()
            .attributes([
                ("id", "s1"),
                ("kind", "unwind"),
                ("destination", "exit"),
                ("unwindAction", action),
            ])
            .build()
    }

    #[test]
    fn test_builder_maps_known_attributes() {
        let segue = SegueDeclaration::builder()
            .attributes([
                ("id", "abc"),
                ("kind", "show"),
                ("destination", "xyz"),
                ("identifier", "showDetail"),
                ("customClass", "Ignored"),
            ])
            .build()
            .unwrap();

        assert_eq!(segue.id, "abc");
        assert_eq!(segue.kind, "show");
        assert_eq!(segue.destination, "xyz");
        assert_eq!(segue.identifier.as_deref(), Some("showDetail"));
        assert!(!segue.is_unwind());
    }

    #[test]
    fn test_builder_rejects_missing_required() {
        let err = SegueDeclaration::builder()
            .attributes([("id", "abc"), ("kind", "show")])
            .build()
            .unwrap_err();
        assert_eq!(err, SegueAttributeError::Missing("destination"));
    }

    #[test]
    fn test_unwind_action_must_not_be_empty() {
        assert!(unwind("unwindToRoot:").unwrap().is_unwind());
        assert!(matches!(
            unwind(""),
            Err(SegueAttributeError::EmptyUnwindAction { .. })
        ));
    }

    #[test]
    fn test_location_resolves_owner_on_demand() {
        let mut segue = unwind("back:").unwrap();
        let classes = ClassMap::new();
        assert_eq!(segue.location(&classes), ":1:0");

        segue.parent_class_name = Some("A".to_string());
        let mut classes = ClassMap::new();
        classes.insert("A", ClassRecord::default().at("A.swift", 10));
        assert_eq!(segue.location(&classes), "A.swift:10:0");
    }
}

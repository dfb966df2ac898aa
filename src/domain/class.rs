//! Class records supplied by the source symbol extractor.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::declaration::{Declaration, SegueIdentifier};

/// Outlets, actions and supertypes a class declares in source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub line: Option<usize>,
    #[serde(default)]
    pub outlets: Vec<Declaration>,
    #[serde(default)]
    pub actions: Vec<Declaration>,
    /// Directly inherited type names, superclass first.
    #[serde(default)]
    pub inherited: Vec<String>,
    #[serde(default)]
    pub segue_identifiers: Vec<SegueIdentifier>,
}

impl ClassRecord {
    pub fn new(outlets: Vec<Declaration>, actions: Vec<Declaration>, inherited: Vec<String>) -> Self {
        Self {
            outlets,
            actions,
            inherited,
            ..Self::default()
        }
    }

    pub fn at(mut self, path: impl Into<String>, line: usize) -> Self {
        self.path = Some(path.into());
        self.line = Some(line);
        self
    }

    pub fn with_segue_identifiers(mut self, identifiers: Vec<SegueIdentifier>) -> Self {
        self.segue_identifiers = identifiers;
        self
    }

    pub fn has_outlet(&self, outlet: &Declaration) -> bool {
        self.outlets.contains(outlet)
    }

    pub fn has_action(&self, action: &Declaration) -> bool {
        self.actions.contains(action)
    }

    pub fn has_action_named(&self, name: &str) -> bool {
        self.actions.iter().any(|action| action.name == name)
    }

    /// True when there is nothing in this class to cross-check.
    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty() && self.actions.is_empty() && self.segue_identifiers.is_empty()
    }
}

impl PartialEq for ClassRecord {
    fn eq(&self, other: &Self) -> bool {
        self.outlets == other.outlets
            && self.actions == other.actions
            && self.inherited == other.inherited
    }
}

/// Symbol table keyed by class name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassMap {
    classes: HashMap<String, ClassRecord>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, class: ClassRecord) -> Option<ClassRecord> {
        self.classes.insert(name.into(), class)
    }

    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ClassRecord)> {
        self.classes.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Adds identifiers found by a secondary source. Unknown classes get an
    /// otherwise empty record.
    pub fn merge_segue_identifiers(&mut self, identifiers: HashMap<String, Vec<SegueIdentifier>>) {
        for (class_name, ids) in identifiers {
            self.classes
                .entry(class_name)
                .or_default()
                .segue_identifiers
                .extend(ids);
        }
    }
}

impl<S: Into<String>> FromIterator<(S, ClassRecord)> for ClassMap {
    fn from_iter<T: IntoIterator<Item = (S, ClassRecord)>>(iter: T) -> Self {
        Self {
            classes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

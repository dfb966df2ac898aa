//! Connections declared by interface documents, grouped by custom class.

use std::collections::HashMap;

use crate::domain::declaration::Declaration;
use crate::domain::segue::SegueDeclaration;

/// Everything the interface documents connect to instances of one class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nib {
    pub outlets: Vec<Declaration>,
    pub actions: Vec<Declaration>,
    pub segues: Vec<SegueDeclaration>,
}

impl Nib {
    pub fn new(outlets: Vec<Declaration>, actions: Vec<Declaration>) -> Self {
        Self {
            outlets,
            actions,
            segues: Vec::new(),
        }
    }

    pub fn with_segues(mut self, segues: Vec<SegueDeclaration>) -> Self {
        self.segues = segues;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty() && self.actions.is_empty() && self.segues.is_empty()
    }

    pub fn has_outlet(&self, outlet: &Declaration) -> bool {
        self.outlets.contains(outlet)
    }

    /// Whether `action` is wired directly or is the target of an unwind segue.
    pub fn uses_action(&self, action: &Declaration) -> bool {
        self.actions.contains(action)
            || self
                .segues
                .iter()
                .any(|segue| segue.unwind_action() == Some(action.name.as_str()))
    }

    pub fn has_segue_identifier(&self, identifier: &str) -> bool {
        self.segues
            .iter()
            .any(|segue| segue.identifier.as_deref() == Some(identifier))
    }

    /// Appends entries of `other`, skipping ones already read from the same
    /// place.
    pub fn merge(&mut self, other: Nib) {
        for outlet in other.outlets {
            if !self.outlets.iter().any(|o| o.same_site(&outlet)) {
                self.outlets.push(outlet);
            }
        }
        for action in other.actions {
            if !self.actions.iter().any(|a| a.same_site(&action)) {
                self.actions.push(action);
            }
        }
        for segue in other.segues {
            if !self.segues.iter().any(|s| s.same_site(&segue)) {
                self.segues.push(segue);
            }
        }
    }
}

/// Class name to declared connections, for one document or many merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NibMap {
    nibs: HashMap<String, Nib>,
}

impl NibMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class_name: impl Into<String>, nib: Nib) -> Option<Nib> {
        self.nibs.insert(class_name.into(), nib)
    }

    /// Entry for `class_name`, created empty if absent.
    pub fn entry(&mut self, class_name: &str) -> &mut Nib {
        self.nibs.entry(class_name.to_string()).or_default()
    }

    pub fn get(&self, class_name: &str) -> Option<&Nib> {
        self.nibs.get(class_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Nib)> {
        self.nibs.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Nib> {
        self.nibs.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Nib> {
        self.nibs.values_mut()
    }

    pub fn len(&self) -> usize {
        self.nibs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nibs.is_empty()
    }

    pub fn merge(&mut self, other: NibMap) {
        for (class_name, nib) in other.nibs {
            self.nibs.entry(class_name).or_default().merge(nib);
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Nib)> for NibMap {
    fn from_iter<T: IntoIterator<Item = (S, Nib)>>(iter: T) -> Self {
        Self {
            nibs: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outlet(name: &str, line: usize) -> Declaration {
        Declaration::new(name, line, 4).in_file("Main.storyboard")
    }

    #[test]
    fn test_merge_appends_across_documents() {
        let mut merged = NibMap::new();
        merged.insert("A", Nib::new(vec![outlet("label", 10)], vec![]));

        let mut other = NibMap::new();
        other.insert("A", Nib::new(vec![outlet("button", 20)], vec![]));
        other.insert("B", Nib::new(vec![outlet("title", 30)], vec![]));
        merged.merge(other);

        assert_eq!(merged.len(), 2);
        let names: Vec<&str> = merged.get("A").unwrap().outlets.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["label", "button"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let document: NibMap = [("A", Nib::new(vec![outlet("label", 10)], vec![outlet("tap:", 12)]))]
            .into_iter()
            .collect();

        let mut merged = NibMap::new();
        merged.merge(document.clone());
        merged.merge(document.clone());

        assert_eq!(merged, document);
    }

    #[test]
    fn test_duplicate_declarations_at_different_sites_are_kept() {
        let mut merged: NibMap = [("A", Nib::new(vec![outlet("label", 10)], vec![]))].into_iter().collect();
        merged.merge([("A", Nib::new(vec![outlet("label", 11)], vec![]))].into_iter().collect());
        assert_eq!(merged.get("A").unwrap().outlets.len(), 2);
    }

    #[test]
    fn test_uses_action_through_unwind_segue() {
        let segue = SegueDeclaration::builder()
            .attributes([
                ("id", "u1"),
                ("kind", "unwind"),
                ("destination", "exit"),
                ("unwindAction", "unwindToRoot:"),
            ])
            .build()
            .unwrap();
        let nib = Nib::default().with_segues(vec![segue]);

        assert!(nib.uses_action(&Declaration::new("unwindToRoot:", 1, 0)));
        assert!(!nib.uses_action(&Declaration::new("other:", 1, 0)));
    }
}

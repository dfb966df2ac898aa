//! Interface document parser.
//!
//! Storyboards and xibs are read with roxmltree and replayed as a flat
//! sequence of open/close events into `NibScanner`, which keeps only
//! document-local state:
//! - `<objects>` bounds the object graph; every element inside it is a scope
//!   whose `customClass` may own connections
//! - `<connections>` holds `outlet`, `outletCollection`, `action` and `segue`
//!   elements belonging to the enclosing object
//!
//! Connections whose owner cannot be resolved are dropped with a debug log.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Edge};
use thiserror::Error;
use tracing::debug;

use crate::domain::declaration::Declaration;
use crate::domain::nib::NibMap;
use crate::domain::segue::SegueDeclaration;
use crate::ports::NibParser;

const PLACEHOLDER_TAG: &str = "viewControllerPlaceholder";

#[derive(Debug, Error)]
pub enum NibParseError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}

impl NibParseError {
    pub fn path(&self) -> &Path {
        match self {
            NibParseError::Io { path, .. } | NibParseError::Xml { path, .. } => path,
        }
    }
}

/// Connections read from one document.
#[derive(Debug, Clone, Default)]
pub struct ParsedNib {
    pub path: PathBuf,
    pub nibs: NibMap,
    /// Every segue in the document, in document order.
    pub segues: Vec<SegueDeclaration>,
}

/// One structural event of a document.
#[derive(Debug, Clone)]
pub enum NibEvent<'a> {
    Open {
        tag: &'a str,
        attributes: Vec<(&'a str, &'a str)>,
        line: usize,
        column: usize,
    },
    Close {
        tag: &'a str,
    },
    End,
}

#[derive(Debug)]
struct Scope {
    tag: String,
    custom_class: Option<String>,
}

/// Event-driven state for a single document.
#[derive(Debug, Default)]
pub struct NibScanner {
    document: Option<PathBuf>,
    in_objects: bool,
    in_connections: bool,
    stack: Vec<Scope>,
    nibs: NibMap,
    id_to_custom_class: HashMap<String, String>,
    segues: Vec<SegueDeclaration>,
}

fn attribute<'a>(attributes: &[(&'a str, &'a str)], name: &str) -> Option<&'a str> {
    attributes.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
}

impl NibScanner {
    pub fn new(document: Option<PathBuf>) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn handle(&mut self, event: NibEvent<'_>) {
        match event {
            NibEvent::Open { tag, attributes, line, column } => self.open(tag, &attributes, line, column),
            NibEvent::Close { tag } => self.close(tag),
            NibEvent::End => self.resolve_destinations(),
        }
    }

    pub fn finish(mut self) -> ParsedNib {
        self.resolve_destinations();
        ParsedNib {
            path: self.document.unwrap_or_default(),
            nibs: self.nibs,
            segues: self.segues,
        }
    }

    fn is_connection(&self, tag: &str) -> bool {
        self.in_connections && matches!(tag, "outlet" | "outletCollection" | "action" | "segue")
    }

    fn is_scope(&self, tag: &str) -> bool {
        self.in_objects && tag != PLACEHOLDER_TAG
    }

    fn open(&mut self, tag: &str, attributes: &[(&str, &str)], line: usize, column: usize) {
        match tag {
            "objects" => {
                self.in_objects = true;
                self.stack.clear();
            }
            "connections" => self.in_connections = true,
            "outlet" | "outletCollection" if self.in_connections => self.outlet(attributes, line, column),
            "action" if self.in_connections => self.action(attributes, line, column),
            "segue" if self.in_connections => self.segue(attributes, line, column),
            _ if self.is_scope(tag) => {
                let custom_class = attribute(attributes, "customClass").map(str::to_string);
                if let (Some(class_name), Some(id)) = (&custom_class, attribute(attributes, "id")) {
                    self.id_to_custom_class.insert(id.to_string(), class_name.clone());
                    self.nibs.entry(class_name);
                }
                self.stack.push(Scope {
                    tag: tag.to_string(),
                    custom_class,
                });
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: &str) {
        match tag {
            "objects" => {
                self.in_objects = false;
                if !self.stack.is_empty() {
                    let open: Vec<&str> = self.stack.iter().map(|scope| scope.tag.as_str()).collect();
                    debug!(?open, "scopes left open at end of <objects>");
                    self.stack.clear();
                }
            }
            "connections" => self.in_connections = false,
            _ if self.is_connection(tag) => {}
            _ if self.is_scope(tag) => {
                self.stack.pop();
            }
            _ => {}
        }
    }

    fn declaration(&self, name: &str, line: usize, column: usize) -> Declaration {
        let declaration = Declaration::new(name, line, column);
        match &self.document {
            Some(path) => declaration.in_file(path.clone()),
            None => declaration,
        }
    }

    fn outlet(&mut self, attributes: &[(&str, &str)], line: usize, column: usize) {
        let Some(property) = attribute(attributes, "property") else {
            debug!(line, "outlet without a property attribute");
            return;
        };
        let Some(owner) = self.stack.last().and_then(|scope| scope.custom_class.clone()) else {
            debug!(line, property, "dropping outlet: enclosing object has no custom class");
            return;
        };

        let outlet = self.declaration(property, line, column).owned_by(owner.clone());
        self.nibs.entry(&owner).outlets.push(outlet);
    }

    fn action(&mut self, attributes: &[(&str, &str)], line: usize, column: usize) {
        let (Some(selector), Some(destination)) = (attribute(attributes, "selector"), attribute(attributes, "destination"))
        else {
            debug!(line, "action without selector or destination");
            return;
        };
        // Actions target the destination object, not the enclosing scope.
        let Some(owner) = self.id_to_custom_class.get(destination).cloned() else {
            debug!(line, selector, destination, "dropping action: destination has no custom class");
            return;
        };

        let action = self.declaration(selector, line, column);
        self.nibs.entry(&owner).actions.push(action);
    }

    fn segue(&mut self, attributes: &[(&str, &str)], line: usize, column: usize) {
        let owner = self
            .stack
            .iter()
            .rev()
            .find_map(|scope| scope.custom_class.clone());
        let Some(owner) = owner else {
            debug!(line, ?attributes, "dropping segue: no enclosing object has a custom class");
            return;
        };

        let mut segue = match SegueDeclaration::builder().attributes(attributes.iter().copied()).build() {
            Ok(segue) => segue,
            Err(err) => {
                debug!(line, %err, "dropping malformed segue");
                return;
            }
        };
        segue.parent_class_name = Some(owner.clone());
        segue.destination_class_name = self.id_to_custom_class.get(&segue.destination).cloned();
        segue.document = self.document.clone();
        segue.line = line;
        segue.column = column;

        self.nibs.entry(&owner).segues.push(segue.clone());
        self.segues.push(segue);
    }

    /// Destinations declared after their segue are only known at the end.
    fn resolve_destinations(&mut self) {
        let ids = &self.id_to_custom_class;
        let resolve = |segue: &mut SegueDeclaration| {
            if segue.destination_class_name.is_none() {
                segue.destination_class_name = ids.get(&segue.destination).cloned();
            }
        };

        self.segues.iter_mut().for_each(resolve);
        for nib in self.nibs.values_mut() {
            nib.segues.iter_mut().for_each(resolve);
        }
    }
}

/// roxmltree-backed parser for `.storyboard` and `.xib` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlNibParser;

impl XmlNibParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses an in-memory document. `path` is recorded on every declaration.
    pub fn parse_str(&self, contents: &str, path: &Path) -> Result<ParsedNib, NibParseError> {
        let doc = Document::parse(contents).map_err(|source| NibParseError::Xml {
            path: path.to_path_buf(),
            source,
        })?;

        let mut scanner = NibScanner::new(Some(path.to_path_buf()));
        for edge in doc.root().traverse() {
            match edge {
                Edge::Open(node) if node.is_element() => {
                    let position = doc.text_pos_at(node.range().start);
                    scanner.handle(NibEvent::Open {
                        tag: node.tag_name().name(),
                        attributes: node.attributes().map(|attr| (attr.name(), attr.value())).collect(),
                        line: position.row as usize,
                        column: position.col as usize,
                    });
                }
                Edge::Close(node) if node.is_element() => {
                    scanner.handle(NibEvent::Close {
                        tag: node.tag_name().name(),
                    });
                }
                _ => {}
            }
        }
        scanner.handle(NibEvent::End);

        let parsed = scanner.finish();
        debug!(
            path = %path.display(),
            classes = parsed.nibs.len(),
            segues = parsed.segues.len(),
            "parsed interface document"
        );
        Ok(parsed)
    }
}

impl NibParser for XmlNibParser {
    fn mapping_for_file(&self, path: &Path) -> Result<ParsedNib, NibParseError> {
        let contents = std::fs::read_to_string(path).map_err(|source| NibParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&contents, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open<'a>(tag: &'a str, attributes: &[(&'a str, &'a str)]) -> NibEvent<'a> {
        NibEvent::Open {
            tag,
            attributes: attributes.to_vec(),
            line: 1,
            column: 1,
        }
    }

    fn close(tag: &str) -> NibEvent<'_> {
        NibEvent::Close { tag }
    }

    #[test]
    fn test_outlet_belongs_to_enclosing_custom_class() {
        let mut scanner = NibScanner::new(None);
        for event in [
            open("objects", &[]),
            open("viewController", &[("id", "vc"), ("customClass", "LoginViewController")]),
            open("connections", &[]),
            open("outlet", &[("property", "emailField"), ("destination", "tf")]),
            close("outlet"),
            close("connections"),
            close("viewController"),
            close("objects"),
            NibEvent::End,
        ] {
            scanner.handle(event);
        }

        let parsed = scanner.finish();
        let nib = parsed.nibs.get("LoginViewController").unwrap();
        assert_eq!(nib.outlets.len(), 1);
        assert_eq!(nib.outlets[0].name, "emailField");
        assert_eq!(nib.outlets[0].parent_class.as_deref(), Some("LoginViewController"));
    }

    #[test]
    fn test_outlet_without_owner_is_dropped() {
        let mut scanner = NibScanner::new(None);
        for event in [
            open("objects", &[]),
            open("view", &[("id", "v1")]),
            open("connections", &[]),
            open("outlet", &[("property", "dataSource"), ("destination", "x")]),
            close("outlet"),
            close("connections"),
            close("view"),
            close("objects"),
        ] {
            scanner.handle(event);
        }
        assert!(scanner.finish().nibs.is_empty());
    }

    #[test]
    fn test_outlet_outside_connections_is_a_scope() {
        let mut scanner = NibScanner::new(None);
        for event in [
            open("objects", &[]),
            open("viewController", &[("id", "vc"), ("customClass", "A")]),
            open("outlet", &[("property", "stray")]),
            close("outlet"),
            open("connections", &[]),
            open("outlet", &[("property", "label")]),
            close("outlet"),
            close("connections"),
            close("viewController"),
            close("objects"),
        ] {
            scanner.handle(event);
        }
        let parsed = scanner.finish();
        let names: Vec<&str> = parsed.nibs.get("A").unwrap().outlets.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["label"]);
    }

    #[test]
    fn test_segue_destination_resolved_at_end() {
        let mut scanner = NibScanner::new(None);
        for event in [
            open("objects", &[]),
            open("viewController", &[("id", "first"), ("customClass", "FirstViewController")]),
            open("connections", &[]),
            open("segue", &[("id", "s1"), ("kind", "show"), ("destination", "second"), ("identifier", "next")]),
            close("segue"),
            close("connections"),
            close("viewController"),
            close("objects"),
            open("objects", &[]),
            open("viewController", &[("id", "second"), ("customClass", "SecondViewController")]),
            close("viewController"),
            close("objects"),
            NibEvent::End,
        ] {
            scanner.handle(event);
        }

        let parsed = scanner.finish();
        assert_eq!(parsed.segues.len(), 1);
        assert_eq!(parsed.segues[0].destination_class_name.as_deref(), Some("SecondViewController"));
        let owned = &parsed.nibs.get("FirstViewController").unwrap().segues[0];
        assert_eq!(owned.destination_class_name.as_deref(), Some("SecondViewController"));
        assert!(parsed.nibs.get("SecondViewController").unwrap().is_empty());
    }
}

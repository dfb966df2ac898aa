//! Built-in framework classes.
//!
//! Project classes commonly inherit outlets such as `delegate` or
//! `dataSource` from UIKit. These records are consulted when an inherited
//! type is not a project class; they are leaves and their own supertypes are
//! never explored.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::domain::class::ClassRecord;
use crate::domain::declaration::Declaration;

const RESPONDER_ACTIONS: &[&str] = &[
    "cut:",
    "copy:",
    "paste:",
    "delete:",
    "select:",
    "selectAll:",
    "toggleBoldface:",
    "toggleItalics:",
    "toggleUnderline:",
    "makeTextWritingDirectionLeftToRight:",
    "makeTextWritingDirectionRightToLeft:",
];

/// (class, outlets, actions)
const BUILTIN_CLASSES: &[(&str, &[&str], &[&str])] = &[
    ("UIResponder", &[], RESPONDER_ACTIONS),
    ("UIView", &["gestureRecognizers"], RESPONDER_ACTIONS),
    ("UIViewController", &["view", "searchDisplayController"], RESPONDER_ACTIONS),
    ("UINavigationController", &["view", "navigationBar", "toolbar"], &[]),
    ("UITabBarController", &["view", "tabBar", "delegate"], &[]),
    ("UISplitViewController", &["view", "delegate"], &[]),
    ("UIPageViewController", &["view", "dataSource", "delegate"], &[]),
    ("UITableViewController", &["view", "tableView", "refreshControl"], RESPONDER_ACTIONS),
    ("UICollectionViewController", &["view", "collectionView"], RESPONDER_ACTIONS),
    ("UIScrollView", &["delegate"], &[]),
    ("UITableView", &["dataSource", "delegate", "prefetchDataSource", "dragDelegate", "dropDelegate"], &[]),
    ("UICollectionView", &["dataSource", "delegate", "prefetchDataSource", "dragDelegate", "dropDelegate"], &[]),
    ("UITableViewCell", &["accessoryView", "backgroundView", "selectedBackgroundView"], &[]),
    ("UICollectionViewCell", &["backgroundView", "selectedBackgroundView"], &[]),
    ("UITextField", &["delegate", "inputView", "inputAccessoryView", "leftView", "rightView"], RESPONDER_ACTIONS),
    ("UITextView", &["delegate", "inputView", "inputAccessoryView"], RESPONDER_ACTIONS),
    ("UISearchBar", &["delegate", "inputAccessoryView"], &[]),
    ("UIPickerView", &["dataSource", "delegate"], &[]),
    ("UITabBar", &["delegate"], &[]),
    ("UINavigationBar", &["delegate"], &[]),
    ("UIToolbar", &["delegate"], &[]),
    ("UIGestureRecognizer", &["delegate"], &[]),
    ("UIWebView", &["delegate"], &["goBack", "goForward", "reload", "stopLoading"]),
    ("WKWebView", &["navigationDelegate", "UIDelegate"], &["goBack:", "goForward:", "reload:", "stopLoading:"]),
    ("MKMapView", &["delegate"], &[]),
    ("SCNView", &["delegate", "scene"], &[]),
    ("NSWindow", &["delegate", "contentView", "initialFirstResponder"], &["performClose:", "performMiniaturize:", "performZoom:"]),
    ("NSTableView", &["dataSource", "delegate"], &[]),
    ("NSOutlineView", &["dataSource", "delegate"], &[]),
    ("NSTextField", &["delegate", "nextKeyView"], &["takeStringValueFrom:"]),
    ("NSViewController", &["view"], &[]),
    ("NSWindowController", &["window"], &["showWindow:"]),
];

/// Read-only table of framework classes and the members they expose.
#[derive(Debug, Clone, Default)]
pub struct FrameworkClasses {
    classes: HashMap<String, ClassRecord>,
}

impl FrameworkClasses {
    /// The built-in table, built on first use.
    pub fn builtin() -> &'static FrameworkClasses {
        static BUILTIN: OnceLock<FrameworkClasses> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            BUILTIN_CLASSES
                .iter()
                .map(|(name, outlets, actions)| {
                    let record = ClassRecord::new(declarations(outlets), declarations(actions), Vec::new());
                    (name.to_string(), record)
                })
                .collect()
        })
    }

    pub fn from_records(classes: HashMap<String, ClassRecord>) -> Self {
        Self { classes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<(String, ClassRecord)> for FrameworkClasses {
    fn from_iter<T: IntoIterator<Item = (String, ClassRecord)>>(iter: T) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

fn declarations(names: &[&str]) -> Vec<Declaration> {
    names.iter().map(|name| Declaration::new(*name, 0, 0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_shared() {
        let a = FrameworkClasses::builtin() as *const FrameworkClasses;
        let b = FrameworkClasses::builtin() as *const FrameworkClasses;
        assert_eq!(a, b);
    }

    #[test]
    fn test_builtin_contains_common_outlets() {
        let table = FrameworkClasses::builtin();
        let text_field = table.get("UITextField").unwrap();
        assert!(text_field.has_outlet(&Declaration::new("delegate", 1, 0)));
        assert!(text_field.has_action_named("paste:"));

        let table_view = table.get("UITableView").unwrap();
        assert!(table_view.has_outlet(&Declaration::new("dataSource", 1, 0)));
        assert!(table_view.inherited.is_empty());
        assert_eq!(table.len(), BUILTIN_CLASSES.len());
    }

    #[test]
    fn test_unknown_class() {
        assert!(FrameworkClasses::builtin().get("LoginViewController").is_none());
        assert!(FrameworkClasses::empty().is_empty());
    }
}

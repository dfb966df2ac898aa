//! Connection Analyzer
//!
//! Reconciles the connections declared in interface documents with the
//! outlets, actions and segue identifiers classes declare in source.
//! Three independent passes:
//! - missing: document connections with no matching member in the class or
//!   any of its ancestors
//! - unwind: unwind segues whose action exists on no class at all
//! - unnecessary: class members no document uses

use std::collections::{HashSet, VecDeque};

use crate::domain::class::{ClassMap, ClassRecord};
use crate::domain::config::{Configuration, Rule};
use crate::domain::framework::FrameworkClasses;
use crate::domain::issue::ConnectionIssue;
use crate::domain::nib::NibMap;
use crate::ports::Analyzer;

/// Inputs shared by every analyzer. Nothing here is mutated by analysis.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub nibs: &'a NibMap,
    pub classes: &'a ClassMap,
    pub framework: &'a FrameworkClasses,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(nibs: &'a NibMap, classes: &'a ClassMap, framework: &'a FrameworkClasses) -> Self {
        Self { nibs, classes, framework }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConnectionAnalyzer;

impl ConnectionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn missing_elements(&self, ctx: &AnalysisContext<'_>, configuration: &Configuration) -> Vec<ConnectionIssue> {
        let mut result = Vec::new();

        for (class_name, nib) in ctx.nibs.iter() {
            if nib.is_empty() {
                continue;
            }

            for outlet in &nib.outlets {
                if class_or_inherited_type_of(class_name, ctx, |class| class.has_outlet(outlet)) {
                    continue;
                }

                let mut outlet = outlet.clone();
                if configuration.is_enabled(Rule::ReportMissingToController) {
                    if let Some(class) = ctx.classes.get(class_name) {
                        outlet.parent_class_path = class.path.clone();
                        if let Some(line) = class.line {
                            outlet.line = line;
                        }
                    }
                }

                result.push(ConnectionIssue::MissingOutlet {
                    class_name: class_name.clone(),
                    outlet,
                });
            }

            for action in &nib.actions {
                if !class_or_inherited_type_of(class_name, ctx, |class| class.has_action(action)) {
                    result.push(ConnectionIssue::MissingAction {
                        class_name: class_name.clone(),
                        action: action.clone(),
                    });
                }
            }
        }

        result
    }

    fn broken_unwind_segues(&self, ctx: &AnalysisContext<'_>) -> Vec<ConnectionIssue> {
        let mut result = Vec::new();

        for (class_name, nib) in ctx.nibs.iter() {
            for segue in &nib.segues {
                let Some(unwind_action) = segue.unwind_action() else {
                    continue;
                };

                // Unwind targets may live on any class, not just the owner.
                if !ctx.classes.values().any(|class| class.has_action_named(unwind_action)) {
                    result.push(ConnectionIssue::BrokenUnwindSegue {
                        class_name: class_name.clone(),
                        segue: segue.clone(),
                    });
                }
            }
        }

        result
    }

    fn unnecessary_elements(&self, ctx: &AnalysisContext<'_>) -> Vec<ConnectionIssue> {
        let mut result = Vec::new();

        for (class_name, class) in ctx.classes.iter() {
            if class.is_empty() {
                continue;
            }

            // Members of a superclass without its own document land here.
            let Some(nib) = ctx.nibs.get(class_name) else {
                continue;
            };

            for outlet in &class.outlets {
                if !nib.has_outlet(outlet) {
                    result.push(ConnectionIssue::UnnecessaryOutlet {
                        class_name: class_name.clone(),
                        outlet: outlet.clone(),
                    });
                }
            }

            for action in &class.actions {
                if !ctx.nibs.values().any(|nib| nib.uses_action(action)) {
                    result.push(ConnectionIssue::UnnecessaryAction {
                        class_name: class_name.clone(),
                        action: action.clone(),
                    });
                }
            }

            for segue_identifier in &class.segue_identifiers {
                if !nib.has_segue_identifier(&segue_identifier.identifier) {
                    result.push(ConnectionIssue::UnknownSegueIdentifier {
                        class_name: class_name.clone(),
                        segue_identifier: segue_identifier.clone(),
                    });
                }
            }
        }

        result
    }
}

impl Analyzer for ConnectionAnalyzer {
    fn issues(&self, ctx: &AnalysisContext<'_>, configuration: &Configuration) -> Vec<ConnectionIssue> {
        let (mut result, (unwind, unnecessary)) = rayon::join(
            || self.missing_elements(ctx, configuration),
            || rayon::join(|| self.broken_unwind_segues(ctx), || self.unnecessary_elements(ctx)),
        );
        result.extend(unwind);
        result.extend(unnecessary);
        result
    }
}

/// Whether `class_name` or one of its ancestors satisfies `matches`.
///
/// Ancestors are visited breadth first, in declaration order, so a class's
/// superclass is tried before the protocols listed after it. Framework
/// classes are tested but not expanded. Names that are neither project nor
/// framework classes are skipped. Each project class is expanded at most
/// once, which keeps cyclic declarations finite.
pub fn class_or_inherited_type_of<F>(class_name: &str, ctx: &AnalysisContext<'_>, matches: F) -> bool
where
    F: Fn(&ClassRecord) -> bool,
{
    let Some(class) = ctx.classes.get(class_name) else {
        return false;
    };
    if matches(class) {
        return true;
    }

    let mut expanded: HashSet<&str> = HashSet::from([class_name]);
    let mut queue: VecDeque<&str> = class.inherited.iter().map(String::as_str).collect();

    while let Some(type_name) = queue.pop_front() {
        if let Some(framework_class) = ctx.framework.get(type_name) {
            if matches(framework_class) {
                return true;
            }
        } else if let Some(class) = ctx.classes.get(type_name) {
            if !expanded.insert(type_name) {
                continue;
            }
            if matches(class) {
                return true;
            }
            queue.extend(class.inherited.iter().map(String::as_str));
        }
    }

    false
}

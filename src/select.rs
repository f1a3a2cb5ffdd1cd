//! Node selection over a parsed forest.

use crate::node::{NodeId, SyntaxNode};
use std::collections::HashSet;

/// Conversion into a list of names accepted by the selection methods.
///
/// Implemented for single strings as well as arrays, slices and vectors of
/// them, so both `named("a")` and `named(["a", "b"])` work.
pub trait IntoNames {
    /// Collect the names
    fn into_names(self) -> Vec<String>;
}

impl IntoNames for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoNames for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoNames for &String {
    fn into_names(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<const N: usize> IntoNames for [&str; N] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoNames for &[&str] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoNames for Vec<&str> {
    fn into_names(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoNames for Vec<String> {
    fn into_names(self) -> Vec<String> {
        self
    }
}

/// Accumulated selection predicates.
///
/// Predicates are evaluated in a fixed order no matter how they were added:
/// parents by name, parents at a level, names at a level, names, and finally
/// name fragments. Each stage narrows the set produced by the one before.
/// Levels are absolute depths in the forest, with roots at level 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    parents: Vec<String>,
    parents_at_level: Vec<(String, usize)>,
    names_at_level: Vec<(String, usize)>,
    names: Vec<String>,
    fragments: Vec<String>,
}

/// A node in the working set together with its absolute depth.
#[derive(Clone, Copy)]
struct Entry<'a> {
    node: &'a SyntaxNode,
    depth: usize,
}

impl Selector {
    /// Create a selector with no predicates, which selects every node
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to nodes with any of the given names
    pub fn named(mut self, names: impl IntoNames) -> Self {
        self.names.extend(names.into_names());
        self
    }

    /// Restrict to nodes whose name contains any of the given fragments
    pub fn name_contains(mut self, fragments: impl IntoNames) -> Self {
        self.fragments.extend(fragments.into_names());
        self
    }

    /// Restrict to nodes called `name` at the given level
    pub fn named_at_level(mut self, name: impl Into<String>, level: usize) -> Self {
        self.names_at_level.push((name.into(), level));
        self
    }

    /// Restrict to children of nodes with any of the given names
    pub fn with_parents(mut self, names: impl IntoNames) -> Self {
        self.parents.extend(names.into_names());
        self
    }

    /// Restrict to children of nodes called `name` at the given level
    pub fn with_parent_at_level(mut self, name: impl Into<String>, level: usize) -> Self {
        self.parents_at_level.push((name.into(), level));
        self
    }

    /// Whether no predicate has been added
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
            && self.parents_at_level.is_empty()
            && self.names_at_level.is_empty()
            && self.names.is_empty()
            && self.fragments.is_empty()
    }

    /// Evaluate the selector against a forest.
    ///
    /// The result is in document order and holds each node at most once.
    pub fn select<'a>(&self, forest: &'a [SyntaxNode]) -> Vec<&'a SyntaxNode> {
        let mut working: Vec<Entry<'a>> = forest
            .iter()
            .map(|node| Entry { node, depth: 0 })
            .collect();
        let mut narrowed_by_name = false;

        if !self.parents.is_empty() {
            working = children_of(&working, |entry| {
                self.parents.iter().any(|name| entry.node.name() == name)
            }, None);
        }

        if !self.parents_at_level.is_empty() {
            let limit = self.parents_at_level.iter().map(|(_, level)| *level).max();
            working = children_of(&working, |entry| {
                self.parents_at_level
                    .iter()
                    .any(|(name, level)| entry.depth == *level && entry.node.name() == name)
            }, limit);
        }

        if !self.names_at_level.is_empty() {
            let limit = self.names_at_level.iter().map(|(_, level)| *level).max();
            working = matching(&working, |entry| {
                self.names_at_level
                    .iter()
                    .any(|(name, level)| entry.depth == *level && entry.node.matches_name(name))
            }, limit);
            narrowed_by_name = true;
        }

        if !self.names.is_empty() {
            working = matching(&working, |entry| {
                self.names.iter().any(|name| entry.node.matches_name(name))
            }, None);
            narrowed_by_name = true;
        }

        if !self.fragments.is_empty() {
            working = matching(&working, |entry| {
                self.fragments
                    .iter()
                    .any(|fragment| entry.node.name().contains(fragment.as_str()))
            }, None);
            narrowed_by_name = true;
        }

        let selected: Vec<&SyntaxNode> = if narrowed_by_name
            || !self.parents.is_empty()
            || !self.parents_at_level.is_empty()
        {
            working.iter().map(|entry| entry.node).collect()
        } else {
            working
                .iter()
                .flat_map(|entry| entry.node.descendants())
                .collect()
        };

        tracing::debug!(selected = selected.len(), "evaluated selector");
        selected
    }

    /// Evaluate the selector and return the ids of the selected nodes
    pub fn select_ids(&self, forest: &[SyntaxNode]) -> Vec<NodeId> {
        self.select(forest).iter().map(|node| node.id()).collect()
    }
}

/// Walk the subtrees of `working` in document order, visiting nodes no
/// deeper than `limit`.
fn walk<'a>(working: &[Entry<'a>], limit: Option<usize>, visit: &mut dyn FnMut(Entry<'a>)) {
    fn go<'a>(entry: Entry<'a>, limit: Option<usize>, visit: &mut dyn FnMut(Entry<'a>)) {
        if limit.map_or(false, |limit| entry.depth > limit) {
            return;
        }
        visit(entry);
        for child in entry.node.children() {
            go(
                Entry {
                    node: child,
                    depth: entry.depth + 1,
                },
                limit,
                visit,
            );
        }
    }
    for entry in working {
        go(*entry, limit, visit);
    }
}

/// Nodes within the working subtrees satisfying `predicate`.
fn matching<'a>(
    working: &[Entry<'a>],
    predicate: impl Fn(&Entry<'a>) -> bool,
    limit: Option<usize>,
) -> Vec<Entry<'a>> {
    let mut found = Vec::new();
    walk(working, limit, &mut |entry| {
        if predicate(&entry) {
            found.push(entry);
        }
    });
    dedup(found)
}

/// Children of the nodes within the working subtrees satisfying `predicate`.
fn children_of<'a>(
    working: &[Entry<'a>],
    predicate: impl Fn(&Entry<'a>) -> bool,
    limit: Option<usize>,
) -> Vec<Entry<'a>> {
    let mut found = Vec::new();
    walk(working, limit, &mut |entry| {
        if predicate(&entry) {
            found.extend(entry.node.children().iter().map(|node| Entry {
                node,
                depth: entry.depth + 1,
            }));
        }
    });
    dedup(found)
}

/// Sort into document order and drop repeated nodes.
fn dedup(mut entries: Vec<Entry<'_>>) -> Vec<Entry<'_>> {
    let mut seen = HashSet::new();
    entries.retain(|entry| seen.insert(entry.node.id()));
    entries.sort_by_key(|entry| entry.node.id());
    entries
}

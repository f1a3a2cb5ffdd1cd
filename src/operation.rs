//! Fluent select, mutate and render pipeline.

use crate::edit::{join, EditScript, RenderedLine};
use crate::error::{SurgeonError, SurgeonResult};
use crate::mutation::Mutation;
use crate::node::SyntaxNode;
use crate::scan::ScanConfig;
use crate::select::{IntoNames, Selector};
use crate::yaml::Document;

/// One stage of an editing pipeline: a document, a selection over it and at
/// most one mutation.
///
/// ```
/// use yaml_surgeon::YamlOperation;
///
/// let output = YamlOperation::new("- bacon: [egg, spam]")
///     .unwrap()
///     .named("egg")
///     .delete()
///     .unwrap()
///     .render();
/// assert_eq!(output, "- bacon: [spam]");
/// ```
#[derive(Debug, Clone)]
pub struct YamlOperation {
    document: Document,
    selector: Selector,
    mutation: Option<Mutation>,
}

impl YamlOperation {
    /// Parse `text` and start a stage with no selection or mutation
    pub fn new(text: &str) -> SurgeonResult<Self> {
        Ok(Self::from_document(Document::parse(text)?))
    }

    /// Parse `text` with a custom [`ScanConfig`]
    pub fn with_config(text: &str, config: ScanConfig) -> SurgeonResult<Self> {
        Ok(Self::from_document(Document::parse_with_config(text, config)?))
    }

    /// Start a stage on an already parsed document
    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            selector: Selector::new(),
            mutation: None,
        }
    }

    /// The document this stage operates on
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The selection accumulated so far
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The mutation configured for this stage, if any
    pub fn mutation(&self) -> Option<&Mutation> {
        self.mutation.as_ref()
    }

    /// Select nodes with any of the given names
    pub fn named(mut self, names: impl IntoNames) -> Self {
        self.selector = self.selector.named(names);
        self
    }

    /// Select nodes whose name contains any of the given fragments
    pub fn name_contains(mut self, fragments: impl IntoNames) -> Self {
        self.selector = self.selector.name_contains(fragments);
        self
    }

    /// Select nodes called `name` at the given level
    pub fn named_at_level(mut self, name: impl Into<String>, level: usize) -> Self {
        self.selector = self.selector.named_at_level(name, level);
        self
    }

    /// Select children of nodes with any of the given names
    pub fn with_parents(mut self, names: impl IntoNames) -> Self {
        self.selector = self.selector.with_parents(names);
        self
    }

    /// Select children of nodes called `name` at the given level
    pub fn with_parent_at_level(mut self, name: impl Into<String>, level: usize) -> Self {
        self.selector = self.selector.with_parent_at_level(name, level);
        self
    }

    /// Rename the selected nodes
    pub fn rename(self, new_name: impl Into<String>) -> SurgeonResult<Self> {
        self.set_mutation(Mutation::Rename(new_name.into()))
    }

    /// Delete the selected nodes and their subtrees
    pub fn delete(self) -> SurgeonResult<Self> {
        self.set_mutation(Mutation::Delete)
    }

    /// Copy each selected node under a new name, right after the original
    pub fn duplicate_as(self, new_name: impl Into<String>) -> SurgeonResult<Self> {
        self.set_mutation(Mutation::DuplicateAs(new_name.into()))
    }

    /// Add an empty sibling called `name` right after each selected node
    pub fn insert_sibling(self, name: impl Into<String>) -> SurgeonResult<Self> {
        self.set_mutation(Mutation::InsertSibling(name.into()))
    }

    fn set_mutation(mut self, mutation: Mutation) -> SurgeonResult<Self> {
        if let Some(existing) = &self.mutation {
            return Err(SurgeonError::AmbiguousMutation {
                existing: existing.kind(),
                requested: mutation.kind(),
            });
        }
        self.mutation = Some(mutation);
        Ok(self)
    }

    /// The nodes the current selection matches, in document order
    pub fn selected_nodes(&self) -> Vec<&SyntaxNode> {
        self.selector.select(self.document.nodes())
    }

    fn apply(&mut self) -> Vec<RenderedLine> {
        let Some(mutation) = &self.mutation else {
            return self.document.render(&EditScript::new());
        };
        let targets = self.selector.select_ids(self.document.nodes());
        let script = mutation.apply(&mut self.document, &targets);
        self.document.render(&script)
    }

    /// Apply the mutation and return the output lines, without terminators
    pub fn execute(&mut self) -> Vec<String> {
        self.apply().into_iter().map(|line| line.text).collect()
    }

    /// Apply the mutation and return the output text.
    ///
    /// Each line keeps the terminator it had in the input.
    pub fn render(&mut self) -> String {
        join(&self.apply())
    }

    /// Finish this stage and start a new one on its output.
    ///
    /// The output is scanned again with the same [`ScanConfig`], so the next
    /// stage sees a freshly parsed document.
    pub fn then(mut self) -> SurgeonResult<Self> {
        let text = self.render();
        tracing::debug!(bytes = text.len(), "starting next stage");
        Self::with_config(&text, self.document.config())
    }
}

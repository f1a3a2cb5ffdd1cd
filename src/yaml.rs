//! Parsed documents: scanned lines plus the node forest built from them.

use crate::edit::{join, EditScript, RenderedLine};
use crate::error::{SurgeonError, SurgeonResult};
use crate::mutation::pending_edits;
use crate::node::{NodeId, SyntaxNode};
use crate::parse::parse;
use crate::scan::{scan_with_config, Line, ScanConfig};
use std::str::FromStr;

/// A YAML document held as immutable lines and the nodes parsed from them.
///
/// Rendering an unmodified document reproduces the input byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
    nodes: Vec<SyntaxNode>,
    config: ScanConfig,
}

impl Document {
    /// Parse a document with the default [`ScanConfig`]
    pub fn parse(text: &str) -> SurgeonResult<Document> {
        Self::parse_with_config(text, ScanConfig::default())
    }

    /// Parse a document with a custom [`ScanConfig`]
    pub fn parse_with_config(text: &str, config: ScanConfig) -> SurgeonResult<Document> {
        let lines = scan_with_config(text, &config)?;
        let nodes = parse(&lines);
        Ok(Document {
            lines,
            nodes,
            config,
        })
    }

    /// The scanned lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Line by 1-based number
    pub fn line(&self, number: usize) -> Option<&Line> {
        number.checked_sub(1).and_then(|index| self.lines.get(index))
    }

    /// The root nodes of the forest
    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }

    /// The configuration the document was scanned with
    pub fn config(&self) -> ScanConfig {
        self.config
    }

    /// Every node in document order.
    ///
    /// A root opened inside a flow collection can sit between the nodes of an
    /// earlier tree, so the trees are merged by id rather than chained.
    pub fn descendants(&self) -> impl Iterator<Item = &SyntaxNode> {
        let mut all: Vec<&SyntaxNode> = self
            .nodes
            .iter()
            .flat_map(SyntaxNode::descendants)
            .collect();
        all.sort_by_key(|node| node.id());
        all.into_iter()
    }

    /// Look up a node by id
    pub fn find(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes
            .iter()
            .take_while(|root| root.id() <= id)
            .find_map(|root| root.descendants().find(|node| node.id() == id))
    }

    pub(crate) fn find_mut(&mut self, id: NodeId) -> Option<&mut SyntaxNode> {
        self.nodes
            .iter_mut()
            .take_while(|root| root.id() <= id)
            .find_map(|root| root.find_mut(id))
    }

    /// Render the document with an edit script applied.
    ///
    /// Renames and deletions recorded on the nodes are rendered first, then
    /// `script` on top of them.
    pub fn render(&self, script: &EditScript) -> Vec<RenderedLine> {
        let mut edits = pending_edits(self);
        for edit in script.edits() {
            edits.push(edit.clone());
        }
        edits.render(&self.lines)
    }

    /// The document's lines as currently marked, without terminators
    pub fn to_lines(&self) -> Vec<String> {
        self.render(&EditScript::new())
            .into_iter()
            .map(|line| line.text)
            .collect()
    }
}

impl FromStr for Document {
    type Err = SurgeonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&join(&self.render(&EditScript::new())))
    }
}

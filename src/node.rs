//! Syntax nodes produced by the structural parser.

use rowan::TextRange;

/// Document-order identifier of a node within one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The position of this node in document order
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The collection notation a node was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FlowStyle {
    /// Introduced by indentation (or an inline block value)
    #[default]
    Block,
    /// Inside a single-line `{...}` mapping
    Mapping,
    /// Inside a single-line `[...]` sequence
    Sequence,
}

/// How a node is introduced on its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeRole {
    /// Neither a sequence entry nor a mapping value
    #[default]
    Plain,
    /// Entry of a block (`- `) or flow (`[`, `,`) sequence
    SequenceItem,
    /// Value following a mapping key's `:`
    MappingValue,
}

/// Pending change recorded on a node by the operation engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeEdit {
    /// The node renders as written
    #[default]
    Unmodified,
    /// The node's own token renders as the given text
    RenamedTo(String),
    /// The node and its subtree are removed at render time
    Deleted,
}

/// One named entity of the document: a mapping key, a scalar value or a
/// sequence item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SyntaxNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) start_line: usize,
    pub(crate) end_line: usize,
    pub(crate) token_index: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) range: TextRange,
    pub(crate) flow_style: FlowStyle,
    pub(crate) role: NodeRole,
    pub(crate) is_key: bool,
    pub(crate) inline: bool,
    pub(crate) edit: NodeEdit,
    pub(crate) children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Identifier of this node, unique within its parse
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Literal text of the node, quotes included
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based line the node is written on
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    /// Last 1-based line covered by the node or any descendant
    pub fn end_line(&self) -> usize {
        self.end_line
    }

    /// Index of the node's token on its start line
    pub fn token_index(&self) -> usize {
        self.token_index
    }

    /// Source range of the node's token
    pub fn text_range(&self) -> TextRange {
        self.range
    }

    /// The collection notation the node was written in
    pub fn flow_style(&self) -> FlowStyle {
        self.flow_style
    }

    /// How the node is introduced on its line
    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Whether the node is a mapping key (its token is followed by `:`)
    pub fn is_key(&self) -> bool {
        self.is_key
    }

    /// Whether the node shares its start line with its parent
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Pending edit recorded on the node
    pub fn edit(&self) -> &NodeEdit {
        &self.edit
    }

    /// Direct children in document order
    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    /// Whether `name` equals this node's text, either literally or with one
    /// pair of surrounding quotes removed.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || unquote(&self.name) == Some(name)
    }

    /// This node and all of its descendants in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    pub(crate) fn find_mut(&mut self, id: NodeId) -> Option<&mut SyntaxNode> {
        if self.id == id {
            return Some(self);
        }
        // Children are in document order, so the target lives under the last
        // child whose id does not exceed it.
        let position = self.children.partition_point(|child| child.id <= id);
        if position == 0 {
            return None;
        }
        self.children[position - 1].find_mut(id)
    }
}

fn unquote(name: &str) -> Option<&str> {
    ['"', '\''].iter().find_map(|&quote| {
        name.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

/// Pre-order iterator over a node and its descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

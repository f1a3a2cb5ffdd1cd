//! Structural parser: turns scanned lines into a forest of syntax nodes.

use crate::lex::{Token, TokenTag};
use crate::node::{FlowStyle, NodeEdit, NodeId, NodeRole, SyntaxNode};
use crate::scan::Line;
use rowan::TextRange;

/// A node under construction, linked to its relatives by arena index.
struct Slot {
    node: SyntaxNode,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Internal parser state
struct Parser {
    arena: Vec<Slot>,
    roots: Vec<usize>,
    /// Most recent node per effective level
    level_nodes: Vec<Option<usize>>,
}

impl Parser {
    fn new() -> Self {
        Self {
            arena: Vec::new(),
            roots: Vec::new(),
            level_nodes: Vec::new(),
        }
    }

    fn parse_line(&mut self, line: &Line) {
        let mut level = line.level();
        let mut seen_mapping = false;
        let mut seen_scalar = false;
        let mut flow_style = FlowStyle::Block;

        'tokens: for (index, token) in line.tokens().iter().enumerate() {
            for tag in token.tags() {
                match tag {
                    TokenTag::Comment => break 'tokens,
                    TokenTag::Scalar => {
                        let nested = seen_scalar && level == line.level();
                        self.add_scalar(line, index, level, flow_style, nested, seen_scalar);
                        seen_scalar = true;
                    }
                    TokenTag::Mapping => {
                        if seen_mapping {
                            level += 1;
                            flow_style = FlowStyle::Mapping;
                        } else {
                            seen_mapping = true;
                        }
                    }
                    TokenTag::Sequence => {
                        if seen_mapping {
                            level += 1;
                            flow_style = FlowStyle::Sequence;
                        }
                    }
                }
            }
        }
    }

    fn add_scalar(
        &mut self,
        line: &Line,
        index: usize,
        level: usize,
        flow_style: FlowStyle,
        nested: bool,
        inline: bool,
    ) {
        let id = self.arena.len();
        let mut node = new_node(id, line, index, flow_style);
        node.inline = inline;
        self.arena.push(Slot {
            node,
            parent: None,
            children: Vec::new(),
        });

        // A second scalar at the line's own level is the inline value of the first
        if nested {
            if let Some(Some(owner)) = self.level_nodes.get(level).copied() {
                self.attach(owner, id);
                return;
            }
        }

        self.level_nodes.truncate(level);
        self.level_nodes.resize(level, None);
        self.level_nodes.push(Some(id));

        // Without a node on the level directly above, the node starts a new root
        let parent = level
            .checked_sub(1)
            .and_then(|above| self.level_nodes[above]);
        match parent {
            Some(parent) => self.attach(parent, id),
            None => self.roots.push(id),
        }
    }

    fn attach(&mut self, parent: usize, child: usize) {
        let line = self.arena[child].node.start_line;
        self.arena[child].parent = Some(parent);
        self.arena[parent].children.push(child);

        let mut ancestor = Some(parent);
        while let Some(index) = ancestor {
            let slot = &mut self.arena[index];
            slot.node.end_line = slot.node.end_line.max(line);
            ancestor = slot.parent;
        }
    }

    fn finish(self) -> Vec<SyntaxNode> {
        tracing::debug!(
            roots = self.roots.len(),
            nodes = self.arena.len(),
            "parsed document"
        );
        let mut slots: Vec<Option<Slot>> = self.arena.into_iter().map(Some).collect();
        self.roots
            .iter()
            .filter_map(|&root| assemble(&mut slots, root))
            .collect()
    }
}

fn assemble(slots: &mut [Option<Slot>], index: usize) -> Option<SyntaxNode> {
    let slot = slots.get_mut(index)?.take()?;
    let mut node = slot.node;
    node.children = slot
        .children
        .iter()
        .filter_map(|&child| assemble(slots, child))
        .collect();
    Some(node)
}

fn new_node(id: usize, line: &Line, index: usize, flow_style: FlowStyle) -> SyntaxNode {
    let tokens = line.tokens();
    let is_key = tokens
        .get(index + 1)
        .is_some_and(|next| !next.is_scalar() && next.text().trim_start().starts_with(':'));

    SyntaxNode {
        id: NodeId(id),
        name: tokens[index].text().to_string(),
        start_line: line.number(),
        end_line: line.number(),
        token_index: index,
        range: line
            .token_range(index)
            .unwrap_or_else(|| TextRange::empty(line.range().start())),
        flow_style,
        role: role_of(index.checked_sub(1).map(|i| &tokens[i]), flow_style),
        is_key,
        inline: false,
        edit: NodeEdit::Unmodified,
        children: Vec::new(),
    }
}

/// Classify a scalar by the punctuation token in front of it.
fn role_of(previous: Option<&Token>, flow_style: FlowStyle) -> NodeRole {
    let Some(previous) = previous.filter(|t| !t.is_scalar()) else {
        return NodeRole::Plain;
    };
    match previous.text().trim_end().chars().last() {
        Some('-') | Some('[') => NodeRole::SequenceItem,
        Some(':') => NodeRole::MappingValue,
        Some(',') if flow_style == FlowStyle::Sequence => NodeRole::SequenceItem,
        _ => NodeRole::Plain,
    }
}

/// Build the node forest for a scanned document.
///
/// Each line contributes nodes at its block level, raised by one for every
/// flow collection opened after the line's first `:`. A node hangs off the
/// most recent node on the level directly above it; when that level has no
/// node the node becomes a root.
pub fn parse(lines: &[Line]) -> Vec<SyntaxNode> {
    let mut parser = Parser::new();
    for line in lines {
        parser.parse_line(line);
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use crate::test_utils::samples;

    fn parse_text(text: &str) -> Vec<SyntaxNode> {
        parse(&scan(text).unwrap())
    }

    /// Render a forest as `name@line[children]` for compact comparisons
    fn outline(nodes: &[SyntaxNode]) -> String {
        nodes
            .iter()
            .map(|n| {
                if n.children().is_empty() {
                    format!("{}@{}", n.name(), n.start_line())
                } else {
                    format!("{}@{}[{}]", n.name(), n.start_line(), outline(n.children()))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_sequence_with_nested_mappings() {
        let nodes = parse_text(samples::SERVERS);
        assert_eq!(
            outline(&nodes),
            "serverConfig@1[srv-100@2[settings@3[fast@3 secure@3]] \
             srv-200@4[settings@5[reliable@5 scalable@5] backup_to@6[storageUnit@6]]] \
             database@7[srv-300@8] webApp@9"
        );
    }

    #[test]
    fn test_mapping_with_nested_sequence() {
        let nodes = parse_text(samples::POD);
        assert_eq!(
            outline(&nodes),
            "apiVersion@1[v1@1] kind@2[Pod@2] \
             metadata@3[name@4[apache-pod@4] labels@5[app@6[web@6] \
             steps@7[uses@8[actions/checkout@v2@8] name@9[Set up Python@9]]]]"
        );
    }

    #[test]
    fn test_comments_yield_no_nodes() {
        let nodes = parse_text(samples::COMMENTED);
        assert_eq!(
            outline(&nodes),
            "kind@3[Pod@3] metadata@4[build@6[\"2020-01-01\"@6] resources@7 emptyLabel@9]"
        );
    }

    #[test]
    fn test_end_lines_cover_descendants() {
        let nodes = parse_text(samples::SERVERS);
        assert_eq!(nodes[0].end_line(), 6);
        assert_eq!(nodes[0].children()[1].end_line(), 6);
        assert_eq!(nodes[1].end_line(), 8);
        assert_eq!(nodes[2].end_line(), 9);

        let nodes = parse_text(samples::COMMENTED);
        // Comment lines never extend a range
        assert_eq!(nodes[1].children()[1].end_line(), 7);
        assert_eq!(nodes[1].end_line(), 9);
    }

    #[test]
    fn test_flow_styles_and_roles() {
        let nodes = parse_text(samples::SERVERS);
        let settings = &nodes[0].children()[0].children()[0];
        assert_eq!(settings.flow_style(), FlowStyle::Block);
        assert!(settings.is_key());
        assert!(!settings.is_inline());
        for item in settings.children() {
            assert_eq!(item.flow_style(), FlowStyle::Sequence);
            assert_eq!(item.role(), NodeRole::SequenceItem);
            assert!(item.is_inline());
        }

        let backup = &nodes[0].children()[1].children()[1];
        let unit = &backup.children()[0];
        assert_eq!(unit.role(), NodeRole::MappingValue);
        assert_eq!(unit.flow_style(), FlowStyle::Block);
        assert!(!unit.is_key());

        assert_eq!(nodes[1].role(), NodeRole::SequenceItem);
    }

    #[test]
    fn test_flow_mapping_nests_value_under_key() {
        let nodes = parse_text("beans: {ham: spam}");
        assert_eq!(outline(&nodes), "beans@1[ham@1[spam@1]]");
        let ham = &nodes[0].children()[0];
        assert_eq!(ham.flow_style(), FlowStyle::Mapping);
        assert_eq!(ham.role(), NodeRole::Plain);
        assert!(ham.is_key());
        assert_eq!(ham.children()[0].role(), NodeRole::MappingValue);
    }

    #[test]
    fn test_leading_blank_line_and_deep_indent() {
        let nodes = parse_text(samples::BREAKFAST);
        assert_eq!(
            outline(&nodes),
            "spam@2[egg@3[true@3] ham@4[spam@6] bacon@7[egg@7 spam@7]] \
             sausage@8[bacon@9[egg@9 spam@9] beans@10[spam@10[spam@10]]]"
        );
    }

    #[test]
    fn test_ids_follow_document_order() {
        let nodes = parse_text(samples::BREAKFAST);
        let ids: Vec<_> = nodes
            .iter()
            .flat_map(SyntaxNode::descendants)
            .map(|n| n.id().index())
            .collect();
        let expected: Vec<_> = (0..ids.len()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_ranges_point_at_tokens() {
        let text = "key: value\nother: [a, b]";
        let nodes = parse_text(text);
        for node in nodes.iter().flat_map(SyntaxNode::descendants) {
            let range = node.text_range();
            assert_eq!(&text[range], node.name());
        }
    }

    #[test]
    fn test_missing_level_starts_a_root() {
        // `: {` opens two levels at once, so `c` has no node directly above it
        let nodes = parse_text("a: {b: {c: 1}}");
        assert_eq!(outline(&nodes), "a@1[b@1] c@1[1@1]");
        let c = &nodes[1];
        assert!(c.is_inline());
        assert_eq!(c.flow_style(), FlowStyle::Mapping);

        // A comment can open a level without a node as well
        let nodes = parse_text("a:\n  # note\n    b: 1");
        assert_eq!(outline(&nodes), "a@1 b@3[1@3]");
        assert!(!nodes[1].is_inline());
    }

    #[test]
    fn test_flow_sequence_under_flow_key_starts_roots() {
        let nodes = parse_text("bacon: {egg: [spam, ham]}");
        assert_eq!(outline(&nodes), "bacon@1[egg@1] spam@1 ham@1");
        assert!(nodes[1].is_inline());
        assert_eq!(nodes[2].role(), NodeRole::SequenceItem);
        assert_eq!(nodes[2].flow_style(), FlowStyle::Sequence);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_text("").is_empty());
        assert!(parse_text("# only a comment\n").is_empty());
    }
}

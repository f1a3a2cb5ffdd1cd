//! Mutations applied to a selection of nodes.
//!
//! Renames and deletions are recorded on the selected nodes as [`NodeEdit`]s
//! and turned into text changes whenever the document is rendered.
//! Duplicates and inserted siblings add new text, described by the
//! [`EditScript`] a mutation returns. Both resolve against the original
//! lines.

use crate::edit::{Edit, EditScript};
use crate::lex::Token;
use crate::node::{FlowStyle, NodeEdit, NodeId, NodeRole, SyntaxNode};
use crate::scan::Line;
use crate::yaml::Document;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// The single structural change applied by one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Replace each node's own token with the given text
    Rename(String),
    /// Remove each node together with its subtree
    Delete,
    /// Add a copy of each node, under a new name, right after it
    DuplicateAs(String),
    /// Add an empty sibling with the given name right after each node
    InsertSibling(String),
}

impl Mutation {
    /// Short name of the mutation, as used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Rename(_) => "rename",
            Mutation::Delete => "delete",
            Mutation::DuplicateAs(_) => "duplicate",
            Mutation::InsertSibling(_) => "insert",
        }
    }

    /// Apply the mutation to the `targets` of `document`.
    ///
    /// Renamed and deleted nodes are marked with their pending [`NodeEdit`],
    /// which [`Document::render`] picks up; the returned script holds the
    /// text added by duplicates and inserted siblings. Ids that do not exist
    /// in the document are ignored.
    pub fn apply(&self, document: &mut Document, targets: &[NodeId]) -> EditScript {
        let mut script = EditScript::new();
        match self {
            Mutation::Rename(new_name) => {
                mark(document, targets, &NodeEdit::RenamedTo(new_name.clone()));
            }
            Mutation::Delete => mark(document, targets, &NodeEdit::Deleted),
            Mutation::DuplicateAs(new_name) => {
                for node in insertion_order(document, targets) {
                    duplicate(document, node, new_name, &mut script);
                }
            }
            Mutation::InsertSibling(name) => {
                for node in insertion_order(document, targets) {
                    insert_sibling(document, node, name, &mut script);
                }
            }
        }

        tracing::debug!(
            mutation = self.kind(),
            targets = targets.len(),
            edits = script.edits().len(),
            "applied mutation"
        );
        script
    }
}

fn mark(document: &mut Document, targets: &[NodeId], edit: &NodeEdit) {
    for &id in targets {
        if let Some(node) = document.find_mut(id) {
            node.edit = edit.clone();
        }
    }
}

/// Targets in the order their insertions must be emitted.
///
/// Insertions after the same line come out in push order, so the deepest
/// node goes first and its copy stays next to the original.
fn insertion_order<'a>(document: &'a Document, targets: &[NodeId]) -> Vec<&'a SyntaxNode> {
    let mut nodes: Vec<&SyntaxNode> = targets
        .iter()
        .filter_map(|&id| document.find(id))
        .collect();
    nodes.sort_by_key(|node| (node.end_line(), Reverse(node.start_line())));
    nodes
}

/// The edits that render the renames and deletions marked on `document`.
pub(crate) fn pending_edits(document: &Document) -> EditScript {
    let mut script = EditScript::new();
    let mut deleted = Vec::new();
    for node in document.descendants() {
        match node.edit() {
            NodeEdit::Unmodified => {}
            NodeEdit::RenamedTo(new_name) => script.push(Edit::ReplaceToken {
                line: node.start_line(),
                token: node.token_index(),
                text: new_name.clone(),
            }),
            NodeEdit::Deleted => deleted.push(node),
        }
    }
    delete(document, deleted, &mut script);
    script
}

fn delete(document: &Document, nodes: Vec<&SyntaxNode>, script: &mut EditScript) {
    let mut inline: BTreeMap<usize, Vec<&SyntaxNode>> = BTreeMap::new();
    for node in nodes {
        if node.is_inline() {
            inline.entry(node.start_line()).or_default().push(node);
        } else {
            script.push(Edit::DropLines {
                start: node.start_line(),
                end: node.end_line(),
            });
        }
    }

    for (number, mut nodes) in inline {
        nodes.sort_by_key(|node| node.token_index());
        if let Some(line) = document.line(number) {
            delete_inline(line, &nodes, script);
        }
    }
}

/// Index of the last scalar of the flow entry that starts at `index`.
///
/// The entry runs up to the first separator or unmatched closer at its own
/// depth, so a key's entry covers its whole value.
fn entry_end(tokens: &[Token], index: usize) -> usize {
    let mut depth = 0usize;
    let mut last = index;
    for (i, token) in tokens.iter().enumerate().skip(index + 1) {
        if token.is_comment() {
            break;
        }
        if token.is_scalar() {
            last = i;
            continue;
        }
        for ch in token.text().chars() {
            match ch {
                '[' | '{' => depth += 1,
                ']' | '}' => match depth.checked_sub(1) {
                    Some(outer) => depth = outer,
                    None => return last,
                },
                ',' if depth == 0 => return last,
                _ => {}
            }
        }
    }
    last
}

/// Collections opened by the punctuation in `tokens[first..=last]` and not
/// closed within it.
fn open_collections(tokens: &[Token], first: usize, last: usize) -> usize {
    let balance: isize = tokens
        .get(first..=last)
        .unwrap_or_default()
        .iter()
        .filter(|t| !t.is_scalar())
        .map(|t| bracket_balance(t.text()))
        .sum();
    balance.max(0) as usize
}

/// The point right behind a flow entry, after the closers of any collection
/// the entry opened.
struct EntryEnd<'a> {
    /// Last scalar of the entry
    last: usize,
    /// Token the point lies in
    token: usize,
    /// Byte offset of the point within that token
    offset: usize,
    /// The closers between the last scalar and the point
    closers: &'a str,
}

fn entry_end_point(line: &Line, index: usize) -> EntryEnd<'_> {
    let tokens = line.tokens();
    let last = entry_end(tokens, index);
    let mut open = open_collections(tokens, index + 1, last);
    if open > 0 {
        if let Some(next) = tokens.get(last + 1).filter(|t| !t.is_scalar()) {
            let text = next.text();
            let rest = strip_closers(text, &mut open);
            let offset = text.len() - rest.len();
            return EntryEnd {
                last,
                token: last + 1,
                offset,
                closers: &text[..offset],
            };
        }
    }
    EntryEnd {
        last,
        token: last,
        offset: tokens[last].text().len(),
        closers: "",
    }
}

/// Remove inline nodes from a single line, along with one adjacent separator
/// per node.
fn delete_inline(line: &Line, nodes: &[&SyntaxNode], script: &mut EditScript) {
    let tokens = line.tokens();
    let mut texts: Vec<String> = tokens.iter().map(|t| t.text().to_string()).collect();
    let mut removed = vec![false; tokens.len()];

    for node in nodes {
        let first = node.token_index();
        if removed.get(first).copied().unwrap_or(true) {
            continue;
        }
        let last = entry_end(tokens, first);
        for flag in &mut removed[first..=last] {
            *flag = true;
        }

        let next = (last + 1..tokens.len())
            .find(|&i| !removed[i])
            .filter(|&i| !tokens[i].is_scalar());

        // Collections opened inside the removed span are closed after it
        if let Some(index) = next {
            let mut open = open_collections(tokens, first, last);
            if open > 0 {
                texts[index] = strip_closers(&texts[index], &mut open);
            }
        }
        // A value leaves its key in place, so only entries give up a separator
        if node.role() == NodeRole::MappingValue {
            continue;
        }

        let mut separated = false;
        if let Some(index) = next {
            if let Some(rest) = strip_leading(&texts[index], ':') {
                texts[index] = rest;
            }
            if let Some(rest) = strip_leading(&texts[index], ',') {
                texts[index] = rest;
                separated = true;
            }
        }
        if !separated {
            let previous = (0..first)
                .rev()
                .find(|&i| !removed[i])
                .filter(|&i| !tokens[i].is_scalar());
            if let Some(index) = previous {
                if let Some(rest) = texts[index].trim_end().strip_suffix(',') {
                    texts[index] = rest.to_string();
                }
            }
        }
    }

    for (index, token) in tokens.iter().enumerate() {
        let text = if removed[index] {
            String::new()
        } else if texts[index] != token.text() {
            std::mem::take(&mut texts[index])
        } else {
            continue;
        };
        script.push(Edit::ReplaceToken {
            line: line.number(),
            token: index,
            text,
        });
    }
}

fn duplicate(document: &Document, node: &SyntaxNode, new_name: &str, script: &mut EditScript) {
    let Some(line) = document.line(node.start_line()) else {
        return;
    };

    if !node.is_inline() {
        let mut copied = vec![with_token_replaced(line, node.token_index(), new_name)];
        copied.extend(
            (node.start_line() + 1..=node.end_line())
                .filter_map(|number| document.line(number))
                .map(Line::text),
        );
        script.push(Edit::InsertLines {
            after: node.end_line(),
            lines: copied,
        });
    } else if node.role() == NodeRole::MappingValue {
        script.push(Edit::ReplaceToken {
            line: line.number(),
            token: node.token_index(),
            text: format!("[{}, {}]", node.name(), new_name),
        });
    } else {
        let end = entry_end_point(line, node.token_index());
        let mut text = format!("{}{}", separator(line), new_name);
        if node.is_key() && node.flow_style() == FlowStyle::Mapping {
            // The copy of a flow key carries the original's value
            text.extend(
                line.tokens()[node.token_index() + 1..=end.last]
                    .iter()
                    .map(Token::text),
            );
            text.push_str(end.closers);
        }
        script.push(Edit::InsertText {
            line: line.number(),
            token: end.token,
            offset: end.offset,
            text,
        });
    }
}

fn insert_sibling(document: &Document, node: &SyntaxNode, name: &str, script: &mut EditScript) {
    let Some(line) = document.line(node.start_line()) else {
        return;
    };

    if !node.is_inline() {
        let prefix: String = line.tokens()[..node.token_index()]
            .iter()
            .map(Token::text)
            .collect();
        let colon = if node.is_key() && node.role() != NodeRole::SequenceItem {
            ":"
        } else {
            ""
        };
        script.push(Edit::InsertLines {
            after: node.end_line(),
            lines: vec![format!("{}{}{}", prefix, name, colon)],
        });
    } else if node.role() == NodeRole::MappingValue {
        script.push(Edit::ReplaceToken {
            line: line.number(),
            token: node.token_index(),
            text: format!("[{}, {}]", node.name(), name),
        });
    } else {
        let colon = if node.is_key() && node.flow_style() == FlowStyle::Mapping {
            ":"
        } else {
            ""
        };
        let end = entry_end_point(line, node.token_index());
        script.push(Edit::InsertText {
            line: line.number(),
            token: end.token,
            offset: end.offset,
            text: format!("{}{}{}", separator(line), name, colon),
        });
    }
}

/// The text of `line` with one token swapped out.
fn with_token_replaced(line: &Line, index: usize, text: &str) -> String {
    line.tokens()
        .iter()
        .enumerate()
        .map(|(i, token)| if i == index { text } else { token.text() })
        .collect()
}

/// The entry separator used on a line, `", "` when it has none.
fn separator(line: &Line) -> &str {
    line.tokens()
        .iter()
        .map(Token::text)
        .find(|text| text.trim() == ",")
        .unwrap_or(", ")
}

/// Opening minus closing brackets in a punctuation fragment.
fn bracket_balance(text: &str) -> isize {
    text.chars()
        .map(|c| match c {
            '[' | '{' => 1,
            ']' | '}' => -1,
            _ => 0,
        })
        .sum()
}

/// Drop up to `open` leading closing brackets (and the space around them).
fn strip_closers(text: &str, open: &mut usize) -> String {
    let mut rest = text;
    while *open > 0 {
        let trimmed = rest.trim_start();
        match trimmed.strip_prefix([']', '}']) {
            Some(after) => {
                rest = after;
                *open -= 1;
            }
            None => break,
        }
    }
    rest.to_string()
}

/// Remove a leading `ch` and the whitespace on either side of it.
fn strip_leading(text: &str, ch: char) -> Option<String> {
    text.trim_start()
        .strip_prefix(ch)
        .map(|rest| rest.trim_start().to_string())
}

//! Edit scripts: structural changes resolved against the original lines in a
//! single render pass.
//!
//! Every edit is positioned in the coordinates of the document as it was
//! parsed (1-based line numbers and token indices on those lines), so edits
//! never have to be shifted to account for each other.

use crate::scan::{Line, LineEnding};
use std::collections::{BTreeMap, BTreeSet};

/// A single change to the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Render a token with different text (empty text removes it)
    ReplaceToken {
        /// 1-based line number
        line: usize,
        /// Token index on the line
        token: usize,
        /// Replacement text
        text: String,
    },
    /// Insert text inside a token; an offset at or past its end appends
    InsertText {
        /// 1-based line number
        line: usize,
        /// Token index on the line
        token: usize,
        /// Byte offset within the token's text
        offset: usize,
        /// Text to insert
        text: String,
    },
    /// Omit an inclusive range of lines
    DropLines {
        /// First line dropped
        start: usize,
        /// Last line dropped
        end: usize,
    },
    /// Emit new lines after a line
    InsertLines {
        /// The line the new lines follow
        after: usize,
        /// Line contents, without terminators
        lines: Vec<String>,
    },
}

/// An ordered list of [`Edit`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    edits: Vec<Edit>,
}

/// One line of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// The line content
    pub text: String,
    /// The terminator that follows the content
    pub ending: LineEnding,
}

impl EditScript {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edit
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// The edits in the order they were added
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Whether the script changes nothing
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply the script to `lines`, producing the output lines.
    ///
    /// When several replacements target the same token the last one wins.
    /// Text inserted at the same offset and lines inserted after the same
    /// line keep the order they were added in.
    pub fn render(&self, lines: &[Line]) -> Vec<RenderedLine> {
        let mut replaced: BTreeMap<(usize, usize), &str> = BTreeMap::new();
        let mut spliced: BTreeMap<(usize, usize), Vec<(usize, &str)>> = BTreeMap::new();
        let mut dropped: BTreeSet<usize> = BTreeSet::new();
        let mut inserted: BTreeMap<usize, Vec<&str>> = BTreeMap::new();

        for edit in &self.edits {
            match edit {
                Edit::ReplaceToken { line, token, text } => {
                    replaced.insert((*line, *token), text);
                }
                Edit::InsertText {
                    line,
                    token,
                    offset,
                    text,
                } => {
                    spliced
                        .entry((*line, *token))
                        .or_default()
                        .push((*offset, text));
                }
                Edit::DropLines { start, end } => {
                    dropped.extend(*start..=*end);
                }
                Edit::InsertLines { after, lines } => {
                    inserted
                        .entry(*after)
                        .or_default()
                        .extend(lines.iter().map(String::as_str));
                }
            }
        }

        let separator = document_separator(lines);
        let mut output = Vec::with_capacity(lines.len());
        for line in lines {
            let number = line.number();
            let ending = match line.ending() {
                LineEnding::None => separator,
                ending => ending,
            };

            if !dropped.contains(&number) {
                let mut text = String::new();
                for (index, token) in line.tokens().iter().enumerate() {
                    let base = replaced.get(&(number, index)).copied().unwrap_or(token.text());
                    match spliced.get_mut(&(number, index)) {
                        Some(inserts) => splice(&mut text, base, inserts),
                        None => text.push_str(base),
                    }
                }
                output.push(RenderedLine { text, ending });
            }

            if let Some(new_lines) = inserted.get(&number) {
                output.extend(new_lines.iter().map(|text| RenderedLine {
                    text: text.to_string(),
                    ending,
                }));
            }
        }

        // The last line keeps whatever terminated the source document
        if let (Some(last), Some(source)) = (output.last_mut(), lines.last()) {
            last.ending = source.ending();
        }
        output
    }
}

/// Push `base` onto `out` with the inserts placed at their offsets.
fn splice(out: &mut String, base: &str, inserts: &mut [(usize, &str)]) {
    inserts.sort_by_key(|(offset, _)| *offset);
    let mut position = 0;
    for (offset, text) in inserts.iter() {
        let mut at = (*offset).clamp(position, base.len());
        if !base.is_char_boundary(at) {
            at = base.len();
        }
        out.push_str(&base[position..at]);
        out.push_str(text);
        position = at;
    }
    out.push_str(&base[position..]);
}

/// The terminator used for lines that had none in the source.
fn document_separator(lines: &[Line]) -> LineEnding {
    lines
        .iter()
        .map(Line::ending)
        .find(|ending| *ending != LineEnding::None)
        .unwrap_or(LineEnding::Lf)
}

/// Join rendered lines into text, terminators included.
pub fn join(lines: &[RenderedLine]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line.text);
        text.push_str(line.ending.as_str());
    }
    text
}

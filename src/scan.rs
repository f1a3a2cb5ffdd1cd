//! Line builder: splits a document into lexed lines with nesting levels.

use crate::error::{IndentationError, IndentationErrorCategory, SurgeonResult};
use crate::lex::{lex, Token};
use rowan::{TextRange, TextSize};

/// The terminator that ended a line in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineEnding {
    /// No terminator (the final line of a document without a trailing newline)
    #[default]
    None,
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The terminator text
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::None => "",
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Split a raw line (as produced by `split_inclusive('\n')`) into its
    /// content and terminator.
    fn split(raw: &str) -> (&str, LineEnding) {
        if let Some(content) = raw.strip_suffix("\r\n") {
            (content, LineEnding::CrLf)
        } else if let Some(content) = raw.strip_suffix('\n') {
            (content, LineEnding::Lf)
        } else {
            (raw, LineEnding::None)
        }
    }
}

/// Options controlling how indentation is turned into nesting levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Reject dedents that do not land exactly on an enclosing level.
    ///
    /// When disabled, a dedent pops indentation levels until the decrease is
    /// covered, even if it overshoots.
    pub strict_dedent: bool,
    /// Give whitespace-only lines the current level without touching the
    /// indentation stack.
    pub blank_lines_inherit_level: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            strict_dedent: true,
            blank_lines_inherit_level: true,
        }
    }
}

impl ScanConfig {
    /// Measure every line, blank or not, and accept overshooting dedents.
    pub fn permissive() -> Self {
        Self {
            strict_dedent: false,
            blank_lines_inherit_level: false,
        }
    }
}

/// One physical line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    tokens: Vec<Token>,
    number: usize,
    level: usize,
    range: TextRange,
    ending: LineEnding,
}

impl Line {
    /// The tokens making up this line
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// 1-based line number
    pub fn number(&self) -> usize {
        self.number
    }

    /// Block nesting level derived from indentation
    pub fn level(&self) -> usize {
        self.level
    }

    /// Range of the line content (without terminator) in the source text
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// The terminator that followed this line in the source
    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    /// The line content, reassembled from its tokens
    pub fn text(&self) -> String {
        self.tokens.iter().map(Token::text).collect()
    }

    /// Whether the line holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.tokens.iter().all(|t| t.text().trim().is_empty())
    }

    /// Source range of the token at `index`
    pub fn token_range(&self, index: usize) -> Option<TextRange> {
        if index >= self.tokens.len() {
            return None;
        }
        let start = self.range.start()
            + self.tokens[..index]
                .iter()
                .map(|t| TextSize::of(t.text()))
                .sum::<TextSize>();
        Some(TextRange::at(start, TextSize::of(self.tokens[index].text())))
    }
}

fn indentation(content: &str) -> usize {
    content.chars().take_while(|c| c.is_whitespace()).count()
}

/// Scan a document into lines using the default [`ScanConfig`].
pub fn scan(text: &str) -> SurgeonResult<Vec<Line>> {
    scan_with_config(text, &ScanConfig::default())
}

/// Scan a document into lines, computing each line's nesting level.
///
/// An indentation increase pushes the difference onto a stack and opens a
/// new level; a decrease pops differences until it is matched exactly.
pub fn scan_with_config(text: &str, config: &ScanConfig) -> SurgeonResult<Vec<Line>> {
    let mut lines = Vec::new();
    let mut deltas: Vec<usize> = Vec::new();
    let mut previous_indent: Option<usize> = None;
    let mut offset = TextSize::from(0);

    for (index, raw) in text.split_inclusive('\n').enumerate() {
        let number = index + 1;
        let (content, ending) = LineEnding::split(raw);
        let range = TextRange::at(offset, TextSize::of(content));
        offset += TextSize::of(raw);

        let indent = indentation(content);
        let previous = *previous_indent.get_or_insert(indent);
        let blank = content.trim().is_empty();

        if !(blank && config.blank_lines_inherit_level) {
            if indent > previous {
                deltas.push(indent - previous);
            } else if indent < previous {
                let mut remaining = previous - indent;
                while remaining > 0 {
                    let Some(delta) = deltas.pop() else {
                        return Err(IndentationError {
                            message: format!(
                                "indentation of {} is to the left of the document start",
                                indent
                            ),
                            line: number,
                            range,
                            category: IndentationErrorCategory::Underflow,
                        }
                        .into());
                    };
                    if delta > remaining {
                        if config.strict_dedent {
                            return Err(IndentationError {
                                message: format!(
                                    "dedent to column {} does not match an enclosing level",
                                    indent
                                ),
                                line: number,
                                range,
                                category: IndentationErrorCategory::Misaligned,
                            }
                            .into());
                        }
                        break;
                    }
                    remaining -= delta;
                }
            }
            previous_indent = Some(indent);
        }

        lines.push(Line {
            tokens: lex(content),
            number,
            level: deltas.len(),
            range,
            ending,
        });
    }

    tracing::debug!(lines = lines.len(), "scanned document");
    Ok(lines)
}

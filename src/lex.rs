//! Span lexer for single lines of YAML.
//!
//! Each line is split into [`Token`]s: contiguous text fragments tagged with
//! the structural roles they play. Concatenating the token texts of a line
//! always reproduces the line exactly.

/// Structural role carried by a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenTag {
    /// A plain or quoted scalar
    Scalar,
    /// Mapping punctuation (`:` or `{`)
    Mapping,
    /// Sequence punctuation (`-` or `[`)
    Sequence,
    /// A comment running to the end of the line
    Comment,
}

/// A fragment of a line together with its structural tags.
///
/// Tags are kept in the order they were encountered and may repeat: the
/// fragment `": {"` carries [`TokenTag::Mapping`] twice, which the parser
/// reads as a nested flow mapping.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    text: String,
    tags: Vec<TokenTag>,
}

impl Token {
    /// Create a token from its text and tags
    pub fn new(text: impl Into<String>, tags: Vec<TokenTag>) -> Self {
        Self {
            text: text.into(),
            tags,
        }
    }

    /// The literal text of this token
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The structural tags, in order of appearance
    pub fn tags(&self) -> &[TokenTag] {
        &self.tags
    }

    /// Whether the token carries the given tag at least once
    pub fn has_tag(&self, tag: TokenTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Whether this token is a scalar
    pub fn is_scalar(&self) -> bool {
        self.has_tag(TokenTag::Scalar)
    }

    /// Whether this token is a comment
    pub fn is_comment(&self) -> bool {
        self.has_tag(TokenTag::Comment)
    }

    /// Whether this token is untagged punctuation or whitespace
    pub fn is_punctuation(&self) -> bool {
        self.tags.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Between spans, accumulating punctuation
    Outside,
    /// Inside an unquoted scalar
    Scalar,
    /// After a scalar, buffering characters that may still belong to it
    AmbiguousTail,
    /// Inside a quoted scalar; `None` marks a comment, which never closes
    Quoted(Option<char>),
}

struct SpanLexer {
    state: State,
    current: String,
    lookahead: String,
    tags: Vec<TokenTag>,
    tokens: Vec<Token>,
}

impl SpanLexer {
    fn new() -> Self {
        Self {
            state: State::Outside,
            current: String::new(),
            lookahead: String::new(),
            tags: Vec::new(),
            tokens: Vec::new(),
        }
    }

    fn feed(&mut self, ch: char) {
        match self.state {
            State::Outside => {
                if ch.is_alphanumeric() {
                    self.end_span();
                    self.state = State::Scalar;
                    self.tags.push(TokenTag::Scalar);
                } else if is_quote(ch) {
                    self.end_span();
                    self.state = State::Quoted(Some(ch));
                    self.tags.push(TokenTag::Scalar);
                } else if ch == '#' {
                    self.end_span();
                    self.open_comment();
                } else if let Some(tag) = punctuation_tag(ch) {
                    self.tags.push(tag);
                }
                self.current.push(ch);
            }
            State::Scalar => {
                if is_terminator(ch) {
                    self.end_span();
                    self.open_terminator(ch);
                    self.current.push(ch);
                } else if ch.is_alphanumeric() {
                    self.current.push(ch);
                } else {
                    self.state = State::AmbiguousTail;
                    self.lookahead.push(ch);
                }
            }
            State::AmbiguousTail => {
                if is_terminator(ch) {
                    self.end_span();
                    self.open_terminator(ch);
                    let tail = std::mem::take(&mut self.lookahead);
                    self.current.push_str(&tail);
                    self.current.push(ch);
                } else if ch.is_alphanumeric() {
                    let tail = std::mem::take(&mut self.lookahead);
                    self.current.push_str(&tail);
                    self.current.push(ch);
                    self.state = State::Scalar;
                } else if is_quote(ch) {
                    self.end_span();
                    self.current = std::mem::take(&mut self.lookahead);
                    self.end_span();
                    self.state = State::Quoted(Some(ch));
                    self.tags.push(TokenTag::Scalar);
                    self.current.push(ch);
                } else {
                    self.lookahead.push(ch);
                }
            }
            State::Quoted(close) => {
                self.current.push(ch);
                if close == Some(ch) {
                    self.end_span();
                    self.state = State::Outside;
                }
            }
        }
    }

    /// Leave a scalar on a terminator character.
    fn open_terminator(&mut self, ch: char) {
        self.state = State::Outside;
        match ch {
            ':' => self.tags.push(TokenTag::Mapping),
            '#' => self.open_comment(),
            _ => {}
        }
    }

    fn open_comment(&mut self) {
        self.state = State::Quoted(None);
        self.tags.push(TokenTag::Comment);
    }

    fn end_span(&mut self) {
        if !self.current.is_empty() {
            let text = std::mem::take(&mut self.current);
            let tags = std::mem::take(&mut self.tags);
            self.tokens.push(Token { text, tags });
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.end_span();
        // A leftover lookahead never reached another word, so it is punctuation
        if !self.lookahead.is_empty() {
            self.current = std::mem::take(&mut self.lookahead);
            self.end_span();
        }
        self.tokens
    }
}

/// Characters that end an unquoted scalar
fn is_terminator(ch: char) -> bool {
    matches!(ch, ':' | ']' | '}' | ',' | '#')
}

fn is_quote(ch: char) -> bool {
    matches!(ch, '\'' | '"')
}

/// The tag contributed by a punctuation character outside of any span
fn punctuation_tag(ch: char) -> Option<TokenTag> {
    match ch {
        '-' | '[' => Some(TokenTag::Sequence),
        ':' | '{' => Some(TokenTag::Mapping),
        _ => None,
    }
}

/// Split a single line (without its terminator) into tokens.
///
/// An empty line yields a single empty, untagged token.
pub fn lex(line: &str) -> Vec<Token> {
    if line.is_empty() {
        return vec![Token::new("", Vec::new())];
    }
    let mut lexer = SpanLexer::new();
    for ch in line.chars() {
        lexer.feed(ch);
    }
    let tokens = lexer.finish();
    tracing::trace!(line, count = tokens.len(), "lexed line");
    tokens
}

/*!
 * Comment stripping for script sources
 *
 * The cleaning walker only depends on the [`CommentStripper`] trait. The
 * bundled [`ScriptCommentStripper`] understands enough of the JavaScript and
 * TypeScript lexical grammar (strings, template literals, regular expression
 * literals) to never mistake their contents for a comment.
 */

use std::collections::HashSet;

use once_cell::sync::Lazy;
use thiserror::Error;

/// Errors that can occur while stripping comments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StripError {
    /// A `/*` without a matching `*/`
    #[error("unterminated block comment starting on line {line}")]
    UnterminatedComment { line: usize },

    /// Output was not valid UTF-8
    #[error("invalid UTF-8 in output: {0}")]
    Encoding(String),
}

/// Specialized Result type for stripping
pub type StripResult<T> = Result<T, StripError>;

/// Options passed to the stripper for every file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripOptions {
    /// Leave an empty line wherever a comment occupied whole lines.
    /// When false, such lines are removed entirely.
    pub preserve_blank_lines: bool,
}

/// Removes comments from the full text of one file
pub trait CommentStripper {
    /// Return `text` with comments removed. Must be deterministic.
    fn strip(&self, text: &str, options: StripOptions) -> StripResult<String>;
}

/// Comment stripper for `.js` and `.ts` sources
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptCommentStripper;

impl CommentStripper for ScriptCommentStripper {
    fn strip(&self, text: &str, options: StripOptions) -> StripResult<String> {
        Lexer::new(text, options).run()
    }
}

/// Keywords after which a `/` starts a regular expression literal
static REGEX_PRECEDING_KEYWORDS: Lazy<HashSet<&'static [u8]>> = Lazy::new(|| {
    [
        "return",
        "typeof",
        "instanceof",
        "in",
        "of",
        "new",
        "delete",
        "void",
        "throw",
        "case",
        "do",
        "else",
        "yield",
        "await",
    ]
    .into_iter()
    .map(str::as_bytes)
    .collect()
});

/// Keywords whose parenthesized header may be followed by a regex literal
static CONTROL_KEYWORDS: Lazy<HashSet<&'static [u8]>> = Lazy::new(|| {
    ["if", "while", "for", "with"]
        .into_iter()
        .map(str::as_bytes)
        .collect()
});

/// Last significant token seen in code context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Punct(u8),
    /// `)` closing an `if`/`while`/`for`/`with` header
    ControlParen,
    /// Byte range of an identifier, keyword or number
    Word(usize, usize),
    /// String, template or regex literal
    Literal,
}

fn is_ident_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    out: Vec<u8>,
    options: StripOptions,
    prev: Prev,
    brace_depth: usize,
    /// Brace depth at each open `${`
    templates: Vec<usize>,
    /// One entry per open `(`: whether it starts a control header
    parens: Vec<bool>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str, options: StripOptions) -> Self {
        Self {
            src: text.as_bytes(),
            pos: 0,
            out: Vec::with_capacity(text.len()),
            options,
            prev: Prev::Start,
            brace_depth: 0,
            templates: Vec::new(),
            parens: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn copy(&mut self, n: usize) {
        let end = (self.pos + n).min(self.src.len());
        self.out.extend_from_slice(&self.src[self.pos..end]);
        self.pos = end;
    }

    fn run(mut self) -> StripResult<String> {
        if self.src.starts_with(b"#!") {
            while self.pos < self.src.len() && !matches!(self.src[self.pos], b'\n' | b'\r') {
                self.copy(1);
            }
        }

        while let Some(b) = self.peek(0) {
            match b {
                b'/' if self.peek(1) == Some(b'/') => self.line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.block_comment()?,
                b'/' if self.regex_allowed() => {
                    self.regex_literal();
                    self.prev = Prev::Literal;
                }
                b'\'' | b'"' => {
                    self.string(b);
                    self.prev = Prev::Literal;
                }
                b'`' => {
                    self.copy(1);
                    self.template();
                }
                b'{' => {
                    self.brace_depth += 1;
                    self.copy(1);
                    self.prev = Prev::Punct(b);
                }
                b'}' => {
                    self.copy(1);
                    if self.templates.last() == Some(&self.brace_depth) {
                        self.templates.pop();
                        self.template();
                    } else {
                        self.brace_depth = self.brace_depth.saturating_sub(1);
                        self.prev = Prev::Punct(b);
                    }
                }
                b'(' => {
                    let control = matches!(self.prev, Prev::Word(start, end)
                        if CONTROL_KEYWORDS.contains(&self.src[start..end]));
                    self.parens.push(control);
                    self.copy(1);
                    self.prev = Prev::Punct(b);
                }
                b')' => {
                    self.copy(1);
                    self.prev = if self.parens.pop() == Some(true) {
                        Prev::ControlParen
                    } else {
                        Prev::Punct(b)
                    };
                }
                b'+' | b'-' if self.peek(1) == Some(b) => {
                    self.copy(2);
                    // postfix increments leave the operand as the last value
                    if !self.ends_value() {
                        self.prev = Prev::Punct(b);
                    }
                }
                _ if is_ident_part(b) => {
                    let start = self.pos;
                    while self.peek(0).is_some_and(is_ident_part) {
                        self.copy(1);
                    }
                    self.prev = Prev::Word(start, self.pos);
                }
                _ if b.is_ascii_whitespace() => self.copy(1),
                _ => {
                    self.copy(1);
                    self.prev = Prev::Punct(b);
                }
            }
        }

        String::from_utf8(self.out).map_err(|e| StripError::Encoding(e.to_string()))
    }

    /// Whether the last token completes an operand, making `/` a division
    fn ends_value(&self) -> bool {
        match self.prev {
            Prev::Start | Prev::ControlParen => false,
            Prev::Punct(b) => matches!(b, b')' | b']'),
            Prev::Word(start, end) => !REGEX_PRECEDING_KEYWORDS.contains(&self.src[start..end]),
            Prev::Literal => true,
        }
    }

    fn regex_allowed(&self) -> bool {
        !self.ends_value()
    }

    fn string(&mut self, quote: u8) {
        self.copy(1);
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.copy(2),
                b'\n' => return,
                _ if b == quote => {
                    self.copy(1);
                    return;
                }
                _ => self.copy(1),
            }
        }
    }

    /// Copy template text until the closing backtick or an `${`
    fn template(&mut self) {
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.copy(2),
                b'`' => {
                    self.copy(1);
                    self.prev = Prev::Literal;
                    return;
                }
                b'$' if self.peek(1) == Some(b'{') => {
                    self.copy(2);
                    self.templates.push(self.brace_depth);
                    self.prev = Prev::Punct(b'{');
                    return;
                }
                _ => self.copy(1),
            }
        }
    }

    fn regex_literal(&mut self) {
        self.copy(1);
        let mut in_class = false;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.copy(2),
                b'\n' | b'\r' => return,
                b'[' => {
                    in_class = true;
                    self.copy(1);
                }
                b']' => {
                    in_class = false;
                    self.copy(1);
                }
                b'/' if !in_class => {
                    self.copy(1);
                    while self.peek(0).is_some_and(is_ident_part) {
                        self.copy(1);
                    }
                    return;
                }
                _ => self.copy(1),
            }
        }
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        let end = self.src[start..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
            .map_or(self.src.len(), |i| start + i);
        self.drop_comment(start, end);
    }

    fn block_comment(&mut self) -> StripResult<()> {
        let start = self.pos;
        let end = self.src[start + 2..]
            .windows(2)
            .position(|w| w == b"*/")
            .map(|i| start + 2 + i + 2)
            .ok_or_else(|| StripError::UnterminatedComment {
                line: self.src[..start].iter().filter(|&&b| b == b'\n').count() + 1,
            })?;
        self.drop_comment(start, end);
        Ok(())
    }

    /// Length of the line break at `at`, if one starts there
    fn line_break_len(&self, at: usize) -> Option<usize> {
        match self.src.get(at) {
            Some(b'\r') if self.src.get(at + 1) == Some(&b'\n') => Some(2),
            Some(b'\r') | Some(b'\n') => Some(1),
            _ => None,
        }
    }

    fn push_line_breaks(&mut self, start: usize, end: usize) {
        let breaks = self.src[start..end].iter().filter(|&&b| b == b'\n').count();
        self.out.extend(std::iter::repeat(b'\n').take(breaks));
    }

    fn trim_trailing_blanks(&mut self) {
        while self.out.last().copied().is_some_and(is_blank) {
            self.out.pop();
        }
    }

    /// Remove `src[start..end]` from the output and tidy the surrounding line
    fn drop_comment(&mut self, start: usize, end: usize) {
        let line_start = self
            .out
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let alone_before = self.out[line_start..].iter().all(|&b| is_blank(b));

        let mut after = end;
        while after < self.src.len() && is_blank(self.src[after]) {
            after += 1;
        }
        let line_break = self.line_break_len(after);
        let alone_after = after == self.src.len() || line_break.is_some();

        if self.options.preserve_blank_lines {
            if alone_before && alone_after {
                self.out.truncate(line_start);
            } else if alone_after {
                self.trim_trailing_blanks();
            }
            self.push_line_breaks(start, end);
        }

        match (alone_before, alone_after) {
            (true, true) if !self.options.preserve_blank_lines => {
                self.out.truncate(line_start);
                self.pos = after + line_break.unwrap_or(0);
            }
            (true, true) | (true, false) => self.pos = after,
            (false, true) => {
                self.trim_trailing_blanks();
                self.pos = after;
            }
            (false, false) => {
                let last = self.out.last().copied();
                if last.is_some_and(is_blank) {
                    self.pos = after;
                } else {
                    if let (Some(l), Some(&n)) = (last, self.src.get(end)) {
                        let merges = (is_ident_part(l) && is_ident_part(n))
                            || (l == n && matches!(l, b'+' | b'-' | b'/'));
                        if merges {
                            self.out.push(b' ');
                        }
                    }
                    self.pos = end;
                }
            }
        }
    }
}

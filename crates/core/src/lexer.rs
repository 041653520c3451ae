//! Scanner and token stream.
//!
//! [`lex`] turns document text into a vector of [`Token`]s ending in a
//! single `Eof`; [`TokenStream`] puts a cursor over that vector so the
//! parser can read ahead and back up any number of tokens.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Angle,
    Binary,
    Boolean,
    Comment,
    Delimiter,
    Duration,
    Eof,
    Eol,
    Identifier,
    Keyword,
    Moment,
    Moniker,
    Narrative,
    Note,
    Number,
    Pattern,
    Percentage,
    Probability,
    Quote,
    Resource,
    Symbol,
    Tag,
    Version,
}

impl TokenKind {
    /// The grammar's name for the token rule.
    pub fn rule(self) -> &'static str {
        match self {
            TokenKind::Angle => "ANGLE",
            TokenKind::Binary => "BINARY",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Comment => "COMMENT",
            TokenKind::Delimiter => "DELIMITER",
            TokenKind::Duration => "DURATION",
            TokenKind::Eof => "EOF",
            TokenKind::Eol => "EOL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Moment => "MOMENT",
            TokenKind::Moniker => "MONIKER",
            TokenKind::Narrative => "NARRATIVE",
            TokenKind::Note => "NOTE",
            TokenKind::Number => "NUMBER",
            TokenKind::Pattern => "PATTERN",
            TokenKind::Percentage => "PERCENTAGE",
            TokenKind::Probability => "PROBABILITY",
            TokenKind::Quote => "QUOTE",
            TokenKind::Resource => "RESOURCE",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Tag => "TAG",
            TokenKind::Version => "VERSION",
        }
    }
}

/// 1-based line and column (in characters) of the first character of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} at line {}, column {}",
            self.kind.rule(),
            self.text,
            self.position.line,
            self.position.column
        )
    }
}

// ──────────────────────────────────────────────
// Lexeme patterns
// ──────────────────────────────────────────────

const SCALAR: &str = r"(?:[1-9][0-9]*(?:\.[0-9]+)?|0\.[0-9]+)(?:E[+-]?[1-9][0-9]*)?";
const TIMESPAN: &str = r"(?:0|[1-9][0-9]*(?:\.[0-9]+)?)";

fn real() -> String {
    format!(r"[+-]?(?:e|pi|π|phi|φ|tau|τ|{SCALAR})")
}

fn imaginary() -> String {
    format!(r"(?:{}|[+-])?i", real())
}

/// A lexeme recognizer: one pattern compiled both anchored at the start
/// (for scanning) and anchored at both ends (for decoding).
pub(crate) struct Lexeme {
    prefix: Regex,
    whole: Regex,
}

impl Lexeme {
    fn new(pattern: &str) -> Self {
        Lexeme {
            prefix: Regex::new(&format!("^(?:{pattern})")).expect("lexeme pattern compiles"),
            whole: Regex::new(&format!("^(?:{pattern})$")).expect("lexeme pattern compiles"),
        }
    }

    /// Length in bytes of the lexeme at the start of `text`, if any.
    fn find(&self, text: &str) -> Option<usize> {
        self.prefix.find(text).map(|m| m.end()).filter(|&end| end > 0)
    }

    /// Whether all of `text` is exactly one such lexeme.
    pub(crate) fn matches(&self, text: &str) -> bool {
        self.whole.is_match(text)
    }

    /// Capture groups over all of `text`.
    pub(crate) fn captures<'t>(&self, text: &'t str) -> Option<regex::Captures<'t>> {
        self.whole.captures(text)
    }
}

pub(crate) static ANGLE: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(&format!("~(?:{}|0)", real())));
pub(crate) static BINARY: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(r"'[A-Za-z0-9+/ \n]*'"));
pub(crate) static COMMENT: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(r"(?s)!>\n(?:.*?\n)?[ ]*<!"));
pub(crate) static COMPLEX: Lazy<Lexeme> = Lazy::new(|| {
    Lexeme::new(&format!(
        r"\((?:{real}), (?:{imaginary})\)|\((?:{real})e\^~(?:{real}|0)i\)",
        real = real(),
        imaginary = imaginary()
    ))
});
pub(crate) static DURATION: Lazy<Lexeme> = Lazy::new(|| {
    Lexeme::new(&format!(
        r"~([+-])?P(?:({t})W|(?:({t})Y)?(?:({t})M)?(?:({t})D)?(?:T(?:({t})H)?(?:({t})M)?(?:({t})S)?)?)",
        t = TIMESPAN
    ))
});
pub(crate) static MOMENT: Lazy<Lexeme> = Lazy::new(|| {
    Lexeme::new(concat!(
        r"<([+-])?(0|[1-9][0-9]*)",
        r"(?:-(0[1-9]|1[0-2])",
        r"(?:-(0[1-9]|[12][0-9]|3[01])",
        r"(?:T([01][0-9]|2[0-3])",
        r"(?::([0-5][0-9])",
        r"(?::([0-5][0-9]|6[01])(?:\.([0-9]+))?)?)?)?)?)?>"
    ))
});
pub(crate) static MONIKER: Lazy<Lexeme> =
    Lazy::new(|| Lexeme::new(r"(?:/\p{L}(?:[-+.]?[\p{L}\p{Nd}])*)+"));
pub(crate) static NARRATIVE: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(r#"(?s)">\n(?:.*?\n)?[ ]*<""#));
pub(crate) static NOTE: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(r"! [^\n]*"));
pub(crate) static NUMBER: Lazy<Lexeme> = Lazy::new(|| {
    Lexeme::new(&format!(
        r"[+-]?(?:infinity|∞)|undefined|{}|{}|0",
        imaginary(),
        real()
    ))
});
pub(crate) static PATTERN: Lazy<Lexeme> =
    Lazy::new(|| Lexeme::new(r#"none|any|"(?:\\.|[^"\\\n])+"\?"#));
pub(crate) static PERCENTAGE: Lazy<Lexeme> =
    Lazy::new(|| Lexeme::new(&format!("(?:{}|0)%", real())));
pub(crate) static PROBABILITY: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(r"\.[0-9]+|1\."));
pub(crate) static QUOTE: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(r#""(?:\\.|[^"\\\n])*""#));
pub(crate) static RESOURCE: Lazy<Lexeme> = Lazy::new(|| {
    Lexeme::new(r"<[a-zA-Z][a-zA-Z0-9+\-.]*:(?://[^/\s>]+)?/[^?#>\s]*(?:\?[^#>\s]*)?(?:#[^>\s]*)?>")
});
pub(crate) static SYMBOL: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(r"\$\p{L}[\p{L}\p{Nd}]*"));
pub(crate) static TAG: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(r"#[0-9A-DF-HJ-NP-TV-Z]+"));
pub(crate) static VERSION: Lazy<Lexeme> =
    Lazy::new(|| Lexeme::new(r"v[1-9][0-9]*(?:\.[1-9][0-9]*)*"));
pub(crate) static WORD: Lazy<Lexeme> = Lazy::new(|| Lexeme::new(r"\p{L}[\p{L}\p{Nd}]*"));

pub const KEYWORDS: &[&str] = &[
    "accept", "as", "at", "break", "checkout", "continue", "discard", "do", "each", "from",
    "if", "in", "let", "level", "loop", "matching", "notarize", "on", "post", "publish",
    "reject", "retrieve", "return", "save", "select", "throw", "to", "while", "with",
];

const WORD_DELIMITERS: &[&str] = &["AND", "IS", "MATCHES", "NOT", "OR", "SANS", "XOR"];

/// Longest first, so that `//` wins over `/`.
const DELIMITERS: &[&str] = &[
    "..", ":=", "?=", "+=", "-=", "*=", "/=", "//", "<-", "~", "}", "|", "{", "^", "]", "[",
    "@", ">", "=", "≠", "<", ";", ":", "/", ".", "-", ",", "+", "*", ")", "(", "&",
];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// A word-like lexeme only counts when it is not the prefix of a longer word.
fn bounded(lexeme: &Lexeme, rest: &str) -> Option<usize> {
    lexeme
        .find(rest)
        .filter(|&end| !rest[end..].starts_with(is_word_char))
}

// ──────────────────────────────────────────────
// Scanner
// ──────────────────────────────────────────────

/// Scan a whole document. The returned vector always ends with `Eof`.
pub fn lex(source: &str) -> Result<Vec<Token>, ScanError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut offset = 0usize;
    let mut line: u32 = 1;
    let mut column: u32 = 1;

    while offset < source.len() {
        let rest = &source[offset..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if c == ' ' || c == '\t' || c == '\r' {
            offset += c.len_utf8();
            column += 1;
            continue;
        }

        let position = Position { line, column };
        let previous = tokens.last().map(|t| t.kind);
        let (kind, length) = match next_lexeme(rest, previous) {
            Some(found) => found,
            None => {
                return Err(ScanError {
                    position,
                    snippet: rest.lines().next().unwrap_or_default().to_owned(),
                })
            }
        };
        let text = &rest[..length];
        tokens.push(Token {
            kind,
            text: text.to_owned(),
            position,
        });

        for ch in text.chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        offset += length;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        position: Position { line, column },
    });
    Ok(tokens)
}

/// Classify the lexeme at the start of `rest`. The order of the attempts
/// resolves overlaps between lexemes that share a first character.
fn next_lexeme(rest: &str, previous: Option<TokenKind>) -> Option<(TokenKind, usize)> {
    if rest.starts_with('\n') {
        return Some((TokenKind::Eol, 1));
    }

    let attempts: [(TokenKind, &Lazy<Lexeme>, bool); 7] = [
        (TokenKind::Comment, &COMMENT, false),
        (TokenKind::Note, &NOTE, false),
        (TokenKind::Narrative, &NARRATIVE, false),
        (TokenKind::Pattern, &PATTERN, true),
        (TokenKind::Quote, &QUOTE, false),
        (TokenKind::Binary, &BINARY, false),
        (TokenKind::Moment, &MOMENT, false),
    ];
    for (kind, lexeme, needs_boundary) in attempts {
        let found = if needs_boundary {
            bounded(lexeme, rest)
        } else {
            lexeme.find(rest)
        };
        if let Some(end) = found {
            return Some((kind, end));
        }
    }

    if let Some(end) = RESOURCE.find(rest) {
        return Some((TokenKind::Resource, end));
    }
    if let Some(end) = bounded(&DURATION, rest) {
        return Some((TokenKind::Duration, end));
    }
    if let Some(end) = bounded(&ANGLE, rest) {
        return Some((TokenKind::Angle, end));
    }
    if let Some(end) = PERCENTAGE.find(rest) {
        return Some((TokenKind::Percentage, end));
    }
    if let Some(end) = PROBABILITY.find(rest) {
        let after = &rest[end..];
        // `1..5` is a range of numbers, not the probability `1.`
        let dotted = rest.starts_with("1.") && after.starts_with('.');
        if !dotted && !after.starts_with(is_word_char) {
            return Some((TokenKind::Probability, end));
        }
    }
    // `f(1, 2i)` is a call with two arguments, not a complex number.
    if previous != Some(TokenKind::Identifier) {
        if let Some(end) = COMPLEX.find(rest) {
            return Some((TokenKind::Number, end));
        }
    }
    if let Some(end) = bounded(&NUMBER, rest) {
        return Some((TokenKind::Number, end));
    }
    if let Some(end) = bounded(&VERSION, rest) {
        return Some((TokenKind::Version, end));
    }
    if let Some(end) = WORD.find(rest) {
        let word = &rest[..end];
        let kind = if KEYWORDS.contains(&word) {
            TokenKind::Keyword
        } else if word == "true" || word == "false" {
            TokenKind::Boolean
        } else if word == "none" || word == "any" {
            TokenKind::Pattern
        } else if WORD_DELIMITERS.contains(&word) {
            TokenKind::Delimiter
        } else {
            TokenKind::Identifier
        };
        return Some((kind, end));
    }
    if let Some(end) = SYMBOL.find(rest) {
        return Some((TokenKind::Symbol, end));
    }
    if let Some(end) = bounded(&TAG, rest) {
        return Some((TokenKind::Tag, end));
    }
    if let Some(end) = MONIKER.find(rest) {
        return Some((TokenKind::Moniker, end));
    }
    DELIMITERS
        .iter()
        .find(|d| rest.starts_with(*d))
        .map(|d| (TokenKind::Delimiter, d.len()))
}

// ──────────────────────────────────────────────
// Token stream
// ──────────────────────────────────────────────

/// Cursor over a materialised token buffer. Reading past the end keeps
/// returning the final `Eof`; every read can be undone.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Number of tokens read so far, possibly past the end.
    cursor: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let position = tokens
                .last()
                .map(|t| t.position)
                .unwrap_or(Position { line: 1, column: 1 });
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                position,
            });
        }
        TokenStream { tokens, cursor: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    /// Read the next token.
    pub fn next(&mut self) -> &Token {
        let index = self.cursor.min(self.tokens.len() - 1);
        self.cursor += 1;
        &self.tokens[index]
    }

    /// The token `next` would return, without reading it.
    pub fn peek(&self) -> &Token {
        self.current()
    }

    /// Undo one `next`.
    pub fn push_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn mark(&self) -> usize {
        self.cursor
    }

    /// Undo every read made since `mark` was taken.
    pub fn reset(&mut self, mark: usize) {
        self.cursor = mark;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        lex(source).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn scans_numeric_spellings() {
        for text in ["0", "5", "-1.5", "1E-7", "pi", "π", "-τ", "e", "i", "-i", "πi", "2.5i", "∞", "-infinity", "undefined"] {
            assert_eq!(kinds(text), vec![TokenKind::Number, TokenKind::Eof], "{}", text);
        }
        assert_eq!(kinds("(1, -2i)"), vec![TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("(2e^~πi)"), vec![TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn numeric_words_do_not_swallow_identifiers() {
        assert_eq!(kinds("pipe"), vec![TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds("index"), vec![TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds("each"), vec![TokenKind::Keyword, TokenKind::Eof]);
        assert_eq!(kinds("if"), vec![TokenKind::Keyword, TokenKind::Eof]);
    }

    #[test]
    fn call_arguments_are_not_complex_numbers() {
        assert_eq!(
            texts("f(1, 2i)"),
            vec!["f", "(", "1", ",", "2i", ")", ""]
        );
    }

    #[test]
    fn range_dots_split_from_numbers_and_probabilities() {
        assert_eq!(texts("[1..5]"), vec!["[", "1", "..", "5", "]", ""]);
        assert_eq!(texts("[.25...75]"), vec!["[", ".25", "..", ".75", "]", ""]);
        assert_eq!(kinds("1."), vec![TokenKind::Probability, TokenKind::Eof]);
        assert_eq!(kinds("1.5"), vec![TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn scans_element_literals() {
        let cases = [
            ("~π", TokenKind::Angle),
            ("true", TokenKind::Boolean),
            ("~P3DT4H", TokenKind::Duration),
            ("~-P2W", TokenKind::Duration),
            ("<2024-02-29T13:05:59.5>", TokenKind::Moment),
            ("<-44>", TokenKind::Moment),
            ("none", TokenKind::Pattern),
            (r#""ab+"?"#, TokenKind::Pattern),
            ("50%", TokenKind::Percentage),
            (".5", TokenKind::Probability),
            ("<https://google.com/>", TokenKind::Resource),
            ("$name", TokenKind::Symbol),
            ("#ABC123", TokenKind::Tag),
            ("'AAEC'", TokenKind::Binary),
            ("/bali/types/Component", TokenKind::Moniker),
            (r#""hi \"there\"""#, TokenKind::Quote),
            ("v1.2.3", TokenKind::Version),
        ];
        for (text, kind) in cases {
            assert_eq!(kinds(text), vec![kind, TokenKind::Eof], "{}", text);
        }
    }

    #[test]
    fn scans_multiline_lexemes_and_tracks_lines() {
        let source = "[\n    \">\n        line\n    <\"\n    ! note\n]";
        let tokens = lex(source).unwrap();
        let narrative = tokens.iter().find(|t| t.kind == TokenKind::Narrative).unwrap();
        assert_eq!(narrative.position, Position { line: 2, column: 5 });
        let note = tokens.iter().find(|t| t.kind == TokenKind::Note).unwrap();
        assert_eq!(note.text, "! note");
        assert_eq!(note.position.line, 5);
        assert_eq!(tokens.last().unwrap().position.line, 6);
    }

    #[test]
    fn scans_operators() {
        assert_eq!(
            texts("$x := a // b ≠ c AND NOT d <- e"),
            vec!["$x", ":=", "a", "//", "b", "≠", "c", "AND", "NOT", "d", "<-", "e", ""]
        );
    }

    #[test]
    fn unrecognized_input_is_a_scan_error() {
        let error = lex("[1, `]").unwrap_err();
        assert_eq!(error.position, Position { line: 1, column: 5 });
        assert_eq!(error.snippet, "`]");
    }

    #[test]
    fn stream_returns_eof_forever_and_backs_up() {
        let mut stream = TokenStream::new(lex("a").unwrap());
        assert_eq!(stream.next().kind, TokenKind::Identifier);
        assert_eq!(stream.next().kind, TokenKind::Eof);
        assert_eq!(stream.next().kind, TokenKind::Eof);
        stream.push_back();
        stream.push_back();
        assert_eq!(stream.next().kind, TokenKind::Eof);
        stream.push_back();
        stream.push_back();
        assert_eq!(stream.next().kind, TokenKind::Identifier);

        let mark = stream.mark();
        stream.next();
        stream.next();
        stream.reset(mark);
        assert_eq!(stream.peek().kind, TokenKind::Eof);
    }
}

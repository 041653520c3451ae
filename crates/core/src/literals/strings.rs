use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;

use crate::error::CodecError;
use crate::lexer::{BINARY, MONIKER, NARRATIVE, QUOTE, VERSION};
use crate::ordinal::Indexed;

// ──────────────────────────────────────────────
// Block text
// ──────────────────────────────────────────────

/// Interior lines of a two-line bracketed block such as a narrative or a
/// comment. The closing line's indentation (its length minus the two
/// delimiter characters) plus `extra` leading spaces are stripped from
/// each interior line; shorter lines lose only the spaces they have.
pub(crate) fn block_lines(text: &str, extra: usize) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let Some((closing, rest)) = lines.split_last() else {
        return Vec::new();
    };
    let interior = rest.get(1..).unwrap_or_default();
    let strip = closing.chars().count().saturating_sub(2) + extra;
    interior
        .iter()
        .map(|line| {
            let leading = line.chars().take(strip).take_while(|&c| c == ' ').count();
            line[leading..].to_owned()
        })
        .collect()
}

// ──────────────────────────────────────────────
// Binary
// ──────────────────────────────────────────────

/// Opaque bytes, written in base 64.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Binary(pub Vec<u8>);

impl Binary {
    /// The base 64 text without delimiters or wrapping.
    pub fn encoded(&self) -> String {
        STANDARD_NO_PAD.encode(&self.0)
    }
}

impl Indexed for Binary {
    type Item<'a> = u8;

    fn size(&self) -> usize {
        self.0.len()
    }

    fn at_offset(&self, offset: usize) -> u8 {
        self.0[offset]
    }
}

/// Unwrapped form; the formatter wraps long payloads.
impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.encoded())
    }
}

impl FromStr for Binary {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("binary", text);
        if !BINARY.matches(text) {
            return Err(invalid());
        }
        let payload: String = text[1..text.len() - 1]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        STANDARD_NO_PAD
            .decode(payload)
            .map(Binary)
            .map_err(|_| invalid())
    }
}

// ──────────────────────────────────────────────
// Bytecode
// ──────────────────────────────────────────────

/// A sequence of 16-bit instructions, written in base 16.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytecode(pub Vec<u16>);

impl Indexed for Bytecode {
    type Item<'a> = u16;

    fn size(&self) -> usize {
        self.0.len()
    }

    fn at_offset(&self, offset: usize) -> u16 {
        self.0[offset]
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0
            .iter()
            .try_for_each(|instruction| write!(f, "{:04X}", instruction))
    }
}

impl FromStr for Bytecode {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("bytecode", text);
        if text.len() % 4 != 0 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        (0..text.len())
            .step_by(4)
            .map(|start| u16::from_str_radix(&text[start..start + 4], 16).map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()
            .map(Bytecode)
    }
}

// ──────────────────────────────────────────────
// Moniker
// ──────────────────────────────────────────────

/// A path of names such as `/bali/types/Component`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Moniker(Vec<String>);

impl Moniker {
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl Indexed for Moniker {
    type Item<'a> = &'a str;

    fn size(&self) -> usize {
        self.0.len()
    }

    fn at_offset(&self, offset: usize) -> &str {
        &self.0[offset]
    }
}

impl fmt::Display for Moniker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|name| write!(f, "/{}", name))
    }
}

impl FromStr for Moniker {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !MONIKER.matches(text) {
            return Err(CodecError::new("moniker", text));
        }
        Ok(Moniker(text[1..].split('/').map(str::to_owned).collect()))
    }
}

// ──────────────────────────────────────────────
// Narrative
// ──────────────────────────────────────────────

/// Multi-line free text. Interior indentation is relative to the
/// delimiters, so the same narrative can be nested at any depth.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Narrative(String);

impl Narrative {
    /// Fails when an interior line would read as the closing delimiter.
    pub fn new(text: impl Into<String>) -> Result<Self, CodecError> {
        let text = text.into();
        if text.split('\n').any(|line| line.trim_start_matches(' ').starts_with("<\"")) {
            return Err(CodecError::new("narrative", text));
        }
        Ok(Narrative(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.split('\n')
    }
}

impl Indexed for Narrative {
    type Item<'a> = char;

    fn size(&self) -> usize {
        self.0.chars().count()
    }

    fn at_offset(&self, offset: usize) -> char {
        self.0.chars().nth(offset).unwrap_or_default()
    }
}

/// Top-level layout, with interior lines one level deep.
impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\">")?;
        for line in self.lines().filter(|_| !self.0.is_empty()) {
            f.write_str("\n")?;
            if !line.is_empty() {
                write!(f, "{}{}", crate::INDENTATION, line)?;
            }
        }
        f.write_str("\n<\"")
    }
}

impl FromStr for Narrative {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !NARRATIVE.matches(text) {
            return Err(CodecError::new("narrative", text));
        }
        let lines = block_lines(text, crate::INDENTATION.len());
        Ok(Narrative(lines.join("\n")))
    }
}

// ──────────────────────────────────────────────
// Quote
// ──────────────────────────────────────────────

/// A single-line string. Holds the decoded text; escapes are applied on
/// the way in and out.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quote(String);

impl Quote {
    pub fn new(text: impl Into<String>) -> Self {
        Quote(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The only character of a one-character quote.
    pub fn as_rune(&self) -> Option<char> {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl Indexed for Quote {
    type Item<'a> = char;

    fn size(&self) -> usize {
        self.0.chars().count()
    }

    fn at_offset(&self, offset: usize) -> char {
        self.0.chars().nth(offset).unwrap_or_default()
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        write_escaped(f, &self.0)?;
        f.write_str("\"")
    }
}

impl FromStr for Quote {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !QUOTE.matches(text) {
            return Err(CodecError::new("quote", text));
        }
        unescape(&text[1..text.len() - 1])
            .map(Quote)
            .ok_or_else(|| CodecError::new("quote", text))
    }
}

pub(crate) fn write_escaped(f: &mut impl fmt::Write, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\u{7}' => f.write_str("\\a")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{b}' => f.write_str("\\v")?,
            c if c.is_control() => write!(f, "\\u{:04X}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

fn unescape(text: &str) -> Option<String> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            'u' => hex_char(&mut chars, 4)?,
            'U' => hex_char(&mut chars, 8)?,
            _ => return None,
        };
        result.push(decoded);
    }
    Some(result)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}

// ──────────────────────────────────────────────
// Version
// ──────────────────────────────────────────────

/// Dotted version ordinals such as `v1.2.3`; every ordinal is at least 1.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(Vec<u32>);

impl Version {
    pub fn ordinals(&self) -> &[u32] {
        &self.0
    }
}

impl Indexed for Version {
    type Item<'a> = u32;

    fn size(&self) -> usize {
        self.0.len()
    }

    fn at_offset(&self, offset: usize) -> u32 {
        self.0[offset]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("v")?;
        for (i, ordinal) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", ordinal)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("version", text);
        if !VERSION.matches(text) {
            return Err(invalid());
        }
        text[1..]
            .split('.')
            .map(|ordinal| ordinal.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()
            .map(Version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn block_lines_strip_closing_indentation() {
        let text = "\">\n        one\n          two\n\n    <\"";
        assert_eq!(block_lines(text, 4), vec!["one", "  two", ""]);
        let comment = "!>\n    first\n  short\n    <!";
        assert_eq!(block_lines(comment, 0), vec!["first", "short"]);
        assert!(block_lines("!>\n<!", 0).is_empty());
    }

    #[test]
    fn narratives_are_relative_to_their_delimiters() {
        let nested: Narrative = "\">\n        abcd本1234\n    <\"".parse().unwrap();
        assert_eq!(nested.as_str(), "abcd本1234");
        assert_eq!(nested.to_string(), "\">\n    abcd本1234\n<\"");
        assert_eq!(nested.size(), 10);
        assert_eq!(nested.item(2), Ok('b'));
        assert_eq!(nested.item(-1), Ok('4'));
        assert_eq!(nested.index_of(&'本'), 5);
    }

    #[test]
    fn narratives_reject_closing_delimiter_lines() {
        assert!(Narrative::new("a\n<\" b").is_err());
        assert!(Narrative::new("a\n    <\"").is_err());
        let error = Narrative::new("<\"").unwrap_err();
        assert_eq!(error, CodecError::new("narrative", "<\""));

        let quoted = Narrative::new("a \"<\" b").unwrap();
        assert_eq!(quoted.to_string().parse::<Narrative>().unwrap(), quoted);
    }

    #[test]
    fn empty_narratives_have_no_interior_lines() {
        let empty: Narrative = "\">\n\n<\"".parse().unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "\">\n<\"");
        assert_eq!("\">\n<\"".parse::<Narrative>().unwrap(), empty);
    }

    #[rstest]
    #[case(r#""""#, "")]
    #[case(r#""plain""#, "plain")]
    #[case(r#""tab\there""#, "tab\there")]
    #[case(r#""say \"hi\"""#, "say \"hi\"")]
    #[case(r#""é\U0001F600""#, "é😀")]
    #[case(r#""back\\slash""#, "back\\slash")]
    fn quotes_decode_escapes(#[case] text: &str, #[case] decoded: &str) {
        let quote: Quote = text.parse().unwrap();
        assert_eq!(quote.as_str(), decoded);
    }

    #[test]
    fn quotes_encode_canonical_escapes() {
        assert_eq!(Quote::new("é\u{1}\n\"").to_string(), r#""é\u0001\n\"""#);
        assert!(r#""\q""#.parse::<Quote>().is_err());
        assert_eq!(Quote::new("x").as_rune(), Some('x'));
        assert_eq!(Quote::new("xy").as_rune(), None);
    }

    #[test]
    fn binaries_ignore_layout_whitespace() {
        let binary: Binary = "'\n    AAEC\n    Aw'".parse().unwrap();
        assert_eq!(binary.0, vec![0, 1, 2, 3]);
        assert_eq!(binary.to_string(), "'AAECAw'");
        assert_eq!(binary.item(-1), Ok(3));
        assert!("'A'".parse::<Binary>().is_err());
    }

    #[test]
    fn monikers_and_versions_split_into_parts() {
        let moniker: Moniker = "/bali/types/Component".parse().unwrap();
        assert_eq!(moniker.item(-1), Ok("Component"));
        assert_eq!(moniker.to_string(), "/bali/types/Component");

        let version: Version = "v1.12.3".parse().unwrap();
        assert_eq!(version.ordinals(), &[1, 12, 3]);
        assert_eq!(version.items(1, 2), Ok(vec![1, 12]));
        assert!("v1.0".parse::<Version>().is_err());
        assert!(version < "v1.13".parse::<Version>().unwrap());
    }

    #[test]
    fn bytecode_uses_four_hex_digits_per_instruction() {
        let bytecode: Bytecode = "000AFFFF".parse().unwrap();
        assert_eq!(bytecode.0, vec![0x000A, 0xFFFF]);
        assert_eq!(bytecode.to_string(), "000AFFFF");
        assert!("ABC".parse::<Bytecode>().is_err());
    }

    proptest! {
        #[test]
        fn quotes_survive_encoding(text in "\\PC*") {
            let quote = Quote::new(text.clone());
            prop_assert_eq!(quote.to_string().parse::<Quote>().unwrap(), quote);
        }

        #[test]
        fn binaries_survive_encoding(bytes in proptest::collection::vec(any::<u8>(), 0..200)) {
            let binary = Binary(bytes);
            prop_assert_eq!(binary.to_string().parse::<Binary>().unwrap(), binary);
        }
    }
}

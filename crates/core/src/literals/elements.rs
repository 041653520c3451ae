use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use regex::Regex;
use url::Url;

use crate::error::CodecError;
use crate::lexer::{PATTERN, RESOURCE, SYMBOL, TAG};

// ──────────────────────────────────────────────
// Pattern
// ──────────────────────────────────────────────

/// A string matcher: nothing, everything, or a regular expression.
#[derive(Debug, Clone)]
pub enum Pattern {
    None,
    Any,
    Regex(Regex),
}

impl Pattern {
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Pattern::None => false,
            Pattern::Any => true,
            Pattern::Regex(regex) => regex.is_match(text),
        }
    }

    /// The regular expression source, if there is one.
    pub fn as_regex_str(&self) -> Option<&str> {
        match self {
            Pattern::Regex(regex) => Some(regex.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::None, Pattern::None) | (Pattern::Any, Pattern::Any) => true,
            (Pattern::Regex(a), Pattern::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        if let Pattern::Regex(regex) = self {
            regex.as_str().hash(state);
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::None => f.write_str("none"),
            Pattern::Any => f.write_str("any"),
            Pattern::Regex(regex) => write!(f, "\"{}\"?", regex.as_str()),
        }
    }
}

impl FromStr for Pattern {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "none" => Ok(Pattern::None),
            "any" => Ok(Pattern::Any),
            _ if PATTERN.matches(text) => Regex::new(&text[1..text.len() - 2])
                .map(Pattern::Regex)
                .map_err(|_| CodecError::new("pattern", text)),
            _ => Err(CodecError::new("pattern", text)),
        }
    }
}

// ──────────────────────────────────────────────
// Resource
// ──────────────────────────────────────────────

/// A URL in angle brackets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resource(Url);

impl Resource {
    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl From<Url> for Resource {
    fn from(url: Url) -> Self {
        Resource(url)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl FromStr for Resource {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("resource", text);
        if !RESOURCE.matches(text) {
            return Err(invalid());
        }
        Url::parse(&text[1..text.len() - 1])
            .map(Resource)
            .map_err(|_| invalid())
    }
}

// ──────────────────────────────────────────────
// Symbol
// ──────────────────────────────────────────────

/// A named placeholder such as `$name`. Holds the name without the `$`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: &str) -> Result<Self, CodecError> {
        format!("${name}").parse()
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !SYMBOL.matches(text) {
            return Err(CodecError::new("symbol", text));
        }
        Ok(Symbol(text[1..].to_owned()))
    }
}

// ──────────────────────────────────────────────
// Tag
// ──────────────────────────────────────────────

/// An opaque identifier written in base 32 such as `#BCASYZR1MC2J`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    /// The base 32 digits without the `#`.
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for Tag {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !TAG.matches(text) {
            return Err(CodecError::new("tag", text));
        }
        Ok(Tag(text[1..].to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("none")]
    #[case("any")]
    #[case(r#""ab+c"?"#)]
    #[case(r#""[0-9]{3}-[0-9]{4}"?"#)]
    fn patterns_round_trip(#[case] text: &str) {
        let pattern: Pattern = text.parse().unwrap();
        assert_eq!(pattern.to_string(), text);
        assert_eq!(text.parse::<Pattern>().unwrap(), pattern);
    }

    #[test]
    fn patterns_match_strings() {
        let pattern: Pattern = r#""^ab+c$"?"#.parse().unwrap();
        assert!(pattern.is_match("abbbc"));
        assert!(!pattern.is_match("ac"));
        assert!(Pattern::Any.is_match(""));
        assert!(!Pattern::None.is_match(""));
        assert!(r#""(unclosed"?"#.parse::<Pattern>().is_err());
    }

    #[test]
    fn resources_wrap_urls() {
        let resource: Resource = "<https://google.com/search?q=bali#top>".parse().unwrap();
        assert_eq!(resource.url().host_str(), Some("google.com"));
        assert_eq!(resource.to_string(), "<https://google.com/search?q=bali#top>");
        assert!("<not a url>".parse::<Resource>().is_err());
    }

    #[test]
    fn symbols_and_tags_drop_their_sigils() {
        let symbol: Symbol = "$customer".parse().unwrap();
        assert_eq!(symbol.name(), "customer");
        assert_eq!(Symbol::new("customer").unwrap(), symbol);
        assert!(Symbol::new("9lives").is_err());

        let tag: Tag = "#BCASYZR1MC2J".parse().unwrap();
        assert_eq!(tag.digits(), "BCASYZR1MC2J");
        assert_eq!(tag.to_string(), "#BCASYZR1MC2J");
        assert!("#abc".parse::<Tag>().is_err());
    }
}

use serde::Deserialize;

/// Caller-tunable parser settings. The canonical layout itself is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Accept newlines between the document's component and the end of input.
    pub allow_trailing_newlines: bool,
    /// Deepest nesting of components, expressions and blocks before parsing
    /// fails. The default fits a 2 MiB thread stack in debug builds.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            allow_trailing_newlines: true,
            max_depth: 32,
        }
    }
}

impl ParseOptions {
    /// Load options from JSON; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let options = ParseOptions::from_json(r#"{ "max_depth": 16 }"#).unwrap();
        assert_eq!(options.max_depth, 16);
        assert!(options.allow_trailing_newlines);
        assert_eq!(ParseOptions::from_json("{}").unwrap(), ParseOptions::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(ParseOptions::from_json(r#"{ "indent": 2 }"#).is_err());
    }
}

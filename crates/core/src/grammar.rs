//! The notation's grammar, rule name to production, used to explain parse
//! failures. Lowercase rules are parser productions, UPPERCASE rules are
//! scanner lexemes.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static GRAMMAR: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| RULES.iter().copied().collect());

/// Look up the production text for a rule name such as `"$onClause"`.
pub fn production(rule: &str) -> Option<&'static str> {
    GRAMMAR.get(rule).copied()
}

/// Build the "Was expecting" part of a diagnostic: the expected symbol
/// followed by each enclosing rule and its production.
pub fn expecting(expected: &str, rules: &[&'static str]) -> String {
    let mut message = format!("Was expecting '{}' from:\n", expected);
    for rule in rules {
        message.push_str(&format!("  {}: {}\n\n", rule, production(rule).unwrap_or("")));
    }
    message
}

const RULES: &[(&str, &str)] = &[
    ("$acceptClause", r##""accept" message"##),
    ("$annotation", r##"NOTE | COMMENT"##),
    ("$arguments", r##""(" [expression {"," expression}] ")""##),
    ("$arithmetic", r##"expression ("*" | "/" | "//" | "+" | "-") expression"##),
    ("$assignClause", r##"
	letClause         ! ["let" recipient (":=" | "?=" | "+=" | "-=" | "*=" | "/=")] expression"##),
    ("$association", r##"key ":" value"##),
    ("$associations", r##"
    association {"," association} |
    EOL <association EOL> |
    ":"  ! No associations."##),
    ("$attribute", r##"variable indices"##),
    ("$bag", r##"expression"##),
    ("$breakClause", r##""break" "loop""##),
    ("$catalog", r##""[" associations "]""##),
    ("$chaining", r##"expression "&" expression"##),
    ("$checkoutClause", r##""checkout" recipient ["at" "level" ordinal] "from" moniker"##),
    ("$collection", r##"catalog | list | range"##),
    ("$comparison", r##"expression ("<" | "=" | ">" | "≠" | "IS" | "MATCHES") expression"##),
    ("$complement", r##""NOT" expression"##),
    ("$component", r##"entity [context] [NOTE]"##),
    ("$composite", r##"expression"##),
    ("$condition", r##"expression"##),
    ("$context", r##""(" parameters ")""##),
    ("$continueClause", r##""continue" "loop""##),
    ("$controlClause", r##"
	ifClause       |  ! "if" condition "do" procedure
	selectClause   |  ! "select" target <"matching" pattern "do" procedure>
	whileClause    |  ! "while" condition "do" procedure
	withClause     |  ! "with" "each" value "in" sequence "do" procedure
	continueClause |  ! "continue" "loop"
	breakClause    |  ! "break" "loop"
	returnClause   |  ! "return" result
	throwClause       ! "throw" exception"##),
    ("$dereference", r##""@" expression"##),
    ("$discardClause", r##""discard" document"##),
    ("$document", r##"expression"##),
    ("$documentClause", r##"
	checkoutClause |  ! "checkout" recipient ["at" "level" ordinal] "from" moniker
	saveClause     |  ! "save" document "as" recipient
	discardClause  |  ! "discard" document
	notarizeClause    ! "notarize" document "as" moniker"##),
    ("$element", r##"
    ANGLE | BOOLEAN | DURATION | MOMENT | NUMBER | PATTERN |
    PERCENTAGE | PROBABILITY | RESOURCE | SYMBOL | TAG"##),
    ("$entity", r##"element | string | collection | procedure"##),
    ("$letClause", r##"["let" recipient (":=" | "?=" | "+=" | "-=" | "*=" | "/=")] expression"##),
    ("$event", r##"expression"##),
    ("$exception", r##"expression"##),
    ("$exponential", r##"expression "^" expression"##),
    ("$expression", r##"
    component   |  ! entity [context] [NOTE]
    intrinsic   |  ! function arguments
    variable    |  ! IDENTIFIER
    precedence  |  ! "(" expression ")"
    dereference |  ! "@" expression
    invocation  |  ! target ("." | "<-") method arguments
    item        |  ! composite indices
    chaining    |  ! expression "&" expression
    exponential |  ! expression "^" expression
    inversion   |  ! ("-" | "/" | "*") expression
    arithmetic  |  ! expression ("*" | "/" | "//" | "+" | "-") expression
    magnitude   |  ! "|" expression "|"
    comparison  |  ! expression ("<" | "=" | ">" | "≠" | "IS" | "MATCHES") expression
    complement  |  ! "NOT" expression
    logical        ! expression ("AND" | "SANS" | "XOR" | "OR") expression"##),
    ("$function", r##"IDENTIFIER"##),
    ("$ifClause", r##""if" condition "do" procedure"##),
    ("$indices", r##""[" expression {"," expression} "]""##),
    ("$intrinsic", r##"function arguments"##),
    ("$inversion", r##"("-" | "/" | "*") expression"##),
    ("$invocation", r##"target ("." | "<-") method arguments"##),
    ("$item", r##"composite indices"##),
    ("$key", r##"primitive"##),
    ("$list", r##""[" values "]""##),
    ("$logical", r##"expression ("AND" | "SANS" | "XOR" | "OR") expression"##),
    ("$magnitude", r##""|" expression "|""##),
    ("$mainClause", r##"
	assignClause   |
	controlClause  |
	documentClause |
	messageClause"##),
    ("$message", r##"expression"##),
    ("$messageClause", r##"
	postClause     |  ! "post" message "to" bag
	retrieveClause |  ! "retrieve" recipient "from" bag
	acceptClause   |  ! "accept" message
	rejectClause   |  ! "reject" message
	publishClause     ! "publish" event"##),
    ("$method", r##"IDENTIFIER"##),
    ("$moniker", r##"expression"##),
    ("$name", r##"SYMBOL"##),
    ("$notarizeClause", r##""notarize" document "as" moniker"##),
    ("$onClause", r##""on" "$exception" <"matching" pattern "do" procedure>"##),
    ("$ordinal", r##"expression"##),
    ("$parameter", r##"name ":" value"##),
    ("$parameters", r##"
    parameter {"," parameter} |
    EOL <parameter EOL>  ! At least one parameter is required."##),
    ("$pattern", r##"expression"##),
    ("$postClause", r##""post" message "to" bag"##),
    ("$precedence", r##""(" expression ")""##),
    ("$primitive", r##"element | string"##),
    ("$procedure", r##""{" statements "}""##),
    ("$publishClause", r##""publish" event"##),
    ("$range", r##"( "[" | "(" ) [primitive] ".." [primitive] ( ")" | "]" )"##),
    ("$recipient", r##"name | attribute"##),
    ("$rejectClause", r##""reject" message"##),
    ("$result", r##"expression"##),
    ("$retrieveClause", r##""retrieve" recipient "from" bag"##),
    ("$returnClause", r##""return" result"##),
    ("$saveClause", r##""save" document "as" recipient"##),
    ("$segment", r##"SYMBOL"##),
    ("$selectClause", r##""select" target <"matching" pattern "do" procedure>"##),
    ("$sequence", r##"expression"##),
    ("$source", r##"component EOF  ! EOF is the end-of-file marker."##),
    ("$statement", r##"[annotation EOL] [mainClause] [onClause] [NOTE]"##),
    ("$statements", r##"
    statement {";" statement} |
    EOL {(annotation | statement) EOL} |
    ! An empty procedure."##),
    ("$string", r##"BINARY | MONIKER | NARRATIVE | QUOTE | VERSION"##),
    ("$target", r##"expression"##),
    ("$throwClause", r##""throw" exception"##),
    ("$value", r##"component"##),
    ("$values", r##"
    component {"," component} |
    EOL <component EOL>       |
    ! No components."##),
    ("$variable", r##"IDENTIFIER"##),
    ("$whileClause", r##""while" condition "do" procedure"##),
    ("$withClause", r##""with" "each" segment "in" sequence "do" procedure"##),
    ("$ANGLE", r##""~" (REAL | ZERO)"##),
    ("$ANY", r##""any""##),
    ("$AUTHORITY", r##"<~"/">"##),
    ("$BINARY", r##""'" {BASE64 | SPACE | EOL} "'""##),
    ("$BOOLEAN", r##""false" | "true""##),
    ("$COMMENT", r##""!>" EOL  {COMMENT | ~"<!"} EOL {SPACE} "<!""##),
    ("$DATES", r##"[TIMESPAN "Y"] [TIMESPAN "M"] [TIMESPAN "D"]"##),
    ("$DAY", r##""0".."2" "1".."9" | "3" "0".."1""##),
    ("$DELIMITER", r##"
    "~" | "}" | "|" | "{" | "^" | "]" | "[" | "@" | "?=" | ">" | "=" | "≠" | "<-" | "<" |
	";" | ":=" | ":" | "/=" | "//" | "/" | ".." | "." | "-=" | "-" | "," | "+=" | "+" |
	"*=" | "*" | ")" | "(" | "&" | "XOR" | "SANS" | "OR" | "NOT" | "MATCHES" | "IS" | "AND""##),
    ("$DURATION", r##""~" [SIGN] "P" (WEEKS | DATES [TIMES])"##),
    ("$E", r##""e""##),
    ("$EOL", r##""\n""##),
    ("$ESCAPE", r##"'\' ('\' | 'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '"' | "'" | UNICODE)"##),
    ("$EXPONENT", r##""E" [SIGN] ORDINAL"##),
    ("$FRACTION", r##""." <"0".."9">"##),
    ("$FRAGMENT", r##"{~">"}"##),
    ("$HOUR", r##""0".."1" "0".."9" | "2" "0".."3""##),
    ("$IDENTIFIER", r##"LETTER {LETTER | DIGIT}"##),
    ("$IMAGINARY", r##" [SIGN | REAL] "i""##),
    ("$INFINITY", r##""infinity" | "∞""##),
    ("$KEYWORD", r##"
    "with" | "while" | "to" | "throw" | "select" | "save" | "return" | "retrieve" | "reject" |
	"publish" | "post" | "on" | "notarize" | "matching" | "loop" | "level" | "let" | "in" | "if" |
	"from" | "each" | "do" | "discard" | "continue" | "checkout" | "break" | "at" | "as" | "accept""##),
    ("$MINUTE", r##""0".."5" "0".."9""##),
    ("$MOMENT", r##""<" [SIGN] YEAR ["-" MONTH ["-" DAY ["T" HOUR [":" MINUTE [":" SECOND [FRACTION]]]]]] ">""##),
    ("$MONIKER", r##"<"/" NAME>"##),
    ("$MONTH", r##""0" "1".."9" | "1" "0".."2""##),
    ("$NAME", r##"LETTER {[SEPARATOR] (LETTER | DIGIT)}"##),
    ("$NARRATIVE", r##"'">' EOL {NARRATIVE | ~'<"'} EOL {SPACE} '<"'"##),
    ("$NONE", r##""none""##),
    ("$NOTE", r##""! " {~EOL}"##),
    ("$NUMBER", r##"INFINITY | IMAGINARY | REAL | ZERO | UNDEFINED | "(" (RECTANGULAR | POLAR) ")""##),
    ("$ONE", r##""1.""##),
    ("$ORDINAL", r##""1".."9" {"0".."9"}"##),
    ("$PATH", r##"{~("?" | "#" | ">")}"##),
    ("$PATTERN", r##"NONE | REGEX | ANY"##),
    ("$PERCENTAGE", r##"(REAL | ZERO) "%""##),
    ("$PHI", r##""phi" | "φ""##),
    ("$PI", r##""pi" | "π""##),
    ("$POLAR", r##"REAL "e^" ANGLE "i""##),
    ("$PROBABILITY", r##"FRACTION | ONE"##),
    ("$QUERY", r##"{~("#" | ">")}"##),
    ("$QUOTE", r##"'"' {RUNE} '"'"##),
    ("$REAL", r##"[SIGN] (E | PI | PHI | TAU | SCALAR)"##),
    ("$RECTANGULAR", r##" REAL ", " IMAGINARY"##),
    ("$REGEX", r##"'"' <RUNE> '"?'"##),
    ("$RESOURCE", r##""<" SCHEME ":" ["//" AUTHORITY] "/" PATH ["?" QUERY] ["#" FRAGMENT] ">""##),
    ("$RUNE", r##"ESCAPE | ~EOL"##),
    ("$SCALAR", r##"(ORDINAL [FRACTION] | ZERO FRACTION) [EXPONENT]"##),
    ("$SCHEME", r##"("a".."z" | "A".."Z") {"a".."z" | "A".."Z" | "0".."9" | "+" | "-" | "."}"##),
    ("$SECOND", r##""0".."5" "0".."9" | "6" "0".."1""##),
    ("$SEPARATOR", r##""-" | "+" | ".""##),
    ("$SIGN", r##""+" | "-""##),
    ("$SPACE", r##"" ""##),
    ("$SYMBOL", r##""$" IDENTIFIER"##),
    ("$TAG", r##""#" <BASE32>"##),
    ("$TAU", r##""tau" | "τ""##),
    ("$TIMES", r##""T" [TIMESPAN "H"] [TIMESPAN "M"] [TIMESPAN "S"]"##),
    ("$TIMESPAN", r##"ZERO | ORDINAL [FRACTION]"##),
    ("$UNDEFINED", r##""undefined""##),
    ("$UNICODE", r##"
    "u" BASE16 BASE16 BASE16 BASE16 |
    "U" BASE16 BASE16 BASE16 BASE16 BASE16 BASE16 BASE16 BASE16"##),
    ("$VERSION", r##""v" ORDINAL {"." ORDINAL}"##),
    ("$WEEKS", r##"TIMESPAN "W""##),
    ("$YEAR", r##"ORDINAL | ZERO"##),
    ("$ZERO", r##""0""##),

    // Rules named by the parser's diagnostics.
    ("$endpoint", r##"primitive"##),
    ("$evaluateClause", r##"[recipient (":=" | "?=" | "+=" | "-=" | "*=" | "/=")] expression"##),
    ("$series", r##""[" values "]""##),
    ("$structure", r##""[" associations "]""##),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_name_is_unique() {
        assert_eq!(GRAMMAR.len(), RULES.len());
    }

    #[test]
    fn production_lookup() {
        assert_eq!(production("$source"), Some("component EOF  ! EOF is the end-of-file marker."));
        assert_eq!(production("$TAG"), Some(r##""#" <BASE32>"##));
        assert_eq!(production("$nothing"), None);
    }

    #[test]
    fn expecting_renders_rule_chain() {
        let message = expecting("loop", &["$breakClause"]);
        assert_eq!(
            message,
            "Was expecting 'loop' from:\n  $breakClause: \"break\" \"loop\"\n\n"
        );
    }
}

use std::f64::consts::{E, PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, SemanticError};
use crate::lexer::{ANGLE, COMPLEX, NUMBER, PERCENTAGE, PROBABILITY};

/// The golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

const CONSTANTS: [(f64, &str); 4] = [(PI, "π"), (E, "e"), (PHI, "φ"), (TAU, "τ")];

// ──────────────────────────────────────────────
// Real numbers
// ──────────────────────────────────────────────

/// Canonical text of a real value.
pub(crate) fn format_real(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.is_nan() {
        return "undefined".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+∞" } else { "-∞" }.to_owned();
    }
    for (constant, symbol) in CONSTANTS {
        if value == constant {
            return symbol.to_owned();
        }
        if value == -constant {
            return format!("-{}", symbol);
        }
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        format!("{}", value)
    } else {
        format!("{:E}", value)
    }
}

/// Decode a real spelling, including the named constants and sentinels.
/// The caller has already checked the text against a recognizer.
pub(crate) fn decode_real(text: &str) -> Option<f64> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = match body {
        "e" => E,
        "pi" | "π" => PI,
        "phi" | "φ" => PHI,
        "tau" | "τ" => TAU,
        "infinity" | "∞" => f64::INFINITY,
        "undefined" => return Some(f64::NAN),
        _ => body.parse::<f64>().ok()?,
    };
    Some(sign * magnitude)
}

fn same_value(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

// ──────────────────────────────────────────────
// Number
// ──────────────────────────────────────────────

/// A complex number. Purely real values have a zero imaginary part.
/// Any undefined part makes the whole number undefined and any infinite
/// part makes it infinite, so each value has exactly one spelling.
#[derive(Debug, Clone, Copy)]
pub struct Number {
    re: f64,
    im: f64,
}

impl Number {
    pub fn new(re: f64, im: f64) -> Self {
        if re.is_nan() || im.is_nan() {
            return Number {
                re: f64::NAN,
                im: 0.0,
            };
        }
        if re.is_infinite() || im.is_infinite() {
            let re = if re.is_infinite() { re } else { f64::INFINITY };
            return Number { re, im: 0.0 };
        }
        // Drop negative zeros.
        Number {
            re: re + 0.0,
            im: im + 0.0,
        }
    }

    pub fn real(value: f64) -> Self {
        Number::new(value, 0.0)
    }

    pub fn from_polar(magnitude: f64, phase: f64) -> Self {
        Number::new(magnitude * phase.cos(), magnitude * phase.sin())
    }

    pub fn re(&self) -> f64 {
        self.re
    }

    pub fn im(&self) -> f64 {
        self.im
    }

    pub fn is_real(&self) -> bool {
        self.im == 0.0
    }

    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    pub fn is_undefined(&self) -> bool {
        self.re.is_nan()
    }

    pub fn is_infinite(&self) -> bool {
        self.re.is_infinite()
    }

    /// The value as an integer, when it is a real whole number.
    pub fn as_integer(&self) -> Option<i64> {
        let value = self.re;
        let integral = self.is_real() && value.is_finite() && value.fract() == 0.0;
        (integral && value.abs() < i64::MAX as f64).then_some(value as i64)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        same_value(self.re, other.re) && same_value(self.im, other.im)
    }
}

fn format_imaginary(value: f64) -> String {
    if value == 1.0 {
        "i".to_owned()
    } else if value == -1.0 {
        "-i".to_owned()
    } else {
        format!("{}i", format_real(value))
    }
}

fn decode_imaginary(text: &str) -> Option<f64> {
    match text.strip_suffix('i')? {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        body => decode_real(body),
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() || self.is_infinite() || self.is_real() {
            f.write_str(&format_real(self.re))
        } else if self.re == 0.0 {
            f.write_str(&format_imaginary(self.im))
        } else {
            write!(f, "({}, {})", format_real(self.re), format_imaginary(self.im))
        }
    }
}

impl FromStr for Number {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("number", text);
        if COMPLEX.matches(text) {
            let inner = &text[1..text.len() - 1];
            if let Some((re, im)) = inner.split_once(", ") {
                let re = decode_real(re).ok_or_else(invalid)?;
                let im = decode_imaginary(im).ok_or_else(invalid)?;
                return Ok(Number::new(re, im));
            }
            // The magnitude may itself be `e`, so split at the last `e^`.
            let split = inner.rfind("e^").ok_or_else(invalid)?;
            let magnitude = decode_real(&inner[..split]).ok_or_else(invalid)?;
            let phase = inner[split + 2..].strip_suffix('i').ok_or_else(invalid)?;
            let phase: Angle = phase.parse().map_err(|_| invalid())?;
            return Ok(Number::from_polar(magnitude, phase.radians()));
        }
        if !NUMBER.matches(text) {
            return Err(invalid());
        }
        if text.ends_with('i') {
            let im = decode_imaginary(text).ok_or_else(invalid)?;
            return Ok(Number::new(0.0, im));
        }
        decode_real(text).map(Number::real).ok_or_else(invalid)
    }
}

// ──────────────────────────────────────────────
// Angle
// ──────────────────────────────────────────────

/// An angle in radians, normalised into `[0, τ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle(f64);

impl Angle {
    pub fn new(radians: f64) -> Result<Self, SemanticError> {
        if !radians.is_finite() {
            return Err(SemanticError::OutOfDomain {
                kind: "angle",
                value: format_real(radians),
            });
        }
        let mut normalized = radians % TAU;
        if normalized < 0.0 {
            normalized += TAU;
        }
        if normalized >= TAU {
            normalized = 0.0;
        }
        Ok(Angle(normalized + 0.0))
    }

    pub fn radians(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", format_real(self.0))
    }
}

impl FromStr for Angle {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("angle", text);
        if !ANGLE.matches(text) {
            return Err(invalid());
        }
        let radians = decode_real(&text[1..]).ok_or_else(invalid)?;
        Angle::new(radians).map_err(|_| invalid())
    }
}

// ──────────────────────────────────────────────
// Percentage
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentage(f64);

impl Percentage {
    pub fn new(value: f64) -> Result<Self, SemanticError> {
        if !value.is_finite() {
            return Err(SemanticError::OutOfDomain {
                kind: "percentage",
                value: format_real(value),
            });
        }
        Ok(Percentage(value + 0.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", format_real(self.0))
    }
}

impl FromStr for Percentage {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("percentage", text);
        if !PERCENTAGE.matches(text) {
            return Err(invalid());
        }
        let value = decode_real(&text[..text.len() - 1]).ok_or_else(invalid)?;
        Percentage::new(value).map_err(|_| invalid())
    }
}

// ──────────────────────────────────────────────
// Probability
// ──────────────────────────────────────────────

/// A probability in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probability(f64);

impl Probability {
    pub fn new(value: f64) -> Result<Self, SemanticError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(SemanticError::OutOfDomain {
                kind: "probability",
                value: format_real(value),
            });
        }
        Ok(Probability(value + 0.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1.0 {
            return f.write_str("1.");
        }
        if self.0 == 0.0 {
            return f.write_str(".0");
        }
        // Plain notation never uses an exponent, so this is always `0.ddd`.
        let digits = format!("{}", self.0);
        f.write_str(digits.strip_prefix('0').unwrap_or(&digits))
    }
}

impl FromStr for Probability {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("probability", text);
        if !PROBABILITY.matches(text) {
            return Err(invalid());
        }
        let value = if text == "1." {
            1.0
        } else {
            format!("0{}", text).parse::<f64>().map_err(|_| invalid())?
        };
        Probability::new(value).map_err(|_| invalid())
    }
}

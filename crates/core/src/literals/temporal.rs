use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use time::{Date, Month, PrimitiveDateTime, Time};

use crate::error::{CodecError, SemanticError};
use crate::lexer::{DURATION, MOMENT};

// ──────────────────────────────────────────────
// Duration
// ──────────────────────────────────────────────

const MILLISECONDS_PER_SECOND: f64 = 1_000.0;
const MILLISECONDS_PER_MINUTE: f64 = 60.0 * MILLISECONDS_PER_SECOND;
const MILLISECONDS_PER_HOUR: f64 = 60.0 * MILLISECONDS_PER_MINUTE;
const MILLISECONDS_PER_DAY: f64 = 24.0 * MILLISECONDS_PER_HOUR;
const MILLISECONDS_PER_WEEK: f64 = 7.0 * MILLISECONDS_PER_DAY;
// Gregorian averages.
const MILLISECONDS_PER_YEAR: f64 = 365.2425 * MILLISECONDS_PER_DAY;
const MILLISECONDS_PER_MONTH: f64 = MILLISECONDS_PER_YEAR / 12.0;

/// The spans of a duration, either whole weeks or a calendar breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Weeks(Decimal),
    Calendar {
        years: Option<Decimal>,
        months: Option<Decimal>,
        days: Option<Decimal>,
        hours: Option<Decimal>,
        minutes: Option<Decimal>,
        seconds: Option<Decimal>,
    },
}

/// A signed ISO 8601 style duration. Spans keep the units they were
/// written in; only redundant trailing zeros are dropped. Durations of the
/// same length are equal whatever their units, so `~P1W == ~P7D`.
#[derive(Debug, Clone)]
pub struct Duration {
    negative: bool,
    span: Span,
}

impl Duration {
    pub fn new(negative: bool, span: Span) -> Result<Self, SemanticError> {
        let normalize = |value: Option<Decimal>| -> Result<Option<Decimal>, SemanticError> {
            match value {
                Some(v) if v.is_sign_negative() && !v.is_zero() => Err(SemanticError::OutOfDomain {
                    kind: "duration",
                    value: v.to_string(),
                }),
                Some(v) => Ok(Some(v.normalize())),
                None => Ok(None),
            }
        };
        let span = match span {
            Span::Weeks(weeks) => Span::Weeks(normalize(Some(weeks))?.unwrap_or_default()),
            Span::Calendar {
                years,
                months,
                days,
                hours,
                minutes,
                seconds,
            } => {
                let days = if [years, months, days, hours, minutes, seconds]
                    .iter()
                    .all(Option::is_none)
                {
                    Some(Decimal::ZERO)
                } else {
                    days
                };
                Span::Calendar {
                    years: normalize(years)?,
                    months: normalize(months)?,
                    days: normalize(days)?,
                    hours: normalize(hours)?,
                    minutes: normalize(minutes)?,
                    seconds: normalize(seconds)?,
                }
            }
        };
        Ok(Duration { negative, span })
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Approximate length in milliseconds, using average month and year
    /// lengths. Used to order durations.
    pub fn as_milliseconds(&self) -> f64 {
        let part = |value: &Option<Decimal>, scale: f64| {
            value.and_then(|v| v.to_f64()).unwrap_or(0.0) * scale
        };
        let magnitude = match &self.span {
            Span::Weeks(weeks) => weeks.to_f64().unwrap_or(0.0) * MILLISECONDS_PER_WEEK,
            Span::Calendar {
                years,
                months,
                days,
                hours,
                minutes,
                seconds,
            } => {
                part(years, MILLISECONDS_PER_YEAR)
                    + part(months, MILLISECONDS_PER_MONTH)
                    + part(days, MILLISECONDS_PER_DAY)
                    + part(hours, MILLISECONDS_PER_HOUR)
                    + part(minutes, MILLISECONDS_PER_MINUTE)
                    + part(seconds, MILLISECONDS_PER_SECOND)
            }
        };
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.as_milliseconds() == other.as_milliseconds()
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_milliseconds().partial_cmp(&other.as_milliseconds())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("~")?;
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        match &self.span {
            Span::Weeks(weeks) => write!(f, "{}W", weeks),
            Span::Calendar {
                years,
                months,
                days,
                hours,
                minutes,
                seconds,
            } => {
                for (value, unit) in [(years, 'Y'), (months, 'M'), (days, 'D')] {
                    if let Some(value) = value {
                        write!(f, "{}{}", value, unit)?;
                    }
                }
                if hours.is_some() || minutes.is_some() || seconds.is_some() {
                    f.write_str("T")?;
                    for (value, unit) in [(hours, 'H'), (minutes, 'M'), (seconds, 'S')] {
                        if let Some(value) = value {
                            write!(f, "{}{}", value, unit)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Duration {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("duration", text);
        let captures = DURATION.captures(text).ok_or_else(invalid)?;
        let span = |index: usize| -> Result<Option<Decimal>, CodecError> {
            captures
                .get(index)
                .map(|m| Decimal::from_str(m.as_str()).map_err(|_| invalid()))
                .transpose()
        };
        let negative = captures.get(1).map(|m| m.as_str()) == Some("-");
        let span = match span(2)? {
            Some(weeks) => Span::Weeks(weeks),
            None => Span::Calendar {
                years: span(3)?,
                months: span(4)?,
                days: span(5)?,
                hours: span(6)?,
                minutes: span(7)?,
                seconds: span(8)?,
            },
        };
        Duration::new(negative, span).map_err(|_| invalid())
    }
}

// ──────────────────────────────────────────────
// Moment
// ──────────────────────────────────────────────

/// A point in time written at some precision, from a bare year down to
/// fractional seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moment {
    year: i32,
    month: Option<u8>,
    day: Option<u8>,
    hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
    /// Digits after the decimal point of the seconds.
    fraction: Option<String>,
}

impl Moment {
    /// A moment with year precision.
    pub fn year(year: i32) -> Self {
        Moment {
            year,
            month: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
            fraction: None,
        }
    }

    pub fn with_month(mut self, month: u8) -> Result<Self, SemanticError> {
        Month::try_from(month).map_err(|_| out_of_domain(month))?;
        self.month = Some(month);
        Ok(self)
    }

    pub fn with_day(mut self, day: u8) -> Result<Self, SemanticError> {
        let month = self
            .month
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| out_of_domain(day))?;
        if day == 0 || day > month.length(self.year) {
            return Err(out_of_domain(day));
        }
        self.day = Some(day);
        Ok(self)
    }

    pub fn with_time(
        mut self,
        hour: u8,
        minute: Option<u8>,
        second: Option<u8>,
    ) -> Result<Self, SemanticError> {
        // Leap seconds are allowed.
        if self.day.is_none()
            || hour > 23
            || minute.is_some_and(|m| m > 59)
            || second.is_some_and(|s| s > 61)
            || (minute.is_none() && second.is_some())
        {
            return Err(out_of_domain(hour));
        }
        self.hour = Some(hour);
        self.minute = minute;
        self.second = second;
        Ok(self)
    }

    pub fn with_fraction(mut self, digits: &str) -> Result<Self, SemanticError> {
        if self.second.is_none() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SemanticError::OutOfDomain {
                kind: "moment",
                value: digits.to_owned(),
            });
        }
        self.fraction = Some(digits.to_owned());
        Ok(self)
    }

    pub fn get_year(&self) -> i32 {
        self.year
    }

    pub fn get_month(&self) -> Option<u8> {
        self.month
    }

    pub fn get_day(&self) -> Option<u8> {
        self.day
    }

    /// The earliest calendar date and time this moment covers, when it lies
    /// within the range the `time` crate supports.
    pub fn as_datetime(&self) -> Option<PrimitiveDateTime> {
        let month = Month::try_from(self.month.unwrap_or(1)).ok()?;
        let date = Date::from_calendar_date(self.year, month, self.day.unwrap_or(1)).ok()?;
        let nanoseconds = self
            .fraction
            .as_deref()
            .map(|digits| {
                let padded = format!("{:0<9}", &digits[..digits.len().min(9)]);
                padded.parse::<u32>().unwrap_or(0)
            })
            .unwrap_or(0);
        let time = Time::from_hms_nano(
            self.hour.unwrap_or(0),
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0).min(59),
            nanoseconds,
        )
        .ok()?;
        Some(PrimitiveDateTime::new(date, time))
    }

    /// Coarser precision sorts first among moments sharing a prefix, so
    /// only equal moments compare `Equal`.
    fn sort_key(&self) -> (i32, Option<u8>, Option<u8>, Option<u8>, Option<u8>, Option<u8>, Option<&str>) {
        (
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.fraction.as_deref(),
        )
    }
}

fn out_of_domain(value: u8) -> SemanticError {
    SemanticError::OutOfDomain {
        kind: "moment",
        value: value.to_string(),
    }
}

impl From<PrimitiveDateTime> for Moment {
    /// Full precision, down to the nanosecond with trailing zeros dropped.
    fn from(value: PrimitiveDateTime) -> Self {
        let digits = format!("{:09}", value.nanosecond());
        let digits = digits.trim_end_matches('0');
        Moment {
            year: value.year(),
            month: Some(value.month() as u8),
            day: Some(value.day()),
            hour: Some(value.hour()),
            minute: Some(value.minute()),
            second: Some(value.second()),
            fraction: (!digits.is_empty()).then(|| digits.to_owned()),
        }
    }
}

impl PartialOrd for Moment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.sort_key().cmp(&other.sort_key()))
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{:02}", month)?;
        }
        if let Some(day) = self.day {
            write!(f, "-{:02}", day)?;
        }
        if let Some(hour) = self.hour {
            write!(f, "T{:02}", hour)?;
        }
        if let Some(minute) = self.minute {
            write!(f, ":{:02}", minute)?;
        }
        if let Some(second) = self.second {
            write!(f, ":{:02}", second)?;
        }
        if let Some(fraction) = &self.fraction {
            write!(f, ".{}", fraction)?;
        }
        f.write_str(">")
    }
}

impl FromStr for Moment {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::new("moment", text);
        let captures = MOMENT.captures(text).ok_or_else(invalid)?;
        let field = |index: usize| -> Result<Option<u8>, CodecError> {
            captures
                .get(index)
                .map(|m| m.as_str().parse::<u8>().map_err(|_| invalid()))
                .transpose()
        };
        let mut year: i32 = captures
            .get(2)
            .ok_or_else(invalid)?
            .as_str()
            .parse()
            .map_err(|_| invalid())?;
        if captures.get(1).map(|m| m.as_str()) == Some("-") {
            year = -year;
        }
        let mut moment = Moment::year(year);
        if let Some(month) = field(3)? {
            moment = moment.with_month(month).map_err(|_| invalid())?;
        }
        if let Some(day) = field(4)? {
            moment = moment.with_day(day).map_err(|_| invalid())?;
        }
        if let Some(hour) = field(5)? {
            moment = moment
                .with_time(hour, field(6)?, field(7)?)
                .map_err(|_| invalid())?;
        }
        if let Some(fraction) = captures.get(8) {
            moment = moment
                .with_fraction(fraction.as_str())
                .map_err(|_| invalid())?;
        }
        Ok(moment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    #[rstest]
    #[case("~P3D", "~P3D")]
    #[case("~-P2W", "~-P2W")]
    #[case("~+P1.50Y", "~P1.5Y")]
    #[case("~P1Y2M3DT4H5M6.5S", "~P1Y2M3DT4H5M6.5S")]
    #[case("~PT0S", "~PT0S")]
    #[case("~P", "~P0D")]
    #[case("~PT", "~P0D")]
    fn duration_spellings_normalize(#[case] text: &str, #[case] canonical: &str) {
        let duration: Duration = text.parse().unwrap();
        assert_eq!(duration.to_string(), canonical);
        assert_eq!(canonical.parse::<Duration>().unwrap(), duration);
    }

    #[test]
    fn durations_order_by_length() {
        let week: Duration = "~P1W".parse().unwrap();
        let days: Duration = "~P6D".parse().unwrap();
        let negative: Duration = "~-P8D".parse().unwrap();
        assert!(days < week);
        assert!(negative < days);
        assert_eq!(week.as_milliseconds(), 604_800_000.0);
    }

    #[test]
    fn equal_lengths_are_equal_durations() {
        let week: Duration = "~P1W".parse().unwrap();
        let days: Duration = "~P7D".parse().unwrap();
        assert_eq!(week.partial_cmp(&days), Some(Ordering::Equal));
        assert_eq!(week, days);
        assert_eq!("~PT24H".parse::<Duration>().unwrap(), "~P1D".parse::<Duration>().unwrap());
        assert_eq!("~-P0D".parse::<Duration>().unwrap(), "~P0D".parse::<Duration>().unwrap());
        assert_ne!(week, "~P6D".parse::<Duration>().unwrap());
    }

    #[rstest]
    #[case("<2024>")]
    #[case("<-44-03-15>")]
    #[case("<0>")]
    #[case("<2024-02-29T13:05:59.50>")]
    #[case("<1999-12-31T23:59:60>")]
    fn moments_round_trip(#[case] text: &str) {
        let moment: Moment = text.parse().unwrap();
        assert_eq!(moment.to_string(), text);
    }

    #[test]
    fn moments_check_the_calendar() {
        assert!("<2023-02-29>".parse::<Moment>().is_err());
        assert!("<2024-02-29>".parse::<Moment>().is_ok());
        assert!("<2024-13>".parse::<Moment>().is_err());
        assert!("<2024-04-31>".parse::<Moment>().is_err());
    }

    #[test]
    fn moments_convert_to_and_from_datetimes() {
        let moment: Moment = "<2024-02-29T13:05:59.25>".parse().unwrap();
        assert_eq!(moment.as_datetime(), Some(datetime!(2024-02-29 13:05:59.25)));
        let moment = Moment::from(datetime!(2001-01-02 03:04:05.5));
        assert_eq!(moment.to_string(), "<2001-01-02T03:04:05.5>");
        assert_eq!(Moment::year(2024).as_datetime(), Some(datetime!(2024-01-01 0:00)));
    }

    #[test]
    fn moments_order_chronologically() {
        let earlier: Moment = "<2024-01>".parse().unwrap();
        let later: Moment = "<2024-01-02>".parse().unwrap();
        assert!(earlier < later);
        assert!("<-1>".parse::<Moment>().unwrap() < earlier);

        let day: Moment = "<2024-01-01>".parse().unwrap();
        let midnight: Moment = "<2024-01-01T00>".parse().unwrap();
        assert_ne!(day, midnight);
        assert_eq!(day.partial_cmp(&midnight), Some(Ordering::Less));
    }

    #[test]
    fn days_follow_month_lengths() {
        assert!("<2024-02-29>".parse::<Moment>().is_ok());
        assert!("<2023-02-29>".parse::<Moment>().is_err());
        assert!("<2023-04-31>".parse::<Moment>().is_err());
        assert!(Moment::year(2023).with_month(2).unwrap().with_day(29).is_err());
    }
}

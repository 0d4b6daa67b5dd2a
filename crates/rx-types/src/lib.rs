//! Validated primitives shared by the rxpad crates.
//!
//! Form inputs arrive as raw strings. The types here are the only way those strings become
//! trusted values: a patient name that is known to be non-blank, an age known to be in range,
//! and a calendar date known to exist.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Oldest age accepted on a prescription.
pub const MAX_PATIENT_AGE: u8 = 150;

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input was not a whole number
    #[error("not an integer: {0}")]
    NotAnInteger(String),
    /// The age was outside `0..=150`
    #[error("age {0} is outside 0-{max}", max = MAX_PATIENT_AGE)]
    AgeOutOfRange(i64),
    /// The input was not a recognisable calendar date
    #[error("not a valid date: {0}")]
    InvalidDate(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, returning `TextError::Empty` for blank input.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Patient age in whole years, `0..=150`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct PatientAge(u8);

impl PatientAge {
    /// Parses an age typed into a form field.
    ///
    /// Surrounding whitespace is ignored. Anything other than a whole number in range is
    /// rejected, so `"abc"`, `"-1"` and `"151"` all fail while `"0"` and `"150"` pass.
    pub fn parse(input: &str) -> Result<Self, TextError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }

        let value: i64 = trimmed
            .parse()
            .map_err(|_| TextError::NotAnInteger(trimmed.to_owned()))?;

        Self::try_from(value)
    }

    pub fn years(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for PatientAge {
    type Error = TextError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(0..=i64::from(MAX_PATIENT_AGE)).contains(&value) {
            return Err(TextError::AgeOutOfRange(value));
        }
        // Range checked above.
        Ok(Self(value as u8))
    }
}

impl std::fmt::Display for PatientAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PatientAge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        PatientAge::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// A calendar day taken from a visit or next-visit field.
///
/// Date inputs submit `YYYY-MM-DD`; the backend sometimes echoes full timestamps. Both are
/// accepted and reduced to the calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn parse(input: &str) -> Result<Self, TextError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(dt.date()));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.date_naive()));
        }

        Err(TextError::InvalidDate(trimmed.to_owned()))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(self) -> NaiveDate {
        self.0
    }

    /// `YYYY-MM-DD`, the form the backend stores.
    pub fn iso(self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// `dd/mm/yyyy`, used on the patient info bar.
    pub fn day_month_year(self) -> String {
        self.0.format("%d/%m/%Y").to_string()
    }

    /// `dd Mon yyyy`, used for the next-visit line.
    pub fn day_short_month_year(self) -> String {
        self.0.format("%d %b %Y").to_string()
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.iso())
    }
}

impl std::str::FromStr for CalendarDate {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.iso())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CalendarDate::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        assert_eq!(NonEmptyText::new("  Rahim ").unwrap().as_str(), "Rahim");
        assert_eq!(NonEmptyText::new(" \t ").expect_err("blank"), TextError::Empty);
    }

    #[test]
    fn age_accepts_bounds() {
        assert_eq!(PatientAge::parse("0").unwrap().years(), 0);
        assert_eq!(PatientAge::parse("150").unwrap().years(), 150);
        assert_eq!(PatientAge::parse(" 42 ").unwrap().years(), 42);
    }

    #[test]
    fn age_rejects_out_of_range_and_garbage() {
        assert_eq!(
            PatientAge::parse("-1").expect_err("negative"),
            TextError::AgeOutOfRange(-1)
        );
        assert_eq!(
            PatientAge::parse("151").expect_err("too old"),
            TextError::AgeOutOfRange(151)
        );
        assert!(matches!(
            PatientAge::parse("abc"),
            Err(TextError::NotAnInteger(_))
        ));
        assert!(matches!(
            PatientAge::parse("12.5"),
            Err(TextError::NotAnInteger(_))
        ));
        assert_eq!(PatientAge::parse("").expect_err("empty"), TextError::Empty);
    }

    #[test]
    fn age_deserialize_enforces_range() {
        let ok: PatientAge = serde_json::from_str("35").expect("in range");
        assert_eq!(ok.years(), 35);
        assert!(serde_json::from_str::<PatientAge>("200").is_err());
    }

    #[test]
    fn calendar_date_accepts_date_and_timestamps() {
        let plain = CalendarDate::parse("2026-03-05").expect("plain date");
        let local = CalendarDate::parse("2026-03-05T10:30:00").expect("local timestamp");
        let zoned = CalendarDate::parse("2026-03-05T10:30:00.123Z").expect("rfc3339");
        assert_eq!(plain, local);
        assert_eq!(plain, zoned);
    }

    #[test]
    fn calendar_date_rejects_impossible_days() {
        assert!(matches!(
            CalendarDate::parse("2026-02-30"),
            Err(TextError::InvalidDate(_))
        ));
        assert!(matches!(
            CalendarDate::parse("next tuesday"),
            Err(TextError::InvalidDate(_))
        ));
    }

    #[test]
    fn calendar_date_formats() {
        let date = CalendarDate::parse("2026-03-05").unwrap();
        assert_eq!(date.iso(), "2026-03-05");
        assert_eq!(date.day_month_year(), "05/03/2026");
        assert_eq!(date.day_short_month_year(), "05 Mar 2026");
    }
}

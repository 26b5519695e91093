//! Date normalization at the query boundary
//!
//! Date criteria arrive in heterogeneous shapes: native chrono values,
//! ISO-8601 strings, epoch seconds, or external wrapper types exposing a
//! conversion method. All of them are normalized into one canonical UTC
//! representation *before* any comparison or parameter binding.
//!
//! Stored index values always carry explicit offsets, so the canonical
//! cast is deterministic. Inputs without an offset (a bare date or naive
//! datetime) are assumed UTC and reported as [`DateFidelity::AssumedUtc`]
//! so the caller can surface the assumption instead of silently fixing it.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Heterogeneous date input, tagged by shape
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    /// A datetime with an explicit UTC offset
    DateTime(DateTime<FixedOffset>),
    /// A datetime already in UTC
    Utc(DateTime<Utc>),
    /// A bare calendar date (no time, no offset)
    Date(NaiveDate),
    /// A datetime without an offset
    Naive(NaiveDateTime),
    /// An ISO-8601 string, parsed on normalization
    Iso(String),
    /// Seconds since the Unix epoch
    EpochSeconds(i64),
}

/// Whether the input carried an explicit offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFidelity {
    /// The input carried an explicit offset (or is epoch-based)
    Tagged,
    /// The input had no offset; UTC was assumed
    AssumedUtc,
}

/// Error when normalizing a date input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The string did not parse as any accepted ISO-8601 shape
    Unparseable(String),
    /// The epoch value is outside the representable range
    OutOfRange(i64),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::Unparseable(s) => write!(f, "unparseable date: {:?}", s),
            DateError::OutOfRange(secs) => write!(f, "epoch seconds out of range: {}", secs),
        }
    }
}

impl std::error::Error for DateError {}

/// Canonical date representation: an instant in UTC
///
/// All date comparisons and parameter bindings go through this type.
/// Ordering is the instant ordering; the bound form is RFC 3339 with
/// microsecond precision and a `Z` suffix, which also orders correctly
/// as text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CanonicalDate(DateTime<Utc>);

impl CanonicalDate {
    /// Wrap a UTC instant
    pub fn new(instant: DateTime<Utc>) -> Self {
        CanonicalDate(instant)
    }

    /// Normalize a heterogeneous input into the canonical representation
    ///
    /// Returns the canonical instant plus a fidelity marker recording
    /// whether the input carried an explicit offset.
    ///
    /// # Errors
    ///
    /// Returns `DateError` if a string fails to parse or an epoch value is
    /// out of range.
    pub fn from_input(input: &DateInput) -> Result<(Self, DateFidelity), DateError> {
        match input {
            DateInput::DateTime(dt) => {
                Ok((CanonicalDate(dt.with_timezone(&Utc)), DateFidelity::Tagged))
            }
            DateInput::Utc(dt) => Ok((CanonicalDate(*dt), DateFidelity::Tagged)),
            DateInput::Date(date) => {
                let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
                Ok((CanonicalDate(midnight.and_utc()), DateFidelity::AssumedUtc))
            }
            DateInput::Naive(naive) => {
                Ok((CanonicalDate(naive.and_utc()), DateFidelity::AssumedUtc))
            }
            DateInput::Iso(s) => Self::parse_iso(s),
            DateInput::EpochSeconds(secs) => {
                let dt = DateTime::from_timestamp(*secs, 0).ok_or(DateError::OutOfRange(*secs))?;
                Ok((CanonicalDate(dt), DateFidelity::Tagged))
            }
        }
    }

    /// Parse an ISO-8601 string, accepting offset-tagged and naive shapes
    fn parse_iso(s: &str) -> Result<(Self, DateFidelity), DateError> {
        let trimmed = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok((CanonicalDate(dt.with_timezone(&Utc)), DateFidelity::Tagged));
        }

        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok((CanonicalDate(naive.and_utc()), DateFidelity::AssumedUtc));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
            return Ok((CanonicalDate(midnight.and_utc()), DateFidelity::AssumedUtc));
        }

        Err(DateError::Unparseable(trimmed.to_string()))
    }

    /// The canonical instant
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// The canonical bound form: RFC 3339, microsecond precision, `Z`
    ///
    /// This text form orders identically to the instant, so range
    /// predicates over bound values compare correctly.
    pub fn to_bound_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bound_string())
    }
}

impl From<DateTime<Utc>> for CanonicalDate {
    fn from(dt: DateTime<Utc>) -> Self {
        CanonicalDate(dt)
    }
}

/// Conversion hook for external date wrapper types
///
/// Host frameworks often carry their own date wrappers. Implementing this
/// trait lets such values participate in date queries without the compiler
/// knowing their concrete type.
pub trait ToCanonicalDate {
    /// Convert to the canonical UTC representation
    fn to_canonical(&self) -> CanonicalDate;
}

impl ToCanonicalDate for DateTime<Utc> {
    fn to_canonical(&self) -> CanonicalDate {
        CanonicalDate(*self)
    }
}

impl ToCanonicalDate for DateTime<FixedOffset> {
    fn to_canonical(&self) -> CanonicalDate {
        CanonicalDate(self.with_timezone(&Utc))
    }
}

// ============================================================================
// Tests
// ============================================================================

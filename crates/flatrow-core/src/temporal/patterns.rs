use super::{Temporal, TemporalKind};
use crate::error::TemporalError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;
use log::trace;
use std::str::FromStr;

///
/// TextPattern
///
/// One acceptable textual input pattern. RFC 3339 gets its own entry
/// because chrono parses it through a dedicated routine rather than a
/// format string.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextPattern {
    Rfc3339,
    Format(&'static str),
}

///
/// PATTERN TABLES
///
/// Per variant: one canonical output pattern, an ordered primary input
/// list, and (for instants and offset date-times) a secondary list of
/// the *other* variant's patterns tried only when every primary fails.
///

/// Canonical instant output: extended ISO, UTC designator.
pub const INSTANT_CANONICAL: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Instant input patterns, in declared order.
pub const INSTANT_PATTERNS: &[TextPattern] = &[
    TextPattern::Format("%Y-%m-%dT%H:%M:%S%.fZ"),
    TextPattern::Format("%Y-%m-%dT%H:%M:%SZ"),
];

/// Canonical offset-date-time output: RFC 3339 shape with numeric offset.
pub const OFFSET_CANONICAL: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Offset-date-time input patterns, in declared order.
pub const OFFSET_PATTERNS: &[TextPattern] = &[
    TextPattern::Rfc3339,
    TextPattern::Format("%Y-%m-%dT%H:%M:%S%.f%:z"),
    TextPattern::Format("%Y-%m-%dT%H:%M:%S%:z"),
];

/// Canonical civil date-time output.
pub const LOCAL_DATE_TIME_CANONICAL: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Civil date-time input patterns, in declared order.
pub const LOCAL_DATE_TIME_PATTERNS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

/// Canonical civil date output.
pub const LOCAL_DATE_CANONICAL: &str = "%Y-%m-%d";

/// Civil date input patterns.
pub const LOCAL_DATE_PATTERNS: &[&str] = &["%Y-%m-%d"];

fn parse_instant_shaped(pattern: TextPattern, text: &str) -> Option<DateTime<Utc>> {
    match pattern {
        TextPattern::Rfc3339 => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        TextPattern::Format(fmt) => NaiveDateTime::parse_from_str(text, fmt)
            .ok()
            .map(|naive| naive.and_utc()),
    }
}

fn parse_offset_shaped(pattern: TextPattern, text: &str) -> Option<DateTime<FixedOffset>> {
    match pattern {
        TextPattern::Rfc3339 => DateTime::parse_from_rfc3339(text).ok(),
        TextPattern::Format(fmt) => DateTime::parse_from_str(text, fmt).ok(),
    }
}

/// Format with the variant's canonical pattern. Deterministic; no
/// validation.
pub(super) fn canonical_format(value: &Temporal) -> String {
    match value {
        Temporal::Instant(t) => t.format(INSTANT_CANONICAL).to_string(),
        Temporal::OffsetDateTime(t) => t.format(OFFSET_CANONICAL).to_string(),
        Temporal::ZonedDateTime(t) => {
            format!("{} {}", t.format(OFFSET_CANONICAL), t.timezone().name())
        }
        Temporal::LocalDateTime(t) => t.format(LOCAL_DATE_TIME_CANONICAL).to_string(),
        Temporal::LocalDate(d) => d.format(LOCAL_DATE_CANONICAL).to_string(),
    }
}

/// Optional per-variant check run before a value is formatted or stored.
pub type TemporalValidator = Box<dyn Fn(&Temporal) -> Result<(), String> + Send + Sync>;

///
/// PatternRegistry
///
/// Parse-with-fallback and canonical formatting for the five temporal
/// variants. Formatting always uses the single canonical pattern;
/// parsing walks the variant's primary patterns in declared order, then
/// its cross-variant fallback list (instants accept offset text with the
/// offset collapsed; offset date-times accept bare instant text with
/// offset zero).
///

#[derive(Default)]
pub struct PatternRegistry {
    validators: [Option<TemporalValidator>; 5],
}

impl PatternRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a validator for one variant. An absent validator means no
    /// additional validation.
    #[must_use]
    pub fn with_validator<F>(mut self, kind: TemporalKind, validator: F) -> Self
    where
        F: Fn(&Temporal) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators[kind.index()] = Some(Box::new(validator));
        self
    }

    /// Run the variant's validator, if any.
    pub fn validate(&self, value: &Temporal) -> Result<(), TemporalError> {
        match &self.validators[value.kind().index()] {
            Some(validator) => validator(value).map_err(|message| TemporalError::Validation {
                kind: value.kind(),
                message,
            }),
            None => Ok(()),
        }
    }

    /// Canonical textual form, validated first.
    pub fn format(&self, value: &Temporal) -> Result<String, TemporalError> {
        self.validate(value)?;
        Ok(canonical_format(value))
    }

    /// Parse `text` into the requested variant.
    pub fn parse(&self, text: &str, kind: TemporalKind) -> Result<Temporal, TemporalError> {
        let parsed = match kind {
            TemporalKind::Instant => Self::parse_instant(text).map(Temporal::Instant),
            TemporalKind::OffsetDateTime => Self::parse_offset(text).map(Temporal::OffsetDateTime),
            TemporalKind::ZonedDateTime => Self::parse_zoned(text).map(Temporal::ZonedDateTime),
            TemporalKind::LocalDateTime => {
                Self::parse_local_date_time(text).map(Temporal::LocalDateTime)
            }
            TemporalKind::LocalDate => Self::parse_local_date(text).map(Temporal::LocalDate),
        };

        parsed.ok_or_else(|| TemporalError::Unparsable {
            kind,
            text: text.to_string(),
        })
    }

    fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
        for pattern in INSTANT_PATTERNS {
            if let Some(utc) = parse_instant_shaped(*pattern, text) {
                return Some(utc);
            }
        }

        // Cross-variant salvage: offset text collapses to its instant.
        for pattern in OFFSET_PATTERNS {
            if let Some(fixed) = parse_offset_shaped(*pattern, text) {
                trace!("instant parse salvaged from offset-date-time pattern");
                return Some(fixed.with_timezone(&Utc));
            }
        }

        None
    }

    fn parse_offset(text: &str) -> Option<DateTime<FixedOffset>> {
        for pattern in OFFSET_PATTERNS {
            if let Some(fixed) = parse_offset_shaped(*pattern, text) {
                return Some(fixed);
            }
        }

        // Cross-variant salvage: bare instant text takes offset zero.
        for pattern in INSTANT_PATTERNS {
            if let Some(utc) = parse_instant_shaped(*pattern, text) {
                trace!("offset-date-time parse salvaged from instant pattern");
                return Some(utc.fixed_offset());
            }
        }

        None
    }

    fn parse_zoned(text: &str) -> Option<DateTime<Tz>> {
        // Canonical shape: "<offset-date-time> <zone id>".
        if let Some((datetime_part, zone_part)) = text.rsplit_once(' ') {
            if let Ok(tz) = Tz::from_str(zone_part) {
                for pattern in OFFSET_PATTERNS {
                    if let Some(fixed) = parse_offset_shaped(*pattern, datetime_part) {
                        return Some(fixed.with_timezone(&tz));
                    }
                }
            }
        }

        // Plain offset text resolves to the UTC zone: a numeric offset
        // does not identify a TZDB zone.
        for pattern in OFFSET_PATTERNS {
            if let Some(fixed) = parse_offset_shaped(*pattern, text) {
                trace!("zoned-date-time parse salvaged without a zone id");
                return Some(fixed.with_timezone(&Tz::UTC));
            }
        }

        None
    }

    fn parse_local_date_time(text: &str) -> Option<chrono::NaiveDateTime> {
        LOCAL_DATE_TIME_PATTERNS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    }

    fn parse_local_date(text: &str) -> Option<chrono::NaiveDate> {
        LOCAL_DATE_PATTERNS
            .iter()
            .find_map(|fmt| chrono::NaiveDate::parse_from_str(text, fmt).ok())
    }
}

///
/// TESTS
///

//! The five calendar/temporal value kinds the codec distinguishes, and
//! their conversions to and from the store's single point-in-time column
//! kind.

mod patterns;

pub use patterns::{
    INSTANT_CANONICAL, INSTANT_PATTERNS, LOCAL_DATE_CANONICAL, LOCAL_DATE_PATTERNS,
    LOCAL_DATE_TIME_CANONICAL, LOCAL_DATE_TIME_PATTERNS, OFFSET_CANONICAL, OFFSET_PATTERNS,
    PatternRegistry, TemporalValidator, TextPattern,
};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use std::fmt;

///
/// Temporal
///
/// A closed union over the five temporal variants. The store persists all
/// of them as one `Timestamp` column kind, so decoding back into a civil
/// or zone-aware variant goes through the documented salvage conversions
/// in [`Temporal::from_instant`].
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Temporal {
    /// A UTC point in time.
    Instant(DateTime<Utc>),
    /// A point in time with a fixed UTC offset.
    OffsetDateTime(DateTime<FixedOffset>),
    /// A point in time in a named time zone, resolved against the TZDB.
    ZonedDateTime(DateTime<Tz>),
    /// A civil date and time with no zone.
    LocalDateTime(NaiveDateTime),
    /// A civil date with no time or zone.
    LocalDate(NaiveDate),
}

impl Temporal {
    #[must_use]
    pub const fn kind(&self) -> TemporalKind {
        match self {
            Self::Instant(_) => TemporalKind::Instant,
            Self::OffsetDateTime(_) => TemporalKind::OffsetDateTime,
            Self::ZonedDateTime(_) => TemporalKind::ZonedDateTime,
            Self::LocalDateTime(_) => TemporalKind::LocalDateTime,
            Self::LocalDate(_) => TemporalKind::LocalDate,
        }
    }

    /// Collapse to the store's point-in-time representation.
    ///
    /// Civil variants are interpreted as UTC; zone and offset information
    /// is dropped. This is the lossy half of the timestamp-column bridge.
    #[must_use]
    pub fn to_instant(&self) -> DateTime<Utc> {
        match self {
            Self::Instant(t) => *t,
            Self::OffsetDateTime(t) => t.with_timezone(&Utc),
            Self::ZonedDateTime(t) => t.with_timezone(&Utc),
            Self::LocalDateTime(t) => t.and_utc(),
            Self::LocalDate(d) => d.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// Rebuild a variant from a raw stored point in time.
    ///
    /// The offset becomes zero, the zone becomes UTC, and civil variants
    /// take the UTC civil reading: the original zone is unrecoverable
    /// unless the value was stored in its canonical string form.
    #[must_use]
    pub fn from_instant(kind: TemporalKind, utc: DateTime<Utc>) -> Self {
        match kind {
            TemporalKind::Instant => Self::Instant(utc),
            TemporalKind::OffsetDateTime => Self::OffsetDateTime(utc.fixed_offset()),
            TemporalKind::ZonedDateTime => Self::ZonedDateTime(utc.with_timezone(&Tz::UTC)),
            TemporalKind::LocalDateTime => Self::LocalDateTime(utc.naive_utc()),
            TemporalKind::LocalDate => Self::LocalDate(utc.date_naive()),
        }
    }
}

impl fmt::Display for Temporal {
    /// Canonical textual form, identical to [`PatternRegistry::format`]
    /// without validation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", patterns::canonical_format(self))
    }
}

///
/// TemporalKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TemporalKind {
    Instant,
    OffsetDateTime,
    ZonedDateTime,
    LocalDateTime,
    LocalDate,
}

impl TemporalKind {
    pub const ALL: [Self; 5] = [
        Self::Instant,
        Self::OffsetDateTime,
        Self::ZonedDateTime,
        Self::LocalDateTime,
        Self::LocalDate,
    ];

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Instant => 0,
            Self::OffsetDateTime => 1,
            Self::ZonedDateTime => 2,
            Self::LocalDateTime => 3,
            Self::LocalDate => 4,
        }
    }
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Instant => "instant",
            Self::OffsetDateTime => "offset-date-time",
            Self::ZonedDateTime => "zoned-date-time",
            Self::LocalDateTime => "local-date-time",
            Self::LocalDate => "local-date",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn instant_round_trips_through_itself() {
        let utc = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        let t = Temporal::Instant(utc);
        assert_eq!(t.to_instant(), utc);
        assert_eq!(Temporal::from_instant(TemporalKind::Instant, utc), t);
    }

    #[test]
    fn offset_collapses_to_same_instant() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let t = Temporal::OffsetDateTime(local);

        assert_eq!(t.to_instant(), Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn civil_variants_read_as_utc() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();

        let naive = Temporal::from_instant(TemporalKind::LocalDateTime, utc);
        assert_eq!(
            naive,
            Temporal::LocalDateTime(
                NaiveDate::from_ymd_opt(2024, 6, 1)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap()
            )
        );

        let date = Temporal::from_instant(TemporalKind::LocalDate, utc);
        assert_eq!(
            date,
            Temporal::LocalDate(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
    }

    #[test]
    fn local_date_becomes_midnight_utc() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let instant = Temporal::LocalDate(d).to_instant();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn zoned_salvage_lands_in_utc_zone() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let Temporal::ZonedDateTime(z) = Temporal::from_instant(TemporalKind::ZonedDateTime, utc)
        else {
            panic!("expected zoned variant");
        };
        assert_eq!(z.timezone(), Tz::UTC);
        assert_eq!(z.with_timezone(&Utc), utc);
    }
}

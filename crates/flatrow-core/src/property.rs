use crate::temporal::{Temporal, TemporalKind};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

///
/// PropertyValue
///
/// The decoded leaf union: what a single scalar field of an entity graph
/// holds once it has left the wire. The set is closed and all dispatch is
/// exhaustive matching; there is no dynamic document model in between.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    /// Arbitrary-precision decimal. Stored as a full-precision string,
    /// never as a double.
    Decimal(Decimal),
    Guid(Uuid),
    Binary(Vec<u8>),
    Temporal(Temporal),
    Text(String),
}

impl PropertyValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_temporal(&self) -> Option<&Temporal> {
        if let Self::Temporal(t) = self {
            Some(t)
        } else {
            None
        }
    }
}

///
/// PropertyNode
///
/// A node of the nested graph form: either one scalar leaf or a named
/// composite. Object entries preserve declaration order, which keeps the
/// flattened output deterministic.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyNode {
    Value(PropertyValue),
    Object(Vec<(String, PropertyNode)>),
}

impl PropertyNode {
    /// An empty composite node.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Object(Vec::new())
    }

    /// Child lookup by field name; `None` for leaves and missing names.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Self> {
        if let Self::Object(entries) = self {
            entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    #[must_use]
    pub const fn as_value(&self) -> Option<&PropertyValue> {
        if let Self::Value(v) = self { Some(v) } else { None }
    }
}

impl From<PropertyValue> for PropertyNode {
    fn from(value: PropertyValue) -> Self {
        Self::Value(value)
    }
}

///
/// DeclaredType
///
/// The declared type of a leaf at a given flattened key, as recorded in
/// the per-type property metadata. Drives storage-to-leaf coercion on
/// decode; distinguishes the five temporal variants that share a single
/// storage kind.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DeclaredType {
    Bool,
    Int32,
    Int64,
    Float64,
    Decimal,
    Guid,
    Binary,
    Text,
    Instant,
    OffsetDateTime,
    ZonedDateTime,
    LocalDateTime,
    LocalDate,
}

impl DeclaredType {
    /// The temporal kind this declared type corresponds to, if any.
    #[must_use]
    pub const fn temporal_kind(self) -> Option<TemporalKind> {
        match self {
            Self::Instant => Some(TemporalKind::Instant),
            Self::OffsetDateTime => Some(TemporalKind::OffsetDateTime),
            Self::ZonedDateTime => Some(TemporalKind::ZonedDateTime),
            Self::LocalDateTime => Some(TemporalKind::LocalDateTime),
            Self::LocalDate => Some(TemporalKind::LocalDate),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_temporal(self) -> bool {
        self.temporal_kind().is_some()
    }
}

impl From<TemporalKind> for DeclaredType {
    fn from(kind: TemporalKind) -> Self {
        match kind {
            TemporalKind::Instant => Self::Instant,
            TemporalKind::OffsetDateTime => Self::OffsetDateTime,
            TemporalKind::ZonedDateTime => Self::ZonedDateTime,
            TemporalKind::LocalDateTime => Self::LocalDateTime,
            TemporalKind::LocalDate => Self::LocalDate,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Decimal => "decimal",
            Self::Guid => "guid",
            Self::Binary => "binary",
            Self::Text => "text",
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

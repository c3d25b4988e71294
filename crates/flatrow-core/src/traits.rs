//! The typed seam between user structs and the codec: leaf conversion
//! ([`FieldValue`]), graph traversal ([`Record`]), and identity hooks
//! ([`TableEntity`]). Derive macros implement [`Record`] and
//! [`TableEntity`] for user structs; the leaf impls live here.

use crate::error::CodecError;
use crate::metadata::FieldDeclaration;
use crate::property::{DeclaredType, PropertyNode, PropertyValue};
use crate::temporal::Temporal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use uuid::Uuid;

///
/// FieldValue
///
/// A scalar leaf type: one declared storage-facing type, a conversion to
/// and from the leaf union, and the value an absent or null column
/// decodes to.
///

pub trait FieldValue: Sized {
    /// Declared type recorded in the per-type property metadata.
    const DECLARED: DeclaredType;

    fn to_property(&self) -> PropertyValue;

    /// `None` when the leaf union variant does not match this type.
    fn from_property(value: &PropertyValue) -> Option<Self>;

    /// The value a missing or null column decodes to.
    fn absent() -> Self;
}

///
/// Record
///
/// A node of the entity graph: declares its flattened leaves, renders
/// itself as a [`PropertyNode`], and rebuilds itself from one. Rebuilding
/// is total: absent leaves take their [`FieldValue::absent`] form, absent
/// optionals become `None`.
///
/// Sequences have no impl on purpose; a `Vec<T>` field is a compile
/// error, not a runtime ambiguity. `Vec<u8>` alone is a leaf (binary).
///

pub trait Record {
    /// Append one [`FieldDeclaration`] per leaf reachable from this node,
    /// keyed under `prefix`, in declaration order.
    fn declare_fields(prefix: &str, out: &mut Vec<FieldDeclaration>) -> Result<(), CodecError>;

    fn to_node(&self) -> PropertyNode;

    fn from_node(node: Option<&PropertyNode>) -> Self;

    /// What a `None` of this type renders as. Leaves override this to an
    /// explicit null so the column is still written; composites stay
    /// empty and emit no columns at all.
    #[must_use]
    fn null_node() -> PropertyNode {
        PropertyNode::empty()
    }
}

///
/// TableEntity
///
/// A root [`Record`] with designated identity fields. The two source
/// fields feed the store's partition/row key columns and are excluded
/// from the flattened property bag in both directions.
///

pub trait TableEntity: Record {
    /// Top-level field name backing the partition key.
    const PARTITION_SOURCE: &'static str;

    /// Top-level field name backing the row key.
    const ROW_SOURCE: &'static str;

    fn partition_key(&self) -> String;

    fn row_key(&self) -> String;

    /// Write the store's key columns back onto the source fields.
    fn restore_keys(&mut self, partition_key: &str, row_key: &str);
}

///
/// LEAF IMPLS
///

macro_rules! impl_field_value_scalar {
    ( $( $type:ty => $variant:ident, $absent:expr );* $(;)? ) => {
        $(
            impl FieldValue for $type {
                const DECLARED: DeclaredType = DeclaredType::$variant;

                fn to_property(&self) -> PropertyValue {
                    PropertyValue::$variant(*self)
                }

                fn from_property(value: &PropertyValue) -> Option<Self> {
                    match value {
                        PropertyValue::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                fn absent() -> Self {
                    $absent
                }
            }
        )*
    };
}

impl_field_value_scalar! {
    bool => Bool, false;
    i32 => Int32, 0;
    i64 => Int64, 0;
    f64 => Float64, 0.0;
    Decimal => Decimal, Decimal::ZERO;
    Uuid => Guid, Uuid::nil();
}

impl FieldValue for String {
    const DECLARED: DeclaredType = DeclaredType::Text;

    fn to_property(&self) -> PropertyValue {
        PropertyValue::Text(self.clone())
    }

    fn from_property(value: &PropertyValue) -> Option<Self> {
        value.as_text().map(ToString::to_string)
    }

    fn absent() -> Self {
        Self::new()
    }
}

impl FieldValue for i16 {
    const DECLARED: DeclaredType = DeclaredType::Int32;

    fn to_property(&self) -> PropertyValue {
        PropertyValue::Int32(i32::from(*self))
    }

    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Int32(v) => Self::try_from(*v).ok(),
            _ => None,
        }
    }

    fn absent() -> Self {
        0
    }
}

impl FieldValue for f32 {
    const DECLARED: DeclaredType = DeclaredType::Float64;

    fn to_property(&self) -> PropertyValue {
        PropertyValue::Float64(f64::from(*self))
    }

    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            #[allow(clippy::cast_possible_truncation)]
            PropertyValue::Float64(v) => Some(*v as Self),
            _ => None,
        }
    }

    fn absent() -> Self {
        0.0
    }
}

impl FieldValue for Vec<u8> {
    const DECLARED: DeclaredType = DeclaredType::Binary;

    fn to_property(&self) -> PropertyValue {
        PropertyValue::Binary(self.clone())
    }

    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Binary(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn absent() -> Self {
        Self::new()
    }
}

macro_rules! impl_field_value_temporal {
    ( $( $type:ty => $variant:ident, $absent:expr );* $(;)? ) => {
        $(
            impl FieldValue for $type {
                const DECLARED: DeclaredType = DeclaredType::$variant;

                fn to_property(&self) -> PropertyValue {
                    PropertyValue::Temporal(Temporal::$variant(*self))
                }

                fn from_property(value: &PropertyValue) -> Option<Self> {
                    match value {
                        PropertyValue::Temporal(Temporal::$variant(v)) => Some(*v),
                        _ => None,
                    }
                }

                fn absent() -> Self {
                    $absent
                }
            }
        )*
    };
}

impl_field_value_temporal! {
    DateTime<Utc> => Instant, DateTime::UNIX_EPOCH;
    DateTime<FixedOffset> => OffsetDateTime, DateTime::UNIX_EPOCH.fixed_offset();
    DateTime<Tz> => ZonedDateTime, DateTime::UNIX_EPOCH.with_timezone(&Tz::UTC);
    NaiveDateTime => LocalDateTime, DateTime::UNIX_EPOCH.naive_utc();
    NaiveDate => LocalDate, DateTime::UNIX_EPOCH.date_naive();
}

///
/// LEAF RECORD IMPLS
///
/// Every leaf is also a one-leaf graph node. Spelled per type rather
/// than as a blanket impl so `Option<T: Record>` below stays coherent.
///

macro_rules! impl_record_for_leaf {
    ( $( $type:ty ),* $(,)? ) => {
        $(
            impl Record for $type {
                fn declare_fields(
                    prefix: &str,
                    out: &mut Vec<FieldDeclaration>,
                ) -> Result<(), CodecError> {
                    out.push(FieldDeclaration::new(prefix, <$type as FieldValue>::DECLARED));
                    Ok(())
                }

                fn to_node(&self) -> PropertyNode {
                    PropertyNode::Value(self.to_property())
                }

                fn from_node(node: Option<&PropertyNode>) -> Self {
                    node.and_then(PropertyNode::as_value)
                        .and_then(<$type as FieldValue>::from_property)
                        .unwrap_or_else(<$type as FieldValue>::absent)
                }

                fn null_node() -> PropertyNode {
                    PropertyNode::Value(PropertyValue::Null)
                }
            }
        )*
    };
}

impl_record_for_leaf! {
    bool,
    i16,
    i32,
    i64,
    f32,
    f64,
    Decimal,
    Uuid,
    Vec<u8>,
    String,
    DateTime<Utc>,
    DateTime<FixedOffset>,
    DateTime<Tz>,
    NaiveDateTime,
    NaiveDate,
}

impl<T: Record> Record for Option<T> {
    fn declare_fields(prefix: &str, out: &mut Vec<FieldDeclaration>) -> Result<(), CodecError> {
        T::declare_fields(prefix, out)
    }

    fn to_node(&self) -> PropertyNode {
        match self {
            Some(value) => value.to_node(),
            None => T::null_node(),
        }
    }

    fn from_node(node: Option<&PropertyNode>) -> Self {
        match node {
            None | Some(PropertyNode::Value(PropertyValue::Null)) => None,
            Some(_) => Some(T::from_node(node)),
        }
    }

    fn null_node() -> PropertyNode {
        T::null_node()
    }
}

///
/// impl_field_value_via_display
///
/// String-encode a user type as a text leaf through its `Display` and
/// `FromStr` impls. This is the catch-all branch for types outside the
/// primitive set.
///

#[macro_export]
macro_rules! impl_field_value_via_display {
    ( $( $type:ty ),* $(,)? ) => {
        $(
            impl $crate::traits::FieldValue for $type {
                const DECLARED: $crate::property::DeclaredType =
                    $crate::property::DeclaredType::Text;

                fn to_property(&self) -> $crate::property::PropertyValue {
                    $crate::property::PropertyValue::Text(self.to_string())
                }

                fn from_property(
                    value: &$crate::property::PropertyValue,
                ) -> Option<Self> {
                    value.as_text().and_then(|text| text.parse().ok())
                }

                fn absent() -> Self {
                    Self::default()
                }
            }

            impl $crate::traits::Record for $type {
                fn declare_fields(
                    prefix: &str,
                    out: &mut Vec<$crate::metadata::FieldDeclaration>,
                ) -> Result<(), $crate::error::CodecError> {
                    out.push($crate::metadata::FieldDeclaration::new(
                        prefix,
                        <$type as $crate::traits::FieldValue>::DECLARED,
                    ));
                    Ok(())
                }

                fn to_node(&self) -> $crate::property::PropertyNode {
                    $crate::property::PropertyNode::Value(
                        $crate::traits::FieldValue::to_property(self),
                    )
                }

                fn from_node(
                    node: Option<&$crate::property::PropertyNode>,
                ) -> Self {
                    node.and_then($crate::property::PropertyNode::as_value)
                        .and_then(<$type as $crate::traits::FieldValue>::from_property)
                        .unwrap_or_else(<$type as $crate::traits::FieldValue>::absent)
                }

                fn null_node() -> $crate::property::PropertyNode {
                    $crate::property::PropertyNode::Value(
                        $crate::property::PropertyValue::Null,
                    )
                }
            }
        )*
    };
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn leaf_round_trips_through_property() {
        let v = 42_i32;
        assert_eq!(i32::from_property(&v.to_property()), Some(42));

        let s = "hello".to_string();
        assert_eq!(String::from_property(&s.to_property()), Some(s));
    }

    #[test]
    fn mismatched_variant_yields_none() {
        assert_eq!(i32::from_property(&PropertyValue::Int64(1)), None);
        assert_eq!(bool::from_property(&PropertyValue::Null), None);
    }

    #[test]
    fn narrow_leaves_declare_widened_types() {
        assert_eq!(i16::DECLARED, DeclaredType::Int32);
        assert_eq!(f32::DECLARED, DeclaredType::Float64);
        assert_eq!(
            i16::from_property(&PropertyValue::Int32(i32::from(i16::MAX))),
            Some(i16::MAX)
        );
        assert_eq!(i16::from_property(&PropertyValue::Int32(i32::MAX)), None);
    }

    #[test]
    fn temporal_leaves_carry_their_kind() {
        let utc = Utc.with_ymd_and_hms(2024, 2, 29, 6, 0, 0).unwrap();
        assert_eq!(
            utc.to_property(),
            PropertyValue::Temporal(Temporal::Instant(utc))
        );
        assert_eq!(<DateTime<Utc>>::DECLARED, DeclaredType::Instant);
        assert_eq!(NaiveDate::DECLARED, DeclaredType::LocalDate);
    }

    #[test]
    fn absent_temporals_are_epoch() {
        assert_eq!(<DateTime<Utc>>::absent(), DateTime::UNIX_EPOCH);
        assert_eq!(
            NaiveDate::absent(),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        );
    }

    #[test]
    fn option_leaf_renders_explicit_null() {
        let none: Option<i64> = None;
        assert_eq!(none.to_node(), PropertyNode::Value(PropertyValue::Null));
        assert_eq!(
            Some(5_i64).to_node(),
            PropertyNode::Value(PropertyValue::Int64(5))
        );
    }

    #[test]
    fn option_leaf_rebuilds_from_null_and_absent() {
        let null_node = PropertyNode::Value(PropertyValue::Null);
        assert_eq!(<Option<i64>>::from_node(Some(&null_node)), None);
        assert_eq!(<Option<i64>>::from_node(None), None);
        assert_eq!(
            <Option<i64>>::from_node(Some(&PropertyNode::Value(PropertyValue::Int64(9)))),
            Some(9)
        );
    }

    #[test]
    fn required_leaf_falls_back_to_absent_value() {
        assert_eq!(i32::from_node(None), 0);
        assert_eq!(String::from_node(None), String::new());
        assert_eq!(<DateTime<Utc>>::from_node(None), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn leaf_declaration_uses_the_full_prefix() {
        let mut out = Vec::new();
        i32::declare_fields("outer__inner", &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key(), "outer__inner");
        assert_eq!(out[0].declared(), DeclaredType::Int32);
    }
}

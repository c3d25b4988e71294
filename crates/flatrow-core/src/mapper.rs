//! Per-leaf mapping between the decoded leaf union and the store's
//! primitive value kinds.

use crate::error::CodecError;
use crate::property::{DeclaredType, PropertyValue};
use crate::storage::StorageValue;
use crate::temporal::{PatternRegistry, Temporal, TemporalKind};
use log::trace;
use rust_decimal::Decimal;

/// Map one leaf to its storage form, dispatching on the leaf's runtime
/// variant.
///
/// Decimals become full-precision strings, never doubles. Temporals are
/// validated against the registry and collapse to the store's single
/// point-in-time kind; zone and offset information survives only in the
/// leaf's canonical string form, which this column does not keep.
pub fn to_storage(
    key: &str,
    leaf: &PropertyValue,
    patterns: &PatternRegistry,
) -> Result<StorageValue, CodecError> {
    let stored = match leaf {
        PropertyValue::Null => StorageValue::Null,
        PropertyValue::Bool(v) => StorageValue::Bool(*v),
        PropertyValue::Int32(v) => StorageValue::Int32(*v),
        PropertyValue::Int64(v) => StorageValue::Int64(*v),
        PropertyValue::Float64(v) => StorageValue::Double(*v),
        PropertyValue::Decimal(v) => StorageValue::String(v.to_string()),
        PropertyValue::Guid(v) => StorageValue::Guid(*v),
        PropertyValue::Binary(v) => StorageValue::Binary(v.clone()),
        PropertyValue::Temporal(t) => {
            patterns.validate(t).map_err(|e| e.with_key(key))?;
            StorageValue::Timestamp(t.to_instant())
        }
        PropertyValue::Text(v) => StorageValue::String(v.clone()),
    };

    Ok(stored)
}

/// Map one stored value back to a leaf, guided by the declared type
/// from the metadata cache.
///
/// With no declared type the value stays storage-native. Shape
/// surprises degrade to a best-effort string rather than failing; the
/// only failure is temporal text that matches no pattern.
pub fn from_storage(
    key: &str,
    value: &StorageValue,
    declared: Option<DeclaredType>,
    patterns: &PatternRegistry,
) -> Result<PropertyValue, CodecError> {
    if value.is_null() {
        return Ok(PropertyValue::Null);
    }

    let Some(declared) = declared else {
        return Ok(storage_native(value));
    };

    if let Some(kind) = declared.temporal_kind() {
        return from_temporal_column(key, value, kind, patterns);
    }

    let leaf = match (declared, value) {
        (DeclaredType::Bool, StorageValue::Bool(v)) => PropertyValue::Bool(*v),

        (DeclaredType::Int32, StorageValue::Int32(v)) => PropertyValue::Int32(*v),
        (DeclaredType::Int32, StorageValue::Int64(v)) => match i32::try_from(*v) {
            Ok(narrowed) => PropertyValue::Int32(narrowed),
            Err(_) => degrade(key, value),
        },

        (DeclaredType::Int64, StorageValue::Int64(v)) => PropertyValue::Int64(*v),
        (DeclaredType::Int64, StorageValue::Int32(v)) => PropertyValue::Int64(i64::from(*v)),

        (DeclaredType::Float64, StorageValue::Double(v)) => PropertyValue::Float64(*v),
        (DeclaredType::Float64, StorageValue::Int32(v)) => PropertyValue::Float64(f64::from(*v)),
        #[allow(clippy::cast_precision_loss)]
        (DeclaredType::Float64, StorageValue::Int64(v)) => PropertyValue::Float64(*v as f64),

        (DeclaredType::Decimal, StorageValue::String(text)) => match text.parse::<Decimal>() {
            Ok(d) => PropertyValue::Decimal(d),
            Err(_) => degrade(key, value),
        },
        (DeclaredType::Decimal, StorageValue::Int32(v)) => PropertyValue::Decimal((*v).into()),
        (DeclaredType::Decimal, StorageValue::Int64(v)) => PropertyValue::Decimal((*v).into()),
        (DeclaredType::Decimal, StorageValue::Double(v)) => match Decimal::try_from(*v) {
            Ok(d) => PropertyValue::Decimal(d),
            Err(_) => degrade(key, value),
        },

        (DeclaredType::Guid, StorageValue::Guid(v)) => PropertyValue::Guid(*v),
        (DeclaredType::Guid, StorageValue::String(text)) => match text.parse() {
            Ok(parsed) => PropertyValue::Guid(parsed),
            Err(_) => degrade(key, value),
        },

        (DeclaredType::Binary, StorageValue::Binary(v)) => PropertyValue::Binary(v.clone()),

        (DeclaredType::Text, _) => PropertyValue::Text(value.display_string()),

        _ => degrade(key, value),
    };

    Ok(leaf)
}

/// A temporal-declared column: either the raw point-in-time kind, which
/// is salvaged into the declared variant, or canonical text, which is
/// parsed with the variant's pattern chain.
fn from_temporal_column(
    key: &str,
    value: &StorageValue,
    kind: TemporalKind,
    patterns: &PatternRegistry,
) -> Result<PropertyValue, CodecError> {
    let leaf = match value {
        StorageValue::Timestamp(utc) => {
            PropertyValue::Temporal(Temporal::from_instant(kind, *utc))
        }
        StorageValue::String(text) => {
            let parsed = patterns.parse(text, kind).map_err(|e| e.with_key(key))?;
            PropertyValue::Temporal(parsed)
        }
        other => degrade(key, other),
    };

    Ok(leaf)
}

/// The leaf a stored value becomes when nothing declares its type.
fn storage_native(value: &StorageValue) -> PropertyValue {
    match value {
        StorageValue::Null => PropertyValue::Null,
        StorageValue::Bool(v) => PropertyValue::Bool(*v),
        StorageValue::Int32(v) => PropertyValue::Int32(*v),
        StorageValue::Int64(v) => PropertyValue::Int64(*v),
        StorageValue::Double(v) => PropertyValue::Float64(*v),
        StorageValue::Guid(v) => PropertyValue::Guid(*v),
        StorageValue::Timestamp(utc) => PropertyValue::Temporal(Temporal::Instant(*utc)),
        StorageValue::Binary(v) => PropertyValue::Binary(v.clone()),
        StorageValue::String(s) => PropertyValue::Text(s.clone()),
    }
}

fn degrade(key: &str, value: &StorageValue) -> PropertyValue {
    trace!("key '{key}': {} column degraded to string", value.kind());
    PropertyValue::Text(value.display_string())
}

///
/// TESTS
///

use base64::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The flat property bag exchanged with the row store: one row, keyed by
/// flattened property name. `BTreeMap` keeps iteration deterministic.
pub type PropertyMap = BTreeMap<String, StorageValue>;

///
/// StorageValue
///
/// The closed set of primitive value kinds the row store understands.
/// This is the wire representation: every leaf of an entity graph is
/// stored as exactly one of these.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StorageValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Guid(Uuid),
    /// A point in time. The store keeps no original textual form, so any
    /// offset or zone the value once carried is not recoverable from this
    /// column alone.
    Timestamp(DateTime<Utc>),
    Binary(Vec<u8>),
    String(String),
}

impl StorageValue {
    /// Stable kind tag for this value.
    #[must_use]
    pub const fn kind(&self) -> StorageKind {
        match self {
            Self::Null => StorageKind::Null,
            Self::Bool(_) => StorageKind::Bool,
            Self::Int32(_) => StorageKind::Int32,
            Self::Int64(_) => StorageKind::Int64,
            Self::Double(_) => StorageKind::Double,
            Self::Guid(_) => StorageKind::Guid,
            Self::Timestamp(_) => StorageKind::Timestamp,
            Self::Binary(_) => StorageKind::Binary,
            Self::String(_) => StorageKind::String,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self { Some(*b) } else { None }
    }

    #[must_use]
    pub const fn as_i32(&self) -> Option<i32> {
        if let Self::Int32(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        if let Self::Int64(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        if let Self::Double(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub const fn as_guid(&self) -> Option<Uuid> {
        if let Self::Guid(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        if let Self::Timestamp(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        if let Self::Binary(v) = self {
            Some(v.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// Best-effort textual rendering, used when a value must degrade to a
    /// string rather than fail. Binary payloads render as standard base64
    /// so the bytes stay recoverable from the text.
    #[must_use]
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int32(v) => v.to_string(),
            Self::Int64(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Guid(v) => v.to_string(),
            Self::Timestamp(v) => v.to_rfc3339(),
            Self::Binary(v) => BASE64_STANDARD.encode(v),
            Self::String(s) => s.clone(),
        }
    }
}

///
/// StorageKind
///
/// Tag enum naming the nine storage kinds; part of the wire vocabulary.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    Null,
    Bool,
    Int32,
    Int64,
    Double,
    Guid,
    Timestamp,
    Binary,
    String,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::Guid => "guid",
            Self::Timestamp => "timestamp",
            Self::Binary => "binary",
            Self::String => "string",
        };
        write!(f, "{label}")
    }
}

macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for StorageValue {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool              => Bool,
    i16               => Int32,
    i32               => Int32,
    i64               => Int64,
    f32               => Double,
    f64               => Double,
    Uuid              => Guid,
    DateTime<Utc>     => Timestamp,
    Vec<u8>           => Binary,
    &str              => String,
    String            => String,
}

///
/// TESTS
///

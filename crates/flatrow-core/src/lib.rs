//! Core runtime for flatrow: the flat-property codec that converts typed
//! entity graphs into the primitive property bags a column-oriented row
//! store understands, and back.
#![warn(unreachable_pub)]

pub mod codec;
pub mod error;
pub mod flatten;
pub mod mapper;
pub mod metadata;
pub mod property;
pub mod storage;
pub mod temporal;
pub mod traits;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Separator token joining path segments in flattened property keys.
///
/// This is part of the persisted wire format: rows written with one
/// separator cannot be read back with another, so it is a public,
/// documented constant rather than an implementation detail.
pub const KEY_SEPARATOR: &str = "__";

/// Reserved partition-key column name of the row store.
pub const PARTITION_KEY: &str = "PartitionKey";

/// Reserved row-key column name of the row store.
pub const ROW_KEY: &str = "RowKey";

///
/// Prelude
///
/// Domain vocabulary only; helpers and internals stay in their modules.
///

pub mod prelude {
    pub use crate::{
        KEY_SEPARATOR, PARTITION_KEY, ROW_KEY,
        codec::{EntityCodec, TableRow},
        error::CodecError,
        property::{DeclaredType, PropertyNode, PropertyValue},
        storage::{PropertyMap, StorageKind, StorageValue},
        temporal::{PatternRegistry, Temporal, TemporalKind},
        traits::{FieldValue, Record, TableEntity},
    };
}

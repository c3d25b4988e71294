//! The codec facade: stateless encode/decode over a shared metadata
//! cache and pattern registry.

use crate::error::CodecError;
use crate::metadata::{MetadataCache, PropertyMetadata};
use crate::storage::PropertyMap;
use crate::temporal::PatternRegistry;
use crate::traits::{Record, TableEntity};
use crate::{PARTITION_KEY, ROW_KEY, flatten, mapper};
use std::sync::Arc;

///
/// TableRow
///
/// One complete row as the store sees it: the two reserved key columns
/// plus the flat property bag. The bag never contains the reserved key
/// names or the entity fields that back them.
///

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub partition_key: String,
    pub row_key: String,
    pub properties: PropertyMap,
}

///
/// EntityCodec
///
/// Encode and decode are pure per call; the metadata cache is the only
/// shared state and the registry is fixed at construction. One codec can
/// serve any number of threads.
///

#[derive(Default)]
pub struct EntityCodec {
    cache: MetadataCache,
    patterns: PatternRegistry,
}

impl EntityCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec with a caller-configured pattern registry, e.g. one that
    /// carries temporal validators.
    #[must_use]
    pub fn with_patterns(patterns: PatternRegistry) -> Self {
        Self {
            cache: MetadataCache::new(),
            patterns,
        }
    }

    #[must_use]
    pub const fn patterns(&self) -> &PatternRegistry {
        &self.patterns
    }

    /// Metadata for a record type, built on first use.
    pub fn metadata<T: Record + 'static>(&self) -> Result<Arc<PropertyMetadata>, CodecError> {
        self.cache.get_or_build::<T>()
    }

    /// Flatten an entity into the store's property bag.
    ///
    /// Identity source fields and the reserved key column names are
    /// excluded; every other declared field appears exactly once, nulls
    /// included.
    pub fn encode<T: TableEntity + 'static>(&self, entity: &T) -> Result<PropertyMap, CodecError> {
        let node = entity.to_node();
        let pairs = flatten::flatten(&node)?;

        let mut map = PropertyMap::new();
        for (key, leaf) in pairs {
            if Self::is_identity_key::<T>(&key) {
                continue;
            }
            let stored = mapper::to_storage(&key, &leaf, &self.patterns)?;
            map.insert(key, stored);
        }

        Ok(map)
    }

    /// Encode an entity together with its identity columns.
    pub fn encode_row<T: TableEntity + 'static>(&self, entity: &T) -> Result<TableRow, CodecError> {
        Ok(TableRow {
            partition_key: entity.partition_key(),
            row_key: entity.row_key(),
            properties: self.encode(entity)?,
        })
    }

    /// Rebuild an entity from a property bag.
    ///
    /// Keys absent from the bag leave their fields at the absent value;
    /// identity source fields stay absent too, since the bag never
    /// carries them. Use [`EntityCodec::decode_row`] to restore them
    /// from the key columns.
    pub fn decode<T: TableEntity + 'static>(&self, map: &PropertyMap) -> Result<T, CodecError> {
        let meta = self.cache.get_or_build::<T>()?;

        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            if Self::is_identity_key::<T>(key) {
                continue;
            }
            let leaf = mapper::from_storage(key, value, meta.declared_for(key), &self.patterns)?;
            entries.push((key.clone(), leaf));
        }

        let node = flatten::unflatten(entries)?;
        Ok(T::from_node(Some(&node)))
    }

    /// Rebuild an entity from a complete row, restoring the identity
    /// source fields from the key columns.
    pub fn decode_row<T: TableEntity + 'static>(&self, row: &TableRow) -> Result<T, CodecError> {
        let mut entity: T = self.decode(&row.properties)?;
        entity.restore_keys(&row.partition_key, &row.row_key);
        Ok(entity)
    }

    fn is_identity_key<T: TableEntity>(key: &str) -> bool {
        key == T::PARTITION_SOURCE
            || key == T::ROW_SOURCE
            || key == PARTITION_KEY
            || key == ROW_KEY
    }
}

///
/// TESTS
///

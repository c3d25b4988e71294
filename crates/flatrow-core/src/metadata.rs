//! Per-type property metadata and the process-wide cache that serves it.

use crate::error::CodecError;
use crate::property::DeclaredType;
use crate::traits::Record;
use log::debug;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

///
/// FieldDeclaration
///
/// One flattened leaf of a record type: its full key and declared type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDeclaration {
    key: String,
    declared: DeclaredType,
}

impl FieldDeclaration {
    #[must_use]
    pub fn new(key: &str, declared: DeclaredType) -> Self {
        Self {
            key: key.to_string(),
            declared,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn declared(&self) -> DeclaredType {
        self.declared
    }
}

///
/// PropertyMetadata
///
/// The flattened shape of one record type: every leaf key with its
/// declared type, in declaration order, plus an index for decode-side
/// lookup.
///

#[derive(Debug)]
pub struct PropertyMetadata {
    type_name: &'static str,
    fields: Vec<FieldDeclaration>,
    by_key: HashMap<String, DeclaredType>,
}

impl PropertyMetadata {
    /// Build the metadata for a record type by walking its declarations.
    pub fn for_record<T: Record>() -> Result<Self, CodecError> {
        let mut fields = Vec::new();
        T::declare_fields("", &mut fields)?;

        let by_key = fields
            .iter()
            .map(|field| (field.key.clone(), field.declared))
            .collect();

        Ok(Self {
            type_name: type_name::<T>(),
            fields,
            by_key,
        })
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Leaf declarations in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }

    /// Declared type for a flattened key; `None` for unknown keys, which
    /// the mapper treats as storage-native values.
    #[must_use]
    pub fn declared_for(&self, key: &str) -> Option<DeclaredType> {
        self.by_key.get(key).copied()
    }
}

///
/// MetadataCache
///
/// Insert-once map from concrete record type to its metadata. Metadata
/// is computed outside the lock; when two threads race on first access
/// the first insert wins and the duplicate computation is discarded.
///

#[derive(Debug, Default)]
pub struct MetadataCache {
    inner: RwLock<HashMap<TypeId, Arc<PropertyMetadata>>>,
}

impl MetadataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the metadata for `T`, building it on first access.
    pub fn get_or_build<T: Record + 'static>(&self) -> Result<Arc<PropertyMetadata>, CodecError> {
        let type_id = TypeId::of::<T>();

        {
            let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(found) = map.get(&type_id) {
                return Ok(found.clone());
            }
        }

        let built = Arc::new(PropertyMetadata::for_record::<T>()?);
        debug!(
            "built property metadata for {} ({} fields)",
            built.type_name(),
            built.fields().len()
        );

        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        Ok(map.entry(type_id).or_insert(built).clone())
    }

    /// Number of cached record types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{Inventory, Shipment};

    #[test]
    fn metadata_lists_leaves_in_declaration_order() {
        let meta = PropertyMetadata::for_record::<Shipment>().unwrap();
        let keys: Vec<&str> = meta.fields().iter().map(FieldDeclaration::key).collect();
        assert_eq!(
            keys,
            vec![
                "key",
                "int_value",
                "long_value",
                "string_value",
                "offset_value",
                "origin__city",
                "origin__geo__lat",
                "origin__geo__lon",
            ]
        );
    }

    #[test]
    fn declared_for_resolves_nested_keys() {
        let meta = PropertyMetadata::for_record::<Shipment>().unwrap();
        assert_eq!(
            meta.declared_for("origin__geo__lat"),
            Some(DeclaredType::Float64)
        );
        assert_eq!(
            meta.declared_for("offset_value"),
            Some(DeclaredType::OffsetDateTime)
        );
        assert_eq!(meta.declared_for("nonsense"), None);
    }

    #[test]
    fn cache_returns_one_instance_per_type() {
        let cache = MetadataCache::new();
        assert!(cache.is_empty());

        let first = cache.get_or_build::<Shipment>().unwrap();
        let second = cache.get_or_build::<Shipment>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.get_or_build::<Inventory>().unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_first_access_converges() {
        let cache = Arc::new(MetadataCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.get_or_build::<Shipment>().unwrap())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.len(), 1);
        for pair in results.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
    }
}

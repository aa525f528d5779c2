//! # Metadata Cache
//!
//! Memoizes each target type's field metadata by `TypeId`. Introspection runs
//! the type's mapping declaration and resolves write strategies, so it is done
//! once per type for the lifetime of the cache.

use crate::mapping::{TypeDescriptor, TypeMetadata};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: DashMap<TypeId, Arc<TypeMetadata>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field metadata for the descriptor's type, in declaration order.
    pub fn fields_of(&self, descriptor: &TypeDescriptor) -> Arc<TypeMetadata> {
        if let Some(hit) = self.entries.get(&descriptor.type_id()) {
            return Arc::clone(hit.value());
        }

        // Introspect outside the shard lock; a racing thread computes the same
        // metadata and the first insert is kept.
        let metadata = Arc::new(descriptor.introspect());
        debug!(
            target_type = %descriptor.type_name(),
            fields = metadata.fields().len(),
            "Introspected type metadata"
        );
        Arc::clone(
            self.entries
                .entry(descriptor.type_id())
                .or_insert(metadata)
                .value(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

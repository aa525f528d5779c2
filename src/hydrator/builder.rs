//! Assembly of a [`Hydrator`] from its shared parts.

use super::Hydrator;
use crate::caster::{CastCache, Caster};
use crate::config::MapperConfig;
use crate::error::HydrationResult;
use crate::logging;
use crate::metadata::MetadataCache;
use crate::registry::TypeRegistry;
use std::sync::Arc;
use tracing::info;

/// Builder for [`Hydrator`].
///
/// Anything not supplied is created fresh. A default caster gets a cast cache
/// sized and enabled according to the configuration.
#[derive(Debug, Default)]
pub struct HydratorBuilder {
    config: Option<MapperConfig>,
    registry: Option<Arc<TypeRegistry>>,
    metadata: Option<Arc<MetadataCache>>,
    caster: Option<Arc<Caster>>,
    init_logging: bool,
}

impl HydratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: MapperConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share a registry with other hydrators.
    pub fn registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn metadata(mut self, metadata: Arc<MetadataCache>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Use a caster with custom handlers. Its cache is used as is.
    pub fn caster(mut self, caster: Arc<Caster>) -> Self {
        self.caster = Some(caster);
        self
    }

    /// Install the structured logging subscriber at the config's `log_level`
    /// when building.
    pub fn init_logging(mut self) -> Self {
        self.init_logging = true;
        self
    }

    pub fn build(self) -> HydrationResult<Hydrator> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        if self.init_logging {
            logging::init_from_config(&config);
        }

        let caster = self.caster.unwrap_or_else(|| {
            let cache = if config.cast_cache_enabled {
                CastCache::new(config.cast_cache_max_entries)
            } else {
                CastCache::disabled()
            };
            Arc::new(Caster::new(Arc::new(cache)))
        });

        info!(
            class_key = %config.class_key,
            cast_cache_enabled = caster.cache().is_enabled(),
            "Hydrator initialized"
        );

        Ok(Hydrator::from_parts(
            config,
            self.registry.unwrap_or_default(),
            self.metadata.unwrap_or_default(),
            caster,
        ))
    }
}

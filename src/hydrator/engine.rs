//! Single-record hydration.

use super::{Hydrated, HydratorBuilder, MismatchPolicy};
use crate::caster::{CastContext, CastValue, Caster};
use crate::config::MapperConfig;
use crate::error::{CastError, HydrationError, HydrationResult};
use crate::link_tracker::{LinkManifest, LinkTracker};
use crate::logging::log_hydration_operation;
use crate::mapping::{FieldMapping, Mapped, TypeDescriptor};
use crate::metadata::MetadataCache;
use crate::proxy::{LazyLink, LazyProxy};
use crate::record::Record;
use crate::registry::TypeRegistry;
use crate::rid::Rid;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Hydration engine. `Send + Sync`; share it behind an `Arc`.
#[derive(Debug)]
pub struct Hydrator {
    config: MapperConfig,
    registry: Arc<TypeRegistry>,
    metadata: Arc<MetadataCache>,
    caster: Arc<Caster>,
}

impl Hydrator {
    pub fn builder() -> HydratorBuilder {
        HydratorBuilder::new()
    }

    /// Hydrator with a fresh registry and caches configured by `config`.
    pub fn new(config: MapperConfig) -> HydrationResult<Self> {
        HydratorBuilder::new().config(config).build()
    }

    pub(crate) fn from_parts(
        config: MapperConfig,
        registry: Arc<TypeRegistry>,
        metadata: Arc<MetadataCache>,
        caster: Arc<Caster>,
    ) -> Self {
        Self {
            config,
            registry,
            metadata,
            caster,
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn metadata(&self) -> &Arc<MetadataCache> {
        &self.metadata
    }

    pub fn caster(&self) -> &Arc<Caster> {
        &self.caster
    }

    /// Build a typed document and its link manifest from one record.
    pub fn hydrate(&self, record: &Record, policy: MismatchPolicy) -> HydrationResult<Hydrated> {
        let store_class = self.store_class(record)?;
        let descriptor = self.registry.resolve(store_class)?;

        match self.populate(record, &descriptor, policy) {
            Ok((hydrated, assigned)) => {
                log_hydration_operation(
                    store_class,
                    descriptor.type_name(),
                    assigned,
                    hydrated.links().len(),
                    "success",
                );
                Ok(hydrated)
            }
            Err(error) => {
                log_hydration_operation(store_class, descriptor.type_name(), 0, 0, "failed");
                debug!(store_class = %store_class, error = %error, "Hydration aborted");
                Err(error)
            }
        }
    }

    /// Hydrate and take the document out as `T`.
    pub fn hydrate_as<T: Mapped>(
        &self,
        record: &Record,
        policy: MismatchPolicy,
    ) -> HydrationResult<(T, LinkManifest)> {
        self.hydrate(record, policy)?.into_typed::<T>()
    }

    /// Deferred hydration of a linked record.
    ///
    /// `fetch` loads the record for `rid` and runs at most once, on first
    /// access to the proxy. The linked document's own manifest is dropped.
    pub fn lazy_link<T, F>(
        self: &Arc<Self>,
        rid: Rid,
        policy: MismatchPolicy,
        fetch: F,
    ) -> LazyProxy<HydrationResult<T>>
    where
        T: Mapped,
        F: Fn(Rid) -> HydrationResult<Record> + Send + Sync + 'static,
    {
        LazyProxy::new(self.link_loader::<T, F>(rid, policy, fetch))
    }

    /// Install the loader of a [`LazyLink`] field taken from a hydrated
    /// document. Returns `false` if the link already had one.
    pub fn bind_link<T, F>(
        self: &Arc<Self>,
        link: &LazyLink<T>,
        policy: MismatchPolicy,
        fetch: F,
    ) -> bool
    where
        T: Mapped,
        F: Fn(Rid) -> HydrationResult<Record> + Send + Sync + 'static,
    {
        link.install(self.link_loader::<T, F>(link.rid(), policy, fetch))
    }

    fn link_loader<T, F>(
        self: &Arc<Self>,
        rid: Rid,
        policy: MismatchPolicy,
        fetch: F,
    ) -> impl Fn() -> HydrationResult<T> + Send + Sync + 'static
    where
        T: Mapped,
        F: Fn(Rid) -> HydrationResult<Record> + Send + Sync + 'static,
    {
        let hydrator = Arc::clone(self);
        move || {
            debug!(rid = %rid, "Loading linked record");
            let record = fetch(rid)?;
            hydrator
                .hydrate_as::<T>(&record, policy)
                .map(|(document, _)| document)
        }
    }

    fn store_class<'r>(&self, record: &'r Record) -> HydrationResult<&'r str> {
        let key = &self.config.class_key;
        match record.class_value(key) {
            None => Err(HydrationError::MissingClassDiscriminator { key: key.clone() }),
            Some(Value::String(class)) if !class.is_empty() => Ok(class.as_str()),
            Some(_) => Err(HydrationError::EmptyClassDiscriminator { key: key.clone() }),
        }
    }

    fn populate(
        &self,
        record: &Record,
        descriptor: &TypeDescriptor,
        policy: MismatchPolicy,
    ) -> HydrationResult<(Hydrated, usize)> {
        let mut document = descriptor.instantiate();
        let metadata = self.metadata.fields_of(descriptor);
        let mut tracker = LinkTracker::new();
        let mut assigned = 0;

        for field in metadata.fields() {
            // Absent fields keep the instance default
            let Some(raw) = record.get(field.store_field()) else {
                continue;
            };

            let value = self.cast_field(field, raw, policy)?;
            if !field.is_metadata() {
                if let Some(links) = value.links() {
                    tracker.add(field.name(), links);
                }
            }

            metadata.assign(document.as_any_mut(), field, value)?;
            assigned += 1;
        }

        let hydrated = Hydrated::new(
            document,
            tracker.into_manifest(),
            descriptor.type_name().to_string(),
        );
        Ok((hydrated, assigned))
    }

    fn cast_field(
        &self,
        field: &FieldMapping,
        raw: &Value,
        policy: MismatchPolicy,
    ) -> HydrationResult<CastValue> {
        let Some(tag) = field.cast_type() else {
            return Ok(CastValue::Raw(raw.clone()));
        };

        let context = CastContext::new(tag, field.name())
            .with_nullable(field.is_nullable())
            .with_options(field.options());

        match self.caster.cast(tag, raw, &context) {
            Ok(value) => Ok(value),
            Err(CastError::Value { .. }) if field.is_nullable() => {
                debug!(field = %field.name(), tag = %tag, "Cast failed on nullable field, assigning null");
                Ok(CastValue::Null)
            }
            Err(CastError::Value { value, .. }) if policy.is_tolerant() => {
                warn!(
                    field = %field.name(),
                    tag = %tag,
                    value = %value,
                    "Tolerated cast failure on non-nullable field, assigning null"
                );
                Ok(CastValue::Null)
            }
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_tracker::LinkRef;
    use crate::mapping::TypeMapping;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        rid: Option<Rid>,
        name: String,
        age: i64,
        score: Option<i64>,
        manager: Option<Rid>,
        nickname: Option<String>,
        tags: Value,
    }

    impl Mapped for Person {
        fn mapping() -> TypeMapping<Self> {
            TypeMapping::new("Person")
                .alias("Person")
                .field(FieldMapping::new("rid").store_name("@rid").cast("link"))
                .field(FieldMapping::new("name").cast("string"))
                .field(FieldMapping::new("age").cast("integer"))
                .field(FieldMapping::new("score").cast("integer").nullable(true))
                .field(FieldMapping::new("manager").cast("link").nullable(true))
                .field(FieldMapping::new("nickname"))
                .field(FieldMapping::new("tags"))
                .setter("setRid", |p: &mut Person, v| p.rid = v)
                .setter("setName", |p: &mut Person, v| p.name = v)
                .setter("setAge", |p: &mut Person, v| p.age = v)
                .setter("setScore", |p: &mut Person, v| p.score = v)
                .setter("setManager", |p: &mut Person, v| p.manager = v)
                .public_field("nickname", |p: &mut Person, v| p.nickname = v)
                .public_field("tags", |p: &mut Person, v| p.tags = v)
        }
    }

    fn hydrator() -> Hydrator {
        let hydrator = Hydrator::builder().build().unwrap();
        hydrator.registry().register::<Person>("app");
        hydrator
    }

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_hydrates_declared_fields() {
        let (person, links) = hydrator()
            .hydrate_as::<Person>(
                &record(json!({"@class": "Person", "name": "Ann", "age": "34", "extra": 1})),
                MismatchPolicy::Strict,
            )
            .unwrap();
        assert_eq!(person.name, "Ann");
        assert_eq!(person.age, 34);
        assert_eq!(person.manager, None);
        assert!(links.is_empty());
    }

    #[test]
    fn test_discriminator_errors() {
        let hydrator = hydrator();
        assert_eq!(
            hydrator
                .hydrate(&record(json!({"name": "Ann"})), MismatchPolicy::Strict)
                .unwrap_err(),
            HydrationError::MissingClassDiscriminator {
                key: "@class".to_string()
            }
        );
        for empty in [json!(""), json!(null), json!(false), json!(0)] {
            assert_eq!(
                hydrator
                    .hydrate(&record(json!({"@class": empty})), MismatchPolicy::Strict)
                    .unwrap_err(),
                HydrationError::EmptyClassDiscriminator {
                    key: "@class".to_string()
                }
            );
        }
    }

    #[test]
    fn test_custom_class_key() {
        let config = MapperConfig {
            class_key: "@type".to_string(),
            ..MapperConfig::default()
        };
        let hydrator = Hydrator::new(config).unwrap();
        hydrator.registry().register::<Person>("app");
        let hydrated = hydrator
            .hydrate(&record(json!({"@type": "Person", "name": "Bo"})), MismatchPolicy::Strict)
            .unwrap();
        assert_eq!(hydrated.downcast_ref::<Person>().map(|p| p.name.as_str()), Some("Bo"));
    }

    #[test]
    fn test_nullable_and_tolerant_failures() {
        let hydrator = hydrator();

        let person = hydrator
            .hydrate_as::<Person>(
                &record(json!({"@class": "Person", "name": "Ann", "score": "abc"})),
                MismatchPolicy::Strict,
            )
            .unwrap()
            .0;
        assert_eq!(person.score, None);
        assert_eq!(person.name, "Ann");

        let strict = hydrator.hydrate(
            &record(json!({"@class": "Person", "age": "old"})),
            MismatchPolicy::Strict,
        );
        assert!(matches!(strict, Err(HydrationError::CastValueError { .. })));

        // null into a plain i64 setter cannot be assigned
        let tolerant = hydrator.hydrate(
            &record(json!({"@class": "Person", "age": "old"})),
            MismatchPolicy::Tolerant,
        );
        assert!(matches!(tolerant, Err(HydrationError::AssignmentFailed { .. })));
    }

    #[test]
    fn test_links_are_tracked_and_assigned() {
        let (person, links) = hydrator()
            .hydrate_as::<Person>(
                &record(json!({
                    "@class": "Person",
                    "@rid": "#12:3",
                    "manager": "#12:1",
                    "nickname": "#not-a-rid",
                    "tags": ["#9:1", "plain"]
                })),
                MismatchPolicy::Strict,
            )
            .unwrap();

        assert_eq!(person.rid, Some(Rid::new(12, 3)));
        assert_eq!(person.manager, Some(Rid::new(12, 1)));
        assert_eq!(person.nickname.as_deref(), Some("#not-a-rid"));
        assert_eq!(links.get("manager"), Some(&LinkRef::One(Rid::new(12, 1))));
        assert_eq!(links.get("tags"), Some(&LinkRef::Many(vec![Rid::new(9, 1)])));
        assert!(!links.contains("rid"));
        assert!(!links.contains("nickname"));
    }

    #[test]
    fn test_lazy_link_loads_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let hydrator = Arc::new(hydrator());
        let fetches = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fetches);
        let proxy = hydrator.lazy_link::<Person, _>(Rid::new(5, 1), MismatchPolicy::Strict, move |rid| {
            counter.fetch_add(1, Ordering::SeqCst);
            Record::from_value(json!({"@class": "Person", "@rid": rid.to_string(), "name": "Cy"}))
        });

        assert!(!proxy.is_loaded());
        assert_eq!(proxy.try_get().map(|p| p.name.as_str()), Ok("Cy"));
        assert_eq!(proxy.try_get().map(|p| p.rid), Ok(Some(Rid::new(5, 1))));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}

//! # Caster
//!
//! Pure value transformation: a raw JSON value plus a declared type tag in, a
//! typed [`CastValue`] out.
//!
//! ## Overview
//!
//! Dispatch goes through a table keyed by lower-cased type tag. The table is
//! seeded with the store's built-in types and can be extended with custom
//! tags through [`Caster::register`] before the caster is shared.
//!
//! ```text
//! (tag, raw, context) ──► handler table ──► CastCache ──► CastValue
//!                              │
//!                              └── unknown tag ──► CastError::Unsupported
//! ```
//!
//! An unknown tag is a mapping bug and is reported as
//! [`CastError::Unsupported`]; a value that cannot be coerced is reported as
//! [`CastError::Value`] so the hydrator can apply per-field nullability.
//!
//! ## Usage
//!
//! ```rust
//! use graph_odm::caster::{CastContext, CastValue, Caster};
//! use serde_json::json;
//!
//! let caster = Caster::default();
//! let context = CastContext::new("integer", "age");
//! assert_eq!(caster.cast("integer", &json!("34"), &context), Ok(CastValue::Integer(34)));
//! ```

pub mod cache;
pub mod handlers;
pub mod value;

pub use cache::{CastCache, CastCacheStats, CastKey};
pub use value::{CastValue, Embedded, FromCast};

use crate::constants::cast_types;
use crate::error::CastError;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

static NO_OPTIONS: BTreeMap<String, String> = BTreeMap::new();

/// Ambient information handed to every cast handler.
#[derive(Debug, Clone, Copy)]
pub struct CastContext<'a> {
    /// The tag being cast to, as declared on the field
    pub tag: &'a str,
    /// Target field name
    pub field: &'a str,
    pub nullable: bool,
    /// Extra mapping parameters (e.g. `format`)
    pub options: &'a BTreeMap<String, String>,
}

impl<'a> CastContext<'a> {
    pub fn new(tag: &'a str, field: &'a str) -> Self {
        Self {
            tag,
            field,
            nullable: false,
            options: &NO_OPTIONS,
        }
    }

    pub fn with_options(mut self, options: &'a BTreeMap<String, String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn option(&self, key: &str) -> Option<&'a str> {
        self.options.get(key).map(String::as_str)
    }
}

/// A converter for one type tag.
pub trait CastHandler: Send + Sync {
    fn cast(&self, raw: &Value, ctx: &CastContext<'_>) -> Result<CastValue, CastError>;

    /// Whether results may be memoized in the [`CastCache`].
    fn cacheable(&self) -> bool {
        true
    }
}

impl<F> CastHandler for F
where
    F: Fn(&Value, &CastContext<'_>) -> Result<CastValue, CastError> + Send + Sync,
{
    fn cast(&self, raw: &Value, ctx: &CastContext<'_>) -> Result<CastValue, CastError> {
        self(raw, ctx)
    }
}

/// Wraps a handler whose results must never be memoized.
pub struct Uncached<H>(pub H);

impl<H: CastHandler> CastHandler for Uncached<H> {
    fn cast(&self, raw: &Value, ctx: &CastContext<'_>) -> Result<CastValue, CastError> {
        self.0.cast(raw, ctx)
    }

    fn cacheable(&self) -> bool {
        false
    }
}

pub struct Caster {
    handlers: HashMap<String, Arc<dyn CastHandler>>,
    cache: Arc<CastCache>,
}

impl fmt::Debug for Caster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("Caster")
            .field("tags", &tags)
            .field("cache", &self.cache.stats())
            .finish()
    }
}

impl Default for Caster {
    fn default() -> Self {
        Self::new(Arc::new(CastCache::default()))
    }
}

impl Caster {
    /// Create a caster with the built-in store types, memoizing into `cache`.
    pub fn new(cache: Arc<CastCache>) -> Self {
        let mut caster = Self {
            handlers: HashMap::new(),
            cache,
        };
        caster.register_builtins();
        caster
    }

    fn register_builtins(&mut self) {
        use handlers as h;
        self.register(cast_types::BOOLEAN, h::boolean);
        self.register(cast_types::INTEGER, h::integer);
        self.register(cast_types::SHORT, h::short);
        self.register(cast_types::LONG, h::long);
        self.register(cast_types::BYTE, h::byte);
        self.register(cast_types::FLOAT, h::float);
        self.register(cast_types::DOUBLE, h::float);
        self.register(cast_types::DECIMAL, h::decimal);
        self.register(cast_types::STRING, h::string);
        self.register(cast_types::BINARY, h::binary);
        self.register(cast_types::DATE, h::date);
        self.register(cast_types::DATETIME, h::datetime);
        self.register(cast_types::LINK, h::link);
        self.register(cast_types::LINK_LIST, h::link_list);
        self.register(cast_types::LINK_SET, h::link_set);
        self.register(cast_types::LINK_MAP, h::link_map);
        self.register(cast_types::EMBEDDED, h::embedded);
        self.register(cast_types::EMBEDDED_LIST, h::embedded_list);
        self.register(cast_types::EMBEDDED_SET, h::embedded_set);
        self.register(cast_types::EMBEDDED_MAP, h::embedded_map);
    }

    /// Register (or replace) the handler for `tag`.
    pub fn register(&mut self, tag: &str, handler: impl CastHandler + 'static) -> &mut Self {
        let tag = tag.to_ascii_lowercase();
        if self.handlers.insert(tag.clone(), Arc::new(handler)).is_some() {
            debug!(tag = %tag, "Replaced cast handler");
        }
        self
    }

    /// Register a closure for `tag`.
    pub fn register_fn<F>(&mut self, tag: &str, handler: F) -> &mut Self
    where
        F: Fn(&Value, &CastContext<'_>) -> Result<CastValue, CastError> + Send + Sync + 'static,
    {
        self.register(tag, handler)
    }

    pub fn supports(&self, tag: &str) -> bool {
        self.handlers.contains_key(&tag.to_ascii_lowercase())
    }

    pub fn cache(&self) -> &Arc<CastCache> {
        &self.cache
    }

    /// Cast `raw` to the type named by `tag`.
    pub fn cast(&self, tag: &str, raw: &Value, ctx: &CastContext<'_>) -> Result<CastValue, CastError> {
        let normalized = tag.to_ascii_lowercase();
        let handler = self
            .handlers
            .get(&normalized)
            .ok_or_else(|| CastError::Unsupported(tag.to_string()))?;
        let ctx = &CastContext {
            tag: &normalized,
            ..*ctx
        };

        if !handler.cacheable() {
            return handler.cast(raw, ctx);
        }

        let key = CastKey::new(&normalized, ctx.options, raw);
        self.cache.get_or_compute(key, || handler.cast(raw, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let caster = Caster::default();
        let ctx = CastContext::new("money", "price");
        assert_eq!(
            caster.cast("money", &json!(1), &ctx),
            Err(CastError::Unsupported("money".to_string()))
        );
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        let caster = Caster::default();
        let ctx = CastContext::new("LinkList", "friends");
        assert!(caster.supports("EmbeddedMap"));
        assert!(caster.cast("LinkList", &json!(["#1:1"]), &ctx).is_ok());
    }

    #[test]
    fn test_every_builtin_tag_is_registered() {
        let caster = Caster::default();
        for tag in cast_types::ALL {
            assert!(caster.supports(tag), "missing handler for {tag}");
        }
    }

    #[test]
    fn test_cached_errors_report_normalized_tag() {
        let caster = Caster::default();
        let expected = Err(CastError::value("integer", &json!("abc")));
        assert_eq!(
            caster.cast("Integer", &json!("abc"), &CastContext::new("Integer", "age")),
            expected
        );
        assert_eq!(
            caster.cast("integer", &json!("abc"), &CastContext::new("integer", "age")),
            expected
        );
        assert_eq!(
            caster.cast("INTEGER", &json!("abc"), &CastContext::new("INTEGER", "age")),
            expected
        );
    }

    #[test]
    fn test_value_errors_are_distinct() {
        let caster = Caster::default();
        let ctx = CastContext::new("integer", "age");
        assert_eq!(
            caster.cast("integer", &json!("abc"), &ctx),
            Err(CastError::value("integer", &json!("abc")))
        );
    }

    #[test]
    fn test_custom_handler_and_cache() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let mut caster = Caster::new(Arc::new(CastCache::new(100)));
        caster.register_fn("upper", |raw, ctx| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            raw.as_str()
                .map(|s| CastValue::String(s.to_uppercase()))
                .ok_or_else(|| CastError::value(ctx.tag, raw))
        });

        let ctx = CastContext::new("upper", "code");
        for _ in 0..3 {
            assert_eq!(
                caster.cast("upper", &json!("ab"), &ctx),
                Ok(CastValue::String("AB".to_string()))
            );
        }
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(caster.cache().stats().hits, 2);
    }

    static COUNTED: AtomicUsize = AtomicUsize::new(0);

    fn counted(_: &Value, _: &CastContext<'_>) -> Result<CastValue, CastError> {
        let n = COUNTED.fetch_add(1, Ordering::SeqCst);
        Ok(CastValue::Integer(i64::try_from(n).unwrap_or(i64::MAX)))
    }

    #[test]
    fn test_uncached_handler_runs_every_time() {
        let mut caster = Caster::default();
        caster.register("counted", Uncached(counted));
        let ctx = CastContext::new("counted", "n");
        caster.cast("counted", &json!(1), &ctx).unwrap();
        caster.cast("counted", &json!(1), &ctx).unwrap();
        assert_eq!(COUNTED.load(Ordering::SeqCst), 2);
        assert_eq!(caster.cache().stats().entries, 0);
    }
}

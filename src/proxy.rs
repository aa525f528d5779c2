//! # Lazy Proxy
//!
//! Stand-in for a linked document that is only loaded when first used.
//!
//! The proxy derefs to the loaded value, so callers use it exactly like the
//! value itself. The loader runs at most once even when many threads touch
//! the proxy at the same time: `OnceLock` blocks concurrent first callers
//! until the single initialization finishes.
//!
//! ```rust
//! use graph_odm::proxy::LazyProxy;
//!
//! let greeting = LazyProxy::new(|| String::from("hello"));
//! assert!(!greeting.is_loaded());
//! assert_eq!(greeting.len(), 5); // String::len through Deref
//! assert!(greeting.is_loaded());
//! ```
//!
//! A target type can also declare a link field as [`LazyLink<T>`]. Hydration
//! only stores the link's `Rid`; the hydrator installs the loader afterwards
//! with `Hydrator::bind_link`, and the linked document is fetched on first
//! `try_get`.

use crate::caster::{CastValue, FromCast};
use crate::error::{HydrationError, HydrationResult};
use crate::rid::Rid;
use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

type Loader<T> = Box<dyn Fn() -> T + Send + Sync>;

pub struct LazyProxy<T> {
    value: OnceLock<T>,
    loader: Loader<T>,
}

impl<T> LazyProxy<T> {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            value: OnceLock::new(),
            loader: Box::new(loader),
        }
    }

    /// The loaded value, running the loader on first access.
    pub fn get(&self) -> &T {
        self.value.get_or_init(|| (self.loader)())
    }

    pub fn is_loaded(&self) -> bool {
        self.value.get().is_some()
    }

    /// Loaded value if already present, without triggering the loader.
    pub fn peek(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn into_inner(self) -> T {
        let Self { value, loader } = self;
        value.into_inner().unwrap_or_else(|| loader())
    }
}

impl<T, E> LazyProxy<Result<T, E>> {
    /// Load and split a fallible loader's outcome.
    pub fn try_get(&self) -> Result<&T, &E> {
        self.get().as_ref()
    }
}

impl<T> Deref for LazyProxy<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(value) => f.debug_tuple("LazyProxy").field(value).finish(),
            None => f.write_str("LazyProxy(<unloaded>)"),
        }
    }
}

/// Link field whose target document is loaded on demand.
pub struct LazyLink<T> {
    rid: Rid,
    loader: OnceLock<Loader<HydrationResult<T>>>,
    value: OnceLock<HydrationResult<T>>,
}

impl<T> LazyLink<T> {
    /// Unbound link to `rid`.
    pub fn new(rid: Rid) -> Self {
        Self {
            rid,
            loader: OnceLock::new(),
            value: OnceLock::new(),
        }
    }

    pub fn rid(&self) -> Rid {
        self.rid
    }

    /// Install the loader. The first installed loader wins.
    pub fn install<F>(&self, loader: F) -> bool
    where
        F: Fn() -> HydrationResult<T> + Send + Sync + 'static,
    {
        self.loader.set(Box::new(loader)).is_ok()
    }

    pub fn is_bound(&self) -> bool {
        self.loader.get().is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.value.get().is_some()
    }

    /// Load outcome if already present, without triggering the loader.
    pub fn peek(&self) -> Option<&HydrationResult<T>> {
        self.value.get()
    }

    /// The linked document, loading it on first call. Load failures are kept
    /// and returned again on later calls.
    pub fn try_get(&self) -> HydrationResult<&T> {
        let outcome = match self.value.get() {
            Some(outcome) => outcome,
            None => {
                let loader = self
                    .loader
                    .get()
                    .ok_or_else(|| HydrationError::UnboundLink(self.rid.to_string()))?;
                self.value.get_or_init(|| loader())
            }
        };
        outcome.as_ref().map_err(Clone::clone)
    }
}

impl<T> FromCast for LazyLink<T> {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        Rid::from_cast(value).map(LazyLink::new)
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyLink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("LazyLink");
        out.field("rid", &self.rid.to_string());
        match self.peek() {
            Some(outcome) => out.field("value", outcome),
            None => out.field("value", &format_args!("<unloaded>")),
        };
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_loader_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let proxy = LazyProxy::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![1, 2, 3]
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(proxy.len(), 3);
        assert_eq!(proxy.first(), Some(&1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let proxy = Arc::new(LazyProxy::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(10));
            42_u32
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let proxy = Arc::clone(&proxy);
                std::thread::spawn(move || *proxy.get())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_try_get_and_debug() {
        let failing: LazyProxy<Result<u8, String>> = LazyProxy::new(|| Err("gone".to_string()));
        assert_eq!(format!("{failing:?}"), "LazyProxy(<unloaded>)");
        assert_eq!(failing.try_get(), Err(&"gone".to_string()));
        assert!(failing.is_loaded());
    }

    #[test]
    fn test_into_inner_loads_when_needed() {
        let proxy = LazyProxy::new(|| 7);
        assert_eq!(proxy.into_inner(), 7);
    }

    #[test]
    fn test_lazy_link_from_link_value() {
        let link = LazyLink::<String>::from_cast(CastValue::Link(Rid::new(4, 2))).unwrap();
        assert_eq!(link.rid(), Rid::new(4, 2));
        assert!(!link.is_bound());
        assert!(!link.is_loaded());

        let raw = LazyLink::<String>::from_cast(CastValue::Raw(serde_json::json!("#4:3"))).unwrap();
        assert_eq!(raw.rid(), Rid::new(4, 3));
        assert!(LazyLink::<String>::from_cast(CastValue::Integer(4)).is_err());
    }

    #[test]
    fn test_lazy_link_loads_once_after_install() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let link = LazyLink::new(Rid::new(4, 2));

        assert_eq!(
            link.try_get(),
            Err(HydrationError::UnboundLink("#4:2".to_string()))
        );
        assert!(!link.is_loaded());

        assert!(link.install(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("linked".to_string())
        }));
        assert!(!link.install(|| Ok("second".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(link.try_get().map(String::as_str), Ok("linked"));
        assert_eq!(link.try_get().map(String::as_str), Ok("linked"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(format!("{link:?}").contains("linked"));
    }
}

//! # Type Registry
//!
//! Maps store class names to target type descriptors.
//!
//! ## Resolution
//!
//! ```text
//! store class ──► memo hit? ──yes──► descriptor
//!                     │
//!                     no
//!                     ▼
//!        scopes in registration order
//!          candidates in registration order
//!            alias == class || alias is an ancestor of class
//!                     │
//!            first match ──► memoized forever
//!            no match    ──► ClassNotFound
//! ```
//!
//! Registration is a startup concern: any registration clears the memo so a
//! newly added candidate can never be shadowed by a stale answer.

use super::hierarchy::ClassHierarchy;
use crate::error::{HydrationError, HydrationResult};
use crate::logging::log_registry_operation;
use crate::mapping::{Mapped, TypeDescriptor};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct Scope {
    id: String,
    candidates: Vec<Arc<TypeDescriptor>>,
}

/// Registry statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub scopes: Vec<String>,
    pub total_types: usize,
    pub memoized: usize,
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    scopes: RwLock<Vec<Scope>>,
    hierarchy: RwLock<ClassHierarchy>,
    resolved: DashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hierarchy(hierarchy: ClassHierarchy) -> Self {
        Self {
            hierarchy: RwLock::new(hierarchy),
            ..Self::default()
        }
    }

    /// Append `candidates` to the scope `scope_id`, creating the scope at the
    /// end of the search order if it does not exist yet.
    pub fn register_scope(&self, scope_id: &str, candidates: Vec<TypeDescriptor>) {
        let count = candidates.len();
        let mut scopes = self.scopes.write();
        let candidates = candidates.into_iter().map(Arc::new);
        match scopes.iter_mut().find(|scope| scope.id == scope_id) {
            Some(scope) => scope.candidates.extend(candidates),
            None => scopes.push(Scope {
                id: scope_id.to_string(),
                candidates: candidates.collect(),
            }),
        }
        self.resolved.clear();

        log_registry_operation("register_scope", scope_id, None, "success", Some(count));
    }

    /// Register a single type into `scope_id`.
    pub fn register<T: Mapped>(&self, scope_id: &str) {
        self.register_scope(scope_id, vec![TypeDescriptor::of::<T>()]);
    }

    /// Declare `child extends parent` in the store class hierarchy.
    pub fn declare_extends(&self, child: &str, parent: &str) {
        self.hierarchy.write().declare(child, parent);
        self.resolved.clear();
    }

    /// Resolve a store class name to its target type.
    pub fn resolve(&self, store_class: &str) -> HydrationResult<Arc<TypeDescriptor>> {
        if let Some(hit) = self.resolved.get(store_class) {
            return Ok(Arc::clone(hit.value()));
        }

        // Both guards stay held until the memo insert so a concurrent
        // registration cannot interleave with it.
        let scopes = self.scopes.read();
        let hierarchy = self.hierarchy.read();

        let found = scopes.iter().find_map(|scope| {
            scope
                .candidates
                .iter()
                .find(|candidate| {
                    candidate
                        .aliases()
                        .iter()
                        .any(|alias| hierarchy.matches(alias, store_class))
                })
                .map(|candidate| (scope.id.as_str(), candidate))
        });

        match found {
            Some((scope_id, descriptor)) => {
                debug!(
                    store_class = %store_class,
                    scope = %scope_id,
                    target_type = %descriptor.type_name(),
                    "Resolved store class"
                );
                self.resolved
                    .insert(store_class.to_string(), Arc::clone(descriptor));
                Ok(Arc::clone(descriptor))
            }
            None => {
                log_registry_operation("resolve", "*", Some(store_class), "not_found", None);
                Err(HydrationError::ClassNotFound(store_class.to_string()))
            }
        }
    }

    pub fn stats(&self) -> RegistryStats {
        let scopes = self.scopes.read();
        RegistryStats {
            scopes: scopes.iter().map(|s| s.id.clone()).collect(),
            total_types: scopes.iter().map(|s| s.candidates.len()).sum(),
            memoized: self.resolved.len(),
        }
    }
}

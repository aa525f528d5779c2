//! Store class inheritance used for hierarchy-aware type matching.

use std::collections::{HashMap, HashSet, VecDeque};

/// `child extends parent` declarations; a class may have several parents.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    parents: HashMap<String, Vec<String>>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extends(mut self, child: impl Into<String>, parent: impl Into<String>) -> Self {
        self.declare(child, parent);
        self
    }

    pub fn declare(&mut self, child: impl Into<String>, parent: impl Into<String>) {
        let parents = self.parents.entry(child.into()).or_default();
        let parent = parent.into();
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    /// Whether `ancestor` is a strict ancestor of `class`. Cycles are tolerated.
    pub fn is_ancestor(&self, ancestor: &str, class: &str) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([class]);
        while let Some(current) = queue.pop_front() {
            let Some(parents) = self.parents.get(current) else {
                continue;
            };
            for parent in parents {
                if parent == ancestor {
                    return true;
                }
                if seen.insert(parent.as_str()) {
                    queue.push_back(parent.as_str());
                }
            }
        }
        false
    }

    /// Exact match or ancestor match of a declared alias against a store class.
    pub fn matches(&self, alias: &str, class: &str) -> bool {
        alias == class || self.is_ancestor(alias, class)
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

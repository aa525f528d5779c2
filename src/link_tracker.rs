//! # Link Tracker
//!
//! Accumulates the link references found while hydrating one record. The
//! resulting [`LinkManifest`] tells a higher-level manager which fields still
//! point at unloaded records. No deduplication or validation happens here.

use crate::rid::Rid;
use serde::Serialize;
use std::collections::BTreeMap;

/// Link reference(s) held by one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LinkRef {
    One(Rid),
    Many(Vec<Rid>),
    Keyed(BTreeMap<String, Rid>),
}

impl LinkRef {
    /// All referenced ids, in order.
    pub fn rids(&self) -> Vec<Rid> {
        match self {
            LinkRef::One(rid) => vec![*rid],
            LinkRef::Many(rids) => rids.clone(),
            LinkRef::Keyed(rids) => rids.values().copied().collect(),
        }
    }
}

impl From<Rid> for LinkRef {
    fn from(rid: Rid) -> Self {
        LinkRef::One(rid)
    }
}

impl From<Vec<Rid>> for LinkRef {
    fn from(rids: Vec<Rid>) -> Self {
        LinkRef::Many(rids)
    }
}

/// Field name to link reference(s), for one hydration call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkManifest {
    links: BTreeMap<String, LinkRef>,
}

impl LinkManifest {
    pub fn get(&self, field: &str) -> Option<&LinkRef> {
        self.links.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.links.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LinkRef)> {
        self.links.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every referenced id across all fields.
    pub fn rids(&self) -> Vec<Rid> {
        self.links.values().flat_map(LinkRef::rids).collect()
    }

    pub fn into_inner(self) -> BTreeMap<String, LinkRef> {
        self.links
    }
}

#[derive(Debug, Default)]
pub struct LinkTracker {
    manifest: LinkManifest,
}

impl LinkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `links` under `field`; a second add for the same field replaces
    /// the first.
    pub fn add(&mut self, field: &str, links: impl Into<LinkRef>) {
        self.manifest.links.insert(field.to_string(), links.into());
    }

    pub fn all(&self) -> &LinkManifest {
        &self.manifest
    }

    pub fn into_manifest(self) -> LinkManifest {
        self.manifest
    }
}

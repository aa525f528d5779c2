//! # Record Ids
//!
//! A graph-document store addresses every record by `#<cluster>:<position>`.
//! Links between records carry these ids; temporary (not yet persisted)
//! records use negative positions.

use crate::error::{HydrationError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rid {
    pub cluster: i32,
    pub position: i64,
}

impl Rid {
    pub fn new(cluster: i32, position: i64) -> Self {
        Self { cluster, position }
    }

    /// Temporary ids are assigned to records not yet persisted.
    pub fn is_temporary(&self) -> bool {
        self.position < 0
    }

    /// Accepts a RID string or a loaded record object carrying `@rid`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Object(map) => map
                .get(crate::constants::record_keys::RID)
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
            _ => None,
        }
    }

    /// Cheap shape check used on untyped values; requires the leading `#`.
    pub fn looks_like(s: &str) -> bool {
        s.starts_with('#') && s.parse::<Rid>().is_ok()
    }
}

impl FromStr for Rid {
    type Err = HydrationError;

    fn from_str(s: &str) -> Result<Self> {
        let body = s.strip_prefix('#').unwrap_or(s);
        let (cluster, position) = body
            .split_once(':')
            .ok_or_else(|| HydrationError::InvalidRid(s.to_string()))?;
        let cluster = cluster
            .parse::<i32>()
            .map_err(|_| HydrationError::InvalidRid(s.to_string()))?;
        let position = position
            .parse::<i64>()
            .map_err(|_| HydrationError::InvalidRid(s.to_string()))?;
        Ok(Self { cluster, position })
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.cluster, self.position)
    }
}

impl Serialize for Rid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error;
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e: HydrationError| D::Error::custom(e.to_string()))
    }
}

//! Typed cast results and their conversion into document field types.

use crate::link_tracker::LinkRef;
use crate::rid::Rid;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Result of casting one raw value under a type tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CastValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    Binary(Vec<u8>),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Link(Rid),
    LinkList(Vec<Rid>),
    LinkSet(Vec<Rid>),
    LinkMap(BTreeMap<String, Rid>),
    Embedded(Map<String, Value>),
    List(Vec<Value>),
    Map(Map<String, Value>),
    /// Untagged field: the raw value passed through untouched
    Raw(Value),
}

impl CastValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CastValue::Null | CastValue::Raw(Value::Null))
    }

    /// Link references carried by this value, if any.
    ///
    /// Untyped lists and raw values are inspected for RID shaped strings
    /// (`#cluster:position`).
    pub fn links(&self) -> Option<LinkRef> {
        match self {
            CastValue::Link(rid) => Some(LinkRef::One(*rid)),
            CastValue::LinkList(rids) | CastValue::LinkSet(rids) => Some(LinkRef::Many(rids.clone())),
            CastValue::LinkMap(rids) => Some(LinkRef::Keyed(rids.clone())),
            CastValue::List(values) => rids_in(values),
            CastValue::Raw(Value::String(s)) if Rid::looks_like(s) => s.parse().ok().map(LinkRef::One),
            CastValue::Raw(Value::Array(values)) => rids_in(values),
            _ => None,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            CastValue::Null => "null",
            CastValue::Boolean(_) => "boolean",
            CastValue::Integer(_) => "integer",
            CastValue::Float(_) => "float",
            CastValue::Decimal(_) => "decimal",
            CastValue::String(_) => "string",
            CastValue::Binary(_) => "binary",
            CastValue::Date(_) => "date",
            CastValue::DateTime(_) => "datetime",
            CastValue::Link(_) => "link",
            CastValue::LinkList(_) => "link list",
            CastValue::LinkSet(_) => "link set",
            CastValue::LinkMap(_) => "link map",
            CastValue::Embedded(_) => "embedded document",
            CastValue::List(_) => "list",
            CastValue::Map(_) => "map",
            CastValue::Raw(_) => "raw value",
        }
    }
}

fn rids_in(values: &[Value]) -> Option<LinkRef> {
    let rids: Vec<Rid> = values
        .iter()
        .filter_map(|v| match v {
            Value::String(s) if Rid::looks_like(s) => s.parse().ok(),
            _ => None,
        })
        .collect();
    (!rids.is_empty()).then_some(LinkRef::Many(rids))
}

/// Conversion from a cast result into the Rust type a setter accepts.
///
/// Untagged fields arrive as [`CastValue::Raw`] and fall back to serde.
pub trait FromCast: Sized {
    fn from_cast(value: CastValue) -> Result<Self, String>;
}

fn mismatch<T>(value: &CastValue) -> Result<T, String> {
    Err(format!(
        "cannot assign a {} to {}",
        value.describe(),
        std::any::type_name::<T>()
    ))
}

fn from_raw<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| e.to_string())
}

impl FromCast for CastValue {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        Ok(value)
    }
}

impl<T: FromCast> FromCast for Option<T> {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_cast(value).map(Some)
        }
    }
}

impl FromCast for bool {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::Boolean(b) => Ok(b),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for i64 {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::Integer(i) => Ok(i),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

macro_rules! narrow_integer {
    ($($ty:ty),*) => {
        $(
            impl FromCast for $ty {
                fn from_cast(value: CastValue) -> Result<Self, String> {
                    match value {
                        CastValue::Integer(i) => <$ty>::try_from(i).map_err(|e| e.to_string()),
                        CastValue::Raw(raw) => from_raw(raw),
                        other => mismatch(&other),
                    }
                }
            }
        )*
    };
}

narrow_integer!(i32, i16, i8, u8, u16, u32, u64);

impl FromCast for f64 {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::Float(f) => Ok(f),
            #[allow(clippy::cast_precision_loss)]
            CastValue::Integer(i) => Ok(i as f64),
            CastValue::Decimal(d) => d
                .to_f64()
                .filter(|f| f.is_finite())
                .ok_or_else(|| format!("decimal {d} is out of f64 range")),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for f32 {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        #[allow(clippy::cast_possible_truncation)]
        f64::from_cast(value).map(|f| f as f32)
    }
}

impl FromCast for BigDecimal {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::Decimal(d) => Ok(d),
            CastValue::Integer(i) => Ok(BigDecimal::from(i)),
            CastValue::Raw(Value::Number(n)) => parse_decimal(&n.to_string()),
            CastValue::Raw(Value::String(s)) => parse_decimal(&s),
            other => mismatch(&other),
        }
    }
}

/// Parse decimal text, surrounding whitespace allowed.
pub(crate) fn parse_decimal(raw: &str) -> Result<BigDecimal, String> {
    BigDecimal::from_str(raw.trim()).map_err(|e| format!("'{raw}' is not a decimal: {e}"))
}

impl FromCast for String {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::String(s) => Ok(s),
            CastValue::Decimal(d) => Ok(d.to_string()),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for Vec<u8> {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::Binary(bytes) => Ok(bytes),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for NaiveDate {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::Date(date) => Ok(date),
            CastValue::DateTime(dt) => Ok(dt.date_naive()),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for DateTime<Utc> {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::DateTime(dt) => Ok(dt),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for Rid {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::Link(rid) => Ok(rid),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for Vec<Rid> {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::LinkList(rids) | CastValue::LinkSet(rids) => Ok(rids),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for BTreeMap<String, Rid> {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::LinkMap(rids) => Ok(rids),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for Map<String, Value> {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::Embedded(map) | CastValue::Map(map) => Ok(map),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for Vec<Value> {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::List(values) => Ok(values),
            CastValue::Raw(raw) => from_raw(raw),
            other => mismatch(&other),
        }
    }
}

impl FromCast for Value {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        match value {
            CastValue::Raw(raw) => Ok(raw),
            CastValue::Embedded(map) | CastValue::Map(map) => Ok(Value::Object(map)),
            CastValue::List(values) => Ok(Value::Array(values)),
            other => serde_json::to_value(other).map_err(|e| e.to_string()),
        }
    }
}

/// Embedded value deserialized into a serde type.
///
/// ```rust
/// use graph_odm::caster::{CastValue, Embedded, FromCast};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Address {
///     city: String,
/// }
///
/// let mut map = serde_json::Map::new();
/// map.insert("city".to_string(), "Rome".into());
/// let Embedded(address) = Embedded::<Address>::from_cast(CastValue::Embedded(map)).unwrap();
/// assert_eq!(address.city, "Rome");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded<T>(pub T);

impl<T: DeserializeOwned> FromCast for Embedded<T> {
    fn from_cast(value: CastValue) -> Result<Self, String> {
        let raw = match value {
            CastValue::Embedded(map) | CastValue::Map(map) => Value::Object(map),
            CastValue::List(values) => Value::Array(values),
            CastValue::Raw(raw) => raw,
            other => return mismatch(&other),
        };
        from_raw(raw).map(Embedded)
    }
}

//! Built-in cast handlers, one per store type tag.

use super::value::{parse_decimal, CastValue};
use super::CastContext;
use crate::constants::cast_options;
use crate::error::CastError;
use crate::rid::Rid;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

type Outcome = Result<CastValue, CastError>;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

fn fail(raw: &Value, ctx: &CastContext<'_>) -> CastError {
    CastError::value(ctx.tag, raw)
}

/// Integral value of a JSON number or numeric string.
fn integral(raw: &Value) -> Option<i64> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let from_float = |f: f64| {
        (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
            .then_some(f as i64)
    };
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(from_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        _ => None,
    }
}

fn ranged(raw: &Value, ctx: &CastContext<'_>, min: i64, max: i64) -> Outcome {
    integral(raw)
        .filter(|i| (min..=max).contains(i))
        .map(CastValue::Integer)
        .ok_or_else(|| fail(raw, ctx))
}

pub fn integer(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    ranged(raw, ctx, i64::from(i32::MIN), i64::from(i32::MAX))
}

pub fn short(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    ranged(raw, ctx, i64::from(i16::MIN), i64::from(i16::MAX))
}

pub fn long(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    ranged(raw, ctx, i64::MIN, i64::MAX)
}

pub fn byte(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    ranged(raw, ctx, i64::from(i8::MIN), i64::from(i8::MAX))
}

pub fn float(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .map(CastValue::Float)
        .ok_or_else(|| fail(raw, ctx))
}

pub fn decimal(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    let parsed = match raw {
        Value::Number(n) => parse_decimal(&n.to_string()).ok(),
        Value::String(s) => parse_decimal(s).ok(),
        _ => None,
    };
    parsed.map(CastValue::Decimal).ok_or_else(|| fail(raw, ctx))
}

pub fn boolean(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    let parsed = match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed.map(CastValue::Boolean).ok_or_else(|| fail(raw, ctx))
}

pub fn string(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    match raw {
        Value::String(s) => Ok(CastValue::String(s.clone())),
        Value::Number(n) => Ok(CastValue::String(n.to_string())),
        Value::Bool(b) => Ok(CastValue::String(b.to_string())),
        _ => Err(fail(raw, ctx)),
    }
}

pub fn binary(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    raw.as_str()
        .and_then(|s| BASE64.decode(s.trim()).ok())
        .map(CastValue::Binary)
        .ok_or_else(|| fail(raw, ctx))
}

fn from_epoch_millis(raw: &Value) -> Option<DateTime<Utc>> {
    raw.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis)
}

fn parse_datetime(s: &str, format: Option<&str>) -> Option<DateTime<Utc>> {
    if let Some(format) = format {
        return NaiveDateTime::parse_from_str(s, format)
            .ok()
            .map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .map(|dt| dt.and_utc())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

pub fn datetime(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    let parsed = match raw {
        Value::String(s) => parse_datetime(s.trim(), ctx.option(cast_options::FORMAT)),
        Value::Number(_) => from_epoch_millis(raw),
        _ => None,
    };
    parsed.map(CastValue::DateTime).ok_or_else(|| fail(raw, ctx))
}

pub fn date(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    let parsed = match raw {
        Value::String(s) => {
            let s = s.trim();
            match ctx.option(cast_options::FORMAT) {
                Some(format) => NaiveDate::parse_from_str(s, format).ok(),
                None => NaiveDate::parse_from_str(s, DATE_FORMAT)
                    .ok()
                    .or_else(|| parse_datetime(s, None).map(|dt| dt.date_naive())),
            }
        }
        Value::Number(_) => from_epoch_millis(raw).map(|dt| dt.date_naive()),
        _ => None,
    };
    parsed.map(CastValue::Date).ok_or_else(|| fail(raw, ctx))
}

pub fn link(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    Rid::from_json(raw)
        .map(CastValue::Link)
        .ok_or_else(|| fail(raw, ctx))
}

fn rid_list(raw: &Value, ctx: &CastContext<'_>) -> Result<Vec<Rid>, CastError> {
    raw.as_array()
        .ok_or_else(|| fail(raw, ctx))?
        .iter()
        .map(|item| Rid::from_json(item).ok_or_else(|| fail(raw, ctx)))
        .collect()
}

pub fn link_list(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    rid_list(raw, ctx).map(CastValue::LinkList)
}

pub fn link_set(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    let mut rids = rid_list(raw, ctx)?;
    let mut seen = std::collections::HashSet::new();
    rids.retain(|rid| seen.insert(*rid));
    Ok(CastValue::LinkSet(rids))
}

pub fn link_map(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    raw.as_object()
        .ok_or_else(|| fail(raw, ctx))?
        .iter()
        .map(|(key, item)| {
            Rid::from_json(item)
                .map(|rid| (key.clone(), rid))
                .ok_or_else(|| fail(raw, ctx))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(CastValue::LinkMap)
}

fn object(raw: &Value, ctx: &CastContext<'_>) -> Result<Map<String, Value>, CastError> {
    raw.as_object().cloned().ok_or_else(|| fail(raw, ctx))
}

pub fn embedded(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    object(raw, ctx).map(CastValue::Embedded)
}

pub fn embedded_map(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    object(raw, ctx).map(CastValue::Map)
}

pub fn embedded_list(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    raw.as_array()
        .cloned()
        .map(CastValue::List)
        .ok_or_else(|| fail(raw, ctx))
}

pub fn embedded_set(raw: &Value, ctx: &CastContext<'_>) -> Outcome {
    let items = raw.as_array().ok_or_else(|| fail(raw, ctx))?;
    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(item) {
            unique.push(item.clone());
        }
    }
    Ok(CastValue::List(unique))
}

//! YAML → JSON value conversion.
//!
//! YAML is a superset of the JSON data model, so a few values need folding:
//! mapping keys of any type become strings, timestamps become ISO-8601 UTC
//! strings, and non-finite floats become `null`. Keys and numbers are
//! rendered the way a JavaScript consumer of the same YAML would see them.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use serde_json::{Map, Number as JsonNumber, Value as JsonValue};
use serde_yaml::{Number as YamlNumber, Value as YamlValue};
use std::sync::LazyLock;

static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());
static RE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})",
        r"(?:[Tt]|[ \t]+)([0-9]{1,2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]*))?",
        r"(?:[ \t]*(Z|([-+])([0-9]{1,2})(?::([0-9]{2}))?))?$",
    ))
    .unwrap()
});

/// 2^63: integral floats below this magnitude fit an `i64` exactly.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;
/// 2^64
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Convert a parsed YAML tree into a JSON tree, preserving mapping order.
pub fn yaml_to_json(value: YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => number_to_json(&n),
        YamlValue::String(s) => match timestamp_to_iso(&s) {
            Some(iso) => JsonValue::String(iso),
            None => JsonValue::String(s),
        },
        YamlValue::Sequence(seq) => JsonValue::Array(seq.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(key_to_string(key), yaml_to_json(value));
            }
            JsonValue::Object(object)
        }
        // Rejected by the loader before conversion
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

/// Integral floats are written without a fractional part (`1.0` → `1`).
fn number_to_json(n: &YamlNumber) -> JsonValue {
    if let Some(i) = n.as_i64() {
        return JsonValue::from(i);
    }
    if let Some(u) = n.as_u64() {
        return JsonValue::from(u);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < I64_LIMIT => {
            JsonValue::from(f as i64)
        }
        Some(f) if f.is_finite() && f.fract() == 0.0 && f > 0.0 && f < U64_LIMIT => {
            JsonValue::from(f as u64)
        }
        Some(f) => JsonNumber::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
        None => JsonValue::Null,
    }
}

/// A plain `YYYY-MM-DD` date or full YAML timestamp as
/// `YYYY-MM-DDTHH:MM:SS.sssZ`. `None` for anything else, including
/// out-of-range fields.
fn timestamp_to_iso(s: &str) -> Option<String> {
    let utc = if let Some(caps) = RE_DATE.captures(s) {
        date_from(&caps)?.and_hms_opt(0, 0, 0)?
    } else {
        let caps = RE_TIMESTAMP.captures(s)?;
        let local = date_from(&caps)?.and_hms_milli_opt(
            field(&caps, 4)?,
            field(&caps, 5)?,
            field(&caps, 6)?,
            millis(caps.get(7).map_or("", |m| m.as_str()))?,
        )?;
        local - Duration::minutes(offset_minutes(&caps)?)
    };
    Some(format_utc(&utc))
}

fn date_from(caps: &Captures) -> Option<NaiveDate> {
    let mut year: i32 = caps[1].parse().ok()?;
    // Two-digit years are taken as 19xx
    if year < 100 {
        year += 1900;
    }
    NaiveDate::from_ymd_opt(year, field(caps, 2)?, field(caps, 3)?)
}

fn field(caps: &Captures, i: usize) -> Option<u32> {
    caps.get(i)?.as_str().parse().ok()
}

/// First three fraction digits, right-padded: `5` → 500, `1234` → 123.
fn millis(fraction: &str) -> Option<u32> {
    let mut digits: String = fraction.chars().take(3).collect();
    while digits.len() < 3 {
        digits.push('0');
    }
    digits.parse().ok()
}

fn offset_minutes(caps: &Captures) -> Option<i64> {
    let Some(sign) = caps.get(9) else {
        return Some(0);
    };
    let hours: i64 = caps.get(10)?.as_str().parse().ok()?;
    let minutes: i64 = caps.get(11).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let total = hours * 60 + minutes;
    Some(if sign.as_str() == "-" { -total } else { total })
}

fn format_utc(utc: &NaiveDateTime) -> String {
    utc.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn key_to_string(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Null => "null".to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => number_text(&n),
        // Flattened one level; nested collections and nulls are opaque
        YamlValue::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                YamlValue::Null | YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
                    "[object Object]".to_string()
                }
                other => key_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        YamlValue::Mapping(_) => "[object Object]".to_string(),
        YamlValue::Tagged(tagged) => key_to_string(tagged.value),
    }
}

/// Number text as a JavaScript string conversion produces it: no fraction
/// for integral values, exponent form only below 1e-6 or from 1e21 up.
fn number_text(n: &YamlNumber) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let Some(f) = n.as_f64() else {
        return "NaN".to_string();
    };
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    let abs = f.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let text = format!("{f:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    if f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

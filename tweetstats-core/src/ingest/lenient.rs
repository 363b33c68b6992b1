//! Lenient counter cells shared by the CSV and JSON readers.
//!
//! Dataframe exports write integer columns as floats once a column has a
//! gap, and spreadsheets often quote numbers. A counter is accepted as an
//! integer (`12`), a whole float (`12.0`) or numeric text (`"12"`, `" 12.0 "`).
//! Empty text, `nan` and `null` are a missing value. Negative and fractional
//! values are rejected.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

struct CountVisitor;

impl CountVisitor {
    fn from_float<E: de::Error>(value: f64) -> Result<Option<u64>, E> {
        if value.is_nan() {
            return Ok(None);
        }
        let whole = value.is_finite() && value.fract() == 0.0;
        if whole && value >= 0.0 && value <= u64::MAX as f64 {
            return Ok(Some(value as u64));
        }
        Err(E::custom(format!("invalid non-negative count: {value}")))
    }
}

impl<'de> Visitor<'de> for CountVisitor {
    type Value = Option<u64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative whole number, numeric text or null")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u64::try_from(value)
            .map(Some)
            .map_err(|_| E::custom(format!("invalid non-negative count: {value}")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Self::from_float(value)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        if let Ok(v) = trimmed.parse::<u64>() {
            return Ok(Some(v));
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Self::from_float(v),
            Err(_) => Err(E::custom(format!("invalid non-negative count: {trimmed:?}"))),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CountVisitor)
    }
}

/// Deserialize an engagement or follower counter.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(CountVisitor)
}

/// Deserialize a word count, saturating at `u32::MAX`.
pub(crate) fn word_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(count(deserializer)?.map(|wc| u32::try_from(wc).unwrap_or(u32::MAX)))
}

#![forbid(unsafe_code)]

//! Time-stamped chart points.
//!
//! Every point type implements [`SeriesPoint`], which is all the redraw
//! classifier needs: a time key and a field-wise "matches previous"
//! relation. The relation is directional: every field present on the new
//! point must exist on the previous point with an equal value, while
//! fields only the previous point carries are ignored.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Horizontal-axis key of a point: a unix timestamp in seconds or a
/// `YYYY-MM-DD` business day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartTime {
    Timestamp(i64),
    BusinessDay(String),
}

impl fmt::Display for ChartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(ts) => write!(f, "{ts}"),
            Self::BusinessDay(day) => f.write_str(day),
        }
    }
}

impl From<i64> for ChartTime {
    fn from(ts: i64) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<&str> for ChartTime {
    fn from(day: &str) -> Self {
        Self::BusinessDay(day.to_owned())
    }
}

/// What the redraw classifier needs from a point.
pub trait SeriesPoint {
    fn time(&self) -> &ChartTime;

    /// Every field of `self` is present on `previous` with an equal value.
    fn matches(&self, previous: &Self) -> bool;
}

/// One OHLC bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: ChartTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    #[must_use]
    pub fn new(time: impl Into<ChartTime>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time: time.into(),
            open,
            high,
            low,
            close,
        }
    }
}

impl SeriesPoint for Candle {
    fn time(&self) -> &ChartTime {
        &self.time
    }

    fn matches(&self, previous: &Self) -> bool {
        self == previous
    }
}

/// A single-value point (line, histogram, volume). `color` is optional
/// per-point styling; an absent color places no constraint on the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub time: ChartTime,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ValuePoint {
    #[must_use]
    pub fn new(time: impl Into<ChartTime>, value: f64) -> Self {
        Self {
            time: time.into(),
            value,
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl SeriesPoint for ValuePoint {
    fn time(&self) -> &ChartTime {
        &self.time
    }

    fn matches(&self, previous: &Self) -> bool {
        self.time == previous.time
            && self.value == previous.value
            && self
                .color
                .as_ref()
                .is_none_or(|color| previous.color.as_ref() == Some(color))
    }
}

/// A point with an open set of fields, for sources that do not fit the
/// fixed shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    pub time: ChartTime,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl FieldPoint {
    #[must_use]
    pub fn new(time: impl Into<ChartTime>) -> Self {
        Self {
            time: time.into(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Numeric value of `key`, if present and numeric.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }
}

impl SeriesPoint for FieldPoint {
    fn time(&self) -> &ChartTime {
        &self.time
    }

    fn matches(&self, previous: &Self) -> bool {
        self.time == previous.time
            && self
                .fields
                .iter()
                .all(|(key, value)| {
                    previous
                        .fields
                        .get(key)
                        .is_some_and(|prev| field_eq(value, prev))
                })
    }
}

/// `10` and `10.0` are the same field value.
fn field_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Any single point, as carried by last-point update commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnyPoint {
    Candle(Candle),
    Value(ValuePoint),
    Fields(FieldPoint),
}

impl AnyPoint {
    #[must_use]
    pub fn time(&self) -> &ChartTime {
        match self {
            Self::Candle(p) => &p.time,
            Self::Value(p) => &p.time,
            Self::Fields(p) => &p.time,
        }
    }

    /// Price shown for this point: `close` when present, else `value`.
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        match self {
            Self::Candle(p) => Some(p.close),
            Self::Value(p) => Some(p.value),
            Self::Fields(p) => p.number("close").or_else(|| p.number("value")),
        }
    }
}

//! Series buffers.
//!
//! A [`SeriesData`] is the ordered point buffer of one named series. The
//! point shape is a closed set; classifying buffers of different shapes
//! always asks for a full redraw.

use serde::{Deserialize, Serialize};

use crate::SeriesError;
use crate::classify::{RedrawScope, classify};
use crate::point::{AnyPoint, Candle, FieldPoint, ValuePoint};

/// Ordered point buffer of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "points", rename_all = "snake_case")]
pub enum SeriesData {
    Candles(Vec<Candle>),
    Values(Vec<ValuePoint>),
    Fields(Vec<FieldPoint>),
}

impl Default for SeriesData {
    fn default() -> Self {
        Self::Values(Vec::new())
    }
}

impl SeriesData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Candles(points) => points.len(),
            Self::Values(points) => points.len(),
            Self::Fields(points) => points.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Candles(_) => "candles",
            Self::Values(_) => "values",
            Self::Fields(_) => "fields",
        }
    }

    /// The final point, cloned.
    #[must_use]
    pub fn last(&self) -> Option<AnyPoint> {
        match self {
            Self::Candles(points) => points.last().cloned().map(AnyPoint::Candle),
            Self::Values(points) => points.last().cloned().map(AnyPoint::Value),
            Self::Fields(points) => points.last().cloned().map(AnyPoint::Fields),
        }
    }

    /// Redraw scope needed to go from `previous` to `self`.
    ///
    /// Buffers of different shapes always need [`RedrawScope::All`].
    #[must_use]
    pub fn classify_against(&self, previous: &SeriesData, forced_redraw: bool) -> RedrawScope {
        match (self, previous) {
            (Self::Candles(new), Self::Candles(old)) => classify(new, old, forced_redraw),
            (Self::Values(new), Self::Values(old)) => classify(new, old, forced_redraw),
            (Self::Fields(new), Self::Fields(old)) => classify(new, old, forced_redraw),
            _ => RedrawScope::All,
        }
    }

    /// A copy of this buffer whose final point is replaced by `point`.
    pub fn with_last_replaced(&self, point: AnyPoint) -> Result<SeriesData, SeriesError> {
        fn replace<P: Clone>(points: &[P], point: P) -> Result<Vec<P>, SeriesError> {
            let (_, head) = points.split_last().ok_or(SeriesError::EmptySeries)?;
            let mut out = head.to_vec();
            out.push(point);
            Ok(out)
        }

        match (self, point) {
            (Self::Candles(points), AnyPoint::Candle(p)) => replace(points, p).map(Self::Candles),
            (Self::Values(points), AnyPoint::Value(p)) => replace(points, p).map(Self::Values),
            (Self::Fields(points), AnyPoint::Fields(p)) => replace(points, p).map(Self::Fields),
            (data, _) => Err(SeriesError::ShapeMismatch {
                expected: data.shape_name(),
            }),
        }
    }
}

impl From<Vec<Candle>> for SeriesData {
    fn from(points: Vec<Candle>) -> Self {
        Self::Candles(points)
    }
}

impl From<Vec<ValuePoint>> for SeriesData {
    fn from(points: Vec<ValuePoint>) -> Self {
        Self::Values(points)
    }
}

impl From<Vec<FieldPoint>> for SeriesData {
    fn from(points: Vec<FieldPoint>) -> Self {
        Self::Fields(points)
    }
}

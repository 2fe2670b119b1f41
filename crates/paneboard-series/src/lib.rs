#![forbid(unsafe_code)]

//! Chart series model and incremental redraw classification.
//!
//! A chart panel owns a [`SeriesSet`]: named series, each with a point
//! buffer ([`SeriesData`]) and display settings. On every refresh tick a
//! [`SeriesSource`] supplies a new buffer, and [`classify`] decides whether
//! the chart must replace the series, update only its last point, or do
//! nothing.
//!
//! # Example
//!
//! ```
//! use paneboard_series::{Candle, RedrawScope, classify};
//!
//! let old = vec![Candle::new("2023-10-26", 80.0, 81.0, 79.0, 80.2)];
//! let mut new = old.clone();
//! new[0].close = 80.7;
//! assert_eq!(classify(&new, &old, false), RedrawScope::Last);
//! ```

pub mod classify;
pub mod crosshair;
pub mod data;
pub mod point;
pub mod series;
pub mod source;

pub use classify::{ClassifierStats, RedrawScope, UpdateClassifier, classify};
pub use crosshair::{CrosshairPrice, PRIMARY_SERIES, crosshair_price};
pub use data::SeriesData;
pub use point::{AnyPoint, Candle, ChartTime, FieldPoint, SeriesPoint, ValuePoint};
pub use series::{PERIOD_STEP, SeriesConfig, SeriesKind, SeriesSet};
pub use source::SeriesSource;

/// Errors from series configuration and buffer edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("unknown series '{0}'")]
    UnknownSeries(String),
    #[error("series '{0}' has no period")]
    NoPeriod(String),
    #[error("series buffer is empty")]
    EmptySeries,
    #[error("point does not fit a {expected} buffer")]
    ShapeMismatch { expected: &'static str },
}

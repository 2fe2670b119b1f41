#![forbid(unsafe_code)]

//! Per-chart series configuration.

use serde::{Deserialize, Serialize};

use crate::SeriesError;
use crate::data::SeriesData;

/// Period change step for [`SeriesSet::shift_period`].
pub const PERIOD_STEP: u32 = 5;

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Candlestick,
    Histogram,
    Line,
}

fn default_display() -> bool {
    true
}

/// One named series of a chart panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub name: String,
    pub kind: SeriesKind,
    #[serde(default)]
    pub data: SeriesData,
    #[serde(default = "default_display")]
    pub display: bool,
    /// Indicator window length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Number of bars a source should produce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default)]
    pub pane_index: u32,
    /// Forces the next classification to a full redraw.
    #[serde(default)]
    pub redraw: bool,
}

impl SeriesConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SeriesKind) -> Self {
        Self {
            name: name.into(),
            kind,
            data: SeriesData::default(),
            display: true,
            period: None,
            count: None,
            pane_index: 0,
            redraw: false,
        }
    }

    #[must_use]
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = Some(period);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_pane_index(mut self, pane_index: u32) -> Self {
        self.pane_index = pane_index;
        self
    }
}

/// Ordered set of series keyed by name. Order is declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesSet {
    series: Vec<SeriesConfig>,
}

impl SeriesSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Price bars, volume, a moving average and an oscillator in its own pane.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            series: vec![
                SeriesConfig::new("ohlc", SeriesKind::Candlestick).with_count(30),
                SeriesConfig::new("volume", SeriesKind::Histogram),
                SeriesConfig::new("sma", SeriesKind::Line).with_period(14),
                SeriesConfig::new("rsi", SeriesKind::Line)
                    .with_period(14)
                    .with_pane_index(1),
            ],
        }
    }

    /// Add `config`, replacing a series with the same name in place.
    pub fn insert(&mut self, config: SeriesConfig) {
        match self.series.iter_mut().find(|s| s.name == config.name) {
            Some(existing) => *existing = config,
            None => self.series.push(config),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SeriesConfig> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SeriesConfig> {
        self.series.iter_mut().find(|s| s.name == name)
    }

    fn require_mut(&mut self, name: &str) -> Result<&mut SeriesConfig, SeriesError> {
        self.get_mut(name)
            .ok_or_else(|| SeriesError::UnknownSeries(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesConfig> {
        self.series.iter()
    }

    pub fn displayed(&self) -> impl Iterator<Item = &SeriesConfig> {
        self.series.iter().filter(|s| s.display)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Flip `display`; returns the new value.
    pub fn toggle_display(&mut self, name: &str) -> Result<bool, SeriesError> {
        let series = self.require_mut(name)?;
        series.display = !series.display;
        tracing::info!(
            target: "paneboard.series",
            series = name,
            display = series.display,
            "series display toggled"
        );
        Ok(series.display)
    }

    /// Move the period by [`PERIOD_STEP`]: down from an even period, up from
    /// an odd one, never below 1. Returns the new period.
    pub fn shift_period(&mut self, name: &str) -> Result<u32, SeriesError> {
        let series = self.require_mut(name)?;
        let current = series
            .period
            .ok_or_else(|| SeriesError::NoPeriod(name.to_owned()))?;
        let next = if current % 2 == 0 {
            current.saturating_sub(PERIOD_STEP).max(1)
        } else {
            current.saturating_add(PERIOD_STEP)
        };
        series.period = Some(next);
        tracing::info!(
            target: "paneboard.series",
            series = name,
            from = current,
            to = next,
            "series period shifted"
        );
        Ok(next)
    }

    /// Mark `name` for a full redraw on its next classification.
    pub fn request_redraw(&mut self, name: &str) -> Result<(), SeriesError> {
        self.require_mut(name)?.redraw = true;
        Ok(())
    }

    /// Read and clear the forced-redraw flag of `name`.
    pub fn take_redraw(&mut self, name: &str) -> Result<bool, SeriesError> {
        Ok(std::mem::take(&mut self.require_mut(name)?.redraw))
    }
}

#![forbid(unsafe_code)]

//! Incremental update classification.
//!
//! For each refresh tick a chart series is either left alone, has only its
//! still-forming last point updated, or is replaced wholesale. [`classify`]
//! makes that decision from the previous and new buffers:
//!
//! 1. A forced redraw, or an empty buffer on either side, is [`RedrawScope::All`].
//! 2. A different first or last timestamp means the visible window moved:
//!    [`RedrawScope::All`].
//! 3. If the first points and the second-to-last points match, only the last
//!    point can differ: [`RedrawScope::None`] when it matches too, else
//!    [`RedrawScope::Last`].
//! 4. Anything else is [`RedrawScope::All`].
//!
//! With exactly one point on both sides the first point is the last point,
//! so only the last-point comparison applies.
//!
//! [`UpdateClassifier`] wraps the pure function with a force-full switch
//! and per-pass counters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::SeriesData;
use crate::point::SeriesPoint;

/// How much of a series must be re-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedrawScope {
    /// Nothing visible changed.
    None,
    /// Only the final point changed.
    Last,
    /// Replace the whole series.
    All,
}

impl RedrawScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Last => "last",
            Self::All => "all",
        }
    }
}

impl fmt::Display for RedrawScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the change from `old` to `new`.
#[must_use]
pub fn classify<P: SeriesPoint>(new: &[P], old: &[P], forced_redraw: bool) -> RedrawScope {
    if forced_redraw {
        return RedrawScope::All;
    }
    let (Some(new_first), Some(old_first)) = (new.first(), old.first()) else {
        return RedrawScope::All;
    };
    let (Some(new_last), Some(old_last)) = (new.last(), old.last()) else {
        return RedrawScope::All;
    };
    if new_first.time() != old_first.time() || new_last.time() != old_last.time() {
        return RedrawScope::All;
    }

    let single = new.len() == 1 && old.len() == 1;
    let first_match = single || new_first.matches(old_first);
    let penultimate_match = match (penultimate(new), penultimate(old)) {
        (None, None) => true,
        (Some(n), Some(o)) => n.matches(o),
        _ => false,
    };

    if first_match && penultimate_match {
        if new_last.matches(old_last) {
            RedrawScope::None
        } else {
            RedrawScope::Last
        }
    } else {
        RedrawScope::All
    }
}

fn penultimate<P>(points: &[P]) -> Option<&P> {
    points.len().checked_sub(2).map(|i| &points[i])
}

/// Counters over the classifications made since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierStats {
    pub none: usize,
    pub last: usize,
    pub all: usize,
    pub total: usize,
}

impl ClassifierStats {
    /// Fraction of classifications that avoided a full redraw (0.0 to 1.0).
    #[must_use]
    pub fn incremental_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.none + self.last) as f64 / self.total as f64
        }
    }

    fn record(&mut self, scope: RedrawScope) {
        match scope {
            RedrawScope::None => self.none += 1,
            RedrawScope::Last => self.last += 1,
            RedrawScope::All => self.all += 1,
        }
        self.total += 1;
    }
}

/// Classifier with a force-full switch and statistics.
#[derive(Debug, Clone, Default)]
pub struct UpdateClassifier {
    force_full: bool,
    stats: ClassifierStats,
}

impl UpdateClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from environment configuration.
    ///
    /// Reads `PANEBOARD_FULL_REDRAW`. When set to `"1"`, `"true"`, or
    /// `"yes"` (case-insensitive), every classification returns
    /// [`RedrawScope::All`].
    #[must_use]
    pub fn from_env() -> Self {
        let force_full = std::env::var("PANEBOARD_FULL_REDRAW")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        if force_full {
            tracing::info!(target: "paneboard.series", "full redraw forced by environment");
        }
        Self {
            force_full,
            stats: ClassifierStats::default(),
        }
    }

    #[must_use]
    pub fn force_full(&self) -> bool {
        self.force_full
    }

    pub fn set_force_full(&mut self, force_full: bool) {
        self.force_full = force_full;
    }

    /// Classify two typed buffers and record the result.
    pub fn classify<P: SeriesPoint>(
        &mut self,
        new: &[P],
        old: &[P],
        forced_redraw: bool,
    ) -> RedrawScope {
        let scope = classify(new, old, forced_redraw || self.force_full);
        self.stats.record(scope);
        scope
    }

    /// Classify two series buffers and record the result.
    pub fn classify_data(
        &mut self,
        new: &SeriesData,
        old: &SeriesData,
        forced_redraw: bool,
    ) -> RedrawScope {
        let scope = new.classify_against(old, forced_redraw || self.force_full);
        tracing::debug!(
            target: "paneboard.series",
            new_len = new.len(),
            old_len = old.len(),
            forced_redraw,
            %scope,
            "classified update"
        );
        self.stats.record(scope);
        scope
    }

    #[must_use]
    pub fn stats(&self) -> ClassifierStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ClassifierStats::default();
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{FieldPoint, ValuePoint};

    fn close(time: i64, close: f64) -> FieldPoint {
        FieldPoint::new(time).with("close", close)
    }

    #[test]
    fn identical_single_point_is_none() {
        let old = vec![close(1, 10.0)];
        assert_eq!(classify(&old.clone(), &old, false), RedrawScope::None);
    }

    #[test]
    fn changed_single_close_is_last() {
        let old = vec![close(1, 10.0)];
        let new = vec![close(1, 11.0)];
        assert_eq!(classify(&new, &old, false), RedrawScope::Last);
    }

    #[test]
    fn shifted_first_time_is_all() {
        let old = vec![close(1, 10.0)];
        let new = vec![close(2, 10.0)];
        assert_eq!(classify(&new, &old, false), RedrawScope::All);
    }

    #[test]
    fn forced_redraw_wins() {
        let old = vec![close(1, 10.0)];
        assert_eq!(classify(&old.clone(), &old, true), RedrawScope::All);
    }

    #[test]
    fn empty_buffers_are_all() {
        let empty: Vec<FieldPoint> = Vec::new();
        let one = vec![close(1, 10.0)];
        assert_eq!(classify(&empty, &one, false), RedrawScope::All);
        assert_eq!(classify(&one, &empty, false), RedrawScope::All);
        assert_eq!(classify(&empty, &empty, false), RedrawScope::All);
    }

    #[test]
    fn forming_bar_tick_is_last() {
        let old = vec![close(1, 10.0), close(2, 11.0), close(3, 12.0)];
        let mut new = old.clone();
        new[2] = close(3, 12.5);
        assert_eq!(classify(&new, &old, false), RedrawScope::Last);
    }

    #[test]
    fn mid_series_edit_is_all() {
        let old = vec![close(1, 10.0), close(2, 11.0), close(3, 12.0)];
        let mut new = old.clone();
        new[1] = close(2, 99.0);
        assert_eq!(classify(&new, &old, false), RedrawScope::All);
    }

    #[test]
    fn edited_first_point_is_all() {
        let old = vec![close(1, 10.0), close(2, 11.0)];
        let new = vec![close(1, 9.0), close(2, 11.0)];
        assert_eq!(classify(&new, &old, false), RedrawScope::All);
    }

    #[test]
    fn length_mismatch_with_single_side_is_all() {
        // Same first/last times, but only the old buffer has a penultimate point.
        let old = vec![close(1, 10.0), close(1, 10.0)];
        let new = vec![close(1, 10.0)];
        assert_eq!(classify(&new, &old, false), RedrawScope::All);
    }

    #[test]
    fn extra_fields_on_old_points_are_ignored() {
        let old = vec![
            FieldPoint::new(1).with("close", 10.0).with("volume", 5),
            FieldPoint::new(2).with("close", 11.0).with("volume", 6),
        ];
        let new = vec![close(1, 10.0), close(2, 11.0)];
        assert_eq!(classify(&new, &old, false), RedrawScope::None);
    }

    #[test]
    fn integer_and_float_fields_are_equal() {
        let old: Vec<FieldPoint> = serde_json::from_str(r#"[{"time":1,"close":10}]"#).unwrap();
        let new = vec![close(1, 10.0)];
        assert_eq!(classify(&new, &old, false), RedrawScope::None);
    }

    #[test]
    fn value_points_classify_too() {
        let old = vec![ValuePoint::new(1, 1.0), ValuePoint::new(2, 2.0)];
        let new = vec![ValuePoint::new(1, 1.0), ValuePoint::new(2, 2.5)];
        assert_eq!(classify(&new, &old, false), RedrawScope::Last);
    }

    #[test]
    fn service_counts_and_force_full() {
        let old = SeriesData::from(vec![ValuePoint::new(1, 1.0)]);
        let new = SeriesData::from(vec![ValuePoint::new(1, 2.0)]);
        let mut classifier = UpdateClassifier::new();
        assert_eq!(classifier.classify_data(&new, &old, false), RedrawScope::Last);
        assert_eq!(classifier.classify_data(&old, &old, false), RedrawScope::None);
        classifier.set_force_full(true);
        assert_eq!(classifier.classify_data(&old, &old, false), RedrawScope::All);

        let stats = classifier.stats();
        assert_eq!(
            stats,
            ClassifierStats {
                none: 1,
                last: 1,
                all: 1,
                total: 3
            }
        );
        assert!((stats.incremental_rate() - 2.0 / 3.0).abs() < 1e-9);
        classifier.reset_stats();
        assert_eq!(classifier.stats().total, 0);
        assert_eq!(classifier.stats().incremental_rate(), 0.0);
    }

    #[test]
    fn from_env_is_usable() {
        // The variable is normally unset in test runs.
        let classifier = UpdateClassifier::from_env();
        assert_eq!(classifier.stats().total, 0);
    }

    #[test]
    fn parse_env_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("no"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn scope_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RedrawScope::Last).unwrap(), r#""last""#);
        assert_eq!(RedrawScope::All.to_string(), "all");
    }
}

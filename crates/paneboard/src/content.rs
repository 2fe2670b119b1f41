//! Panel payloads.
//!
//! Leaves of a dashboard layout carry a [`PanelContent`]: either a chart
//! with its series, or a label that may be bound to an [`Action`]. The set
//! of kinds is closed and tagged by `kind` in declarations:
//!
//! ```json
//! { "kind": "label", "text": "Toggle layout", "action": { "action": "toggle_rows", "target": [0, 1] } }
//! { "kind": "chart", "series": [ { "name": "ohlc", "kind": "candlestick", "count": 30 } ] }
//! ```

use paneboard_layout::PanelPath;
use paneboard_series::{PRIMARY_SERIES, SeriesSet};
use serde::{Deserialize, Serialize};

/// Row track lists a [`Action::ToggleRows`] alternates between by default.
pub const DEFAULT_ROW_TOGGLE: (&str, &str) = ("70% 30%", "30% 70%");

/// Payload of a leaf panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelContent {
    Chart(ChartPanel),
    Label(LabelPanel),
}

impl PanelContent {
    #[must_use]
    pub fn chart(series: SeriesSet) -> Self {
        Self::Chart(ChartPanel {
            series,
            refresh_key: false,
        })
    }

    #[must_use]
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(LabelPanel {
            text: text.into(),
            action: None,
        })
    }

    #[must_use]
    pub fn label_with_action(text: impl Into<String>, action: ActionBinding) -> Self {
        Self::Label(LabelPanel {
            text: text.into(),
            action: Some(action),
        })
    }

    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Chart(_) => "chart",
            Self::Label(_) => "label",
        }
    }

    #[must_use]
    pub fn as_chart(&self) -> Option<&ChartPanel> {
        match self {
            Self::Chart(chart) => Some(chart),
            Self::Label(_) => None,
        }
    }

    pub fn as_chart_mut(&mut self) -> Option<&mut ChartPanel> {
        match self {
            Self::Chart(chart) => Some(chart),
            Self::Label(_) => None,
        }
    }

    #[must_use]
    pub fn as_label(&self) -> Option<&LabelPanel> {
        match self {
            Self::Label(label) => Some(label),
            Self::Chart(_) => None,
        }
    }
}

/// A chart panel and its series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPanel {
    pub series: SeriesSet,
    /// Flipped to force the chart to be rebuilt.
    #[serde(default)]
    pub refresh_key: bool,
}

/// A text panel, optionally clickable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPanel {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionBinding>,
}

/// What clicking a label does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Flip a container's row track list.
    ToggleRows,
    /// Make the next named layout active.
    SwitchLayout,
    /// Show or hide one series of a chart.
    ToggleSeriesDisplay,
    /// Move one series' period and reload it.
    ShiftSeriesPeriod,
    /// Force a chart to redraw every series.
    ToggleRefresh,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToggleRows => "toggle_rows",
            Self::SwitchLayout => "switch_layout",
            Self::ToggleSeriesDisplay => "toggle_series_display",
            Self::ShiftSeriesPeriod => "shift_series_period",
            Self::ToggleRefresh => "toggle_refresh",
        }
    }
}

/// An action bound to a label, with its explicit operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBinding {
    pub action: Action,
    /// Panel the action applies to. Row toggles default to the parent of
    /// the clicked panel; other actions default to the clicked panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PanelPath>,
    /// Series operand of series actions; defaults to [`PRIMARY_SERIES`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    /// Track lists for [`Action::ToggleRows`]; defaults to [`DEFAULT_ROW_TOGGLE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<(String, String)>,
}

impl ActionBinding {
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action,
            target: None,
            series: None,
            rows: None,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<PanelPath>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    #[must_use]
    pub fn with_rows(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.rows = Some((a.into(), b.into()));
        self
    }

    /// The panel this binding acts on when `clicked` was clicked.
    #[must_use]
    pub fn resolve_target(&self, clicked: &PanelPath) -> PanelPath {
        if let Some(target) = &self.target {
            return target.clone();
        }
        match self.action {
            Action::ToggleRows => clicked.parent().unwrap_or_else(|| clicked.clone()),
            _ => clicked.clone(),
        }
    }

    #[must_use]
    pub fn series_name(&self) -> &str {
        self.series.as_deref().unwrap_or(PRIMARY_SERIES)
    }

    #[must_use]
    pub fn row_pair(&self) -> (&str, &str) {
        match &self.rows {
            Some((a, b)) => (a, b),
            None => DEFAULT_ROW_TOGGLE,
        }
    }
}

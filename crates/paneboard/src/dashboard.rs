#![forbid(unsafe_code)]

//! Dashboard session.
//!
//! A [`Dashboard`] owns every named layout of a [`DashboardConfig`], built
//! once, plus the name of the active one. All mutation goes through
//! explicit methods that take the target [`PanelPath`] as a parameter:
//!
//! - layout: [`switch_layout`](Dashboard::switch_layout),
//!   [`set_active`](Dashboard::set_active),
//!   [`toggle_template_rows`](Dashboard::toggle_template_rows);
//! - charts: [`toggle_series_display`](Dashboard::toggle_series_display),
//!   [`shift_series_period`](Dashboard::shift_series_period),
//!   [`toggle_refresh`](Dashboard::toggle_refresh);
//! - data: [`refresh`](Dashboard::refresh) and
//!   [`refresh_all`](Dashboard::refresh_all), which classify each new buffer
//!   and emit one [`SeriesUpdate`] per changed series;
//! - interaction: [`dispatch`](Dashboard::dispatch) runs the action bound to
//!   a clicked label.
//!
//! The session is single-writer: callers serialize access to it.

use paneboard_layout::{
    AddressError, LayoutNode, PanelPath, PanelRegistry, build_layout, resolve_by_index_path,
    resolve_by_index_path_mut,
};
use paneboard_series::{
    AnyPoint, ClassifierStats, RedrawScope, SeriesData, SeriesError, SeriesSource,
    UpdateClassifier,
};

use crate::config::{ConfigError, DashboardConfig};
use crate::content::{Action, ActionBinding, ChartPanel, PanelContent};

// ============================================================================
// Types
// ============================================================================

/// A built layout and its name.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltLayout {
    pub name: String,
    pub root: LayoutNode<PanelContent>,
}

/// Registry entry for a chart panel of the active layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedChart {
    /// Layout the chart belongs to.
    pub layout: String,
    /// Displayed series, in declaration order.
    pub series: Vec<String>,
    pub refresh_key: bool,
}

impl MountedChart {
    fn of(layout: &str, chart: &ChartPanel) -> Self {
        Self {
            layout: layout.to_owned(),
            series: chart.series.displayed().map(|s| s.name.clone()).collect(),
            refresh_key: chart.refresh_key,
        }
    }
}

/// What a chart adapter should do with one series.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartCommand {
    /// Replace the whole series.
    Replace(SeriesData),
    /// Update only the final point.
    UpdateLast(AnyPoint),
    /// Nothing changed.
    Keep,
}

/// Result of refreshing one series of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesUpdate {
    pub path: PanelPath,
    pub series: String,
    pub scope: RedrawScope,
    pub command: ChartCommand,
}

/// Effect of [`Dashboard::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    RowsToggled {
        path: PanelPath,
        rows: String,
    },
    LayoutSwitched {
        name: String,
    },
    DisplayToggled {
        path: PanelPath,
        series: String,
        display: bool,
    },
    PeriodShifted {
        path: PanelPath,
        series: String,
        period: u32,
        update: Option<SeriesUpdate>,
    },
    RefreshToggled {
        path: PanelPath,
        refresh_key: bool,
    },
    /// The click had no bound action or its target could not be used.
    Ignored,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("panel {path} is not a chart")]
    NotAChart { path: PanelPath },

    #[error("panel {path} is not a container")]
    NotAContainer { path: PanelPath },

    #[error("chart {path} has no series '{series}'")]
    UnknownSeries { path: PanelPath, series: String },

    #[error("unknown layout: {0}")]
    UnknownLayout(String),

    #[error("series '{series}' of chart {path}: {source}")]
    Series {
        path: PanelPath,
        series: String,
        #[source]
        source: SeriesError,
    },
}

impl DashboardError {
    fn series(path: &PanelPath, series: &str, source: SeriesError) -> Self {
        match source {
            SeriesError::UnknownSeries(_) => Self::UnknownSeries {
                path: path.clone(),
                series: series.to_owned(),
            },
            source => Self::Series {
                path: path.clone(),
                series: series.to_owned(),
                source,
            },
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// A running dashboard.
#[derive(Debug)]
pub struct Dashboard {
    prefix: String,
    root_path: PanelPath,
    layouts: Vec<BuiltLayout>,
    active: usize,
    classifier: UpdateClassifier,
    charts: PanelRegistry<MountedChart>,
}

impl Dashboard {
    /// Validate `config`, build every layout and mount the active one.
    ///
    /// The classifier honours `PANEBOARD_FULL_REDRAW`.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let layouts: Vec<BuiltLayout> = config
            .layouts
            .iter()
            .map(|layout| BuiltLayout {
                name: layout.name.clone(),
                root: build_layout(&layout.root, config.root_path.clone(), &config.prefix),
            })
            .collect();
        let active_name = config.active_name().unwrap_or_default();
        let active = layouts
            .iter()
            .position(|l| l.name == active_name)
            .ok_or_else(|| DashboardError::UnknownLayout(active_name.to_owned()))?;

        let mut dashboard = Self {
            prefix: config.prefix.clone(),
            root_path: config.root_path.clone(),
            layouts,
            active,
            classifier: UpdateClassifier::from_env(),
            charts: PanelRegistry::new(),
        };
        dashboard.mount_active();
        tracing::info!(
            target: "paneboard.dashboard",
            layouts = dashboard.layouts.len(),
            active = %dashboard.active_name(),
            charts = dashboard.charts.len(),
            "dashboard ready"
        );
        Ok(dashboard)
    }

    /// Replace the update classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: UpdateClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn root_path(&self) -> &PanelPath {
        &self.root_path
    }

    #[must_use]
    pub fn active_name(&self) -> &str {
        &self.layouts[self.active].name
    }

    #[must_use]
    pub fn active_layout(&self) -> &LayoutNode<PanelContent> {
        &self.layouts[self.active].root
    }

    pub fn layout_names(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|l| l.name.as_str())
    }

    #[must_use]
    pub fn layout(&self, name: &str) -> Option<&LayoutNode<PanelContent>> {
        self.layouts.iter().find(|l| l.name == name).map(|l| &l.root)
    }

    /// Chart panels of the active layout.
    #[must_use]
    pub fn charts(&self) -> &PanelRegistry<MountedChart> {
        &self.charts
    }

    #[must_use]
    pub fn classifier_stats(&self) -> ClassifierStats {
        self.classifier.stats()
    }

    /// Node at `path` in the active layout.
    pub fn node(&self, path: &PanelPath) -> Result<&LayoutNode<PanelContent>, DashboardError> {
        Ok(resolve_by_index_path(self.active_layout(), path)?)
    }

    /// Chart at `path` in the active layout.
    pub fn chart(&self, path: &PanelPath) -> Result<&ChartPanel, DashboardError> {
        self.node(path)?
            .content()
            .and_then(PanelContent::as_chart)
            .ok_or_else(|| DashboardError::NotAChart { path: path.clone() })
    }

    // ── Layout selection ────────────────────────────────────────────

    /// Activate the next layout, wrapping around. Returns its name.
    pub fn switch_layout(&mut self) -> &str {
        let next = (self.active + 1) % self.layouts.len();
        self.activate(next);
        self.active_name()
    }

    /// Activate the layout called `name`.
    pub fn set_active(&mut self, name: &str) -> Result<(), DashboardError> {
        let index = self
            .layouts
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| DashboardError::UnknownLayout(name.to_owned()))?;
        self.activate(index);
        Ok(())
    }

    fn activate(&mut self, index: usize) {
        let from = self.active;
        self.active = index;
        self.mount_active();
        tracing::info!(
            target: "paneboard.dashboard",
            from = %self.layouts[from].name,
            to = %self.layouts[index].name,
            "layout switched"
        );
    }

    fn mount_active(&mut self) {
        self.charts.clear();
        let layout = &self.layouts[self.active];
        for node in layout.root.iter() {
            if let Some(chart) = node.content().and_then(PanelContent::as_chart) {
                self.charts
                    .add_or_update(node.path().clone(), MountedChart::of(&layout.name, chart));
            }
        }
    }

    fn remount(&mut self, path: &PanelPath) {
        let layout = &self.layouts[self.active];
        let Ok(node) = resolve_by_index_path(&layout.root, path) else {
            return;
        };
        if let Some(chart) = node.content().and_then(PanelContent::as_chart) {
            self.charts
                .add_or_update(path.clone(), MountedChart::of(&layout.name, chart));
        }
    }

    // ── Layout mutation ─────────────────────────────────────────────

    /// Flip the row track list of the container at `path` between `a` and
    /// `b`. Returns the new track list.
    pub fn toggle_template_rows(
        &mut self,
        path: &PanelPath,
        a: &str,
        b: &str,
    ) -> Result<String, DashboardError> {
        let root = &mut self.layouts[self.active].root;
        let node = resolve_by_index_path_mut(root, path)?;
        if !node.is_container() {
            return Err(DashboardError::NotAContainer { path: path.clone() });
        }
        let rows = node.toggle_template_rows(a, b).to_owned();
        tracing::info!(target: "paneboard.dashboard", path = %path, rows = %rows, "rows toggled");
        Ok(rows)
    }

    // ── Chart mutation ──────────────────────────────────────────────

    fn chart_in<'a>(
        layouts: &'a mut [BuiltLayout],
        active: usize,
        path: &PanelPath,
    ) -> Result<&'a mut ChartPanel, DashboardError> {
        resolve_by_index_path_mut(&mut layouts[active].root, path)?
            .content_mut()
            .and_then(PanelContent::as_chart_mut)
            .ok_or_else(|| DashboardError::NotAChart { path: path.clone() })
    }

    /// Show or hide `series` of the chart at `path`. Returns the new state.
    pub fn toggle_series_display(
        &mut self,
        path: &PanelPath,
        series: &str,
    ) -> Result<bool, DashboardError> {
        let chart = Self::chart_in(&mut self.layouts, self.active, path)?;
        let display = chart
            .series
            .toggle_display(series)
            .map_err(|e| DashboardError::series(path, series, e))?;
        self.remount(path);
        Ok(display)
    }

    /// Shift the period of `series`, then reload it in full from `source`.
    ///
    /// Returns the new period and the resulting update, if the source
    /// produced one. A hidden series is not reloaded; it keeps its forced
    /// redraw until it is shown and refreshed.
    pub fn shift_series_period(
        &mut self,
        path: &PanelPath,
        series: &str,
        source: &mut dyn SeriesSource,
    ) -> Result<(u32, Option<SeriesUpdate>), DashboardError> {
        let chart = Self::chart_in(&mut self.layouts, self.active, path)?;
        let period = chart
            .series
            .shift_period(series)
            .map_err(|e| DashboardError::series(path, series, e))?;
        chart
            .series
            .request_redraw(series)
            .map_err(|e| DashboardError::series(path, series, e))?;
        let displayed = chart.series.get(series).is_some_and(|s| s.display);
        if !displayed {
            tracing::debug!(
                target: "paneboard.dashboard",
                path = %path,
                series,
                period,
                "hidden series not reloaded"
            );
            return Ok((period, None));
        }
        let update = refresh_series(chart, path, series, &mut self.classifier, source)?;
        Ok((period, update))
    }

    /// Flip the chart's refresh key; every series redraws on the next refresh.
    pub fn toggle_refresh(&mut self, path: &PanelPath) -> Result<bool, DashboardError> {
        let chart = Self::chart_in(&mut self.layouts, self.active, path)?;
        chart.refresh_key = !chart.refresh_key;
        let names: Vec<String> = chart.series.names().map(str::to_owned).collect();
        for name in &names {
            chart
                .series
                .request_redraw(name)
                .map_err(|e| DashboardError::series(path, name, e))?;
        }
        let refresh_key = chart.refresh_key;
        self.remount(path);
        tracing::info!(target: "paneboard.dashboard", path = %path, refresh_key, "refresh toggled");
        Ok(refresh_key)
    }

    // ── Data refresh ────────────────────────────────────────────────

    /// Pull new buffers for every displayed series of the chart at `path`.
    pub fn refresh(
        &mut self,
        path: &PanelPath,
        source: &mut dyn SeriesSource,
    ) -> Result<Vec<SeriesUpdate>, DashboardError> {
        let chart = Self::chart_in(&mut self.layouts, self.active, path)?;
        let names: Vec<String> = chart.series.displayed().map(|s| s.name.clone()).collect();
        let mut updates = Vec::with_capacity(names.len());
        for name in &names {
            if let Some(update) = refresh_series(chart, path, name, &mut self.classifier, source)? {
                updates.push(update);
            }
        }
        Ok(updates)
    }

    /// [`refresh`](Self::refresh) every mounted chart, in path order.
    ///
    /// A chart that fails to refresh is logged and skipped.
    pub fn refresh_all(&mut self, source: &mut dyn SeriesSource) -> Vec<SeriesUpdate> {
        let paths: Vec<PanelPath> = self
            .charts
            .sorted_entries()
            .into_iter()
            .map(|(path, _)| path.clone())
            .collect();
        let mut updates = Vec::new();
        for path in &paths {
            match self.refresh(path, source) {
                Ok(mut batch) => updates.append(&mut batch),
                Err(err) => tracing::warn!(
                    target: "paneboard.dashboard",
                    path = %path,
                    error = %err,
                    "chart refresh skipped"
                ),
            }
        }
        updates
    }

    // ── Interaction ─────────────────────────────────────────────────

    /// Run the action bound to the label at `clicked`.
    ///
    /// Never fails: a missing panel, an unbound label or an unusable target
    /// is logged and reported as [`ActionOutcome::Ignored`].
    pub fn dispatch(
        &mut self,
        clicked: &PanelPath,
        source: &mut dyn SeriesSource,
    ) -> ActionOutcome {
        let binding = match self.node(clicked) {
            Ok(node) => node
                .content()
                .and_then(PanelContent::as_label)
                .and_then(|label| label.action.clone()),
            Err(err) => {
                tracing::warn!(
                    target: "paneboard.dashboard",
                    clicked = %clicked,
                    error = %err,
                    "click on unknown panel ignored"
                );
                return ActionOutcome::Ignored;
            }
        };
        let Some(binding) = binding else {
            tracing::debug!(target: "paneboard.dashboard", clicked = %clicked, "no action bound");
            return ActionOutcome::Ignored;
        };

        let target = binding.resolve_target(clicked);
        match self.apply(&binding, &target, source) {
            Ok(outcome) => {
                tracing::info!(
                    target: "paneboard.dashboard",
                    action = binding.action.as_str(),
                    clicked = %clicked,
                    panel = %target,
                    "action applied"
                );
                outcome
            }
            Err(err) => {
                tracing::warn!(
                    target: "paneboard.dashboard",
                    action = binding.action.as_str(),
                    clicked = %clicked,
                    panel = %target,
                    error = %err,
                    "action ignored"
                );
                ActionOutcome::Ignored
            }
        }
    }

    fn apply(
        &mut self,
        binding: &ActionBinding,
        target: &PanelPath,
        source: &mut dyn SeriesSource,
    ) -> Result<ActionOutcome, DashboardError> {
        let series = binding.series_name();
        Ok(match binding.action {
            Action::ToggleRows => {
                let (a, b) = binding.row_pair();
                let rows = self.toggle_template_rows(target, a, b)?;
                ActionOutcome::RowsToggled {
                    path: target.clone(),
                    rows,
                }
            }
            Action::SwitchLayout => ActionOutcome::LayoutSwitched {
                name: self.switch_layout().to_owned(),
            },
            Action::ToggleSeriesDisplay => ActionOutcome::DisplayToggled {
                path: target.clone(),
                series: series.to_owned(),
                display: self.toggle_series_display(target, series)?,
            },
            Action::ShiftSeriesPeriod => {
                let (period, update) = self.shift_series_period(target, series, source)?;
                ActionOutcome::PeriodShifted {
                    path: target.clone(),
                    series: series.to_owned(),
                    period,
                    update,
                }
            }
            Action::ToggleRefresh => ActionOutcome::RefreshToggled {
                path: target.clone(),
                refresh_key: self.toggle_refresh(target)?,
            },
        })
    }
}

/// Pull one series from `source`, classify it against the stored buffer and
/// store it.
///
/// An empty stored buffer or a pending forced redraw asks the source for a
/// full buffer; otherwise for a tick. The forced flag is consumed only when
/// the source produced data.
fn refresh_series(
    chart: &mut ChartPanel,
    path: &PanelPath,
    name: &str,
    classifier: &mut UpdateClassifier,
    source: &mut dyn SeriesSource,
) -> Result<Option<SeriesUpdate>, DashboardError> {
    let unknown = || DashboardError::UnknownSeries {
        path: path.clone(),
        series: name.to_owned(),
    };
    let config = chart.series.get(name).ok_or_else(unknown)?;
    let forced = config.redraw;
    let new = if forced || config.data.is_empty() {
        source.full(name, &chart.series)
    } else {
        source.tick(name, &chart.series)
    };
    let Some(new) = new else {
        tracing::warn!(
            target: "paneboard.dashboard",
            path = %path,
            series = name,
            "source produced no data"
        );
        return Ok(None);
    };

    let config = chart.series.get_mut(name).ok_or_else(unknown)?;
    let scope = classifier.classify_data(&new, &config.data, forced);
    let command = match (scope, new.last()) {
        (RedrawScope::None, _) => ChartCommand::Keep,
        (RedrawScope::Last, Some(point)) => ChartCommand::UpdateLast(point),
        _ => ChartCommand::Replace(new.clone()),
    };
    config.data = new;
    config.redraw = false;
    tracing::debug!(
        target: "paneboard.dashboard",
        path = %path,
        series = name,
        %scope,
        "series refreshed"
    );
    Ok(Some(SeriesUpdate {
        path: path.clone(),
        series: name.to_owned(),
        scope,
        command,
    }))
}

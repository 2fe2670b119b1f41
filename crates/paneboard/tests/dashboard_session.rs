//! End-to-end dashboard session over the bundled two-layout fixture.

use paneboard::prelude::*;
use paneboard::series::{UpdateClassifier, crosshair_price};
use paneboard::layout::resolve_by_identity;

const FIXTURE: &str = include_str!("../fixtures/dashboard.json");
const DAY: i64 = 86_400;
const T0: i64 = 1_698_278_400;

/// Deterministic source: bars rise by one per day, indicators are flat at
/// their period, ticks nudge the last point.
#[derive(Default)]
struct Scripted {
    ticks: usize,
}

fn time(i: usize) -> i64 {
    T0 + i as i64 * DAY
}

impl SeriesSource for Scripted {
    fn full(&mut self, name: &str, series: &SeriesSet) -> Option<SeriesData> {
        let count = series.get("ohlc")?.count.unwrap_or(30);
        match name {
            "ohlc" => Some(SeriesData::from(
                (0..count)
                    .map(|i| {
                        let open = 100.0 + i as f64;
                        Candle::new(time(i), open, open + 2.0, open - 2.0, open + 1.0)
                    })
                    .collect::<Vec<_>>(),
            )),
            "volume" => Some(SeriesData::from(
                (0..count)
                    .map(|i| ValuePoint::new(time(i), i as f64 * 10.0))
                    .collect::<Vec<_>>(),
            )),
            "sma" | "rsi" => {
                let period = series.get(name)?.period? as usize;
                Some(SeriesData::from(
                    (period - 1..count)
                        .map(|i| ValuePoint::new(time(i), period as f64))
                        .collect::<Vec<_>>(),
                ))
            }
            _ => None,
        }
    }

    fn tick(&mut self, name: &str, series: &SeriesSet) -> Option<SeriesData> {
        self.ticks += 1;
        let stored = &series.get(name)?.data;
        let bumped = match stored.last()? {
            AnyPoint::Candle(mut bar) => {
                bar.close += 0.5;
                AnyPoint::Candle(bar)
            }
            AnyPoint::Value(mut point) => {
                point.value += 1.0;
                AnyPoint::Value(point)
            }
            other => other,
        };
        stored.with_last_replaced(bumped).ok()
    }
}

fn dashboard() -> Dashboard {
    let config = DashboardConfig::from_json_str(FIXTURE).unwrap();
    Dashboard::from_config(&config)
        .unwrap()
        .with_classifier(UpdateClassifier::new())
}

fn p(indices: &[usize]) -> PanelPath {
    PanelPath::from(indices)
}

#[test]
fn fixture_builds_both_layouts() {
    let dash = dashboard();
    assert_eq!(dash.layout_names().collect::<Vec<_>>(), ["data", "data2"]);
    assert_eq!(dash.active_name(), "data");

    let root = dash.active_layout();
    assert_eq!(root.grid_area(), "data_0");
    assert_eq!(root.resolved_template_areas(), Some(r#""data_0_0" "data_0_1""#));
    let charts = dash.node(&p(&[0, 1])).unwrap();
    assert_eq!(
        charts.resolved_template_areas(),
        Some(r#""data_0_1_0 data_0_1_1" "data_0_1_0 data_0_1_2""#)
    );
    let labels = dash.node(&p(&[0, 0])).unwrap();
    assert_eq!(labels.children().len(), 6);

    let other = dash.layout("data2").unwrap();
    let other_charts = resolve_by_identity(other, &p(&[0, 1])).unwrap();
    assert_eq!(
        other_charts.resolved_template_areas(),
        Some(r#""data_0_1_0 data_0_1_1" "data_0_1_2 data_0_1_3""#)
    );
    assert_eq!(dash.charts().len(), 3);
}

#[test]
fn row_toggle_targets_the_chart_grid() {
    let mut dash = dashboard();
    let mut source = Scripted::default();
    let clicked = p(&[0, 0, 0]);
    assert_eq!(
        dash.dispatch(&clicked, &mut source),
        ActionOutcome::RowsToggled {
            path: p(&[0, 1]),
            rows: "70% 30%".into()
        }
    );
    assert_eq!(
        dash.dispatch(&clicked, &mut source),
        ActionOutcome::RowsToggled {
            path: p(&[0, 1]),
            rows: "30% 70%".into()
        }
    );
    assert_eq!(
        dash.node(&p(&[0, 1])).unwrap().template_rows(),
        Some("30% 70%")
    );
}

#[test]
fn switching_layouts_remounts_charts() {
    let mut dash = dashboard();
    let mut source = Scripted::default();
    let switch = p(&[0, 0, 1]);
    assert_eq!(
        dash.dispatch(&switch, &mut source),
        ActionOutcome::LayoutSwitched {
            name: "data2".into()
        }
    );
    assert_eq!(dash.charts().len(), 4);
    assert!(
        dash.charts()
            .sorted_entries()
            .iter()
            .all(|(_, mounted)| mounted.layout == "data2")
    );
    assert_eq!(
        dash.dispatch(&switch, &mut source),
        ActionOutcome::LayoutSwitched {
            name: "data".into()
        }
    );
    assert_eq!(dash.charts().len(), 3);
}

#[test]
fn hiding_an_indicator_drops_it_from_refresh() {
    let mut dash = dashboard();
    let mut source = Scripted::default();
    let chart = p(&[0, 1, 0]);
    assert_eq!(
        dash.dispatch(&p(&[0, 0, 2]), &mut source),
        ActionOutcome::DisplayToggled {
            path: chart.clone(),
            series: "sma".into(),
            display: false
        }
    );
    let mounted = dash.charts().get(&chart).unwrap();
    assert_eq!(mounted.series, ["ohlc", "volume", "rsi"]);

    let updates = dash.refresh(&chart, &mut source).unwrap();
    let names: Vec<&str> = updates.iter().map(|u| u.series.as_str()).collect();
    assert_eq!(names, ["ohlc", "volume", "rsi"]);
}

#[test]
fn period_change_reloads_the_series() {
    let mut dash = dashboard();
    let mut source = Scripted::default();
    let chart = p(&[0, 1, 0]);
    dash.refresh(&chart, &mut source).unwrap();

    let ActionOutcome::PeriodShifted {
        path,
        series,
        period,
        update: Some(update),
    } = dash.dispatch(&p(&[0, 0, 3]), &mut source)
    else {
        panic!("expected a period shift with an update");
    };
    assert_eq!((path, series.as_str(), period), (chart.clone(), "sma", 9));
    assert_eq!(update.scope, RedrawScope::All);
    let ChartCommand::Replace(data) = update.command else {
        panic!("expected a full replace");
    };
    assert_eq!(data.len(), 30 - 9 + 1);

    let outcome = dash.dispatch(&p(&[0, 0, 3]), &mut source);
    assert!(matches!(outcome, ActionOutcome::PeriodShifted { period: 14, .. }));
    let sma = dash.chart(&chart).unwrap().series.get("sma").unwrap();
    assert_eq!(sma.period, Some(14));
    assert!(!sma.redraw);
}

#[test]
fn streaming_ticks_update_only_the_last_point() {
    let mut dash = dashboard();
    let mut source = Scripted::default();

    let first = dash.refresh_all(&mut source);
    assert_eq!(first.len(), 12);
    assert!(
        first
            .iter()
            .all(|u| matches!(u.command, ChartCommand::Replace(_)))
    );

    let second = dash.refresh_all(&mut source);
    assert_eq!(source.ticks, 12);
    assert!(second.iter().all(|u| u.scope == RedrawScope::Last));
    let ohlc = second
        .iter()
        .find(|u| u.path == p(&[0, 1, 0]) && u.series == "ohlc")
        .unwrap();
    let ChartCommand::UpdateLast(AnyPoint::Candle(bar)) = &ohlc.command else {
        panic!("expected a last-bar update");
    };
    assert_eq!(bar.close, 129.0 + 1.0 + 0.5);

    let stats = dash.classifier_stats();
    assert_eq!((stats.all, stats.last, stats.total), (12, 12, 24));
}

#[test]
fn refresh_toggle_forces_a_full_redraw() {
    let mut dash = dashboard();
    let mut source = Scripted::default();
    let chart = p(&[0, 1, 0]);
    dash.refresh(&chart, &mut source).unwrap();

    assert_eq!(
        dash.dispatch(&p(&[0, 0, 4]), &mut source),
        ActionOutcome::RefreshToggled {
            path: chart.clone(),
            refresh_key: true
        }
    );
    assert!(dash.charts().get(&chart).unwrap().refresh_key);
    let updates = dash.refresh(&chart, &mut source).unwrap();
    assert_eq!(updates.len(), 4);
    assert!(updates.iter().all(|u| u.scope == RedrawScope::All));
    assert_eq!(source.ticks, 0, "forced series reload in full");

    let again = dash.refresh(&chart, &mut source).unwrap();
    assert!(again.iter().all(|u| u.scope == RedrawScope::Last));
}

#[test]
fn clicks_without_a_usable_action_are_ignored() {
    let mut dash = dashboard();
    let mut source = Scripted::default();
    for clicked in [p(&[0, 0, 5]), p(&[0, 1, 0]), p(&[0, 3]), p(&[0, 1, 2, 0])] {
        assert_eq!(dash.dispatch(&clicked, &mut source), ActionOutcome::Ignored);
    }
}

#[test]
fn crosshair_reads_the_ohlc_close() {
    let mut dash = dashboard();
    let mut source = Scripted::default();
    let chart_path = p(&[0, 1, 1]);
    dash.refresh(&chart_path, &mut source).unwrap();

    let chart = dash.chart(&chart_path).unwrap();
    let points: Vec<(&str, Option<AnyPoint>)> = chart
        .series
        .displayed()
        .map(|s| (s.name.as_str(), s.data.last()))
        .collect();
    let price = crosshair_price(points.iter().map(|(name, point)| (*name, point.as_ref()))).unwrap();
    assert_eq!(price.series, "ohlc");
    assert_eq!(price.price, Some(130.0));
}

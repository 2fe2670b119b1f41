#![forbid(unsafe_code)]

//! Paneboard public facade.
//!
//! Re-exports the layout and series crates and adds the pieces an
//! application needs to run a dashboard: panel payloads, configuration
//! loading, the [`Dashboard`] session and logging setup.
//!
//! ```
//! use paneboard::prelude::*;
//!
//! let root = NodeDecl::container(
//!     r#""0" "1""#,
//!     vec![
//!         NodeDecl::leaf(PanelContent::label("hello")),
//!         NodeDecl::leaf(PanelContent::chart(SeriesSet::standard())),
//!     ],
//! );
//! let config = DashboardConfig::new(vec![NamedLayout { name: "main".into(), root }]);
//! let dashboard = Dashboard::from_config(&config).unwrap();
//! assert_eq!(
//!     dashboard.active_layout().resolved_template_areas(),
//!     Some(r#""data_0_0" "data_0_1""#)
//! );
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod content;
pub mod dashboard;
pub mod logging;

pub use config::{ConfigError, DEFAULT_PREFIX, DashboardConfig, NamedLayout};
pub use content::{
    Action, ActionBinding, ChartPanel, DEFAULT_ROW_TOGGLE, LabelPanel, PanelContent,
};
pub use dashboard::{
    ActionOutcome, BuiltLayout, ChartCommand, Dashboard, DashboardError, MountedChart,
    SeriesUpdate,
};
pub use logging::{LogFormat, LoggingError, init_logging};

pub use paneboard_layout as layout;
pub use paneboard_series as series;

/// Common imports.
pub mod prelude {
    pub use crate::{
        Action, ActionBinding, ActionOutcome, ChartCommand, Dashboard, DashboardConfig,
        DashboardError, NamedLayout, PanelContent, SeriesUpdate,
    };
    pub use paneboard_layout::{LayoutNode, NodeDecl, PanelPath};
    pub use paneboard_series::{
        AnyPoint, Candle, RedrawScope, SeriesData, SeriesSet, SeriesSource, ValuePoint,
    };

    pub use crate::{layout, series};
}

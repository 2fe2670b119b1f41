//! `paneboard-inspect`: load a dashboard config and show what it builds.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use paneboard_layout::{LayoutNode, PanelPath, resolve_by_identity, resolve_by_index_path};
use serde::Serialize;

use crate::config::{ConfigError, DashboardConfig};
use crate::content::PanelContent;
use crate::dashboard::{Dashboard, DashboardError};
use crate::logging::{LogFormat, LoggingError, init_logging};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// An indented outline, one panel per line.
    Outline,
}

#[derive(Debug, Parser)]
#[command(
    name = "paneboard-inspect",
    about = "Build a paneboard layout from a config file and inspect it",
    version
)]
pub struct Cli {
    /// Dashboard config (`.json` or `.toml`).
    pub config: PathBuf,

    /// Layout to inspect instead of the active one.
    #[arg(long)]
    pub layout: Option<String>,

    /// Resolve one panel, e.g. `0-1-0`.
    #[arg(long)]
    pub path: Option<PanelPath>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Log filter; falls back to PANEBOARD_LOG, then RUST_LOG.
    #[arg(long)]
    pub log: Option<String>,

    /// `text` or `json` log records on stderr.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,
}

/// Both addressing results for one path.
#[derive(Debug, Serialize)]
struct Resolution<'a> {
    path: String,
    by_index: Option<&'a LayoutNode<PanelContent>>,
    by_identity: Option<&'a LayoutNode<PanelContent>>,
    agree: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    // A second installation attempt only happens under test harnesses.
    if let Err(err) = init_logging(cli.log_format, cli.log.as_deref())
        && !matches!(err, LoggingError::AlreadyInstalled)
    {
        return Err(err.into());
    }
    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}

pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = DashboardConfig::load(&cli.config)?;
    let mut dashboard = Dashboard::from_config(&config)?;
    if let Some(name) = &cli.layout {
        dashboard.set_active(name)?;
    }
    let root = dashboard.active_layout();

    match &cli.path {
        Some(path) => {
            let by_index = resolve_by_index_path(root, path).ok();
            let by_identity = resolve_by_identity(root, path).ok();
            let agree = match (by_index, by_identity) {
                (Some(a), Some(b)) => a.path() == b.path(),
                (None, None) => true,
                _ => false,
            };
            match cli.format {
                OutputFormat::Json => {
                    let resolution = Resolution {
                        path: path.to_string(),
                        by_index,
                        by_identity,
                        agree,
                    };
                    serde_json::to_writer_pretty(&mut *out, &resolution)?;
                    writeln!(out)?;
                }
                OutputFormat::Outline => match by_index.or(by_identity) {
                    Some(node) => write_outline(out, node, 0)?,
                    None => writeln!(out, "{path}: not found")?,
                },
            }
        }
        None => match cli.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, root)?;
                writeln!(out)?;
            }
            OutputFormat::Outline => {
                writeln!(out, "layout {}", dashboard.active_name())?;
                write_outline(out, root, 0)?;
            }
        },
    }
    Ok(())
}

fn write_outline(
    out: &mut impl Write,
    node: &LayoutNode<PanelContent>,
    depth: usize,
) -> std::io::Result<()> {
    let indent = "  ".repeat(depth);
    let kind = match node.content() {
        Some(PanelContent::Chart(chart)) => {
            let names: Vec<&str> = chart.series.displayed().map(|s| s.name.as_str()).collect();
            format!("chart [{}]", names.join(", "))
        }
        Some(PanelContent::Label(label)) => match &label.action {
            Some(binding) => format!("label {:?} -> {}", label.text, binding.action.as_str()),
            None => format!("label {:?}", label.text),
        },
        None => match node.resolved_template_areas() {
            Some(areas) => format!("grid {areas}"),
            None => "empty".to_owned(),
        },
    };
    writeln!(out, "{indent}{} {} {kind}", node.path(), node.grid_area())?;
    for child in node.children() {
        write_outline(out, child, depth + 1)?;
    }
    Ok(())
}

#![forbid(unsafe_code)]

//! Dashboard configuration.
//!
//! A [`DashboardConfig`] names one or more layout declarations and the one
//! that starts active. It loads from JSON or TOML:
//!
//! ```toml
//! prefix = "data"
//! active = "data"
//!
//! [[layouts]]
//! name = "data"
//!
//! [layouts.root]
//! template_areas = '"0" "1"'
//! template_rows = "10% 90%"
//! ```
//!
//! Every field except `layouts` has a default.

use std::path::Path;

use paneboard_layout::{NodeDecl, PanelPath};
use serde::{Deserialize, Serialize};

use crate::content::PanelContent;

/// Default `grid_area` prefix.
pub const DEFAULT_PREFIX: &str = "data";

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_owned()
}

fn default_root_path() -> PanelPath {
    PanelPath::from([0])
}

/// A layout declaration with a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLayout {
    pub name: String,
    pub root: NodeDecl<PanelContent>,
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Prefix of every generated `grid_area`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Address given to each layout root.
    #[serde(default = "default_root_path")]
    pub root_path: PanelPath,
    /// Named layouts in switching order.
    pub layouts: Vec<NamedLayout>,
    /// Initially active layout; the first one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
}

impl DashboardConfig {
    /// A configuration with default prefix and root path.
    #[must_use]
    pub fn new(layouts: Vec<NamedLayout>) -> Self {
        Self {
            prefix: default_prefix(),
            root_path: default_root_path(),
            layouts,
            active: None,
        }
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.toml` files are TOML, anything else is JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        tracing::info!(
            target: "paneboard.config",
            path = %path.display(),
            format = if is_toml { "toml" } else { "json" },
            "loading dashboard config"
        );
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Check the invariants the loaders rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layouts.is_empty() {
            return Err(ConfigError::EmptyLayouts);
        }
        if self.prefix.is_empty()
            || self
                .prefix
                .chars()
                .any(|c| c.is_whitespace() || c == '"' || c == '\'')
        {
            return Err(ConfigError::InvalidPrefix(self.prefix.clone()));
        }
        // Index resolution treats the first element as the root itself.
        if self.root_path.len() != 1 {
            return Err(ConfigError::InvalidRootPath(self.root_path.clone()));
        }
        for (i, layout) in self.layouts.iter().enumerate() {
            if self.layouts[..i].iter().any(|l| l.name == layout.name) {
                return Err(ConfigError::DuplicateLayout(layout.name.clone()));
            }
        }
        if let Some(active) = &self.active
            && self.layout(active).is_none()
        {
            return Err(ConfigError::UnknownLayout(active.clone()));
        }
        Ok(())
    }

    #[must_use]
    pub fn layout(&self, name: &str) -> Option<&NamedLayout> {
        self.layouts.iter().find(|l| l.name == name)
    }

    /// Name of the initially active layout.
    #[must_use]
    pub fn active_name(&self) -> Option<&str> {
        self.active
            .as_deref()
            .or_else(|| self.layouts.first().map(|l| l.name.as_str()))
    }
}

/// Errors that can occur when loading a dashboard configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config declares no layouts")]
    EmptyLayouts,

    #[error("unknown layout: {0}")]
    UnknownLayout(String),

    #[error("layout declared twice: {0}")]
    DuplicateLayout(String),

    #[error("invalid grid-area prefix: {0:?}")]
    InvalidPrefix(String),

    #[error("root path must hold exactly one index, got [{0}]")]
    InvalidRootPath(PanelPath),
}

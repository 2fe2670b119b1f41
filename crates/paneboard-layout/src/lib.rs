#![forbid(unsafe_code)]

//! Panel layout trees for paneboard.
//!
//! - [`path`]: the [`PanelPath`] value type.
//! - [`template`]: `grid-template-areas` rewriting.
//! - [`tree`]: declarations, built trees and [`build_layout`].
//! - [`address`]: index-path and identity resolution.
//! - [`registry`]: path-keyed runtime state.

pub mod address;
pub mod path;
pub mod registry;
pub mod template;
pub mod tree;

pub use address::{
    AddressError, NotFoundReason, resolve_by_identity, resolve_by_identity_mut,
    resolve_by_index_path, resolve_by_index_path_mut,
};
pub use path::{PanelPath, ParsePathError};
pub use registry::{PanelRegistry, RegistryUpdate};
pub use template::{PLACEHOLDER_AREA, TemplateRewrite, rewrite};
pub use tree::{LayoutNode, NodeDecl, build_layout};

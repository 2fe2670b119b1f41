#![forbid(unsafe_code)]

//! Declarative panel trees and the layout builder.
//!
//! A [`NodeDecl`] is what configuration authors write: an optional
//! `grid-template-areas` string naming abstract areas, optional row/column
//! track sizes, optional children and an opaque payload. [`build_layout`]
//! turns it into an addressable [`LayoutNode`] tree:
//!
//! - every node gets a [`PanelPath`] (parent path + sibling index) and a
//!   `grid_area` token derived from a caller-supplied prefix;
//! - every container's template is rewritten so each abstract area names a
//!   real child's `grid_area` ([`crate::template::rewrite`]);
//! - a container keeps at most as many children as its template has
//!   distinct areas. Surplus declared children are dropped; missing
//!   children leave `.` cells behind.
//!
//! # Invariants
//!
//! 1. `child.path == parent.path.child(i)` for the child at index `i`.
//! 2. Sibling paths are pairwise distinct.
//! 3. `grid_area` values are pairwise distinct within one build sharing a
//!    prefix.
//! 4. Building the same declaration with the same path and prefix yields an
//!    identical tree.
//!
//! # Failure Modes
//!
//! None. A missing or name-less template on a container yields zero
//! children.
//!
//! # Mutation
//!
//! Built trees are mutated in place by interaction handlers through the
//! explicit setters on [`LayoutNode`]. The tree performs no locking; callers
//! serialize writers per node.

use serde::{Deserialize, Serialize};

use crate::path::PanelPath;
use crate::template;

// ============================================================================
// Declaration
// ============================================================================

/// One node of a layout declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "C: Serialize",
    deserialize = "C: Deserialize<'de>"
))]
pub struct NodeDecl<C> {
    /// Abstract `grid-template-areas`, e.g. `"0 1" "0 2"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_areas: Option<String>,
    /// `grid-template-rows` track list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_rows: Option<String>,
    /// `grid-template-columns` track list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_columns: Option<String>,
    /// Child declarations. `Some` marks the node as a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeDecl<C>>>,
    /// Leaf payload; never interpreted by the layout crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<C>,
}

impl<C> Default for NodeDecl<C> {
    fn default() -> Self {
        Self {
            template_areas: None,
            template_rows: None,
            template_columns: None,
            children: None,
            content: None,
        }
    }
}

impl<C> NodeDecl<C> {
    /// A leaf carrying `content`.
    #[must_use]
    pub fn leaf(content: C) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    /// A container with the given abstract template and children.
    #[must_use]
    pub fn container(template_areas: impl Into<String>, children: Vec<NodeDecl<C>>) -> Self {
        Self {
            template_areas: Some(template_areas.into()),
            children: Some(children),
            ..Self::default()
        }
    }

    /// Set the row track list.
    #[must_use]
    pub fn with_rows(mut self, rows: impl Into<String>) -> Self {
        self.template_rows = Some(rows.into());
        self
    }

    /// Set the column track list.
    #[must_use]
    pub fn with_columns(mut self, columns: impl Into<String>) -> Self {
        self.template_columns = Some(columns.into());
        self
    }
}

// ============================================================================
// Built tree
// ============================================================================

/// A built, addressable panel node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "C: Serialize",
    deserialize = "C: Deserialize<'de>"
))]
pub struct LayoutNode<C> {
    path: PanelPath,
    grid_area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template_areas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resolved_template_areas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template_rows: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template_columns: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<LayoutNode<C>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<C>,
}

impl<C> LayoutNode<C> {
    /// Address of this node.
    #[must_use]
    pub fn path(&self) -> &PanelPath {
        &self.path
    }

    /// CSS `grid-area` token assigned to this node.
    #[must_use]
    pub fn grid_area(&self) -> &str {
        &self.grid_area
    }

    /// The declared (abstract) template, if any.
    #[must_use]
    pub fn template_areas(&self) -> Option<&str> {
        self.template_areas.as_deref()
    }

    /// The template with every area bound to a child's `grid_area` or `.`.
    ///
    /// `Some` exactly for containers.
    #[must_use]
    pub fn resolved_template_areas(&self) -> Option<&str> {
        self.resolved_template_areas.as_deref()
    }

    #[must_use]
    pub fn template_rows(&self) -> Option<&str> {
        self.template_rows.as_deref()
    }

    #[must_use]
    pub fn template_columns(&self) -> Option<&str> {
        self.template_columns.as_deref()
    }

    #[must_use]
    pub fn children(&self) -> &[LayoutNode<C>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [LayoutNode<C>] {
        &mut self.children
    }

    #[must_use]
    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.content.as_mut()
    }

    #[must_use]
    pub fn is_container(&self) -> bool {
        self.resolved_template_areas.is_some()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.is_container()
    }

    // ── Mutation API ────────────────────────────────────────────────

    /// Replace the row track list, returning the previous value.
    pub fn set_template_rows(&mut self, rows: impl Into<String>) -> Option<String> {
        self.template_rows.replace(rows.into())
    }

    /// Replace the column track list, returning the previous value.
    pub fn set_template_columns(&mut self, columns: impl Into<String>) -> Option<String> {
        self.template_columns.replace(columns.into())
    }

    /// Flip the row track list between `a` and `b`.
    ///
    /// A current value of `a` becomes `b`; anything else, including no
    /// value, becomes `a`. Returns the new value.
    pub fn toggle_template_rows<'a>(&mut self, a: &'a str, b: &'a str) -> &'a str {
        let next = if self.template_rows.as_deref() == Some(a) {
            b
        } else {
            a
        };
        self.template_rows = Some(next.to_owned());
        next
    }

    /// Replace the payload, returning the previous one.
    pub fn set_content(&mut self, content: C) -> Option<C> {
        self.content.replace(content)
    }

    // ── Traversal ───────────────────────────────────────────────────

    /// Depth-first pre-order iterator over this subtree.
    pub fn iter(&self) -> Iter<'_, C> {
        Iter { stack: vec![self] }
    }

    /// Total number of nodes in this subtree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Leaves of this subtree in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = &LayoutNode<C>> {
        self.iter().filter(|node| node.is_leaf())
    }

    /// Visit every node mutably in pre-order.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut LayoutNode<C>)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }
}

/// Pre-order iterator returned by [`LayoutNode::iter`].
pub struct Iter<'a, C> {
    stack: Vec<&'a LayoutNode<C>>,
}

impl<'a, C> Iterator for Iter<'a, C> {
    type Item = &'a LayoutNode<C>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Build an addressable layout tree from a declaration.
///
/// `path` is the address given to `decl` itself (conventionally `[0]` for a
/// dashboard root) and `prefix` seeds every `grid_area` token.
pub fn build_layout<C: Clone>(decl: &NodeDecl<C>, path: PanelPath, prefix: &str) -> LayoutNode<C> {
    let grid_area = path.grid_area(prefix);
    tracing::debug!(
        target: "paneboard.layout",
        path = %path,
        grid_area = %grid_area,
        "building node"
    );

    let mut node = LayoutNode {
        grid_area,
        template_areas: decl.template_areas.clone(),
        resolved_template_areas: None,
        template_rows: decl.template_rows.clone(),
        template_columns: decl.template_columns.clone(),
        children: Vec::new(),
        content: decl.content.clone(),
        path,
    };

    let Some(child_decls) = &decl.children else {
        return node;
    };

    let mut children: Vec<LayoutNode<C>> = child_decls
        .iter()
        .enumerate()
        .map(|(index, child)| build_layout(child, node.path.child(index), prefix))
        .collect();

    let tokens: Vec<&str> = children.iter().map(LayoutNode::grid_area).collect();
    let rewrite = template::rewrite(node.template_areas.as_deref().unwrap_or_default(), &tokens);

    if children.len() > rewrite.unique_area_count {
        tracing::debug!(
            target: "paneboard.layout",
            path = %node.path,
            declared = children.len(),
            kept = rewrite.unique_area_count,
            "dropping children beyond the template's area count"
        );
    }
    children.truncate(rewrite.unique_area_count);

    node.resolved_template_areas = Some(rewrite.rewritten);
    node.children = children;
    node
}

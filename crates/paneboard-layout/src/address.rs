#![forbid(unsafe_code)]

//! Resolving a [`PanelPath`] to a node of a built layout tree.
//!
//! Two resolvers are provided:
//!
//! | Resolver                | Cost     | Trusts tree shape |
//! |-------------------------|----------|-------------------|
//! | [`resolve_by_index_path`] | O(depth) | yes               |
//! | [`resolve_by_identity`]   | O(n)     | no                |
//!
//! The index resolver is the hot path for interaction callbacks. The first
//! element of the path names the root itself and is skipped; each later
//! element indexes into the current node's children.
//!
//! The identity resolver walks the whole tree in DFS pre-order and compares
//! each node's own path with the target, so it still finds the right node
//! after a mutation has reordered children.
//!
//! Both resolvers compare paths by value and report failure as
//! [`AddressError::NotFound`], logged at `warn`; callers treat it as a
//! no-op.

use std::fmt;

use thiserror::Error;

use crate::path::PanelPath;
use crate::tree::LayoutNode;

/// Why a path did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Descent reached a node with no children.
    NoChildren,
    /// A path index was past the end of the children list.
    IndexOutOfBounds { index: usize, len: usize },
    /// A full search visited every node without a match.
    NoMatch,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChildren => write!(f, "node has no children"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for {len} children")
            }
            Self::NoMatch => write!(f, "no node carries this path"),
        }
    }
}

/// Address resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("panel {path} not found: {reason}")]
    NotFound {
        path: PanelPath,
        reason: NotFoundReason,
    },
}

impl AddressError {
    fn not_found(path: &PanelPath, reason: NotFoundReason) -> Self {
        tracing::warn!(
            target: "paneboard.address",
            path = %path,
            %reason,
            "panel path did not resolve"
        );
        Self::NotFound {
            path: path.clone(),
            reason,
        }
    }
}

fn step<C>(node: &LayoutNode<C>, index: usize) -> Result<(), NotFoundReason> {
    let len = node.children().len();
    if len == 0 {
        return Err(NotFoundReason::NoChildren);
    }
    if index >= len {
        return Err(NotFoundReason::IndexOutOfBounds { index, len });
    }
    Ok(())
}

/// Resolve `path` by direct indexed descent from `root`.
///
/// `path[0]` identifies `root` and is not used; the empty path resolves to
/// `root`.
pub fn resolve_by_index_path<'a, C>(
    root: &'a LayoutNode<C>,
    path: &PanelPath,
) -> Result<&'a LayoutNode<C>, AddressError> {
    let mut current = root;
    for &index in path.indices().iter().skip(1) {
        step(current, index).map_err(|reason| AddressError::not_found(path, reason))?;
        current = &current.children()[index];
        tracing::debug!(
            target: "paneboard.address",
            at = %current.path(),
            index,
            "descended"
        );
    }
    Ok(current)
}

/// Mutable variant of [`resolve_by_index_path`].
pub fn resolve_by_index_path_mut<'a, C>(
    root: &'a mut LayoutNode<C>,
    path: &PanelPath,
) -> Result<&'a mut LayoutNode<C>, AddressError> {
    let mut current = root;
    for &index in path.indices().iter().skip(1) {
        step(current, index).map_err(|reason| AddressError::not_found(path, reason))?;
        current = &mut current.children_mut()[index];
    }
    Ok(current)
}

/// Resolve `target` by a DFS pre-order search comparing each node's own
/// path. Returns the first match.
pub fn resolve_by_identity<'a, C>(
    root: &'a LayoutNode<C>,
    target: &PanelPath,
) -> Result<&'a LayoutNode<C>, AddressError> {
    root.iter()
        .find(|node| node.path() == target)
        .ok_or_else(|| AddressError::not_found(target, NotFoundReason::NoMatch))
}

/// Mutable variant of [`resolve_by_identity`].
pub fn resolve_by_identity_mut<'a, C>(
    root: &'a mut LayoutNode<C>,
    target: &PanelPath,
) -> Result<&'a mut LayoutNode<C>, AddressError> {
    find_mut(root, target).ok_or_else(|| AddressError::not_found(target, NotFoundReason::NoMatch))
}

fn find_mut<'a, C>(node: &'a mut LayoutNode<C>, target: &PanelPath) -> Option<&'a mut LayoutNode<C>> {
    if node.path() == target {
        return Some(node);
    }
    node.children_mut()
        .iter_mut()
        .find_map(|child| find_mut(child, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeDecl, build_layout};

    fn sample() -> LayoutNode<u8> {
        let decl = NodeDecl::container(
            r#""0" "1""#,
            vec![
                NodeDecl::container(r#""0 1""#, vec![NodeDecl::leaf(1), NodeDecl::leaf(2)]),
                NodeDecl::container(
                    r#""0 1" "0 2""#,
                    vec![NodeDecl::leaf(3), NodeDecl::leaf(4), NodeDecl::leaf(5)],
                ),
            ],
        );
        build_layout(&decl, PanelPath::from([0]), "data")
    }

    #[test]
    fn index_path_descends() {
        let root = sample();
        let node = resolve_by_index_path(&root, &PanelPath::from([0, 1, 2])).unwrap();
        assert_eq!(node.path(), &PanelPath::from([0, 1, 2]));
        assert_eq!(node.content(), Some(&5));
    }

    #[test]
    fn first_element_is_ignored() {
        let root = sample();
        let node = resolve_by_index_path(&root, &PanelPath::from([7, 1, 0])).unwrap();
        assert_eq!(node.path(), &PanelPath::from([0, 1, 0]));
    }

    #[test]
    fn short_paths_resolve_to_root() {
        let root = sample();
        assert_eq!(
            resolve_by_index_path(&root, &PanelPath::root()).unwrap().path(),
            root.path()
        );
        assert_eq!(
            resolve_by_index_path(&root, &PanelPath::from([0])).unwrap().path(),
            root.path()
        );
    }

    #[test]
    fn out_of_bounds_is_not_found() {
        let root = sample();
        let err = resolve_by_index_path(&root, &PanelPath::from([0, 2])).unwrap_err();
        assert_eq!(
            err,
            AddressError::NotFound {
                path: PanelPath::from([0, 2]),
                reason: NotFoundReason::IndexOutOfBounds { index: 2, len: 2 },
            }
        );
    }

    #[test]
    fn descending_past_a_leaf_is_not_found() {
        let root = sample();
        let err = resolve_by_index_path(&root, &PanelPath::from([0, 0, 1, 0])).unwrap_err();
        assert!(matches!(
            err,
            AddressError::NotFound {
                reason: NotFoundReason::NoChildren,
                ..
            }
        ));
    }

    #[test]
    fn identity_search_finds_by_value() {
        let root = sample();
        let target = PanelPath::root().child(0).child(1).child(1);
        let node = resolve_by_identity(&root, &target).unwrap();
        assert_eq!(node.content(), Some(&4));
    }

    #[test]
    fn identity_search_requires_exact_length() {
        let root = sample();
        let err = resolve_by_identity(&root, &PanelPath::from([0, 1, 0, 0])).unwrap_err();
        assert!(matches!(
            err,
            AddressError::NotFound {
                reason: NotFoundReason::NoMatch,
                ..
            }
        ));
        assert!(resolve_by_identity(&root, &PanelPath::root()).is_err());
    }

    #[test]
    fn mutable_resolvers_reach_the_same_node() {
        let mut root = sample();
        let path = PanelPath::from([0, 1]);
        resolve_by_index_path_mut(&mut root, &path)
            .unwrap()
            .set_template_rows("70% 30%");
        assert_eq!(
            resolve_by_identity_mut(&mut root, &path).unwrap().template_rows(),
            Some("70% 30%")
        );
        assert!(resolve_by_identity_mut(&mut root, &PanelPath::from([9])).is_err());
    }

    #[test]
    fn not_found_message_names_the_path() {
        let root = sample();
        let err = resolve_by_index_path(&root, &PanelPath::from([0, 5])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "panel 0-5 not found: index 5 out of bounds for 2 children"
        );
    }
}

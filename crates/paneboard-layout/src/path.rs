#![forbid(unsafe_code)]

//! Structural panel addresses.
//!
//! A [`PanelPath`] is the ordered list of child indices that locates a node
//! from the root of a layout tree. Paths are plain values: equality,
//! ordering and hashing are derived from the index sequence, so a path can
//! key a map without any notion of reference identity.
//!
//! # Invariants
//!
//! 1. `parent.child(i).parent() == Some(parent)`.
//! 2. `p.to_string().parse::<PanelPath>() == Ok(p)` for every non-empty `p`.
//! 3. `grid_area(prefix)` is injective for a fixed prefix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered child-index sequence addressing one panel node.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PanelPath(Vec<usize>);

impl PanelPath {
    /// The empty path.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from raw indices.
    #[must_use]
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    /// Path of the `index`-th child of this node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Path of the enclosing node, or `None` for the empty path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.0.split_last()?;
        Some(Self(head.to_vec()))
    }

    /// Raw indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of this node among its siblings.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Whether `self` is `other` or one of its ancestors.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }

    /// CSS grid-area token for this path: `prefix + "_" + indices joined by "_"`.
    ///
    /// The empty path yields `prefix + "_"`.
    #[must_use]
    pub fn grid_area(&self, prefix: &str) -> String {
        let mut out = String::with_capacity(prefix.len() + 1 + self.0.len() * 2);
        out.push_str(prefix);
        out.push('_');
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                out.push('_');
            }
            out.push_str(&index.to_string());
        }
        out
    }
}

impl From<Vec<usize>> for PanelPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for PanelPath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for PanelPath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for PanelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// Failure to parse a `0-1-2` style path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid panel path segment {segment:?} in {input:?}")]
pub struct ParsePathError {
    pub input: String,
    pub segment: String,
}

impl FromStr for PanelPath {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .split('-')
            .map(|segment| {
                segment.parse::<usize>().map_err(|_| ParsePathError {
                    input: s.to_owned(),
                    segment: segment.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn child_appends_index() {
        let p = PanelPath::from([0, 1]);
        assert_eq!(p.child(2), PanelPath::from([0, 1, 2]));
        assert_eq!(p, PanelPath::from([0, 1]), "child must not mutate the parent");
    }

    #[test]
    fn parent_of_root_is_none() {
        assert_eq!(PanelPath::root().parent(), None);
        assert_eq!(
            PanelPath::from([0, 1, 2]).parent(),
            Some(PanelPath::from([0, 1]))
        );
    }

    #[test]
    fn grid_area_joins_with_underscores() {
        assert_eq!(PanelPath::from([0, 1, 0]).grid_area("data"), "data_0_1_0");
        assert_eq!(PanelPath::from([0]).grid_area("data"), "data_0");
        assert_eq!(PanelPath::root().grid_area("data"), "data_");
    }

    #[test]
    fn display_and_parse() {
        let p = PanelPath::from([0, 12, 3]);
        assert_eq!(p.to_string(), "0-12-3");
        assert_eq!("0-12-3".parse::<PanelPath>().unwrap(), p);
        assert_eq!("".parse::<PanelPath>().unwrap(), PanelPath::root());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "0-x-1".parse::<PanelPath>().unwrap_err();
        assert_eq!(err.segment, "x");
        assert!("0--1".parse::<PanelPath>().is_err());
    }

    #[test]
    fn equal_paths_share_a_map_slot() {
        let mut map = FxHashMap::default();
        map.insert(PanelPath::from([0, 1, 0]), "chart");
        let rebuilt = PanelPath::root().child(0).child(1).child(0);
        assert_eq!(map.get(&rebuilt), Some(&"chart"));
    }

    #[test]
    fn prefix_relation() {
        let a = PanelPath::from([0, 1]);
        assert!(a.is_prefix_of(&PanelPath::from([0, 1, 2])));
        assert!(a.is_prefix_of(&a));
        assert!(!a.is_prefix_of(&PanelPath::from([0, 2, 1])));
    }

    #[test]
    fn serde_is_a_bare_array() {
        let p = PanelPath::from([0, 1]);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[0,1]");
        let back: PanelPath = serde_json::from_str("[0,1]").unwrap();
        assert_eq!(back, p);
    }
}

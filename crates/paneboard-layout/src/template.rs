#![forbid(unsafe_code)]

//! CSS `grid-template-areas` rewriting.
//!
//! Declarations name their grid cells with abstract area names
//! (`"a b" "c d"`, `"0 1" "0 2"`). At build time every distinct name is
//! bound, in first-occurrence order, to the `grid-area` token of a real
//! child panel. Names with no child left to bind become the CSS empty-cell
//! placeholder `.`.
//!
//! # Algorithm
//!
//! 1. Scan the template for maximal runs of `[A-Za-z0-9_-]` (area-name
//!    occurrences; repeats express spanning).
//! 2. Deduplicate in first-occurrence order.
//! 3. Bind the i-th distinct name to `tokens[i]`, or to `.` when the token
//!    list is exhausted.
//! 4. Substitute every occurrence. Quotes, whitespace, row breaks and
//!    existing `.` cells are copied verbatim.
//!
//! # Failure Modes
//!
//! None. An empty or name-less template is returned unchanged with a
//! distinct-area count of zero; surplus tokens are ignored.

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};
use rustc_hash::{FxHashMap, FxHashSet};

/// Cell value used when no token is left for an area name.
pub const PLACEHOLDER_AREA: &str = ".";

static AREA_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w-]+").expect("area name pattern is valid"));

/// Output of [`rewrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRewrite {
    /// The template with every area name substituted.
    pub rewritten: String,
    /// Number of distinct area names found in the input template.
    pub unique_area_count: usize,
}

/// Every area-name occurrence, left-to-right and top-to-bottom.
#[must_use]
pub fn area_occurrences(template: &str) -> Vec<&str> {
    AREA_NAME.find_iter(template).map(|m| m.as_str()).collect()
}

/// Distinct area names in first-occurrence order.
#[must_use]
pub fn unique_area_names(template: &str) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    area_occurrences(template)
        .into_iter()
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Rewrite `template`, binding distinct area names to `tokens` in order.
pub fn rewrite<S: AsRef<str>>(template: &str, tokens: &[S]) -> TemplateRewrite {
    let unique = unique_area_names(template);
    tracing::debug!(
        target: "paneboard.template",
        template,
        areas = ?unique,
        "extracted grid areas"
    );

    if unique.len() > tokens.len() {
        tracing::warn!(
            target: "paneboard.template",
            template,
            unique_areas = unique.len(),
            tokens = tokens.len(),
            "fewer tokens than grid areas; trailing areas become placeholders"
        );
    }

    let bindings: FxHashMap<&str, &str> = unique
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let value = tokens.get(i).map_or(PLACEHOLDER_AREA, |t| t.as_ref());
            (*name, value)
        })
        .collect();

    let rewritten = AREA_NAME
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[0];
            bindings
                .get(name)
                .copied()
                .unwrap_or(PLACEHOLDER_AREA)
                .to_owned()
        })
        .into_owned();

    tracing::debug!(
        target: "paneboard.template",
        rewritten = %rewritten,
        "rewrote grid-template-areas"
    );

    TemplateRewrite {
        rewritten,
        unique_area_count: unique.len(),
    }
}

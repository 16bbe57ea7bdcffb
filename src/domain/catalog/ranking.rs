//! Product ranking and pagination.
//!
//! Scores a catalog snapshot against the attributes the user asked for,
//! orders it once per search, and hands out fixed-size pages of entries
//! that have not been shown yet. Pure domain logic with no dependencies;
//! fetching the snapshot is the caller's concern.
//!
//! # Invariants
//!
//! - The shown-id set is always a subset of the ranked snapshot's ids.
//! - The ranking is recomputed (and the shown set cleared) only when a
//!   new search starts; it never grows silently.
//! - Ties keep catalog order (stable sort), so an empty query paginates
//!   the catalog in its original order.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use super::entry::CatalogEntry;

/// Number of entries delivered per results page.
pub const PAGE_SIZE: usize = 3;

/// Free-text product attributes extracted from the user's request.
///
/// All fields are optional; an empty value scores nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

impl ProductDetails {
    /// Returns true if no attribute was requested.
    pub fn is_empty(&self) -> bool {
        self.product_type.is_none()
            && self.color.is_none()
            && self.size.is_none()
            && self.material.is_none()
    }

    /// Trims whitespace and drops empty attributes.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            product_type: clean(self.product_type),
            color: clean(self.color),
            size: clean(self.size),
            material: clean(self.material),
        }
    }
}

/// One page of ranked search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub products: Vec<CatalogEntry>,
    /// True if unshown entries remain after this page.
    pub has_more: bool,
    pub total_remaining: usize,
}

impl SearchPage {
    /// An empty page with nothing left to show.
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
            has_more: false,
            total_remaining: 0,
        }
    }
}

/// Additive match score of one entry against the requested attributes.
///
/// +3 if the requested product type appears in the title or description
/// (case-insensitive substring), +2 per variant whose attribute map
/// matches the requested color, +2 per variant matching the requested
/// material. A simple heuristic, not a probability; entries are never
/// normalized by size.
pub fn match_score(entry: &CatalogEntry, details: &ProductDetails) -> u32 {
    let mut score = 0;

    if let Some(kind) = details.product_type.as_deref() {
        let needle = kind.to_lowercase();
        let in_title = entry.title.to_lowercase().contains(&needle);
        let in_description = entry
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        if in_title || in_description {
            score += 3;
        }
    }

    for variant in &entry.variants {
        if let Some(color) = details.color.as_deref() {
            if option_matches(&variant.options, "color", color) {
                score += 2;
            }
        }
        if let Some(material) = details.material.as_deref() {
            if option_matches(&variant.options, "material", material) {
                score += 2;
            }
        }
    }

    score
}

fn option_matches(options: &HashMap<String, String>, key: &str, wanted: &str) -> bool {
    options
        .get(key)
        .is_some_and(|value| value.to_lowercase().contains(&wanted.to_lowercase()))
}

/// Session-scoped ranking over one catalog snapshot, with pagination
/// state tracking which entries the user has already seen.
#[derive(Debug, Clone, Default)]
pub struct ProductRanker {
    ranked: Vec<CatalogEntry>,
    shown: HashSet<u64>,
}

impl ProductRanker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a ranking has been computed for this session.
    pub fn has_ranking(&self) -> bool {
        !self.ranked.is_empty() || !self.shown.is_empty()
    }

    /// The full ranked snapshot, best match first.
    pub fn ranked(&self) -> &[CatalogEntry] {
        &self.ranked
    }

    /// Starts a new search: scores every entry of `snapshot` against
    /// `details`, sorts descending by score (ties keep catalog order),
    /// and forgets everything shown so far.
    pub fn reset(&mut self, snapshot: Vec<CatalogEntry>, details: &ProductDetails) {
        let mut scored: Vec<(u32, CatalogEntry)> = snapshot
            .into_iter()
            .map(|entry| (match_score(&entry, details), entry))
            .collect();
        // Stable sort: equal scores preserve the snapshot's order.
        scored.sort_by_key(|(score, _)| Reverse(*score));

        self.ranked = scored.into_iter().map(|(_, entry)| entry).collect();
        self.shown.clear();

        tracing::debug!(entries = self.ranked.len(), "catalog ranking reset");
    }

    /// Returns the next page of entries not yet shown, marking them shown.
    pub fn next_page(&mut self) -> SearchPage {
        let page: Vec<CatalogEntry> = self
            .ranked
            .iter()
            .filter(|entry| !self.shown.contains(&entry.id))
            .take(PAGE_SIZE)
            .cloned()
            .collect();

        for entry in &page {
            self.shown.insert(entry.id);
        }

        let total_remaining = self.ranked.len() - self.shown.len();
        SearchPage {
            products: page,
            has_more: total_remaining > 0,
            total_remaining,
        }
    }
}

//! Purpose: Pure filter/sort/pagination over the catalog collection.
//! Exports: `Criteria`, `SortKey`, `SortOrder`, `ViewMode`, and the derivation functions.
//! Role: Derived-view engine; re-derivable from (collection, criteria) with no hidden state.
//! Invariants: Sorting is stable; ties keep insertion order under either direction.
//! Invariants: An empty filtered result still has one page, so page state stays valid.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::catalog::Pokemon;
use crate::core::error::{Error, ErrorKind};

pub const DEFAULT_PAGE_SIZE: usize = 24;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Height,
    Weight,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Criteria {
    pub search: String,
    pub selected_types: BTreeSet<String>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub page: usize,
    pub page_size: usize,
    pub view_mode: ViewMode,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            selected_types: BTreeSet::new(),
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            view_mode: ViewMode::default(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Height => "height",
            SortKey::Weight => "weight",
        };
        f.write_str(label)
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Error> {
        match raw {
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "height" => Ok(SortKey::Height),
            "weight" => Ok(SortKey::Weight),
            _ => Err(Error::new(ErrorKind::Usage)
                .with_message(format!("unknown sort key `{raw}` (id|name|height|weight)"))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Error> {
        match raw {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(Error::new(ErrorKind::Usage)
                .with_message(format!("unknown sort order `{raw}` (asc|desc)"))),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        })
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Error> {
        match raw {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            _ => Err(Error::new(ErrorKind::Usage)
                .with_message(format!("unknown view mode `{raw}` (grid|list)"))),
        }
    }
}

/// Search matches the name case-insensitively or the decimal identifier.
/// A non-empty tag set requires at least one of the entity's tags to be
/// selected; tag-less entities never match a non-empty tag filter.
pub fn filter_collection(
    collection: &[Pokemon],
    search: &str,
    selected_types: &BTreeSet<String>,
) -> Vec<Pokemon> {
    let needle = search.trim().to_lowercase();
    collection
        .iter()
        .filter(|entry| {
            let matches_search = needle.is_empty()
                || entry.name.to_lowercase().contains(&needle)
                || entry.id.to_string().contains(&needle);
            let matches_types = selected_types.is_empty()
                || entry.types.iter().any(|tag| selected_types.contains(tag));
            matches_search && matches_types
        })
        .cloned()
        .collect()
}

/// Stable sort by the selected key. Missing measurements compare as zero.
pub fn sort_collection(items: &mut [Pokemon], sort_by: SortKey, sort_order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = match sort_by {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => compare_names(&a.name, &b.name),
            SortKey::Height => a.height.unwrap_or(0).cmp(&b.height.unwrap_or(0)),
            SortKey::Weight => a.weight.unwrap_or(0).cmp(&b.weight.unwrap_or(0)),
        };
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

// Case-insensitive stand-in for locale collation; catalog names are a
// fixed lowercase ASCII set.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Filter then sort, as one derivation from (collection, criteria).
pub fn derive_filtered(collection: &[Pokemon], criteria: &Criteria) -> Vec<Pokemon> {
    let mut filtered = filter_collection(collection, &criteria.search, &criteria.selected_types);
    sort_collection(&mut filtered, criteria.sort_by, criteria.sort_order);
    filtered
}

/// Never zero: an empty filtered result still occupies one page.
pub fn total_pages(filtered_len: usize, page_size: usize) -> usize {
    filtered_len.div_ceil(page_size).max(1)
}

pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

pub fn page_slice(filtered: &[Pokemon], page: usize, page_size: usize) -> &[Pokemon] {
    let start = (page.max(1) - 1).saturating_mul(page_size).min(filtered.len());
    let end = start.saturating_add(page_size).min(filtered.len());
    &filtered[start..end]
}

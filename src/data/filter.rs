use std::collections::{BTreeMap, BTreeSet};

use super::facet::Facet;
use super::model::{Catalog, DatasetRecord};
use super::sort::{SortKey, sort_indices};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Per-facet selection: facet → set of selected values.
/// If a facet is absent or its set is empty, it means "no filter" (show all).
pub type FacetSelection = BTreeMap<Facet, BTreeSet<String>>;

/// Inclusive price bounds. `min > max` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Matches every price.
    pub const ANY: PriceRange = PriceRange {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        PriceRange { min, max }
    }

    /// The observed `[lowest, highest]` price of a catalog; `ANY` when empty.
    pub fn covering(catalog: &Catalog) -> Self {
        catalog
            .price_bounds()
            .map(|(min, max)| PriceRange { min, max })
            .unwrap_or(PriceRange::ANY)
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange::ANY
    }
}

/// The complete set of filter and sort parameters for one query.
///
/// Built fresh by the caller on each interaction; holds no reference to the
/// catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    /// Case-insensitive substring; empty means no text filter.
    pub search_text: String,
    pub facets: FacetSelection,
    pub price_range: PriceRange,
    /// Inclusive lower bound on `qualityScore`. Exactly 0 disables the filter.
    pub min_quality_score: i32,
    pub sort_key: SortKey,
}

impl QuerySpec {
    /// Empty query whose price range spans the catalog's observed prices.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        QuerySpec {
            price_range: PriceRange::covering(catalog),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Select the given values of a facet (in addition to any already selected).
    pub fn with_facet<I, S>(mut self, facet: Facet, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets
            .entry(facet)
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = PriceRange::new(min, max);
        self
    }

    pub fn with_min_quality(mut self, score: i32) -> Self {
        self.min_quality_score = score;
        self
    }

    pub fn sorted_by(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    /// Whether `value` is currently selected for `facet`.
    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        self.facets
            .get(&facet)
            .is_some_and(|set| set.contains(value))
    }

    /// Add `value` if absent, remove it if present. Returns the new state.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        let selected = self.facets.entry(facet).or_default();
        if selected.remove(value) {
            false
        } else {
            selected.insert(value.to_string());
            true
        }
    }

    /// Total number of selected values across all facets.
    pub fn selected_count(&self) -> usize {
        self.facets.values().map(BTreeSet::len).sum()
    }
}

// ---------------------------------------------------------------------------
// Filter stages
// ---------------------------------------------------------------------------

/// Text stage. `needle` must already be lowercased; empty passes everything.
pub fn matches_text(rec: &DatasetRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    rec.title.to_lowercase().contains(needle)
        || rec.description.to_lowercase().contains(needle)
        || rec.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Facet stage: AND across facets, OR across the values of one facet.
pub fn matches_facets(rec: &DatasetRecord, facets: &FacetSelection) -> bool {
    facets
        .iter()
        .all(|(facet, selected)| selected.is_empty() || selected.contains(rec.facet_value(*facet)))
}

/// Quality stage. A bound of exactly 0 is treated as "off"; any other value,
/// negative included, is applied literally.
pub fn matches_quality(rec: &DatasetRecord, min_quality_score: i32) -> bool {
    min_quality_score == 0 || i32::from(rec.quality_score) >= min_quality_score
}

/// All stages combined with AND.
pub fn matches(rec: &DatasetRecord, spec: &QuerySpec) -> bool {
    let needle = spec.search_text.to_lowercase();
    matches_lowered(rec, spec, &needle)
}

fn matches_lowered(rec: &DatasetRecord, spec: &QuerySpec, needle: &str) -> bool {
    matches_text(rec, needle)
        && matches_facets(rec, &spec.facets)
        && spec.price_range.contains(rec.price)
        && matches_quality(rec, spec.min_quality_score)
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Indices into `records` of the matching records, in display order.
pub fn query_indices(records: &[DatasetRecord], spec: &QuerySpec) -> Vec<usize> {
    let needle = spec.search_text.to_lowercase();
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, rec)| matches_lowered(rec, spec, &needle))
        .map(|(i, _)| i)
        .collect();

    sort_indices(records, &mut indices, spec.sort_key);
    log::debug!(
        "Query matched {} of {} records (sort: {})",
        indices.len(),
        records.len(),
        spec.sort_key
    );
    indices
}

/// The matching records, filtered and sorted. The source slice is untouched.
pub fn query<'a>(records: &'a [DatasetRecord], spec: &QuerySpec) -> Vec<&'a DatasetRecord> {
    query_indices(records, spec)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

use crate::data::facet::{Facet, facet_counts, list_facet_values};
use crate::data::filter::{PriceRange, QuerySpec, query_indices};
use crate::data::model::{Catalog, DatasetRecord};
use crate::data::sort::SortKey;

/// Quality score a listing needs to be eligible as the featured dataset.
pub const FEATURED_MIN_QUALITY: u8 = 90;

// ---------------------------------------------------------------------------
// Marketplace state
// ---------------------------------------------------------------------------

/// The browsing state, independent of rendering.
///
/// Every mutator re-runs the query so `visible()` is always current.
pub struct MarketplaceState {
    /// The catalog being browsed.
    catalog: Catalog,

    /// Active filter and sort parameters.
    spec: QuerySpec,

    /// Indices of records passing the current query, in display order (cached).
    visible_indices: Vec<usize>,
}

impl MarketplaceState {
    /// Start browsing with every filter off and newest-first ordering.
    pub fn new(catalog: Catalog) -> Self {
        let spec = QuerySpec::for_catalog(&catalog);
        Self::with_spec(catalog, spec)
    }

    /// Start browsing with a caller-built query.
    pub fn with_spec(catalog: Catalog, spec: QuerySpec) -> Self {
        let mut state = MarketplaceState {
            catalog,
            spec,
            visible_indices: Vec::new(),
        };
        state.refilter();
        state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Recompute `visible_indices` after a query change.
    fn refilter(&mut self) {
        self.visible_indices = query_indices(self.catalog.records(), &self.spec);
    }

    /// Records passing the current query, in display order.
    pub fn visible(&self) -> Vec<&DatasetRecord> {
        self.visible_indices
            .iter()
            .map(|&i| &self.catalog.records()[i])
            .collect()
    }

    pub fn result_count(&self) -> usize {
        self.visible_indices.len()
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.spec.search_text = text.into();
        self.refilter();
    }

    /// Toggle a single value in a facet's selection.
    pub fn toggle_facet_value(&mut self, facet: Facet, value: &str) {
        let selected = self.spec.toggle(facet, value);
        log::debug!("{facet} '{value}' {}", if selected { "selected" } else { "deselected" });
        self.refilter();
    }

    /// Clear a facet's selection.
    pub fn clear_facet(&mut self, facet: Facet) {
        self.spec.facets.remove(&facet);
        self.refilter();
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.spec.price_range = range;
        self.refilter();
    }

    pub fn set_min_quality_score(&mut self, score: i32) {
        self.spec.min_quality_score = score;
        self.refilter();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.spec.sort_key = key;
        self.refilter();
    }

    /// Clear facet selections, restore the default price range and quality
    /// bound, and sort by newest. The search text is kept.
    pub fn reset_filters(&mut self) {
        self.spec = QuerySpec {
            search_text: std::mem::take(&mut self.spec.search_text),
            ..QuerySpec::for_catalog(&self.catalog)
        };
        self.refilter();
    }

    /// Badge count: selected facet values, plus one for a narrowed price
    /// range, plus one for an active quality bound.
    pub fn active_filter_count(&self) -> usize {
        let default_range = PriceRange::covering(&self.catalog);
        let range = self.spec.price_range;
        let price_narrowed = range.min > default_range.min || range.max < default_range.max;
        self.spec.selected_count()
            + usize::from(price_narrowed)
            + usize::from(self.spec.min_quality_score > 0)
    }

    /// Facet values available in the whole catalog.
    pub fn facet_values(&self, facet: Facet) -> Vec<String> {
        list_facet_values(self.catalog.records(), facet)
    }

    /// Facet values with how many currently visible records carry each.
    pub fn visible_facet_counts(&self, facet: Facet) -> Vec<(String, usize)> {
        facet_counts(self.visible(), facet)
    }

    /// Every value of a facet found in the catalog, with how many visible
    /// records carry it (0 when the current query hides them all).
    pub fn facet_listing(&self, facet: Facet) -> Vec<(String, usize)> {
        let visible = self.visible_facet_counts(facet);
        self.facet_values(facet)
            .into_iter()
            .map(|value| {
                let count = visible
                    .iter()
                    .find(|(v, _)| *v == value)
                    .map_or(0, |(_, n)| *n);
                (value, count)
            })
            .collect()
    }

    /// A high-quality listing to feature, picked by `nonce`. Falls back to the
    /// first listing when none qualifies.
    pub fn featured(&self, nonce: u64) -> Option<&DatasetRecord> {
        let records = self.catalog.records();
        let candidates: Vec<&DatasetRecord> = records
            .iter()
            .filter(|r| r.quality_score >= FEATURED_MIN_QUALITY)
            .collect();
        if candidates.is_empty() {
            return records.first();
        }
        let pick = (nonce % candidates.len() as u64) as usize;
        Some(candidates[pick])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::seed;

    fn state() -> MarketplaceState {
        MarketplaceState::new(seed::catalog().unwrap())
    }

    fn ids(state: &MarketplaceState) -> Vec<String> {
        state.visible().iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn starts_with_everything_newest_first() {
        let s = state();
        assert_eq!(s.result_count(), 6);
        assert_eq!(ids(&s), vec!["5", "1", "3", "6", "2", "4"]);
        assert_eq!(s.active_filter_count(), 0);
    }

    #[test]
    fn mutators_refilter() {
        let mut s = state();
        s.toggle_facet_value(Facet::Domain, "finance");
        assert_eq!(ids(&s), vec!["5", "6"]);
        s.set_sort_key(SortKey::PriceLow);
        assert_eq!(ids(&s), vec!["6", "5"]);
        s.toggle_facet_value(Facet::Domain, "finance");
        assert_eq!(s.result_count(), 6);
    }

    #[test]
    fn reset_keeps_search_text() {
        let mut s = state();
        s.set_search_text("ledger");
        s.toggle_facet_value(Facet::DataType, "image");
        s.set_min_quality_score(50);
        s.set_sort_key(SortKey::Quality);
        s.reset_filters();

        assert_eq!(s.spec().search_text, "ledger");
        assert_eq!(s.spec().sort_key, SortKey::Newest);
        assert_eq!(s.spec().min_quality_score, 0);
        assert_eq!(s.active_filter_count(), 0);
    }

    #[test]
    fn active_filter_count_matches_badge() {
        let mut s = state();
        s.toggle_facet_value(Facet::DataType, "image");
        s.toggle_facet_value(Facet::DataType, "text");
        s.toggle_facet_value(Facet::PrivacyTechnique, "encryption");
        assert_eq!(s.active_filter_count(), 3);
        s.set_price_range(PriceRange::new(2.0, 5.0));
        assert_eq!(s.active_filter_count(), 4);
        s.set_min_quality_score(10);
        assert_eq!(s.active_filter_count(), 5);
        s.clear_facet(Facet::DataType);
        assert_eq!(s.active_filter_count(), 3);
    }

    #[test]
    fn featured_picks_high_quality() {
        let s = state();
        for nonce in 0..6 {
            let rec = s.featured(nonce).unwrap();
            assert!(rec.quality_score >= FEATURED_MIN_QUALITY);
        }
        assert_eq!(s.featured(0).unwrap().id, "1");
        assert_eq!(s.featured(1).unwrap().id, "4");
        assert_eq!(s.featured(2).unwrap().id, "5");
    }

    #[test]
    fn featured_falls_back_to_first() {
        let mut low = crate::data::model::tests::record("only");
        low.quality_score = 10;
        let s = MarketplaceState::new(Catalog::from_records(vec![low]).unwrap());
        assert_eq!(s.featured(7).unwrap().id, "only");
        assert!(MarketplaceState::new(Catalog::default()).featured(0).is_none());
    }

    #[test]
    fn facet_listing_keeps_unselected_values() {
        let mut s = state();
        s.toggle_facet_value(Facet::DataType, "image");
        assert_eq!(s.result_count(), 2);
        assert_eq!(
            s.facet_listing(Facet::DataType),
            vec![
                ("image".to_string(), 2),
                ("tabular".to_string(), 0),
                ("timeseries".to_string(), 0),
                ("text".to_string(), 0),
            ]
        );
        let domains: Vec<String> = s
            .facet_listing(Facet::Domain)
            .into_iter()
            .map(|(v, _)| v)
            .collect();
        assert_eq!(domains, s.facet_values(Facet::Domain));
        assert_eq!(s.catalog().len(), 6);
    }

    #[test]
    fn visible_counts_track_filters() {
        let mut s = state();
        s.set_min_quality_score(90);
        assert_eq!(
            s.visible_facet_counts(Facet::DataType),
            vec![("tabular".to_string(), 1), ("image".to_string(), 1), ("timeseries".to_string(), 1)]
        );
        assert_eq!(s.facet_values(Facet::DataType).len(), 4);
    }
}

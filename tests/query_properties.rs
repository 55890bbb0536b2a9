use std::collections::BTreeSet;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use dataset_market::data::filter::matches;
use dataset_market::data::seed;
use dataset_market::{
    AccessType, DataType, DatasetRecord, Facet, PriceRange, PrivacyTechnique, QuerySpec, SortKey,
    query, query_indices, resolve_facet_value,
};

// ---------------------------------------------------------------------------
// Scenarios on the built-in catalog
// ---------------------------------------------------------------------------

fn prices(records: &[&DatasetRecord]) -> Vec<f64> {
    records.iter().map(|r| r.price).collect()
}

#[test]
fn cheap_listings_sorted_by_price() {
    let catalog = seed::catalog().unwrap();
    let spec = QuerySpec::default()
        .with_price_range(0.0, 3.0)
        .with_min_quality(0)
        .sorted_by(SortKey::PriceLow);
    let result = query(catalog.records(), &spec);
    assert_eq!(prices(&result), vec![1.8, 2.2, 2.5]);
}

#[test]
fn quality_floor_keeps_only_high_scores() {
    let catalog = seed::catalog().unwrap();
    let spec = QuerySpec::for_catalog(&catalog)
        .with_min_quality(90)
        .sorted_by(SortKey::Quality);
    let scores: Vec<u8> = query(catalog.records(), &spec)
        .iter()
        .map(|r| r.quality_score)
        .collect();
    assert_eq!(scores, vec![99, 95, 92]);
}

#[test]
fn search_hits_single_title() {
    let catalog = seed::catalog().unwrap();
    let spec = QuerySpec::for_catalog(&catalog).with_search("cosmic");
    let result = query(catalog.records(), &spec);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title, "Cosmic Horizon");
}

#[test]
fn search_reaches_tags() {
    let catalog = seed::catalog().unwrap();
    let spec = QuerySpec::for_catalog(&catalog).with_search("SENTIMENT");
    let titles: Vec<&str> = query(catalog.records(), &spec)
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Crypto Waves"]);
}

#[test]
fn data_type_selection_is_or_within_facet() {
    let catalog = seed::catalog().unwrap();
    let images = QuerySpec::for_catalog(&catalog).with_facet(Facet::DataType, ["image"]);
    assert_eq!(query(catalog.records(), &images).len(), 2);

    let images_or_text = images.with_facet(Facet::DataType, ["text"]);
    assert_eq!(query(catalog.records(), &images_or_text).len(), 3);
}

#[test]
fn mixed_case_facet_input_selects_catalog_values() {
    let catalog = seed::catalog().unwrap();
    let records = catalog.records();
    let domain = resolve_facet_value(records, Facet::Domain, "Finance");
    let data_type = resolve_facet_value(records, Facet::DataType, "TABULAR");
    let spec = QuerySpec::for_catalog(&catalog)
        .with_facet(Facet::Domain, [domain])
        .with_facet(Facet::DataType, [data_type])
        .sorted_by(SortKey::PriceLow);
    let titles: Vec<&str> = query(records, &spec).iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Solana Sunrise"]);

    let raw = QuerySpec::for_catalog(&catalog).with_facet(Facet::Domain, ["Finance"]);
    assert!(query(records, &raw).is_empty());
}

#[test]
fn inverted_price_range_is_empty() {
    let catalog = seed::catalog().unwrap();
    let spec = QuerySpec::default().with_price_range(4.0, 2.0);
    assert!(query(catalog.records(), &spec).is_empty());
}

#[test]
fn query_leaves_catalog_untouched() {
    let catalog = seed::catalog().unwrap();
    let before = catalog.clone();
    let spec = QuerySpec::default().sorted_by(SortKey::PriceHigh);
    let _ = query(catalog.records(), &spec);
    assert_eq!(catalog, before);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

const WORDS: [&str; 5] = ["alpha", "Beta", "gamma", "DELTA", "omega"];
const DOMAINS: [&str; 3] = ["finance", "healthcare", "biology"];

fn data_type(i: usize) -> DataType {
    [DataType::Tabular, DataType::Image, DataType::Text][i % 3].clone()
}

fn arb_record() -> impl Strategy<Value = (usize, usize, usize, u8, u8, i64, usize, usize)> {
    (
        0..WORDS.len(),
        0..WORDS.len(),
        0..WORDS.len(),
        0u8..=6,
        0u8..=100,
        0i64..4,
        0..3usize,
        0..DOMAINS.len(),
    )
}

fn arb_catalog() -> impl Strategy<Value = Vec<DatasetRecord>> {
    prop::collection::vec(arb_record(), 0..24).prop_map(|rows| {
        let epoch = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        rows.into_iter()
            .enumerate()
            .map(|(i, (t, d, tag, price, quality, day, dt, domain))| DatasetRecord {
                id: i.to_string(),
                title: format!("{} set", WORDS[t]),
                description: format!("about {}", WORDS[d]),
                organization: "Org".to_string(),
                organization_type: "research".to_string(),
                // Few distinct prices and dates so ties are common.
                price: f64::from(price) * 0.5,
                tags: vec![WORDS[tag].to_string()],
                created_at: epoch + Duration::days(day),
                image: None,
                data_type: data_type(dt),
                access_type: AccessType::Open,
                access_count: 0,
                size: String::new(),
                quality_score: quality,
                privacy_technique: PrivacyTechnique::None,
                domain: DOMAINS[domain].to_string(),
                update_frequency: None,
                sample_available: false,
            })
            .collect()
    })
}

fn arb_sort_key() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

fn arb_spec() -> impl Strategy<Value = QuerySpec> {
    (
        prop::sample::select(vec!["", "alpha", "BETA", "a", "zzz"]),
        prop::collection::btree_set(0..3usize, 0..3),
        prop::collection::btree_set(0..DOMAINS.len(), 0..3),
        0.0f64..3.5,
        0.0f64..3.5,
        -5i32..=100,
        arb_sort_key(),
    )
        .prop_map(|(search, types, domains, lo, hi, quality, sort)| {
            QuerySpec::default()
                .with_search(search)
                .with_facet(
                    Facet::DataType,
                    types.into_iter().map(|i| data_type(i).to_string()),
                )
                .with_facet(Facet::Domain, domains.into_iter().map(|i| DOMAINS[i]))
                .with_price_range(lo, hi)
                .with_min_quality(quality)
                .sorted_by(sort)
        })
}

proptest! {
    #[test]
    fn result_is_a_subset_of_the_catalog(records in arb_catalog(), spec in arb_spec()) {
        let indices = query_indices(&records, &spec);
        let distinct: BTreeSet<usize> = indices.iter().copied().collect();
        prop_assert_eq!(distinct.len(), indices.len());
        for (&i, rec) in indices.iter().zip(query(&records, &spec)) {
            prop_assert!(i < records.len());
            prop_assert_eq!(&records[i], rec);
        }
    }

    #[test]
    fn result_is_exactly_the_matching_records(records in arb_catalog(), spec in arb_spec()) {
        let hit: BTreeSet<usize> = query_indices(&records, &spec).into_iter().collect();
        for (i, rec) in records.iter().enumerate() {
            prop_assert_eq!(hit.contains(&i), matches(rec, &spec));
        }
    }

    #[test]
    fn query_is_idempotent(records in arb_catalog(), spec in arb_spec()) {
        prop_assert_eq!(query(&records, &spec), query(&records, &spec));
    }

    #[test]
    fn empty_query_keeps_everything(records in arb_catalog(), sort in arb_sort_key()) {
        let spec = QuerySpec::default().sorted_by(sort);
        let mut indices = query_indices(&records, &spec);
        indices.sort_unstable();
        prop_assert_eq!(indices, (0..records.len()).collect::<Vec<_>>());
    }

    #[test]
    fn ties_keep_catalog_order(records in arb_catalog(), spec in arb_spec()) {
        let indices = query_indices(&records, &spec);
        for pair in indices.windows(2) {
            let (a, b) = (&records[pair[0]], &records[pair[1]]);
            let ord = spec.sort_key.compare(a, b);
            prop_assert_ne!(ord, std::cmp::Ordering::Greater);
            if ord == std::cmp::Ordering::Equal {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }

    #[test]
    fn price_bounds_are_inclusive(records in arb_catalog()) {
        let range = records
            .iter()
            .map(|r| r.price)
            .fold(None, |acc: Option<(f64, f64)>, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            });
        if let Some((lo, hi)) = range {
            let spec = QuerySpec { price_range: PriceRange::new(lo, hi), ..QuerySpec::default() };
            prop_assert_eq!(query(&records, &spec).len(), records.len());
        }
    }
}

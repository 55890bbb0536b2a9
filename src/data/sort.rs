use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::DatasetRecord;
use crate::error::ParseSortKeyError;

/// Result ordering offered by the marketplace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Most recent `createdAt` first.
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    /// Highest quality score first.
    Quality,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Quality,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Quality => "quality",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest",
            SortKey::PriceLow => "Price: Low to High",
            SortKey::PriceHigh => "Price: High to Low",
            SortKey::Quality => "Quality Score",
        }
    }

    /// Compare two records under this key. Equal keys compare `Equal` so the
    /// caller's stable sort keeps their input order.
    pub fn compare(self, a: &DatasetRecord, b: &DatasetRecord) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::PriceLow => a.price.total_cmp(&b.price),
            SortKey::PriceHigh => b.price.total_cmp(&a.price),
            SortKey::Quality => b.quality_score.cmp(&a.quality_score),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSortKeyError(s.to_string()))
    }
}

/// Stable sort of catalog indices; ties keep their relative order.
pub fn sort_indices(records: &[DatasetRecord], indices: &mut [usize], key: SortKey) {
    indices.sort_by(|&a, &b| key.compare(&records[a], &records[b]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::parse_timestamp;
    use crate::data::model::tests::record;

    fn priced(id: &str, price: f64, quality: u8, created: &str) -> DatasetRecord {
        let mut r = record(id);
        r.price = price;
        r.quality_score = quality;
        r.created_at = parse_timestamp(created).unwrap();
        r
    }

    fn sorted_ids(records: &[DatasetRecord], key: SortKey) -> Vec<String> {
        let mut indices: Vec<usize> = (0..records.len()).collect();
        sort_indices(records, &mut indices, key);
        indices.iter().map(|&i| records[i].id.clone()).collect()
    }

    #[test]
    fn newest_orders_by_descending_timestamp() {
        let a = priced("a", 1.0, 1, "2024-01-01");
        let b = priced("b", 1.0, 1, "2025-06-01");
        let c = priced("c", 1.0, 1, "2024-09-15T12:00:00Z");
        let all = vec![a, b, c];
        assert_eq!(sorted_ids(&all, SortKey::Newest), vec!["b", "c", "a"]);
    }

    #[test]
    fn price_sorts_both_ways() {
        let a = priced("a", 2.5, 1, "2024-01-01");
        let b = priced("b", 1.8, 1, "2024-01-01");
        let c = priced("c", 3.2, 1, "2024-01-01");
        let all = vec![a, b, c];
        assert_eq!(sorted_ids(&all, SortKey::PriceLow), vec!["b", "a", "c"]);
        assert_eq!(sorted_ids(&all, SortKey::PriceHigh), vec!["c", "a", "b"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let a = priced("a", 5.0, 80, "2024-01-01");
        let b = priced("b", 1.0, 90, "2024-01-01");
        let c = priced("c", 5.0, 80, "2024-01-01");
        let d = priced("d", 1.0, 90, "2024-01-01");
        let all = vec![a, b, c, d];

        for key in SortKey::ALL {
            let mut indices: Vec<usize> = (0..all.len()).collect();
            sort_indices(&all, &mut indices, key);
            let pos = |i: usize| indices.iter().position(|&x| x == i).unwrap();
            assert!(pos(0) < pos(2), "{key}: a before c");
            assert!(pos(1) < pos(3), "{key}: b before d");
        }
    }

    #[test]
    fn sort_key_names_round_trip() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
        assert_eq!("Price-High".parse::<SortKey>(), Ok(SortKey::PriceHigh));
        assert!("cheapest".parse::<SortKey>().is_err());
        assert_eq!(SortKey::default(), SortKey::Newest);
        assert_eq!(SortKey::PriceHigh.label(), "Price: High to Low");
    }
}

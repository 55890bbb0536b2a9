use anyhow::{Context, Result};

use super::loader::parse_json;
use super::model::Catalog;

/// The static listing set the marketplace ships with.
const SEED_JSON: &str = include_str!("../../assets/seed_catalog.json");

/// Build the built-in catalog.
pub fn catalog() -> Result<Catalog> {
    let records = parse_json(SEED_JSON).context("parsing built-in seed catalog")?;
    Catalog::from_records(records).context("validating built-in seed catalog")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_catalog_is_valid() {
        let catalog = catalog().unwrap();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.price_bounds(), Some((1.8, 5.0)));
        assert_eq!(catalog.get("1").map(|r| r.title.as_str()), Some("Cosmic Horizon"));
    }
}

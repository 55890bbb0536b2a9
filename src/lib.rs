//! Dataset marketplace catalog.
//!
//! Listings are loaded into an immutable [`Catalog`]; a caller-owned
//! [`QuerySpec`] is run against it with [`query`] to produce the filtered,
//! stably sorted view, and [`list_facet_values`] supplies the values for the
//! filter checkboxes.

pub mod data;
pub mod error;
pub mod present;
pub mod state;

pub use data::facet::{Facet, facet_counts, list_facet_values, resolve_facet_value};
pub use data::filter::{FacetSelection, PriceRange, QuerySpec, query, query_indices};
pub use data::model::{AccessType, Catalog, DataType, DatasetRecord, PrivacyTechnique};
pub use data::sort::SortKey;
pub use error::{CatalogError, ParseFacetError, ParseSortKeyError};
pub use state::MarketplaceState;

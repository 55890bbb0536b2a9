//! Error types for the catalog boundary.
//!
//! Querying itself cannot fail; these errors only arise while building a
//! [`Catalog`](crate::data::model::Catalog) or parsing user input.

use thiserror::Error;

/// Result type alias for catalog construction.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while validating records into a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two records share the same identifier.
    #[error("Duplicate dataset id: {id}")]
    DuplicateId { id: String },

    /// Price is negative, NaN or infinite.
    #[error("Dataset {id}: invalid price {price}")]
    InvalidPrice { id: String, price: f64 },

    /// Quality score above 100.
    #[error("Dataset {id}: quality score {score} is outside 0-100")]
    QualityOutOfRange { id: String, score: u8 },

    /// `createdAt` is neither RFC 3339 nor a bare date.
    #[error("Invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
}

impl CatalogError {
    /// Create a DuplicateId error.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create an InvalidTimestamp error.
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }
}

/// Unrecognised sort key name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown sort key '{0}' (expected newest, price-low, price-high or quality)")]
pub struct ParseSortKeyError(pub String);

/// Unrecognised facet name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown facet '{0}'")]
pub struct ParseFacetError(pub String);

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

// ---------------------------------------------------------------------------
// Categorical values – closed sets with an explicit fallback
// ---------------------------------------------------------------------------

/// Declares a closed categorical enum that parses case-insensitively from its
/// canonical spelling and keeps anything else verbatim in `Other`.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value outside the known set, kept as loaded.
            Other(String),
        }

        impl $name {
            /// Canonical spelling (or the raw text for `Other`).
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(s) => s.as_str(),
                }
            }

            /// Whether the value belongs to the closed set.
            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($text) {
                        return $name::$variant;
                    }
                )+
                $name::Other(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                match value {
                    $name::Other(s) => s,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }
    };
}

categorical! {
    /// Shape of the data a listing provides.
    DataType {
        Tabular => "tabular",
        Image => "image",
        Text => "text",
        Timeseries => "timeseries",
        Audio => "audio",
        Mixed => "mixed",
    }
}

categorical! {
    /// How the provider protects the individuals behind the data.
    PrivacyTechnique {
        Anonymization => "anonymization",
        DifferentialPrivacy => "differential-privacy",
        FederatedLearning => "federated-learning",
        Encryption => "encryption",
        /// No privacy technique applied.
        None => "none",
    }
}

categorical! {
    /// Licensing model of a listing.
    AccessType {
        Open => "open",
        Restricted => "restricted",
        Commercial => "commercial",
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Parse `createdAt`: RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| CatalogError::invalid_timestamp(s))
}

mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// DatasetRecord – one marketplace listing
// ---------------------------------------------------------------------------

/// A single dataset listing. Field names follow the catalog JSON (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub organization: String,
    pub organization_type: String,
    /// Listing price in currency units.
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub data_type: DataType,
    pub access_type: AccessType,
    #[serde(default)]
    pub access_count: u64,
    /// Human-readable size, e.g. "2.4 GB".
    #[serde(default)]
    pub size: String,
    /// 0-100.
    pub quality_score: u8,
    pub privacy_technique: PrivacyTechnique,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_frequency: Option<String>,
    #[serde(default)]
    pub sample_available: bool,
}

// ---------------------------------------------------------------------------
// Catalog – the validated, immutable collection of listings
// ---------------------------------------------------------------------------

/// The full catalog. Records are validated once and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<DatasetRecord>,
}

impl Catalog {
    /// Validate records and build the catalog, keeping their order.
    pub fn from_records(records: Vec<DatasetRecord>) -> Result<Self> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for rec in &records {
            if !seen.insert(rec.id.as_str()) {
                return Err(CatalogError::duplicate_id(&rec.id));
            }
            if !rec.price.is_finite() || rec.price < 0.0 {
                return Err(CatalogError::InvalidPrice {
                    id: rec.id.clone(),
                    price: rec.price,
                });
            }
            if rec.quality_score > 100 {
                return Err(CatalogError::QualityOutOfRange {
                    id: rec.id.clone(),
                    score: rec.quality_score,
                });
            }
            if !rec.data_type.is_known() {
                log::warn!("Dataset {}: unrecognised data type '{}'", rec.id, rec.data_type);
            }
            if !rec.privacy_technique.is_known() {
                log::warn!(
                    "Dataset {}: unrecognised privacy technique '{}'",
                    rec.id,
                    rec.privacy_technique
                );
            }
        }
        log::debug!("Catalog built with {} records", records.len());
        Ok(Catalog { records })
    }

    /// All records in catalog order.
    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&DatasetRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Lowest and highest price, or `None` for an empty catalog.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let mut prices = self.records.iter().map(|r| r.price);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

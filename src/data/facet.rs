use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::DatasetRecord;
use crate::error::ParseFacetError;

// ---------------------------------------------------------------------------
// Facet – a categorical field offered as a multi-select filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    DataType,
    Domain,
    PrivacyTechnique,
    AccessType,
    OrganizationType,
}

impl Facet {
    /// Every facet, in filter-panel order.
    pub const ALL: [Facet; 5] = [
        Facet::DataType,
        Facet::Domain,
        Facet::PrivacyTechnique,
        Facet::AccessType,
        Facet::OrganizationType,
    ];

    /// Field name as it appears in the catalog JSON.
    pub fn key(self) -> &'static str {
        match self {
            Facet::DataType => "dataType",
            Facet::Domain => "domain",
            Facet::PrivacyTechnique => "privacyTechnique",
            Facet::AccessType => "accessType",
            Facet::OrganizationType => "organizationType",
        }
    }

    /// Heading shown above the facet's checkboxes.
    pub fn label(self) -> &'static str {
        match self {
            Facet::DataType => "Data Type",
            Facet::Domain => "Domain",
            Facet::PrivacyTechnique => "Privacy Technique",
            Facet::AccessType => "Access Type",
            Facet::OrganizationType => "Organization Type",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Accepts `dataType`, `data-type`, `data_type` and so on.
impl FromStr for Facet {
    type Err = ParseFacetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Facet::ALL
            .into_iter()
            .find(|f| f.key().to_ascii_lowercase() == folded)
            .ok_or_else(|| ParseFacetError(s.to_string()))
    }
}

impl DatasetRecord {
    /// The record's value for a facet.
    pub fn facet_value(&self, facet: Facet) -> &str {
        match facet {
            Facet::DataType => self.data_type.as_str(),
            Facet::Domain => &self.domain,
            Facet::PrivacyTechnique => self.privacy_technique.as_str(),
            Facet::AccessType => self.access_type.as_str(),
            Facet::OrganizationType => &self.organization_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Facet values
// ---------------------------------------------------------------------------

/// Distinct values of `facet` across `records`, in first-occurrence order.
pub fn list_facet_values(records: &[DatasetRecord], facet: Facet) -> Vec<String> {
    facet_counts(records, facet)
        .into_iter()
        .map(|(value, _)| value)
        .collect()
}

/// Distinct values of `facet` with the number of records carrying each,
/// in first-occurrence order.
pub fn facet_counts<'a, I>(records: I, facet: Facet) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a DatasetRecord>,
{
    let mut position: BTreeMap<&'a str, usize> = BTreeMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for rec in records {
        let value = rec.facet_value(facet);
        match position.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }
    counts
}

/// Map user input onto the catalog's spelling of a facet value, matching
/// case-insensitively. Input with no counterpart is returned unchanged.
pub fn resolve_facet_value(records: &[DatasetRecord], facet: Facet, input: &str) -> String {
    let wanted = input.trim().to_lowercase();
    records
        .iter()
        .map(|rec| rec.facet_value(facet))
        .find(|value| value.to_lowercase() == wanted)
        .unwrap_or(input)
        .to_string()
}

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::model::{Catalog, DatasetRecord, parse_timestamp};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and validate a catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `[{ "id": "...", "title": "...", ... }, ...]` (camelCase fields)
/// * `.csv`  – one record per row, `tags` as a semicolon-separated cell
pub fn load_file(path: &Path) -> Result<Catalog> {
    let records = match extension(path).as_str() {
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_json(&text)?
        }
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file)?
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    let catalog = Catalog::from_records(records)
        .with_context(|| format!("validating {}", path.display()))?;
    log::info!("Loaded {} datasets from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Write records to a file, format chosen by extension like [`load_file`].
pub fn save_file(path: &Path, records: &[DatasetRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    match extension(path).as_str() {
        "json" => write_json(file, records)?,
        "csv" => write_csv(file, records)?,
        other => bail!("Unsupported file extension: .{other}"),
    }
    log::info!("Wrote {} datasets to {}", records.len(), path.display());
    Ok(())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (the listing shape used by the marketplace pages):
///
/// ```json
/// [
///   {
///     "id": "1",
///     "title": "Cosmic Horizon",
///     "price": 2.5,
///     "tags": ["astronomy"],
///     "createdAt": "2025-03-15T09:00:00Z",
///     "dataType": "image",
///     ...
///   }
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<Vec<DatasetRecord>> {
    serde_json::from_str(text).context("parsing catalog JSON")
}

pub fn write_json<W: Write>(writer: W, records: &[DatasetRecord]) -> Result<()> {
    serde_json::to_writer_pretty(writer, records).context("writing catalog JSON")
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// One flat CSV row. Header names match the JSON field names.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    organization: String,
    #[serde(default)]
    organization_type: String,
    price: f64,
    /// `"privacy;health;tabular"`
    #[serde(default)]
    tags: String,
    created_at: String,
    #[serde(default)]
    image: Option<String>,
    data_type: String,
    access_type: String,
    #[serde(default)]
    access_count: u64,
    #[serde(default)]
    size: String,
    quality_score: u8,
    privacy_technique: String,
    domain: String,
    #[serde(default)]
    update_frequency: Option<String>,
    #[serde(default)]
    sample_available: bool,
}

impl CsvRow {
    fn into_record(self) -> Result<DatasetRecord> {
        let created_at = parse_timestamp(&self.created_at)?;
        let tags = self
            .tags
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Ok(DatasetRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            organization: self.organization,
            organization_type: self.organization_type,
            price: self.price,
            tags,
            created_at,
            image: self.image.filter(|s| !s.is_empty()),
            data_type: self.data_type.into(),
            access_type: self.access_type.into(),
            access_count: self.access_count,
            size: self.size,
            quality_score: self.quality_score,
            privacy_technique: self.privacy_technique.into(),
            domain: self.domain,
            update_frequency: self.update_frequency.filter(|s| !s.is_empty()),
            sample_available: self.sample_available,
        })
    }

    fn from_record(rec: &DatasetRecord) -> Self {
        CsvRow {
            id: rec.id.clone(),
            title: rec.title.clone(),
            description: rec.description.clone(),
            organization: rec.organization.clone(),
            organization_type: rec.organization_type.clone(),
            price: rec.price,
            tags: rec.tags.join(";"),
            created_at: rec
                .created_at
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            image: rec.image.clone(),
            data_type: rec.data_type.to_string(),
            access_type: rec.access_type.to_string(),
            access_count: rec.access_count,
            size: rec.size.clone(),
            quality_score: rec.quality_score,
            privacy_technique: rec.privacy_technique.to_string(),
            domain: rec.domain.clone(),
            update_frequency: rec.update_frequency.clone(),
            sample_available: rec.sample_available,
        }
    }
}

/// CSV layout: header row with the JSON field names; `tags` holds
/// semicolon-separated values. Missing optional columns take their defaults.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<DatasetRecord>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let record = row
            .into_record()
            .with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    Ok(records)
}

pub fn write_csv<W: Write>(writer: W, records: &[DatasetRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for rec in records {
        writer
            .serialize(CsvRow::from_record(rec))
            .with_context(|| format!("writing CSV row for {}", rec.id))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

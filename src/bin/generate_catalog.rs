use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::Parser;

use dataset_market::data::loader::save_file;
use dataset_market::{AccessType, Catalog, DataType, DatasetRecord, PrivacyTechnique};

#[derive(Parser, Debug)]
#[command(name = "generate_catalog")]
#[command(about = "Write a synthetic dataset catalog (.json or .csv)", long_about = None)]
struct Args {
    /// Number of listings to generate
    #[arg(long, default_value_t = 20)]
    count: usize,

    /// Output file; the format follows the extension
    #[arg(long, default_value = "catalog.json")]
    output: PathBuf,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}

const SUBJECTS: [&str; 8] = [
    "Patient Outcomes",
    "Credit Risk",
    "Gene Expression",
    "Urban Mobility",
    "Consumer Sentiment",
    "Air Quality",
    "Student Performance",
    "Speech Commands",
];
const QUALIFIERS: [&str; 5] = ["Benchmark", "Archive", "Corpus", "Panel", "Registry"];
const DOMAINS: [&str; 8] = [
    "healthcare",
    "finance",
    "biology",
    "linguistics",
    "urban planning",
    "marketing",
    "environmental science",
    "education",
];
const ORG_TYPES: [&str; 6] = [
    "healthcare",
    "research",
    "government",
    "education",
    "commercial",
    "nonprofit",
];
const TAGS: [&str; 10] = [
    "privacy",
    "labelled",
    "longitudinal",
    "multilingual",
    "benchmark",
    "synthetic",
    "clinical",
    "geospatial",
    "audio",
    "nlp",
];
const FREQUENCIES: [&str; 4] = ["daily", "weekly", "monthly", "quarterly"];

fn generate_record(i: usize, epoch: DateTime<Utc>, rng: &mut SimpleRng) -> DatasetRecord {
    let data_types = [
        DataType::Tabular,
        DataType::Image,
        DataType::Text,
        DataType::Timeseries,
        DataType::Audio,
        DataType::Mixed,
    ];
    let techniques = [
        PrivacyTechnique::Anonymization,
        PrivacyTechnique::DifferentialPrivacy,
        PrivacyTechnique::FederatedLearning,
        PrivacyTechnique::Encryption,
        PrivacyTechnique::None,
    ];
    let access_types = [AccessType::Open, AccessType::Restricted, AccessType::Commercial];

    let subject = *rng.pick(&SUBJECTS);
    let qualifier = *rng.pick(&QUALIFIERS);
    let domain = *rng.pick(&DOMAINS);
    let org_type = *rng.pick(&ORG_TYPES);

    let mut tags: Vec<String> = Vec::new();
    for _ in 0..rng.below(4) {
        let tag = rng.pick(&TAGS).to_string();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    let created_at = epoch + Duration::hours(rng.below(24 * 540) as i64);
    // Whole hundreds, like the marketplace price slider.
    let price = (rng.below(50) * 100) as f64;

    DatasetRecord {
        id: format!("ds-{:04}", i + 1),
        title: format!("{subject} {qualifier}"),
        description: format!("{subject} records curated for {domain} research"),
        organization: format!("{} Data Trust", capitalise(domain)),
        organization_type: org_type.to_string(),
        price,
        tags,
        created_at,
        image: None,
        data_type: rng.pick(&data_types).clone(),
        access_type: rng.pick(&access_types).clone(),
        access_count: rng.below(5000),
        size: format!("{:.1} GB", (rng.below(500) + 1) as f64 / 10.0),
        quality_score: (40 + rng.below(61)) as u8,
        privacy_technique: rng.pick(&techniques).clone(),
        domain: domain.to_string(),
        update_frequency: Some(rng.pick(&FREQUENCIES).to_string()),
        sample_available: rng.below(2) == 1,
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.count == 0 {
        bail!("--count must be at least 1");
    }

    let epoch = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .context("building generator epoch")?;
    let mut rng = SimpleRng::new(args.seed);
    let records: Vec<DatasetRecord> = (0..args.count)
        .map(|i| generate_record(i, epoch, &mut rng))
        .collect();

    // Same validation the loader applies.
    let catalog = Catalog::from_records(records)?;
    save_file(&args.output, catalog.records())?;

    println!(
        "Wrote {} datasets to {}",
        catalog.len(),
        args.output.display()
    );
    Ok(())
}

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;

use dataset_market::data::{loader, seed};
use dataset_market::present::{QualityTier, format_date, results_summary};
use dataset_market::{
    Catalog, DatasetRecord, Facet, MarketplaceState, PriceRange, QuerySpec, SortKey,
    resolve_facet_value,
};

#[derive(Parser, Debug)]
#[command(name = "dataset-market")]
#[command(about = "Search, filter and sort a dataset marketplace catalog", long_about = None)]
struct Args {
    /// Catalog file (.json or .csv); the built-in catalog when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Case-insensitive text matched against title, description and tags
    #[arg(short, long, default_value = "")]
    search: String,

    /// Data type to include (repeatable)
    #[arg(long = "data-type")]
    data_types: Vec<String>,

    /// Domain to include (repeatable)
    #[arg(long = "domain")]
    domains: Vec<String>,

    /// Privacy technique to include (repeatable)
    #[arg(long = "privacy")]
    privacy_techniques: Vec<String>,

    /// Access type to include (repeatable)
    #[arg(long = "access")]
    access_types: Vec<String>,

    /// Organization type to include (repeatable)
    #[arg(long = "org-type")]
    organization_types: Vec<String>,

    /// Lowest price (inclusive); defaults to the cheapest listing
    #[arg(long)]
    min_price: Option<f64>,

    /// Highest price (inclusive); defaults to the most expensive listing
    #[arg(long)]
    max_price: Option<f64>,

    /// Minimum quality score; 0 disables the filter
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min_quality: i32,

    /// newest, price-low, price-high or quality
    #[arg(long, default_value = "newest")]
    sort: SortKey,

    /// List the values of every facet with their counts, then exit
    #[arg(long)]
    facets: bool,

    /// Print the featured dataset, then exit
    #[arg(long)]
    featured: bool,

    /// Show one dataset in full by id, then exit
    #[arg(long)]
    id: Option<String>,

    /// Emit matching records as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn facet_filters(&self) -> [(Facet, &[String]); 5] {
        [
            (Facet::DataType, self.data_types.as_slice()),
            (Facet::Domain, self.domains.as_slice()),
            (Facet::PrivacyTechnique, self.privacy_techniques.as_slice()),
            (Facet::AccessType, self.access_types.as_slice()),
            (Facet::OrganizationType, self.organization_types.as_slice()),
        ]
    }

    fn query_spec(&self, catalog: &Catalog) -> QuerySpec {
        let default_range = PriceRange::covering(catalog);
        let mut spec = QuerySpec {
            price_range: PriceRange::new(
                self.min_price.unwrap_or(default_range.min),
                self.max_price.unwrap_or(default_range.max),
            ),
            ..QuerySpec::default()
        }
        .with_search(self.search.as_str())
        .with_min_quality(self.min_quality)
        .sorted_by(self.sort);

        // "Finance" or "IMAGE" select whatever spelling the catalog uses.
        for (facet, values) in self.facet_filters() {
            let resolved = values
                .iter()
                .map(|v| resolve_facet_value(catalog.records(), facet, v));
            spec = spec.with_facet(facet, resolved);
        }
        spec
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => loader::load_file(path)?,
        None => seed::catalog()?,
    };

    let spec = args.query_spec(&catalog);
    log::debug!("Running {spec:?}");
    let state = MarketplaceState::with_spec(catalog, spec);

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();

    if args.facets {
        for facet in Facet::ALL {
            writeln!(out, "{}", facet.label())?;
            for (value, count) in state.facet_listing(facet) {
                let mark = if state.spec().is_selected(facet, &value) { 'x' } else { ' ' };
                writeln!(out, "  [{mark}] {value} ({count})")?;
            }
        }
        return Ok(());
    }

    if let Some(id) = &args.id {
        match state.catalog().get(id) {
            Some(rec) => print_detail(&mut out, rec, color)?,
            None => bail!("No dataset with id '{id}'"),
        }
        return Ok(());
    }

    if args.featured {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        match state.featured(nonce) {
            Some(rec) => print_record(&mut out, rec, color)?,
            None => writeln!(out, "Catalog is empty.")?,
        }
        return Ok(());
    }

    let visible = state.visible();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &visible).context("writing JSON output")?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{}  (sorted by {})",
        results_summary(visible.len()),
        state.spec().sort_key.label()
    )?;
    if visible.is_empty() {
        writeln!(
            out,
            "No datasets match your search criteria. Try adjusting your filters or search query."
        )?;
    }
    for rec in visible {
        print_record(&mut out, rec, color)?;
    }
    Ok(())
}

fn print_record<W: Write>(out: &mut W, rec: &DatasetRecord, color: bool) -> io::Result<()> {
    let tier = QualityTier::of(rec.quality_score);
    let quality = format!("{:>3}% Quality", rec.quality_score);
    let quality = if color {
        format!("{}{quality}\x1b[0m", tier.ansi_color())
    } else {
        quality
    };
    writeln!(
        out,
        "{:>10.2}  {:<28} {:<11} {:<22} {}  {}",
        rec.price,
        rec.title,
        rec.data_type,
        rec.domain,
        quality,
        format_date(&rec.created_at),
    )
}

fn print_detail<W: Write>(out: &mut W, rec: &DatasetRecord, color: bool) -> io::Result<()> {
    print_record(out, rec, color)?;
    writeln!(out, "  {}", rec.description)?;
    writeln!(out, "  Provider:  {} ({})", rec.organization, rec.organization_type)?;
    writeln!(out, "  Access:    {}, {} downloads", rec.access_type, rec.access_count)?;
    writeln!(out, "  Privacy:   {}", rec.privacy_technique)?;
    writeln!(out, "  Size:      {}", rec.size)?;
    if let Some(freq) = &rec.update_frequency {
        writeln!(out, "  Updated:   {freq}")?;
    }
    if !rec.tags.is_empty() {
        writeln!(out, "  Tags:      {}", rec.tags.join(", "))?;
    }
    writeln!(
        out,
        "  Sample:    {}",
        if rec.sample_available { "available" } else { "not available" }
    )
}

use anyhow::{Context, Result};
use backlinkdiff::{analyze_backlinks, schema::FormatStore};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Find backlink domains present in a candidate export but missing from a
/// reference export.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Reference export ("Magis" layout)
    #[arg(long, default_value = "Magis_Tv.csv")]
    reference: PathBuf,

    /// Candidate export ("Methylated" layout)
    #[arg(long, default_value = "Methylated_B12.csv")]
    candidate: PathBuf,

    /// Where to write the BACKLINKS,DA rows unique to the candidate
    #[arg(long, default_value = "backlinks_to_use_for_magis.csv")]
    output: PathBuf,

    /// Optional YAML file overriding the `reference`/`candidate` layouts
    #[arg(long)]
    formats: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    let args = Args::parse();
    info!(reference = %args.reference.display(), candidate = %args.candidate.display(), output = %args.output.display(), "configuration");

    let formats = match &args.formats {
        Some(path) => FormatStore::load(path)
            .inspect_err(|e| error!("{}", e))
            .with_context(|| format!("loading formats from {}", path.display()))?,
        None => FormatStore::default(),
    };

    let report = analyze_backlinks(&args.reference, &args.candidate, &args.output, &formats)
        .inspect_err(|e| error!("{}", e))
        .context("backlink analysis failed")?;

    info!(
        reference_rows = report.reference_rows,
        candidate_rows = report.candidate_rows,
        unique_rows = report.unique_rows,
        "done; unique backlinks in {}",
        report.output.display()
    );
    Ok(())
}

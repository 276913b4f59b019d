use std::{error::Error as StdError, path::PathBuf};

use clap::Parser as _;
use tube_elo_pipeline::config::Params;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
#[clap(about = "Rate tube test contests and summarize head-to-head history")]
struct Opt {
    /// TOML parameter file.
    #[clap(long, short)]
    params: PathBuf,
    /// Write results here instead of the configured output directory.
    #[clap(long)]
    output_dir: Option<PathBuf>,
    /// Only process these sheets.
    #[clap(long = "sheet", value_delimiter = ',', num_args = 1..)]
    sheets: Vec<String>,
    #[clap(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn StdError>> {
    let opt = Opt::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&opt.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let params = Params::load(&opt.params)?;
    let output_dir = opt
        .output_dir
        .unwrap_or_else(|| params.output.directory());

    let report = tube_elo_pipeline::run(&params, &opt.sheets, &output_dir)?;

    println!("# Groups: {}", report.groups);
    println!("# Distinct individuals: {}", report.individuals);
    println!("# Processed contests: {}", report.contests);
    if let Some((earliest, latest)) = &report.session_range {
        println!("# Sessions: {} to {}", earliest.day(), latest.day());
    }
    for warning in &report.warnings {
        println!("# Warning: {}", warning);
    }
    println!("# ---");
    for file in &report.files {
        println!("{}", file.display());
    }

    Ok(())
}

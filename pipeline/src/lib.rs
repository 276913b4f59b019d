//! Data preparation and export around the `tube_elo` rating core: reads the
//! contest tables named in a parameter file, rates them, and writes the
//! result tables.

pub mod config;
pub mod export;
pub mod session;
pub mod sheet;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::info;
use tube_elo::{final_standings, pairwise_summaries, MultiGroupRunner, Warning};

use crate::{
    config::{ConfigError, Params},
    export::ExportError,
    session::SessionKey,
    sheet::{IdentityExtractor, SheetError},
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What a run did, for the closing report.
#[derive(Debug)]
pub struct RunReport {
    pub groups: usize,
    pub individuals: usize,
    pub contests: usize,
    pub session_range: Option<(SessionKey, SessionKey)>,
    pub warnings: Vec<Warning>,
    pub files: Vec<PathBuf>,
}

/// Processes the selected sheets (all if `selection` is empty) and writes the
/// result tables to `output_dir`.
pub fn run(
    params: &Params,
    selection: &[String],
    output_dir: &Path,
) -> Result<RunReport, PipelineError> {
    let extractor = IdentityExtractor::new();
    let streams = params
        .select_sheets(selection)?
        .into_iter()
        .map(|config| sheet::load_sheet(config, &params.session_divider_column, &extractor))
        .collect::<Result<Vec<_>, _>>()?;

    let rating_system = params.rating.rating_system();
    let affiliations = params.affiliations();
    let table = MultiGroupRunner::new(&rating_system, &affiliations).run(&streams);

    let standings = final_standings(&table.records);
    let pairwise = pairwise_summaries(&table.records);

    info!(
        groups = table.groups.len(),
        rows = table.records.len(),
        individuals = standings.len(),
        pairs = pairwise.len(),
        "rated all groups"
    );

    export::create_dir(output_dir)?;
    let output = &params.output;
    let mut files = vec![
        output_dir.join(format!("{}.csv", output.all_sheet_scores_name)),
        output_dir.join(format!("{}.csv", output.final_elo_score_name)),
        output_dir.join(format!("{}.csv", output.aggregate_all_pairwise_name)),
    ];
    export::write_contests(&files[0], &table.records, affiliations.has_strains())?;
    export::write_standings(&files[1], &standings)?;
    export::write_pairwise(&files[2], &pairwise)?;
    if output.write_trajectories {
        files.extend(export::write_trajectories(output_dir, &table)?);
    }

    let individuals = table
        .records
        .iter()
        .flat_map(|record| [&record.subject, &record.agent])
        .collect::<FxHashSet<_>>()
        .len();

    Ok(RunReport {
        groups: table.groups.len(),
        individuals,
        contests: table.records.len() / 2,
        session_range: table.session_range,
        warnings: table.warnings,
        files,
    })
}

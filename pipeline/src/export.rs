//! CSV tables written at the end of a run.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};
use thiserror::Error;
use tube_elo::{CombinedTable, GroupId, PairwiseSummary, RatedContest, Standing, SubjectId};

use crate::{session::SessionKey, sheet::Row};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },
}

const CONTEST_COLUMNS: [&str; 14] = [
    "subject_id",
    "agent_id",
    "winner",
    "loser",
    "win_draw_loss",
    "pre_elo_rating",
    "updated_elo_rating",
    "total_match_number",
    "cage",
    "subject_cage",
    "agent_cage",
    "session",
    "session_number_difference",
    "ties",
];

const STRAIN_COLUMNS: [&str; 2] = ["subject_strain", "agent_strain"];

#[serde_as]
#[derive(Serialize)]
struct StandingRow {
    #[serde_as(as = "DisplayFromStr")]
    subject_id: SubjectId,
    #[serde_as(as = "DisplayFromStr")]
    subject_cage: GroupId,
    updated_elo_rating: f64,
    rank: u32,
}

#[serde_as]
#[derive(Serialize)]
struct PairwiseRow {
    #[serde_as(as = "DisplayFromStr")]
    subject_id: SubjectId,
    #[serde_as(as = "DisplayFromStr")]
    agent_id: SubjectId,
    loser_count: u32,
    #[serde_as(as = "DisplayFromStr")]
    loser: SubjectId,
    winner_count: u32,
    #[serde_as(as = "DisplayFromStr")]
    winner: SubjectId,
    total_count: u32,
    draw: bool,
}

#[serde_as]
#[derive(Serialize)]
struct TrajectoryRow {
    #[serde_as(as = "DisplayFromStr")]
    subject_id: SubjectId,
    total_match_number: u32,
    updated_elo_rating: f64,
    session_start: bool,
}

fn create(path: &Path) -> Result<csv::Writer<File>, ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_owned(),
        source,
    })?;
    Ok(csv::Writer::from_writer(file))
}

/// Writes all rows with `write`, then flushes.
fn write_csv<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut csv::Writer<File>) -> Result<(), csv::Error>,
{
    let mut writer = create(path)?;
    write(&mut writer)
        .and_then(|()| writer.flush().map_err(csv::Error::from))
        .map_err(|source| ExportError::Write {
            path: path.to_owned(),
            source,
        })
}

pub fn create_dir(dir: &Path) -> Result<(), ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Create {
        path: dir.to_owned(),
        source,
    })
}

/// Passthrough columns of all rows, in order of first appearance, leaving out
/// those already written as rating columns.
fn extra_columns(records: &[RatedContest<SessionKey, Row>]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    let mut last_header: Option<&[String]> = None;
    for record in records {
        let header = record.extra.header();
        if last_header.is_some_and(|last| std::ptr::eq(last, header)) {
            continue;
        }
        last_header = Some(header);
        for name in header {
            let taken = |column: &&str| column.eq_ignore_ascii_case(name);
            if !name.is_empty()
                && !CONTEST_COLUMNS.iter().any(taken)
                && !STRAIN_COLUMNS.iter().any(taken)
                && !columns.iter().any(taken)
            {
                columns.push(name);
            }
        }
    }
    columns
}

/// Every rated contest of every group, with the original row cells appended.
pub fn write_contests(
    path: &Path,
    records: &[RatedContest<SessionKey, Row>],
    with_strains: bool,
) -> Result<(), ExportError> {
    let extra = extra_columns(records);

    write_csv(path, |writer| {
        let mut header: Vec<&str> = CONTEST_COLUMNS.to_vec();
        if with_strains {
            header.extend(STRAIN_COLUMNS);
        }
        header.extend(&extra);
        writer.write_record(&header)?;

        for record in records {
            let mut row = vec![
                record.subject.to_string(),
                record.agent.to_string(),
                record.winner.to_string(),
                record.loser.to_string(),
                record.outcome.to_string(),
                f64::from(record.pre_rating).to_string(),
                f64::from(record.updated_rating).to_string(),
                record.total_match_number.to_string(),
                record.group.to_string(),
                record.subject_group.to_string(),
                record.agent_group.to_string(),
                record.session.to_string(),
                record.session_number_difference.to_string(),
                record.extra.get("ties").unwrap_or("false").to_owned(),
            ];
            if with_strains {
                row.push(record.subject_strain.clone().unwrap_or_default());
                row.push(record.agent_strain.clone().unwrap_or_default());
            }
            for column in &extra {
                row.push(record.extra.get(column).unwrap_or_default().to_owned());
            }
            writer.write_record(&row)?;
        }
        Ok(())
    })
}

pub fn write_standings(path: &Path, standings: &[Standing]) -> Result<(), ExportError> {
    write_csv(path, |writer| {
        for standing in standings {
            writer.serialize(StandingRow {
                subject_id: standing.subject.clone(),
                subject_cage: standing.subject_group.clone(),
                updated_elo_rating: f64::from(standing.rating),
                rank: standing.rank,
            })?;
        }
        Ok(())
    })
}

pub fn write_pairwise(path: &Path, summaries: &[PairwiseSummary]) -> Result<(), ExportError> {
    write_csv(path, |writer| {
        for summary in summaries {
            writer.serialize(PairwiseRow {
                subject_id: summary.subject.clone(),
                agent_id: summary.agent.clone(),
                loser_count: summary.loser_count,
                loser: summary.loser.clone(),
                winner_count: summary.winner_count,
                winner: summary.winner.clone(),
                total_count: summary.total_count,
                draw: summary.draw,
            })?;
        }
        Ok(())
    })
}

/// Rating trajectory of each group, one file per group, rows grouped by
/// subject in match order. Returns the written paths.
pub fn write_trajectories(
    dir: &Path,
    table: &CombinedTable<SessionKey, Row>,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut paths = Vec::with_capacity(table.groups.len());

    for summary in &table.groups {
        let mut records: Vec<_> = table.group_records(summary).iter().collect();
        records.sort_by(|a, b| a.subject.cmp(&b.subject));

        let path = dir.join(format!("elo_trajectory_{}.csv", summary.group));
        write_csv(&path, |writer| {
            for record in records {
                writer.serialize(TrajectoryRow {
                    subject_id: record.subject.clone(),
                    total_match_number: record.total_match_number,
                    updated_elo_rating: f64::from(record.updated_rating),
                    session_start: record.starts_session(),
                })?;
            }
            Ok(())
        })?;
        paths.push(path);
    }

    Ok(paths)
}

//! Loading contest tables and turning them into clean contest streams.

use std::{fs::File, io, path::PathBuf, sync::Arc};

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};
use tube_elo::{ContestRecord, GroupStream, Ties};

use crate::{config::SheetConfig, session::SessionKey};

const WINNER_COLUMN: &str = "winner";
const LOSER_COLUMN: &str = "loser";
const RUNNER_COLUMN: &str = "runner";
const TIES_COLUMN: &str = "ties";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open sheet {sheet} at {path}: {source}")]
    Open {
        sheet: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to read sheet {sheet}: {source}")]
    Csv { sheet: String, source: csv::Error },

    #[error("sheet {sheet} has no header line")]
    MissingHeader { sheet: String },

    #[error("sheet {sheet} has no {column:?} column")]
    MissingColumn { sheet: String, column: &'static str },
}

/// The original cells of a contest row, carried through to the output.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    header: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .iter()
            .position(|name| name == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }
}

pub type Stream = GroupStream<SessionKey, Row>;

/// Extracts the identity token from a free text cell, such as `"3.1"` from
/// `"mouse 3.1 (tail mark)"`.
pub struct IdentityExtractor {
    number: Regex,
}

impl Default for IdentityExtractor {
    fn default() -> IdentityExtractor {
        IdentityExtractor::new()
    }
}

impl IdentityExtractor {
    pub fn new() -> IdentityExtractor {
        IdentityExtractor {
            number: Regex::new(r"[-+]?(?:\d*\.\d+|\d+)").expect("valid identity pattern"),
        }
    }

    /// The first number in the cell, or the trimmed cell if it has none.
    pub fn extract<'a>(&self, cell: &'a str) -> &'a str {
        match self.number.find(cell) {
            Some(m) => m.as_str(),
            None => cell.trim(),
        }
    }
}

fn is_truthy(cell: &str) -> bool {
    !matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "0.0" | "false" | "no" | "n"
    )
}

/// Finds `name` regardless of case and renames the column to `name`, so
/// that later lookups by name see one spelling.
fn canonical_column(header: &mut [String], name: &str) -> Option<usize> {
    let i = header
        .iter()
        .position(|column| column.eq_ignore_ascii_case(name))?;
    header[i] = name.to_owned();
    Some(i)
}

pub fn load_sheet(
    sheet: &SheetConfig,
    session_column: &str,
    extractor: &IdentityExtractor,
) -> Result<Stream, SheetError> {
    let file = File::open(&sheet.path).map_err(|source| SheetError::Open {
        sheet: sheet.name.clone(),
        path: sheet.path.clone(),
        source,
    })?;
    read_sheet(file, &sheet.name, sheet.header_row, session_column, extractor)
}

/// Reads one contest table, in the order of its rows.
///
/// Rows without a winner or a loser are dropped. Empty session and runner
/// cells repeat the value of the row above. A table without a `ties` column
/// yields a stream in which ties are not recorded.
pub fn read_sheet<R: io::Read>(
    reader: R,
    group: &str,
    header_row: usize,
    session_column: &str,
    extractor: &IdentityExtractor,
) -> Result<Stream, SheetError> {
    let csv_error = |source| SheetError::Csv {
        sheet: group.to_owned(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records().skip(header_row);

    let mut header: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(csv_error)?
            .iter()
            .map(|name| name.trim().to_owned())
            .collect(),
        None => {
            return Err(SheetError::MissingHeader {
                sheet: group.to_owned(),
            })
        }
    };

    let required = |header: &mut [String], name: &'static str| {
        canonical_column(header, name).ok_or_else(|| SheetError::MissingColumn {
            sheet: group.to_owned(),
            column: name,
        })
    };
    let winner_column = required(&mut header, WINNER_COLUMN)?;
    let loser_column = required(&mut header, LOSER_COLUMN)?;

    let session_column = canonical_column(&mut header, session_column);
    if session_column.is_none() {
        warn!(sheet = group, "no session divider column, treating the sheet as one session");
    }
    let runner_column = canonical_column(&mut header, RUNNER_COLUMN);
    if runner_column.is_none() {
        warn!(sheet = group, "no 'runner' column");
    }
    let ties_column = canonical_column(&mut header, TIES_COLUMN);

    let header: Arc<[String]> = header.into();

    let mut stream = GroupStream::new(
        group,
        if ties_column.is_some() {
            Ties::Recorded
        } else {
            Ties::NotRecorded
        },
    );

    let mut session = String::new();
    let mut runner = String::new();
    let mut dropped = 0;

    for record in records {
        let record = record.map_err(csv_error)?;
        let cell = |i: usize| record.get(i).map(str::trim).unwrap_or_default();

        let (winner, loser) = (cell(winner_column), cell(loser_column));
        if winner.is_empty() || loser.is_empty() {
            dropped += 1;
            continue;
        }

        let mut values: Vec<String> = (0..header.len()).map(|i| cell(i).to_owned()).collect();
        values[winner_column] = extractor.extract(winner).to_owned();
        values[loser_column] = extractor.extract(loser).to_owned();

        for (column, last) in [(session_column, &mut session), (runner_column, &mut runner)] {
            if let Some(i) = column {
                if values[i].is_empty() {
                    values[i].clone_from(last);
                } else {
                    last.clone_from(&values[i]);
                }
            }
        }

        let is_tie = match ties_column {
            Some(i) => {
                let tie = is_truthy(&values[i]);
                values[i] = tie.to_string();
                tie
            }
            None => false,
        };

        let contest = ContestRecord {
            winner: values[winner_column].as_str().into(),
            loser: values[loser_column].as_str().into(),
            is_tie,
            session: session_column
                .map(|i| values[i].parse().unwrap_or_default())
                .unwrap_or_default(),
            group: stream.group.clone(),
            extra: Row {
                header: Arc::clone(&header),
                values,
            },
        };
        stream.contests.push(contest);
    }

    debug!(
        sheet = group,
        contests = stream.contests.len(),
        dropped,
        "loaded sheet"
    );

    Ok(stream)
}

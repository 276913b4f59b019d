use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tube_elo::{GroupId, Warning};
use tube_elo_pipeline::{config::Params, run};

const CAGE1: &str = "\
date,runner,winner,loser,ties
2023-05-01,AB,1.1,1.2,
,,1.2,1.1,
2023-05-02,,1.1,1.2,1
";

const CAGE2: &str = "\
Cage 2 tube test
date,winner,loser,notes
2023-05-03,ID 2.1,ID 2.2,first
2023-05-03,2.1,2.2,
";

const PARAMS: &str = r#"
[[sheets]]
name = "cage1"
path = "cage1.csv"

[[sheets]]
name = "cage2"
path = "cage2.csv"
header_row = 1

[id_to_cage]
"1.2" = "cage2"

[cage_to_strain]
cage1 = "B6"

[rating]
k_factor = 32.0

[output]
subfolder_name = "run"
all_sheet_scores_name = "scores"
final_elo_score_name = "final"
aggregate_all_pairwise_name = "pairwise"
"#;

fn setup() -> (TempDir, Params) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cage1.csv"), CAGE1).unwrap();
    fs::write(dir.path().join("cage2.csv"), CAGE2).unwrap();
    fs::write(dir.path().join("params.toml"), PARAMS).unwrap();
    let params = Params::load(&dir.path().join("params.toml")).unwrap();
    (dir, params)
}

struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn read(path: &Path) -> Table {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let header = reader.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = reader
            .records()
            .map(|record| record.unwrap().iter().map(str::to_owned).collect())
            .collect();
        Table { header, rows }
    }

    fn column(&self, name: &str) -> Vec<&str> {
        let i = self
            .header
            .iter()
            .position(|column| column == name)
            .unwrap_or_else(|| panic!("no column {name}"));
        self.rows.iter().map(|row| row[i].as_str()).collect()
    }
}

#[test]
fn test_full_run() {
    let (dir, params) = setup();
    let output_dir = params.output.directory();
    assert_eq!(output_dir, dir.path().join("output").join("run"));

    let report = run(&params, &[], &output_dir).unwrap();
    assert_eq!(report.groups, 2);
    assert_eq!(report.contests, 5);
    assert_eq!(report.individuals, 4);
    assert_eq!(
        report
            .session_range
            .as_ref()
            .map(|(earliest, latest)| (earliest.day(), latest.day())),
        Some(("2023-05-01".to_owned(), "2023-05-03".to_owned()))
    );
    assert_eq!(
        report.warnings,
        vec![Warning::TiesNotRecorded {
            group: GroupId::from("cage2")
        }]
    );
    assert_eq!(report.files.len(), 5);
    assert!(output_dir.join("elo_trajectory_cage1.csv").exists());
    assert!(output_dir.join("elo_trajectory_cage2.csv").exists());

    let scores = Table::read(&output_dir.join("scores.csv"));
    assert_eq!(scores.rows.len(), 10);
    assert_eq!(
        scores.column("subject_id"),
        ["1.1", "1.2", "1.2", "1.1", "1.1", "1.2", "2.1", "2.2", "2.1", "2.2"]
    );
    assert_eq!(
        scores.column("win_draw_loss"),
        ["win", "loss", "win", "loss", "tie", "tie", "win", "loss", "win", "loss"]
    );
    assert_eq!(
        scores.column("session_number_difference"),
        ["1", "1", "0", "0", "1", "1", "1", "1", "0", "0"]
    );
    assert_eq!(
        scores.column("total_match_number"),
        ["1", "1", "2", "2", "3", "3", "1", "1", "2", "2"]
    );
    assert_eq!(
        scores.column("subject_cage"),
        ["cage1", "cage2", "cage2", "cage1", "cage1", "cage2", "cage2", "cage2", "cage2", "cage2"]
    );
    assert_eq!(scores.column("cage")[5], "cage1");
    assert_eq!(scores.column("subject_strain")[..2], ["B6", ""]);
    assert_eq!(scores.column("runner")[..6], ["AB"; 6]);
    assert_eq!(scores.column("notes")[6..], ["first", "first", "", ""]);
    assert_eq!(scores.column("updated_elo_rating")[..2], ["1016", "984"]);

    let final_scores = Table::read(&output_dir.join("final.csv"));
    assert_eq!(
        final_scores.header,
        ["subject_id", "subject_cage", "updated_elo_rating", "rank"]
    );
    let standings: Vec<(&str, &str, &str)> = final_scores
        .column("subject_id")
        .into_iter()
        .zip(final_scores.column("subject_cage"))
        .zip(final_scores.column("rank"))
        .map(|((subject, cage), rank)| (subject, cage, rank))
        .collect();
    assert_eq!(
        standings,
        [
            ("1.1", "cage1", "1"),
            ("1.2", "cage2", "2"),
            ("2.1", "cage2", "1"),
            ("2.2", "cage2", "3"),
        ]
    );

    let pairwise = Table::read(&output_dir.join("pairwise.csv"));
    assert_eq!(
        pairwise.header,
        [
            "subject_id",
            "agent_id",
            "loser_count",
            "loser",
            "winner_count",
            "winner",
            "total_count",
            "draw"
        ]
    );
    assert_eq!(
        pairwise.rows,
        [
            ["1.1", "1.2", "2", "1.1", "1", "1.2", "3", "false"],
            ["2.1", "2.2", "0", "2.2", "2", "2.1", "2", "false"],
        ]
    );
}

#[test]
fn test_selected_sheet() {
    let (dir, params) = setup();
    let output_dir = dir.path().join("only_cage1");

    let report = run(&params, &["cage1".to_owned()], &output_dir).unwrap();
    assert_eq!(report.groups, 1);
    assert_eq!(report.contests, 3);
    assert!(report.warnings.is_empty());

    let trajectory = Table::read(&output_dir.join("elo_trajectory_cage1.csv"));
    assert_eq!(
        trajectory.column("subject_id"),
        ["1.1", "1.1", "1.1", "1.2", "1.2", "1.2"]
    );
    assert_eq!(trajectory.column("total_match_number"), ["1", "2", "3", "1", "2", "3"]);
    assert_eq!(
        trajectory.column("session_start"),
        ["true", "false", "true", "true", "false", "true"]
    );
}

#[test]
fn test_capitalized_header() {
    let (dir, params) = setup();
    fs::write(
        dir.path().join("cage1.csv"),
        "Date,Winner,Loser,Ties,Notes\n2023-05-01,1.1,1.2,1,close\n2023-05-01,1.2,1.1,,\n",
    )
    .unwrap();
    let output_dir = dir.path().join("capitalized");

    let report = run(&params, &["cage1".to_owned()], &output_dir).unwrap();
    assert!(report.warnings.is_empty());

    let scores = Table::read(&output_dir.join("scores.csv"));
    for name in ["winner", "loser", "ties"] {
        let count = scores
            .header
            .iter()
            .filter(|column| column.eq_ignore_ascii_case(name))
            .count();
        assert_eq!(count, 1, "{name} written {count} times");
    }
    assert_eq!(scores.column("ties"), ["true", "true", "false", "false"]);
    assert_eq!(scores.column("win_draw_loss"), ["tie", "tie", "win", "loss"]);
    assert_eq!(scores.column("Notes")[..2], ["close", "close"]);
}

#[test]
fn test_missing_sheet_file() {
    let (dir, mut params) = setup();
    params.sheets[1].path = dir.path().join("missing.csv");
    assert!(run(&params, &[], &dir.path().join("out")).is_err());
}

//! Integration tests over a small recorded session
//!
//! The fixture workbook holds three games played in January/February 2024.
//! The first two recorded civilization boards (with the usual misspellings),
//! the third left the Civilization row blank.

use std::path::PathBuf;
use wonders_stats::pipeline::{self, CompareConfig, ExportConfig};
use wonders_stats::{
    CsvWorkbook, GameCollection, MemoryWorkbook, ScoreCategory, SheetSource, WondersError,
};

fn session_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/input/session")
}

fn load_session() -> GameCollection {
    pipeline::load_collection(&session_dir()).expect("Failed to load fixture session")
}

#[test]
fn test_sheets_enumerated_in_file_order() {
    let workbook = CsvWorkbook::open(session_dir()).unwrap();
    assert_eq!(
        workbook.sheet_names().unwrap(),
        vec!["2024-01-06", "2024-01-20", "2024-02-03"]
    );
}

#[test]
fn test_games_parsed() {
    let games = load_session();
    assert_eq!(games.games().len(), 3);

    let first = games.game("2024-01-06").unwrap();
    assert_eq!(first.players(), &["Alice", "Bob", "Carol"]);
    // The sheet's stale Total row is ignored.
    assert_eq!(first.total("Alice"), Some(42));
    assert_eq!(first.total("Bob"), Some(37));
    assert_eq!(first.total("Carol"), Some(35));
    assert_eq!(first.score("Carol", ScoreCategory::Civilian), Some(15));
    assert_eq!(first.victor(), "Alice");
    assert_eq!(first.civ_side("Alice").as_deref(), Some("Giza - A"));
    assert_eq!(first.civ_side("Bob").as_deref(), Some("Rhodos - B"));
    assert_eq!(first.civ_side("Carol").as_deref(), Some("Halicarnassus - A"));

    let second = games.game("2024-01-20").unwrap();
    assert_eq!(second.total("Dave"), Some(41));
    assert_eq!(second.victor(), "Bob");
    assert_eq!(second.victor_civ(), Some("Giza"));
    assert_eq!(second.civ_side("Carol").as_deref(), Some("Babylon - B"));

    let third = games.game("2024-02-03").unwrap();
    assert!(!third.recorded_civ());
    assert_eq!(third.victor(), "Alice");
    assert!(third.victor_civ_side().is_none());
}

#[test]
fn test_victors_follow_sheet_order() {
    let games = load_session();
    let victors = games.lookup("Victors").unwrap();
    let summary: Vec<(&str, &str, i64)> = victors
        .iter()
        .map(|r| (r.game.as_str(), r.player.as_str(), r.total))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("2024-01-06", "Alice", 42),
            ("2024-01-20", "Bob", 46),
            ("2024-02-03", "Alice", 40),
        ]
    );
}

#[test]
fn test_civ_side_lookup_spans_games() {
    let games = load_session();
    let giza = games.lookup("giza - a").unwrap();
    let players: Vec<(&str, &str)> = giza
        .iter()
        .map(|r| (r.game.as_str(), r.player.as_str()))
        .collect();
    assert_eq!(players, vec![("2024-01-06", "Alice"), ("2024-01-20", "Bob")]);

    // The third game recorded no boards and contributes nothing here.
    for history in games.civ_side_histories() {
        assert!(history.rows.iter().all(|r| r.game != "2024-02-03"));
    }
}

#[test]
fn test_player_history_skips_missed_games() {
    let games = load_session();
    let dave = games.lookup("DAVE").unwrap();
    assert_eq!(dave.len(), 2);
    assert_eq!(dave[0].game, "2024-01-20");
    assert_eq!(dave[0].scores.get(ScoreCategory::Military), -1);
    assert_eq!(dave[1].game, "2024-02-03");
    assert_eq!(dave[1].civ_side, None);
}

#[test]
fn test_unknown_lookup() {
    let games = load_session();
    match games.lookup("Erin") {
        Err(WondersError::NotFound { key }) => assert_eq!(key, "Erin"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_summaries() {
    let games = load_session();
    let summaries = games.summaries();
    let alice = summaries.iter().find(|s| s.label == "Alice").unwrap();
    assert_eq!(alice.games, 2);
    assert_eq!(alice.wins, 2);
    assert_eq!(alice.best_total, 42);
    assert!((alice.mean_total - 41.0).abs() < 1e-9);

    let civs = games.civ_side_summaries();
    let giza = civs.iter().find(|s| s.label == "Giza - A").unwrap();
    assert_eq!(giza.games, 2);
    assert_eq!(giza.wins, 2);
}

#[test]
fn test_report_lists_everyone() {
    let report = pipeline::report(&load_session());
    for name in ["Alice", "Bob", "Carol", "Dave", "Giza - A", "Olympia - A"] {
        assert!(report.contains(name), "report is missing {}", name);
    }
}

#[test]
fn test_rows_csv() {
    let games = load_session();
    let mut out = Vec::new();
    pipeline::write_rows_csv(games.lookup("alice").unwrap(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "Game,Player,Red,Coins,Wonders,Blue,Yellow,Purple,Green,Total,Civilization,Side,CivSide,Victor"
    );
    assert_eq!(lines[1], "2024-01-06,Alice,6,5,7,12,4,3,5,42,Giza,A,Giza - A,true");
    assert_eq!(lines[2], "2024-02-03,Alice,2,3,3,10,20,0,2,40,,,,true");
}

#[test]
fn test_export_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("session.xlsx");
    let config = ExportConfig {
        output: output.clone(),
        include_civ_sides: true,
    };

    let summary = pipeline::export_workbook(&load_session(), &config).unwrap();
    assert!(summary.contains("Exported 3 games"));
    // Summary + Victors + 4 players + 5 civ-sides
    assert!(summary.contains("(11 sheets)"), "unexpected summary: {}", summary);
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
}

#[test]
fn test_compare_writes_chart() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("compare.xlsx");
    let config = CompareConfig {
        labels: vec!["alice".to_string(), "Giza - A".to_string(), "victors".to_string()],
        output: output.clone(),
    };

    pipeline::compare(&load_session(), &config).unwrap();
    assert!(output.exists());
}

#[test]
fn test_compare_unknown_label_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("compare.xlsx");
    let config = CompareConfig {
        labels: vec!["alice".to_string(), "nobody".to_string()],
        output: output.clone(),
    };

    assert!(pipeline::compare(&load_session(), &config).is_err());
    assert!(!output.exists());
}

#[test]
fn test_malformed_sheet_names_the_sheet() {
    let good = "\
,alice,bob
Red,1,2
Coins,1,2
Wonders,1,2
Blue,1,2
Yellow,1,2
Purple,1,2
Green,1,2
";
    let short_row = good.replace("Blue,1,2", "Blue,1");
    let repeated_row = format!("{}Red,5,5\n", good);

    for (sheet, csv) in [("short", short_row), ("repeated", repeated_row)] {
        let mut workbook = MemoryWorkbook::new();
        workbook.add_csv("ok", good).unwrap();
        workbook.add_csv(sheet, &csv).unwrap();

        match GameCollection::from_source(&workbook) {
            Err(WondersError::MalformedInput { sheet: s, .. }) => assert_eq!(s, sheet),
            other => panic!("expected MalformedInput for {}, got {:?}", sheet, other.map(|_| ())),
        }
    }
}

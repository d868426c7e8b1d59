// core/tests/test_cli.rs
mod common;

use equiscore_core::cli::score_report;
use equiscore_core::{score_sessions, ScoringMode};

#[test]
fn report_has_one_line_per_session() {
    let sessions = common::stable();
    let scored = score_sessions(&sessions, ScoringMode::HorseRelative);
    let report = score_report(&scored, ScoringMode::HorseRelative);
    assert!(report.starts_with("--- Score Report (horse) ---"));
    let lines = report.lines().filter(|l| l.contains("L600")).count();
    assert_eq!(lines, sessions.len());
    assert!(report.contains("Insufficient data"));
}

#[test]
fn single_session_report_shows_handling() {
    let scored = score_sessions(&[common::full_session("Comet", 2)], ScoringMode::SingleSession);
    let report = score_report(&scored, ScoringMode::SingleSession);
    assert!(report.contains("handling"));
    assert!(report.contains("02/05/2024"));
    assert!(report.contains("effort "));
}

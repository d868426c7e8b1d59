// core/src/cli.rs
use std::fmt::Write as _;

use crate::normalize::format_mm_ss_t;
use crate::types::{ScoredSession, ScoringMode};

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.1}")).unwrap_or_else(|| "—".to_string())
}

/// Tekstrapport for ett pass, én linje per økt.
pub fn score_report(scored: &[ScoredSession], mode: ScoringMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Score Report ({mode}) ---");
    for s in scored {
        let d = &s.derived;
        let date = s
            .session
            .date
            .map(|dt| dt.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "—".to_string());
        let horse = s.session.horse.as_deref().unwrap_or("—");
        let main = match mode {
            ScoringMode::SingleSession => {
                let trend = d
                    .trend
                    .and_then(|t| t.scope)
                    .map(|sc| format!(" · trend vs {}", sc.describe()))
                    .unwrap_or_default();
                format!(
                    "handling {} · performance {} · effort {}{trend}",
                    opt(d.handling_score),
                    opt(d.performance_score),
                    d.effort_level.as_str()
                )
            }
            _ => format!("score {}", opt(d.score10)),
        };
        let last600 = s.session.last.m600.map(format_mm_ss_t).unwrap_or_else(|| "—".to_string());
        let _ = writeln!(
            out,
            "{date} {horse:<16} {main:<36} {:<24} L600 {last600} | {}",
            d.phase, d.reason
        );
        if let Some(alert) = &d.health_alert {
            let _ = writeln!(out, "    ⚠ {alert}");
        }
    }
    out
}

pub fn print_score_report(scored: &[ScoredSession], mode: ScoringMode) {
    print!("{}", score_report(scored, mode));
}

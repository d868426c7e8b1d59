// core/src/bin/equiscore.rs
//
// equiscore <records.json> [batch|horse|single] [--out annotated.json]
use anyhow::{bail, Context, Result};

use equiscore_core::cli::print_score_report;
use equiscore_core::engine::{annotate_records, score_records};
use equiscore_core::metrics::Metrics;
use equiscore_core::storage::{load_records, save_records};
use equiscore_core::types::{PassSummary, ScoringMode};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut positional = Vec::new();
    let mut out_path: Option<String> = None;
    let mut it = args.into_iter();
    while let Some(a) = it.next() {
        if a == "--out" {
            out_path = Some(it.next().context("--out mangler filsti")?);
        } else {
            positional.push(a);
        }
    }

    let Some(input) = positional.first() else {
        bail!("bruk: equiscore <records.json> [batch|horse|single] [--out fil.json]");
    };
    let mode: ScoringMode = match positional.get(1) {
        Some(m) => m.parse()?,
        None => ScoringMode::Batch,
    };

    let records = load_records(input).with_context(|| format!("kunne ikke lese {input}"))?;
    let scored = score_records(&records, mode);
    print_score_report(&scored, mode);

    let metrics = Metrics::new()?;
    let summary = PassSummary::of(&scored);
    metrics.observe(&summary);
    println!(
        "scored={} insufficient={} calibrated(two/one)={}/{}",
        metrics.scored_total(),
        metrics.insufficient_total(),
        metrics.calibrations_total("two"),
        metrics.calibrations_total("one"),
    );

    let annotated = annotate_records(&records, mode)?;
    match out_path {
        Some(p) => save_records(&annotated, &p)?,
        None => println!("{}", serde_json::to_string_pretty(&annotated)?),
    }
    Ok(())
}

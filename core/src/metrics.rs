// core/src/metrics.rs
//
// Prometheus-tellere for ferdige pass. Motoren selv rører aldri disse;
// kalleren registrerer et `PassSummary` etter hvert pass.
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use crate::calibration::CalibrationKind;
use crate::types::PassSummary;

pub struct Metrics {
    registry: Registry,
    scored: IntCounter,
    insufficient: IntCounter,
    calibrations: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let scored = IntCounter::new(
            "equiscore_sessions_scored_total",
            "Økter som fikk en numerisk score",
        )?;
        let insufficient = IntCounter::new(
            "equiscore_sessions_insufficient_total",
            "Økter som endte som insufficient data",
        )?;
        let calibrations = IntCounterVec::new(
            Opts::new("equiscore_calibrations_total", "FR-kalibreringer brukt, per modelltype"),
            &["kind"],
        )?;
        registry.register(Box::new(scored.clone()))?;
        registry.register(Box::new(insufficient.clone()))?;
        registry.register(Box::new(calibrations.clone()))?;
        Ok(Self { registry, scored, insufficient, calibrations })
    }

    pub fn observe(&self, summary: &PassSummary) {
        self.scored.inc_by(summary.scored as u64);
        self.insufficient.inc_by(summary.insufficient as u64);
        self.calibrations
            .with_label_values(&[CalibrationKind::TwoPredictor.as_str()])
            .inc_by(summary.calibrated_two as u64);
        self.calibrations
            .with_label_values(&[CalibrationKind::OnePredictor.as_str()])
            .inc_by(summary.calibrated_one as u64);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn scored_total(&self) -> u64 {
        self.scored.get()
    }

    pub fn insufficient_total(&self) -> u64 {
        self.insufficient.get()
    }

    pub fn calibrations_total(&self, kind: &str) -> u64 {
        self.calibrations.with_label_values(&[kind]).get()
    }
}

// core/src/types.rs
//
// Avledede utdata fra ett scoringspass. Feltnavn (camelCase) og presisjon
// (én desimal på score10) er en del av kontrakten mot presentasjonslaget.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bucketing::IntensityTag;
use crate::calibration::{CalibrationModel, EffortLevel, EffortSource};
use crate::error::EquiscoreError;
use crate::models::Session;
use crate::subscores::TrendResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoringMode {
    /// Kryss-hest, kohort = treningstype × baneforhold, reskalert over hele batchen.
    Batch,
    /// Samme hest, samme going, samme belastning.
    HorseRelative,
    /// Én økt mot egen historikk (Handling + Performance).
    SingleSession,
}

impl ScoringMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringMode::Batch => "batch",
            ScoringMode::HorseRelative => "horse",
            ScoringMode::SingleSession => "single",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMode {
    type Err = EquiscoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" | "cohort" => Ok(ScoringMode::Batch),
            "horse" | "horse-relative" | "relative" => Ok(ScoringMode::HorseRelative),
            "single" | "single-session" | "session" => Ok(ScoringMode::SingleSession),
            other => Err(EquiscoreError::UnknownMode(other.to_string())),
        }
    }
}

/// Diagnoseflagg som styrer begrunnelsesteksten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub is_trial: bool,
    pub intensity: Option<IntensityTag>,
    pub poor_recovery: bool,
    pub strong_perf: bool,
    pub missing_recovery: bool,
    pub slow_going: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub phase: String,
    pub color: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Orange,
    Yellow,
    Green,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderperformanceReport {
    pub underperformance: Vec<Alert>,
    pub positive: Vec<Alert>,
    pub expected_stride_60: Option<f64>,
}

/// Alle avledede felt for én økt. Felt som ikke gjelder modusen er `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedScores {
    pub mode: ScoringMode,
    pub cohort: Option<String>,
    pub intensity_bucket: String,
    pub going: String,
    pub footing: String,

    pub recovery_block: Option<f64>,
    pub performance_block: Option<f64>,
    pub locomotion_block: Option<f64>,
    pub effort_block: Option<f64>,
    pub composite: Option<f64>,
    pub score10: Option<f64>,

    pub handling_score: Option<f64>,
    pub performance_score: Option<f64>,
    pub performance_explainer: Option<String>,
    pub trend: Option<TrendResult>,

    pub phase: String,
    pub color: String,
    pub reason: String,
    pub diagnostics: Diagnostics,

    pub intensity_score: i32,
    pub effort_level: EffortLevel,
    pub effort_source: EffortSource,
    pub fr_calc_pct: Option<f64>,
    pub calibration: Option<CalibrationModel>,

    pub recovery_band_65: Option<Band>,
    pub recovery_band_55: Option<Band>,
    pub health_alert: Option<String>,
    pub alerts: UnderperformanceReport,
}

impl DerivedScores {
    /// Hovedscoren for modusen (score10, eller handling i enkeltøkt-modus).
    pub fn primary_score(&self) -> Option<f64> {
        match self.mode {
            ScoringMode::SingleSession => self.handling_score,
            _ => self.score10,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        self.primary_score().is_none()
    }

    pub fn set_classification(&mut self, c: Classification) {
        self.phase = c.phase;
        self.color = c.color;
        self.reason = c.reason;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredSession {
    pub session: Session,
    pub derived: DerivedScores,
}

/// Oppsummering av ett pass (grunnlag for metrikker og logg).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
    pub total: usize,
    pub scored: usize,
    pub insufficient: usize,
    pub calibrated_two: usize,
    pub calibrated_one: usize,
}

impl PassSummary {
    pub fn of(scored: &[ScoredSession]) -> Self {
        use crate::calibration::CalibrationKind;
        let mut out = PassSummary { total: scored.len(), ..Default::default() };
        for s in scored {
            if s.derived.is_insufficient() {
                out.insufficient += 1;
            } else {
                out.scored += 1;
            }
            match s.derived.calibration.as_ref().map(|c| c.kind) {
                Some(CalibrationKind::TwoPredictor) => out.calibrated_two += 1,
                Some(CalibrationKind::OnePredictor) => out.calibrated_one += 1,
                None => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse() {
        assert_eq!("batch".parse::<ScoringMode>().unwrap(), ScoringMode::Batch);
        assert_eq!(" Horse ".parse::<ScoringMode>().unwrap(), ScoringMode::HorseRelative);
        assert_eq!("single".parse::<ScoringMode>().unwrap(), ScoringMode::SingleSession);
        assert!(matches!("weekly".parse::<ScoringMode>(), Err(EquiscoreError::UnknownMode(_))));
    }
}

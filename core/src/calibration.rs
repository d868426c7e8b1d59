// core/src/calibration.rs
//
// Regresjonsbasert estimat av Fast Recovery % når feltet mangler.
// Modellen tilpasses per hest + underlag fra historikk og lever kun ett pass.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::baseline::mean;
use crate::bucketing::{footing_key, is_taxing_footing};
use crate::models::Session;

/// Maks antall nyeste kandidater med samme underlag.
pub const REG_MAX_RECENT: usize = 20;
/// Minste utvalg for to-prediktormodellen (intensitet + HR5).
pub const REG_MIN_WITH_HR5: usize = 8;
/// Minste utvalg for én-prediktormodellen (kun intensitet).
pub const REG_MIN_SCORE_ONLY: usize = 10;
/// Under denne absoluttverdien regnes ligningssystemet som singulært.
pub const REG_EPSILON: f64 = 1e-9;
/// Fysiologisk plausibelt område for kalibrert FR %.
pub const CAL_FR_MIN: f64 = 30.0;
pub const CAL_FR_MAX: f64 = 65.0;
pub const CAL_FR_BIAS: f64 = 0.0;

/// Tillegg (prosentpoeng) som trekkes fra HR/FR før håndteringskurvene.
pub const ALLOW_VHIGH: f64 = 6.0;
pub const ALLOW_HIGH: f64 = 4.0;
pub const ALLOW_MOD: f64 = 2.0;
pub const ALLOW_LOW: f64 = 0.0;
pub const ALLOW_TAXING: f64 = 2.0;

/// Snitt av tidligere økter (grunnlag for delta-poengene i intensitetsscoren).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PastAverages {
    pub top: Option<f64>,
    pub last600: Option<f64>,
    pub best600: Option<f64>,
}

impl PastAverages {
    pub fn of(history: &[&Session]) -> Self {
        let avg = |f: fn(&Session) -> Option<f64>| {
            let vals: Vec<f64> = history.iter().filter_map(|s| f(s)).collect();
            mean(&vals)
        };
        Self {
            top: avg(|s| s.max_speed),
            last600: avg(|s| s.last.m600),
            best600: avg(|s| s.best.m600),
        }
    }
}

fn finite(x: Option<f64>) -> Option<f64> {
    x.filter(|v| v.is_finite())
}

/// Heuristisk heltallsscore for hvor krevende økta var.
pub fn intensity_score(s: &Session, past: &PastAverages) -> i32 {
    let mut score = 0;

    match (finite(s.max_speed), finite(past.top)) {
        (Some(top), Some(avg)) => {
            let diff = top - avg;
            if diff >= 2.0 {
                score += 3;
            } else if diff >= 1.0 {
                score += 2;
            } else if diff <= -1.5 {
                score -= 1;
            }
        }
        // Ingen historikk: absolutte terskler
        (Some(top), None) => {
            if top >= 60.0 {
                score += 3;
            } else if top >= 58.0 {
                score += 2;
            } else if top >= 56.0 {
                score += 1;
            }
        }
        _ => {}
    }

    // Raskere enn snittet → hardere
    let sectional = |cur: Option<f64>, avg: Option<f64>| match (finite(cur), finite(avg)) {
        (Some(c), Some(a)) if a - c >= 1.5 => 2,
        (Some(c), Some(a)) if a - c >= 0.7 => 1,
        _ => 0,
    };
    score += sectional(s.last.m600, past.last600);
    score += sectional(s.best.m600, past.best600);

    if let Some(z5) = finite(s.zone5_duration()) {
        if z5 >= 240.0 {
            score += 3;
        } else if z5 >= 120.0 {
            score += 2;
        } else if z5 >= 60.0 {
            score += 1;
        }
    }

    if let Some(d) = finite(s.gallop_distance) {
        if d >= 2200.0 {
            score += 2;
        } else if d >= 1600.0 {
            score += 1;
        }
    }

    if is_taxing_footing(s) {
        score += 1;
    }
    score
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalibrationKind {
    TwoPredictor,
    OnePredictor,
}

impl CalibrationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CalibrationKind::TwoPredictor => "two",
            CalibrationKind::OnePredictor => "one",
        }
    }
}

/// `fastRecoveryPct ≈ intercept + Σ coefficients·x` (x = [intensitet, HR5] eller [intensitet]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationModel {
    pub kind: CalibrationKind,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub n: usize,
    pub footing: String,
}

impl CalibrationModel {
    /// Estimat for én økt, klemt til [CAL_FR_MIN, CAL_FR_MAX].
    pub fn estimate(&self, intensity: i32, hr5: Option<f64>) -> Option<f64> {
        let sc = intensity as f64;
        let raw = match (self.kind, self.coefficients.as_slice()) {
            (CalibrationKind::TwoPredictor, [b1, b2]) => {
                self.intercept + b1 * sc + b2 * finite(hr5)?
            }
            (CalibrationKind::OnePredictor, [b]) => self.intercept + b * sc,
            _ => return None,
        } + CAL_FR_BIAS;
        if raw.is_finite() {
            Some(raw.clamp(CAL_FR_MIN, CAL_FR_MAX))
        } else {
            None
        }
    }
}

struct Row {
    fr: f64,
    sc: f64,
    h5: Option<f64>,
}

/// Minste kvadraters metode med to prediktorer via sentrerte summer.
fn fit_two(rows: &[(f64, f64, f64)]) -> Option<(f64, f64, f64)> {
    let n = rows.len() as f64;
    let mx1 = rows.iter().map(|r| r.0).sum::<f64>() / n;
    let mx2 = rows.iter().map(|r| r.1).sum::<f64>() / n;
    let my = rows.iter().map(|r| r.2).sum::<f64>() / n;

    let (mut s11, mut s22, mut s12, mut t1, mut t2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for &(a, b, y) in rows {
        let x1 = a - mx1;
        let x2 = b - mx2;
        let y = y - my;
        s11 += x1 * x1;
        s22 += x2 * x2;
        s12 += x1 * x2;
        t1 += x1 * y;
        t2 += x2 * y;
    }
    let det = s11 * s22 - s12 * s12;
    if det.abs() <= REG_EPSILON {
        return None; // nesten kollineære prediktorer
    }
    let b1 = (t1 * s22 - t2 * s12) / det;
    let b2 = (s11 * t2 - s12 * t1) / det;
    Some((my - b1 * mx1 - b2 * mx2, b1, b2))
}

/// Enkel lineær regresjon y ≈ a + b·x. Brukes også av batch-residualen.
pub fn linear_fit(pairs: &[(f64, f64)]) -> Option<(f64, f64)> {
    let pts: Vec<(f64, f64)> = pairs
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pts.len() < 2 {
        return None;
    }
    let n = pts.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sx2) = (0.0, 0.0, 0.0, 0.0);
    for &(x, y) in &pts {
        sx += x;
        sy += y;
        sxy += x * y;
        sx2 += x * x;
    }
    let denom = n * sx2 - sx * sx;
    if denom.abs() <= REG_EPSILON {
        return None;
    }
    let b = (n * sxy - sx * sy) / denom;
    let a = (sy - b * sx) / n;
    Some((a, b))
}

/// Tilpasser kalibreringsmodellen for `current` fra dens historikk (nyeste først).
///
/// Gir `None` når økta har observert FR % (aldri overskriv faktiske verdier)
/// eller når ingen av modellene har nok data.
pub fn fit_fr_calibration(
    current: &Session,
    history: &[&Session],
    past: &PastAverages,
) -> Option<CalibrationModel> {
    if finite(current.fast_recovery_pct).is_some() {
        return None;
    }
    let footing = footing_key(current);
    let rows: Vec<Row> = history
        .iter()
        .filter(|s| footing_key(s) == footing)
        .take(REG_MAX_RECENT)
        .filter_map(|s| {
            Some(Row {
                fr: finite(s.fast_recovery_pct)?,
                sc: intensity_score(s, past) as f64,
                h5: finite(s.hr5_pct),
            })
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    let with_h5: Vec<(f64, f64, f64)> =
        rows.iter().filter_map(|r| Some((r.sc, r.h5?, r.fr))).collect();
    if with_h5.len() >= REG_MIN_WITH_HR5 {
        if let Some((alpha, b1, b2)) = fit_two(&with_h5) {
            debug!("FR-kalibrering (to) for {footing}: n={} a={alpha:.3} b1={b1:.3} b2={b2:.3}", with_h5.len());
            return Some(CalibrationModel {
                kind: CalibrationKind::TwoPredictor,
                intercept: alpha,
                coefficients: vec![b1, b2],
                n: with_h5.len(),
                footing,
            });
        }
    }

    if rows.len() >= REG_MIN_SCORE_ONLY {
        let pairs: Vec<(f64, f64)> = rows.iter().map(|r| (r.sc, r.fr)).collect();
        if let Some((a, b)) = linear_fit(&pairs) {
            debug!("FR-kalibrering (én) for {footing}: n={} a={a:.3} b={b:.3}", rows.len());
            return Some(CalibrationModel {
                kind: CalibrationKind::OnePredictor,
                intercept: a,
                coefficients: vec![b],
                n: rows.len(),
                footing,
            });
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffortLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl EffortLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EffortLevel::Low => "low",
            EffortLevel::Moderate => "moderate",
            EffortLevel::High => "high",
            EffortLevel::VeryHigh => "very high",
        }
    }

    pub fn from_fr(fr: f64) -> Self {
        if fr <= 38.0 {
            EffortLevel::Low
        } else if fr <= 45.0 {
            EffortLevel::Moderate
        } else if fr <= 55.0 {
            EffortLevel::High
        } else {
            EffortLevel::VeryHigh
        }
    }

    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 5 => EffortLevel::VeryHigh,
            s if s >= 3 => EffortLevel::High,
            s if s >= 1 => EffortLevel::Moderate,
            _ => EffortLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffortSource {
    #[serde(rename = "fr%")]
    FrPct,
    #[serde(rename = "calculated")]
    Calculated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffortDetail {
    pub level: EffortLevel,
    pub source: EffortSource,
    pub inferred_level: EffortLevel,
    pub fr_level: Option<EffortLevel>,
    pub fr_calc_pct: Option<f64>,
    pub calibration: Option<CalibrationModel>,
    pub score: i32,
}

/// Innsatsnivå: fra FR % når den finnes, ellers utledet fra intensitetsscoren.
/// Kalibrert FR % fylles kun inn når faktisk verdi mangler.
pub fn effort_detail(
    row: &Session,
    past: &PastAverages,
    calibration: Option<&CalibrationModel>,
) -> EffortDetail {
    let fr = finite(row.fast_recovery_pct);
    let score = intensity_score(row, past);
    let inferred_level = EffortLevel::from_score(score);
    let fr_level = fr.map(EffortLevel::from_fr);

    let (fr_calc_pct, used) = match (fr, calibration) {
        (None, Some(model)) => match model.estimate(score, row.hr5_pct) {
            Some(v) => (Some(v), Some(model.clone())),
            None => (None, None),
        },
        _ => (None, None),
    };

    let (level, source) = match fr_level {
        Some(l) => (l, EffortSource::FrPct),
        None => (inferred_level, EffortSource::Calculated),
    };

    EffortDetail { level, source, inferred_level, fr_level, fr_calc_pct, calibration: used, score }
}

/// Tillegg i prosentpoeng etter belastning (+ ekstra på tungt underlag).
pub fn allowance_pp(row: &Session, past: &PastAverages) -> (f64, i32) {
    let score = intensity_score(row, past);
    let mut allow = match EffortLevel::from_score(score) {
        EffortLevel::VeryHigh => ALLOW_VHIGH,
        EffortLevel::High => ALLOW_HIGH,
        EffortLevel::Moderate => ALLOW_MOD,
        EffortLevel::Low => ALLOW_LOW,
    };
    if is_taxing_footing(row) {
        allow += ALLOW_TAXING;
    }
    (allow, score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_breakpoints() {
        let past = PastAverages { top: Some(56.0), last600: Some(40.0), best600: Some(38.0) };
        let mut s = Session { max_speed: Some(58.0), ..Default::default() };
        s.last.m600 = Some(38.5); // 1.5 s raskere
        s.best.m600 = Some(37.3); // 0.7 s raskere
        s.zones[4].duration_seconds = Some(120.0);
        s.gallop_distance = Some(1600.0);
        s.surface = Some("Sand".into());
        assert_eq!(intensity_score(&s, &past), 3 + 2 + 1 + 2 + 1 + 1);

        let slow = Session { max_speed: Some(54.4), ..Default::default() };
        assert_eq!(intensity_score(&slow, &past), -1);
    }

    #[test]
    fn linear_fit_exact_line() {
        let (a, b) = linear_fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
        assert!((a - 1.0).abs() < 1e-9 && (b - 2.0).abs() < 1e-9);
        assert!(linear_fit(&[(1.0, 1.0), (1.0, 2.0)]).is_none());
    }

    #[test]
    fn estimate_is_clamped() {
        let m = CalibrationModel {
            kind: CalibrationKind::OnePredictor,
            intercept: 80.0,
            coefficients: vec![1.0],
            n: 10,
            footing: "grass:good".into(),
        };
        assert_eq!(m.estimate(3, None), Some(CAL_FR_MAX));
        let two = CalibrationModel { kind: CalibrationKind::TwoPredictor, coefficients: vec![1.0, 0.5], ..m };
        assert_eq!(two.estimate(3, None), None);
    }
}

// core/src/subscores.rs
//
// Delscorer: hver funksjon tar én rå metrikk (+ kontekst) og gir en begrenset
// delscore. Manglende input gir alltid `None`, aldri 0.
use serde::{Deserialize, Serialize};

use crate::baseline::Baseline;
use crate::bucketing::{footing_key, GoingBucket};
use crate::calibration::EffortLevel;
use crate::models::Session;

/// Nøytral verdi ved degenerert fordeling (p90 ≤ p10).
pub const NEUTRAL_NORM: f64 = 0.5;

/// Lineær klemt skalering mot p10/p90. `invert` når lavere rå verdi er bedre.
pub fn robust_norm(value: Option<f64>, p10: Option<f64>, p90: Option<f64>, invert: bool) -> Option<f64> {
    let v = value.filter(|x| x.is_finite())?;
    let lo = p10.filter(|x| x.is_finite())?;
    let hi = p90.filter(|x| x.is_finite())?;
    if hi <= lo {
        return Some(NEUTRAL_NORM);
    }
    let x = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
    Some(if invert { 1.0 - x } else { x })
}

/// [`robust_norm`] mot en ferdig [`Baseline`].
pub fn robust_norm_baseline(value: Option<f64>, b: &Baseline, invert: bool) -> Option<f64> {
    robust_norm(value, b.p10, b.p90, invert)
}

// ---------------- tid til X % av maks-puls ----------------

pub const RATIO_FAST: f64 = 0.90;
pub const RATIO_NEUTRAL_HI: f64 = 1.10;
pub const RATIO_NEUTRAL_HI_SLOW: f64 = 1.20;
pub const RATIO_MILD: f64 = 1.40;
pub const RATIO_MILD_SLOW: f64 = 1.60;
/// Fall per ratio-enhet etter mild-taket.
pub const RATIO_TAIL_SLOPE: f64 = 0.75;
pub const RATIO_FLOOR: f64 = 0.1;

fn lerp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    y0 + (x - x0) / (x1 - x0) * (y1 - y0)
}

/// `ratio = value / baseline`; lav ratio (raskere ned i puls) er bedre.
/// Båndene utvides på tung going.
pub fn ratio_to_baseline_score(value: Option<f64>, baseline: Option<f64>, going: GoingBucket) -> Option<f64> {
    let v = value.filter(|x| x.is_finite())?;
    let b = baseline.filter(|x| x.is_finite() && *x > 0.0)?;
    let ratio = v / b;
    let (neutral_hi, mild) = if going.is_slow() {
        (RATIO_NEUTRAL_HI_SLOW, RATIO_MILD_SLOW)
    } else {
        (RATIO_NEUTRAL_HI, RATIO_MILD)
    };

    let score = if ratio <= RATIO_FAST {
        1.0
    } else if ratio <= neutral_hi {
        lerp(ratio, RATIO_FAST, neutral_hi, 1.0, 0.7)
    } else if ratio <= mild {
        lerp(ratio, neutral_hi, mild, 0.7, 0.4)
    } else {
        (0.4 - (ratio - mild) * RATIO_TAIL_SLOPE).max(RATIO_FLOOR)
    };
    Some(score)
}

// ---------------- stykkevise kurver ----------------

/// Ankerpunkter `(terskel, score01)`, stigende terskel, ikke-økende score.
pub type Curve = &'static [(f64, f64)];

pub const HR15_CURVE: Curve = &[
    (30.0, 1.0), (35.0, 0.9), (40.0, 0.8), (45.0, 0.6),
    (50.0, 0.4), (55.0, 0.2), (60.0, 0.1), (70.0, 0.0),
];
pub const HR10_CURVE: Curve = &[
    (30.0, 1.0), (35.0, 0.9), (40.0, 0.8), (45.0, 0.6),
    (50.0, 0.4), (55.0, 0.2), (60.0, 0.0),
];
pub const HR5_CURVE: Curve = &[
    (30.0, 1.0), (35.0, 0.9), (40.0, 0.8), (50.0, 0.5), (57.0, 0.2), (65.0, 0.0),
];
pub const HR3_CURVE: Curve = &[
    (35.0, 1.0), (40.0, 0.8), (45.0, 0.6), (55.0, 0.3), (65.0, 0.0),
];
/// Fast Recovery % av maks-puls: lavere = lettere håndtert.
pub const FR_CURVE: Curve = &[
    (35.0, 1.0), (40.0, 0.9), (45.0, 0.7), (50.0, 0.5), (55.0, 0.3), (60.0, 0.1), (70.0, 0.0),
];
/// Acidose i sekunder (0:30 … 4:00+).
pub const ACID_CURVE: Curve = &[
    (30.0, 1.0), (60.0, 0.9), (90.0, 0.7), (120.0, 0.5), (180.0, 0.2), (240.0, 0.0),
];

/// Lineær interpolasjon mellom nabo-ankre, klemt i endene.
pub fn piecewise(x: Option<f64>, curve: Curve) -> Option<f64> {
    let x = x.filter(|v| v.is_finite())?;
    let (first, last) = (curve.first()?, curve.last()?);
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }
    curve.windows(2).find_map(|w| {
        let (a, b) = (w[0], w[1]);
        if x >= a.0 && x <= b.0 {
            let span = if b.0 - a.0 == 0.0 { 1.0 } else { b.0 - a.0 };
            Some(a.1 + (x - a.0) / span * (b.1 - a.1))
        } else {
            None
        }
    })
}

/// Kurve på 0–10-skala etter at tillegget (prosentpoeng) er trukket fra.
pub fn curve_score10(pct: Option<f64>, allowance_pp: f64, curve: Curve) -> Option<f64> {
    piecewise(pct.map(|p| p - allowance_pp), curve).map(|s| s * 10.0)
}

// ---------------- acidose-justering ----------------

pub const ACID_BONUS_EXCELLENT: f64 = 0.6;
pub const ACID_BONUS_GOOD: f64 = 0.3;
pub const ACID_MALUS_SLOW: f64 = -0.3;
pub const ACID_MALUS_POOR: f64 = -0.6;

/// Monoton trappefunksjon over acidose-sekunder.
pub fn acidosis_adjustment(acid_secs: Option<f64>) -> f64 {
    match acid_secs.filter(|v| v.is_finite()) {
        None => 0.0,
        Some(a) if a <= 25.0 => ACID_BONUS_EXCELLENT,
        Some(a) if a <= 35.0 => ACID_BONUS_GOOD,
        Some(a) if a <= 45.0 => 0.0,
        Some(a) if a <= 60.0 => ACID_MALUS_SLOW,
        Some(_) => ACID_MALUS_POOR,
    }
}

// ---------------- trend ----------------

pub const TREND_STEP: f64 = 0.2;
pub const TREND_CAP: f64 = 0.5;
/// Endring (prosentpoeng) som teller som bedre/dårligere.
pub const TREND_DIFF_PP: f64 = 2.0;
pub const TREND_MAX_COMPARABLES: usize = 8;

/// Hvilket sammenligningsgrunnlag trenden faktisk brukte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendScope {
    SameEffortAndFooting,
    SimilarEffort,
    SimilarFooting,
    AllPast,
}

impl TrendScope {
    pub fn describe(self) -> &'static str {
        match self {
            TrendScope::SameEffortAndFooting => "same effort & footing",
            TrendScope::SimilarEffort => "similar effort",
            TrendScope::SimilarFooting => "similar footing",
            TrendScope::AllPast => "all past sessions",
        }
    }
}

/// Sammenlignbare verdier for én metrikk: samme innsats og underlag først,
/// deretter kun innsats, kun underlag, til slutt all historikk.
pub fn comparable_set<F, E>(
    current: &Session,
    current_effort: EffortLevel,
    history: &[&Session],
    selector: F,
    effort_of: E,
) -> (Vec<f64>, TrendScope)
where
    F: Fn(&Session) -> Option<f64>,
    E: Fn(&Session) -> EffortLevel,
{
    let footing = footing_key(current);
    let candidates: Vec<(f64, EffortLevel, String)> = history
        .iter()
        .filter_map(|s| {
            let v = selector(*s).filter(|x| x.is_finite())?;
            Some((v, effort_of(*s), footing_key(s)))
        })
        .collect();

    let pick = |keep: &dyn Fn(&(f64, EffortLevel, String)) -> bool| -> Vec<f64> {
        candidates.iter().filter(|c| keep(c)).map(|c| c.0).collect()
    };

    let both = pick(&|c| c.1 == current_effort && c.2 == footing);
    if !both.is_empty() {
        return (both, TrendScope::SameEffortAndFooting);
    }
    let effort = pick(&|c| c.1 == current_effort);
    if !effort.is_empty() {
        return (effort, TrendScope::SimilarEffort);
    }
    let foot = pick(&|c| c.2 == footing);
    if !foot.is_empty() {
        return (foot, TrendScope::SimilarFooting);
    }
    (pick(&|_| true), TrendScope::AllPast)
}

/// Halvt steg for 3–4 sammenlignbare, fullt fra 5.
pub fn trend_step(n: usize) -> f64 {
    match n {
        0..=2 => 0.0,
        3 | 4 => TREND_STEP / 2.0,
        _ => TREND_STEP,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub adjustment: f64,
    pub scope: Option<TrendScope>,
}

/// Summerer trend-steg over metrikkene (`(nåverdi, sammenlignbare, scope)`), klemt til ±TREND_CAP.
/// Lavere verdi enn snittet er bedre.
pub fn trend_adjustment(metrics: &[(Option<f64>, Vec<f64>, TrendScope)]) -> TrendResult {
    let mut adj = 0.0;
    let mut scope = None;
    for (value, comparables, sc) in metrics {
        let Some(v) = value.filter(|x| x.is_finite()) else { continue };
        let set: Vec<f64> = comparables.iter().copied().take(TREND_MAX_COMPARABLES).collect();
        if set.is_empty() {
            continue;
        }
        scope.get_or_insert(*sc);
        let avg = set.iter().sum::<f64>() / set.len() as f64;
        let step = trend_step(set.len());
        let diff = v - avg;
        if diff <= -TREND_DIFF_PP {
            adj += step;
        } else if diff >= TREND_DIFF_PP {
            adj -= step;
        }
    }
    TrendResult { adjustment: adj.clamp(-TREND_CAP, TREND_CAP), scope }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robust_norm_edges() {
        assert_eq!(robust_norm(Some(10.0), Some(10.0), Some(20.0), false), Some(0.0));
        assert_eq!(robust_norm(Some(20.0), Some(10.0), Some(20.0), true), Some(0.0));
        assert_eq!(robust_norm(Some(99.0), Some(10.0), Some(20.0), false), Some(1.0));
        assert_eq!(robust_norm(Some(3.0), Some(7.0), Some(7.0), true), Some(NEUTRAL_NORM));
        assert_eq!(robust_norm(None, Some(1.0), Some(2.0), false), None);
        assert_eq!(robust_norm(Some(1.0), None, Some(2.0), false), None);
    }

    #[test]
    fn ratio_bands() {
        let good = GoingBucket::Good;
        assert_eq!(ratio_to_baseline_score(Some(80.0), Some(100.0), good), Some(1.0));
        let at_neutral = ratio_to_baseline_score(Some(110.0), Some(100.0), good).unwrap();
        assert!((at_neutral - 0.7).abs() < 1e-9);
        let at_mild = ratio_to_baseline_score(Some(140.0), Some(100.0), good).unwrap();
        assert!((at_mild - 0.4).abs() < 1e-9);
        assert_eq!(ratio_to_baseline_score(Some(400.0), Some(100.0), good), Some(RATIO_FLOOR));
        // tung going: 1.20 er fortsatt innenfor nøytralbåndet
        let slow = ratio_to_baseline_score(Some(120.0), Some(100.0), GoingBucket::Slow).unwrap();
        assert!((slow - 0.7).abs() < 1e-9);
        assert_eq!(ratio_to_baseline_score(Some(1.0), Some(0.0), good), None);
    }

    #[test]
    fn piecewise_interpolates_and_clamps() {
        assert_eq!(piecewise(Some(20.0), HR15_CURVE), Some(1.0));
        assert_eq!(piecewise(Some(99.0), HR15_CURVE), Some(0.0));
        let mid = piecewise(Some(47.5), HR15_CURVE).unwrap();
        assert!((mid - 0.5).abs() < 1e-9);
        assert_eq!(curve_score10(Some(39.0), 4.0, FR_CURVE), Some(10.0));
    }

    #[test]
    fn acidosis_steps() {
        assert_eq!(acidosis_adjustment(Some(20.0)), ACID_BONUS_EXCELLENT);
        assert_eq!(acidosis_adjustment(Some(45.0)), 0.0);
        assert_eq!(acidosis_adjustment(Some(61.0)), ACID_MALUS_POOR);
        assert_eq!(acidosis_adjustment(None), 0.0);
    }

    /// Innsats kodes i skrittfrekvensen så testen styrer den direkte.
    fn past(hr5: Option<f64>, hard: bool, surface: &str) -> Session {
        Session {
            hr5_pct: hr5,
            stride_frequency: Some(if hard { 1.0 } else { 0.0 }),
            surface: Some(surface.into()),
            track_condition: Some("Good".into()),
            ..Default::default()
        }
    }

    fn effort_of(s: &Session) -> EffortLevel {
        if s.stride_frequency == Some(1.0) {
            EffortLevel::High
        } else {
            EffortLevel::Low
        }
    }

    #[test]
    fn comparable_set_falls_back_in_order() {
        let current = past(Some(45.0), true, "Turf");
        let hard_turf = past(Some(40.0), true, "Turf");
        let easy_turf = past(Some(42.0), false, "Turf");
        let hard_sand = past(Some(44.0), true, "Sand");
        let easy_sand = past(Some(46.0), false, "Sand");
        let unmeasured = past(None, true, "Turf");
        let run = |hist: &[&Session]| {
            comparable_set(&current, EffortLevel::High, hist, |s| s.hr5_pct, effort_of)
        };

        assert_eq!(
            run(&[&unmeasured, &easy_turf, &hard_turf, &hard_sand]),
            (vec![40.0], TrendScope::SameEffortAndFooting)
        );
        assert_eq!(run(&[&easy_turf, &hard_sand, &unmeasured]), (vec![44.0], TrendScope::SimilarEffort));
        assert_eq!(run(&[&easy_sand, &easy_turf]), (vec![42.0], TrendScope::SimilarFooting));
        assert_eq!(run(&[&easy_sand]), (vec![46.0], TrendScope::AllPast));
        assert_eq!(run(&[]), (vec![], TrendScope::AllPast));
    }

    #[test]
    fn trend_is_capped_and_sample_aware() {
        let five = vec![50.0; 5];
        let t = trend_adjustment(&[
            (Some(40.0), five.clone(), TrendScope::SimilarEffort),
            (Some(40.0), five.clone(), TrendScope::AllPast),
            (Some(40.0), five, TrendScope::AllPast),
        ]);
        assert_eq!(t.adjustment, TREND_CAP);
        assert_eq!(t.scope, Some(TrendScope::SimilarEffort));

        let two = trend_adjustment(&[(Some(40.0), vec![50.0, 50.0], TrendScope::AllPast)]);
        assert_eq!(two.adjustment, 0.0);
        assert_eq!(trend_step(4), TREND_STEP / 2.0);
    }
}

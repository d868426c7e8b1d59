// core/src/classify.rs
//
// Score → fase, farge og begrunnelse. Total for alle endelige scorer;
// manglende score gir alltid samme "Insufficient data"-resultat.
use crate::types::{Band, Classification, Diagnostics};

pub const BAND_EXCEPTIONAL: f64 = 8.5;
pub const BAND_OPTIMAL: f64 = 7.0;
pub const BAND_MAINTENANCE: f64 = 5.0;
pub const BAND_MONITOR: f64 = 3.0;

pub const INSUFFICIENT_PHASE: &str = "Insufficient data";
pub const INSUFFICIENT_COLOR: &str = "#888";
pub const INSUFFICIENT_REASON: &str =
    "Need more similar sessions to rate fairly — metrics shown for reference.";

const SLOW_GOING_NOTE: &str = " Slow going taken into account.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Increase,
    Optimal,
    Maintenance,
    Monitor,
    Investigate,
}

impl Phase {
    pub fn of(score: f64) -> Self {
        if score >= BAND_EXCEPTIONAL {
            Phase::Increase
        } else if score >= BAND_OPTIMAL {
            Phase::Optimal
        } else if score >= BAND_MAINTENANCE {
            Phase::Maintenance
        } else if score >= BAND_MONITOR {
            Phase::Monitor
        } else {
            Phase::Investigate
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Increase => "Increase (Exceptional)",
            Phase::Optimal => "Optimal",
            Phase::Maintenance => "Maintenance",
            Phase::Monitor => "Monitor",
            Phase::Investigate => "Investigate",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Phase::Increase => "rgb(0,176,80)",
            Phase::Optimal => "rgb(106,192,121)",
            Phase::Maintenance => "rgb(255,211,77)",
            Phase::Monitor => "rgb(255,153,51)",
            Phase::Investigate => "rgb(192,0,0)",
        }
    }
}

fn reason(phase: Phase, d: &Diagnostics) -> &'static str {
    match phase {
        Phase::Increase if d.is_trial => {
            "Race-like performance with appropriate recovery for a trial — horse coped easily; next workload can be raised."
        }
        Phase::Increase => {
            "Handled the work too well — recovery strong; a small increase next time would be manageable."
        }
        Phase::Optimal if d.is_trial => "Strong trial performance; recovery acceptable for context.",
        Phase::Optimal => "Strong performance with solid recovery — hold the program.",
        Phase::Maintenance => {
            "In line with a steady/maintenance gallop — no change unless aiming higher intensity."
        }
        Phase::Monitor if d.missing_recovery => {
            "Below expected — key recovery data missing; monitor next session."
        }
        Phase::Monitor if d.poor_recovery => {
            "Below expected — recovery slower for today's effort; monitor workload."
        }
        Phase::Monitor => "Below expected for context — monitor closely.",
        Phase::Investigate if d.is_trial => {
            "Under par for a trial (or slow recovery). Review horse/conditions before next start."
        }
        Phase::Investigate => {
            "Significant underperformance or slow recovery — investigate before next session."
        }
    }
}

pub fn insufficient() -> Classification {
    Classification {
        phase: INSUFFICIENT_PHASE.to_string(),
        color: INSUFFICIENT_COLOR.to_string(),
        reason: INSUFFICIENT_REASON.to_string(),
    }
}

/// Fem bånd, synkende. `None` eller ikke-endelig score → "Insufficient data".
pub fn classify(score: Option<f64>, diag: &Diagnostics) -> Classification {
    let Some(score) = score.filter(|s| s.is_finite()) else {
        return insufficient();
    };
    let phase = Phase::of(score);
    let mut text = reason(phase, diag).to_string();
    if diag.slow_going {
        text.push_str(SLOW_GOING_NOTE);
    }
    Classification {
        phase: phase.label().to_string(),
        color: phase.color().to_string(),
        reason: text,
    }
}

// ---------------- restitusjonstid-bånd ----------------

pub const BAND_DARK_GREEN: &str = "#2aa84a";
pub const BAND_LIGHT_GREEN: &str = "#70c46c";
pub const BAND_YELLOW: &str = "#f2b705";
pub const BAND_ORANGE: &str = "#f28c28";
pub const BAND_RED: &str = "#e55353";

pub const T65_LIMITS: [f64; 4] = [70.0, 95.0, 120.0, 150.0];
pub const T55_LIMITS: [f64; 4] = [100.0, 140.0, 180.0, 240.0];

fn band_of(secs: Option<f64>, limits: &[f64; 4]) -> Option<Band> {
    let secs = secs.filter(|s| s.is_finite())?;
    const LABELS: [(&str, &str); 5] = [
        ("Excellent", BAND_DARK_GREEN),
        ("Very Good", BAND_LIGHT_GREEN),
        ("Fair", BAND_YELLOW),
        ("Slow", BAND_ORANGE),
        ("Very Slow", BAND_RED),
    ];
    let idx = limits.iter().position(|&l| secs <= l).unwrap_or(limits.len());
    let (label, color) = LABELS[idx];
    Some(Band { label: label.to_string(), color: color.to_string() })
}

/// Tid til 65 % av maks-puls.
pub fn recovery_band_65(secs: Option<f64>) -> Option<Band> {
    band_of(secs, &T65_LIMITS)
}

/// Tid til 55 % av maks-puls.
pub fn recovery_band_55(secs: Option<f64>) -> Option<Band> {
    band_of(secs, &T55_LIMITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_descend() {
        let d = Diagnostics::default();
        assert_eq!(classify(Some(8.5), &d).phase, "Increase (Exceptional)");
        assert_eq!(classify(Some(8.49), &d).phase, "Optimal");
        assert_eq!(classify(Some(5.0), &d).phase, "Maintenance");
        assert_eq!(classify(Some(3.0), &d).phase, "Monitor");
        assert_eq!(classify(Some(0.0), &d).phase, "Investigate");
        assert_eq!(classify(Some(-4.0), &d).phase, "Investigate");
    }

    #[test]
    fn missing_score_is_insufficient() {
        let c = classify(None, &Diagnostics::default());
        assert_eq!(c.phase, INSUFFICIENT_PHASE);
        assert_eq!(c.color, INSUFFICIENT_COLOR);
        assert_eq!(classify(Some(f64::NAN), &Diagnostics::default()), c);
    }

    #[test]
    fn reason_branches() {
        let d = Diagnostics { missing_recovery: true, slow_going: true, ..Default::default() };
        let c = classify(Some(4.0), &d);
        assert!(c.reason.starts_with("Below expected — key recovery data missing"));
        assert!(c.reason.ends_with("Slow going taken into account."));
    }

    #[test]
    fn recovery_bands() {
        assert_eq!(recovery_band_65(Some(70.0)).unwrap().label, "Excellent");
        assert_eq!(recovery_band_65(Some(151.0)).unwrap().label, "Very Slow");
        assert_eq!(recovery_band_55(Some(181.0)).unwrap().color, BAND_ORANGE);
        assert!(recovery_band_55(None).is_none());
    }
}

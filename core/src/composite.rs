// core/src/composite.rs
//
// Delscorer → blokker → sammensatt score, én komponent for alle tre modusene.
// Statistikk (kohorter, baselines, kalibrering) samles inn av engine før noe
// her kalles.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::baseline::{mean, Baseline};
use crate::bucketing::{footing_key, going_bucket, GoingBucket, IntensityTag};
use crate::calibration::{allowance_pp, effort_detail, linear_fit, EffortLevel, PastAverages};
use crate::models::Session;
use crate::subscores::{
    acidosis_adjustment, comparable_set, curve_score10, piecewise, ratio_to_baseline_score,
    robust_norm_baseline, trend_adjustment, TrendResult, ACID_CURVE, FR_CURVE, HR10_CURVE,
    HR15_CURVE, HR5_CURVE,
};

pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn avg_present(parts: &[Option<f64>]) -> Option<f64> {
    let vals: Vec<f64> = parts.iter().flatten().copied().collect();
    mean(&vals)
}

/// Snitt av ratio-scorene for tid til 65 % og 55 % mot medianen i utvalget.
pub fn relative_time_score(s: &Session, pool: &[&Session], going: GoingBucket) -> Option<f64> {
    let med65 = Baseline::of_metric(pool.iter().copied(), |p| p.time_to_65_pct).median;
    let med55 = Baseline::of_metric(pool.iter().copied(), |p| p.time_to_55_pct).median;
    avg_present(&[
        ratio_to_baseline_score(s.time_to_65_pct, med65, going),
        ratio_to_baseline_score(s.time_to_55_pct, med55, going),
    ])
}

// ======================= Batch / kohort =======================

pub const W_REC_HR15: f64 = 0.45;
pub const W_REC_FR: f64 = 0.10;
pub const W_REC_RESIDUAL: f64 = 0.10;
pub const W_REC_ACID: f64 = 0.15;
pub const W_REC_T65: f64 = 0.10;
pub const W_REC_T55: f64 = 0.05;
pub const W_REC_REL: f64 = 0.05;

/// Kontekstvekter (Recovery, Performance, Locomotion).
pub const W_TRIAL: (f64, f64, f64) = (0.32, 0.53, 0.15);
pub const W_HARD: (f64, f64, f64) = (0.65, 0.25, 0.10);
pub const W_SOLID: (f64, f64, f64) = (0.48, 0.37, 0.15);
pub const W_MAINTENANCE: (f64, f64, f64) = (0.36, 0.49, 0.15);

/// Hard økt med svak restitusjon kan ikke score over taket.
pub const HARD_FLOOR_RECOVERY: f64 = 0.30;
pub const HARD_FLOOR_CAP: f64 = 0.60;

pub const POOR_RECOVERY: f64 = 0.4;
pub const STRONG_PERF: f64 = 0.7;

/// Per-kohort statistikk for batch-modus. Lever kun ett pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCohortStats {
    pub key: String,
    /// HR3 ≈ a + b·FR
    pub fit: Option<(f64, f64)>,
    pub hr15: Baseline,
    pub fr: Baseline,
    pub acid: Baseline,
    pub t65: Baseline,
    pub t55: Baseline,
    pub top: Baseline,
    pub l400: Baseline,
    pub accel: Baseline,
    pub stride: Baseline,
    pub inv_residual: Baseline,
}

fn inv_residual(s: &Session, fit: Option<(f64, f64)>) -> Option<f64> {
    let (a, b) = fit?;
    let expected = a + b * s.fast_recovery_pct?;
    let r = -(s.hr3_pct? - expected);
    r.is_finite().then_some(r)
}

impl BatchCohortStats {
    pub fn gather(key: String, members: &[&Session]) -> Self {
        let pairs: Vec<(f64, f64)> = members
            .iter()
            .filter_map(|s| Some((s.fast_recovery_pct?, s.hr3_pct?)))
            .collect();
        let fit = linear_fit(&pairs);
        let m = || members.iter().copied();
        let residuals: Vec<f64> = members.iter().filter_map(|s| inv_residual(s, fit)).collect();
        let stats = Self {
            fit,
            hr15: Baseline::of_metric(m(), |s| s.hr15_pct),
            fr: Baseline::of_metric(m(), |s| s.fast_recovery_pct),
            acid: Baseline::of_metric(m(), |s| s.acidose_seconds),
            t65: Baseline::of_metric(m(), |s| s.time_to_65_pct),
            t55: Baseline::of_metric(m(), |s| s.time_to_55_pct),
            top: Baseline::of_metric(m(), |s| s.max_speed),
            l400: Baseline::of_metric(m(), |s| s.last.m400),
            accel: Baseline::of_metric(m(), |s| s.max_acceleration),
            stride: Baseline::of_metric(m(), |s| s.stride_length),
            inv_residual: Baseline::of(&residuals),
            key,
        };
        debug!("batch-kohort {}: n={} fit={:?}", stats.key, members.len(), stats.fit);
        stats
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchBlocks {
    pub recovery: Option<f64>,
    pub performance: Option<f64>,
    pub locomotion: Option<f64>,
    pub composite: Option<f64>,
    pub is_trial: bool,
    pub intensity: Option<IntensityTag>,
}

pub fn context_weights(trial: bool, tag: IntensityTag) -> (f64, f64, f64) {
    if trial {
        return W_TRIAL;
    }
    match tag {
        IntensityTag::Hard => W_HARD,
        IntensityTag::Solid => W_SOLID,
        IntensityTag::Maintenance => W_MAINTENANCE,
    }
}

/// Vektet sum av tilstedeværende deler; fraværende deler bidrar ikke (ingen re-normalisering).
fn weighted_sum(parts: &[(Option<f64>, f64)]) -> Option<f64> {
    let present: Vec<f64> = parts.iter().filter_map(|(v, w)| v.map(|x| x * w)).collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum())
    }
}

/// Rå batch-composite for én økt (før reskalering over hele batchen).
pub fn batch_blocks(s: &Session, stats: &BatchCohortStats, tag: IntensityTag, relative: Option<f64>) -> BatchBlocks {
    let recovery = weighted_sum(&[
        (robust_norm_baseline(s.hr15_pct, &stats.hr15, true), W_REC_HR15),
        (robust_norm_baseline(s.fast_recovery_pct, &stats.fr, true), W_REC_FR),
        (robust_norm_baseline(inv_residual(s, stats.fit), &stats.inv_residual, false), W_REC_RESIDUAL),
        (robust_norm_baseline(s.acidose_seconds, &stats.acid, true), W_REC_ACID),
        (robust_norm_baseline(s.time_to_65_pct, &stats.t65, true), W_REC_T65),
        (robust_norm_baseline(s.time_to_55_pct, &stats.t55, true), W_REC_T55),
        (relative, W_REC_REL),
    ]);
    let performance = avg_present(&[
        robust_norm_baseline(s.max_speed, &stats.top, false),
        robust_norm_baseline(s.last.m400, &stats.l400, true),
    ]);
    let locomotion = avg_present(&[
        robust_norm_baseline(s.max_acceleration, &stats.accel, false),
        robust_norm_baseline(s.stride_length, &stats.stride, false),
    ]);

    let trial = s.is_trial();
    let (w_r, w_p, w_l) = context_weights(trial, tag);
    let mut composite = weighted_sum(&[(recovery, w_r), (performance, w_p), (locomotion, w_l)]);

    if !trial && tag == IntensityTag::Hard && recovery.is_some_and(|r| r < HARD_FLOOR_RECOVERY) {
        composite = Some(composite.unwrap_or(0.0).min(HARD_FLOOR_CAP));
    }

    BatchBlocks { recovery, performance, locomotion, composite, is_trial: trial, intensity: Some(tag) }
}

/// Minste antall endelige composites før batchen kan reskaleres.
pub const RESCALE_MIN_COMPOSITES: usize = 2;

/// Reskalerer hele batchen mot egen p10/p90 og ganger med 10 (én desimal).
/// Uten spredning (p90 ≤ p10) finnes ingen rangering: alle blir `None`.
pub fn batch_rescale(composites: &[Option<f64>]) -> Vec<Option<f64>> {
    let finite: Vec<f64> = composites.iter().flatten().copied().filter(|c| c.is_finite()).collect();
    let b = Baseline::of(&finite);
    let spread = matches!((b.p10, b.p90), (Some(lo), Some(hi)) if hi > lo);
    if finite.len() < RESCALE_MIN_COMPOSITES || !spread {
        return vec![None; composites.len()];
    }
    composites
        .iter()
        .map(|c| robust_norm_baseline(*c, &b, false).map(|x| round1(x * 10.0)))
        .collect()
}

// ======================= Hest-relativ =======================

pub const W_PERF: f64 = 0.40;
pub const W_EFF: f64 = 0.15;
pub const W_REC: f64 = 0.45;
/// Forskyvning mot restitusjon på tung going.
pub const SLOW_SHIFT_PERF: f64 = -0.05;
pub const SLOW_SHIFT_EFF: f64 = -0.05;
pub const SLOW_SHIFT_REC: f64 = 0.10;

pub const MISMATCH_RECOVERY: f64 = 0.55;
pub const MISMATCH_GAP: f64 = -0.25;
pub const MISMATCH_GAP_SLOW: f64 = -0.35;
pub const MISMATCH_PENALTY: f64 = 0.10;
/// Aldri vist som perfekt 10.
pub const HORSE_SCALE: f64 = 9.9;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HorseBlocks {
    pub performance: Option<f64>,
    pub effort: Option<f64>,
    pub recovery: Option<f64>,
    pub composite: Option<f64>,
    pub score10: Option<f64>,
}

/// Going-justerte vekter, normalisert over blokkene som finnes.
pub fn horse_weights(going: GoingBucket, has_effort: bool) -> (f64, f64, f64) {
    let (mut wp, mut we, mut wr) = (W_PERF, W_EFF, W_REC);
    if going.is_slow() {
        wp += SLOW_SHIFT_PERF;
        we += SLOW_SHIFT_EFF;
        wr += SLOW_SHIFT_REC;
    }
    if !has_effort {
        we = 0.0;
    }
    let sum = wp + we + wr;
    (wp / sum, we / sum, wr / sum)
}

/// Straff når restitusjonen er svak og prestasjonen ligger langt under innsatsen.
pub fn mismatch_penalty(perf: f64, effort: Option<f64>, rec: f64, going: GoingBucket) -> f64 {
    let gap = if going.is_slow() { MISMATCH_GAP_SLOW } else { MISMATCH_GAP };
    match effort {
        Some(eff) if rec < MISMATCH_RECOVERY && perf - eff < gap => MISMATCH_PENALTY,
        _ => 0.0,
    }
}

/// Vektet blanding av blokkene (0–1), før skalering til 9.9.
pub fn horse_composite(perf: f64, effort: Option<f64>, rec: f64, going: GoingBucket) -> f64 {
    let (wp, we, wr) = horse_weights(going, effort.is_some());
    let value = wp * perf + we * effort.unwrap_or(0.0) + wr * rec;
    (value - mismatch_penalty(perf, effort, rec, going)).max(0.0)
}

/// `pool`: samme hest/going/belastning (historikk). `cohort`: samme hest/going.
/// `fr`: faktisk eller kalibrert FR %.
pub fn horse_relative(s: &Session, pool: &[&Session], cohort: &[&Session], fr: Option<f64>) -> HorseBlocks {
    let going = going_bucket(s.track_condition.as_deref());
    let pb = |f: fn(&Session) -> Option<f64>| Baseline::of_metric(pool.iter().copied(), f);
    let cb = |f: fn(&Session) -> Option<f64>| Baseline::of_metric(cohort.iter().copied(), f);

    let performance = avg_present(&[
        robust_norm_baseline(s.max_speed, &pb(|p| p.max_speed), false),
        robust_norm_baseline(s.last.m400, &pb(|p| p.last.m400), true),
        robust_norm_baseline(s.last.m600, &pb(|p| p.last.m600), true),
        robust_norm_baseline(s.best.m200, &pb(|p| p.best.m200), true),
    ]);
    let effort = avg_present(&[
        robust_norm_baseline(s.zone5_duration(), &cb(|p| p.zone5_duration()), false),
        robust_norm_baseline(s.zone4_duration(), &cb(|p| p.zone4_duration()), false),
        robust_norm_baseline(s.gallop_distance, &cb(|p| p.gallop_distance), false),
    ]);
    let recovery = avg_present(&[
        relative_time_score(s, pool, going),
        piecewise(fr, FR_CURVE),
        piecewise(s.hr15_pct, HR15_CURVE),
        piecewise(s.acidose_seconds, ACID_CURVE),
    ]);

    let (Some(perf), Some(rec)) = (performance, recovery) else {
        return HorseBlocks { performance, effort, recovery, ..Default::default() };
    };

    let composite = horse_composite(perf, effort, rec, going);
    HorseBlocks {
        performance,
        effort,
        recovery,
        composite: Some(composite),
        score10: Some(round1(composite * HORSE_SCALE)),
    }
}

// ======================= Enkeltøkt =======================

pub const W_HR5: f64 = 0.40;
pub const W_HR10: f64 = 0.30;
pub const W_HR15: f64 = 0.20;
pub const W_FR: f64 = 0.10;
pub const HANDLING_MIN_INPUTS: usize = 3;
pub const HANDLING_MAX: f64 = 9.5;
pub const PERF_MAX: f64 = 9.5;

/// Trend for HR5/HR10/HR15/FR mot sammenlignbare historiske økter.
pub fn handling_trend(
    s: &Session,
    fr: Option<f64>,
    history: &[&Session],
    past: &PastAverages,
    effort: EffortLevel,
) -> TrendResult {
    let effort_of = |h: &Session| effort_detail(h, past, None).level;
    let metrics: [(Option<f64>, fn(&Session) -> Option<f64>); 4] = [
        (s.hr5_pct, |h| h.hr5_pct),
        (s.hr10_pct, |h| h.hr10_pct),
        (s.hr15_pct, |h| h.hr15_pct),
        (fr, |h| h.fast_recovery_pct),
    ];
    let inputs: Vec<_> = metrics
        .iter()
        .filter(|(v, _)| v.is_some_and(f64::is_finite))
        .map(|(v, sel)| {
            let (set, scope) = comparable_set(s, effort, history, sel, &effort_of);
            (*v, set, scope)
        })
        .collect();
    trend_adjustment(&inputs)
}

/// Handling 0–9.5: krever minst tre av HR5/HR10/HR15/FR.
pub fn handling_score(s: &Session, fr: Option<f64>, past: &PastAverages, trend: &TrendResult) -> Option<f64> {
    let inputs = [s.hr5_pct, s.hr10_pct, s.hr15_pct, fr];
    let present = inputs.iter().filter(|v| v.is_some_and(f64::is_finite)).count();
    if present < HANDLING_MIN_INPUTS {
        return None;
    }

    let (allow, _) = allowance_pp(s, past);
    let parts = [
        (curve_score10(s.hr5_pct, allow, HR5_CURVE), W_HR5),
        (curve_score10(s.hr10_pct, allow, HR10_CURVE), W_HR10),
        (curve_score10(s.hr15_pct, allow, HR15_CURVE), W_HR15),
        (curve_score10(fr, allow, FR_CURVE), W_FR),
    ];
    let w_sum: f64 = parts.iter().filter(|(v, _)| v.is_some()).map(|(_, w)| w).sum();
    if w_sum <= 0.0 {
        return None;
    }
    let base: f64 = parts.iter().filter_map(|(v, w)| v.map(|x| x * w / w_sum)).sum();

    let total = base + trend.adjustment + acidosis_adjustment(s.acidose_seconds);
    Some(round1(total.clamp(0.0, HANDLING_MAX)))
}

fn step4(x: f64, t: [f64; 3], ascending: bool) -> f64 {
    let hit = |lim: f64| if ascending { x >= lim } else { x <= lim };
    if hit(t[0]) {
        9.0
    } else if hit(t[1]) {
        8.0
    } else if hit(t[2]) {
        6.0
    } else {
        4.0
    }
}

fn nonzero(x: Option<f64>) -> Option<f64> {
    x.filter(|v| v.is_finite() && *v != 0.0)
}

/// Performance 0–9.5 mot egen historikk (samme underlag når mulig).
pub fn performance_score(s: &Session, history: &[&Session]) -> Option<f64> {
    let footing = footing_key(s);
    let same: Vec<&Session> = history.iter().copied().filter(|h| footing_key(h) == footing).collect();
    let pool: &[&Session] = if same.is_empty() { history } else { &same };
    let avg = |f: fn(&Session) -> Option<f64>| {
        let vals: Vec<f64> = pool.iter().filter_map(|h| f(h)).collect();
        mean(&vals)
    };

    let mut subs: Vec<f64> = Vec::new();
    if let (Some(l4), Some(p4)) = (nonzero(s.last.m400), nonzero(avg(|h| h.last.m400))) {
        subs.push((5.0 + (p4 - l4)).clamp(0.0, 10.0));
    }
    if let (Some(l6), Some(p6)) = (nonzero(s.last.m600), nonzero(avg(|h| h.last.m600))) {
        subs.push((5.0 + 0.8 * (p6 - l6)).clamp(0.0, 10.0));
    }
    if let (Some(top), Some(pt)) = (nonzero(s.max_speed), nonzero(avg(|h| h.max_speed))) {
        subs.push((5.0 + (top - pt)).clamp(0.0, 10.0));
    }
    if let Some(b2) = nonzero(s.best.m200) {
        subs.push(step4(b2, [11.0, 12.0, 13.0], false));
    }
    if let Some(b6) = nonzero(s.best.m600) {
        subs.push(step4(b6, [34.0, 36.0, 38.0], false));
    }
    let (z4, z5) = (nonzero(s.zone4_duration()), nonzero(s.zone5_duration()));
    if z4.is_some() || z5.is_some() {
        let total_mins = z4.unwrap_or(0.0) / 60.0 + 1.5 * z5.unwrap_or(0.0) / 60.0;
        subs.push(step4(total_mins, [6.0, 4.0, 2.0], true));
    }
    if let Some(d) = nonzero(s.gallop_distance) {
        subs.push(step4(d, [2000.0, 1600.0, 1200.0], true));
    }

    let avg_sub = mean(&subs)?;
    Some(round1(avg_sub.min(PERF_MAX)))
}

/// Diagnose-flagg for begrunnelsesteksten.
pub fn diagnostics(
    recovery: Option<f64>,
    performance: Option<f64>,
    trial: bool,
    intensity: Option<IntensityTag>,
    going: GoingBucket,
) -> crate::types::Diagnostics {
    crate::types::Diagnostics {
        is_trial: trial,
        intensity,
        poor_recovery: recovery.is_some_and(|r| r < POOR_RECOVERY),
        strong_perf: performance.is_some_and(|p| p >= STRONG_PERF),
        missing_recovery: recovery.is_none(),
        slow_going: going.is_slow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horse_weights_sum_to_one() {
        for going in [GoingBucket::Good, GoingBucket::Slow] {
            for eff in [true, false] {
                let (a, b, c) = horse_weights(going, eff);
                assert!((a + b + c - 1.0).abs() < 1e-12);
            }
        }
        let (p, _, r) = horse_weights(GoingBucket::Slow, true);
        assert!((p - 0.35).abs() < 1e-12 && (r - 0.55).abs() < 1e-12);
    }

    #[test]
    fn mismatch_penalty_when_recovery_weak_and_perf_lags_effort() {
        let c = horse_composite(0.0, Some(1.0), 0.281, GoingBucket::Good);
        // 0.40·0 + 0.15·1 + 0.45·0.281 − 0.10
        assert!((c - 0.17645).abs() < 1e-9, "{c}");
        assert_eq!(mismatch_penalty(0.0, None, 0.281, GoingBucket::Good), 0.0);
    }

    #[test]
    fn slow_going_widens_the_mismatch_gap() {
        // perf − eff = −0.30: under −0.25, men ikke under −0.35
        assert_eq!(mismatch_penalty(0.5, Some(0.8), 0.4, GoingBucket::Good), MISMATCH_PENALTY);
        assert_eq!(mismatch_penalty(0.5, Some(0.8), 0.4, GoingBucket::Slow), 0.0);
        assert_eq!(mismatch_penalty(0.4, Some(0.8), 0.4, GoingBucket::Slow), MISMATCH_PENALTY);
    }

    #[test]
    fn no_mismatch_penalty_once_recovery_holds() {
        assert_eq!(mismatch_penalty(0.0, Some(1.0), MISMATCH_RECOVERY, GoingBucket::Good), 0.0);
        assert_eq!(mismatch_penalty(0.0, Some(1.0), 0.549, GoingBucket::Good), MISMATCH_PENALTY);
        let c = horse_composite(0.0, Some(1.0), 0.0, GoingBucket::Good);
        assert!(c >= 0.0);
    }

    #[test]
    fn horse_relative_best_ever_tops_out_at_ceiling() {
        let pool: Vec<Session> = (0..5)
            .map(|i| {
                let k = i as f64;
                let mut s = Session {
                    max_speed: Some(55.0 + k),
                    time_to_65_pct: Some(100.0 + 5.0 * k),
                    time_to_55_pct: Some(150.0 + 5.0 * k),
                    gallop_distance: Some(1200.0 + 100.0 * k),
                    ..Default::default()
                };
                s.last.m400 = Some(25.0 + 0.5 * k);
                s.last.m600 = Some(38.0 + k);
                s.best.m200 = Some(12.0 + 0.2 * k);
                s.zones[3].duration_seconds = Some(100.0 + 10.0 * k);
                s.zones[4].duration_seconds = Some(60.0 + 10.0 * k);
                s
            })
            .collect();
        let refs: Vec<&Session> = pool.iter().collect();

        let mut best = Session {
            max_speed: Some(70.0),
            time_to_65_pct: Some(50.0),
            time_to_55_pct: Some(80.0),
            gallop_distance: Some(3000.0),
            hr15_pct: Some(30.0),
            acidose_seconds: Some(20.0),
            ..Default::default()
        };
        best.last.m400 = Some(20.0);
        best.last.m600 = Some(30.0);
        best.best.m200 = Some(10.0);
        best.zones[3].duration_seconds = Some(500.0);
        best.zones[4].duration_seconds = Some(500.0);

        let h = horse_relative(&best, &refs, &refs, Some(30.0));
        assert_eq!((h.performance, h.effort, h.recovery), (Some(1.0), Some(1.0), Some(1.0)));
        assert!(h.composite.is_some_and(|c| c <= 1.0 + 1e-12));
        assert_eq!(h.score10, Some(HORSE_SCALE));
    }

    #[test]
    fn hard_floor_caps_composite() {
        let s = Session { hr15_pct: Some(60.0), max_speed: Some(62.0), ..Default::default() };
        let stats = BatchCohortStats {
            hr15: Baseline::of(&[40.0, 50.0]),
            top: Baseline::of(&[55.0, 60.0]),
            ..Default::default()
        };
        let b = batch_blocks(&s, &stats, IntensityTag::Hard, None);
        assert_eq!(b.recovery, Some(0.0));
        assert!(b.composite.unwrap() <= HARD_FLOOR_CAP);
    }

    #[test]
    fn rescale_without_spread_is_unscored() {
        assert_eq!(batch_rescale(&[Some(0.4), Some(0.4), None]), vec![None, None, None]);
        assert_eq!(batch_rescale(&[Some(0.7)]), vec![None]);
        assert!(batch_rescale(&[]).is_empty());
    }

    #[test]
    fn rescale_spreads_over_zero_to_ten() {
        let out = batch_rescale(&[Some(0.2), Some(0.5), Some(0.8), None]);
        assert_eq!(out[0], Some(0.0));
        assert_eq!(out[2], Some(10.0));
        assert_eq!(out[3], None);
        assert!(out[1].is_some_and(|v| v > 0.0 && v < 10.0));
    }

    #[test]
    fn handling_needs_three_inputs() {
        let past = PastAverages::default();
        let t = TrendResult::default();
        let two = Session { hr5_pct: Some(40.0), hr10_pct: Some(35.0), ..Default::default() };
        assert_eq!(handling_score(&two, None, &past, &t), None);
        let three = Session { hr15_pct: Some(30.0), ..two };
        let h = handling_score(&three, None, &past, &t).unwrap();
        assert!((0.0..=HANDLING_MAX).contains(&h));
    }

    #[test]
    fn nonzero_keeps_negatives_drops_zero() {
        assert_eq!(nonzero(Some(-1.5)), Some(-1.5));
        assert_eq!(nonzero(Some(0.0)), None);
        assert_eq!(nonzero(Some(f64::NAN)), None);
        assert_eq!(nonzero(None), None);
    }

    #[test]
    fn performance_thresholds() {
        let mut s = Session { gallop_distance: Some(2100.0), ..Default::default() };
        s.best.m200 = Some(11.5);
        assert_eq!(performance_score(&s, &[]), Some(8.5));
        assert_eq!(performance_score(&Session::default(), &[]), None);
    }
}

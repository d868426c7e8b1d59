// core/src/engine.rs
//
// Ett scoringspass: (1) samle statistikk for hele samlingen, (2) score hver
// økt. Ingen tilstand overlever kallet; samme input gir samme output
// uavhengig av radrekkefølge.
use std::collections::{BTreeMap, HashMap};

use log::{debug, info};
use serde_json::Value;

use crate::alerts::{health_alert, performance_explainer, underperformance};
use crate::bucketing::{batch_intensity_tag, footing_key, going_bucket, intensity_bucket};
use crate::calibration::{effort_detail, fit_fr_calibration, EffortDetail, PastAverages};
use crate::classify::{classify, recovery_band_55, recovery_band_65};
use crate::cohort::{batch_cohort_key, horse_going_key, Chronology};
use crate::composite::{
    batch_blocks, batch_rescale, diagnostics, handling_score, handling_trend, horse_relative,
    performance_score, relative_time_score, BatchCohortStats,
};
use crate::error::{EquiscoreError, Result};
use crate::ingest::{sessions_from_records, RawRecord};
use crate::models::Session;
use crate::types::{DerivedScores, PassSummary, ScoredSession, ScoringMode};

/// Fase 1-data per økt.
struct Gathered<'a> {
    history: Vec<&'a Session>,
    past: PastAverages,
    effort: EffortDetail,
}

impl<'a> Gathered<'a> {
    fn of(chron: &Chronology<'a>, s: &Session) -> Self {
        let history = chron.history(s);
        let past = PastAverages::of(&history);
        let calibration = fit_fr_calibration(s, &history, &past);
        let effort = effort_detail(s, &past, calibration.as_ref());
        Self { history, past, effort }
    }

    /// Faktisk FR %, ellers kalibrert estimat.
    fn fr_used(&self, s: &Session) -> Option<f64> {
        s.fast_recovery_pct.filter(|v| v.is_finite()).or(self.effort.fr_calc_pct)
    }
}

fn base_derived(mode: ScoringMode, s: &Session, g: &Gathered<'_>) -> DerivedScores {
    let unscored = classify(None, &Default::default());
    DerivedScores {
        mode,
        cohort: None,
        intensity_bucket: intensity_bucket(s),
        going: going_bucket(s.track_condition.as_deref()).as_str().to_string(),
        footing: footing_key(s),
        recovery_block: None,
        performance_block: None,
        locomotion_block: None,
        effort_block: None,
        composite: None,
        score10: None,
        handling_score: None,
        performance_score: None,
        performance_explainer: None,
        trend: None,
        phase: unscored.phase,
        color: unscored.color,
        reason: unscored.reason,
        diagnostics: Default::default(),
        intensity_score: g.effort.score,
        effort_level: g.effort.level,
        effort_source: g.effort.source,
        fr_calc_pct: g.effort.fr_calc_pct,
        calibration: g.effort.calibration.clone(),
        recovery_band_65: recovery_band_65(s.time_to_65_pct),
        recovery_band_55: recovery_band_55(s.time_to_55_pct),
        health_alert: None,
        alerts: underperformance(s, &g.history),
    }
}

fn score_batch(
    sessions: &[Session],
    chron: &Chronology<'_>,
    gathered: &[Gathered<'_>],
) -> Vec<DerivedScores> {
    // kanonisk rekkefølge innad i hver kohort, uavhengig av radrekkefølgen i input
    let mut members_of: BTreeMap<String, Vec<&Session>> = BTreeMap::new();
    for s in chron.ordered() {
        members_of.entry(batch_cohort_key(s)).or_default().push(*s);
    }
    let stats: HashMap<&str, BatchCohortStats> = members_of
        .iter()
        .map(|(key, members)| (key.as_str(), BatchCohortStats::gather(key.clone(), members)))
        .collect();

    let mut out: Vec<DerivedScores> = Vec::with_capacity(sessions.len());
    for (s, g) in sessions.iter().zip(gathered) {
        let key = batch_cohort_key(s);
        let mut d = base_derived(ScoringMode::Batch, s, g);
        let going = going_bucket(s.track_condition.as_deref());
        if let (Some(st), Some(members)) = (stats.get(key.as_str()), members_of.get(&key)) {
            let pool = chron.comparison_pool(s);
            let rel = relative_time_score(s, &pool, going);
            let b = batch_blocks(s, st, batch_intensity_tag(s), rel);
            d.recovery_block = b.recovery;
            d.performance_block = b.performance;
            d.locomotion_block = b.locomotion;
            d.composite = b.composite;
            d.diagnostics = diagnostics(b.recovery, b.performance, b.is_trial, b.intensity, going);
            d.health_alert = health_alert(s, members).map(str::to_string);
        }
        d.cohort = Some(key);
        out.push(d);
    }

    // fase 2b: reskalering over hele batchen
    let composites: Vec<Option<f64>> = out.iter().map(|d| d.composite).collect();
    for (d, score) in out.iter_mut().zip(batch_rescale(&composites)) {
        d.score10 = score;
        let c = classify(score, &d.diagnostics);
        d.set_classification(c);
    }
    out
}

fn score_horse_relative(
    sessions: &[Session],
    chron: &Chronology<'_>,
    gathered: &[Gathered<'_>],
) -> Vec<DerivedScores> {
    sessions
        .iter()
        .zip(gathered)
        .map(|(s, g)| {
            let mut d = base_derived(ScoringMode::HorseRelative, s, g);
            let pool = chron.comparison_pool(s);
            let cohort = chron.going_cohort(s);
            let going = going_bucket(s.track_condition.as_deref());
            let h = horse_relative(s, &pool, &cohort, g.fr_used(s));
            d.cohort = Some(horse_going_key(s));
            d.performance_block = h.performance;
            d.effort_block = h.effort;
            d.recovery_block = h.recovery;
            d.composite = h.composite;
            d.score10 = h.score10;
            d.diagnostics = diagnostics(h.recovery, h.performance, s.is_trial(), None, going);
            let c = classify(h.score10, &d.diagnostics);
            d.set_classification(c);
            d
        })
        .collect()
}

fn score_single(sessions: &[Session], gathered: &[Gathered<'_>]) -> Vec<DerivedScores> {
    sessions
        .iter()
        .zip(gathered)
        .map(|(s, g)| {
            let mut d = base_derived(ScoringMode::SingleSession, s, g);
            let fr = g.fr_used(s);
            let going = going_bucket(s.track_condition.as_deref());
            let trend = handling_trend(s, fr, &g.history, &g.past, g.effort.level);
            d.handling_score = handling_score(s, fr, &g.past, &trend);
            d.performance_score = performance_score(s, &g.history);
            d.performance_explainer = Some(performance_explainer(s, &g.history));
            d.trend = Some(trend);
            d.diagnostics = diagnostics(
                d.handling_score.map(|h| h / 10.0),
                d.performance_score.map(|p| p / 10.0),
                s.is_trial(),
                None,
                going,
            );
            let c = classify(d.handling_score, &d.diagnostics);
            d.set_classification(c);
            d
        })
        .collect()
}

/// Full batch-beregning over hele samlingen for valgt modus.
pub fn score_sessions(sessions: &[Session], mode: ScoringMode) -> Vec<ScoredSession> {
    // fase 1: historikk, snitt og kalibrering for hver økt
    let chron = Chronology::new(sessions);
    let gathered: Vec<Gathered<'_>> = sessions.iter().map(|s| Gathered::of(&chron, s)).collect();
    debug!("scoringspass ({mode}): {} økter samlet", sessions.len());

    let derived = match mode {
        ScoringMode::Batch => score_batch(sessions, &chron, &gathered),
        ScoringMode::HorseRelative => score_horse_relative(sessions, &chron, &gathered),
        ScoringMode::SingleSession => score_single(sessions, &gathered),
    };

    let scored: Vec<ScoredSession> = sessions
        .iter()
        .cloned()
        .zip(derived)
        .map(|(session, derived)| ScoredSession { session, derived })
        .collect();

    let summary = PassSummary::of(&scored);
    info!(
        "scoringspass ({mode}) ferdig: {} økter, {} scoret, {} med for lite data",
        summary.total, summary.scored, summary.insufficient
    );
    scored
}

/// Rå rader inn → typede økter → scoring.
pub fn score_records(records: &[RawRecord], mode: ScoringMode) -> Vec<ScoredSession> {
    score_sessions(&sessions_from_records(records), mode)
}

/// Samme liste tilbake, hver rad utvidet med de avledede feltene.
pub fn annotate_records(records: &[RawRecord], mode: ScoringMode) -> Result<Vec<RawRecord>> {
    let scored = score_records(records, mode);
    records
        .iter()
        .zip(&scored)
        .enumerate()
        .map(|(i, (rec, sc))| {
            let mut out = rec.clone();
            let derived = serde_json::to_value(&sc.derived).map_err(|source| EquiscoreError::Json {
                path: format!("[{i}]"),
                source,
            })?;
            if let Value::Object(fields) = derived {
                out.extend(fields);
            }
            Ok(out)
        })
        .collect()
}

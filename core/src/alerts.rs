// core/src/alerts.rs
//
// Varsler som vises ved siden av scoren, men aldri endrer den.
use crate::baseline::{mean, median};
use crate::bucketing::{footing_key, surface_bucket};
use crate::models::Session;
use crate::types::{Alert, Severity, UnderperformanceReport};

pub const HEALTH_ALERT_TEXT: &str =
    "Possible red flag: slower recovery with reduced acceleration — review horse/conditions.";

pub const STRIDE_HISTORY: usize = 4;

/// Batch: HR15 over kohortmedianen samtidig med akselerasjon under medianen.
pub fn health_alert(s: &Session, cohort: &[&Session]) -> Option<&'static str> {
    let hr15s: Vec<f64> = cohort.iter().filter_map(|c| c.hr15_pct).collect();
    let accels: Vec<f64> = cohort.iter().filter_map(|c| c.max_acceleration).collect();
    let (hr15_med, accel_med) = (median(&hr15s)?, median(&accels)?);
    let (hr15, accel) = (s.hr15_pct?, s.max_acceleration?);
    (hr15 > hr15_med && accel < accel_med).then_some(HEALTH_ALERT_TEXT)
}

/// Forventet skrittlengde @60 km/t: snitt av inntil fire nyeste økter på samme underlag.
pub fn expected_stride_60(s: &Session, history: &[&Session]) -> Option<f64> {
    let surface = surface_bucket(s.surface.as_deref());
    let past: Vec<f64> = history
        .iter()
        .filter(|h| surface_bucket(h.surface.as_deref()) == surface)
        .filter_map(|h| h.stride_length_60.filter(|v| v.is_finite()))
        .take(STRIDE_HISTORY)
        .collect();
    mean(&past)
}

fn push(list: &mut Vec<Alert>, severity: Severity, message: String) {
    list.push(Alert { severity, message });
}

pub fn underperformance(s: &Session, history: &[&Session]) -> UnderperformanceReport {
    let mut report = UnderperformanceReport::default();
    let (under, pos) = (&mut report.underperformance, &mut report.positive);

    if let Some(fr) = s.fast_recovery_pct.filter(|v| v.is_finite()) {
        if fr > 65.0 {
            push(under, Severity::Red, format!(
                "Fast Recovery above target: {fr}% (Target < 60%) – indicates high intensity of effort felt"
            ));
        } else if fr > 60.0 {
            push(under, Severity::Orange, format!("Fast Recovery slightly high: {fr}% (Target < 60%)"));
        } else {
            push(pos, Severity::Green, format!(
                "Fast Recovery within target: {fr}% (< 60%) – low intensity of effort felt"
            ));
        }
    }

    if let Some(hr15) = s.hr15_pct.filter(|v| v.is_finite()) {
        if hr15 > 50.0 {
            push(under, Severity::Red, format!("HR after 15 min still high: {hr15}% (Target < 45%)"));
        } else if hr15 > 45.0 {
            push(under, Severity::Orange, format!("HR after 15 min slightly elevated: {hr15}% (Target < 45%)"));
        } else {
            push(pos, Severity::Green, format!("HR after 15 min within target: {hr15}% (< 45%)"));
        }
    }

    let expected = expected_stride_60(s, history);
    report.expected_stride_60 = expected.map(|e| (e * 100.0).round() / 100.0);
    if let (Some(stride), Some(exp)) = (s.stride_length_60.filter(|v| v.is_finite()), report.expected_stride_60) {
        let diff = stride - exp;
        let tail = format!("{stride}m (Expected: {exp}m)");
        if diff.abs() < 0.2 {
            push(pos, Severity::Green, format!("Stride Length at 60 km/h within expected range: {tail}"));
        } else if diff < -0.4 {
            push(under, Severity::Red, format!("Stride Length below expected: {tail}"));
        } else if diff < -0.35 {
            push(under, Severity::Orange, format!("Stride Length slightly below expected: {tail}"));
        } else if diff < -0.2 {
            push(under, Severity::Yellow, format!("Stride Length marginally below expected: {tail}"));
        } else if diff > 0.2 {
            push(pos, Severity::Green, format!("Stride Length exceeds expected: {tail}"));
        }
    }
    report
}

/// Kort forklaring av enkeltøkt-Performance, "·"-separert.
pub fn performance_explainer(s: &Session, history: &[&Session]) -> String {
    let footing = footing_key(s);
    let same: Vec<&Session> = history.iter().copied().filter(|h| footing_key(h) == footing).collect();
    let pool: &[&Session] = if same.is_empty() { history } else { &same };
    let avg = |f: fn(&Session) -> Option<f64>| {
        let vals: Vec<f64> = pool.iter().filter_map(|h| f(h)).collect();
        mean(&vals)
    };

    let mut bits: Vec<String> = Vec::new();
    if let (Some(l4), Some(a4)) = (s.last.m400, avg(|h| h.last.m400)) {
        let d = a4 - l4;
        if d >= 0.4 {
            bits.push("strong last 400m".into());
        } else if d >= 0.1 {
            bits.push("last 400m quicker than usual".into());
        } else if d <= -0.4 {
            bits.push("last 400m below usual".into());
        }
    }
    if let (Some(l6), Some(a6)) = (s.last.m600, avg(|h| h.last.m600)) {
        let d = a6 - l6;
        if d >= 0.6 {
            bits.push("home strong last 600m".into());
        } else if d <= -0.6 {
            bits.push("last 600m slower than usual".into());
        }
    }
    if s.best.m200.is_some_and(|b| b <= 12.0) {
        bits.push("sharp 200m split".into());
    }
    if let (Some(top), Some(at)) = (s.max_speed, avg(|h| h.max_speed)) {
        let d = top - at;
        if d >= 1.0 {
            bits.push(format!("top speed ↑ ({top:.1} km/h)"));
        } else if d <= -1.0 {
            bits.push("top speed below usual".into());
        }
    }
    if let Some(z5) = s.zone5_duration() {
        let min5 = z5 / 60.0;
        if min5 >= 3.0 {
            bits.push("good Zone 5 exposure".into());
        } else if min5 < 1.0 {
            bits.push("limited Zone 5".into());
        }
    }
    if let Some(dist) = s.gallop_distance {
        if dist >= 2000.0 {
            bits.push("solid work volume".into());
        } else if dist < 1200.0 {
            bits.push("short main work".into());
        }
    }
    let footing_txt = footing
        .replace("unknown:", "")
        .replace(":unknown", "")
        .replace(':', " · ");
    if !footing_txt.is_empty() && footing_txt != "unknown" {
        bits.push(footing_txt);
    }

    if bits.is_empty() {
        "Session output in line with usual".to_string()
    } else {
        bits.join(" · ")
    }
}

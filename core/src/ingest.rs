// core/src/ingest.rs
//
// Rå rad (feltnavn → verdi) → typet `Session`. Kjøres én gang ved inntak;
// scoring ser aldri visningsstrenger.
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;
use serde_json::{Map, Value};

use crate::fields::{self, Field, FieldKind};
use crate::models::{Session, ZoneStat};
use crate::normalize::{parse_number, parse_time_to_seconds};

pub type RawRecord = Map<String, Value>;

/// Streng DD/MM/YYYY (eller DD-MM-YYYY) med valgfri HH:MM, ellers ISO.
/// Ugyldige kalenderdatoer gir `None`.
pub fn parse_date_loose(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.is_empty() {
        return None;
    }

    // ISO først (kun med firesifret år): 2024-03-05, 2024-03-05T06:30[:00]
    let iso = s.len() >= 10 && s.as_bytes()[..4].iter().all(u8::is_ascii_digit) && s.as_bytes()[4] == b'-';
    if iso {
        return parse_iso(&s);
    }

    let (date_part, time_part) = match s.split_once(' ') {
        Some((d, t)) => (d, Some(t)),
        None => (s.as_str(), None),
    };
    let pieces: Vec<&str> = date_part.split(|c| c == '/' || c == '-').collect();
    let [dd, mm, yyyy] = pieces.as_slice() else { return None };
    if ![dd, mm, yyyy].iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    let year: i32 = match yyyy.len() {
        2 => 2000 + yyyy.parse::<i32>().ok()?,
        4 => yyyy.parse().ok()?,
        _ => return None,
    };
    let date = NaiveDate::from_ymd_opt(year, mm.parse().ok()?, dd.parse().ok()?)?;

    let time = match time_part {
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
        Some(t) => {
            let (h, m) = t.split_once(':')?;
            NaiveTime::from_hms_opt(h.trim().parse().ok()?, m.trim().parse().ok()?, 0)?
        }
    };
    Some(NaiveDateTime::new(date, time))
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

fn text_of(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => s.split_whitespace().collect::<Vec<_>>().join(" "),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}

fn value_of(field: Field, v: &Value) -> Option<f64> {
    let parsed = match field.kind() {
        FieldKind::Time => parse_time_to_seconds(v),
        FieldKind::Number => parse_number(v),
        FieldKind::Text | FieldKind::Date => return None,
    };
    if parsed.is_none() {
        // ParseFailure: alltid null, aldri feil
        warn!("kunne ikke tolke {:?} = {} – behandles som manglende", field, v);
    }
    parsed
}

/// Bygger en `Session` fra en rå rad. Totalt: feiltolkede felt blir `None`.
pub fn session_from_record(record: &RawRecord) -> Session {
    let resolved: HashMap<Field, &Value> = fields::resolve(record);
    let num = |f: Field| resolved.get(&f).and_then(|v| value_of(f, v));
    let text = |f: Field| resolved.get(&f).and_then(|v| text_of(v));

    let date = resolved.get(&Field::Date).and_then(|v| match v {
        Value::String(s) => parse_date_loose(s),
        _ => None,
    });

    let zone = |d: Field, m: Field| ZoneStat {
        duration_seconds: num(d),
        distance_meters: num(m),
    };

    let mut s = Session {
        horse: text(Field::Horse),
        date,
        training_type: text(Field::TrainingType),
        track_condition: text(Field::TrackCondition),
        surface: text(Field::Surface),
        hr3_pct: num(Field::Hr3Pct),
        hr5_pct: num(Field::Hr5Pct),
        hr10_pct: num(Field::Hr10Pct),
        hr15_pct: num(Field::Hr15Pct),
        fast_recovery_pct: num(Field::FastRecoveryPct),
        acidose_seconds: num(Field::AcidoseSeconds),
        time_to_65_pct: num(Field::TimeTo65Pct),
        time_to_55_pct: num(Field::TimeTo55Pct),
        max_speed: num(Field::MaxSpeed),
        max_hr: num(Field::MaxHr),
        max_acceleration: num(Field::MaxAcceleration),
        zones: [
            zone(Field::Zone1Duration, Field::Zone1Distance),
            zone(Field::Zone2Duration, Field::Zone2Distance),
            zone(Field::Zone3Duration, Field::Zone3Distance),
            zone(Field::Zone4Duration, Field::Zone4Distance),
            zone(Field::Zone5Duration, Field::Zone5Distance),
        ],
        gallop_distance: num(Field::GallopDistance),
        stride_length: num(Field::StrideLength),
        stride_frequency: num(Field::StrideFrequency),
        stride_length_60: num(Field::StrideLength60),
        ..Default::default()
    };
    s.last.m800 = num(Field::Last800);
    s.last.m600 = num(Field::Last600);
    s.last.m400 = num(Field::Last400);
    s.last.m200 = num(Field::Last200);
    s.best.m800 = num(Field::Best800);
    s.best.m600 = num(Field::Best600);
    s.best.m400 = num(Field::Best400);
    s.best.m200 = num(Field::Best200);
    s
}

pub fn sessions_from_records(records: &[RawRecord]) -> Vec<Session> {
    records.iter().map(session_from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn dates() {
        let d = parse_date_loose("05/03/24 06:30").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 3, 5));
        assert!(parse_date_loose("31/02/2024").is_none());
        assert!(parse_date_loose("2024-03-05").is_some());
        assert!(parse_date_loose("yesterday").is_none());
    }

    #[test]
    fn record_to_session() {
        let rec = json!({
            "Horse": "  Blue   Moon ",
            "Date": "12-04-2024",
            "Track condition": "Good to Soft",
            "Fast Recovery in % of max HR": "47,5%",
            "Time last 600m": "0:38.2",
            "Duration effort zone 5": "2:10",
            "Max Speed": "n/a",
        });
        let s = session_from_record(rec.as_object().unwrap());
        assert_eq!(s.horse.as_deref(), Some("Blue Moon"));
        assert_eq!(s.fast_recovery_pct, Some(47.5));
        assert_eq!(s.last.m600, Some(38.2));
        assert_eq!(s.zone5_duration(), Some(130.0));
        assert_eq!(s.max_speed, None);
        assert!(s.date.is_some());
    }
}

// core/src/fields.rs
//
// Kanoniske feltnavn + ordnede alias-lister. Eksportene har brukt flere
// varianter av samme kolonne over tid; vi løser dem én gang ved inntak.
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    /// Tid i sekunder (mm:ss eller tall)
    Time,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Horse,
    Date,
    TrainingType,
    TrackCondition,
    Surface,
    Hr3Pct,
    Hr5Pct,
    Hr10Pct,
    Hr15Pct,
    FastRecoveryPct,
    AcidoseSeconds,
    TimeTo65Pct,
    TimeTo55Pct,
    Last800,
    Last600,
    Last400,
    Last200,
    Best800,
    Best600,
    Best400,
    Best200,
    MaxSpeed,
    MaxHr,
    MaxAcceleration,
    Zone1Duration,
    Zone2Duration,
    Zone3Duration,
    Zone4Duration,
    Zone5Duration,
    Zone1Distance,
    Zone2Distance,
    Zone3Distance,
    Zone4Distance,
    Zone5Distance,
    GallopDistance,
    StrideLength,
    StrideFrequency,
    StrideLength60,
}

impl Field {
    pub const ALL: [Field; 38] = [
        Field::Horse,
        Field::Date,
        Field::TrainingType,
        Field::TrackCondition,
        Field::Surface,
        Field::Hr3Pct,
        Field::Hr5Pct,
        Field::Hr10Pct,
        Field::Hr15Pct,
        Field::FastRecoveryPct,
        Field::AcidoseSeconds,
        Field::TimeTo65Pct,
        Field::TimeTo55Pct,
        Field::Last800,
        Field::Last600,
        Field::Last400,
        Field::Last200,
        Field::Best800,
        Field::Best600,
        Field::Best400,
        Field::Best200,
        Field::MaxSpeed,
        Field::MaxHr,
        Field::MaxAcceleration,
        Field::Zone1Duration,
        Field::Zone2Duration,
        Field::Zone3Duration,
        Field::Zone4Duration,
        Field::Zone5Duration,
        Field::Zone1Distance,
        Field::Zone2Distance,
        Field::Zone3Distance,
        Field::Zone4Distance,
        Field::Zone5Distance,
        Field::GallopDistance,
        Field::StrideLength,
        Field::StrideFrequency,
        Field::StrideLength60,
    ];

    pub fn kind(self) -> FieldKind {
        use Field::*;
        match self {
            Horse | TrainingType | TrackCondition | Surface => FieldKind::Text,
            Date => FieldKind::Date,
            AcidoseSeconds | TimeTo65Pct | TimeTo55Pct | Last800 | Last600 | Last400 | Last200
            | Best800 | Best600 | Best400 | Best200 | Zone1Duration | Zone2Duration
            | Zone3Duration | Zone4Duration | Zone5Duration => FieldKind::Time,
            _ => FieldKind::Number,
        }
    }

    /// Ordnet alias-liste. Første ikke-tomme treff vinner.
    /// Det kanoniske navnet står alltid først.
    pub fn aliases(self) -> &'static [&'static str] {
        use Field::*;
        match self {
            Horse => &["horse", "Horse name", "Horse Name"],
            Date => &["date", "Session date", "Session Date"],
            TrainingType => &["trainingType", "Training type"],
            TrackCondition => &["trackCondition", "Track condition", "Going", "Condition", "Ground"],
            Surface => &["surface", "Track surface", "Track Surface"],
            Hr3Pct => &["hr3Pct", "HR after 3 min in % of max HR", "HR3_pct"],
            Hr5Pct => &["hr5Pct", "HR after 5 min in % of max HR", "HR5_pct"],
            Hr10Pct => &["hr10Pct", "HR after 10 min in % of max HR", "HR10_pct"],
            Hr15Pct => &["hr15Pct", "HR after 15 min in % of max HR", "HR15_pct"],
            FastRecoveryPct => &[
                "fastRecoveryPct",
                "Fast Recovery in % of max HR",
                "Fast Recovery % MaxHR",
                "Fast Recovery",
            ],
            AcidoseSeconds => &["acidoseSeconds", "Acidose"],
            TimeTo65Pct => &["timeTo65Pct", "Time to 65 % of the max HR", "Time to 65% of the max HR"],
            TimeTo55Pct => &["timeTo55Pct", "Time to 55 % of the max HR", "Time to 55% of the max HR"],
            Last800 => &["last800", "Time last 800m"],
            Last600 => &["last600", "Time last 600m"],
            Last400 => &["last400", "Time last 400m"],
            Last200 => &["last200", "Time last 200m"],
            Best800 => &["best800", "Time best 800m"],
            Best600 => &["best600", "Time best 600m"],
            Best400 => &["best400", "Time best 400m"],
            Best200 => &["best200", "Time best 200m"],
            MaxSpeed => &["maxSpeed", "Max Speed", "Top Speed", "Maximum speed"],
            MaxHr => &["maxHr", "Max Heart Rate reached during training"],
            MaxAcceleration => &["maxAcceleration", "Highest measured acceleration"],
            Zone1Duration => &["zone1Duration", "Duration effort zone 1"],
            Zone2Duration => &["zone2Duration", "Duration effort zone 2"],
            Zone3Duration => &["zone3Duration", "Duration effort zone 3"],
            Zone4Duration => &["zone4Duration", "Duration effort zone 4"],
            Zone5Duration => &["zone5Duration", "Duration effort zone 5"],
            Zone1Distance => &["zone1Distance", "Distance effort zone 1"],
            Zone2Distance => &["zone2Distance", "Distance effort zone 2"],
            Zone3Distance => &["zone3Distance", "Distance effort zone 3"],
            Zone4Distance => &["zone4Distance", "Distance effort zone 4"],
            Zone5Distance => &["zone5Distance", "Distance effort zone 5"],
            GallopDistance => &["gallopDistance", "Gallop distance", "Distance", "Total distance"],
            StrideLength => &["strideLength", "Stride length", "Average stride length"],
            StrideFrequency => &["strideFrequency", "Stride frequency", "Average stride frequency"],
            StrideLength60 => &["strideLength60", "Stride length at 60 km/h"],
        }
    }
}

/// Header-normalisering: NBSP → mellomrom, kollaps whitespace, trim, lowercase.
pub fn normalize_header(h: &str) -> String {
    h.replace('\u{00A0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

static ALIAS_INDEX: Lazy<Vec<(Field, Vec<String>)>> = Lazy::new(|| {
    Field::ALL
        .iter()
        .map(|f| (*f, f.aliases().iter().map(|a| normalize_header(a)).collect()))
        .collect()
});

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Slår opp alle kanoniske felt i én rå rad.
pub fn resolve(record: &Map<String, Value>) -> HashMap<Field, &Value> {
    let mut by_header: HashMap<String, &Value> = HashMap::with_capacity(record.len());
    for (k, v) in record {
        if is_blank(v) {
            continue;
        }
        by_header.entry(normalize_header(k)).or_insert(v);
    }

    let mut out = HashMap::new();
    for (field, aliases) in ALIAS_INDEX.iter() {
        if let Some(v) = aliases.iter().find_map(|a| by_header.get(a)) {
            out.insert(*field, *v);
        }
    }
    out
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Tid og distanse i én innsatssone (1–5).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStat {
    pub duration_seconds: Option<f64>, // sek
    pub distance_meters: Option<f64>,  // meter
}

/// Seksjonstider (sek) for 800/600/400/200 m.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sectionals {
    pub m800: Option<f64>,
    pub m600: Option<f64>,
    pub m400: Option<f64>,
    pub m200: Option<f64>,
}

/// Én treningsøkt for én hest, ferdig tolket (alle felt kan mangle).
///
/// Økter lages én gang ved inntak og endres aldri; scoring gir nye poster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    // --- identitet ---
    pub horse: Option<String>,
    pub date: Option<NaiveDateTime>,

    // --- kontekst ---
    pub training_type: Option<String>,
    pub track_condition: Option<String>,
    pub surface: Option<String>,

    // --- restitusjon (% av maks puls) ---
    pub hr3_pct: Option<f64>,
    pub hr5_pct: Option<f64>,
    pub hr10_pct: Option<f64>,
    pub hr15_pct: Option<f64>,
    pub fast_recovery_pct: Option<f64>,
    pub acidose_seconds: Option<f64>,
    pub time_to_65_pct: Option<f64>, // sek til 65 % av maks puls
    pub time_to_55_pct: Option<f64>, // sek til 55 % av maks puls

    // --- prestasjon ---
    #[serde(default)]
    pub last: Sectionals,
    #[serde(default)]
    pub best: Sectionals,
    pub max_speed: Option<f64>, // km/t
    pub max_hr: Option<f64>,    // bpm
    pub max_acceleration: Option<f64>,

    // --- belastning ---
    #[serde(default)]
    pub zones: [ZoneStat; 5],
    pub gallop_distance: Option<f64>, // meter

    // --- bevegelse ---
    pub stride_length: Option<f64>,
    pub stride_frequency: Option<f64>,
    pub stride_length_60: Option<f64>, // skrittlengde ved 60 km/t
}

impl Session {
    /// Sone `n` (1-basert). Utenfor 1..=5 gir tom sone.
    pub fn zone(&self, n: usize) -> ZoneStat {
        if (1..=5).contains(&n) { self.zones[n - 1] } else { ZoneStat::default() }
    }

    pub fn zone5_duration(&self) -> Option<f64> {
        self.zone(5).duration_seconds
    }

    pub fn zone4_duration(&self) -> Option<f64> {
        self.zone(4).duration_seconds
    }

    /// Hestenavn normalisert for sammenligning (whitespace-kollaps + lowercase).
    pub fn horse_key(&self) -> String {
        self.horse
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn is_trial(&self) -> bool {
        self.training_type
            .as_deref()
            .map(|t| t.to_lowercase().contains("trial"))
            .unwrap_or(false)
    }
}

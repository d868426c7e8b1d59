// core/src/bucketing.rs
//
// Fritekst (going/underlag) og målinger (fart/sone 5) → små diskrete
// kategorier som brukes som grupperingsnøkler. Alle funksjonene er totale:
// manglende input gir en eksplisitt "ukjent"-bøtte, aldri `None`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Session;

/// Sone 5-grenser (sek) for intensitetsbøtta.
pub const Z1_MAX_SECS: f64 = 60.0;
pub const Z2_MAX_SECS: f64 = 180.0;
/// Toppfart-grenser (km/t).
pub const T1_BELOW_KMH: f64 = 55.0;
pub const T2_BELOW_KMH: f64 = 60.0;

/// NBSP → mellomrom, kollaps whitespace, lowercase.
pub fn norm_text(s: Option<&str>) -> String {
    s.unwrap_or("")
        .replace('\u{00A0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn has_any(t: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| t.contains(n))
}

fn has_word(t: &str, words: &[&str]) -> bool {
    t.split(|c: char| !c.is_alphanumeric()).any(|w| words.contains(&w))
}

/// "good to soft" / "good-to-soft" / "goodtosoft" → samme sammenligning.
fn has_phrase(t: &str, phrase: &str) -> bool {
    let squash = |s: &str| s.chars().filter(|c| c.is_alphanumeric()).collect::<String>();
    squash(t).contains(&squash(phrase))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoingBucket {
    Slow,
    Good,
    Firm,
    Other,
}

impl GoingBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            GoingBucket::Slow => "slow",
            GoingBucket::Good => "good",
            GoingBucket::Firm => "firm",
            GoingBucket::Other => "other",
        }
    }

    pub fn is_slow(self) -> bool {
        self == GoingBucket::Slow
    }
}

/// `goingBucket`: nøkkelord-skann i fast rekkefølge (tung/bløt vinner over "good").
pub fn going_bucket(text: Option<&str>) -> GoingBucket {
    let t = norm_text(text);
    if has_any(&t, &["heavy", "soft", "sloppy", "yield"]) {
        GoingBucket::Slow
    } else if t.contains("good") {
        GoingBucket::Good
    } else if has_any(&t, &["firm", "fast"]) {
        GoingBucket::Firm
    } else {
        GoingBucket::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceBucket {
    Sand,
    Synthetic,
    Grass,
    Unknown,
}

impl SurfaceBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceBucket::Sand => "sand",
            SurfaceBucket::Synthetic => "synthetic",
            SurfaceBucket::Grass => "grass",
            SurfaceBucket::Unknown => "unknown",
        }
    }
}

pub fn surface_bucket(text: Option<&str>) -> SurfaceBucket {
    let t = norm_text(text);
    if t.is_empty() {
        SurfaceBucket::Unknown
    } else if has_any(&t, &["sand", "dirt"]) {
        SurfaceBucket::Sand
    } else if has_any(
        &t,
        &["synthetic", "tapeta", "poly", "all weather", "awt", "fibresand", "cinders"],
    ) {
        SurfaceBucket::Synthetic
    } else {
        SurfaceBucket::Grass
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundState {
    #[serde(rename = "heavy")]
    Heavy,
    #[serde(rename = "soft")]
    Soft,
    #[serde(rename = "good-soft")]
    GoodSoft,
    #[serde(rename = "firm")]
    Firm,
    #[serde(rename = "standard")]
    Standard,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "unknown")]
    Unknown,
}

impl GroundState {
    pub fn as_str(self) -> &'static str {
        match self {
            GroundState::Heavy => "heavy",
            GroundState::Soft => "soft",
            GroundState::GoodSoft => "good-soft",
            GroundState::Firm => "firm",
            GroundState::Standard => "standard",
            GroundState::Good => "good",
            GroundState::Unknown => "unknown",
        }
    }
}

/// Mest spesifikke frase først ("good to soft" før bare "good").
pub fn ground_state_bucket(text: Option<&str>) -> GroundState {
    let t = norm_text(text);
    if t.is_empty() {
        GroundState::Unknown
    } else if t.contains("heavy") {
        GroundState::Heavy
    } else if has_phrase(&t, "good to soft") {
        GroundState::GoodSoft
    } else if t.contains("soft") {
        GroundState::Soft
    } else if has_phrase(&t, "good to firm") || t.contains("firm") {
        GroundState::Firm
    } else if has_word(&t, &["standard", "std"]) {
        GroundState::Standard
    } else if t.contains("good") {
        GroundState::Good
    } else {
        GroundState::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZoneBucket {
    Na,
    Z0,
    Z1,
    Z2,
    Z3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpeedBucket {
    NaTop,
    T1,
    T2,
    T3,
}

pub fn zone_bucket(zone5_secs: Option<f64>) -> ZoneBucket {
    match zone5_secs.filter(|z| z.is_finite()) {
        None => ZoneBucket::Na,
        Some(z) if z <= 0.0 => ZoneBucket::Z0,
        Some(z) if z <= Z1_MAX_SECS => ZoneBucket::Z1,
        Some(z) if z <= Z2_MAX_SECS => ZoneBucket::Z2,
        Some(_) => ZoneBucket::Z3,
    }
}

pub fn speed_bucket(max_speed: Option<f64>) -> SpeedBucket {
    match max_speed.filter(|v| v.is_finite()) {
        None => SpeedBucket::NaTop,
        Some(v) if v < T1_BELOW_KMH => SpeedBucket::T1,
        Some(v) if v < T2_BELOW_KMH => SpeedBucket::T2,
        Some(_) => SpeedBucket::T3,
    }
}

/// Sammensatt belastningsnøkkel, vises som `"{sone}|{fart}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntensityBucket {
    pub zone: ZoneBucket,
    pub speed: SpeedBucket,
}

impl fmt::Display for IntensityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let z = match self.zone {
            ZoneBucket::Na => "na",
            ZoneBucket::Z0 => "z0",
            ZoneBucket::Z1 => "z1",
            ZoneBucket::Z2 => "z2",
            ZoneBucket::Z3 => "z3",
        };
        let t = match self.speed {
            SpeedBucket::NaTop => "natop",
            SpeedBucket::T1 => "t1",
            SpeedBucket::T2 => "t2",
            SpeedBucket::T3 => "t3",
        };
        write!(f, "{z}|{t}")
    }
}

pub fn intensity_bucket_of(session: &Session) -> IntensityBucket {
    IntensityBucket {
        zone: zone_bucket(session.zone5_duration()),
        speed: speed_bucket(session.max_speed),
    }
}

/// `intensityBucket` i strengform.
pub fn intensity_bucket(session: &Session) -> String {
    intensity_bucket_of(session).to_string()
}

/// `"{underlag}:{grunntilstand}"`, f.eks. `"sand:standard"`.
pub fn footing_key(session: &Session) -> String {
    format!(
        "{}:{}",
        surface_bucket(session.surface.as_deref()).as_str(),
        ground_state_bucket(session.track_condition.as_deref()).as_str()
    )
}

/// Tungt underlag gir ekstra belastning (sand, "deep", bløtt eller tungt).
pub fn is_taxing_footing(session: &Session) -> bool {
    let surf_raw = norm_text(session.surface.as_deref());
    let ground = ground_state_bucket(session.track_condition.as_deref());
    surface_bucket(session.surface.as_deref()) == SurfaceBucket::Sand
        || surf_raw.contains("deep")
        || matches!(ground, GroundState::Soft | GroundState::Heavy)
}

/// Grov belastningsklasse for batch-modus (vekttabellen velges ut fra denne).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityTag {
    Maintenance,
    Solid,
    Hard,
}

pub fn batch_intensity_tag(session: &Session) -> IntensityTag {
    let b = intensity_bucket_of(session);
    if b.zone == ZoneBucket::Z3 || b.speed == SpeedBucket::T3 {
        IntensityTag::Hard
    } else if b.zone == ZoneBucket::Z2 || b.speed == SpeedBucket::T2 {
        IntensityTag::Solid
    } else {
        IntensityTag::Maintenance
    }
}

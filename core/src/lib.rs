// core/src/lib.rs
//
// Scoringsmotor for treningsøkter (hest): rå rader inn, avledede scorer ut.

pub mod normalize;
pub mod fields;
pub mod models;
pub mod ingest;

pub mod bucketing;
pub mod cohort;
pub mod baseline;
pub mod calibration;
pub mod subscores;
pub mod composite;
pub mod classify;
pub mod alerts;
pub mod engine;

pub mod types;
pub mod error;
pub mod metrics;
pub mod storage;
pub mod cli;

#[cfg(feature = "python")]
mod py;

pub use engine::{annotate_records, score_records, score_sessions};
pub use error::{EquiscoreError, Result};
pub use ingest::{session_from_record, sessions_from_records, RawRecord};
pub use models::Session;
pub use types::{DerivedScores, PassSummary, ScoredSession, ScoringMode};

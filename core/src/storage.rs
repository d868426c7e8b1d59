// core/src/storage.rs
use std::path::Path;

use log::{info, warn};
use serde_json::Value;

use crate::error::{EquiscoreError, Result};
use crate::ingest::RawRecord;

/// Tolker en JSON-liste med rader (objekter). Feil peker på JSON-stien.
pub fn parse_records(json_in: &str) -> Result<Vec<RawRecord>> {
    let mut de = serde_json::Deserializer::from_str(json_in);
    let rows: Vec<Value> = serde_path_to_error::deserialize(&mut de)?;
    rows.into_iter()
        .enumerate()
        .map(|(index, v)| match v {
            Value::Object(map) => Ok(map),
            _ => Err(EquiscoreError::NotAnObject { index }),
        })
        .collect()
}

/// Leser rader fra disk (JSON-liste).
/// Finnes ikke filen, returneres en tom samling.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("fant ikke {}, returnerer tom samling", path.display());
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)?;
    let records = parse_records(&contents)?;
    info!("lastet {} rader fra {}", records.len(), path.display());
    Ok(records)
}

/// Lagrer rader til disk som JSON (pretty-print).
pub fn save_records(records: &[RawRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(records).map_err(|source| EquiscoreError::Json {
        path: String::new(),
        source,
    })?;
    std::fs::write(path, json)?;
    info!("lagret {} rader til {}", records.len(), path.display());
    Ok(())
}

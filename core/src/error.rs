// core/src/error.rs
//
// Feil finnes kun på kanten (fil/JSON/binding). Selve scoringen er total.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EquiscoreError {
    #[error("I/O-feil: {0}")]
    Io(#[from] std::io::Error),

    #[error("ugyldig JSON ved `{path}`: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rad {index} er ikke et JSON-objekt")]
    NotAnObject { index: usize },

    #[error("ukjent scoringsmodus `{0}` (forventet batch | horse | single)")]
    UnknownMode(String),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for EquiscoreError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        EquiscoreError::Json {
            path: err.path().to_string(),
            source: err.into_inner(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EquiscoreError>;

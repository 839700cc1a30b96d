use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{phase}: cannot sample {requested} records from a pool of {available}")]
    Sampling {
        phase: &'static str,
        requested: usize,
        available: usize,
    },
    #[error("{phase}: no candidates to pick from")]
    EmptyPool { phase: &'static str },
    #[error("cannot inject a typo into an empty string")]
    EmptyInput,
    #[error("dataset error: {0}")]
    Dataset(#[from] mdmgen_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

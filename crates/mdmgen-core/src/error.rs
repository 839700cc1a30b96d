use thiserror::Error;
use uuid::Uuid;

/// Core error type shared across mdmgen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// An identity occurs more than once inside one collection.
    #[error("duplicate identity {id} in {collection}")]
    DuplicateIdentity { collection: &'static str, id: Uuid },
    /// The dataset violates a linkage invariant.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
}

/// Convenience alias for results returned by mdmgen crates.
pub type Result<T> = std::result::Result<T, Error>;

//! Linked MDM dataset generator.
//!
//! This crate builds CRM, HR and Salesforce collections with fake values,
//! entangles them through noisy cross-system links, and writes one artifact
//! per collection.

pub mod engine;
pub mod errors;
pub mod factories;
pub mod linkage;
pub mod model;
pub mod noise;
pub mod output;
pub mod sampling;

pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use linkage::{ExclusivityLedger, link_dataset};
pub use model::{ArtifactReport, EntityCounts, GenerateOptions, LinkCounts, OutputFormat};
pub use noise::{mess_up_email, typo};

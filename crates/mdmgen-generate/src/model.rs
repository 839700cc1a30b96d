use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Number of records generated per collection. Departments are not listed:
/// one is created for every entry of the department vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub crm_contacts: usize,
    pub crm_organizations: usize,
    pub hr_employees: usize,
    pub salesforce_contacts: usize,
    pub salesforce_organizations: usize,
}

impl Default for EntityCounts {
    fn default() -> Self {
        Self {
            crm_contacts: 1000,
            crm_organizations: 100,
            hr_employees: 1000,
            salesforce_contacts: 1000,
            salesforce_organizations: 100,
        }
    }
}

/// Number of source records sampled by each optional link phase.
///
/// These are upper bounds: a sampled record whose drawn target is already
/// claimed is skipped, so fewer links may be realized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounts {
    pub crm_contacts_to_organizations: usize,
    pub crm_contacts_to_hr_employees: usize,
    pub crm_contacts_to_salesforce_contacts: usize,
    pub crm_organizations_to_salesforce_organizations: usize,
    pub hr_employees_to_salesforce_contacts: usize,
}

impl LinkCounts {
    /// Link half of each source collection (integer division).
    pub fn halved(counts: &EntityCounts) -> Self {
        Self {
            crm_contacts_to_organizations: counts.crm_contacts / 2,
            crm_contacts_to_hr_employees: counts.crm_contacts / 2,
            crm_contacts_to_salesforce_contacts: counts.crm_contacts / 2,
            crm_organizations_to_salesforce_organizations: counts.crm_organizations / 2,
            hr_employees_to_salesforce_contacts: counts.hr_employees / 2,
        }
    }
}

/// Artifact format written by the persistence sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where artifacts are written. Prior artifacts of the same
    /// format are removed at the start of a run.
    pub out_dir: PathBuf,
    pub format: OutputFormat,
    pub counts: EntityCounts,
    pub links: LinkCounts,
    /// Seed for the random source. A fresh seed is drawn from OS entropy
    /// when unset.
    pub seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        let counts = EntityCounts::default();
        Self {
            out_dir: PathBuf::from("data"),
            format: OutputFormat::Json,
            counts,
            links: LinkCounts::halved(&counts),
            seed: None,
        }
    }
}

/// Summary of one written artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub collection: String,
    pub path: PathBuf,
    pub records: u64,
    pub bytes_written: u64,
}

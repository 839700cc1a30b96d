//! Core contracts for mdmgen.
//!
//! This crate defines the six entity record types shared by the CRM, HR and
//! Salesforce collections, the `Dataset` container that owns them, and the
//! validation applied to a linked dataset before it is persisted.

pub mod dataset;
pub mod entities;
pub mod error;
pub mod timestamp;
pub mod validation;

pub use dataset::Dataset;
pub use entities::{
    CrmContact, CrmOrganization, HrDepartment, HrEmployee, Record, SalesforceContact,
    SalesforceOrganization,
};
pub use error::{Error, Result};
pub use validation::validate_dataset;

/// Department names used for every generated HR department.
pub const DEPARTMENT_NAMES: [&str; 10] = [
    "Finance",
    "HR",
    "IT",
    "Marketing",
    "Sales",
    "Support",
    "Operations",
    "Legal",
    "R&D",
    "Production",
];

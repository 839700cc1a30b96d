//! Entity records for the three simulated source systems.
//!
//! Fields use one naming convention in Rust. Each source system's own casing
//! (`id`, `Id`, `ID`, ...) is applied only when a record is serialized.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record stored in one of the six collections.
pub trait Record: Serialize {
    /// Artifact name of the collection this record belongs to.
    const COLLECTION: &'static str;
    /// Serialized field names in declaration order.
    const FIELDS: &'static [&'static str];

    fn id(&self) -> Uuid;
}

/// CRM contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmContact {
    #[serde(with = "crate::timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "crate::timestamp")]
    pub modified_at: NaiveDateTime,
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub organization_id: Option<Uuid>,
    pub hr_employee_id: Option<Uuid>,
    pub salesforce_contact_id: Option<Uuid>,
}

/// CRM organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmOrganization {
    #[serde(with = "crate::timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "crate::timestamp")]
    pub modified_at: NaiveDateTime,
    pub id: Uuid,
    pub name: String,
    pub salesforce_organization_id: Option<Uuid>,
}

/// HR department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HrDepartment {
    #[serde(rename = "created_at", with = "crate::timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "modified_at", with = "crate::timestamp")]
    pub modified_at: NaiveDateTime,
    pub id: Uuid,
    pub name: String,
}

/// HR employee. `department_id` and `manager_id` are unset until linkage
/// assigns them; every employee has both afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HrEmployee {
    #[serde(rename = "created_at", with = "crate::timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "modified_at", with = "crate::timestamp")]
    pub modified_at: NaiveDateTime,
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub salesforce_contact_id: Option<Uuid>,
}

/// Salesforce contact. `organization_id` is set for every contact after
/// linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesforceContact {
    #[serde(rename = "created_at", with = "crate::timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "modified_at", with = "crate::timestamp")]
    pub modified_at: NaiveDateTime,
    #[serde(rename = "ID")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    #[serde(rename = "OrganizationID")]
    pub organization_id: Option<Uuid>,
}

/// Salesforce organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesforceOrganization {
    #[serde(rename = "created_at", with = "crate::timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "modified_at", with = "crate::timestamp")]
    pub modified_at: NaiveDateTime,
    #[serde(rename = "ID")]
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

macro_rules! impl_record {
    ($ty:ty, $collection:literal, [$($field:literal),+ $(,)?]) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;
            const FIELDS: &'static [&'static str] = &[$($field),+];

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
}

impl_record!(
    CrmContact,
    "crm_contacts",
    [
        "created_at",
        "modified_at",
        "id",
        "first_name",
        "last_name",
        "email",
        "organization_id",
        "hr_employee_id",
        "salesforce_contact_id",
    ]
);
impl_record!(
    CrmOrganization,
    "crm_organizations",
    [
        "created_at",
        "modified_at",
        "id",
        "name",
        "salesforce_organization_id",
    ]
);
impl_record!(
    HrDepartment,
    "hr_departments",
    ["created_at", "modified_at", "Id", "Name"]
);
impl_record!(
    HrEmployee,
    "hr_employees",
    [
        "created_at",
        "modified_at",
        "Id",
        "Name",
        "Surname",
        "Email",
        "DepartmentId",
        "ManagerId",
        "SalesforceContactId",
    ]
);
impl_record!(
    SalesforceContact,
    "salesforce_contacts",
    [
        "created_at",
        "modified_at",
        "ID",
        "FirstName",
        "LastName",
        "Email",
        "Address",
        "OrganizationID",
    ]
);
impl_record!(
    SalesforceOrganization,
    "salesforce_organizations",
    ["created_at", "modified_at", "ID", "Name", "Address"]
);

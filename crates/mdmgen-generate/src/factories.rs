//! Entity factories for the base collections.
//!
//! Every record gets fresh fake attribute values, a random UUIDv4 identity
//! and unset foreign keys. Links are filled in later by [`crate::linkage`].

use chrono::{NaiveDateTime, SubsecRound, TimeDelta};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::uuid::UUIDv4;
use rand::{Rng, RngCore};
use uuid::Uuid;

use mdmgen_core::{
    CrmContact, CrmOrganization, DEPARTMENT_NAMES, Dataset, HrDepartment, HrEmployee,
    SalesforceContact, SalesforceOrganization,
};

use crate::model::EntityCounts;
use crate::noise::{DEFAULT_EMAIL_UNCHANGED, mess_up_email};

/// How far back `created_at` may reach from the generation instant.
const HISTORY_WINDOW_DAYS: i64 = 365;

/// Build all six base collections.
pub fn generate_dataset(
    counts: &EntityCounts,
    now: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> Dataset {
    Dataset {
        crm_contacts: crm_contacts(counts.crm_contacts, now, rng),
        crm_organizations: crm_organizations(counts.crm_organizations, now, rng),
        hr_departments: hr_departments(now, rng),
        hr_employees: hr_employees(counts.hr_employees, now, rng),
        salesforce_contacts: salesforce_contacts(counts.salesforce_contacts, now, rng),
        salesforce_organizations: salesforce_organizations(
            counts.salesforce_organizations,
            now,
            rng,
        ),
    }
}

pub fn crm_contacts(count: usize, now: NaiveDateTime, rng: &mut dyn RngCore) -> Vec<CrmContact> {
    (0..count)
        .map(|_| {
            let (created_at, modified_at) = random_timestamps(now, rng);
            CrmContact {
                created_at,
                modified_at,
                id: random_id(rng),
                first_name: FirstName().fake_with_rng(rng),
                last_name: LastName().fake_with_rng(rng),
                email: random_email(rng),
                organization_id: None,
                hr_employee_id: None,
                salesforce_contact_id: None,
            }
        })
        .collect()
}

pub fn crm_organizations(
    count: usize,
    now: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> Vec<CrmOrganization> {
    (0..count)
        .map(|_| {
            let (created_at, modified_at) = random_timestamps(now, rng);
            CrmOrganization {
                created_at,
                modified_at,
                id: random_id(rng),
                name: CompanyName().fake_with_rng(rng),
                salesforce_organization_id: None,
            }
        })
        .collect()
}

/// One department per entry of [`DEPARTMENT_NAMES`].
pub fn hr_departments(now: NaiveDateTime, rng: &mut dyn RngCore) -> Vec<HrDepartment> {
    DEPARTMENT_NAMES
        .iter()
        .map(|name| {
            let (created_at, modified_at) = random_timestamps(now, rng);
            HrDepartment {
                created_at,
                modified_at,
                id: random_id(rng),
                name: (*name).to_string(),
            }
        })
        .collect()
}

pub fn hr_employees(count: usize, now: NaiveDateTime, rng: &mut dyn RngCore) -> Vec<HrEmployee> {
    (0..count)
        .map(|_| {
            let (created_at, modified_at) = random_timestamps(now, rng);
            HrEmployee {
                created_at,
                modified_at,
                id: random_id(rng),
                name: FirstName().fake_with_rng(rng),
                surname: LastName().fake_with_rng(rng),
                email: random_email(rng),
                department_id: None,
                manager_id: None,
                salesforce_contact_id: None,
            }
        })
        .collect()
}

pub fn salesforce_contacts(
    count: usize,
    now: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> Vec<SalesforceContact> {
    (0..count)
        .map(|_| {
            let (created_at, modified_at) = random_timestamps(now, rng);
            SalesforceContact {
                created_at,
                modified_at,
                id: random_id(rng),
                first_name: FirstName().fake_with_rng(rng),
                last_name: LastName().fake_with_rng(rng),
                email: random_email(rng),
                address: random_address(rng),
                organization_id: None,
            }
        })
        .collect()
}

pub fn salesforce_organizations(
    count: usize,
    now: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> Vec<SalesforceOrganization> {
    (0..count)
        .map(|_| {
            let (created_at, modified_at) = random_timestamps(now, rng);
            SalesforceOrganization {
                created_at,
                modified_at,
                id: random_id(rng),
                name: CompanyName().fake_with_rng(rng),
                address: random_address(rng),
            }
        })
        .collect()
}

/// Draw a `(created_at, modified_at)` pair with
/// `now - 365 days <= created_at <= modified_at <= now`, at microsecond
/// precision.
pub fn random_timestamps(
    now: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> (NaiveDateTime, NaiveDateTime) {
    let now = now.trunc_subsecs(6);
    let created_at = between(now - TimeDelta::days(HISTORY_WINDOW_DAYS), now, rng);
    let modified_at = between(created_at, now, rng);
    (created_at, modified_at)
}

fn between(start: NaiveDateTime, end: NaiveDateTime, rng: &mut dyn RngCore) -> NaiveDateTime {
    let span = (end - start).num_microseconds().unwrap_or(0);
    if span <= 0 {
        return start;
    }
    start + TimeDelta::microseconds(rng.random_range(0..=span))
}

fn random_id(rng: &mut dyn RngCore) -> Uuid {
    UUIDv4.fake_with_rng(rng)
}

// Source systems already hold some mangled addresses before any linkage.
fn random_email(rng: &mut dyn RngCore) -> String {
    let email: String = SafeEmail().fake_with_rng(rng);
    mess_up_email(&email, DEFAULT_EMAIL_UNCHANGED, rng)
}

fn random_address(rng: &mut dyn RngCore) -> String {
    let building: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    let city: String = CityName().fake_with_rng(rng);
    let state: String = StateAbbr().fake_with_rng(rng);
    let zip: String = ZipCode().fake_with_rng(rng);
    format!("{building} {street}\n{city}, {state} {zip}")
}

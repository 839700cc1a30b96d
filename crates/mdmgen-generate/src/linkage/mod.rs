//! Cross-system linkage.
//!
//! Phases run in a fixed order over a [`Dataset`]. Optional phases sample a
//! configured number of source records and attach a foreign key; the
//! exclusive ones also overwrite source attributes with noisy copies of the
//! target's, so that both records describe the same entity with drift.
//!
//! Exclusive phases draw a single target per sampled source. When the target
//! is already claimed the source is skipped without a second draw, so the
//! realized link count can fall below the configured one. This best-effort
//! fulfillment is intended and is not reported as an error.

mod ledger;

pub use ledger::ExclusivityLedger;

use rand::{Rng, RngCore};
use tracing::{debug, info};
use uuid::Uuid;

use mdmgen_core::{
    CrmContact, CrmOrganization, Dataset, HrDepartment, HrEmployee, Record, SalesforceContact,
    SalesforceOrganization,
};

use crate::errors::GenerationError;
use crate::model::LinkCounts;
use crate::noise::{DEFAULT_TYPO_UNCHANGED, mess_up_email, typo};
use crate::sampling::{pick_index, sample_from, sample_indices};

pub const PHASE_CRM_CONTACTS_TO_ORGANIZATIONS: &str = "crm_contacts_to_organizations";
pub const PHASE_CRM_CONTACTS_TO_HR_EMPLOYEES: &str = "crm_contacts_to_hr_employees";
pub const PHASE_CRM_CONTACTS_TO_SALESFORCE_CONTACTS: &str = "crm_contacts_to_salesforce_contacts";
pub const PHASE_CRM_ORGANIZATIONS_TO_SALESFORCE_ORGANIZATIONS: &str =
    "crm_organizations_to_salesforce_organizations";
pub const PHASE_HR_EMPLOYEES_TO_DEPARTMENTS: &str = "hr_employees_to_departments";
pub const PHASE_HR_MANAGERS: &str = "hr_managers";
pub const PHASE_HR_EMPLOYEES_TO_SALESFORCE_CONTACTS: &str = "hr_employees_to_salesforce_contacts";
pub const PHASE_SALESFORCE_CONTACTS_TO_ORGANIZATIONS: &str =
    "salesforce_contacts_to_organizations";

/// `unchanged_probability` for typos injected into propagated emails.
const LINKED_EMAIL_TYPO_UNCHANGED: f64 = 0.9;
/// `unchanged_probability` for mangling propagated Salesforce emails.
const LINKED_EMAIL_MANGLE_UNCHANGED: f64 = 0.9;
/// A CRM contact linked to an employee takes the employee's email when a
/// uniform draw exceeds this value.
const EMPLOYEE_EMAIL_COPY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Default)]
struct PhaseStats {
    requested: usize,
    linked: usize,
    skipped: usize,
}

/// Run every linkage phase over `dataset` in order.
pub fn link_dataset(
    dataset: &mut Dataset,
    links: &LinkCounts,
    rng: &mut dyn RngCore,
) -> Result<(), GenerationError> {
    let mut ledger = ExclusivityLedger::new();

    link_crm_contacts_to_organizations(
        &mut dataset.crm_contacts,
        &dataset.crm_organizations,
        links.crm_contacts_to_organizations,
        rng,
    )?;
    link_crm_contacts_to_hr_employees(
        &mut dataset.crm_contacts,
        &dataset.hr_employees,
        links.crm_contacts_to_hr_employees,
        &mut ledger,
        rng,
    )?;
    link_crm_contacts_to_salesforce_contacts(
        &mut dataset.crm_contacts,
        &dataset.salesforce_contacts,
        links.crm_contacts_to_salesforce_contacts,
        &mut ledger,
        rng,
    )?;
    link_crm_organizations_to_salesforce_organizations(
        &mut dataset.crm_organizations,
        &dataset.salesforce_organizations,
        links.crm_organizations_to_salesforce_organizations,
        &mut ledger,
        rng,
    )?;
    assign_departments(&mut dataset.hr_employees, &dataset.hr_departments, rng)?;
    assign_managers(&mut dataset.hr_employees, &dataset.hr_departments, rng)?;
    link_hr_employees_to_salesforce_contacts(
        &mut dataset.hr_employees,
        &dataset.salesforce_contacts,
        links.hr_employees_to_salesforce_contacts,
        &mut ledger,
        rng,
    )?;
    assign_salesforce_organizations(
        &mut dataset.salesforce_contacts,
        &dataset.salesforce_organizations,
        rng,
    )?;

    info!(event = "linkage_finished", claimed = ledger.len());
    Ok(())
}

/// Point `count` random contacts at a random CRM organization. Not exclusive
/// and no attributes are propagated.
pub fn link_crm_contacts_to_organizations(
    contacts: &mut [CrmContact],
    organizations: &[CrmOrganization],
    count: usize,
    rng: &mut dyn RngCore,
) -> Result<(), GenerationError> {
    let phase = PHASE_CRM_CONTACTS_TO_ORGANIZATIONS;
    let chosen = sample_indices(contacts.len(), count, phase, rng)?;
    for index in &chosen {
        let organization = &organizations[pick_index(organizations.len(), phase, rng)?];
        contacts[*index].organization_id = Some(organization.id);
    }
    log_phase(
        phase,
        &PhaseStats {
            requested: count,
            linked: chosen.len(),
            skipped: 0,
        },
    );
    Ok(())
}

/// Link unclaimed contacts to HR employees and copy the employee's name,
/// and sometimes email, with typos.
pub fn link_crm_contacts_to_hr_employees(
    contacts: &mut [CrmContact],
    employees: &[HrEmployee],
    count: usize,
    ledger: &mut ExclusivityLedger,
    rng: &mut dyn RngCore,
) -> Result<(), GenerationError> {
    let phase = PHASE_CRM_CONTACTS_TO_HR_EMPLOYEES;
    let stats = link_exclusive(
        phase,
        contacts,
        employees,
        count,
        ledger,
        rng,
        |contact, employee, rng| {
            contact.hr_employee_id = Some(employee.id);
            contact.first_name = typo(&employee.name, DEFAULT_TYPO_UNCHANGED, rng)?;
            contact.last_name = typo(&employee.surname, DEFAULT_TYPO_UNCHANGED, rng)?;
            if rng.random::<f64>() > EMPLOYEE_EMAIL_COPY_THRESHOLD {
                contact.email = typo(&employee.email, LINKED_EMAIL_TYPO_UNCHANGED, rng)?;
            }
            Ok(())
        },
    )?;
    log_phase(phase, &stats);
    Ok(())
}

/// Link unclaimed contacts to Salesforce contacts and copy name and email
/// with typos and email mangling.
pub fn link_crm_contacts_to_salesforce_contacts(
    contacts: &mut [CrmContact],
    salesforce_contacts: &[SalesforceContact],
    count: usize,
    ledger: &mut ExclusivityLedger,
    rng: &mut dyn RngCore,
) -> Result<(), GenerationError> {
    let phase = PHASE_CRM_CONTACTS_TO_SALESFORCE_CONTACTS;
    let stats = link_exclusive(
        phase,
        contacts,
        salesforce_contacts,
        count,
        ledger,
        rng,
        |contact, target, rng| {
            contact.salesforce_contact_id = Some(target.id);
            contact.first_name = typo(&target.first_name, DEFAULT_TYPO_UNCHANGED, rng)?;
            contact.last_name = typo(&target.last_name, DEFAULT_TYPO_UNCHANGED, rng)?;
            contact.email = noisy_email(&target.email, rng)?;
            Ok(())
        },
    )?;
    log_phase(phase, &stats);
    Ok(())
}

/// Link unclaimed CRM organizations to Salesforce organizations and copy the
/// name with a typo.
pub fn link_crm_organizations_to_salesforce_organizations(
    organizations: &mut [CrmOrganization],
    salesforce_organizations: &[SalesforceOrganization],
    count: usize,
    ledger: &mut ExclusivityLedger,
    rng: &mut dyn RngCore,
) -> Result<(), GenerationError> {
    let phase = PHASE_CRM_ORGANIZATIONS_TO_SALESFORCE_ORGANIZATIONS;
    let stats = link_exclusive(
        phase,
        organizations,
        salesforce_organizations,
        count,
        ledger,
        rng,
        |organization, target, rng| {
            organization.salesforce_organization_id = Some(target.id);
            organization.name = typo(&target.name, DEFAULT_TYPO_UNCHANGED, rng)?;
            Ok(())
        },
    )?;
    log_phase(phase, &stats);
    Ok(())
}

/// Give every employee a random department.
pub fn assign_departments(
    employees: &mut [HrEmployee],
    departments: &[HrDepartment],
    rng: &mut dyn RngCore,
) -> Result<(), GenerationError> {
    let phase = PHASE_HR_EMPLOYEES_TO_DEPARTMENTS;
    for employee in employees.iter_mut() {
        let department = &departments[pick_index(departments.len(), phase, rng)?];
        employee.department_id = Some(department.id);
    }
    log_phase(
        phase,
        &PhaseStats {
            requested: employees.len(),
            linked: employees.len(),
            skipped: 0,
        },
    );
    Ok(())
}

/// Give every employee a manager drawn from its own department. An employee
/// may manage itself.
pub fn assign_managers(
    employees: &mut [HrEmployee],
    departments: &[HrDepartment],
    rng: &mut dyn RngCore,
) -> Result<(), GenerationError> {
    let phase = PHASE_HR_MANAGERS;
    let mut linked = 0;
    for department in departments {
        let members: Vec<usize> = employees
            .iter()
            .enumerate()
            .filter(|(_, employee)| employee.department_id == Some(department.id))
            .map(|(idx, _)| idx)
            .collect();
        let member_ids: Vec<Uuid> = members.iter().map(|idx| employees[*idx].id).collect();

        for member in &members {
            let manager = member_ids[pick_index(member_ids.len(), phase, rng)?];
            employees[*member].manager_id = Some(manager);
            linked += 1;
        }
    }
    log_phase(
        phase,
        &PhaseStats {
            requested: employees.len(),
            linked,
            skipped: employees.len().saturating_sub(linked),
        },
    );
    Ok(())
}

/// Link unclaimed employees to Salesforce contacts and copy name and email
/// with typos and email mangling.
pub fn link_hr_employees_to_salesforce_contacts(
    employees: &mut [HrEmployee],
    salesforce_contacts: &[SalesforceContact],
    count: usize,
    ledger: &mut ExclusivityLedger,
    rng: &mut dyn RngCore,
) -> Result<(), GenerationError> {
    let phase = PHASE_HR_EMPLOYEES_TO_SALESFORCE_CONTACTS;
    let stats = link_exclusive(
        phase,
        employees,
        salesforce_contacts,
        count,
        ledger,
        rng,
        |employee, target, rng| {
            employee.salesforce_contact_id = Some(target.id);
            employee.name = typo(&target.first_name, DEFAULT_TYPO_UNCHANGED, rng)?;
            employee.surname = typo(&target.last_name, DEFAULT_TYPO_UNCHANGED, rng)?;
            employee.email = noisy_email(&target.email, rng)?;
            Ok(())
        },
    )?;
    log_phase(phase, &stats);
    Ok(())
}

/// Give every Salesforce contact a random Salesforce organization.
pub fn assign_salesforce_organizations(
    contacts: &mut [SalesforceContact],
    organizations: &[SalesforceOrganization],
    rng: &mut dyn RngCore,
) -> Result<(), GenerationError> {
    let phase = PHASE_SALESFORCE_CONTACTS_TO_ORGANIZATIONS;
    for contact in contacts.iter_mut() {
        let organization = &organizations[pick_index(organizations.len(), phase, rng)?];
        contact.organization_id = Some(organization.id);
    }
    log_phase(
        phase,
        &PhaseStats {
            requested: contacts.len(),
            linked: contacts.len(),
            skipped: 0,
        },
    );
    Ok(())
}

/// Sample `count` unclaimed sources, draw one target for each, and let
/// `absorb` copy the target into the source when the target is unclaimed.
fn link_exclusive<S, T>(
    phase: &'static str,
    sources: &mut [S],
    targets: &[T],
    count: usize,
    ledger: &mut ExclusivityLedger,
    rng: &mut dyn RngCore,
    mut absorb: impl FnMut(&mut S, &T, &mut dyn RngCore) -> Result<(), GenerationError>,
) -> Result<PhaseStats, GenerationError>
where
    S: Record,
    T: Record,
{
    let pool = ledger.unclaimed(sources);
    let chosen = sample_from(&pool, count, phase, rng)?;
    let mut stats = PhaseStats {
        requested: count,
        ..PhaseStats::default()
    };

    for index in chosen {
        let target = &targets[pick_index(targets.len(), phase, rng)?];
        if ledger.is_claimed(target.id()) {
            stats.skipped += 1;
            continue;
        }

        let source = &mut sources[index];
        ledger.claim_pair(source.id(), target.id());
        absorb(source, target, rng)?;
        stats.linked += 1;
    }

    Ok(stats)
}

fn noisy_email(email: &str, rng: &mut dyn RngCore) -> Result<String, GenerationError> {
    let email = typo(email, LINKED_EMAIL_TYPO_UNCHANGED, rng)?;
    Ok(mess_up_email(&email, LINKED_EMAIL_MANGLE_UNCHANGED, rng))
}

fn log_phase(phase: &'static str, stats: &PhaseStats) {
    if stats.skipped > 0 {
        info!(
            event = "phase_finished",
            phase,
            requested = stats.requested,
            linked = stats.linked,
            skipped = stats.skipped,
            "link phase under-filled"
        );
    } else {
        debug!(
            event = "phase_finished",
            phase,
            requested = stats.requested,
            linked = stats.linked,
            skipped = stats.skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::factories;

    fn fixed_now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("valid date")
    }

    #[test]
    fn claimed_sources_are_not_sampled_again() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let now = fixed_now();
        let mut contacts = factories::crm_contacts(6, now, &mut rng);
        let employees = factories::hr_employees(30, now, &mut rng);
        let salesforce_contacts = factories::salesforce_contacts(30, now, &mut rng);
        let mut ledger = ExclusivityLedger::new();

        link_crm_contacts_to_hr_employees(&mut contacts, &employees, 3, &mut ledger, &mut rng)
            .expect("link employees");
        let claimed_contacts = contacts
            .iter()
            .filter(|contact| ledger.is_claimed(contact.id))
            .count();
        let remaining = contacts.len() - claimed_contacts;

        let err = link_crm_contacts_to_salesforce_contacts(
            &mut contacts,
            &salesforce_contacts,
            remaining + 1,
            &mut ledger,
            &mut rng,
        )
        .expect_err("pool excludes claimed contacts");
        assert!(matches!(
            err,
            GenerationError::Sampling { available, .. } if available == remaining
        ));

        link_crm_contacts_to_salesforce_contacts(
            &mut contacts,
            &salesforce_contacts,
            remaining,
            &mut ledger,
            &mut rng,
        )
        .expect("link salesforce contacts");

        for contact in &contacts {
            assert!(
                !(contact.hr_employee_id.is_some() && contact.salesforce_contact_id.is_some()),
                "contact {} linked twice",
                contact.id
            );
        }
    }

    #[test]
    fn collision_skips_without_redraw() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let now = fixed_now();
        let mut organizations = factories::crm_organizations(5, now, &mut rng);
        let salesforce_organizations = factories::salesforce_organizations(1, now, &mut rng);
        let mut ledger = ExclusivityLedger::new();

        link_crm_organizations_to_salesforce_organizations(
            &mut organizations,
            &salesforce_organizations,
            5,
            &mut ledger,
            &mut rng,
        )
        .expect("link organizations");

        let linked = organizations
            .iter()
            .filter(|organization| organization.salesforce_organization_id.is_some())
            .count();
        assert_eq!(linked, 1, "only one target exists, the rest must skip");
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn exclusive_phase_copies_target_attributes_with_bounded_noise() {
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        let now = fixed_now();
        let mut organizations = factories::crm_organizations(1, now, &mut rng);
        let salesforce_organizations = factories::salesforce_organizations(1, now, &mut rng);
        let mut ledger = ExclusivityLedger::new();

        link_crm_organizations_to_salesforce_organizations(
            &mut organizations,
            &salesforce_organizations,
            1,
            &mut ledger,
            &mut rng,
        )
        .expect("link organizations");

        let organization = &organizations[0];
        let target = &salesforce_organizations[0];
        assert_eq!(organization.salesforce_organization_id, Some(target.id));
        let differences = organization
            .name
            .chars()
            .zip(target.name.chars())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(organization.name.chars().count(), target.name.chars().count());
        assert!(differences <= 1);
    }

    #[test]
    fn empty_target_pool_fails_when_links_are_requested() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut contacts = factories::crm_contacts(3, fixed_now(), &mut rng);
        let err = link_crm_contacts_to_organizations(&mut contacts, &[], 1, &mut rng)
            .expect_err("no organizations");
        assert!(matches!(err, GenerationError::EmptyPool { .. }));

        link_crm_contacts_to_organizations(&mut contacts, &[], 0, &mut rng)
            .expect("zero links need no targets");
    }
}

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::dataset::Dataset;
use crate::entities::Record;
use crate::error::{Error, Result};

/// Validate the internal consistency of a linked dataset.
///
/// This checks:
/// - identities are unique within each collection
/// - every set foreign key resolves into its target collection
/// - department, manager and Salesforce organization links are set
/// - managers work in the same department as the employees they manage
pub fn validate_dataset(dataset: &Dataset) -> Result<()> {
    let crm_organizations = identities(&dataset.crm_organizations)?;
    let hr_departments = identities(&dataset.hr_departments)?;
    let hr_employees = identities(&dataset.hr_employees)?;
    let salesforce_contacts = identities(&dataset.salesforce_contacts)?;
    let salesforce_organizations = identities(&dataset.salesforce_organizations)?;
    identities(&dataset.crm_contacts)?;

    for contact in &dataset.crm_contacts {
        check_link(
            "crm_contacts.organization_id",
            contact.id,
            contact.organization_id,
            &crm_organizations,
        )?;
        check_link(
            "crm_contacts.hr_employee_id",
            contact.id,
            contact.hr_employee_id,
            &hr_employees,
        )?;
        check_link(
            "crm_contacts.salesforce_contact_id",
            contact.id,
            contact.salesforce_contact_id,
            &salesforce_contacts,
        )?;
    }

    for organization in &dataset.crm_organizations {
        check_link(
            "crm_organizations.salesforce_organization_id",
            organization.id,
            organization.salesforce_organization_id,
            &salesforce_organizations,
        )?;
    }

    let departments_by_employee: HashMap<Uuid, Option<Uuid>> = dataset
        .hr_employees
        .iter()
        .map(|employee| (employee.id, employee.department_id))
        .collect();

    for employee in &dataset.hr_employees {
        let department_id = require_link(
            "hr_employees.DepartmentId",
            employee.id,
            employee.department_id,
            &hr_departments,
        )?;
        let manager_id = require_link(
            "hr_employees.ManagerId",
            employee.id,
            employee.manager_id,
            &hr_employees,
        )?;
        if departments_by_employee.get(&manager_id) != Some(&Some(department_id)) {
            return Err(Error::InvalidDataset(format!(
                "manager {manager_id} of employee {} works outside department {department_id}",
                employee.id
            )));
        }
        check_link(
            "hr_employees.SalesforceContactId",
            employee.id,
            employee.salesforce_contact_id,
            &salesforce_contacts,
        )?;
    }

    for contact in &dataset.salesforce_contacts {
        require_link(
            "salesforce_contacts.OrganizationID",
            contact.id,
            contact.organization_id,
            &salesforce_organizations,
        )?;
    }

    Ok(())
}

fn identities<T: Record>(records: &[T]) -> Result<HashSet<Uuid>> {
    let mut ids = HashSet::with_capacity(records.len());
    for record in records {
        if !ids.insert(record.id()) {
            return Err(Error::DuplicateIdentity {
                collection: T::COLLECTION,
                id: record.id(),
            });
        }
    }
    Ok(ids)
}

fn check_link(
    field: &str,
    owner: Uuid,
    link: Option<Uuid>,
    targets: &HashSet<Uuid>,
) -> Result<()> {
    match link {
        Some(target) if !targets.contains(&target) => Err(Error::InvalidDataset(format!(
            "{field} of {owner} references unknown identity {target}"
        ))),
        _ => Ok(()),
    }
}

fn require_link(
    field: &str,
    owner: Uuid,
    link: Option<Uuid>,
    targets: &HashSet<Uuid>,
) -> Result<Uuid> {
    let target = link
        .ok_or_else(|| Error::InvalidDataset(format!("{field} of {owner} is not set")))?;
    check_link(field, owner, Some(target), targets)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::entities::{HrDepartment, HrEmployee};

    fn department(id: Uuid) -> HrDepartment {
        let stamp = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        HrDepartment {
            created_at: stamp,
            modified_at: stamp,
            id,
            name: "IT".to_string(),
        }
    }

    fn employee(id: Uuid, department_id: Option<Uuid>, manager_id: Option<Uuid>) -> HrEmployee {
        let stamp = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        HrEmployee {
            created_at: stamp,
            modified_at: stamp,
            id,
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            department_id,
            manager_id,
            salesforce_contact_id: None,
        }
    }

    #[test]
    fn accepts_self_managed_employee() {
        let dept = Uuid::new_v4();
        let emp = Uuid::new_v4();
        let dataset = Dataset {
            hr_departments: vec![department(dept)],
            hr_employees: vec![employee(emp, Some(dept), Some(emp))],
            ..Dataset::default()
        };
        assert!(validate_dataset(&dataset).is_ok());
    }

    #[test]
    fn rejects_duplicate_identity() {
        let dept = Uuid::new_v4();
        let dataset = Dataset {
            hr_departments: vec![department(dept), department(dept)],
            ..Dataset::default()
        };
        let err = validate_dataset(&dataset).expect_err("duplicate should fail");
        assert!(matches!(
            err,
            Error::DuplicateIdentity {
                collection: "hr_departments",
                ..
            }
        ));
    }

    #[test]
    fn rejects_missing_manager() {
        let dept = Uuid::new_v4();
        let dataset = Dataset {
            hr_departments: vec![department(dept)],
            hr_employees: vec![employee(Uuid::new_v4(), Some(dept), None)],
            ..Dataset::default()
        };
        assert!(matches!(
            validate_dataset(&dataset),
            Err(Error::InvalidDataset(_))
        ));
    }

    #[test]
    fn rejects_manager_from_other_department() {
        let dept_a = Uuid::new_v4();
        let dept_b = Uuid::new_v4();
        let boss = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let dataset = Dataset {
            hr_departments: vec![department(dept_a), department(dept_b)],
            hr_employees: vec![
                employee(boss, Some(dept_a), Some(boss)),
                employee(worker, Some(dept_b), Some(boss)),
            ],
            ..Dataset::default()
        };
        assert!(matches!(
            validate_dataset(&dataset),
            Err(Error::InvalidDataset(_))
        ));
    }
}

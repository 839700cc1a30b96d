use serde::{Deserialize, Serialize};

use crate::entities::{
    CrmContact, CrmOrganization, HrDepartment, HrEmployee, SalesforceContact,
    SalesforceOrganization,
};

/// The six collections produced by one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub crm_contacts: Vec<CrmContact>,
    pub crm_organizations: Vec<CrmOrganization>,
    pub hr_departments: Vec<HrDepartment>,
    pub hr_employees: Vec<HrEmployee>,
    pub salesforce_contacts: Vec<SalesforceContact>,
    pub salesforce_organizations: Vec<SalesforceOrganization>,
}

impl Dataset {
    pub fn total_records(&self) -> usize {
        self.crm_contacts.len()
            + self.crm_organizations.len()
            + self.hr_departments.len()
            + self.hr_employees.len()
            + self.salesforce_contacts.len()
            + self.salesforce_organizations.len()
    }
}

use serde::Serialize;

use super::domain::{EmployeeId, EmployeeRecord};
use super::ranking::sort_by_score;

/// An employee's position across the entire dataset, ignoring scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeStanding {
    pub rank: usize,
    pub employee_id: EmployeeId,
    pub name: String,
    pub score: u64,
    pub tenure_months: u32,
    pub branch_unit: String,
    pub region: String,
    pub total_participants: usize,
}

/// Global rank of `employee_id`, or `None` when the id is not in the dataset.
pub fn lookup_employee(records: &[EmployeeRecord], employee_id: &str) -> Option<EmployeeStanding> {
    let sorted = sort_by_score(records);
    let position = sorted
        .iter()
        .position(|record| record.employee_id.as_str() == employee_id)?;
    let record = sorted[position];

    Some(EmployeeStanding {
        rank: position + 1,
        employee_id: record.employee_id.clone(),
        name: record.name.clone(),
        score: record.score,
        tenure_months: record.tenure_months,
        branch_unit: record.branch_unit.clone(),
        region: record.region.clone(),
        total_participants: records.len(),
    })
}

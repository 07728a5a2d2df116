use std::collections::HashMap;

use super::columns::{Column, ColumnIndex};
use super::normalizer::{normalize_text, parse_count};
use super::ImportError;
use crate::leaderboard::domain::{EmployeeId, EmployeeRecord};

/// A data row with its 1-based position in the source sheet.
#[derive(Debug, Clone)]
pub(crate) struct SheetRow {
    pub(crate) number: usize,
    pub(crate) cells: Vec<String>,
}

impl SheetRow {
    fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| normalize_text(cell).is_empty())
    }
}

pub(crate) fn assemble_records(
    header: &[String],
    rows: Vec<SheetRow>,
) -> Result<Vec<EmployeeRecord>, ImportError> {
    if header.iter().all(|cell| normalize_text(cell).is_empty()) {
        return Err(ImportError::Empty);
    }

    let index = ColumnIndex::from_header(header).map_err(ImportError::MissingColumns)?;
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows.into_iter().filter(|row| !row.is_blank()) {
        let record = parse_row(&index, &row)?;
        if let Some(first_row) = seen.get(record.employee_id.as_str()) {
            return Err(ImportError::DuplicateEmployee {
                row: row.number,
                employee_id: record.employee_id.0,
                first_row: *first_row,
            });
        }
        seen.insert(record.employee_id.0.clone(), row.number);
        records.push(record);
    }

    if records.is_empty() {
        return Err(ImportError::Empty);
    }

    Ok(records)
}

fn parse_row(index: &ColumnIndex, row: &SheetRow) -> Result<EmployeeRecord, ImportError> {
    let text = |column: Column| normalize_text(index.cell(&row.cells, column));

    let region = text(Column::Region);
    let branch_unit = text(Column::BranchUnit);
    let employee_id = text(Column::EmployeeId);
    let name = text(Column::Name);
    let score = text(Column::Score);
    let tenure = text(Column::TenureMonths);

    let missing: Vec<&'static str> = [
        (Column::Region, &region),
        (Column::BranchUnit, &branch_unit),
        (Column::EmployeeId, &employee_id),
        (Column::Name, &name),
        (Column::Score, &score),
        (Column::TenureMonths, &tenure),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(column, _)| column.label())
    .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingFields {
            row: row.number,
            fields: missing,
        });
    }

    let score = parse_count(&score).ok_or_else(|| ImportError::InvalidNumber {
        row: row.number,
        field: Column::Score.label(),
        value: score.clone(),
    })?;
    let tenure_months = parse_count(&tenure)
        .and_then(|months| u32::try_from(months).ok())
        .ok_or_else(|| ImportError::InvalidNumber {
            row: row.number,
            field: Column::TenureMonths.label(),
            value: tenure.clone(),
        })?;

    Ok(EmployeeRecord {
        region,
        branch_unit,
        employee_id: EmployeeId(employee_id),
        name,
        score,
        tenure_months,
    })
}

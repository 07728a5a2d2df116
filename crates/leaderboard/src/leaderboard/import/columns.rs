use super::normalizer::normalize_header;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Column {
    Region,
    BranchUnit,
    EmployeeId,
    Name,
    Score,
    TenureMonths,
}

impl Column {
    pub(crate) const ALL: [Column; 6] = [
        Column::Region,
        Column::BranchUnit,
        Column::EmployeeId,
        Column::Name,
        Column::Score,
        Column::TenureMonths,
    ];

    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::BranchUnit => "branch_unit",
            Self::EmployeeId => "employee_id",
            Self::Name => "name",
            Self::Score => "score",
            Self::TenureMonths => "tenure_months",
        }
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Region => &["region", "지역", "지역단"],
            Self::BranchUnit => &["branch_unit", "branch", "지점", "지점단"],
            Self::EmployeeId => &["employee_id", "사번"],
            Self::Name => &["name", "이름"],
            Self::Score => &["score", "points", "성적"],
            Self::TenureMonths => &["tenure_months", "months", "차월"],
        }
    }

    fn from_header(raw: &str) -> Option<Self> {
        let normalized = normalize_header(raw);
        Self::ALL
            .into_iter()
            .find(|column| column.aliases().contains(&normalized.as_str()))
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Position of each required column in the header row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnIndex {
    positions: [usize; 6],
}

impl ColumnIndex {
    /// Map the header row, or list the required columns it lacks.
    pub(crate) fn from_header(header: &[String]) -> Result<Self, Vec<&'static str>> {
        let mut found: [Option<usize>; 6] = [None; 6];
        for (position, raw) in header.iter().enumerate() {
            if let Some(column) = Column::from_header(raw) {
                // First matching header wins when a sheet carries two aliases.
                found[column.slot()].get_or_insert(position);
            }
        }

        let missing: Vec<&'static str> = Column::ALL
            .into_iter()
            .filter(|column| found[column.slot()].is_none())
            .map(Column::label)
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let mut positions = [0; 6];
        for column in Column::ALL {
            positions[column.slot()] = found[column.slot()].unwrap_or_default();
        }
        Ok(Self { positions })
    }

    pub(crate) fn cell<'a>(&self, cells: &'a [String], column: Column) -> &'a str {
        cells
            .get(self.positions[column.slot()])
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn maps_korean_headers() {
        let index = ColumnIndex::from_header(&header(&["지역", "지점단", "사번", "이름", "성적", "차월"]))
            .expect("all columns present");
        let row = header(&["서울", "정동", "1001", "이현미", "2005073", "216"]);
        assert_eq!(index.cell(&row, Column::BranchUnit), "정동");
        assert_eq!(index.cell(&row, Column::TenureMonths), "216");
    }

    #[test]
    fn maps_english_headers_in_any_order() {
        let index = ColumnIndex::from_header(&header(&[
            "Score",
            "Name",
            "Employee ID",
            "Branch",
            "Region",
            "Tenure Months",
        ]))
        .expect("all columns present");
        let row = header(&["10", "Kim", "E1", "A", "North", "3"]);
        assert_eq!(index.cell(&row, Column::EmployeeId), "E1");
        assert_eq!(index.cell(&row, Column::Region), "North");
    }

    #[test]
    fn reports_missing_columns() {
        let missing = ColumnIndex::from_header(&header(&["사번", "이름", "성적"]))
            .expect_err("columns missing");
        assert_eq!(missing, vec!["region", "branch_unit", "tenure_months"]);
    }

    #[test]
    fn short_rows_read_as_blank() {
        let index = ColumnIndex::from_header(&header(&[
            "region", "branch", "employee_id", "name", "score", "months",
        ]))
        .expect("all columns present");
        let row = header(&["North"]);
        assert_eq!(index.cell(&row, Column::Score), "");
    }
}

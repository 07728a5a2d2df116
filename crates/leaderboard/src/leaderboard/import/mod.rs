mod columns;
mod csv_table;
mod normalizer;
mod parser;
mod workbook_table;

use std::fmt;
use std::io::{Cursor, Read};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use super::domain::EmployeeRecord;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MIME: &str = "application/vnd.ms-excel";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid XLSX workbook: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),
    #[error("invalid XLS workbook: {0}")]
    LegacySpreadsheet(#[from] calamine::XlsError),
    #[error("workbook has no worksheets")]
    NoWorksheet,
    #[error("unsupported dataset format '{0}' (upload a .csv or .xlsx file)")]
    UnsupportedFormat(String),
    #[error("header row is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
    #[error("row {row} is missing required fields: {}", .fields.join(", "))]
    MissingFields {
        row: usize,
        fields: Vec<&'static str>,
    },
    #[error("row {row} has an invalid {field} value '{value}'")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("row {row} repeats employee id '{employee_id}' first seen on row {first_row}")]
    DuplicateEmployee {
        row: usize,
        employee_id: String,
        first_row: usize,
    },
    #[error("dataset contains no employee rows")]
    Empty,
}

impl ImportError {
    /// Whether the upload itself was readable but its contents failed validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ImportError::MissingColumns(_)
                | ImportError::MissingFields { .. }
                | ImportError::InvalidNumber { .. }
                | ImportError::DuplicateEmployee { .. }
                | ImportError::Empty
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Xlsx,
    /// Legacy BIFF workbook.
    Xls,
}

impl DatasetFormat {
    pub const ALL: [DatasetFormat; 3] = [
        DatasetFormat::Csv,
        DatasetFormat::Xlsx,
        DatasetFormat::Xls,
    ];

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
            .ok_or_else(|| ImportError::UnsupportedFormat(path.display().to_string()))
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "text/csv" | "application/csv" => Some(Self::Csv),
            XLSX_MIME => Some(Self::Xlsx),
            XLS_MIME => Some(Self::Xls),
            _ => None,
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => XLSX_MIME,
            Self::Xls => XLS_MIME,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
        }
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DatasetFormat {
    type Err = ImportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_extension(value).ok_or_else(|| ImportError::UnsupportedFormat(value.to_string()))
    }
}

/// Turns uploaded performance sheets into validated employee records.
pub struct DatasetImporter;

impl DatasetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<EmployeeRecord>, ImportError> {
        let path = path.as_ref();
        let format = DatasetFormat::from_path(path)?;
        let file = std::fs::File::open(path)?;
        Self::from_reader(format, file)
    }

    pub fn from_reader<R: Read>(
        format: DatasetFormat,
        mut reader: R,
    ) -> Result<Vec<EmployeeRecord>, ImportError> {
        let (header, rows) = match format {
            DatasetFormat::Csv => csv_table::read_table(reader)?,
            DatasetFormat::Xlsx | DatasetFormat::Xls => {
                // Both workbook containers need random access.
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                let cursor = Cursor::new(bytes);
                if format == DatasetFormat::Xls {
                    workbook_table::read_xls(cursor)?
                } else {
                    workbook_table::read_xlsx(cursor)?
                }
            }
        };

        debug!(%format, columns = ?header, rows = rows.len(), "parsed dataset table");
        parser::assemble_records(&header, rows)
    }

    pub fn from_bytes(format: DatasetFormat, bytes: &[u8]) -> Result<Vec<EmployeeRecord>, ImportError> {
        Self::from_reader(format, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const KOREAN_CSV: &str = "\u{feff}지역,지점단,사번,이름,성적,차월\n\
서울,정동,1001,이현미,\"2,005,073\",216\n\
서울,정동,1002,이금신,1005203,9\n\
\n\
경기,로얄,2001,강혜연,1099028,7\n";

    #[test]
    fn imports_korean_headers_and_thousands_separators() {
        let records = DatasetImporter::from_reader(DatasetFormat::Csv, Cursor::new(KOREAN_CSV))
            .expect("import succeeds");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].region, "서울");
        assert_eq!(records[0].branch_unit, "정동");
        assert_eq!(records[0].employee_id.as_str(), "1001");
        assert_eq!(records[0].score, 2_005_073);
        assert_eq!(records[0].tenure_months, 216);
        assert_eq!(records[2].name, "강혜연");
    }

    #[test]
    fn reports_row_number_for_missing_fields() {
        let csv = "region,branch,employee_id,name,score,months\n\
North,A,E1,Kim,10,3\n\
North,A,,Lee,20,4\n";
        let error = DatasetImporter::from_bytes(DatasetFormat::Csv, csv.as_bytes())
            .expect_err("missing id");

        match error {
            ImportError::MissingFields { row, fields } => {
                assert_eq!(row, 3);
                assert_eq!(fields, vec!["employee_id"]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_numbers() {
        let csv = "region,branch,employee_id,name,score,months\nNorth,A,E1,Kim,-10,3\n";
        let error = DatasetImporter::from_bytes(DatasetFormat::Csv, csv.as_bytes())
            .expect_err("negative score");

        assert!(error.is_validation());
        assert_eq!(
            error.to_string(),
            "row 2 has an invalid score value '-10'"
        );
    }

    #[test]
    fn rejects_duplicate_employee_ids() {
        let csv = "region,branch,employee_id,name,score,months\n\
North,A,E1,Kim,10,3\n\
North,B,E2,Park,15,3\n\
South,C,E1,Lee,20,4\n";
        let error = DatasetImporter::from_bytes(DatasetFormat::Csv, csv.as_bytes())
            .expect_err("duplicate id");

        match error {
            ImportError::DuplicateEmployee {
                row,
                employee_id,
                first_row,
            } => {
                assert_eq!(row, 4);
                assert_eq!(employee_id, "E1");
                assert_eq!(first_row, 2);
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_header_only_and_empty_files() {
        let header_only = "region,branch,employee_id,name,score,months\n";
        assert!(matches!(
            DatasetImporter::from_bytes(DatasetFormat::Csv, header_only.as_bytes()),
            Err(ImportError::Empty)
        ));
        assert!(matches!(
            DatasetImporter::from_bytes(DatasetFormat::Csv, b""),
            Err(ImportError::Empty)
        ));
    }

    #[test]
    fn rejects_missing_columns() {
        let csv = "사번,이름,성적\n1001,Kim,10\n";
        match DatasetImporter::from_bytes(DatasetFormat::Csv, csv.as_bytes()) {
            Err(ImportError::MissingColumns(columns)) => {
                assert_eq!(columns, vec!["region", "branch_unit", "tenure_months"]);
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn from_path_checks_extension_then_propagates_io_errors() {
        match DatasetImporter::from_path("./latest.ods") {
            Err(ImportError::UnsupportedFormat(_)) => {}
            other => panic!("expected unsupported format, got {other:?}"),
        }
        match DatasetImporter::from_path("./does-not-exist.csv") {
            Err(ImportError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn format_detection() {
        assert_eq!(DatasetFormat::from_extension(".XLSX"), Some(DatasetFormat::Xlsx));
        assert_eq!(DatasetFormat::from_extension("xls"), Some(DatasetFormat::Xls));
        assert_eq!(DatasetFormat::from_extension("ods"), None);
        assert_eq!(
            DatasetFormat::from_mime("application/vnd.ms-excel"),
            Some(DatasetFormat::Xls)
        );
        assert_eq!(
            DatasetFormat::from_mime("text/csv; charset=utf-8"),
            Some(DatasetFormat::Csv)
        );
        assert_eq!(
            DatasetFormat::from_mime(DatasetFormat::Xlsx.mime()),
            Some(DatasetFormat::Xlsx)
        );
        assert!("pdf".parse::<DatasetFormat>().is_err());
    }
}

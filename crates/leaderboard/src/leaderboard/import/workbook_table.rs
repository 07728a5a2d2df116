use std::io::{Read, Seek};

use calamine::{DataType, Range, Reader, Xls, Xlsx};

use super::parser::SheetRow;
use super::ImportError;

type Table = (Vec<String>, Vec<SheetRow>);

/// Read the first worksheet of an XLSX workbook; its first non-empty row is the header.
pub(crate) fn read_xlsx<R: Read + Seek>(reader: R) -> Result<Table, ImportError> {
    let mut workbook: Xlsx<R> = Xlsx::new(reader)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)??;
    table_from_range(&range)
}

/// Same as [`read_xlsx`] for legacy `.xls` workbooks.
pub(crate) fn read_xls<R: Read + Seek>(reader: R) -> Result<Table, ImportError> {
    let mut workbook: Xls<R> = Xls::new(reader)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)??;
    table_from_range(&range)
}

fn table_from_range(range: &Range<DataType>) -> Result<Table, ImportError> {
    let header_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(cell_text).collect(),
        None => return Err(ImportError::Empty),
    };

    let body = rows
        .enumerate()
        .map(|(offset, cells)| SheetRow {
            number: header_row + offset + 1,
            cells: cells.iter().map(cell_text).collect(),
        })
        .collect();

    Ok((header, body))
}

fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Int(value) => value.to_string(),
        DataType::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        DataType::Float(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        // Formula errors read as blank so the row reports a missing field.
        DataType::Error(_) | DataType::Empty => String::new(),
        other => format!("{other:?}"),
    }
}

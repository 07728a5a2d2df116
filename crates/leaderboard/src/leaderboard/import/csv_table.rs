use std::io::Read;

use super::parser::SheetRow;

pub(crate) fn read_table<R: Read>(reader: R) -> Result<(Vec<String>, Vec<SheetRow>), csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let header: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();

    for (offset, record) in csv_reader.records().enumerate() {
        let record = record?;
        let number = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(offset + 2);
        rows.push(SheetRow {
            number,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    Ok((header, rows))
}

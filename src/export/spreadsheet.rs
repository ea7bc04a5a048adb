//! Writes rows of export data to an in-memory `.xlsx` workbook.

use rust_xlsxwriter::{ColNum, Workbook};

use crate::Error;

/// The content of one spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A text cell.
    Text(String),
    /// A numeric cell.
    Number(f64),
}

/// Write a workbook with a single worksheet named `sheet_name`.
///
/// The first row holds `header`, followed by one row per entry of `rows` in
/// the order given. An empty `rows` still produces a valid workbook with only
/// the header row.
///
/// # Errors
/// Returns an [Error::FormatError] if the sheet name is invalid or the
/// workbook could not be serialized.
pub fn write_spreadsheet(
    sheet_name: &str,
    header: &[&str],
    rows: &[Vec<Cell>],
) -> Result<Vec<u8>, Error> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, title) in header.iter().enumerate() {
        worksheet.write_string(0, col as ColNum, *title)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let row_num = index as u32 + 1;

        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => worksheet.write_string(row_num, col as ColNum, text)?,
                Cell::Number(number) => worksheet.write_number(row_num, col as ColNum, *number)?,
            };
        }
    }

    Ok(workbook.save_to_buffer()?)
}

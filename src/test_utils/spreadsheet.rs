use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

/// Read every cell of the worksheet `sheet_name` in the workbook `bytes`, row by row.
#[track_caller]
pub(crate) fn read_sheet(bytes: &[u8], sheet_name: &str) -> Vec<Vec<Data>> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes.to_vec())).expect("Could not open spreadsheet");
    let range = workbook
        .worksheet_range(sheet_name)
        .expect("Could not read worksheet");

    range.rows().map(|row| row.to_vec()).collect()
}

/// The names of the worksheets in the workbook `bytes`.
#[track_caller]
pub(crate) fn sheet_names(bytes: &[u8]) -> Vec<String> {
    let workbook = Xlsx::new(Cursor::new(bytes.to_vec())).expect("Could not open spreadsheet");

    workbook.sheet_names()
}

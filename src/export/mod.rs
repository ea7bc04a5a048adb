//! Spreadsheet downloads of a user's income and expense records.

mod handlers;
mod spreadsheet;

pub use handlers::{XLSX_CONTENT_TYPE, download_expenses, download_income};
pub use spreadsheet::{Cell, write_spreadsheet};

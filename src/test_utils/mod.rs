#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod spreadsheet;

pub(crate) use http::{assert_content_type, get_body_bytes, get_header, parse_json_body};
pub(crate) use spreadsheet::{read_sheet, sheet_names};

//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/users/:user_id', use [format_endpoint].

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for the aggregated dashboard of the logged in user.
pub const DASHBOARD: &str = "/api/dashboard";
/// The route to add and list income records.
pub const INCOME: &str = "/api/income";
/// The route to delete a single income record.
pub const INCOME_ITEM: &str = "/api/income/{income_id}";
/// The route to download all income records as a spreadsheet.
pub const INCOME_DOWNLOAD: &str = "/api/income/download";
/// The route to add and list expense records.
pub const EXPENSE: &str = "/api/expense";
/// The route to delete a single expense record.
pub const EXPENSE_ITEM: &str = "/api/expense/{expense_id}";
/// The route to download all expense records as a spreadsheet.
pub const EXPENSE_DOWNLOAD: &str = "/api/expense/download";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

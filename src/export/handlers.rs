//! HTTP handlers that download a user's income or expense records as a spreadsheet.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    AppState, Error,
    export::spreadsheet::{Cell, write_spreadsheet},
    timezone::get_local_offset,
    transaction::{
        Expense, Income, SQLiteTransactionStore, SortOrder, TransactionKind, TransactionQuery,
        TransactionRecord, TransactionStore,
    },
    user::UserID,
};

/// The MIME type of `.xlsx` files.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

const MISSING_LABEL: &str = "N/A";

/// The state needed for exporting records.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection holding the income and expense records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// How the records of one kind are laid out in an export.
struct ExportLayout {
    sheet_name: &'static str,
    header: &'static [&'static str],
    include_icon: bool,
    sort_date: Option<SortOrder>,
}

fn export_layout(kind: TransactionKind) -> ExportLayout {
    match kind {
        TransactionKind::Income => ExportLayout {
            sheet_name: "Income",
            header: &["Source", "Amount", "Date", "Icon"],
            include_icon: true,
            sort_date: Some(SortOrder::Descending),
        },
        // Expenses are exported in the order they were added.
        TransactionKind::Expense => ExportLayout {
            sheet_name: "Expenses",
            header: &["Category", "Amount", "Date"],
            include_icon: false,
            sort_date: None,
        },
    }
}

/// The file name suggested to the client for an export created at `now`.
fn attachment_filename(kind: TransactionKind, now: OffsetDateTime) -> String {
    match kind {
        TransactionKind::Income => {
            let millis = now.unix_timestamp_nanos() / 1_000_000;
            format!("income_details_{millis}.xlsx")
        }
        TransactionKind::Expense => "expense_details.xlsx".to_owned(),
    }
}

/// Download every expense record of the logged in user as `expense_details.xlsx`.
pub async fn download_expenses(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    download::<Expense>(state, user_id)
}

/// Download every income record of the logged in user, newest first, as
/// `income_details_<unix millis>.xlsx`.
pub async fn download_income(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    download::<Income>(state, user_id)
}

fn download<T: TransactionRecord>(state: ExportState, user_id: UserID) -> Response {
    let local_offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            return Error::FormatError(format!("invalid timezone {}", state.local_timezone))
                .into_response();
        }
    };

    let store = SQLiteTransactionStore::new(state.db_connection);

    match export_transactions::<T, _>(&store, user_id, local_offset) {
        Ok(bytes) => {
            let filename = attachment_filename(T::KIND, OffsetDateTime::now_utc());
            let disposition = format!("attachment; filename={filename}");

            match HeaderValue::from_str(&disposition) {
                Ok(disposition) => (
                    [
                        (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
                        (header::CONTENT_DISPOSITION, disposition),
                    ],
                    bytes,
                )
                    .into_response(),
                Err(error) => Error::FormatError(error.to_string()).into_response(),
            }
        }
        // Store failures are reported the same way as formatting failures on
        // the download endpoints.
        Err(error) => {
            tracing::error!(
                "could not export {} for user {user_id}: {error}",
                T::KIND.collection_key()
            );
            Error::FormatError(error.to_string()).into_response()
        }
    }
}

/// Fetch the records of kind `T` owned by `user_id` and write them to a workbook.
///
/// Dates are shown as `DD/MM/YYYY` in `local_offset`.
///
/// # Errors
/// Returns any error from `store` or an [Error::FormatError] if the workbook
/// could not be written.
fn export_transactions<T: TransactionRecord, S: TransactionStore>(
    store: &S,
    user_id: UserID,
    local_offset: UtcOffset,
) -> Result<Vec<u8>, Error> {
    let layout = export_layout(T::KIND);
    let query = TransactionQuery {
        sort_date: layout.sort_date,
        ..Default::default()
    };
    let transactions: Vec<T> = store.get(user_id, &query)?;

    let rows = transactions
        .iter()
        .map(|transaction| to_row(transaction, local_offset, layout.include_icon))
        .collect::<Result<Vec<_>, Error>>()?;

    write_spreadsheet(layout.sheet_name, layout.header, &rows)
}

fn to_row<T: TransactionRecord>(
    transaction: &T,
    local_offset: UtcOffset,
    include_icon: bool,
) -> Result<Vec<Cell>, Error> {
    let label = match transaction.label().trim() {
        "" => MISSING_LABEL,
        label => label,
    };
    let date = transaction
        .date()
        .checked_to_offset(local_offset)
        .ok_or_else(|| {
            Error::FormatError(format!(
                "{} is out of range in offset {local_offset}",
                transaction.date()
            ))
        })?
        .format(DATE_FORMAT)
        .map_err(|error| Error::FormatError(error.to_string()))?;

    let mut row = vec![
        Cell::Text(label.to_owned()),
        Cell::Number(transaction.amount()),
        Cell::Text(date),
    ];

    if include_icon {
        row.push(Cell::Text(transaction.icon().to_owned()));
    }

    Ok(row)
}

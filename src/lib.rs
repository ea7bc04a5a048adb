//! A personal finance tracker backend.
//!
//! Users record income and expense transactions, fetch an aggregated
//! dashboard, and download their records as `.xlsx` spreadsheets. Every
//! route speaks JSON and is scoped to the user named by the session cookie.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod dashboard;
mod database_id;
mod db;
pub mod endpoints;
mod error;
mod export;
mod logging;
mod not_found;
mod routing;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use auth::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use dashboard::{
    DashboardSnapshot, RecentTransaction, WindowSummary, build_dashboard_snapshot,
};
pub use db::{close_connection, initialize as initialize_db};
pub use error::{EXPORT_ERROR_MESSAGE, Error, SERVER_ERROR_MESSAGE};
pub use export::{Cell, write_spreadsheet};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    Expense, Income, NewTransaction, SQLiteTransactionStore, SortOrder, TransactionKind,
    TransactionQuery, TransactionRecord, TransactionStore,
};
pub use user::UserID;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

//! Opening and closing the application's SQLite database.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::transaction::create_transaction_tables;

/// Create all the tables the application needs in a single transaction.
///
/// The tables are only created if they do not exist yet, so this is safe to
/// call on every start up.
///
/// # Errors
/// Returns an error if a table could not be created or the transaction
/// could not be committed.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_tables(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Release the shared database connection at shutdown.
///
/// If other references to the connection are still alive, the connection is
/// left open and dropped with the last reference.
pub fn close_connection(connection: Arc<Mutex<Connection>>) {
    let connection = match Arc::try_unwrap(connection) {
        Ok(connection) => connection,
        Err(connection) => {
            tracing::warn!(
                "Could not close the database connection, {} references are still alive.",
                Arc::strong_count(&connection)
            );
            return;
        }
    };

    let connection = match connection.into_inner() {
        Ok(connection) => connection,
        Err(poisoned) => {
            tracing::warn!("The database lock was poisoned, closing the connection anyway.");
            poisoned.into_inner()
        }
    };

    match connection.close() {
        Ok(()) => tracing::info!("Closed the database connection."),
        Err((_, error)) => tracing::error!("Could not close the database connection: {error}"),
    }
}

use axum::extract::FromRef;

use crate::{AppState, transaction::SQLiteTransactionStore};

/// The state needed to create, list and delete income and expense records.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The store holding the records.
    pub store: SQLiteTransactionStore,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: SQLiteTransactionStore::new(state.db_connection.clone()),
        }
    }
}

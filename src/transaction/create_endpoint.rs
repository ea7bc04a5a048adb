//! Defines the endpoint for adding an income or expense record.
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    transaction::{NewTransaction, TransactionRecord, TransactionStore, state::TransactionState},
    user::UserID,
};

/// A route handler for adding a record of kind `T`, responds with the stored record.
///
/// The same handler serves `POST /api/income` and `POST /api/expense`.
pub async fn create_transaction_endpoint<T: TransactionRecord>(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<T::Form>,
) -> Response {
    match create_transaction::<T>(&state, user_id, form.into()) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => {
            tracing::error!(
                "could not add {} for user {user_id}: {error}",
                T::KIND.table()
            );
            error.into_response()
        }
    }
}

fn create_transaction<T: TransactionRecord>(
    state: &TransactionState,
    user_id: UserID,
    new_transaction: NewTransaction,
) -> Result<T, Error> {
    let new_transaction = new_transaction.validate(T::KIND)?;

    state.store.create(user_id, new_transaction)
}

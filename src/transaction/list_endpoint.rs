//! Defines the endpoint for listing every income or expense record of a user.
use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::{
    Error,
    transaction::{
        SortOrder, TransactionQuery, TransactionRecord, TransactionStore, state::TransactionState,
    },
    user::UserID,
};

/// A route handler that responds with every record of kind `T` owned by the
/// user, newest first, e.g. `{ "incomes": [...] }`.
pub async fn list_transactions_endpoint<T: TransactionRecord>(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    match list_transactions::<T>(&state, user_id) {
        Ok(body) => Json(body).into_response(),
        Err(error) => {
            tracing::error!(
                "could not list {} for user {user_id}: {error}",
                T::KIND.collection_key()
            );
            error.into_response()
        }
    }
}

fn list_transactions<T: TransactionRecord>(
    state: &TransactionState,
    user_id: UserID,
) -> Result<Value, Error> {
    let query = TransactionQuery {
        sort_date: Some(SortOrder::Descending),
        ..Default::default()
    };
    let transactions: Vec<T> = state.store.get(user_id, &query)?;
    let transactions = serde_json::to_value(transactions)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    let mut body = Map::new();
    body.insert(T::KIND.collection_key().to_owned(), transactions);

    Ok(Value::Object(body))
}

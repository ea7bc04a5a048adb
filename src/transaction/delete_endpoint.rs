//! Defines the endpoint for deleting an income or expense record.
use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    database_id::TransactionId,
    transaction::{TransactionRecord, TransactionStore, state::TransactionState},
    user::UserID,
};

/// A route handler for deleting a record of kind `T` owned by the user.
///
/// Responds with 404 if the record does not exist or belongs to someone else.
pub async fn delete_transaction_endpoint<T: TransactionRecord>(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state.store.delete::<T>(user_id, transaction_id) {
        Ok(()) => Json(json!({
            "message": format!("{} deleted successfully", T::KIND.display_name())
        }))
        .into_response(),
        Err(error) => {
            tracing::error!(
                "Could not delete {} {transaction_id}: {error}",
                T::KIND.table()
            );
            error.into_response()
        }
    }
}

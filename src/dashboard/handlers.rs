//! Dashboard HTTP handler.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, dashboard::aggregation::build_dashboard_snapshot,
    transaction::SQLiteTransactionStore, user::UserID,
};

/// The state needed for building the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection holding the income and expense records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with the dashboard snapshot of the logged in user as of now.
pub async fn get_dashboard_data(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let store = SQLiteTransactionStore::new(state.db_connection);

    match build_dashboard_snapshot(&store, user_id, OffsetDateTime::now_utc()) {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(error) => {
            tracing::error!("could not build dashboard for user {user_id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use serde_json::Value;
    use time::{Duration, OffsetDateTime};

    use crate::{
        test_utils::parse_json_body,
        transaction::{
            Expense, Income, NewTransaction, SQLiteTransactionStore, TransactionStore,
            create_transaction_tables,
        },
        user::UserID,
    };

    use super::{DashboardState, get_dashboard_data};

    #[tokio::test]
    async fn responds_with_snapshot() {
        let connection = Connection::open_in_memory().unwrap();
        create_transaction_tables(&connection).unwrap();
        let db_connection = Arc::new(Mutex::new(connection));
        let store = SQLiteTransactionStore::new(db_connection.clone());
        let user_id = UserID::new(1);
        let yesterday = OffsetDateTime::now_utc() - Duration::days(1);
        store
            .create::<Income>(
                user_id,
                NewTransaction {
                    label: "Salary".to_owned(),
                    amount: 500.0,
                    date: yesterday,
                    icon: None,
                },
            )
            .unwrap();
        store
            .create::<Expense>(
                user_id,
                NewTransaction {
                    label: "Rent".to_owned(),
                    amount: 200.0,
                    date: yesterday,
                    icon: Some("🏠".to_owned()),
                },
            )
            .unwrap();

        let response =
            get_dashboard_data(State(DashboardState { db_connection }), Extension(user_id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = parse_json_body(response).await;
        assert_eq!(body["totalBalance"], 300.0);
        assert_eq!(body["last30DaysExpenses"]["total"], 200.0);
        assert_eq!(body["last60DaysIncome"]["total"], 500.0);
        assert_eq!(body["recentTransactions"][0]["type"], "income");
        assert_eq!(body["recentTransactions"][1]["type"], "expense");
        assert_eq!(body["recentTransactions"][1]["icon"], "🏠");
    }

    #[tokio::test]
    async fn missing_tables_give_server_error() {
        let db_connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));

        let response = get_dashboard_data(
            State(DashboardState { db_connection }),
            Extension(UserID::new(1)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = parse_json_body(response).await;
        assert_eq!(body["message"], "Server Error");
        assert!(body["error"].is_string());
    }
}

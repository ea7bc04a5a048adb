//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get},
};

use crate::{
    AppState,
    auth::auth_guard,
    dashboard::get_dashboard_data,
    endpoints,
    export::{download_expenses, download_income},
    not_found::get_404_not_found,
    transaction::{
        Expense, Income, create_transaction_endpoint, delete_transaction_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(endpoints::COFFEE, get(get_coffee));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_data))
        .route(
            endpoints::INCOME,
            get(list_transactions_endpoint::<Income>).post(create_transaction_endpoint::<Income>),
        )
        .route(
            endpoints::INCOME_ITEM,
            delete(delete_transaction_endpoint::<Income>),
        )
        .route(endpoints::INCOME_DOWNLOAD, get(download_income))
        .route(
            endpoints::EXPENSE,
            get(list_transactions_endpoint::<Expense>)
                .post(create_transaction_endpoint::<Expense>),
        )
        .route(
            endpoints::EXPENSE_ITEM,
            delete(delete_transaction_endpoint::<Expense>),
        )
        .route(endpoints::EXPENSE_DOWNLOAD, get(download_expenses))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}

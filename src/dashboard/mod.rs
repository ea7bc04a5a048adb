//! Dashboard module
//!
//! Aggregates a user's income and expense records into totals, date windows
//! and a list of the most recent transactions.

mod aggregation;
mod handlers;

pub use aggregation::{
    DashboardSnapshot, RecentTransaction, WindowSummary, build_dashboard_snapshot,
};
pub use handlers::get_dashboard_data;

//! Income and expense records.
//!
//! This module contains everything related to the two transaction kinds:
//! - The [Income] and [Expense] models and the [TransactionRecord] trait they share
//! - The [TransactionStore] trait and its SQLite implementation
//! - The JSON endpoints for adding, listing and deleting records

mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod list_endpoint;
mod sqlite;
mod state;
mod store;

pub use core::{Expense, Income, NewTransaction, TransactionKind, TransactionRecord};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use form::{ExpenseForm, IncomeForm};
pub use list_endpoint::list_transactions_endpoint;
pub use sqlite::{SQLiteTransactionStore, create_transaction_tables};
pub use state::TransactionState;
pub use store::{SortOrder, TransactionQuery, TransactionStore};

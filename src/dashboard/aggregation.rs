//! Builds the dashboard snapshot from the transaction store.
//!
//! The snapshot is a pure function of one user's records and the instant
//! `now`, so callers inject the time rather than reading the clock here.

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    transaction::{
        Expense, Income, SortOrder, TransactionQuery, TransactionRecord, TransactionStore,
    },
    user::UserID,
};

/// How far back the expense window of the dashboard reaches.
pub const EXPENSE_WINDOW_DAYS: i64 = 30;

/// How far back the income window of the dashboard reaches.
pub const INCOME_WINDOW_DAYS: i64 = 60;

/// How many of the most recent records of each kind are considered for the
/// recent transactions list.
pub const RECENT_PER_KIND: u64 = 5;

/// The maximum length of the recent transactions list.
pub const RECENT_TRANSACTIONS_LIMIT: usize = 10;

// ============================================================================
// MODELS
// ============================================================================

/// The records of one kind that fall inside a date window, and their sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary<T> {
    /// The sum of the amounts of `transactions`, zero if there are none.
    pub total: f64,
    /// The records in the window, newest first.
    pub transactions: Vec<T>,
}

/// An income or expense record tagged with its kind, e.g. `{"type": "income", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecentTransaction {
    /// A recent income record.
    Income(Income),
    /// A recent expense record.
    Expense(Expense),
}

impl RecentTransaction {
    /// When the money changed hands.
    pub fn date(&self) -> OffsetDateTime {
        match self {
            RecentTransaction::Income(income) => income.date,
            RecentTransaction::Expense(expense) => expense.date,
        }
    }
}

/// The aggregated view of a user's finances shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Total income minus total expenses, may be negative.
    pub total_balance: f64,
    /// The sum of every income record.
    pub total_income: f64,
    /// The sum of every expense record.
    pub total_expenses: f64,
    /// Expenses from the last [EXPENSE_WINDOW_DAYS] days.
    #[serde(rename = "last30DaysExpenses")]
    pub last_30_days_expenses: WindowSummary<Expense>,
    /// Income from the last [INCOME_WINDOW_DAYS] days.
    #[serde(rename = "last60DaysIncome")]
    pub last_60_days_income: WindowSummary<Income>,
    /// Up to [RECENT_TRANSACTIONS_LIMIT] of the newest records of either kind.
    pub recent_transactions: Vec<RecentTransaction>,
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Compute the dashboard snapshot for `user_id` as of `now`.
///
/// Date windows are inclusive of their lower bound, so a record dated
/// exactly 30 days before `now` counts toward the expense window.
///
/// # Errors
/// Returns the first error reported by `store`, or an [Error::NonFiniteTotal]
/// if a sum overflows. No partial snapshot is returned.
pub fn build_dashboard_snapshot<S: TransactionStore>(
    store: &S,
    user_id: UserID,
    now: OffsetDateTime,
) -> Result<DashboardSnapshot, Error> {
    let total_income = check_finite("totalIncome", store.total::<Income>(user_id)?)?;
    let total_expenses = check_finite("totalExpenses", store.total::<Expense>(user_id)?)?;

    let last_60_days_income =
        get_window_summary::<Income, S>(store, user_id, now - Duration::days(INCOME_WINDOW_DAYS))?;
    let last_30_days_expenses = get_window_summary::<Expense, S>(
        store,
        user_id,
        now - Duration::days(EXPENSE_WINDOW_DAYS),
    )?;

    let recent_income: Vec<Income> = store.get(user_id, &recent_query())?;
    let recent_expenses: Vec<Expense> = store.get(user_id, &recent_query())?;

    Ok(DashboardSnapshot {
        total_balance: check_finite("totalBalance", total_income - total_expenses)?,
        total_income,
        total_expenses,
        last_30_days_expenses,
        last_60_days_income,
        recent_transactions: merge_recent(recent_income, recent_expenses),
    })
}

fn get_window_summary<T: TransactionRecord, S: TransactionStore>(
    store: &S,
    user_id: UserID,
    since: OffsetDateTime,
) -> Result<WindowSummary<T>, Error> {
    let transactions: Vec<T> = store.get(
        user_id,
        &TransactionQuery {
            since: Some(since),
            limit: None,
            sort_date: Some(SortOrder::Descending),
        },
    )?;
    let total = check_finite(
        T::KIND.collection_key(),
        transactions.iter().map(|transaction| transaction.amount()).sum(),
    )?;

    Ok(WindowSummary {
        total,
        transactions,
    })
}

/// JSON has no representation for infinity or NaN, so such a sum is an error.
fn check_finite(name: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        tracing::error!("the {name} total {value} is not finite");
        Err(Error::NonFiniteTotal(name))
    }
}

fn recent_query() -> TransactionQuery {
    TransactionQuery {
        since: None,
        limit: Some(RECENT_PER_KIND),
        sort_date: Some(SortOrder::Descending),
    }
}

/// Merge the newest income and expense records into one list, newest first.
///
/// The sort is stable and income is placed before expenses, so records with
/// the same date keep income first and otherwise keep their fetch order.
fn merge_recent(income: Vec<Income>, expenses: Vec<Expense>) -> Vec<RecentTransaction> {
    let mut merged: Vec<RecentTransaction> = income
        .into_iter()
        .map(RecentTransaction::Income)
        .chain(expenses.into_iter().map(RecentTransaction::Expense))
        .collect();

    merged.sort_by(|a, b| b.date().cmp(&a.date()));
    merged.truncate(RECENT_TRANSACTIONS_LIMIT);

    merged
}

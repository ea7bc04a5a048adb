//! Defines the income and expense models and the trait the store uses to map them to rows.

use rusqlite::{Row, types::Type};
use serde::{Serialize, de::DeserializeOwned};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::form::{ExpenseForm, IncomeForm},
    user::UserID,
};

// ============================================================================
// MODELS
// ============================================================================

/// The two collections a transaction can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The SQL table holding records of this kind.
    pub fn table(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// The name of the free-text label column, which doubles as the JSON field name.
    pub fn label_field(self) -> &'static str {
        match self {
            TransactionKind::Income => "source",
            TransactionKind::Expense => "category",
        }
    }

    /// The JSON key used when listing every record of this kind.
    pub fn collection_key(self) -> &'static str {
        match self {
            TransactionKind::Income => "incomes",
            TransactionKind::Expense => "expenses",
        }
    }

    /// The icon shown for records that were stored without one.
    pub fn default_icon(self) -> &'static str {
        match self {
            TransactionKind::Income => "💰",
            TransactionKind::Expense => "💸",
        }
    }

    /// A capitalised name for user facing messages.
    pub fn display_name(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

/// Money that a user earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    /// The ID of the income record.
    pub id: TransactionId,
    /// The user that owns the record.
    pub user_id: UserID,
    /// Where the money came from, e.g. "Salary".
    pub source: String,
    /// How much money was earned.
    pub amount: f64,
    /// When the money was earned, as entered by the user.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// A display glyph, defaulted to [TransactionKind::default_icon] when not set.
    pub icon: String,
}

/// Money that a user spent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense record.
    pub id: TransactionId,
    /// The user that owns the record.
    pub user_id: UserID,
    /// What the money was spent on, e.g. "Groceries".
    pub category: String,
    /// How much money was spent.
    pub amount: f64,
    /// When the money was spent, as entered by the user.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// A display glyph, defaulted to [TransactionKind::default_icon] when not set.
    pub icon: String,
}

/// The shared behaviour of [Income] and [Expense] records.
///
/// Stores and the dashboard are written once against this trait and
/// instantiated for each kind.
pub trait TransactionRecord: Serialize + Send + Sync + Sized + 'static {
    /// Which collection the record belongs to.
    const KIND: TransactionKind;

    /// The JSON body used to create a record of this kind.
    type Form: DeserializeOwned + Into<NewTransaction> + Send + 'static;

    /// Convert a row selected as `id, user_id, <label>, amount, date, icon` into a record.
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the corresponding rust type.
    fn map_row(row: &Row) -> Result<Self, rusqlite::Error>;

    /// The source or category of the record.
    fn label(&self) -> &str;

    /// The amount of money that changed hands.
    fn amount(&self) -> f64;

    /// When the money changed hands.
    fn date(&self) -> OffsetDateTime;

    /// The display glyph of the record.
    fn icon(&self) -> &str;
}

impl TransactionRecord for Income {
    const KIND: TransactionKind = TransactionKind::Income;
    type Form = IncomeForm;

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            source: row.get(2)?,
            amount: row.get(3)?,
            date: get_date(row, 4)?,
            icon: resolve_icon(row.get(5)?, Self::KIND),
        })
    }

    fn label(&self) -> &str {
        &self.source
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn date(&self) -> OffsetDateTime {
        self.date
    }

    fn icon(&self) -> &str {
        &self.icon
    }
}

impl TransactionRecord for Expense {
    const KIND: TransactionKind = TransactionKind::Expense;
    type Form = ExpenseForm;

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category: row.get(2)?,
            amount: row.get(3)?,
            date: get_date(row, 4)?,
            icon: resolve_icon(row.get(5)?, Self::KIND),
        })
    }

    fn label(&self) -> &str {
        &self.category
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn date(&self) -> OffsetDateTime {
        self.date
    }

    fn icon(&self) -> &str {
        &self.icon
    }
}

/// Dates are stored as whole seconds since the Unix epoch so that SQLite can
/// compare and sort them as integers.
fn get_date(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let timestamp: i64 = row.get(index)?;

    OffsetDateTime::from_unix_timestamp(timestamp).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}

fn resolve_icon(icon: Option<String>, kind: TransactionKind) -> String {
    icon.filter(|icon| !icon.trim().is_empty())
        .unwrap_or_else(|| kind.default_icon().to_owned())
}

// ============================================================================
// NEW TRANSACTIONS
// ============================================================================

/// The validated fields of a record that has not been stored yet.
///
/// To create a `NewTransaction`, convert an [IncomeForm] or [ExpenseForm] and
/// then call [NewTransaction::validate].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The source (income) or category (expense).
    pub label: String,
    /// The amount of money, must be finite and zero or more.
    pub amount: f64,
    /// When the money changed hands.
    pub date: OffsetDateTime,
    /// An optional display glyph. `None` stores no icon so the default is
    /// used when the record is read.
    pub icon: Option<String>,
}

impl NewTransaction {
    /// Check the record before it is written to a store of `kind`.
    ///
    /// Surrounding whitespace is trimmed from the label and blank icons are
    /// treated as missing.
    ///
    /// # Errors
    /// Returns an [Error::EmptyLabel] if the label is blank, or an
    /// [Error::InvalidAmount] if the amount is negative, NaN or infinite.
    pub fn validate(self, kind: TransactionKind) -> Result<Self, Error> {
        let label = self.label.trim();

        if label.is_empty() {
            return Err(Error::EmptyLabel(kind.label_field()));
        }

        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        Ok(Self {
            label: label.to_owned(),
            amount: self.amount,
            date: self.date,
            icon: self.icon.filter(|icon| !icon.trim().is_empty()),
        })
    }
}

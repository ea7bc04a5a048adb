//! The JSON bodies accepted when creating income and expense records.

use serde::Deserialize;
use time::OffsetDateTime;

use crate::transaction::NewTransaction;

mod date_input {
    //! Deserializes the `date` field of a new record.
    //!
    //! Clients send either a full RFC 3339 timestamp or the plain
    //! `YYYY-MM-DD` value of an HTML date input. Plain dates are taken to
    //! mean midnight UTC.
    use serde::{Deserialize, Deserializer};
    use time::{
        Date, OffsetDateTime, format_description::BorrowedFormatItem,
        format_description::well_known::Rfc3339, macros::format_description,
    };

    const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        if let Ok(date_time) = OffsetDateTime::parse(&s, &Rfc3339) {
            return Ok(date_time);
        }

        Date::parse(&s, DATE_FORMAT)
            .map(|date| date.midnight().assume_utc())
            .map_err(serde::de::Error::custom)
    }
}

/// The body of a request to add an income record.
#[derive(Debug, Deserialize)]
pub struct IncomeForm {
    /// Where the money came from.
    #[serde(default)]
    pub source: String,
    /// How much money was earned.
    pub amount: f64,
    /// When the money was earned.
    #[serde(deserialize_with = "date_input::deserialize")]
    pub date: OffsetDateTime,
    /// An optional display glyph.
    #[serde(default)]
    pub icon: Option<String>,
}

impl From<IncomeForm> for NewTransaction {
    fn from(form: IncomeForm) -> Self {
        Self {
            label: form.source,
            amount: form.amount,
            date: form.date,
            icon: form.icon,
        }
    }
}

/// The body of a request to add an expense record.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// What the money was spent on.
    #[serde(default)]
    pub category: String,
    /// How much money was spent.
    pub amount: f64,
    /// When the money was spent.
    #[serde(deserialize_with = "date_input::deserialize")]
    pub date: OffsetDateTime,
    /// An optional display glyph.
    #[serde(default)]
    pub icon: Option<String>,
}

impl From<ExpenseForm> for NewTransaction {
    fn from(form: ExpenseForm) -> Self {
        Self {
            label: form.category,
            amount: form.amount,
            date: form.date,
            icon: form.icon,
        }
    }
}

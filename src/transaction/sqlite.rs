//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        NewTransaction, TransactionKind, TransactionRecord,
        store::{SortOrder, TransactionQuery, TransactionStore},
    },
    user::UserID,
};

/// Create the income and expense tables.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_transaction_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for kind in [TransactionKind::Income, TransactionKind::Expense] {
        let table = kind.table();
        let label = kind.label_field();

        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                {label} TEXT NOT NULL,
                amount REAL NOT NULL,
                date INTEGER NOT NULL,
                icon TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_user_date ON {table}(user_id, date);"
        ))?;
    }

    Ok(())
}

/// Stores income and expense records in a SQLite database.
///
/// The connection is shared with the rest of the application and is locked
/// for the duration of each query.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The tables must already exist, see [create_transaction_tables].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

fn select_columns(kind: TransactionKind) -> String {
    format!(
        "id, user_id, {label}, amount, date, icon",
        label = kind.label_field()
    )
}

impl TransactionStore for SQLiteTransactionStore {
    fn create<T: TransactionRecord>(
        &self,
        user_id: UserID,
        new_transaction: NewTransaction,
    ) -> Result<T, Error> {
        let kind = T::KIND;
        let query = format!(
            "INSERT INTO {table} (user_id, {label}, amount, date, icon)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {columns}",
            table = kind.table(),
            label = kind.label_field(),
            columns = select_columns(kind),
        );

        let transaction = self.lock()?.prepare(&query)?.query_row(
            (
                user_id,
                new_transaction.label,
                new_transaction.amount,
                new_transaction.date.unix_timestamp(),
                new_transaction.icon,
            ),
            T::map_row,
        )?;

        Ok(transaction)
    }

    /// Retrieve the records of kind `T` owned by `user_id`.
    ///
    /// # Errors
    /// Returns an [Error::StoreUnavailable] if there is an SQL error.
    fn get<T: TransactionRecord>(
        &self,
        user_id: UserID,
        query: &TransactionQuery,
    ) -> Result<Vec<T>, Error> {
        let kind = T::KIND;
        let mut sql = format!(
            "SELECT {columns} FROM {table} WHERE user_id = ?1",
            columns = select_columns(kind),
            table = kind.table(),
        );
        let mut params = vec![Value::Integer(user_id.as_i64())];

        if let Some(since) = query.since {
            // Dates are stored in whole seconds, so round a fractional bound up.
            let since_seconds = since.unix_timestamp() + i64::from(since.nanosecond() > 0);
            params.push(Value::Integer(since_seconds));
            sql.push_str(&format!(" AND date >= ?{}", params.len()));
        }

        match query.sort_date {
            Some(SortOrder::Ascending) => sql.push_str(" ORDER BY date ASC, id ASC"),
            Some(SortOrder::Descending) => sql.push_str(" ORDER BY date DESC, id ASC"),
            None => sql.push_str(" ORDER BY id ASC"),
        }

        if let Some(limit) = query.limit {
            params.push(Value::Integer(limit.try_into().unwrap_or(i64::MAX)));
            sql.push_str(&format!(" LIMIT ?{}", params.len()));
        }

        let connection = self.lock()?;
        let mut statement = connection.prepare(&sql)?;

        statement
            .query_map(params_from_iter(params), T::map_row)?
            .collect::<Result<Vec<T>, rusqlite::Error>>()
            .map_err(|error| error.into())
    }

    fn total<T: TransactionRecord>(&self, user_id: UserID) -> Result<f64, Error> {
        let query = format!(
            "SELECT COALESCE(SUM(amount), 0.0) FROM {table} WHERE user_id = ?1",
            table = T::KIND.table()
        );

        self.lock()?
            .query_row(&query, (user_id,), |row| row.get(0))
            .map_err(|error| error.into())
    }

    /// Delete a record of kind `T` by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a record owned by `user_id`,
    /// - or [Error::StoreUnavailable] if there is some other SQL error.
    fn delete<T: TransactionRecord>(
        &self,
        user_id: UserID,
        id: TransactionId,
    ) -> Result<(), Error> {
        let query = format!(
            "DELETE FROM {table} WHERE id = ?1 AND user_id = ?2",
            table = T::KIND.table()
        );

        let rows_affected = self.lock()?.execute(&query, (id, user_id))?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        Error,
        transaction::{
            Expense, Income, NewTransaction, SQLiteTransactionStore, SortOrder, TransactionQuery,
            TransactionStore, create_transaction_tables,
        },
        user::UserID,
    };

    fn get_store() -> SQLiteTransactionStore {
        let connection = Connection::open_in_memory().unwrap();
        create_transaction_tables(&connection).unwrap();
        SQLiteTransactionStore::new(Arc::new(Mutex::new(connection)))
    }

    fn new_transaction(label: &str, amount: f64, date: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            label: label.to_owned(),
            amount,
            date,
            icon: None,
        }
    }

    #[test]
    fn create_returns_stored_income() {
        let store = get_store();
        let user_id = UserID::new(1);
        let date = datetime!(2025-01-15 08:00 UTC);

        let income: Income = store
            .create(
                user_id,
                NewTransaction {
                    icon: Some("💼".to_owned()),
                    ..new_transaction("Salary", 2500.0, date)
                },
            )
            .unwrap();

        assert!(income.id > 0);
        assert_eq!(income.user_id, user_id);
        assert_eq!(income.source, "Salary");
        assert_eq!(income.amount, 2500.0);
        assert_eq!(income.date, date);
        assert_eq!(income.icon, "💼");
    }

    #[test]
    fn create_without_icon_reads_back_default() {
        let store = get_store();

        let expense: Expense = store
            .create(
                UserID::new(1),
                new_transaction("Groceries", 80.0, datetime!(2025-01-15 08:00 UTC)),
            )
            .unwrap();

        assert_eq!(expense.icon, "💸");
    }

    #[test]
    fn get_only_returns_records_for_owner() {
        let store = get_store();
        let date = datetime!(2025-01-15 08:00 UTC);
        let owner = UserID::new(1);
        let other = UserID::new(2);
        store
            .create::<Income>(owner, new_transaction("Salary", 10.0, date))
            .unwrap();
        store
            .create::<Income>(other, new_transaction("Bonus", 20.0, date))
            .unwrap();

        let got: Vec<Income> = store.get(owner, &TransactionQuery::default()).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].source, "Salary");
    }

    #[test]
    fn get_with_since_is_inclusive() {
        let store = get_store();
        let user_id = UserID::new(1);
        let since = datetime!(2025-01-15 00:00 UTC);
        store
            .create::<Expense>(user_id, new_transaction("Before", 1.0, since - Duration::seconds(1)))
            .unwrap();
        store
            .create::<Expense>(user_id, new_transaction("At", 2.0, since))
            .unwrap();
        store
            .create::<Expense>(user_id, new_transaction("After", 3.0, since + Duration::days(1)))
            .unwrap();

        let got: Vec<Expense> = store
            .get(
                user_id,
                &TransactionQuery {
                    since: Some(since),
                    ..Default::default()
                },
            )
            .unwrap();

        let labels: Vec<_> = got.iter().map(|expense| expense.category.as_str()).collect();
        assert_eq!(labels, ["At", "After"]);
    }

    #[test]
    fn get_with_fractional_since_excludes_earlier_second() {
        let store = get_store();
        let user_id = UserID::new(1);
        let since = datetime!(2025-05-31 12:00:00.5 UTC);
        store
            .create::<Expense>(
                user_id,
                new_transaction("Half second early", 1.0, datetime!(2025-05-31 12:00:00 UTC)),
            )
            .unwrap();
        store
            .create::<Expense>(
                user_id,
                new_transaction("Next second", 2.0, datetime!(2025-05-31 12:00:01 UTC)),
            )
            .unwrap();

        let got: Vec<Expense> = store
            .get(
                user_id,
                &TransactionQuery {
                    since: Some(since),
                    ..Default::default()
                },
            )
            .unwrap();

        let labels: Vec<_> = got.iter().map(|expense| expense.category.as_str()).collect();
        assert_eq!(labels, ["Next second"]);
    }

    #[test]
    fn get_sorts_descending_with_ties_in_insertion_order() {
        let store = get_store();
        let user_id = UserID::new(1);
        let day = datetime!(2025-01-15 00:00 UTC);
        for (label, date) in [
            ("old", day - Duration::days(3)),
            ("tie-first", day),
            ("new", day + Duration::days(1)),
            ("tie-second", day),
        ] {
            store
                .create::<Income>(user_id, new_transaction(label, 1.0, date))
                .unwrap();
        }

        let got: Vec<Income> = store
            .get(
                user_id,
                &TransactionQuery {
                    sort_date: Some(SortOrder::Descending),
                    ..Default::default()
                },
            )
            .unwrap();

        let labels: Vec<_> = got.iter().map(|income| income.source.as_str()).collect();
        assert_eq!(labels, ["new", "tie-first", "tie-second", "old"]);
    }

    #[test]
    fn get_with_limit_returns_most_recent() {
        let store = get_store();
        let user_id = UserID::new(1);
        let start = datetime!(2025-01-01 00:00 UTC);
        for day in 0..8 {
            store
                .create::<Expense>(
                    user_id,
                    new_transaction(&format!("day {day}"), 1.0, start + Duration::days(day)),
                )
                .unwrap();
        }

        let got: Vec<Expense> = store
            .get(
                user_id,
                &TransactionQuery {
                    limit: Some(5),
                    sort_date: Some(SortOrder::Descending),
                    ..Default::default()
                },
            )
            .unwrap();

        let labels: Vec<_> = got.iter().map(|expense| expense.category.as_str()).collect();
        assert_eq!(labels, ["day 7", "day 6", "day 5", "day 4", "day 3"]);
    }

    #[test]
    fn total_is_zero_without_records() {
        let store = get_store();

        assert_eq!(store.total::<Income>(UserID::new(1)), Ok(0.0));
        assert_eq!(store.total::<Expense>(UserID::new(1)), Ok(0.0));
    }

    #[test]
    fn total_sums_owner_records_of_one_kind() {
        let store = get_store();
        let user_id = UserID::new(1);
        let date = datetime!(2025-01-15 08:00 UTC);
        store
            .create::<Income>(user_id, new_transaction("Salary", 100.0, date))
            .unwrap();
        store
            .create::<Income>(user_id, new_transaction("Bonus", 50.5, date))
            .unwrap();
        store
            .create::<Expense>(user_id, new_transaction("Rent", 70.0, date))
            .unwrap();
        store
            .create::<Income>(UserID::new(2), new_transaction("Salary", 999.0, date))
            .unwrap();

        assert_eq!(store.total::<Income>(user_id), Ok(150.5));
        assert_eq!(store.total::<Expense>(user_id), Ok(70.0));
    }

    #[test]
    fn delete_removes_record() {
        let store = get_store();
        let user_id = UserID::new(1);
        let income: Income = store
            .create(
                user_id,
                new_transaction("Salary", 1.0, datetime!(2025-01-15 08:00 UTC)),
            )
            .unwrap();

        store.delete::<Income>(user_id, income.id).unwrap();

        let remaining: Vec<Income> = store.get(user_id, &TransactionQuery::default()).unwrap();
        assert!(remaining.is_empty());
    }

    #[test]
    fn delete_fails_for_other_owner() {
        let store = get_store();
        let owner = UserID::new(1);
        let expense: Expense = store
            .create(
                owner,
                new_transaction("Rent", 1.0, datetime!(2025-01-15 08:00 UTC)),
            )
            .unwrap();

        let got = store.delete::<Expense>(UserID::new(2), expense.id);

        assert_eq!(got, Err(Error::NotFound));
        let remaining: Vec<Expense> = store.get(owner, &TransactionQuery::default()).unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn delete_missing_record_is_not_found() {
        let store = get_store();

        assert_eq!(
            store.delete::<Income>(UserID::new(1), 42),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn missing_table_is_store_unavailable() {
        let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(
            Connection::open_in_memory().unwrap(),
        )));

        let got = store.total::<Income>(UserID::new(1));

        assert!(matches!(got, Err(Error::StoreUnavailable(_))));
    }
}

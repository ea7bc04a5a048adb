//! Defines the transaction store trait.

use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{NewTransaction, TransactionRecord},
    user::UserID,
};

/// Handles the creation, retrieval and deletion of income and expense records.
///
/// Every operation is scoped to the records owned by `user_id`.
pub trait TransactionStore {
    /// Store a new record of kind `T` for `user_id`.
    ///
    /// `new_transaction` should already be validated.
    fn create<T: TransactionRecord>(
        &self,
        user_id: UserID,
        new_transaction: NewTransaction,
    ) -> Result<T, Error>;

    /// Retrieve the records of kind `T` owned by `user_id` in the way defined by `query`.
    fn get<T: TransactionRecord>(
        &self,
        user_id: UserID,
        query: &TransactionQuery,
    ) -> Result<Vec<T>, Error>;

    /// Sum the amounts of every record of kind `T` owned by `user_id`.
    ///
    /// Returns zero if the user has no records.
    fn total<T: TransactionRecord>(&self, user_id: UserID) -> Result<f64, Error>;

    /// Delete the record of kind `T` with `id` if it is owned by `user_id`.
    ///
    /// # Errors
    /// Implementers should return [Error::NotFound] if there is no such record
    /// for this user.
    fn delete<T: TransactionRecord>(&self, user_id: UserID, id: TransactionId)
    -> Result<(), Error>;
}

/// Defines how transactions should be fetched from [TransactionStore::get].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only include records dated at or after `since`.
    pub since: Option<OffsetDateTime>,
    /// Selects up to the first N (`limit`) records.
    pub limit: Option<u64>,
    /// Orders records by date in the order `sort_date`. None returns records
    /// in the order they were stored.
    ///
    /// Records with the same date are always returned in the order they were stored.
    pub sort_date: Option<SortOrder>,
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

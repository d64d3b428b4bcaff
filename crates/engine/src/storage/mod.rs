//! Storage backends.
//!
//! [`Storage`] is the seam between the engine and where entities live. Two
//! backends implement it:
//!
//! - [`MemoryStore`]: in-process maps guarded by one mutex, gone on restart.
//! - [`SqlStore`]: sea-orm over SQLite or PostgreSQL.
//!
//! Operations that touch more than one entity (`insert_user`,
//! `insert_record`, `delete_user`, `deposit`) are atomic in both backends.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    Account, Category, Record, RecordFilter, ResultEngine, User,
    validation::{NewCategory, NewRecord, NewUser},
};

pub use memory::MemoryStore;
pub use sql::SqlStore;

mod memory;
mod sql;

#[async_trait]
pub trait Storage: Debug + Send + Sync {
    /// Store a new user together with its empty account.
    async fn insert_user(&self, user: &NewUser) -> ResultEngine<User>;
    async fn user(&self, id: i32) -> ResultEngine<User>;
    async fn users(&self) -> ResultEngine<Vec<User>>;
    /// Delete a user and its account. Records are left untouched.
    async fn delete_user(&self, id: i32) -> ResultEngine<()>;

    async fn insert_category(&self, category: &NewCategory) -> ResultEngine<Category>;
    async fn category(&self, id: i32) -> ResultEngine<Category>;
    async fn categories(&self) -> ResultEngine<Vec<Category>>;
    async fn delete_category(&self, id: i32) -> ResultEngine<()>;

    /// Resolve user and category, debit the account and store the record,
    /// all or nothing.
    async fn insert_record(
        &self,
        record: &NewRecord,
        timestamp: DateTime<Utc>,
    ) -> ResultEngine<Record>;
    async fn record(&self, id: i32) -> ResultEngine<Record>;
    /// Records matching `filter`, ordered by id.
    async fn records(&self, filter: &RecordFilter) -> ResultEngine<Vec<Record>>;
    async fn delete_record(&self, id: i32) -> ResultEngine<()>;

    async fn account(&self, user_id: i32) -> ResultEngine<Account>;
    /// Atomically add `amount` to the account balance.
    async fn deposit(&self, user_id: i32, amount: f64) -> ResultEngine<Account>;

    /// Round-trip to the backend.
    async fn ping(&self) -> ResultEngine<()>;
}

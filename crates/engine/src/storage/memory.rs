//! In-process storage.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    Account, Category, Record, RecordFilter, ResultEngine, User,
    error::{
        account_not_found, balance_overflow, category_not_found, insufficient_funds,
        invalid_reference, record_not_found, sequence_exhausted, user_not_found,
    },
    validation::{NewCategory, NewRecord, NewUser},
};

use super::Storage;

/// Monotonic id source. The first id handed out is 1 and no id is reused.
#[derive(Debug, Default)]
struct Sequence(i32);

impl Sequence {
    fn next_id(&mut self) -> Option<i32> {
        self.0 = self.0.checked_add(1)?;
        Some(self.0)
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    accounts: BTreeMap<i32, Account>,
    categories: BTreeMap<i32, Category>,
    records: BTreeMap<i32, Record>,
    user_ids: Sequence,
    category_ids: Sequence,
    record_ids: Sequence,
}

/// Keeps every entity in memory for the lifetime of the process.
///
/// All tables and id sequences sit behind a single lock, so each operation
/// observes and mutates a consistent snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn insert_user(&self, user: &NewUser) -> ResultEngine<User> {
        let mut tables = self.tables.lock().await;
        let id = tables
            .user_ids
            .next_id()
            .ok_or_else(|| sequence_exhausted("users"))?;
        let user = User {
            id,
            name: user.name.clone(),
        };
        tables.users.insert(id, user.clone());
        tables.accounts.insert(id, Account::new(id));
        Ok(user)
    }

    async fn user(&self, id: i32) -> ResultEngine<User> {
        let tables = self.tables.lock().await;
        tables.users.get(&id).cloned().ok_or_else(user_not_found)
    }

    async fn users(&self) -> ResultEngine<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn delete_user(&self, id: i32) -> ResultEngine<()> {
        let mut tables = self.tables.lock().await;
        tables.users.remove(&id).ok_or_else(user_not_found)?;
        tables.accounts.remove(&id);
        Ok(())
    }

    async fn insert_category(&self, category: &NewCategory) -> ResultEngine<Category> {
        let mut tables = self.tables.lock().await;
        let id = tables
            .category_ids
            .next_id()
            .ok_or_else(|| sequence_exhausted("categories"))?;
        let category = Category {
            id,
            name: category.name.clone(),
        };
        tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn category(&self, id: i32) -> ResultEngine<Category> {
        let tables = self.tables.lock().await;
        tables.categories.get(&id).cloned().ok_or_else(category_not_found)
    }

    async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let tables = self.tables.lock().await;
        Ok(tables.categories.values().cloned().collect())
    }

    async fn delete_category(&self, id: i32) -> ResultEngine<()> {
        let mut tables = self.tables.lock().await;
        tables
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or_else(category_not_found)
    }

    async fn insert_record(
        &self,
        record: &NewRecord,
        timestamp: DateTime<Utc>,
    ) -> ResultEngine<Record> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&record.user_id)
            || !tables.categories.contains_key(&record.category_id)
        {
            return Err(invalid_reference());
        }

        let account = tables
            .accounts
            .get(&record.user_id)
            .ok_or_else(account_not_found)?;
        if !account.can_cover(record.amount) {
            return Err(insufficient_funds());
        }

        let id = tables
            .record_ids
            .next_id()
            .ok_or_else(|| sequence_exhausted("records"))?;
        if let Some(account) = tables.accounts.get_mut(&record.user_id) {
            account.debit(record.amount);
        }
        let record = Record {
            id,
            user_id: record.user_id,
            category_id: record.category_id,
            amount: record.amount,
            timestamp,
        };
        tables.records.insert(id, record.clone());
        Ok(record)
    }

    async fn record(&self, id: i32) -> ResultEngine<Record> {
        let tables = self.tables.lock().await;
        tables.records.get(&id).cloned().ok_or_else(record_not_found)
    }

    async fn records(&self, filter: &RecordFilter) -> ResultEngine<Vec<Record>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .records
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn delete_record(&self, id: i32) -> ResultEngine<()> {
        let mut tables = self.tables.lock().await;
        tables
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(record_not_found)
    }

    async fn account(&self, user_id: i32) -> ResultEngine<Account> {
        let tables = self.tables.lock().await;
        tables
            .accounts
            .get(&user_id)
            .cloned()
            .ok_or_else(account_not_found)
    }

    async fn deposit(&self, user_id: i32, amount: f64) -> ResultEngine<Account> {
        let mut tables = self.tables.lock().await;
        let account = tables
            .accounts
            .get_mut(&user_id)
            .ok_or_else(account_not_found)?;
        if !account.can_receive(amount) {
            return Err(balance_overflow());
        }
        account.credit(amount);
        Ok(account.clone())
    }

    async fn ping(&self) -> ResultEngine<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_starts_at_one() {
        let mut seq = Sequence::default();
        assert_eq!(seq.next_id(), Some(1));
        assert_eq!(seq.next_id(), Some(2));
    }

    #[test]
    fn sequence_stops_at_i32_max() {
        let mut seq = Sequence(i32::MAX - 1);
        assert_eq!(seq.next_id(), Some(i32::MAX));
        assert_eq!(seq.next_id(), None);
        assert_eq!(seq.next_id(), None);
    }

    #[tokio::test]
    async fn exhausted_sequence_inserts_nothing() {
        let store = MemoryStore::new();
        store.tables.lock().await.category_ids = Sequence(i32::MAX);

        let err = store
            .insert_category(&NewCategory {
                name: "Food".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, sequence_exhausted("categories"));
        assert!(store.categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deposit_past_f64_range_is_refused() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(&NewUser {
                name: "Alice".to_string(),
            })
            .await
            .unwrap();
        store.deposit(user.id, 1e308).await.unwrap();

        let err = store.deposit(user.id, 1e308).await.unwrap_err();
        assert_eq!(err, balance_overflow());
        assert_eq!(store.account(user.id).await.unwrap().balance, 1e308);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store
            .insert_category(&NewCategory {
                name: "Food".to_string(),
            })
            .await
            .unwrap();
        store.delete_category(first.id).await.unwrap();

        let second = store
            .insert_category(&NewCategory {
                name: "Rent".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn rejected_debit_leaves_no_trace() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(&NewUser {
                name: "Alice".to_string(),
            })
            .await
            .unwrap();
        let category = store
            .insert_category(&NewCategory {
                name: "Food".to_string(),
            })
            .await
            .unwrap();

        let err = store
            .insert_record(
                &NewRecord {
                    user_id: user.id,
                    category_id: category.id,
                    amount: 1.0,
                },
                Utc::now(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, insufficient_funds());
        assert_eq!(store.account(user.id).await.unwrap().balance, 0.0);
        assert!(store.records(&RecordFilter::default()).await.unwrap().is_empty());
    }
}

//! Relational storage on top of sea-orm.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, Statement, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    Account, Category, Record, RecordFilter, ResultEngine, User, accounts, categories,
    error::{
        account_not_found, balance_overflow, category_not_found, insufficient_funds,
        invalid_reference, record_not_found, user_not_found,
    },
    records, users,
    validation::{NewCategory, NewRecord, NewUser},
};

use super::Storage;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

trait ApplyRecordFilter: QueryFilter + Sized {
    fn apply_record_filter(self, filter: &RecordFilter) -> Self;
}

impl<T> ApplyRecordFilter for T
where
    T: QueryFilter + Sized,
{
    fn apply_record_filter(mut self, filter: &RecordFilter) -> Self {
        if let Some(user_id) = filter.user_id {
            self = self.filter(records::Column::UserId.eq(user_id));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(records::Column::CategoryId.eq(category_id));
        }
        self
    }
}

/// Stores entities in a relational database.
///
/// The schema comes from the `migration` crate and must be applied before
/// the store is used.
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Storage for SqlStore {
    async fn insert_user(&self, user: &NewUser) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = users::ActiveModel {
                name: ActiveValue::Set(user.name.clone()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            accounts::ActiveModel {
                id: ActiveValue::Set(model.id),
                balance: ActiveValue::Set(0.0),
            }
            .insert(&db_tx)
            .await?;

            Ok(User::from(model))
        })
    }

    async fn user(&self, id: i32) -> ResultEngine<User> {
        users::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or_else(user_not_found)
    }

    async fn users(&self) -> ResultEngine<Vec<User>> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn delete_user(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            accounts::Entity::delete_by_id(id).exec(&db_tx).await?;
            let deleted = users::Entity::delete_by_id(id).exec(&db_tx).await?;
            if deleted.rows_affected == 0 {
                return Err(user_not_found());
            }
            Ok(())
        })
    }

    async fn insert_category(&self, category: &NewCategory) -> ResultEngine<Category> {
        let model = categories::ActiveModel {
            name: ActiveValue::Set(category.name.clone()),
            ..Default::default()
        }
        .insert(&self.database)
        .await?;
        Ok(Category::from(model))
    }

    async fn category(&self, id: i32) -> ResultEngine<Category> {
        categories::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Category::from)
            .ok_or_else(category_not_found)
    }

    async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn delete_category(&self, id: i32) -> ResultEngine<()> {
        let deleted = categories::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(category_not_found());
        }
        Ok(())
    }

    async fn insert_record(
        &self,
        record: &NewRecord,
        timestamp: DateTime<Utc>,
    ) -> ResultEngine<Record> {
        with_tx!(self, |db_tx| {
            let user = users::Entity::find_by_id(record.user_id)
                .one(&db_tx)
                .await?;
            let category = categories::Entity::find_by_id(record.category_id)
                .one(&db_tx)
                .await?;
            if user.is_none() || category.is_none() {
                return Err(invalid_reference());
            }

            accounts::Entity::find_by_id(record.user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(account_not_found)?;

            // Check and decrement in one statement so concurrent debits
            // cannot both pass against the same balance.
            let debited = accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::Balance,
                    Expr::col(accounts::Column::Balance).sub(record.amount),
                )
                .filter(accounts::Column::Id.eq(record.user_id))
                .filter(accounts::Column::Balance.gte(record.amount))
                .exec(&db_tx)
                .await?;
            if debited.rows_affected == 0 {
                return Err(insufficient_funds());
            }

            let model = records::ActiveModel {
                user_id: ActiveValue::Set(record.user_id),
                category_id: ActiveValue::Set(record.category_id),
                amount: ActiveValue::Set(record.amount),
                timestamp: ActiveValue::Set(timestamp),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            Ok(Record::from(model))
        })
    }

    async fn record(&self, id: i32) -> ResultEngine<Record> {
        records::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Record::from)
            .ok_or_else(record_not_found)
    }

    async fn records(&self, filter: &RecordFilter) -> ResultEngine<Vec<Record>> {
        let models = records::Entity::find()
            .apply_record_filter(filter)
            .order_by_asc(records::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Record::from).collect())
    }

    async fn delete_record(&self, id: i32) -> ResultEngine<()> {
        let deleted = records::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(record_not_found());
        }
        Ok(())
    }

    async fn account(&self, user_id: i32) -> ResultEngine<Account> {
        accounts::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .map(Account::from)
            .ok_or_else(account_not_found)
    }

    async fn deposit(&self, user_id: i32, amount: f64) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let credited = accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::Balance,
                    Expr::col(accounts::Column::Balance).add(amount),
                )
                .filter(accounts::Column::Id.eq(user_id))
                .filter(Expr::col(accounts::Column::Balance).lte(f64::MAX - amount))
                .exec(&db_tx)
                .await?;
            if credited.rows_affected == 0 {
                let exists = accounts::Entity::find_by_id(user_id)
                    .one(&db_tx)
                    .await?
                    .is_some();
                return Err(if exists {
                    balance_overflow()
                } else {
                    account_not_found()
                });
            }

            let account = accounts::Entity::find_by_id(user_id)
                .one(&db_tx)
                .await?
                .map(Account::from)
                .ok_or_else(account_not_found)?;
            // Rounding at the top of the f64 range can still slip past the filter.
            if !account.balance.is_finite() {
                return Err(balance_overflow());
            }
            Ok(account)
        })
    }

    async fn ping(&self) -> ResultEngine<()> {
        let backend = self.database.get_database_backend();
        self.database
            .execute(Statement::from_string(backend, "SELECT 1"))
            .await?;
        Ok(())
    }
}

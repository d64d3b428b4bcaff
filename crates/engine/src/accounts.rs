//! The module contains `Account` struct and its implementation.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// The balance attached to a user.
///
/// An account has no identifier of its own: it is keyed by the owning user's
/// id and lives exactly as long as the user does.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Account {
    pub user_id: i32,
    pub balance: f64,
}

impl Account {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            balance: 0.0,
        }
    }

    /// Whether `amount` can be debited without going below zero.
    pub fn can_cover(&self, amount: f64) -> bool {
        self.balance >= amount
    }

    /// Whether crediting `amount` keeps the balance a finite number.
    pub fn can_receive(&self, amount: f64) -> bool {
        (self.balance + amount).is_finite()
    }

    pub(crate) fn debit(&mut self, amount: f64) {
        self.balance -= amount;
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_type = "Double")]
    pub balance: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Id",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.id,
            balance: model.balance,
        }
    }
}

//! Records: a single spending entry linking a user, a category and an amount.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Filters for listing records. Both filters apply together; none lists all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub user_id: Option<i32>,
    pub category_id: Option<i32>,
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        self.user_id.is_none_or(|id| record.user_id == id)
            && self.category_id.is_none_or(|id| record.category_id == id)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Record {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            amount: model.amount,
            timestamp: model.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn record(user_id: i32, category_id: i32) -> Record {
        Record {
            id: 1,
            user_id,
            category_id,
            amount: 10.0,
            timestamp: Utc.timestamp_opt(0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(RecordFilter::default().matches(&record(1, 2)));
    }

    #[test]
    fn filters_are_conjunctive() {
        let filter = RecordFilter {
            user_id: Some(1),
            category_id: Some(2),
        };
        assert!(filter.matches(&record(1, 2)));
        assert!(!filter.matches(&record(1, 3)));
        assert!(!filter.matches(&record(4, 2)));
    }
}

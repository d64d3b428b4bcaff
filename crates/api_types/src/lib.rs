use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub timestamp: DateTime<Utc>,
    }

    /// Returned with a 500 when the storage does not answer.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Unhealthy {
        pub status: String,
        pub error: String,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        pub id: i32,
        pub name: String,
    }

    /// Body of `POST /user`. Fields stay loosely typed until the engine
    /// validates them.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct UserCreate {
        pub name: Option<Value>,
    }

    impl From<UserCreate> for Value {
        fn from(body: UserCreate) -> Self {
            json!({ "name": body.name })
        }
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        pub id: i32,
        pub name: String,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: Option<Value>,
    }

    impl From<CategoryCreate> for Value {
        fn from(body: CategoryCreate) -> Self {
            json!({ "name": body.name })
        }
    }

    /// Body of `DELETE /category`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CategoryDelete {
        pub id: Option<Value>,
    }

    impl From<CategoryDelete> for Value {
        fn from(body: CategoryDelete) -> Self {
            json!({ "id": body.id })
        }
    }
}

pub mod record {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Record {
        pub id: i32,
        pub user_id: i32,
        pub category_id: i32,
        pub amount: f64,
        /// Set by the server when the record is created.
        pub timestamp: DateTime<Utc>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct RecordCreate {
        pub user_id: Option<Value>,
        pub category_id: Option<Value>,
        pub amount: Option<Value>,
    }

    impl From<RecordCreate> for Value {
        fn from(body: RecordCreate) -> Self {
            json!({
                "user_id": body.user_id,
                "category_id": body.category_id,
                "amount": body.amount,
            })
        }
    }

    /// Query string of `GET /record`.
    ///
    /// Values are kept as strings so empty and malformed filters can be told
    /// apart from absent ones.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecordQuery {
        pub user_id: Option<String>,
        pub category_id: Option<String>,
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Account {
        pub user_id: i32,
        pub balance: f64,
    }

    /// Body of `POST /account/{user_id}/deposit`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct Deposit {
        pub amount: Option<Value>,
    }

    impl From<Deposit> for Value {
        fn from(body: Deposit) -> Self {
            json!({ "amount": body.amount })
        }
    }
}

pub mod error {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldError {
        pub field: String,
        pub message: String,
    }

    /// Body of every error response.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub fields: Vec<FieldError>,
    }
}

//! Ledger engine: users, categories, records and accounts.
//!
//! The [`Engine`] validates incoming payloads and runs each operation against
//! a [`Storage`] backend, either [`MemoryStore`] or [`SqlStore`].

pub use accounts::Account;
pub use categories::Category;
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder};
pub use records::{Record, RecordFilter};
pub use storage::{MemoryStore, SqlStore, Storage};
pub use users::User;
pub use validation::{FieldError, ValidationErrors};

mod accounts;
mod categories;
mod error;
mod ops;
mod records;
mod storage;
mod users;
pub mod validation;

type ResultEngine<T> = Result<T, EngineError>;

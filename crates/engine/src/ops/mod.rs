use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{MemoryStore, SqlStore, Storage};

mod accounts;
mod categories;
mod health;
mod records;
mod users;

/// Entry point for every ledger operation.
///
/// The engine validates raw payloads and drives a [`Storage`] backend. It is
/// cheap to share behind an `Arc` and safe to call concurrently.
#[derive(Debug)]
pub struct Engine {
    storage: Arc<dyn Storage>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
///
/// Without an explicit backend the engine keeps everything in memory.
#[derive(Default)]
pub struct EngineBuilder {
    storage: Option<Arc<dyn Storage>>,
}

impl EngineBuilder {
    /// Use a relational database as backend. Migrations must already be applied.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.storage = Some(Arc::new(SqlStore::new(db)));
        self
    }

    /// Use the in-process store as backend.
    pub fn memory(mut self) -> EngineBuilder {
        self.storage = Some(Arc::new(MemoryStore::new()));
        self
    }

    /// Use any custom backend.
    pub fn storage(mut self, storage: impl Storage + 'static) -> EngineBuilder {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        Engine { storage }
    }
}

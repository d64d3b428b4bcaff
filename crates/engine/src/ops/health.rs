use chrono::{DateTime, Utc};

use crate::ResultEngine;

use super::Engine;

impl Engine {
    /// Check that the storage answers. Returns the time of the check.
    pub async fn healthcheck(&self) -> ResultEngine<DateTime<Utc>> {
        self.storage.ping().await?;
        Ok(Utc::now())
    }
}

use chrono::Utc;
use serde_json::Value;

use crate::{Record, RecordFilter, ResultEngine, validation::NewRecord};

use super::Engine;

impl Engine {
    /// Create a record from a `{user_id, category_id, amount}` payload.
    ///
    /// - Every field must be present and well typed, `amount > 0`.
    /// - Both ids must exist (`InvalidReference` otherwise).
    /// - The user's account must exist and cover `amount`.
    ///
    /// The debit and the insert are committed together; on any error the
    /// balance and the record set are unchanged.
    pub async fn create_record(&self, payload: &Value) -> ResultEngine<Record> {
        let new_record = NewRecord::parse(payload)?;
        let record = self
            .storage
            .insert_record(&new_record, Utc::now())
            .await
            .inspect_err(|err| {
                tracing::debug!(
                    user_id = new_record.user_id,
                    category_id = new_record.category_id,
                    "record rejected: {err}"
                );
            })?;
        tracing::info!(
            record_id = record.id,
            user_id = record.user_id,
            amount = record.amount,
            "record created"
        );
        Ok(record)
    }

    pub async fn record(&self, id: i32) -> ResultEngine<Record> {
        self.storage.record(id).await
    }

    /// List records matching `filter`; an empty filter lists every record.
    pub async fn records(&self, filter: &RecordFilter) -> ResultEngine<Vec<Record>> {
        self.storage.records(filter).await
    }

    pub async fn delete_record(&self, id: i32) -> ResultEngine<()> {
        self.storage.delete_record(id).await?;
        tracing::info!(record_id = id, "record deleted");
        Ok(())
    }
}

use serde_json::Value;

use crate::{
    Category, ResultEngine,
    validation::{CategoryRef, NewCategory},
};

use super::Engine;

impl Engine {
    /// Create a category from a `{name}` payload.
    pub async fn create_category(&self, payload: &Value) -> ResultEngine<Category> {
        let new_category = NewCategory::parse(payload)?;
        let category = self.storage.insert_category(&new_category).await?;
        tracing::info!(category_id = category.id, "category created");
        Ok(category)
    }

    pub async fn category(&self, id: i32) -> ResultEngine<Category> {
        self.storage.category(id).await
    }

    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        self.storage.categories().await
    }

    /// Delete the category named by an `{id}` payload.
    pub async fn delete_category(&self, payload: &Value) -> ResultEngine<()> {
        let CategoryRef { id } = CategoryRef::parse(payload)?;
        self.storage.delete_category(id).await?;
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }
}

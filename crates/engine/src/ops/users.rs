use serde_json::Value;

use crate::{ResultEngine, User, validation::NewUser};

use super::Engine;

impl Engine {
    /// Create a user from a `{name}` payload. The user's account starts at 0.
    pub async fn create_user(&self, payload: &Value) -> ResultEngine<User> {
        let new_user = NewUser::parse(payload)?;
        let user = self.storage.insert_user(&new_user).await?;
        tracing::info!(user_id = user.id, "user created");
        Ok(user)
    }

    pub async fn user(&self, id: i32) -> ResultEngine<User> {
        self.storage.user(id).await
    }

    pub async fn users(&self) -> ResultEngine<Vec<User>> {
        self.storage.users().await
    }

    /// Delete a user and its account. Records of the user stay in place.
    pub async fn delete_user(&self, id: i32) -> ResultEngine<()> {
        self.storage.delete_user(id).await?;
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}

use serde_json::Value;

use crate::{Account, ResultEngine, validation::Deposit};

use super::Engine;

impl Engine {
    pub async fn account(&self, user_id: i32) -> ResultEngine<Account> {
        self.storage.account(user_id).await
    }

    /// Credit an `{amount}` payload to the user's account, `amount > 0`.
    pub async fn deposit(&self, user_id: i32, payload: &Value) -> ResultEngine<Account> {
        let Deposit { amount } = Deposit::parse(payload)?;
        let account = self.storage.deposit(user_id, amount).await?;
        tracing::info!(user_id, amount, balance = account.balance, "deposit");
        Ok(account)
    }
}

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Unknown token {0}")]
    UnknownToken(Address),
    #[error("Token transfer failed: {0}")]
    TransferFailed(String),
}

/// Fungible-token access used by the incentives ledger.
///
/// Implementations act on behalf of a single custody account: `transfer_from`
/// pulls funds from a third party into custody, `transfer` pays out of
/// custody. Any rejected transfer must surface as an error so the caller can
/// abort the enclosing mutation.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Moves `amount` of `token` from `from` into the custody account.
    async fn transfer_from(
        &self,
        token: Address,
        from: Address,
        amount: U256,
    ) -> Result<(), TokenError>;

    /// Moves `amount` of `token` from the custody account to `to`.
    async fn transfer(&self, token: Address, to: Address, amount: U256) -> Result<(), TokenError>;

    async fn balance_of(&self, token: Address, account: Address) -> Result<U256, TokenError>;
}

/// In-memory multi-token balance book for tests and local runs.
///
/// Tokens come into existence on the first `issue`; transfers against an
/// address that was never issued fail with `UnknownToken`.
pub struct MockTokenProvider {
    custody: Address,
    balances: RwLock<HashMap<Address, HashMap<Address, U256>>>,
}

impl MockTokenProvider {
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            balances: RwLock::new(HashMap::new()),
        }
    }

    pub fn custody(&self) -> Address {
        self.custody
    }

    /// Mints `amount` of `token` to `account`, creating the token if needed.
    pub async fn issue(&self, token: Address, account: Address, amount: U256) {
        let mut balances = self.balances.write().await;
        let book = balances.entry(token).or_default();
        let balance = book.entry(account).or_default();
        *balance += amount;
    }

    async fn move_tokens(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let mut balances = self.balances.write().await;
        let book = balances
            .get_mut(&token)
            .ok_or(TokenError::UnknownToken(token))?;
        let from_balance = book.get(&from).copied().unwrap_or_default();
        if from_balance < amount {
            return Err(TokenError::TransferFailed(
                "transfer amount exceeds balance".to_string(),
            ));
        }
        book.insert(from, from_balance - amount);
        let to_balance = book.entry(to).or_default();
        *to_balance += amount;
        Ok(())
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn transfer_from(
        &self,
        token: Address,
        from: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        self.move_tokens(token, from, self.custody, amount).await
    }

    async fn transfer(&self, token: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        self.move_tokens(token, self.custody, to, amount).await
    }

    async fn balance_of(&self, token: Address, account: Address) -> Result<U256, TokenError> {
        let balances = self.balances.read().await;
        let book = balances
            .get(&token)
            .ok_or(TokenError::UnknownToken(token))?;
        Ok(book.get(&account).copied().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[tokio::test]
    async fn test_transfer_from_and_back() {
        let custody = addr(0xCC);
        let token = addr(0x01);
        let sponsor = addr(0x02);
        let provider = MockTokenProvider::new(custody);

        provider.issue(token, sponsor, U256::from(100)).await;
        provider
            .transfer_from(token, sponsor, U256::from(60))
            .await
            .unwrap();
        assert_eq!(
            provider.balance_of(token, custody).await.unwrap(),
            U256::from(60)
        );
        assert_eq!(
            provider.balance_of(token, sponsor).await.unwrap(),
            U256::from(40)
        );

        provider
            .transfer(token, sponsor, U256::from(10))
            .await
            .unwrap();
        assert_eq!(
            provider.balance_of(token, sponsor).await.unwrap(),
            U256::from(50)
        );
    }

    #[tokio::test]
    async fn test_transfer_exceeding_balance_fails() {
        let provider = MockTokenProvider::new(addr(0xCC));
        let token = addr(0x01);
        provider.issue(token, addr(0x02), U256::from(5)).await;

        let err = provider
            .transfer_from(token, addr(0x02), U256::from(6))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::TransferFailed(_)));
        // balances untouched
        assert_eq!(
            provider.balance_of(token, addr(0x02)).await.unwrap(),
            U256::from(5)
        );
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let provider = MockTokenProvider::new(addr(0xCC));
        let missing = addr(0x66);
        let err = provider
            .transfer_from(missing, addr(0x02), U256::from(1))
            .await
            .unwrap_err();
        assert_eq!(err, TokenError::UnknownToken(missing));
    }
}

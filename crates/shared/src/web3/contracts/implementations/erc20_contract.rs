use crate::token::{TokenError, TokenProvider};
use crate::web3::contracts::core::contract::Contract;
use crate::web3::wallet::{Wallet, WalletProvider};
use alloy::primitives::{Address, FixedBytes, U256};
use async_trait::async_trait;

/// Binding for a single ERC20 token.
#[derive(Clone)]
pub struct Erc20Contract<P: alloy_provider::Provider> {
    pub instance: Contract<P>,
}

impl<P: alloy_provider::Provider> Erc20Contract<P> {
    pub fn new(token_address: Address, provider: P) -> Self {
        let instance = Contract::new(token_address, provider, "erc20.json");
        Self { instance }
    }

    pub async fn balance_of(
        &self,
        account: Address,
    ) -> Result<U256, Box<dyn std::error::Error + Send + Sync>> {
        let result = self
            .instance
            .instance()
            .function("balanceOf", &[account.into()])?
            .call()
            .await?;

        let balance = result
            .first()
            .ok_or("Missing balance in response")?
            .as_uint()
            .ok_or("Failed to parse balance as uint")?
            .0;

        Ok(balance)
    }
}

impl Erc20Contract<WalletProvider> {
    pub async fn transfer(
        &self,
        to: Address,
        amount: U256,
    ) -> Result<FixedBytes<32>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self
            .instance
            .instance()
            .function("transfer", &[to.into(), amount.into()])?
            .send()
            .await?
            .watch()
            .await?;

        Ok(result)
    }

    pub async fn transfer_from(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<FixedBytes<32>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self
            .instance
            .instance()
            .function("transferFrom", &[from.into(), to.into(), amount.into()])?
            .send()
            .await?
            .watch()
            .await?;

        Ok(result)
    }
}

/// ERC20-backed [`TokenProvider`]. Binds each token address on demand and
/// moves funds through the service wallet, which acts as the ledger's
/// custody account. Deposits require the sponsor to have approved the
/// custody address as a spender beforehand.
pub struct Erc20TokenProvider {
    provider: WalletProvider,
    custody: Address,
}

impl Erc20TokenProvider {
    pub fn new(wallet: &Wallet) -> Self {
        Self {
            provider: wallet.provider.clone(),
            custody: wallet.address(),
        }
    }

    fn bind(&self, token: Address) -> Erc20Contract<WalletProvider> {
        Erc20Contract::new(token, self.provider.clone())
    }
}

#[async_trait]
impl TokenProvider for Erc20TokenProvider {
    async fn transfer_from(
        &self,
        token: Address,
        from: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        self.bind(token)
            .transfer_from(from, self.custody, amount)
            .await
            .map_err(|e| TokenError::TransferFailed(e.to_string()))?;
        Ok(())
    }

    async fn transfer(&self, token: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        self.bind(token)
            .transfer(to, amount)
            .await
            .map_err(|e| TokenError::TransferFailed(e.to_string()))?;
        Ok(())
    }

    async fn balance_of(&self, token: Address, account: Address) -> Result<U256, TokenError> {
        self.bind(token)
            .balance_of(account)
            .await
            .map_err(|e| TokenError::TransferFailed(e.to_string()))
    }
}

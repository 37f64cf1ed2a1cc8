use crate::web3::contracts::core::contract::Contract;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256};

/// Binding for the master registry that resolves protocol component
/// addresses by a fixed two-byte key.
#[derive(Clone)]
pub struct MasterContract<P: alloy_provider::Provider> {
    pub instance: Contract<P>,
}

impl<P: alloy_provider::Provider> MasterContract<P> {
    pub fn new(master_address: Address, provider: P) -> Self {
        let instance = Contract::new(master_address, provider, "master.json");
        Self { instance }
    }

    /// Resolves the latest address registered under `key`, e.g. "PS" for
    /// the pooled-staking ledger.
    pub async fn get_latest_address(
        &self,
        key: &str,
    ) -> Result<Address, Box<dyn std::error::Error + Send + Sync>> {
        if key.len() != 2 {
            return Err(format!("Registry keys are two bytes, got {key:?}").into());
        }
        let mut word = B256::ZERO;
        word.0[..2].copy_from_slice(key.as_bytes());

        let result = self
            .instance
            .instance()
            .function("getLatestAddress", &[DynSolValue::FixedBytes(word, 2)])?
            .call()
            .await?;

        let address = result
            .first()
            .ok_or("Missing address in response")?
            .as_address()
            .ok_or("Failed to parse response as address")?;

        Ok(address)
    }
}

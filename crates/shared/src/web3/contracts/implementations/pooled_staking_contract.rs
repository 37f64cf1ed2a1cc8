use crate::staking::StakeOracle;
use crate::web3::contracts::core::contract::Contract;
use alloy::primitives::{Address, U256};
use anyhow::anyhow;
use async_trait::async_trait;

/// Binding for the external pooled-staking ledger the incentives service
/// reads stake from.
#[derive(Clone)]
pub struct PooledStakingContract<P: alloy_provider::Provider> {
    pub instance: Contract<P>,
}

impl<P: alloy_provider::Provider> PooledStakingContract<P> {
    pub fn new(staking_address: Address, provider: P) -> Self {
        let instance = Contract::new(staking_address, provider, "pooled_staking.json");
        Self { instance }
    }

    pub async fn staker_contract_stake(
        &self,
        staker: Address,
        staked_contract: Address,
    ) -> Result<U256, Box<dyn std::error::Error + Send + Sync>> {
        let result = self
            .instance
            .instance()
            .function(
                "stakerContractStake",
                &[staker.into(), staked_contract.into()],
            )?
            .call()
            .await?;

        let stake = result
            .first()
            .ok_or("Missing stake in response")?
            .as_uint()
            .ok_or("Failed to parse stake as uint")?
            .0;

        Ok(stake)
    }

    pub async fn staker_contract_pending_unstake_total(
        &self,
        staker: Address,
        staked_contract: Address,
    ) -> Result<U256, Box<dyn std::error::Error + Send + Sync>> {
        let result = self
            .instance
            .instance()
            .function(
                "stakerContractPendingUnstakeTotal",
                &[staker.into(), staked_contract.into()],
            )?
            .call()
            .await?;

        let pending = result
            .first()
            .ok_or("Missing pending unstake in response")?
            .as_uint()
            .ok_or("Failed to parse pending unstake as uint")?
            .0;

        Ok(pending)
    }

    pub async fn staker_contracts_array(
        &self,
        staker: Address,
    ) -> Result<Vec<Address>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self
            .instance
            .instance()
            .function("stakerContractsArray", &[staker.into()])?
            .call()
            .await?;

        let entries = result
            .first()
            .ok_or("Missing contracts in response")?
            .as_array()
            .ok_or("Failed to parse contracts as array")?;

        let mut contracts = Vec::with_capacity(entries.len());
        for entry in entries {
            contracts.push(
                entry
                    .as_address()
                    .ok_or("Failed to parse contract as address")?,
            );
        }

        Ok(contracts)
    }
}

#[async_trait]
impl<P> StakeOracle for PooledStakingContract<P>
where
    P: alloy_provider::Provider + Clone + 'static,
{
    async fn net_stake(&self, staker: Address, staked_contract: Address) -> anyhow::Result<U256> {
        let stake = self
            .staker_contract_stake(staker, staked_contract)
            .await
            .map_err(|e| anyhow!("stakerContractStake call failed: {e}"))?;
        let pending = self
            .staker_contract_pending_unstake_total(staker, staked_contract)
            .await
            .map_err(|e| anyhow!("stakerContractPendingUnstakeTotal call failed: {e}"))?;

        Ok(stake.saturating_sub(pending))
    }

    async fn staker_contracts(&self, staker: Address) -> anyhow::Result<Vec<Address>> {
        self.staker_contracts_array(staker)
            .await
            .map_err(|e| anyhow!("stakerContractsArray call failed: {e}"))
    }
}

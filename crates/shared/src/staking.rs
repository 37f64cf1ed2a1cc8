use alloy::primitives::{Address, U256};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Read access to the external staking ledger.
///
/// The incentives ledger never tracks stake itself; it reads a staker's net
/// position at claim time from whichever staking ledger is currently wired
/// in.
#[async_trait]
pub trait StakeOracle: Send + Sync {
    /// Current stake on `staked_contract` minus any stake pending
    /// withdrawal.
    async fn net_stake(&self, staker: Address, staked_contract: Address) -> Result<U256>;

    /// Contracts the staker currently has stake on. Discovery helper for
    /// callers assembling batched claims.
    async fn staker_contracts(&self, staker: Address) -> Result<Vec<Address>>;
}

#[derive(Debug, Clone, Copy, Default)]
struct StakePosition {
    stake: U256,
    pending_unstake: U256,
}

/// In-memory stake book for tests and local runs.
#[derive(Default)]
pub struct MockStakeOracle {
    positions: RwLock<HashMap<(Address, Address), StakePosition>>,
}

impl MockStakeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_staker_contract_stake(
        &self,
        staker: Address,
        staked_contract: Address,
        stake: U256,
    ) {
        let mut positions = self.positions.write().await;
        positions.entry((staker, staked_contract)).or_default().stake = stake;
    }

    pub async fn set_staker_contract_pending_unstake(
        &self,
        staker: Address,
        staked_contract: Address,
        pending_unstake: U256,
    ) {
        let mut positions = self.positions.write().await;
        positions
            .entry((staker, staked_contract))
            .or_default()
            .pending_unstake = pending_unstake;
    }
}

#[async_trait]
impl StakeOracle for MockStakeOracle {
    async fn net_stake(&self, staker: Address, staked_contract: Address) -> Result<U256> {
        let positions = self.positions.read().await;
        let position = positions
            .get(&(staker, staked_contract))
            .copied()
            .unwrap_or_default();
        Ok(position.stake.saturating_sub(position.pending_unstake))
    }

    async fn staker_contracts(&self, staker: Address) -> Result<Vec<Address>> {
        let positions = self.positions.read().await;
        let mut contracts: Vec<Address> = positions
            .keys()
            .filter(|(s, _)| *s == staker)
            .map(|(_, c)| *c)
            .collect();
        contracts.sort();
        contracts.dedup();
        Ok(contracts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[tokio::test]
    async fn test_net_stake_subtracts_pending_unstake() {
        let oracle = MockStakeOracle::new();
        let (staker, contract) = (addr(0x01), addr(0x02));

        oracle
            .set_staker_contract_stake(staker, contract, U256::from(40))
            .await;
        oracle
            .set_staker_contract_pending_unstake(staker, contract, U256::from(15))
            .await;

        assert_eq!(
            oracle.net_stake(staker, contract).await.unwrap(),
            U256::from(25)
        );
    }

    #[tokio::test]
    async fn test_net_stake_saturates_at_zero() {
        let oracle = MockStakeOracle::new();
        let (staker, contract) = (addr(0x01), addr(0x02));

        oracle
            .set_staker_contract_stake(staker, contract, U256::from(1))
            .await;
        oracle
            .set_staker_contract_pending_unstake(staker, contract, U256::from(5))
            .await;

        assert_eq!(oracle.net_stake(staker, contract).await.unwrap(), U256::ZERO);
    }

    #[tokio::test]
    async fn test_staker_contracts_lists_positions() {
        let oracle = MockStakeOracle::new();
        let staker = addr(0x01);
        oracle
            .set_staker_contract_stake(staker, addr(0x03), U256::from(1))
            .await;
        oracle
            .set_staker_contract_stake(staker, addr(0x02), U256::from(1))
            .await;
        oracle
            .set_staker_contract_stake(addr(0x09), addr(0x04), U256::from(1))
            .await;

        let contracts = oracle.staker_contracts(staker).await.unwrap();
        assert_eq!(contracts, vec![addr(0x02), addr(0x03)]);
    }
}

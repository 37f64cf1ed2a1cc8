use crate::error::LedgerError;
use crate::events::{PoolEvent, PoolEventObserver};
use crate::models::pool::{PoolKey, PoolSnapshot, RewardPool, RewardPoolsView, REWARD_RATE_SCALE};
use crate::round::RoundClock;
use crate::store::pool_store::{PoolEntry, PoolStore};
use alloy::primitives::{Address, U256};
use log::{debug, info};
use shared::staking::StakeOracle;
use shared::token::TokenProvider;
use std::sync::Arc;
use tokio::sync::RwLock;


enum Removal {
    Retract,
    Withdraw,
}

/// Round-based incentive-accounting ledger.
///
/// Sponsors deposit reward tokens for stakers of a staked contract, declare
/// a per-round rate, and stakers claim once per round proportional to their
/// net stake. Pools are keyed by (staked contract, sponsor, token) and each
/// carries its own lock, so operations on distinct pools run in parallel
/// while a single pool sees at most one mutation at a time.
pub struct RewardLedger {
    clock: RoundClock,
    store: PoolStore,
    tokens: Arc<dyn TokenProvider>,
    stake_oracle: RwLock<Arc<dyn StakeOracle>>,
    observers: Vec<Arc<dyn PoolEventObserver>>,
}

fn reward_amount(net_stake: U256, rate: U256) -> Result<U256, LedgerError> {
    let scaled = net_stake
        .checked_mul(rate)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    Ok(scaled / REWARD_RATE_SCALE)
}

impl RewardLedger {
    pub fn new(
        clock: RoundClock,
        tokens: Arc<dyn TokenProvider>,
        stake_oracle: Arc<dyn StakeOracle>,
    ) -> Self {
        Self {
            clock,
            store: PoolStore::new(),
            tokens,
            stake_oracle: RwLock::new(stake_oracle),
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PoolEventObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Swaps the stake oracle at runtime. Claims issued after the swap read
    /// stake from the new oracle.
    pub async fn set_stake_oracle(&self, oracle: Arc<dyn StakeOracle>) {
        *self.stake_oracle.write().await = oracle;
        info!("Stake oracle replaced");
    }

    pub fn get_current_round(&self, now: u64) -> Result<u64, LedgerError> {
        self.clock.current_round(now)
    }

    pub fn round_duration(&self) -> u64 {
        self.clock.round_duration()
    }

    pub fn rounds_start_time(&self) -> u64 {
        self.clock.rounds_start_time()
    }

    pub fn reward_rate_scale(&self) -> U256 {
        REWARD_RATE_SCALE
    }

    /// Targets the staker currently has stake on, straight from the oracle.
    pub async fn staker_contracts(&self, staker: Address) -> Result<Vec<Address>, LedgerError> {
        let oracle = self.stake_oracle.read().await.clone();
        oracle
            .staker_contracts(staker)
            .await
            .map_err(|e| LedgerError::OracleUnavailable(e.to_string()))
    }

    fn emit(&self, event: PoolEvent) {
        for observer in &self.observers {
            observer.on_pool_event(&event);
        }
    }

    /// Rate promotion is a pure function of the current round, applied at
    /// the top of every pool access. Before round 1 nothing can be due.
    fn promote_if_started(&self, pool: &mut RewardPool, now: u64) {
        if let Ok(round) = self.clock.current_round(now) {
            pool.promote(round);
        }
    }

    /// Pulls `amount` of `token_address` from the sponsor into custody and
    /// credits the pool. Usable before rounds start.
    pub async fn deposit_rewards(
        &self,
        staked_contract: Address,
        token_address: Address,
        sponsor: Address,
        amount: U256,
        now: u64,
    ) -> Result<(), LedgerError> {
        let key = PoolKey {
            staked_contract,
            sponsor,
            token_address,
        };
        let entry = self.store.entry(key).await;
        let mut entry = entry.lock().await;
        self.promote_if_started(&mut entry.pool, now);

        self.tokens
            .transfer_from(token_address, sponsor, amount)
            .await?;
        entry.pool.amount = entry
            .pool
            .amount
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        info!("Sponsor {sponsor} deposited {amount} of {token_address} for {staked_contract}");
        self.emit(PoolEvent::RewardDeposit {
            staked_contract,
            sponsor,
            token_address,
            amount,
        });
        Ok(())
    }

    /// Deposit and rate change in one critical section, so no claim can
    /// land between the two. The round clock is checked before any funds
    /// move; a `NotStarted` failure cannot strand a deposit.
    pub async fn deposit_rewards_and_set_rate(
        &self,
        staked_contract: Address,
        token_address: Address,
        sponsor: Address,
        amount: U256,
        rate: U256,
        now: u64,
    ) -> Result<(), LedgerError> {
        let key = PoolKey {
            staked_contract,
            sponsor,
            token_address,
        };
        let round = self.clock.current_round(now)?;
        let entry = self.store.entry(key).await;
        let mut entry = entry.lock().await;
        entry.pool.promote(round);

        self.tokens
            .transfer_from(token_address, sponsor, amount)
            .await?;
        entry.pool.amount = entry
            .pool
            .amount
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.emit(PoolEvent::RewardDeposit {
            staked_contract,
            sponsor,
            token_address,
            amount,
        });

        entry.pool.set_rate(rate, round);
        let (next_rate, next_rate_start_round) = entry.pool.next_rate_fields();
        info!(
            "Sponsor {sponsor} deposited {amount} and set rate {rate} for {staked_contract} / {token_address}"
        );
        self.emit(PoolEvent::RewardRateSet {
            staked_contract,
            sponsor,
            token_address,
            rate: entry.pool.rate,
            next_rate,
            next_rate_start_round,
        });
        Ok(())
    }

    /// Declares the reward rate for the sponsor's pool. The first set of a
    /// round is immediately effective; later sets in the same round queue
    /// for the next round, last write wins.
    pub async fn set_reward_rate(
        &self,
        staked_contract: Address,
        token_address: Address,
        sponsor: Address,
        rate: U256,
        now: u64,
    ) -> Result<(), LedgerError> {
        let round = self.clock.current_round(now)?;
        let key = PoolKey {
            staked_contract,
            sponsor,
            token_address,
        };
        let entry = self.store.entry(key).await;
        let mut entry = entry.lock().await;
        entry.pool.promote(round);
        entry.pool.set_rate(rate, round);

        let (next_rate, next_rate_start_round) = entry.pool.next_rate_fields();
        info!(
            "Sponsor {sponsor} set rate for {staked_contract} / {token_address}: rate {}, pending {next_rate} from round {next_rate_start_round}",
            entry.pool.rate
        );
        self.emit(PoolEvent::RewardRateSet {
            staked_contract,
            sponsor,
            token_address,
            rate: entry.pool.rate,
            next_rate,
            next_rate_start_round,
        });
        Ok(())
    }

    async fn remove_rewards(
        &self,
        key: PoolKey,
        amount: U256,
        removal: Removal,
        now: u64,
    ) -> Result<(), LedgerError> {
        let entry = self.store.entry(key).await;
        let mut entry = entry.lock().await;
        self.promote_if_started(&mut entry.pool, now);

        if matches!(removal, Removal::Withdraw) && !entry.pool.rate.is_zero() {
            return Err(LedgerError::RateMustBeZero);
        }
        if amount > entry.pool.amount {
            return Err(LedgerError::InsufficientPoolFunds);
        }

        self.tokens
            .transfer(key.token_address, key.sponsor, amount)
            .await?;
        entry.pool.amount -= amount;

        let PoolKey {
            staked_contract,
            sponsor,
            token_address,
        } = key;
        info!("Sponsor {sponsor} removed {amount} of {token_address} from {staked_contract}");
        self.emit(match removal {
            Removal::Retract => PoolEvent::RewardRetraction {
                staked_contract,
                sponsor,
                token_address,
                amount,
            },
            Removal::Withdraw => PoolEvent::Withdrawn {
                staked_contract,
                sponsor,
                token_address,
                amount,
            },
        });
        Ok(())
    }

    /// Returns `amount` of undistributed funds to the sponsor. No round or
    /// rate precondition.
    pub async fn retract_rewards(
        &self,
        staked_contract: Address,
        token_address: Address,
        sponsor: Address,
        amount: U256,
        now: u64,
    ) -> Result<(), LedgerError> {
        let key = PoolKey {
            staked_contract,
            sponsor,
            token_address,
        };
        self.remove_rewards(key, amount, Removal::Retract, now).await
    }

    /// Like retract, but refused while the pool still accrues: the rate
    /// must be 0 (after promotion) before a sponsor can pull funds out.
    pub async fn withdraw_rewards(
        &self,
        staked_contract: Address,
        token_address: Address,
        sponsor: Address,
        amount: U256,
        now: u64,
    ) -> Result<(), LedgerError> {
        let key = PoolKey {
            staked_contract,
            sponsor,
            token_address,
        };
        self.remove_rewards(key, amount, Removal::Withdraw, now)
            .await
    }

    /// Promoted view of one pool; absent pools read as all-zero.
    pub async fn get_reward_pool(
        &self,
        staked_contract: Address,
        sponsor: Address,
        token_address: Address,
        now: u64,
    ) -> PoolSnapshot {
        let key = PoolKey {
            staked_contract,
            sponsor,
            token_address,
        };
        match self.store.get(&key).await {
            None => PoolSnapshot::default(),
            Some(entry) => {
                let mut entry = entry.lock().await;
                self.promote_if_started(&mut entry.pool, now);
                PoolSnapshot::from(&entry.pool)
            }
        }
    }

    /// Batched lookup over parallel key arrays; one result array per field,
    /// input order and length preserved.
    pub async fn get_reward_pools(
        &self,
        staked_contracts: &[Address],
        sponsors: &[Address],
        token_addresses: &[Address],
        now: u64,
    ) -> Result<RewardPoolsView, LedgerError> {
        if staked_contracts.len() != sponsors.len()
            || staked_contracts.len() != token_addresses.len()
        {
            return Err(LedgerError::LengthMismatch);
        }

        let mut view = RewardPoolsView::with_capacity(staked_contracts.len());
        for i in 0..staked_contracts.len() {
            let snapshot = self
                .get_reward_pool(staked_contracts[i], sponsors[i], token_addresses[i], now)
                .await;
            view.push(&snapshot);
        }
        Ok(view)
    }

    pub async fn get_reward_amount(
        &self,
        staked_contract: Address,
        sponsor: Address,
        token_address: Address,
        now: u64,
    ) -> U256 {
        self.get_reward_pool(staked_contract, sponsor, token_address, now)
            .await
            .amount
    }

    /// What a claim would pay right now: 0 if the staker already claimed
    /// this round, otherwise net stake times the pool's promoted rate.
    pub async fn get_available_staker_rewards(
        &self,
        staker: Address,
        staked_contract: Address,
        sponsor: Address,
        token_address: Address,
        now: u64,
    ) -> Result<U256, LedgerError> {
        let round = self.clock.current_round(now)?;
        let key = PoolKey {
            staked_contract,
            sponsor,
            token_address,
        };

        let rate = match self.store.get(&key).await {
            None => U256::ZERO,
            Some(entry) => {
                let mut entry = entry.lock().await;
                entry.pool.promote(round);
                if entry.has_claimed_in(staker, round) {
                    return Ok(U256::ZERO);
                }
                entry.pool.rate
            }
        };

        let oracle = self.stake_oracle.read().await.clone();
        let net_stake = oracle
            .net_stake(staker, staked_contract)
            .await
            .map_err(|e| LedgerError::OracleUnavailable(e.to_string()))?;
        reward_amount(net_stake, rate)
    }

    /// One claim tuple, with the pool's lock already held. The oracle read
    /// happens inside the critical section, so a concurrent claim for the
    /// same (pool, staker) cannot pass the round check twice. State is
    /// committed only after the transfer succeeds.
    async fn claim_one(
        &self,
        staker: Address,
        key: PoolKey,
        round: u64,
        entry: &mut PoolEntry,
    ) -> Result<U256, LedgerError> {
        entry.pool.promote(round);

        if entry.has_claimed_in(staker, round) {
            return Err(LedgerError::AlreadyClaimed);
        }

        let oracle = self.stake_oracle.read().await.clone();
        let net_stake = oracle
            .net_stake(staker, key.staked_contract)
            .await
            .map_err(|e| LedgerError::OracleUnavailable(e.to_string()))?;
        let amount = reward_amount(net_stake, entry.pool.rate)?;

        if amount > entry.pool.amount {
            return Err(LedgerError::InsufficientPoolFunds);
        }
        if !amount.is_zero() {
            self.tokens
                .transfer(key.token_address, staker, amount)
                .await?;
        }

        entry.pool.amount -= amount;
        entry.last_round_claimed.insert(staker, round);

        debug!(
            "Staker {staker} claimed {amount} from pool ({}, {}, {}) in round {round}",
            key.staked_contract, key.sponsor, key.token_address
        );
        self.emit(PoolEvent::RewardClaim {
            staked_contract: key.staked_contract,
            sponsor: key.sponsor,
            token_address: key.token_address,
            amount,
            receiver: staker,
            round_number: round,
        });
        Ok(amount)
    }

    /// Claims the staker's reward from one pool for the current round.
    /// A zero-rate pool pays 0 but still consumes the round's claim slot.
    pub async fn claim_reward(
        &self,
        staker: Address,
        staked_contract: Address,
        sponsor: Address,
        token_address: Address,
        now: u64,
    ) -> Result<U256, LedgerError> {
        let round = self.clock.current_round(now)?;
        let key = PoolKey {
            staked_contract,
            sponsor,
            token_address,
        };
        let entry = self.store.entry(key).await;
        let mut entry = entry.lock().await;
        self.claim_one(staker, key, round, &mut entry).await
    }

    /// Batched claim over parallel arrays matched by index. Tuples are
    /// processed in input order under locks acquired up front in key order;
    /// the first failing tuple fails the whole call and commits nothing
    /// itself, while earlier tuples' transfers stand.
    pub async fn claim_rewards(
        &self,
        staker: Address,
        staked_contracts: &[Address],
        sponsors: &[Address],
        token_addresses: &[Address],
        now: u64,
    ) -> Result<Vec<U256>, LedgerError> {
        if staked_contracts.len() != sponsors.len()
            || staked_contracts.len() != token_addresses.len()
        {
            return Err(LedgerError::LengthMismatch);
        }
        let round = self.clock.current_round(now)?;

        let keys: Vec<PoolKey> = (0..staked_contracts.len())
            .map(|i| PoolKey {
                staked_contract: staked_contracts[i],
                sponsor: sponsors[i],
                token_address: token_addresses[i],
            })
            .collect();

        let mut guards = self.store.lock_ordered(&keys).await;
        let mut amounts = Vec::with_capacity(keys.len());
        for key in &keys {
            let entry = guards.get_mut(key).expect("pool locked for batch");
            let amount = self.claim_one(staker, *key, round, entry).await?;
            amounts.push(amount);
        }
        Ok(amounts)
    }
}

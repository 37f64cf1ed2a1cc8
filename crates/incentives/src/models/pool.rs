use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Fixed-point scale for reward rates: a rate of `REWARD_RATE_SCALE` pays
/// one reward unit per unit of net stake per round.
pub const REWARD_RATE_SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Identity of one reward pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolKey {
    pub staked_contract: Address,
    pub sponsor: Address,
    pub token_address: Address,
}

/// At most one rate change can be scheduled per pool; later sets in the
/// same round overwrite the pending slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateSchedule {
    #[default]
    Idle,
    PendingNextRound { rate: U256, start_round: u64 },
}

/// Accounting state of one reward pool. `last_set_round` is the round of
/// the most recent rate-set (0 = never); it backs the rule that only the
/// first rate-set of a round takes effect immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardPool {
    pub amount: U256,
    pub rate: U256,
    pub schedule: RateSchedule,
    pub active: bool,
    pub last_set_round: u64,
}

impl RewardPool {
    /// Applies a pending rate change that has come due. Idempotent; called
    /// at the top of every pool-touching operation instead of by any
    /// background job.
    pub fn promote(&mut self, current_round: u64) {
        if let RateSchedule::PendingNextRound { rate, start_round } = self.schedule {
            if current_round >= start_round {
                self.rate = rate;
                self.schedule = RateSchedule::Idle;
            }
        }
    }

    /// First rate-set of a round overwrites the live rate; every later set
    /// in the same round lands in the pending slot, last write wins.
    /// Expects `promote` to have run for `current_round` already.
    pub fn set_rate(&mut self, rate: U256, current_round: u64) {
        if self.last_set_round == current_round {
            self.schedule = RateSchedule::PendingNextRound {
                rate,
                start_round: current_round + 1,
            };
        } else {
            self.rate = rate;
            self.last_set_round = current_round;
        }
        self.active = true;
    }

    pub fn next_rate_fields(&self) -> (U256, u64) {
        match self.schedule {
            RateSchedule::Idle => (U256::ZERO, 0),
            RateSchedule::PendingNextRound { rate, start_round } => (rate, start_round),
        }
    }
}

/// Field-for-field view of a pool as returned by the read operations.
/// Absent pools read as the all-zero snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub amount: U256,
    pub rate: U256,
    pub next_rate: U256,
    pub next_rate_start_round: u64,
    pub active: bool,
}

impl From<&RewardPool> for PoolSnapshot {
    fn from(pool: &RewardPool) -> Self {
        let (next_rate, next_rate_start_round) = pool.next_rate_fields();
        Self {
            amount: pool.amount,
            rate: pool.rate,
            next_rate,
            next_rate_start_round,
            active: pool.active,
        }
    }
}

/// Batched pool lookup result: one array per field, input order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPoolsView {
    pub amounts: Vec<U256>,
    pub rates: Vec<U256>,
    pub next_rates: Vec<U256>,
    pub next_rate_start_rounds: Vec<u64>,
    pub actives: Vec<bool>,
}

impl RewardPoolsView {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            amounts: Vec::with_capacity(capacity),
            rates: Vec::with_capacity(capacity),
            next_rates: Vec::with_capacity(capacity),
            next_rate_start_rounds: Vec::with_capacity(capacity),
            actives: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, snapshot: &PoolSnapshot) {
        self.amounts.push(snapshot.amount);
        self.rates.push(snapshot.rate);
        self.next_rates.push(snapshot.next_rate);
        self.next_rate_start_rounds.push(snapshot.next_rate_start_round);
        self.actives.push(snapshot.active);
    }
}

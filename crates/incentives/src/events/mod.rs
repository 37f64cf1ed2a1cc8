use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Emitted for every state-mutating ledger call, carrying the changed
/// fields plus actor identity so pool history can be rebuilt externally
/// (e.g. discovering all sponsors of a target from its deposit events).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PoolEvent {
    RewardDeposit {
        staked_contract: Address,
        sponsor: Address,
        token_address: Address,
        amount: U256,
    },
    RewardRateSet {
        staked_contract: Address,
        sponsor: Address,
        token_address: Address,
        rate: U256,
        next_rate: U256,
        next_rate_start_round: u64,
    },
    RewardRetraction {
        staked_contract: Address,
        sponsor: Address,
        token_address: Address,
        amount: U256,
    },
    Withdrawn {
        staked_contract: Address,
        sponsor: Address,
        token_address: Address,
        amount: U256,
    },
    RewardClaim {
        staked_contract: Address,
        sponsor: Address,
        token_address: Address,
        amount: U256,
        receiver: Address,
        round_number: u64,
    },
}

pub trait PoolEventObserver: Send + Sync {
    fn on_pool_event(&self, event: &PoolEvent);
}

/// Keeps every emitted event in emission order; backs the events endpoint.
#[derive(Default)]
pub struct EventLog {
    events: RwLock<Vec<PoolEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PoolEventObserver for EventLog {
    fn on_pool_event(&self, event: &PoolEvent) {
        self.events.write().unwrap().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_preserves_order() {
        let log = EventLog::new();
        let deposit = PoolEvent::RewardDeposit {
            staked_contract: Address::repeat_byte(1),
            sponsor: Address::repeat_byte(2),
            token_address: Address::repeat_byte(3),
            amount: U256::from(10),
        };
        let retraction = PoolEvent::RewardRetraction {
            staked_contract: Address::repeat_byte(1),
            sponsor: Address::repeat_byte(2),
            token_address: Address::repeat_byte(3),
            amount: U256::from(4),
        };

        log.on_pool_event(&deposit);
        log.on_pool_event(&retraction);

        assert_eq!(log.events(), vec![deposit, retraction]);
    }
}

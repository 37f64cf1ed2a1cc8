mod api;
mod error;
mod events;
mod ledger;
mod models;
mod round;
mod store;

pub use api::server::start_server;
pub use error::LedgerError;
pub use events::{EventLog, PoolEvent, PoolEventObserver};
pub use ledger::RewardLedger;
pub use models::pool::{PoolKey, PoolSnapshot, RewardPoolsView, REWARD_RATE_SCALE};
pub use round::RoundClock;

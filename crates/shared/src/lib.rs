pub mod staking;
pub mod token;
pub mod web3;

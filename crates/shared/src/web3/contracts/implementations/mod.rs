pub mod erc20_contract;
pub mod master_contract;
pub mod pooled_staking_contract;

use alloy::primitives::Address;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use incentives::{start_server, EventLog, RewardLedger, RoundClock};
use log::{info, LevelFilter};
use shared::web3::contracts::implementations::erc20_contract::Erc20TokenProvider;
use shared::web3::contracts::implementations::master_contract::MasterContract;
use shared::web3::contracts::implementations::pooled_staking_contract::PooledStakingContract;
use shared::web3::wallet::Wallet;
use std::sync::Arc;
use url::Url;

/// Key under which the master registry tracks the pooled-staking ledger.
const POOLED_STAKING_KEY: &str = "PS";

#[derive(Parser)]
struct Args {
    /// Host to bind the API server on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port
    #[arg(short = 'p', long, default_value = "8090")]
    port: u16,

    /// RPC URL
    #[arg(short = 'r', long, default_value = "http://localhost:8545")]
    rpc_url: String,

    /// Custody wallet private key
    #[arg(short = 'k', long)]
    operator_key: String,

    /// Master registry contract address
    #[arg(short = 'm', long)]
    master_address: String,

    /// Round duration in seconds
    #[arg(long, default_value = "604800")]
    round_duration: u64,

    /// Unix timestamp at which round 1 starts; must be in the future
    #[arg(long)]
    rounds_start_time: u64,

    /// Log level
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = match args.log_level.as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let rpc_url = Url::parse(&args.rpc_url).context("Invalid RPC URL")?;
    let wallet = Arc::new(
        Wallet::new(&args.operator_key, rpc_url)
            .map_err(|e| anyhow!("Failed to create wallet: {e}"))?,
    );
    info!("Custody account: {}", wallet.address());

    let master_address: Address = args
        .master_address
        .parse()
        .context("Invalid master contract address")?;
    let master = MasterContract::new(master_address, wallet.provider.clone());
    let staking_address = master
        .get_latest_address(POOLED_STAKING_KEY)
        .await
        .map_err(|e| anyhow!("Failed to resolve staking ledger address: {e}"))?;
    info!("Reading stake from pooled staking ledger at {staking_address}");

    let stake_oracle = Arc::new(PooledStakingContract::new(
        staking_address,
        wallet.provider.clone(),
    ));
    let tokens = Arc::new(Erc20TokenProvider::new(&wallet));

    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let clock = RoundClock::new(args.round_duration, args.rounds_start_time, now)?;

    let event_log = Arc::new(EventLog::new());
    let ledger = Arc::new(
        RewardLedger::new(clock, tokens, stake_oracle).with_observer(event_log.clone()),
    );

    start_server(&args.host, args.port, ledger, event_log, Some(wallet)).await
}

use crate::api::server::AppState;
use actix_web::{
    web::{self, Data, Json},
    HttpResponse, Scope,
};
use alloy::primitives::Address;
use log::info;
use serde::Deserialize;
use serde_json::json;
use shared::web3::contracts::implementations::pooled_staking_contract::PooledStakingContract;
use std::sync::Arc;

#[derive(Deserialize)]
struct StakeOracleRequest {
    address: Address,
}

/// Rebinds the stake oracle to a new staking-ledger contract. Requires the
/// service to be running with chain wiring.
async fn set_stake_oracle(
    body: Json<StakeOracleRequest>,
    app_state: Data<AppState>,
) -> HttpResponse {
    let Some(wallet) = &app_state.wallet else {
        return HttpResponse::ServiceUnavailable().json(json!({
            "success": false,
            "error": "No chain wiring configured"
        }));
    };

    let oracle = Arc::new(PooledStakingContract::new(
        body.address,
        wallet.provider.clone(),
    ));
    app_state.ledger.set_stake_oracle(oracle).await;
    info!("Stake oracle switched to {}", body.address);
    HttpResponse::Ok().json(json!({"success": true}))
}

pub(crate) fn admin_routes() -> Scope {
    web::scope("/admin").route("/stake-oracle", web::post().to(set_stake_oracle))
}

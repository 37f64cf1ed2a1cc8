use crate::api::server::AppState;
use crate::api::{error_response, unix_now};
use actix_web::{
    web::{self, Data, Json, Query},
    HttpResponse, Scope,
};
use alloy::primitives::Address;
use log::error;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct AvailableQuery {
    staker: Address,
    staked_contract: Address,
    sponsor: Address,
    token_address: Address,
}

async fn get_available_rewards(
    query: Query<AvailableQuery>,
    app_state: Data<AppState>,
) -> HttpResponse {
    match app_state
        .ledger
        .get_available_staker_rewards(
            query.staker,
            query.staked_contract,
            query.sponsor,
            query.token_address,
            unix_now(),
        )
        .await
    {
        Ok(amount) => HttpResponse::Ok().json(json!({
            "success": true,
            "amount": amount
        })),
        Err(e) => error_response(&e),
    }
}

#[derive(Deserialize)]
struct ClaimRequest {
    staker: Address,
    staked_contract: Address,
    sponsor: Address,
    token_address: Address,
}

async fn claim_reward(body: Json<ClaimRequest>, app_state: Data<AppState>) -> HttpResponse {
    match app_state
        .ledger
        .claim_reward(
            body.staker,
            body.staked_contract,
            body.sponsor,
            body.token_address,
            unix_now(),
        )
        .await
    {
        Ok(amount) => HttpResponse::Ok().json(json!({
            "success": true,
            "amount": amount
        })),
        Err(e) => {
            error!("Claim from {} failed: {e}", body.staker);
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct ClaimsRequest {
    staker: Address,
    staked_contracts: Vec<Address>,
    sponsors: Vec<Address>,
    token_addresses: Vec<Address>,
}

async fn claim_rewards(body: Json<ClaimsRequest>, app_state: Data<AppState>) -> HttpResponse {
    match app_state
        .ledger
        .claim_rewards(
            body.staker,
            &body.staked_contracts,
            &body.sponsors,
            &body.token_addresses,
            unix_now(),
        )
        .await
    {
        Ok(amounts) => HttpResponse::Ok().json(json!({
            "success": true,
            "amounts": amounts
        })),
        Err(e) => {
            error!("Batched claim from {} failed: {e}", body.staker);
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct ContractsQuery {
    staker: Address,
}

async fn get_staker_contracts(
    query: Query<ContractsQuery>,
    app_state: Data<AppState>,
) -> HttpResponse {
    match app_state.ledger.staker_contracts(query.staker).await {
        Ok(contracts) => HttpResponse::Ok().json(json!({
            "success": true,
            "staked_contracts": contracts
        })),
        Err(e) => error_response(&e),
    }
}

pub(crate) fn rewards_routes() -> Scope {
    web::scope("/rewards")
        .route("/available", web::get().to(get_available_rewards))
        .route("/claim", web::post().to(claim_reward))
        .route("/claims", web::post().to(claim_rewards))
        .route("/contracts", web::get().to(get_staker_contracts))
}

use crate::api::server::AppState;
use crate::api::{error_response, unix_now};
use actix_web::{
    web::{self, Data, Json, Query},
    HttpResponse, Scope,
};
use alloy::primitives::{Address, U256};
use log::error;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct PoolQuery {
    staked_contract: Address,
    sponsor: Address,
    token_address: Address,
}

async fn get_pool(query: Query<PoolQuery>, app_state: Data<AppState>) -> HttpResponse {
    let snapshot = app_state
        .ledger
        .get_reward_pool(
            query.staked_contract,
            query.sponsor,
            query.token_address,
            unix_now(),
        )
        .await;
    HttpResponse::Ok().json(json!({
        "success": true,
        "pool": snapshot
    }))
}

#[derive(Deserialize)]
struct PoolsBatchRequest {
    staked_contracts: Vec<Address>,
    sponsors: Vec<Address>,
    token_addresses: Vec<Address>,
}

async fn get_pools_batch(
    body: Json<PoolsBatchRequest>,
    app_state: Data<AppState>,
) -> HttpResponse {
    match app_state
        .ledger
        .get_reward_pools(
            &body.staked_contracts,
            &body.sponsors,
            &body.token_addresses,
            unix_now(),
        )
        .await
    {
        Ok(view) => HttpResponse::Ok().json(json!({
            "success": true,
            "pools": view
        })),
        Err(e) => error_response(&e),
    }
}

#[derive(Deserialize)]
struct FundsRequest {
    staked_contract: Address,
    token_address: Address,
    sponsor: Address,
    amount: U256,
}

async fn deposit_rewards(body: Json<FundsRequest>, app_state: Data<AppState>) -> HttpResponse {
    match app_state
        .ledger
        .deposit_rewards(
            body.staked_contract,
            body.token_address,
            body.sponsor,
            body.amount,
            unix_now(),
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            error!("Deposit from {} failed: {e}", body.sponsor);
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct DepositAndRateRequest {
    staked_contract: Address,
    token_address: Address,
    sponsor: Address,
    amount: U256,
    rate: U256,
}

async fn deposit_rewards_and_set_rate(
    body: Json<DepositAndRateRequest>,
    app_state: Data<AppState>,
) -> HttpResponse {
    match app_state
        .ledger
        .deposit_rewards_and_set_rate(
            body.staked_contract,
            body.token_address,
            body.sponsor,
            body.amount,
            body.rate,
            unix_now(),
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            error!("Deposit-and-set-rate from {} failed: {e}", body.sponsor);
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct RateRequest {
    staked_contract: Address,
    token_address: Address,
    sponsor: Address,
    rate: U256,
}

async fn set_reward_rate(body: Json<RateRequest>, app_state: Data<AppState>) -> HttpResponse {
    match app_state
        .ledger
        .set_reward_rate(
            body.staked_contract,
            body.token_address,
            body.sponsor,
            body.rate,
            unix_now(),
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            error!("Rate change from {} failed: {e}", body.sponsor);
            error_response(&e)
        }
    }
}

async fn retract_rewards(body: Json<FundsRequest>, app_state: Data<AppState>) -> HttpResponse {
    match app_state
        .ledger
        .retract_rewards(
            body.staked_contract,
            body.token_address,
            body.sponsor,
            body.amount,
            unix_now(),
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            error!("Retraction from {} failed: {e}", body.sponsor);
            error_response(&e)
        }
    }
}

async fn withdraw_rewards(body: Json<FundsRequest>, app_state: Data<AppState>) -> HttpResponse {
    match app_state
        .ledger
        .withdraw_rewards(
            body.staked_contract,
            body.token_address,
            body.sponsor,
            body.amount,
            unix_now(),
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            error!("Withdrawal from {} failed: {e}", body.sponsor);
            error_response(&e)
        }
    }
}

pub(crate) fn pools_routes() -> Scope {
    web::scope("/pools")
        .route("", web::get().to(get_pool))
        .route("/batch", web::post().to(get_pools_batch))
        .route("/deposit", web::post().to(deposit_rewards))
        .route(
            "/deposit-and-set-rate",
            web::post().to(deposit_rewards_and_set_rate),
        )
        .route("/rate", web::post().to(set_reward_rate))
        .route("/retract", web::post().to(retract_rewards))
        .route("/withdraw", web::post().to(withdraw_rewards))
}

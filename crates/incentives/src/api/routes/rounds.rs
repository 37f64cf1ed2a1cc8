use crate::api::server::AppState;
use crate::api::{error_response, unix_now};
use actix_web::{
    web::{self, Data},
    HttpResponse, Scope,
};
use serde_json::json;

async fn get_rounds(app_state: Data<AppState>) -> HttpResponse {
    let ledger = &app_state.ledger;
    HttpResponse::Ok().json(json!({
        "success": true,
        "round_duration": ledger.round_duration(),
        "rounds_start_time": ledger.rounds_start_time(),
        "reward_rate_scale": ledger.reward_rate_scale(),
        "current_round": ledger.get_current_round(unix_now()).ok()
    }))
}

async fn get_current_round(app_state: Data<AppState>) -> HttpResponse {
    match app_state.ledger.get_current_round(unix_now()) {
        Ok(round) => HttpResponse::Ok().json(json!({
            "success": true,
            "round": round
        })),
        Err(e) => error_response(&e),
    }
}

pub(crate) fn rounds_routes() -> Scope {
    web::scope("/rounds")
        .route("", web::get().to(get_rounds))
        .route("/current", web::get().to(get_current_round))
}

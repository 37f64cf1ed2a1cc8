use crate::api::server::AppState;
use actix_web::{
    web::{self, Data},
    HttpResponse, Scope,
};
use serde_json::json;

async fn get_events(app_state: Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "events": app_state.event_log.events()
    }))
}

pub(crate) fn events_routes() -> Scope {
    web::scope("/events").route("", web::get().to(get_events))
}

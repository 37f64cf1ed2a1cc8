use crate::api::routes::admin::admin_routes;
use crate::api::routes::events::events_routes;
use crate::api::routes::pools::pools_routes;
use crate::api::routes::rewards::rewards_routes;
use crate::api::routes::rounds::rounds_routes;
use crate::events::EventLog;
use crate::ledger::RewardLedger;
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{middleware, web, web::Data, App, HttpResponse, HttpServer};
use anyhow::Error;
use log::info;
use serde_json::json;
use shared::web3::wallet::Wallet;
use std::sync::Arc;

pub(crate) struct AppState {
    pub(crate) ledger: Arc<RewardLedger>,
    pub(crate) event_log: Arc<EventLog>,
    /// Chain wiring; absent when running against in-memory collaborators.
    pub(crate) wallet: Option<Arc<Wallet>>,
}

pub async fn start_server(
    host: &str,
    port: u16,
    ledger: Arc<RewardLedger>,
    event_log: Arc<EventLog>,
    wallet: Option<Arc<Wallet>>,
) -> Result<(), Error> {
    info!("Starting server at http://{host}:{port}");
    let app_state = Data::new(AppState {
        ledger,
        event_log,
        wallet,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .service(web::resource("/health").route(web::get().to(|| async {
                HttpResponse::Ok().json(json!({"status": "ok"}))
            })))
            .service(pools_routes())
            .service(rewards_routes())
            .service(rounds_routes())
            .service(events_routes())
            .service(admin_routes())
            .default_service(web::route().to(|| async {
                HttpResponse::NotFound().json(json!({
                    "success": false,
                    "error": "Resource not found"
                }))
            }))
    })
    .bind((host, port))?
    .run()
    .await?;
    Ok(())
}

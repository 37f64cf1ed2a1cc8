pub(crate) mod routes;
pub(crate) mod server;

use crate::error::LedgerError;
use actix_web::HttpResponse;
use serde_json::json;

/// Wall-clock read at the API boundary; everything below takes `now`
/// explicitly.
pub(crate) fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

pub(crate) fn error_response(error: &LedgerError) -> HttpResponse {
    let body = json!({
        "success": false,
        "error": error.to_string()
    });
    match error {
        LedgerError::OracleUnavailable(_) => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

use actix_web::HttpResponse;
use serde_json::json;

/// Fallback handler for unmatched routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "ok": false,
        "error": "route does not exist",
    }))
}

//! Health check endpoint handler.

use crate::{models::HealthResponse, services::ReplyDispatcher};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Returns the current health status of the service and whether the bot has
/// the credentials it needs to reply. Suitable for load balancer and
/// container health probes.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the current health status of the service in JSON format. `bot_enabled` is false when no Telegram bot token is configured.",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse)
    )
)]
pub async fn health(req: HttpRequest) -> Result<web::Json<HealthResponse>, Error> {
    let bot_enabled = req.app_data::<web::Data<ReplyDispatcher>>().is_some();

    let response = HealthResponse {
        status: "healthy".to_string(),
        bot_enabled,
    };

    Ok(web::Json(response))
}

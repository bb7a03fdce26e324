//! Telegram webhook endpoint handler.
//!
//! Telegram redelivers any update that is not answered with a 2xx, so this
//! handler acknowledges every request with an empty `200 OK`. Failures are
//! reported to the user in the chat and to operators in the logs.

use crate::{
    middleware::RequestId,
    models::Update,
    services::{AppMetrics, ReplyDispatcher},
};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use tracing::{debug, warn};

pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Expected secret token header value, if one is configured
#[derive(Debug, Clone, Default)]
pub struct WebhookSecret(pub Option<String>);

impl WebhookSecret {
    pub fn accepts(&self, req: &HttpRequest) -> bool {
        let Some(expected) = self.0.as_deref() else {
            return true;
        };

        req.headers()
            .get(SECRET_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|provided| provided == expected)
    }
}

fn acknowledge() -> HttpResponse {
    HttpResponse::Ok().finish()
}

fn record_skipped(req: &HttpRequest, reason: &str) {
    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_skipped_update(reason);
    }
}

/// Receive one Telegram update and reply to it in the chat
pub async fn webhook(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let Some(dispatcher) = req.app_data::<web::Data<ReplyDispatcher>>() else {
        debug!("Bot is disabled, acknowledging update without processing");
        record_skipped(&req, "disabled");
        return acknowledge();
    };

    if let Some(secret) = req.app_data::<web::Data<WebhookSecret>>() {
        if !secret.accepts(&req) {
            warn!("Webhook secret token mismatch, ignoring update");
            record_skipped(&req, "unauthorized");
            return acknowledge();
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, body_len = body.len(), "Malformed update payload");
            record_skipped(&req, "malformed");
            return acknowledge();
        }
    };

    let outcome = dispatcher.dispatch(&update).await;

    let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());
    debug!(
        request_id = ?request_id,
        update_id = ?update.update_id,
        outcome = ?outcome,
        "Update processed"
    );

    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_update(&outcome);
    }

    acknowledge()
}

//! Request metrics middleware.
//!
//! Every request is counted by route and status. Webhook deliveries are also
//! counted on their own, with the body size, so a non-2xx acknowledgement
//! (which makes Telegram redeliver) stands out from the general traffic.

use crate::{
    services::AppMetrics,
    utils::route::{WEBHOOK_ROUTE, normalize_route},
};
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::CONTENT_LENGTH,
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    time::Instant,
};
use tracing::warn;

/// Metrics middleware factory
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsService { service }))
    }
}

pub struct MetricsService<S> {
    service: S,
}

fn declared_length(req: &ServiceRequest) -> Option<u64> {
    req.headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

impl<S, B> Service<ServiceRequest> for MetricsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let route = normalize_route(req.path());
        let payload_bytes = declared_length(&req);

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let duration = start_time.elapsed();

            if let Some(metrics) = res.request().app_data::<web::Data<AppMetrics>>() {
                metrics.record_request(&method, route, status.as_u16(), duration);
                if route == WEBHOOK_ROUTE {
                    metrics.record_webhook_delivery(status.as_u16(), payload_bytes);
                }
                metrics.update_uptime();
            }

            if route == WEBHOOK_ROUTE && !status.is_success() {
                warn!(
                    status = status.as_u16(),
                    method = %method,
                    "Webhook delivery not acknowledged; Telegram will redeliver"
                );
            }

            Ok(res)
        })
    }
}

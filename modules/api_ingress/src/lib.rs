//! HTTP ingress: wraps the module routers with the shared middleware stack,
//! adds `/health` and `/openapi.json`, and runs the server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{middleware::from_fn, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::openapi::OpenApi;

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// Owns the outer router: one instance per process.
#[derive(Debug, Clone)]
pub struct ApiIngress {
    config: ApiIngressConfig,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Merge the module routes with the ingress routes and apply the middleware stack.
    ///
    /// Layers run outermost to innermost:
    /// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
    /// -> CORS -> timeout_as_problem -> Timeout -> BodyLimit -> handler.
    pub fn build_router(&self, modules: Router, openapi: OpenApi) -> Result<Router> {
        let openapi = Arc::new(
            serde_json::to_value(&openapi).context("failed to serialize OpenAPI document")?,
        );
        let paths = openapi
            .get("paths")
            .and_then(|p| p.as_object())
            .map_or(0, |p| p.len());
        tracing::debug!(paths, "building router");

        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .route(
                "/openapi.json",
                get(move || {
                    let doc = openapi.clone();
                    async move {
                        ([(header::CACHE_CONTROL, "no-store")], Json((*doc).clone()))
                            .into_response()
                    }
                }),
            )
            .merge(modules)
            .fallback(web::route_not_found);

        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));
        router = router
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_sec,
            )))
            .layer(from_fn(web::timeout_as_problem));
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        let x_request_id = request_id::header();
        router = router
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_id::make_span)
                    .on_response(request_id::record_response),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }

    /// Bind `addr` and serve until `shutdown` resolves.
    pub async fn serve<F>(&self, addr: SocketAddr, router: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
            .context("HTTP server failed")
    }
}

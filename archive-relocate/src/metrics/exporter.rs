//! HTTP exposition of a Prometheus registry.
//!
//! The exporter binds its socket synchronously, so a port clash surfaces
//! when the exporter is created rather than later on a background thread.
//! Serving happens on a dedicated thread that owns a current-thread Tokio
//! runtime. Dropping the exporter stops the server and joins that thread.

use super::port::MetricsError;
use crate::log::Logger;
use crate::{log_debug, log_error, log_info};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{Encoder, Registry, TextEncoder};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio_util::sync::CancellationToken;

const COMPONENT: &str = "metrics";

/// Serves `GET /metrics` for one registry.
pub struct MetricsExporter {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    logger: Arc<dyn Logger>,
}

impl MetricsExporter {
    /// Bind `addr` and start serving `registry` on a background thread.
    pub fn start(
        registry: Registry,
        addr: SocketAddr,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, MetricsError> {
        let listener =
            TcpListener::bind(addr).map_err(|source| MetricsError::Bind { addr, source })?;
        listener
            .set_nonblocking(true)
            .map_err(|source| MetricsError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| MetricsError::Bind { addr, source })?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()
            .map_err(MetricsError::Runtime)?;

        let cancel = CancellationToken::new();
        let shutdown = cancel.clone();
        let server_logger = Arc::clone(&logger);

        let handle = thread::Builder::new()
            .name("metrics-exporter".to_string())
            .spawn(move || runtime.block_on(serve(listener, registry, shutdown, server_logger)))
            .map_err(MetricsError::Runtime)?;

        log_info!(logger, COMPONENT, "Metrics endpoint listening on {}", local_addr);
        Ok(Self {
            local_addr,
            cancel,
            handle: Some(handle),
            logger,
        })
    }

    /// Address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop serving and wait for the background thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log_error!(self.logger, COMPONENT, "Metrics exporter thread panicked");
            }
        }
    }
}

impl Drop for MetricsExporter {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for MetricsExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsExporter")
            .field("local_addr", &self.local_addr)
            .field("running", &self.handle.is_some())
            .finish()
    }
}

async fn serve(
    listener: TcpListener,
    registry: Registry,
    shutdown: CancellationToken,
    logger: Arc<dyn Logger>,
) {
    let listener = match tokio::net::TcpListener::from_std(listener) {
        Ok(listener) => listener,
        Err(e) => {
            log_error!(logger, COMPONENT, "Failed to register metrics listener: {}", e);
            return;
        }
    };

    let handler_logger = Arc::clone(&logger);
    let app = Router::new().route(
        "/metrics",
        get(move || metrics_handler(registry.clone(), Arc::clone(&handler_logger))),
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
    {
        log_error!(logger, COMPONENT, "Metrics endpoint failed: {}", e);
    }
    log_debug!(logger, COMPONENT, "Metrics endpoint stopped");
}

async fn metrics_handler(registry: Registry, logger: Arc<dyn Logger>) -> impl IntoResponse {
    match encode_text(&registry) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            log_error!(logger, COMPONENT, "Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
        }
    }
}

/// Render every metric family in `registry` in the Prometheus text format.
pub fn encode_text(registry: &Registry) -> Result<String, MetricsError> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| {
        MetricsError::Registry(prometheus::Error::Msg(format!(
            "metrics are not valid UTF-8: {}",
            e
        )))
    })
}

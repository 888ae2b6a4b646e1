//! ServerBuilder for fluent API to build the HTTP service

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::DeliveryConfig;
use crate::core::error::ConfigError;
use crate::core::order::DEFAULT_WINDOW_MINUTES;
use crate::core::service::{FilteredOrdersMirror, OrderStore};
use crate::logging::{FanoutSink, LogSink, TracingSink};
use anyhow::Result;
use axum::Router;
use chrono::Duration;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the delivery HTTP service
///
/// Every log entry goes to a `TracingSink`; sinks added with
/// [`with_log_sink`](Self::with_log_sink) receive it too, subject to their
/// own severity gate.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_order_store(InMemoryOrderStore::new())
///     .with_mirror(InMemoryMirror::default())
///     .build()?;
/// ```
pub struct ServerBuilder {
    order_store: Option<Arc<dyn OrderStore>>,
    mirror: Option<Arc<dyn FilteredOrdersMirror>>,
    log_sinks: Vec<Arc<dyn LogSink>>,
    window: Duration,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            order_store: None,
            mirror: None,
            log_sinks: Vec::new(),
            window: Duration::minutes(DEFAULT_WINDOW_MINUTES),
            custom_routes: Vec::new(),
        }
    }

    /// Set the order store (required)
    pub fn with_order_store(mut self, store: impl OrderStore + 'static) -> Self {
        self.order_store = Some(Arc::new(store));
        self
    }

    /// Set the filtered-orders mirror (required)
    pub fn with_mirror(mut self, mirror: impl FilteredOrdersMirror + 'static) -> Self {
        self.mirror = Some(Arc::new(mirror));
        self
    }

    /// Add a log sink alongside the tracing sink
    pub fn with_log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.log_sinks.push(Arc::new(sink));
        self
    }

    /// Set the `fromDate` window width
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Apply the settings from a loaded configuration
    pub fn with_config(self, config: &DeliveryConfig) -> Result<Self, ConfigError> {
        Ok(self.with_window(config.window()?))
    }

    /// Add custom routes to the server
    ///
    /// ```ignore
    /// let admin = Router::new().route("/admin/ping", get(|| async { "pong" }));
    ///
    /// ServerBuilder::new()
    ///     .with_order_store(store)
    ///     .with_mirror(mirror)
    ///     .with_custom_routes(admin)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(mut self) -> Result<ServerHost> {
        let order_store = self
            .order_store
            .take()
            .ok_or_else(|| anyhow::anyhow!("OrderStore is required. Call .with_order_store()"))?;

        let mirror = self
            .mirror
            .take()
            .ok_or_else(|| anyhow::anyhow!("FilteredOrdersMirror is required. Call .with_mirror()"))?;

        if self.window <= Duration::zero() {
            return Err(anyhow::anyhow!(
                "Order window must be positive, got {} minutes",
                self.window.num_minutes()
            ));
        }

        let mut fanout = FanoutSink::new().with_sink(Arc::new(TracingSink));
        for sink in self.log_sinks.drain(..) {
            fanout.push(sink);
        }

        Ok(ServerHost::from_builder_components(
            order_store,
            mirror,
            Arc::new(fanout),
            self.window,
        ))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

//! Server host holding the service state
//!
//! The host owns every collaborator the HTTP exposure needs (order store,
//! mirror, log sink, window width) and is independent of how routes are
//! built on top of it.

use crate::core::service::{FilteredOrdersMirror, OrderStore};
use crate::logging::{LogSink, Logger};
use crate::orders::OrderState;
use chrono::Duration;
use std::sync::Arc;

/// Logger source name used by the order handlers
pub const ORDERS_LOG_SOURCE: &str = "delivery::orders";

/// Host context containing all service state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::from_builder_components(store, mirror, sink, window);
/// let app = RestExposure::build_router(Arc::new(host), vec![])?;
/// ```
pub struct ServerHost {
    pub order_store: Arc<dyn OrderStore>,
    pub mirror: Arc<dyn FilteredOrdersMirror>,
    /// Sink behind every logger handed out by this host
    pub log_sink: Arc<dyn LogSink>,
    pub window: Duration,
}

impl ServerHost {
    pub fn from_builder_components(
        order_store: Arc<dyn OrderStore>,
        mirror: Arc<dyn FilteredOrdersMirror>,
        log_sink: Arc<dyn LogSink>,
        window: Duration,
    ) -> Self {
        Self {
            order_store,
            mirror,
            log_sink,
            window,
        }
    }

    /// Logger writing to this host's sink
    pub fn logger(&self, source: &str) -> Logger {
        Logger::new(source, self.log_sink.clone())
    }

    /// State for the order handlers
    pub fn order_state(&self) -> OrderState {
        OrderState {
            store: self.order_store.clone(),
            mirror: self.mirror.clone(),
            logger: self.logger(ORDERS_LOG_SOURCE),
            window: self.window,
        }
    }
}

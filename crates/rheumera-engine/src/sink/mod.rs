//! Alert sinks: where the engine sends alerts.
//!
//! The engine only knows `AlertSink::deliver`. Transport, buffering, and retry
//! belong to the sink or to whoever calls the engine.

pub mod channel;
pub mod log;

use async_trait::async_trait;

use rheumera_core::error::DeliveryError;
use rheumera_core::model::Alert;

pub use channel::ChannelSink;
pub use log::TracingSink;

/// Outbound contract of the dispatch engine.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, alert: Alert) -> Result<(), DeliveryError>;
}

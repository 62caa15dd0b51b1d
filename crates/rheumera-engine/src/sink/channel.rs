use async_trait::async_trait;
use tokio::sync::mpsc;

use rheumera_core::error::DeliveryError;
use rheumera_core::model::Alert;

use super::AlertSink;

/// Forwards alerts into a tokio mpsc channel for an async consumer
/// (notifier task, test harness).
///
/// Bounded channels apply backpressure: `deliver` waits for capacity. A dropped
/// receiver turns every delivery into `DeliveryError::Closed`.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Tx,
}

#[derive(Debug, Clone)]
enum Tx {
    Bounded(mpsc::Sender<Alert>),
    Unbounded(mpsc::UnboundedSender<Alert>),
}

impl ChannelSink {
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<Alert>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx: Tx::Bounded(tx) }, rx)
    }

    pub fn unbounded() -> (Self, mpsc::UnboundedReceiver<Alert>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Tx::Unbounded(tx) }, rx)
    }
}

#[async_trait]
impl AlertSink for ChannelSink {
    async fn deliver(&self, alert: Alert) -> Result<(), DeliveryError> {
        match &self.tx {
            Tx::Bounded(tx) => tx.send(alert).await.map_err(|_| DeliveryError::Closed),
            Tx::Unbounded(tx) => tx.send(alert).map_err(|_| DeliveryError::Closed),
        }
    }
}

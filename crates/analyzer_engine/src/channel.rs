use std::sync::Arc;

use analyzer_logging::analyzer_trace;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::extract::ContentExtractor;
use crate::relay::Relay;
use crate::tabs::TabProvider;
use crate::ChannelError;

/// Sends one message across the isolation boundary and waits for the reply.
///
/// `Ok(None)` means the other side answered without a value.
#[async_trait::async_trait]
pub trait MessageChannel: Send + Sync {
    async fn send(&self, message: Value) -> Result<Option<Value>, ChannelError>;
}

type Envelope = (Value, oneshot::Sender<Value>);

const CHANNEL_CAPACITY: usize = 16;

/// In-process channel to a [`Relay`] served by a listener task.
#[derive(Debug, Clone)]
pub struct RelayChannel {
    tx: mpsc::Sender<Envelope>,
}

impl RelayChannel {
    /// Spawns the relay listener on the current tokio runtime.
    ///
    /// Each message is handled on its own task; the reply slot stays open
    /// until the extraction behind it has finished.
    pub fn spawn<T, E>(relay: Relay<T, E>) -> Self
    where
        T: TabProvider + 'static,
        E: ContentExtractor + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Envelope>(CHANNEL_CAPACITY);
        let relay = Arc::new(relay);
        tokio::spawn(async move {
            while let Some((message, reply)) = rx.recv().await {
                let relay = relay.clone();
                tokio::spawn(async move {
                    let response = relay.handle(message).await;
                    if reply.send(response).is_err() {
                        analyzer_trace!("Relay reply discarded; sender went away");
                    }
                });
            }
        });
        Self { tx }
    }
}

#[async_trait::async_trait]
impl MessageChannel for RelayChannel {
    async fn send(&self, message: Value) -> Result<Option<Value>, ChannelError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send((message, reply_tx))
            .await
            .map_err(|_| ChannelError::Closed)?;
        let reply = reply_rx.await.map_err(|_| ChannelError::Dropped)?;
        Ok(Some(reply))
    }
}

//! Nullable peer: record messages instead of sending them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fncon_network::{ChannelId, NetworkError, Peer, PeerId};
use tokio::sync::mpsc;

use crate::lock;

/// A message handed to a forwarding [`NullPeer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Node that sent the message.
    pub from: PeerId,
    /// Node the message is addressed to.
    pub to: PeerId,
    pub channel: ChannelId,
    pub payload: Vec<u8>,
}

/// A test peer that records every send.
///
/// Optionally delays each send, fails it, or forwards it to a channel so a
/// test harness can route it into another node's reactor.
pub struct NullPeer {
    id: PeerId,
    sent: Mutex<Vec<(ChannelId, Vec<u8>)>>,
    failing: AtomicBool,
    delay: Option<Duration>,
    forward: Option<(PeerId, mpsc::UnboundedSender<Envelope>)>,
}

impl NullPeer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: PeerId::new(id),
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            delay: None,
            forward: None,
        }
    }

    /// Sleep for `delay` before completing each send.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Forward every send as an [`Envelope`] from `local` to this peer.
    pub fn forwarding(mut self, local: PeerId, tx: mpsc::UnboundedSender<Envelope>) -> Self {
        self.forward = Some((local, tx));
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All messages "sent" to this peer (for assertions).
    pub fn sent(&self) -> Vec<(ChannelId, Vec<u8>)> {
        lock(&self.sent).clone()
    }

    pub fn sent_count(&self) -> usize {
        lock(&self.sent).len()
    }

    pub fn reset(&self) {
        lock(&self.sent).clear();
    }
}

#[async_trait]
impl Peer for NullPeer {
    fn id(&self) -> &PeerId {
        &self.id
    }

    async fn send(&self, channel: ChannelId, message: Vec<u8>) -> Result<(), NetworkError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(NetworkError::SendFailed {
                peer: self.id.to_string(),
                reason: "null peer set to fail".into(),
            });
        }
        lock(&self.sent).push((channel, message.clone()));
        if let Some((local, tx)) = &self.forward {
            let envelope = Envelope {
                from: local.clone(),
                to: self.id.clone(),
                channel,
                payload: message,
            };
            tx.send(envelope).map_err(|_| NetworkError::SendFailed {
                peer: self.id.to_string(),
                reason: "router closed".into(),
            })?;
        }
        Ok(())
    }
}

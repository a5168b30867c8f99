//! Connected peer as seen by the gossip layer.

use std::fmt;

use async_trait::async_trait;

use crate::channel::ChannelId;
use crate::NetworkError;

/// Opaque peer identity assigned by the transport.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Best-effort message delivery to one peer.
#[async_trait]
pub trait Peer: Send + Sync {
    fn id(&self) -> &PeerId;

    /// Queue `message` on `channel`. No acknowledgement is implied.
    async fn send(&self, channel: ChannelId, message: Vec<u8>) -> Result<(), NetworkError>;
}

//! Lifecycle contract between a gossip protocol and the host transport.

use std::sync::Arc;

use async_trait::async_trait;

use crate::channel::{ChannelDescriptor, ChannelId};
use crate::peer::{Peer, PeerId};

/// A protocol handler plugged into the host's peer-to-peer switch.
///
/// The host registers the channels returned by [`Reactor::channels`], calls
/// `start` before delivering traffic, forwards peer membership changes, and
/// routes every inbound message on a registered channel to `receive`.
#[async_trait]
pub trait Reactor: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn name(&self) -> &str;

    fn channels(&self) -> Vec<ChannelDescriptor>;

    async fn start(&self) -> Result<(), Self::Error>;

    async fn stop(&self);

    async fn add_peer(&self, peer: Arc<dyn Peer>);

    async fn remove_peer(&self, peer_id: &PeerId, reason: &str);

    /// Handle one inbound message. An `Err` is fatal to the host: the reactor
    /// could not make its state durable.
    async fn receive(
        &self,
        channel: ChannelId,
        sender: &PeerId,
        message: &[u8],
    ) -> Result<(), Self::Error>;
}

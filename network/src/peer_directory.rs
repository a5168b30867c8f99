//! Directory of connected peers.
//!
//! Writers take the lock only to insert or remove. Readers copy out a
//! snapshot and release the lock before any send is attempted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::peer::{Peer, PeerId};

#[derive(Default)]
pub struct PeerDirectory {
    peers: RwLock<HashMap<PeerId, Arc<dyn Peer>>>,
}

impl PeerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer, replacing any previous entry with the same id.
    pub async fn add(&self, peer: Arc<dyn Peer>) {
        let id = peer.id().clone();
        let mut peers = self.peers.write().await;
        peers.insert(id, peer);
    }

    /// Remove a peer. Returns whether it was present.
    pub async fn remove(&self, peer_id: &PeerId) -> bool {
        let mut peers = self.peers.write().await;
        peers.remove(peer_id).is_some()
    }

    /// Peers currently connected, optionally excluding one.
    pub async fn snapshot(&self, exclude: Option<&PeerId>) -> Vec<Arc<dyn Peer>> {
        let peers = self.peers.read().await;
        peers
            .iter()
            .filter(|(id, _)| Some(*id) != exclude)
            .map(|(_, peer)| Arc::clone(peer))
            .collect()
    }

    pub async fn contains(&self, peer_id: &PeerId) -> bool {
        self.peers.read().await.contains_key(peer_id)
    }

    pub async fn len(&self) -> usize {
        self.peers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.peers.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelId;
    use crate::NetworkError;
    use async_trait::async_trait;

    struct StubPeer(PeerId);

    #[async_trait]
    impl Peer for StubPeer {
        fn id(&self) -> &PeerId {
            &self.0
        }

        async fn send(&self, _channel: ChannelId, _message: Vec<u8>) -> Result<(), NetworkError> {
            Ok(())
        }
    }

    fn peer(id: &str) -> Arc<dyn Peer> {
        Arc::new(StubPeer(PeerId::from(id)))
    }

    #[tokio::test]
    async fn add_and_remove() {
        let dir = PeerDirectory::new();
        dir.add(peer("a")).await;
        dir.add(peer("b")).await;
        assert_eq!(dir.len().await, 2);
        assert!(dir.remove(&PeerId::from("a")).await);
        assert!(!dir.remove(&PeerId::from("a")).await);
        assert!(!dir.contains(&PeerId::from("a")).await);
        assert_eq!(dir.len().await, 1);
    }

    #[tokio::test]
    async fn re_adding_replaces() {
        let dir = PeerDirectory::new();
        dir.add(peer("a")).await;
        dir.add(peer("a")).await;
        assert_eq!(dir.len().await, 1);
    }

    #[tokio::test]
    async fn snapshot_excludes_sender() {
        let dir = PeerDirectory::new();
        dir.add(peer("a")).await;
        dir.add(peer("b")).await;
        dir.add(peer("c")).await;

        let sender = PeerId::from("b");
        let mut ids: Vec<String> = dir
            .snapshot(Some(&sender))
            .await
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(dir.snapshot(None).await.len(), 3);
    }
}

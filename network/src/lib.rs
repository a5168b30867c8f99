//! Networking seams for the gossip layer.
//!
//! The transport itself (connections, framing, peer lifecycle) belongs to the
//! host. This crate defines what the gossip layer needs from it and the two
//! pieces of shared state it owns: the peer directory and the broadcaster.

pub mod broadcast;
pub mod channel;
pub mod error;
pub mod peer;
pub mod peer_directory;
pub mod reactor;

pub use broadcast::{BroadcastResult, BroadcastStats, Broadcaster, SendOutcome};
pub use channel::{ChannelDescriptor, ChannelId};
pub use error::NetworkError;
pub use peer::{Peer, PeerId};
pub use peer_directory::PeerDirectory;
pub use reactor::Reactor;

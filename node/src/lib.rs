//! Fn-result consensus node.
//!
//! The node keeps one vote set per fn id, gossips it to peers and merges
//! what peers send back until a two-thirds majority of voting power agrees on
//! the Fn's result hash. It then hands the result and the signatures to the
//! Fn exactly once.
//!
//! - [`vote_store`]: durable per-fn vote sets (write-through cache).
//! - [`coordinator`]: the gossip reactor: validate, merge, sign, persist,
//!   finalize or rebroadcast.
//! - [`node`]: wiring over an LMDB environment.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod tracing_spans;
pub mod vote_store;

pub use config::{GossipConfig, LmdbConfig, NodeConfig};
pub use coordinator::{
    vote_set_channel, CoordinatorDeps, FnState, GossipCoordinator, FN_VOTE_SET_CHANNEL,
};
pub use error::{CoordinatorError, NodeError};
pub use logging::{init_logging, LogFormat};
pub use metrics::{DropReason, GossipMetrics};
pub use node::FnConNode;
pub use vote_store::VoteStore;

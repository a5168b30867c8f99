//! Pre-built [`tracing::Span`] constructors for gossip operations.
//!
//! Consistent span names and field sets make traces easy to filter and
//! correlate per fn id.

use tracing::{debug_span, info_span, Span};

/// Span covering one inbound vote set from validation to rebroadcast.
pub fn receive_span(fn_id: &str, peer: &str) -> Span {
    info_span!("vote_set_receive", fn_id = %fn_id, peer = %peer)
}

/// Span covering a vote this node originates.
pub fn local_vote_span(fn_id: &str) -> Span {
    info_span!("local_vote", fn_id = %fn_id)
}

/// Span covering the dispatch of a vote set to connected peers.
pub fn broadcast_span(fn_id: &str, peer_count: usize) -> Span {
    debug_span!("vote_set_broadcast", fn_id = %fn_id, peer_count = %peer_count)
}

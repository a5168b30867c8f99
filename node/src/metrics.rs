//! Prometheus metrics for the gossip layer.
//!
//! [`GossipMetrics`] owns a dedicated [`Registry`] so a host can expose it
//! next to its own metrics without name clashes.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};

/// Why an inbound vote set was not merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Not a decodable vote set.
    Decode,
    /// Failed validation against the validator set and registry.
    Invalid,
    /// Older nonce than the local set.
    Stale,
    /// Same round but incompatible with the local set.
    Conflict,
    /// The local set for this round is already final.
    Terminal,
    /// Arrived on a channel this reactor does not own, or before start.
    Unroutable,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Decode => "decode",
            DropReason::Invalid => "invalid",
            DropReason::Stale => "stale",
            DropReason::Conflict => "conflict",
            DropReason::Terminal => "terminal",
            DropReason::Unroutable => "unroutable",
        }
    }
}

pub struct GossipMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub messages_received: IntCounter,
    /// Inbound vote sets dropped, labelled by `reason`.
    pub messages_dropped: IntCounterVec,
    pub local_votes: IntCounter,
    /// Rounds delivered to their Fn.
    pub finalized: IntCounter,
    pub persistence_failures: IntCounter,
    pub sends_dispatched: IntCounter,
    /// Sends skipped because the in-flight cap was reached.
    pub sends_dropped: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Sends that hit their deadline since start.
    pub sends_timed_out: IntGauge,
    pub peer_count: IntGauge,
}

impl GossipMetrics {
    /// Create a fresh set of metrics, all registered under a new [`Registry`].
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let messages_received = register_int_counter_with_registry!(
            Opts::new(
                "fncon_vote_sets_received_total",
                "Vote sets received on the gossip channel"
            ),
            registry
        )?;

        let messages_dropped = register_int_counter_vec_with_registry!(
            Opts::new(
                "fncon_vote_sets_dropped_total",
                "Inbound vote sets dropped without merging"
            ),
            &["reason"],
            registry
        )?;

        let local_votes = register_int_counter_with_registry!(
            Opts::new("fncon_local_votes_total", "Votes signed by this node"),
            registry
        )?;

        let finalized = register_int_counter_with_registry!(
            Opts::new(
                "fncon_rounds_finalized_total",
                "Rounds that reached a two-thirds majority locally"
            ),
            registry
        )?;

        let persistence_failures = register_int_counter_with_registry!(
            Opts::new(
                "fncon_persistence_failures_total",
                "Failed durable vote-set writes"
            ),
            registry
        )?;

        let sends_dispatched = register_int_counter_with_registry!(
            Opts::new("fncon_gossip_sends_total", "Peer sends dispatched"),
            registry
        )?;

        let sends_dropped = register_int_counter_with_registry!(
            Opts::new(
                "fncon_gossip_sends_dropped_total",
                "Peer sends dropped at the in-flight cap"
            ),
            registry
        )?;

        let sends_timed_out = register_int_gauge_with_registry!(
            Opts::new(
                "fncon_gossip_sends_timed_out",
                "Peer sends that exceeded their deadline"
            ),
            registry
        )?;

        let peer_count = register_int_gauge_with_registry!(
            Opts::new("fncon_peer_count", "Connected gossip peers"),
            registry
        )?;

        Ok(Self {
            registry,
            messages_received,
            messages_dropped,
            local_votes,
            finalized,
            persistence_failures,
            sends_dispatched,
            sends_dropped,
            sends_timed_out,
            peer_count,
        })
    }

    pub fn record_drop(&self, reason: DropReason) {
        self.messages_dropped
            .with_label_values(&[reason.as_str()])
            .inc();
    }

    pub fn dropped(&self, reason: DropReason) -> u64 {
        self.messages_dropped
            .with_label_values(&[reason.as_str()])
            .get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_are_labelled_by_reason() {
        let metrics = GossipMetrics::new().unwrap();
        metrics.record_drop(DropReason::Stale);
        metrics.record_drop(DropReason::Stale);
        metrics.record_drop(DropReason::Decode);
        assert_eq!(metrics.dropped(DropReason::Stale), 2);
        assert_eq!(metrics.dropped(DropReason::Decode), 1);
        assert_eq!(metrics.dropped(DropReason::Conflict), 0);
    }

    #[test]
    fn registries_are_independent() {
        let a = GossipMetrics::new().unwrap();
        let b = GossipMetrics::new().unwrap();
        a.local_votes.inc();
        assert_eq!(b.local_votes.get(), 0);
        assert!(!a.registry.gather().is_empty());
    }
}

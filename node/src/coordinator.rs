//! Gossip coordinator: the reactor that drives vote sets to finality.
//!
//! Every inbound vote set runs through one cycle: decode, validate, reconcile
//! with the local set (adopt, supersede, drop or merge), add this node's vote
//! if it has not voted yet, persist, and then either deliver the final result
//! to the Fn or rebroadcast. The cycle for a given fn id runs under that fn's
//! async mutex, so a round is delivered at most once however many duplicate
//! messages race in. Different fn ids proceed in parallel.
//!
//! Per fn id the observable state moves `NoVotes` → `Collecting` →
//! `Finalized`, and a newer nonce restarts it at `Collecting`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::Instrument;

use fncon_consensus::{ConsensusFn, FnRegistry, ValidatorSetProvider, VoteSet};
use fncon_crypto::VoteSigner;
use fncon_network::{
    Broadcaster, ChannelDescriptor, ChannelId, Peer, PeerDirectory, PeerId, Reactor,
};
use fncon_store::VoteSetStore;
use fncon_types::ValidatorSet;

use crate::config::GossipConfig;
use crate::error::CoordinatorError;
use crate::metrics::{DropReason, GossipMetrics};
use crate::tracing_spans::{broadcast_span, local_vote_span, receive_span};
use crate::vote_store::VoteStore;

/// Channel carrying encoded vote sets.
pub const FN_VOTE_SET_CHANNEL: ChannelId = 0x50;

/// Descriptor registered with the host transport. Low priority so vote-set
/// gossip yields to core protocol traffic.
pub fn vote_set_channel() -> ChannelDescriptor {
    ChannelDescriptor {
        id: FN_VOTE_SET_CHANNEL,
        priority: 25,
        send_queue_capacity: 100,
        recv_buffer_capacity: 100,
        recv_message_capacity: 10,
    }
}

/// Local view of one fn id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FnState {
    NoVotes,
    Collecting,
    Finalized,
}

/// Collaborators injected into the coordinator.
pub struct CoordinatorDeps {
    pub registry: Arc<dyn FnRegistry>,
    pub validators: Arc<dyn ValidatorSetProvider>,
    /// `None` on a non-validating node: it relays and finalizes but never
    /// signs.
    pub signer: Option<Arc<dyn VoteSigner>>,
    pub store: Arc<dyn VoteSetStore>,
    pub metrics: Arc<GossipMetrics>,
}

pub struct GossipCoordinator {
    chain_id: String,
    registry: Arc<dyn FnRegistry>,
    validators: Arc<dyn ValidatorSetProvider>,
    signer: Option<Arc<dyn VoteSigner>>,
    votes: VoteStore,
    peers: PeerDirectory,
    broadcaster: Broadcaster,
    fn_locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
    metrics: Arc<GossipMetrics>,
    running: AtomicBool,
}

/// Result of reconciling a remote set with local state.
enum Reconciled {
    Proceed { vote_set: VoteSet, changed: bool },
    Drop(DropReason),
}

impl GossipCoordinator {
    /// Build the coordinator and load persisted vote sets from `deps.store`.
    pub fn new(
        chain_id: impl Into<String>,
        gossip: &GossipConfig,
        deps: CoordinatorDeps,
    ) -> Result<Self, CoordinatorError> {
        let votes = VoteStore::load(deps.store)?;
        Ok(Self {
            chain_id: chain_id.into(),
            registry: deps.registry,
            validators: deps.validators,
            signer: deps.signer,
            votes,
            peers: PeerDirectory::new(),
            broadcaster: Broadcaster::new(gossip.max_in_flight_sends, gossip.send_timeout()),
            fn_locks: StdMutex::new(HashMap::new()),
            metrics: deps.metrics,
            running: AtomicBool::new(false),
        })
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Current local vote set for `fn_id`.
    pub fn vote_set(&self, fn_id: &str) -> Option<VoteSet> {
        self.votes.get(fn_id)
    }

    pub fn state_of(&self, fn_id: &str) -> Result<FnState, CoordinatorError> {
        let Some(vote_set) = self.votes.get(fn_id) else {
            return Ok(FnState::NoVotes);
        };
        let validators = self.validators.current_validators()?;
        if vote_set.is_maj23(&validators) {
            Ok(FnState::Finalized)
        } else {
            Ok(FnState::Collecting)
        }
    }

    pub fn metrics(&self) -> &GossipMetrics {
        &self.metrics
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    pub async fn peer_count(&self) -> usize {
        self.peers.len().await
    }

    /// Vote for the Fn's current result and gossip it to every peer.
    ///
    /// Starts a round on the node that first observes it: an absent or older
    /// local set is replaced by a fresh one at the Fn's nonce. Casting again
    /// in a round this node already voted in, or one that is already final,
    /// changes nothing.
    pub async fn cast_local_vote(&self, fn_id: &str) -> Result<FnState, CoordinatorError> {
        let fn_obj = self
            .registry
            .get(fn_id)
            .ok_or_else(|| CoordinatorError::UnknownFn(fn_id.to_string()))?;
        let signer = self.signer.clone().ok_or(CoordinatorError::NotAValidator)?;

        let span = local_vote_span(fn_id);
        let encoded = async {
            let lock = self.fn_lock(fn_id);
            let _guard = lock.lock().await;

            let validators = self.validators.current_validators()?;
            let index = validators
                .index_of(&signer.address())
                .ok_or(CoordinatorError::NotAValidator)?;
            let nonce = fn_obj.nonce()?;

            let mut vote_set = match self.votes.get(fn_id) {
                Some(local) if local.nonce() == nonce => local,
                Some(local) if local.nonce() > nonce => {
                    return Err(CoordinatorError::StaleNonce {
                        fn_id: fn_id.to_string(),
                        stored: local.nonce(),
                        current: nonce,
                    });
                }
                _ => VoteSet::new(self.chain_id.as_str(), fn_id, nonce, validators.size()),
            };

            if vote_set.is_maj23(&validators) {
                return Ok(None);
            }
            if vote_set.has_vote(index) {
                tracing::debug!(nonce, "already voted in this round");
                return Ok(None);
            }

            let response = fn_obj.current_result()?;
            vote_set.add_vote(&response, index, signer.as_ref())?;
            self.metrics.local_votes.inc();
            tracing::debug!(nonce, index, "cast local vote");

            let encoded = self.persist(fn_id, &vote_set)?;
            if self.finalize_if_ready(fn_obj.as_ref(), &vote_set, &validators) {
                return Ok(None);
            }
            Ok::<_, CoordinatorError>(Some(encoded))
        }
        .instrument(span)
        .await?;

        if let Some(encoded) = encoded {
            self.gossip(fn_id, &encoded, None).await;
        }
        self.state_of(fn_id)
    }

    /// Run one receive cycle. Only a persistence failure is returned; every
    /// other problem drops the message.
    async fn process(&self, sender: &PeerId, message: &[u8]) -> Result<(), CoordinatorError> {
        let remote = match VoteSet::decode(message) {
            Ok(vote_set) => vote_set,
            Err(e) => {
                tracing::warn!(peer = %sender, error = %e, "dropping undecodable vote set");
                self.metrics.record_drop(DropReason::Decode);
                return Ok(());
            }
        };
        let fn_id = remote.fn_id().to_string();

        let span = receive_span(&fn_id, sender.as_str());
        let outcome = async {
            // Lock entries only exist for registered fns, so unknown ids
            // from the wire cannot grow the lock map.
            let Some(fn_obj) = self.registry.get(&fn_id) else {
                tracing::debug!(nonce = remote.nonce(), "dropping vote set for unknown fn");
                self.metrics.record_drop(DropReason::Invalid);
                return Ok(None);
            };
            let lock = self.fn_lock(&fn_id);
            let _guard = lock.lock().await;

            let validators = match self.validators.current_validators() {
                Ok(validators) => validators,
                Err(e) => {
                    tracing::warn!(error = %e, "validator set unavailable, dropping vote set");
                    return Ok(None);
                }
            };
            if let Err(e) = remote.validate(&self.chain_id, &validators, self.registry.as_ref()) {
                tracing::debug!(nonce = remote.nonce(), error = %e, "rejecting vote set");
                self.metrics.record_drop(DropReason::Invalid);
                return Ok(None);
            }

            let (mut vote_set, mut changed) = match self.reconcile(&fn_id, remote, &validators) {
                Reconciled::Proceed { vote_set, changed } => (vote_set, changed),
                Reconciled::Drop(reason) => {
                    self.metrics.record_drop(reason);
                    return Ok(None);
                }
            };

            match self.try_local_vote(fn_obj.as_ref(), &mut vote_set, &validators) {
                Ok(voted) => changed |= voted,
                Err(e) => {
                    tracing::warn!(error = %e, "local vote failed, abandoning cycle");
                    return Ok(None);
                }
            }

            let encoded = match self.persist(&fn_id, &vote_set) {
                Ok(encoded) => encoded,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(error = %e, "vote set not stored");
                    return Ok(None);
                }
            };

            if self.finalize_if_ready(fn_obj.as_ref(), &vote_set, &validators) {
                return Ok(None);
            }

            // An unchanged set is already known to the sender; a changed one
            // carries news back to it as well.
            let exclude = if changed { None } else { Some(sender.clone()) };
            Ok::<_, CoordinatorError>(Some((encoded, exclude)))
        }
        .instrument(span)
        .await?;

        if let Some((encoded, exclude)) = outcome {
            self.gossip(&fn_id, &encoded, exclude.as_ref()).await;
        }
        Ok(())
    }

    fn reconcile(&self, fn_id: &str, remote: VoteSet, validators: &ValidatorSet) -> Reconciled {
        let Some(mut local) = self.votes.get(fn_id) else {
            tracing::debug!(nonce = remote.nonce(), "adopting remote vote set");
            return Reconciled::Proceed {
                vote_set: remote,
                changed: false,
            };
        };

        if local.nonce() < remote.nonce() {
            tracing::debug!(
                local_nonce = local.nonce(),
                remote_nonce = remote.nonce(),
                "newer round supersedes local vote set"
            );
            return Reconciled::Proceed {
                vote_set: remote,
                changed: false,
            };
        }
        if local.nonce() > remote.nonce() {
            tracing::debug!(
                local_nonce = local.nonce(),
                remote_nonce = remote.nonce(),
                "dropping stale vote set"
            );
            return Reconciled::Drop(DropReason::Stale);
        }
        if local.is_maj23(validators) {
            tracing::trace!(nonce = local.nonce(), "round already final");
            return Reconciled::Drop(DropReason::Terminal);
        }

        match local.merge(&remote) {
            Ok(changed) => Reconciled::Proceed {
                vote_set: local,
                changed,
            },
            Err(e) => {
                tracing::warn!(nonce = remote.nonce(), error = %e, "conflicting vote set");
                Reconciled::Drop(DropReason::Conflict)
            }
        }
    }

    /// Add this node's vote if it is a validator that has not voted in the
    /// set's round and the Fn is still on that round. Returns whether a vote
    /// was added.
    fn try_local_vote(
        &self,
        fn_obj: &dyn ConsensusFn,
        vote_set: &mut VoteSet,
        validators: &ValidatorSet,
    ) -> Result<bool, CoordinatorError> {
        let Some(signer) = &self.signer else {
            return Ok(false);
        };
        let Some(index) = validators.index_of(&signer.address()) else {
            return Ok(false);
        };
        if vote_set.has_vote(index) {
            return Ok(false);
        }
        let nonce = fn_obj.nonce()?;
        if nonce != vote_set.nonce() {
            tracing::debug!(
                fn_nonce = nonce,
                set_nonce = vote_set.nonce(),
                "fn is on another round, not voting"
            );
            return Ok(false);
        }

        let response = fn_obj.current_result()?;
        vote_set.add_vote(&response, index, signer.as_ref())?;
        self.metrics.local_votes.inc();
        tracing::debug!(nonce, index, "added local vote");
        Ok(true)
    }

    fn persist(&self, fn_id: &str, vote_set: &VoteSet) -> Result<Vec<u8>, CoordinatorError> {
        self.votes.put(fn_id, vote_set).inspect_err(|e| {
            if e.is_fatal() {
                self.metrics.persistence_failures.inc();
                tracing::error!(error = %e, "vote set persistence failed");
            }
        })
    }

    /// Deliver a stored set to its Fn if it holds a two-thirds majority.
    fn finalize_if_ready(
        &self,
        fn_obj: &dyn ConsensusFn,
        vote_set: &VoteSet,
        validators: &ValidatorSet,
    ) -> bool {
        if !vote_set.is_maj23(validators) {
            return false;
        }
        let Some(hash) = vote_set.response_hash() else {
            return false;
        };
        fn_obj.deliver_finalized(hash, vote_set.votes());
        self.metrics.finalized.inc();
        tracing::info!(
            fn_id = vote_set.fn_id(),
            nonce = vote_set.nonce(),
            hash = %hash,
            votes = vote_set.vote_count(),
            "vote set finalized"
        );
        true
    }

    async fn gossip(&self, fn_id: &str, encoded: &[u8], exclude: Option<&PeerId>) {
        let peers: Vec<Arc<dyn Peer>> = self.peers.snapshot(exclude).await;
        if peers.is_empty() {
            return;
        }
        let result = self
            .broadcaster
            .broadcast(FN_VOTE_SET_CHANNEL, encoded, &peers)
            .instrument(broadcast_span(fn_id, peers.len()))
            .await;
        self.metrics.sends_dispatched.inc_by(result.dispatched as u64);
        self.metrics.sends_dropped.inc_by(result.dropped as u64);
        self.metrics
            .sends_timed_out
            .set(self.broadcaster.stats().timed_out() as i64);
    }

    fn fn_lock(&self, fn_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.fn_locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(fn_id.to_string()).or_default())
    }
}

#[async_trait]
impl Reactor for GossipCoordinator {
    type Error = CoordinatorError;

    fn name(&self) -> &str {
        "fn-vote-set-gossip"
    }

    fn channels(&self) -> Vec<ChannelDescriptor> {
        vec![vote_set_channel()]
    }

    async fn start(&self) -> Result<(), CoordinatorError> {
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(
            chain_id = %self.chain_id,
            vote_sets = self.votes.len(),
            "gossip coordinator started"
        );
        Ok(())
    }

    async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.broadcaster.drain().await;
        tracing::info!("gossip coordinator stopped");
    }

    async fn add_peer(&self, peer: Arc<dyn Peer>) {
        tracing::debug!(peer = %peer.id(), "peer added");
        self.peers.add(peer).await;
        self.metrics.peer_count.set(self.peers.len().await as i64);
    }

    async fn remove_peer(&self, peer_id: &PeerId, reason: &str) {
        if self.peers.remove(peer_id).await {
            tracing::debug!(peer = %peer_id, reason, "peer removed");
        }
        self.metrics.peer_count.set(self.peers.len().await as i64);
    }

    async fn receive(
        &self,
        channel: ChannelId,
        sender: &PeerId,
        message: &[u8],
    ) -> Result<(), CoordinatorError> {
        if channel != FN_VOTE_SET_CHANNEL || !self.running.load(Ordering::SeqCst) {
            tracing::debug!(channel, peer = %sender, "ignoring message");
            self.metrics.record_drop(DropReason::Unroutable);
            return Ok(());
        }
        self.metrics.messages_received.inc();
        self.process(sender, message).await
    }
}

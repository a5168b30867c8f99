//! The node struct: wires storage, metrics and the gossip coordinator.

use std::sync::Arc;

use fncon_consensus::{FnRegistry, ValidatorSetProvider};
use fncon_crypto::VoteSigner;
use fncon_network::Reactor;
use fncon_store::VoteSetStore;
use fncon_store_lmdb::{check_integrity, LmdbEnvironment};

use crate::config::NodeConfig;
use crate::coordinator::{CoordinatorDeps, GossipCoordinator};
use crate::error::NodeError;
use crate::metrics::GossipMetrics;

/// A node backed by an LMDB environment under `config.data_dir`.
///
/// The host owns the transport: it registers [`GossipCoordinator`] as a
/// reactor through [`FnConNode::reactor`] and feeds it peers and messages.
pub struct FnConNode {
    config: NodeConfig,
    env: LmdbEnvironment,
    coordinator: Arc<GossipCoordinator>,
    metrics: Arc<GossipMetrics>,
}

impl FnConNode {
    /// Open storage, check it and load persisted vote sets.
    pub fn open(
        config: NodeConfig,
        registry: Arc<dyn FnRegistry>,
        validators: Arc<dyn ValidatorSetProvider>,
        signer: Option<Arc<dyn VoteSigner>>,
    ) -> Result<Self, NodeError> {
        let env = LmdbEnvironment::open(&config.data_dir, config.lmdb.max_dbs, config.lmdb.map_size)?;

        let report = check_integrity(env.env())?;
        for error in &report.errors {
            tracing::warn!(error = %error, "storage integrity problem");
        }

        let metrics = Arc::new(GossipMetrics::new()?);
        let store: Arc<dyn VoteSetStore> = Arc::new(env.vote_set_store());
        let deps = CoordinatorDeps {
            registry,
            validators,
            signer,
            store,
            metrics: Arc::clone(&metrics),
        };
        let coordinator = Arc::new(GossipCoordinator::new(
            config.chain_id.clone(),
            &config.gossip,
            deps,
        )?);

        tracing::info!(
            chain_id = %config.chain_id,
            data_dir = %config.data_dir.display(),
            entries = report.total_entries,
            "node opened"
        );
        Ok(Self {
            config,
            env,
            coordinator,
            metrics,
        })
    }

    pub async fn start(&self) -> Result<(), NodeError> {
        self.coordinator.start().await?;
        Ok(())
    }

    pub async fn stop(&self) {
        self.coordinator.stop().await;
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn environment(&self) -> &LmdbEnvironment {
        &self.env
    }

    pub fn metrics(&self) -> &Arc<GossipMetrics> {
        &self.metrics
    }

    pub fn coordinator(&self) -> &Arc<GossipCoordinator> {
        &self.coordinator
    }

    /// The coordinator as the host sees it.
    pub fn reactor(&self) -> Arc<dyn Reactor<Error = crate::CoordinatorError>> {
        self.coordinator.clone()
    }
}

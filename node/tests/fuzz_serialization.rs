//! Property-based fuzz tests for the gossip trust boundary.
//!
//! Whatever bytes a peer sends, the coordinator must neither panic nor
//! return an error (only storage failures are fatal), and bytes that do not
//! decode must never reach storage.

use std::sync::Arc;

use proptest::prelude::*;

use fncon_consensus::{ConsensusFn, FnRegistry, InMemoryFnRegistry, VoteSet};
use fncon_network::{PeerId, Reactor};
use fncon_node::{
    CoordinatorDeps, GossipConfig, GossipCoordinator, GossipMetrics, FN_VOTE_SET_CHANNEL,
};
use fncon_nullables::{NullFn, NullVoteSetStore, TestValidators};

const CHAIN: &str = "fuzz-chain";
const FN_ID: &str = "oracle-1";

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

fn coordinator(vals: &TestValidators) -> (GossipCoordinator, Arc<NullVoteSetStore>) {
    let registry = Arc::new(InMemoryFnRegistry::new());
    registry
        .set(FN_ID, Arc::new(NullFn::with_hash(1, 7)))
        .expect("register fn");
    let store = Arc::new(NullVoteSetStore::new());
    let deps = CoordinatorDeps {
        registry,
        validators: vals.provider(),
        signer: Some(vals.signer(0)),
        store: store.clone(),
        metrics: Arc::new(GossipMetrics::new().expect("metrics")),
    };
    let coordinator =
        GossipCoordinator::new(CHAIN, &GossipConfig::default(), deps).expect("coordinator");
    (coordinator, store)
}

fn valid_encoding(vals: &TestValidators) -> Vec<u8> {
    let response = NullFn::with_hash(1, 7).current_result().expect("response");
    let mut vs = VoteSet::new(CHAIN, FN_ID, 1, vals.len() as u32);
    vs.add_vote(&response, 1, vals.signer(1).as_ref())
        .expect("add vote");
    vs.encode().expect("encode")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_bytes_are_dropped(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let vals = TestValidators::equal(4);
        let (coordinator, store) = coordinator(&vals);
        let rt = runtime();
        let result = rt.block_on(async {
            coordinator.start().await?;
            coordinator
                .receive(FN_VOTE_SET_CHANNEL, &PeerId::from("fuzzer"), &bytes)
                .await
        });
        prop_assert!(result.is_ok());
        if VoteSet::decode(&bytes).is_err() {
            prop_assert_eq!(store.write_count(), 0);
        }
    }

    #[test]
    fn corrupted_valid_sets_never_fail_the_cycle(
        position in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let vals = TestValidators::equal(4);
        let (coordinator, _store) = coordinator(&vals);
        let mut bytes = valid_encoding(&vals);
        let i = position.index(bytes.len());
        bytes[i] ^= flip;

        let rt = runtime();
        let result = rt.block_on(async {
            coordinator.start().await?;
            coordinator
                .receive(FN_VOTE_SET_CHANNEL, &PeerId::from("fuzzer"), &bytes)
                .await
        });
        prop_assert!(result.is_ok());
        // Anything accepted must still be the original round and hash.
        if let Some(local) = coordinator.vote_set(FN_ID) {
            prop_assert_eq!(local.nonce(), 1);
            prop_assert_eq!(local.response_hash().map(|h| *h.as_bytes()), Some([7u8; 32]));
            prop_assert!(local.votes().iter().all(|v| v.validator_index <= 1));
        }
    }
}

#![no_main]

use fncon_consensus::VoteSet;
use libfuzzer_sys::fuzz_target;

fn sorted(vote_set: &VoteSet) -> bool {
    vote_set
        .votes()
        .windows(2)
        .all(|w| w[0].validator_index < w[1].validator_index)
}

// Merging two decoded sets either fails and leaves the receiver untouched,
// or succeeds with votes still strictly ascending.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let split = 1 + (data[0] as usize) % (data.len() - 1);
    let Ok(mut a) = VoteSet::decode(&data[1..split]) else {
        return;
    };
    let Ok(b) = VoteSet::decode(&data[split..]) else {
        return;
    };
    if !sorted(&a) {
        return;
    }

    let before = a.clone();
    match a.merge(&b) {
        Err(_) => assert_eq!(a, before),
        Ok(changed) => {
            assert_eq!(changed, a.bits() != before.bits());
            assert!(sorted(&a));
        }
    }
});

#![no_main]

use fncon_consensus::VoteSet;
use libfuzzer_sys::fuzz_target;

// Decoding peer bytes must never panic, and anything that decodes must
// re-encode to exactly the same bytes.
fuzz_target!(|data: &[u8]| {
    if let Ok(vote_set) = VoteSet::decode(data) {
        let encoded = vote_set.encode().expect("decoded set re-encodes");
        assert_eq!(encoded, data, "encoding is canonical");
    }
});

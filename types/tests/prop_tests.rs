use proptest::prelude::*;

use fncon_types::{BitArray, ResponseHash};

proptest! {
    /// ResponseHash roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn response_hash_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = ResponseHash::new(bytes);
        prop_assert_eq!(hash.as_bytes(), &bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Union is commutative and never loses a set bit.
    #[test]
    fn bit_array_union_commutes(
        len in 1u32..200,
        a in prop::collection::vec(0u32..200, 0..40),
        b in prop::collection::vec(0u32..200, 0..40),
    ) {
        let mut left = BitArray::new(len);
        let mut right = BitArray::new(len);
        for i in &a { left.set(*i); }
        for i in &b { right.set(*i); }
        let ab = left.union(&right).unwrap();
        let ba = right.union(&left).unwrap();
        prop_assert_eq!(&ab, &ba);
        prop_assert!(ab.is_well_formed());
        for i in left.iter_ones().chain(right.iter_ones()) {
            prop_assert!(ab.get(i));
        }
        prop_assert!(ab.count_ones() <= left.count_ones() + right.count_ones());
    }

    /// BitArray bincode serialization roundtrip.
    #[test]
    fn bit_array_bincode_roundtrip(len in 0u32..300, set in prop::collection::vec(0u32..300, 0..50)) {
        let mut bits = BitArray::new(len);
        for i in set { bits.set(i); }
        let encoded = bincode::serialize(&bits).unwrap();
        let decoded: BitArray = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, bits);
    }
}

//! Tier 5: Properties over arbitrary corruption
//!
//! Damage to the destination may make a load fail, but it must never make a
//! load return data that was not saved.

use crate::test_utils::*;
use persistkit::{JsonStore, RecoverySource};
use proptest::prelude::*;
use std::fs;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn flipped_bit_never_yields_wrong_data(
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
        pretty in any::<bool>(),
    ) {
        let (_dir, path) = setup();
        let store = JsonStore::with_options(persistkit::PersistOptions::new().pretty(pretty));
        store.save_json(&test_meta(), &obj1(), &path).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        let at = index.index(bytes.len());
        bytes[at] ^= 1 << bit;
        fs::write(&path, &bytes).unwrap();

        if let Ok(got) = store.load_json::<TestStruct>(&test_meta(), &path) {
            prop_assert_eq!(got, obj1());
        }
    }

    #[test]
    fn truncated_destination_falls_back_to_sibling(cut in any::<prop::sample::Index>()) {
        let (_dir, path) = setup();
        let store = JsonStore::new();
        store.save_json(&test_meta(), &obj1(), &path).unwrap();
        write(&wip_of(&path), checked_envelope(&test_meta(), &payload_of(&obj2())));

        let bytes = fs::read(&path).unwrap();
        let cut = cut.index(bytes.len());
        fs::write(&path, &bytes[..cut]).unwrap();

        let got = store
            .load_json_with_source::<TestStruct>(&test_meta(), &path)
            .unwrap();
        if cut == bytes.len() - 1 {
            // Only the trailing newline is gone; the envelope is intact.
            prop_assert_eq!(got.source, RecoverySource::Destination);
            prop_assert_eq!(got.value, obj1());
        } else {
            prop_assert_eq!(got.source, RecoverySource::WriteInProgress);
            prop_assert_eq!(got.value, obj2());
        }
    }

    #[test]
    fn round_trip_arbitrary_payload(
        one in ".*",
        two in any::<u64>(),
        three in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let (_dir, path) = setup();
        let store = JsonStore::new();
        let value = TestStruct { one, two, three };

        store.save_json(&test_meta(), &value, &path).unwrap();
        let got: TestStruct = store.load_json(&test_meta(), &path).unwrap();
        prop_assert_eq!(got, value);
    }
}

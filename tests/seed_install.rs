//! A seed installed before first use is the one every seeded digest sees.
//!
//! Kept to a single test: the seed is process-global state.

#![allow(missing_docs)]

#[macro_use]
mod common;

use hashflood::{HashStrategy, StrategyBuildHasher, Workload, install_process_seed, splitmix64};
use std::hash::BuildHasher;

#[test]
fn installed_seed_drives_every_seeded_digest() {
    common::init_test_logging();
    test_phase!("installed_seed_drives_every_seeded_digest");

    install_process_seed(42).unwrap();
    assert_eq!(hashflood::process_seed(), 42);
    assert_eq!(HashStrategy::SeededIdentity.digest(1), 43);
    assert_eq!(HashStrategy::SeededAvalanche.digest(1), splitmix64(43));

    let hasher = StrategyBuildHasher::new(HashStrategy::SeededAvalanche);
    assert_eq!(hasher.seed(), None);
    assert_eq!(hasher.hash_one(1u64), splitmix64(43));

    let report = Workload::new(3, 100).unwrap().run().unwrap();
    assert!(report.matches_expected_aggregate());
    assert!(install_process_seed(7).is_err());

    test_complete!("installed_seed_drives_every_seeded_digest");
}

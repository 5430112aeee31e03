//! persistkit Comprehensive Test Suite
//!
//! End-to-end tests through the public `JsonStore` API.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: Round trips and path rules
//! - **Tier 2**: Recovery from corrupted destination / write-in-progress files
//! - **Tier 3**: Interrupted saves (crash simulation)
//! - **Tier 4**: Concurrent saves and loads
//! - **Tier 5**: Property tests over arbitrary corruption
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test persist_comprehensive
//! ```





// Tier 4: Concurrency
mod tier4_concurrent_saves;

// Tier 5: Properties
mod tier5_corruption_properties;

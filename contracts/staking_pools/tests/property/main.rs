#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based test suite entry point.
//!
//! ```bash
//! cargo test --test property -p staking_pools
//! PROPTEST_CASES=512 cargo test --test property -p staking_pools
//! ```

mod accrual;
mod state_machine;

//! Shared building blocks for the staking contract suite.
//!
//! This crate provides:
//! - [`CommonError`] — error codes returned by the shared helpers. Every
//!   contract converts them into its own error enum with `From`.
//! - [`fixed_point`] — 1e18 fixed-point reward-per-share accrual math.
//! - [`governance`] — two-step (pending / accept) governance handoff.
//! - [`escrow`] — cross-contract client for the reward escrow.
//! - [`ttl`] — storage time-to-live helpers.
//!
//! Contract-specific errors start at code **100** so they never collide with
//! the common set.

#![no_std]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod escrow;
pub mod fixed_point;
pub mod governance;
pub mod ttl;

pub use escrow::{RewardEscrowClient, RewardEscrowInterface};
pub use fixed_point::ONE;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Error codes shared by every contract in the suite.
///
/// # Code ranges
/// | Range   | Purpose                       |
/// |---------|-------------------------------|
/// | 1 – 9   | Lifecycle / initialisation    |
/// | 10 – 19 | Authentication & authorisation|
/// | 20 – 29 | Resource not found            |
/// | 30 – 39 | Validation / input            |
/// | 50 – 59 | Arithmetic                    |
/// | 100+    | Reserved for contract-specific |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    // ── Lifecycle (1–9) ──────────────────────────────────────
    /// The contract has not been initialised yet.
    NotInitialized = 1,

    /// The contract has already been initialised.
    AlreadyInitialized = 2,

    // ── Auth (10–19) ─────────────────────────────────────────
    /// The caller is not the current governance address.
    AccessDenied = 10,

    /// The caller is not the pending governance address.
    NotPendingGovernance = 11,

    // ── Not-found (20–29) ────────────────────────────────────
    /// No governance transfer is pending.
    NoPendingGovernance = 20,

    // ── Validation (30–39) ───────────────────────────────────
    /// One or more input parameters are invalid (negative amount,
    /// percentage above 100 %, self-referral).
    InvalidInput = 30,

    // ── Arithmetic (50–59) ───────────────────────────────────
    /// A fixed-point result does not fit into an `i128`.
    ArithmeticOverflow = 50,
}

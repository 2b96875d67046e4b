//! Two-step governance handoff.
//!
//! The current governance nominates a successor with [`set_pending`]; the
//! handoff only completes once the nominee calls [`accept`]. A typo in the
//! nominated address can therefore never lock the contract.
//!
//! Callers are expected to have run `require_auth()` on the address they pass
//! in; these helpers only compare it with the stored roles.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::{ttl, CommonError};

// ── Storage keys ─────────────────────────────────────────────────────────────

const GOVERNANCE: Symbol = symbol_short!("GOV");
const PENDING_GOVERNANCE: Symbol = symbol_short!("PEND_GOV");

/// Store the initial governance address. Only called from `initialize`.
pub fn init(env: &Env, governance: &Address) {
    env.storage().instance().set(&GOVERNANCE, governance);
}

pub fn governance(env: &Env) -> Result<Address, CommonError> {
    env.storage()
        .instance()
        .get(&GOVERNANCE)
        .ok_or(CommonError::NotInitialized)
}

pub fn pending_governance(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_GOVERNANCE)
}

/// Guard: fails with `AccessDenied` unless `caller` is the governance.
pub fn require_governance(env: &Env, caller: &Address) -> Result<(), CommonError> {
    if governance(env)? != *caller {
        return Err(CommonError::AccessDenied);
    }
    Ok(())
}

/// Nominate `pending` as the next governance. Replaces any earlier nominee.
pub fn set_pending(env: &Env, caller: &Address, pending: &Address) -> Result<(), CommonError> {
    require_governance(env, caller)?;
    env.storage().instance().set(&PENDING_GOVERNANCE, pending);
    ttl::extend_instance(env);
    Ok(())
}

/// Complete the handoff. Returns the previous governance address.
pub fn accept(env: &Env, caller: &Address) -> Result<Address, CommonError> {
    let pending = pending_governance(env).ok_or(CommonError::NoPendingGovernance)?;
    if pending != *caller {
        return Err(CommonError::NotPendingGovernance);
    }

    let previous = governance(env)?;
    env.storage().instance().set(&GOVERNANCE, &pending);
    env.storage().instance().remove(&PENDING_GOVERNANCE);
    ttl::extend_instance(env);
    Ok(previous)
}

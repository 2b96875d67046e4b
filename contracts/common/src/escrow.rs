//! Cross-contract interface of the reward escrow.
//!
//! Pools only need to record vesting entries, so the interface is limited to
//! that call. The generated [`RewardEscrowClient`] is used by both staking
//! variants after they have transferred the escrowed tokens.

use soroban_sdk::{contractclient, Address, Env};

#[contractclient(name = "RewardEscrowClient")]
pub trait RewardEscrowInterface {
    /// Record `quantity` for `account`. `caller` must be an allow-listed
    /// reward contract and the escrow must already hold the tokens.
    fn append_vesting_entry(env: Env, caller: Address, account: Address, quantity: i128);
}

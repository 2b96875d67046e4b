extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env};

use crate::{ContractError, StakingPoolsContract, StakingPoolsContractClient};

fn setup() -> (Env, StakingPoolsContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let client = StakingPoolsContractClient::new(&env, &env.register(StakingPoolsContract, ()));
    let governance = Address::generate(&env);
    client.initialize(
        &Address::generate(&env),
        &Address::generate(&env),
        &Address::generate(&env),
        &Address::generate(&env),
        &governance,
    );

    (env, client, governance)
}

#[test]
fn test_pending_governance_must_accept() {
    let (env, client, governance) = setup();
    let next = Address::generate(&env);

    client.set_pending_governance(&governance, &next);
    assert_eq!(client.get_pending_governance(), Some(next.clone()));
    // Nothing changes until the nominee accepts.
    assert_eq!(client.get_governance(), governance);

    client.accept_governance(&next);
    assert_eq!(client.get_governance(), next);
    assert_eq!(client.get_pending_governance(), None);
}

#[test]
fn test_only_pending_governance_can_accept() {
    let (env, client, governance) = setup();
    let next = Address::generate(&env);
    let stranger = Address::generate(&env);

    client.set_pending_governance(&governance, &next);

    match client.try_accept_governance(&stranger) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotPendingGovernance),
        _ => unreachable!("Expected NotPendingGovernance error"),
    }
    match client.try_accept_governance(&governance) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotPendingGovernance),
        _ => unreachable!("Expected NotPendingGovernance error"),
    }
    assert_eq!(client.get_governance(), governance);
}

#[test]
fn test_accept_without_nomination_fails() {
    let (env, client, _) = setup();

    match client.try_accept_governance(&Address::generate(&env)) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingGovernance),
        _ => unreachable!("Expected NoPendingGovernance error"),
    }
}

#[test]
fn test_only_governance_can_nominate() {
    let (env, client, _) = setup();
    let stranger = Address::generate(&env);

    match client.try_set_pending_governance(&stranger, &stranger) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_pending_governance(), None);
}

#[test]
fn test_previous_governance_loses_rights() {
    let (env, client, governance) = setup();
    let next = Address::generate(&env);

    client.set_pending_governance(&governance, &next);
    client.accept_governance(&next);

    match client.try_set_reward_rate(&governance, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    client.set_reward_rate(&next, &10);
    assert_eq!(client.get_reward_rate(), 10);
}

#[test]
fn test_calls_before_initialize_fail() {
    let env = Env::default();
    env.mock_all_auths();
    let client = StakingPoolsContractClient::new(&env, &env.register(StakingPoolsContract, ()));
    let caller = Address::generate(&env);

    match client.try_create_pool(&caller, &caller) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotInitialized),
        _ => unreachable!("Expected NotInitialized error"),
    }
    match client.try_deposit(&caller, &0, &1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotInitialized),
        _ => unreachable!("Expected NotInitialized error"),
    }
}

//! Deposit and withdraw through the controller.

use odra::casper_types::U256;
use odra::host::HostRef;
use odra::prelude::Addressable;
use pretty_assertions::assert_eq;

use coopstable_contracts::cusd_token::{CusdToken, CusdTokenInitArgs};
use coopstable_contracts::errors::{AdapterError, ControllerError};
use coopstable_contracts::types::YieldType;
use odra::host::Deployer;

use crate::fixture::{blend, units, Protocol};

#[test]
fn test_deposit_mints_cusd_one_to_one() {
    let mut p = Protocol::deploy();
    let user = p.account(6);

    let mut expected = U256::zero();
    for amount in [1u128, 10_000_000, i128::MAX as u128 / 2] {
        let amount = U256::from(amount);
        p.deposit(user, amount);
        expected += amount;

        assert_eq!(p.cusd_balance(user), expected);
        assert_eq!(p.adapter.get_balance(user, p.asset), expected);
        assert_eq!(p.asset_balance(user), U256::zero());
    }

    assert_eq!(p.asset_balance(p.pool.address()), expected);
    assert_eq!(p.asset_balance(p.controller.address()), U256::zero());
    assert_eq!(p.adapter.get_principal(user, p.asset), expected);
    assert_eq!(p.controller.get_total_collateral(), expected);
    assert_eq!(p.manager.cusd_total_supply(), expected);
}

#[test]
fn test_deposit_needs_the_collateral() {
    let mut p = Protocol::deploy();
    let user = p.account(6);

    // nothing to pull
    p.env.set_caller(user);
    assert!(p
        .controller
        .try_deposit_collateral(blend(), user, p.asset, units(100))
        .is_err());

    // tokens held but not approved
    p.env.set_caller(p.owner);
    p.asset_token.mint(user, units(100));
    p.env.set_caller(user);
    assert!(p
        .controller
        .try_deposit_collateral(blend(), user, p.asset, units(100))
        .is_err());

    // approved for less than the deposit
    p.asset_token.approve(p.controller.address(), units(99));
    assert!(p
        .controller
        .try_deposit_collateral(blend(), user, p.asset, units(100))
        .is_err());

    assert_eq!(p.cusd_balance(user), U256::zero());
    assert_eq!(p.asset_balance(user), units(100));
    assert_eq!(p.controller.get_total_collateral(), U256::zero());
    assert_eq!(p.manager.cusd_total_supply(), U256::zero());
}

#[test]
fn test_withdraw_burns_then_releases_collateral() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    p.deposit(user, units(100));

    p.controller
        .withdraw_collateral(blend(), user, p.asset, units(40));

    assert_eq!(p.asset_balance(user), units(40));
    assert_eq!(p.cusd_balance(user), units(60));
    assert_eq!(p.adapter.get_balance(user, p.asset), units(60));
    assert_eq!(p.controller.get_total_collateral(), units(60));
}

#[test]
fn test_withdraw_beyond_cusd_balance_changes_nothing() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    p.deposit(user, units(10));

    assert!(p
        .controller
        .try_withdraw_collateral(blend(), user, p.asset, units(11))
        .is_err());

    assert_eq!(p.cusd_balance(user), units(10));
    assert_eq!(p.adapter.get_balance(user, p.asset), units(10));
    assert_eq!(p.adapter.get_principal(user, p.asset), units(10));
}

#[test]
fn test_market_failure_rolls_back_the_burn() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    p.deposit(user, units(10));

    p.env.set_caller(p.owner);
    p.pool.borrow_liquidity(p.asset, units(9));

    p.env.set_caller(user);
    assert!(p
        .controller
        .try_withdraw_collateral(blend(), user, p.asset, units(5))
        .is_err());

    assert_eq!(p.cusd_balance(user), units(10));
    assert_eq!(p.manager.cusd_total_supply(), units(10));
    assert_eq!(p.adapter.get_principal(user, p.asset), units(10));
}

#[test]
fn test_unsupported_asset_is_rejected() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    let other_asset = p.account(8);

    p.env.set_caller(user);
    assert_eq!(
        p.controller
            .try_deposit_collateral(blend(), user, other_asset, units(1)),
        Err(ControllerError::UnsupportedAsset.into())
    );
    assert_eq!(
        p.controller
            .try_deposit_collateral(String::from("UNKNOWN"), user, p.asset, units(1)),
        Err(ControllerError::UnsupportedAsset.into())
    );
    assert_eq!(p.cusd_balance(user), U256::zero());
}

#[test]
fn test_removed_adapter_blocks_deposits() {
    let mut p = Protocol::deploy();
    let user = p.account(6);

    p.env.set_caller(p.admin);
    p.registry.remove_adapter(YieldType::Lending, blend());

    p.env.set_caller(user);
    assert!(p
        .controller
        .try_deposit_collateral(blend(), user, p.asset, units(1))
        .is_err());
    assert_eq!(p.controller.get_total_collateral(), U256::zero());
}

#[test]
fn test_backed_principal_cannot_leave_around_the_controller() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    p.deposit(user, units(100));

    p.env.set_caller(user);
    assert_eq!(
        p.adapter.try_withdraw_collateral(user, p.asset, units(100)),
        Err(AdapterError::Unauthorized.into())
    );
    assert_eq!(p.adapter.get_backed_principal(user, p.asset), units(100));
    assert_eq!(p.controller.get_total_collateral(), units(100));
    assert_eq!(p.asset_balance(user), U256::zero());

    // issuance keeps working for everyone else
    let other = p.account(7);
    p.deposit(other, units(50));
    assert_eq!(p.cusd_balance(other), units(50));
    assert_eq!(p.manager.cusd_total_supply(), units(150));
}

#[test]
fn test_delisted_asset_still_backs_its_cusd() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    let other = p.account(7);
    p.deposit(user, units(100));

    p.env.set_caller(p.owner);
    let mut second = CusdToken::deploy(&p.env, CusdTokenInitArgs { issuer: p.owner });
    let second_asset = second.address();
    p.pool.add_reserve(second_asset, 300);
    second.mint(other, units(50));

    p.env.set_caller(p.admin);
    p.registry
        .add_support_for_asset(YieldType::Lending, blend(), second_asset);
    p.registry
        .remove_support_for_asset(YieldType::Lending, blend(), p.asset);

    p.env.set_caller(other);
    second.approve(p.controller.address(), units(50));
    p.controller
        .deposit_collateral(blend(), other, second_asset, units(50));

    assert_eq!(p.controller.get_total_collateral(), units(150));
    assert_eq!(p.manager.cusd_total_supply(), units(150));

    // collateral in the delisted asset can still be taken out
    p.env.set_caller(user);
    p.controller
        .withdraw_collateral(blend(), user, p.asset, units(100));
    assert_eq!(p.asset_balance(user), units(100));
    assert_eq!(p.controller.get_total_collateral(), units(50));
    assert_eq!(p.manager.cusd_total_supply(), units(50));
}

#[test]
fn test_only_the_user_deposits_for_themselves() {
    let mut p = Protocol::deploy();
    let user = p.account(6);

    p.env.set_caller(p.account(7));
    assert_eq!(
        p.controller
            .try_deposit_collateral(blend(), user, p.asset, units(1)),
        Err(ControllerError::UnauthorizedError.into())
    );
}

#[test]
fn test_controller_is_the_only_issuer() {
    let mut p = Protocol::deploy();
    let user = p.account(6);

    p.env.set_caller(user);
    assert!(p.manager.try_issue_cusd(user, units(1)).is_err());
    assert!(p.token.try_mint(user, units(1)).is_err());
    assert_eq!(p.manager.get_yield_controller(), Some(p.controller.address()));
}

//! Yield accrual, claiming and distribution across the whole stack.

use odra::casper_types::U256;
use odra::host::HostRef;
use odra::prelude::Addressable;
use pretty_assertions::assert_eq;

use coopstable_contracts::errors::ControllerError;

use crate::fixture::{blend, units, Protocol, PERIOD};

#[test]
fn test_end_to_end_yield_distribution() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    let members = p.add_members(&[3, 4, 5]);

    p.deposit(user, units(100));
    assert_eq!(p.adapter.get_balance(user, p.asset), units(100));
    assert_eq!(p.cusd_balance(user), units(100));

    p.accrue(125, 100);
    assert_eq!(p.controller.get_yield(), units(25));

    p.env.advance_block_time(PERIOD);
    p.env.set_caller(p.account(7));
    assert_eq!(p.controller.claim_yield(), units(25));

    // 10% to treasury, the rest split evenly
    assert_eq!(p.cusd_balance(p.treasury), U256::from(25_000_000u64));
    for member in members.iter() {
        assert_eq!(p.cusd_balance(*member), U256::from(75_000_000u64));
    }
    assert_eq!(p.controller.get_pending_yield(), U256::zero());
    assert_eq!(p.distributor.get_distribution_count(), 1);

    // user principal untouched, claimed yield kept as controller collateral
    assert_eq!(p.adapter.get_balance(user, p.asset), units(100));
    assert_eq!(p.controller.get_yield(), U256::zero());
    assert_eq!(p.controller.get_total_collateral(), units(125));
    assert_eq!(p.manager.cusd_total_supply(), units(125));
}

#[test]
fn test_claim_waits_for_the_period() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    p.add_members(&[3]);
    p.deposit(user, units(100));

    p.accrue(11, 10);
    p.env.advance_block_time(PERIOD);
    p.controller.claim_yield();

    p.accrue(12, 10);
    p.env.advance_block_time(PERIOD - 1);
    let yield_before = p.controller.get_yield();
    assert_eq!(
        p.controller.try_claim_yield(),
        Err(ControllerError::YieldUnavailable.into())
    );
    assert_eq!(p.controller.get_yield(), yield_before);

    p.env.advance_block_time(1);
    assert_eq!(p.controller.claim_yield(), yield_before);
    assert_eq!(p.distributor.get_distribution_count(), 2);
}

#[test]
fn test_rejected_yield_stays_pending() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    p.deposit(user, units(100));
    p.accrue(125, 100);
    p.env.advance_block_time(PERIOD);

    // no members yet: the distributor declines
    assert_eq!(p.controller.claim_yield(), units(25));
    assert_eq!(p.controller.get_pending_yield(), units(25));
    assert_eq!(p.cusd_balance(p.distributor.address()), units(25));
    assert_eq!(p.distributor.get_distribution_count(), 0);

    let members = p.add_members(&[3, 4, 5]);
    assert!(p.controller.distribute_pending());

    assert_eq!(p.controller.get_pending_yield(), U256::zero());
    assert_eq!(p.cusd_balance(p.treasury), U256::from(25_000_000u64));
    for member in members.iter() {
        assert_eq!(p.cusd_balance(*member), U256::from(75_000_000u64));
    }
    assert!(!p.controller.distribute_pending());
}

#[test]
fn test_pending_yield_rides_along_with_the_next_claim() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    p.deposit(user, units(100));
    p.accrue(125, 100);
    p.env.advance_block_time(PERIOD);

    assert_eq!(p.controller.claim_yield(), units(25));
    assert_eq!(p.controller.get_pending_yield(), units(25));

    p.add_members(&[3]);
    p.accrue(150, 100);
    let fresh = p.controller.get_yield();
    assert!(!fresh.is_zero());

    assert_eq!(p.controller.claim_yield(), fresh);
    assert_eq!(p.controller.get_pending_yield(), U256::zero());

    let ts = p.distributor.get_last_distribution();
    let record = p.distributor.get_distribution(ts).unwrap();
    assert_eq!(record.total_amount, units(25) + fresh);
    assert_eq!(record.treasury_amount + record.member_amount, record.total_amount);
}

#[test]
fn test_nothing_to_claim() {
    let mut p = Protocol::deploy();
    p.deposit(p.account(6), units(100));

    assert_eq!(p.controller.get_yield(), U256::zero());
    assert_eq!(p.controller.claim_yield(), U256::zero());
    assert_eq!(p.distributor.get_distribution_count(), 0);
}

#[test]
fn test_collateral_keeps_covering_supply() {
    let mut p = Protocol::deploy();
    p.add_members(&[3, 4]);
    p.deposit(p.account(6), units(40));
    p.deposit(p.account(7), units(60));

    p.accrue(125, 100);
    p.env.advance_block_time(PERIOD);
    let claimed = p.controller.claim_yield();

    assert_eq!(claimed, units(25));
    assert!(p.manager.cusd_total_supply() <= p.controller.get_total_collateral());
    assert_eq!(p.manager.cusd_total_supply(), units(125));
    assert_eq!(p.adapter.get_balance(p.account(6), p.asset), units(40));
    assert_eq!(p.adapter.get_balance(p.account(7), p.asset), units(60));
}

#[test]
fn test_resupplied_yield_keeps_earning() {
    let mut p = Protocol::deploy();
    let user = p.account(6);
    p.add_members(&[3]);
    p.deposit(user, units(100));

    p.accrue(125, 100);
    p.env.advance_block_time(PERIOD);
    assert_eq!(p.controller.claim_yield(), units(25));
    assert_eq!(p.adapter.get_principal(p.controller.address(), p.asset), units(125));

    // 100 on the user's principal plus 25 on the claimed 25
    p.accrue(250, 100);
    assert_eq!(p.controller.get_yield(), units(125));

    p.env.advance_block_time(PERIOD);
    assert_eq!(p.controller.claim_yield(), units(125));
    assert_eq!(p.controller.get_total_collateral(), units(250));
    assert_eq!(p.manager.cusd_total_supply(), units(250));
    assert_eq!(p.adapter.get_balance(user, p.asset), units(100));
}

#[test]
fn test_emissions_are_paid_to_the_treasury() {
    let mut p = Protocol::deploy();
    p.deposit(p.account(6), units(100));
    assert_eq!(p.controller.claim_emissions(blend(), p.asset), U256::zero());

    let adapter = p.adapter.address();
    p.env.set_caller(p.owner);
    p.blnd.mint(p.owner, units(7));
    p.blnd.approve(p.pool.address(), units(7));
    p.pool.add_emissions(adapter, p.asset, units(7));

    p.env.set_caller(p.account(7));
    assert_eq!(p.controller.claim_emissions(blend(), p.asset), units(7));
    assert_eq!(p.blnd.balance_of(p.treasury), units(7));
    assert_eq!(p.adapter.get_emissions(p.asset), U256::zero());
    assert_eq!(p.controller.claim_emissions(blend(), p.asset), U256::zero());

    // emissions are not yield
    assert_eq!(p.controller.get_yield(), U256::zero());
    assert_eq!(p.manager.cusd_total_supply(), units(100));
}

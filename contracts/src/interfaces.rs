//! Cross-contract interfaces.
//!
//! Contracts never share storage; they talk to each other only through
//! these interfaces, resolved against addresses held in their own state.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::types::{AdapterWithAssets, Reserve, YieldType};

/// Uniform capability every yield adapter satisfies
#[odra::external_contract]
pub trait LendingAdapter {
    fn supply_collateral(&mut self, user: Address, asset: Address, amount: U256) -> U256;
    fn withdraw_collateral(&mut self, user: Address, asset: Address, amount: U256) -> U256;
    fn get_balance(&self, user: Address, asset: Address) -> U256;
    fn get_yield(&self, user: Address, asset: Address) -> U256;
    fn claim_yield(&mut self, user: Address, asset: Address) -> U256;
    fn get_reserve_token_id(&self, asset: Address) -> Option<u32>;
    fn get_total_deposited(&self, asset: Address) -> U256;
    fn get_emissions(&self, asset: Address) -> U256;
    fn claim_emissions(&mut self, to: Address, asset: Address) -> U256;
    fn get_apy(&self, asset: Address) -> u32;
}

/// External lending market the Blend adapter wraps
#[odra::external_contract]
pub trait LendingPool {
    fn supply(&mut self, asset: Address, amount: U256) -> U256;
    fn withdraw(&mut self, asset: Address, amount: U256) -> U256;
    fn get_position(&self, owner: Address, asset: Address) -> U256;
    fn get_reserve(&self, asset: Address) -> Option<Reserve>;
    fn get_reserve_list(&self) -> Vec<Address>;
    fn get_emissions(&self, owner: Address, reserve_token_id: u32) -> U256;
    fn claim(&mut self, reserve_token_ids: Vec<u32>, to: Address) -> U256;
}

/// Adapter registry lookups used by the controller
#[odra::external_contract]
pub trait AdapterRegistry {
    fn get_adapter(&self, yield_type: YieldType, protocol: String) -> Address;
    fn is_supported_asset(&self, yield_type: YieldType, protocol: String, asset: Address) -> bool;
    fn get_adapters_with_assets(&self, yield_type: YieldType) -> Vec<AdapterWithAssets>;
}

/// cUSD issuance surface of the manager
#[odra::external_contract]
pub trait CusdIssuer {
    fn issue_cusd(&mut self, to: Address, amount: U256);
    fn burn_cusd(&mut self, from: Address, amount: U256);
    fn get_cusd_id(&self) -> Address;
    fn cusd_total_supply(&self) -> U256;
}

/// Distribution surface of the yield distributor
#[odra::external_contract]
pub trait Distributor {
    fn distribute_yield(&mut self, token: Address, amount: U256) -> bool;
    fn is_distribution_available(&self) -> bool;
    fn get_treasury(&self) -> Address;
}

/// CEP-18 token interface for cross-contract calls
#[odra::external_contract]
pub trait Cep18Token {
    fn transfer(&mut self, recipient: Address, amount: U256) -> bool;
    fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool;
    fn approve(&mut self, spender: Address, amount: U256) -> bool;
    fn allowance(&self, owner: Address, spender: Address) -> U256;
    fn balance_of(&self, account: Address) -> U256;
    fn total_supply(&self) -> U256;
    fn mint(&mut self, to: Address, amount: U256);
    fn burn_from(&mut self, from: Address, amount: U256);
    fn set_issuer(&mut self, new_issuer: Address);
}

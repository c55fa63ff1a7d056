//! Blend Pool Stand-in
//!
//! Minimal lending market with Blend's supply-side accounting: each reserve
//! issues b-tokens at an exchange rate (`b_rate`) that only grows as interest
//! accrues. Positions are keyed by the supplying contract, and underlying
//! tokens really move on every supply and withdraw.
//!
//! Borrowing and liquidation auctions are not modelled. The admin pays in
//! interest by moving `b_rate` forward and funds emissions per position.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::errors::PoolError;
use crate::interfaces::Cep18TokenContractRef;
use crate::math::{
    b_tokens_to_underlying, underlying_to_b_tokens_ceil, underlying_to_b_tokens_floor,
    B_RATE_SCALE,
};
use crate::types::Reserve;

#[odra::module]
pub struct BlendPoolMock {
    initialized: Var<bool>,
    /// Pool admin address
    admin: Var<Address>,
    /// Token emissions are paid in
    emission_token: Var<Address>,
    /// Reserve assets in listing order
    reserve_list: Var<Vec<Address>>,
    /// Reserve state per asset
    reserves: Mapping<Address, Reserve>,
    /// b-token positions: (owner, asset) -> b-tokens
    positions: Mapping<(Address, Address), U256>,
    /// Unclaimed emissions: (owner, reserve token id) -> amount
    emissions: Mapping<(Address, u32), U256>,
}

#[odra::module]
impl BlendPoolMock {
    pub fn init(&mut self, admin: Address, emission_token: Address) {
        if self.initialized.get().unwrap_or(false) {
            self.env().revert(PoolError::AlreadyInitialized);
        }
        self.admin.set(admin);
        self.emission_token.set(emission_token);
        self.reserve_list.set(Vec::new());
        self.initialized.set(true);
    }

    // ========== Admin Functions ==========

    /// List a new reserve at par (1 underlying per b-token)
    pub fn add_reserve(&mut self, asset: Address, apr_bps: u32) {
        self.require_admin();

        if self.reserves.get(&asset).is_some() {
            return;
        }

        let mut list = self.get_reserve_list();
        let reserve = Reserve {
            asset,
            index: list.len() as u32,
            b_rate: U256::from(B_RATE_SCALE),
            b_supply: U256::zero(),
            liquidity: U256::zero(),
            apr_bps,
        };
        list.push(asset);
        self.reserve_list.set(list);
        self.reserves.set(&asset, reserve);
    }

    /// Move the exchange rate forward. The admin pays the interest this
    /// represents into the pool, where it becomes withdrawable liquidity.
    pub fn set_b_rate(&mut self, asset: Address, b_rate: U256) {
        self.require_admin();
        let mut reserve = self.require_reserve(asset);

        if b_rate < reserve.b_rate {
            self.env().revert(PoolError::InvalidRate);
        }

        let before = b_tokens_to_underlying(reserve.b_supply, reserve.b_rate);
        let after = b_tokens_to_underlying(reserve.b_supply, b_rate);
        let interest = after - before;
        if !interest.is_zero() {
            let pool = self.env().self_address();
            Cep18TokenContractRef::new(self.env(), asset).transfer_from(
                self.env().caller(),
                pool,
                interest,
            );
        }

        reserve.liquidity = reserve.liquidity + interest;
        reserve.b_rate = b_rate;
        self.reserves.set(&asset, reserve);
    }

    pub fn set_apr(&mut self, asset: Address, apr_bps: u32) {
        self.require_admin();
        let mut reserve = self.require_reserve(asset);
        reserve.apr_bps = apr_bps;
        self.reserves.set(&asset, reserve);
    }

    /// Lend liquidity out to the admin, as a borrower would take it
    pub fn borrow_liquidity(&mut self, asset: Address, amount: U256) {
        self.require_admin();
        let mut reserve = self.require_reserve(asset);
        if reserve.liquidity < amount {
            self.env().revert(PoolError::InsufficientLiquidity);
        }
        reserve.liquidity = reserve.liquidity - amount;
        self.reserves.set(&asset, reserve);

        Cep18TokenContractRef::new(self.env(), asset).transfer(self.env().caller(), amount);
    }

    /// Fund `amount` of emissions for `owner`'s position in `asset`
    pub fn add_emissions(&mut self, owner: Address, asset: Address, amount: U256) {
        self.require_admin();
        let reserve = self.require_reserve(asset);
        let token_id = reserve.index * 2 + 1;

        let pool = self.env().self_address();
        Cep18TokenContractRef::new(self.env(), self.require_emission_token()).transfer_from(
            self.env().caller(),
            pool,
            amount,
        );

        let accrued = self.get_emissions(owner, token_id) + amount;
        self.emissions.set(&(owner, token_id), accrued);
    }

    // ========== Supply / Withdraw ==========

    /// Pull `amount` of underlying from the caller. Returns the b-tokens minted.
    pub fn supply(&mut self, asset: Address, amount: U256) -> U256 {
        let owner = self.env().caller();
        let mut reserve = self.require_reserve(asset);

        let pool = self.env().self_address();
        Cep18TokenContractRef::new(self.env(), asset).transfer_from(owner, pool, amount);

        let minted = underlying_to_b_tokens_floor(amount, reserve.b_rate);
        reserve.b_supply = reserve.b_supply + minted;
        reserve.liquidity = reserve.liquidity + amount;
        self.reserves.set(&asset, reserve);

        let position = self.get_position(owner, asset);
        self.positions.set(&(owner, asset), position + minted);

        minted
    }

    /// Pay `amount` of underlying to the caller. Returns the b-tokens burned.
    pub fn withdraw(&mut self, asset: Address, amount: U256) -> U256 {
        let owner = self.env().caller();
        let mut reserve = self.require_reserve(asset);

        if reserve.liquidity < amount {
            self.env().revert(PoolError::InsufficientLiquidity);
        }

        let burned = underlying_to_b_tokens_ceil(amount, reserve.b_rate);
        let position = self.get_position(owner, asset);
        if position < burned {
            self.env().revert(PoolError::InsufficientPosition);
        }

        reserve.b_supply = reserve.b_supply - burned;
        reserve.liquidity = reserve.liquidity - amount;
        self.reserves.set(&asset, reserve);
        self.positions.set(&(owner, asset), position - burned);

        Cep18TokenContractRef::new(self.env(), asset).transfer(owner, amount);

        burned
    }

    /// Pay the caller's emissions for `reserve_token_ids` to `to`
    pub fn claim(&mut self, reserve_token_ids: Vec<u32>, to: Address) -> U256 {
        let owner = self.env().caller();

        let mut total = U256::zero();
        for token_id in reserve_token_ids {
            total += self.get_emissions(owner, token_id);
            self.emissions.set(&(owner, token_id), U256::zero());
        }

        if !total.is_zero() {
            Cep18TokenContractRef::new(self.env(), self.require_emission_token())
                .transfer(to, total);
        }
        total
    }

    // ========== Query Functions ==========

    pub fn get_position(&self, owner: Address, asset: Address) -> U256 {
        self.positions.get(&(owner, asset)).unwrap_or(U256::zero())
    }

    pub fn get_reserve(&self, asset: Address) -> Option<Reserve> {
        self.reserves.get(&asset)
    }

    pub fn get_reserve_list(&self) -> Vec<Address> {
        self.reserve_list.get().unwrap_or_default()
    }

    pub fn get_emissions(&self, owner: Address, reserve_token_id: u32) -> U256 {
        self.emissions
            .get(&(owner, reserve_token_id))
            .unwrap_or(U256::zero())
    }

    pub fn get_emission_token(&self) -> Option<Address> {
        self.emission_token.get()
    }

    // ========== Internal Functions ==========

    fn require_reserve(&self, asset: Address) -> Reserve {
        match self.reserves.get(&asset) {
            Some(reserve) => reserve,
            None => self.env().revert(PoolError::ReserveNotFound),
        }
    }

    fn require_emission_token(&self) -> Address {
        match self.emission_token.get() {
            Some(token) => token,
            None => self.env().revert(PoolError::ReserveNotFound),
        }
    }

    fn require_admin(&self) {
        if self.admin.get() != Some(self.env().caller()) {
            self.env().revert(PoolError::Unauthorized);
        }
    }
}

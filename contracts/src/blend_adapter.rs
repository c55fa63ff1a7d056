//! Blend Capital Lending Adapter
//!
//! Implements the yield adapter capability over a Blend lending pool.
//! The pool holds one b-token position for the adapter, split here into
//! two kinds of positions per asset:
//!
//! - the controller book: everything supplied through the yield
//!   controller. Each user's share is recorded as backed principal, while
//!   b-tokens and yield are pooled. Only the controller can withdraw backed
//!   principal or claim the book's yield, and it is the controller that
//!   addresses the book as its own position.
//! - direct positions: supplied by a user calling the adapter themselves.
//!   These carry their own b-tokens and yield.
//!
//! balance = b-tokens x b_rate / 1e12, yield = value of the b-tokens not
//! needed to back principal.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::access_control::{AccessControl, DEFAULT_ADMIN_ROLE};
use crate::errors::AdapterError;
use crate::events::{ClaimEmissions, ClaimYield, Deposit, Withdraw};
use crate::interfaces::{Cep18TokenContractRef, LendingPoolContractRef};
use crate::math::{b_tokens_to_underlying, position_yield};
use crate::types::{is_valid_amount, Reserve};

#[odra::module(events = [Deposit, Withdraw, ClaimYield, ClaimEmissions])]
pub struct BlendCapitalAdapter {
    access_control: SubModule<AccessControl>,
    initialized: Var<bool>,
    /// Controller owning the book
    yield_controller: Var<Address>,
    /// Wrapped Blend pool
    lending_pool: Var<Address>,
    /// Direct principal per (user, asset)
    principal: Mapping<(Address, Address), U256>,
    /// Direct b-tokens per (user, asset)
    b_tokens: Mapping<(Address, Address), U256>,
    /// Book principal supplied through the controller for (user, asset)
    backed: Mapping<(Address, Address), U256>,
    /// Book b-tokens per asset
    book_b_tokens: Mapping<Address, U256>,
    /// Book principal per asset
    book_principal: Mapping<Address, U256>,
    /// Direct and book principal per asset
    total_principal: Mapping<Address, U256>,
}

#[odra::module]
impl BlendCapitalAdapter {
    pub fn init(&mut self, yield_controller: Address, lending_pool: Address, admin: Address) {
        if self.initialized.get().unwrap_or(false) {
            self.env().revert(AdapterError::AlreadyInitializedError);
        }
        self.access_control.initialize(admin);
        self.yield_controller.set(yield_controller);
        self.lending_pool.set(lending_pool);
        self.initialized.set(true);
    }

    // ========== Adapter Capability ==========

    /// Supply `amount` of `asset` for `user`, pulled from the caller.
    /// Returns the user's new balance.
    ///
    /// The caller must have approved this adapter for `amount`. Calls from
    /// the controller go to the book, calls from the user to their direct
    /// position.
    pub fn supply_collateral(&mut self, user: Address, asset: Address, amount: U256) -> U256 {
        self.require_authorized(user);
        self.require_valid_amount(amount);
        self.require_reserve(asset);

        let payer = self.env().caller();
        let minted = self.pool_supply(payer, asset, amount);

        let key = (user, asset);
        if self.is_controller(payer) {
            let backed = self.get_backed_principal(user, asset) + amount;
            let book_b_tokens = self.book_b_tokens_of(asset) + minted;
            let book_principal = self.get_book_principal(asset) + amount;
            self.backed.set(&key, backed);
            self.book_b_tokens.set(&asset, book_b_tokens);
            self.book_principal.set(&asset, book_principal);
        } else {
            let b_tokens = self.direct_b_tokens_of(user, asset) + minted;
            let principal = self.direct_principal_of(user, asset) + amount;
            self.b_tokens.set(&key, b_tokens);
            self.principal.set(&key, principal);
        }
        let total = self.get_total_deposited(asset) + amount;
        self.total_principal.set(&asset, total);

        self.env().emit_event(Deposit {
            adapter: self.env().self_address(),
            user,
            asset,
            amount,
        });

        self.get_balance(user, asset)
    }

    /// Withdraw `amount` of principal and pay it to `user`. Returns the
    /// user's new balance.
    ///
    /// The controller withdraws from the principal it supplied for `user`.
    /// A user acting directly may only withdraw their direct principal;
    /// principal backing cUSD is off limits to them.
    pub fn withdraw_collateral(&mut self, user: Address, asset: Address, amount: U256) -> U256 {
        self.require_authorized(user);
        self.require_valid_amount(amount);

        let reserve = self.require_reserve(asset);
        let paid = if self.is_controller(self.env().caller()) {
            self.withdraw_backed(&reserve, user, amount)
        } else {
            self.withdraw_direct(&reserve, user, amount)
        };
        let total = self.get_total_deposited(asset) - amount;
        self.total_principal.set(&asset, total);

        if !paid.is_zero() {
            Cep18TokenContractRef::new(self.env(), asset).transfer(user, paid);
        }

        self.env().emit_event(Withdraw {
            adapter: self.env().self_address(),
            user,
            asset,
            amount,
        });

        self.get_balance(user, asset)
    }

    /// Value of the direct position plus principal supplied through the
    /// controller. For the controller this is the value of the whole book.
    pub fn get_balance(&self, user: Address, asset: Address) -> U256 {
        let reserve = match self.pool().get_reserve(asset) {
            Some(reserve) => reserve,
            None => return U256::zero(),
        };
        if self.is_controller(user) {
            return b_tokens_to_underlying(self.book_b_tokens_of(asset), reserve.b_rate);
        }
        b_tokens_to_underlying(self.direct_b_tokens_of(user, asset), reserve.b_rate)
            + self.get_backed_principal(user, asset)
    }

    /// Unclaimed yield. Yield on principal supplied through the controller
    /// accrues to the book, not to the user.
    pub fn get_yield(&self, user: Address, asset: Address) -> U256 {
        let reserve = match self.pool().get_reserve(asset) {
            Some(reserve) => reserve,
            None => return U256::zero(),
        };
        let (b_tokens, principal) = self.yield_position(user, asset);
        position_yield(b_tokens, reserve.b_rate, principal)
    }

    /// Withdraw the yield accrued on `user`'s position and pay it to `user`.
    /// Principal stays supplied.
    pub fn claim_yield(&mut self, user: Address, asset: Address) -> U256 {
        self.require_authorized(user);

        let yield_amount = self.get_yield(user, asset);
        if yield_amount.is_zero() {
            return U256::zero();
        }

        let reserve = self.require_reserve(asset);
        let burned = self.pool_withdraw(&reserve, yield_amount);
        if self.is_controller(user) {
            let book_b_tokens = self.book_b_tokens_of(asset) - burned;
            self.book_b_tokens.set(&asset, book_b_tokens);
        } else {
            let b_tokens = self.direct_b_tokens_of(user, asset);
            self.b_tokens.set(&(user, asset), b_tokens - burned);
        }

        Cep18TokenContractRef::new(self.env(), asset).transfer(user, yield_amount);

        self.env().emit_event(ClaimYield {
            source: self.env().self_address(),
            user,
            asset,
            amount: yield_amount,
        });

        yield_amount
    }

    /// Blend reserve token id of the b-token for `asset`
    pub fn get_reserve_token_id(&self, asset: Address) -> Option<u32> {
        self.pool()
            .get_reserve(asset)
            .map(|reserve| reserve.index * 2 + 1)
    }

    // ========== Emissions ==========

    /// Emissions accrued on the adapter's pool position for `asset`
    pub fn get_emissions(&self, asset: Address) -> U256 {
        match self.get_reserve_token_id(asset) {
            Some(token_id) => self
                .pool()
                .get_emissions(self.env().self_address(), token_id),
            None => U256::zero(),
        }
    }

    /// Claim the emissions for `asset` to `to` (controller only)
    pub fn claim_emissions(&mut self, to: Address, asset: Address) -> U256 {
        if !self.is_controller(self.env().caller()) {
            self.env().revert(AdapterError::Unauthorized);
        }

        let token_id = match self.get_reserve_token_id(asset) {
            Some(token_id) => token_id,
            None => return U256::zero(),
        };
        let claimed = self.pool().claim(vec![token_id], to);
        if !claimed.is_zero() {
            self.env().emit_event(ClaimEmissions {
                source: self.env().self_address(),
                to,
                asset,
                amount: claimed,
            });
        }
        claimed
    }

    // ========== Query Functions ==========

    /// Direct and backed principal of `user`. For the controller, the book.
    pub fn get_principal(&self, user: Address, asset: Address) -> U256 {
        if self.is_controller(user) {
            return self.get_book_principal(asset);
        }
        self.direct_principal_of(user, asset) + self.get_backed_principal(user, asset)
    }

    /// Principal supplied through the controller for `user`
    pub fn get_backed_principal(&self, user: Address, asset: Address) -> U256 {
        self.backed.get(&(user, asset)).unwrap_or(U256::zero())
    }

    pub fn get_book_principal(&self, asset: Address) -> U256 {
        self.book_principal.get(&asset).unwrap_or(U256::zero())
    }

    pub fn get_total_deposited(&self, asset: Address) -> U256 {
        self.total_principal.get(&asset).unwrap_or(U256::zero())
    }

    /// Supply APR of the reserve, in basis points
    pub fn get_apy(&self, asset: Address) -> u32 {
        self.pool()
            .get_reserve(asset)
            .map(|reserve| reserve.apr_bps)
            .unwrap_or(0)
    }

    pub fn get_lending_pool(&self) -> Option<Address> {
        self.lending_pool.get()
    }

    pub fn get_yield_controller(&self) -> Option<Address> {
        self.yield_controller.get()
    }

    // ========== Admin Functions ==========

    pub fn set_yield_controller(&mut self, yield_controller: Address) {
        self.access_control.only_default_admin();
        self.yield_controller.set(yield_controller);
    }

    pub fn set_default_admin(&mut self, new_admin: Address) {
        self.access_control.set_default_admin(new_admin);
    }

    pub fn is_admin(&self, account: Address) -> bool {
        self.access_control
            .has_role(String::from(DEFAULT_ADMIN_ROLE), account)
    }

    // ========== Internal Functions ==========

    fn pool(&self) -> LendingPoolContractRef {
        LendingPoolContractRef::new(self.env(), self.pool_address())
    }

    fn pool_address(&self) -> Address {
        match self.lending_pool.get() {
            Some(pool) => pool,
            None => self.env().revert(AdapterError::LendingOperationFailed),
        }
    }

    fn is_controller(&self, account: Address) -> bool {
        self.yield_controller.get() == Some(account)
    }

    fn direct_b_tokens_of(&self, user: Address, asset: Address) -> U256 {
        self.b_tokens.get(&(user, asset)).unwrap_or(U256::zero())
    }

    fn direct_principal_of(&self, user: Address, asset: Address) -> U256 {
        self.principal.get(&(user, asset)).unwrap_or(U256::zero())
    }

    fn book_b_tokens_of(&self, asset: Address) -> U256 {
        self.book_b_tokens.get(&asset).unwrap_or(U256::zero())
    }

    /// b-tokens and principal the yield of `user`'s position is measured on
    fn yield_position(&self, user: Address, asset: Address) -> (U256, U256) {
        if self.is_controller(user) {
            (self.book_b_tokens_of(asset), self.get_book_principal(asset))
        } else {
            (
                self.direct_b_tokens_of(user, asset),
                self.direct_principal_of(user, asset),
            )
        }
    }

    fn withdraw_backed(&mut self, reserve: &Reserve, user: Address, amount: U256) -> U256 {
        let asset = reserve.asset;
        let backed = self.get_backed_principal(user, asset);
        if backed < amount {
            self.env().revert(AdapterError::InsufficientBalance);
        }

        let b_tokens = self.book_b_tokens_of(asset);
        let requested = amount.min(b_tokens_to_underlying(b_tokens, reserve.b_rate));
        let burned = self.pool_withdraw(reserve, requested);

        let book_principal = self.get_book_principal(asset) - amount;
        self.backed.set(&(user, asset), backed - amount);
        self.book_b_tokens.set(&asset, b_tokens - burned);
        self.book_principal.set(&asset, book_principal);
        requested
    }

    fn withdraw_direct(&mut self, reserve: &Reserve, user: Address, amount: U256) -> U256 {
        let asset = reserve.asset;
        let principal = self.direct_principal_of(user, asset);
        if principal < amount {
            if principal + self.get_backed_principal(user, asset) >= amount {
                self.env().revert(AdapterError::Unauthorized);
            }
            self.env().revert(AdapterError::InsufficientBalance);
        }

        // b-token rounding may leave the position a unit short of principal
        let b_tokens = self.direct_b_tokens_of(user, asset);
        let requested = amount.min(b_tokens_to_underlying(b_tokens, reserve.b_rate));
        let burned = self.pool_withdraw(reserve, requested);

        let key = (user, asset);
        self.b_tokens.set(&key, b_tokens - burned);
        self.principal.set(&key, principal - amount);
        requested
    }

    /// Pull `amount` from `payer` and supply it to the pool
    fn pool_supply(&mut self, payer: Address, asset: Address, amount: U256) -> U256 {
        let adapter = self.env().self_address();
        let pool = self.pool_address();
        let mut token = Cep18TokenContractRef::new(self.env(), asset);
        token.transfer_from(payer, adapter, amount);
        token.approve(pool, amount);
        self.pool().supply(asset, amount)
    }

    /// Withdraw from the pool, surfacing market rejections as
    /// `LendingOperationFailed` before the pool is touched.
    fn pool_withdraw(&self, reserve: &Reserve, amount: U256) -> U256 {
        if reserve.liquidity < amount {
            self.env().revert(AdapterError::LendingOperationFailed);
        }
        if amount.is_zero() {
            return U256::zero();
        }
        self.pool().withdraw(reserve.asset, amount)
    }

    fn require_reserve(&self, asset: Address) -> Reserve {
        match self.pool().get_reserve(asset) {
            Some(reserve) => reserve,
            None => self.env().revert(AdapterError::LendingOperationFailed),
        }
    }

    fn require_valid_amount(&self, amount: U256) {
        if !is_valid_amount(amount) {
            self.env().revert(AdapterError::InvalidAmount);
        }
    }

    fn require_authorized(&self, user: Address) {
        let caller = self.env().caller();
        if caller != user && !self.is_controller(caller) {
            self.env().revert(AdapterError::Unauthorized);
        }
    }
}

//! cUSD Manager Contract
//!
//! Issues and burns cUSD 1:1 against collateral recorded by the yield
//! controller. Only the registered yield controller may issue or burn.
//! The manager has no adapter visibility; collateral coverage is checked
//! by the controller before it asks for a mint.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::access_control::{AccessControl, DEFAULT_ADMIN_ROLE};
use crate::errors::ManagerError;
use crate::events::{BurnCusd, IssueCusd, SetCusdIssuer, SetManagerAdmin, SetYieldController};
use crate::interfaces::Cep18TokenContractRef;
use crate::types::MAX_AMOUNT;

/// Role allowed to reconfigure the manager
pub const CUSD_MANAGER_ADMIN_ROLE: &str = "CUSD_MANAGER_ADMIN";

#[odra::module(events = [IssueCusd, BurnCusd, SetCusdIssuer, SetManagerAdmin, SetYieldController])]
pub struct CusdManager {
    access_control: SubModule<AccessControl>,
    initialized: Var<bool>,
    /// cUSD token contract
    cusd_id: Var<Address>,
    /// Only caller allowed to issue and burn
    yield_controller: Var<Option<Address>>,
}

#[odra::module]
impl CusdManager {
    pub fn init(&mut self, cusd_id: Address, owner: Address, admin: Address) {
        if self.initialized.get().unwrap_or(false) {
            self.env().revert(ManagerError::AlreadyInitializedError);
        }
        self.access_control.initialize(owner);
        self.access_control
            .grant_unchecked(CUSD_MANAGER_ADMIN_ROLE, admin);
        self.cusd_id.set(cusd_id);
        self.yield_controller.set(None);
        self.initialized.set(true);
    }

    // ========== Issuance (Yield Controller Only) ==========

    pub fn issue_cusd(&mut self, to: Address, amount: U256) {
        self.require_yield_controller();
        self.require_positive(amount);

        let mut token = self.token();
        let new_supply = token.total_supply().checked_add(amount);
        match new_supply {
            Some(supply) if supply <= U256::from(MAX_AMOUNT) => {}
            _ => self.env().revert(ManagerError::OverflowError),
        }

        token.mint(to, amount);

        self.env().emit_event(IssueCusd { to, amount });
    }

    pub fn burn_cusd(&mut self, from: Address, amount: U256) {
        self.require_yield_controller();
        self.require_positive(amount);

        let mut token = self.token();
        if token.balance_of(from) < amount {
            self.env().revert(ManagerError::BalanceError);
        }

        token.burn_from(from, amount);

        self.env().emit_event(BurnCusd { from, amount });
    }

    // ========== Query Functions ==========

    pub fn get_cusd_id(&self) -> Address {
        match self.cusd_id.get() {
            Some(id) => id,
            None => self.env().revert(ManagerError::InternalError),
        }
    }

    pub fn cusd_total_supply(&self) -> U256 {
        self.token().total_supply()
    }

    pub fn get_yield_controller(&self) -> Option<Address> {
        self.yield_controller.get().flatten()
    }

    pub fn get_cusd_manager_admin(&self) -> Option<Address> {
        self.access_control.first_member(CUSD_MANAGER_ADMIN_ROLE)
    }

    // ========== Admin Functions ==========

    pub fn set_yield_controller(&mut self, yield_controller: Address) {
        self.require_manager_admin();
        self.yield_controller.set(Some(yield_controller));

        self.env().emit_event(SetYieldController { yield_controller });
    }

    /// Point the manager at a different cUSD token contract
    pub fn set_cusd_id(&mut self, cusd_id: Address) {
        self.require_manager_admin();
        self.cusd_id.set(cusd_id);
    }

    /// Hand cUSD minting rights to `new_issuer`. After this the manager can
    /// no longer issue or burn.
    pub fn set_cusd_issuer(&mut self, new_issuer: Address) {
        self.require_manager_admin();
        self.token().set_issuer(new_issuer);

        self.env().emit_event(SetCusdIssuer { new_issuer });
    }

    /// Move the manager admin role (default admin only)
    pub fn set_cusd_manager_admin(&mut self, new_admin: Address) {
        self.access_control.only_default_admin();
        self.access_control
            .replace_role_holder(String::from(CUSD_MANAGER_ADMIN_ROLE), new_admin);

        self.env().emit_event(SetManagerAdmin { new_admin });
    }

    pub fn set_default_admin(&mut self, new_admin: Address) {
        self.access_control.set_default_admin(new_admin);
    }

    pub fn is_default_admin(&self, account: Address) -> bool {
        self.access_control
            .has_role(String::from(DEFAULT_ADMIN_ROLE), account)
    }

    // ========== Internal Functions ==========

    fn token(&self) -> Cep18TokenContractRef {
        Cep18TokenContractRef::new(self.env(), self.get_cusd_id())
    }

    fn require_positive(&self, amount: U256) {
        if amount.is_zero() {
            self.env().revert(ManagerError::NegativeAmountError);
        }
        if amount > U256::from(MAX_AMOUNT) {
            self.env().revert(ManagerError::OverflowError);
        }
    }

    fn require_yield_controller(&self) {
        if self.get_yield_controller() != Some(self.env().caller()) {
            self.env().revert(ManagerError::UnauthorizedError);
        }
    }

    fn require_manager_admin(&self) {
        if !self.access_control.caller_has_role(CUSD_MANAGER_ADMIN_ROLE) {
            self.env().revert(ManagerError::UnauthorizedError);
        }
    }
}

//! Lending Yield Controller
//!
//! User-facing entry point of the protocol. Deposits pull the collateral
//! from the user, supply it through the adapter registered for
//! `(Lending, protocol)` and mint the same amount of cUSD. Withdrawals burn
//! cUSD first and then have the adapter pay the collateral back. Both run
//! in a single call, so a failure anywhere reverts the whole operation.
//!
//! Everything supplied here lands in the adapter's controller book, which
//! this contract addresses as its own position. Claimed yield is re-supplied
//! to that book and the same amount of cUSD is issued to the distributor.
//! cUSD the distributor does not accept yet stays recorded as pending and
//! is forwarded again on the next claim or `distribute_pending`.
//!
//! `backed_collateral` counts the principal cUSD was issued against. It is
//! kept here rather than read back from the registry, so delisting an asset
//! or an adapter never shrinks it.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::access_control::{AccessControl, DEFAULT_ADMIN_ROLE};
use crate::errors::ControllerError;
use crate::events::{
    ClaimEmissions, ClaimYield, DepositCollateral, SetAdapterRegistry, SetCusdManager,
    SetYieldDistributor, WithdrawCollateral, YieldDeferred,
};
use crate::interfaces::{
    AdapterRegistryContractRef, Cep18TokenContractRef, CusdIssuerContractRef,
    DistributorContractRef, LendingAdapterContractRef,
};
use crate::types::{is_valid_amount, AdapterWithAssets, YieldType};

/// Role allowed to rewire the controller
pub const YIELD_CONTROLLER_ADMIN_ROLE: &str = "YIELD_CONTROLLER_ADMIN";

const YIELD_TYPE: YieldType = YieldType::Lending;

#[odra::module(events = [
    DepositCollateral,
    WithdrawCollateral,
    ClaimYield,
    ClaimEmissions,
    YieldDeferred,
    SetAdapterRegistry,
    SetCusdManager,
    SetYieldDistributor
])]
pub struct LendingYieldController {
    access_control: SubModule<AccessControl>,
    initialized: Var<bool>,
    adapter_registry: Var<Address>,
    cusd_manager: Var<Address>,
    yield_distributor: Var<Address>,
    /// cUSD issued to the distributor but not distributed yet
    pending_yield: Var<U256>,
    /// Principal supplied through this contract and still outstanding
    backed_collateral: Var<U256>,
}

#[odra::module]
impl LendingYieldController {
    pub fn init(
        &mut self,
        adapter_registry: Address,
        cusd_manager: Address,
        yield_distributor: Address,
        owner: Address,
        admin: Address,
    ) {
        if self.initialized.get().unwrap_or(false) {
            self.env().revert(ControllerError::AlreadyInitializedError);
        }
        self.access_control.initialize(owner);
        self.access_control
            .grant_unchecked(YIELD_CONTROLLER_ADMIN_ROLE, admin);

        self.adapter_registry.set(adapter_registry);
        self.cusd_manager.set(cusd_manager);
        self.yield_distributor.set(yield_distributor);
        self.pending_yield.set(U256::zero());
        self.backed_collateral.set(U256::zero());
        self.initialized.set(true);
    }

    // ========== Collateral ==========

    /// Pull `amount` of `asset` from `user`, supply it through the
    /// `protocol` adapter and mint the same amount of cUSD to `user`.
    ///
    /// `user` must have approved this contract for `amount` of `asset`.
    pub fn deposit_collateral(
        &mut self,
        protocol: String,
        user: Address,
        asset: Address,
        amount: U256,
    ) -> U256 {
        self.require_user(user);
        self.require_valid_amount(amount);

        let adapter = self.supported_adapter(protocol, asset);
        let controller = self.env().self_address();
        let mut asset_ref = Cep18TokenContractRef::new(self.env(), asset);
        asset_ref.transfer_from(user, controller, amount);
        asset_ref.approve(adapter, amount);

        LendingAdapterContractRef::new(self.env(), adapter).supply_collateral(user, asset, amount);
        self.add_backed_collateral(amount);
        self.issue_backed(user, amount);

        self.env().emit_event(DepositCollateral { user, asset, amount });

        amount
    }

    /// Burn `amount` cUSD from `user`, then have the `protocol` adapter pay
    /// the same amount of collateral back to `user`.
    ///
    /// Works for assets that are no longer supported, so delisting never
    /// locks collateral in.
    pub fn withdraw_collateral(
        &mut self,
        protocol: String,
        user: Address,
        asset: Address,
        amount: U256,
    ) -> U256 {
        self.require_user(user);
        self.require_valid_amount(amount);

        let adapter = self.registry().get_adapter(YIELD_TYPE, protocol);
        self.manager().burn_cusd(user, amount);
        LendingAdapterContractRef::new(self.env(), adapter).withdraw_collateral(user, asset, amount);

        let remaining = match self.get_total_collateral().checked_sub(amount) {
            Some(remaining) => remaining,
            None => self.env().revert(ControllerError::InternalError),
        };
        self.backed_collateral.set(remaining);

        self.env().emit_event(WithdrawCollateral { user, asset, amount });

        amount
    }

    /// Principal cUSD has been issued against, across every adapter and asset
    pub fn get_total_collateral(&self) -> U256 {
        self.backed_collateral.get().unwrap_or(U256::zero())
    }

    // ========== Yield ==========

    /// Unclaimed yield on this contract's position, across every lending
    /// adapter and supported asset
    pub fn get_yield(&self) -> U256 {
        let controller = self.env().self_address();
        let mut total = U256::zero();
        for entry in self.lending_adapters() {
            let adapter = LendingAdapterContractRef::new(self.env(), entry.adapter);
            for asset in entry.assets.iter() {
                total += adapter.get_yield(controller, *asset);
            }
        }
        total
    }

    /// Claim yield from every lending adapter and forward it, together with
    /// anything still pending, to the distributor. Returns the amount newly
    /// claimed.
    ///
    /// Reverts with `YieldUnavailable` while the distribution period is
    /// running, so nothing is claimed early.
    pub fn claim_yield(&mut self) -> U256 {
        let pending = self.get_pending_yield();
        if self.get_yield().is_zero() && pending.is_zero() {
            return U256::zero();
        }

        if !self.distributor().is_distribution_available() {
            self.env().revert(ControllerError::YieldUnavailable);
        }

        let controller = self.env().self_address();
        let mut total_claimed = U256::zero();
        for entry in self.lending_adapters() {
            let mut adapter = LendingAdapterContractRef::new(self.env(), entry.adapter);
            for asset in entry.assets.iter() {
                let claimed = adapter.claim_yield(controller, *asset);
                if claimed.is_zero() {
                    continue;
                }

                Cep18TokenContractRef::new(self.env(), *asset).approve(entry.adapter, claimed);
                adapter.supply_collateral(controller, *asset, claimed);
                self.add_backed_collateral(claimed);
                total_claimed += claimed;

                self.env().emit_event(ClaimYield {
                    source: entry.adapter,
                    user: controller,
                    asset: *asset,
                    amount: claimed,
                });
            }
        }

        if !total_claimed.is_zero() {
            let distributor = self.get_yield_distributor();
            self.issue_backed(distributor, total_claimed);
        }
        self.forward_to_distributor(total_claimed);

        total_claimed
    }

    /// Claim the lending-market emissions on `asset` held by the `protocol`
    /// adapter and pay them to the treasury. Returns the amount paid.
    pub fn claim_emissions(&mut self, protocol: String, asset: Address) -> U256 {
        let adapter_address = self.registry().get_adapter(YIELD_TYPE, protocol);
        let mut adapter = LendingAdapterContractRef::new(self.env(), adapter_address);
        if adapter.get_emissions(asset).is_zero() {
            return U256::zero();
        }

        let treasury = self.distributor().get_treasury();
        let claimed = adapter.claim_emissions(treasury, asset);

        self.env().emit_event(ClaimEmissions {
            source: adapter_address,
            to: treasury,
            asset,
            amount: claimed,
        });

        claimed
    }

    /// Forward pending cUSD to the distributor. Returns whether it was accepted.
    pub fn distribute_pending(&mut self) -> bool {
        if self.get_pending_yield().is_zero() {
            return false;
        }
        self.forward_to_distributor(U256::zero())
    }

    pub fn get_pending_yield(&self) -> U256 {
        self.pending_yield.get().unwrap_or(U256::zero())
    }

    // ========== Wiring (Controller Admin Only) ==========

    pub fn set_adapter_registry(&mut self, adapter_registry: Address) {
        self.require_controller_admin();
        self.adapter_registry.set(adapter_registry);

        self.env().emit_event(SetAdapterRegistry { adapter_registry });
    }

    pub fn get_adapter_registry(&self) -> Address {
        match self.adapter_registry.get() {
            Some(address) => address,
            None => self.env().revert(ControllerError::InternalError),
        }
    }

    pub fn set_cusd_manager(&mut self, cusd_manager: Address) {
        self.require_controller_admin();
        self.cusd_manager.set(cusd_manager);

        self.env().emit_event(SetCusdManager { cusd_manager });
    }

    pub fn get_cusd_manager(&self) -> Address {
        match self.cusd_manager.get() {
            Some(address) => address,
            None => self.env().revert(ControllerError::InternalError),
        }
    }

    pub fn set_yield_distributor(&mut self, yield_distributor: Address) {
        self.require_controller_admin();
        self.yield_distributor.set(yield_distributor);

        self.env().emit_event(SetYieldDistributor { yield_distributor });
    }

    pub fn get_yield_distributor(&self) -> Address {
        match self.yield_distributor.get() {
            Some(address) => address,
            None => self.env().revert(ControllerError::InternalError),
        }
    }

    // ========== Admin Functions ==========

    pub fn set_controller_admin(&mut self, new_admin: Address) {
        self.access_control.only_default_admin();
        self.access_control
            .replace_role_holder(String::from(YIELD_CONTROLLER_ADMIN_ROLE), new_admin);
    }

    pub fn get_controller_admin(&self) -> Option<Address> {
        self.access_control.first_member(YIELD_CONTROLLER_ADMIN_ROLE)
    }

    pub fn set_default_admin(&mut self, new_admin: Address) {
        self.access_control.set_default_admin(new_admin);
    }

    pub fn is_default_admin(&self, account: Address) -> bool {
        self.access_control
            .has_role(String::from(DEFAULT_ADMIN_ROLE), account)
    }

    // ========== Internal Functions ==========

    fn registry(&self) -> AdapterRegistryContractRef {
        AdapterRegistryContractRef::new(self.env(), self.get_adapter_registry())
    }

    fn manager(&self) -> CusdIssuerContractRef {
        CusdIssuerContractRef::new(self.env(), self.get_cusd_manager())
    }

    fn distributor(&self) -> DistributorContractRef {
        DistributorContractRef::new(self.env(), self.get_yield_distributor())
    }

    fn lending_adapters(&self) -> Vec<AdapterWithAssets> {
        self.registry().get_adapters_with_assets(YIELD_TYPE)
    }

    /// Resolve the adapter for `protocol`, requiring `asset` to be supported
    fn supported_adapter(&self, protocol: String, asset: Address) -> Address {
        let registry = self.registry();
        if !registry.is_supported_asset(YIELD_TYPE, protocol.clone(), asset) {
            self.env().revert(ControllerError::UnsupportedAsset);
        }
        registry.get_adapter(YIELD_TYPE, protocol)
    }

    fn add_backed_collateral(&mut self, amount: U256) {
        let total = self.get_total_collateral() + amount;
        self.backed_collateral.set(total);
    }

    /// Mint cUSD only while total supply stays covered by recorded collateral
    fn issue_backed(&self, to: Address, amount: U256) {
        let mut manager = self.manager();
        let supply_after = manager.cusd_total_supply() + amount;
        if supply_after > self.get_total_collateral() {
            self.env().revert(ControllerError::CollateralShortfall);
        }
        manager.issue_cusd(to, amount);
    }

    /// Offer `fresh + pending` to the distributor. A rejected offer stays
    /// pending in full.
    fn forward_to_distributor(&mut self, fresh: U256) -> bool {
        let amount = fresh + self.get_pending_yield();
        if amount.is_zero() {
            return false;
        }

        let token = self.manager().get_cusd_id();
        let accepted = self.distributor().distribute_yield(token, amount);
        if accepted {
            self.pending_yield.set(U256::zero());
        } else {
            self.pending_yield.set(amount);
            self.env().emit_event(YieldDeferred {
                amount: fresh,
                pending_total: amount,
            });
        }
        accepted
    }

    fn require_user(&self, user: Address) {
        if self.env().caller() != user {
            self.env().revert(ControllerError::UnauthorizedError);
        }
    }

    fn require_valid_amount(&self, amount: U256) {
        if !is_valid_amount(amount) {
            self.env().revert(ControllerError::NegativeAmountError);
        }
    }

    fn require_controller_admin(&self) {
        if !self.access_control.caller_has_role(YIELD_CONTROLLER_ADMIN_ROLE) {
            self.env().revert(ControllerError::UnauthorizedError);
        }
    }
}

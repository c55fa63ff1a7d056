//! Events emitted by the protocol contracts.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::types::YieldType;

// ========== Access control ==========

#[odra::event]
pub struct RoleGranted {
    pub role: String,
    pub account: Address,
    pub sender: Address,
}

#[odra::event]
pub struct RoleRevoked {
    pub role: String,
    pub account: Address,
    pub sender: Address,
}

#[odra::event]
pub struct RoleAdminChanged {
    pub role: String,
    pub previous_admin_role: String,
    pub new_admin_role: String,
}

// ========== Adapter ==========

#[odra::event]
pub struct Deposit {
    pub adapter: Address,
    pub user: Address,
    pub asset: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Withdraw {
    pub adapter: Address,
    pub user: Address,
    pub asset: Address,
    pub amount: U256,
}

#[odra::event]
pub struct ClaimYield {
    pub source: Address,
    pub user: Address,
    pub asset: Address,
    pub amount: U256,
}

/// Lending-market emissions paid out of an adapter's pool position
#[odra::event]
pub struct ClaimEmissions {
    pub source: Address,
    pub to: Address,
    pub asset: Address,
    pub amount: U256,
}

// ========== Registry ==========

#[odra::event]
pub struct RegisterAdapter {
    pub yield_type: YieldType,
    pub protocol: String,
    pub adapter: Address,
}

#[odra::event]
pub struct RemoveAdapter {
    pub yield_type: YieldType,
    pub protocol: String,
}

#[odra::event]
pub struct AddSupportForAsset {
    pub yield_type: YieldType,
    pub protocol: String,
    pub asset: Address,
}

#[odra::event]
pub struct RemoveSupportForAsset {
    pub yield_type: YieldType,
    pub protocol: String,
    pub asset: Address,
}

#[odra::event]
pub struct SetRegistryAdmin {
    pub new_admin: Address,
}

// ========== cUSD ==========

#[odra::event]
pub struct IssueCusd {
    pub to: Address,
    pub amount: U256,
}

#[odra::event]
pub struct BurnCusd {
    pub from: Address,
    pub amount: U256,
}

#[odra::event]
pub struct SetCusdIssuer {
    pub new_issuer: Address,
}

#[odra::event]
pub struct SetManagerAdmin {
    pub new_admin: Address,
}

#[odra::event]
pub struct SetYieldController {
    pub yield_controller: Address,
}

// ========== Distributor ==========

#[odra::event]
pub struct AddMember {
    pub member: Address,
}

#[odra::event]
pub struct RemoveMember {
    pub member: Address,
}

#[odra::event]
pub struct SetTreasury {
    pub treasury: Address,
}

#[odra::event]
pub struct SetTreasuryShare {
    pub share_bps: u32,
}

#[odra::event]
pub struct SetDistributionPeriod {
    pub period: u64,
}

#[odra::event]
pub struct DistributeYield {
    pub token: Address,
    pub total_amount: U256,
    pub treasury_amount: U256,
    pub per_member: U256,
    pub members: Vec<Address>,
}

// ========== Controller ==========

#[odra::event]
pub struct DepositCollateral {
    pub user: Address,
    pub asset: Address,
    pub amount: U256,
}

#[odra::event]
pub struct WithdrawCollateral {
    pub user: Address,
    pub asset: Address,
    pub amount: U256,
}

/// Claimed cUSD the distributor did not accept yet
#[odra::event]
pub struct YieldDeferred {
    pub amount: U256,
    pub pending_total: U256,
}

#[odra::event]
pub struct SetAdapterRegistry {
    pub adapter_registry: Address,
}

#[odra::event]
pub struct SetCusdManager {
    pub cusd_manager: Address,
}

#[odra::event]
pub struct SetYieldDistributor {
    pub yield_distributor: Address,
}

//! Yield Distributor Contract
//!
//! Splits yield forwarded by the controller between the treasury and the
//! active members, at most once per distribution period.
//!
//! Rounding: the treasury cut and the per-member share are both rounded
//! down. Whatever integer division leaves over stays in this contract's
//! balance; no member receives extra.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::access_control::{AccessControl, DEFAULT_ADMIN_ROLE};
use crate::errors::DistributorError;
use crate::events::{
    AddMember, DistributeYield, RemoveMember, SetDistributionPeriod, SetTreasury,
    SetTreasuryShare, SetYieldController,
};
use crate::interfaces::Cep18TokenContractRef;
use crate::math::split_yield;
use crate::types::{is_valid_amount, Distribution, DistributionConfig, Member, BPS_SCALE};

/// Role allowed to manage members and distribution settings
pub const DISTRIBUTOR_ADMIN_ROLE: &str = "DISTRIBUTOR_ADMIN";

#[odra::module(events = [
    AddMember,
    RemoveMember,
    SetTreasury,
    SetTreasuryShare,
    SetDistributionPeriod,
    DistributeYield,
    SetYieldController
])]
pub struct YieldDistributor {
    access_control: SubModule<AccessControl>,
    initialized: Var<bool>,
    treasury: Var<Address>,
    treasury_share_bps: Var<u32>,
    distribution_period: Var<u64>,
    last_distribution: Var<u64>,
    yield_controller: Var<Option<Address>>,
    /// Member records, kept after removal
    members: Mapping<Address, Member>,
    /// Every address ever added, in insertion order
    member_list: Var<Vec<Address>>,
    /// Distribution records keyed by timestamp
    distributions: Mapping<u64, Distribution>,
    distribution_timestamps: Var<Vec<u64>>,
}

#[odra::module]
impl YieldDistributor {
    pub fn init(
        &mut self,
        treasury: Address,
        treasury_share_bps: u32,
        distribution_period: u64,
        owner: Address,
        admin: Address,
    ) {
        if self.initialized.get().unwrap_or(false) {
            self.env().revert(DistributorError::AlreadyInitializedError);
        }
        self.require_valid_share(treasury_share_bps);
        self.require_valid_period(distribution_period);

        self.access_control.initialize(owner);
        self.access_control
            .grant_unchecked(DISTRIBUTOR_ADMIN_ROLE, admin);

        self.treasury.set(treasury);
        self.treasury_share_bps.set(treasury_share_bps);
        self.distribution_period.set(distribution_period);
        self.last_distribution.set(0);
        self.yield_controller.set(None);
        self.initialized.set(true);
    }

    // ========== Distribution ==========

    /// Split `amount` of `token` held by this contract between the treasury
    /// and the active members.
    ///
    /// Returns `false` without touching any state when the period has not
    /// elapsed yet or when there is no active member.
    pub fn distribute_yield(&mut self, token: Address, amount: U256) -> bool {
        self.require_yield_controller();
        if !is_valid_amount(amount) {
            self.env().revert(DistributorError::NegativeAmountError);
        }

        if !self.is_distribution_available() {
            return false;
        }

        let members = self.list_members();
        if members.is_empty() {
            return false;
        }

        let split = split_yield(amount, self.get_treasury_share(), members.len() as u32);

        let mut token_ref = Cep18TokenContractRef::new(self.env(), token);
        if token_ref.balance_of(self.env().self_address()) < amount {
            self.env().revert(DistributorError::BalanceError);
        }

        if !split.treasury_amount.is_zero() {
            token_ref.transfer(self.get_treasury(), split.treasury_amount);
        }
        if !split.per_member.is_zero() {
            for member in members.iter() {
                token_ref.transfer(*member, split.per_member);
            }
        }

        let now = self.env().get_block_time();
        self.distributions.set(
            &now,
            Distribution {
                timestamp: now,
                total_amount: amount,
                treasury_amount: split.treasury_amount,
                member_amount: split.member_amount,
                member_count: members.len() as u32,
            },
        );
        let mut timestamps = self.get_distribution_history();
        timestamps.push(now);
        self.distribution_timestamps.set(timestamps);
        self.last_distribution.set(now);

        self.env().emit_event(DistributeYield {
            token,
            total_amount: amount,
            treasury_amount: split.treasury_amount,
            per_member: split.per_member,
            members,
        });

        true
    }

    pub fn is_distribution_available(&self) -> bool {
        self.env().get_block_time() >= self.get_next_distribution_time()
    }

    pub fn get_next_distribution_time(&self) -> u64 {
        self.get_last_distribution()
            .saturating_add(self.get_distribution_period())
    }

    // ========== Membership (Admin Only) ==========

    /// Add a member, or re-activate a removed one in its original position
    pub fn add_member(&mut self, member: Address) {
        self.require_distributor_admin();

        let existing = self.members.get(&member);
        if let Some(record) = &existing {
            if record.active {
                self.env().revert(DistributorError::MemberAlreadyExists);
            }
        }

        self.members.set(
            &member,
            Member {
                address: member,
                active: true,
                joined_at: self.env().get_block_time(),
            },
        );
        if existing.is_none() {
            let mut list = self.member_list.get().unwrap_or_default();
            list.push(member);
            self.member_list.set(list);
        }

        self.env().emit_event(AddMember { member });
    }

    /// Deactivate a member. The record is kept.
    pub fn remove_member(&mut self, member: Address) {
        self.require_distributor_admin();

        let mut record = match self.members.get(&member) {
            Some(record) if record.active => record,
            _ => self.env().revert(DistributorError::MemberDoesNotExist),
        };
        record.active = false;
        self.members.set(&member, record);

        self.env().emit_event(RemoveMember { member });
    }

    /// Active members in insertion order
    pub fn list_members(&self) -> Vec<Address> {
        self.member_list
            .get()
            .unwrap_or_default()
            .into_iter()
            .filter(|address| {
                self.members
                    .get(address)
                    .map(|member| member.active)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn get_member(&self, member: Address) -> Option<Member> {
        self.members.get(&member)
    }

    // ========== Configuration ==========

    pub fn set_treasury(&mut self, treasury: Address) {
        self.require_distributor_admin();
        self.treasury.set(treasury);

        self.env().emit_event(SetTreasury { treasury });
    }

    pub fn get_treasury(&self) -> Address {
        match self.treasury.get() {
            Some(treasury) => treasury,
            None => self.env().revert(DistributorError::InternalError),
        }
    }

    /// Set the treasury cut in basis points (at most 10000)
    pub fn set_treasury_share(&mut self, share_bps: u32) {
        self.require_distributor_admin();
        self.require_valid_share(share_bps);
        self.treasury_share_bps.set(share_bps);

        self.env().emit_event(SetTreasuryShare { share_bps });
    }

    pub fn get_treasury_share(&self) -> u32 {
        self.treasury_share_bps.get().unwrap_or(0)
    }

    pub fn set_distribution_period(&mut self, period: u64) {
        self.require_distributor_admin();
        self.require_valid_period(period);
        self.distribution_period.set(period);

        self.env().emit_event(SetDistributionPeriod { period });
    }

    pub fn get_distribution_period(&self) -> u64 {
        self.distribution_period.get().unwrap_or(0)
    }

    pub fn get_last_distribution(&self) -> u64 {
        self.last_distribution.get().unwrap_or(0)
    }

    pub fn get_distribution_config(&self) -> DistributionConfig {
        DistributionConfig {
            distribution_period: self.get_distribution_period(),
            last_distribution: self.get_last_distribution(),
            treasury: self.get_treasury(),
            treasury_share_bps: self.get_treasury_share(),
        }
    }

    // ========== History ==========

    pub fn get_distribution(&self, timestamp: u64) -> Option<Distribution> {
        self.distributions.get(&timestamp)
    }

    /// Timestamps of every distribution, oldest first
    pub fn get_distribution_history(&self) -> Vec<u64> {
        self.distribution_timestamps.get().unwrap_or_default()
    }

    pub fn get_distribution_count(&self) -> u32 {
        self.get_distribution_history().len() as u32
    }

    // ========== Admin Functions ==========

    pub fn set_yield_controller(&mut self, yield_controller: Address) {
        self.require_distributor_admin();
        self.yield_controller.set(Some(yield_controller));

        self.env().emit_event(SetYieldController { yield_controller });
    }

    pub fn get_yield_controller(&self) -> Option<Address> {
        self.yield_controller.get().flatten()
    }

    /// Move the distributor admin role (default admin only)
    pub fn set_distributor_admin(&mut self, new_admin: Address) {
        self.access_control.only_default_admin();
        self.access_control
            .replace_role_holder(String::from(DISTRIBUTOR_ADMIN_ROLE), new_admin);
    }

    pub fn get_distributor_admin(&self) -> Option<Address> {
        self.access_control.first_member(DISTRIBUTOR_ADMIN_ROLE)
    }

    pub fn set_default_admin(&mut self, new_admin: Address) {
        self.access_control.set_default_admin(new_admin);
    }

    pub fn is_default_admin(&self, account: Address) -> bool {
        self.access_control
            .has_role(String::from(DEFAULT_ADMIN_ROLE), account)
    }

    // ========== Internal Functions ==========

    fn require_valid_share(&self, share_bps: u32) {
        if share_bps > BPS_SCALE {
            self.env().revert(DistributorError::InvalidTreasuryShare);
        }
    }

    fn require_valid_period(&self, period: u64) {
        if period == 0 {
            self.env().revert(DistributorError::InvalidDistributionPeriod);
        }
    }

    fn require_yield_controller(&self) {
        if self.get_yield_controller() != Some(self.env().caller()) {
            self.env().revert(DistributorError::UnauthorizedError);
        }
    }

    fn require_distributor_admin(&self) {
        if !self.access_control.caller_has_role(DISTRIBUTOR_ADMIN_ROLE) {
            self.env().revert(DistributorError::UnauthorizedError);
        }
    }
}

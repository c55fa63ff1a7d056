//! Access Control Module
//!
//! Role bookkeeping embedded by every protocol contract as a submodule.
//!
//! - Roles are identified by name.
//! - Each role is administered by another role (its admin role); roles
//!   without an explicit admin are administered by `DEFAULT_ADMIN_ROLE`.
//! - Holders of `DEFAULT_ADMIN_ROLE` may act as admin of any role.
//! - `DEFAULT_ADMIN_ROLE` always keeps at least one member.

use odra::prelude::*;
use crate::errors::AccessControlError;
use crate::events::{RoleAdminChanged, RoleGranted, RoleRevoked};

/// Root role, admin of every role without an explicit admin
pub const DEFAULT_ADMIN_ROLE: &str = "ADMIN";

/// Access Control Module
#[odra::module(events = [RoleGranted, RoleRevoked, RoleAdminChanged])]
pub struct AccessControl {
    /// Role assignments: (role, account) -> bool
    roles: Mapping<(String, Address), bool>,
    /// Role admin mapping: role -> admin role
    role_admin: Mapping<String, String>,
    /// Current members of each role
    role_members: Mapping<String, Vec<Address>>,
}

#[odra::module]
impl AccessControl {
    /// Grant the root role to the first admin. Called once from the
    /// owning contract's constructor.
    pub fn initialize(&mut self, admin: Address) {
        if !self.get_role_members(String::from(DEFAULT_ADMIN_ROLE)).is_empty() {
            self.env().revert(AccessControlError::AlreadyInitialized);
        }
        self.set_role_internal(String::from(DEFAULT_ADMIN_ROLE), admin, true);
    }

    // ========== Role Query Functions ==========

    pub fn has_role(&self, role: String, account: Address) -> bool {
        self.roles.get(&(role, account)).unwrap_or(false)
    }

    /// Get the admin role for a given role
    pub fn get_role_admin(&self, role: String) -> String {
        self.role_admin
            .get(&role)
            .unwrap_or_else(|| String::from(DEFAULT_ADMIN_ROLE))
    }

    pub fn get_role_members(&self, role: String) -> Vec<Address> {
        self.role_members.get(&role).unwrap_or_default()
    }

    // ========== Role Management Functions ==========

    /// Grant a role to an account (requires role admin)
    pub fn grant_role(&mut self, role: String, account: Address) {
        self.require_role_admin(&role);
        self.set_role_internal(role, account, true);
    }

    /// Revoke a role from an account (requires role admin)
    pub fn revoke_role(&mut self, role: String, account: Address) {
        self.require_role_admin(&role);
        self.set_role_internal(role, account, false);
    }

    /// Renounce a role (caller gives up their own role)
    pub fn renounce_role(&mut self, role: String) {
        let caller = self.env().caller();
        self.set_role_internal(role, caller, false);
    }

    /// Change which role administers `role`
    pub fn set_role_admin(&mut self, role: String, admin_role: String) {
        self.require_role_admin(&role);

        let previous_admin_role = self.get_role_admin(role.clone());
        self.role_admin.set(&role, admin_role.clone());

        self.env().emit_event(RoleAdminChanged {
            role,
            previous_admin_role,
            new_admin_role: admin_role,
        });
    }

    /// Hand the root role from the caller to `new_admin`
    pub fn set_default_admin(&mut self, new_admin: Address) {
        let caller = self.env().caller();
        self.check_role(String::from(DEFAULT_ADMIN_ROLE), caller);

        if new_admin == caller {
            return;
        }

        self.set_role_internal(String::from(DEFAULT_ADMIN_ROLE), new_admin, true);
        self.set_role_internal(String::from(DEFAULT_ADMIN_ROLE), caller, false);
    }

    /// Replace every holder of `role` with `new_holder`. Used by contracts
    /// whose role has a single holder (component admin, yield controller).
    pub fn replace_role_holder(&mut self, role: String, new_holder: Address) {
        self.require_role_admin(&role);

        self.set_role_internal(role.clone(), new_holder, true);
        for member in self.get_role_members(role.clone()) {
            if member != new_holder {
                self.set_role_internal(role.clone(), member, false);
            }
        }
    }

    // ========== Modifier-like Functions (for owning contracts) ==========

    /// Revert if `account` doesn't hold `role`
    pub fn check_role(&self, role: String, account: Address) {
        if !self.has_role(role, account) {
            self.env().revert(AccessControlError::UnauthorizedRole);
        }
    }

    /// Revert if the caller doesn't hold `role`
    pub fn only_role(&self, role: String) {
        self.check_role(role, self.env().caller());
    }

    /// Revert if the caller doesn't hold the root role
    pub fn only_default_admin(&self) {
        self.only_role(String::from(DEFAULT_ADMIN_ROLE));
    }

    // ========== Internal Functions ==========

    fn require_role_admin(&self, role: &str) {
        let caller = self.env().caller();
        let admin_role = self.get_role_admin(String::from(role));

        if !self.has_role(admin_role, caller)
            && !self.has_role(String::from(DEFAULT_ADMIN_ROLE), caller)
        {
            self.env().revert(AccessControlError::OnlyRoleAdmin);
        }
    }

    fn set_role_internal(&mut self, role: String, account: Address, value: bool) {
        let had_role = self.has_role(role.clone(), account);
        if had_role == value {
            return;
        }

        let mut members = self.get_role_members(role.clone());
        if value {
            members.push(account);
        } else {
            if role == DEFAULT_ADMIN_ROLE && members.len() <= 1 {
                self.env().revert(AccessControlError::LastAdminRemoval);
            }
            members.retain(|member| *member != account);
        }

        self.roles.set(&(role.clone(), account), value);
        self.role_members.set(&role, members);

        let sender = self.env().caller();
        if value {
            self.env().emit_event(RoleGranted { role, account, sender });
        } else {
            self.env().emit_event(RoleRevoked { role, account, sender });
        }
    }
}

impl AccessControl {
    /// Grant without an admin check. Only for the owning contract's
    /// constructor, before any admin exists for `role`.
    pub(crate) fn grant_unchecked(&mut self, role: &str, account: Address) {
        self.set_role_internal(String::from(role), account, true);
    }

    pub(crate) fn first_member(&self, role: &str) -> Option<Address> {
        self.get_role_members(String::from(role)).first().copied()
    }

    pub(crate) fn caller_has_role(&self, role: &str) -> bool {
        self.has_role(String::from(role), self.env().caller())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odra::host::{Deployer, HostRef, NoArgs};

    const ROLE: &str = "DISTRIBUTOR_ADMIN";

    fn setup() -> (odra::host::HostEnv, AccessControlHostRef) {
        let env = odra_test::env();
        env.set_caller(env.get_account(0));
        let mut acl = AccessControl::deploy(&env, NoArgs);
        acl.initialize(env.get_account(0));
        (env, acl)
    }

    #[test]
    fn test_initialize_runs_once() {
        let (env, mut acl) = setup();
        assert_eq!(
            acl.try_initialize(env.get_account(1)),
            Err(AccessControlError::AlreadyInitialized.into())
        );
        assert!(!acl.has_role(String::from(DEFAULT_ADMIN_ROLE), env.get_account(1)));
    }

    #[test]
    fn test_grant_and_revoke() {
        let (env, mut acl) = setup();
        let member = env.get_account(1);

        acl.grant_role(String::from(ROLE), member);
        assert!(acl.has_role(String::from(ROLE), member));
        assert_eq!(acl.get_role_members(String::from(ROLE)), vec![member]);

        acl.revoke_role(String::from(ROLE), member);
        assert!(!acl.has_role(String::from(ROLE), member));
        assert!(acl.get_role_members(String::from(ROLE)).is_empty());
    }

    #[test]
    fn test_non_admin_cannot_grant_or_revoke() {
        let (env, mut acl) = setup();
        let member = env.get_account(1);
        acl.grant_role(String::from(ROLE), member);

        env.set_caller(env.get_account(2));
        assert_eq!(
            acl.try_grant_role(String::from(ROLE), env.get_account(2)),
            Err(AccessControlError::OnlyRoleAdmin.into())
        );
        assert_eq!(
            acl.try_revoke_role(String::from(ROLE), member),
            Err(AccessControlError::OnlyRoleAdmin.into())
        );
        assert!(acl.has_role(String::from(ROLE), member));
        assert!(!acl.has_role(String::from(ROLE), env.get_account(2)));
    }

    #[test]
    fn test_role_admin_can_manage_role() {
        let (env, mut acl) = setup();
        let manager = env.get_account(1);
        acl.grant_role(String::from("MANAGER"), manager);
        acl.set_role_admin(String::from(ROLE), String::from("MANAGER"));
        assert_eq!(acl.get_role_admin(String::from(ROLE)), "MANAGER");

        env.set_caller(manager);
        acl.grant_role(String::from(ROLE), env.get_account(2));
        assert!(acl.has_role(String::from(ROLE), env.get_account(2)));
    }

    #[test]
    fn test_default_admin_handover() {
        let (env, mut acl) = setup();
        let admin = env.get_account(0);
        let successor = env.get_account(1);

        acl.set_default_admin(successor);
        assert!(acl.has_role(String::from(DEFAULT_ADMIN_ROLE), successor));
        assert!(!acl.has_role(String::from(DEFAULT_ADMIN_ROLE), admin));

        assert_eq!(
            acl.try_set_default_admin(admin),
            Err(AccessControlError::UnauthorizedRole.into())
        );
    }

    #[test]
    fn test_last_default_admin_is_kept() {
        let (env, mut acl) = setup();
        let admin = env.get_account(0);

        assert_eq!(
            acl.try_revoke_role(String::from(DEFAULT_ADMIN_ROLE), admin),
            Err(AccessControlError::LastAdminRemoval.into())
        );
        assert_eq!(
            acl.try_renounce_role(String::from(DEFAULT_ADMIN_ROLE)),
            Err(AccessControlError::LastAdminRemoval.into())
        );
        assert!(acl.has_role(String::from(DEFAULT_ADMIN_ROLE), admin));
    }

    #[test]
    fn test_replace_role_holder() {
        let (env, mut acl) = setup();
        acl.grant_role(String::from(ROLE), env.get_account(1));
        acl.replace_role_holder(String::from(ROLE), env.get_account(2));

        assert_eq!(acl.get_role_members(String::from(ROLE)), vec![env.get_account(2)]);
    }

    #[test]
    fn test_check_role() {
        let (env, acl) = setup();
        assert_eq!(
            acl.try_check_role(String::from(ROLE), env.get_account(3)),
            Err(AccessControlError::UnauthorizedRole.into())
        );
    }
}

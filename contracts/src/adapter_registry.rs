//! Yield Adapter Registry
//!
//! Maps `(yield_type, protocol)` to an adapter address and tracks which
//! assets each adapter supports. The controller resolves adapters here on
//! every call, so swapping a lending back-end never touches controller state.

use odra::prelude::*;
use crate::access_control::{AccessControl, DEFAULT_ADMIN_ROLE};
use crate::errors::RegistryError;
use crate::events::{
    AddSupportForAsset, RegisterAdapter, RemoveAdapter, RemoveSupportForAsset, SetRegistryAdmin,
};
use crate::types::{AdapterWithAssets, YieldType};

/// Role allowed to change adapter registrations
pub const YIELD_ADAPTER_ADMIN_ROLE: &str = "YIELD_ADAPTER_ADMIN";

#[odra::module(events = [
    RegisterAdapter,
    RemoveAdapter,
    AddSupportForAsset,
    RemoveSupportForAsset,
    SetRegistryAdmin
])]
pub struct YieldAdapterRegistry {
    access_control: SubModule<AccessControl>,
    initialized: Var<bool>,
    /// (yield_type, protocol) -> adapter, `None` once removed
    adapters: Mapping<(YieldType, String), Option<Address>>,
    /// Protocols ever registered per yield type, in registration order
    protocols: Mapping<YieldType, Vec<String>>,
    /// (yield_type, protocol, asset) -> supported
    supported: Mapping<(YieldType, String, Address), bool>,
    /// Supported assets per (yield_type, protocol)
    supported_assets: Mapping<(YieldType, String), Vec<Address>>,
}

#[odra::module]
impl YieldAdapterRegistry {
    pub fn init(&mut self, owner: Address, admin: Address) {
        if self.initialized.get().unwrap_or(false) {
            self.env().revert(RegistryError::AlreadyInitializedError);
        }
        self.access_control.initialize(owner);
        self.access_control
            .grant_unchecked(YIELD_ADAPTER_ADMIN_ROLE, admin);
        self.initialized.set(true);
    }

    // ========== Adapter Registration (Admin Only) ==========

    /// Register or overwrite the adapter for a yield type and protocol.
    /// An adapter serves at most one protocol per yield type.
    pub fn register_adapter(&mut self, yield_type: YieldType, protocol: String, adapter: Address) {
        self.require_registry_admin();

        let key = (yield_type, protocol.clone());
        let mut protocols = self.get_protocols(yield_type);
        let taken = protocols.iter().any(|other| {
            *other != protocol
                && self.adapters.get(&(yield_type, other.clone())).flatten() == Some(adapter)
        });
        if taken {
            self.env().revert(RegistryError::DuplicateAdapter);
        }
        if !protocols.contains(&protocol) {
            protocols.push(protocol.clone());
            self.protocols.set(&yield_type, protocols);
        }
        self.adapters.set(&key, Some(adapter));

        self.env().emit_event(RegisterAdapter {
            yield_type,
            protocol,
            adapter,
        });
    }

    /// Remove a registration. Removing an absent key is a no-op.
    pub fn remove_adapter(&mut self, yield_type: YieldType, protocol: String) {
        self.require_registry_admin();

        let key = (yield_type, protocol.clone());
        if self.adapters.get(&key).flatten().is_none() {
            return;
        }
        self.adapters.set(&key, None);

        self.env().emit_event(RemoveAdapter { yield_type, protocol });
    }

    pub fn add_support_for_asset(&mut self, yield_type: YieldType, protocol: String, asset: Address) {
        self.require_registry_admin();

        if self.is_supported_asset(yield_type, protocol.clone(), asset) {
            return;
        }

        let list_key = (yield_type, protocol.clone());
        let mut assets = self.get_supported_assets(yield_type, protocol.clone());
        assets.push(asset);
        self.supported_assets.set(&list_key, assets);
        self.supported.set(&(yield_type, protocol.clone(), asset), true);

        self.env().emit_event(AddSupportForAsset {
            yield_type,
            protocol,
            asset,
        });
    }

    pub fn remove_support_for_asset(&mut self, yield_type: YieldType, protocol: String, asset: Address) {
        self.require_registry_admin();

        if !self.is_supported_asset(yield_type, protocol.clone(), asset) {
            return;
        }

        let list_key = (yield_type, protocol.clone());
        let mut assets = self.get_supported_assets(yield_type, protocol.clone());
        assets.retain(|a| *a != asset);
        self.supported_assets.set(&list_key, assets);
        self.supported.set(&(yield_type, protocol.clone(), asset), false);

        self.env().emit_event(RemoveSupportForAsset {
            yield_type,
            protocol,
            asset,
        });
    }

    // ========== Lookups ==========

    /// Adapter registered for the pair. Reverts when absent.
    pub fn get_adapter(&self, yield_type: YieldType, protocol: String) -> Address {
        match self.adapters.get(&(yield_type, protocol)).flatten() {
            Some(adapter) => adapter,
            None => self.env().revert(RegistryError::InvalidYieldAdapter),
        }
    }

    pub fn is_supported_asset(&self, yield_type: YieldType, protocol: String, asset: Address) -> bool {
        self.supported
            .get(&(yield_type, protocol, asset))
            .unwrap_or(false)
    }

    pub fn get_supported_assets(&self, yield_type: YieldType, protocol: String) -> Vec<Address> {
        self.supported_assets
            .get(&(yield_type, protocol))
            .unwrap_or_default()
    }

    /// Every currently registered adapter for a yield type
    pub fn get_adapters(&self, yield_type: YieldType) -> Vec<Address> {
        self.get_protocols(yield_type)
            .into_iter()
            .filter_map(|protocol| self.adapters.get(&(yield_type, protocol)).flatten())
            .collect()
    }

    /// Every currently registered adapter for a yield type with its assets
    pub fn get_adapters_with_assets(&self, yield_type: YieldType) -> Vec<AdapterWithAssets> {
        let mut result = Vec::new();
        for protocol in self.get_protocols(yield_type) {
            if let Some(adapter) = self.adapters.get(&(yield_type, protocol.clone())).flatten() {
                let assets = self.get_supported_assets(yield_type, protocol.clone());
                result.push(AdapterWithAssets {
                    protocol,
                    adapter,
                    assets,
                });
            }
        }
        result
    }

    pub fn get_protocols(&self, yield_type: YieldType) -> Vec<String> {
        self.protocols.get(&yield_type).unwrap_or_default()
    }

    // ========== Admin Functions ==========

    /// Move the registry admin role to `new_admin` (default admin only)
    pub fn set_yield_adapter_admin(&mut self, new_admin: Address) {
        self.access_control.only_default_admin();
        self.access_control
            .replace_role_holder(String::from(YIELD_ADAPTER_ADMIN_ROLE), new_admin);

        self.env().emit_event(SetRegistryAdmin { new_admin });
    }

    pub fn get_yield_adapter_admin(&self) -> Option<Address> {
        self.access_control.first_member(YIELD_ADAPTER_ADMIN_ROLE)
    }

    pub fn set_default_admin(&mut self, new_admin: Address) {
        self.access_control.set_default_admin(new_admin);
    }

    pub fn is_default_admin(&self, account: Address) -> bool {
        self.access_control
            .has_role(String::from(DEFAULT_ADMIN_ROLE), account)
    }

    // ========== Internal Functions ==========

    fn require_registry_admin(&self) {
        if !self.access_control.caller_has_role(YIELD_ADAPTER_ADMIN_ROLE) {
            self.env().revert(RegistryError::UnauthorizedError);
        }
    }
}

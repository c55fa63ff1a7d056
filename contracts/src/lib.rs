//! Coopstable Contracts
//!
//! Casper-native yield protocol: collateral supplied to lending markets
//! is matched 1:1 with cUSD, and the yield it earns is split between a
//! treasury and a set of members.
//!
//! ## Architecture
//!
//! - **LendingYieldController**: User entry point; deposit/withdraw, claim yield
//! - **YieldAdapterRegistry**: `(yield type, protocol)` -> adapter, supported assets
//! - **BlendCapitalAdapter**: Lending adapter over a Blend pool (`"BC_LA"`)
//! - **BlendPoolMock**: Blend lending pool stand-in with b-token accounting
//! - **CusdManager**: Issues and burns cUSD for the controller
//! - **CusdToken**: CEP-18 cUSD ledger
//! - **YieldDistributor**: Periodic treasury/member split of claimed yield
//! - **AccessControl**: Role submodule embedded by every contract
//!
//! ## Call Flow
//!
//! Controller -> Registry -> Adapter -> Pool, then Controller -> Manager -> Token.
//! Claimed yield goes Controller -> Manager (issue to distributor) -> Distributor.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod events;
pub mod interfaces;
pub mod math;

// Contract modules
pub mod access_control;
pub mod adapter_registry;
pub mod blend_adapter;
pub mod blend_pool;
pub mod cusd_manager;
pub mod cusd_token;
pub mod yield_controller;
pub mod yield_distributor;

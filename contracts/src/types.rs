//! Common types used across the yield protocol.

use odra::prelude::*;
use odra::casper_types::U256;

/// Decimals of cUSD and of every amount flowing through the protocol
pub const CUSD_DECIMALS: u8 = 7;

/// Largest amount accepted anywhere in the protocol (signed 128-bit range)
pub const MAX_AMOUNT: u128 = i128::MAX as u128;

/// Basis points scale (100% = 10000 bps)
pub const BPS_SCALE: u32 = 10_000;

/// Protocol id of the Blend Capital lending adapter
pub const BLEND_CAPITAL_ID: &str = "BC_LA";

/// Category of yield-bearing activity, namespaces adapter registrations
#[odra::odra_type]
#[derive(Copy, PartialOrd, Ord)]
pub enum YieldType {
    /// Collateral supplied to lending markets
    Lending,
    /// Liquidity provision
    Liquidity,
}

impl YieldType {
    pub const fn id(&self) -> &'static str {
        match self {
            YieldType::Lending => "LEND",
            YieldType::Liquidity => "LIQUID",
        }
    }
}

/// Concrete adapter implementations known to the protocol.
///
/// Entry points take the protocol id string; this enum is the typed
/// view used by host code and the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportedAdapter {
    BlendCapital,
    Custom(String),
}

impl SupportedAdapter {
    pub fn id(&self) -> String {
        match self {
            SupportedAdapter::BlendCapital => String::from(BLEND_CAPITAL_ID),
            SupportedAdapter::Custom(id) => id.clone(),
        }
    }

    pub fn from_id(id: &str) -> Self {
        if id == BLEND_CAPITAL_ID {
            SupportedAdapter::BlendCapital
        } else {
            SupportedAdapter::Custom(String::from(id))
        }
    }
}

/// An adapter together with the assets it is registered to support
#[odra::odra_type]
pub struct AdapterWithAssets {
    /// Protocol id the adapter is registered under
    pub protocol: String,
    /// Adapter contract address
    pub adapter: Address,
    /// Assets flagged as supported
    pub assets: Vec<Address>,
}

/// Distributor member record
#[odra::odra_type]
pub struct Member {
    pub address: Address,
    pub active: bool,
    pub joined_at: u64,
}

/// Historical distribution record, never mutated once written
#[odra::odra_type]
pub struct Distribution {
    pub timestamp: u64,
    pub total_amount: U256,
    pub treasury_amount: U256,
    pub member_amount: U256,
    pub member_count: u32,
}

/// Distributor configuration snapshot
#[odra::odra_type]
pub struct DistributionConfig {
    pub distribution_period: u64,
    pub last_distribution: u64,
    pub treasury: Address,
    pub treasury_share_bps: u32,
}

/// Lending reserve as seen by the pool
#[odra::odra_type]
pub struct Reserve {
    /// Underlying asset
    pub asset: Address,
    /// Position in the pool reserve list
    pub index: u32,
    /// Underlying per b-token, scaled by `B_RATE_SCALE`
    pub b_rate: U256,
    /// Total b-tokens issued
    pub b_supply: U256,
    /// Underlying available for withdrawal
    pub liquidity: U256,
    /// Supply APR in basis points
    pub apr_bps: u32,
}

/// Returns true when `amount` is inside the accepted `1..=MAX_AMOUNT` range
pub fn is_valid_amount(amount: U256) -> bool {
    !amount.is_zero() && amount <= U256::from(MAX_AMOUNT)
}

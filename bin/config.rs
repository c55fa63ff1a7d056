//! Deployment parameters read from the environment (.env).

use std::env;

use odra::prelude::Address;
use thiserror::Error;

pub const DEFAULT_PAYMENT_AMOUNT: u64 = 200_000_000_000;
pub const DEFAULT_TREASURY_SHARE_BPS: u32 = 1000;
/// One day in block-time milliseconds
pub const DEFAULT_DISTRIBUTION_PERIOD: u64 = 86_400_000;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("{0} is not a valid address: {1}")]
    InvalidAddress(&'static str, String),

    #[error("{0} is not a valid number: {1}")]
    InvalidNumber(&'static str, String),

    #[error("{0} must be at most 10000 bps, got {1}")]
    ShareOutOfRange(&'static str, u32),

    #[error("failed to write deployment record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode deployment record: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub payment_amount: u64,
    /// Falls back to the deployer when unset
    pub treasury: Option<Address>,
    pub treasury_share_bps: u32,
    pub distribution_period: u64,
    /// Existing Blend pool; a pool stand-in is deployed when unset
    pub blend_pool: Option<Address>,
    /// Token the pool stand-in pays emissions in; a stand-in token is
    /// deployed when unset
    pub emission_token: Option<Address>,
    pub collateral_assets: Vec<Address>,
}

impl DeployConfig {
    pub fn from_env() -> Result<Self, DeployError> {
        let treasury_share_bps = parse_number(
            "COOPSTABLE_TREASURY_SHARE_BPS",
            DEFAULT_TREASURY_SHARE_BPS,
        )?;
        if treasury_share_bps > 10_000 {
            return Err(DeployError::ShareOutOfRange(
                "COOPSTABLE_TREASURY_SHARE_BPS",
                treasury_share_bps,
            ));
        }

        Ok(Self {
            payment_amount: parse_number("ODRA_CASPER_LIVENET_PAYMENT_AMOUNT", DEFAULT_PAYMENT_AMOUNT)?,
            treasury: parse_address("COOPSTABLE_TREASURY")?,
            treasury_share_bps,
            distribution_period: parse_number(
                "COOPSTABLE_DISTRIBUTION_PERIOD",
                DEFAULT_DISTRIBUTION_PERIOD,
            )?,
            blend_pool: parse_address("COOPSTABLE_BLEND_POOL")?,
            emission_token: parse_address("COOPSTABLE_EMISSION_TOKEN")?,
            collateral_assets: parse_address_list("COOPSTABLE_COLLATERAL_ASSETS")?,
        })
    }
}

fn read(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, DeployError> {
    match read(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| DeployError::InvalidNumber(name, raw)),
        None => Ok(default),
    }
}

fn parse_address(name: &'static str) -> Result<Option<Address>, DeployError> {
    read(name).map(|raw| to_address(name, &raw)).transpose()
}

fn parse_address_list(name: &'static str) -> Result<Vec<Address>, DeployError> {
    match read(name) {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| to_address(name, item))
            .collect(),
        None => Ok(Vec::new()),
    }
}

fn to_address(name: &'static str, raw: &str) -> Result<Address, DeployError> {
    raw.parse::<Address>()
        .map_err(|_| DeployError::InvalidAddress(name, raw.to_string()))
}

//! Protocol error definitions.
//!
//! Each component surfaces its own error domain. Codes are part of the
//! external interface and must not be renumbered.

use odra::prelude::*;

macro_rules! impl_user_error {
    ($name:ident) => {
        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.message())
            }
        }

        impl From<$name> for OdraError {
            fn from(error: $name) -> Self {
                #[cfg(target_arch = "wasm32")]
                {
                    OdraError::user(error as u16)
                }

                #[cfg(not(target_arch = "wasm32"))]
                {
                    OdraError::user(error as u16, error.message())
                }
            }
        }
    };
}

/// Yield adapter errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AdapterError {
    InsufficientBalance = 1,
    LendingOperationFailed = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    AlreadyInitializedError = 5,
}

impl AdapterError {
    pub const fn message(&self) -> &'static str {
        match self {
            AdapterError::InsufficientBalance => "Adapter: insufficient balance",
            AdapterError::LendingOperationFailed => "Adapter: lending operation failed",
            AdapterError::Unauthorized => "Adapter: unauthorized caller",
            AdapterError::InvalidAmount => "Adapter: amount must be positive",
            AdapterError::AlreadyInitializedError => "Adapter: already initialized",
        }
    }
}

impl_user_error!(AdapterError);

/// cUSD manager and cUSD token errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ManagerError {
    InternalError = 1,
    AlreadyInitializedError = 3,
    UnauthorizedError = 4,
    NegativeAmountError = 8,
    BalanceError = 10,
    OverflowError = 12,
}

impl ManagerError {
    pub const fn message(&self) -> &'static str {
        match self {
            ManagerError::InternalError => "cUSD: internal error",
            ManagerError::AlreadyInitializedError => "cUSD: already initialized",
            ManagerError::UnauthorizedError => "cUSD: unauthorized caller",
            ManagerError::NegativeAmountError => "cUSD: amount must be positive",
            ManagerError::BalanceError => "cUSD: insufficient balance",
            ManagerError::OverflowError => "cUSD: supply overflow",
        }
    }
}

impl_user_error!(ManagerError);

/// Role bookkeeping errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AccessControlError {
    OnlyRoleAdmin = 1300,
    UnauthorizedRole = 1301,
    LastAdminRemoval = 1302,
    AlreadyInitialized = 1303,
}

impl AccessControlError {
    pub const fn message(&self) -> &'static str {
        match self {
            AccessControlError::OnlyRoleAdmin => "Access control: caller is not the role admin",
            AccessControlError::UnauthorizedRole => "Access control: account is missing role",
            AccessControlError::LastAdminRemoval => "Access control: cannot remove the last default admin",
            AccessControlError::AlreadyInitialized => "Access control: root role already granted",
        }
    }
}

impl_user_error!(AccessControlError);

/// Adapter registry errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RegistryError {
    AlreadyInitializedError = 3,
    UnauthorizedError = 4,
    InvalidYieldAdapter = 1100,
    DuplicateAdapter = 1101,
}

impl RegistryError {
    pub const fn message(&self) -> &'static str {
        match self {
            RegistryError::AlreadyInitializedError => "Registry: already initialized",
            RegistryError::UnauthorizedError => "Registry: unauthorized caller",
            RegistryError::InvalidYieldAdapter => "Registry: no adapter registered for yield type and protocol",
            RegistryError::DuplicateAdapter => "Registry: adapter already registered under another protocol",
        }
    }
}

impl_user_error!(RegistryError);

/// Yield distributor errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DistributorError {
    InternalError = 1,
    AlreadyInitializedError = 3,
    UnauthorizedError = 4,
    NegativeAmountError = 8,
    BalanceError = 10,
    MemberAlreadyExists = 1200,
    MemberDoesNotExist = 1201,
    InvalidTreasuryShare = 1202,
    InvalidDistributionPeriod = 1203,
}

impl DistributorError {
    pub const fn message(&self) -> &'static str {
        match self {
            DistributorError::InternalError => "Distributor: not initialized",
            DistributorError::AlreadyInitializedError => "Distributor: already initialized",
            DistributorError::UnauthorizedError => "Distributor: unauthorized caller",
            DistributorError::NegativeAmountError => "Distributor: amount must be positive",
            DistributorError::BalanceError => "Distributor: insufficient token balance",
            DistributorError::MemberAlreadyExists => "Distributor: member already exists",
            DistributorError::MemberDoesNotExist => "Distributor: member does not exist",
            DistributorError::InvalidTreasuryShare => "Distributor: treasury share exceeds 10000 bps",
            DistributorError::InvalidDistributionPeriod => "Distributor: distribution period must be positive",
        }
    }
}

impl_user_error!(DistributorError);

/// Lending yield controller errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ControllerError {
    InternalError = 1,
    AlreadyInitializedError = 3,
    UnauthorizedError = 4,
    NegativeAmountError = 8,
    UnsupportedAsset = 1400,
    YieldUnavailable = 1401,
    CollateralShortfall = 1402,
}

impl ControllerError {
    pub const fn message(&self) -> &'static str {
        match self {
            ControllerError::InternalError => "Controller: internal error",
            ControllerError::AlreadyInitializedError => "Controller: already initialized",
            ControllerError::UnauthorizedError => "Controller: unauthorized caller",
            ControllerError::NegativeAmountError => "Controller: amount must be positive",
            ControllerError::UnsupportedAsset => "Controller: asset not supported by adapter",
            ControllerError::YieldUnavailable => "Controller: no yield to claim or distribute",
            ControllerError::CollateralShortfall => "Controller: cUSD supply would exceed collateral",
        }
    }
}

impl_user_error!(ControllerError);

/// Lending pool stand-in errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PoolError {
    ReserveNotFound = 1500,
    InsufficientLiquidity = 1501,
    InsufficientPosition = 1502,
    Unauthorized = 1503,
    InvalidRate = 1504,
    AlreadyInitialized = 1505,
}

impl PoolError {
    pub const fn message(&self) -> &'static str {
        match self {
            PoolError::ReserveNotFound => "Pool: reserve not found",
            PoolError::InsufficientLiquidity => "Pool: insufficient liquidity",
            PoolError::InsufficientPosition => "Pool: insufficient position",
            PoolError::Unauthorized => "Pool: unauthorized caller",
            PoolError::InvalidRate => "Pool: b_rate cannot decrease",
            PoolError::AlreadyInitialized => "Pool: already initialized",
        }
    }
}

impl_user_error!(PoolError);

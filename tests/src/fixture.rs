//! Full protocol deployment shared by the integration scenarios.

use odra::casper_types::U256;
use odra::host::{Deployer, HostEnv, HostRef};
use odra::prelude::*;

use coopstable_contracts::adapter_registry::{
    YieldAdapterRegistry, YieldAdapterRegistryHostRef, YieldAdapterRegistryInitArgs,
};
use coopstable_contracts::blend_adapter::{
    BlendCapitalAdapter, BlendCapitalAdapterHostRef, BlendCapitalAdapterInitArgs,
};
use coopstable_contracts::blend_pool::{BlendPoolMock, BlendPoolMockHostRef, BlendPoolMockInitArgs};
use coopstable_contracts::cusd_manager::{CusdManager, CusdManagerHostRef, CusdManagerInitArgs};
use coopstable_contracts::cusd_token::{CusdToken, CusdTokenHostRef, CusdTokenInitArgs};
use coopstable_contracts::math::B_RATE_SCALE;
use coopstable_contracts::types::{YieldType, BLEND_CAPITAL_ID};
use coopstable_contracts::yield_controller::{
    LendingYieldController, LendingYieldControllerHostRef, LendingYieldControllerInitArgs,
};
use coopstable_contracts::yield_distributor::{
    YieldDistributor, YieldDistributorHostRef, YieldDistributorInitArgs,
};

pub const PERIOD: u64 = 86_400;
pub const TREASURY_SHARE_BPS: u32 = 1000;
/// Tokens the owner holds to pay interest into the pool
const INTEREST_FLOAT: u128 = 1_000_000;

/// `v` whole units at 7 decimals
pub fn units(v: u128) -> U256 {
    U256::from(v * 10_000_000)
}

pub fn blend() -> String {
    String::from(BLEND_CAPITAL_ID)
}

pub struct Protocol {
    pub env: HostEnv,
    pub pool: BlendPoolMockHostRef,
    pub registry: YieldAdapterRegistryHostRef,
    pub token: CusdTokenHostRef,
    pub manager: CusdManagerHostRef,
    pub distributor: YieldDistributorHostRef,
    pub controller: LendingYieldControllerHostRef,
    pub adapter: BlendCapitalAdapterHostRef,
    /// Collateral token, listed and supported
    pub asset_token: CusdTokenHostRef,
    /// Token the pool pays emissions in
    pub blnd: CusdTokenHostRef,
    pub owner: Address,
    pub admin: Address,
    pub treasury: Address,
    pub asset: Address,
}

impl Protocol {
    /// Deploy and wire every contract; `asset` is listed and supported for
    /// `(Lending, "BC_LA")`. The owner issues the collateral token and funds
    /// the pool's interest.
    pub fn deploy() -> Self {
        let env = odra_test::env();
        let owner = env.get_account(0);
        let admin = env.get_account(1);
        let treasury = env.get_account(2);

        env.set_caller(owner);
        let mut asset_token = CusdToken::deploy(&env, CusdTokenInitArgs { issuer: owner });
        let blnd = CusdToken::deploy(&env, CusdTokenInitArgs { issuer: owner });
        let asset = asset_token.address();

        let mut pool = BlendPoolMock::deploy(
            &env,
            BlendPoolMockInitArgs {
                admin: owner,
                emission_token: blnd.address(),
            },
        );
        pool.add_reserve(asset, 450);
        asset_token.mint(owner, units(INTEREST_FLOAT));
        asset_token.approve(pool.address(), units(INTEREST_FLOAT));

        let mut registry = YieldAdapterRegistry::deploy(
            &env,
            YieldAdapterRegistryInitArgs { owner, admin },
        );
        let mut token = CusdToken::deploy(&env, CusdTokenInitArgs { issuer: owner });
        let mut manager = CusdManager::deploy(
            &env,
            CusdManagerInitArgs {
                cusd_id: token.address(),
                owner,
                admin,
            },
        );
        token.set_issuer(manager.address());

        let mut distributor = YieldDistributor::deploy(
            &env,
            YieldDistributorInitArgs {
                treasury,
                treasury_share_bps: TREASURY_SHARE_BPS,
                distribution_period: PERIOD,
                owner,
                admin,
            },
        );
        let controller = LendingYieldController::deploy(
            &env,
            LendingYieldControllerInitArgs {
                adapter_registry: registry.address(),
                cusd_manager: manager.address(),
                yield_distributor: distributor.address(),
                owner,
                admin,
            },
        );
        let adapter = BlendCapitalAdapter::deploy(
            &env,
            BlendCapitalAdapterInitArgs {
                yield_controller: controller.address(),
                lending_pool: pool.address(),
                admin: owner,
            },
        );

        env.set_caller(admin);
        manager.set_yield_controller(controller.address());
        distributor.set_yield_controller(controller.address());
        registry.register_adapter(YieldType::Lending, blend(), adapter.address());
        registry.add_support_for_asset(YieldType::Lending, blend(), asset);
        env.set_caller(owner);

        Self {
            env,
            pool,
            registry,
            token,
            manager,
            distributor,
            controller,
            adapter,
            asset_token,
            blnd,
            owner,
            admin,
            treasury,
            asset,
        }
    }

    pub fn account(&self, index: usize) -> Address {
        self.env.get_account(index)
    }

    /// Mint `amount` of the collateral token to `user` and approve the
    /// controller for it
    pub fn fund(&mut self, user: Address, amount: U256) {
        self.env.set_caller(self.owner);
        self.asset_token.mint(user, amount);
        self.env.set_caller(user);
        self.asset_token.approve(self.controller.address(), amount);
    }

    pub fn deposit(&mut self, user: Address, amount: U256) {
        self.fund(user, amount);
        self.controller
            .deposit_collateral(blend(), user, self.asset, amount);
    }

    /// Move the pool exchange rate to `numerator / denominator`
    pub fn accrue(&mut self, numerator: u128, denominator: u128) {
        self.env.set_caller(self.owner);
        let rate = U256::from(B_RATE_SCALE) * U256::from(numerator) / U256::from(denominator);
        self.pool.set_b_rate(self.asset, rate);
    }

    pub fn add_members(&mut self, indices: &[usize]) -> Vec<Address> {
        self.env.set_caller(self.admin);
        let members: Vec<Address> = indices.iter().map(|i| self.env.get_account(*i)).collect();
        for member in members.iter() {
            self.distributor.add_member(*member);
        }
        members
    }

    pub fn cusd_balance(&self, account: Address) -> U256 {
        self.token.balance_of(account)
    }

    pub fn asset_balance(&self, account: Address) -> U256 {
        self.asset_token.balance_of(account)
    }
}

//! Deploy the Coopstable contracts to Casper livenet/testnet using the Odra
//! livenet environment.
//!
//! Usage:
//!   cargo run --bin deploy_livenet --release
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=200000000000
//!
//! Optional protocol parameters:
//!   COOPSTABLE_TREASURY=account-hash-...        (defaults to the deployer)
//!   COOPSTABLE_TREASURY_SHARE_BPS=1000
//!   COOPSTABLE_DISTRIBUTION_PERIOD=86400000
//!   COOPSTABLE_BLEND_POOL=hash-...              (deploys a pool stand-in when unset)
//!   COOPSTABLE_EMISSION_TOKEN=hash-...          (pool stand-in only)
//!   COOPSTABLE_COLLATERAL_ASSETS=hash-...,hash-...

mod config;

use odra::host::{Deployer, HostRef};
use odra::prelude::*;
use serde::Serialize;

use coopstable_contracts::adapter_registry::{YieldAdapterRegistry, YieldAdapterRegistryInitArgs};
use coopstable_contracts::blend_adapter::{BlendCapitalAdapter, BlendCapitalAdapterInitArgs};
use coopstable_contracts::blend_pool::{BlendPoolMock, BlendPoolMockInitArgs};
use coopstable_contracts::cusd_manager::{CusdManager, CusdManagerInitArgs};
use coopstable_contracts::cusd_token::{CusdToken, CusdTokenInitArgs};
use coopstable_contracts::types::{SupportedAdapter, YieldType};
use coopstable_contracts::yield_controller::{LendingYieldController, LendingYieldControllerInitArgs};
use coopstable_contracts::yield_distributor::{YieldDistributor, YieldDistributorInitArgs};

use config::{DeployConfig, DeployError};

const DEPLOYMENT_RECORD: &str = "deployment.json";

/// Addresses written to `deployment.json` after a successful run
#[derive(Debug, Serialize)]
struct DeploymentRecord {
    deployer: String,
    blend_pool: String,
    adapter_registry: String,
    cusd_token: String,
    cusd_manager: String,
    yield_distributor: String,
    lending_yield_controller: String,
    blend_capital_adapter: String,
    collateral_assets: Vec<String>,
}

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();

    if let Err(err) = run() {
        eprintln!("Deployment failed: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), DeployError> {
    let config = DeployConfig::from_env()?;

    println!("=== Coopstable Livenet Deployment ===");
    println!();

    let env = odra_casper_livenet_env::env();
    env.set_gas(config.payment_amount);

    let deployer = env.caller();
    let treasury = config.treasury.unwrap_or(deployer);
    println!("Deployer: {:?}", deployer);
    println!("Treasury: {:?}", treasury);
    println!(
        "Treasury share: {} bps, distribution period: {}",
        config.treasury_share_bps, config.distribution_period
    );
    println!();

    // ==================== Phase 1: Lending Market ====================
    println!("=== Phase 1: Lending Market ===");
    println!();

    let blend_pool_addr = match config.blend_pool {
        Some(pool) => {
            println!("Using Blend pool at: {:?}", pool);
            pool
        }
        None => {
            let emission_token = match config.emission_token {
                Some(token) => token,
                None => {
                    println!("Deploying emission token stand-in...");
                    let token = CusdToken::deploy(&env, CusdTokenInitArgs { issuer: deployer });
                    token.address()
                }
            };
            println!("Emission token: {:?}", emission_token);

            println!("Deploying BlendPoolMock...");
            let mut pool = BlendPoolMock::deploy(
                &env,
                BlendPoolMockInitArgs {
                    admin: deployer,
                    emission_token,
                },
            );
            for asset in config.collateral_assets.iter() {
                println!("Adding reserve for {:?}...", asset);
                pool.add_reserve(*asset, 0);
            }
            let pool_addr = pool.address();
            println!("BlendPoolMock deployed at: {:?}", pool_addr);
            pool_addr
        }
    };

    println!();

    // ==================== Phase 2: Core Contracts ====================
    println!("=== Phase 2: Core Contracts ===");
    println!();

    println!("Deploying YieldAdapterRegistry...");
    let mut registry = YieldAdapterRegistry::deploy(
        &env,
        YieldAdapterRegistryInitArgs {
            owner: deployer,
            admin: deployer,
        },
    );
    let registry_addr = registry.address();
    println!("YieldAdapterRegistry deployed at: {:?}", registry_addr);

    // The deployer mints nothing; issuance moves to the manager below
    println!("Deploying CusdToken...");
    let mut cusd_token = CusdToken::deploy(&env, CusdTokenInitArgs { issuer: deployer });
    let cusd_token_addr = cusd_token.address();
    println!("CusdToken deployed at: {:?}", cusd_token_addr);

    println!("Deploying CusdManager...");
    let mut cusd_manager = CusdManager::deploy(
        &env,
        CusdManagerInitArgs {
            cusd_id: cusd_token_addr,
            owner: deployer,
            admin: deployer,
        },
    );
    let cusd_manager_addr = cusd_manager.address();
    println!("CusdManager deployed at: {:?}", cusd_manager_addr);

    println!("Deploying YieldDistributor...");
    let mut distributor = YieldDistributor::deploy(
        &env,
        YieldDistributorInitArgs {
            treasury,
            treasury_share_bps: config.treasury_share_bps,
            distribution_period: config.distribution_period,
            owner: deployer,
            admin: deployer,
        },
    );
    let distributor_addr = distributor.address();
    println!("YieldDistributor deployed at: {:?}", distributor_addr);

    println!("Deploying LendingYieldController...");
    let controller = LendingYieldController::deploy(
        &env,
        LendingYieldControllerInitArgs {
            adapter_registry: registry_addr,
            cusd_manager: cusd_manager_addr,
            yield_distributor: distributor_addr,
            owner: deployer,
            admin: deployer,
        },
    );
    let controller_addr = controller.address();
    println!("LendingYieldController deployed at: {:?}", controller_addr);

    println!("Deploying BlendCapitalAdapter...");
    let adapter = BlendCapitalAdapter::deploy(
        &env,
        BlendCapitalAdapterInitArgs {
            yield_controller: controller_addr,
            lending_pool: blend_pool_addr,
            admin: deployer,
        },
    );
    let adapter_addr = adapter.address();
    println!("BlendCapitalAdapter deployed at: {:?}", adapter_addr);

    println!();

    // ==================== Phase 3: Wiring ====================
    println!("=== Phase 3: Cross-contract Configuration ===");
    println!();

    println!("Configuring CusdToken -> CusdManager issuer...");
    cusd_token.set_issuer(cusd_manager_addr);
    println!("Done.");

    println!("Configuring CusdManager -> LendingYieldController...");
    cusd_manager.set_yield_controller(controller_addr);
    println!("Done.");

    println!("Configuring YieldDistributor -> LendingYieldController...");
    distributor.set_yield_controller(controller_addr);
    println!("Done.");

    let protocol = SupportedAdapter::BlendCapital.id();
    println!("Registering BlendCapitalAdapter as ({}, {})...", YieldType::Lending.id(), protocol);
    registry.register_adapter(YieldType::Lending, protocol.clone(), adapter_addr);
    println!("Done.");

    for asset in config.collateral_assets.iter() {
        println!("Adding support for {:?}...", asset);
        registry.add_support_for_asset(YieldType::Lending, protocol.clone(), *asset);
    }
    if config.collateral_assets.is_empty() {
        println!("No collateral assets configured; add them with add_support_for_asset.");
    }

    println!();
    println!("=== Deployment Complete ===");
    println!();

    let record = DeploymentRecord {
        deployer: format!("{:?}", deployer),
        blend_pool: format!("{:?}", blend_pool_addr),
        adapter_registry: format!("{:?}", registry_addr),
        cusd_token: format!("{:?}", cusd_token_addr),
        cusd_manager: format!("{:?}", cusd_manager_addr),
        yield_distributor: format!("{:?}", distributor_addr),
        lending_yield_controller: format!("{:?}", controller_addr),
        blend_capital_adapter: format!("{:?}", adapter_addr),
        collateral_assets: config
            .collateral_assets
            .iter()
            .map(|asset| format!("{:?}", asset))
            .collect(),
    };

    println!("Contract Addresses:");
    println!("  BlendPool:               {}", record.blend_pool);
    println!("  YieldAdapterRegistry:    {}", record.adapter_registry);
    println!("  CusdToken:               {}", record.cusd_token);
    println!("  CusdManager:             {}", record.cusd_manager);
    println!("  YieldDistributor:        {}", record.yield_distributor);
    println!("  LendingYieldController:  {}", record.lending_yield_controller);
    println!("  BlendCapitalAdapter:     {}", record.blend_capital_adapter);

    std::fs::write(DEPLOYMENT_RECORD, serde_json::to_string_pretty(&record)?)?;
    println!();
    println!("Addresses written to {}", DEPLOYMENT_RECORD);

    Ok(())
}

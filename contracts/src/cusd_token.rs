//! cUSD Token Contract
//!
//! CEP-18 compatible ledger for the protocol's synthetic unit.
//! A single issuer (the cUSD manager) mints and burns; everyone else can
//! only move balances they own or are approved for.
//!
//! Every balance, allowance and supply write is mirrored into the CEP-18
//! named keys and dictionaries so wallets and explorers can read cUSD
//! without calling the contract.

use odra::prelude::*;
use odra::casper_types::{U256, Key};
use odra::casper_types::bytesrepr::ToBytes;
use crate::errors::ManagerError;
use crate::types::CUSD_DECIMALS;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

const TOKEN_NAME: &str = "cUSD";
const TOKEN_SYMBOL: &str = "cUSD";

/// CEP-18 storage layout
mod cep18 {
    pub const NAME: &str = "name";
    pub const SYMBOL: &str = "symbol";
    pub const DECIMALS: &str = "decimals";
    pub const TOTAL_SUPPLY: &str = "total_supply";
    pub const BALANCES: &str = "balances";
    pub const ALLOWANCES: &str = "allowances";
}

#[odra::module]
pub struct CusdToken {
    supply: Var<U256>,
    ledger: Mapping<Address, U256>,
    /// (owner, spender) -> remaining allowance
    approvals: Mapping<(Address, Address), U256>,
    /// Only account allowed to mint and burn
    issuer: Var<Address>,
}

#[odra::module]
impl CusdToken {
    pub fn init(&mut self, issuer: Address) {
        self.issuer.set(issuer);

        let env = self.env();
        env.init_dictionary(cep18::BALANCES);
        env.init_dictionary(cep18::ALLOWANCES);
        env.set_named_value(cep18::NAME, String::from(TOKEN_NAME));
        env.set_named_value(cep18::SYMBOL, String::from(TOKEN_SYMBOL));
        env.set_named_value(cep18::DECIMALS, CUSD_DECIMALS);
        self.write_supply(U256::zero());
    }

    // ========== CEP-18 ==========

    pub fn name(&self) -> String {
        String::from(TOKEN_NAME)
    }

    pub fn symbol(&self) -> String {
        String::from(TOKEN_SYMBOL)
    }

    pub fn decimals(&self) -> u8 {
        CUSD_DECIMALS
    }

    pub fn total_supply(&self) -> U256 {
        self.supply.get().unwrap_or_default()
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.ledger.get(&account).unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.approvals.get(&(owner, spender)).unwrap_or_default()
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.move_balance(caller, recipient, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.write_allowance(caller, spender, amount);
        true
    }

    /// Spend `amount` of `owner`'s allowance to the caller
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        let remaining = match self.allowance(owner, caller).checked_sub(amount) {
            Some(remaining) => remaining,
            None => self.env().revert(ManagerError::BalanceError),
        };

        self.move_balance(owner, recipient, amount);
        self.write_allowance(owner, caller, remaining);
        true
    }

    // ========== Issuance ==========

    pub fn mint(&mut self, to: Address, amount: U256) {
        self.require_issuer();

        let supply = match self.total_supply().checked_add(amount) {
            Some(supply) => supply,
            None => self.env().revert(ManagerError::OverflowError),
        };
        self.credit(to, amount);
        self.write_supply(supply);
    }

    pub fn burn_from(&mut self, from: Address, amount: U256) {
        self.require_issuer();

        self.debit(from, amount);
        self.write_supply(self.total_supply() - amount);
    }

    /// Hand minting rights to a new issuer (current issuer only)
    pub fn set_issuer(&mut self, new_issuer: Address) {
        self.require_issuer();
        self.issuer.set(new_issuer);
    }

    pub fn get_issuer(&self) -> Option<Address> {
        self.issuer.get()
    }

    // ========== Ledger ==========

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) {
        self.debit(from, amount);
        self.credit(to, amount);
    }

    fn debit(&mut self, account: Address, amount: U256) {
        match self.balance_of(account).checked_sub(amount) {
            Some(balance) => self.write_balance(account, balance),
            None => self.env().revert(ManagerError::BalanceError),
        }
    }

    fn credit(&mut self, account: Address, amount: U256) {
        let balance = self.balance_of(account) + amount;
        self.write_balance(account, balance);
    }

    fn write_balance(&mut self, account: Address, balance: U256) {
        self.ledger.set(&account, balance);
        let item = dictionary_item(&[account]);
        self.env()
            .set_dictionary_value(cep18::BALANCES, item.as_bytes(), balance);
    }

    fn write_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        self.approvals.set(&(owner, spender), amount);
        let item = dictionary_item(&[owner, spender]);
        self.env()
            .set_dictionary_value(cep18::ALLOWANCES, item.as_bytes(), amount);
    }

    fn write_supply(&mut self, supply: U256) {
        self.supply.set(supply);
        self.env().set_named_value(cep18::TOTAL_SUPPLY, supply);
    }

    fn require_issuer(&self) {
        if self.issuer.get() != Some(self.env().caller()) {
            self.env().revert(ManagerError::UnauthorizedError);
        }
    }
}

/// CEP-18 dictionary item key: base64 of the serialized `Key`s, concatenated
fn dictionary_item(parts: &[Address]) -> String {
    let bytes: Vec<u8> = parts
        .iter()
        .flat_map(|address| Key::from(*address).to_bytes().unwrap_or_default())
        .collect();
    BASE64_STANDARD.encode(bytes)
}

use soroban_sdk::{contracttype, Address, Env, Vec};

use dragon_lib::Dragon;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    OperatorManager,
    MaxLevel,
    /// Xp required to pass this level (valid for 1..max_level).
    XpToLevelUp(u32),
    TotalSupply,
    Dragon(u64),
    OwnedTokens(Address),
}

/* ---------------- CONFIG ---------------- */

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_operator_manager(env: &Env, manager: &Address) {
    env.storage().instance().set(&DataKey::OperatorManager, manager);
}

pub fn get_operator_manager(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::OperatorManager)
}

pub fn set_max_level(env: &Env, max_level: u32) {
    env.storage().instance().set(&DataKey::MaxLevel, &max_level);
}

pub fn get_max_level(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::MaxLevel).unwrap_or(0)
}

pub fn set_xp_threshold(env: &Env, level: u32, xp: u64) {
    env.storage().instance().set(&DataKey::XpToLevelUp(level), &xp);
}

pub fn get_xp_threshold(env: &Env, level: u32) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::XpToLevelUp(level))
        .unwrap_or(0)
}

/* ---------------- TOKENS ---------------- */

pub fn get_total_supply(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::TotalSupply).unwrap_or(0)
}

pub fn set_total_supply(env: &Env, supply: u64) {
    env.storage().instance().set(&DataKey::TotalSupply, &supply);
}

pub fn get_dragon(env: &Env, token_id: u64) -> Option<Dragon> {
    env.storage().instance().get(&DataKey::Dragon(token_id))
}

pub fn set_dragon(env: &Env, token_id: u64, dragon: &Dragon) {
    env.storage().instance().set(&DataKey::Dragon(token_id), dragon);
}

/* ---------------- OWNER INDEX ---------------- */

pub fn get_owned_tokens(env: &Env, owner: &Address) -> Vec<u64> {
    env.storage()
        .instance()
        .get(&DataKey::OwnedTokens(owner.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn owned_tokens_append(env: &Env, owner: &Address, token_id: u64) {
    let mut tokens = get_owned_tokens(env, owner);
    tokens.push_back(token_id);
    env.storage()
        .instance()
        .set(&DataKey::OwnedTokens(owner.clone()), &tokens);
}

pub fn owned_tokens_remove(env: &Env, owner: &Address, token_id: u64) {
    let mut tokens = get_owned_tokens(env, owner);
    if let Some(index) = tokens.first_index_of(token_id) {
        tokens.remove(index);
        env.storage()
            .instance()
            .set(&DataKey::OwnedTokens(owner.clone()), &tokens);
    }
}

#![cfg_attr(not(test), no_std)]

pub mod attributes;
mod storage;

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, symbol_short, Address, Env, Symbol,
    Vec,
};

use dragon_lib::{
    Dragon, DIRECT_MINT_RARITY_CEILING, NUM_RANDOM_WORDS, RARITY_BASED_DAMAGE,
    RARITY_BASED_EXPERIENCE, RARITY_TIERS, SPECIES_COUNT_PER_RARITY,
};
use operator_manager::OperatorManagerClient;
use storage::*;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotOperator = 3,
    NotTokenOwner = 4,
    InvalidLevel = 5,
    InvalidXpTable = 6,
    DragonNotFound = 7,
    BadWordCount = 8,
    Overflow = 9,
    NotAdmin = 10,
}

#[contract]
pub struct DragonNFT;

#[contractimpl]
impl DragonNFT {
    /// One-time setup. `xp_to_level_up` holds the xp needed to pass each
    /// level from 1 to `max_level - 1`.
    pub fn initialize(
        env: Env,
        admin: Address,
        operator_manager: Address,
        max_level: u32,
        xp_to_level_up: Vec<u64>,
    ) {
        if get_admin(&env).is_some() {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        if max_level < 2 || xp_to_level_up.len() != max_level - 1 {
            panic_with_error!(&env, Error::InvalidXpTable);
        }

        admin.require_auth();
        set_admin(&env, &admin);
        set_operator_manager(&env, &operator_manager);
        set_max_level(&env, max_level);
        set_total_supply(&env, 0);

        for (i, xp) in xp_to_level_up.iter().enumerate() {
            set_xp_threshold(&env, i as u32 + 1, xp);
        }

        env.events().publish((symbol_short!("init"),), admin);
    }

    /// Caller must hold the operator capability.
    fn verify_operator(env: &Env, caller: &Address) {
        let manager: Address = get_operator_manager(env)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
        if !OperatorManagerClient::new(env, &manager).is_operator(caller) {
            panic_with_error!(env, Error::NotOperator);
        }
    }

    fn extract_words(env: &Env, random_words: &Vec<u64>) -> [u64; 4] {
        if random_words.len() != NUM_RANDOM_WORDS {
            panic_with_error!(env, Error::BadWordCount);
        }
        let mut words = [0u64; 4];
        for (i, word) in random_words.iter().enumerate() {
            words[i] = word;
        }
        words
    }

    fn mint_internal(
        env: &Env,
        caller: Address,
        owner: Address,
        random_words: Vec<u64>,
        rarity_ceiling: u32,
    ) -> u64 {
        caller.require_auth();
        Self::verify_operator(env, &caller);

        let words = Self::extract_words(env, &random_words);
        let attrs = attributes::derive(&words, rarity_ceiling);
        let now = env.ledger().timestamp();

        let token_id = get_total_supply(env);
        let dragon = Dragon {
            owner: owner.clone(),
            gender: attrs.gender,
            rarity: attrs.rarity,
            specie: attrs.specie,
            level: 1,
            xp: 0,
            damage: attrs.damage,
            xp_per_sec: attrs.xp_per_sec,
            last_interacted: now,
            created_at: now,
        };

        set_dragon(env, token_id, &dragon);
        owned_tokens_append(env, &owner, token_id);
        set_total_supply(env, token_id + 1);

        env.events().publish(
            (Symbol::new(env, "dragon_born"),),
            (
                attrs.gender,
                attrs.rarity,
                attrs.specie,
                attrs.damage,
                attrs.xp_per_sec,
                now,
                token_id,
            ),
        );

        token_id
    }

    /// Mint a dragon from four random words. Direct mints are capped at
    /// the two lowest rarity tiers.
    pub fn mint_new_dragon(env: Env, caller: Address, owner: Address, random_words: Vec<u64>) -> u64 {
        Self::mint_internal(&env, caller, owner, random_words, DIRECT_MINT_RARITY_CEILING)
    }

    /// Operator entry used by the breeding contract: same derivation with
    /// a caller-chosen rarity ceiling.
    pub fn mint_with_ceiling(
        env: Env,
        caller: Address,
        owner: Address,
        random_words: Vec<u64>,
        rarity_ceiling: u32,
    ) -> u64 {
        Self::mint_internal(&env, caller, owner, random_words, rarity_ceiling)
    }

    /// Converts the time since the last interaction into experience and
    /// levels. Thresholds are re-read per level so an admin adjustment
    /// takes effect from that level on.
    pub fn add_experience(env: Env, caller: Address, token_id: u64) {
        caller.require_auth();

        let mut dragon =
            get_dragon(&env, token_id).unwrap_or_else(|| panic_with_error!(&env, Error::DragonNotFound));
        if dragon.owner != caller {
            panic_with_error!(&env, Error::NotTokenOwner);
        }

        let now = env.ledger().timestamp();
        let elapsed = now - dragon.last_interacted;
        let xp_to_add = elapsed
            .checked_mul(dragon.xp_per_sec)
            .unwrap_or_else(|| panic_with_error!(&env, Error::Overflow));

        let max_level = get_max_level(&env);
        let mut remaining = dragon
            .xp
            .checked_add(xp_to_add)
            .unwrap_or_else(|| panic_with_error!(&env, Error::Overflow));

        while dragon.level < max_level {
            let needed = get_xp_threshold(&env, dragon.level);
            if remaining < needed {
                break;
            }
            remaining -= needed;
            dragon.level += 1;
        }

        // Past the cap a dragon neither levels nor accrues experience.
        dragon.xp = if dragon.level >= max_level { 0 } else { remaining };
        dragon.last_interacted = now;
        set_dragon(&env, token_id, &dragon);

        env.events().publish(
            (Symbol::new(&env, "xp_gained"),),
            (token_id, dragon.xp, dragon.level, xp_to_add),
        );
    }

    /// Overwrite the xp requirement to pass `level`. Admin only.
    pub fn set_xp_to_level_up(env: Env, caller: Address, level: u32, new_xp: u64) {
        caller.require_auth();

        let admin = get_admin(&env).unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized));
        if caller != admin {
            panic_with_error!(&env, Error::NotAdmin);
        }

        let max_level = get_max_level(&env);
        if level < 1 || level >= max_level {
            panic_with_error!(&env, Error::InvalidLevel);
        }

        let previous_xp = get_xp_threshold(&env, level);
        set_xp_threshold(&env, level, new_xp);

        env.events().publish(
            (Symbol::new(&env, "xp_adjusted"),),
            (level, previous_xp, new_xp),
        );
    }

    /// Move a token between owners, keeping both owner indexes in step.
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u64) {
        from.require_auth();

        let mut dragon =
            get_dragon(&env, token_id).unwrap_or_else(|| panic_with_error!(&env, Error::DragonNotFound));
        if dragon.owner != from {
            panic_with_error!(&env, Error::NotTokenOwner);
        }

        dragon.owner = to.clone();
        set_dragon(&env, token_id, &dragon);
        owned_tokens_remove(&env, &from, token_id);
        owned_tokens_append(&env, &to, token_id);

        env.events()
            .publish((Symbol::new(&env, "transfer"),), (from, to, token_id));
    }

    /* ---------------- QUERIES ---------------- */

    pub fn get_dragon_info(env: Env, token_id: u64) -> Option<Dragon> {
        get_dragon(&env, token_id)
    }

    pub fn owner_of(env: Env, token_id: u64) -> Option<Address> {
        get_dragon(&env, token_id).map(|dragon| dragon.owner)
    }

    pub fn get_owned_tokens(env: Env, account: Address) -> Vec<u64> {
        storage::get_owned_tokens(&env, &account)
    }

    pub fn balance_of(env: Env, account: Address) -> u32 {
        storage::get_owned_tokens(&env, &account).len()
    }

    pub fn total_supply(env: Env) -> u64 {
        get_total_supply(&env)
    }

    pub fn get_max_level(env: Env) -> u32 {
        storage::get_max_level(&env)
    }

    pub fn get_xp_to_level_up(env: Env, level: u32) -> u64 {
        get_xp_threshold(&env, level)
    }

    pub fn get_rarity_based_experience(env: Env) -> Vec<u64> {
        Self::table_to_vec(&env, &RARITY_BASED_EXPERIENCE)
    }

    pub fn get_species_count_per_rarity(env: Env) -> Vec<u64> {
        Self::table_to_vec(&env, &SPECIES_COUNT_PER_RARITY)
    }

    pub fn get_rarity_based_damage(env: Env) -> Vec<u64> {
        Self::table_to_vec(&env, &RARITY_BASED_DAMAGE)
    }

    fn table_to_vec(env: &Env, table: &[u64; RARITY_TIERS]) -> Vec<u64> {
        let mut out = Vec::new(env);
        for value in table {
            out.push_back(*value);
        }
        out
    }
}

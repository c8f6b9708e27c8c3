#![no_std]


use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, Address,
    Env, Symbol,
};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Owner,
    Operator(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotOwner = 3,
}

#[contract]
pub struct OperatorManager;

#[contractimpl]
impl OperatorManager {
    /// Initialize contract with its owner (one-time setup). The owner is
    /// always a valid operator.
    pub fn initialize(env: Env, owner: Address) {
        if env.storage().instance().has(&DataKey::Owner) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }

        owner.require_auth();
        env.storage().instance().set(&DataKey::Owner, &owner);

        env.events().publish((symbol_short!("init"),), owner);
    }

    fn verify_owner(env: &Env, caller: &Address) {
        let owner: Address = env
            .storage()
            .instance()
            .get(&DataKey::Owner)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));

        if caller != &owner {
            panic_with_error!(env, Error::NotOwner);
        }
    }

    /// Grant the operator capability. Adding an existing operator has no
    /// additional effect.
    pub fn add_operator(env: Env, caller: Address, account: Address) {
        caller.require_auth();
        Self::verify_owner(&env, &caller);

        env.storage()
            .instance()
            .set(&DataKey::Operator(account.clone()), &true);

        env.events()
            .publish((Symbol::new(&env, "operator_added"),), account);
    }

    /// Revoke the operator capability. The owner cannot be removed.
    pub fn remove_operator(env: Env, caller: Address, account: Address) {
        caller.require_auth();
        Self::verify_owner(&env, &caller);

        env.storage()
            .instance()
            .remove(&DataKey::Operator(account.clone()));

        env.events()
            .publish((Symbol::new(&env, "operator_removed"),), account);
    }

    pub fn is_operator(env: Env, account: Address) -> bool {
        let owner: Address = env
            .storage()
            .instance()
            .get(&DataKey::Owner)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized));

        if account == owner {
            return true;
        }

        env.storage()
            .instance()
            .get(&DataKey::Operator(account))
            .unwrap_or(false)
    }

    pub fn owner(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized))
    }
}

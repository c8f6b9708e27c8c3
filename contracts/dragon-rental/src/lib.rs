#![no_std]


use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, Address,
    Env, Symbol, Vec,
};

use dragon_lib::{RentalInfo, RENTAL_DURATION_SECONDS};
use dragon_nft::DragonNFTClient;
use operator_manager::OperatorManagerClient;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    OperatorManager,
    DragonNft,
    Rental(u64),
    RentedTokens,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotOwner = 3,
    AlreadyRented = 4,
    NotRenterOrOperator = 5,
    RentalNotActive = 6,
    DragonNotFound = 7,
}

#[contract]
pub struct DragonRental;

#[contractimpl]
impl DragonRental {
    pub fn initialize(env: Env, admin: Address, operator_manager: Address, dragon_nft: Address) {
        if env.storage().instance().has(&DataKey::Admin) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }

        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::OperatorManager, &operator_manager);
        env.storage().instance().set(&DataKey::DragonNft, &dragon_nft);

        env.events().publish((symbol_short!("init"),), admin);
    }

    fn nft_client(env: &Env) -> DragonNFTClient {
        let nft: Address = env
            .storage()
            .instance()
            .get(&DataKey::DragonNft)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
        DragonNFTClient::new(env, &nft)
    }

    fn is_operator(env: &Env, account: &Address) -> bool {
        let manager: Address = env
            .storage()
            .instance()
            .get(&DataKey::OperatorManager)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
        OperatorManagerClient::new(env, &manager).is_operator(account)
    }

    fn get_rental(env: &Env, token_id: u64) -> RentalInfo {
        env.storage()
            .instance()
            .get(&DataKey::Rental(token_id))
            .unwrap_or_else(RentalInfo::vacant)
    }

    fn rental_is_active(env: &Env, rental: &RentalInfo) -> bool {
        rental.is_rented && env.ledger().timestamp() < rental.start_time + rental.duration
    }

    fn rented_index(env: &Env) -> Vec<u64> {
        env.storage()
            .instance()
            .get(&DataKey::RentedTokens)
            .unwrap_or_else(|| Vec::new(env))
    }

    /// Start the fixed 48-hour exclusivity window. Only the token owner
    /// may rent out a dragon, and never while a window is still running.
    pub fn rent_dragon(env: Env, caller: Address, token_id: u64) {
        caller.require_auth();

        let owner = Self::nft_client(&env)
            .owner_of(&token_id)
            .unwrap_or_else(|| panic_with_error!(&env, Error::DragonNotFound));
        if owner != caller {
            panic_with_error!(&env, Error::NotOwner);
        }

        let existing = Self::get_rental(&env, token_id);
        if Self::rental_is_active(&env, &existing) {
            panic_with_error!(&env, Error::AlreadyRented);
        }

        let now = env.ledger().timestamp();
        let rental = RentalInfo {
            is_rented: true,
            renter: Some(caller.clone()),
            start_time: now,
            duration: RENTAL_DURATION_SECONDS,
        };
        env.storage()
            .instance()
            .set(&DataKey::Rental(token_id), &rental);

        let mut index = Self::rented_index(&env);
        if index.first_index_of(token_id).is_none() {
            index.push_back(token_id);
            env.storage().instance().set(&DataKey::RentedTokens, &index);
        }

        env.events().publish(
            (Symbol::new(&env, "dragon_rented"),),
            (token_id, caller, now, RENTAL_DURATION_SECONDS),
        );
    }

    /// Clear a running rental. The recorded renter or any operator may
    /// cancel; anyone else fails the authorization check even when no
    /// rental is active.
    pub fn cancel_rental(env: Env, caller: Address, token_id: u64) {
        caller.require_auth();

        let rental = Self::get_rental(&env, token_id);
        let is_renter = rental.renter.as_ref() == Some(&caller);
        if !is_renter && !Self::is_operator(&env, &caller) {
            panic_with_error!(&env, Error::NotRenterOrOperator);
        }
        if !Self::rental_is_active(&env, &rental) {
            panic_with_error!(&env, Error::RentalNotActive);
        }

        env.storage().instance().remove(&DataKey::Rental(token_id));

        let mut index = Self::rented_index(&env);
        if let Some(pos) = index.first_index_of(token_id) {
            index.remove(pos);
            env.storage().instance().set(&DataKey::RentedTokens, &index);
        }

        let renter = rental.renter.unwrap_or_else(|| caller.clone());
        env.events().publish(
            (Symbol::new(&env, "rental_cancelled"),),
            (token_id, renter),
        );
    }

    pub fn is_rental_active(env: Env, token_id: u64) -> bool {
        let rental = Self::get_rental(&env, token_id);
        Self::rental_is_active(&env, &rental)
    }

    /// The stored record, or a vacant default for unknown tokens.
    pub fn get_dragon_rental(env: Env, token_id: u64) -> RentalInfo {
        Self::get_rental(&env, token_id)
    }

    /// Tokens whose rental window is running right now. Expiry is a
    /// computed predicate, so lapsed entries are filtered, not mutated.
    pub fn get_currently_rented_dragons(env: Env) -> Vec<u64> {
        let mut active = Vec::new(&env);
        for token_id in Self::rented_index(&env).iter() {
            let rental = Self::get_rental(&env, token_id);
            if Self::rental_is_active(&env, &rental) {
                active.push_back(token_id);
            }
        }
        active
    }
}

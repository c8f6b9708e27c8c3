#![no_std]

#[cfg(test)]
mod test;

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, token,
    Address, Env, Symbol, Vec,
};

use dragon_lib::{BREEDING_COOLDOWN_SECONDS, BREEDING_RARITY_CEILING};
use dragon_nft::DragonNFTClient;
use dragon_rental::DragonRentalClient;
use operator_manager::OperatorManagerClient;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    OperatorManager,
    DragonNft,
    DragonRental,
    PaymentToken,
    BreedingFee,
    LastBreedingTime(u64),
    /// Fee collected for one breeding of this parent pair, not yet paid out.
    PendingFee(u64, u64),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotOperator = 3,
    SameDragon = 4,
    ParentNotFound = 5,
    ParentNotAvailable = 6,
    SameGender = 7,
    BreedingCooldown = 8,
    TokenIdMismatch = 9,
    NoPendingFee = 10,
}

#[contract]
pub struct DragonBreed;

#[contractimpl]
impl DragonBreed {
    pub fn initialize(
        env: Env,
        admin: Address,
        operator_manager: Address,
        dragon_nft: Address,
        dragon_rental: Address,
        payment_token: Address,
        breeding_fee: i128,
    ) {
        if env.storage().instance().has(&DataKey::Admin) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }

        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::OperatorManager, &operator_manager);
        env.storage().instance().set(&DataKey::DragonNft, &dragon_nft);
        env.storage()
            .instance()
            .set(&DataKey::DragonRental, &dragon_rental);
        env.storage()
            .instance()
            .set(&DataKey::PaymentToken, &payment_token);
        env.storage()
            .instance()
            .set(&DataKey::BreedingFee, &breeding_fee);

        env.events().publish((symbol_short!("init"),), admin);
    }

    /// Caller must hold the operator capability.
    fn verify_operator(env: &Env, caller: &Address) {
        let manager: Address = env
            .storage()
            .instance()
            .get(&DataKey::OperatorManager)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
        if !OperatorManagerClient::new(env, &manager).is_operator(caller) {
            panic_with_error!(env, Error::NotOperator);
        }
    }

    fn nft_client(env: &Env) -> DragonNFTClient {
        let nft: Address = env
            .storage()
            .instance()
            .get(&DataKey::DragonNft)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
        DragonNFTClient::new(env, &nft)
    }

    fn rental_client(env: &Env) -> DragonRentalClient {
        let rental: Address = env
            .storage()
            .instance()
            .get(&DataKey::DragonRental)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
        DragonRentalClient::new(env, &rental)
    }

    fn check_cooldown(env: &Env, token_id: u64) {
        let last: u64 = env
            .storage()
            .instance()
            .get(&DataKey::LastBreedingTime(token_id))
            .unwrap_or(0);
        if last != 0 && env.ledger().timestamp() < last + BREEDING_COOLDOWN_SECONDS {
            panic_with_error!(env, Error::BreedingCooldown);
        }
    }

    /// Combine two parent dragons into a new one. Operator-only: end users
    /// go through the randomness consumer, which calls back in here once
    /// the oracle delivers. The requester must own at least one parent;
    /// a parent the requester does not own qualifies only while it is
    /// rented out. Offspring may land one rarity tier above direct mints.
    pub fn breed_dragons(
        env: Env,
        caller: Address,
        requester: Address,
        parent1: u64,
        parent2: u64,
        random_words: Vec<u64>,
        new_token_id: u64,
    ) -> u64 {
        caller.require_auth();
        Self::verify_operator(&env, &caller);

        if parent1 == parent2 {
            panic_with_error!(&env, Error::SameDragon);
        }

        let nft = Self::nft_client(&env);
        let dragon1 = nft
            .get_dragon_info(&parent1)
            .unwrap_or_else(|| panic_with_error!(&env, Error::ParentNotFound));
        let dragon2 = nft
            .get_dragon_info(&parent2)
            .unwrap_or_else(|| panic_with_error!(&env, Error::ParentNotFound));

        let rental = Self::rental_client(&env);
        let owns1 = dragon1.owner == requester;
        let owns2 = dragon2.owner == requester;
        if !owns1 && !owns2 {
            panic_with_error!(&env, Error::ParentNotAvailable);
        }
        if !owns1 && !rental.is_rental_active(&parent1) {
            panic_with_error!(&env, Error::ParentNotAvailable);
        }
        if !owns2 && !rental.is_rental_active(&parent2) {
            panic_with_error!(&env, Error::ParentNotAvailable);
        }

        if dragon1.gender == dragon2.gender {
            panic_with_error!(&env, Error::SameGender);
        }

        Self::check_cooldown(&env, parent1);
        Self::check_cooldown(&env, parent2);

        if new_token_id != nft.total_supply() {
            panic_with_error!(&env, Error::TokenIdMismatch);
        }

        let token_id = nft.mint_with_ceiling(
            &env.current_contract_address(),
            &requester,
            &random_words,
            &BREEDING_RARITY_CEILING,
        );

        let now = env.ledger().timestamp();
        env.storage()
            .instance()
            .set(&DataKey::LastBreedingTime(parent1), &now);
        env.storage()
            .instance()
            .set(&DataKey::LastBreedingTime(parent2), &now);

        let fee: i128 = env
            .storage()
            .instance()
            .get(&DataKey::BreedingFee)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::PendingFee(parent1, parent2), &fee);

        env.events().publish(
            (Symbol::new(&env, "dragons_bred"),),
            (token_id, parent1, parent2, requester),
        );

        token_id
    }

    /// Pay the collected breeding fee out to the parents' current owners,
    /// half each. Single-use per breeding event: the pending entry is
    /// consumed on the first call.
    pub fn distribute_breeding_fee(env: Env, caller: Address, parent1: u64, parent2: u64) {
        caller.require_auth();
        Self::verify_operator(&env, &caller);

        let fee: i128 = env
            .storage()
            .instance()
            .get(&DataKey::PendingFee(parent1, parent2))
            .unwrap_or_else(|| panic_with_error!(&env, Error::NoPendingFee));
        env.storage()
            .instance()
            .remove(&DataKey::PendingFee(parent1, parent2));

        let nft = Self::nft_client(&env);
        let owner1 = nft
            .owner_of(&parent1)
            .unwrap_or_else(|| panic_with_error!(&env, Error::ParentNotFound));
        let owner2 = nft
            .owner_of(&parent2)
            .unwrap_or_else(|| panic_with_error!(&env, Error::ParentNotFound));

        let payment_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::PaymentToken)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized));
        let token_client = token::Client::new(&env, &payment_token);

        let half = fee / 2;
        token_client.transfer(&env.current_contract_address(), &owner1, &half);
        token_client.transfer(&env.current_contract_address(), &owner2, &(fee - half));

        env.events().publish(
            (Symbol::new(&env, "fee_distributed"),),
            (parent1, parent2, fee),
        );
    }

    /// 0 for a dragon that never bred or does not exist.
    pub fn get_last_breeding_time(env: Env, token_id: u64) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::LastBreedingTime(token_id))
            .unwrap_or(0)
    }

    pub fn get_breeding_fee(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::BreedingFee)
            .unwrap_or(0)
    }
}

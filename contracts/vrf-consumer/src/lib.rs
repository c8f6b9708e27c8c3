#![no_std]


use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, token,
    Address, Env, Symbol, Vec,
};

use dragon_breed::DragonBreedClient;
use dragon_lib::{
    types::{PendingRequest, RequestKind},
    NUM_RANDOM_WORDS,
};
use dragon_nft::DragonNFTClient;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Coordinator,
    DragonNft,
    DragonBreed,
    PaymentToken,
    MintFee,
    RequestCounter,
    Request(u64),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotCoordinator = 3,
    InsufficientPayment = 4,
    RequestNotFound = 5,
    BadWordCount = 6,
}

#[contract]
pub struct RandomnessConsumer;

#[contractimpl]
impl RandomnessConsumer {
    pub fn initialize(
        env: Env,
        admin: Address,
        coordinator: Address,
        dragon_nft: Address,
        dragon_breed: Address,
        payment_token: Address,
        mint_fee: i128,
    ) {
        if env.storage().instance().has(&DataKey::Admin) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }

        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::Coordinator, &coordinator);
        env.storage().instance().set(&DataKey::DragonNft, &dragon_nft);
        env.storage()
            .instance()
            .set(&DataKey::DragonBreed, &dragon_breed);
        env.storage()
            .instance()
            .set(&DataKey::PaymentToken, &payment_token);
        env.storage().instance().set(&DataKey::MintFee, &mint_fee);
        env.storage().instance().set(&DataKey::RequestCounter, &0u64);

        env.events().publish((symbol_short!("init"),), admin);
    }

    /// Queue a mint for `requester`. The payment is escrowed here and the
    /// oracle is signalled through the `request_sent` event.
    pub fn request_mint(env: Env, requester: Address, payment: i128) -> u64 {
        requester.require_auth();

        let mint_fee: i128 = env
            .storage()
            .instance()
            .get(&DataKey::MintFee)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized));
        if payment < mint_fee {
            panic_with_error!(&env, Error::InsufficientPayment);
        }

        Self::collect_payment(&env, &requester, &env.current_contract_address(), payment);

        let request = PendingRequest {
            kind: RequestKind::Mint,
            requester,
            parent1: None,
            parent2: None,
            paid: payment,
            created_at: env.ledger().timestamp(),
        };
        Self::enqueue(&env, request)
    }

    /// Queue a breed of `parent1` x `parent2`. The payment goes straight to
    /// the breeding contract, which holds the pot it later distributes.
    /// Eligibility is only judged at fulfillment time, against the ledger
    /// state of that moment.
    pub fn request_breed(
        env: Env,
        requester: Address,
        parent1: u64,
        parent2: u64,
        payment: i128,
    ) -> u64 {
        requester.require_auth();

        let breed_addr = Self::breed_address(&env);
        let breeding_fee = DragonBreedClient::new(&env, &breed_addr).get_breeding_fee();
        if payment < breeding_fee {
            panic_with_error!(&env, Error::InsufficientPayment);
        }

        Self::collect_payment(&env, &requester, &breed_addr, payment);

        let request = PendingRequest {
            kind: RequestKind::Breed,
            requester,
            parent1: Some(parent1),
            parent2: Some(parent2),
            paid: payment,
            created_at: env.ledger().timestamp(),
        };
        Self::enqueue(&env, request)
    }

    /// Oracle callback. The pending request is deleted before any dispatch,
    /// so a request id is executed at most once.
    pub fn fulfill_random_words(env: Env, caller: Address, request_id: u64, random_words: Vec<u64>) {
        caller.require_auth();
        let coordinator: Address = env
            .storage()
            .instance()
            .get(&DataKey::Coordinator)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotInitialized));
        if caller != coordinator {
            panic_with_error!(&env, Error::NotCoordinator);
        }
        if random_words.len() != NUM_RANDOM_WORDS {
            panic_with_error!(&env, Error::BadWordCount);
        }

        let request: PendingRequest = env
            .storage()
            .instance()
            .get(&DataKey::Request(request_id))
            .unwrap_or_else(|| panic_with_error!(&env, Error::RequestNotFound));
        env.storage().instance().remove(&DataKey::Request(request_id));

        let consumer = env.current_contract_address();
        let nft = DragonNFTClient::new(&env, &Self::nft_address(&env));

        let token_id = match request.kind {
            RequestKind::Mint => nft.mint_new_dragon(&consumer, &request.requester, &random_words),
            RequestKind::Breed => {
                let breed = DragonBreedClient::new(&env, &Self::breed_address(&env));
                // Both parents carry a recorded value when the request is
                // queued with kind Breed.
                let parent1 = request
                    .parent1
                    .unwrap_or_else(|| panic_with_error!(&env, Error::RequestNotFound));
                let parent2 = request
                    .parent2
                    .unwrap_or_else(|| panic_with_error!(&env, Error::RequestNotFound));
                let token_id = breed.breed_dragons(
                    &consumer,
                    &request.requester,
                    &parent1,
                    &parent2,
                    &random_words,
                    &nft.total_supply(),
                );
                breed.distribute_breeding_fee(&consumer, &parent1, &parent2);
                token_id
            }
        };

        env.events().publish(
            (Symbol::new(&env, "request_filled"),),
            (request_id, token_id),
        );
    }

    pub fn get_pending_request(env: Env, request_id: u64) -> Option<PendingRequest> {
        env.storage().instance().get(&DataKey::Request(request_id))
    }

    pub fn get_mint_fee(env: Env) -> i128 {
        env.storage().instance().get(&DataKey::MintFee).unwrap_or(0)
    }

    fn enqueue(env: &Env, request: PendingRequest) -> u64 {
        let request_id: u64 = env
            .storage()
            .instance()
            .get(&DataKey::RequestCounter)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
        env.storage()
            .instance()
            .set(&DataKey::RequestCounter, &(request_id + 1));
        env.storage()
            .instance()
            .set(&DataKey::Request(request_id), &request);

        env.events().publish(
            (Symbol::new(env, "request_sent"),),
            (request_id, NUM_RANDOM_WORDS),
        );
        request_id
    }

    fn collect_payment(env: &Env, from: &Address, to: &Address, amount: i128) {
        let payment_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::PaymentToken)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized));
        token::Client::new(env, &payment_token).transfer(from, to, &amount);
    }

    fn nft_address(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::DragonNft)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
    }

    fn breed_address(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::DragonBreed)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
    }
}

#![cfg(test)]

use super::*;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token::{StellarAssetClient, TokenClient},
    Address, Env, Vec,
};

use dragon_lib::default_xp_curve;
use dragon_nft::DragonNFT;
use dragon_rental::DragonRental;
use operator_manager::OperatorManager;

const FEE: i128 = 1_000;

struct Setup<'a> {
    env: Env,
    breed: DragonBreedClient<'a>,
    nft: DragonNFTClient<'a>,
    rental: DragonRentalClient<'a>,
    token: TokenClient<'a>,
    admin: Address,
    requester: Address,
    renter: Address,
    parent1: u64,
    parent2: u64,
}

fn setup() -> Setup<'static> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = 1_000_000);

    let admin = Address::generate(&env);

    let manager_id = env.register(OperatorManager, ());
    let manager = OperatorManagerClient::new(&env, &manager_id);
    manager.initialize(&admin);

    let nft_id = env.register(DragonNFT, ());
    let nft = DragonNFTClient::new(&env, &nft_id);
    nft.initialize(&admin, &manager_id, &100u32, &default_xp_curve(&env, 100));

    let rental_id = env.register(DragonRental, ());
    let rental = DragonRentalClient::new(&env, &rental_id);
    rental.initialize(&admin, &manager_id, &nft_id);

    let asset = env.register_stellar_asset_contract_v2(admin.clone());
    let token = TokenClient::new(&env, &asset.address());

    let breed_id = env.register(DragonBreed, ());
    let breed = DragonBreedClient::new(&env, &breed_id);
    breed.initialize(&admin, &manager_id, &nft_id, &rental_id, &asset.address(), &FEE);

    // The breeding contract mints through the registry, so it carries the
    // operator capability, and it holds the collected fee pot.
    manager.add_operator(&admin, &breed_id);
    StellarAssetClient::new(&env, &asset.address()).mint(&breed_id, &(FEE * 10));

    let requester = Address::generate(&env);
    let renter = Address::generate(&env);

    let parent1 = nft.mint_new_dragon(&admin, &requester, &Vec::from_array(&env, [0u64, 0, 0, 0]));
    let parent2 = nft.mint_new_dragon(&admin, &renter, &Vec::from_array(&env, [1u64, 0, 0, 0]));
    rental.rent_dragon(&renter, &parent2);

    Setup {
        env,
        breed,
        nft,
        rental,
        token,
        admin,
        requester,
        renter,
        parent1,
        parent2,
    }
}

fn words(env: &Env) -> Vec<u64> {
    Vec::from_array(env, [0u64, 0, 0, 0])
}

#[test]
fn breeding_mints_one_offspring_and_stamps_both_parents() {
    let s = setup();
    let supply_before = s.nft.total_supply();
    let balance_before = s.nft.balance_of(&s.requester);

    let child = s.breed.breed_dragons(
        &s.admin,
        &s.requester,
        &s.parent1,
        &s.parent2,
        &words(&s.env),
        &supply_before,
    );

    assert_eq!(s.nft.total_supply(), supply_before + 1);
    assert_eq!(s.nft.balance_of(&s.requester), balance_before + 1);
    assert_eq!(s.nft.owner_of(&child), Some(s.requester.clone()));

    let now = s.env.ledger().timestamp();
    assert_eq!(s.breed.get_last_breeding_time(&s.parent1), now);
    assert_eq!(s.breed.get_last_breeding_time(&s.parent2), now);

    let dragon = s.nft.get_dragon_info(&child).unwrap();
    assert!(dragon.rarity < 3);
    assert!(dragon.specie < 17);
    assert_eq!(dragon.level, 1);
    assert_eq!(dragon.xp, 0);
    assert!(dragon.damage >= 50 && dragon.damage < 321);
}

#[test]
fn breeding_requires_the_operator_capability() {
    let s = setup();
    let result = s.breed.try_breed_dragons(
        &s.requester,
        &s.requester,
        &s.parent1,
        &s.parent2,
        &words(&s.env),
        &s.nft.total_supply(),
    );
    assert_eq!(result, Err(Ok(Error::NotOperator)));
}

#[test]
fn fee_distribution_requires_the_operator_capability() {
    let s = setup();
    let result = s
        .breed
        .try_distribute_breeding_fee(&s.requester, &s.parent1, &s.parent2);
    assert_eq!(result, Err(Ok(Error::NotOperator)));
}

#[test]
fn a_dragon_cannot_breed_with_itself() {
    let s = setup();
    let result = s.breed.try_breed_dragons(
        &s.admin,
        &s.requester,
        &s.parent1,
        &s.parent1,
        &words(&s.env),
        &s.nft.total_supply(),
    );
    assert_eq!(result, Err(Ok(Error::SameDragon)));
}

#[test]
fn the_requester_must_own_or_rent_each_parent() {
    let s = setup();

    // The rented window on parent2 lapses: it is no longer available.
    s.env.ledger().with_mut(|li| li.timestamp += 172_800);
    assert!(!s.rental.is_rental_active(&s.parent2));
    let result = s.breed.try_breed_dragons(
        &s.admin,
        &s.requester,
        &s.parent1,
        &s.parent2,
        &words(&s.env),
        &s.nft.total_supply(),
    );
    assert_eq!(result, Err(Ok(Error::ParentNotAvailable)));
}

#[test]
fn the_requester_must_own_at_least_one_parent() {
    let s = setup();
    let outsider = Address::generate(&s.env);
    let result = s.breed.try_breed_dragons(
        &s.admin,
        &outsider,
        &s.parent1,
        &s.parent2,
        &words(&s.env),
        &s.nft.total_supply(),
    );
    assert_eq!(result, Err(Ok(Error::ParentNotAvailable)));
}

#[test]
fn parents_of_the_same_gender_cannot_breed() {
    let s = setup();
    // A second male owned by the requester.
    let male2 = s
        .nft
        .mint_new_dragon(&s.admin, &s.requester, &Vec::from_array(&s.env, [0u64, 0, 0, 0]));

    let result = s.breed.try_breed_dragons(
        &s.admin,
        &s.requester,
        &s.parent1,
        &male2,
        &words(&s.env),
        &s.nft.total_supply(),
    );
    assert_eq!(result, Err(Ok(Error::SameGender)));
}

#[test]
fn parents_observe_the_breeding_cooldown() {
    let s = setup();
    s.breed.breed_dragons(
        &s.admin,
        &s.requester,
        &s.parent1,
        &s.parent2,
        &words(&s.env),
        &s.nft.total_supply(),
    );

    // Re-rent so availability is not the failing check.
    s.env.ledger().with_mut(|li| li.timestamp += 3_600);
    let result = s.breed.try_breed_dragons(
        &s.admin,
        &s.requester,
        &s.parent1,
        &s.parent2,
        &words(&s.env),
        &s.nft.total_supply(),
    );
    assert_eq!(result, Err(Ok(Error::BreedingCooldown)));

    // Past the cooldown, with the rental window still open, the pair
    // may breed again.
    s.env.ledger().with_mut(|li| li.timestamp += 86_400);
    s.breed.breed_dragons(
        &s.admin,
        &s.requester,
        &s.parent1,
        &s.parent2,
        &words(&s.env),
        &s.nft.total_supply(),
    );
}

#[test]
fn the_expected_token_id_must_match_the_supply() {
    let s = setup();
    let result = s.breed.try_breed_dragons(
        &s.admin,
        &s.requester,
        &s.parent1,
        &s.parent2,
        &words(&s.env),
        &(s.nft.total_supply() + 1),
    );
    assert_eq!(result, Err(Ok(Error::TokenIdMismatch)));
}

#[test]
fn fee_is_split_between_the_parents_owners_once() {
    let s = setup();
    s.breed.breed_dragons(
        &s.admin,
        &s.requester,
        &s.parent1,
        &s.parent2,
        &words(&s.env),
        &s.nft.total_supply(),
    );

    s.breed
        .distribute_breeding_fee(&s.admin, &s.parent1, &s.parent2);
    assert_eq!(s.token.balance(&s.requester), FEE / 2);
    assert_eq!(s.token.balance(&s.renter), FEE - FEE / 2);

    // The pending entry is consumed: a second payout is refused.
    let result = s
        .breed
        .try_distribute_breeding_fee(&s.admin, &s.parent1, &s.parent2);
    assert_eq!(result, Err(Ok(Error::NoPendingFee)));
}

#[test]
fn last_breeding_time_is_zero_for_unknown_dragons() {
    let s = setup();
    assert_eq!(s.breed.get_last_breeding_time(&999), 0);
    assert_eq!(s.breed.get_last_breeding_time(&s.parent1), 0);
}

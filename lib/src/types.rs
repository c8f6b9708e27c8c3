use soroban_sdk::{contracttype, Address};

/// Full on-ledger record of a dragon. Attributes other than `owner`,
/// `level`, `xp` and the timestamps are fixed at mint time.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Dragon {
    pub owner: Address,
    pub gender: u32,
    pub rarity: u32,
    pub specie: u32,
    pub level: u32,
    pub xp: u64,
    pub damage: u64,
    pub xp_per_sec: u64,
    pub last_interacted: u64,
    pub created_at: u64,
}

/// Rental record for a token. An unrented token reads as [`RentalInfo::vacant`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct RentalInfo {
    pub is_rented: bool,
    pub renter: Option<Address>,
    pub start_time: u64,
    pub duration: u64,
}

impl RentalInfo {
    pub fn vacant() -> Self {
        RentalInfo {
            is_rented: false,
            renter: None,
            start_time: 0,
            duration: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[contracttype]
#[repr(u32)]
pub enum RequestKind {
    Mint = 0,
    Breed = 1,
}

/// Intent stored while a randomness request is outstanding. Created on
/// submission, deleted on the first (and only) fulfillment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[contracttype]
pub struct PendingRequest {
    pub kind: RequestKind,
    pub requester: Address,
    pub parent1: Option<u64>,
    pub parent2: Option<u64>,
    pub paid: i128,
    pub created_at: u64,
}

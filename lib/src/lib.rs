#![no_std]

pub mod types;
pub mod xp_curve;

pub use types::*;
pub use xp_curve::default_xp_curve;

// Game configuration, indexed by rarity tier (0 = common .. 5 = mythic).
pub const RARITY_TIERS: usize = 6;
pub const RARITY_BASED_EXPERIENCE: [u64; RARITY_TIERS] = [10, 12, 14, 16, 18, 20];
pub const SPECIES_COUNT_PER_RARITY: [u64; RARITY_TIERS] = [8, 5, 4, 3, 2, 1];
pub const RARITY_BASED_DAMAGE: [u64; RARITY_TIERS] = [50, 100, 170, 300, 450, 700];
// Half-open damage spread per tier: damage lands in [base, base + spread).
pub const RARITY_DAMAGE_SPREAD: [u64; RARITY_TIERS] = [26, 51, 86, 151, 226, 351];
// Relative draw weights for the rarity roll, restricted by the mint context.
pub const RARITY_WEIGHTS: [u64; RARITY_TIERS] = [50, 30, 12, 5, 2, 1];

// Direct mints stay in the two lowest tiers; breeding reaches one tier higher.
pub const DIRECT_MINT_RARITY_CEILING: u32 = 1;
pub const BREEDING_RARITY_CEILING: u32 = 2;

pub const NUM_RANDOM_WORDS: u32 = 4;

/// Fixed rental exclusivity window: 48 hours.
pub const RENTAL_DURATION_SECONDS: u64 = 172_800;

/// Minimum interval before a parent dragon may breed again.
pub const BREEDING_COOLDOWN_SECONDS: u64 = 86_400;

pub const DEFAULT_BASE_XP_TO_LEVEL_UP: u64 = 10_000;

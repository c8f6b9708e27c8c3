use soroban_sdk::{Env, Vec};

use crate::DEFAULT_BASE_XP_TO_LEVEL_UP;

/// Builds the default per-level xp requirement table: 10,000 xp to pass
/// level 1, growing by 10% per level below 50 and 20% from 50 up, rounded
/// up. Entry `level - 1` is the xp needed to pass `level`, so the table
/// holds `max_level - 1` entries.
pub fn default_xp_curve(env: &Env, max_level: u32) -> Vec<u64> {
    let mut curve = Vec::new(env);
    let mut xp = DEFAULT_BASE_XP_TO_LEVEL_UP;
    for level in 1..max_level {
        curve.push_back(xp);
        xp = if level < 50 {
            (xp * 11 + 9) / 10
        } else {
            (xp * 12 + 9) / 10
        };
    }
    curve
}

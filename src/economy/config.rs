//! Economy constants and the tunables a host may override.

use serde::{Deserialize, Serialize};

/// Cost growth per owned unit, shared by every counted generator.
pub const GROWTH_RATE: f64 = 0.15;

/// Per-unit bonus of the level-scaling law `n · base · (1 + k·n)`.
pub const LEVEL_SCALING: f64 = 0.15;

/// Global production bonus per Allay owned.
pub const ALLAY_BONUS: f64 = 0.2;

/// Lucky click chance per Lucky Cat owned.
pub const LUCKY_CHANCE_PER_CAT: f64 = 0.1;

/// Hard ceiling on Lucky Cats.
pub const LUCKY_CAT_CAP: u32 = 10;

/// Absences shorter than this (seconds) earn nothing offline.
pub const OFFLINE_MIN_SECONDS: u64 = 30;

/// Click multiplier when the lucky roll hits.
pub const LUCKY_CLICK_MULTIPLIER: f64 = 10.0;

/// localStorage key of the snapshot.
pub const STORAGE_KEY: &str = "allay_clicker_save";

/// Autosave interval in ticks (1 tick/sec × 10 seconds).
pub const AUTOSAVE_INTERVAL: u32 = 10;

/// Tunables the host may override at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub offline_min_seconds: u64,
    pub lucky_click_multiplier: f64,
    /// Seed for the lucky-click roll. Reproducibility only matters in tests.
    pub rng_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            offline_min_seconds: OFFLINE_MIN_SECONDS,
            lucky_click_multiplier: LUCKY_CLICK_MULTIPLIER,
            rng_seed: 0x5eed,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng_seed: seed,
            ..Self::default()
        }
    }
}

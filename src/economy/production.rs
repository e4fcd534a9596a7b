//! Production rates: passive income per second and the value of one click.

use rand::Rng;

use super::config::{ALLAY_BONUS, LEVEL_SCALING, LUCKY_CHANCE_PER_CAT};
use super::generators::{GeneratorKind, Registry};

/// Kinds that produce on their own every second.
const PASSIVE_KINDS: [GeneratorKind; 4] = [
    GeneratorKind::AutoClicker,
    GeneratorKind::FriendlyEnderman,
    GeneratorKind::PirateParrot,
    GeneratorKind::Fox,
];

/// `n · base · (1 + k·n)`. Quadratic in `n`: stacking one kind pays off.
pub fn effective_rate(count: u32, base: f64) -> f64 {
    let n = count as f64;
    n * base * (1.0 + LEVEL_SCALING * n)
}

/// Rate of one kind before global multipliers. The Auto Clicker term carries
/// the enchant multiplier.
pub fn kind_rate(registry: &Registry, kind: GeneratorKind) -> f64 {
    let rate = effective_rate(registry.count(kind), kind.base_production());
    if kind == GeneratorKind::AutoClicker {
        rate * registry.multi_auto_click_power()
    } else {
        rate
    }
}

/// Allay bonus applied to the whole passive sum.
pub fn global_multiplier(registry: &Registry) -> f64 {
    let allays = registry.count(GeneratorKind::Allay);
    if allays > 0 {
        1.0 + ALLAY_BONUS * allays as f64
    } else {
        1.0
    }
}

/// Passive income per second. Used for ticks, offline credit and display alike.
pub fn passive_rate(registry: &Registry) -> f64 {
    let sum: f64 = PASSIVE_KINDS.iter().map(|k| kind_rate(registry, *k)).sum();
    sum * global_multiplier(registry)
}

/// Value of one click before the lucky roll.
pub fn click_value(registry: &Registry) -> f64 {
    effective_rate(registry.count(GeneratorKind::ClickPower), 1.0)
}

/// Probability that a click is lucky. Reaches 1.0 at the Lucky Cat cap.
pub fn lucky_chance(registry: &Registry) -> f64 {
    (LUCKY_CHANCE_PER_CAT * registry.count(GeneratorKind::LuckyCat) as f64).min(1.0)
}

/// Outcome of a single click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickRoll {
    pub value: f64,
    pub lucky: bool,
}

/// Roll one click. Exactly one uniform draw per call.
pub fn roll_click<R: Rng>(registry: &Registry, rng: &mut R, lucky_multiplier: f64) -> ClickRoll {
    let base = click_value(registry);
    let lucky = rng.gen::<f64>() < lucky_chance(registry);
    ClickRoll {
        value: if lucky { base * lucky_multiplier } else { base },
        lucky,
    }
}

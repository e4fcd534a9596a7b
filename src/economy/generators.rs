//! ジェネレーター定義、エンチャント段階、購入処理。

use serde::{Deserialize, Serialize};

use super::config::{GROWTH_RATE, LUCKY_CAT_CAP};
use super::cost;
use super::ledger::Ledger;

/// Every purchasable line in the shop.
///
/// `EnchantedAutoClick` is not counted: it is the multiplier tier of the
/// Auto Clicker, advanced through [`Registry::advance_tier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    ClickPower,
    AutoClicker,
    EnchantedAutoClick,
    FriendlyEnderman,
    Allay,
    LuckyCat,
    PirateParrot,
    Fox,
}

impl GeneratorKind {
    /// All kinds in shop order.
    pub fn all() -> &'static [GeneratorKind] {
        &[
            GeneratorKind::ClickPower,
            GeneratorKind::AutoClicker,
            GeneratorKind::EnchantedAutoClick,
            GeneratorKind::FriendlyEnderman,
            GeneratorKind::Allay,
            GeneratorKind::LuckyCat,
            GeneratorKind::PirateParrot,
            GeneratorKind::Fox,
        ]
    }

    /// Kinds that own a count, in registry slot order.
    pub fn counted() -> &'static [GeneratorKind] {
        &[
            GeneratorKind::ClickPower,
            GeneratorKind::AutoClicker,
            GeneratorKind::FriendlyEnderman,
            GeneratorKind::Allay,
            GeneratorKind::LuckyCat,
            GeneratorKind::PirateParrot,
            GeneratorKind::Fox,
        ]
    }

    /// Registry slot, `None` for the enchant tier.
    pub fn slot(&self) -> Option<usize> {
        GeneratorKind::counted().iter().position(|k| k == self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorKind::ClickPower => "Click Power",
            GeneratorKind::AutoClicker => "Auto Clicker",
            GeneratorKind::EnchantedAutoClick => "Enchanted Auto Click",
            GeneratorKind::FriendlyEnderman => "Friendly Enderman",
            GeneratorKind::Allay => "Allay",
            GeneratorKind::LuckyCat => "Lucky Cat",
            GeneratorKind::PirateParrot => "Pirate Parrot",
            GeneratorKind::Fox => "Fox",
        }
    }

    /// Price of the first unit.
    pub fn base_cost(&self) -> f64 {
        match self {
            GeneratorKind::ClickPower => 10.0,
            GeneratorKind::AutoClicker => 50.0,
            GeneratorKind::EnchantedAutoClick => 0.0,
            GeneratorKind::FriendlyEnderman => 500.0,
            GeneratorKind::Allay => 5_000.0,
            GeneratorKind::LuckyCat => 1_000.0,
            GeneratorKind::PirateParrot => 2_000.0,
            GeneratorKind::Fox => 20_000.0,
        }
    }

    /// Resource per second per unit before level scaling. Zero for kinds
    /// that act through clicks or multipliers instead.
    pub fn base_production(&self) -> f64 {
        match self {
            GeneratorKind::AutoClicker => 1.0,
            GeneratorKind::FriendlyEnderman => 5.0,
            GeneratorKind::PirateParrot => 30.0,
            GeneratorKind::Fox => 100.0,
            GeneratorKind::ClickPower
            | GeneratorKind::EnchantedAutoClick
            | GeneratorKind::Allay
            | GeneratorKind::LuckyCat => 0.0,
        }
    }

    /// Maximum count, if capped.
    pub fn cap(&self) -> Option<u32> {
        match self {
            GeneratorKind::LuckyCat => Some(LUCKY_CAT_CAP),
            _ => None,
        }
    }

    /// Count a fresh save starts with. One Click Power so clicking pays from the start.
    pub fn initial_count(&self) -> u32 {
        match self {
            GeneratorKind::ClickPower => 1,
            _ => 0,
        }
    }

    /// Host key that buys one unit.
    pub fn key(&self) -> char {
        match self {
            GeneratorKind::ClickPower => '1',
            GeneratorKind::AutoClicker => '2',
            GeneratorKind::EnchantedAutoClick => 'e',
            GeneratorKind::FriendlyEnderman => '3',
            GeneratorKind::Allay => '4',
            GeneratorKind::LuckyCat => '5',
            GeneratorKind::PirateParrot => '6',
            GeneratorKind::Fox => '7',
        }
    }
}

/// A counted generator. `next_unit_cost` is derived from `count`.
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    pub kind: GeneratorKind,
    count: u32,
    next_unit_cost: f64,
}

impl Generator {
    pub fn new(kind: GeneratorKind) -> Self {
        let mut g = Self {
            kind,
            count: kind.initial_count(),
            next_unit_cost: 0.0,
        };
        g.recompute_cost();
        g
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn next_unit_cost(&self) -> f64 {
        self.next_unit_cost
    }

    /// Price of `quantity` more units at the current count.
    pub fn quote(&self, quantity: u32) -> f64 {
        cost::cost(self.kind.base_cost(), GROWTH_RATE, quantity, self.count)
    }

    /// Clamp a requested quantity against the kind's cap.
    pub fn allowed_quantity(&self, quantity: u32) -> u32 {
        match self.kind.cap() {
            Some(cap) => quantity.min(cap.saturating_sub(self.count)),
            None => quantity,
        }
    }

    fn set_count(&mut self, count: u32) {
        self.count = match self.kind.cap() {
            Some(cap) => count.min(cap),
            None => count,
        };
        self.recompute_cost();
    }

    fn recompute_cost(&mut self) {
        self.next_unit_cost = self.quote(1);
    }
}

/// One step of the enchant ladder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnchantTier {
    /// Auto Clicker multiplier while this tier is active.
    pub power: f64,
    /// Auto Clickers required before this tier can be bought.
    pub required_auto_clickers: u32,
    /// Flat unlock price.
    pub cost: f64,
}

/// Tier 0 is the free starting tier.
pub const ENCHANT_TIERS: [EnchantTier; 7] = [
    EnchantTier { power: 1.0, required_auto_clickers: 0, cost: 0.0 },
    EnchantTier { power: 1.15, required_auto_clickers: 0, cost: 250.0 },
    EnchantTier { power: 1.3, required_auto_clickers: 100, cost: 500.0 },
    EnchantTier { power: 1.5, required_auto_clickers: 200, cost: 1_000.0 },
    EnchantTier { power: 1.7, required_auto_clickers: 300, cost: 2_000.0 },
    EnchantTier { power: 1.9, required_auto_clickers: 500, cost: 4_000.0 },
    EnchantTier { power: 2.1, required_auto_clickers: 1_000, cost: 8_000.0 },
];

/// Highest tier whose power does not exceed `power`. Off-table values fall to
/// the tier below them; anything under 1.0 is tier 0.
pub fn tier_index_for_power(power: f64) -> usize {
    ENCHANT_TIERS
        .iter()
        .rposition(|t| t.power <= power + 1e-9)
        .unwrap_or(0)
}

/// Result of trying to advance the enchant tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TierAdvance {
    Advanced { power: f64 },
    /// Not enough Auto Clickers for the next tier.
    Locked { required: u32, owned: u32 },
    InsufficientFunds { cost: f64 },
    /// Already at the top tier.
    Maxed,
}

/// The shop: counted generators plus the enchant tier.
#[derive(Clone, Debug, PartialEq)]
pub struct Registry {
    generators: Vec<Generator>,
    tier: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            generators: GeneratorKind::counted()
                .iter()
                .map(|k| Generator::new(*k))
                .collect(),
            tier: 0,
        }
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    pub fn get(&self, kind: GeneratorKind) -> Option<&Generator> {
        kind.slot().and_then(|i| self.generators.get(i))
    }

    pub fn count(&self, kind: GeneratorKind) -> u32 {
        self.get(kind).map_or(0, Generator::count)
    }

    pub fn tier(&self) -> usize {
        self.tier
    }

    pub fn multi_auto_click_power(&self) -> f64 {
        ENCHANT_TIERS[self.tier].power
    }

    pub fn next_tier(&self) -> Option<&EnchantTier> {
        ENCHANT_TIERS.get(self.tier + 1)
    }

    /// Quantity that would actually be bought and what it would cost.
    pub fn quote(&self, kind: GeneratorKind, quantity: u32) -> Option<(u32, f64)> {
        let g = self.get(kind)?;
        let quantity = g.allowed_quantity(quantity);
        if quantity == 0 {
            return None;
        }
        Some((quantity, g.quote(quantity)))
    }

    /// Buy `quantity` units, all or nothing. Returns false without touching
    /// state when the kind is uncounted, capped out, or unaffordable.
    pub fn purchase(&mut self, ledger: &mut Ledger, kind: GeneratorKind, quantity: u32) -> bool {
        let (Some(slot), Some((quantity, total))) = (kind.slot(), self.quote(kind, quantity)) else {
            tracing::debug!(kind = kind.name(), "purchase rejected: nothing to buy");
            return false;
        };
        if !ledger.try_debit(total) {
            tracing::debug!(kind = kind.name(), quantity, cost = total, "purchase rejected: insufficient funds");
            return false;
        }
        let g = &mut self.generators[slot];
        g.set_count(g.count.saturating_add(quantity));
        tracing::info!(kind = kind.name(), quantity, cost = total, count = g.count, "purchased");
        true
    }

    /// Buy as many as the balance and cap allow. Returns the quantity bought.
    pub fn purchase_max(&mut self, ledger: &mut Ledger, kind: GeneratorKind) -> u32 {
        let Some(g) = self.get(kind) else {
            return 0;
        };
        let affordable = cost::max_affordable(kind.base_cost(), GROWTH_RATE, g.count, ledger.balance());
        let quantity = g.allowed_quantity(affordable);
        if quantity > 0 && self.purchase(ledger, kind, quantity) {
            quantity
        } else {
            0
        }
    }

    /// Move the enchant multiplier one tier up, gated on Auto Clicker count.
    pub fn advance_tier(&mut self, ledger: &mut Ledger) -> TierAdvance {
        let Some(next) = self.next_tier().copied() else {
            return TierAdvance::Maxed;
        };
        let owned = self.count(GeneratorKind::AutoClicker);
        if owned < next.required_auto_clickers {
            tracing::debug!(owned, required = next.required_auto_clickers, "enchant tier locked");
            return TierAdvance::Locked {
                required: next.required_auto_clickers,
                owned,
            };
        }
        if !ledger.try_debit(next.cost) {
            return TierAdvance::InsufficientFunds { cost: next.cost };
        }
        self.tier += 1;
        tracing::info!(power = next.power, "enchant tier advanced");
        TierAdvance::Advanced { power: next.power }
    }

    /// Load counts and tier from persisted values, then re-derive every cost.
    pub fn restore(&mut self, counts: &[(GeneratorKind, u32)], tier: usize) {
        for (kind, count) in counts {
            if let Some(slot) = kind.slot() {
                self.generators[slot].set_count(*count);
            }
        }
        self.tier = tier.min(ENCHANT_TIERS.len() - 1);
        self.recompute_costs();
    }

    /// Re-derive every `next_unit_cost` from its count.
    pub fn recompute_costs(&mut self) {
        for g in &mut self.generators {
            g.recompute_cost();
        }
    }
}

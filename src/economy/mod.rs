//! Idle economy engine: one resource, counted generators, an enchant ladder,
//! lucky clicks, offline earnings and promo codes.
//!
//! [`Engine`] owns all state. The host calls its operations on user input and
//! on the 1-second tick, and reads it back to render. Every mutation ends with a
//! sanitizer pass, so the invariants hold between any two calls:
//! whole-unit totals, costs derived from counts, enchant power on its ladder.

pub mod config;
pub mod cost;
pub mod error;
pub mod generators;
pub mod ledger;
pub mod offline;
pub mod production;
pub mod promo;
pub mod sanitize;
pub mod save;

#[cfg(test)]
mod simulator;

use rand::rngs::SmallRng;
use rand::SeedableRng;

pub use config::EngineConfig;
pub use generators::{EnchantTier, Generator, GeneratorKind, TierAdvance};
pub use offline::OfflineReport;
pub use promo::PromoResult;
pub use save::Snapshot;

use generators::Registry;
use ledger::Ledger;
use offline::VisitClock;
use promo::{PromoLedger, Redemption};

pub struct Engine {
    config: EngineConfig,
    ledger: Ledger,
    registry: Registry,
    promo: PromoLedger,
    clock: VisitClock,
    total_clicks: u64,
    lucky_clicks: u64,
    rng: SmallRng,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = SmallRng::seed_from_u64(config.rng_seed);
        Self {
            config,
            ledger: Ledger::new(),
            registry: Registry::new(),
            promo: PromoLedger::new(),
            clock: VisitClock::default(),
            total_clicks: 0,
            lucky_clicks: 0,
            rng,
        }
    }

    // ── Reads ──────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn balance(&self) -> f64 {
        self.ledger.balance()
    }

    pub fn lifetime_earned(&self) -> f64 {
        self.ledger.lifetime_earned()
    }

    pub fn generators(&self) -> &[Generator] {
        self.registry.generators()
    }

    pub fn count(&self, kind: GeneratorKind) -> u32 {
        self.registry.count(kind)
    }

    /// Price of the next single unit; 0 for the uncounted enchant line.
    pub fn next_unit_cost(&self, kind: GeneratorKind) -> f64 {
        self.registry.get(kind).map_or(0.0, Generator::next_unit_cost)
    }

    /// Quantity a purchase would really buy (after caps) and its price.
    pub fn quote(&self, kind: GeneratorKind, quantity: u32) -> Option<(u32, f64)> {
        self.registry.quote(kind, quantity)
    }

    pub fn multi_auto_click_power(&self) -> f64 {
        self.registry.multi_auto_click_power()
    }

    pub fn enchant_tier(&self) -> usize {
        self.registry.tier()
    }

    pub fn next_enchant_tier(&self) -> Option<&EnchantTier> {
        self.registry.next_tier()
    }

    pub fn passive_rate(&self) -> f64 {
        production::passive_rate(&self.registry)
    }

    pub fn click_value(&self) -> f64 {
        production::click_value(&self.registry)
    }

    pub fn lucky_chance(&self) -> f64 {
        production::lucky_chance(&self.registry)
    }

    pub fn promo_codes(&self) -> impl Iterator<Item = &str> {
        self.promo.consumed()
    }

    pub fn last_visit_epoch(&self) -> Option<u64> {
        self.clock.last_visit_epoch()
    }

    pub fn total_clicks(&self) -> u64 {
        self.total_clicks
    }

    pub fn lucky_clicks(&self) -> u64 {
        self.lucky_clicks
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Buy `quantity` units of `kind`, all or nothing.
    pub fn purchase(&mut self, kind: GeneratorKind, quantity: u32) -> bool {
        let bought = self.registry.purchase(&mut self.ledger, kind, quantity);
        self.normalize();
        bought
    }

    /// Buy as many units of `kind` as the balance allows. Returns the quantity.
    pub fn purchase_max(&mut self, kind: GeneratorKind) -> u32 {
        let bought = self.registry.purchase_max(&mut self.ledger, kind);
        self.normalize();
        bought
    }

    pub fn advance_enchanted_tier(&mut self) -> TierAdvance {
        let outcome = self.registry.advance_tier(&mut self.ledger);
        self.normalize();
        outcome
    }

    /// One manual click. Returns the value produced, lucky bonus included.
    pub fn register_click(&mut self) -> f64 {
        let roll =
            production::roll_click(&self.registry, &mut self.rng, self.config.lucky_click_multiplier);
        self.ledger.credit(roll.value);
        self.total_clicks += 1;
        if roll.lucky {
            self.lucky_clicks += 1;
            tracing::debug!(value = roll.value, "lucky click");
        }
        self.normalize();
        roll.value
    }

    /// Credit `seconds` of passive income. Returns the whole units released.
    pub fn tick(&mut self, seconds: f64) -> f64 {
        if seconds.is_nan() || seconds <= 0.0 {
            return 0.0;
        }
        let released = self.ledger.credit(self.passive_rate() * seconds);
        self.normalize();
        released
    }

    pub fn apply_promo_code(&mut self, code: &str) -> PromoResult {
        let result = match self.promo.lookup(code) {
            Redemption::Empty => PromoResult::fail(promo::MSG_EMPTY),
            Redemption::Unknown => PromoResult::fail(promo::MSG_INVALID),
            Redemption::AlreadyUsed => PromoResult::fail(promo::MSG_ALREADY_USED),
            Redemption::Reset => {
                self.reset();
                PromoResult::ok(promo::MSG_RESET)
            }
            Redemption::Grant { amount, one_time } => {
                self.ledger.credit(amount);
                if let Some(code) = one_time {
                    self.promo.mark_used(&code);
                }
                PromoResult::ok(format!("Promo code applied: +{amount:.0}"))
            }
        };
        tracing::info!(success = result.success, message = %result.message, "promo code");
        self.normalize();
        result
    }

    /// Grant idle earnings for the time since the last visit. Call once at
    /// startup before the tick loop, and whenever the host detects a gap.
    pub fn reconcile_offline_progress(&mut self, now_ms: u64) -> OfflineReport {
        let rate = self.passive_rate();
        let report = offline::reconcile(
            &mut self.clock,
            &mut self.ledger,
            rate,
            now_ms,
            self.config.offline_min_seconds,
        );
        self.normalize();
        report
    }

    /// Stamp the visit clock. Called by the host before teardown.
    pub fn update_last_visit_time(&mut self, now_ms: u64) {
        self.clock.touch(now_ms);
    }

    /// Return every field to its first-launch value, promo ledger and visit
    /// clock included. The RNG stream and config survive.
    pub fn reset(&mut self) {
        self.ledger = Ledger::new();
        self.registry = Registry::new();
        self.promo = PromoLedger::new();
        self.clock = VisitClock::default();
        self.total_clicks = 0;
        self.lucky_clicks = 0;
        tracing::info!("engine reset");
    }

    pub fn snapshot(&self) -> Snapshot {
        save::extract(self)
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        save::apply(self, snapshot);
    }

    /// Sanitizer pass: whole-unit totals, costs re-derived from counts.
    fn normalize(&mut self) {
        self.ledger.sanitize();
        self.registry.recompute_costs();
    }
}

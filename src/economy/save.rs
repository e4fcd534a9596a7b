//! スナップショットのセーブ/ロード。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在の形式。フィールド追加時にインクリメントする。
//! - `LEGACY_VERSION`: `version` フィールドを持たない旧形式 (フラットなレコード)。
//!
//! セーブデータは拒否せず補正して読み込む。不足フィールドはデフォルト値、
//! 型の合わないフィールドはそのフィールドだけデフォルト値に戻す。
//! 数値は信用しない: 個数と合計は sanitizer を通し、`*_cost` は個数から再計算する。
//! エラーになるのは JSON オブジェクトとして読めないデータだけ。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::Result;
use super::generators::{tier_index_for_power, GeneratorKind};
use super::ledger::Ledger;
use super::offline::VisitClock;
use super::promo::PromoLedger;
use super::sanitize;
use super::Engine;

/// Current snapshot format.
pub const SAVE_VERSION: u32 = 1;

/// Version of a record written before snapshots carried `version`.
pub const LEGACY_VERSION: u32 = 0;

/// Flat persisted record of the whole engine.
///
/// Counts are stored as `f64` so drifted values from older writers
/// (`9.999999999`) are corrected on load instead of failing to parse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Missing in legacy records, which read as [`LEGACY_VERSION`].
    pub version: u32,
    pub balance: f64,
    pub lifetime_earned: f64,

    pub click_power: f64,
    pub click_power_cost: f64,
    pub auto_clicker: f64,
    pub auto_clicker_cost: f64,
    pub friendly_enderman: f64,
    pub friendly_enderman_cost: f64,
    pub allay: f64,
    pub allay_cost: f64,
    pub lucky_cat: f64,
    pub lucky_cat_cost: f64,
    pub pirate_parrot: f64,
    pub pirate_parrot_cost: f64,
    pub fox: f64,
    pub fox_cost: f64,

    pub multi_auto_click_power: f64,
    pub consumed_promo_codes: Vec<String>,
    /// Epoch milliseconds.
    pub last_visit_epoch: Option<u64>,

    pub total_clicks: u64,
    pub lucky_clicks: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: LEGACY_VERSION,
            balance: 0.0,
            lifetime_earned: 0.0,
            click_power: GeneratorKind::ClickPower.initial_count() as f64,
            click_power_cost: 0.0,
            auto_clicker: 0.0,
            auto_clicker_cost: 0.0,
            friendly_enderman: 0.0,
            friendly_enderman_cost: 0.0,
            allay: 0.0,
            allay_cost: 0.0,
            lucky_cat: 0.0,
            lucky_cat_cost: 0.0,
            pirate_parrot: 0.0,
            pirate_parrot_cost: 0.0,
            fox: 0.0,
            fox_cost: 0.0,
            multi_auto_click_power: 1.0,
            consumed_promo_codes: Vec::new(),
            last_visit_epoch: None,
            total_clicks: 0,
            lucky_clicks: 0,
        }
    }
}

impl Snapshot {
    /// `(kind, count, cost)` for every counted generator.
    fn generator_fields(&self) -> [(GeneratorKind, f64, f64); 7] {
        [
            (GeneratorKind::ClickPower, self.click_power, self.click_power_cost),
            (GeneratorKind::AutoClicker, self.auto_clicker, self.auto_clicker_cost),
            (GeneratorKind::FriendlyEnderman, self.friendly_enderman, self.friendly_enderman_cost),
            (GeneratorKind::Allay, self.allay, self.allay_cost),
            (GeneratorKind::LuckyCat, self.lucky_cat, self.lucky_cat_cost),
            (GeneratorKind::PirateParrot, self.pirate_parrot, self.pirate_parrot_cost),
            (GeneratorKind::Fox, self.fox, self.fox_cost),
        ]
    }

    fn set_generator(&mut self, kind: GeneratorKind, count: f64, cost: f64) {
        let (c, k) = match kind {
            GeneratorKind::ClickPower => (&mut self.click_power, &mut self.click_power_cost),
            GeneratorKind::AutoClicker => (&mut self.auto_clicker, &mut self.auto_clicker_cost),
            GeneratorKind::FriendlyEnderman => {
                (&mut self.friendly_enderman, &mut self.friendly_enderman_cost)
            }
            GeneratorKind::Allay => (&mut self.allay, &mut self.allay_cost),
            GeneratorKind::LuckyCat => (&mut self.lucky_cat, &mut self.lucky_cat_cost),
            GeneratorKind::PirateParrot => (&mut self.pirate_parrot, &mut self.pirate_parrot_cost),
            GeneratorKind::Fox => (&mut self.fox, &mut self.fox_cost),
            GeneratorKind::EnchantedAutoClick => return,
        };
        *c = count;
        *k = cost;
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot, coercing whatever can be coerced.
    ///
    /// Fields are merged one at a time over [`Snapshot::default`]; a field whose
    /// value has the wrong type keeps its default instead of failing the load.
    pub fn from_json(json: &str) -> Result<Self> {
        let fields: Map<String, Value> = serde_json::from_str(json)?;
        let mut merged = match serde_json::to_value(Snapshot::default())? {
            Value::Object(defaults) => defaults,
            _ => Map::new(),
        };
        for (key, value) in fields {
            // 未知フィールドは無視 (新しいバージョンのデータ)
            if !merged.contains_key(&key) {
                continue;
            }
            let previous = merged.insert(key.clone(), value);
            if serde_json::from_value::<Snapshot>(Value::Object(merged.clone())).is_err() {
                tracing::warn!(field = %key, "snapshot field has the wrong type, using default");
                if let Some(previous) = previous {
                    merged.insert(key, previous);
                }
            }
        }
        let snapshot: Snapshot = serde_json::from_value(Value::Object(merged))?;

        if snapshot.version < SAVE_VERSION {
            tracing::info!(
                saved = snapshot.version,
                current = SAVE_VERSION,
                "migrating older snapshot"
            );
        } else if snapshot.version > SAVE_VERSION {
            tracing::warn!(
                saved = snapshot.version,
                current = SAVE_VERSION,
                "snapshot is newer than this build, unknown fields dropped"
            );
        }
        Ok(snapshot)
    }
}

/// Capture the engine as a snapshot.
pub fn extract(engine: &Engine) -> Snapshot {
    let mut snapshot = Snapshot {
        version: SAVE_VERSION,
        balance: engine.ledger.balance(),
        lifetime_earned: engine.ledger.lifetime_earned(),
        multi_auto_click_power: engine.registry.multi_auto_click_power(),
        consumed_promo_codes: engine.promo.consumed().map(str::to_owned).collect(),
        last_visit_epoch: engine.clock.last_visit_epoch(),
        total_clicks: engine.total_clicks,
        lucky_clicks: engine.lucky_clicks,
        ..Snapshot::default()
    };
    for g in engine.registry.generators() {
        snapshot.set_generator(g.kind, g.count() as f64, g.next_unit_cost());
    }
    snapshot
}

/// Overwrite the engine from a snapshot, coercing it back into shape.
pub fn apply(engine: &mut Engine, snapshot: &Snapshot) {
    engine.ledger = Ledger::restored(snapshot.balance, snapshot.lifetime_earned);

    let counts: Vec<(GeneratorKind, u32)> = snapshot
        .generator_fields()
        .iter()
        .map(|(kind, count, _)| (*kind, sanitize::whole(*count) as u32))
        .collect();
    let tier = tier_index_for_power(sanitize::power(snapshot.multi_auto_click_power));
    engine.registry.restore(&counts, tier);

    for (kind, _, stored_cost) in snapshot.generator_fields() {
        let derived = engine.registry.get(kind).map_or(0.0, |g| g.next_unit_cost());
        if stored_cost != derived {
            tracing::debug!(kind = kind.name(), stored_cost, derived, "stored cost replaced");
        }
    }

    engine.promo = PromoLedger::restored(&snapshot.consumed_promo_codes);
    engine.clock = VisitClock::new(snapshot.last_visit_epoch);
    engine.total_clicks = snapshot.total_clicks;
    engine.lucky_clicks = snapshot.lucky_clicks.min(snapshot.total_clicks);
    engine.normalize();
}

/// localStorage access. Only available in the browser.
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Write the engine to localStorage. Failures are logged to the console and ignored.
#[cfg(target_arch = "wasm32")]
pub fn save_game(engine: &Engine) {
    let json = match extract(engine).to_json() {
        Ok(j) => j,
        Err(e) => {
            web_sys::console::warn_1(&format!("allay-clicker: snapshot encode failed: {e}").into());
            return;
        }
    };

    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(super::config::STORAGE_KEY, &json) {
            web_sys::console::warn_1(
                &format!("allay-clicker: localStorage write failed: {e:?}").into(),
            );
        }
    }
}

/// localStorage からロードする。セーブが無い、または JSON オブジェクトとして
/// 読めない場合は false (新規ゲーム) を返し、読めないセーブは削除する。
#[cfg(target_arch = "wasm32")]
pub fn load_game(engine: &mut Engine) -> bool {
    let Some(storage) = get_storage() else {
        return false;
    };
    let json = match storage.get_item(super::config::STORAGE_KEY) {
        Ok(Some(j)) => j,
        _ => return false,
    };

    match Snapshot::from_json(&json) {
        Ok(snapshot) => {
            engine.restore(&snapshot);
            true
        }
        Err(e) => {
            web_sys::console::warn_1(
                &format!("allay-clicker: discarding unusable save: {e}").into(),
            );
            let _ = storage.remove_item(super::config::STORAGE_KEY);
            false
        }
    }
}

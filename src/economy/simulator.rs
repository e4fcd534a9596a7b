//! バランスシミュレーター: 貪欲プレイヤーがエンジンを数時間分プレイする。
//! 実行: cargo test simulate_greedy -- --nocapture

#[cfg(test)]
mod tests {
    use crate::economy::production;
    use crate::economy::{Engine, EngineConfig, GeneratorKind, TierAdvance};

    /// Clicks per simulated second while the player is active.
    const CLICKS_PER_SEC: u32 = 3;

    /// Income gained per second by one more unit of `kind`.
    fn marginal_gain(engine: &Engine, kind: GeneratorKind) -> f64 {
        let n = engine.count(kind);
        match kind {
            GeneratorKind::ClickPower => {
                let now = production::effective_rate(n, 1.0);
                let next = production::effective_rate(n + 1, 1.0);
                (next - now) * CLICKS_PER_SEC as f64
            }
            GeneratorKind::Allay => engine.passive_rate() * 0.2 / (1.0 + 0.2 * n as f64),
            // One more cat adds 10% chance of a click worth 9 extra clicks.
            GeneratorKind::LuckyCat if n < 10 => engine.click_value() * 0.9 * CLICKS_PER_SEC as f64,
            GeneratorKind::LuckyCat => 0.0,
            _ => {
                let base = kind.base_production();
                let now = production::effective_rate(n, base);
                let next = production::effective_rate(n + 1, base);
                next - now
            }
        }
    }

    /// Shortest payback among affordable single-unit buys.
    fn best_purchase(engine: &Engine) -> Option<GeneratorKind> {
        GeneratorKind::counted()
            .iter()
            .filter(|k| engine.next_unit_cost(**k) <= engine.balance())
            .filter_map(|k| {
                let gain = marginal_gain(engine, *k);
                (gain > 0.0).then(|| (engine.next_unit_cost(*k) / gain, *k))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, k)| k)
    }

    fn run(seconds: u32) -> Engine {
        let mut engine = Engine::new(EngineConfig::with_seed(2024));
        let mut lifetime = 0.0;
        for _ in 0..seconds {
            for _ in 0..CLICKS_PER_SEC {
                engine.register_click();
            }
            engine.tick(1.0);
            while matches!(engine.advance_enchanted_tier(), TierAdvance::Advanced { .. }) {}
            while let Some(kind) = best_purchase(&engine) {
                assert!(engine.purchase(kind, 1));
            }

            assert!(engine.balance() >= 0.0);
            assert!(engine.lifetime_earned() >= lifetime);
            lifetime = engine.lifetime_earned();
            assert!(engine.count(GeneratorKind::LuckyCat) <= 10);
            for g in engine.generators() {
                assert_eq!(g.next_unit_cost(), g.quote(1));
            }
        }
        engine
    }

    #[test]
    fn simulate_greedy_one_hour() {
        let engine = run(3_600);
        println!(
            "after 1h: balance={} lifetime={} rate={:.1}/s power={}",
            engine.balance(),
            engine.lifetime_earned(),
            engine.passive_rate(),
            engine.multi_auto_click_power()
        );
        for g in engine.generators() {
            println!("  {:<18} {:>5}  next {}", g.kind.name(), g.count(), g.next_unit_cost());
        }
        assert!(engine.count(GeneratorKind::AutoClicker) > 0);
        assert!(engine.passive_rate() > 0.0);
    }

    #[test]
    fn simulate_greedy_snapshot_survives() {
        let engine = run(600);
        let json = engine.snapshot().to_json().unwrap();
        let mut restored = Engine::new(EngineConfig::default());
        restored.restore(&crate::economy::Snapshot::from_json(&json).unwrap());
        assert_eq!(restored.snapshot(), engine.snapshot());
        assert_eq!(restored.passive_rate(), engine.passive_rate());
    }
}

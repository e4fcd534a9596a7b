//! Closed-form geometric cost series shared by every counted generator.

use super::sanitize;

/// Total price of `quantity` units bought starting at `start_level` owned.
///
/// The unit at level `k` costs `base · (1+growth)^k`; the sum over
/// `start_level .. start_level+quantity` is evaluated in closed form and floored.
/// Exponents are taken as `f64`: past the representable range the price is
/// `+inf`, which no balance can pay.
pub fn cost(base: f64, growth: f64, quantity: u32, start_level: u32) -> f64 {
    if quantity == 0 {
        return 0.0;
    }
    let r = 1.0 + growth;
    let first = base * r.powf(start_level as f64);
    if quantity == 1 {
        return sanitize::whole(first);
    }
    if growth == 0.0 {
        return sanitize::whole(first * quantity as f64);
    }
    sanitize::whole(first * (r.powf(quantity as f64) - 1.0) / (r - 1.0))
}

/// Largest quantity whose [`cost`] from `start_level` fits in `budget`.
pub fn max_affordable(base: f64, growth: f64, start_level: u32, budget: f64) -> u32 {
    if budget < cost(base, growth, 1, start_level) {
        return 0;
    }
    let r = 1.0 + growth;
    let first = base * r.powf(start_level as f64);
    let estimate = if growth == 0.0 {
        budget / first
    } else {
        (1.0 + budget * (r - 1.0) / first).ln() / r.ln()
    };
    if !estimate.is_finite() {
        return 0;
    }

    // 推定値は切り捨てを無視しているので、正確な境界まで歩いて合わせる
    let mut n = (estimate.floor() as u32).max(1);
    while n > 1 && cost(base, growth, n, start_level) > budget {
        n -= 1;
    }
    while n < u32::MAX && cost(base, growth, n + 1, start_level) <= budget {
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quantity_is_free() {
        assert_eq!(cost(50.0, 0.15, 0, 7), 0.0);
    }

    #[test]
    fn single_unit_at_level_zero_is_base() {
        assert_eq!(cost(10.0, 0.15, 1, 0), 10.0);
    }

    #[test]
    fn single_unit_scales_with_level() {
        // 10 · 1.15 = 11.5
        assert_eq!(cost(10.0, 0.15, 1, 1), 11.0);
        // 50 · 1.15^10 = 202.27...
        assert_eq!(cost(50.0, 0.15, 1, 10), 202.0);
    }

    #[test]
    fn ten_units_from_zero() {
        assert_eq!(cost(50.0, 0.15, 10, 0), 1015.0);
    }

    #[test]
    fn zero_growth_is_linear() {
        assert_eq!(cost(25.0, 0.0, 4, 3), 100.0);
    }

    #[test]
    fn max_affordable_matches_scenario_budget() {
        // 1015 buys exactly ten from zero; one less buys nine.
        assert_eq!(max_affordable(50.0, 0.15, 0, 1015.0), 10);
        assert_eq!(max_affordable(50.0, 0.15, 0, 1014.0), 9);
    }

    #[test]
    fn huge_quantity_is_unaffordable() {
        let price = cost(50.0, 0.15, 1 << 31, 0);
        assert!(price.is_infinite() && price > 0.0);
        assert_eq!(cost(50.0, 0.15, u32::MAX, 0), f64::INFINITY);
    }

    #[test]
    fn huge_level_never_drops_below_base() {
        assert_eq!(cost(50.0, 0.15, 1, u32::MAX), f64::INFINITY);
        assert!(cost(50.0, 0.15, 1, 1 << 31) >= 50.0);
        assert_eq!(max_affordable(50.0, 0.15, u32::MAX, 1e300), 0);
    }

    #[test]
    fn max_affordable_zero_when_broke() {
        assert_eq!(max_affordable(50.0, 0.15, 0, 49.0), 0);
    }
}

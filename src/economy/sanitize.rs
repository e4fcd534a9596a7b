//! Floating-point drift correction.
//!
//! Every whole-unit quantity is passed through [`whole`] after arithmetic, so
//! `9.999999999` becomes `10` instead of flooring to `9`. Both functions are
//! idempotent: `whole(whole(x)) == whole(x)`.

/// Relative distance to the nearest integer that still counts as drift.
const DRIFT_TOLERANCE: f64 = 1e-9;

/// Snap `x` to the nearest integer when it is within drift tolerance.
fn snap(x: f64) -> f64 {
    let nearest = x.round();
    if (x - nearest).abs() <= DRIFT_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else {
        x
    }
}

/// Correct drift, then floor. Negative and NaN inputs collapse to zero.
pub fn whole(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    snap(x).floor().max(0.0)
}

/// Correct drift, then round to two decimals (tier multipliers).
pub fn power(x: f64) -> f64 {
    if !x.is_finite() {
        return 1.0;
    }
    (snap(x * 100.0)).round() / 100.0
}

/// Split an amount into its whole part and the leftover fraction in `[0, 1)`.
pub fn split_whole(x: f64) -> (f64, f64) {
    let w = whole(x);
    // 切り上げスナップ (9.9999999 → 10) で余りがわずかに負になる
    let rest = (x - w).max(0.0);
    if rest < 1.0 {
        (w, rest)
    } else {
        (w, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_drift_up() {
        assert_eq!(whole(9.999999999), 10.0);
        assert_eq!(whole(1014.9999999999), 1015.0);
    }

    #[test]
    fn floors_real_fractions() {
        assert_eq!(whole(9.5), 9.0);
        assert_eq!(whole(1.15), 1.0);
    }

    #[test]
    fn negative_and_nan_become_zero() {
        assert_eq!(whole(-3.2), 0.0);
        assert_eq!(whole(f64::NAN), 0.0);
    }

    #[test]
    fn power_rounds_to_two_places() {
        assert_eq!(power(1.1499999999), 1.15);
        assert_eq!(power(1.3000000001), 1.3);
        assert_eq!(power(2.1), 2.1);
        assert_eq!(power(f64::NAN), 1.0);
    }

    #[test]
    fn split_keeps_fraction() {
        let (w, rest) = split_whole(2.3);
        assert_eq!(w, 2.0);
        assert!((rest - 0.3).abs() < 1e-9);

        let (w, rest) = split_whole(2.99999999999);
        assert_eq!(w, 3.0);
        assert_eq!(rest, 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_whole_is_idempotent(x in -1e15f64..1e15) {
            prop_assert_eq!(whole(whole(x)), whole(x));
        }

        #[test]
        fn prop_whole_is_integral_and_nonneg(x in -1e15f64..1e15) {
            let w = whole(x);
            prop_assert!(w >= 0.0);
            prop_assert_eq!(w, w.floor());
        }

        #[test]
        fn prop_power_is_idempotent(x in 0.5f64..5.0) {
            prop_assert_eq!(power(power(x)), power(x));
        }

        #[test]
        fn prop_split_reassembles(x in 0.0f64..1e9) {
            let (w, rest) = split_whole(x);
            prop_assert!((0.0..1.0).contains(&rest));
            prop_assert!((w + rest - x).abs() <= 1e-6 * x.max(1.0));
        }
    }
}

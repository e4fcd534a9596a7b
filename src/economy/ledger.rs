//! 残高と累計獲得量。

use super::sanitize;

/// Spendable balance plus the all-time total.
///
/// Both totals are whole units. Fractional income (1.15 per click, 2.3 per
/// second, ...) waits in `carry` until it adds up to a whole unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    balance: f64,
    lifetime_earned: f64,
    carry: f64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore persisted totals. Drift is removed; the carry starts empty.
    pub fn restored(balance: f64, lifetime_earned: f64) -> Self {
        let mut ledger = Self {
            balance,
            lifetime_earned,
            carry: 0.0,
        };
        ledger.sanitize();
        ledger
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn lifetime_earned(&self) -> f64 {
        self.lifetime_earned
    }

    /// Credit income to both totals. Returns the whole units released.
    pub fn credit(&mut self, amount: f64) -> f64 {
        if amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        let (released, rest) = sanitize::split_whole(self.carry + amount);
        self.carry = rest;
        self.balance = sanitize::whole(self.balance + released);
        self.lifetime_earned = sanitize::whole(self.lifetime_earned + released);
        released
    }

    /// Debit `cost` if the balance covers it. Leaves the ledger untouched otherwise.
    pub fn try_debit(&mut self, cost: f64) -> bool {
        if cost.is_nan() || cost < 0.0 || self.balance < cost {
            return false;
        }
        self.balance = sanitize::whole(self.balance - cost);
        true
    }

    pub fn sanitize(&mut self) {
        self.balance = sanitize::whole(self.balance);
        self.lifetime_earned = sanitize::whole(self.lifetime_earned);
        if !(0.0..1.0).contains(&self.carry) {
            self.carry = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_credit_accumulates() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.credit(0.6), 0.0);
        assert_eq!(ledger.balance(), 0.0);
        assert_eq!(ledger.credit(0.6), 1.0);
        assert_eq!(ledger.balance(), 1.0);
        assert_eq!(ledger.lifetime_earned(), 1.0);
    }

    #[test]
    fn debit_leaves_lifetime_alone() {
        let mut ledger = Ledger::restored(100.0, 500.0);
        assert!(ledger.try_debit(40.0));
        assert_eq!(ledger.balance(), 60.0);
        assert_eq!(ledger.lifetime_earned(), 500.0);
    }

    #[test]
    fn overdraft_is_rejected() {
        let mut ledger = Ledger::restored(10.0, 10.0);
        let before = ledger.clone();
        assert!(!ledger.try_debit(11.0));
        assert_eq!(ledger, before);
    }

    #[test]
    fn restore_removes_drift() {
        let ledger = Ledger::restored(9.999999999, -4.0);
        assert_eq!(ledger.balance(), 10.0);
        assert_eq!(ledger.lifetime_earned(), 0.0);
    }

    #[test]
    fn non_positive_credit_is_ignored() {
        let mut ledger = Ledger::restored(5.0, 5.0);
        assert_eq!(ledger.credit(-3.0), 0.0);
        assert_eq!(ledger.credit(f64::NAN), 0.0);
        assert_eq!(ledger.balance(), 5.0);
    }
}

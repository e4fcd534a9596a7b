//! Promo codes: special (case-sensitive), repeatable, and one-time codes.

use std::collections::BTreeSet;

/// Base of the whale-sized rewards.
const BIG_REWARD_BASE: f64 = 1_000_000.0;

/// Case-insensitive, repeatable.
const JACKPOT_CODE: &str = "JACKPOT";
const JACKPOT_REWARD: f64 = 1_000_000.0;

/// Case-sensitive code that wipes the save.
const RESET_CODE: &str = "Dead";

/// Case-sensitive, repeatable: (code, exponent of `BIG_REWARD_BASE`).
const BIG_CODES: [(&str, i32); 2] = [("Whale", 2), ("Leviathan", 3)];

/// One-time codes, keyed upper-case.
const ONE_TIME_CODES: [(&str, f64); 5] = [
    ("PROMO10", 10.0),
    ("PROMO50", 50.0),
    ("WELCOME", 100.0),
    ("ENDERMAN", 250.0),
    ("ALLAY", 500.0),
];

pub const MSG_EMPTY: &str = "Please enter a promo code";
pub const MSG_ALREADY_USED: &str = "Promo code already used";
pub const MSG_INVALID: &str = "Invalid promo code";
pub const MSG_RESET: &str = "Progress reset";

/// Outcome handed back to the UI.
#[derive(Clone, Debug, PartialEq)]
pub struct PromoResult {
    pub success: bool,
    pub message: String,
}

impl PromoResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// What a code resolves to, before any state is touched.
#[derive(Clone, Debug, PartialEq)]
pub enum Redemption {
    Reset,
    /// `one_time` holds the normalized code to record once applied.
    Grant { amount: f64, one_time: Option<String> },
    AlreadyUsed,
    Empty,
    Unknown,
}

/// Upper-cased codes already redeemed in this save.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PromoLedger {
    consumed: BTreeSet<String>,
}

impl PromoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restored<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            consumed: codes
                .into_iter()
                .map(|c| normalize(c.as_ref()))
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn consumed(&self) -> impl Iterator<Item = &str> {
        self.consumed.iter().map(String::as_str)
    }

    pub fn is_used(&self, code: &str) -> bool {
        self.consumed.contains(&normalize(code))
    }

    pub fn mark_used(&mut self, code: &str) {
        self.consumed.insert(normalize(code));
    }

    /// Classify `code` without side effects.
    pub fn lookup(&self, code: &str) -> Redemption {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Redemption::Empty;
        }
        if trimmed == RESET_CODE {
            return Redemption::Reset;
        }
        if let Some((_, exp)) = BIG_CODES.iter().find(|(c, _)| *c == trimmed) {
            return Redemption::Grant {
                amount: BIG_REWARD_BASE.powi(*exp),
                one_time: None,
            };
        }

        let upper = normalize(trimmed);
        if upper == JACKPOT_CODE {
            return Redemption::Grant {
                amount: JACKPOT_REWARD,
                one_time: None,
            };
        }
        match ONE_TIME_CODES.iter().find(|(c, _)| *c == upper) {
            Some(_) if self.consumed.contains(&upper) => Redemption::AlreadyUsed,
            Some((_, amount)) => Redemption::Grant {
                amount: *amount,
                one_time: Some(upper),
            },
            None => Redemption::Unknown,
        }
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_empty() {
        let ledger = PromoLedger::new();
        assert_eq!(ledger.lookup(""), Redemption::Empty);
        assert_eq!(ledger.lookup("   \t"), Redemption::Empty);
    }

    #[test]
    fn reset_code_is_case_sensitive() {
        let ledger = PromoLedger::new();
        assert_eq!(ledger.lookup("Dead"), Redemption::Reset);
        assert_eq!(ledger.lookup("DEAD"), Redemption::Unknown);
        assert_eq!(ledger.lookup("dead"), Redemption::Unknown);
    }

    #[test]
    fn big_codes_are_powers_of_base() {
        let ledger = PromoLedger::new();
        assert_eq!(
            ledger.lookup("Whale"),
            Redemption::Grant { amount: 1e12, one_time: None }
        );
        assert_eq!(
            ledger.lookup("Leviathan"),
            Redemption::Grant { amount: 1e18, one_time: None }
        );
        assert_eq!(ledger.lookup("whale"), Redemption::Unknown);
    }

    #[test]
    fn jackpot_ignores_case() {
        let ledger = PromoLedger::new();
        for code in ["jackpot", "JackPot", " JACKPOT "] {
            assert_eq!(
                ledger.lookup(code),
                Redemption::Grant { amount: 1_000_000.0, one_time: None }
            );
        }
    }

    #[test]
    fn one_time_code_normalizes() {
        let ledger = PromoLedger::new();
        assert_eq!(
            ledger.lookup("promo10"),
            Redemption::Grant { amount: 10.0, one_time: Some("PROMO10".into()) }
        );
    }

    #[test]
    fn used_code_reports_already_used() {
        let mut ledger = PromoLedger::new();
        ledger.mark_used("Promo10");
        assert!(ledger.is_used("PROMO10"));
        assert_eq!(ledger.lookup("PROMO10"), Redemption::AlreadyUsed);
        assert_eq!(ledger.lookup("promo10"), Redemption::AlreadyUsed);
    }

    #[test]
    fn unknown_code() {
        assert_eq!(PromoLedger::new().lookup("FREESTUFF"), Redemption::Unknown);
    }

    #[test]
    fn restored_ledger_normalizes_and_drops_blanks() {
        let ledger = PromoLedger::restored(["welcome", " ", "Allay"]);
        let codes: Vec<&str> = ledger.consumed().collect();
        assert_eq!(codes, vec!["ALLAY", "WELCOME"]);
    }
}

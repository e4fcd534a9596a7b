//! ゲームを閉じていた間の放置収入。
//!
//! 付与の有無にかかわらず呼び出しごとに訪問時刻を進めるので、
//! 同じ実時間の区間が二重に支払われることはない。

use super::ledger::Ledger;
use super::sanitize;

/// What an offline reconciliation granted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OfflineReport {
    pub earned: f64,
    pub seconds_away: u64,
}

/// Epoch milliseconds of the last save/close. `None` before the first run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisitClock {
    last_visit_epoch: Option<u64>,
}

impl VisitClock {
    pub fn new(last_visit_epoch: Option<u64>) -> Self {
        Self { last_visit_epoch }
    }

    pub fn last_visit_epoch(&self) -> Option<u64> {
        self.last_visit_epoch
    }

    pub fn touch(&mut self, now_ms: u64) {
        self.last_visit_epoch = Some(now_ms);
    }
}

/// Credit `rate · seconds_away` when the absence reaches `min_seconds`.
/// A clock that runs backwards counts as no absence.
pub fn reconcile(
    clock: &mut VisitClock,
    ledger: &mut Ledger,
    rate: f64,
    now_ms: u64,
    min_seconds: u64,
) -> OfflineReport {
    let last = clock.last_visit_epoch;
    clock.touch(now_ms);

    let Some(last) = last else {
        tracing::debug!("first run: visit clock started");
        return OfflineReport::default();
    };
    let seconds_away = now_ms.saturating_sub(last) / 1000;
    if seconds_away < min_seconds {
        return OfflineReport::default();
    }

    let earned = sanitize::whole(rate * seconds_away as f64);
    ledger.credit(earned);
    tracing::info!(seconds_away, earned, "offline progress credited");
    OfflineReport {
        earned,
        seconds_away,
    }
}

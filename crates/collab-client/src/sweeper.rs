//! Presence sweeper
//!
//! Periodically evicts typing entries whose stop signal never arrived and
//! marks users offline when nothing has been heard from them for too long.
//! Room membership is never swept; only server broadcasts remove members.

use chrono::{DateTime, Utc};
use collab_common::PresenceConfig;
use collab_core::{SharedLedger, SweepReport};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Staleness sweep over a shared ledger
#[derive(Debug, Clone)]
pub struct PresenceSweeper {
    ledger: SharedLedger,
    typing_ttl: chrono::Duration,
    presence_ttl: chrono::Duration,
    every: Duration,
}

impl PresenceSweeper {
    pub fn new(
        ledger: SharedLedger,
        typing_ttl: Duration,
        presence_ttl: Duration,
        every: Duration,
    ) -> Self {
        Self {
            ledger,
            typing_ttl: to_chrono(typing_ttl),
            presence_ttl: to_chrono(presence_ttl),
            every,
        }
    }

    pub fn from_config(ledger: SharedLedger, config: &PresenceConfig) -> Self {
        Self::new(
            ledger,
            config.typing_ttl(),
            config.presence_ttl(),
            config.sweep_interval(),
        )
    }

    /// Run both sweeps once as of `now`
    pub fn sweep_once(&self, now: DateTime<Utc>) -> SweepReport {
        let report = self.ledger.sweep(now, self.typing_ttl, self.presence_ttl);
        if !report.is_empty() {
            tracing::debug!(
                typing_evicted = report.typing_evicted,
                presence_expired = report.presence_expired.len(),
                "Swept stale presence"
            );
        }
        report
    }

    /// Sweep on an interval until `cancel` fires
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        self.sweep_once(Utc::now());
                    }
                }
            }
            tracing::debug!("Presence sweeper stopped");
        })
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

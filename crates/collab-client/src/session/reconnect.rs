//! Reconnect backoff

use collab_common::ReconnectConfig;
use rand::Rng;
use std::time::Duration;

/// Bounded exponential backoff with jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub max: Duration,
}

impl ReconnectPolicy {
    /// Jitter spread around the nominal delay (±50%)
    const JITTER: f64 = 0.5;

    #[must_use]
    pub fn new(max_attempts: u32, base: Duration, max: Duration) -> Self {
        Self {
            max_attempts,
            base,
            max: max.max(base),
        }
    }

    /// Nominal delay before `attempt` (1-based), without jitter
    #[must_use]
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base
            .saturating_mul(1u32 << exponent)
            .min(self.max)
    }

    /// Delay before `attempt` scaled by `factor`, clamped to `[base, max]`
    ///
    /// `factor` is expected in `[0.5, 1.5]`.
    #[must_use]
    pub fn delay_with_jitter(&self, attempt: u32, factor: f64) -> Duration {
        self.nominal_delay(attempt)
            .mul_f64(factor.max(0.0))
            .clamp(self.base, self.max)
    }

    /// Delay before `attempt` with random jitter
    #[must_use]
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let factor = rand::thread_rng().gen_range(1.0 - Self::JITTER..=1.0 + Self::JITTER);
        self.delay_with_jitter(attempt, factor)
    }

    /// Check if retry number `attempt` (1-based) is allowed
    #[must_use]
    pub fn allows(&self, attempt: u32) -> bool {
        attempt <= self.max_attempts
    }
}

impl From<&ReconnectConfig> for ReconnectPolicy {
    fn from(config: &ReconnectConfig) -> Self {
        Self::new(config.max_attempts, config.delay(), config.delay_max())
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from(&ReconnectConfig::default())
    }
}

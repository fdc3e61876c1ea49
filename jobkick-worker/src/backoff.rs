//! Retry delays for the worker loop
//!
//! Every wait in the loop belongs to a [`DelayClass`] with its own base delay.
//! Consecutive failure waits grow exponentially up to a cap; idle waits stay at
//! their base since a 204 means the service is healthy. All waits are spread
//! with random jitter so a pool of workers does not poll in lockstep.

use rand::Rng;
use std::time::Duration;

/// Why a worker is about to wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayClass {
    /// Claim call failed in transport or answered an unexpected status
    ClaimError,
    /// Trigger call failed in transport
    TriggerError,
    /// Queue answered 204, nothing to do
    Idle,
}

impl DelayClass {
    const ALL: [DelayClass; 3] = [Self::ClaimError, Self::TriggerError, Self::Idle];

    /// Delay before the first retry of this class
    pub fn base(self) -> Duration {
        match self {
            Self::ClaimError => Duration::from_secs(2),
            Self::TriggerError => Duration::from_secs(1),
            Self::Idle => Duration::from_secs(10),
        }
    }

    /// Whether consecutive waits of this class grow
    pub fn grows(self) -> bool {
        !matches!(self, Self::Idle)
    }

    fn index(self) -> usize {
        match self {
            Self::ClaimError => 0,
            Self::TriggerError => 1,
            Self::Idle => 2,
        }
    }

    /// Largest base delay over all classes
    pub fn largest_base() -> Duration {
        Self::ALL
            .iter()
            .map(|class| class.base())
            .max()
            .unwrap_or_default()
    }
}

/// Largest accepted jitter fraction
pub const MAX_JITTER: f64 = 0.5;

/// Growth, cap and jitter applied to the base delays
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Factor applied for each further consecutive wait of the same class
    pub multiplier: f64,
    /// Upper bound of any single wait, jitter included
    pub max_delay: Duration,
    /// Fraction of the delay added or removed at random (0.1 = ±10%), at most [`MAX_JITTER`]
    pub jitter: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            multiplier: 2.0,
            max_delay: Duration::from_secs(60),
            jitter: 0.1,
        }
    }
}

impl BackoffPolicy {
    /// Fixed cadence: every wait is exactly its class base delay
    #[cfg(test)]
    pub fn fixed() -> Self {
        Self {
            multiplier: 1.0,
            max_delay: DelayClass::largest_base(),
            jitter: 0.0,
        }
    }

    /// Un-jittered delay for the `attempt`-th consecutive wait (1-based)
    pub fn delay_for(&self, class: DelayClass, attempt: u32) -> Duration {
        if !class.grows() {
            return class.base().min(self.max_delay);
        }

        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = class.base().as_secs_f64() * self.multiplier.powi(exponent);

        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }

        Duration::from_secs_f64(secs)
    }

    /// Spreads a delay by up to ±`jitter`, clamped to `[0, max_delay]`
    pub fn jittered<R: Rng + ?Sized>(&self, delay: Duration, rng: &mut R) -> Duration {
        if self.jitter <= 0.0 || delay.is_zero() {
            return delay;
        }

        let factor = 1.0 + rng.random_range(-self.jitter..=self.jitter);
        let secs = (delay.as_secs_f64() * factor).max(0.0);

        Duration::from_secs_f64(secs).min(self.max_delay)
    }

    /// Validates the policy
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            anyhow::bail!("backoff multiplier must be a finite number >= 1.0");
        }

        if !(0.0..=MAX_JITTER).contains(&self.jitter) {
            anyhow::bail!("jitter must be between 0.0 and {}", MAX_JITTER);
        }

        if self.max_delay < DelayClass::largest_base() {
            anyhow::bail!(
                "max backoff must be at least {:?}",
                DelayClass::largest_base()
            );
        }

        Ok(())
    }
}

/// Per-worker streak tracker
///
/// A wait of one class resets the streaks of the other classes; a claimed
/// job resets everything.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    streaks: [u32; 3],
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            streaks: [0; 3],
        }
    }

    /// Records one more wait of `class` and returns how long to wait
    pub fn next_delay(&mut self, class: DelayClass) -> Duration {
        for other in DelayClass::ALL {
            if other != class {
                self.streaks[other.index()] = 0;
            }
        }

        let streak = &mut self.streaks[class.index()];
        *streak = streak.saturating_add(1);

        let delay = self.policy.delay_for(class, *streak);
        self.policy.jittered(delay, &mut rand::rng())
    }

    /// Forgets every streak
    pub fn reset(&mut self) {
        self.streaks = [0; 3];
    }

    #[cfg(test)]
    fn streak(&self, class: DelayClass) -> u32 {
        self.streaks[class.index()]
    }
}

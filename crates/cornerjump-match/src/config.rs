//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Timeouts and limits for match actors and the registry.
///
/// Construct with `MatchConfig::default()` and override what you need:
///
/// ```rust
/// use std::time::Duration;
/// use cornerjump_match::MatchConfig;
///
/// let config = MatchConfig {
///     reconnect_grace: Duration::from_secs(10),
///     ..MatchConfig::default()
/// };
/// assert_eq!(config.channel_size, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Grace used when a disconnect is reported without an explicit one.
    /// A participant who doesn't reconnect within it forfeits.
    pub reconnect_grace: Duration,

    /// An unfinished match with no accepted move for this long is purged.
    pub idle_retention: Duration,

    /// A finished match is purged this long after it ended. The
    /// persistence collaborator must have consumed the outcome by then.
    pub ended_retention: Duration,

    /// How often the background sweeper runs a purge.
    pub sweep_interval: Duration,

    /// Bounded mailbox size of each match actor.
    pub channel_size: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            reconnect_grace: Duration::from_secs(30),
            idle_retention: Duration::from_secs(30 * 60),
            ended_retention: Duration::from_secs(120),
            sweep_interval: Duration::from_secs(15),
            channel_size: 64,
        }
    }
}

impl MatchConfig {
    /// Shortest sweep period accepted by [`MatchConfig::validated`].
    pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(100);

    /// Clamp any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`MatchRegistry::new`](crate::MatchRegistry::new). Rules:
    /// - `channel_size` is at least 1.
    /// - `sweep_interval` is at least [`Self::MIN_SWEEP_INTERVAL`].
    pub fn validated(mut self) -> Self {
        if self.channel_size == 0 {
            warn!("channel_size is 0, using 1");
            self.channel_size = 1;
        }
        if self.sweep_interval < Self::MIN_SWEEP_INTERVAL {
            warn!(
                interval_ms = self.sweep_interval.as_millis() as u64,
                min_ms = Self::MIN_SWEEP_INTERVAL.as_millis() as u64,
                "sweep_interval below minimum, clamping"
            );
            self.sweep_interval = Self::MIN_SWEEP_INTERVAL;
        }
        self
    }

    /// Whether a match with the given age profile should be purged.
    ///
    /// `idle_for` counts from the last accepted move (or creation);
    /// `ended_for` from the terminal transition, if there was one.
    pub fn is_purgeable(&self, idle_for: Duration, ended_for: Option<Duration>) -> bool {
        match ended_for {
            Some(ended_for) => ended_for >= self.ended_retention,
            None => idle_for >= self.idle_retention,
        }
    }
}

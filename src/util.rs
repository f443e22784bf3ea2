// Shared waiting helpers

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::LcuError;

/// Sleeps for `duration` unless `cancel` fires first.
pub async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> Result<(), LcuError> {
  tokio::select! {
    _ = cancel.cancelled() => Err(LcuError::Cancelled),
    _ = tokio::time::sleep(duration) => Ok(()),
  }
}

/// Caps a remote-reported wait, logging when the cap applies.
pub fn bounded_wait(requested: Duration, cap: Duration, what: &str) -> Duration {
  if requested > cap {
    warn!(
      "{} of {:?} exceeds the configured maximum, waiting {:?} instead",
      what, requested, cap
    );
    return cap;
  }
  requested
}

/// Converts a non-negative seconds value reported by the client into a `Duration`. Values too
/// large to represent saturate to `Duration::MAX`, leaving the cap to `bounded_wait`.
pub fn secs_f64(secs: f64) -> Duration {
  if secs.is_finite() && secs > 0.0 {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
  } else {
    Duration::ZERO
  }
}

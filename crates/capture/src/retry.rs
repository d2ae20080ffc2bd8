//! Bounded retry helper for transiently-failing device calls.

use std::time::Duration;

use contracts::{DeviceError, RetryConfig};
use tracing::warn;

use crate::error::{CaptureError, Result};

/// Fixed-bound, fixed-delay retry policy
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
    /// Delay between attempts
    pub delay: Duration,
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: Duration::from_millis(config.delay_ms),
        }
    }
}

/// Run `f`, retrying transient (device-busy) failures up to the policy's
/// bound with a fixed delay between attempts.
///
/// The initial attempt plus `max_retries` retries is the total call
/// budget; one more transient failure yields `RetryExhausted` carrying
/// the last device error. Non-transient errors return immediately.
pub fn with_retry<T, F>(policy: RetryPolicy, op: &str, mut f: F) -> Result<T>
where
    F: FnMut() -> std::result::Result<T, DeviceError>,
{
    let mut retries = 0u32;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                retries += 1;
                if retries > policy.max_retries {
                    observability::record_retry(op, true);
                    return Err(CaptureError::RetryExhausted {
                        op: op.to_string(),
                        retries: policy.max_retries,
                        source: e,
                    });
                }
                observability::record_retry(op, false);
                warn!(op, retries, error = %e, "transient device error, retrying");
                if !policy.delay.is_zero() {
                    std::thread::sleep(policy.delay);
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

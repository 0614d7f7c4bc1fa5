//! Bounded retries for provider calls.

use std::future::Future;

use log::{debug, warn};
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

use crate::config::{PROVIDER_MAX_ATTEMPTS, PROVIDER_RETRY_DELAY_MS};
use crate::error_handling::ProviderError;

/// Runs `call` up to `PROVIDER_MAX_ATTEMPTS` times.
///
/// Only failures classified as retriable by [`ProviderError::is_retriable`]
/// trigger another attempt. The failure from the final attempt is returned to
/// the caller unchanged; turning it into a verdict is the orchestrator's job.
pub(crate) async fn retry_provider_call<T, F, Fut>(
    provider: &'static str,
    mut call: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let strategy =
        FixedInterval::from_millis(PROVIDER_RETRY_DELAY_MS).take(PROVIDER_MAX_ATTEMPTS.saturating_sub(1));

    let mut attempt = 0;
    RetryIf::spawn(
        strategy,
        || {
            attempt += 1;
            debug!("{provider}: attempt {attempt}/{PROVIDER_MAX_ATTEMPTS}");
            call()
        },
        |error: &ProviderError| {
            let retriable = error.is_retriable();
            if retriable {
                warn!("{provider}: retriable failure: {error}");
            }
            retriable
        },
    )
    .await
}

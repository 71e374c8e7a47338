//! Long-polling loop feeding updates into the runtime manager

use super::types::Inbound;
use super::{TelegramClient, TransportError};
use crate::runtime::{RuntimeManager, Transport};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const MAX_BACKOFF_SECS: u64 = 30;

/// Exponential backoff: 1s, 2s, 4s, ... capped at 30s
pub(crate) fn backoff_delay(failures: u32) -> Duration {
    let exp = failures.saturating_sub(1).min(5);
    Duration::from_secs((1u64 << exp).min(MAX_BACKOFF_SECS))
}

/// Poll `getUpdates` until shutdown or a non-retryable error
///
/// Each update is acknowledged (for button presses) and dispatched to the
/// conversation it belongs to.
pub async fn run_polling<T>(
    client: Arc<TelegramClient>,
    manager: Arc<RuntimeManager<T>>,
    poll_timeout: Duration,
    shutdown: CancellationToken,
) -> Result<(), TransportError>
where
    T: Transport + 'static,
{
    let mut offset: Option<i64> = None;
    let mut failures: u32 = 0;

    loop {
        let result = tokio::select! {
            biased;

            () = shutdown.cancelled() => break,
            result = client.get_updates(offset, poll_timeout) => result,
        };

        match result {
            Ok(updates) => {
                failures = 0;
                for update in updates {
                    // Advance the offset so we do not receive this update again.
                    offset = Some(update.update_id + 1);
                    if let Some(inbound) = Inbound::from_update(update) {
                        handle_inbound(&client, &manager, inbound).await;
                    }
                }
            }
            Err(e) if e.is_retryable() => {
                failures += 1;
                let delay = e.retry_after.unwrap_or_else(|| backoff_delay(failures));
                tracing::warn!(
                    error = %e,
                    attempt = failures,
                    delay_ms = %delay.as_millis(),
                    "Polling failed, retrying"
                );
                tokio::select! {
                    biased;

                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(delay) => {}
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Polling stopped");
                return Err(e);
            }
        }
    }

    tracing::info!("Polling stopped by shutdown");
    Ok(())
}

async fn handle_inbound<T>(client: &TelegramClient, manager: &RuntimeManager<T>, inbound: Inbound)
where
    T: Transport + 'static,
{
    let Inbound {
        key,
        event,
        callback_id,
    } = inbound;

    if let Some(id) = callback_id {
        if let Err(e) = client.answer_callback_query(&id).await {
            tracing::warn!(conversation = %key, error = %e, "Failed to answer callback");
        }
    }

    if let Some(event) = event {
        manager.dispatch(key, event).await;
    }
}

//! Telegram Bot API client

use super::types::{
    AnswerCallbackQueryRequest, ApiResponse, GetUpdatesRequest, SendMessageRequest, Update,
};
use super::TransportError;
use crate::config::BotConfig;
use crate::state_machine::OutboundMessage;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Headroom on top of the long-poll timeout before the HTTP request gives up
const REQUEST_GRACE: Duration = Duration::from_secs(10);

const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];

/// Bot API client over HTTPS
pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`; never logged
    base_url: String,
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.poll_timeout + REQUEST_GRACE)
            .build()
            .map_err(|e| TransportError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.api_url.trim_end_matches('/'),
                config.bot_token
            ),
        })
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: ALLOWED_UPDATES,
        };
        let updates: Option<Vec<Update>> = self.call("getUpdates", &request).await?;
        Ok(updates.unwrap_or_default())
    }

    pub async fn send_outbound(
        &self,
        chat_id: i64,
        message: &OutboundMessage,
    ) -> Result<(), TransportError> {
        let request = SendMessageRequest::new(chat_id, message);
        let _: Option<serde_json::Value> = self.call("sendMessage", &request).await?;
        Ok(())
    }

    /// Stop the client-side spinner on a pressed button
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TransportError> {
        let request = AnswerCallbackQueryRequest { callback_query_id };
        let _: Option<bool> = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }

    async fn call<P, R>(&self, method: &str, payload: &P) -> Result<Option<R>, TransportError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{method}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the token
                TransportError::network(format!("Telegram {method} error: {}", e.without_url()))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TransportError::network(format!("Telegram {method} read error: {}", e.without_url()))
        })?;

        match serde_json::from_str::<ApiResponse<R>>(&body) {
            Ok(parsed) if parsed.ok => Ok(parsed.result),
            Ok(parsed) => {
                let code = parsed.error_code.unwrap_or(status.as_u16());
                let retry_after = parsed.parameters.and_then(|p| p.retry_after);
                Err(classify_error(
                    code,
                    &format!(
                        "Telegram {method} failed: {}",
                        parsed.description.unwrap_or_default()
                    ),
                    retry_after,
                ))
            }
            Err(e) if status.is_success() => Err(TransportError::unknown(format!(
                "Telegram {method} parse error: {e}"
            ))),
            Err(_) => Err(classify_error(
                status.as_u16(),
                &format!("Telegram {method} failed: HTTP {status}"),
                None,
            )),
        }
    }
}

/// Map a Bot API error code to a transport error kind
pub(crate) fn classify_error(code: u16, message: &str, retry_after: Option<u64>) -> TransportError {
    match code {
        429 => {
            let err = TransportError::rate_limit(message);
            match retry_after {
                Some(secs) => err.with_retry_after(Duration::from_secs(secs)),
                None => err,
            }
        }
        401 | 404 => TransportError::auth(message),
        400 | 403 | 409 => TransportError::invalid_request(message),
        500..=599 => TransportError::server_error(message),
        _ => TransportError::unknown(message),
    }
}

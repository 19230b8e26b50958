use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::OperatorError;

/// Builds the HTTP client shared by every operator source.
///
/// # Errors
///
/// Returns [`OperatorError::Http`] if the underlying `reqwest::Client`
/// cannot be constructed (e.g., invalid TLS config).
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, OperatorError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Checks the status and decodes a JSON body.
///
/// 401 maps to [`OperatorError::Unauthorized`] so token-based sources can
/// refresh and retry; other non-2xx statuses are [`OperatorError::UnexpectedStatus`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, OperatorError> {
    let url = response.url().to_string();
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(OperatorError::Unauthorized { url });
    }
    if !status.is_success() {
        return Err(OperatorError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|e| OperatorError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

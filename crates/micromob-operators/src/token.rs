//! Process-wide bearer tokens for operators with a session-key flow.

use std::future::Future;

use micromob_core::Operator;
use tokio::sync::Mutex;

use crate::error::OperatorError;

/// Holds the current token for one operator.
///
/// Refreshes are serialized by the mutex; a caller that was waiting while
/// another refreshed picks up the new token instead of refreshing again.
#[derive(Debug)]
pub struct TokenStore {
    operator: Operator,
    token: Mutex<Option<String>>,
}

impl TokenStore {
    #[must_use]
    pub fn new(operator: Operator) -> Self {
        Self {
            operator,
            token: Mutex::new(None),
        }
    }

    /// Starts with a known token, e.g. one that has already expired.
    #[must_use]
    pub fn with_token(operator: Operator, token: impl Into<String>) -> Self {
        Self {
            operator,
            token: Mutex::new(Some(token.into())),
        }
    }

    pub async fn current(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    /// Runs `request` with the current token, obtaining one first if needed.
    ///
    /// On [`OperatorError::Unauthorized`] the token is refreshed exactly once
    /// and the request retried exactly once; the retry's outcome is final.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::TokenRefresh`] when a refresh fails, otherwise
    /// whatever `request` returns.
    pub async fn with_retry<T, R, RFut, Q, QFut>(
        &self,
        refresh: R,
        request: Q,
    ) -> Result<T, OperatorError>
    where
        R: Fn() -> RFut,
        RFut: Future<Output = Result<String, OperatorError>>,
        Q: Fn(String) -> QFut,
        QFut: Future<Output = Result<T, OperatorError>>,
    {
        let token = self.current_or_refresh(&refresh).await?;
        match request(token.clone()).await {
            Err(OperatorError::Unauthorized { url }) => {
                tracing::info!(operator = %self.operator, url, "token rejected, refreshing");
                let fresh = self.replace_rejected(&refresh, &token).await?;
                request(fresh).await
            }
            other => other,
        }
    }

    async fn current_or_refresh<R, RFut>(&self, refresh: &R) -> Result<String, OperatorError>
    where
        R: Fn() -> RFut,
        RFut: Future<Output = Result<String, OperatorError>>,
    {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }
        let fresh = self.run_refresh(refresh).await?;
        *guard = Some(fresh.clone());
        Ok(fresh)
    }

    async fn replace_rejected<R, RFut>(
        &self,
        refresh: &R,
        rejected: &str,
    ) -> Result<String, OperatorError>
    where
        R: Fn() -> RFut,
        RFut: Future<Output = Result<String, OperatorError>>,
    {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if token != rejected {
                return Ok(token.clone());
            }
        }
        let fresh = self.run_refresh(refresh).await?;
        *guard = Some(fresh.clone());
        Ok(fresh)
    }

    async fn run_refresh<R, RFut>(&self, refresh: &R) -> Result<String, OperatorError>
    where
        R: Fn() -> RFut,
        RFut: Future<Output = Result<String, OperatorError>>,
    {
        tracing::info!(operator = %self.operator, "refreshing session token");
        refresh().await.map_err(|e| {
            tracing::warn!(
                operator = %self.operator,
                status = ?e.status(),
                error = %e,
                "failed to refresh session token"
            );
            OperatorError::TokenRefresh {
                operator: self.operator,
                source: Box::new(e),
            }
        })
    }
}

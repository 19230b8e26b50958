use std::net::SocketAddr;

use crate::toggles::Toggles;

const REDACTED: &str = "[redacted]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct VoiConfig {
    pub url_oslo: String,
    pub url_trondheim: String,
    pub url_session_key: String,
    pub api_user: String,
    pub api_pass: String,
}

#[derive(Clone)]
pub struct TierConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct ZvippConfig {
    pub url_drammen: String,
}

#[derive(Clone)]
pub struct LimeConfig {
    pub url_oslo: String,
    pub api_token: String,
}

#[derive(Clone)]
pub struct BoltConfig {
    pub url_auth: String,
    pub url_oslo: String,
    /// Base of the Bolt GBFS tree; individual feeds are appended as path segments.
    pub url_gbfs: String,
    pub api_user: String,
    pub api_pass: String,
}

/// Upstream settings per operator. `None` means the operator is not configured.
#[derive(Debug, Clone, Default)]
pub struct OperatorsConfig {
    pub voi: Option<VoiConfig>,
    pub tier: Option<TierConfig>,
    pub zvipp: Option<ZvippConfig>,
    pub lime: Option<LimeConfig>,
    pub bolt: Option<BoltConfig>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub cache_ttl_ms: u64,
    pub toggles: Toggles,
    pub operators: OperatorsConfig,
}

impl std::fmt::Debug for VoiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiConfig")
            .field("url_oslo", &self.url_oslo)
            .field("url_trondheim", &self.url_trondheim)
            .field("url_session_key", &self.url_session_key)
            .field("api_user", &self.api_user)
            .field("api_pass", &REDACTED)
            .finish()
    }
}

impl std::fmt::Debug for TierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TierConfig")
            .field("url", &self.url)
            .field("api_key", &REDACTED)
            .finish()
    }
}

impl std::fmt::Debug for LimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimeConfig")
            .field("url_oslo", &self.url_oslo)
            .field("api_token", &REDACTED)
            .finish()
    }
}

impl std::fmt::Debug for BoltConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoltConfig")
            .field("url_auth", &self.url_auth)
            .field("url_oslo", &self.url_oslo)
            .field("url_gbfs", &self.url_gbfs)
            .field("api_user", &self.api_user)
            .field("api_pass", &REDACTED)
            .finish()
    }
}

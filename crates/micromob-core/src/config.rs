use crate::app_config::{
    AppConfig, BoltConfig, Environment, LimeConfig, OperatorsConfig, TierConfig, VoiConfig,
    ZvippConfig,
};
use crate::toggles::Toggles;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or an operator is only partially configured.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or an operator is only partially configured.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // All-or-nothing: returns `None` when no var of the group is set, the values
    // in order when all are set, and an error naming the first gap otherwise.
    let group = |operator: &'static str,
                 vars: &[&str]|
     -> Result<Option<Vec<String>>, ConfigError> {
        let values: Vec<Option<String>> = vars
            .iter()
            .map(|&var| lookup(var).ok().filter(|v| !v.trim().is_empty()))
            .collect();
        if values.iter().all(Option::is_none) {
            return Ok(None);
        }
        values
            .into_iter()
            .zip(vars)
            .map(|(value, var)| {
                value.ok_or_else(|| ConfigError::IncompleteOperator {
                    operator,
                    missing: (*var).to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    };

    let env = parse_environment(&or_default("MICROMOB_ENV", "development"))?;
    let bind_addr = parse_addr("MICROMOB_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MICROMOB_LOG_LEVEL", "info");
    let http_timeout_secs = parse_u64("MICROMOB_HTTP_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("MICROMOB_USER_AGENT", "micromob/0.1 (vehicle-aggregator)");
    let cache_ttl_ms = parse_u64("MICROMOB_CACHE_TTL_MS", "10000")?;
    let toggles = Toggles::parse(&or_default("MICROMOB_TOGGLES", ""))?;

    let voi = group(
        "VOI",
        &[
            "VOI_URL_OSLO",
            "VOI_URL_TRONDHEIM",
            "VOI_URL_SESSIONKEY",
            "VOI_API_USER",
            "VOI_API_PASS",
        ],
    )?
    .map(|v| {
        let [url_oslo, url_trondheim, url_session_key, api_user, api_pass] = take::<5>(v);
        VoiConfig {
            url_oslo,
            url_trondheim,
            url_session_key,
            api_user,
            api_pass,
        }
    });

    let tier = group("TIER", &["TIER_URL_ALL", "TIER_API_KEY"])?.map(|v| {
        let [url, api_key] = take::<2>(v);
        TierConfig { url, api_key }
    });

    let zvipp = group("ZVIPP", &["ZVIPP_URL_DRAMMEN"])?.map(|v| {
        let [url_drammen] = take::<1>(v);
        ZvippConfig { url_drammen }
    });

    let lime = group("LIME", &["LIME_URL_OSLO", "LIME_API_TOKEN"])?.map(|v| {
        let [url_oslo, api_token] = take::<2>(v);
        LimeConfig {
            url_oslo,
            api_token,
        }
    });

    let bolt = group(
        "BOLT",
        &[
            "BOLT_URL_AUTH",
            "BOLT_URL_OSLO",
            "BOLT_URL_GBFS",
            "BOLT_API_USER",
            "BOLT_API_PASS",
        ],
    )?
    .map(|v| {
        let [url_auth, url_oslo, url_gbfs, api_user, api_pass] = take::<5>(v);
        BoltConfig {
            url_auth,
            url_oslo,
            url_gbfs: url_gbfs.trim_end_matches('/').to_string(),
            api_user,
            api_pass,
        }
    });

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        http_timeout_secs,
        user_agent,
        cache_ttl_ms,
        toggles,
        operators: OperatorsConfig {
            voi,
            tier,
            zvipp,
            lime,
            bolt,
        },
    })
}

/// Moves a group's values into a fixed-size array, padding with empty strings.
///
/// `group` always yields exactly as many values as it was given var names, so
/// the padding never applies in practice.
fn take<const N: usize>(values: Vec<String>) -> [String; N] {
    let mut iter = values.into_iter();
    std::array::from_fn(|_| iter.next().unwrap_or_default())
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MICROMOB_ENV".to_string(),
            reason: format!("expected development, test or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

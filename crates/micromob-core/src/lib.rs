pub mod app_config;
pub mod config;
pub mod distance;
pub mod error;
pub mod operator;
pub mod pricing;
pub mod toggles;
pub mod vehicle;

pub use app_config::{
    AppConfig, BoltConfig, Environment, LimeConfig, OperatorsConfig, TierConfig, VoiConfig,
    ZvippConfig,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use distance::distance;
pub use error::{ConfigError, UnknownOperator};
pub use operator::{Capabilities, Operator};
pub use toggles::Toggles;
pub use vehicle::Vehicle;

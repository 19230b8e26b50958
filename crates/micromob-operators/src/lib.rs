pub mod aggregate;
pub mod cache;
pub mod client;
pub mod error;
pub mod gbfs;
pub mod normalize;
pub mod sources;
pub mod token;
pub mod types;

pub use aggregate::{Aggregator, ScooterQuery};
pub use cache::{Clock, FetchCache, SystemClock};
pub use client::build_http_client;
pub use error::OperatorError;
pub use sources::{
    BoltSource, LimeSource, SearchArea, SourceRegistry, TierSource, VehicleSource, VoiSource,
    ZvippSource,
};
pub use token::TokenStore;

//! The closed set of micromobility operators and their capabilities.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownOperator;

/// A micromobility operator whose live vehicle feed can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Voi,
    Tier,
    Zvipp,
    Lime,
    Bolt,
}

/// Static per-operator behaviour flags consulted by the cache and aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Results are independent of the query and may be shared between callers.
    pub cacheable: bool,
    /// The provider applies the radius filter itself; client-side filtering is skipped.
    pub server_side_radius: bool,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Voi,
        Operator::Tier,
        Operator::Zvipp,
        Operator::Lime,
        Operator::Bolt,
    ];

    /// Lowercase wire name, as used in vehicle records and toggles.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Voi => "voi",
            Operator::Tier => "tier",
            Operator::Zvipp => "zvipp",
            Operator::Lime => "lime",
            Operator::Bolt => "bolt",
        }
    }

    /// Human-facing name used in log lines (`"Voi"`, `"Tier"`, ...).
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Operator::Voi => "Voi",
            Operator::Tier => "Tier",
            Operator::Zvipp => "Zvipp",
            Operator::Lime => "Lime",
            Operator::Bolt => "Bolt",
        }
    }

    /// Stable namespace code used to build globally unique vehicle ids.
    #[must_use]
    pub fn codespace(self) -> &'static str {
        match self {
            Operator::Voi => "YVO",
            Operator::Tier => "YTI",
            Operator::Zvipp => "YZV",
            Operator::Lime => "YLI",
            Operator::Bolt => "YBO",
        }
    }

    #[must_use]
    pub fn capabilities(self) -> Capabilities {
        match self {
            // Tier answers radius queries server-side, so its results are
            // request-scoped and cannot be shared without a spatial index.
            Operator::Tier => Capabilities {
                cacheable: false,
                server_side_radius: true,
            },
            Operator::Voi | Operator::Zvipp | Operator::Lime | Operator::Bolt => Capabilities {
                cacheable: true,
                server_side_radius: false,
            },
        }
    }

    /// Builds the namespaced vehicle id `<codespace>:Scooter:<raw_id>`.
    #[must_use]
    pub fn vehicle_id(self, raw_id: &str) -> String {
        format!("{}:Scooter:{raw_id}", self.codespace())
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = UnknownOperator;

    /// Case-insensitive: `"voi"`, `"VOI"` and `" Voi "` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VOI" => Ok(Operator::Voi),
            "TIER" => Ok(Operator::Tier),
            "ZVIPP" => Ok(Operator::Zvipp),
            "LIME" => Ok(Operator::Lime),
            "BOLT" => Ok(Operator::Bolt),
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

//! Runtime on/off switches per operator.
//!
//! Parsed from a comma-separated list such as `tier=off,voi=off`. Operators
//! that are not mentioned stay enabled.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::operator::Operator;

const TOGGLES_VAR: &str = "MICROMOB_TOGGLES";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toggles {
    disabled: HashSet<Operator>,
}

impl Toggles {
    /// Parses `name=on|off` pairs. Empty segments are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] for unknown operator names,
    /// values other than `on`/`off`, or segments without `=`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEnvVar {
            var: TOGGLES_VAR.to_string(),
            reason,
        };

        let mut disabled = HashSet::new();
        for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, state) = segment
                .split_once('=')
                .ok_or_else(|| invalid(format!("expected name=on|off, got {segment:?}")))?;
            let operator: Operator = name.parse().map_err(|e| invalid(format!("{e}")))?;
            match state.trim().to_ascii_lowercase().as_str() {
                "off" => {
                    disabled.insert(operator);
                }
                "on" => {
                    disabled.remove(&operator);
                }
                other => return Err(invalid(format!("unknown toggle state {other:?} for {name}"))),
            }
        }
        Ok(Self { disabled })
    }

    #[must_use]
    pub fn all_enabled() -> Self {
        Self::default()
    }

    /// Convenience for tests and fixed deployments.
    #[must_use]
    pub fn with_disabled(operators: impl IntoIterator<Item = Operator>) -> Self {
        Self {
            disabled: operators.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self, operator: Operator) -> bool {
        !self.disabled.contains(&operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_enables_everything() {
        let toggles = Toggles::parse("").unwrap();
        assert!(Operator::ALL.iter().all(|op| toggles.is_enabled(*op)));
    }

    #[test]
    fn off_disables_only_named_operators() {
        let toggles = Toggles::parse("tier=off, VOI=off").unwrap();
        assert!(!toggles.is_enabled(Operator::Tier));
        assert!(!toggles.is_enabled(Operator::Voi));
        assert!(toggles.is_enabled(Operator::Lime));
    }

    #[test]
    fn later_on_overrides_earlier_off() {
        let toggles = Toggles::parse("lime=off,lime=on").unwrap();
        assert!(toggles.is_enabled(Operator::Lime));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = Toggles::parse("scoot=off").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == TOGGLES_VAR));
    }

    #[test]
    fn malformed_segment_is_rejected() {
        assert!(Toggles::parse("tier").is_err());
        assert!(Toggles::parse("tier=maybe").is_err());
    }
}

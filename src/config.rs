use serde::{Deserialize, Serialize};

use crate::decimal::{Money, RoundingMode};
use crate::errors::{LoanError, Result};

/// engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub status: StatusConfig,
    /// collections above this size go through rayon when the `parallel` feature is on
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

/// currency precision and rounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub decimal_places: u32,
    pub rounding: RoundingMode,
}

/// schedule generation limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub max_term_months: u32,
    /// largest rounding residue the final installment may absorb, unlimited when `None`
    pub residue_tolerance: Option<Money>,
}

/// status derivation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// days after the due date before an unpaid installment counts as overdue
    pub grace_period_days: u32,
}

fn default_parallel_threshold() -> usize {
    256
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            rounding: RoundingMode::HalfUp,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            max_term_months: 600,
            residue_tolerance: None,
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { grace_period_days: 0 }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyConfig::default(),
            schedule: ScheduleConfig::default(),
            status: StatusConfig::default(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl CurrencyConfig {
    /// round an amount to this currency's precision
    pub fn round(&self, amount: Money) -> Money {
        amount.round_to(self.decimal_places, self.rounding)
    }

    pub fn minor_unit(&self) -> Money {
        Money::minor_unit(self.decimal_places)
    }
}

impl EngineConfig {
    /// brazilian real: centavos, half-up, no grace period
    pub fn brl() -> Self {
        Self::default()
    }

    /// default configuration with a grace period for overdue classification
    pub fn with_grace_period(days: u32) -> Self {
        Self {
            status: StatusConfig { grace_period_days: days },
            ..Self::default()
        }
    }

    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency.decimal_places > 8 {
            return Err(LoanError::InvalidConfiguration {
                message: format!(
                    "decimal places must be at most 8, got {}",
                    self.currency.decimal_places
                ),
            });
        }

        if self.schedule.max_term_months == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "max term must be at least one month".to_string(),
            });
        }

        if let Some(tolerance) = self.schedule.residue_tolerance {
            if tolerance.is_negative() {
                return Err(LoanError::InvalidConfiguration {
                    message: format!("residue tolerance cannot be negative: {}", tolerance),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.currency.rounding, RoundingMode::HalfUp);
        assert_eq!(config.status.grace_period_days, 0);
        assert_eq!(config.currency.minor_unit(), Money::CENT);
        assert!(config.validate().is_ok());
        assert_eq!(EngineConfig::brl(), config);
    }

    #[test]
    fn test_json_round_trip_with_partial_input() {
        let config = EngineConfig::from_json(r#"{ "status": { "grace_period_days": 5 } }"#).unwrap();
        assert_eq!(config.status.grace_period_days, 5);
        assert_eq!(config.currency, CurrencyConfig::default());
        assert_eq!(config.parallel_threshold, 256);

        let json = config.to_json_pretty().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = EngineConfig::from_json(
            r#"{ "currency": { "decimal_places": 12, "rounding": "half_up" } }"#,
        );
        assert!(matches!(result, Err(LoanError::InvalidConfiguration { .. })));

        let mut config = EngineConfig::with_grace_period(3);
        config.schedule.max_term_months = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(LoanError::Serialization(_))
        ));
    }
}

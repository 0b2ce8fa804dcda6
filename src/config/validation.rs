//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// One semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidMetricsAddress(String),
    ZeroBodyLimit,
    ZeroDimensionLimit,
    CropBudgetBelowDimensionLimit,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address `{}` is not a socket address", addr)
            }
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address `{}` is not a socket address", addr)
            }
            ValidationError::ZeroBodyLimit => write!(f, "limits.max_body_bytes must be positive"),
            ValidationError::ZeroDimensionLimit => {
                write!(f, "limits.max_dimension must be positive")
            }
            ValidationError::CropBudgetBelowDimensionLimit => {
                write!(
                    f,
                    "limits.max_crop_pixels must cover a max_dimension square"
                )
            }
        }
    }
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.limits.max_dimension == 0 {
        errors.push(ValidationError::ZeroDimensionLimit);
    }

    // A budget below max_dimension² would reject in-bounds crops of a
    // legal image.
    let dimension_square = u64::from(config.limits.max_dimension).pow(2);
    if config.limits.max_crop_pixels < dimension_square {
        errors.push(ValidationError::CropBudgetBelowDimensionLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.limits.max_body_bytes = 0;
        config.limits.max_dimension = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroBodyLimit));
    }

    #[test]
    fn crop_budget_must_cover_a_dimension_square() {
        let mut config = ServerConfig::default();
        config.limits.max_crop_pixels = 999_999;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::CropBudgetBelowDimensionLimit]);

        config.limits.max_crop_pixels = 1_000_000;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "nope".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidMetricsAddress("nope".into())]);
    }
}

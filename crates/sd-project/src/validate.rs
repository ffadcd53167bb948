//! Run configuration validation logic.

use crate::schema::{LATEST_VERSION, RunConfig};
use sd_core::ensure_finite;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate entry: {value} in {context}")]
    Duplicate { value: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.name.trim().is_empty() {
        return Err(invalid("name", &config.name, "run name must not be empty"));
    }

    if config.scan.is_empty() {
        return Err(invalid("scan", "[]", "at least one record kind is required"));
    }

    let mut seen = HashSet::new();
    for tag in &config.scan {
        if tag.trim().is_empty() {
            return Err(invalid("scan", tag, "record kind tag must not be empty"));
        }
        if !seen.insert(tag.as_str()) {
            return Err(ValidationError::Duplicate {
                value: tag.clone(),
                context: "scan".to_string(),
            });
        }
    }

    if config.max_snapshot_probe == 0 {
        return Err(invalid("max_snapshot_probe", "0", "must be positive"));
    }

    let geometry = &config.par.geometry;
    if let Err(err) = geometry.domain_shape() {
        return Err(invalid("par.geometry.shape", &geometry.shape, &err.to_string()));
    }

    if let Some(r_cmb) = geometry.r_cmb {
        ensure_finite(r_cmb, "r_cmb")
            .map_err(|err| invalid("par.geometry.r_cmb", &r_cmb.to_string(), &err.to_string()))?;
    }

    Ok(())
}

fn invalid(field: &str, value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RunConfig {
        RunConfig::new("run", "/tmp/out")
    }

    #[test]
    fn default_config_is_valid() {
        validate_config(&valid()).unwrap();
    }

    #[test]
    fn rejects_empty_name_and_scan() {
        let mut config = valid();
        config.name = "  ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidValue { .. })
        ));

        let mut config = valid();
        config.scan.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_duplicate_scan_tags() {
        let mut config = valid();
        config.scan = vec!["t".to_string(), "vp".to_string(), "t".to_string()];
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn rejects_bad_geometry() {
        let mut config = valid();
        config.par.geometry.shape = "torus".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = valid();
        config.par.geometry.r_cmb = Some(f64::NAN);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("r_cmb"));
    }

    #[test]
    fn rejects_future_version() {
        let mut config = valid();
        config.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }
}

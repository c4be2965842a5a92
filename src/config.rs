//! Bridge configuration.
//!
//! Precedence, lowest first:
//! 1) built-in defaults
//! 2) YAML file (`BridgeConfig::from_yaml_file`)
//! 3) environment:
//!    - `ARMSX2_BRIDGE_MODULE`: provider name to resolve
//!    - `ARMSX2_DEV`: development mode (`1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`)
//!    - `ARMSX2_LOG`: log filter used when `RUST_LOG` is unset

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, ErrorContext, Result};

pub const DEFAULT_MODULE_NAME: &str = "Armsx2Bridge";

pub const ENV_MODULE: &str = "ARMSX2_BRIDGE_MODULE";
pub const ENV_DEV: &str = "ARMSX2_DEV";
pub const ENV_LOG: &str = "ARMSX2_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name the capability provider is resolved under.
    pub module_name: String,
    /// Gates the missing-provider warning.
    pub dev_mode: bool,
    /// `tracing_subscriber::EnvFilter` directive used by [`crate::logging::init`].
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
            dev_mode: cfg!(debug_assertions),
            log_filter: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_with(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    /// Load from a YAML file, then apply environment overrides.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read config file: {e}"),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("config_loader"),
            )
        })?;
        let mut cfg = Self::from_yaml_str(&content)?;
        cfg.apply_env_with(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply overrides from a key lookup (the environment, in production).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(ENV_MODULE) {
            let name = name.trim().to_string();
            if !name.is_empty() {
                self.module_name = name;
            }
        }
        if let Some(raw) = lookup(ENV_DEV) {
            self.dev_mode = parse_flag(ENV_DEV, &raw)?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            let filter = filter.trim().to_string();
            if !filter.is_empty() {
                self.log_filter = filter;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.module_name.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "module_name must not be empty",
                ErrorContext::new()
                    .with_field_path("module_name")
                    .with_source("config_loader"),
            ));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::configuration_with_context(
            "invalid boolean",
            ErrorContext::new()
                .with_field_path(key)
                .with_details(format!("got '{other}'"))
                .with_source("config_loader"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.module_name, "Armsx2Bridge");
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = BridgeConfig::default();
        cfg.apply_env_with(env(&[
            (ENV_MODULE, "OtherBridge"),
            (ENV_DEV, "yes"),
            (ENV_LOG, "armsx2_bridge=debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.module_name, "OtherBridge");
        assert!(cfg.dev_mode);
        assert_eq!(cfg.log_filter, "armsx2_bridge=debug");

        cfg.apply_env_with(env(&[(ENV_DEV, "off"), (ENV_MODULE, "  ")]))
            .unwrap();
        assert!(!cfg.dev_mode);
        assert_eq!(cfg.module_name, "OtherBridge");
    }

    #[test]
    fn test_invalid_dev_flag() {
        let mut cfg = BridgeConfig::default();
        let err = cfg.apply_env_with(env(&[(ENV_DEV, "maybe")])).unwrap_err();
        assert!(err.to_string().contains("ARMSX2_DEV"));
    }

    #[test]
    fn test_yaml_partial_fields_use_defaults() {
        let cfg = BridgeConfig::from_yaml_str("dev_mode: true\n").unwrap();
        assert!(cfg.dev_mode);
        assert_eq!(cfg.module_name, DEFAULT_MODULE_NAME);

        assert_eq!(BridgeConfig::from_yaml_str("").unwrap(), BridgeConfig::default());
        assert!(BridgeConfig::from_yaml_str("module_name: ''\n").is_err());
    }
}

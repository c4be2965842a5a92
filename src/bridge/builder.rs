use std::sync::Arc;

use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::provider::CapabilityProvider;
use crate::registry::{get_provider_registry, ProviderRegistry};

/// Builder for [`Bridge`].
///
/// Resolution order: an explicit provider set with [`BridgeBuilder::provider`],
/// otherwise a lookup of the module name in the given (or global) registry.
pub struct BridgeBuilder {
    config: BridgeConfig,
    provider: Option<Arc<dyn CapabilityProvider>>,
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self {
            config: BridgeConfig::default(),
            provider: None,
        }
    }

    /// Start from an existing config (module name, dev mode).
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.config.module_name = name.into();
        self
    }

    /// Enable the missing-provider warning.
    pub fn dev_mode(mut self, enable: bool) -> Self {
        self.config.dev_mode = enable;
        self
    }

    /// Use this provider instead of a registry lookup.
    pub fn provider(mut self, provider: Arc<dyn CapabilityProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Resolve against the process-wide registry.
    pub fn build(self) -> Bridge {
        self.build_with_registry(get_provider_registry())
    }

    pub fn build_with_registry(self, registry: &ProviderRegistry) -> Bridge {
        let provider = self
            .provider
            .or_else(|| registry.get(&self.config.module_name));
        Bridge::new(&self.config, provider)
    }
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

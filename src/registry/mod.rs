//! Provider registry.
//!
//! Providers register under their [`CapabilityProvider::name`]; a bridge
//! resolves one by module name exactly once, when it is built. A
//! process-wide instance is available through [`get_provider_registry`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::provider::CapabilityProvider;

pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Arc<dyn CapabilityProvider>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a provider, replacing any provider of the same name.
    ///
    /// Returns the replaced provider, if any.
    pub fn register(
        &self,
        provider: Arc<dyn CapabilityProvider>,
    ) -> Option<Arc<dyn CapabilityProvider>> {
        let name = provider.name().to_string();
        info!(provider = %name, "registering capability provider");
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, provider)
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn CapabilityProvider>> {
        let removed = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        if removed.is_some() {
            debug!(provider = %name, "unregistered capability provider");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CapabilityProvider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered provider names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_REGISTRY: once_cell::sync::Lazy<ProviderRegistry> =
    once_cell::sync::Lazy::new(ProviderRegistry::new);

pub fn get_provider_registry() -> &'static ProviderRegistry {
    &GLOBAL_REGISTRY
}

//! The bridge facade.
//!
//! [`Bridge`] resolves a capability provider once, when it is built, and
//! then exposes every provider method as a typed accessor that never fails.
//! When the provider is absent, or a call errors, the accessor resolves to a
//! fixed fallback value instead:
//!
//! | Accessor | Fallback |
//! |----------|----------|
//! | `get_setting` | `None` |
//! | `set_setting`, `has_valid_vm` | `false` |
//! | `get_data_root`, `set_data_root_override` | `""` |
//! | `get_retro_achievements_state`, `get_discord_profile` | `None` |
//! | `login_retro_achievements` | `LoginResult { success: false }` |
//! | `begin_discord_login`, `logout_discord` | `None` |
//! | `convert_iso_to_chd` | `-1` |
//! | everything returning `()` | `()` |
//!
//! A fallback is indistinguishable from a provider that legitimately returned
//! the same value. Callers that need to tell them apart should talk to the
//! provider directly.

mod builder;

pub use builder::BridgeBuilder;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::events::{Channel, EventEmitter, Subscription};
use crate::provider::CapabilityProvider;
use crate::registry::ProviderRegistry;
use crate::types::{
    BridgeEvent, DiscordEvent, DiscordProfile, LoginRequest, LoginResult,
    RetroAchievementsEvent, RetroAchievementsState, SettingType, SettingValue,
};
use crate::{Error, Result};

/// Fallback returned by [`Bridge::convert_iso_to_chd`].
pub const CONVERSION_FAILED: i32 = -1;

/// Resolution result, fixed for the lifetime of a bridge.
enum BridgeState {
    Connected {
        provider: Arc<dyn CapabilityProvider>,
        emitter: EventEmitter,
    },
    Absent,
}

/// Emit-once warning for calls made while the provider is absent.
struct MissingProviderNotice {
    dev_mode: bool,
    warned: AtomicBool,
}

impl MissingProviderNotice {
    fn new(dev_mode: bool) -> Self {
        Self {
            dev_mode,
            warned: AtomicBool::new(false),
        }
    }

    /// Returns `true` only for the call that actually logged.
    fn notify(&self, module: &str) -> bool {
        if !self.dev_mode || self.warned.swap(true, Ordering::AcqRel) {
            return false;
        }
        let err = Error::provider_unavailable(module);
        warn!(
            module = %module,
            error = %err,
            "make sure the native capability provider is registered before the bridge is built"
        );
        true
    }

    fn emitted(&self) -> bool {
        self.warned.load(Ordering::Acquire)
    }
}

/// Fallback-safe facade over an optional [`CapabilityProvider`].
pub struct Bridge {
    module_name: String,
    state: BridgeState,
    notice: MissingProviderNotice,
}

impl Bridge {
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    /// Build a bridge around an already-resolved provider (or none).
    pub fn new(config: &BridgeConfig, provider: Option<Arc<dyn CapabilityProvider>>) -> Self {
        let state = match provider {
            Some(provider) => {
                let emitter = EventEmitter::new(provider.events());
                debug!(module = %config.module_name, "capability provider resolved");
                BridgeState::Connected { provider, emitter }
            }
            None => {
                debug!(module = %config.module_name, "capability provider absent");
                BridgeState::Absent
            }
        };
        Self {
            module_name: config.module_name.clone(),
            state,
            notice: MissingProviderNotice::new(config.dev_mode),
        }
    }

    /// Resolve `config.module_name` in the global registry.
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::from_registry(crate::registry::get_provider_registry(), config)
    }

    /// Resolve `config.module_name` in `registry`.
    pub fn from_registry(registry: &ProviderRegistry, config: &BridgeConfig) -> Self {
        Self::new(config, registry.get(&config.module_name))
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Whether a provider was resolved when this bridge was built.
    pub fn is_available(&self) -> bool {
        matches!(self.state, BridgeState::Connected { .. })
    }

    /// Whether the missing-provider warning has been logged.
    pub fn missing_warning_emitted(&self) -> bool {
        self.notice.emitted()
    }

    pub fn provider(&self) -> Option<&Arc<dyn CapabilityProvider>> {
        match &self.state {
            BridgeState::Connected { provider, .. } => Some(provider),
            BridgeState::Absent => None,
        }
    }

    pub fn emitter(&self) -> Option<&EventEmitter> {
        match &self.state {
            BridgeState::Connected { emitter, .. } => Some(emitter),
            BridgeState::Absent => None,
        }
    }

    /// Run `call` against the provider, collapsing absence and failure into
    /// `fallback`.
    async fn safe_call<T, F, Fut>(&self, method: &'static str, fallback: T, call: F) -> T
    where
        F: FnOnce(Arc<dyn CapabilityProvider>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let provider = match &self.state {
            BridgeState::Connected { provider, .. } => Arc::clone(provider),
            BridgeState::Absent => {
                self.notice.notify(&self.module_name);
                return fallback;
            }
        };
        match call(provider).await {
            Ok(value) => value,
            Err(e) => {
                warn!(module = %self.module_name, method, error = %e, "provider call failed");
                fallback
            }
        }
    }

    pub async fn get_setting(
        &self,
        section: &str,
        key: &str,
        ty: SettingType,
    ) -> Option<SettingValue> {
        self.safe_call("get_setting", None, |p| async move {
            p.get_setting(section, key, ty).await
        })
        .await
    }

    /// [`Bridge::get_setting`] with the default `string` type.
    pub async fn get_string_setting(&self, section: &str, key: &str) -> Option<SettingValue> {
        self.get_setting(section, key, SettingType::default()).await
    }

    pub async fn set_setting(
        &self,
        section: &str,
        key: &str,
        ty: SettingType,
        value: impl Into<SettingValue>,
    ) -> bool {
        let value = value.into();
        self.safe_call("set_setting", false, |p| async move {
            p.set_setting(section, key, ty, value).await
        })
        .await
    }

    pub async fn refresh_bios(&self) {
        self.safe_call("refresh_bios", (), |p| async move { p.refresh_bios().await })
            .await
    }

    pub async fn has_valid_vm(&self) -> bool {
        self.safe_call("has_valid_vm", false, |p| async move { p.has_valid_vm().await })
            .await
    }

    pub async fn get_data_root(&self) -> String {
        self.safe_call("get_data_root", String::new(), |p| async move {
            p.get_data_root().await
        })
        .await
    }

    pub async fn set_data_root_override(&self, path: &str) -> String {
        self.safe_call("set_data_root_override", String::new(), |p| async move {
            p.set_data_root_override(path).await
        })
        .await
    }

    // RetroAchievements

    pub async fn get_retro_achievements_state(&self) -> Option<RetroAchievementsState> {
        self.safe_call("get_retro_achievements_state", None, |p| async move {
            p.get_retro_achievements_state().await.map(Some)
        })
        .await
    }

    pub async fn refresh_retro_achievements_state(&self) {
        self.safe_call("refresh_retro_achievements_state", (), |p| async move {
            p.refresh_retro_achievements_state().await
        })
        .await
    }

    pub async fn login_retro_achievements(&self, username: &str, password: &str) -> LoginResult {
        self.safe_call("login_retro_achievements", LoginResult::failed(), |p| async move {
            p.login_retro_achievements(username, password).await
        })
        .await
    }

    pub async fn logout_retro_achievements(&self) {
        self.safe_call("logout_retro_achievements", (), |p| async move {
            p.logout_retro_achievements().await
        })
        .await
    }

    pub async fn set_retro_achievements_enabled(&self, enabled: bool) {
        self.safe_call("set_retro_achievements_enabled", (), |p| async move {
            p.set_retro_achievements_enabled(enabled).await
        })
        .await
    }

    pub async fn set_retro_achievements_hardcore(&self, enabled: bool) {
        self.safe_call("set_retro_achievements_hardcore", (), |p| async move {
            p.set_retro_achievements_hardcore(enabled).await
        })
        .await
    }

    // Discord

    pub async fn get_discord_profile(&self) -> Option<DiscordProfile> {
        self.safe_call("get_discord_profile", None, |p| async move {
            p.get_discord_profile().await.map(Some)
        })
        .await
    }

    pub async fn begin_discord_login(&self) -> Option<bool> {
        self.safe_call("begin_discord_login", None, |p| async move {
            p.begin_discord_login().await.map(Some)
        })
        .await
    }

    pub async fn logout_discord(&self) -> Option<bool> {
        self.safe_call("logout_discord", None, |p| async move {
            p.logout_discord().await.map(Some)
        })
        .await
    }

    pub async fn set_pad_vibration(&self, enabled: bool) {
        self.safe_call("set_pad_vibration", (), |p| async move {
            p.set_pad_vibration(enabled).await
        })
        .await
    }

    /// Convert a disc image to CHD. Resolves to the native result code, or
    /// [`CONVERSION_FAILED`].
    pub async fn convert_iso_to_chd(&self, path: &str) -> i32 {
        self.safe_call("convert_iso_to_chd", CONVERSION_FAILED, |p| async move {
            p.convert_iso_to_chd(path).await
        })
        .await
    }

    /// Register a raw listener on any channel. `None` without an emitter.
    pub fn add_listener<F>(&self, channel: Channel, listener: F) -> Option<Subscription>
    where
        F: Fn(&BridgeEvent) + Send + Sync + 'static,
    {
        self.emitter().map(|em| em.add_listener(channel, listener))
    }

    pub fn subscribe_to_retro_achievements<F>(&self, listener: F) -> Option<Subscription>
    where
        F: Fn(&RetroAchievementsEvent) + Send + Sync + 'static,
    {
        self.add_listener(Channel::RetroAchievements, move |event| {
            if let BridgeEvent::RetroAchievements(e) = event {
                listener(e);
            }
        })
    }

    pub fn subscribe_to_retro_achievements_login<F>(&self, listener: F) -> Option<Subscription>
    where
        F: Fn(&LoginRequest) + Send + Sync + 'static,
    {
        self.add_listener(Channel::RetroAchievementsLogin, move |event| {
            if let BridgeEvent::RetroAchievementsLogin(e) = event {
                listener(e);
            }
        })
    }

    pub fn subscribe_to_discord<F>(&self, listener: F) -> Option<Subscription>
    where
        F: Fn(&DiscordEvent) + Send + Sync + 'static,
    {
        self.add_listener(Channel::Discord, move |event| {
            if let BridgeEvent::Discord(e) = event {
                listener(e);
            }
        })
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("module_name", &self.module_name)
            .field("available", &self.is_available())
            .field("missing_warning_emitted", &self.missing_warning_emitted())
            .finish()
    }
}

static SHARED_BRIDGE: OnceCell<Bridge> = OnceCell::new();

/// Process-wide bridge, resolved from the global registry on first use.
///
/// Providers must be registered in [`crate::registry::get_provider_registry`]
/// before the first call; later registrations are not picked up.
pub fn shared_bridge() -> &'static Bridge {
    SHARED_BRIDGE.get_or_init(|| {
        let config = BridgeConfig::from_env().unwrap_or_else(|e| {
            warn!(error = %e, "invalid bridge environment, using defaults");
            BridgeConfig::default()
        });
        Bridge::from_config(&config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_fires_once_in_dev_mode() {
        let notice = MissingProviderNotice::new(true);
        assert!(notice.notify("Armsx2Bridge"));
        assert!(!notice.notify("Armsx2Bridge"));
        assert!(!notice.notify("Armsx2Bridge"));
        assert!(notice.emitted());
    }

    #[test]
    fn test_notice_silent_outside_dev_mode() {
        let notice = MissingProviderNotice::new(false);
        assert!(!notice.notify("Armsx2Bridge"));
        assert!(!notice.emitted());
    }

    #[tokio::test]
    async fn test_absent_bridge_has_no_emitter() {
        let cfg = BridgeConfig {
            dev_mode: true,
            ..Default::default()
        };
        let bridge = Bridge::new(&cfg, None);
        assert!(!bridge.is_available());
        assert!(bridge.emitter().is_none());
        assert!(bridge.subscribe_to_discord(|_| {}).is_none());

        assert_eq!(bridge.convert_iso_to_chd("/games/a.iso").await, CONVERSION_FAILED);
        assert!(bridge.missing_warning_emitted());
    }
}

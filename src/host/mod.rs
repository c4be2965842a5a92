//! In-process capability provider.
//!
//! [`HostProvider`] implements [`CapabilityProvider`] on top of the backend
//! traits in [`backend`]. It rejects calls with a [`RejectCode`] when a
//! native piece is missing from the build, and turns backend callbacks into
//! events on its [`EventHub`].
//!
//! ```rust,ignore
//! let host = HostProvider::new(native, achievements, discord);
//! host.attach_ui();
//! get_provider_registry().register(host.clone());
//! host.initialize();
//! ```

pub mod backend;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tracing::{debug, info, warn};

pub use backend::{
    AchievementsObserver, DiscordObserver, DiscordService, NativeApp, RetroAchievementsService,
};

use crate::config::DEFAULT_MODULE_NAME;
use crate::events::EventHub;
use crate::provider::CapabilityProvider;
use crate::types::{
    DiscordEvent, DiscordProfile, LoginRequest, LoginResult, RetroAchievementsEvent,
    RetroAchievementsState, SettingType, SettingValue,
};
use crate::{Error, RejectCode, Result};

pub struct HostProvider {
    name: String,
    native: Arc<dyn NativeApp>,
    achievements: Arc<dyn RetroAchievementsService>,
    discord: Arc<dyn DiscordService>,
    events: Arc<EventHub>,
    ui_attached: AtomicBool,
}

impl HostProvider {
    /// Create the provider under the default module name and subscribe it to
    /// both backends' callbacks.
    pub fn new(
        native: Arc<dyn NativeApp>,
        achievements: Arc<dyn RetroAchievementsService>,
        discord: Arc<dyn DiscordService>,
    ) -> Arc<Self> {
        Self::with_name(DEFAULT_MODULE_NAME, native, achievements, discord)
    }

    pub fn with_name(
        name: impl Into<String>,
        native: Arc<dyn NativeApp>,
        achievements: Arc<dyn RetroAchievementsService>,
        discord: Arc<dyn DiscordService>,
    ) -> Arc<Self> {
        let host = Arc::new(Self {
            name: name.into(),
            native,
            achievements,
            discord,
            events: Arc::new(EventHub::new()),
            ui_attached: AtomicBool::new(false),
        });
        let weak: Weak<HostProvider> = Arc::downgrade(&host);
        let ra_observer: Weak<dyn AchievementsObserver> = weak.clone();
        let discord_observer: Weak<dyn DiscordObserver> = weak;
        host.achievements.set_observer(Some(ra_observer));
        host.discord.set_observer(Some(discord_observer));
        host
    }

    /// Publish the current RetroAchievements state and Discord profile so
    /// listeners registered before startup see a baseline.
    pub fn initialize(&self) {
        self.emit_achievements_state(self.achievements.last_state());
        self.events.emit(DiscordEvent::new(self.discord_profile()));
    }

    /// Detach from the backends and stop emitting.
    pub fn invalidate(&self) {
        self.achievements.set_observer(None);
        self.discord.set_observer(None);
        self.events.set_active(false);
        info!(provider = %self.name, "host provider invalidated");
    }

    /// Mark a UI surface as present for interactive flows (Discord auth).
    pub fn attach_ui(&self) {
        self.ui_attached.store(true, Ordering::Release);
    }

    pub fn detach_ui(&self) {
        self.ui_attached.store(false, Ordering::Release);
    }

    pub fn is_ui_attached(&self) -> bool {
        self.ui_attached.load(Ordering::Acquire)
    }

    fn ensure_native(&self) -> Result<()> {
        if !self.native.has_native_binary() {
            warn!(provider = %self.name, "native binary missing");
            return Err(Error::rejected(
                RejectCode::NativeMissing,
                "Native ARMSX2 binary not bundled in this build.",
            ));
        }
        Ok(())
    }

    fn emit_achievements_state(&self, state: Option<RetroAchievementsState>) {
        self.events
            .emit(RetroAchievementsEvent::State(state.unwrap_or_default()));
    }

    fn discord_profile(&self) -> DiscordProfile {
        DiscordProfile {
            available: self.discord.is_available(),
            logged_in: self.discord.is_logged_in(),
            username: self.discord.username(),
            avatar_url: self.discord.avatar_url(),
        }
    }

    fn absolute(path: PathBuf) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(std::env::current_dir()?.join(path))
        }
    }
}

impl std::fmt::Debug for HostProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostProvider")
            .field("name", &self.name)
            .field("events", &self.events)
            .field("ui_attached", &self.is_ui_attached())
            .finish()
    }
}

#[async_trait]
impl CapabilityProvider for HostProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn events(&self) -> Arc<EventHub> {
        Arc::clone(&self.events)
    }

    async fn get_setting(
        &self,
        section: &str,
        key: &str,
        ty: SettingType,
    ) -> Result<Option<SettingValue>> {
        self.ensure_native()?;
        Ok(self.native.get_setting(section, key, ty))
    }

    async fn set_setting(
        &self,
        section: &str,
        key: &str,
        ty: SettingType,
        value: SettingValue,
    ) -> Result<bool> {
        self.ensure_native()?;
        debug!(section, key, ty = %ty, "set_setting");
        self.native
            .set_setting(section, key, ty, &value.to_native_string());
        Ok(true)
    }

    async fn refresh_bios(&self) -> Result<()> {
        self.ensure_native()?;
        self.native.refresh_bios();
        Ok(())
    }

    async fn has_valid_vm(&self) -> Result<bool> {
        self.ensure_native()?;
        Ok(self.native.has_valid_vm())
    }

    async fn get_data_root(&self) -> Result<String> {
        let root = Self::absolute(self.native.data_root())?;
        Ok(root.to_string_lossy().into_owned())
    }

    async fn set_data_root_override(&self, path: &str) -> Result<String> {
        info!(path, "data root override");
        self.native.set_data_root_override(path);
        self.native.reinitialize_data_root(path);
        Ok(path.to_string())
    }

    async fn get_retro_achievements_state(&self) -> Result<RetroAchievementsState> {
        Ok(self.achievements.last_state().unwrap_or_default())
    }

    async fn refresh_retro_achievements_state(&self) -> Result<()> {
        self.achievements.refresh_state();
        Ok(())
    }

    async fn login_retro_achievements(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResult> {
        let (success, message) = self.achievements.login(username, password).await;
        debug!(username, success, "retroachievements login finished");
        Ok(LoginResult {
            success,
            message: None,
        }
        .with_message(message))
    }

    async fn logout_retro_achievements(&self) -> Result<()> {
        self.achievements.logout();
        Ok(())
    }

    async fn set_retro_achievements_enabled(&self, enabled: bool) -> Result<()> {
        self.achievements.set_enabled(enabled);
        Ok(())
    }

    async fn set_retro_achievements_hardcore(&self, enabled: bool) -> Result<()> {
        self.achievements.set_hardcore(enabled);
        Ok(())
    }

    async fn get_discord_profile(&self) -> Result<DiscordProfile> {
        Ok(self.discord_profile())
    }

    async fn begin_discord_login(&self) -> Result<bool> {
        if !self.is_ui_attached() {
            return Err(Error::rejected(
                RejectCode::NoActivity,
                "No activity to start Discord auth",
            ));
        }
        if !self.discord.is_available() {
            return Err(Error::rejected(
                RejectCode::DiscordUnavailable,
                "Discord SDK not bundled for this build",
            ));
        }
        self.discord.begin_authorize();
        Ok(true)
    }

    async fn logout_discord(&self) -> Result<bool> {
        self.discord.clear_tokens();
        Ok(true)
    }

    async fn set_pad_vibration(&self, enabled: bool) -> Result<()> {
        self.ensure_native()?;
        self.native.set_pad_vibration(enabled);
        Ok(())
    }

    async fn convert_iso_to_chd(&self, path: &str) -> Result<i32> {
        self.ensure_native()?;
        if !self.native.has_native_tools() {
            return Err(Error::rejected(
                RejectCode::NativeToolsMissing,
                "Native tools library not bundled in this build.",
            ));
        }
        let native = Arc::clone(&self.native);
        let path = path.to_string();
        info!(path = %path, "starting CHD conversion");
        tokio::task::spawn_blocking(move || native.convert_iso_to_chd(&path))
            .await
            .map_err(|e| Error::call_failed("convert_iso_to_chd", e.to_string()))
    }
}

impl AchievementsObserver for HostProvider {
    fn on_state_updated(&self, state: Option<RetroAchievementsState>) {
        self.emit_achievements_state(state);
    }

    fn on_login_requested(&self, reason: i32) {
        self.events.emit(LoginRequest { reason });
    }

    fn on_login_success(
        &self,
        username: &str,
        points: i32,
        _softcore_points: i32,
        _unread_messages: i32,
    ) {
        debug!(username, points, "retroachievements login succeeded");
        self.emit_achievements_state(self.achievements.last_state());
    }

    fn on_hardcore_mode_changed(&self, enabled: bool) {
        self.events.emit(RetroAchievementsEvent::HardcoreChanged {
            hardcore_enabled: enabled,
        });
    }
}

impl DiscordObserver for HostProvider {
    fn on_login_state_changed(&self, _logged_in: bool) {
        self.events.emit(DiscordEvent::new(self.discord_profile()));
    }

    fn on_error(&self, message: &str) {
        warn!(error = message, "discord error");
        self.events
            .emit(DiscordEvent::new(self.discord_profile()).with_error(message));
    }

    fn on_user_info_updated(&self, _username: &str) {
        self.events.emit(DiscordEvent::new(self.discord_profile()));
    }
}

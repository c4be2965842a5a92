//! The capability provider contract.
//!
//! A provider is whatever actually talks to the emulator: the in-process
//! [`crate::host::HostProvider`], a test double, or an adapter over another
//! runtime. The bridge only ever sees `Arc<dyn CapabilityProvider>`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::EventHub;
use crate::types::{
    DiscordProfile, LoginResult, RetroAchievementsState, SettingType, SettingValue,
};
use crate::Result;

/// Methods a native capability provider exposes to the bridge.
///
/// Every method is an independent request/response exchange. Implementations
/// may serialize or interleave concurrent calls; the bridge imposes no order.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Name the provider is registered and resolved under.
    fn name(&self) -> &str;

    /// Event source backing the bridge's subscriptions.
    fn events(&self) -> Arc<EventHub>;

    // Settings / core
    async fn get_setting(
        &self,
        section: &str,
        key: &str,
        ty: SettingType,
    ) -> Result<Option<SettingValue>>;
    async fn set_setting(
        &self,
        section: &str,
        key: &str,
        ty: SettingType,
        value: SettingValue,
    ) -> Result<bool>;
    async fn refresh_bios(&self) -> Result<()>;
    async fn has_valid_vm(&self) -> Result<bool>;
    async fn get_data_root(&self) -> Result<String>;
    async fn set_data_root_override(&self, path: &str) -> Result<String>;

    // RetroAchievements
    async fn get_retro_achievements_state(&self) -> Result<RetroAchievementsState>;
    async fn refresh_retro_achievements_state(&self) -> Result<()>;
    async fn login_retro_achievements(&self, username: &str, password: &str)
        -> Result<LoginResult>;
    async fn logout_retro_achievements(&self) -> Result<()>;
    async fn set_retro_achievements_enabled(&self, enabled: bool) -> Result<()>;
    async fn set_retro_achievements_hardcore(&self, enabled: bool) -> Result<()>;

    // Discord
    async fn get_discord_profile(&self) -> Result<DiscordProfile>;
    async fn begin_discord_login(&self) -> Result<bool>;
    async fn logout_discord(&self) -> Result<bool>;

    // Input / tools
    async fn set_pad_vibration(&self, enabled: bool) -> Result<()>;
    async fn convert_iso_to_chd(&self, path: &str) -> Result<i32>;
}

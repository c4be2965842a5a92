//! Backend seams of the host provider.
//!
//! These traits are implemented by whatever wraps the real emulator core,
//! RetroAchievements client, and Discord SDK. None of that is reimplemented
//! here.

use std::path::PathBuf;
use std::sync::Weak;

use async_trait::async_trait;

use crate::types::{RetroAchievementsState, SettingType, SettingValue};

/// Entry points into the native emulator library.
///
/// Calls are synchronous and may block; the host moves long-running work
/// (CHD conversion) off the async runtime.
pub trait NativeApp: Send + Sync {
    /// Whether the emulator library is bundled in this build.
    fn has_native_binary(&self) -> bool;
    /// Whether the tools library (CHD conversion) is bundled in this build.
    fn has_native_tools(&self) -> bool;

    fn get_setting(&self, section: &str, key: &str, ty: SettingType) -> Option<SettingValue>;
    /// `value` is already rendered in the settings layer's string form.
    fn set_setting(&self, section: &str, key: &str, ty: SettingType, value: &str);
    fn refresh_bios(&self);
    fn has_valid_vm(&self) -> bool;
    fn set_pad_vibration(&self, enabled: bool);
    /// Blocking conversion. Returns the native result code.
    fn convert_iso_to_chd(&self, path: &str) -> i32;

    /// Current data root; may be relative.
    fn data_root(&self) -> PathBuf;
    fn set_data_root_override(&self, path: &str);
    fn reinitialize_data_root(&self, path: &str);
}

/// Receives RetroAchievements client callbacks.
pub trait AchievementsObserver: Send + Sync {
    fn on_state_updated(&self, state: Option<RetroAchievementsState>);
    fn on_login_requested(&self, reason: i32);
    fn on_login_success(
        &self,
        username: &str,
        points: i32,
        softcore_points: i32,
        unread_messages: i32,
    );
    fn on_hardcore_mode_changed(&self, enabled: bool);
}

/// RetroAchievements client.
#[async_trait]
pub trait RetroAchievementsService: Send + Sync {
    /// Last state published by the client, if any.
    fn last_state(&self) -> Option<RetroAchievementsState>;
    /// Ask the client to republish its state; the result arrives via the observer.
    fn refresh_state(&self);
    /// Returns `(success, message)`.
    async fn login(&self, username: &str, password: &str) -> (bool, String);
    fn logout(&self);
    fn set_enabled(&self, enabled: bool);
    fn set_hardcore(&self, enabled: bool);
    fn set_observer(&self, observer: Option<Weak<dyn AchievementsObserver>>);
}

/// Receives Discord SDK callbacks.
pub trait DiscordObserver: Send + Sync {
    fn on_login_state_changed(&self, logged_in: bool);
    fn on_error(&self, message: &str);
    fn on_user_info_updated(&self, username: &str);
}

/// Discord SDK wrapper.
pub trait DiscordService: Send + Sync {
    /// Whether the SDK is bundled in this build.
    fn is_available(&self) -> bool;
    fn is_logged_in(&self) -> bool;
    fn username(&self) -> Option<String>;
    fn avatar_url(&self) -> Option<String>;
    fn begin_authorize(&self);
    fn clear_tokens(&self);
    fn set_observer(&self, observer: Option<Weak<dyn DiscordObserver>>);
}

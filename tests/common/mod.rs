//! Shared test doubles: a scripted provider and fake host backends.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use armsx2_bridge::host::{
    AchievementsObserver, DiscordObserver, DiscordService, NativeApp, RetroAchievementsService,
};
use armsx2_bridge::{
    CapabilityProvider, DiscordProfile, Error, EventHub, LoginResult, RetroAchievementsState,
    Result, SettingType, SettingValue,
};
use async_trait::async_trait;

/// Provider that either answers every call with a fixed value or fails every call.
pub struct ScriptedProvider {
    name: String,
    fail: bool,
    events: Arc<EventHub>,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn ok(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail: false,
            events: Arc::new(EventHub::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail: true,
            events: Arc::new(EventHub::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn hub(&self) -> Arc<EventHub> {
        Arc::clone(&self.events)
    }

    fn answer<T>(&self, method: &str, value: T) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(Error::call_failed(method, "native module raised"))
        } else {
            Ok(value)
        }
    }
}

pub fn logged_in_state() -> RetroAchievementsState {
    RetroAchievementsState {
        achievements_enabled: true,
        logged_in: true,
        username: Some("player1".to_string()),
        points: 1200,
        ..Default::default()
    }
}

#[async_trait]
impl CapabilityProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn events(&self) -> Arc<EventHub> {
        self.hub()
    }

    async fn get_setting(
        &self,
        _section: &str,
        _key: &str,
        _ty: SettingType,
    ) -> Result<Option<SettingValue>> {
        self.answer("get_setting", Some(SettingValue::Bool(true)))
    }

    async fn set_setting(
        &self,
        _section: &str,
        _key: &str,
        _ty: SettingType,
        _value: SettingValue,
    ) -> Result<bool> {
        self.answer("set_setting", true)
    }

    async fn refresh_bios(&self) -> Result<()> {
        self.answer("refresh_bios", ())
    }

    async fn has_valid_vm(&self) -> Result<bool> {
        self.answer("has_valid_vm", true)
    }

    async fn get_data_root(&self) -> Result<String> {
        self.answer("get_data_root", "/data/armsx2".to_string())
    }

    async fn set_data_root_override(&self, path: &str) -> Result<String> {
        self.answer("set_data_root_override", path.to_string())
    }

    async fn get_retro_achievements_state(&self) -> Result<RetroAchievementsState> {
        self.answer("get_retro_achievements_state", logged_in_state())
    }

    async fn refresh_retro_achievements_state(&self) -> Result<()> {
        self.answer("refresh_retro_achievements_state", ())
    }

    async fn login_retro_achievements(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<LoginResult> {
        self.answer("login_retro_achievements", LoginResult::succeeded())
    }

    async fn logout_retro_achievements(&self) -> Result<()> {
        self.answer("logout_retro_achievements", ())
    }

    async fn set_retro_achievements_enabled(&self, _enabled: bool) -> Result<()> {
        self.answer("set_retro_achievements_enabled", ())
    }

    async fn set_retro_achievements_hardcore(&self, _enabled: bool) -> Result<()> {
        self.answer("set_retro_achievements_hardcore", ())
    }

    async fn get_discord_profile(&self) -> Result<DiscordProfile> {
        self.answer(
            "get_discord_profile",
            DiscordProfile {
                available: true,
                logged_in: true,
                username: Some("player1".to_string()),
                avatar_url: None,
            },
        )
    }

    async fn begin_discord_login(&self) -> Result<bool> {
        self.answer("begin_discord_login", true)
    }

    async fn logout_discord(&self) -> Result<bool> {
        self.answer("logout_discord", true)
    }

    async fn set_pad_vibration(&self, _enabled: bool) -> Result<()> {
        self.answer("set_pad_vibration", ())
    }

    async fn convert_iso_to_chd(&self, _path: &str) -> Result<i32> {
        self.answer("convert_iso_to_chd", 0)
    }
}

/// In-memory stand-in for the native emulator library.
pub struct FakeNative {
    pub binary: bool,
    pub tools: bool,
    pub settings: Mutex<HashMap<(String, String), String>>,
    pub vibration: AtomicBool,
    pub bios_refreshes: AtomicUsize,
    pub data_root: Mutex<PathBuf>,
    pub reinitialized: Mutex<Vec<String>>,
    pub convert_result: i32,
    pub converted: Mutex<Vec<String>>,
}

impl FakeNative {
    pub fn new(binary: bool, tools: bool) -> Arc<Self> {
        Arc::new(Self {
            binary,
            tools,
            settings: Mutex::new(HashMap::new()),
            vibration: AtomicBool::new(false),
            bios_refreshes: AtomicUsize::new(0),
            data_root: Mutex::new(PathBuf::from("/storage/armsx2")),
            reinitialized: Mutex::new(Vec::new()),
            convert_result: 0,
            converted: Mutex::new(Vec::new()),
        })
    }
}

impl NativeApp for FakeNative {
    fn has_native_binary(&self) -> bool {
        self.binary
    }

    fn has_native_tools(&self) -> bool {
        self.tools
    }

    fn get_setting(&self, section: &str, key: &str, ty: SettingType) -> Option<SettingValue> {
        let settings = self.settings.lock().unwrap();
        let raw = settings.get(&(section.to_string(), key.to_string()))?;
        match ty {
            SettingType::Bool => raw.parse::<bool>().ok().map(SettingValue::Bool),
            SettingType::Int | SettingType::UInt => raw.parse::<i64>().ok().map(SettingValue::Int),
            SettingType::Float => raw.parse::<f64>().ok().map(SettingValue::Float),
            SettingType::String => Some(SettingValue::String(raw.clone())),
        }
    }

    fn set_setting(&self, section: &str, key: &str, _ty: SettingType, value: &str) {
        self.settings
            .lock()
            .unwrap()
            .insert((section.to_string(), key.to_string()), value.to_string());
    }

    fn refresh_bios(&self) {
        self.bios_refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn has_valid_vm(&self) -> bool {
        false
    }

    fn set_pad_vibration(&self, enabled: bool) {
        self.vibration.store(enabled, Ordering::SeqCst);
    }

    fn convert_iso_to_chd(&self, path: &str) -> i32 {
        self.converted.lock().unwrap().push(path.to_string());
        self.convert_result
    }

    fn data_root(&self) -> PathBuf {
        self.data_root.lock().unwrap().clone()
    }

    fn set_data_root_override(&self, path: &str) {
        *self.data_root.lock().unwrap() = PathBuf::from(path);
    }

    fn reinitialize_data_root(&self, path: &str) {
        self.reinitialized.lock().unwrap().push(path.to_string());
    }
}

#[derive(Default)]
pub struct FakeAchievements {
    pub state: Mutex<Option<RetroAchievementsState>>,
    pub observer: Mutex<Option<Weak<dyn AchievementsObserver>>>,
    pub login_reply: Mutex<(bool, String)>,
    pub enabled: AtomicBool,
    pub hardcore: AtomicBool,
    pub refreshes: AtomicUsize,
}

impl FakeAchievements {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn observer(&self) -> Option<Arc<dyn AchievementsObserver>> {
        self.observer.lock().unwrap().as_ref().and_then(Weak::upgrade)
    }
}

#[async_trait]
impl RetroAchievementsService for FakeAchievements {
    fn last_state(&self) -> Option<RetroAchievementsState> {
        self.state.lock().unwrap().clone()
    }

    fn refresh_state(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    async fn login(&self, username: &str, _password: &str) -> (bool, String) {
        let reply = self.login_reply.lock().unwrap().clone();
        if reply.0 {
            *self.state.lock().unwrap() = Some(RetroAchievementsState {
                logged_in: true,
                username: Some(username.to_string()),
                ..Default::default()
            });
        }
        reply
    }

    fn logout(&self) {
        *self.state.lock().unwrap() = None;
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn set_hardcore(&self, enabled: bool) {
        self.hardcore.store(enabled, Ordering::SeqCst);
    }

    fn set_observer(&self, observer: Option<Weak<dyn AchievementsObserver>>) {
        *self.observer.lock().unwrap() = observer;
    }
}

pub struct FakeDiscord {
    pub available: bool,
    pub logged_in: AtomicBool,
    pub username: Mutex<Option<String>>,
    pub authorize_calls: AtomicUsize,
    pub observer: Mutex<Option<Weak<dyn DiscordObserver>>>,
}

impl FakeDiscord {
    pub fn new(available: bool) -> Arc<Self> {
        Arc::new(Self {
            available,
            logged_in: AtomicBool::new(false),
            username: Mutex::new(None),
            authorize_calls: AtomicUsize::new(0),
            observer: Mutex::new(None),
        })
    }

    pub fn observer(&self) -> Option<Arc<dyn DiscordObserver>> {
        self.observer.lock().unwrap().as_ref().and_then(Weak::upgrade)
    }
}

impl DiscordService for FakeDiscord {
    fn is_available(&self) -> bool {
        self.available
    }

    fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    fn username(&self) -> Option<String> {
        self.username.lock().unwrap().clone()
    }

    fn avatar_url(&self) -> Option<String> {
        None
    }

    fn begin_authorize(&self) {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn clear_tokens(&self) {
        self.logged_in.store(false, Ordering::SeqCst);
        *self.username.lock().unwrap() = None;
    }

    fn set_observer(&self, observer: Option<Weak<dyn DiscordObserver>>) {
        *self.observer.lock().unwrap() = observer;
    }
}

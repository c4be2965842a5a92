//! Event payloads delivered on the bridge's event channels.

use serde::{Deserialize, Serialize};

use super::{DiscordProfile, RetroAchievementsState};
use crate::events::Channel;

/// Payload of the RetroAchievements state channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetroAchievementsEvent {
    /// Hardcore mode toggled on the native side.
    HardcoreChanged {
        #[serde(rename = "hardcoreEnabled")]
        hardcore_enabled: bool,
    },
    /// Full state snapshot.
    State(RetroAchievementsState),
}

/// The native side asks the application to present a login prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub reason: i32,
}

/// Payload of the Discord channel: current profile plus an optional error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscordEvent {
    #[serde(flatten)]
    pub profile: DiscordProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiscordEvent {
    pub fn new(profile: DiscordProfile) -> Self {
        Self {
            profile,
            error: None,
        }
    }

    /// Attach an error message; empty messages are dropped.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !message.is_empty() {
            self.error = Some(message);
        }
        self
    }
}

/// Any event emitted through an [`crate::events::EventHub`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    RetroAchievements(RetroAchievementsEvent),
    RetroAchievementsLogin(LoginRequest),
    Discord(DiscordEvent),
}

impl BridgeEvent {
    /// Channel this event is delivered on.
    pub fn channel(&self) -> Channel {
        match self {
            BridgeEvent::RetroAchievements(_) => Channel::RetroAchievements,
            BridgeEvent::RetroAchievementsLogin(_) => Channel::RetroAchievementsLogin,
            BridgeEvent::Discord(_) => Channel::Discord,
        }
    }

    /// Payload as a JSON object, the shape application listeners receive.
    pub fn payload_json(&self) -> crate::Result<serde_json::Value> {
        let value = match self {
            BridgeEvent::RetroAchievements(e) => serde_json::to_value(e)?,
            BridgeEvent::RetroAchievementsLogin(e) => serde_json::to_value(e)?,
            BridgeEvent::Discord(e) => serde_json::to_value(e)?,
        };
        Ok(value)
    }
}

impl From<RetroAchievementsEvent> for BridgeEvent {
    fn from(e: RetroAchievementsEvent) -> Self {
        BridgeEvent::RetroAchievements(e)
    }
}

impl From<LoginRequest> for BridgeEvent {
    fn from(e: LoginRequest) -> Self {
        BridgeEvent::RetroAchievementsLogin(e)
    }
}

impl From<DiscordEvent> for BridgeEvent {
    fn from(e: DiscordEvent) -> Self {
        BridgeEvent::Discord(e)
    }
}

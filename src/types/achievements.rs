//! RetroAchievements payloads.

use serde::{Deserialize, Serialize};

/// Snapshot of the RetroAchievements client as last reported by the native side.
///
/// A missing snapshot is represented by [`RetroAchievementsState::default`],
/// which reads as "not logged in".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetroAchievementsState {
    pub achievements_enabled: bool,
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_path: Option<String>,
    pub points: i32,
    pub softcore_points: i32,
    pub unread_messages: i32,
    pub hardcore_preference: bool,
    pub hardcore_active: bool,
    pub has_active_game: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_presence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_icon_path: Option<String>,
    pub unlocked_achievements: i32,
    pub total_achievements: i32,
    pub unlocked_points: i32,
    pub total_points: i32,
    pub game_id: i32,
    pub has_leaderboards: bool,
}

impl RetroAchievementsState {
    /// Fraction of the active game's achievements unlocked, if any exist.
    pub fn completion(&self) -> Option<f32> {
        if !self.has_active_game || self.total_achievements <= 0 {
            return None;
        }
        Some(self.unlocked_achievements as f32 / self.total_achievements as f32)
    }
}

/// Outcome of a RetroAchievements login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoginResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }

    /// Attach a message; empty messages are dropped.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = if message.is_empty() {
            None
        } else {
            Some(message)
        };
        self
    }
}

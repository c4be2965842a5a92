//! # Types Module
//!
//! Typed values crossing the bridge boundary. Field names serialize in
//! camelCase, which is what the application layer has always received from
//! the native module.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`settings`] | Setting types and values |
//! | [`achievements`] | RetroAchievements state and login result |
//! | [`discord`] | Discord profile snapshot |
//! | [`events`] | Payloads delivered on the event channels |

pub mod achievements;
pub mod discord;
pub mod events;
pub mod settings;

pub use achievements::{LoginResult, RetroAchievementsState};
pub use discord::DiscordProfile;
pub use events::{BridgeEvent, DiscordEvent, LoginRequest, RetroAchievementsEvent};
pub use settings::{SettingType, SettingValue};

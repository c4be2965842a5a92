//! # armsx2-bridge
//!
//! Fallback-safe bridge between the ARMSX2 application layer and the native
//! emulator module.
//!
//! ## Overview
//!
//! The application never talks to the native module directly. It goes
//! through a [`Bridge`], which resolves a [`CapabilityProvider`] by name once,
//! when it is built, and wraps every call so that nothing ever fails at the
//! call site: a missing provider, or a provider call that errors, resolves to
//! a documented fallback value instead.
//!
//! The same crate carries the host side of that boundary,
//! [`host::HostProvider`], which implements the provider contract over the
//! emulator core, RetroAchievements client, and Discord SDK backends.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use armsx2_bridge::{Bridge, SettingType};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bridge = Bridge::builder().dev_mode(true).build();
//!
//!     // `None` if the provider is absent or the call fails.
//!     let cheats = bridge.get_setting("EmuCore", "Cheats", SettingType::Bool).await;
//!     println!("cheats: {:?}", cheats);
//!
//!     let _sub = bridge.subscribe_to_discord(|event| {
//!         println!("discord: {:?}", event.profile);
//!     });
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | The facade and its builder |
//! | [`provider`] | The capability provider contract |
//! | [`registry`] | Named provider lookup |
//! | [`events`] | Event channels, hub, and subscriptions |
//! | [`host`] | Provider implementation over native backends |
//! | [`types`] | Settings, RetroAchievements, Discord, and event payloads |
//! | [`config`] | Bridge configuration |
//! | [`logging`] | `tracing` subscriber setup |

pub mod bridge;
pub mod config;
pub mod events;
pub mod host;
pub mod logging;
pub mod provider;
pub mod registry;
pub mod types;

pub mod error;
pub use error::{Error, ErrorContext, RejectCode};

pub use bridge::{shared_bridge, Bridge, BridgeBuilder, CONVERSION_FAILED};
pub use config::BridgeConfig;
pub use events::{Channel, EventEmitter, EventHub, Subscription};
pub use provider::CapabilityProvider;
pub use registry::{get_provider_registry, ProviderRegistry};
pub use types::{
    BridgeEvent, DiscordEvent, DiscordProfile, LoginRequest, LoginResult,
    RetroAchievementsEvent, RetroAchievementsState, SettingType, SettingValue,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

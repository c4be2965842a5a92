//! Event channels between a capability provider and the application.
//!
//! A provider owns an [`EventHub`] (its event source). The bridge wraps that
//! hub in an [`EventEmitter`] and hands out [`Subscription`] handles to
//! application listeners.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Channel`] | The three named channels |
//! | [`EventHub`] | Provider-side listener table and `emit` |
//! | [`EventEmitter`] | Consumer-side view used to register listeners |
//! | [`Subscription`] | Handle returned for each registered listener |

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::{debug, trace};

use crate::types::BridgeEvent;

/// Named event channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    RetroAchievements,
    RetroAchievementsLogin,
    Discord,
}

impl Channel {
    pub const ALL: [Channel; 3] = [
        Channel::RetroAchievements,
        Channel::RetroAchievementsLogin,
        Channel::Discord,
    ];

    /// Wire name of the channel.
    pub fn name(&self) -> &'static str {
        match self {
            Channel::RetroAchievements => "armsx2.retroAchievements",
            Channel::RetroAchievementsLogin => "armsx2.retroAchievementsLogin",
            Channel::Discord => "armsx2.discord",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Listener callback. Called synchronously on the emitting thread.
pub type Listener = Arc<dyn Fn(&BridgeEvent) + Send + Sync>;

/// Identifier of a registered listener, unique within one hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    listener: Listener,
}

/// Provider-side event source.
///
/// Listeners are kept per channel in registration order. Emission is a
/// no-op once the hub is deactivated.
pub struct EventHub {
    listeners: RwLock<HashMap<Channel, Vec<Entry>>>,
    next_id: AtomicU64,
    active: AtomicBool,
}

impl EventHub {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            active: AtomicBool::new(true),
        }
    }

    pub fn add_listener(&self, channel: Channel, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(channel)
            .or_default()
            .push(Entry { id, listener });
        debug!(channel = %channel, listener = id.0, "listener added");
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, channel: Channel, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(entries) = listeners.get_mut(&channel) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() < before
    }

    pub fn remove_all_listeners(&self, channel: Channel) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&channel);
    }

    pub fn listener_count(&self, channel: Channel) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&channel)
            .map(|v| v.len())
            .unwrap_or(0)
    }

    /// Deliver an event to every listener on its channel.
    ///
    /// Returns the number of listeners invoked.
    pub fn emit(&self, event: impl Into<BridgeEvent>) -> usize {
        if !self.is_active() {
            return 0;
        }
        let event = event.into();
        let channel = event.channel();
        // Snapshot so listeners may (un)subscribe while being called.
        let callbacks: Vec<Listener> = {
            let listeners = self
                .listeners
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            listeners
                .get(&channel)
                .map(|v| v.iter().map(|e| e.listener.clone()).collect())
                .unwrap_or_default()
        };
        trace!(channel = %channel, listeners = callbacks.len(), "emit");
        for cb in &callbacks {
            cb(&event);
        }
        callbacks.len()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = Channel::ALL
            .iter()
            .map(|c| (c.name(), self.listener_count(*c)))
            .collect();
        f.debug_struct("EventHub")
            .field("listeners", &counts)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Consumer-side view of a provider's [`EventHub`].
#[derive(Debug, Clone)]
pub struct EventEmitter {
    hub: Arc<EventHub>,
}

impl EventEmitter {
    pub fn new(hub: Arc<EventHub>) -> Self {
        Self { hub }
    }

    /// Register a listener on `channel`.
    pub fn add_listener<F>(&self, channel: Channel, listener: F) -> Subscription
    where
        F: Fn(&BridgeEvent) + Send + Sync + 'static,
    {
        let id = self.hub.add_listener(channel, Arc::new(listener));
        Subscription {
            channel,
            id,
            hub: Arc::downgrade(&self.hub),
        }
    }

    pub fn listener_count(&self, channel: Channel) -> usize {
        self.hub.listener_count(channel)
    }
}

/// Handle for a registered listener.
///
/// Dropping the handle leaves the listener registered; call
/// [`Subscription::remove`] to detach it.
#[derive(Debug, Clone)]
pub struct Subscription {
    channel: Channel,
    id: ListenerId,
    hub: Weak<EventHub>,
}

impl Subscription {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Detach the listener. Returns `false` if it was already removed or the
    /// hub is gone.
    pub fn remove(&self) -> bool {
        match self.hub.upgrade() {
            Some(hub) => hub.remove_listener(self.channel, self.id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LoginRequest, RetroAchievementsEvent};
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_channel_names_round_trip() {
        for c in Channel::ALL {
            assert_eq!(Channel::from_name(c.name()), Some(c));
        }
        assert_eq!(Channel::from_name("armsx2.unknown"), None);
    }

    #[test]
    fn test_emit_only_reaches_matching_channel() {
        let hub = Arc::new(EventHub::new());
        let emitter = EventEmitter::new(hub.clone());
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let _sub = emitter.add_listener(Channel::RetroAchievementsLogin, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(hub.emit(LoginRequest { reason: 1 }), 1);
        assert_eq!(
            hub.emit(RetroAchievementsEvent::HardcoreChanged {
                hardcore_enabled: true
            }),
            0
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_remove_and_inactive_hub() {
        let hub = Arc::new(EventHub::new());
        let emitter = EventEmitter::new(hub.clone());
        let sub = emitter.add_listener(Channel::Discord, |_| {});
        assert_eq!(emitter.listener_count(Channel::Discord), 1);

        hub.set_active(false);
        assert_eq!(hub.emit(crate::types::DiscordEvent::default()), 0);

        assert!(sub.remove());
        assert!(!sub.remove());
        assert_eq!(emitter.listener_count(Channel::Discord), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_emit() {
        let hub = Arc::new(EventHub::new());
        let emitter = EventEmitter::new(hub.clone());
        let slot: Arc<RwLock<Option<Subscription>>> = Arc::new(RwLock::new(None));
        let s = slot.clone();
        let sub = emitter.add_listener(Channel::Discord, move |_| {
            if let Some(sub) = s.read().unwrap().as_ref() {
                sub.remove();
            }
        });
        *slot.write().unwrap() = Some(sub);

        assert_eq!(hub.emit(crate::types::DiscordEvent::default()), 1);
        assert_eq!(hub.listener_count(Channel::Discord), 0);
    }
}

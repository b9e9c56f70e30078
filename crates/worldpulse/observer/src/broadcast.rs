//! Replay-latest fan-out channels
//!
//! Each channel holds the latest published value and delivers every
//! update to all current subscribers. A new subscriber immediately
//! receives the latest value (if one was ever published), then every
//! subsequent publish, until it detaches.
//!
//! Publication never blocks on a subscriber: fan-out goes through
//! bounded per-subscriber buffers, and a subscriber that falls further
//! behind than the channel capacity drops its oldest pending values and
//! resumes at the most recent. Skipped counts are surfaced on the
//! subscription.

use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;
use worldpulse_types::{PresenceSet, ServerStatus, TrackedSign};

/// One replay-latest channel.
///
/// The latest-value cache and the fan-out sender sit behind a single
/// lock, so a subscriber attaching concurrently with a publish either
/// replays that value or receives it live, never both and never
/// neither.
pub struct ReplayChannel<T> {
    name: &'static str,
    shared: Mutex<Shared<T>>,
}

struct Shared<T> {
    latest: Option<T>,
    tx: broadcast::Sender<T>,
}

impl<T: Clone> ReplayChannel<T> {
    /// Create a channel with the given per-subscriber buffer capacity.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            name,
            shared: Mutex::new(Shared { latest: None, tx }),
        }
    }

    /// Store `value` as latest and deliver it to every current
    /// subscriber.
    pub fn publish(&self, value: T) {
        let mut shared = self.shared.lock().expect("channel lock");
        shared.latest = Some(value.clone());
        // No live subscribers is fine; the value stays cached for replay
        let _ = shared.tx.send(value);
    }

    /// Attach a new subscriber.
    ///
    /// The subscription yields the cached latest value first (nothing
    /// if the channel never published), then every later publish.
    pub fn subscribe(&self) -> Subscription<T> {
        let shared = self.shared.lock().expect("channel lock");
        let rx = shared.tx.subscribe();
        let replay = shared.latest.clone();
        let id = Uuid::new_v4();
        debug!(channel = self.name, subscription = %id, "subscriber attached");
        Subscription {
            id,
            channel: self.name,
            replay,
            skipped: 0,
            rx,
        }
    }

    /// Read the cached latest value without subscribing.
    pub fn latest(&self) -> Option<T> {
        self.shared.lock().expect("channel lock").latest.clone()
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.lock().expect("channel lock").tx.receiver_count()
    }
}

/// A live subscription to one channel.
///
/// Dropping the subscription detaches it; nothing published after the
/// drop returns is ever delivered to it.
pub struct Subscription<T> {
    id: Uuid,
    channel: &'static str,
    replay: Option<T>,
    skipped: u64,
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Receive the next value.
    ///
    /// Yields the replayed latest value on the first call when the
    /// channel had published before attach. Returns `None` once the
    /// channel itself is gone (observer shut down).
    pub async fn recv(&mut self) -> Option<T> {
        if let Some(value) = self.replay.take() {
            return Some(value);
        }
        loop {
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    self.skipped += n;
                    warn!(
                        channel = self.channel,
                        subscription = %self.id,
                        lagged = n,
                        "subscriber behind; dropping oldest pending values"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Receive the next value without waiting, if one is pending.
    pub fn try_recv(&mut self) -> Option<T> {
        if let Some(value) = self.replay.take() {
            return Some(value);
        }
        loop {
            match self.rx.try_recv() {
                Ok(value) => return Some(value),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    self.skipped += n;
                    warn!(
                        channel = self.channel,
                        subscription = %self.id,
                        lagged = n,
                        "subscriber behind; dropping oldest pending values"
                    );
                }
                Err(_) => return None,
            }
        }
    }

    /// How many pending values this subscriber has dropped by lagging.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Detach from the channel.
    ///
    /// Dropping the subscription has the same effect; this form just
    /// names the intent at call sites.
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        debug!(channel = self.channel, subscription = %self.id, "subscriber detached");
    }
}

/// The three observation streams: world heartbeat, player presence and
/// tracked-sign snapshots.
///
/// One instance lives for the observer's lifetime; each channel is
/// independent and replay-latest.
pub struct ChangeBroadcaster {
    world: ReplayChannel<ServerStatus>,
    presence: ReplayChannel<PresenceSet>,
    signs: ReplayChannel<Vec<TrackedSign>>,
}

impl ChangeBroadcaster {
    /// Create the three channels with the given per-subscriber buffer
    /// capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            world: ReplayChannel::new("world", capacity),
            presence: ReplayChannel::new("presence", capacity),
            signs: ReplayChannel::new("signs", capacity),
        }
    }

    /// Publish a world heartbeat.
    pub fn publish_world(&self, status: ServerStatus) {
        self.world.publish(status);
    }

    /// Publish the online-player set.
    pub fn publish_presence(&self, players: PresenceSet) {
        self.presence.publish(players);
    }

    /// Publish a full tracked-sign snapshot.
    pub fn publish_signs(&self, signs: Vec<TrackedSign>) {
        self.signs.publish(signs);
    }

    /// Subscribe to world heartbeats.
    pub fn subscribe_world(&self) -> Subscription<ServerStatus> {
        self.world.subscribe()
    }

    /// Subscribe to online-player sets.
    pub fn subscribe_presence(&self) -> Subscription<PresenceSet> {
        self.presence.subscribe()
    }

    /// Subscribe to tracked-sign snapshots.
    pub fn subscribe_signs(&self) -> Subscription<Vec<TrackedSign>> {
        self.signs.subscribe()
    }

    /// Latest world heartbeat, if any.
    pub fn latest_world(&self) -> Option<ServerStatus> {
        self.world.latest()
    }

    /// Latest online-player set, if any.
    pub fn latest_presence(&self) -> Option<PresenceSet> {
        self.presence.latest()
    }

    /// Latest tracked-sign snapshot, if any.
    pub fn latest_signs(&self) -> Option<Vec<TrackedSign>> {
        self.signs.latest()
    }
}

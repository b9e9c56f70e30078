//! The world observer
//!
//! Ties the pieces together: the reconciler and presence tracker
//! consume the engine's event feed through [`WorldObserver::handle_event`],
//! the periodic producers re-publish the heartbeat and the online set,
//! and subscribers attach to the three replay-latest streams.

use crate::broadcast::{ChangeBroadcaster, Subscription};
use crate::engine::GameEngine;
use crate::errors::{ObserverError, ObserverResult};
use crate::presence::PresenceTracker;
use crate::reconciler::WorldEventReconciler;
use crate::registry::RegistryStats;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use worldpulse_types::{ObserverConfig, PresenceSet, ServerStatus, TrackedSign, WorldEvent};

/// Live observation of a running game world.
///
/// Create one per world engine, call [`start`](Self::start) from within
/// a tokio runtime to launch the periodic producers, and feed the
/// engine's event stream into [`handle_event`](Self::handle_event) from
/// any thread. Subscriptions outlive nothing: the observer owns the
/// channels, and dropping it ends delivery.
pub struct WorldObserver {
    config: ObserverConfig,
    engine: Arc<dyn GameEngine>,
    broadcaster: Arc<ChangeBroadcaster>,
    reconciler: WorldEventReconciler,
    presence: Arc<PresenceTracker>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl WorldObserver {
    /// Create an observer over the given engine.
    ///
    /// Rejects an invalid configuration; nothing runs until
    /// [`start`](Self::start).
    pub fn new(config: ObserverConfig, engine: Arc<dyn GameEngine>) -> ObserverResult<Self> {
        config.validate()?;

        let broadcaster = Arc::new(ChangeBroadcaster::new(config.channel_capacity));
        let reconciler =
            WorldEventReconciler::new(Arc::clone(&engine), Arc::clone(&broadcaster));
        let presence = Arc::new(PresenceTracker::new(
            Arc::clone(&engine),
            Arc::clone(&broadcaster),
        ));

        Ok(Self {
            config,
            engine,
            broadcaster,
            reconciler,
            presence,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Launch the periodic producers.
    ///
    /// Seeds the signs channel with the current (initially empty)
    /// snapshot, then spawns the world heartbeat and the presence
    /// keep-alive. Both emit immediately and every interval thereafter.
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> ObserverResult<()> {
        let mut tasks = self.tasks.lock().expect("task list lock");
        if !tasks.is_empty() {
            return Err(ObserverError::AlreadyStarted);
        }

        self.broadcaster.publish_signs(self.reconciler.current_signs());

        let engine = Arc::clone(&self.engine);
        let broadcaster = Arc::clone(&self.broadcaster);
        let heartbeat_interval = self.config.heartbeat_interval;
        tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(heartbeat_interval);
            loop {
                ticker.tick().await;
                broadcaster.publish_world(engine.server_status());
            }
        }));

        let presence = Arc::clone(&self.presence);
        let presence_interval = self.config.presence_interval;
        tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(presence_interval);
            loop {
                ticker.tick().await;
                presence.refresh();
            }
        }));

        info!(
            heartbeat_secs = self.config.heartbeat_interval.as_secs(),
            presence_secs = self.config.presence_interval.as_secs(),
            "world observer started"
        );
        Ok(())
    }

    /// Feed one world event into the observation pipeline.
    ///
    /// Safe to call from any thread; block and redstone events are
    /// reconciled against the registry under its single lock, player
    /// events re-derive and publish the online set.
    pub fn handle_event(&self, event: WorldEvent) {
        debug!(kind = event.kind(), "world event received");
        match event {
            WorldEvent::BlockDestroyed { location } => self.reconciler.block_destroyed(&location),
            WorldEvent::RedstoneChanged { location, level } => {
                self.reconciler.redstone_changed(&location, level)
            }
            WorldEvent::SignAuthored { location, lines } => {
                self.reconciler.sign_authored(&location, &lines)
            }
            WorldEvent::PlayerJoined { player } => self.presence.player_joined(&player),
            WorldEvent::PlayerLeft { player } => self.presence.player_left(&player),
        }
    }

    /// Subscribe to world heartbeats (periodic, replay-latest).
    pub fn subscribe_world(&self) -> Subscription<ServerStatus> {
        self.broadcaster.subscribe_world()
    }

    /// Subscribe to online-player sets (edge- and interval-triggered,
    /// replay-latest).
    pub fn subscribe_presence(&self) -> Subscription<PresenceSet> {
        self.broadcaster.subscribe_presence()
    }

    /// Subscribe to tracked-sign snapshots (edge-triggered only,
    /// replay-latest).
    pub fn subscribe_signs(&self) -> Subscription<Vec<TrackedSign>> {
        self.broadcaster.subscribe_signs()
    }

    /// Synchronous snapshot of all tracked signs, without subscribing.
    pub fn current_signs(&self) -> Vec<TrackedSign> {
        self.reconciler.current_signs()
    }

    /// Latest published heartbeat, if any.
    pub fn latest_server_status(&self) -> Option<ServerStatus> {
        self.broadcaster.latest_world()
    }

    /// Latest published online set, if any.
    pub fn latest_presence(&self) -> Option<PresenceSet> {
        self.broadcaster.latest_presence()
    }

    /// Sign-registry statistics.
    pub fn registry_stats(&self) -> RegistryStats {
        self.reconciler.stats()
    }

    /// The configuration this observer runs with.
    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    /// Stop the periodic producers.
    ///
    /// Existing subscriptions stay attached and continue to receive
    /// event-triggered publishes; only the timers stop. Idempotent.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock().expect("task list lock");
        if tasks.is_empty() {
            return;
        }
        for task in tasks.drain(..) {
            task.abort();
        }
        info!("world observer stopped");
    }
}

impl Drop for WorldObserver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StaticEngine;
    use std::time::Duration;
    use tokio::time::timeout;
    use worldpulse_types::{LocationKey, PlayerId};

    fn observer_with_engine() -> (Arc<StaticEngine>, WorldObserver) {
        let engine = Arc::new(StaticEngine::new("creative", "1.20.4"));
        let observer = WorldObserver::new(
            ObserverConfig::default(),
            Arc::clone(&engine) as Arc<dyn GameEngine>,
        )
        .unwrap();
        (engine, observer)
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let engine = Arc::new(StaticEngine::new("creative", "1.20.4"));
        let config = ObserverConfig {
            channel_capacity: 0,
            ..ObserverConfig::default()
        };

        let result = WorldObserver::new(config, engine as Arc<dyn GameEngine>);
        assert!(matches!(result, Err(ObserverError::Types(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_fails() {
        let (_engine, observer) = observer_with_engine();

        observer.start().unwrap();
        assert!(matches!(
            observer.start(),
            Err(ObserverError::AlreadyStarted)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_seeds_empty_signs_snapshot() {
        let (_engine, observer) = observer_with_engine();
        observer.start().unwrap();

        let mut signs = observer.subscribe_signs();
        assert_eq!(signs.recv().await, Some(Vec::new()));
        assert!(observer.current_signs().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_publishes_immediately_then_periodically() {
        let (_engine, observer) = observer_with_engine();
        let mut world = observer.subscribe_world();
        observer.start().unwrap();

        let first = timeout(Duration::from_secs(1), world.recv())
            .await
            .expect("immediate heartbeat")
            .unwrap();
        assert_eq!(first.name, "creative");
        assert_eq!(first.version, "1.20.4");

        let second = timeout(Duration::from_secs(16), world.recv())
            .await
            .expect("periodic heartbeat")
            .unwrap();
        assert!(second.observed_at >= first.observed_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_presence_republishes_on_interval() {
        let (engine, observer) = observer_with_engine();
        engine.connect_player(PlayerId::new("alex"));
        let mut presence = observer.subscribe_presence();
        observer.start().unwrap();

        let first = timeout(Duration::from_secs(1), presence.recv())
            .await
            .expect("immediate presence")
            .unwrap();
        assert!(first.contains(&PlayerId::new("alex")));

        // No edges in between; the keep-alive republishes anyway
        let second = timeout(Duration::from_secs(6), presence.recv())
            .await
            .expect("keep-alive presence")
            .unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_flow_end_to_end() {
        let (engine, observer) = observer_with_engine();
        observer.start().unwrap();
        let location = LocationKey::new("overworld", 0, 64, 0);

        observer.handle_event(WorldEvent::SignAuthored {
            location: location.clone(),
            lines: lines(&["Door"]),
        });

        let current = observer.current_signs();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].name, "Door");
        assert!(!current[0].active);

        observer.handle_event(WorldEvent::RedstoneChanged {
            location: location.below(),
            level: 15,
        });
        assert!(observer.current_signs()[0].active);

        let alex = PlayerId::new("alex");
        engine.connect_player(alex.clone());
        observer.handle_event(WorldEvent::PlayerJoined {
            player: alex.clone(),
        });
        assert!(observer.latest_presence().unwrap().contains(&alex));

        observer.handle_event(WorldEvent::BlockDestroyed { location });
        assert!(observer.current_signs().is_empty());
        assert_eq!(observer.registry_stats().total_removed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_subscriber_replays_latest_snapshot_only() {
        let (_engine, observer) = observer_with_engine();
        observer.start().unwrap();

        for name in ["First", "Second", "Third"] {
            observer.handle_event(WorldEvent::SignAuthored {
                location: LocationKey::new("overworld", 0, 64, 0),
                lines: lines(&[name]),
            });
        }

        let mut signs = observer.subscribe_signs();
        let replayed = signs.recv().await.unwrap();
        assert_eq!(replayed.len(), 1);
        assert_eq!(replayed[0].name, "Third");
        assert!(signs.try_recv().is_none(), "no earlier values re-delivered");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_timers_but_keeps_event_publishes() {
        let (_engine, observer) = observer_with_engine();
        let mut world = observer.subscribe_world();
        let mut signs = observer.subscribe_signs();
        observer.start().unwrap();

        world.recv().await.unwrap();
        signs.recv().await.unwrap();
        observer.shutdown();

        assert!(
            timeout(Duration::from_secs(60), world.recv()).await.is_err(),
            "no heartbeats after shutdown"
        );

        observer.handle_event(WorldEvent::SignAuthored {
            location: LocationKey::new("overworld", 0, 64, 0),
            lines: lines(&["Door"]),
        });
        assert_eq!(signs.recv().await.unwrap().len(), 1);
    }
}

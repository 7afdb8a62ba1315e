//! Render and UI Collaborators
//!
//! The core never draws or touches a DOM. It emits [`GameEvent`]s; the host
//! routes them to a renderer keyed by [`BodyId`] and to a UI that shows the
//! timer and the game-over screen.

use std::collections::BTreeSet;

use crate::core::vec3::Vec3;
use crate::game::body::{BodyId, Extents};
use crate::game::events::{DeathCause, GameEvent, GameEventData};

/// Scene-graph side of the host.
pub trait RenderSink {
    /// A body entered the scene.
    fn entity_added(&mut self, body_id: BodyId, position: Vec3, extents: Extents);

    /// A body left the scene.
    fn entity_removed(&mut self, body_id: BodyId);
}

/// Timer and game-over display. Purely informational.
pub trait UiSink {
    /// Elapsed clock changed.
    fn elapsed_changed(&mut self, elapsed_seconds: f64);

    /// Best time was committed.
    fn best_time_changed(&mut self, best_seconds: f64);

    /// Run ended.
    fn game_over(&mut self, elapsed_seconds: f64, cause: DeathCause);

    /// New run began.
    fn restarted(&mut self);

    /// First input of a fresh session.
    fn session_started(&mut self) {}

    /// Camera flip key went down. Cosmetic; ignored by default.
    fn camera_flip_requested(&mut self) {}
}

/// Route events to the two collaborators in emission order.
pub fn dispatch_events<R, U>(events: &[GameEvent], render: &mut R, ui: &mut U)
where
    R: RenderSink + ?Sized,
    U: UiSink + ?Sized,
{
    for event in events {
        match &event.data {
            GameEventData::EntitySpawned { body_id, position, extents } => {
                render.entity_added(*body_id, *position, *extents);
            }
            GameEventData::EntityRemoved { body_id } => render.entity_removed(*body_id),
            GameEventData::SessionStarted => ui.session_started(),
            GameEventData::ElapsedChanged { elapsed_seconds } => ui.elapsed_changed(*elapsed_seconds),
            GameEventData::BestTimeChanged { best_seconds } => ui.best_time_changed(*best_seconds),
            GameEventData::GameOver { elapsed_seconds, cause } => ui.game_over(*elapsed_seconds, *cause),
            GameEventData::Restarted => ui.restarted(),
            GameEventData::CameraFlipRequested => ui.camera_flip_requested(),
        }
    }
}

// =============================================================================
// RECORDING SINK
// =============================================================================

/// Headless sink that records what a real host would have shown.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    /// Bodies currently in the scene
    pub live: BTreeSet<BodyId>,
    /// Total add notifications
    pub added: u32,
    /// Total remove notifications
    pub removed: u32,
    /// Remove notifications for bodies that were never added
    pub orphan_removals: u32,
    /// Last elapsed value shown
    pub elapsed_seconds: f64,
    /// Last best time shown
    pub best_seconds: f64,
    /// Game-over screens shown, in order
    pub game_overs: Vec<(f64, DeathCause)>,
    /// Restart notifications
    pub restarts: u32,
    /// Session start notifications
    pub sessions_started: u32,
    /// Camera flips requested
    pub camera_flips: u32,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for RecordingSink {
    fn entity_added(&mut self, body_id: BodyId, _position: Vec3, _extents: Extents) {
        self.added += 1;
        self.live.insert(body_id);
    }

    fn entity_removed(&mut self, body_id: BodyId) {
        self.removed += 1;
        if !self.live.remove(&body_id) {
            self.orphan_removals += 1;
        }
    }
}

impl UiSink for RecordingSink {
    fn elapsed_changed(&mut self, elapsed_seconds: f64) {
        self.elapsed_seconds = elapsed_seconds;
    }

    fn best_time_changed(&mut self, best_seconds: f64) {
        self.best_seconds = best_seconds;
    }

    fn game_over(&mut self, elapsed_seconds: f64, cause: DeathCause) {
        self.game_overs.push((elapsed_seconds, cause));
    }

    fn restarted(&mut self) {
        self.restarts += 1;
    }

    fn session_started(&mut self) {
        self.sessions_started += 1;
    }

    fn camera_flip_requested(&mut self) {
        self.camera_flips += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_routes_events() {
        let events = vec![
            GameEvent::new(0, GameEventData::SessionStarted),
            GameEvent::entity_spawned(0, BodyId(2), Vec3::new(0.0, 0.0, -20.0), Extents::UNIT),
            GameEvent::elapsed_changed(0, 0.5),
            GameEvent::new(1, GameEventData::CameraFlipRequested),
            GameEvent::game_over(1, 0.5, DeathCause::EnemyCollision { enemy_id: BodyId(2) }),
            GameEvent::best_time_changed(1, 0.5),
            GameEvent::entity_removed(2, BodyId(2)),
            GameEvent::new(2, GameEventData::Restarted),
        ];

        let mut sink = RecordingSink::new();
        let mut ui = RecordingSink::new();
        dispatch_events(&events, &mut sink, &mut ui);

        assert_eq!(sink.added, 1);
        assert_eq!(sink.removed, 1);
        assert!(sink.live.is_empty());
        assert_eq!(sink.orphan_removals, 0);

        assert_eq!(ui.sessions_started, 1);
        assert_eq!(ui.elapsed_seconds, 0.5);
        assert_eq!(ui.best_seconds, 0.5);
        assert_eq!(ui.game_overs.len(), 1);
        assert_eq!(ui.restarts, 1);
        assert_eq!(ui.camera_flips, 1);
    }

    #[test]
    fn test_orphan_removal_counted() {
        let mut sink = RecordingSink::new();
        sink.entity_removed(BodyId(9));
        assert_eq!(sink.orphan_removals, 1);
    }

    #[test]
    fn test_default_ui_hooks_are_optional() {
        struct TimerOnly(f64);
        impl UiSink for TimerOnly {
            fn elapsed_changed(&mut self, elapsed_seconds: f64) {
                self.0 = elapsed_seconds;
            }
            fn best_time_changed(&mut self, _best_seconds: f64) {}
            fn game_over(&mut self, _elapsed_seconds: f64, _cause: DeathCause) {}
            fn restarted(&mut self) {}
        }

        let events = vec![
            GameEvent::new(0, GameEventData::CameraFlipRequested),
            GameEvent::elapsed_changed(0, 1.25),
        ];
        let mut render = RecordingSink::new();
        let mut ui = TimerOnly(0.0);
        dispatch_events(&events, &mut render, &mut ui);
        assert_eq!(ui.0, 1.25);
    }
}

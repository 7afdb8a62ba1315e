//! Simulation Tick
//!
//! The game loop. One call to [`tick`] advances the world by exactly one
//! frame; the host schedules calls and may stop between any two of them.
//!
//! Order within a tick is fixed: player step, enemy steps, collision
//! checks, spawn attempt. Collision checks see this tick's post-step bounds.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::hash::{compute_state_hash, StateHash, StateHasher};
use crate::core::rng::DeterministicRng;
use crate::game::body::{BodyId, PhysicsBody};
use crate::game::collision::{fell_out_of_world, first_enemy_hit};
use crate::game::config::{BodyConfig, ConfigError, GameConfig};
use crate::game::events::{DeathCause, GameEvent, GameEventData};
use crate::game::input::InputFrame;
use crate::game::registry::EntityRegistry;
use crate::game::session::{GameSession, SessionError, SessionPhase};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the run ended this tick
    pub game_over: bool,
    /// Whether the session is over (host should stop scheduling ticks)
    pub session_over: bool,
}

// =============================================================================
// WORLD
// =============================================================================

/// Everything one game process owns: bodies, enemies, session and clock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    config: GameConfig,
    player: PhysicsBody,
    ground: PhysicsBody,
    registry: EntityRegistry,
    session: GameSession,
    /// Frames simulated; never reset
    frame: u64,
    rng: DeterministicRng,
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl World {
    /// Build a world from a validated config.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let dynamics = config.physics.dynamics();
        let player = body_from_config(BodyId::PLAYER, &config.player, &config);
        let ground = body_from_config(BodyId::GROUND, &config.ground, &config);
        let registry = EntityRegistry::new(config.spawn.clone(), dynamics);
        let session = GameSession::new(config.seconds_per_tick);
        let rng = DeterministicRng::new(config.seed);

        info!(seed = config.seed, "world created");

        Ok(Self {
            config,
            player,
            ground,
            registry,
            session,
            frame: 0,
            rng,
            pending_events: Vec::new(),
        })
    }

    /// Config the world was built from.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The player body.
    pub fn player(&self) -> &PhysicsBody {
        &self.player
    }

    /// The ground body.
    pub fn ground(&self) -> &PhysicsBody {
        &self.ground
    }

    /// Live enemies and the spawn cadence.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Session phase, clock and best time.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Frame counter used for the spawn cadence.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Spawn events for every body currently in the scene.
    ///
    /// A host calls this once to populate a fresh renderer; afterwards tick
    /// events keep it in sync.
    pub fn scene_events(&self) -> Vec<GameEvent> {
        [&self.ground, &self.player]
            .into_iter()
            .chain(self.registry.iter())
            .map(|body| GameEvent::entity_spawned(self.frame, body.id(), body.position(), *body.extents()))
            .collect()
    }

    /// Over -> Running.
    ///
    /// Puts the player back at its start, removes every enemy, resets the
    /// spawn cadence and restarts the clock. The best time and the frame
    /// counter are kept.
    pub fn restart(&mut self) -> Result<Vec<GameEvent>, SessionError> {
        self.session.restart()?;

        self.player.reposition(self.config.player.position);
        self.player.velocity = self.config.player.velocity;
        self.player.set_can_jump(true);

        for body_id in self.registry.restart() {
            self.push_event(GameEvent::entity_removed(self.frame, body_id));
        }
        self.push_event(GameEvent::new(self.frame, GameEventData::Restarted));

        Ok(self.take_events())
    }

    /// Compute state hash for determinism checks.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.frame, self.config.seed, |hasher| {
            hash_body(hasher, &self.player);
            for enemy in self.registry.iter() {
                hash_body(hasher, enemy);
            }
            hasher.update_u32(self.registry.cadence().current());
            hasher.update_bool(self.registry.is_frozen());

            hasher.update_u8(self.session.phase() as u8);
            hasher.update_u64(self.session.elapsed_ticks());
            hasher.update_f64(self.session.best_seconds());

            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }

    fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

fn body_from_config(id: BodyId, body: &BodyConfig, config: &GameConfig) -> PhysicsBody {
    PhysicsBody::new(id, body.extents, body.position, body.velocity, config.physics.dynamics())
}

fn hash_body(hasher: &mut StateHasher, body: &PhysicsBody) {
    hasher.update_u32(body.id().0);
    hasher.update_vec3(body.position());
    hasher.update_vec3(body.velocity);
    hasher.update_bool(body.can_jump());
}

// =============================================================================
// TICK
// =============================================================================

/// Run one simulation tick.
///
/// While the session has not started, ticks without movement or jump input
/// leave the world untouched, or with `simulate_before_start` only step
/// bodies and spawn. Once the session is over every call returns at once
/// with `session_over` set.
pub fn tick(world: &mut World, input: &InputFrame) -> TickResult {
    let mut result = TickResult::default();

    if world.session.is_over() {
        result.session_over = true;
        return result;
    }

    // Cosmetic; forwarded in either live phase
    if input.camera_flip_pressed() {
        world.push_event(GameEvent::new(world.frame, GameEventData::CameraFlipRequested));
    }

    if world.session.phase() == SessionPhase::NotStarted {
        if !input.starts_session() {
            if world.config.variants.simulate_before_start {
                apply_input(world, input);
                step_bodies(world);
                spawn_step(world);
            }
            result.events = world.take_events();
            return result;
        }
        if let Err(err) = world.session.start() {
            warn!(%err, "session failed to start");
            result.events = world.take_events();
            return result;
        }
        world.push_event(GameEvent::new(world.frame, GameEventData::SessionStarted));
    }

    // 1. Apply input
    apply_input(world, input);

    // 2. Player, then enemies
    step_bodies(world);

    // 3. Clock
    let elapsed_seconds = world.session.advance_clock();
    world.push_event(GameEvent::elapsed_changed(world.frame, elapsed_seconds));

    // 4. Collisions
    if let Some(cause) = check_death(world) {
        end_session(world, cause, &mut result);
        result.events = world.take_events();
        return result;
    }

    // 5. Spawn
    spawn_step(world);

    result.events = world.take_events();
    result
}

fn step_bodies(world: &mut World) {
    world.player.update(&world.ground);
    world.registry.step_all(&world.ground);

    #[cfg(feature = "debug-tracing")]
    trace!(
        frame = world.frame,
        position = %world.player.position(),
        velocity = %world.player.velocity,
        enemies = world.registry.len(),
        "stepped"
    );
}

/// Spawn on cadence, then advance the frame counter.
fn spawn_step(world: &mut World) {
    let frame = world.frame;
    let spawned = world
        .registry
        .maybe_spawn(frame, &mut world.rng)
        .map(|enemy| GameEvent::entity_spawned(frame, enemy.id(), enemy.position(), *enemy.extents()));
    if let Some(event) = spawned {
        world.push_event(event);
    }

    world.frame += 1;
}

/// Set player velocity from held keys and apply a jump edge.
fn apply_input(world: &mut World, input: &InputFrame) {
    let physics = &world.config.physics;
    let variants = &world.config.variants;

    let (vx, vz) = input.horizontal_velocity(physics.player_speed, variants.conflict_policy);
    world.player.velocity.x = vx;
    world.player.velocity.z = vz;

    if input.jump_pressed() && !world.player.try_jump(physics.jump_impulse, variants.jump_requires_contact) {
        debug!(frame = world.frame, "jump ignored while airborne");
    }
}

/// Enemy contact first (in spawn order), then the fall threshold.
fn check_death(world: &World) -> Option<DeathCause> {
    if let Some(enemy_id) = first_enemy_hit(&world.player, world.registry.iter()) {
        return Some(DeathCause::EnemyCollision { enemy_id });
    }
    if fell_out_of_world(&world.player, world.config.physics.fatal_fall_y) {
        return Some(DeathCause::FellOutOfWorld { y: world.player.position().y });
    }
    None
}

/// Running -> Over: commit the best time and freeze or clear the scene.
fn end_session(world: &mut World, cause: DeathCause, result: &mut TickResult) {
    let outcome = match world.session.finish() {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(%err, "game over outside a running session");
            return;
        }
    };

    info!(frame = world.frame, %cause, elapsed_seconds = outcome.elapsed_seconds, "game over");

    let frame = world.frame;
    world.push_event(GameEvent::game_over(frame, outcome.elapsed_seconds, cause));
    if outcome.new_best {
        world.push_event(GameEvent::best_time_changed(frame, outcome.best_seconds));
    }

    world.registry.clear();
    if !world.config.variants.freeze_on_death {
        for body_id in world.registry.despawn_all() {
            world.push_event(GameEvent::entity_removed(frame, body_id));
        }
    }

    result.game_over = true;
    result.session_over = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec3::Vec3;
    use crate::game::sink::{dispatch_events, RecordingSink};

    fn world() -> World {
        World::new(GameConfig::default()).unwrap()
    }

    /// Config whose enemies all spawn at the far left edge, away from a
    /// player that stays at or right of the origin.
    fn left_lane_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.spawn.x_min = -4.5;
        config.spawn.x_max = -4.5;
        config
    }

    /// Drop an enemy onto the player's current position.
    fn stage_enemy_on_player(world: &mut World) -> BodyId {
        if world.registry.is_empty() {
            world.registry.spawn(&mut world.rng);
        }
        let target = world.player.position();
        let enemy = &mut world.registry.enemies_mut()[0];
        enemy.reposition(target);
        enemy.velocity = Vec3::ZERO;
        enemy.id()
    }

    fn kinds(events: &[GameEvent]) -> Vec<&GameEventData> {
        events.iter().map(|e| &e.data).collect()
    }

    #[test]
    fn test_idle_before_start() {
        let mut world = world();
        let start = world.player().position();

        let result = tick(&mut world, &InputFrame::new());

        assert!(result.events.is_empty());
        assert!(!result.session_over);
        assert_eq!(world.session().phase(), SessionPhase::NotStarted);
        assert_eq!(world.frame(), 0);
        assert_eq!(world.player().position(), start);
        assert!(world.registry().is_empty());
    }

    #[test]
    fn test_camera_flip_does_not_start() {
        let mut world = world();
        let result = tick(&mut world, &InputFrame::new().with_camera_flip());

        assert_eq!(kinds(&result.events), vec![&GameEventData::CameraFlipRequested]);
        assert_eq!(world.session().phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn test_first_movement_starts_and_simulates() {
        let mut world = world();
        let result = tick(&mut world, &InputFrame::new().with_left());

        assert_eq!(world.session().phase(), SessionPhase::Running);
        assert_eq!(world.frame(), 1);
        assert!((world.player().position().x + 0.05).abs() < 1e-12);

        assert_eq!(result.events[0].data, GameEventData::SessionStarted);
        assert!(matches!(result.events[1].data, GameEventData::ElapsedChanged { .. }));
        assert!(matches!(
            result.events[2].data,
            GameEventData::EntitySpawned { body_id: BodyId(2), .. }
        ));
        assert_eq!(world.registry().len(), 1);
    }

    #[test]
    fn test_releasing_keys_stops_player() {
        let mut world = world();
        tick(&mut world, &InputFrame::new().with_right().with_back());
        let after_move = world.player().position();

        tick(&mut world, &InputFrame::new());

        assert_eq!(world.player().velocity.x, 0.0);
        assert_eq!(world.player().velocity.z, 0.0);
        assert_eq!(world.player().position().x, after_move.x);
        assert_eq!(world.player().position().z, after_move.z);
    }

    #[test]
    fn test_jump_starts_session_and_needs_contact() {
        let mut world = world();

        tick(&mut world, &InputFrame::new().with_jump());
        assert!(world.session().is_running());
        assert!((world.player().velocity.y - 0.078).abs() < 1e-12);
        assert!((world.player().position().y - 0.078).abs() < 1e-12);

        // Airborne: the second jump is refused and gravity keeps acting
        tick(&mut world, &InputFrame::new().with_jump());
        assert!((world.player().velocity.y - 0.076).abs() < 1e-12);
        assert!((world.player().position().y - 0.154).abs() < 1e-12);
    }

    #[test]
    fn test_tick_determinism() {
        let mut w1 = world();
        let mut w2 = world();

        for t in 0..600u32 {
            let input = match t % 90 {
                0..=29 => InputFrame::new().with_left(),
                30..=59 => InputFrame::new().with_right().with_forward(),
                60 => InputFrame::new().with_jump(),
                _ => InputFrame::new(),
            };
            let r1 = tick(&mut w1, &input);
            let r2 = tick(&mut w2, &input);
            assert_eq!(r1.events, r2.events);
        }

        assert_eq!(w1.frame(), w2.frame());
        assert_eq!(w1.compute_hash(), w2.compute_hash());
    }

    #[test]
    fn test_seed_changes_hash() {
        let mut w1 = world();
        let mut config = GameConfig::default();
        config.seed += 1;
        let mut w2 = World::new(config).unwrap();

        tick(&mut w1, &InputFrame::new().with_left());
        tick(&mut w2, &InputFrame::new().with_left());

        assert_ne!(w1.compute_hash(), w2.compute_hash());
    }

    #[test]
    fn test_enemy_collision_ends_session_once() {
        let mut world = world();
        tick(&mut world, &InputFrame::new().with_left());
        let enemy_id = stage_enemy_on_player(&mut world);
        let frame_before = world.frame();

        let result = tick(&mut world, &InputFrame::new());

        assert!(result.game_over);
        assert!(result.session_over);
        assert!(world.session().is_over());
        let overs: Vec<_> = result.events.iter().filter(|e| e.is_game_over()).collect();
        assert_eq!(overs.len(), 1);
        assert_eq!(
            overs[0].data,
            GameEventData::GameOver {
                elapsed_seconds: 2.0 / 60.0,
                cause: DeathCause::EnemyCollision { enemy_id },
            }
        );
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::BestTimeChanged { .. })));

        // No spawn and no frame advance on the fatal tick
        assert_eq!(world.frame(), frame_before);
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::EntitySpawned { .. })));

        // Further ticks do nothing
        let hash = world.compute_hash();
        let again = tick(&mut world, &InputFrame::new().with_left());
        assert!(again.session_over);
        assert!(!again.game_over);
        assert!(again.events.is_empty());
        assert_eq!(world.compute_hash(), hash);
        assert_eq!(world.session().runs_completed(), 1);
    }

    #[test]
    fn test_collision_on_starting_tick() {
        let mut world = world();
        stage_enemy_on_player(&mut world);

        let result = tick(&mut world, &InputFrame::new().with_back());

        assert!(result.game_over);
        assert_eq!(result.events[0].data, GameEventData::SessionStarted);
        assert!(result.events.iter().any(GameEvent::is_game_over));
        assert!((world.session().best_seconds() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_freeze_on_death_keeps_enemies() {
        let mut world = world();
        tick(&mut world, &InputFrame::new().with_left());
        stage_enemy_on_player(&mut world);

        let result = tick(&mut world, &InputFrame::new());

        assert!(result.game_over);
        assert_eq!(world.registry().len(), 1);
        assert!(world.registry().is_frozen());
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::EntityRemoved { .. })));
    }

    #[test]
    fn test_despawn_on_death_variant() {
        let mut config = GameConfig::default();
        config.variants.freeze_on_death = false;
        let mut world = World::new(config).unwrap();
        let mut sink = RecordingSink::new();
        dispatch_events(&world.scene_events(), &mut sink, &mut RecordingSink::new());

        let first = tick(&mut world, &InputFrame::new().with_left());
        dispatch_events(&first.events, &mut sink, &mut RecordingSink::new());
        let enemy_id = stage_enemy_on_player(&mut world);

        let result = tick(&mut world, &InputFrame::new());
        dispatch_events(&result.events, &mut sink, &mut RecordingSink::new());

        assert!(result.game_over);
        assert!(world.registry().is_empty());
        assert!(result
            .events
            .iter()
            .any(|e| e.data == GameEventData::EntityRemoved { body_id: enemy_id }));
        assert_eq!(sink.orphan_removals, 0);
        assert_eq!(
            sink.live.iter().copied().collect::<Vec<_>>(),
            vec![BodyId::PLAYER, BodyId::GROUND]
        );
    }

    #[test]
    fn test_fall_out_of_world() {
        let mut world = World::new(left_lane_config()).unwrap();
        let right = InputFrame::new().with_right();

        let mut death = None;
        for _ in 0..1000 {
            let result = tick(&mut world, &right);
            if result.game_over {
                death = result.events.into_iter().find(GameEvent::is_game_over);
                break;
            }
        }

        let Some(GameEvent { data: GameEventData::GameOver { cause, .. }, .. }) = death else {
            panic!("player never fell");
        };
        let DeathCause::FellOutOfWorld { y } = cause else {
            panic!("unexpected cause {cause}");
        };
        assert!(y <= -10.0);
        assert!(world.player().position().x > 5.5);
    }

    #[test]
    fn test_restart_resets_run_and_keeps_best() {
        let mut world = world();
        for _ in 0..30 {
            tick(&mut world, &InputFrame::new().with_left());
        }
        let spawned: Vec<BodyId> = world.registry().iter().map(|e| e.id()).collect();
        stage_enemy_on_player(&mut world);
        tick(&mut world, &InputFrame::new());
        let best = world.session().best_seconds();
        let frame = world.frame();
        assert!(best > 0.0);

        let events = world.restart().unwrap();

        let removed: Vec<BodyId> = events
            .iter()
            .filter_map(|e| match e.data {
                GameEventData::EntityRemoved { body_id } => Some(body_id),
                _ => None,
            })
            .collect();
        assert_eq!(removed, spawned);
        assert_eq!(events.last().map(|e| &e.data), Some(&GameEventData::Restarted));

        assert!(world.session().is_running());
        assert_eq!(world.session().elapsed_ticks(), 0);
        assert_eq!(world.session().best_seconds(), best);
        assert_eq!(world.player().position(), Vec3::ZERO);
        assert_eq!(world.player().velocity, Vec3::new(0.0, -0.01, 0.0));
        assert!(world.registry().is_empty());
        assert_eq!(world.registry().cadence().current(), 200);
        assert_eq!(world.frame(), frame);

        // Restart goes straight to Running; the next tick simulates
        let result = tick(&mut world, &InputFrame::new());
        assert!(!result.session_over);
        assert_eq!(world.session().elapsed_ticks(), 1);
    }

    #[test]
    fn test_restart_requires_game_over() {
        let mut world = world();
        assert!(world.restart().is_err());

        tick(&mut world, &InputFrame::new().with_left());
        let err = world.restart().unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition { from: SessionPhase::Running, to: SessionPhase::Running }
        );
    }

    #[test]
    fn test_no_orphaned_entities_across_runs() {
        let mut world = World::new(left_lane_config()).unwrap();
        let mut render = RecordingSink::new();
        let mut ui = RecordingSink::new();
        dispatch_events(&world.scene_events(), &mut render, &mut ui);

        for run in 0..3 {
            for _ in 0..700 {
                let result = tick(&mut world, &InputFrame::new().with_right());
                dispatch_events(&result.events, &mut render, &mut ui);
                if result.session_over {
                    break;
                }
            }
            assert!(world.session().is_over(), "run {run} did not end");

            // Every live enemy is rendered, and nothing else besides player and ground
            let mut expected: Vec<BodyId> = world.registry().iter().map(|e| e.id()).collect();
            expected.extend([BodyId::PLAYER, BodyId::GROUND]);
            expected.sort();
            assert_eq!(render.live.iter().copied().collect::<Vec<_>>(), expected);

            let events = world.restart().unwrap();
            dispatch_events(&events, &mut render, &mut ui);
        }

        assert_eq!(render.orphan_removals, 0);
        assert_eq!(render.live.len(), 2);
        assert_eq!(ui.game_overs.len(), 3);
        assert_eq!(ui.restarts, 3);
        assert_eq!(ui.sessions_started, 1);
    }

    /// Enemies spawn dead ahead of the player at a fixed speed.
    fn head_on_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.spawn.x_min = 0.0;
        config.spawn.x_max = 0.0;
        config.spawn.speed_min = 0.1;
        config.spawn.speed_max = 0.1;
        config
    }

    #[test]
    fn test_enemy_travels_to_player_and_ends_run_once() {
        let mut world = World::new(head_on_config()).unwrap();

        // Jump to start, then stand still at the origin
        let mut game_overs = Vec::new();
        let mut enemy_z_at_death = None;
        for t in 0..400 {
            let input = if t == 0 { InputFrame::new().with_jump() } else { InputFrame::new() };
            let result = tick(&mut world, &input);
            if result.game_over {
                enemy_z_at_death = world.registry().get(BodyId(2)).map(|e| e.position().z);
            }
            game_overs.extend(result.events.into_iter().filter(GameEvent::is_game_over));
        }

        assert_eq!(game_overs.len(), 1);
        let GameEventData::GameOver { elapsed_seconds, cause } = game_overs[0].data else {
            panic!("expected game over, got {:?}", game_overs[0].data);
        };
        assert_eq!(cause, DeathCause::EnemyCollision { enemy_id: BodyId(2) });
        assert!(elapsed_seconds > 2.0 && elapsed_seconds < 3.0, "died at {elapsed_seconds}s");

        // First contact: enemy front just reached the player's back face
        let z = enemy_z_at_death.unwrap();
        assert!((-1.0..-0.8).contains(&z), "enemy at z={z}");
        assert_eq!(world.player().position().x, 0.0);
        assert_eq!(world.player().position().z, 0.0);
        assert_eq!(world.registry().len(), 1);
    }

    #[test]
    fn test_simulate_before_start_variant() {
        let mut config = head_on_config();
        config.variants.simulate_before_start = true;
        let mut world = World::new(config).unwrap();

        let first = tick(&mut world, &InputFrame::new());
        assert!(matches!(
            first.events[..],
            [GameEvent { data: GameEventData::EntitySpawned { body_id: BodyId(2), .. }, .. }]
        ));
        assert!(world.player().position().y < 0.0);

        // The enemy passes through the idle player without ending anything
        for _ in 1..200 {
            let result = tick(&mut world, &InputFrame::new());
            assert!(!result.game_over);
            assert!(!result
                .events
                .iter()
                .any(|e| matches!(e.data, GameEventData::ElapsedChanged { .. })));
        }
        assert_eq!(world.session().phase(), SessionPhase::NotStarted);
        assert_eq!(world.session().elapsed_ticks(), 0);
        assert_eq!(world.frame(), 200);
        assert_eq!(world.registry().len(), 2);
        assert!(world.registry().get(BodyId(2)).unwrap().position().z > 1.0);

        let result = tick(&mut world, &InputFrame::new().with_left());
        assert_eq!(result.events[0].data, GameEventData::SessionStarted);
        assert!(!result.game_over);
        assert_eq!(world.session().elapsed_ticks(), 1);
    }

    #[test]
    fn test_default_does_not_spawn_before_start() {
        let mut world = World::new(head_on_config()).unwrap();
        for _ in 0..300 {
            tick(&mut world, &InputFrame::new());
        }
        assert!(world.registry().is_empty());
        assert_eq!(world.frame(), 0);
    }

    #[test]
    fn test_world_deserialize_restores_invariants() {
        let mut world = world();
        tick(&mut world, &InputFrame::new().with_left());

        let mut value = serde_json::to_value(&world).unwrap();
        value["registry"]["cadence"]["current"] = serde_json::json!(0);
        value["player"]["position"]["x"] = serde_json::json!(100.0);
        let mut restored: World = serde_json::from_value(value).unwrap();

        assert_eq!(restored.registry().cadence().current(), 1);
        assert_eq!(restored.player().bounds().right, 100.5);

        // Ticks on the restored world spawn every frame instead of faulting
        let result = tick(&mut restored, &InputFrame::new().with_left());
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::EntitySpawned { .. })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::default();
        config.seconds_per_tick = -1.0;
        assert!(matches!(World::new(config), Err(ConfigError::Invalid(_))));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Starfall.
//!
//! The [`World`] owns the ship, the enemy formation, and every laser in
//! flight. It is mutated exclusively through [`apply`], which runs one
//! command to completion and reports what happened as [`Event`] values. A
//! `Tick` runs the simulation step (ship, formation, lasers) followed by the
//! collision pass, the prune pass, and the win/loss decision. Once the
//! session reaches a terminal [`Outcome`], every further command is ignored.

mod collision;
mod registry;
mod simulation;
mod spawner;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starfall_core::{Command, Event, InputState, Outcome, Position, Tuning, TuningError};

use self::registry::Registry;

/// Represents the authoritative state of a single game session.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    input: InputState,
    registry: Registry,
    rng: ChaCha8Rng,
    elapsed: Duration,
    score: u32,
    outcome: Outcome,
    muzzles: Vec<Position>,
}

impl World {
    /// Creates an empty session using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_tuning(Tuning::default())
    }

    /// Creates an empty session using the provided tuning.
    pub fn with_tuning(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::from_valid_tuning(tuning))
    }

    fn from_valid_tuning(tuning: Tuning) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(tuning.rng_seed),
            tuning,
            input: InputState::new(),
            registry: Registry::default(),
            elapsed: Duration::ZERO,
            score: 0,
            outcome: Outcome::InProgress,
            muzzles: Vec::new(),
        }
    }

    fn spawn_player(&mut self, out_events: &mut Vec<Event>) {
        if self.registry.player.is_some() {
            tracing::warn!("ignoring request to spawn a second player");
            return;
        }
        let origin = spawner::player_origin(&self.tuning);
        self.registry.insert_player(origin, out_events);
    }

    fn spawn_enemy(&mut self, base: Position, out_events: &mut Vec<Event>) {
        let cooldown = spawner::initial_enemy_cooldown(&self.tuning, &mut self.rng);
        self.registry.insert_enemy(base, cooldown, out_events);
    }

    fn spawn_enemy_formation(&mut self, rows: u32, per_row: u32, out_events: &mut Vec<Event>) {
        let layout: Vec<Position> = spawner::formation_layout(&self.tuning, rows, per_row).collect();
        tracing::debug!(rows, per_row, enemies = layout.len(), "spawning enemy formation");
        for base in layout {
            self.spawn_enemy(base, out_events);
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let dt_seconds = dt.as_secs_f32();
        simulation::step_player(
            &mut self.registry,
            &self.input,
            &self.tuning,
            dt_seconds,
            out_events,
        );
        simulation::step_enemies(
            &mut self.registry,
            &self.tuning,
            self.elapsed,
            dt_seconds,
            &mut self.muzzles,
            out_events,
        );
        simulation::step_lasers(&mut self.registry, &self.tuning, dt_seconds);

        collision::expire_out_of_bounds(&mut self.registry, &self.tuning);
        collision::resolve_player_lasers(
            &mut self.registry,
            &self.tuning,
            &mut self.score,
            out_events,
        );
        collision::resolve_enemy_lasers(
            &mut self.registry,
            &self.tuning,
            &mut self.outcome,
            out_events,
        );
        self.registry.prune(out_events);
        collision::evaluate_victory(&self.registry, &mut self.outcome, out_events);
        self.registry.announce_positions(out_events);

        if self.outcome.is_terminal() {
            tracing::info!(outcome = ?self.outcome, score = self.score, "session ended");
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.outcome.is_terminal() {
        tracing::trace!(?command, "session over; command ignored");
        return;
    }

    match command {
        Command::SetControl { control, pressed } => {
            world.input.set_control(control, pressed);
        }
        Command::SpawnPlayer => world.spawn_player(out_events),
        Command::SpawnEnemyFormation { rows, per_row } => {
            world.spawn_enemy_formation(rows, per_row, out_events);
        }
        Command::SpawnEnemy { position } => world.spawn_enemy(position, out_events),
        Command::SpawnPlayerLaser { position } => {
            world.registry.insert_player_laser(position, out_events);
        }
        Command::SpawnEnemyLaser { position } => {
            world.registry.insert_enemy_laser(position, out_events);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use starfall_core::{EnemySnapshot, InputState, LaserSnapshot, Outcome, PlayerSnapshot, Tuning};

    use super::World;

    /// Tuning the session was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Current classification of the session.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Number of enemies destroyed by player lasers.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Simulated time accumulated across every applied tick.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Controls currently held.
    #[must_use]
    pub fn input(world: &World) -> InputState {
        world.input
    }

    /// Snapshot of the ship, if one is alive.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.registry.player.as_ref().map(|player| PlayerSnapshot {
            id: player.id,
            position: player.position,
            cooldown_remaining: player.cooldown_remaining,
        })
    }

    /// Snapshots of the live enemies in registry order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        world
            .registry
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                base: enemy.base,
                position: enemy.position,
                cooldown_remaining: enemy.cooldown_remaining,
            })
            .collect()
    }

    /// Snapshots of the player lasers in flight, in firing order.
    #[must_use]
    pub fn player_lasers(world: &World) -> Vec<LaserSnapshot> {
        world
            .registry
            .player_lasers
            .iter()
            .map(|laser| LaserSnapshot {
                id: laser.id,
                position: laser.position,
            })
            .collect()
    }

    /// Snapshots of the enemy lasers in flight, in firing order.
    #[must_use]
    pub fn enemy_lasers(world: &World) -> Vec<LaserSnapshot> {
        world
            .registry
            .enemy_lasers
            .iter()
            .map(|laser| LaserSnapshot {
                id: laser.id,
                position: laser.position,
            })
            .collect()
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Starfall engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that systems
//! translate into calls on the presentation sinks declared here. The
//! simulation never depends on presentation types; sinks only ever receive
//! copies of positions and notifications.

mod tuning;

use std::time::Duration;

pub use tuning::{Tuning, TuningError};

/// Title shown by adapters when the experience boots.
pub const GAME_TITLE: &str = "Starfall";

/// Logical controls the player may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    /// Steers the ship toward decreasing x.
    MoveLeft,
    /// Steers the ship toward increasing x.
    MoveRight,
    /// Fires a laser whenever the weapon cooldown allows.
    Fire,
}

impl Control {
    /// Every control in a stable order.
    pub const ALL: [Control; 3] = [Control::MoveLeft, Control::MoveRight, Control::Fire];
}

/// Tracks which logical controls are currently held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    move_left: bool,
    move_right: bool,
    fire: bool,
}

impl InputState {
    /// Creates an input state with every control released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            move_left: false,
            move_right: false,
            fire: false,
        }
    }

    /// Records whether the provided control is held.
    pub fn set_control(&mut self, control: Control, pressed: bool) {
        match control {
            Control::MoveLeft => self.move_left = pressed,
            Control::MoveRight => self.move_right = pressed,
            Control::Fire => self.fire = pressed,
        }
    }

    /// Reports whether the provided control is held.
    #[must_use]
    pub const fn is_control_active(&self, control: Control) -> bool {
        match control {
            Control::MoveLeft => self.move_left,
            Control::MoveRight => self.move_right,
            Control::Fire => self.fire,
        }
    }
}

/// Unique identifier assigned to every entity spawned in a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Categories of entities tracked by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The player's ship.
    Player,
    /// Laser fired upward by the player.
    PlayerLaser,
    /// Member of the enemy formation.
    Enemy,
    /// Laser fired downward by an enemy.
    EnemyLaser,
}

/// Sounds the simulation asks the audio collaborator to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKind {
    /// A laser left its muzzle.
    LaserFire,
    /// The player's ship was destroyed.
    PlayerLose,
}

/// Terminal classification of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The session is still being played.
    #[default]
    InProgress,
    /// Every enemy was destroyed.
    Won,
    /// The player's ship was hit.
    Lost,
}

impl Outcome {
    /// Reports whether the outcome ends the session.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Point in play-field coordinates. The y axis grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle expressed by its edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Smallest x covered by the rectangle.
    pub left: f32,
    /// Smallest y covered by the rectangle.
    pub top: f32,
    /// Largest x covered by the rectangle.
    pub right: f32,
    /// Largest y covered by the rectangle.
    pub bottom: f32,
}

impl Rect {
    /// Builds a rectangle centred on `center` with the provided half extents.
    #[must_use]
    pub fn from_center(center: Position, half_width: f32, half_height: f32) -> Self {
        Self {
            left: center.x - half_width,
            top: center.y - half_height,
            right: center.x + half_width,
            bottom: center.y + half_height,
        }
    }
}

/// Reports whether two rectangles overlap.
///
/// Rectangles overlap unless one lies entirely to a side of the other on
/// either axis; shared edges count as overlap.
#[must_use]
pub fn rects_intersect(r1: Rect, r2: Rect) -> bool {
    !(r2.left > r1.right || r2.right < r1.left || r2.top > r1.bottom || r2.bottom < r1.top)
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Records whether a logical control is held.
    SetControl {
        /// Control whose state changed.
        control: Control,
        /// Whether the control is now held.
        pressed: bool,
    },
    /// Places the player's ship at its starting position.
    SpawnPlayer,
    /// Lays out a uniform grid of enemies.
    SpawnEnemyFormation {
        /// Number of rows in the formation.
        rows: u32,
        /// Number of enemies in each row.
        per_row: u32,
    },
    /// Places a single enemy at the provided base position.
    SpawnEnemy {
        /// Base position the enemy sways around.
        position: Position,
    },
    /// Fires a player laser from the provided origin.
    SpawnPlayerLaser {
        /// Origin of the laser.
        position: Position,
    },
    /// Fires an enemy laser from the provided origin.
    SpawnEnemyLaser {
        /// Origin of the laser.
        position: Position,
    },
    /// Advances the simulation by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an entity joined the session.
    EntitySpawned {
        /// Identifier allocated to the entity.
        entity: EntityId,
        /// Category of the entity.
        kind: EntityKind,
        /// Position the entity occupies after spawning.
        position: Position,
    },
    /// Reports the position of a live entity at the end of a tick.
    EntityMoved {
        /// Identifier of the entity.
        entity: EntityId,
        /// Position after movement was applied.
        position: Position,
    },
    /// Confirms that an entity was pruned from the session.
    EntityDestroyed {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Category of the removed entity.
        kind: EntityKind,
    },
    /// Requests that the audio collaborator play a sound.
    SoundRequested {
        /// Sound to play.
        sound: SoundKind,
    },
    /// Announces the new score after an enemy was destroyed.
    ScoreChanged {
        /// Score after the increment.
        score: u32,
    },
    /// Announces the transition into a terminal outcome. Emitted exactly once.
    OutcomeDecided {
        /// Terminal outcome reached by the session.
        outcome: Outcome,
    },
}

/// Immutable representation of the player's ship used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Identifier allocated to the ship.
    pub id: EntityId,
    /// Current position of the ship.
    pub position: Position,
    /// Seconds until the weapon may fire again. Non-positive means ready.
    pub cooldown_remaining: f32,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy.
    pub id: EntityId,
    /// Stored base position; never changes after spawning.
    pub base: Position,
    /// Base position offset by the formation sway of the latest tick.
    pub position: Position,
    /// Seconds until the enemy fires again.
    pub cooldown_remaining: f32,
}

/// Immutable representation of a single laser used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaserSnapshot {
    /// Identifier allocated to the laser.
    pub id: EntityId,
    /// Current position of the laser.
    pub position: Position,
}

/// Opaque handle to a visual representation owned by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(u64);

impl RenderHandle {
    /// Wraps a presentation-defined handle value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the wrapped handle value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Positions visual representations once per live entity per tick.
pub trait RenderSink {
    /// Moves the visual identified by `handle` to the provided coordinates.
    fn set_position(&mut self, handle: RenderHandle, x: f32, y: f32);
}

/// Creates and removes visual representations as entities come and go.
pub trait LifecycleSink {
    /// Creates a visual for a newly spawned entity and returns its handle.
    fn on_entity_created(&mut self, kind: EntityKind, x: f32, y: f32) -> RenderHandle;

    /// Removes the visual identified by `handle`.
    fn on_entity_destroyed(&mut self, handle: RenderHandle);
}

/// Fire-and-forget sound playback.
pub trait AudioSink {
    /// Starts playing the provided sound without blocking.
    fn play_sound(&mut self, sound: SoundKind);
}

/// Receives the terminal outcome of a session.
pub trait OutcomeSink {
    /// Invoked once when every enemy has been destroyed.
    fn on_win(&mut self);

    /// Invoked once when the player's ship has been hit.
    fn on_lose(&mut self);
}

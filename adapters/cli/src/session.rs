//! Per-frame wiring of the world, the frame clock and event dispatch.

use anyhow::{Context, Result};
use starfall_core::{
    AudioSink, Command, Control, EntityKind, Event, InputState, LifecycleSink, Outcome,
    OutcomeSink, RenderHandle, RenderSink, SoundKind, Tuning,
};
use starfall_rendering::{FrameInput, Scene};
use starfall_system_frame_clock::{FrameClock, FrameError};
use starfall_system_presentation::Dispatcher;
use starfall_world::{self as world, query, World};

/// A running game session driven one display frame at a time.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    clock: FrameClock,
    dispatcher: Dispatcher,
    held: InputState,
    events: Vec<Event>,
}

impl Session {
    /// Creates the world and queues the player and formation spawns.
    ///
    /// The spawn events reach the scene on the first frame.
    pub(crate) fn start(tuning: Tuning) -> Result<Self> {
        let rows = tuning.enemy_rows;
        let per_row = tuning.enemies_per_row;
        let mut world = World::with_tuning(tuning).context("failed to create world")?;
        let mut events = Vec::new();
        world::apply(&mut world, Command::SpawnPlayer, &mut events);
        world::apply(
            &mut world,
            Command::SpawnEnemyFormation { rows, per_row },
            &mut events,
        );
        tracing::info!(enemies = rows.saturating_mul(per_row), "session started");

        Ok(Self {
            world,
            clock: FrameClock::new(),
            dispatcher: Dispatcher::new(),
            held: InputState::new(),
            events,
        })
    }

    /// Current classification of the session.
    pub(crate) fn outcome(&self) -> Outcome {
        query::outcome(&self.world)
    }

    /// Number of enemies destroyed so far.
    pub(crate) fn score(&self) -> u32 {
        query::score(&self.world)
    }

    /// Simulated seconds played so far.
    pub(crate) fn elapsed_seconds(&self) -> f64 {
        query::elapsed(&self.world).as_secs_f64()
    }

    /// Feeds one frame into the world and mirrors the results in `scene`.
    pub(crate) fn frame(&mut self, input: FrameInput, scene: &mut Scene) {
        for control in Control::ALL {
            let pressed = input.controls.is_control_active(control);
            if pressed != self.held.is_control_active(control) {
                self.held.set_control(control, pressed);
                world::apply(
                    &mut self.world,
                    Command::SetControl { control, pressed },
                    &mut self.events,
                );
            }
        }

        match self.clock.advance(input.timestamp) {
            Ok(Some(tick)) => world::apply(&mut self.world, tick, &mut self.events),
            Ok(None) => {}
            Err(FrameError::Stopped) => {}
            Err(error) => tracing::warn!(%error, "frame discarded"),
        }

        let mut sinks = SessionSinks {
            scene: &mut *scene,
            audio: LoggedAudio,
        };
        self.dispatcher.handle(&self.events, &mut sinks);
        self.clock.handle(&self.events);
        self.events.clear();
        scene.score = query::score(&self.world);
    }
}

/// Audio collaborator that reports sounds through the log.
#[derive(Clone, Copy, Debug, Default)]
struct LoggedAudio;

impl AudioSink for LoggedAudio {
    fn play_sound(&mut self, sound: SoundKind) {
        tracing::debug!(?sound, "sound requested");
    }
}

/// Bundles the scene and audio so one value satisfies every sink.
struct SessionSinks<'a> {
    scene: &'a mut Scene,
    audio: LoggedAudio,
}

impl RenderSink for SessionSinks<'_> {
    fn set_position(&mut self, handle: RenderHandle, x: f32, y: f32) {
        self.scene.set_position(handle, x, y);
    }
}

impl LifecycleSink for SessionSinks<'_> {
    fn on_entity_created(&mut self, kind: EntityKind, x: f32, y: f32) -> RenderHandle {
        self.scene.on_entity_created(kind, x, y)
    }

    fn on_entity_destroyed(&mut self, handle: RenderHandle) {
        self.scene.on_entity_destroyed(handle);
    }
}

impl AudioSink for SessionSinks<'_> {
    fn play_sound(&mut self, sound: SoundKind) {
        self.audio.play_sound(sound);
    }
}

impl OutcomeSink for SessionSinks<'_> {
    fn on_win(&mut self) {
        tracing::info!("player won");
        self.scene.on_win();
    }

    fn on_lose(&mut self) {
        tracing::info!("player lost");
        self.scene.on_lose();
    }
}

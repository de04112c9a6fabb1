#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Starfall adapters.
//!
//! The [`Scene`] is a retained description of everything visible: one sprite
//! per live entity keyed by the [`RenderHandle`] it handed out, the score and
//! an optional end-of-session banner. It implements the render, lifecycle
//! and outcome sinks so event dispatch can update it directly; backends only
//! ever read it.

use std::collections::BTreeMap;

use anyhow::Result as AnyResult;
use glam::Vec2;
use starfall_core::{
    EntityKind, InputState, LifecycleSink, OutcomeSink, RenderHandle, RenderSink, Tuning,
};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Dimensions of the logical play field that backends scale to the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayField {
    /// Width in play-field units.
    pub width: f32,
    /// Height in play-field units.
    pub height: f32,
}

impl PlayField {
    /// Creates a play field descriptor.
    ///
    /// Returns an error when either dimension is not a positive finite value.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !(valid(width) && valid(height)) {
            return Err(RenderingError::EmptyPlayField { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Size and color of the sprite drawn for each entity kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteStyle {
    /// Half extents of the player's ship.
    pub player_half_extents: Vec2,
    /// Half extents of an enemy.
    pub enemy_half_extents: Vec2,
    /// Half extents of either kind of laser.
    pub laser_half_extents: Vec2,
    /// Fill color of the player's ship.
    pub player_color: Color,
    /// Fill color of an enemy.
    pub enemy_color: Color,
    /// Fill color of a player laser.
    pub player_laser_color: Color,
    /// Fill color of an enemy laser.
    pub enemy_laser_color: Color,
}

impl SpriteStyle {
    /// Derives sprite sizes from the collision boxes of the provided tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            player_half_extents: Vec2::new(tuning.player_width, tuning.player_half_height),
            enemy_half_extents: Vec2::new(tuning.enemy_half_width, tuning.enemy_half_height),
            laser_half_extents: Vec2::new(tuning.laser_half_width, tuning.laser_half_height),
            player_color: Color::from_rgb_u8(90, 200, 250),
            enemy_color: Color::from_rgb_u8(230, 80, 90),
            player_laser_color: Color::from_rgb_u8(250, 240, 120),
            enemy_laser_color: Color::from_rgb_u8(255, 140, 40),
        }
    }

    fn half_extents(&self, kind: EntityKind) -> Vec2 {
        match kind {
            EntityKind::Player => self.player_half_extents,
            EntityKind::Enemy => self.enemy_half_extents,
            EntityKind::PlayerLaser | EntityKind::EnemyLaser => self.laser_half_extents,
        }
    }

    fn color(&self, kind: EntityKind) -> Color {
        match kind {
            EntityKind::Player => self.player_color,
            EntityKind::Enemy => self.enemy_color,
            EntityKind::PlayerLaser => self.player_laser_color,
            EntityKind::EnemyLaser => self.enemy_laser_color,
        }
    }
}

/// Retained visual of a single entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSprite {
    /// Category of the entity the sprite represents.
    pub kind: EntityKind,
    /// Centre of the sprite in play-field units.
    pub center: Vec2,
    /// Half extents of the sprite in play-field units.
    pub half_extents: Vec2,
    /// Fill color of the sprite.
    pub color: Color,
}

/// Overlay displayed once the session reaches a terminal outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Banner {
    /// The player's ship was hit.
    GameOver,
    /// Every enemy was destroyed.
    Victory,
}

impl Banner {
    /// Text displayed across the play field.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::GameOver => "GAME OVER",
            Self::Victory => "CONGRATULATIONS! YOU WON!",
        }
    }
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Logical play field the sprites live in.
    pub play_field: PlayField,
    /// Sizes and colors assigned to newly created sprites.
    pub style: SpriteStyle,
    /// Score displayed in the corner of the play field.
    pub score: u32,
    /// Banner displayed over the play field, if the session ended.
    pub banner: Option<Banner>,
    sprites: BTreeMap<RenderHandle, SceneSprite>,
    next_handle: u64,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new(play_field: PlayField, style: SpriteStyle) -> Self {
        Self {
            play_field,
            style,
            score: 0,
            banner: None,
            sprites: BTreeMap::new(),
            next_handle: 0,
        }
    }

    /// Creates an empty scene sized and styled after the provided tuning.
    pub fn from_tuning(tuning: &Tuning) -> Result<Self, RenderingError> {
        let play_field = PlayField::new(tuning.game_width, tuning.game_height)?;
        Ok(Self::new(play_field, SpriteStyle::from_tuning(tuning)))
    }

    /// Sprite registered under the provided handle, if it still exists.
    #[must_use]
    pub fn sprite(&self, handle: RenderHandle) -> Option<&SceneSprite> {
        self.sprites.get(&handle)
    }

    /// Iterates over live sprites in creation order.
    pub fn sprites(&self) -> impl Iterator<Item = &SceneSprite> + '_ {
        self.sprites.values()
    }

    /// Number of live sprites.
    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }
}

impl RenderSink for Scene {
    fn set_position(&mut self, handle: RenderHandle, x: f32, y: f32) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.center = Vec2::new(x, y);
        }
    }
}

impl LifecycleSink for Scene {
    fn on_entity_created(&mut self, kind: EntityKind, x: f32, y: f32) -> RenderHandle {
        self.next_handle += 1;
        let handle = RenderHandle::new(self.next_handle);
        let sprite = SceneSprite {
            kind,
            center: Vec2::new(x, y),
            half_extents: self.style.half_extents(kind),
            color: self.style.color(kind),
        };
        let _ = self.sprites.insert(handle, sprite);
        handle
    }

    fn on_entity_destroyed(&mut self, handle: RenderHandle) {
        let _ = self.sprites.remove(&handle);
    }
}

impl OutcomeSink for Scene {
    fn on_win(&mut self) {
        self.banner = Some(Banner::Victory);
    }

    fn on_lose(&mut self) {
        self.banner = Some(Banner::GameOver);
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Monotonic timestamp of the frame in seconds.
    pub timestamp: f64,
    /// Logical controls held during the frame.
    pub controls: InputState,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Starfall scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame timestamp and
    /// the controls held, and may mutate the scene before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The play field must have a positive finite area.
    #[error("play field must have a positive area (received {width} x {height})")]
    EmptyPlayField {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

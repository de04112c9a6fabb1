//! Gameplay constants gathered into a single overridable value.

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_RNG_SEED: u64 = 0x5f3a_c0de_9e37_79b9;

/// Dimensions, speeds, and cadences that drive a session.
///
/// Distances are measured in play-field units, speeds in units per second and
/// cooldowns in seconds. Every field falls back to its default when omitted
/// from a configuration file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Width of the play field.
    pub game_width: f32,
    /// Height of the play field.
    pub game_height: f32,
    /// Half-width of the player's ship; also the clamp margin on both sides.
    pub player_width: f32,
    /// Half-height of the player's ship.
    pub player_half_height: f32,
    /// Distance between the bottom of the play field and the ship's centre.
    pub player_bottom_offset: f32,
    /// Horizontal speed of the ship.
    pub player_max_speed: f32,
    /// Vertical speed of every laser.
    pub laser_max_speed: f32,
    /// Delay between two player shots.
    pub laser_cooldown: f32,
    /// Half-width of a laser.
    pub laser_half_width: f32,
    /// Half-height of a laser.
    pub laser_half_height: f32,
    /// Half-width of an enemy.
    pub enemy_half_width: f32,
    /// Half-height of an enemy.
    pub enemy_half_height: f32,
    /// Rows spawned at session start.
    pub enemy_rows: u32,
    /// Enemies in each row spawned at session start.
    pub enemies_per_row: u32,
    /// Gap between the play-field edges and the outermost formation columns.
    pub enemy_horizontal_padding: f32,
    /// Gap between the top of the play field and the first formation row.
    pub enemy_vertical_padding: f32,
    /// Distance between two formation rows.
    pub enemy_vertical_spacing: f32,
    /// Delay between two shots of the same enemy.
    pub enemy_cooldown: f32,
    /// Lower bound of the random initial enemy cooldown.
    pub enemy_min_initial_cooldown: f32,
    /// Horizontal amplitude of the formation sway.
    pub sway_amplitude_x: f32,
    /// Vertical amplitude of the formation sway.
    pub sway_amplitude_y: f32,
    /// Seed for the generator that staggers initial enemy cooldowns.
    pub rng_seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_width: 800.0,
            game_height: 600.0,
            player_width: 20.0,
            player_half_height: 15.0,
            player_bottom_offset: 50.0,
            player_max_speed: 600.0,
            laser_max_speed: 500.0,
            laser_cooldown: 0.5,
            laser_half_width: 3.0,
            laser_half_height: 10.0,
            enemy_half_width: 20.0,
            enemy_half_height: 15.0,
            enemy_rows: 3,
            enemies_per_row: 10,
            enemy_horizontal_padding: 80.0,
            enemy_vertical_padding: 70.0,
            enemy_vertical_spacing: 80.0,
            enemy_cooldown: 4.0,
            enemy_min_initial_cooldown: 0.5,
            sway_amplitude_x: 50.0,
            sway_amplitude_y: 10.0,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl Tuning {
    /// Smallest x the player's ship may occupy.
    #[must_use]
    pub fn player_min_x(&self) -> f32 {
        self.player_width
    }

    /// Largest x the player's ship may occupy.
    #[must_use]
    pub fn player_max_x(&self) -> f32 {
        self.game_width - self.player_width
    }

    /// Checks that the values describe a playable session.
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !(positive(self.game_width) && positive(self.game_height)) {
            return Err(TuningError::EmptyPlayField {
                width: self.game_width,
                height: self.game_height,
            });
        }

        if !(self.player_width >= 0.0 && self.player_width * 2.0 <= self.game_width) {
            return Err(TuningError::PlayerDoesNotFit {
                player_width: self.player_width,
                game_width: self.game_width,
            });
        }

        let dimensions = [
            ("player_half_height", self.player_half_height),
            ("player_bottom_offset", self.player_bottom_offset),
            ("laser_half_width", self.laser_half_width),
            ("laser_half_height", self.laser_half_height),
            ("enemy_half_width", self.enemy_half_width),
            ("enemy_half_height", self.enemy_half_height),
            ("enemy_horizontal_padding", self.enemy_horizontal_padding),
            ("enemy_vertical_padding", self.enemy_vertical_padding),
            ("enemy_vertical_spacing", self.enemy_vertical_spacing),
            ("sway_amplitude_x", self.sway_amplitude_x),
            ("sway_amplitude_y", self.sway_amplitude_y),
        ];
        for (field, value) in dimensions {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::InvalidDimension { field, value });
            }
        }

        let rates = [
            ("player_max_speed", self.player_max_speed),
            ("laser_max_speed", self.laser_max_speed),
            ("laser_cooldown", self.laser_cooldown),
            ("enemy_cooldown", self.enemy_cooldown),
            ("enemy_min_initial_cooldown", self.enemy_min_initial_cooldown),
        ];
        for (field, value) in rates {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::InvalidRate { field, value });
            }
        }

        if self.enemy_min_initial_cooldown > self.enemy_cooldown {
            return Err(TuningError::InvertedCooldownRange {
                min: self.enemy_min_initial_cooldown,
                max: self.enemy_cooldown,
            });
        }

        Ok(())
    }
}

/// Reasons a [`Tuning`] value may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TuningError {
    /// The play field has no area.
    #[error("play field must have a positive size (received {width}x{height})")]
    EmptyPlayField {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// The clamp margins leave no room for the ship.
    #[error("player width {player_width} leaves no room inside a {game_width} wide play field")]
    PlayerDoesNotFit {
        /// Configured clamp margin.
        player_width: f32,
        /// Configured play-field width.
        game_width: f32,
    },
    /// A size, offset or sway amplitude is negative or not finite.
    #[error("{field} must be a finite, non-negative distance (received {value})")]
    InvalidDimension {
        /// Name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A speed or cooldown is negative or not finite.
    #[error("{field} must be a finite, non-negative value (received {value})")]
    InvalidRate {
        /// Name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// The initial enemy cooldown range is empty.
    #[error("enemy_min_initial_cooldown {min} exceeds enemy_cooldown {max}")]
    InvertedCooldownRange {
        /// Lower bound of the range.
        min: f32,
        /// Upper bound of the range.
        max: f32,
    },
}

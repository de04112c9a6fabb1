//! Initial placement of entities.

use rand::Rng;
use starfall_core::{Position, Tuning};

/// Starting position of the player's ship: centred, near the bottom edge.
pub(crate) fn player_origin(tuning: &Tuning) -> Position {
    Position::new(
        tuning.game_width / 2.0,
        tuning.game_height - tuning.player_bottom_offset,
    )
}

/// Base positions of a uniform formation, row by row, left to right.
///
/// The outermost columns sit `enemy_horizontal_padding` away from the edges.
/// A single-column formation is centred.
pub(crate) fn formation_layout(
    tuning: &Tuning,
    rows: u32,
    per_row: u32,
) -> impl Iterator<Item = Position> + '_ {
    let (first_x, spacing) = if per_row > 1 {
        let span = tuning.game_width - tuning.enemy_horizontal_padding * 2.0;
        (
            tuning.enemy_horizontal_padding,
            span / (per_row - 1) as f32,
        )
    } else {
        (tuning.game_width / 2.0, 0.0)
    };

    (0..rows).flat_map(move |row| {
        let y = tuning.enemy_vertical_padding + row as f32 * tuning.enemy_vertical_spacing;
        (0..per_row).map(move |column| Position::new(first_x + column as f32 * spacing, y))
    })
}

/// Draws an initial enemy cooldown uniformly from the configured range.
pub(crate) fn initial_enemy_cooldown<R: Rng>(tuning: &Tuning, rng: &mut R) -> f32 {
    let min = tuning.enemy_min_initial_cooldown;
    let max = tuning.enemy_cooldown;
    if min >= max {
        return max;
    }
    rng.gen_range(min..=max)
}

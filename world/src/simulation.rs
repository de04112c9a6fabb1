//! Per-tick movement, cooldowns, and firing.

use std::time::Duration;

use starfall_core::{Control, Event, InputState, Position, Tuning};

use crate::registry::Registry;

/// Moves the ship from held controls, then fires if the weapon is ready.
///
/// The cooldown is decremented every tick without a floor; any non-positive
/// value means the weapon is ready.
pub(crate) fn step_player(
    registry: &mut Registry,
    input: &InputState,
    tuning: &Tuning,
    dt: f32,
    out_events: &mut Vec<Event>,
) {
    let Some(player) = registry.player.as_mut() else {
        return;
    };

    let mut x = player.position.x;
    if input.is_control_active(Control::MoveLeft) {
        x -= dt * tuning.player_max_speed;
    }
    if input.is_control_active(Control::MoveRight) {
        x += dt * tuning.player_max_speed;
    }
    player.position.x = clamp(x, tuning.player_min_x(), tuning.player_max_x());

    let fire = input.is_control_active(Control::Fire) && player.cooldown_remaining <= 0.0;
    if fire {
        player.cooldown_remaining = tuning.laser_cooldown;
    }
    player.cooldown_remaining -= dt;

    let muzzle = player.position;
    if fire {
        registry.insert_player_laser(muzzle, out_events);
    }
}

/// Sways the formation around its base positions and fires from every enemy
/// whose cooldown elapsed.
///
/// The sway phase is the session's elapsed time, so the whole formation moves
/// in lockstep.
pub(crate) fn step_enemies(
    registry: &mut Registry,
    tuning: &Tuning,
    elapsed: Duration,
    dt: f32,
    muzzles: &mut Vec<Position>,
    out_events: &mut Vec<Event>,
) {
    let phase = elapsed.as_secs_f64();
    let dx = phase.sin() as f32 * tuning.sway_amplitude_x;
    let dy = phase.cos() as f32 * tuning.sway_amplitude_y;

    muzzles.clear();
    for enemy in &mut registry.enemies {
        enemy.position = Position::new(enemy.base.x + dx, enemy.base.y + dy);
        enemy.cooldown_remaining -= dt;
        if enemy.cooldown_remaining <= 0.0 {
            muzzles.push(enemy.position);
            enemy.cooldown_remaining = tuning.enemy_cooldown;
        }
    }

    for muzzle in muzzles.drain(..) {
        registry.insert_enemy_laser(muzzle, out_events);
    }
}

/// Moves player lasers upward and enemy lasers downward.
pub(crate) fn step_lasers(registry: &mut Registry, tuning: &Tuning, dt: f32) {
    let travel = dt * tuning.laser_max_speed;
    for laser in &mut registry.player_lasers {
        laser.position.y -= travel;
    }
    for laser in &mut registry.enemy_lasers {
        laser.position.y += travel;
    }
}

fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

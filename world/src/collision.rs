//! Projectile hits, pruning, and the win/loss decision.

use starfall_core::{rects_intersect, Event, Outcome, Position, Rect, SoundKind, Tuning};

use crate::registry::Registry;

/// Marks lasers that left the play field as not-alive.
///
/// Runs before any hit test so an exited laser never collides.
pub(crate) fn expire_out_of_bounds(registry: &mut Registry, tuning: &Tuning) {
    for laser in &mut registry.player_lasers {
        if laser.position.y < 0.0 {
            laser.alive = false;
        }
    }
    for laser in &mut registry.enemy_lasers {
        if laser.position.y > tuning.game_height {
            laser.alive = false;
        }
    }
}

/// Tests every live player laser against the live enemies in registry order.
///
/// A laser destroys at most one enemy.
pub(crate) fn resolve_player_lasers(
    registry: &mut Registry,
    tuning: &Tuning,
    score: &mut u32,
    out_events: &mut Vec<Event>,
) {
    let Registry {
        player_lasers,
        enemies,
        ..
    } = registry;

    for laser in player_lasers.iter_mut().filter(|laser| laser.alive) {
        let laser_box = laser_rect(laser.position, tuning);
        let hit = enemies.iter_mut().filter(|enemy| enemy.alive).find(|enemy| {
            rects_intersect(
                laser_box,
                Rect::from_center(
                    enemy.position,
                    tuning.enemy_half_width,
                    tuning.enemy_half_height,
                ),
            )
        });

        if let Some(enemy) = hit {
            enemy.alive = false;
            laser.alive = false;
            *score = score.saturating_add(1);
            out_events.push(Event::ScoreChanged { score: *score });
        }
    }
}

/// Tests enemy lasers against the ship; the first hit loses the session.
pub(crate) fn resolve_enemy_lasers(
    registry: &mut Registry,
    tuning: &Tuning,
    outcome: &mut Outcome,
    out_events: &mut Vec<Event>,
) {
    let Registry {
        player,
        enemy_lasers,
        ..
    } = registry;
    let Some(player) = player.as_mut().filter(|player| player.alive) else {
        return;
    };
    let player_box = Rect::from_center(
        player.position,
        tuning.player_width,
        tuning.player_half_height,
    );

    let hit = enemy_lasers
        .iter()
        .filter(|laser| laser.alive)
        .any(|laser| rects_intersect(laser_rect(laser.position, tuning), player_box));
    if !hit {
        return;
    }

    player.alive = false;
    *outcome = Outcome::Lost;
    out_events.push(Event::SoundRequested {
        sound: SoundKind::PlayerLose,
    });
    out_events.push(Event::OutcomeDecided {
        outcome: Outcome::Lost,
    });
}

/// Declares the session won once no enemy remains, unless it already ended.
pub(crate) fn evaluate_victory(
    registry: &Registry,
    outcome: &mut Outcome,
    out_events: &mut Vec<Event>,
) {
    if outcome.is_terminal() || !registry.enemies.is_empty() {
        return;
    }

    *outcome = Outcome::Won;
    out_events.push(Event::OutcomeDecided {
        outcome: Outcome::Won,
    });
}

fn laser_rect(position: Position, tuning: &Tuning) -> Rect {
    Rect::from_center(position, tuning.laser_half_width, tuning.laser_half_height)
}

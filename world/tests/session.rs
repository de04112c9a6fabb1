use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use starfall_core::{
    Command, Control, EntityKind, Event, Outcome, Position, SoundKind, Tuning,
};
use starfall_world::{self as world, query, World};

/// Tuning with a motionless formation that never fires on its own.
fn quiet_tuning() -> Tuning {
    Tuning {
        enemy_cooldown: 1.0e6,
        enemy_min_initial_cooldown: 1.0e6,
        sway_amplitude_x: 0.0,
        sway_amplitude_y: 0.0,
        ..Tuning::default()
    }
}

fn world_with(tuning: Tuning) -> World {
    World::with_tuning(tuning).expect("valid tuning")
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
    run(world, Command::Tick { dt })
}

fn hold(world: &mut World, control: Control, pressed: bool) {
    let events = run(world, Command::SetControl { control, pressed });
    assert!(events.is_empty(), "input changes emit no events");
}

fn spawned(events: &[Event], wanted: EntityKind) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::EntitySpawned { kind, .. } if *kind == wanted))
        .count()
}

fn destroyed(events: &[Event], wanted: EntityKind) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::EntityDestroyed { kind, .. } if *kind == wanted))
        .count()
}

fn outcome_events(events: &[Event]) -> Vec<Outcome> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::OutcomeDecided { outcome } => Some(*outcome),
            _ => None,
        })
        .collect()
}

fn player_x(world: &World) -> f32 {
    query::player(world).expect("player alive").position.x
}

#[test]
fn player_spawns_centred_above_bottom_edge() {
    let mut world = World::new();
    let events = run(&mut world, Command::SpawnPlayer);

    let player = query::player(&world).expect("player spawned");
    assert_eq!(player.position, Position::new(400.0, 550.0));
    assert!(player.cooldown_remaining <= 0.0, "weapon starts ready");
    assert_eq!(
        events,
        vec![Event::EntitySpawned {
            entity: player.id,
            kind: EntityKind::Player,
            position: Position::new(400.0, 550.0),
        }]
    );
}

#[test]
fn second_player_spawn_is_ignored() {
    let mut world = World::new();
    let _ = run(&mut world, Command::SpawnPlayer);
    let first = query::player(&world).expect("player spawned");

    let events = run(&mut world, Command::SpawnPlayer);

    assert!(events.is_empty());
    assert_eq!(query::player(&world).map(|player| player.id), Some(first.id));
}

#[test]
fn formation_spawns_one_enemy_per_slot_with_staggered_cooldowns() {
    let mut world = World::new();
    let events = run(
        &mut world,
        Command::SpawnEnemyFormation {
            rows: 3,
            per_row: 10,
        },
    );

    assert_eq!(spawned(&events, EntityKind::Enemy), 30);
    let enemies = query::enemies(&world);
    assert_eq!(enemies.len(), 30);
    assert_eq!(enemies[0].base, Position::new(80.0, 70.0));
    assert_eq!(enemies[29].base.y, 230.0);

    for enemy in &enemies {
        assert!(
            (0.5..=4.0).contains(&enemy.cooldown_remaining),
            "initial cooldown {} out of range",
            enemy.cooldown_remaining
        );
    }
    let first = enemies[0].cooldown_remaining;
    assert!(
        enemies.iter().any(|enemy| enemy.cooldown_remaining != first),
        "initial cooldowns must be staggered"
    );
}

#[test]
fn moving_left_for_a_tenth_of_a_second_covers_sixty_units() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(700.0, 100.0),
        },
    );
    hold(&mut world, Control::MoveLeft, true);

    let _ = tick(&mut world, Duration::from_millis(100));
    assert!((player_x(&world) - 340.0).abs() < 1e-3);

    let _ = tick(&mut world, Duration::from_secs(1));
    assert_eq!(player_x(&world), 20.0, "ship clamps at the left margin");
}

#[test]
fn holding_both_directions_cancels_out() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(700.0, 100.0),
        },
    );
    hold(&mut world, Control::MoveLeft, true);
    hold(&mut world, Control::MoveRight, true);

    let _ = tick(&mut world, Duration::from_millis(100));

    assert!((player_x(&world) - 400.0).abs() < 1e-3);
}

#[test]
fn player_stays_within_margins_for_arbitrary_input() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(700.0, 100.0),
        },
    );
    let mut rng = ChaCha8Rng::seed_from_u64(0x00c0_ffee);

    for _ in 0..2_000 {
        hold(&mut world, Control::MoveLeft, rng.gen_bool(0.5));
        hold(&mut world, Control::MoveRight, rng.gen_bool(0.3));
        let dt = Duration::from_micros(rng.gen_range(0..500_000));
        let _ = tick(&mut world, dt);

        let x = player_x(&world);
        assert!((20.0..=780.0).contains(&x), "player escaped to {x}");
    }
}

#[test]
fn firing_resets_cooldown_to_exactly_the_laser_cooldown() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(700.0, 100.0),
        },
    );
    hold(&mut world, Control::Fire, true);

    let events = tick(&mut world, Duration::ZERO);

    assert_eq!(spawned(&events, EntityKind::PlayerLaser), 1);
    let player = query::player(&world).expect("player alive");
    assert_eq!(player.cooldown_remaining, 0.5);
    let lasers = query::player_lasers(&world);
    assert_eq!(lasers.len(), 1);
    assert_eq!(lasers[0].position, player.position);
}

#[test]
fn holding_fire_within_cooldown_spawns_a_single_laser() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(700.0, 100.0),
        },
    );
    hold(&mut world, Control::Fire, true);

    let first = tick(&mut world, Duration::from_millis(100));
    let second = tick(&mut world, Duration::from_millis(100));

    assert_eq!(spawned(&first, EntityKind::PlayerLaser), 1);
    assert_eq!(spawned(&second, EntityKind::PlayerLaser), 0);
    assert_eq!(query::player_lasers(&world).len(), 1);
    assert!(first.contains(&Event::SoundRequested {
        sound: SoundKind::LaserFire,
    }));
    let cooldown = query::player(&world)
        .expect("player alive")
        .cooldown_remaining;
    assert!((cooldown - 0.3).abs() < 1e-5, "cooldown was {cooldown}");
}

#[test]
fn shots_are_separated_by_at_least_the_cooldown() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(700.0, 100.0),
        },
    );
    hold(&mut world, Control::Fire, true);

    let mut shot_times = Vec::new();
    for _ in 0..200 {
        let events = tick(&mut world, Duration::from_millis(30));
        if spawned(&events, EntityKind::PlayerLaser) > 0 {
            shot_times.push(query::elapsed(&world).as_secs_f32());
        }
    }

    assert!(shot_times.len() > 5, "expected repeated fire");
    for pair in shot_times.windows(2) {
        assert!(
            pair[1] - pair[0] >= 0.5 - 1e-4,
            "shots at {} and {} are too close",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn laser_reaching_the_only_enemy_wins_the_session() {
    let mut world = world_with(Tuning {
        laser_max_speed: 2_000.0,
        ..quiet_tuning()
    });
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(100.0, 100.0),
        },
    );
    let _ = run(
        &mut world,
        Command::SpawnPlayerLaser {
            position: Position::new(100.0, 300.0),
        },
    );

    let events = tick(&mut world, Duration::from_millis(100));

    assert_eq!(query::score(&world), 1);
    assert!(query::enemies(&world).is_empty());
    assert!(query::player_lasers(&world).is_empty());
    assert_eq!(destroyed(&events, EntityKind::Enemy), 1);
    assert_eq!(destroyed(&events, EntityKind::PlayerLaser), 1);
    assert!(events.contains(&Event::ScoreChanged { score: 1 }));
    assert_eq!(outcome_events(&events), vec![Outcome::Won]);
    assert_eq!(query::outcome(&world), Outcome::Won);
}

#[test]
fn player_fire_clears_a_single_enemy_above_the_ship() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(400.0, 100.0),
        },
    );
    hold(&mut world, Control::Fire, true);

    for _ in 0..50 {
        let _ = tick(&mut world, Duration::from_millis(100));
        if query::outcome(&world).is_terminal() {
            break;
        }
    }

    assert_eq!(query::outcome(&world), Outcome::Won);
    assert_eq!(query::score(&world), 1);
}

#[test]
fn a_laser_destroys_at_most_one_enemy() {
    let mut world = world_with(quiet_tuning());
    for y in [100.0, 110.0] {
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                position: Position::new(200.0, y),
            },
        );
    }
    let _ = run(
        &mut world,
        Command::SpawnPlayerLaser {
            position: Position::new(200.0, 105.0),
        },
    );

    let events = tick(&mut world, Duration::ZERO);

    assert_eq!(query::score(&world), 1);
    let survivors = query::enemies(&world);
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].base.y, 110.0, "first enemy in registry order is hit");
    assert!(outcome_events(&events).is_empty());
}

#[test]
fn enemy_laser_on_the_ship_loses_the_session_once() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(400.0, 100.0),
        },
    );
    let origin = query::player(&world).expect("player spawned").position;
    let _ = run(&mut world, Command::SpawnEnemyLaser { position: origin });

    let events = tick(&mut world, Duration::from_millis(16));

    assert_eq!(query::outcome(&world), Outcome::Lost);
    assert!(query::player(&world).is_none(), "dead ship is pruned");
    assert_eq!(destroyed(&events, EntityKind::Player), 1);
    assert_eq!(outcome_events(&events), vec![Outcome::Lost]);
    let lose_sounds = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::SoundRequested {
                    sound: SoundKind::PlayerLose
                }
            )
        })
        .count();
    assert_eq!(lose_sounds, 1);

    let after = tick(&mut world, Duration::from_millis(16));
    assert!(after.is_empty(), "terminal sessions emit nothing");
}

#[test]
fn losing_takes_precedence_over_clearing_the_formation() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(100.0, 100.0),
        },
    );
    let _ = run(
        &mut world,
        Command::SpawnPlayerLaser {
            position: Position::new(100.0, 100.0),
        },
    );
    let origin = query::player(&world).expect("player spawned").position;
    let _ = run(&mut world, Command::SpawnEnemyLaser { position: origin });

    let events = tick(&mut world, Duration::ZERO);

    assert_eq!(query::score(&world), 1);
    assert!(query::enemies(&world).is_empty());
    assert_eq!(outcome_events(&events), vec![Outcome::Lost]);
    assert_eq!(query::outcome(&world), Outcome::Lost);
}

#[test]
fn terminal_session_ignores_every_command() {
    let mut world = world_with(quiet_tuning());
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(400.0, 300.0),
        },
    );
    let _ = run(
        &mut world,
        Command::SpawnPlayerLaser {
            position: Position::new(400.0, 300.0),
        },
    );
    let _ = tick(&mut world, Duration::ZERO);
    assert_eq!(query::outcome(&world), Outcome::Won);

    let player_before = query::player(&world);
    let elapsed_before = query::elapsed(&world);
    let commands = [
        Command::SetControl {
            control: Control::Fire,
            pressed: true,
        },
        Command::SpawnEnemyFormation {
            rows: 2,
            per_row: 2,
        },
        Command::SpawnEnemyLaser {
            position: Position::new(400.0, 550.0),
        },
        Command::Tick {
            dt: Duration::from_secs(1),
        },
    ];
    for command in commands {
        assert!(run(&mut world, command).is_empty());
    }

    assert_eq!(query::outcome(&world), Outcome::Won);
    assert_eq!(query::score(&world), 1);
    assert!(query::enemies(&world).is_empty());
    assert!(query::enemy_lasers(&world).is_empty());
    assert_eq!(query::player(&world), player_before);
    assert_eq!(query::elapsed(&world), elapsed_before);
}

#[test]
fn exited_player_laser_is_pruned_before_hit_tests() {
    let mut world = world_with(quiet_tuning());
    // Touches the laser's box once the laser has left the top edge.
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(50.0, -20.0),
        },
    );
    let _ = run(
        &mut world,
        Command::SpawnPlayerLaser {
            position: Position::new(50.0, 5.0),
        },
    );

    let events = tick(&mut world, Duration::from_millis(100));

    assert!(query::player_lasers(&world).is_empty());
    assert_eq!(destroyed(&events, EntityKind::PlayerLaser), 1);
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::enemies(&world).len(), 1);
    assert_eq!(query::outcome(&world), Outcome::InProgress);
}

#[test]
fn exited_enemy_laser_is_pruned_before_hit_tests() {
    let mut world = world_with(Tuning {
        player_bottom_offset: -20.0,
        ..quiet_tuning()
    });
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(400.0, 100.0),
        },
    );
    let _ = run(
        &mut world,
        Command::SpawnEnemyLaser {
            position: Position::new(400.0, 590.0),
        },
    );

    let events = tick(&mut world, Duration::from_millis(100));

    assert!(query::enemy_lasers(&world).is_empty());
    assert_eq!(destroyed(&events, EntityKind::EnemyLaser), 1);
    assert!(query::player(&world).is_some());
    assert_eq!(query::outcome(&world), Outcome::InProgress);
}

#[test]
fn lasers_travel_vertically_at_laser_speed() {
    let mut world = world_with(quiet_tuning());
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(700.0, 100.0),
        },
    );
    let _ = run(
        &mut world,
        Command::SpawnPlayerLaser {
            position: Position::new(200.0, 400.0),
        },
    );
    let _ = run(
        &mut world,
        Command::SpawnEnemyLaser {
            position: Position::new(300.0, 200.0),
        },
    );

    let _ = tick(&mut world, Duration::from_millis(100));

    let up = query::player_lasers(&world);
    let down = query::enemy_lasers(&world);
    assert!((up[0].position.y - 350.0).abs() < 1e-3);
    assert_eq!(up[0].position.x, 200.0);
    assert!((down[0].position.y - 250.0).abs() < 1e-3);
    assert_eq!(down[0].position.x, 300.0);
}

#[test]
fn enemies_sway_in_lockstep_around_their_bases() {
    let mut world = world_with(Tuning {
        sway_amplitude_x: 50.0,
        sway_amplitude_y: 10.0,
        ..quiet_tuning()
    });
    for x in [100.0, 300.0] {
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                position: Position::new(x, 100.0),
            },
        );
    }

    let _ = tick(&mut world, Duration::from_secs(1));

    let expected_dx = 1.0_f32.sin() * 50.0;
    let expected_dy = 1.0_f32.cos() * 10.0;
    for enemy in query::enemies(&world) {
        assert!((enemy.position.x - enemy.base.x - expected_dx).abs() < 1e-3);
        assert!((enemy.position.y - enemy.base.y - expected_dy).abs() < 1e-3);
    }
    let enemies = query::enemies(&world);
    assert_eq!(enemies[0].base, Position::new(100.0, 100.0), "bases never move");
}

#[test]
fn enemy_fires_from_its_swayed_position_and_reloads() {
    let mut world = world_with(Tuning {
        enemy_cooldown: 0.1,
        enemy_min_initial_cooldown: 0.1,
        sway_amplitude_x: 50.0,
        sway_amplitude_y: 10.0,
        ..Tuning::default()
    });
    let _ = run(
        &mut world,
        Command::SpawnEnemy {
            position: Position::new(400.0, 100.0),
        },
    );

    let events = tick(&mut world, Duration::from_millis(150));

    let muzzle = events
        .iter()
        .find_map(|event| match event {
            Event::EntitySpawned {
                kind: EntityKind::EnemyLaser,
                position,
                ..
            } => Some(*position),
            _ => None,
        })
        .expect("enemy fired");
    assert!((muzzle.x - (400.0 + 0.15_f32.sin() * 50.0)).abs() < 1e-3);
    assert!((muzzle.y - (100.0 + 0.15_f32.cos() * 10.0)).abs() < 1e-3);
    assert!(events.contains(&Event::SoundRequested {
        sound: SoundKind::LaserFire,
    }));

    let enemy = query::enemies(&world)[0];
    assert_eq!(enemy.cooldown_remaining, 0.1, "reload uses the fixed cooldown");
    let laser = query::enemy_lasers(&world)[0];
    assert!((laser.position.y - (muzzle.y + 75.0)).abs() < 1e-3);
}

#[test]
fn every_live_entity_reports_its_position_each_tick() {
    let mut world = World::new();
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemyFormation {
            rows: 3,
            per_row: 10,
        },
    );

    let events = tick(&mut world, Duration::from_millis(16));

    let moved = events
        .iter()
        .filter(|event| matches!(event, Event::EntityMoved { .. }))
        .count();
    assert_eq!(moved, 31);
    assert_eq!(
        events.first(),
        Some(&Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        })
    );
}

#[test]
fn score_counts_each_enemy_destroyed_by_a_laser() {
    let mut world = world_with(Tuning {
        enemy_cooldown: 1.0e6,
        enemy_min_initial_cooldown: 1.0e6,
        ..Tuning::default()
    });
    let _ = run(&mut world, Command::SpawnPlayer);
    let _ = run(
        &mut world,
        Command::SpawnEnemyFormation {
            rows: 3,
            per_row: 10,
        },
    );
    hold(&mut world, Control::Fire, true);

    let mut enemies_destroyed = 0;
    let mut last_score = 0;
    for _ in 0..20_000 {
        if query::outcome(&world).is_terminal() {
            break;
        }
        // Chase the most recently spawned enemy still alive.
        let target = query::enemies(&world)
            .last()
            .map(|enemy| enemy.position.x)
            .expect("enemies remain while in progress");
        let x = player_x(&world);
        hold(&mut world, Control::MoveLeft, x > target + 5.0);
        hold(&mut world, Control::MoveRight, x < target - 5.0);
        let events = tick(&mut world, Duration::from_millis(16));

        enemies_destroyed += destroyed(&events, EntityKind::Enemy);
        for event in &events {
            if let Event::ScoreChanged { score } = event {
                assert_eq!(*score, last_score + 1, "score moves one enemy at a time");
                last_score = *score;
            }
        }
        assert_eq!(query::score(&world) as usize, enemies_destroyed);
    }

    assert_eq!(query::outcome(&world), Outcome::Won);
    assert_eq!(query::score(&world), 30);
}

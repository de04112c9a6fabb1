//! Storage for the live entities of a session.

use starfall_core::{EntityId, EntityKind, Event, Position, SoundKind};

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) id: EntityId,
    pub(crate) position: Position,
    pub(crate) cooldown_remaining: f32,
    pub(crate) alive: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EntityId,
    pub(crate) base: Position,
    /// Base position offset by the sway of the latest tick.
    pub(crate) position: Position,
    pub(crate) cooldown_remaining: f32,
    pub(crate) alive: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Laser {
    pub(crate) id: EntityId,
    pub(crate) position: Position,
    pub(crate) alive: bool,
}

/// Owns every entity collection. Insertion order is iteration order.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    next_id: u32,
    pub(crate) player: Option<Player>,
    pub(crate) player_lasers: Vec<Laser>,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) enemy_lasers: Vec<Laser>,
}

impl Registry {
    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub(crate) fn insert_player(&mut self, position: Position, out_events: &mut Vec<Event>) {
        let id = self.allocate_id();
        self.player = Some(Player {
            id,
            position,
            cooldown_remaining: 0.0,
            alive: true,
        });
        out_events.push(Event::EntitySpawned {
            entity: id,
            kind: EntityKind::Player,
            position,
        });
    }

    pub(crate) fn insert_enemy(
        &mut self,
        base: Position,
        cooldown_remaining: f32,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.allocate_id();
        self.enemies.push(Enemy {
            id,
            base,
            position: base,
            cooldown_remaining,
            alive: true,
        });
        out_events.push(Event::EntitySpawned {
            entity: id,
            kind: EntityKind::Enemy,
            position: base,
        });
    }

    pub(crate) fn insert_player_laser(&mut self, position: Position, out_events: &mut Vec<Event>) {
        let id = self.allocate_id();
        self.player_lasers.push(Laser {
            id,
            position,
            alive: true,
        });
        announce_laser(id, EntityKind::PlayerLaser, position, out_events);
    }

    pub(crate) fn insert_enemy_laser(&mut self, position: Position, out_events: &mut Vec<Event>) {
        let id = self.allocate_id();
        self.enemy_lasers.push(Laser {
            id,
            position,
            alive: true,
        });
        announce_laser(id, EntityKind::EnemyLaser, position, out_events);
    }

    /// Removes every entity marked not-alive, announcing each removal.
    pub(crate) fn prune(&mut self, out_events: &mut Vec<Event>) {
        prune_lasers(
            &mut self.player_lasers,
            EntityKind::PlayerLaser,
            out_events,
        );

        self.enemies.retain(|enemy| {
            if !enemy.alive {
                out_events.push(Event::EntityDestroyed {
                    entity: enemy.id,
                    kind: EntityKind::Enemy,
                });
            }
            enemy.alive
        });

        prune_lasers(&mut self.enemy_lasers, EntityKind::EnemyLaser, out_events);

        if self.player.as_ref().is_some_and(|player| !player.alive) {
            if let Some(player) = self.player.take() {
                out_events.push(Event::EntityDestroyed {
                    entity: player.id,
                    kind: EntityKind::Player,
                });
            }
        }
    }

    /// Reports the position of every live entity.
    pub(crate) fn announce_positions(&self, out_events: &mut Vec<Event>) {
        let player = self
            .player
            .iter()
            .map(|player| (player.id, player.position));
        let player_lasers = self
            .player_lasers
            .iter()
            .map(|laser| (laser.id, laser.position));
        let enemies = self.enemies.iter().map(|enemy| (enemy.id, enemy.position));
        let enemy_lasers = self
            .enemy_lasers
            .iter()
            .map(|laser| (laser.id, laser.position));

        out_events.extend(
            player
                .chain(player_lasers)
                .chain(enemies)
                .chain(enemy_lasers)
                .map(|(entity, position)| Event::EntityMoved { entity, position }),
        );
    }
}

fn announce_laser(
    id: EntityId,
    kind: EntityKind,
    position: Position,
    out_events: &mut Vec<Event>,
) {
    out_events.push(Event::EntitySpawned {
        entity: id,
        kind,
        position,
    });
    out_events.push(Event::SoundRequested {
        sound: SoundKind::LaserFire,
    });
}

fn prune_lasers(lasers: &mut Vec<Laser>, kind: EntityKind, out_events: &mut Vec<Event>) {
    lasers.retain(|laser| {
        if !laser.alive {
            out_events.push(Event::EntityDestroyed {
                entity: laser.id,
                kind,
            });
        }
        laser.alive
    });
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that forwards world events to the presentation collaborators.
//!
//! The world identifies entities by [`EntityId`]; visuals are identified by
//! whatever [`RenderHandle`] the lifecycle sink hands back. This system owns
//! the table between the two, so neither side depends on the other's types.

use std::collections::HashMap;

use starfall_core::{
    AudioSink, EntityId, Event, LifecycleSink, Outcome, OutcomeSink, RenderHandle, RenderSink,
};

/// Routes render, lifecycle, audio, and outcome notifications.
#[derive(Debug, Default)]
pub struct Dispatcher {
    handles: HashMap<EntityId, RenderHandle>,
    outcome_announced: bool,
}

impl Dispatcher {
    /// Creates a dispatcher with no tracked visuals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render handle issued for the provided entity, if it is still tracked.
    #[must_use]
    pub fn handle_for(&self, entity: EntityId) -> Option<RenderHandle> {
        self.handles.get(&entity).copied()
    }

    /// Number of entities that currently own a visual.
    #[must_use]
    pub fn tracked_entities(&self) -> usize {
        self.handles.len()
    }

    /// Forwards one batch of world events to the sinks, in order.
    ///
    /// Win and loss callbacks fire at most once over the dispatcher's life.
    pub fn handle<S>(&mut self, events: &[Event], sinks: &mut S)
    where
        S: RenderSink + LifecycleSink + AudioSink + OutcomeSink,
    {
        for event in events {
            match event {
                Event::EntitySpawned {
                    entity,
                    kind,
                    position,
                } => {
                    let handle = sinks.on_entity_created(*kind, position.x, position.y);
                    if let Some(stale) = self.handles.insert(*entity, handle) {
                        tracing::debug!(?entity, ?stale, "entity re-announced; replacing handle");
                    }
                }
                Event::EntityMoved { entity, position } => match self.handles.get(entity) {
                    Some(handle) => sinks.set_position(*handle, position.x, position.y),
                    None => tracing::debug!(?entity, "position for untracked entity skipped"),
                },
                Event::EntityDestroyed { entity, .. } => match self.handles.remove(entity) {
                    Some(handle) => sinks.on_entity_destroyed(handle),
                    None => tracing::debug!(?entity, "removal of untracked entity skipped"),
                },
                Event::SoundRequested { sound } => sinks.play_sound(*sound),
                Event::OutcomeDecided { outcome } => self.announce(*outcome, sinks),
                Event::TimeAdvanced { .. } | Event::ScoreChanged { .. } => {}
            }
        }
    }

    fn announce<S: OutcomeSink>(&mut self, outcome: Outcome, sinks: &mut S) {
        if self.outcome_announced {
            return;
        }
        match outcome {
            Outcome::Won => sinks.on_win(),
            Outcome::Lost => sinks.on_lose(),
            Outcome::InProgress => return,
        }
        self.outcome_announced = true;
    }
}

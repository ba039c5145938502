//! World events emitted as the scheduler advances the board.

use crate::actor::Actor;
use crate::organism::Organism;
use denim_core::{ActorId, Position};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Something noteworthy that happened during an epoch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorldEvent {
    FoodSprouted {
        epoch: u64,
        food: ActorId,
        position: Position,
    },
    FoodSpoiled {
        epoch: u64,
        food: ActorId,
        position: Position,
    },
    Hatched {
        epoch: u64,
        egg: ActorId,
        organism: ActorId,
        position: Position,
    },
    Fed {
        epoch: u64,
        organism: ActorId,
        food: ActorId,
        gained: i32,
    },
    Conceived {
        epoch: u64,
        mother: ActorId,
        father: ActorId,
        egg: ActorId,
    },
    EggLaid {
        epoch: u64,
        mother: ActorId,
        egg: ActorId,
        position: Position,
    },
    Fought {
        epoch: u64,
        initiator: ActorId,
        opponent: ActorId,
    },
    Killed {
        epoch: u64,
        victim: ActorId,
        victor: ActorId,
        position: Position,
    },
    Moved {
        epoch: u64,
        organism: ActorId,
        from: Position,
        to: Position,
    },
}

impl WorldEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorldEvent::FoodSprouted { .. } => "food_sprouted",
            WorldEvent::FoodSpoiled { .. } => "food_spoiled",
            WorldEvent::Hatched { .. } => "hatched",
            WorldEvent::Fed { .. } => "fed",
            WorldEvent::Conceived { .. } => "conceived",
            WorldEvent::EggLaid { .. } => "egg_laid",
            WorldEvent::Fought { .. } => "fought",
            WorldEvent::Killed { .. } => "killed",
            WorldEvent::Moved { .. } => "moved",
        }
    }

    pub fn epoch(&self) -> u64 {
        match self {
            WorldEvent::FoodSprouted { epoch, .. }
            | WorldEvent::FoodSpoiled { epoch, .. }
            | WorldEvent::Hatched { epoch, .. }
            | WorldEvent::Fed { epoch, .. }
            | WorldEvent::Conceived { epoch, .. }
            | WorldEvent::EggLaid { epoch, .. }
            | WorldEvent::Fought { epoch, .. }
            | WorldEvent::Killed { epoch, .. }
            | WorldEvent::Moved { epoch, .. } => *epoch,
        }
    }

    /// Event for a cell whose occupant changed during the age phase, if any
    pub fn from_aging(
        epoch: u64,
        position: Position,
        before: &Actor,
        after: &Actor,
    ) -> Option<Self> {
        match (before, after) {
            (Actor::Space, Actor::Food(food)) => Some(WorldEvent::FoodSprouted {
                epoch,
                food: food.id,
                position,
            }),
            (Actor::Food(food), Actor::Space) => Some(WorldEvent::FoodSpoiled {
                epoch,
                food: food.id,
                position,
            }),
            (Actor::Egg(egg), Actor::Organism(organism)) => Some(WorldEvent::Hatched {
                epoch,
                egg: egg.id,
                organism: organism.id,
                position,
            }),
            _ => None,
        }
    }

    /// Event describing one resolved interaction, if it changed anything
    pub fn from_interaction(
        epoch: u64,
        (from, before_actor, after_actor): (Position, &Actor, &Actor),
        (to, before_neighbour, after_neighbour): (Position, &Actor, &Actor),
    ) -> Option<Self> {
        let initiator = before_actor.as_organism()?;

        match before_neighbour {
            Actor::Food(food) => {
                let fed = after_actor.as_organism()?;
                Some(WorldEvent::Fed {
                    epoch,
                    organism: fed.id,
                    food: food.id,
                    gained: fed.statistics.health - initiator.statistics.health,
                })
            }
            Actor::Space => match (after_actor, after_neighbour) {
                (_, Actor::Egg(egg)) => Some(WorldEvent::EggLaid {
                    epoch,
                    mother: initiator.id,
                    egg: egg.id,
                    position: to,
                }),
                (Actor::Space, Actor::Organism(_)) => Some(WorldEvent::Moved {
                    epoch,
                    organism: initiator.id,
                    from,
                    to,
                }),
                _ => None,
            },
            Actor::Organism(opponent) => {
                match (after_actor.as_organism(), after_neighbour.as_organism()) {
                    (None, _) => Some(WorldEvent::Killed {
                        epoch,
                        victim: initiator.id,
                        victor: opponent.id,
                        position: from,
                    }),
                    (_, None) => Some(WorldEvent::Killed {
                        epoch,
                        victim: opponent.id,
                        victor: initiator.id,
                        position: to,
                    }),
                    (Some(left), Some(right)) => {
                        if let Some(event) = conception(epoch, initiator, left, right)
                            .or_else(|| conception(epoch, opponent, right, left))
                        {
                            Some(event)
                        } else if left.statistics.health != initiator.statistics.health {
                            Some(WorldEvent::Fought {
                                epoch,
                                initiator: initiator.id,
                                opponent: opponent.id,
                            })
                        } else {
                            None
                        }
                    }
                }
            }
            Actor::Wall | Actor::Obstacle | Actor::Egg(_) => None,
        }
    }
}

fn conception(
    epoch: u64,
    before: &Organism,
    after: &Organism,
    partner: &Organism,
) -> Option<WorldEvent> {
    if before.is_gestating() {
        return None;
    }
    let egg = after.pregnant_with.as_ref()?;
    Some(WorldEvent::Conceived {
        epoch,
        mother: after.id,
        father: partner.id,
        egg: egg.id,
    })
}

/// Destination for world events
pub trait EventSink: Send + Sync {
    fn record(&self, event: &WorldEvent);
}

/// Writes every event to the tracing pipeline
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &WorldEvent) {
        match event {
            WorldEvent::Killed {
                epoch,
                victim,
                victor,
                position,
            } => info!(
                event = "killed",
                epoch = *epoch,
                victim = victim.0,
                victor = victor.0,
                x = position.x,
                y = position.y,
                "Organism killed"
            ),
            WorldEvent::Hatched {
                epoch,
                egg,
                organism,
                position,
            } => info!(
                event = "hatched",
                epoch = *epoch,
                egg = egg.0,
                organism = organism.0,
                x = position.x,
                y = position.y,
                "Egg hatched"
            ),
            WorldEvent::Conceived {
                epoch,
                mother,
                father,
                egg,
            } => info!(
                event = "conceived",
                epoch = *epoch,
                mother = mother.0,
                father = father.0,
                egg = egg.0,
                "Egg conceived"
            ),
            other => debug!(event = other.name(), epoch = other.epoch(), detail = ?other),
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<WorldEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<WorldEvent> {
        self.events.lock().clone()
    }

    pub fn drain(&self) -> Vec<WorldEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for EventLog {
    fn record(&self, event: &WorldEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Running totals per event name
#[derive(Debug, Default)]
pub struct EventTally {
    counts: Mutex<BTreeMap<&'static str, u64>>,
}

impl EventTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, name: &str) -> u64 {
        self.counts.lock().get(name).copied().unwrap_or(0)
    }

    pub fn totals(&self) -> BTreeMap<&'static str, u64> {
        self.counts.lock().clone()
    }
}

impl EventSink for EventTally {
    fn record(&self, event: &WorldEvent) {
        *self.counts.lock().entry(event.name()).or_insert(0) += 1;
    }
}

/// Forwards each event to several sinks in order
#[derive(Default, Clone)]
pub struct Fanout {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl EventSink for Fanout {
    fn record(&self, event: &WorldEvent) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }
}

//! Board actors and their transitions.

use crate::context::EpochContext;
use crate::organism::{Bio, Organism};
use denim_core::{ActorId, ActorKind};
use denim_genetics::Genome;
use rand::Rng;
use std::hash::{Hash, Hasher};

/// Occupant of one grid cell.
///
/// Equality and hashing go by id only. Wall, obstacle and space are singletons sharing one
/// fixed id each across the whole board.
#[derive(Debug, Clone)]
pub enum Actor {
    Wall,
    Obstacle,
    Space,
    Food(Food),
    Egg(Egg),
    Organism(Organism),
}

impl Actor {
    pub fn id(&self) -> ActorId {
        match self {
            Actor::Wall => ActorId::WALL,
            Actor::Obstacle => ActorId::OBSTACLE,
            Actor::Space => ActorId::SPACE,
            Actor::Food(food) => food.id,
            Actor::Egg(egg) => egg.id,
            Actor::Organism(organism) => organism.id,
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self {
            Actor::Wall => ActorKind::Wall,
            Actor::Obstacle => ActorKind::Obstacle,
            Actor::Space => ActorKind::Space,
            Actor::Food(_) => ActorKind::Food,
            Actor::Egg(_) => ActorKind::Egg,
            Actor::Organism(_) => ActorKind::Organism,
        }
    }

    /// Whether this actor initiates pairwise interactions
    pub fn interacts(&self) -> bool {
        matches!(self, Actor::Organism(_))
    }

    /// Resolution order within an epoch, higher first
    pub fn priority(&self) -> i32 {
        match self {
            Actor::Egg(_) => 2,
            Actor::Space => 1,
            Actor::Organism(organism) => organism.priority(),
            Actor::Wall | Actor::Obstacle | Actor::Food(_) => 0,
        }
    }

    pub fn as_organism(&self) -> Option<&Organism> {
        match self {
            Actor::Organism(organism) => Some(organism),
            _ => None,
        }
    }

    /// Self-transition, independent of neighbours
    pub fn age(&self, ctx: &mut EpochContext<'_>) -> Actor {
        match self {
            Actor::Wall | Actor::Obstacle => self.clone(),
            Actor::Space => {
                if ctx.rng.gen::<f64>() < ctx.dynamics.food_chance {
                    Actor::Food(Food::new(
                        ctx.next_id(),
                        ctx.dynamics.food_lifespan,
                        ctx.dynamics.food_value,
                    ))
                } else {
                    Actor::Space
                }
            }
            Actor::Food(food) => food.age(),
            Actor::Egg(egg) => egg.age(ctx),
            Actor::Organism(organism) => Actor::Organism(organism.clone()),
        }
    }

    /// Pairwise transition; the returned pair replaces `(self, other)` in the same cells.
    pub fn interact(&self, other: &Actor, ctx: &mut EpochContext<'_>) -> (Actor, Actor) {
        match self {
            Actor::Organism(organism) => organism.interact(other, ctx),
            _ => (self.clone(), other.clone()),
        }
    }
}

impl PartialEq for Actor {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Actor {}

impl Hash for Actor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

/// Edible item that spoils after a while
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub id: ActorId,
    pub lifespan: u32,
    pub value: i32,
}

impl Food {
    pub fn new(id: ActorId, lifespan: u32, value: i32) -> Self {
        Self {
            id,
            lifespan,
            value,
        }
    }

    fn age(&self) -> Actor {
        if self.lifespan > 0 {
            Actor::Food(Food {
                lifespan: self.lifespan - 1,
                ..self.clone()
            })
        } else {
            Actor::Space
        }
    }
}

/// A laid egg waiting to hatch
#[derive(Debug, Clone)]
pub struct Egg {
    pub id: ActorId,
    pub child_genome: Genome,
    pub child_bio: Bio,
    pub lifespan: u32,
}

impl Egg {
    pub fn new(id: ActorId, child_genome: Genome, child_bio: Bio, lifespan: u32) -> Self {
        Self {
            id,
            child_genome,
            child_bio,
            lifespan,
        }
    }

    fn age(&self, ctx: &mut EpochContext<'_>) -> Actor {
        if self.lifespan > 0 {
            Actor::Egg(Egg {
                lifespan: self.lifespan - 1,
                ..self.clone()
            })
        } else {
            Actor::Organism(self.hatch(ctx))
        }
    }

    /// Newborn with statistics derived from the child genome
    pub fn hatch(&self, ctx: &EpochContext<'_>) -> Organism {
        Organism::new(
            ctx.next_id(),
            self.child_genome.clone(),
            self.child_bio.clone(),
        )
    }
}

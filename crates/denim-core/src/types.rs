//! Core type definitions for the simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an actor on the board.
///
/// Identity, not value: two actors carrying the same id are the same actor even when their
/// other fields have diverged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl ActorId {
    /// Shared id of every wall cell
    pub const WALL: ActorId = ActorId(1);
    /// Shared id of every obstacle cell
    pub const OBSTACLE: ActorId = ActorId(2);
    /// Shared id of every empty ground cell
    pub const SPACE: ActorId = ActorId(3);

    /// Highest id reserved for singletons; allocated ids start above this
    pub const RESERVED_MAX: u64 = 10;

    /// Whether this id belongs to one of the singleton actors
    pub fn is_singleton(&self) -> bool {
        self.0 <= Self::RESERVED_MAX
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Variant tag of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Wall,
    Obstacle,
    Space,
    Food,
    Egg,
    Organism,
}

impl ActorKind {
    pub fn all() -> [ActorKind; 6] {
        [
            ActorKind::Wall,
            ActorKind::Obstacle,
            ActorKind::Space,
            ActorKind::Food,
            ActorKind::Egg,
            ActorKind::Organism,
        ]
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActorKind::Wall => "wall",
            ActorKind::Obstacle => "obstacle",
            ActorKind::Space => "space",
            ActorKind::Food => "food",
            ActorKind::Egg => "egg",
            ActorKind::Organism => "organism",
        };
        f.write_str(name)
    }
}

/// Absolute cell position in a grid's backing storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Step one cell in `direction`, or `None` when that would leave the non-negative quadrant
    pub fn step(&self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.to_delta();
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal direction; the board has no diagonal adjacency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn to_delta(&self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn all() -> [Direction; 4] {
        [
            Direction::East,
            Direction::West,
            Direction::South,
            Direction::North,
        ]
    }
}

/// Statistic a gene modifier contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Statistic {
    Strength,
    Agility,
    Constitution,
}

/// Derived organism statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub strength: i32,
    pub agility: i32,
    pub constitution: i32,
    pub health: i32,
}

impl Statistics {
    /// Health every organism is born with
    pub const BASE_HEALTH: i32 = 100;

    pub fn new(strength: i32, agility: i32, constitution: i32, health: i32) -> Self {
        Self {
            strength,
            agility,
            constitution,
            health,
        }
    }

    pub fn with_health(self, health: i32) -> Self {
        Self { health, ..self }
    }

    /// Copy with `delta` added to health (negative for damage)
    pub fn adjust_health(self, delta: i32) -> Self {
        self.with_health(self.health.saturating_add(delta))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            Gender::Female
        } else {
            Gender::Male
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Gender::Female => Gender::Male,
            Gender::Male => Gender::Female,
        }
    }
}

//! World simulation engine.
//!
//! A [`Board`] is a walled [`Grid`] of [`Actor`]s. Each epoch the [`Scheduler`] ages every
//! cell, then lets organisms meet a random orthogonal neighbour in priority order: they eat,
//! wander, lay eggs, mate or fight. [`Simulation`] drives the scheduler and reports on the
//! population as it goes.

pub mod actor;
pub mod board;
pub mod census;
pub mod context;
pub mod events;
pub mod grid;
pub mod organism;
pub mod populate;
pub mod render;
pub mod scheduler;
pub mod simulation;

pub use actor::{Actor, Egg, Food};
pub use board::Board;
pub use census::Census;
pub use context::EpochContext;
pub use events::{EventLog, EventSink, EventTally, Fanout, TracingSink, WorldEvent};
pub use grid::{Axis, Bounds, Grid, Patch, Selection, View, ViewMut};
pub use organism::{Bio, Effect, EffectHandle, Organism};
pub use populate::{NoFounders, Placement, Populator};
pub use render::{ConsoleRenderer, GlyphTable, Renderer};
pub use scheduler::Scheduler;
pub use simulation::{Simulation, SimulationReport};

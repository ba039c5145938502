//! Epoch scheduler: ages every cell, then resolves pairwise interactions in priority order.

use crate::actor::Actor;
use crate::board::Board;
use crate::context::EpochContext;
use crate::events::{EventSink, WorldEvent};
use crate::grid::Grid;
use denim_core::{
    ActorId, Direction, DynamicsConfig, GridAxis, IdAllocator, IndexError, MutationConfig,
    Position, Result, SimulationConfig,
};
use denim_genetics::Mutator;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// An interacting actor found at the start of the interaction phase
#[derive(Debug, Clone, Copy)]
struct Candidate {
    position: Position,
    id: ActorId,
    priority: i32,
}

/// What happened during one interaction phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseSummary {
    pub candidates: usize,
    pub resolved_pairs: usize,
    pub halted: bool,
}

pub struct Scheduler {
    rng: ChaCha8Rng,
    ids: Arc<dyn IdAllocator>,
    events: Arc<dyn EventSink>,
    dynamics: DynamicsConfig,
    mutator: Mutator,
}

impl Scheduler {
    pub fn new(
        seed: u64,
        ids: Arc<dyn IdAllocator>,
        events: Arc<dyn EventSink>,
        dynamics: DynamicsConfig,
        mutation: MutationConfig,
    ) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            ids,
            events,
            dynamics,
            mutator: Mutator::new(mutation),
        }
    }

    pub fn from_config(
        config: &SimulationConfig,
        ids: Arc<dyn IdAllocator>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self::new(
            config.seed,
            ids,
            events,
            config.dynamics.clone(),
            config.mutation.clone(),
        )
    }

    /// Context sharing this scheduler's randomness and id allocator
    pub fn context(&mut self) -> EpochContext<'_> {
        EpochContext::new(&mut self.rng, &*self.ids, &self.dynamics, &self.mutator)
    }

    /// Board for the next epoch; `board` itself is left untouched.
    #[instrument(skip_all, fields(epoch = board.epoch()))]
    pub fn advance(&mut self, board: &Board) -> Result<Board> {
        let epoch = board.epoch();
        let mut working = self.age_phase(board);
        let summary = self.interaction_phase(&mut working, epoch)?;

        debug!(
            epoch,
            candidates = summary.candidates,
            resolved = summary.resolved_pairs,
            halted = summary.halted,
            "Epoch advanced"
        );
        Ok(Board::new(working, epoch + 1))
    }

    fn age_phase(&mut self, board: &Board) -> Grid<Actor> {
        let epoch = board.epoch();
        let mut ctx = EpochContext::new(&mut self.rng, &*self.ids, &self.dynamics, &self.mutator);
        let aged = board.grid().map(|actor| actor.age(&mut ctx));

        for ((x, y, before), (_, _, after)) in board.grid().iter_coords().zip(aged.iter_coords()) {
            if let Some(event) = WorldEvent::from_aging(epoch, Position::new(x, y), before, after) {
                self.events.record(&event);
            }
        }

        aged
    }

    fn interaction_phase(&mut self, grid: &mut Grid<Actor>, epoch: u64) -> Result<PhaseSummary> {
        let mut candidates: Vec<Candidate> = grid
            .iter_coords()
            .filter(|(_, _, actor)| actor.interacts())
            .map(|(x, y, actor)| Candidate {
                position: Position::new(x, y),
                id: actor.id(),
                priority: actor.priority(),
            })
            .collect();
        // Stable, so equal priorities keep row-major order.
        candidates.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut summary = PhaseSummary {
            candidates: candidates.len(),
            ..Default::default()
        };
        let mut resolved: HashSet<ActorId> = HashSet::new();
        let mut ctx = EpochContext::new(&mut self.rng, &*self.ids, &self.dynamics, &self.mutator);

        for candidate in candidates {
            let direction = *Direction::all()
                .choose(&mut *ctx.rng)
                .unwrap_or(&Direction::North);
            let target = neighbour(grid, candidate.position, direction)?;

            let actor = grid.view().cell_at(candidate.position.x, candidate.position.y)?.clone();
            let other = grid.view().cell_at(target.x, target.y)?.clone();

            if resolved.contains(&candidate.id) || resolved.contains(&other.id()) {
                debug!(id = %candidate.id, "Consumed actor reached, ending interaction phase");
                summary.halted = true;
                break;
            }

            // Organisms only leave their cell on their own turn or by dying.
            debug_assert_eq!(actor.id(), candidate.id);

            let (next_actor, next_other) = actor.interact(&other, &mut ctx);

            for id in [actor.id(), other.id()] {
                if id != next_actor.id() && id != next_other.id() {
                    resolved.insert(id);
                }
            }

            if let Some(event) = WorldEvent::from_interaction(
                epoch,
                (candidate.position, &actor, &next_actor),
                (target, &other, &next_other),
            ) {
                self.events.record(&event);
            }

            let (x, y) = (candidate.position.x as isize, candidate.position.y as isize);
            grid.set_cell(x, y, next_actor)?;
            grid.set_cell(target.x as isize, target.y as isize, next_other)?;
            summary.resolved_pairs += 1;
        }

        Ok(summary)
    }
}

/// Orthogonal neighbour of `position`; stepping off the grid is an index error
fn neighbour(grid: &Grid<Actor>, position: Position, direction: Direction) -> Result<Position> {
    let (rows, cols) = grid.dims();
    let (dx, dy) = direction.to_delta();
    let (axis, index, hi) = if dx != 0 {
        (GridAxis::X, position.x as isize + dx, cols)
    } else {
        (GridAxis::Y, position.y as isize + dy, rows)
    };

    match position.step(direction) {
        Some(next) if next.x < cols && next.y < rows => Ok(next),
        _ => Err(IndexError {
            axis,
            index,
            resolved: index,
            lo: 0,
            hi,
        }
        .into()),
    }
}

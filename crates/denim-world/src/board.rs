//! The simulation board: a walled grid of actors plus its epoch counter.

use crate::actor::Actor;
use crate::context::EpochContext;
use crate::grid::{Grid, View};
use crate::organism::Organism;
use crate::populate::Populator;
use denim_core::{BoardConfig, Position, Result};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid<Actor>,
    epoch: u64,
}

impl Board {
    pub fn new(grid: Grid<Actor>, epoch: u64) -> Self {
        Self { grid, epoch }
    }

    /// Grid of the configured size with a wall border and empty ground inside
    pub fn walled(config: &BoardConfig) -> Result<Self> {
        let mut grid = Grid::uniform(config.n_rows as i64, config.n_cols as i64, Actor::Wall)?;
        grid.inner_mut().fill(Actor::Space);
        Ok(Self::new(grid, 0))
    }

    /// Build the starting board and let `populator` place founders inside the wall border
    pub fn initialise(
        config: &BoardConfig,
        populator: &mut dyn Populator,
        ctx: &mut EpochContext<'_>,
    ) -> Result<Self> {
        let mut board = Self::walled(config)?;
        let placed = populator.populate(&mut board.grid.inner_mut(), ctx)?;

        if placed != config.starting_organism_count {
            warn!(
                placed,
                expected = config.starting_organism_count,
                "Founder count differs from configuration"
            );
        }

        info!(
            rows = config.n_rows,
            cols = config.n_cols,
            founders = placed,
            "Board initialised"
        );
        Ok(board)
    }

    pub fn grid(&self) -> &Grid<Actor> {
        &self.grid
    }

    pub fn view(&self) -> View<'_, Actor> {
        self.grid.view()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// `(rows, cols)` of the whole board, walls included
    pub fn dims(&self) -> (usize, usize) {
        self.grid.dims()
    }

    pub fn actor_at(&self, position: Position) -> Result<&Actor> {
        self.grid.view().cell_at(position.x, position.y)
    }

    pub fn organisms(&self) -> impl Iterator<Item = (Position, &Organism)> + '_ {
        self.grid
            .iter_coords()
            .filter_map(|(x, y, actor)| actor.as_organism().map(|org| (Position::new(x, y), org)))
    }

    pub fn population(&self) -> usize {
        self.organisms().count()
    }

    pub fn into_grid(self) -> Grid<Actor> {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populate::{NoFounders, Placement};
    use denim_core::{ActorKind, DynamicsConfig, Gender, MutationConfig, SequentialIds};
    use denim_genetics::{Genome, Mutator};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(rows: usize, cols: usize, count: usize) -> BoardConfig {
        BoardConfig {
            n_rows: rows,
            n_cols: cols,
            starting_organism_count: count,
        }
    }

    #[test]
    fn test_walled_board_has_border() {
        let board = Board::walled(&config(4, 5, 0)).unwrap();
        assert_eq!(board.dims(), (4, 5));
        assert_eq!(board.epoch(), 0);

        for (x, y, actor) in board.grid().iter_coords() {
            let edge = x == 0 || y == 0 || x == 4 || y == 3;
            let expected = if edge { ActorKind::Wall } else { ActorKind::Space };
            assert_eq!(actor.kind(), expected, "cell ({}, {})", x, y);
        }
    }

    #[test]
    fn test_initialise_places_founders_inside_walls() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ids = SequentialIds::new();
        let dynamics = DynamicsConfig::default();
        let mutator = Mutator::new(MutationConfig::default());
        let mut ctx = EpochContext::new(&mut rng, &ids, &dynamics, &mutator);

        let mut placement = Placement::new()
            .with_founder(0, 0, Genome::default(), Gender::Female)
            .with_founder(-1, -1, Genome::default(), Gender::Male);
        let board = Board::initialise(&config(5, 5, 2), &mut placement, &mut ctx).unwrap();

        let positions: Vec<Position> = board.organisms().map(|(pos, _)| pos).collect();
        assert_eq!(positions, vec![Position::new(1, 1), Position::new(3, 3)]);
        assert_eq!(board.population(), 2);
        assert_eq!(
            board.actor_at(Position::new(0, 0)).unwrap().kind(),
            ActorKind::Wall
        );
    }

    #[test]
    fn test_default_populator_leaves_board_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ids = SequentialIds::new();
        let dynamics = DynamicsConfig::default();
        let mutator = Mutator::new(MutationConfig::default());
        let mut ctx = EpochContext::new(&mut rng, &ids, &dynamics, &mutator);

        let board = Board::initialise(&config(20, 15, 10), &mut NoFounders, &mut ctx).unwrap();
        assert_eq!(board.population(), 0);
        assert_eq!(board.dims(), (20, 15));
    }
}

//! Starting-state generators.

use crate::actor::Actor;
use crate::context::EpochContext;
use crate::grid::ViewMut;
use crate::organism::{Bio, Organism};
use denim_core::{Gender, Result};
use denim_genetics::Genome;
use tracing::debug;

/// Places founders on a freshly walled board.
///
/// `interior` is the region inside the wall border; coordinates are relative to it and
/// accept negative indices. Returns the number of organisms placed.
pub trait Populator {
    fn populate(
        &mut self,
        interior: &mut ViewMut<'_, Actor>,
        ctx: &mut EpochContext<'_>,
    ) -> Result<usize>;
}

/// Places nobody
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFounders;

impl Populator for NoFounders {
    fn populate(
        &mut self,
        _interior: &mut ViewMut<'_, Actor>,
        _ctx: &mut EpochContext<'_>,
    ) -> Result<usize> {
        Ok(0)
    }
}

#[derive(Debug, Clone)]
struct Founder {
    x: isize,
    y: isize,
    genome: Genome,
    gender: Gender,
}

/// Places an explicit list of founders, each with a fresh id
#[derive(Debug, Clone, Default)]
pub struct Placement {
    founders: Vec<Founder>,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_founder(mut self, x: isize, y: isize, genome: Genome, gender: Gender) -> Self {
        self.founders.push(Founder {
            x,
            y,
            genome,
            gender,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.founders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.founders.is_empty()
    }
}

impl Populator for Placement {
    fn populate(
        &mut self,
        interior: &mut ViewMut<'_, Actor>,
        ctx: &mut EpochContext<'_>,
    ) -> Result<usize> {
        for founder in &self.founders {
            let organism = Organism::new(
                ctx.next_id(),
                founder.genome.clone(),
                Bio::founder(founder.gender),
            );
            debug!(id = %organism.id, x = founder.x, y = founder.y, "Placing founder");
            interior.set_cell(founder.x, founder.y, Actor::Organism(organism))?;
        }
        Ok(self.founders.len())
    }
}

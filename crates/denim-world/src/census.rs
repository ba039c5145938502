//! Population snapshot of a board.

use crate::actor::Actor;
use crate::board::Board;
use denim_core::Gender;
use serde::Serialize;
use tracing::{event, info, Level};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Census {
    pub epoch: u64,
    pub organisms: usize,
    pub females: usize,
    pub males: usize,
    pub gestating: usize,
    pub founders: usize,
    pub eggs: usize,
    pub food: usize,
    pub mean_health: f64,
    pub min_health: i32,
    pub max_health: i32,
}

impl Census {
    pub fn from_board(board: &Board) -> Self {
        let mut census = Census {
            epoch: board.epoch(),
            ..Default::default()
        };
        let mut healths: Vec<i32> = Vec::new();

        for (_, _, actor) in board.grid().iter_coords() {
            match actor {
                Actor::Organism(organism) => {
                    census.organisms += 1;
                    match organism.gender() {
                        Gender::Female => census.females += 1,
                        Gender::Male => census.males += 1,
                    }
                    if organism.is_gestating() {
                        census.gestating += 1;
                    }
                    if organism.bio.is_founder() {
                        census.founders += 1;
                    }
                    healths.push(organism.statistics.health);
                }
                Actor::Egg(_) => census.eggs += 1,
                Actor::Food(_) => census.food += 1,
                Actor::Wall | Actor::Obstacle | Actor::Space => {}
            }
        }

        if !healths.is_empty() {
            let total: i64 = healths.iter().map(|&h| h as i64).sum();
            census.mean_health = total as f64 / healths.len() as f64;
            census.min_health = healths.iter().min().copied().unwrap_or(0);
            census.max_health = healths.iter().max().copied().unwrap_or(0);
        }

        census
    }

    pub fn is_extinct(&self) -> bool {
        self.organisms == 0 && self.eggs == 0
    }

    /// Log this snapshot plus a population gauge
    pub fn emit(&self) {
        info!(
            event = "population_census",
            epoch = self.epoch,
            organisms = self.organisms,
            females = self.females,
            males = self.males,
            gestating = self.gestating,
            founders = self.founders,
            eggs = self.eggs,
            food = self.food,
            mean_health = format!("{:.2}", self.mean_health),
            min_health = self.min_health,
            max_health = self.max_health,
            "Population census"
        );

        event!(
            Level::INFO,
            gauge_name = "population_total",
            gauge_value = self.organisms,
            epoch = self.epoch,
            "Population gauge"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Egg, Food};
    use crate::grid::Grid;
    use crate::organism::{Bio, Organism};
    use denim_core::{ActorId, Statistics};
    use denim_genetics::Genome;

    fn organism(id: u64, gender: Gender, health: i32) -> Actor {
        let org = Organism::new(ActorId(id), Genome::default(), Bio::founder(gender));
        Actor::Organism(org.with_statistics(Statistics::new(0, 0, 0, health)))
    }

    #[test]
    fn test_census_counts() {
        let egg = Actor::Egg(Egg::new(
            ActorId(30),
            Genome::default(),
            Bio::founder(Gender::Male),
            3,
        ));
        let grid = Grid::from_rows(vec![
            vec![organism(20, Gender::Female, 90), organism(21, Gender::Male, 110)],
            vec![egg, Actor::Food(Food::new(ActorId(31), 2, 5))],
            vec![Actor::Wall, organism(22, Gender::Male, 100)],
        ])
        .unwrap();
        let census = Census::from_board(&Board::new(grid, 4));

        assert_eq!(census.epoch, 4);
        assert_eq!(census.organisms, 3);
        assert_eq!(census.females, 1);
        assert_eq!(census.males, 2);
        assert_eq!(census.founders, 3);
        assert_eq!(census.eggs, 1);
        assert_eq!(census.food, 1);
        assert_eq!(census.min_health, 90);
        assert_eq!(census.max_health, 110);
        assert!((census.mean_health - 100.0).abs() < f64::EPSILON);
        assert!(!census.is_extinct());
    }

    #[test]
    fn test_empty_board_is_extinct() {
        let grid = Grid::uniform(3, 3, Actor::Space).unwrap();
        let census = Census::from_board(&Board::new(grid, 0));
        assert_eq!(census.organisms, 0);
        assert_eq!(census.mean_health, 0.0);
        assert!(census.is_extinct());
    }
}

use denim_core::{
    ActorId, ActorKind, BoardConfig, DynamicsConfig, Gender, MutationConfig, SequentialIds,
    SimulationConfig, Statistic,
};
use denim_genetics::{Gene, Genome, Modifier};
use denim_world::{
    Actor, Bio, Board, EventLog, Food, Grid, Organism, Placement, Scheduler, Simulation,
    WorldEvent,
};
use std::collections::HashSet;
use std::sync::Arc;

fn founder(id: u64, gender: Gender, strength: i32, agility: i32) -> Actor {
    let genome = Genome::new(vec![Gene::new(vec![
        Modifier::new(Statistic::Strength, strength),
        Modifier::new(Statistic::Agility, agility),
    ])]);
    Actor::Organism(Organism::new(ActorId(id), genome, Bio::founder(gender)))
}

fn scheduler(seed: u64, dynamics: DynamicsConfig, log: Arc<EventLog>) -> Scheduler {
    Scheduler::new(
        seed,
        Arc::new(SequentialIds::starting_at(1_000)),
        log,
        dynamics,
        MutationConfig::default(),
    )
}

fn quiet() -> DynamicsConfig {
    DynamicsConfig {
        food_chance: 0.0,
        ..Default::default()
    }
}

#[test]
fn organism_next_to_food_eats_it() {
    let log = Arc::new(EventLog::new());
    let mut scheduler = scheduler(11, quiet(), log.clone());

    // 3x3: a lone organism in the centre with food in place of the east wall.
    let food = Actor::Food(Food::new(ActorId(50), 1_000, 5));
    let grid = Grid::from_rows(vec![
        vec![Actor::Wall, Actor::Wall, Actor::Wall],
        vec![Actor::Wall, founder(20, Gender::Male, 1, 1), food],
        vec![Actor::Wall, Actor::Wall, Actor::Wall],
    ])
    .unwrap();
    let mut board = Board::new(grid, 0);

    while board.grid().cell(2, 1).unwrap().kind() == ActorKind::Food {
        let next = scheduler.advance(&board).unwrap();
        assert_eq!(next.epoch(), board.epoch() + 1);
        assert_eq!(next.dims(), (3, 3));
        board = next;
        assert!(board.epoch() < 500, "organism never reached the food");
    }

    let fed = board.grid().cell(1, 1).unwrap().as_organism().unwrap();
    assert_eq!(fed.id, ActorId(20));
    assert_eq!(fed.statistics.health, 105);
    assert_eq!(board.grid().cell(2, 1).unwrap().kind(), ActorKind::Space);

    let fed_events = log
        .snapshot()
        .into_iter()
        .filter(|event| matches!(event, WorldEvent::Fed { .. }))
        .count();
    assert_eq!(fed_events, 1);
}

#[test]
fn fights_always_cost_health() {
    let log = Arc::new(EventLog::new());
    let dynamics = DynamicsConfig {
        food_chance: 0.0,
        ignore_chance: 0.0,
        mate_chance: 0.0,
        ..Default::default()
    };
    let mut scheduler = scheduler(5, dynamics, log.clone());

    // Zero strength on both sides still deducts one per blow.
    let grid = Grid::from_rows(vec![
        vec![Actor::Wall, Actor::Wall, Actor::Wall, Actor::Wall],
        vec![
            Actor::Wall,
            founder(20, Gender::Male, 0, 2),
            founder(21, Gender::Male, 0, 1),
            Actor::Wall,
        ],
        vec![Actor::Wall, Actor::Wall, Actor::Wall, Actor::Wall],
    ])
    .unwrap();
    let mut board = Board::new(grid, 0);

    for _ in 0..40 {
        let before: Vec<i32> = board.organisms().map(|(_, o)| o.statistics.health).collect();
        let next = scheduler.advance(&board).unwrap();
        let after: Vec<i32> = next.organisms().map(|(_, o)| o.statistics.health).collect();

        let fights = log
            .drain()
            .into_iter()
            .filter(|event| matches!(event, WorldEvent::Fought { .. }))
            .count();
        if fights > 0 {
            assert_eq!(before.len(), after.len());
            for (old, new) in before.iter().zip(&after) {
                assert!(new < old, "a fight left health at {} from {}", new, old);
            }
        }
        board = next;
    }

    let total: i32 = board.organisms().map(|(_, o)| o.statistics.health).sum();
    assert!(total < 200);
}

#[test]
fn new_ids_come_from_the_allocator() {
    let mut config = SimulationConfig {
        seed: 9,
        num_epochs: 60,
        ..Default::default()
    };
    config.board = BoardConfig {
        n_rows: 10,
        n_cols: 10,
        starting_organism_count: 4,
    };
    config.dynamics.food_chance = 0.05;
    config.dynamics.ignore_chance = 0.2;
    config.dynamics.mate_chance = 0.8;

    let genome = Genome::new(vec![
        Gene::new(vec![Modifier::new(Statistic::Agility, 2)]),
        Gene::new(vec![Modifier::new(Statistic::Constitution, 3)]),
    ]);
    let mut placement = Placement::new()
        .with_founder(1, 1, genome.clone(), Gender::Female)
        .with_founder(2, 1, genome.clone(), Gender::Male)
        .with_founder(4, 4, genome.clone(), Gender::Female)
        .with_founder(4, 5, genome, Gender::Male);

    let log = Arc::new(EventLog::new());
    let mut sim = Simulation::with_sink(config, &mut placement, log.clone()).unwrap();

    let mut seen: HashSet<ActorId> = sim
        .board()
        .grid()
        .iter_coords()
        .map(|(_, _, a)| a.id())
        .collect();
    let last_founder = sim.board().organisms().map(|(_, o)| o.id).max().unwrap();
    assert_eq!(sim.board().population(), 4);

    for _ in 0..60 {
        let board = sim.step().unwrap();
        for (_, _, actor) in board.grid().iter_coords() {
            let id = actor.id();
            assert!(
                id.is_singleton() || seen.contains(&id) || id > last_founder,
                "unexpected id {}",
                id
            );
        }
        seen.extend(board.grid().iter_coords().map(|(_, _, a)| a.id()));
    }

    // Every conceived egg carries an id nobody else has used.
    let mut eggs = HashSet::new();
    for event in log.snapshot() {
        if let WorldEvent::Conceived { egg, .. } = event {
            assert!(eggs.insert(egg), "egg id {} issued twice", egg);
        }
    }
}

#[test]
fn wall_border_survives_a_long_run() {
    let mut config = SimulationConfig {
        seed: 3,
        num_epochs: 100,
        ..Default::default()
    };
    config.dynamics.food_chance = 0.1;

    let genome = Genome::new(vec![Gene::new(vec![Modifier::new(Statistic::Strength, 3)])]);
    let mut placement = Placement::new()
        .with_founder(0, 0, genome.clone(), Gender::Female)
        .with_founder(-1, -1, genome, Gender::Male);
    config.board.starting_organism_count = placement.len();

    let mut sim = Simulation::new(config, &mut placement).unwrap();
    let report = sim.run().unwrap();
    assert_eq!(report.final_epoch, 100);

    let board = sim.board();
    let (rows, cols) = board.dims();
    assert_eq!((rows, cols), (20, 15));
    for (x, y, actor) in board.grid().iter_coords() {
        if x == 0 || y == 0 || x == cols - 1 || y == rows - 1 {
            assert_eq!(actor.kind(), ActorKind::Wall);
        }
    }
}

//! Simulation driver: owns the current board and advances it epoch by epoch.

use crate::board::Board;
use crate::census::Census;
use crate::events::{EventSink, EventTally, Fanout, TracingSink};
use crate::populate::Populator;
use crate::scheduler::Scheduler;
use denim_core::{Result, SequentialIds, SimulationConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{info, instrument};

/// Outcome of a finished (or interrupted) run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub epochs_run: u64,
    pub final_epoch: u64,
    pub census: Census,
    pub event_totals: BTreeMap<String, u64>,
}

pub struct Simulation {
    board: Board,
    scheduler: Scheduler,
    tally: Arc<EventTally>,
    config: SimulationConfig,
    epochs_run: u64,
}

impl Simulation {
    /// Simulation whose events go to the tracing pipeline
    pub fn new(config: SimulationConfig, populator: &mut dyn Populator) -> Result<Self> {
        Self::with_sink(config, populator, Arc::new(TracingSink))
    }

    pub fn with_sink(
        config: SimulationConfig,
        populator: &mut dyn Populator,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        config.validate()?;

        let tally = Arc::new(EventTally::new());
        let events = Fanout::new().with(sink).with(tally.clone());
        let mut scheduler = Scheduler::from_config(
            &config,
            Arc::new(SequentialIds::new()),
            Arc::new(events),
        );
        let board = Board::initialise(&config.board, populator, &mut scheduler.context())?;

        info!(
            seed = config.seed,
            num_epochs = config.num_epochs,
            population = board.population(),
            "Simulation created"
        );

        Ok(Self {
            board,
            scheduler,
            tally,
            config,
            epochs_run: 0,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn census(&self) -> Census {
        Census::from_board(&self.board)
    }

    /// Advance one epoch
    pub fn step(&mut self) -> Result<&Board> {
        self.board = self.scheduler.advance(&self.board)?;
        self.epochs_run += 1;

        let interval = self.config.census_interval;
        if interval > 0 && self.board.epoch() % interval == 0 {
            self.census().emit();
        }

        Ok(&self.board)
    }

    /// Run the configured number of epochs, handing each new board to `observer`.
    ///
    /// The observer may break early; the report then covers the epochs actually run.
    #[instrument(skip_all, fields(num_epochs = self.config.num_epochs))]
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<SimulationReport>
    where
        F: FnMut(&Board) -> ControlFlow<()>,
    {
        info!("Starting simulation for {} epochs", self.config.num_epochs);

        for _ in 0..self.config.num_epochs {
            let board = self.step()?;
            if observer(board).is_break() {
                info!(epoch = board.epoch(), "Simulation stopped by observer");
                break;
            }
        }

        let report = self.report();
        info!(
            event = "simulation_finished",
            epochs_run = report.epochs_run,
            final_epoch = report.final_epoch,
            organisms = report.census.organisms,
            eggs = report.census.eggs,
            "Simulation finished"
        );
        Ok(report)
    }

    pub fn run(&mut self) -> Result<SimulationReport> {
        self.run_with(|_| ControlFlow::Continue(()))
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            epochs_run: self.epochs_run,
            final_epoch: self.board.epoch(),
            census: self.census(),
            event_totals: self
                .tally
                .totals()
                .into_iter()
                .map(|(name, count)| (name.to_string(), count))
                .collect(),
        }
    }
}

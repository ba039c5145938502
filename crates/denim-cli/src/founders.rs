//! Random founder placement for command-line runs.

use denim_core::{Gender, SimulationConfig, Statistic};
use denim_genetics::{Gene, Genome, Modifier};
use denim_world::Placement;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::warn;

const GENES_PER_FOUNDER: usize = 3;
const MAX_MODIFIER: i32 = 3;

/// Scatter `starting_organism_count` founders over distinct interior cells
pub fn scatter(config: &SimulationConfig) -> Placement {
    // Offset so founder genomes do not replay the scheduler's stream.
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed ^ 0x5eed_f00d);
    let width = config.board.n_cols.saturating_sub(2);
    let height = config.board.n_rows.saturating_sub(2);
    let cells = width * height;

    let wanted = config.board.starting_organism_count;
    if wanted > cells {
        warn!(wanted, cells, "More founders requested than interior cells");
    }

    let mut placement = Placement::new();
    for cell in sample(&mut rng, cells, wanted.min(cells)).into_iter() {
        let (x, y) = ((cell % width) as isize, (cell / width) as isize);
        let genome = random_genome(&mut rng);
        placement = placement.with_founder(x, y, genome, Gender::random(&mut rng));
    }
    placement
}

fn random_genome(rng: &mut ChaCha8Rng) -> Genome {
    let genes = (0..GENES_PER_FOUNDER)
        .map(|_| {
            Gene::new(
                [Statistic::Strength, Statistic::Agility, Statistic::Constitution]
                    .into_iter()
                    .map(|statistic| Modifier::new(statistic, rng.gen_range(0..=MAX_MODIFIER)))
                    .collect(),
            )
        })
        .collect();
    Genome::new(genes)
}

//! Mutation and crossover operators for genomes.

use crate::gene::{Gene, Genome};
use denim_core::MutationConfig;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

pub struct Mutator {
    config: MutationConfig,
}

impl Mutator {
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// With probability `mutation_chance`, shift one modifier by a non-zero amount.
    ///
    /// Genes without modifiers have nothing to shift and come back unchanged.
    pub fn mutate_gene(&self, gene: &Gene, rng: &mut ChaCha8Rng) -> Gene {
        if gene.is_empty() || rng.gen::<f64>() >= self.config.mutation_chance {
            return gene.clone();
        }

        let mut mutated = gene.clone();
        let index = rng.gen_range(0..mutated.modifiers.len());
        let magnitude = rng.gen_range(1..=self.config.max_delta.max(1));
        let delta = if rng.gen::<bool>() { magnitude } else { -magnitude };

        let modifier = &mut mutated.modifiers[index];
        // Push away from whichever end of the range would swallow the change.
        let delta = match modifier.amount.checked_add(delta) {
            Some(_) => delta,
            None => -delta,
        };
        modifier.amount += delta;

        trace!(
            statistic = ?modifier.statistic,
            delta,
            amount = modifier.amount,
            "Gene mutated"
        );

        mutated
    }

    /// Pick every locus from either parent with equal odds, then mutate it.
    ///
    /// Parents of different lengths pair up to the shorter genome; trailing genes of the
    /// longer parent are not inherited.
    pub fn crossover(&self, left: &Genome, right: &Genome, rng: &mut ChaCha8Rng) -> Genome {
        if left.len() != right.len() {
            debug!(
                left_len = left.len(),
                right_len = right.len(),
                "Crossover of unequal genomes truncates to the shorter parent"
            );
        }

        let genes = left
            .genes
            .iter()
            .zip(&right.genes)
            .map(|(left_gene, right_gene)| {
                let chosen = if rng.gen::<bool>() { left_gene } else { right_gene };
                self.mutate_gene(chosen, rng)
            })
            .collect();

        Genome::new(genes)
    }
}

//! Gene and genome structure for organisms.

use crate::mutation::Mutator;
use denim_core::{Statistic, Statistics};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A single contribution to one statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub statistic: Statistic,
    pub amount: i32,
}

impl Modifier {
    pub fn new(statistic: Statistic, amount: i32) -> Self {
        Self { statistic, amount }
    }
}

/// An ordered run of modifiers, inherited as a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub modifiers: Vec<Modifier>,
}

impl Gene {
    pub fn new(modifiers: Vec<Modifier>) -> Self {
        Self { modifiers }
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Possibly mutated copy of this gene
    pub fn mutate(&self, mutator: &Mutator, rng: &mut ChaCha8Rng) -> Gene {
        mutator.mutate_gene(self, rng)
    }
}

/// Ordered gene sequence. Position matters: crossover pairs genes by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    pub genes: Vec<Gene>,
}

impl Genome {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier> + '_ {
        self.genes.iter().flat_map(|gene| gene.modifiers.iter())
    }

    /// Child genome taking each locus from one parent at random
    pub fn crossover(&self, other: &Genome, mutator: &Mutator, rng: &mut ChaCha8Rng) -> Genome {
        mutator.crossover(self, other, rng)
    }

    /// Sum modifiers per statistic; health starts at the base value.
    pub fn derive_statistics(&self) -> Statistics {
        let mut stats = Statistics {
            strength: 0,
            agility: 0,
            constitution: 0,
            health: Statistics::BASE_HEALTH,
        };

        for modifier in self.modifiers() {
            let total = match modifier.statistic {
                Statistic::Strength => &mut stats.strength,
                Statistic::Agility => &mut stats.agility,
                Statistic::Constitution => &mut stats.constitution,
            };
            *total = total.saturating_add(modifier.amount);
        }

        stats
    }
}

//! Hereditary structures for organisms.
//!
//! A genome is an ordered list of genes, each an ordered list of statistic modifiers.
//! Offspring genomes come from per-locus crossover of both parents followed by mutation,
//! and an organism's statistics are derived from its genome once, at birth.

pub mod gene;
pub mod mutation;

pub use gene::{Gene, Genome, Modifier};
pub use mutation::Mutator;

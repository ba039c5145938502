use denim_core::{MutationConfig, Statistic};
use denim_genetics::{Gene, Genome, Modifier, Mutator};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn statistic() -> impl Strategy<Value = Statistic> {
    prop_oneof![
        Just(Statistic::Strength),
        Just(Statistic::Agility),
        Just(Statistic::Constitution),
    ]
}

fn genome() -> impl Strategy<Value = Genome> {
    let modifier = (statistic(), -10i32..10).prop_map(|(s, a)| Modifier::new(s, a));
    let gene = prop::collection::vec(modifier, 0..4).prop_map(Gene::new);
    prop::collection::vec(gene, 0..6).prop_map(Genome::new)
}

fn total(genome: &Genome, statistic: Statistic) -> i32 {
    genome
        .modifiers()
        .filter(|m| m.statistic == statistic)
        .map(|m| m.amount)
        .sum()
}

proptest! {
    #[test]
    fn statistics_sum_modifiers(genome in genome()) {
        let stats = genome.derive_statistics();
        prop_assert_eq!(stats.strength, total(&genome, Statistic::Strength));
        prop_assert_eq!(stats.agility, total(&genome, Statistic::Agility));
        prop_assert_eq!(stats.constitution, total(&genome, Statistic::Constitution));
        prop_assert_eq!(stats.health, 100);
    }

    #[test]
    fn crossover_without_mutation_copies_parent_loci(
        left in genome(),
        right in genome(),
        seed in any::<u64>(),
    ) {
        let mutator = Mutator::new(MutationConfig { mutation_chance: 0.0, max_delta: 1 });
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let child = left.crossover(&right, &mutator, &mut rng);

        prop_assert_eq!(child.len(), left.len().min(right.len()));
        for (i, gene) in child.genes.iter().enumerate() {
            prop_assert!(gene == &left.genes[i] || gene == &right.genes[i]);
        }
    }

    #[test]
    fn forced_mutation_moves_one_modifier(genome in genome(), seed in any::<u64>()) {
        let mutator = Mutator::new(MutationConfig { mutation_chance: 1.0, max_delta: 3 });
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for gene in &genome.genes {
            let mutated = gene.mutate(&mutator, &mut rng);
            prop_assert_eq!(mutated.len(), gene.len());
            let changed: Vec<i32> = gene
                .modifiers
                .iter()
                .zip(&mutated.modifiers)
                .filter(|(a, b)| a.amount != b.amount)
                .map(|(a, b)| (b.amount - a.amount).abs())
                .collect();
            if gene.is_empty() {
                prop_assert!(changed.is_empty());
            } else {
                prop_assert_eq!(changed.len(), 1);
                prop_assert!((1..=3).contains(&changed[0]));
            }
        }
    }
}

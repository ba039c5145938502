//! Organism state and pairwise interaction rules.

use crate::actor::{Actor, Egg, Food};
use crate::context::EpochContext;
use denim_core::{ActorId, Gender, Statistics};
use denim_genetics::Genome;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::trace;

/// A named, persistent modifier attached to an organism
pub trait Effect: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// The organism as changed by this effect
    fn apply(&self, organism: &Organism) -> Organism;
}

/// Shared handle to an effect; two handles are the same effect when their names match
#[derive(Debug, Clone)]
pub struct EffectHandle(Arc<dyn Effect>);

impl EffectHandle {
    pub fn new<E: Effect + 'static>(effect: E) -> Self {
        Self(Arc::new(effect))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn apply(&self, organism: &Organism) -> Organism {
        self.0.apply(organism)
    }
}

impl PartialEq for EffectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for EffectHandle {}

impl Hash for EffectHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

/// Parentage and sex, fixed at conception
#[derive(Debug, Clone)]
pub struct Bio {
    pub father: Option<Arc<Organism>>,
    pub mother: Option<Arc<Organism>>,
    pub gender: Gender,
}

impl Bio {
    pub fn new(father: Organism, mother: Organism, gender: Gender) -> Self {
        Self {
            father: Some(Arc::new(father)),
            mother: Some(Arc::new(mother)),
            gender,
        }
    }

    /// Bio of an organism placed on the board rather than born
    pub fn founder(gender: Gender) -> Self {
        Self {
            father: None,
            mother: None,
            gender,
        }
    }

    pub fn is_founder(&self) -> bool {
        self.father.is_none() && self.mother.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Organism {
    pub id: ActorId,
    pub genome: Genome,
    pub statistics: Statistics,
    pub bio: Bio,
    pub effects: HashSet<EffectHandle>,
    pub pregnant_with: Option<Box<Egg>>,
}

impl Organism {
    /// Newborn whose statistics are derived from its genome
    pub fn new(id: ActorId, genome: Genome, bio: Bio) -> Self {
        let statistics = genome.derive_statistics();
        Self {
            id,
            genome,
            statistics,
            bio,
            effects: HashSet::new(),
            pregnant_with: None,
        }
    }

    pub fn gender(&self) -> Gender {
        self.bio.gender
    }

    pub fn priority(&self) -> i32 {
        self.statistics.agility
    }

    pub fn is_gestating(&self) -> bool {
        self.pregnant_with.is_some()
    }

    pub fn with_statistics(&self, statistics: Statistics) -> Self {
        Self {
            statistics,
            ..self.clone()
        }
    }

    pub fn with_effect(&self, effect: EffectHandle) -> Self {
        let mut next = self.clone();
        next.effects.insert(effect);
        next
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|effect| effect.name() == name)
    }

    /// Run every attached effect over this organism, in name order
    pub fn apply_effects(&self) -> Self {
        let mut effects: Vec<&EffectHandle> = self.effects.iter().collect();
        effects.sort_by(|a, b| a.name().cmp(b.name()));
        effects
            .into_iter()
            .fold(self.clone(), |organism, effect| effect.apply(&organism))
    }

    fn with_egg(&self, egg: Egg) -> Self {
        Self {
            pregnant_with: Some(Box::new(egg)),
            ..self.clone()
        }
    }

    fn without_egg(&self) -> Self {
        Self {
            pregnant_with: None,
            ..self.clone()
        }
    }

    /// Two organisms can mate when they differ in gender and neither is carrying an egg
    pub fn can_mate(&self, other: &Organism) -> bool {
        self.gender() != other.gender() && !self.is_gestating() && !other.is_gestating()
    }

    /// Resolve an encounter with the actor in a neighbouring cell.
    ///
    /// The result replaces `(self, other)` positionally.
    pub fn interact(&self, other: &Actor, ctx: &mut EpochContext<'_>) -> (Actor, Actor) {
        match other {
            Actor::Space => self.enter(ctx),
            Actor::Food(food) => self.eat(food),
            Actor::Organism(partner) => self.meet(partner, ctx),
            Actor::Wall | Actor::Obstacle => (Actor::Organism(self.clone()), other.clone()),
            // Eggs block like walls until they hatch.
            Actor::Egg(_) => (Actor::Organism(self.clone()), other.clone()),
        }
    }

    /// Step into an empty cell, laying an egg there instead if carrying one
    fn enter(&self, ctx: &mut EpochContext<'_>) -> (Actor, Actor) {
        if let Some(egg) = &self.pregnant_with {
            trace!(organism = %self.id, egg = %egg.id, "laying egg");
            return (
                Actor::Organism(self.without_egg()),
                Actor::Egg(egg.as_ref().clone()),
            );
        }

        if ctx.rng.gen::<bool>() {
            (Actor::Organism(self.clone()), Actor::Space)
        } else {
            (Actor::Space, Actor::Organism(self.clone()))
        }
    }

    fn eat(&self, food: &Food) -> (Actor, Actor) {
        let statistics = self.statistics.adjust_health(food.value);
        (Actor::Organism(self.with_statistics(statistics)), Actor::Space)
    }

    fn meet(&self, other: &Organism, ctx: &mut EpochContext<'_>) -> (Actor, Actor) {
        let roll: f64 = ctx.rng.gen();
        let ignore = ctx.dynamics.ignore_chance;

        if roll < ignore {
            return (
                Actor::Organism(self.clone()),
                Actor::Organism(other.clone()),
            );
        }

        if roll - ignore < ctx.dynamics.mate_chance && self.can_mate(other) {
            self.mate(other, ctx)
        } else {
            self.fight(other)
        }
    }

    fn mate(&self, other: &Organism, ctx: &mut EpochContext<'_>) -> (Actor, Actor) {
        let genome = self.genome.crossover(&other.genome, ctx.mutator, ctx.rng);
        let (mother, father) = match self.gender() {
            Gender::Female => (self, other),
            Gender::Male => (other, self),
        };

        let bio = Bio::new(father.clone(), mother.clone(), Gender::random(ctx.rng));
        let egg = Egg::new(ctx.next_id(), genome, bio, ctx.dynamics.egg_lifespan);
        trace!(mother = %mother.id, father = %father.id, egg = %egg.id, "conceived");

        let expecting = mother.with_egg(egg);
        match self.gender() {
            Gender::Female => (
                Actor::Organism(expecting),
                Actor::Organism(other.clone()),
            ),
            Gender::Male => (
                Actor::Organism(self.clone()),
                Actor::Organism(expecting),
            ),
        }
    }

    /// The faster organism strikes first; on equal agility the initiator is treated as slower.
    fn fight(&self, other: &Organism) -> (Actor, Actor) {
        let initiator_is_slow = self.statistics.agility <= other.statistics.agility;
        let (slow, fast) = if initiator_is_slow {
            (self, other)
        } else {
            (other, self)
        };

        let (slow_after, fast_after) = exchange_blows(slow, fast);
        if initiator_is_slow {
            (slow_after, fast_after)
        } else {
            (fast_after, slow_after)
        }
    }
}

/// Damage a strike deals, never less than one
fn strike(attacker: &Statistics, defender: &Statistics) -> i32 {
    (attacker.strength - defender.constitution).max(1)
}

fn exchange_blows(slow: &Organism, fast: &Organism) -> (Actor, Actor) {
    let slow_loss = strike(&fast.statistics, &slow.statistics);
    if slow.statistics.health <= slow_loss {
        return (Actor::Space, Actor::Organism(fast.clone()));
    }

    let wounded_slow = slow.with_statistics(slow.statistics.adjust_health(-slow_loss));
    let fast_loss = strike(&slow.statistics, &fast.statistics);
    if fast.statistics.health <= fast_loss {
        return (Actor::Organism(wounded_slow), Actor::Space);
    }

    let wounded_fast = fast.with_statistics(fast.statistics.adjust_health(-fast_loss));
    (Actor::Organism(wounded_slow), Actor::Organism(wounded_fast))
}

#[cfg(test)]
mod tests {
    use super::*;
    use denim_core::{DynamicsConfig, MutationConfig, SequentialIds, Statistic};
    use denim_genetics::{Gene, Modifier, Mutator};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        rng: ChaCha8Rng,
        ids: SequentialIds,
        dynamics: DynamicsConfig,
        mutator: Mutator,
    }

    impl Fixture {
        fn with_chances(ignore_chance: f64, mate_chance: f64) -> Self {
            Self {
                rng: ChaCha8Rng::seed_from_u64(7),
                ids: SequentialIds::starting_at(1000),
                dynamics: DynamicsConfig {
                    ignore_chance,
                    mate_chance,
                    egg_lifespan: 4,
                    ..Default::default()
                },
                mutator: Mutator::new(MutationConfig {
                    mutation_chance: 0.0,
                    max_delta: 1,
                }),
            }
        }

        fn ctx(&mut self) -> EpochContext<'_> {
            EpochContext::new(&mut self.rng, &self.ids, &self.dynamics, &self.mutator)
        }
    }

    fn organism(
        id: u64,
        gender: Gender,
        strength: i32,
        agility: i32,
        constitution: i32,
    ) -> Organism {
        let genome = Genome::new(vec![Gene::new(vec![
            Modifier::new(Statistic::Strength, strength),
            Modifier::new(Statistic::Agility, agility),
            Modifier::new(Statistic::Constitution, constitution),
        ])]);
        Organism::new(ActorId(id), genome, Bio::founder(gender))
    }

    fn expect_organism(actor: &Actor) -> &Organism {
        actor.as_organism().expect("expected an organism")
    }

    #[derive(Debug)]
    struct Haste;

    impl Effect for Haste {
        fn name(&self) -> &str {
            "haste"
        }

        fn apply(&self, organism: &Organism) -> Organism {
            organism.with_statistics(Statistics {
                agility: organism.statistics.agility + 1,
                ..organism.statistics
            })
        }
    }

    #[derive(Debug)]
    struct Frailty;

    impl Effect for Frailty {
        fn name(&self) -> &str {
            "frailty"
        }

        fn apply(&self, organism: &Organism) -> Organism {
            organism.with_statistics(organism.statistics.adjust_health(-10))
        }
    }

    #[test]
    fn test_newborn_statistics_come_from_genome() {
        let org = organism(20, Gender::Female, 3, 1, 2);
        assert_eq!(org.statistics, Statistics::new(3, 1, 2, 100));
        assert_eq!(org.priority(), 1);
        assert!(org.bio.is_founder());
        assert!(!org.is_gestating());
    }

    #[test]
    fn test_eating_keeps_position_and_gains_value() {
        let mut fixture = Fixture::with_chances(0.5, 0.3);
        let org = organism(20, Gender::Male, 1, 1, 1);
        let food = Actor::Food(Food::new(ActorId(30), 3, 5));

        let (left, right) = Actor::Organism(org).interact(&food, &mut fixture.ctx());
        assert_eq!(expect_organism(&left).statistics.health, 105);
        assert_eq!(right.id(), ActorId::SPACE);
    }

    #[test]
    fn test_walls_and_eggs_block() {
        let mut fixture = Fixture::with_chances(0.5, 0.3);
        let org = organism(20, Gender::Male, 1, 1, 1);
        let egg = Actor::Egg(Egg::new(
            ActorId(31),
            Genome::default(),
            Bio::founder(Gender::Female),
            2,
        ));

        for blocker in [Actor::Wall, Actor::Obstacle, egg] {
            let (left, right) = org.interact(&blocker, &mut fixture.ctx());
            assert_eq!(left.id(), ActorId(20));
            assert_eq!(right.id(), blocker.id());
        }
    }

    #[test]
    fn test_moving_into_space_swaps_or_stays() {
        let mut fixture = Fixture::with_chances(0.5, 0.3);
        let org = organism(20, Gender::Male, 1, 1, 1);
        let mut moved = false;
        let mut stayed = false;

        for _ in 0..64 {
            let (left, right) = org.interact(&Actor::Space, &mut fixture.ctx());
            match (left.id(), right.id()) {
                (ActorId(20), ActorId::SPACE) => stayed = true,
                (ActorId::SPACE, ActorId(20)) => moved = true,
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        assert!(moved && stayed);
    }

    #[test]
    fn test_gestating_organism_lays_egg_in_space() {
        let mut fixture = Fixture::with_chances(0.0, 1.0);
        let mother = organism(20, Gender::Female, 1, 1, 1);
        let father = organism(21, Gender::Male, 1, 1, 1);

        let (left, _) = mother.interact(&Actor::Organism(father), &mut fixture.ctx());
        let expecting = expect_organism(&left).clone();
        assert!(expecting.is_gestating());

        let (left, right) = expecting.interact(&Actor::Space, &mut fixture.ctx());
        assert_eq!(left.id(), ActorId(20));
        assert!(!expect_organism(&left).is_gestating());
        match right {
            Actor::Egg(egg) => assert_eq!(egg.lifespan, 4),
            other => panic!("expected an egg, got {:?}", other),
        }
    }

    #[test]
    fn test_mating_impregnates_the_female() {
        let mut fixture = Fixture::with_chances(0.0, 1.0);
        let father = organism(21, Gender::Male, 2, 2, 2);
        let mother = organism(22, Gender::Female, 1, 1, 1);

        let (left, right) = father.interact(&Actor::Organism(mother), &mut fixture.ctx());
        assert_eq!(left.id(), ActorId(21));
        assert!(!expect_organism(&left).is_gestating());

        let mother = expect_organism(&right);
        let egg = mother.pregnant_with.as_ref().expect("mother should carry an egg");
        assert!(egg.id.0 >= 1000);
        assert_eq!(egg.child_genome.len(), 1);
        assert_eq!(egg.child_bio.father.as_ref().map(|o| o.id), Some(ActorId(21)));
        assert_eq!(egg.child_bio.mother.as_ref().map(|o| o.id), Some(ActorId(22)));
    }

    #[test]
    fn test_same_gender_fights_instead_of_mating() {
        let mut fixture = Fixture::with_chances(0.0, 1.0);
        let a = organism(21, Gender::Male, 5, 1, 0);
        let b = organism(22, Gender::Male, 5, 1, 0);
        assert!(!a.can_mate(&b));

        let (left, right) = a.interact(&Actor::Organism(b), &mut fixture.ctx());
        assert_eq!(expect_organism(&left).statistics.health, 95);
        assert_eq!(expect_organism(&right).statistics.health, 95);
        assert!(!expect_organism(&right).is_gestating());
    }

    #[test]
    fn test_ignoring_leaves_both_unchanged() {
        let mut fixture = Fixture::with_chances(1.0, 0.0);
        let a = organism(21, Gender::Male, 5, 1, 0);
        let b = organism(22, Gender::Female, 5, 1, 0);

        let (left, right) = a.interact(&Actor::Organism(b), &mut fixture.ctx());
        assert_eq!(expect_organism(&left).statistics.health, 100);
        assert_eq!(expect_organism(&right).statistics.health, 100);
        assert!(!expect_organism(&right).is_gestating());
    }

    #[test]
    fn test_fight_damage_has_floor_of_one() {
        let mut fixture = Fixture::with_chances(0.0, 0.0);
        let weak = organism(21, Gender::Male, 0, 3, 0);
        let tank = organism(22, Gender::Male, 0, 1, 50);

        let (left, right) = weak.interact(&Actor::Organism(tank), &mut fixture.ctx());
        assert_eq!(expect_organism(&left).statistics.health, 99);
        assert_eq!(expect_organism(&right).statistics.health, 99);
    }

    #[test]
    fn test_faster_organism_kills_before_counter_strike() {
        let mut fixture = Fixture::with_chances(0.0, 0.0);
        let slow = organism(21, Gender::Male, 500, 1, 0);
        let fast = organism(22, Gender::Male, 500, 9, 0);

        let (left, right) = slow.interact(&Actor::Organism(fast.clone()), &mut fixture.ctx());
        assert_eq!(left.id(), ActorId::SPACE);
        assert_eq!(expect_organism(&right).statistics.health, 100);

        // Output order follows input order when the initiator is the faster one.
        let (left, right) = fast.interact(&Actor::Organism(slow), &mut fixture.ctx());
        assert_eq!(expect_organism(&left).statistics.health, 100);
        assert_eq!(right.id(), ActorId::SPACE);
    }

    #[test]
    fn test_counter_strike_can_kill_the_faster() {
        let mut fixture = Fixture::with_chances(0.0, 0.0);
        let slow = organism(21, Gender::Male, 500, 1, 0);
        let fast = organism(22, Gender::Male, 1, 9, 0);

        let (left, right) = slow.interact(&Actor::Organism(fast), &mut fixture.ctx());
        assert_eq!(expect_organism(&left).statistics.health, 99);
        assert_eq!(right.id(), ActorId::SPACE);
    }

    #[test]
    fn test_equal_agility_treats_initiator_as_slower() {
        let mut fixture = Fixture::with_chances(0.0, 0.0);
        let a = organism(21, Gender::Male, 500, 2, 0);
        let b = organism(22, Gender::Male, 500, 2, 0);

        let (left, right) = a.interact(&Actor::Organism(b), &mut fixture.ctx());
        assert_eq!(left.id(), ActorId::SPACE);
        assert_eq!(right.id(), ActorId(22));
    }

    #[test]
    fn test_effects_are_identified_by_name() {
        let org = organism(21, Gender::Male, 1, 1, 1)
            .with_effect(EffectHandle::new(Haste))
            .with_effect(EffectHandle::new(Haste));
        assert_eq!(org.effects.len(), 1);
        assert!(org.has_effect("haste"));
        assert!(!org.has_effect("slow"));
    }

    #[test]
    fn test_effects_transform_the_organism() {
        let org = organism(21, Gender::Male, 1, 1, 1);
        assert_eq!(EffectHandle::new(Haste).apply(&org).priority(), 2);

        let affected = org
            .with_effect(EffectHandle::new(Haste))
            .with_effect(EffectHandle::new(Frailty))
            .apply_effects();
        assert_eq!(affected.statistics, Statistics::new(1, 2, 1, 90));
        assert_eq!(affected.effects.len(), 2);
        assert_eq!(org.statistics, Statistics::new(1, 1, 1, 100));
    }
}

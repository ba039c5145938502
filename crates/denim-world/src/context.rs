//! Per-epoch services handed to actor transitions.

use denim_core::{ActorId, DynamicsConfig, IdAllocator};
use denim_genetics::Mutator;
use rand_chacha::ChaCha8Rng;

/// Everything an actor transition may consult besides the actors themselves
pub struct EpochContext<'a> {
    pub rng: &'a mut ChaCha8Rng,
    pub ids: &'a dyn IdAllocator,
    pub dynamics: &'a DynamicsConfig,
    pub mutator: &'a Mutator,
}

impl<'a> EpochContext<'a> {
    pub fn new(
        rng: &'a mut ChaCha8Rng,
        ids: &'a dyn IdAllocator,
        dynamics: &'a DynamicsConfig,
        mutator: &'a Mutator,
    ) -> Self {
        Self {
            rng,
            ids,
            dynamics,
            mutator,
        }
    }

    pub fn next_id(&self) -> ActorId {
        self.ids.next_id()
    }
}

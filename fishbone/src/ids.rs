use crate::model::NodeId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};

static INSTANCES: AtomicU64 = AtomicU64::new(0);

/// Seeded source for node ids and initial positions.
pub struct IdGen {
    rng: StdRng,
}

impl IdGen {
    pub fn from_seed(seed: u64) -> Self {
        IdGen {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed without touching the OS entropy source (unavailable on wasm32-unknown-unknown).
    pub fn unseeded() -> Self {
        let n = INSTANCES.fetch_add(1, Ordering::Relaxed);
        Self::from_seed(RandomState::new().hash_one(n))
    }

    /// Random v4 UUID not rejected by `taken`.
    pub fn fresh(&mut self, taken: impl Fn(&NodeId) -> bool) -> NodeId {
        loop {
            let bytes: [u8; 16] = self.rng.random();
            let id = NodeId::new(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string());
            if !taken(&id) {
                return id;
            }
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

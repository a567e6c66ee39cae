//! Organism name assignment

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::lock;

/// Draws organism names uniformly from a configured candidate list,
/// falling back to numbered names when the list is empty.
pub struct NamePool {
    names: Vec<String>,
    rng: Mutex<ChaCha8Rng>,
    fallback_counter: AtomicU64,
}

impl NamePool {
    pub fn new(names: Vec<String>, rng: ChaCha8Rng) -> Self {
        Self {
            names,
            rng: Mutex::new(rng),
            fallback_counter: AtomicU64::new(1),
        }
    }

    pub fn draw(&self) -> String {
        if self.names.is_empty() {
            let n = self.fallback_counter.fetch_add(1, Ordering::Relaxed);
            return format!("Organism {n}");
        }
        let index = lock(&self.rng).gen_range(0..self.names.len());
        self.names[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_draws_from_pool() {
        let pool = NamePool::new(
            vec!["Ada".to_string(), "Bix".to_string()],
            ChaCha8Rng::seed_from_u64(1),
        );
        for _ in 0..20 {
            let name = pool.draw();
            assert!(name == "Ada" || name == "Bix");
        }
    }

    #[test]
    fn test_empty_pool_numbers_names() {
        let pool = NamePool::new(Vec::new(), ChaCha8Rng::seed_from_u64(1));
        assert_eq!(pool.draw(), "Organism 1");
        assert_eq!(pool.draw(), "Organism 2");
    }
}

//! Drawing many structures at once.

use ahash::AHashSet;
use log::info;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::Generator;
use crate::RandStructError;

impl Generator {
    /// Generate `count` structures in parallel.
    ///
    /// Structure `k` is drawn from its own `StdRng` seeded with `seed + k`,
    /// so the result does not depend on the number of threads.
    pub fn sample_batch(&self, count: usize, seed: u64) -> Result<Vec<String>, RandStructError> {
        (0..count)
            .into_par_iter()
            .map(|k| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(k as u64));
                self.generate(&mut rng)
            })
            .collect()
    }

    /// Generate `count` pairwise distinct structures, giving up after
    /// `max_attempts` draws.
    pub fn sample_unique<R: Rng + ?Sized>(
        &self,
        count: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Vec<String>, RandStructError> {
        let mut seen: AHashSet<String> = AHashSet::default();
        let mut unique = Vec::with_capacity(count);
        let mut attempts = 0;
        while unique.len() < count {
            if attempts >= max_attempts {
                return Err(RandStructError::NotEnoughUnique {
                    found: unique.len(),
                    requested: count,
                    attempts,
                });
            }
            attempts += 1;
            let structure = self.generate(rng)?;
            if seen.insert(structure.clone()) {
                unique.push(structure);
            }
        }
        info!("Drew {count} distinct structures in {attempts} attempts.");
        Ok(unique)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use crate::Weights;
    use ff_structure::PairTable;

    #[test]
    fn test_batch_is_reproducible() {
        let generator = Generator::try_from(&GeneratorConfig::classic()).unwrap();
        let a = generator.sample_batch(64, 11).unwrap();
        let b = generator.sample_batch(64, 11).unwrap();
        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
        for s in &a {
            assert!(PairTable::try_from(s.as_str()).is_ok());
        }
    }

    #[test]
    fn test_batch_matches_sequential() {
        let generator = Generator::try_from(&GeneratorConfig::classic()).unwrap();
        let batch = generator.sample_batch(8, 100).unwrap();
        for (k, s) in batch.iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(100 + k as u64);
            assert_eq!(&generator.generate(&mut rng).unwrap(), s);
        }
    }

    #[test]
    fn test_unique_structures() {
        let mut config = GeneratorConfig::classic();
        config.builder.lengthmin = 20;
        let generator = Generator::try_from(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let structs = generator.sample_unique(20, 10_000, &mut rng).unwrap();
        let set: AHashSet<_> = structs.iter().collect();
        assert_eq!(set.len(), 20);
    }

    #[test]
    fn test_unique_gives_up() {
        let mut config = GeneratorConfig::classic();
        config.builder.base_weights = Weights::new(1.0, 0.0, 0.0);
        config.builder.stop_prob = 1.0;
        let generator = Generator::try_from(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let err = generator.sample_unique(2, 10, &mut rng).unwrap_err();
        assert!(matches!(err, RandStructError::NotEnoughUnique { found: 1, requested: 2, attempts: 10 }));
    }
}

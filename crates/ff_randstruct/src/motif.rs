//! Rejection sampling for structural motifs.
//!
//! The enforcer draws structures from a `StructureBuilder` until one is
//! accepted. By default a structure is accepted if, after collapsing runs of
//! unpaired bases, it contains the configured motif (`)).((` marks two stems
//! leaving the same loop, i.e. a multiloop branch point).

use log::debug;
use log::trace;
use log::warn;
use rand::Rng;

use ff_structure::collapse_runs;

use crate::FailurePolicy;
use crate::GenerationError;
use crate::MotifConfig;
use crate::MotifError;
use crate::StructureBuilder;

/// An accepted structure and the number of builds it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enforced {
    pub structure: String,
    pub attempts: usize,
}

pub struct MotifEnforcer<'a> {
    builder: &'a StructureBuilder,
    config: &'a MotifConfig,
}

impl<'a> MotifEnforcer<'a> {
    pub fn new(builder: &'a StructureBuilder, config: &'a MotifConfig) -> Self {
        Self { builder, config }
    }

    /// True if the canonical form of `structure` contains the motif.
    pub fn has_motif(&self, structure: &str) -> bool {
        match self.config.collapse {
            Some(symbol) => collapse_runs(structure, symbol).contains(&self.config.motif),
            None => structure.contains(&self.config.motif),
        }
    }

    /// Build until a structure carries the configured motif.
    pub fn enforce<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Enforced, MotifError> {
        self.enforce_with(rng, |s| self.has_motif(s))
    }

    /// Build until `accept` returns true for a structure.
    pub fn enforce_with<R, F>(&self, rng: &mut R, accept: F) -> Result<Enforced, MotifError>
    where
        R: Rng + ?Sized,
        F: Fn(&str) -> bool,
    {
        let mut attempts = 0;
        loop {
            if self.config.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(MotifError::Exhausted { attempts });
            }
            attempts += 1;

            match self.builder.build(rng) {
                Ok(dbv) => {
                    let structure = dbv.to_string();
                    if accept(&structure) {
                        debug!("Accepted structure after {attempts} attempts.");
                        return Ok(Enforced { structure, attempts });
                    }
                    trace!("Rejected {structure}");
                }
                Err(err) => self.on_failure(attempts, err)?,
            }
        }
    }

    fn on_failure(&self, attempt: usize, err: GenerationError) -> Result<(), MotifError> {
        match self.config.on_failure {
            FailurePolicy::Retry => {
                warn!("Generation attempt {attempt} failed: {err}");
                Ok(())
            }
            FailurePolicy::Propagate => Err(MotifError::Generation(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ff_structure::PairTable;

    use crate::BuilderConfig;
    use crate::Weights;

    fn motif(max_attempts: Option<usize>, on_failure: FailurePolicy) -> MotifConfig {
        MotifConfig {
            force: true,
            max_attempts,
            on_failure,
            ..MotifConfig::default()
        }
    }

    #[test]
    fn test_always_true_accepts_first() {
        let builder = StructureBuilder::new(BuilderConfig::classic()).unwrap();
        let config = motif(Some(1), FailurePolicy::Retry);
        let enforcer = MotifEnforcer::new(&builder, &config);
        let res = enforcer.enforce_with(&mut StdRng::seed_from_u64(0), |_| true).unwrap();
        assert_eq!(res.attempts, 1);
    }

    #[test]
    fn test_always_false_exhausts() {
        let builder = StructureBuilder::new(BuilderConfig::classic()).unwrap();
        let config = motif(Some(25), FailurePolicy::Retry);
        let enforcer = MotifEnforcer::new(&builder, &config);
        let err = enforcer.enforce_with(&mut StdRng::seed_from_u64(0), |_| false).unwrap_err();
        assert!(matches!(err, MotifError::Exhausted { attempts: 25 }));
    }

    #[test]
    fn test_has_motif_after_collapse() {
        let builder = StructureBuilder::new(BuilderConfig::classic()).unwrap();
        let config = motif(None, FailurePolicy::Retry);
        let enforcer = MotifEnforcer::new(&builder, &config);
        assert!(enforcer.has_motif("((....))....((...))"));
        assert!(!enforcer.has_motif("((....))((...))"));
        assert!(!enforcer.has_motif("(....)...(...)"));

        let raw = MotifConfig { collapse: None, ..config.clone() };
        let enforcer = MotifEnforcer::new(&builder, &raw);
        assert!(!enforcer.has_motif("((....))....((...))"));
        assert!(enforcer.has_motif("((....)).((...))"));
    }

    #[test]
    fn test_enforced_structures_carry_motif() {
        let builder = StructureBuilder::new(BuilderConfig::multiloop().with_lengthmin(30)).unwrap();
        let config = motif(Some(100_000), FailurePolicy::Retry);
        let enforcer = MotifEnforcer::new(&builder, &config);
        for seed in 0..10 {
            let res = enforcer.enforce(&mut StdRng::seed_from_u64(seed)).unwrap();
            assert!(collapse_runs(&res.structure, '.').contains(")).(("));
            assert!(PairTable::try_from(res.structure.as_str()).is_ok());
        }
    }

    #[test]
    fn test_failure_policies() {
        // Closing is the only non-zero weight: every build fails at step 0.
        let broken = BuilderConfig {
            base_weights: Weights::new(0.0, 0.0, 1.0),
            weight_adjust: 0.0,
            stem_continue_boost: 0.0,
            ..BuilderConfig::classic()
        };
        let builder = StructureBuilder::new(broken).unwrap();

        let config = motif(Some(5), FailurePolicy::Propagate);
        let enforcer = MotifEnforcer::new(&builder, &config);
        let err = enforcer.enforce(&mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, MotifError::Generation(GenerationError::DegenerateWeights { .. })));

        let config = motif(Some(5), FailurePolicy::Retry);
        let enforcer = MotifEnforcer::new(&builder, &config);
        let err = enforcer.enforce(&mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, MotifError::Exhausted { attempts: 5 }));
    }
}

//! The ff_randstruct crate.
//!
//! Random RNA secondary structures in dot-bracket notation, e.g. as puzzle
//! targets. This is a procedural generator, not a folding model: there is
//! no energy evaluation and no sequence design.
//!
//!  - `StructureBuilder`: a stochastic left-to-right emitter that always
//!    returns balanced structures with a minimum hairpin size.
//!  - `MotifEnforcer`: rejection sampling on top of the builder, e.g. to
//!    force multiloop branch points.
//!  - `Generator`: both of the above behind one `GeneratorConfig`, plus
//!    seeded batch sampling.
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use ff_randstruct::{generate, GeneratorConfig};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let structure = generate(&GeneratorConfig::classic(), &mut rng).unwrap();
//! assert!(structure.chars().all(|c| ".()".contains(c)));
//! ```

mod error;
mod config;
mod builder;
mod motif;
mod sampling;

pub use error::*;
pub use config::*;
pub use builder::*;
pub use motif::*;

use rand::Rng;

/// A configured generator: the structure builder and, if requested, motif
/// forcing on top of it.
#[derive(Debug, Clone)]
pub struct Generator {
    builder: StructureBuilder,
    motif: MotifConfig,
}

impl TryFrom<&GeneratorConfig> for Generator {
    type Error = ConfigError;

    fn try_from(config: &GeneratorConfig) -> Result<Self, Self::Error> {
        config.motif.validate()?;
        Ok(Self {
            builder: StructureBuilder::new(config.builder.clone())?,
            motif: config.motif.clone(),
        })
    }
}

impl Generator {
    /// Generate one structure.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, RandStructError> {
        if self.motif.force {
            let enforced = MotifEnforcer::new(&self.builder, &self.motif).enforce(rng)?;
            Ok(enforced.structure)
        } else {
            Ok(self.builder.build(rng)?.to_string())
        }
    }
}

/// Generate one structure from a configuration.
pub fn generate<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<String, RandStructError> {
    Generator::try_from(config)?.generate(rng)
}

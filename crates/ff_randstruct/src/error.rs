use ff_structure::StructureError;
use thiserror::Error;

/// Malformed generator configuration, detected before any generation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lengthmin must be at least 1")]
    ZeroLength,

    #[error("'{name}' must be at least 1")]
    ZeroCount { name: &'static str },

    #[error("'{name}' must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("'{name}' must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("'{name}' must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("'{name}' is an empty range: {min}..={max}")]
    EmptyRange { name: &'static str, min: usize, max: usize },

    #[error("closing loops of size {closing} violate the minimum hairpin size {min_hairpin}")]
    ClosingLoopTooSmall { closing: usize, min_hairpin: usize },

    #[error("lengthmin {lengthmin} with step_factor {step_factor} can exceed the maximum structure length of {limit}")]
    TooLong { lengthmin: usize, step_factor: usize, limit: usize },

    #[error("end_weights need at least one positive entry")]
    ZeroEndWeights,

    #[error("The motif must not be empty")]
    EmptyMotif,

    #[error("Failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single generation attempt.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("All symbol weights vanished at step {step}")]
    DegenerateWeights { step: usize },

    #[error("Weighted draw failed: {source}")]
    Draw {
        #[from]
        source: rand::distr::weighted::Error,
    },

    #[error("Generated an invalid structure: {source}")]
    InvalidStructure {
        #[from]
        source: StructureError,
    },

    #[error("Generated a hairpin of size {gap}, below the minimum of {min}")]
    HairpinTooSmall { gap: usize, min: usize },
}

/// Failure of the motif rejection sampler.
#[derive(Debug, Error)]
pub enum MotifError {
    #[error("No structure with the requested motif after {attempts} attempts")]
    Exhausted { attempts: usize },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Error)]
pub enum RandStructError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Motif(#[from] MotifError),

    #[error("Found only {found} of {requested} distinct structures after {attempts} attempts")]
    NotEnoughUnique { found: usize, requested: usize, attempts: usize },
}

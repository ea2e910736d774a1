//! Generator configuration.
//!
//! All tunables of the structure builder and the motif enforcer live here as
//! plain immutable values. Every field has a default (the `classic` preset),
//! so JSON configurations only need to name what they change. The exception
//! is `Weights`: a weight table must name all three symbols.
//!
//! ```json
//! {
//!   "builder": {
//!     "lengthmin": 30,
//!     "base_weights": { ".": 0.3, "(": 0.35, ")": 0.25 }
//!   },
//!   "motif": { "force": true, "max_attempts": 1000 }
//! }
//! ```

use std::path::Path;
use serde::Deserialize;
use serde::Serialize;
use ff_structure::DotBracket;
use ff_structure::NAIDX;

use crate::ConfigError;

/// Symbol order used for weight vectors and draws.
pub const SYMBOLS: [DotBracket; 3] = [DotBracket::Unpaired, DotBracket::Open, DotBracket::Close];

/// Relative mass for each of the three dot-bracket symbols.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(rename = ".")]
    pub unpaired: f64,
    #[serde(rename = "(")]
    pub open: f64,
    #[serde(rename = ")")]
    pub close: f64,
}

impl Weights {
    pub fn new(unpaired: f64, open: f64, close: f64) -> Self {
        Self { unpaired, open, close }
    }

    pub fn get_mut(&mut self, db: DotBracket) -> &mut f64 {
        match db {
            DotBracket::Unpaired => &mut self.unpaired,
            DotBracket::Open => &mut self.open,
            DotBracket::Close => &mut self.close,
        }
    }

    /// Weights in `SYMBOLS` order.
    pub fn as_array(&self) -> [f64; 3] {
        [self.unpaired, self.open, self.close]
    }

    pub fn total(&self) -> f64 {
        self.unpaired + self.open + self.close
    }

    /// Negative and NaN entries become zero.
    pub fn clamped(self) -> Self {
        let clamp = |w: f64| if w > 0.0 { w } else { 0.0 };
        Self::new(clamp(self.unpaired), clamp(self.open), clamp(self.close))
    }

    /// Clamp and scale to a probability vector. Returns `None` if no mass
    /// remains (or the mass is not finite).
    pub fn normalized(self) -> Option<Self> {
        let w = self.clamped();
        let total = w.total();
        if total > 0.0 && total.is_finite() {
            Some(Self::new(w.unpaired / total, w.open / total, w.close / total))
        } else {
            None
        }
    }
}

/// Which symbol the internal-loop bias acts upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopBiasTarget {
    Open,
    Close,
}

impl From<LoopBiasTarget> for DotBracket {
    fn from(t: LoopBiasTarget) -> Self {
        match t {
            LoopBiasTarget::Open => DotBracket::Open,
            LoopBiasTarget::Close => DotBracket::Close,
        }
    }
}

/// Tunables of the structure builder.
///
/// Ranges are inclusive `(min, max)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Unpaired dots the main loop must emit before it may stop early.
    pub lengthmin: usize,
    /// The main loop runs at most `step_factor * lengthmin` steps.
    pub step_factor: usize,
    pub base_weights: Weights,
    /// Additive bias towards repeating the previous symbol.
    pub weight_adjust: f64,
    /// Extra additive bias to continue a run of `(` or `)`.
    pub stem_continue_boost: f64,
    /// Additive bias for `(` right after `)`.
    pub branch_boost: f64,
    pub stop_prob: f64,
    pub max_open: usize,
    /// Multiplied into `(` when more than `max_open` pairs are open.
    pub open_discourage: f64,
    /// Multiplied into `)` after a `.`.
    pub hairpin_weight: f64,
    pub min_hairpin: usize,
    pub internal_loop_run: usize,
    pub internal_loop_bias: f64,
    pub internal_loop_target: LoopBiasTarget,
    /// Multiplied into `.` right after `.(`.
    pub isolated_pair_penalty: f64,
    /// Multiplied into `(` while the innermost open pair is the most recent one.
    pub multiloop_boost: f64,
    /// Chance of a `.` spacer between `)` and a following `(`.
    pub spacer_chance: f64,
    pub closing_loop: (usize, usize),
    pub end_internal_loop_chance: f64,
    pub end_internal_loop_boost: f64,
    /// Weights for inserting 1, 2 or 3 extra dots before a forced closure.
    pub end_weights: [f64; 3],
    pub trailing: bool,
    pub trailing_dot_chance: f64,
    pub trailing_range: (usize, usize),
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl BuilderConfig {
    /// The plain stem/loop generator.
    pub fn classic() -> Self {
        Self {
            lengthmin: 10,
            step_factor: 2,
            base_weights: Weights::new(0.3, 0.35, 0.25),
            weight_adjust: 0.4,
            stem_continue_boost: 1.8,
            branch_boost: 0.0,
            stop_prob: 0.5,
            max_open: 5,
            open_discourage: 0.2,
            hairpin_weight: 0.7,
            min_hairpin: 3,
            internal_loop_run: 3,
            internal_loop_bias: 1.0,
            internal_loop_target: LoopBiasTarget::Close,
            isolated_pair_penalty: 1.0,
            multiloop_boost: 1.0,
            spacer_chance: 0.0,
            closing_loop: (3, 5),
            end_internal_loop_chance: 0.0,
            end_internal_loop_boost: 2.0,
            end_weights: [0.5, 0.3, 0.2],
            trailing: false,
            trailing_dot_chance: 0.0,
            trailing_range: (1, 5),
        }
    }

    /// Branch-friendly shaping, meant to be combined with motif forcing.
    pub fn multiloop() -> Self {
        Self {
            lengthmin: 10,
            step_factor: 1,
            base_weights: Weights::new(0.35, 0.3, 0.25),
            weight_adjust: 0.4,
            stem_continue_boost: 1.8,
            branch_boost: 0.6,
            stop_prob: 0.5,
            max_open: 5,
            open_discourage: 0.2,
            hairpin_weight: 0.7,
            min_hairpin: 4,
            internal_loop_run: 2,
            internal_loop_bias: 0.5,
            internal_loop_target: LoopBiasTarget::Close,
            isolated_pair_penalty: 0.3,
            multiloop_boost: 1.5,
            spacer_chance: 0.9,
            closing_loop: (4, 7),
            end_internal_loop_chance: 0.3,
            end_internal_loop_boost: 2.0,
            end_weights: [0.5, 0.3, 0.2],
            trailing: true,
            trailing_dot_chance: 0.5,
            trailing_range: (1, 10),
        }
    }

    pub fn with_lengthmin(mut self, lengthmin: usize) -> Self {
        self.lengthmin = lengthmin;
        self
    }

    /// Iterations of the main loop, `None` on overflow.
    pub fn max_steps(&self) -> Option<usize> {
        self.step_factor.checked_mul(self.lengthmin)
    }

    /// Upper bound on the length of a generated structure. Each step emits
    /// at most a spacer and a symbol, and each opened pair is closed with
    /// at most `closing_loop.1` fill dots, 3 extension dots and a `)`.
    pub fn max_length(&self) -> Option<usize> {
        let per_step = self.closing_loop.1.checked_add(2 + 4)?;
        self.max_steps()?
            .checked_mul(per_step)?
            .checked_add(self.trailing_range.1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lengthmin == 0 {
            return Err(ConfigError::ZeroLength);
        }
        if self.step_factor == 0 {
            return Err(ConfigError::ZeroCount { name: "step_factor" });
        }
        if self.internal_loop_run == 0 {
            return Err(ConfigError::ZeroCount { name: "internal_loop_run" });
        }

        check_weight("base_weights['.']", self.base_weights.unpaired)?;
        check_weight("base_weights['(']", self.base_weights.open)?;
        check_weight("base_weights[')']", self.base_weights.close)?;
        check_weight("open_discourage", self.open_discourage)?;
        check_weight("hairpin_weight", self.hairpin_weight)?;
        check_weight("internal_loop_bias", self.internal_loop_bias)?;
        check_weight("isolated_pair_penalty", self.isolated_pair_penalty)?;
        check_weight("multiloop_boost", self.multiloop_boost)?;
        check_weight("end_internal_loop_boost", self.end_internal_loop_boost)?;
        for w in self.end_weights {
            check_weight("end_weights", w)?;
        }
        if self.end_weights.iter().all(|&w| w == 0.0) {
            return Err(ConfigError::ZeroEndWeights);
        }

        // Additive biases may be negative, the builder clamps the result.
        check_finite("weight_adjust", self.weight_adjust)?;
        check_finite("stem_continue_boost", self.stem_continue_boost)?;
        check_finite("branch_boost", self.branch_boost)?;

        check_probability("stop_prob", self.stop_prob)?;
        check_probability("spacer_chance", self.spacer_chance)?;
        check_probability("end_internal_loop_chance", self.end_internal_loop_chance)?;
        check_probability("trailing_dot_chance", self.trailing_dot_chance)?;

        check_range("closing_loop", self.closing_loop)?;
        check_range("trailing_range", self.trailing_range)?;
        if self.closing_loop.0 < self.min_hairpin {
            return Err(ConfigError::ClosingLoopTooSmall {
                closing: self.closing_loop.0,
                min_hairpin: self.min_hairpin,
            });
        }

        // Longer structures can never be represented and would fail forever.
        match self.max_length() {
            Some(len) if len < NAIDX::MAX as usize => Ok(()),
            _ => Err(ConfigError::TooLong {
                lengthmin: self.lengthmin,
                step_factor: self.step_factor,
                limit: NAIDX::MAX as usize,
            }),
        }
    }
}

/// What to do when a generation attempt fails inside the motif enforcer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and try again.
    #[default]
    Retry,
    /// Return the failure to the caller.
    Propagate,
}

/// Tunables of the motif enforcer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotifConfig {
    /// Only accept structures that contain `motif`.
    pub force: bool,
    pub motif: String,
    /// Symbol whose runs are collapsed before the motif check.
    pub collapse: Option<char>,
    /// `None` retries forever.
    pub max_attempts: Option<usize>,
    pub on_failure: FailurePolicy,
}

impl Default for MotifConfig {
    fn default() -> Self {
        Self {
            force: false,
            motif: String::from(")).(("),
            collapse: Some('.'),
            max_attempts: None,
            on_failure: FailurePolicy::Retry,
        }
    }
}

impl MotifConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motif.is_empty() {
            return Err(ConfigError::EmptyMotif);
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::ZeroCount { name: "max_attempts" });
        }
        Ok(())
    }
}

/// Full configuration: builder plus (optional) motif forcing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub builder: BuilderConfig,
    pub motif: MotifConfig,
}

impl GeneratorConfig {
    pub fn classic() -> Self {
        Self::default()
    }

    /// Branch-friendly builder that only accepts multiloop branch points.
    pub fn multiloop() -> Self {
        Self {
            builder: BuilderConfig::multiloop(),
            motif: MotifConfig {
                force: true,
                ..MotifConfig::default()
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.builder.validate()?;
        self.motif.validate()
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_weight(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight { name, value })
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

fn check_range(name: &'static str, (min, max): (usize, usize)) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange { name, min, max })
    }
}

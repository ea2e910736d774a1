//! The structure builder: a left-to-right stochastic dot-bracket emitter.
//!
//! Each step recomputes a weight vector over `.`, `(` and `)` from the base
//! weights and the local context (previous symbol, open pairs, loop sizes),
//! then draws one symbol. The main loop never closes a pair that would
//! enclose fewer than `min_hairpin` positions and never closes without an
//! open pair. Whatever is still open afterwards is resolved by the closing
//! pass, so every returned structure is balanced.

use log::debug;
use log::trace;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use ff_structure::DotBracket;
use ff_structure::DotBracketVec;
use ff_structure::PairTable;
use ff_structure::NAIDX;
use ff_structure::matching_open;

use crate::BuilderConfig;
use crate::ConfigError;
use crate::GenerationError;
use crate::Weights;
use crate::SYMBOLS;

use DotBracket::*;

/// Mutable state of one generation run.
#[derive(Debug, Default)]
struct GenState {
    seq: DotBracketVec,
    /// Positions of unmatched `(`.
    stack: Vec<usize>,
    /// Dots emitted by the main loop.
    dots: usize,
    /// Position of the most recently opened pair.
    marker: Option<usize>,
}

impl GenState {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            seq: DotBracketVec::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn last(&self) -> Option<DotBracket> {
        self.seq.last().copied()
    }

    /// Number of positions emitted since the innermost open pair.
    fn innermost_gap(&self) -> Option<usize> {
        self.stack.last().map(|&top| self.seq.len() - top - 1)
    }

    fn push_dots(&mut self, n: usize) {
        self.seq.extend(std::iter::repeat_n(Unpaired, n));
    }
}

/// A validated, reusable structure builder.
#[derive(Debug, Clone)]
pub struct StructureBuilder {
    config: BuilderConfig,
    max_steps: usize,
    end_extra: WeightedIndex<f64>,
}

impl StructureBuilder {
    pub fn new(config: BuilderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let max_steps = config.max_steps().ok_or(ConfigError::TooLong {
            lengthmin: config.lengthmin,
            step_factor: config.step_factor,
            limit: NAIDX::MAX as usize,
        })?;
        let end_extra = WeightedIndex::new(config.end_weights)
            .map_err(|_| ConfigError::ZeroEndWeights)?;
        Ok(Self { config, max_steps, end_extra })
    }

    /// Generate one structure.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<DotBracketVec, GenerationError> {
        let c = &self.config;
        let mut st = GenState::with_capacity(2 * self.max_steps);

        let mut steps = 0;
        for step in 0..self.max_steps {
            steps = step + 1;
            let weights = self.step_weights(&st)
                .normalized()
                .ok_or(GenerationError::DegenerateWeights { step })?;
            trace!("step {step}: {:?}", weights);

            let dist = WeightedIndex::new(weights.as_array())?;
            let symbol = SYMBOLS[dist.sample(rng)];
            self.emit(&mut st, symbol, rng);

            if st.stack.is_empty() && st.dots >= c.lengthmin && rng.random::<f64>() < c.stop_prob {
                break;
            }
        }
        let open_after_loop = st.stack.len();

        self.close_open_pairs(&mut st, rng);
        self.append_trailing(&mut st, rng);
        self.check(&st.seq)?;

        debug!("Generated structure of length {} ({} steps, {} pairs closed after the main loop).",
            st.seq.len(), steps, open_after_loop);
        Ok(st.seq)
    }

    /// Unnormalized weights for the next symbol.
    fn step_weights(&self, st: &GenState) -> Weights {
        let c = &self.config;
        let mut w = c.base_weights;

        // Repeat bias.
        match st.last() {
            Some(Unpaired) => w.unpaired += c.weight_adjust,
            Some(Open) => w.open += c.weight_adjust + c.stem_continue_boost,
            Some(Close) => {
                w.close += c.weight_adjust + c.stem_continue_boost;
                w.open += c.branch_boost;
            }
            None => (),
        }

        // Closing needs an open pair with a large enough loop.
        match st.innermost_gap() {
            None => w.close = 0.0,
            Some(gap) if gap < c.min_hairpin => w.close = 0.0,
            Some(_) => (),
        }

        if st.stack.len() > c.max_open {
            w.open *= c.open_discourage;
        }
        if st.last() == Some(Unpaired) {
            w.close *= c.hairpin_weight;
        }
        if self.in_internal_loop(st) {
            *w.get_mut(c.internal_loop_target.into()) *= c.internal_loop_bias;
        }
        if st.seq.ends_with(&[Unpaired, Open]) {
            w.unpaired *= c.isolated_pair_penalty;
        }
        if st.marker.is_some() && st.stack.last() == st.marker.as_ref() {
            w.open *= c.multiloop_boost;
        }
        w.clamped()
    }

    /// True if the structure ends in a qualifying run of dots that lies in
    /// the loop of the innermost open pair: either directly after its `(`,
    /// or after a closed stem nested inside it.
    fn in_internal_loop(&self, st: &GenState) -> bool {
        let Some(&top) = st.stack.last() else {
            return false;
        };
        let run = st.seq.iter().rev().take_while(|&&db| db == Unpaired).count();
        if run < self.config.internal_loop_run {
            return false;
        }
        let start = st.seq.len() - run;
        start == top + 1 || matching_open(&st.seq, start).is_some_and(|i| i > top)
    }

    fn emit<R: Rng + ?Sized>(&self, st: &mut GenState, symbol: DotBracket, rng: &mut R) {
        match symbol {
            Unpaired => {
                st.dots += 1;
                st.seq.push(Unpaired);
            }
            Open => {
                let spacer = self.config.spacer_chance;
                if st.last() == Some(Close) && spacer > 0.0 && rng.random_bool(spacer) {
                    st.dots += 1;
                    st.seq.push(Unpaired);
                }
                st.stack.push(st.seq.len());
                st.marker = Some(st.seq.len());
                st.seq.push(Open);
            }
            Close => {
                // Never empty, the weights forbid it.
                st.stack.pop();
                st.seq.push(Close);
            }
        }
    }

    /// Close every remaining open pair, innermost first.
    fn close_open_pairs<R: Rng + ?Sized>(&self, st: &mut GenState, rng: &mut R) {
        let c = &self.config;
        while let Some(open) = st.stack.pop() {
            let gap = st.seq.len() - open - 1;
            let trailing_dots = gap > 0 && st.last() == Some(Unpaired);

            let min_loop = rng.random_range(c.closing_loop.0..=c.closing_loop.1);
            if gap < min_loop {
                st.push_dots(min_loop - gap);
            }

            let mut chance = c.end_internal_loop_chance;
            if trailing_dots {
                chance = (chance * c.end_internal_loop_boost).min(1.0);
            }
            if chance > 0.0 && rng.random_bool(chance) {
                let extra = self.end_extra.sample(rng) + 1;
                trace!("Extending the loop closed at {open} by {extra}.");
                st.push_dots(extra);
            }
            st.seq.push(Close);
        }
    }

    fn append_trailing<R: Rng + ?Sized>(&self, st: &mut GenState, rng: &mut R) {
        let c = &self.config;
        if !c.trailing || c.trailing_dot_chance <= 0.0 {
            return;
        }
        if rng.random_bool(c.trailing_dot_chance) {
            let n = rng.random_range(c.trailing_range.0..=c.trailing_range.1);
            st.push_dots(n);
        }
    }

    /// The result must be balanced and respect the minimum hairpin size.
    fn check(&self, seq: &DotBracketVec) -> Result<(), GenerationError> {
        let pt = PairTable::try_from(seq)?;
        match pt.min_gap() {
            Some(gap) if gap < self.config.min_hairpin => Err(GenerationError::HairpinTooSmall {
                gap,
                min: self.config.min_hairpin,
            }),
            _ => Ok(()),
        }
    }
}

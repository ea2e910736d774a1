mod error;
mod dotbracket;
mod pair_table;
mod canonical;

pub use error::*;
pub use dotbracket::*;
pub use pair_table::*;
pub use canonical::*;


/// Nucleic Acid INdeX: we use `u16` (0 to 65k), which is plenty for the
/// structures we generate. A `PairTable` can hold at most `NAIDX::MAX - 1`
/// positions.
pub type NAIDX = u16;

//! PairTable: the validated, position-indexed view of a secondary structure.
//!
//! `pt[i] == Some(j)` iff `i` is paired with `j`. Construction fails for any
//! unbalanced structure, so holding a `PairTable` means the brackets match.

use std::ops::Deref;

use crate::DotBracket;
use crate::DotBracketVec;
use crate::StructureError;
use crate::NAIDX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTable(Vec<Option<NAIDX>>);

impl PairTable {
    /// The smallest number of positions enclosed by any pair. This is
    /// always a hairpin loop. `None` if there are no pairs.
    pub fn min_gap(&self) -> Option<usize> {
        self.0.iter()
            .enumerate()
            .filter_map(|(i, j)| match *j {
                Some(j) if (j as usize) > i => Some(j as usize - i - 1),
                _ => None,
            })
            .min()
    }
}

impl Deref for PairTable {
    type Target = [Option<NAIDX>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&[DotBracket]> for PairTable {
    type Error = StructureError;

    fn try_from(db: &[DotBracket]) -> Result<Self, Self::Error> {
        if db.len() >= NAIDX::MAX as usize {
            return Err(StructureError::TooLong(db.len()));
        }
        let mut table = vec![None; db.len()];
        let mut stack: Vec<usize> = Vec::new();
        for (j, symbol) in db.iter().enumerate() {
            match symbol {
                DotBracket::Open => stack.push(j),
                DotBracket::Close => {
                    let i = stack.pop().ok_or(StructureError::UnmatchedClose(j))?;
                    table[i] = Some(j as NAIDX);
                    table[j] = Some(i as NAIDX);
                }
                DotBracket::Unpaired => (),
            }
        }
        if let Some(&i) = stack.last() {
            return Err(StructureError::UnmatchedOpen(i));
        }
        Ok(PairTable(table))
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(dbv: &DotBracketVec) -> Result<Self, Self::Error> {
        PairTable::try_from(dbv.as_slice())
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PairTable::try_from(&DotBracketVec::try_from(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_table_from_str() {
        let pt = PairTable::try_from("((..))").unwrap();
        assert_eq!(pt.len(), 6);
        assert_eq!(pt[0], Some(5));
        assert_eq!(pt[1], Some(4));
        assert_eq!(pt[2], None);
        assert_eq!(pt[4], Some(1));
        assert_eq!(pt.min_gap(), Some(2));
    }

    #[test]
    fn test_pair_table_unbalanced() {
        assert_eq!(PairTable::try_from("(..))"), Err(StructureError::UnmatchedClose(4)));
        assert_eq!(PairTable::try_from(")(...)"), Err(StructureError::UnmatchedClose(0)));
        assert_eq!(PairTable::try_from("((...)"), Err(StructureError::UnmatchedOpen(0)));
        assert_eq!(PairTable::try_from("(.x.)"), Err(StructureError::InvalidToken('x', 2)));
    }

    #[test]
    fn test_min_gap() {
        let pt = PairTable::try_from("((...))..(....)").unwrap();
        assert_eq!(pt.min_gap(), Some(3));
        let pt = PairTable::try_from("(((......)))").unwrap();
        assert_eq!(pt.min_gap(), Some(6));
        let pt = PairTable::try_from("......").unwrap();
        assert_eq!(pt.min_gap(), None);
        let pt = PairTable::try_from("").unwrap();
        assert_eq!(pt.min_gap(), None);
    }
}

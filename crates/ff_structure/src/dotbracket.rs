//! Dot-bracket symbols and sequences of them.
//!
//! `DotBracket` is the per-position symbol, `DotBracketVec` a full structure.
//! Conversions from `&str` only check the alphabet: a `DotBracketVec` may be
//! unbalanced (e.g. a structure under construction). Use `PairTable` to
//! validate the bracket structure.

use std::fmt;
use std::ops::Deref;
use std::ops::DerefMut;

use crate::StructureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DotBracket {
    Unpaired,
    Open,
    Close,
}

impl TryFrom<char> for DotBracket {
    type Error = StructureError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(DotBracket::Unpaired),
            '(' => Ok(DotBracket::Open),
            ')' => Ok(DotBracket::Close),
            _ => Err(StructureError::InvalidToken(c, 0)),
        }
    }
}

impl From<DotBracket> for char {
    fn from(db: DotBracket) -> Self {
        match db {
            DotBracket::Unpaired => '.',
            DotBracket::Open => '(',
            DotBracket::Close => ')',
        }
    }
}

impl fmt::Display for DotBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// A secondary structure as a vector of dot-bracket symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DotBracketVec(pub Vec<DotBracket>);

impl DotBracketVec {
    pub fn with_capacity(capacity: usize) -> Self {
        DotBracketVec(Vec::with_capacity(capacity))
    }

    /// Position of the `(` that closes the last stem before `pos`.
    ///
    /// See [`matching_open`].
    pub fn matching_open(&self, pos: usize) -> Option<usize> {
        matching_open(&self.0, pos)
    }
}

impl Deref for DotBracketVec {
    type Target = Vec<DotBracket>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DotBracketVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl TryFrom<&str> for DotBracketVec {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.chars()
            .enumerate()
            .map(|(i, c)| {
                DotBracket::try_from(c).map_err(|_| StructureError::InvalidToken(c, i))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(DotBracketVec)
    }
}

impl fmt::Display for DotBracketVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &db in &self.0 {
            write!(f, "{}", char::from(db))?;
        }
        Ok(())
    }
}

/// Scan backwards from `pos - 1` and return the `(` matching the first `)`
/// encountered, i.e. the opener of the most recently closed stem before
/// `pos`. `pos` is clamped to the structure length.
///
/// Openers that are still unmatched at the point where they are scanned
/// (depth 0) are skipped. Returns `None` if no `)` precedes `pos` or if its
/// opener is missing.
///
/// ```
/// use ff_structure::DotBracketVec;
/// let dbv = DotBracketVec::try_from("..((..)...)").unwrap();
/// assert_eq!(dbv.matching_open(11), Some(2));
/// ```
pub fn matching_open(db: &[DotBracket], pos: usize) -> Option<usize> {
    let mut depth: usize = 0;
    for k in (0..pos.min(db.len())).rev() {
        match db[k] {
            DotBracket::Close => depth += 1,
            DotBracket::Open => {
                if depth == 0 {
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    return Some(k);
                }
            }
            DotBracket::Unpaired => (),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotbracket_roundtrip_str() {
        let s = "..((..)...)";
        let dbv = DotBracketVec::try_from(s).unwrap();
        assert_eq!(dbv.len(), 11);
        assert_eq!(dbv[2], DotBracket::Open);
        assert_eq!(dbv[6], DotBracket::Close);
        assert_eq!(dbv.to_string(), s);
    }

    #[test]
    fn test_invalid_token() {
        let err = DotBracketVec::try_from("((.x))").unwrap_err();
        assert_eq!(err, StructureError::InvalidToken('x', 3));
    }

    #[test]
    fn test_matching_open_outer_pair() {
        let dbv = DotBracketVec::try_from(".((..))").unwrap();
        assert_eq!(dbv.matching_open(7), Some(1));
        let dbv = DotBracketVec::try_from("((..))").unwrap();
        assert_eq!(dbv.matching_open(6), Some(0));
    }

    #[test]
    fn test_matching_open_clamps_position() {
        let dbv = DotBracketVec::try_from("..((..)...)").unwrap();
        assert_eq!(dbv.matching_open(11), Some(2));
        assert_eq!(dbv.matching_open(12), Some(2));
        assert_eq!(dbv.matching_open(100), Some(2));
    }

    #[test]
    fn test_matching_open_inner_stem() {
        let dbv = DotBracketVec::try_from("..((..)...)").unwrap();
        // Only the inner stem is closed before position 10.
        assert_eq!(dbv.matching_open(10), Some(3));
        assert_eq!(dbv.matching_open(7), Some(3));
        let dbv = DotBracketVec::try_from("((...)(...)..").unwrap();
        assert_eq!(dbv.matching_open(13), Some(6));
        assert_eq!(dbv.matching_open(6), Some(1));
    }

    #[test]
    fn test_matching_open_none() {
        let dbv = DotBracketVec::try_from("((....").unwrap();
        assert_eq!(dbv.matching_open(6), None);
        let dbv = DotBracketVec::try_from("....").unwrap();
        assert_eq!(dbv.matching_open(4), None);
        let dbv = DotBracketVec::try_from("(...)").unwrap();
        assert_eq!(dbv.matching_open(0), None);
        assert_eq!(matching_open(&[], 3), None);
    }
}

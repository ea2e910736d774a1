//! Canonical forms of dot-bracket strings.
//!
//! Collapsing runs of a symbol removes loop-length noise, so that two
//! structures with the same topology but different loop sizes compare equal.

/// Collapse every maximal run of `symbol` in `structure` down to a single
/// occurrence. Other characters are left untouched.
///
/// ```
/// use ff_structure::collapse_runs;
/// assert_eq!(collapse_runs("((...))...((..))", '.'), "((.)).((.))");
/// ```
pub fn collapse_runs(structure: &str, symbol: char) -> String {
    let mut out = String::with_capacity(structure.len());
    let mut last: Option<char> = None;
    for c in structure.chars() {
        if c == symbol && last == Some(symbol) {
            continue;
        }
        out.push(c);
        last = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_dots() {
        assert_eq!(collapse_runs("..((....))..", '.'), ".((.)).");
        assert_eq!(collapse_runs("(((...)))", '('), "(...)))");
        assert_eq!(collapse_runs("", '.'), "");
        assert_eq!(collapse_runs(".", '.'), ".");
    }

    #[test]
    fn test_collapse_idempotent() {
        for s in ["((...))..((....))", "....", "(.(..).)", "", "((((....))))...."] {
            let once = collapse_runs(s, '.');
            assert_eq!(collapse_runs(&once, '.'), once);
        }
    }

    #[test]
    fn test_collapse_exposes_branch_point() {
        let s = "((...)).....((....))";
        assert!(!s.contains(")).(("));
        assert!(collapse_runs(s, '.').contains(")).(("));
    }
}

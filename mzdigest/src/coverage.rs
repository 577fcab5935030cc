use itertools::Itertools;

/// Find the first occurrence of `needle` in `haystack` that starts at or after `start`.
fn find_from(haystack: &[char], needle: &[char], start: usize) -> Option<usize> {
    if needle.is_empty() || start >= haystack.len() {
        return None;
    }
    haystack[start..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| start + offset)
}

/// Mark every residue of the sequence that is part of at least one occurrence of at least one of the
/// peptides. All occurrences are found, also when they overlap with each other, so `AA` marks all of `AAAA`.
/// Peptides that do not occur in the sequence, and empty peptides, do not mark anything.
///
/// ```rust
/// # use mzdigest::covered_positions;
/// assert_eq!(
///     covered_positions("MKVLAT", &["KV"]),
///     vec![false, true, true, false, false, false]
/// );
/// ```
pub fn covered_positions(sequence: &str, peptides: &[impl AsRef<str>]) -> Vec<bool> {
    let residues = sequence.chars().collect_vec();
    let mut covered = vec![false; residues.len()];
    for peptide in peptides {
        let peptide = peptide.as_ref().chars().collect_vec();
        let mut start = 0;
        while let Some(index) = find_from(&residues, &peptide, start) {
            covered[index..index + peptide.len()].fill(true);
            start = index + 1;
        }
    }
    covered
}

/// Calculate the sequence coverage of a protein by the given peptides, as a percentage in `0.0..=100.0`. If
/// either the sequence or the list of peptides is empty the coverage is 0. Positions are counted in
/// residues, positions covered by multiple peptides or multiple occurrences of a peptide are counted once.
///
/// ```rust
/// # use mzdigest::compute_coverage;
/// assert_eq!(compute_coverage("MKVLATGG", &["MKV"]), 37.5);
/// assert_eq!(compute_coverage("AAAA", &["AA"]), 100.0);
/// ```
pub fn compute_coverage(sequence: &str, peptides: &[impl AsRef<str>]) -> f64 {
    if sequence.is_empty() || peptides.is_empty() {
        return 0.0;
    }
    let covered = covered_positions(sequence, peptides);
    covered.iter().filter(|c| **c).count() as f64 / covered.len() as f64 * 100.0
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use crate::{digest::digest_collection, protease::Enzyme};

    use super::*;

    const NO_PEPTIDES: &[&str] = &[];

    #[test]
    fn empty_input() {
        assert_eq!(compute_coverage("", &["MKV"]), 0.0);
        assert_eq!(compute_coverage("", NO_PEPTIDES), 0.0);
        assert_eq!(compute_coverage("MKVLAT", NO_PEPTIDES), 0.0);
        assert!(covered_positions("", &["A"]).is_empty());
    }

    #[test]
    fn full_coverage() {
        for sequence in ["A", "MKVLAT", "KKKKRRRRPPPP", "ÅKαRΩ"] {
            assert_eq!(compute_coverage(sequence, &[sequence]), 100.0, "{sequence}");
        }
        assert_eq!(compute_coverage("MKVLAT", &["MKV", "LAT"]), 100.0);
    }

    #[test]
    fn partial_coverage() {
        assert_eq!(compute_coverage("MKVLATGG", &["MKV"]), 37.5);
        assert_eq!(compute_coverage("MKVLATGG", &["MKV", "MKV"]), 37.5);
        assert_eq!(compute_coverage("MKVLATGG", &["KVL", "MKV"]), 50.0);
        assert_eq!(compute_coverage("ÅKαRΩ", &["αR"]), 40.0);
    }

    #[test]
    fn overlapping_occurrences() {
        assert_eq!(compute_coverage("AAAA", &["AA"]), 100.0);
        assert_eq!(compute_coverage("AAAAB", &["AAA"]), 80.0);
        assert_eq!(
            covered_positions("ABABAB", &["BAB"]),
            vec![false, true, true, true, true, true]
        );
    }

    #[test]
    fn repeated_occurrences() {
        assert_eq!(compute_coverage("GKGGKG", &["K"]), 2.0 / 6.0 * 100.0);
        assert_eq!(
            covered_positions("GKGGKG", &["GK"]),
            vec![true, true, false, true, true, false]
        );
    }

    #[test]
    fn absent_and_empty_peptides() {
        assert_eq!(compute_coverage("MKVLAT", &["WWW"]), 0.0);
        assert_eq!(compute_coverage("MKVLAT", &[""]), 0.0);
        assert_eq!(compute_coverage("MKV", &["MKVL"]), 0.0);
        assert_eq!(compute_coverage("MKVLAT", &["", "LAT"]), 50.0);
    }

    #[test]
    fn bounded() {
        let sequence = "MKWVTFISLLLLFSSAYSRGVFRRDTHKSEIAHRFKDLGEEHFKGLVLIAFSQYLQQCPFDEHVKLVNELTEFAK";
        for enzyme in Enzyme::ALL {
            for (min, max) in [(1, 100), (5, 30), (7, 8)] {
                let digested = digest_collection([("P", sequence)], *enzyme, min, max);
                let coverage = compute_coverage(sequence, digested["P"].peptides());
                assert!(
                    (0.0..=100.0).contains(&coverage),
                    "Coverage {coverage} out of bounds for {enzyme}"
                );
            }
            let digested = digest_collection([("P", sequence)], *enzyme, 1, 100);
            assert_eq!(
                compute_coverage(sequence, digested["P"].peptides()),
                100.0,
                "All peptides of {enzyme} together should cover the full sequence"
            );
        }
    }
}

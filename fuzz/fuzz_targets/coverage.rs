//! Fuzz target for the sequence coverage
use afl::*;
use mzdigest::compute_coverage;

fn main() {
    fuzz!(|data: &[u8]| {
        if let Ok(text) = std::str::from_utf8(data)
            && let Some((sequence, peptides)) = text.split_once('\n')
        {
            let peptides = peptides.lines().collect::<Vec<_>>();
            let coverage = compute_coverage(sequence, &peptides);
            assert!((0.0..=100.0).contains(&coverage));
            if !sequence.is_empty() {
                assert!((compute_coverage(sequence, &[sequence]) - 100.0).abs() < f64::EPSILON);
            }
        }
    });
}

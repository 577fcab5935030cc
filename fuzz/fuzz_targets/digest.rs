//! Fuzz target for digesting protein sequences
use afl::*;
use mzdigest::{Enzyme, digest_collection, digest_single};

fn main() {
    fuzz!(|data: &[u8]| {
        if let Some((&bounds, rest)) = data.split_first()
            && let Ok(sequence) = std::str::from_utf8(rest)
        {
            let (min, max) = ((bounds & 0x0f) as usize, (bounds >> 4) as usize);
            for enzyme in Enzyme::ALL {
                // The split should never lose or duplicate residues
                let (peptides, _) = digest_single(sequence, *enzyme);
                assert_eq!(peptides.concat(), sequence);

                // The order of the length bounds should not matter
                assert_eq!(
                    digest_collection([(0, sequence)], *enzyme, min, max),
                    digest_collection([(0, sequence)], *enzyme, max, min)
                );
            }
        }
    });
}

#![doc = include_str!("../README.md")]

/// Calculate the sequence coverage of a protein by a set of peptides.
pub mod coverage;
/// Split protein sequences into peptides and filter them by length.
pub mod digest;
/// The registry of enzymes and the cleavage rules they apply.
pub mod protease;

pub use coverage::{compute_coverage, covered_positions};
pub use digest::{
    DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH, DigestionOutcome, DigestionResult, LengthRange,
    Strictness, checked_digest_collection, digest_collection, digest_single,
    digest_with_missed_cleavages, fragment_peptide,
};
#[cfg(feature = "rayon")]
pub use digest::par_digest_collection;
pub use protease::{CleavageRule, Enzyme, Residues, known_cleavage_rules};

/// A subset of the types and functions that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::coverage::compute_coverage;
    pub use crate::digest::{DigestionResult, digest_collection, digest_single};
    pub use crate::protease::{CleavageRule, Enzyme};
}

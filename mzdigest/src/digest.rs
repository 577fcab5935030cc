use std::{
    fmt::Display,
    hash::Hash,
    ops::{Bound, RangeBounds},
};

use context_error::*;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::protease::CleavageRule;

/// The default minimal peptide length for [`digest_collection`]
pub const DEFAULT_MIN_LENGTH: usize = 5;
/// The default maximal peptide length for [`digest_collection`]
pub const DEFAULT_MAX_LENGTH: usize = 30;

/// The result of a checked digestion, contains the result and a list of warnings if it succeeded and only a
/// list of errors if it failed.
pub type DigestionOutcome<T> =
    Result<(T, Vec<BoxedError<'static, BasicKind>>), Vec<BoxedError<'static, BasicKind>>>;

/// Build the diagnostic line that accompanies a list of peptides.
fn diagnostic(count: usize) -> String {
    format!("Nr. of digested peptides: {count}")
}

/// The peptides of a single digested protein together with a human readable count. When deserialised only
/// the peptides are read, the diagnostic is always rebuilt from them.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "StoredDigestionResult")]
pub struct DigestionResult {
    peptides: Vec<String>,
    diagnostic: String,
}

impl DigestionResult {
    fn new(peptides: Vec<String>) -> Self {
        let diagnostic = diagnostic(peptides.len());
        Self {
            peptides,
            diagnostic,
        }
    }

    /// The peptides that passed the length filter, in the order they appear in the protein
    pub fn peptides(&self) -> &[String] {
        &self.peptides
    }

    /// The diagnostic line, `Nr. of digested peptides: {count}`
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }

    /// The number of peptides
    pub fn len(&self) -> usize {
        self.peptides.len()
    }

    /// Check if no peptides passed the filter
    pub fn is_empty(&self) -> bool {
        self.peptides.is_empty()
    }

    /// Get the peptides and diagnostic line
    pub fn into_parts(self) -> (Vec<String>, String) {
        (self.peptides, self.diagnostic)
    }
}

#[derive(Deserialize)]
struct StoredDigestionResult {
    peptides: Vec<String>,
}

impl From<StoredDigestionResult> for DigestionResult {
    fn from(value: StoredDigestionResult) -> Self {
        Self::new(value.peptides)
    }
}

impl Display for DigestionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.diagnostic)
    }
}

/// An inclusive peptide length range. The bounds are normalised on creation so the lower bound is
/// never bigger than the upper bound, if they had to be swapped this is remembered. Deserialising goes
/// through [`LengthRange::new`] with the stored `min` and `max`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "StoredLengthRange")]
pub struct LengthRange {
    min: usize,
    max: usize,
    swapped: bool,
}

impl LengthRange {
    /// Create a new range, swapping the bounds if `lower > upper`.
    pub const fn new(lower: usize, upper: usize) -> Self {
        if lower > upper {
            Self {
                min: upper,
                max: lower,
                swapped: true,
            }
        } else {
            Self {
                min: lower,
                max: upper,
                swapped: false,
            }
        }
    }

    /// The lower bound (inclusive)
    pub const fn min(&self) -> usize {
        self.min
    }

    /// The upper bound (inclusive)
    pub const fn max(&self) -> usize {
        self.max
    }

    /// If the bounds were given in the wrong order
    pub const fn was_swapped(&self) -> bool {
        self.swapped
    }

    /// Check if a peptide of the given length (in residues) is allowed
    pub const fn contains(&self, length: usize) -> bool {
        self.min <= length && length <= self.max
    }
}

#[derive(Deserialize)]
struct StoredLengthRange {
    min: usize,
    max: usize,
}

impl From<StoredLengthRange> for LengthRange {
    fn from(value: StoredLengthRange) -> Self {
        Self::new(value.min, value.max)
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH, DEFAULT_MAX_LENGTH)
    }
}

impl RangeBounds<usize> for LengthRange {
    fn start_bound(&self) -> Bound<&usize> {
        Bound::Included(&self.min)
    }
    fn end_bound(&self) -> Bound<&usize> {
        Bound::Included(&self.max)
    }
}

/// Set the strictness of [`checked_digest_collection`]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Strictness {
    /// Corrected inputs are reported as warnings next to the result
    #[default]
    Lenient,
    /// Corrected inputs are reported as errors and no result is given
    Strict,
}

/// The boundaries (as character positions) of all pieces of the split, including the start and end of the
/// sequence. A cut site at the start or end results in a duplicated boundary and so an empty piece.
fn split_boundaries(residues: &[char], rule: &CleavageRule) -> Vec<usize> {
    let mut boundaries = vec![0];
    boundaries.extend(rule.match_locations(residues));
    boundaries.push(residues.len());
    boundaries
}

/// The byte offset of every character position in `0..=sequence.chars().count()`
fn byte_offsets(sequence: &str) -> Vec<usize> {
    sequence
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(sequence.len()))
        .collect_vec()
}

/// Split the sequence at all cut sites of the rule, without any filtering.
fn split<'a>(sequence: &'a str, rule: &CleavageRule) -> Vec<&'a str> {
    let residues = sequence.chars().collect_vec();
    let offsets = byte_offsets(sequence);
    split_boundaries(&residues, rule)
        .into_iter()
        .tuple_windows()
        .map(|(start, end)| &sequence[offsets[start]..offsets[end]])
        .collect_vec()
}

/// Digest a single sequence, giving all pieces of the split without any length filter. Concatenating the
/// peptides in order gives back the original sequence. The diagnostic line counts all returned peptides.
///
/// ```rust
/// # use mzdigest::{Enzyme, digest_single};
/// let (peptides, diagnostic) = digest_single("MKVLRPAKW", Enzyme::Trypsin);
/// assert_eq!(peptides, vec!["MK", "VLRPAK", "W"]);
/// assert_eq!(diagnostic, "Nr. of digested peptides: 3");
/// ```
pub fn digest_single(sequence: &str, rule: impl AsRef<CleavageRule>) -> (Vec<&str>, String) {
    let peptides = split(sequence, rule.as_ref());
    let diagnostic = diagnostic(peptides.len());
    (peptides, diagnostic)
}

/// Digest a single protein and apply the length filter.
fn digest_protein(sequence: &str, rule: &CleavageRule, range: LengthRange) -> DigestionResult {
    if sequence.is_empty() {
        return DigestionResult::new(Vec::new());
    }
    DigestionResult::new(
        split(sequence, rule)
            .into_iter()
            .filter(|peptide| range.contains(peptide.chars().count()))
            .map(ToString::to_string)
            .collect_vec(),
    )
}

/// Digest a collection of proteins, only keeping peptides with a length (in residues) in `min_length..=max_length`.
/// If the bounds are given in the wrong order they are swapped. Empty sequences result in no peptides. The
/// result contains every protein identifier from the input, in the order of the input.
///
/// ```rust
/// # use mzdigest::{Enzyme, digest_collection};
/// let digested = digest_collection([("P1", "MKVLATGGKRSSAR"), ("P2", "")], Enzyme::LysC, 5, 30);
/// assert_eq!(digested["P1"].peptides(), ["VLATGGK", "RSSAR"]);
/// assert_eq!(digested["P2"].diagnostic(), "Nr. of digested peptides: 0");
/// ```
pub fn digest_collection<Id, Seq>(
    protein_map: impl IntoIterator<Item = (Id, Seq)>,
    rule: impl AsRef<CleavageRule>,
    min_length: usize,
    max_length: usize,
) -> IndexMap<Id, DigestionResult>
where
    Id: Hash + Eq,
    Seq: AsRef<str>,
{
    let range = LengthRange::new(min_length, max_length);
    let rule = rule.as_ref();
    protein_map
        .into_iter()
        .map(|(id, sequence)| {
            let result = digest_protein(sequence.as_ref(), rule, range);
            (id, result)
        })
        .collect()
}

/// Digest a collection of proteins in parallel, see [`digest_collection`]. If the input is an indexed parallel
/// iterator (like a `Vec` or slice) the order of the result is identical to the sequential version.
#[cfg(feature = "rayon")]
pub fn par_digest_collection<Id, Seq>(
    protein_map: impl rayon::iter::IntoParallelIterator<Item = (Id, Seq)>,
    rule: impl AsRef<CleavageRule> + Sync,
    min_length: usize,
    max_length: usize,
) -> IndexMap<Id, DigestionResult>
where
    Id: Hash + Eq + Send,
    Seq: AsRef<str> + Send,
{
    use rayon::prelude::*;

    let range = LengthRange::new(min_length, max_length);
    let rule = rule.as_ref();
    protein_map
        .into_par_iter()
        .map(|(id, sequence)| {
            let result = digest_protein(sequence.as_ref(), rule, range);
            (id, result)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Digest a collection of proteins exactly like [`digest_collection`], but report all corrections that were
/// needed. Swapped length bounds and empty sequences are reported as warnings with [`Strictness::Lenient`],
/// and as errors (without any result) with [`Strictness::Strict`].
///
/// # Errors
/// With [`Strictness::Strict`] if the length bounds had to be swapped or any of the sequences is empty.
pub fn checked_digest_collection<Id, Seq>(
    protein_map: impl IntoIterator<Item = (Id, Seq)>,
    rule: impl AsRef<CleavageRule>,
    min_length: usize,
    max_length: usize,
    strictness: Strictness,
) -> DigestionOutcome<IndexMap<Id, DigestionResult>>
where
    Id: Hash + Eq + Display,
    Seq: AsRef<str>,
{
    let kind = match strictness {
        Strictness::Lenient => BasicKind::Warning,
        Strictness::Strict => BasicKind::Error,
    };
    let range = LengthRange::new(min_length, max_length);
    let rule = rule.as_ref();
    let mut reports = Vec::new();

    if range.was_swapped() {
        reports.push(BoxedError::new(
            kind,
            "Swapped length bounds",
            format!(
                "The minimal peptide length ({min_length}) is bigger than the maximal peptide length ({max_length}), the range {}..={} is used instead",
                range.min(),
                range.max()
            ),
            Context::none(),
        ));
    }

    let mut digested = IndexMap::new();
    for (id, sequence) in protein_map {
        let sequence = sequence.as_ref();
        if sequence.is_empty() {
            reports.push(BoxedError::new(
                kind,
                "Empty protein sequence",
                "This protein has an empty sequence, so no peptides are generated",
                Context::default().source(id.to_string()),
            ));
        }
        let result = digest_protein(sequence, rule, range);
        digested.insert(id, result);
    }

    match strictness {
        Strictness::Strict if !reports.is_empty() => Err(reports),
        _ => Ok((digested, reports)),
    }
}

/// Digest a sequence while allowing missed cleavages. Every peptide spanning 1 up to and including
/// `max_missed_cleavages + 1` consecutive pieces of the split is generated, if its length (in residues) is
/// contained in `size_range`. The peptides are ordered by start and then by end position. The empty pieces
/// caused by cut sites at the very start or end of the sequence are not counted as pieces, so every span is
/// generated only once.
///
/// ```rust
/// # use mzdigest::{Enzyme, digest_with_missed_cleavages};
/// let peptides = digest_with_missed_cleavages("AARKFGKPLM", Enzyme::Trypsin, 1, 1..);
/// assert_eq!(peptides, vec!["AAR", "AARK", "K", "KFGKPLM", "FGKPLM"]);
/// ```
pub fn digest_with_missed_cleavages(
    sequence: &str,
    rule: impl AsRef<CleavageRule>,
    max_missed_cleavages: usize,
    size_range: impl RangeBounds<usize>,
) -> Vec<&str> {
    let residues = sequence.chars().collect_vec();
    let offsets = byte_offsets(sequence);
    let mut sites = split_boundaries(&residues, rule.as_ref());
    // A terminal cut site would otherwise give the same span twice
    sites.dedup();

    let mut result = Vec::new();
    for (index, start) in sites.iter().enumerate() {
        for end in sites
            .iter()
            .skip(index + 1)
            .take(max_missed_cleavages.saturating_add(1))
        {
            if size_range.contains(&(end - start)) {
                result.push(&sequence[offsets[*start]..offsets[*end]]);
            }
        }
    }
    result
}

/// Generate the fragments of a peptide: all b ions (N terminal prefixes) from short to long followed by all y
/// ions (C terminal suffixes) from long to short. Both contain every length from 1 up to but excluding the
/// length of the peptide, so a peptide of one residue or less has no fragments.
///
/// ```rust
/// # use mzdigest::fragment_peptide;
/// assert_eq!(fragment_peptide("PEPK"), vec!["P", "PE", "PEP", "EPK", "PK", "K"]);
/// ```
pub fn fragment_peptide(peptide: &str) -> Vec<&str> {
    let offsets = byte_offsets(peptide);
    let inner = offsets
        .get(1..offsets.len().saturating_sub(1))
        .unwrap_or_default();
    inner
        .iter()
        .map(|offset| &peptide[..*offset])
        .chain(inner.iter().map(|offset| &peptide[*offset..]))
        .collect()
}

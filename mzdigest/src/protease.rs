use std::{fmt::Display, str::FromStr};

use context_error::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A set of residues that a single position next to a cut site has to satisfy.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Residues {
    /// The residue has to be present and one of the given residues.
    AnyOf(&'static [char]),
    /// The residue has to be absent (sequence terminus) or anything except the given residues.
    NoneOf(&'static [char]),
}

impl Residues {
    /// Check if the residue (or the absence of one) fulfills this set.
    pub fn accepts(self, residue: Option<char>) -> bool {
        match self {
            Self::AnyOf(set) => residue.is_some_and(|r| set.contains(&r)),
            Self::NoneOf(set) => residue.is_none_or(|r| !set.contains(&r)),
        }
    }
}

/// A cleavage rule defined by the residue directly n terminal and the residue directly c terminal of the
/// cut site. A none means that there is no specificity at that side. The rule is purely positional, it
/// marks boundaries in between residues and never consumes any residue.
///
/// A boundary is identified by its index in `0..=len`, boundary `b` sits in between residue `b - 1` and
/// residue `b`. So rules with a negative c terminal specificity (like trypsin) also cut at the very end of
/// a sequence, and rules without n terminal specificity (like LysN) can cut at the very start.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CleavageRule {
    /// The residue n terminal of the cut site.
    pub before: Option<Residues>,
    /// The residue c terminal of the cut site.
    pub after: Option<Residues>,
}

impl CleavageRule {
    /// Define a rule that cuts exactly between the two specified sets.
    pub const fn new(before: Residues, after: Residues) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }

    /// Define a rule that cuts on the c terminal side of the provided residues.
    pub const fn c_terminal_of(residues: &'static [char]) -> Self {
        Self {
            before: Some(Residues::AnyOf(residues)),
            after: None,
        }
    }

    /// Define a rule that cuts on the n terminal side of the provided residues.
    pub const fn n_terminal_of(residues: &'static [char]) -> Self {
        Self {
            before: None,
            after: Some(Residues::AnyOf(residues)),
        }
    }

    /// Check if the boundary at `position` (in `0..=residues.len()`) is a cut site.
    pub fn is_cut_site(&self, residues: &[char], position: usize) -> bool {
        if position > residues.len() {
            return false;
        }
        let before = position.checked_sub(1).and_then(|i| residues.get(i)).copied();
        let after = residues.get(position).copied();
        self.before.is_none_or(|r| r.accepts(before))
            && self.after.is_none_or(|r| r.accepts(after))
    }

    /// All boundaries in the given residues where this rule cuts, in ascending order. These are character
    /// positions, including the start (0) and end (`residues.len()`) of the sequence if the rule matches there.
    pub fn match_locations(&self, residues: &[char]) -> Vec<usize> {
        (0..=residues.len())
            .filter(|position| self.is_cut_site(residues, *position))
            .collect_vec()
    }
}

impl AsRef<Self> for CleavageRule {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// The rules for all enzymes in the registry, see [`Enzyme`] for lookups by name.
pub mod known_cleavage_rules {
    use super::{CleavageRule, Residues};

    /// `LysC` cuts after Lysine (K)
    pub static LYSC: CleavageRule = CleavageRule::c_terminal_of(&['K']);

    /// `LysN` cuts before Lysine (K)
    pub static LYSN: CleavageRule = CleavageRule::n_terminal_of(&['K']);

    /// `ArgC` cuts after Arginine (R)
    pub static ARGC: CleavageRule = CleavageRule::c_terminal_of(&['R']);

    /// `Trypsin` cuts after Lysine (K) or Arginine (R), unless followed by Proline (P)
    pub static TRYPSIN: CleavageRule =
        CleavageRule::new(Residues::AnyOf(&['K', 'R']), Residues::NoneOf(&['P']));
}

/// The registry of supported proteolytic enzymes.
///
/// ```rust
/// # use mzdigest::Enzyme;
/// let trypsin: Enzyme = "Trypsin".parse().unwrap();
/// assert_eq!(trypsin.cut_sites("AKPKRA"), vec![4, 5]);
/// assert!("Pepsin".parse::<Enzyme>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Enzyme {
    /// Cuts after every K
    LysC,
    /// Cuts before every K
    LysN,
    /// Cuts after every R
    ArgC,
    /// Cuts after every K or R, unless followed by P
    Trypsin,
}

impl Enzyme {
    /// All registered enzymes
    pub const ALL: &'static [Self] = &[Self::LysC, Self::LysN, Self::ArgC, Self::Trypsin];

    /// The name under which this enzyme is registered
    pub const fn name(self) -> &'static str {
        match self {
            Self::LysC => "LysC",
            Self::LysN => "LysN",
            Self::ArgC => "ArgC",
            Self::Trypsin => "Trypsin",
        }
    }

    /// The cleavage rule of this enzyme
    pub fn rule(self) -> &'static CleavageRule {
        match self {
            Self::LysC => &known_cleavage_rules::LYSC,
            Self::LysN => &known_cleavage_rules::LYSN,
            Self::ArgC => &known_cleavage_rules::ARGC,
            Self::Trypsin => &known_cleavage_rules::TRYPSIN,
        }
    }

    /// Check if the boundary at `position` in the given residues is a cut site for this enzyme.
    pub fn is_cut_site(self, residues: &[char], position: usize) -> bool {
        self.rule().is_cut_site(residues, position)
    }

    /// All character positions in the sequence where this enzyme cuts.
    pub fn cut_sites(self, sequence: &str) -> Vec<usize> {
        self.rule().match_locations(&sequence.chars().collect_vec())
    }
}

impl AsRef<CleavageRule> for Enzyme {
    fn as_ref(&self) -> &CleavageRule {
        self.rule()
    }
}

impl Display for Enzyme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Enzyme {
    type Err = BoxedError<'static, BasicKind>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|enzyme| enzyme.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                BoxedError::new(
                    BasicKind::Error,
                    "Unknown enzyme",
                    format!(
                        "The enzyme is not registered, use one of: {}",
                        Self::ALL.iter().map(|e| e.name()).join(", ")
                    ),
                    Context::line(None, s, 0, s.len()).to_owned(),
                )
            })
    }
}

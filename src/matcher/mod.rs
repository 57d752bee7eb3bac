//! Format-agnostic LZ match finding
//!
//! Encoders ask a [`MatchParser`] for the repetitions in their input and then
//! frame them in their own wire format. Parsers are configured with
//! [`MatchOptions`] describing what the target format can represent.

mod hash;
mod pattern;

pub use pattern::{HashChainParser, Matches};

use crate::{Result, RetroLzError};

/// A repetition discovered in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Offset of the first repeated byte in the source
    pub position: usize,
    /// Distance back to the earlier occurrence (at least 1)
    pub displacement: usize,
    /// Number of repeated bytes
    pub length: usize,
}

impl Match {
    /// Create a new match
    pub fn new(position: usize, displacement: usize, length: usize) -> Self {
        Self {
            position,
            displacement,
            length,
        }
    }

    /// First source offset after the match
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    /// Check this match against the parser contract before encoding it
    ///
    /// `cursor` is the first source offset not yet covered by earlier units.
    pub(crate) fn validate(
        &self,
        input: &[u8],
        cursor: usize,
        options: &MatchOptions,
    ) -> Result<()> {
        let reason = if self.position < cursor {
            Some("overlaps or precedes the previous unit")
        } else if self.displacement == 0 || self.displacement > self.position {
            Some("reaches before the start of the input")
        } else if self.end() > input.len() {
            Some("runs past the end of the input")
        } else if !options.accepts(self.length, self.displacement) {
            Some("outside the limits of the format")
        } else {
            let source = self.position - self.displacement;
            let repeats = (0..self.length)
                .all(|i| input[source + i] == input[self.position + i]);
            (!repeats).then_some("does not repeat earlier data")
        };

        match reason {
            Some(reason) => Err(RetroLzError::InvalidMatch {
                position: self.position,
                displacement: self.displacement,
                length: self.length,
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Extra per-format constraint on which (length, displacement) pairs are encodable
///
/// The rule must be monotone in length: if a pair is admitted, the same
/// displacement with a longer length (up to the maximum) must be too.
pub type AdmitFn = fn(length: usize, displacement: usize) -> bool;

/// Limits of a target format's back-references
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    /// Shortest match worth encoding (at least 2)
    pub min_length: usize,
    /// Longest match the format can describe
    pub max_length: usize,
    /// Smallest allowed displacement
    pub min_displacement: usize,
    /// Largest allowed displacement (window size)
    pub max_displacement: usize,
    /// Maximum candidates examined per position (`None` searches the whole window)
    pub max_chain: Option<usize>,
    /// Additional format rule
    pub admit: Option<AdmitFn>,
}

impl MatchOptions {
    /// Options for a window of `max_displacement` bytes and the given length range
    pub fn new(min_length: usize, max_length: usize, max_displacement: usize) -> Self {
        Self {
            min_length: min_length.max(2),
            max_length: max_length.max(min_length.max(2)),
            min_displacement: 1,
            max_displacement,
            max_chain: None,
            admit: None,
        }
    }

    /// Set the smallest allowed displacement
    pub fn with_min_displacement(mut self, min_displacement: usize) -> Self {
        self.min_displacement = min_displacement.max(1);
        self
    }

    /// Bound the number of candidates examined per position
    pub fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = Some(max_chain.max(1));
        self
    }

    /// Attach a format admissibility rule
    pub fn with_admit(mut self, admit: AdmitFn) -> Self {
        self.admit = Some(admit);
        self
    }

    /// Whether a match of this shape is representable
    pub fn accepts(&self, length: usize, displacement: usize) -> bool {
        length >= self.min_length
            && length <= self.max_length
            && displacement >= self.min_displacement
            && displacement <= self.max_displacement
            && self.admit.map_or(true, |admit| admit(length, displacement))
    }
}

/// Source of matches for an encoder
///
/// Implementations must yield matches ordered by strictly increasing
/// `position`, never overlapping (`next.position >= previous.end()`), each
/// with `displacement <= position` and `position + length <= input.len()`,
/// and each accepted by the options the encoder was built for. Encoders
/// reject matches that break these rules instead of emitting a
/// desynchronized stream. Uncovered bytes are encoded as literals.
pub trait MatchParser {
    /// Limits this parser honors
    fn options(&self) -> &MatchOptions;

    /// Scan `input` once, yielding its matches in order
    fn find_matches<'a>(&'a self, input: &'a [u8]) -> impl Iterator<Item = Match> + 'a;
}

//! Greedy longest-match parser
//!
//! At every position the parser walks the hash chain nearest-first, keeps the
//! longest acceptable match (the nearest one wins ties) and skips over it;
//! positions without an acceptable match are left to the encoder as literals.

use super::hash::HashChain;
use super::{Match, MatchOptions, MatchParser};

/// Hash-chain match parser
#[derive(Debug, Clone)]
pub struct HashChainParser {
    options: MatchOptions,
}

impl HashChainParser {
    /// Create a parser producing matches within `options`
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }
}

impl MatchParser for HashChainParser {
    fn options(&self) -> &MatchOptions {
        &self.options
    }

    fn find_matches<'a>(&'a self, input: &'a [u8]) -> impl Iterator<Item = Match> + 'a {
        Matches::new(input, &self.options)
    }
}

/// Lazy sequence of matches over one input
#[derive(Debug)]
pub struct Matches<'a> {
    input: &'a [u8],
    options: &'a MatchOptions,
    chain: HashChain,
    position: usize,
}

impl<'a> Matches<'a> {
    fn new(input: &'a [u8], options: &'a MatchOptions) -> Self {
        Self {
            input,
            options,
            chain: HashChain::new(options.max_displacement),
            position: 0,
        }
    }

    /// Longest acceptable match starting at `position`
    fn longest_at(&self, position: usize) -> Option<Match> {
        let options = self.options;
        let max_length = options.max_length.min(self.input.len() - position);
        if max_length < options.min_length {
            return None;
        }

        let limit = options.max_chain.unwrap_or(usize::MAX);
        let mut best: Option<Match> = None;
        for candidate in self
            .chain
            .candidates(self.input, position, options.max_displacement)
            .take(limit)
        {
            let displacement = position - candidate;
            if displacement < options.min_displacement {
                continue;
            }
            let length = common_length(self.input, candidate, position, max_length);
            if best.map_or(true, |best| length > best.length)
                && options.accepts(length, displacement)
            {
                best = Some(Match::new(position, displacement, length));
                if length == max_length {
                    break;
                }
            }
        }
        best
    }
}

impl Iterator for Matches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        while self.position < self.input.len() {
            let position = self.position;
            if let Some(found) = self.longest_at(position) {
                for covered in position..found.end() {
                    self.chain.insert(self.input, covered);
                }
                self.position = found.end();
                return Some(found);
            }
            self.chain.insert(self.input, position);
            self.position += 1;
        }
        None
    }
}

/// Length of the common run at `earlier` and `position`, capped at `max_length`
///
/// The runs may overlap; the comparison reads the source, which is exactly
/// what a decoder replaying the match byte by byte reproduces.
fn common_length(input: &[u8], earlier: usize, position: usize, max_length: usize) -> usize {
    input[position..position + max_length]
        .iter()
        .zip(&input[earlier..])
        .take_while(|(a, b)| a == b)
        .count()
}

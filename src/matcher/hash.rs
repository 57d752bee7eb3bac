//! Hash chains keyed on two-byte prefixes
//!
//! `head` maps every byte pair to its most recent position; `prev` links each
//! position to the previous one with the same pair. `prev` is a ring indexed
//! by `position % window`, so only links inside the current window survive.

const NO_POSITION: u32 = u32::MAX;

const PAIR_COUNT: usize = 1 << 16;

#[inline]
fn pair_key(input: &[u8], position: usize) -> usize {
    ((input[position] as usize) << 8) | input[position + 1] as usize
}

/// Chained index of byte-pair occurrences
#[derive(Debug, Clone)]
pub(crate) struct HashChain {
    head: Vec<u32>,
    prev: Vec<u32>,
}

impl HashChain {
    /// Index for displacements up to `window`
    pub(crate) fn new(window: usize) -> Self {
        Self {
            head: vec![NO_POSITION; PAIR_COUNT],
            prev: vec![NO_POSITION; window.max(1) + 1],
        }
    }

    fn window(&self) -> usize {
        self.prev.len()
    }

    /// Register the pair starting at `position`
    pub(crate) fn insert(&mut self, input: &[u8], position: usize) {
        if position + 1 >= input.len() {
            return;
        }
        let key = pair_key(input, position);
        let slot = position % self.window();
        self.prev[slot] = self.head[key];
        self.head[key] = position as u32;
    }

    /// Earlier positions sharing the pair at `position`, nearest first,
    /// no further back than `max_displacement`
    pub(crate) fn candidates<'a>(
        &'a self,
        input: &[u8],
        position: usize,
        max_displacement: usize,
    ) -> Candidates<'a> {
        let first = if position + 1 < input.len() {
            self.head[pair_key(input, position)]
        } else {
            NO_POSITION
        };
        Candidates {
            chain: self,
            next: first,
            position,
            min_position: position.saturating_sub(max_displacement),
        }
    }
}

/// Walk of one hash chain
#[derive(Debug)]
pub(crate) struct Candidates<'a> {
    chain: &'a HashChain,
    next: u32,
    position: usize,
    min_position: usize,
}

impl Iterator for Candidates<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next == NO_POSITION {
            return None;
        }
        let candidate = self.next as usize;
        if candidate >= self.position || candidate < self.min_position {
            self.next = NO_POSITION;
            return None;
        }
        let following = self.chain.prev[candidate % self.chain.window()];
        // links must strictly descend, anything else is a stale slot
        self.next = if following != NO_POSITION && (following as usize) < candidate {
            following
        } else {
            NO_POSITION
        };
        Some(candidate)
    }
}

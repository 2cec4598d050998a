//! Vote tally over reconstructed candidate secrets.
//!
//! Candidates are kept in first-occurrence order so ties resolve the same way
//! on every run, independent of hash iteration order.

use std::collections::HashMap;

use num_bigint::BigInt;

/// Winning entry of a [`Tally`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leader<'a> {
    pub secret: &'a BigInt,
    pub votes: u64,
    /// Another candidate reached the same count
    pub tied: bool,
}

/// Candidate secret -> number of subsets that produced it
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<(BigInt, u64)>,
    index: HashMap<BigInt, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more vote for `candidate`
    pub fn record(&mut self, candidate: BigInt) {
        match self.index.get(&candidate) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(candidate.clone(), self.entries.len());
                self.entries.push((candidate, 1));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct candidates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in first-occurrence order
    pub fn entries(&self) -> &[(BigInt, u64)] {
        &self.entries
    }

    /// Highest count; on a tie the earliest-seen candidate wins
    pub fn leader(&self) -> Option<Leader<'_>> {
        let mut best: Option<&(BigInt, u64)> = None;
        let mut tied = false;

        for entry in &self.entries {
            match best {
                Some(current) if entry.1 > current.1 => {
                    best = Some(entry);
                    tied = false;
                }
                Some(current) if entry.1 == current.1 => tied = true,
                Some(_) => {}
                None => best = Some(entry),
            }
        }

        best.map(|(secret, votes)| Leader {
            secret,
            votes: *votes,
            tied,
        })
    }
}

//! Lazy k-subset enumeration
//!
//! Walks the k-element index subsets of `0..n` in lexicographic order using
//! an explicit index stack, so nothing is materialised up front and the call
//! stack does not grow with `n`.

use num_bigint::BigInt;
use num_traits::One;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

/// Iterator over every k-subset of `0..n`, ascending within and across subsets
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    state: State,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            indices: Vec::with_capacity(k),
            state: State::Fresh,
        }
    }

    /// Restart the enumeration from the first subset
    pub fn reset(&mut self) {
        self.indices.clear();
        self.state = State::Fresh;
    }

    /// C(n, k), computed exactly
    pub fn total(&self) -> BigInt {
        binomial(self.n, self.k)
    }

    // Rightmost position that can still be incremented.
    fn advance(&mut self) -> bool {
        let (n, k) = (self.n, self.k);
        let Some(pos) = (0..k).rev().find(|&i| self.indices[i] < n - k + i) else {
            return false;
        };

        self.indices[pos] += 1;
        for j in pos + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => None,
            State::Fresh => {
                if self.k > self.n {
                    self.state = State::Done;
                    return None;
                }
                self.indices.clear();
                self.indices.extend(0..self.k);
                self.state = State::Running;
                Some(self.indices.clone())
            }
            State::Running => {
                if self.advance() {
                    Some(self.indices.clone())
                } else {
                    self.state = State::Done;
                    None
                }
            }
        }
    }
}

/// Binomial coefficient C(n, k); zero when `k > n`
pub fn binomial(n: usize, k: usize) -> BigInt {
    if k > n {
        return BigInt::from(0u8);
    }
    let k = k.min(n - k);
    // Each partial product is itself a binomial coefficient, so the division is exact.
    (0..k).fold(BigInt::one(), |acc, i| acc * BigInt::from(n - i) / BigInt::from(i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_order() {
        let all: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn test_count_matches_binomial() {
        for n in 0..9 {
            for k in 1..=n {
                let combos = Combinations::new(n, k);
                let expected = combos.total();
                assert_eq!(BigInt::from(combos.count()), expected, "C({n},{k})");
            }
        }
    }

    #[test]
    fn test_full_and_oversized() {
        assert_eq!(Combinations::new(3, 3).collect::<Vec<_>>(), vec![vec![0, 1, 2]]);
        assert_eq!(Combinations::new(2, 3).next(), None);
        assert_eq!(binomial(2, 3), BigInt::from(0));
    }

    #[test]
    fn test_reset_restarts() {
        let mut combos = Combinations::new(5, 3);
        let first: Vec<_> = combos.by_ref().collect();
        assert_eq!(combos.next(), None);

        combos.reset();
        let second: Vec<_> = combos.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut combos = Combinations::new(4, 2);
        combos.next();
        let rest_a: Vec<_> = combos.clone().collect();
        let rest_b: Vec<_> = combos.collect();
        assert_eq!(rest_a, rest_b);
        assert_eq!(rest_a.len(), 5);
    }

    #[test]
    fn test_binomial_large() {
        assert_eq!(binomial(30, 15), BigInt::from(155_117_520u64));
        assert_eq!(binomial(10, 0), BigInt::from(1));
    }

    #[test]
    fn test_total_beyond_u64() {
        let total = Combinations::new(100, 50).total();
        assert!(total > BigInt::from(u64::MAX));
        assert_eq!(
            total.to_string(),
            "100891344545564193334812497256"
        );
    }
}

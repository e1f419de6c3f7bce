//! Seeded permutations over an index range.
//!
//! A [`Permutation`] maps output positions to source positions: applying
//! `p` to a sequence `x` yields `y` with `y[i] = x[p[i]]`. Undoing it means
//! applying [`Permutation::invert`], never regenerating the same seed a
//! second time (that applies the forward reordering again).
//!
//! The shuffle draws indices as `u32` so a given `(seed, n)` produces the
//! same permutation on 32-bit and 64-bit targets.

use crate::error::{PixcryptError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A bijective reordering of `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// Deterministic Fisher-Yates shuffle of `0..n` driven by `seed`.
    ///
    /// The generator is constructed fresh for every call, so results do not
    /// depend on call order or on any other permutation generated before.
    pub fn generate(seed: u64, n: usize) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut indices: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = rng.gen_range(0..=(i as u32)) as usize;
            indices.swap(i, j);
        }
        Self(indices)
    }

    /// The identity permutation of length `n`.
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Build a permutation from explicit indices, rejecting anything that is
    /// not a bijection of `0..len`.
    pub fn from_indices(indices: Vec<usize>) -> Result<Self> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for &idx in &indices {
            if idx >= n {
                return Err(PixcryptError::InvalidPermutation(format!(
                    "index {} out of range for length {}",
                    idx, n
                )));
            }
            if seen[idx] {
                return Err(PixcryptError::InvalidPermutation(format!(
                    "index {} appears more than once",
                    idx
                )));
            }
            seen[idx] = true;
        }
        Ok(Self(indices))
    }

    /// Inverse permutation: `inverse[p[i]] = i`.
    pub fn invert(&self) -> Self {
        let mut inverse = vec![0usize; self.0.len()];
        for (new_pos, &old_pos) in self.0.iter().enumerate() {
            inverse[old_pos] = new_pos;
        }
        Self(inverse)
    }

    /// Reindex `items` by this permutation into a fresh vector.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Result<Vec<T>> {
        if items.len() != self.0.len() {
            return Err(PixcryptError::DimensionMismatch {
                axis: "sequence",
                expected: self.0.len(),
                actual: items.len(),
            });
        }
        Ok(self.0.iter().map(|&src| items[src].clone()).collect())
    }

    /// `self` followed by `next`, as a single permutation.
    pub fn then(&self, next: &Permutation) -> Result<Self> {
        Ok(Self(next.apply(&self.0)?))
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &p)| i == p)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generate_is_deterministic() {
        let a = Permutation::generate(1234, 100);
        let b = Permutation::generate(1234, 100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_differs_by_seed() {
        let a = Permutation::generate(1, 64);
        let b = Permutation::generate(2, 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_is_bijection() {
        let perm = Permutation::generate(99, 257);
        let mut sorted = perm.as_slice().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..257).collect::<Vec<_>>());
    }

    #[test]
    fn test_generate_actually_shuffles() {
        let perm = Permutation::generate(1234, 16);
        assert!(!perm.is_identity());
    }

    #[test]
    fn test_generate_empty_and_single() {
        assert!(Permutation::generate(7, 0).is_empty());
        assert_eq!(Permutation::generate(7, 1).as_slice(), &[0]);
    }

    #[test]
    fn test_invert_roundtrip() {
        let perm = Permutation::generate(5, 32);
        let data: Vec<u32> = (100..132).collect();

        let shuffled = perm.apply(&data).unwrap();
        assert_ne!(shuffled, data);

        let restored = perm.invert().apply(&shuffled).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_reapplying_same_permutation_does_not_undo_it() {
        let perm = Permutation::generate(1234, 16);
        let data: Vec<usize> = (0..16).collect();

        // A random 16-element permutation is essentially never an involution
        let twice = perm.apply(&perm.apply(&data).unwrap()).unwrap();
        assert_ne!(twice, data);
        assert_ne!(perm, perm.invert());
    }

    #[test]
    fn test_apply_semantics() {
        let perm = Permutation::from_indices(vec![2, 0, 1]).unwrap();
        assert_eq!(perm.apply(&['a', 'b', 'c']).unwrap(), vec!['c', 'a', 'b']);
        assert_eq!(perm.invert().as_slice(), &[1, 2, 0]);
    }

    #[test]
    fn test_from_indices_rejects_duplicates() {
        let err = Permutation::from_indices(vec![0, 1, 1]).unwrap_err();
        assert!(matches!(err, PixcryptError::InvalidPermutation(_)));
    }

    #[test]
    fn test_from_indices_rejects_out_of_range() {
        let err = Permutation::from_indices(vec![0, 3, 1]).unwrap_err();
        assert!(matches!(err, PixcryptError::InvalidPermutation(_)));
    }

    #[test]
    fn test_then_composes_in_order() {
        let first = Permutation::generate(10, 20);
        let second = Permutation::generate(11, 20);
        let data: Vec<usize> = (0..20).collect();

        let stepwise = second.apply(&first.apply(&data).unwrap()).unwrap();
        assert_eq!(first.then(&second).unwrap().apply(&data).unwrap(), stepwise);
    }

    #[test]
    fn test_apply_length_mismatch_is_an_error() {
        let perm = Permutation::generate(3, 4);
        let err = perm.apply(&[1u8, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            PixcryptError::DimensionMismatch { axis: "sequence", expected: 4, actual: 3 }
        ));

        let err = perm.then(&Permutation::identity(5)).unwrap_err();
        assert!(matches!(err, PixcryptError::DimensionMismatch { .. }));
    }

    proptest! {
        #[test]
        fn invert_composed_with_generate_is_identity(seed in any::<u64>(), n in 0usize..512) {
            let perm = Permutation::generate(seed, n);
            prop_assert!(perm.then(&perm.invert()).unwrap().is_identity());
            prop_assert!(perm.invert().then(&perm).unwrap().is_identity());
        }
    }
}

//! Uniform random permutations with a caller-provided random source.

use rand::Rng;
use rand::seq::SliceRandom;

/// Returns a shuffled copy of `items`, leaving the input untouched.
///
/// Uses Fisher-Yates through [`SliceRandom::shuffle`], so every permutation is
/// equally likely given a uniform `rng`. Pass `rand::rng()` in production and a
/// seeded `StdRng` where the order has to be reproducible.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.as_mut_slice().shuffle(rng);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn empty_and_singleton_are_unchanged() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffle::<u8, _>(&[], &mut rng).is_empty());
        assert_eq!(shuffle(&["only"], &mut rng), vec!["only"]);
    }

    #[test]
    fn result_is_a_permutation_of_the_input() {
        let mut rng = StdRng::seed_from_u64(99);
        for len in 0..40_usize {
            let input: Vec<usize> = (0..len).map(|i| i % 7).collect();
            let mut out = shuffle(&input, &mut rng);
            assert_eq!(out.len(), input.len());
            let mut sorted = input.clone();
            sorted.sort_unstable();
            out.sort_unstable();
            assert_eq!(out, sorted);
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let input = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut rng = StdRng::seed_from_u64(5);
        let _ = shuffle(&input, &mut rng);
        assert_eq!(input, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let input: Vec<u32> = (0..20).collect();
        let a = shuffle(&input, &mut StdRng::seed_from_u64(2024));
        let b = shuffle(&input, &mut StdRng::seed_from_u64(2024));
        assert_eq!(a, b);
    }

    #[test]
    fn each_element_lands_in_each_position_uniformly() {
        const TRIALS: usize = 60_000;
        let input = ['a', 'b', 'c'];
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut counts = [[0_usize; 3]; 3];

        for _ in 0..TRIALS {
            let out = shuffle(&input, &mut rng);
            for (pos, ch) in out.iter().enumerate() {
                let elem = input.iter().position(|c| c == ch).unwrap();
                counts[elem][pos] += 1;
            }
        }

        let expected = TRIALS / 3;
        let tolerance = expected * 3 / 100;
        for row in counts {
            for count in row {
                assert!(
                    count.abs_diff(expected) <= tolerance,
                    "count {count} too far from {expected}"
                );
            }
        }
    }

    #[test]
    fn every_permutation_shows_up_evenly() {
        const TRIALS: usize = 24_000;
        let input = [1_u8, 2, 3, 4];
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen: HashMap<Vec<u8>, usize> = HashMap::new();

        for _ in 0..TRIALS {
            *seen.entry(shuffle(&input, &mut rng)).or_default() += 1;
        }

        assert_eq!(seen.len(), 24);
        let expected = TRIALS / 24;
        for count in seen.values() {
            assert!(count.abs_diff(expected) <= expected / 5);
        }
    }
}

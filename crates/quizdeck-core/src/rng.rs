// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A minimal, zero-dependency, completely insecure PRNG to shuffle questions.
pub struct TinyRng {
    state: u64,
}

const A: u64 = 6364136223846793005;
const C: u64 = 1442695040888963407;

impl TinyRng {
    /// Initialize the RNG from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the system clock.
    #[cfg(feature = "clock")]
    pub fn from_clock() -> Self {
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default();
        Self::from_seed(nanos as u64)
    }

    pub fn next_u32(&mut self) -> u32 {
        let new = self.state.wrapping_mul(A).wrapping_add(C);
        self.state = new;
        (new >> 32) as u32
    }

    /// Generate a uniform random number in [0, max). `max` must be non-zero.
    ///
    /// Draws at or above the largest multiple of `max` are rejected, so every
    /// value is equally likely.
    pub fn generate(&mut self, max: u32) -> u32 {
        let limit = u32::MAX - u32::MAX % max;
        loop {
            let n = self.next_u32();
            if n < limit {
                return n % max;
            }
        }
    }
}

/// Fisher-Yates shuffle. Takes ownership, so callers that need to keep the
/// original order shuffle a clone.
pub fn shuffle<T>(v: Vec<T>, rng: &mut TinyRng) -> Vec<T> {
    let mut v = v;
    for i in (1..v.len()).rev() {
        let j = rng.generate(i as u32 + 1) as usize;
        v.swap(i, j);
    }
    v
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_generate_in_range() {
        let mut rng = TinyRng::from_seed(42);
        for max in 1..50 {
            for _ in 0..100 {
                assert!(rng.generate(max) < max);
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = TinyRng::from_seed(7);
        let mut b = TinyRng::from_seed(7);
        for _ in 0..10 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = TinyRng::from_seed(1);
        let mut shuffled = shuffle((0..20).collect::<Vec<u32>>(), &mut rng);
        shuffled.sort();
        assert_eq!(shuffled, (0..20).collect::<Vec<u32>>());
    }

    #[test]
    fn test_shuffle_trivial_inputs() {
        let mut rng = TinyRng::from_seed(1);
        assert_eq!(shuffle(Vec::<u32>::new(), &mut rng), Vec::<u32>::new());
        assert_eq!(shuffle(vec![5], &mut rng), vec![5]);
    }

    #[test]
    fn test_shuffle_is_uniform() {
        let mut rng = TinyRng::from_seed(0xdead_beef);
        let trials = 6000;
        let mut counts: HashMap<Vec<u32>, usize> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(shuffle(vec![1, 2, 3], &mut rng)).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        let expected = trials / 6;
        for (perm, count) in counts {
            assert!(
                count.abs_diff(expected) < 150,
                "{perm:?} appeared {count} times"
            );
        }
    }
}

//! Elimination scoring.
//!
//! For a guess `g`, every word `t` still in the pool is treated as the answer in turn: the
//! feedback `g` would get against `t` is applied to a private copy of the constraints, and the
//! number of *other* pool words that survive it is added to `g`'s score. Lower is better.
//!
//! The cost is `O(|guesses| * |pool|^2)`, which is fine once a guess or two has shrunk the pool.

use crate::{ConstraintSet, Word};
use rayon::current_num_threads;
use rayon::prelude::*;

/// How many pool words `guess` leaves behind, summed over every possible answer in `pool`.
pub fn eliminations(guess: &Word, pool: &[Word], base: &ConstraintSet) -> usize {
    pool.iter()
        .map(|target| {
            let scratch = base.with_feedback(guess, target);
            // the answer itself always survives
            scratch.count_consistent(pool).saturating_sub(1)
        })
        .sum()
}

/// [`eliminations`], plus one if `guess` could not itself be the answer.
pub fn score(guess: &Word, pool: &[Word], base: &ConstraintSet) -> usize {
    let mut score = eliminations(guess, pool, base);
    if !base.is_consistent(guess) {
        score += 1;
    }
    score
}

/// Scores every word in `guesses`; `result[i]` belongs to `guesses[i]`.
pub fn scores(guesses: &[Word], pool: &[Word], base: &ConstraintSet) -> Vec<usize> {
    // a tiny pool is cheaper to score on one thread
    if current_num_threads() > 1 && guesses.len() * pool.len() > 256 {
        guesses
            .par_iter()
            .map(|guess| score(guess, pool, base))
            .collect()
    } else {
        guesses
            .iter()
            .map(|guess| score(guess, pool, base))
            .collect()
    }
}

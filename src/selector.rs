use crate::dictionary::{Frequency, NoFrequency};
use crate::{decode, encode, score, ConstraintSet, Grid, OpeningBook, Word, WordPool, NO_MATCH};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Options {
    /// Where the opening book is read from.
    pub book: PathBuf,

    /// If false, every request is computed from scratch.
    pub use_book: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            book: PathBuf::from("files/opening_book.json"),
            use_book: true,
        }
    }
}

impl Options {
    pub fn build(self, pool: WordPool, frequency: impl Frequency + 'static) -> Selector {
        Selector {
            pool,
            frequency: Box::new(frequency),
            book: OnceCell::new(),
            options: self,
        }
    }
}

/// Picks the next guess for a feedback grid.
pub struct Selector {
    pool: WordPool,
    frequency: Box<dyn Frequency>,
    /// Read from `options.book` on the first lookup, then kept.
    book: OnceCell<OpeningBook>,
    options: Options,
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("words", &self.pool.len())
            .field("book", &self.book.get().map(OpeningBook::len))
            .field("options", &self.options)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub word: String,
    /// Elimination score, including the penalty for guesses that cannot be the answer.
    pub score: usize,
    /// `score` minus the word's frequency. Lower is better.
    pub goodness: f64,
}

impl Selector {
    pub fn builder() -> Options {
        Options::default()
    }

    /// A selector without a frequency prior.
    pub fn new(pool: WordPool) -> Self {
        Options::default().build(pool, NoFrequency)
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The best guess for `grid`, never one of `excluded`.
    ///
    /// With nothing excluded the opening book is consulted first. It is loaded on the first such
    /// lookup and not re-read, so a book rebuilt later is only seen by a new selector. Returns
    /// [`NO_MATCH`] when no word fits the grid.
    pub fn choose_word(&self, grid: &Grid, excluded: &HashSet<String>) -> String {
        if excluded.is_empty() && self.options.use_book {
            let key = grid.canonical_key();
            let book = self
                .book
                .get_or_init(|| OpeningBook::load(&self.options.book));
            if let Some(word) = book.get(&key) {
                log::debug!("opening book has {} for {}", word, key);
                return word.to_string();
            }
        }
        self.compute(grid, excluded)
    }

    /// Like [`Selector::choose_word`], but always scores instead of using the opening book.
    pub fn compute(&self, grid: &Grid, excluded: &HashSet<String>) -> String {
        self.rank(grid, excluded)
            .into_iter()
            .next()
            .map_or_else(|| NO_MATCH.to_string(), |best| best.word)
    }

    /// Every allowed guess, best first.
    ///
    /// Ties keep the dictionary's alphabetical order. Empty if no word fits the grid.
    pub fn rank(&self, grid: &Grid, excluded: &HashSet<String>) -> Vec<Candidate> {
        let excluded: HashSet<Word> = excluded.iter().filter_map(|w| encode(w)).collect();
        let all: Vec<Word> = self
            .pool
            .words()
            .iter()
            .filter(|w| !excluded.contains(*w))
            .copied()
            .collect();

        let constraints = ConstraintSet::from_grid(grid);
        let pool = constraints.filter(&all);
        log::debug!("{} of {} words fit {}", pool.len(), all.len(), grid.canonical_key());
        if pool.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let scores = score::scores(&all, &pool, &constraints);
        log::debug!("scored {} guesses in {:?}", all.len(), start.elapsed());

        let mut ranked: Vec<Candidate> = all
            .iter()
            .zip(scores)
            .map(|(word, score)| {
                let word = decode(word);
                let goodness = score as f64 - self.frequency.frequency(&word);
                Candidate {
                    word,
                    score,
                    goodness,
                }
            })
            .collect();
        // stable, so equal goodness keeps alphabetical order
        ranked.sort_by(|a, b| a.goodness.total_cmp(&b.goodness));
        ranked
    }
}

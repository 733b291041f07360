use itertools::Itertools;
use std::collections::HashSet;
use std::path::PathBuf;

pub mod book;
pub mod constraints;
pub mod dictionary;
pub mod score;
pub mod selector;

pub use book::OpeningBook;
pub use constraints::ConstraintSet;
pub use dictionary::{Frequency, WordPool, WordSource};
pub use selector::{Options, Selector};

include!(concat!(env!("OUT_DIR"), "/dictionary.rs"));

/// Letters per word.
pub const WORD_LENGTH: usize = 5;

/// Guesses allowed per game, and so the number of rows in a [`Grid`].
pub const ROWS: usize = 6;

/// Size of the lowercase ASCII alphabet.
pub const ALPHABET: usize = 26;

/// Placeholder for a cell that has no letter yet.
pub const BLANK: char = '*';

/// Returned instead of a guess when no dictionary word satisfies the grid.
pub const NO_MATCH: &str = "*****";

const _: () = assert!(NO_MATCH.len() == WORD_LENGTH);
const _: () = assert!(WORD_LENGTH <= 8, "positions are stored in a u8 bit set");

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize the opening book")]
    Json(#[from] serde_json::Error),
    #[error("the dictionary did not produce a single usable word")]
    EmptyDictionary,
    #[error("'{0}' is not a lowercase word of the configured length")]
    InvalidWord(String),
    #[error("'{0}' is not a feedback pattern (expected one of w/m/c or 0/1/2 per letter)")]
    InvalidPattern(String),
    #[error("every row of the grid is already filled")]
    GridFull,
    #[error("opening book {} is already being rebuilt (remove the stale lock if not)", .0.display())]
    BookLocked(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// A lowercase letter, stored as its offset from `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Symbol(u8);

impl Symbol {
    /// Returns `None` for anything outside `a..=z`.
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'a'..=b'z' => Some(Self(b - b'a')),
            _ => None,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        u8::try_from(c).ok().and_then(Self::from_byte)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn as_char(self) -> char {
        (b'a' + self.0) as char
    }
}

pub type Word = [Symbol; WORD_LENGTH];

/// Encodes a lowercase word of exactly [`WORD_LENGTH`] letters.
pub fn encode(word: &str) -> Option<Word> {
    let bytes = word.as_bytes();
    if bytes.len() != WORD_LENGTH {
        return None;
    }
    let mut out = [Symbol(0); WORD_LENGTH];
    for (&b, out) in bytes.iter().zip(out.iter_mut()) {
        *out = Symbol::from_byte(b)?;
    }
    Some(out)
}

pub fn decode(word: &Word) -> String {
    word.iter().map(|s| s.as_char()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Correctness {
    /// Gray
    #[default]
    Wrong,
    /// Yellow
    Misplaced,
    /// Green
    Correct,
}

impl Correctness {
    const ALL: [Self; 3] = [Self::Wrong, Self::Misplaced, Self::Correct];

    /// The color code used in opening book keys.
    pub const fn code(self) -> u8 {
        match self {
            Self::Wrong => 0,
            Self::Misplaced => 1,
            Self::Correct => 2,
        }
    }

    /// Gray -> yellow -> green -> gray.
    pub const fn next(self) -> Self {
        match self {
            Self::Wrong => Self::Misplaced,
            Self::Misplaced => Self::Correct,
            Self::Correct => Self::Wrong,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' | '0' => Some(Self::Wrong),
            'm' | '1' => Some(Self::Misplaced),
            'c' | '2' => Some(Self::Correct),
            _ => None,
        }
    }

    /// Parses a pattern such as `wmcww`.
    pub fn parse_mask(s: &str) -> Result<[Self; WORD_LENGTH], Error> {
        let mut mask = [Self::Wrong; WORD_LENGTH];
        let mut chars = s.chars();
        for m in mask.iter_mut() {
            *m = chars
                .next()
                .and_then(Self::from_char)
                .ok_or_else(|| Error::InvalidPattern(s.to_string()))?;
        }
        if chars.next().is_some() {
            return Err(Error::InvalidPattern(s.to_string()));
        }
        Ok(mask)
    }

    /// The colors a real game shows for `guess` when the answer is `answer`.
    pub fn compute(answer: &str, guess: &str) -> [Self; WORD_LENGTH] {
        assert_eq!(answer.len(), WORD_LENGTH);
        assert_eq!(guess.len(), WORD_LENGTH);
        let mut c = [Correctness::Wrong; WORD_LENGTH];
        let answer_bytes = answer.as_bytes();
        let guess_bytes = guess.as_bytes();
        // Array indexed by lowercase ascii letters
        let mut misplaced = [0u8; ALPHABET];

        // Find all correct letters
        for ((&answer, &guess), c) in answer_bytes.iter().zip(guess_bytes).zip(c.iter_mut()) {
            if answer == guess {
                *c = Correctness::Correct
            } else {
                // If the letter does not match, count it as misplaced
                misplaced[(answer - b'a') as usize] += 1;
            }
        }
        // Check all of the non matching letters if they are misplaced
        for (&guess, c) in guess_bytes.iter().zip(c.iter_mut()) {
            if *c == Correctness::Wrong && misplaced[(guess - b'a') as usize] > 0 {
                *c = Correctness::Misplaced;
                misplaced[(guess - b'a') as usize] -= 1;
            }
        }

        c
    }

    /// The colors feedback simulation assigns: green where the letters line up, yellow where
    /// the answer holds the letter anywhere else, gray otherwise.
    ///
    /// Unlike [`Correctness::compute`], every copy of a letter the answer contains gets colored,
    /// so the answer always fits a grid built from these rows.
    pub fn simulate(answer: &str, guess: &str) -> [Self; WORD_LENGTH] {
        assert_eq!(answer.len(), WORD_LENGTH);
        assert_eq!(guess.len(), WORD_LENGTH);
        let answer = answer.as_bytes();
        let mut c = [Correctness::Wrong; WORD_LENGTH];
        for ((i, &g), c) in guess.as_bytes().iter().enumerate().zip(c.iter_mut()) {
            if answer[i] == g {
                *c = Correctness::Correct;
            } else if answer.contains(&g) {
                *c = Correctness::Misplaced;
            }
        }
        c
    }

    /// Every one of the `3^WORD_LENGTH` colorings of a row.
    pub fn patterns() -> impl Iterator<Item = [Self; WORD_LENGTH]> {
        std::iter::repeat(Self::ALL)
            .take(WORD_LENGTH)
            .multi_cartesian_product()
            .map(|colors| {
                let mut mask = [Self::Wrong; WORD_LENGTH];
                mask.copy_from_slice(&colors);
                mask
            })
    }
}

/// One square of the feedback grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub color: Correctness,
    pub letter: Option<Symbol>,
}

impl Cell {
    pub const fn new(color: Correctness, letter: Symbol) -> Self {
        Self {
            color,
            letter: Some(letter),
        }
    }
}

/// The feedback entered so far: [`ROWS`] rows of [`WORD_LENGTH`] cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Grid {
    cells: [[Cell; WORD_LENGTH]; ROWS],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    /// Advances the color of a filled cell; blank cells are left alone.
    pub fn cycle(&mut self, row: usize, col: usize) {
        let cell = &mut self.cells[row][col];
        if cell.letter.is_some() {
            cell.color = cell.color.next();
        }
    }

    /// Cells in row-major order, top row first.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, &cell)| (r, c, cell))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cells().all(|(_, _, cell)| cell.letter.is_none())
    }

    /// Index of the first row without any letters.
    pub fn next_row(&self) -> Option<usize> {
        self.cells
            .iter()
            .position(|row| row.iter().all(|cell| cell.letter.is_none()))
    }

    /// Writes `guess` and its coloring into the next free row and returns that row.
    pub fn push(&mut self, guess: &str, mask: [Correctness; WORD_LENGTH]) -> Result<usize, Error> {
        let word = encode(guess).ok_or_else(|| Error::InvalidWord(guess.to_string()))?;
        let row = self.next_row().ok_or(Error::GridFull)?;
        for (col, (&letter, &color)) in word.iter().zip(mask.iter()).enumerate() {
            self.cells[row][col] = Cell::new(color, letter);
        }
        Ok(row)
    }

    /// Order-independent key of the filled cells, as stored in the opening book.
    ///
    /// The filled cells are sorted by `(color code, letter)` and rendered as a tuple literal,
    /// e.g. `((0, 'c'), (2, 'a'))`. A single cell keeps its trailing comma (`((1, 'x'),)`) and
    /// an empty grid is `()`.
    pub fn canonical_key(&self) -> String {
        let mut filled: Vec<(u8, char)> = self
            .cells()
            .filter_map(|(_, _, cell)| Some((cell.color.code(), cell.letter?.as_char())))
            .collect();
        filled.sort_unstable();

        let mut key = String::from("(");
        key.push_str(
            &filled
                .iter()
                .map(|(code, letter)| format!("({}, '{}')", code, letter))
                .join(", "),
        );
        if filled.len() == 1 {
            key.push(',');
        }
        key.push(')');
        key
    }
}

/// Plays a game against a known answer, feeding real feedback back to a [`Selector`].
pub struct Wordle<'s> {
    selector: &'s Selector,
}

impl<'s> Wordle<'s> {
    pub fn new(selector: &'s Selector) -> Self {
        Self { selector }
    }

    /// Number of guesses needed, or `None` if the selector gave up or ran out of rows.
    ///
    /// Rows are colored with [`Correctness::simulate`], the same rule scoring uses, so the
    /// answer is never filtered out of the pool.
    pub fn play(&self, answer: &str) -> Option<usize> {
        let mut grid = Grid::new();
        let nothing = HashSet::new();
        for i in 1..=ROWS {
            let guess = self.selector.choose_word(&grid, &nothing);
            if guess == answer {
                return Some(i);
            }
            if guess == NO_MATCH {
                log::debug!("no candidates left for '{}' after {} guesses", answer, i - 1);
                return None;
            }
            let correctness = Correctness::simulate(answer, &guess);
            grid.push(&guess, correctness).ok()?;
        }
        None
    }
}

#[cfg(test)]
macro_rules! mask {
    (C) => {$crate::Correctness::Correct};
    (M) => {$crate::Correctness::Misplaced};
    (W) => {$crate::Correctness::Wrong};
    ($($c:tt)+) => {[
        $($crate::mask!($c)),+
    ]}
}

#[cfg(test)]
macro_rules! word {
    ($w:literal) => {
        $crate::encode($w).expect("test words are valid")
    };
}

#[cfg(test)]
pub(crate) use {mask, word};

//! What the feedback so far says about the answer.
//!
//! A [`ConstraintSet`] is rebuilt from the [`Grid`] on every request. It records which letters
//! are known to be absent, which positions a letter must occupy, and which positions a letter
//! that is known to be present must avoid.

use crate::{Correctness, Grid, Symbol, ALPHABET, WORD_LENGTH};

/// A set of positions within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Positions(u8);

impl Positions {
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn contains(self, pos: usize) -> bool {
        (self.0 >> pos) & 1 == 1
    }

    /// Returns false if `pos` was already present.
    pub fn insert(&mut self, pos: usize) -> bool {
        assert!(pos < WORD_LENGTH, "position {} is out of range", pos);
        let had = self.contains(pos);
        self.0 |= 1 << pos;
        !had
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..WORD_LENGTH).filter(move |&pos| self.contains(pos))
    }
}

/// A set of letters, one bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
struct LetterSet(u32);

impl LetterSet {
    const fn contains(self, s: Symbol) -> bool {
        (self.0 >> s.index()) & 1 == 1
    }

    fn insert(&mut self, s: Symbol) {
        self.0 |= 1 << s.index();
    }

    fn of(word: &[Symbol]) -> Self {
        let mut set = Self::default();
        for &s in word {
            set.insert(s);
        }
        set
    }

    const fn is_disjoint(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConstraintSet {
    absent: LetterSet,
    required: [Positions; ALPHABET],
    forbidden: [Positions; ALPHABET],
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every filled cell of `grid` in row-major order.
    ///
    /// A gray letter that is already known to sit at some position is a second copy of that
    /// letter, so it is treated as yellow rather than marking the letter absent. Because this
    /// only looks at what has been seen so far, a gray cell that comes *before* the green one
    /// still marks the letter absent.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut cs = Self::default();
        for (_, col, cell) in grid.cells() {
            let letter = match cell.letter {
                Some(letter) => letter,
                None => continue,
            };
            let mut color = cell.color;
            if color == Correctness::Wrong {
                if cs.required[letter.index()].is_empty() {
                    cs.absent.insert(letter);
                } else {
                    color = Correctness::Misplaced;
                }
            }
            match color {
                Correctness::Correct => {
                    cs.required[letter.index()].insert(col);
                }
                Correctness::Misplaced => {
                    cs.forbidden[letter.index()].insert(col);
                }
                Correctness::Wrong => {}
            }
        }
        cs
    }

    pub fn is_absent(&self, s: Symbol) -> bool {
        self.absent.contains(s)
    }

    pub fn required(&self, s: Symbol) -> Positions {
        self.required[s.index()]
    }

    pub fn forbidden(&self, s: Symbol) -> Positions {
        self.forbidden[s.index()]
    }

    pub fn mark_absent(&mut self, s: Symbol) {
        self.absent.insert(s);
    }

    pub fn require(&mut self, s: Symbol, pos: usize) {
        self.required[s.index()].insert(pos);
    }

    pub fn forbid(&mut self, s: Symbol, pos: usize) {
        self.forbidden[s.index()].insert(pos);
    }

    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Could `word` still be the answer?
    pub fn is_consistent(&self, word: &[Symbol]) -> bool {
        if word.len() != WORD_LENGTH {
            return false;
        }

        let letters = LetterSet::of(word);
        if !letters.is_disjoint(self.absent) {
            return false;
        }

        for (i, (required, forbidden)) in self.required.iter().zip(&self.forbidden).enumerate() {
            if required.is_empty() && forbidden.is_empty() {
                continue;
            }
            let s = Symbol(i as u8);
            if required.iter().any(|pos| word[pos] != s) {
                return false;
            }
            if !forbidden.is_empty()
                && (!letters.contains(s) || forbidden.iter().any(|pos| word[pos] == s))
            {
                return false;
            }
        }

        true
    }

    /// The words of `pool` that are consistent, in their original order.
    pub fn filter<W>(&self, pool: &[W]) -> Vec<W>
    where
        W: AsRef<[Symbol]> + Copy,
    {
        pool.iter()
            .copied()
            .filter(|w| self.is_consistent(w.as_ref()))
            .collect()
    }

    pub fn count_consistent<W>(&self, pool: &[W]) -> usize
    where
        W: AsRef<[Symbol]>,
    {
        pool.iter().filter(|w| self.is_consistent(w.as_ref())).count()
    }

    /// Adds what guessing `guess` would reveal if the answer were `target`.
    ///
    /// This is the one rule feedback follows: scoring applies it directly, and
    /// [`Correctness::simulate`] colors grid rows by it during play.
    pub fn apply_feedback(&mut self, guess: &[Symbol], target: &[Symbol]) {
        assert_eq!(guess.len(), WORD_LENGTH);
        assert_eq!(target.len(), WORD_LENGTH);
        for (i, &g) in guess.iter().enumerate() {
            if target[i] == g {
                self.required[g.index()].insert(i);
            } else if target.contains(&g) {
                self.forbidden[g.index()].insert(i);
            } else if self.required[g.index()].is_empty() {
                self.absent.insert(g);
            }
        }
    }

    /// A copy of `self` with the feedback for `guess` against `target` applied.
    pub fn with_feedback(&self, guess: &[Symbol], target: &[Symbol]) -> Self {
        let mut next = *self;
        next.apply_feedback(guess, target);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, mask, word, Cell, Word};

    fn sym(c: char) -> Symbol {
        Symbol::from_char(c).unwrap()
    }

    fn words(ws: &[&str]) -> Vec<Word> {
        ws.iter().map(|w| encode(w).unwrap()).collect()
    }

    const POOL: &[&str] = &[
        "abcde", "edcba", "eabcd", "bcdea", "crane", "slate", "trace", "crate", "aabbc", "zzzzz",
        "adieu", "stare",
    ];

    mod model {
        use super::*;

        #[test]
        fn colors_map_to_constraints() {
            let mut g = Grid::new();
            g.push("crane", mask![W M C W C]).unwrap();
            let cs = ConstraintSet::from_grid(&g);
            assert!(cs.is_absent(sym('c')));
            assert!(cs.is_absent(sym('n')));
            assert_eq!(cs.forbidden(sym('r')).iter().collect::<Vec<_>>(), [1]);
            assert_eq!(cs.required(sym('a')).iter().collect::<Vec<_>>(), [2]);
            assert_eq!(cs.required(sym('e')).iter().collect::<Vec<_>>(), [4]);
            assert!(cs.forbidden(sym('a')).is_empty());
        }

        #[test]
        fn blank_cells_are_ignored() {
            let mut g = Grid::new();
            g.set(0, 0, Cell::default());
            g.cycle(0, 0);
            assert!(ConstraintSet::from_grid(&g).is_unconstrained());
        }

        #[test]
        fn gray_after_green_is_a_second_copy() {
            // row 0 pins 'a' to column 0, row 1 then shows a gray 'a' at column 2
            let mut g = Grid::new();
            g.set(0, 0, Cell::new(Correctness::Correct, sym('a')));
            g.set(1, 2, Cell::new(Correctness::Wrong, sym('a')));
            let cs = ConstraintSet::from_grid(&g);
            assert!(!cs.is_absent(sym('a')));
            assert_eq!(cs.forbidden(sym('a')).iter().collect::<Vec<_>>(), [2]);
            assert!(cs.is_consistent(&word!("abxyz")));
            assert!(!cs.is_consistent(&word!("abaxy")));
        }

        #[test]
        fn gray_before_green_marks_absent() {
            // same cells, but the gray one is visited first
            let mut g = Grid::new();
            g.set(0, 2, Cell::new(Correctness::Wrong, sym('a')));
            g.set(1, 0, Cell::new(Correctness::Correct, sym('a')));
            let cs = ConstraintSet::from_grid(&g);
            assert!(cs.is_absent(sym('a')));
            assert_eq!(cs.required(sym('a')).len(), 1);
            assert!(cs.forbidden(sym('a')).is_empty());
            // the two facts contradict each other, so nothing survives
            assert!(!cs.is_consistent(&word!("abxyz")));
        }

        #[test]
        fn same_row_order_matters() {
            let mut left = Grid::new();
            left.push("aaxyz", mask![C W W W W]).unwrap();
            let cs = ConstraintSet::from_grid(&left);
            assert!(!cs.is_absent(sym('a')));
            assert_eq!(cs.forbidden(sym('a')).iter().collect::<Vec<_>>(), [1]);

            let mut right = Grid::new();
            right.push("aaxyz", mask![W C W W W]).unwrap();
            let cs = ConstraintSet::from_grid(&right);
            assert!(cs.is_absent(sym('a')));
            assert_eq!(cs.required(sym('a')).iter().collect::<Vec<_>>(), [1]);
        }

        #[test]
        fn positions_are_not_duplicated() {
            let mut g = Grid::new();
            g.push("crane", mask![W W C W W]).unwrap();
            g.push("slate", mask![W W C W W]).unwrap();
            g.push("brave", mask![W M C W W]).unwrap();
            g.push("trace", mask![W M C W W]).unwrap();
            let cs = ConstraintSet::from_grid(&g);
            assert_eq!(cs.required(sym('a')).len(), 1);
            assert_eq!(cs.forbidden(sym('r')).len(), 1);
        }
    }

    mod filter {
        use super::*;

        #[test]
        fn wrong_length() {
            let cs = ConstraintSet::new();
            assert!(!cs.is_consistent(&word!("crane")[..4]));
            assert!(cs.is_consistent(&word!("crane")));
        }

        #[test]
        fn absent() {
            let mut cs = ConstraintSet::new();
            cs.mark_absent(sym('z'));
            assert!(!cs.is_consistent(&word!("zzzzz")));
            assert!(cs.is_consistent(&word!("crane")));
        }

        #[test]
        fn required() {
            let mut cs = ConstraintSet::new();
            cs.require(sym('a'), 2);
            cs.require(sym('e'), 4);
            assert!(cs.is_consistent(&word!("crane")));
            assert!(cs.is_consistent(&word!("stare")));
            assert!(!cs.is_consistent(&word!("slant")));
            assert!(!cs.is_consistent(&word!("adieu")));
        }

        #[test]
        fn forbidden_requires_presence() {
            let mut cs = ConstraintSet::new();
            cs.forbid(sym('r'), 1);
            assert!(!cs.is_consistent(&word!("crane")));
            assert!(cs.is_consistent(&word!("stare")));
            assert!(!cs.is_consistent(&word!("slate")));
        }

        #[test]
        fn keeps_order() {
            let mut cs = ConstraintSet::new();
            cs.require(sym('a'), 2);
            let pool = words(POOL);
            assert_eq!(
                cs.filter(&pool),
                words(&["crane", "slate", "trace", "crate", "stare"])
            );
        }

        #[test]
        fn idempotent() {
            let pool = words(POOL);
            let mut g = Grid::new();
            g.push("crane", mask![M W W W M]).unwrap();
            let cs = ConstraintSet::from_grid(&g);
            let once = cs.filter(&pool);
            assert_eq!(cs.filter(&once), once);
        }

        #[test]
        fn more_constraints_never_grow_the_pool() {
            let pool = words(POOL);
            let mut cs = ConstraintSet::new();
            let mut last = cs.filter(&pool).len();
            let steps: [fn(&mut ConstraintSet); 4] = [
                |cs| cs.forbid(sym('e'), 0),
                |cs| cs.mark_absent(sym('z')),
                |cs| cs.require(sym('a'), 2),
                |cs| cs.forbid(sym('t'), 0),
            ];
            for step in steps {
                step(&mut cs);
                let now = cs.filter(&pool).len();
                assert!(now <= last);
                last = now;
            }
            assert_eq!(cs.filter(&pool), words(&["slate", "crate", "stare"]));
        }
    }

    mod feedback {
        use super::*;

        #[test]
        fn reversed_word() {
            let cs = ConstraintSet::new().with_feedback(&word!("abcde"), &word!("edcba"));
            for (i, l) in "abde".chars().enumerate() {
                let pos = if i < 2 { i } else { i + 1 };
                assert_eq!(cs.forbidden(sym(l)).iter().collect::<Vec<_>>(), [pos]);
                assert!(cs.required(sym(l)).is_empty());
            }
            // the middle letter lines up with itself
            assert_eq!(cs.required(sym('c')).iter().collect::<Vec<_>>(), [2]);
            assert!(cs.forbidden(sym('c')).is_empty());
            assert!("abcde".chars().all(|l| !cs.is_absent(sym(l))));
        }

        #[test]
        fn rotated_word() {
            let cs = ConstraintSet::new().with_feedback(&word!("abcde"), &word!("eabcd"));
            for (i, l) in "abcde".chars().enumerate() {
                assert_eq!(cs.forbidden(sym(l)).iter().collect::<Vec<_>>(), [i]);
                assert!(cs.required(sym(l)).is_empty());
                assert!(!cs.is_absent(sym(l)));
            }
            let pool = words(POOL);
            // every letter present, none where it was guessed
            assert_eq!(cs.filter(&pool), words(&["eabcd", "bcdea"]));
        }

        #[test]
        fn missing_letters_become_absent() {
            let cs = ConstraintSet::new().with_feedback(&word!("crane"), &word!("stare"));
            assert!(cs.is_absent(sym('c')));
            assert!(cs.is_absent(sym('n')));
            assert_eq!(cs.forbidden(sym('r')).iter().collect::<Vec<_>>(), [1]);
            assert_eq!(cs.required(sym('a')).iter().collect::<Vec<_>>(), [2]);
            assert_eq!(cs.required(sym('e')).iter().collect::<Vec<_>>(), [4]);
        }

        #[test]
        fn known_letter_is_never_marked_absent() {
            let mut base = ConstraintSet::new();
            base.require(sym('q'), 0);
            let cs = base.with_feedback(&word!("qaaaa"), &word!("zzzzz"));
            assert!(!cs.is_absent(sym('q')));
            assert!(cs.is_absent(sym('a')));
        }

        #[test]
        fn does_not_touch_the_original() {
            let base = ConstraintSet::new();
            let _ = base.with_feedback(&word!("crane"), &word!("stare"));
            assert!(base.is_unconstrained());
        }

        #[test]
        fn answer_always_survives_its_own_feedback() {
            let pool = words(POOL);
            for start in [ConstraintSet::new(), {
                let mut g = Grid::new();
                g.push("zzzzz", mask![W W W W W]).unwrap();
                ConstraintSet::from_grid(&g)
            }] {
                for guess in &pool {
                    for target in pool.iter().filter(|t| start.is_consistent(&t[..])) {
                        let cs = start.with_feedback(guess, target);
                        assert!(
                            cs.is_consistent(target),
                            "{} lost after guessing {}",
                            crate::decode(target),
                            crate::decode(guess)
                        );
                    }
                }
            }
        }
    }
}

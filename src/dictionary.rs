//! Where words and their frequencies come from.

use crate::{decode, encode, Error, Word, COUNTS, DICTIONARY};
use once_cell::sync::OnceCell;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Proper nouns and abbreviations that word lists tend to include but the game rejects.
pub const BLOCKLIST: &[&str] = &[
    "brady", "turin", "dylan", "dolan", "lanka", "milan", "cathy", "alton", "mckee", "mcgee",
    "poole", "della", "dinah", "syria", "akron",
];

/// Accepted answers that word lists tend to miss.
pub const ALLOWLIST: &[&str] = &[
    "manly", "mucky", "latte", "imply", "daily", "lover", "rerun", "unfit",
];

/// Supplies the words a [`WordPool`] is built from.
pub trait WordSource {
    /// Every word for the given language. Words need not be filtered or deduplicated.
    fn words(&self, language: &str) -> Result<Vec<String>, Error>;
}

/// How common a word is, as a probability-like value.
///
/// Only used to break ties between guesses, so implementations should stay within `0..=1`.
/// Counts over a total stay below 1 unless a single word holds every count.
pub trait Frequency: Send + Sync {
    fn frequency(&self, _word: &str) -> f64 {
        0.0
    }
}

impl<F> Frequency for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn frequency(&self, word: &str) -> f64 {
        (self)(word)
    }
}

/// Every word counts the same.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFrequency;

impl Frequency for NoFrequency {}

/// The word list compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Embedded;

static EMBEDDED_TOTAL: OnceCell<usize> = OnceCell::new();

impl WordSource for Embedded {
    fn words(&self, language: &str) -> Result<Vec<String>, Error> {
        if language != "en" {
            log::warn!("no embedded word list for language '{}'", language);
            return Ok(Vec::new());
        }
        Ok(DICTIONARY
            .iter()
            .map(|&(word, _)| word.to_string())
            .collect())
    }
}

impl Frequency for Embedded {
    fn frequency(&self, word: &str) -> f64 {
        let total = *EMBEDDED_TOTAL.get_or_init(|| DICTIONARY.iter().map(|(_, count)| count).sum());
        match COUNTS.get(word) {
            Some(&count) if total > 0 => count as f64 / total as f64,
            _ => 0.0,
        }
    }
}

/// A word list read from disk.
///
/// Each line holds a word, optionally followed by whitespace and an occurrence count. Words
/// without a count get a frequency of zero.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
    counts: HashMap<String, usize>,
    total: usize,
}

impl WordList {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut list = Self::default();
        for line in text.lines() {
            let mut fields = line.split_whitespace();
            let word = match fields.next() {
                Some(word) => word,
                None => continue,
            };
            list.words.push(word.to_string());
            if let Some(count) = fields.next().and_then(|c| c.parse::<usize>().ok()) {
                *list.counts.entry(word.to_lowercase()).or_insert(0) += count;
                list.total += count;
            }
        }
        list
    }

    /// Just the words, for use as a block or allow list.
    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

impl WordSource for WordList {
    fn words(&self, _language: &str) -> Result<Vec<String>, Error> {
        Ok(self.words.clone())
    }
}

impl Frequency for WordList {
    fn frequency(&self, word: &str) -> f64 {
        match self.counts.get(word) {
            Some(&count) if self.total > 0 => count as f64 / self.total as f64,
            _ => 0.0,
        }
    }
}

/// The words that may be guessed, sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPool {
    words: Vec<Word>,
}

impl WordPool {
    /// Builds the pool from `source`, dropping `blocklist` and adding `allowlist`.
    ///
    /// Only lowercase-able alphabetic words of the configured length are kept. A pool with no
    /// words at all is an error, since nothing could ever be suggested from it.
    pub fn new<W, B, A>(
        source: &W,
        language: &str,
        blocklist: B,
        allowlist: A,
    ) -> Result<Self, Error>
    where
        W: WordSource + ?Sized,
        B: IntoIterator,
        B::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let blocked: BTreeSet<Word> = blocklist
            .into_iter()
            .filter_map(|w| encode(&w.as_ref().to_lowercase()))
            .collect();
        let mut words = source.words(language)?;
        let found = words.len();
        words.extend(allowlist.into_iter().map(|w| w.as_ref().to_string()));
        let mut pool = Self::from_words(words);
        pool.words.retain(|w| !blocked.contains(w));
        log::debug!(
            "word pool has {} words ({} in the source list)",
            pool.len(),
            found
        );
        if pool.is_empty() {
            return Err(Error::EmptyDictionary);
        }
        Ok(pool)
    }

    /// The compiled-in word list with the default block and allow lists.
    pub fn embedded() -> Result<Self, Error> {
        Self::new(&Embedded, "en", BLOCKLIST, ALLOWLIST)
    }

    /// Keeps whatever of `words` is usable, without any block or allow list.
    pub fn from_words<I>(words: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let words: BTreeSet<Word> = words
            .into_iter()
            .filter_map(|w| encode(&w.as_ref().to_lowercase()))
            .collect();
        Self {
            words: words.into_iter().collect(),
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        encode(word).map_or(false, |w| self.words.binary_search(&w).is_ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.words.iter().map(decode)
    }
}

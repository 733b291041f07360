//! The opening book: precomputed guesses for the empty grid and for every coloring of the
//! first guess.
//!
//! On disk it is a JSON object from [`Grid::canonical_key`] to the word to play. The file is
//! only ever written by [`build`], which replaces it wholesale.

use crate::{Correctness, Error, Grid, Selector, NO_MATCH};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpeningBook {
    entries: BTreeMap<String, String>,
}

impl OpeningBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the book at `path`. A missing or unreadable file is an empty book.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no opening book at {}", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("ignoring unreadable opening book {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(entries) => Self { entries },
            Err(e) => {
                log::warn!("ignoring malformed opening book {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, word: impl Into<String>) {
        self.entries.insert(key.into(), word.into());
    }

    /// Adds every entry of `other`, replacing ours where both have the same key.
    pub fn merge(&mut self, other: OpeningBook) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes the whole book to `path` with two-space indentation.
    ///
    /// The JSON goes to a sibling temporary file first and is then renamed into place, so a
    /// reader never sees a half-written book.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = sibling(path, "tmp");
        fs::write(&tmp, json).map_err(|e| Error::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| Error::io(path, e))
    }
}

fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}

/// Held while a book is being rebuilt; removed again on drop.
#[derive(Debug)]
struct BuildLock {
    path: PathBuf,
}

impl BuildLock {
    fn acquire(book: &Path) -> Result<Self, Error> {
        if let Some(dir) = book.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        let path = sibling(book, "lock");
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(Error::BookLocked(book.to_path_buf()))
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("could not remove {}: {}", self.path.display(), e);
        }
    }
}

/// Recomputes the depth-two opening book with `selector` and merges it into the book at `path`.
///
/// The best opening word is recorded under the empty grid's key. Then every coloring of that
/// word as a first guess gets the best follow-up, unless nothing fits or the follow-up would be
/// the opening word again. Entries already in the file survive unless recomputed.
pub fn build(selector: &Selector, path: impl AsRef<Path>) -> Result<OpeningBook, Error> {
    let path = path.as_ref();
    let _lock = BuildLock::acquire(path)?;
    let mut book = OpeningBook::load(path);
    let nothing = HashSet::new();
    let mut fresh = OpeningBook::new();

    let start = Instant::now();
    let empty = Grid::new();
    let first = selector.compute(&empty, &nothing);
    log::info!("best opening word is {} ({:?})", first, start.elapsed());
    fresh.insert(empty.canonical_key(), first.clone());

    if first != NO_MATCH {
        for (i, pattern) in Correctness::patterns().enumerate() {
            let mut grid = Grid::new();
            grid.push(&first, pattern)?;
            let choice = selector.compute(&grid, &nothing);
            log::debug!("{} -> {}", grid.canonical_key(), choice);
            if choice != NO_MATCH && choice != first {
                fresh.insert(grid.canonical_key(), choice);
            }
            if (i + 1) % 27 == 0 {
                log::info!("scored {} first-guess colorings", i + 1);
            }
        }
    }

    log::info!(
        "computed {} entries in {:?}; {} already in {}",
        fresh.len(),
        start.elapsed(),
        book.len(),
        path.display()
    );
    book.merge(fresh);
    book.save(path)?;
    Ok(book)
}

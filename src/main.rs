use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use rayon::ThreadPoolBuilder;
use std::collections::HashSet;
use std::path::PathBuf;
use wordsleuth::dictionary::{self, Embedded, WordList};
use wordsleuth::{book, Correctness, Grid, Selector, WordPool, Wordle, NO_MATCH};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Suggests the guess that narrows a Wordle game down the most.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The opening book to read, and for `build-book` to write.
    #[clap(long, global = true, default_value = "files/opening_book.json")]
    book: PathBuf,

    /// Never consult the opening book; always compute.
    #[clap(long, global = true)]
    no_book: bool,

    /// Use this word list instead of the built-in one.
    ///
    /// One word per line, optionally followed by an occurrence count. Counts are used to break
    /// ties between equally good guesses.
    #[clap(long, global = true)]
    words: Option<PathBuf>,

    /// Words that are never suggested, one per line. Replaces the built-in block list.
    #[clap(long, global = true)]
    blocklist: Option<PathBuf>,

    /// Words to add to the word list, one per line. Replaces the built-in allow list.
    #[clap(long, global = true)]
    allowlist: Option<PathBuf>,

    /// Sets the number of threads to use in thread pool.
    ///
    /// A value of 0 uses the default number of threads for rayon.
    #[clap(short, long, global = true, default_value = "0")]
    threads: usize,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Suggest the next guess.
    Suggest {
        /// The guesses so far, as `word:pattern`.
        ///
        /// The pattern has one letter per position: `w` for gray, `m` for yellow and `c` for
        /// green (or `0`, `1` and `2`). For example `crane:wwmcw`.
        rows: Vec<String>,

        /// Never suggest this word. May be given more than once.
        #[clap(short = 'x', long)]
        exclude: Vec<String>,

        /// List this many of the best guesses with their scores.
        #[clap(short = 'n', long)]
        top: Option<usize>,
    },

    /// Precompute the best opening word and the best reply to each of its colorings.
    BuildBook,

    /// Play against known answers and show how many guesses each game took.
    Play {
        /// The answers to play against. Defaults to every word in the word list.
        answers: Vec<String>,

        /// The number of games to run.
        #[clap(short, long)]
        games: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .context("could not start the worker pool")?;

    let selector = selector(&args)?;
    match args.command {
        Command::Suggest { rows, exclude, top } => {
            let grid = parse_grid(&rows)?;
            let excluded: HashSet<String> = exclude.iter().map(|w| w.to_lowercase()).collect();
            match top {
                None => {
                    let word = selector.choose_word(&grid, &excluded);
                    if word == NO_MATCH {
                        bail!("no word in the word list fits that feedback");
                    }
                    println!("{}", word);
                }
                Some(n) => {
                    let ranked = selector.rank(&grid, &excluded);
                    if ranked.is_empty() {
                        bail!("no word in the word list fits that feedback");
                    }
                    for candidate in ranked.into_iter().take(n) {
                        println!(
                            "{} {:>6} {:>10.4}",
                            candidate.word, candidate.score, candidate.goodness
                        );
                    }
                }
            }
        }
        Command::BuildBook => {
            let book = book::build(&selector, &args.book)
                .with_context(|| format!("could not build {}", args.book.display()))?;
            println!("{} entries in {}", book.len(), args.book.display());
        }
        Command::Play { answers, games } => play(&selector, answers, games),
    }
    Ok(())
}

fn selector(args: &Args) -> anyhow::Result<Selector> {
    let blocklist = match &args.blocklist {
        Some(path) => WordList::open(path)
            .with_context(|| format!("could not read block list {}", path.display()))?
            .into_words(),
        None => dictionary::BLOCKLIST.iter().map(|w| w.to_string()).collect(),
    };
    let allowlist = match &args.allowlist {
        Some(path) => WordList::open(path)
            .with_context(|| format!("could not read allow list {}", path.display()))?
            .into_words(),
        None => dictionary::ALLOWLIST.iter().map(|w| w.to_string()).collect(),
    };

    let mut options = Selector::builder();
    options.book = args.book.clone();
    options.use_book = !args.no_book;

    Ok(match &args.words {
        Some(path) => {
            let list = WordList::open(path)
                .with_context(|| format!("could not read word list {}", path.display()))?;
            let pool = WordPool::new(&list, "en", &blocklist, &allowlist)
                .with_context(|| format!("no usable words in {}", path.display()))?;
            options.build(pool, list)
        }
        None => {
            let pool = WordPool::new(&Embedded, "en", &blocklist, &allowlist)
                .context("no usable words in the built-in word list")?;
            options.build(pool, Embedded)
        }
    })
}

fn parse_grid(rows: &[String]) -> anyhow::Result<Grid> {
    let mut grid = Grid::new();
    for row in rows {
        let (word, pattern) = row
            .split_once(':')
            .with_context(|| format!("'{}' should look like word:pattern", row))?;
        let mask = Correctness::parse_mask(pattern)?;
        grid.push(&word.to_lowercase(), mask)
            .with_context(|| format!("could not add '{}'", row))?;
    }
    Ok(grid)
}

fn play(selector: &Selector, answers: Vec<String>, max: Option<usize>) {
    let answers: Vec<String> = if answers.is_empty() {
        selector.pool().iter().collect()
    } else {
        answers.into_iter().map(|a| a.to_lowercase()).collect()
    };

    let w = Wordle::new(selector);
    let mut score = 0;
    let mut games = 0;
    let mut histogram = Vec::new();
    for answer in answers.iter().take(max.unwrap_or(usize::MAX)) {
        if !selector.pool().contains(answer) {
            eprintln!("skipping '{}', which is not in the word list", answer);
            continue;
        }
        if let Some(s) = w.play(answer) {
            games += 1;
            score += s;
            if s >= histogram.len() {
                histogram.extend(std::iter::repeat(0).take(s - histogram.len() + 1));
            }
            histogram[s] += 1;
        } else {
            eprintln!("failed to guess '{}'", answer);
        }
    }
    let sum: usize = histogram.iter().sum();
    for (score, count) in histogram.into_iter().enumerate().skip(1) {
        let frac = count as f64 / sum as f64;
        let w1 = (30.0 * frac).round() as usize;
        let w2 = (30.0 * (1.0 - frac)).round() as usize;
        eprintln!(
            "{:>2}: {}{} ({})",
            score,
            "#".repeat(w1),
            " ".repeat(w2),
            count
        );
    }
    if games > 0 {
        eprintln!("average score: {:.4}", score as f64 / games as f64);
    }
}

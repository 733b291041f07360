use std::collections::HashSet;
use std::io::prelude::*;

const DICTIONARY: &str = include_str!("dictionary.txt");

fn main() {
    println!("cargo:rerun-if-changed=dictionary.txt");

    let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let mut f = std::fs::File::create(out_dir.join("dictionary.rs"))
        .expect("could not create file in OUT_DIR");

    let mut seen = HashSet::new();
    let mut words = Vec::from_iter(
        DICTIONARY
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let (word, count) = line
                    .split_once(' ')
                    .expect("every line is word + space + frequency");
                let count: usize = count.trim().parse().expect("every count is a number");
                (word, count)
            })
            .filter(|&(word, _)| seen.insert(word)),
    );
    words.sort_unstable_by_key(|&(_, count)| std::cmp::Reverse(count));

    writeln!(
        f,
        "pub const DICTIONARY: [(&str, usize); {}] = [",
        words.len()
    )
    .unwrap();
    for &(word, count) in &words {
        writeln!(f, "(\"{}\", {}),", word, count).unwrap();
    }
    writeln!(f, "];").unwrap();

    let mut counts = phf_codegen::Map::new();
    for &(word, count) in &words {
        counts.entry(word, &count.to_string());
    }
    writeln!(
        f,
        "pub static COUNTS: phf::Map<&'static str, usize> = {};",
        counts.build()
    )
    .unwrap();
}

use wordsleuth::{encode, ConstraintSet, Correctness, Grid, WordPool};

// answer,guess,colors
const TESTS: &str = "\
crane,crane,ccccc
crane,slate,wwcwc
stare,crane,wmcwc
beast,crane,wwcwm
abide,speed,wwmwm
roast,toast,wcccc
adieu,audio,cmmmw
";

fn cases() -> impl Iterator<Item = (&'static str, &'static str, [Correctness; 5])> {
    TESTS.lines().map(|line| {
        let mut fields = line.split(',');
        let answer = fields.next().expect("answer");
        let guess = fields.next().expect("guess");
        let result = fields.next().expect("result");
        assert_eq!(fields.count(), 0);
        (answer, guess, Correctness::parse_mask(result).expect("valid pattern"))
    })
}

fn distinct_letters(word: &str) -> bool {
    let mut seen = [false; 26];
    word.bytes()
        .all(|b| !std::mem::replace(&mut seen[(b - b'a') as usize], true))
}

#[test]
fn real_colors() {
    for (answer, guess, result) in cases() {
        assert_eq!(
            Correctness::compute(answer, guess),
            result,
            "guess {} against {}",
            guess,
            answer
        );
    }
}

#[test]
fn answer_fits_its_own_colors() {
    for (answer, guess, result) in cases().filter(|&(_, guess, _)| distinct_letters(guess)) {
        let mut grid = Grid::new();
        grid.push(guess, result).unwrap();
        let cs = ConstraintSet::from_grid(&grid);
        assert!(
            cs.is_consistent(&encode(answer).unwrap()),
            "{} ruled out by {}",
            answer,
            guess
        );
    }
}

#[test]
fn repeated_gray_letter_reads_as_absent() {
    // the second 'e' of "speed" is gray, and nothing has pinned an 'e' down yet
    let mut grid = Grid::new();
    grid.push("speed", Correctness::compute("abide", "speed"))
        .unwrap();
    let cs = ConstraintSet::from_grid(&grid);
    assert!(!cs.is_consistent(&encode("abide").unwrap()));
}

#[test]
fn simulated_feedback_matches_the_grid() {
    // for guesses without repeated letters, simulating feedback yields exactly what a grid
    // filled with the real colors would
    let pool = WordPool::embedded().unwrap();
    let words: Vec<String> = pool.iter().take(60).collect();
    for guess in words.iter().filter(|w| distinct_letters(w)) {
        for answer in &words {
            let mut grid = Grid::new();
            grid.push(guess, Correctness::compute(answer, guess)).unwrap();
            let simulated = ConstraintSet::new()
                .with_feedback(&encode(guess).unwrap(), &encode(answer).unwrap());
            assert_eq!(
                ConstraintSet::from_grid(&grid),
                simulated,
                "guess {} against {}",
                guess,
                answer
            );
        }
    }
}

#[test]
fn simulated_rows_match_simulated_feedback() {
    // unlike the real colors, this holds for repeated letters too
    let pool = WordPool::embedded().unwrap();
    let words: Vec<String> = pool.iter().take(60).collect();
    for guess in &words {
        for answer in &words {
            let mut grid = Grid::new();
            grid.push(guess, Correctness::simulate(answer, guess))
                .unwrap();
            let cs = ConstraintSet::from_grid(&grid);
            let (g, a) = (encode(guess).unwrap(), encode(answer).unwrap());
            assert_eq!(
                cs,
                ConstraintSet::new().with_feedback(&g, &a),
                "guess {} against {}",
                guess,
                answer
            );
            assert!(cs.is_consistent(&a), "{} ruled out by {}", answer, guess);
        }
    }
}

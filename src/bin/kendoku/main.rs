#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused_qualifications)]

use std::fs;
use std::path::Path;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use kendoku::puzzle::Puzzle;

use crate::options::{Generate, Options, Source};

mod options;

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::from_args()?;
    match options.source() {
        Source::File(path) => start_file(&options, path),
        Source::Generate(generate) => start_generate(generate),
    }
}

fn start_file(options: &Options, path: &Path) -> Result<()> {
    let puzzle = Puzzle::from_file(path)?;
    if options.check() {
        puzzle.validate()?;
        println!("Success");
    } else {
        print!("{}", puzzle);
    }
    Ok(())
}

fn start_generate(generate: &Generate) -> Result<()> {
    let mut rng = match generate.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let puzzle = Puzzle::generate(generate.width, &mut rng)?;
    print!("{}", puzzle);
    if let Some(path) = &generate.output_path {
        // the puzzle is fully built in memory; a partial file is never written
        fs::write(path, puzzle.to_string())?;
        println!("Saved puzzle to {}", path.display());
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;

const DEFAULT_PUZZLE_WIDTH: usize = 4;

#[derive(Clone)]
pub(crate) struct Options {
    source: Source,
    check: bool,
}

impl Options {
    pub fn from_args() -> Result<Self> {
        Self::from_arg_matches(&clap_app().get_matches())
    }

    fn from_arg_matches(matches: &ArgMatches<'_>) -> Result<Self> {
        let options = Self {
            source: if let Some(path) = matches.value_of("input") {
                Source::File(path.into())
            } else {
                Source::Generate(Generate {
                    width: matches.value_of("width").map_or(DEFAULT_PUZZLE_WIDTH, |s| {
                        s.parse::<usize>().expect("invalid width")
                    }),
                    seed: matches
                        .value_of("seed")
                        .map(|s| s.parse::<u64>().expect("invalid seed")),
                    output_path: matches.value_of("output").map(PathBuf::from),
                })
            },
            check: matches.is_present("check"),
        };
        Ok(options)
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn check(&self) -> bool {
        self.check
    }
}

#[derive(Clone)]
pub(crate) enum Source {
    File(PathBuf),
    Generate(Generate),
}

#[derive(Clone)]
pub(crate) struct Generate {
    pub width: usize,
    pub seed: Option<u64>,
    pub output_path: Option<PathBuf>,
}

fn clap_app() -> clap::App<'static, 'static> {
    use clap::{App, AppSettings, Arg, ArgGroup};

    App::new("Kendoku")
        .about("Generate and check calcudoku (KenKen) puzzles")
        .setting(AppSettings::ArgRequiredElseHelp)
        .group(
            ArgGroup::with_name("source")
                .args(&["generate", "input"])
                .required(true),
        )
        .arg(
            Arg::with_name("generate")
                .short("g")
                .long("generate")
                .help("generate a calcudoku puzzle")
                .display_order(1),
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .value_name("PATH")
                .help("read a calcudoku puzzle from a file")
                .display_order(1),
        )
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .takes_value(true)
                .value_name("WIDTH")
                .requires("generate")
                .help("set the width and height of the generated puzzle"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .value_name("SEED")
                .requires("generate")
                .help("seed the generator for a reproducible puzzle"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("PATH")
                .requires("generate")
                .help("file to save the generated puzzle"),
        )
        .arg(
            Arg::with_name("check")
                .long("check")
                .requires("input")
                .help("check the puzzle answer against every rule"),
        )
}

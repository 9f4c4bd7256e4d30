//! Generate and check calcudoku (KenKen) puzzles

#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused_qualifications)]

pub mod collections;
pub mod error;
pub mod puzzle;

pub mod square;

pub use self::square::Square;

//! A perfect solver for the board game 'Connect 4'
//!
//! Positions are scored by game tree search: the sign of a score says
//! whether the side to move wins, draws or loses under perfect play, and
//! its magnitude says how early the game ends.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_solver::{Position, Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let position = Position::from_moves("112233")?;
//! let mut solver = Solver::new();
//!
//! // the first player wins with their 4th stone, the fastest win there is
//! assert_eq!(solver.solve(&position, false), 18);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod grid;

pub mod opening_book;

pub mod position;

pub mod solver;

pub mod transposition_table;


pub use grid::{Cell, Grid};
pub use opening_book::OpeningBook;
pub use position::Position;
pub use solver::Solver;
pub use transposition_table::TranspositionTable;

/// The width of the game board in cells
pub const WIDTH: usize = 7;

/// The height of the game board in cells
pub const HEIGHT: usize = 6;

// the board and its sentinel row must fit in a u64
const_assert!(WIDTH * (HEIGHT + 1) < 64);

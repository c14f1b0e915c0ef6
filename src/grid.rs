use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, Print, PrintStyledContent, Stylize},
    QueueableCommand,
};

use std::io::Write;

use crate::{position::Position, HEIGHT, WIDTH};

/// Contents of one board cell
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

/// An explicit cell-by-cell view of a [`Position`]
///
/// The bitboard is the working representation; this grid exists to render a
/// position to a terminal and to check alignments the obvious way, one cell
/// at a time, as a cross-check of the bitwise win detection.
pub struct Grid {
    // left-to-right, bottom-to-top
    cells: [Cell; WIDTH * HEIGHT],
}

impl Grid {
    /// Decodes a position, recovering which side owns each stone from the
    /// move count parity
    pub fn from_position(position: &Position) -> Self {
        // on even move counts the side to move is player one
        let player_one = if position.num_moves() % 2 == 0 {
            position.current()
        } else {
            position.current() ^ position.mask()
        };

        let mut cells = [Cell::Empty; WIDTH * HEIGHT];
        for column in 0..WIDTH {
            for row in 0..HEIGHT {
                let bit = 1u64 << (column * (HEIGHT + 1) + row);
                if position.mask() & bit != 0 {
                    cells[column + WIDTH * row] = if player_one & bit != 0 {
                        Cell::PlayerOne
                    } else {
                        Cell::PlayerTwo
                    };
                }
            }
        }
        Self { cells }
    }

    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.cells[column + WIDTH * row]
    }

    /// Whether a side has four in a row anywhere on the board, by scanning
    /// every window of four cells
    pub fn has_alignment(&self, side: Cell) -> bool {
        const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for column in 0..WIDTH as isize {
            for row in 0..HEIGHT as isize {
                for (dc, dr) in DIRECTIONS {
                    let aligned = (0..4).all(|i| {
                        let (c, r) = (column + i * dc, row + i * dr);
                        c < WIDTH as isize
                            && (0..HEIGHT as isize).contains(&r)
                            && self.cell(c as usize, r as usize) == side
                    });
                    if aligned {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Draws the board with coloured discs, top row first
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        for row in (0..HEIGHT).rev() {
            for column in 0..WIDTH {
                let disc = match self.cell(column, row) {
                    Cell::PlayerOne => style("o").with(Color::Red),
                    Cell::PlayerTwo => style("o").with(Color::Yellow),
                    Cell::Empty => style(".").with(Color::DarkGrey),
                };
                out.queue(PrintStyledContent(disc.attribute(Attribute::Bold)))?;
                out.queue(Print(" "))?;
            }
            out.queue(Print("\n"))?;
        }

        let header: String = (1..=WIDTH).map(|column| format!("{column} ")).collect();
        out.queue(Print(header))?;
        out.queue(Print("\n"))?;
        out.flush()?;
        Ok(())
    }
}

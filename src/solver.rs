//! Game tree search that solves Connect 4 positions exactly

use log::debug;

use crate::{opening_book::OpeningBook, position::Position, transposition_table::*, HEIGHT, WIDTH};

/// The lowest score of a position whose side to move cannot win immediately
pub const MIN_SCORE: i32 = -((WIDTH * HEIGHT) as i32) / 2 + 3;
/// The highest score of a position whose side to move cannot win immediately
pub const MAX_SCORE: i32 = ((WIDTH * HEIGHT) as i32 + 1) / 2 - 3;

/// Columns ordered centre-out; central cells take part in the most
/// alignments and are searched first
pub const COLUMN_ORDER: [usize; WIDTH] = column_order();

const fn column_order() -> [usize; WIDTH] {
    let mut order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        order[i] = if i % 2 == 0 {
            WIDTH / 2 + i / 2
        } else {
            WIDTH / 2 - (i + 1) / 2
        };
        i += 1;
    }
    order
}

/// Ranks the candidate moves of one search node by descending score
///
/// Entries are kept sorted on insertion; with at most `WIDTH` of them an
/// insertion sort beats anything cleverer and the whole sorter lives in the
/// stack frame of its node. Iteration pops the best remaining move, equal
/// scores yielding the later insertion first.
pub(crate) struct MoveSorter {
    size: usize,
    entries: [(u64, i32); WIDTH],
}

impl MoveSorter {
    pub fn new() -> Self {
        Self {
            size: 0,
            entries: [(0, 0); WIDTH],
        }
    }

    pub fn push(&mut self, new_move: u64, score: i32) {
        debug_assert!(self.size < WIDTH);
        let mut pos = self.size;
        self.size += 1;
        while pos != 0 && self.entries[pos - 1].1 > score {
            self.entries[pos] = self.entries[pos - 1];
            pos -= 1;
        }
        self.entries[pos] = (new_move, score);
    }
}

impl Iterator for MoveSorter {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        match self.size {
            0 => None,
            _ => {
                self.size -= 1;
                Some(self.entries[self.size].0)
            }
        }
    }
}

/// A solver for Connect 4 positions
///
/// # Position scoring
/// A position scores positive when the side to move can force a win,
/// negative when it is lost, and 0 when perfect play draws. The magnitude
/// counts the stones the winner still holds when the game ends, so faster
/// wins score higher: winning with the very last stone scores 1, winning
/// with the 4th stone scores 18.
///
/// The *weak* variants of [`solve`] and [`analyze`] only resolve the sign,
/// searching a `(-1, 1)` window instead of the full score range.
///
/// [`solve`]: #method.solve
/// [`analyze`]: #method.analyze
pub struct Solver {
    transposition_table: TranspositionTable,
    opening_book: Option<OpeningBook>,
    node_count: usize,
}

impl Solver {
    pub fn new() -> Self {
        Self {
            transposition_table: TranspositionTable::new(),
            opening_book: None,
            node_count: 0,
        }
    }

    /// Adds an opening book, consulted during search up to its depth
    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.opening_book = Some(book);
        self
    }

    /// Number of nodes visited since the last [`reset`](#method.reset)
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Clears the transposition table and the node counter
    pub fn reset(&mut self) {
        self.transposition_table.reset();
        self.node_count = 0;
    }

    /// Scores a position under perfect play from both sides
    ///
    /// The search runs a sequence of null-window probes, halving the window
    /// of possible scores until it closes. Probe values near 0 are tried
    /// first since most positions resolve close to a draw.
    pub fn solve(&mut self, position: &Position, weak: bool) -> i32 {
        // the recursive search assumes no immediate win exists
        if position.can_win_next() {
            let score = (WIDTH * HEIGHT + 1 - position.num_moves()) as i32 / 2;
            return if weak { score.signum() } else { score };
        }

        let (mut min, mut max) = if weak {
            (-1, 1)
        } else {
            (
                -((WIDTH * HEIGHT - position.num_moves()) as i32) / 2,
                (WIDTH * HEIGHT + 1 - position.num_moves()) as i32 / 2,
            )
        };

        while min < max {
            let mut mid = min + (max - min) / 2;
            if mid <= 0 && min / 2 < mid {
                mid = min / 2;
            } else if mid >= 0 && max / 2 > mid {
                mid = max / 2;
            }
            debug!("score window [{min}, {max}], probing at {mid}");

            // the probe result only tells us which side of mid the true
            // score lies on
            let r = self.negamax(*position, mid, mid + 1);
            if r <= mid {
                max = r;
            } else {
                min = r;
            }
        }
        min
    }

    /// Scores every column of a position
    ///
    /// Unplayable columns yield `None`; an immediately winning column yields
    /// the win score; any other column yields the negated score of the
    /// position it leads to.
    pub fn analyze(&mut self, position: &Position, weak: bool) -> [Option<i32>; WIDTH] {
        let mut scores = [None; WIDTH];
        for (column, score) in scores.iter_mut().enumerate() {
            if position.can_play(column) {
                if position.is_winning_move(column) {
                    *score = Some((WIDTH * HEIGHT + 1 - position.num_moves()) as i32 / 2);
                } else {
                    let mut next = *position;
                    next.play_col(column);
                    *score = Some(-self.solve(&next, weak));
                }
            }
        }
        scores
    }

    /// Alpha-beta negamax over the non-losing moves of a position
    ///
    /// The position must not offer the side to move an immediate win; the
    /// move selection below upholds that for every child.
    fn negamax(&mut self, position: Position, mut alpha: i32, mut beta: i32) -> i32 {
        debug_assert!(alpha < beta);
        debug_assert!(!position.can_win_next());
        self.node_count += 1;

        let non_losing = position.non_losing_moves();
        if non_losing == 0 {
            // every move lets the opponent win
            return -((WIDTH * HEIGHT - position.num_moves()) as i32) / 2;
        }

        if position.num_moves() >= WIDTH * HEIGHT - 2 {
            return 0;
        }

        // no immediate loss is possible, which floors the score
        let min = -((WIDTH * HEIGHT - 2 - position.num_moves()) as i32) / 2;
        if alpha < min {
            alpha = min;
            if alpha >= beta {
                return alpha;
            }
        }

        // no immediate win is possible either, which caps it
        let max = (WIDTH * HEIGHT - 1 - position.num_moves()) as i32 / 2;
        if beta > max {
            beta = max;
            if alpha >= beta {
                return beta;
            }
        }

        let key = position.key();
        let value = self.transposition_table.get(key);
        if value != 0 {
            if value > MAX_SCORE - MIN_SCORE + 1 {
                // lower bound
                let min = value + 2 * MIN_SCORE - MAX_SCORE - 2;
                if alpha < min {
                    alpha = min;
                    if alpha >= beta {
                        return alpha;
                    }
                }
            } else {
                // upper bound
                let max = value + MIN_SCORE - 1;
                if beta > max {
                    beta = max;
                    if alpha >= beta {
                        return beta;
                    }
                }
            }
        }

        if let Some(book) = &self.opening_book {
            let value = book.get(&position);
            if value != 0 {
                return value + MIN_SCORE - 1;
            }
        }

        let mut moves = MoveSorter::new();
        // pushing the weaker edge columns first leaves less sorting work for
        // the stronger central ones
        for i in (0..WIDTH).rev() {
            let candidate = non_losing & Position::column_mask(COLUMN_ORDER[i]);
            if candidate != 0 {
                moves.push(candidate, position.move_score(candidate));
            }
        }

        for move_bit in moves {
            let mut next = position;
            next.play(move_bit);
            // the window flips sign for the opponent
            let score = -self.negamax(next, -beta, -alpha);

            if score >= beta {
                // a perfect opponent avoids this line: lower bound
                self.transposition_table
                    .put(key, (score + MAX_SCORE - 2 * MIN_SCORE + 2) as i8);
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }

        // offset by -MIN_SCORE + 1 so that a stored upper bound is never 0
        self.transposition_table
            .put(key, (alpha - MIN_SCORE + 1) as i8);
        alpha
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

use anyhow::Result;
use clap::Parser;

use connect4_solver::{Grid, OpeningBook, Position, Solver};

use std::io::{stdin, stdout, BufRead};
use std::path::PathBuf;
use std::time::Instant;

/// Scores Connect 4 positions under perfect play
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Position as a string of 1-indexed columns, e.g. "4455"; when omitted,
    /// positions are read from stdin, one per line
    position: Option<String>,

    /// Only resolve win/draw/loss instead of the full score
    #[arg(short, long)]
    weak: bool,

    /// Score every playable column instead of the position itself
    #[arg(short, long)]
    analyze: bool,

    /// Opening book file to probe during search
    #[arg(short, long)]
    book: Option<PathBuf>,

    /// Draw the board before solving
    #[arg(short, long)]
    display: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut solver = Solver::new();
    if let Some(path) = &args.book {
        solver = solver.with_book(OpeningBook::load(path)?);
    }

    if let Some(moves) = &args.position {
        solve_line(&mut solver, moves, &args)
    } else {
        for (number, line) in stdin().lock().lines().enumerate() {
            let line = line?;
            let moves = line.trim();
            if moves.is_empty() {
                continue;
            }
            if let Err(error) = solve_line(&mut solver, moves, &args) {
                eprintln!("line {}: {}", number + 1, error);
            }
        }
        Ok(())
    }
}

fn solve_line(solver: &mut Solver, moves: &str, args: &Args) -> Result<()> {
    let position = Position::from_moves(moves)?;
    if args.display {
        Grid::from_position(&position).render(&mut stdout())?;
    }

    solver.reset();
    let start = Instant::now();

    if args.analyze {
        let scores = solver.analyze(&position, args.weak);
        let scores: Vec<String> = scores
            .iter()
            .map(|score| match score {
                Some(value) => value.to_string(),
                None => "-".to_string(),
            })
            .collect();
        println!(
            "{} {} {} {}",
            moves,
            scores.join(" "),
            solver.node_count(),
            start.elapsed().as_micros()
        );
    } else {
        let score = solver.solve(&position, args.weak);
        println!(
            "{} {} {} {}",
            moves,
            score,
            solver.node_count(),
            start.elapsed().as_micros()
        );
    }
    Ok(())
}

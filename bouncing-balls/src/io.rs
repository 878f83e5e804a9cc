//! Simulation input parsing and result output.
//!
//! Input: grid rows and columns, ball count, step count, then one `row col
//! heading` record per ball with the heading as one of `L R U D`. Output: one
//! `row col heading` line per ball, in input order.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::{Ball, Coord, Direction, Grid};

/// A fully parsed simulation setup, replicated to every worker.
#[derive(Clone, Debug)]
pub struct Setup {
    pub grid: Grid,
    pub steps: u32,
    pub balls: Vec<Ball>,
}

impl Setup {
    pub fn read(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut tokens = text.split_ascii_whitespace();

        let rows = number(&mut tokens, "row count")?;
        let cols = number(&mut tokens, "column count")?;
        if rows == 0 || cols == 0 {
            return Err(Error::Parse("the grid must have at least one cell".to_string()));
        }
        let ball_count = number(&mut tokens, "ball count")?;
        let steps = number(&mut tokens, "step count")?;

        let mut balls = Vec::with_capacity(ball_count as usize);
        for _ in 0..ball_count {
            let row = number(&mut tokens, "ball row")?;
            let col = number(&mut tokens, "ball column")?;
            if row >= rows || col >= cols {
                return Err(Error::Parse(format!("ball at ({row}, {col}) is off the grid")));
            }
            let token = next(&mut tokens, "ball heading")?;
            let dir = token
                .chars()
                .next()
                .filter(|_| token.len() == 1)
                .and_then(Direction::from_symbol)
                .ok_or_else(|| Error::Parse(format!("bad heading: {token:?}")))?;
            balls.push(Ball { row: row as Coord, col: col as Coord, dir });
        }

        Ok(Setup { grid: Grid { rows, cols }, steps, balls })
    }
}

fn next<'a>(tokens: &mut std::str::SplitAsciiWhitespace<'a>, what: &str) -> Result<&'a str, Error> {
    tokens.next().ok_or_else(|| Error::Parse(format!("missing {what}")))
}

fn number(tokens: &mut std::str::SplitAsciiWhitespace<'_>, what: &str) -> Result<u32, Error> {
    let token = next(tokens, what)?;
    token.parse().map_err(|_| Error::Parse(format!("{what} is not a number: {token:?}")))
}

/// Writes one `row col heading` line per ball.
pub fn write_balls(path: &Path, balls: &[Ball]) -> Result<(), Error> {
    let mut text = String::new();
    for ball in balls {
        writeln!(text, "{} {} {}", ball.row, ball.col, ball.dir.symbol())
            .expect("writing to a string cannot fail");
    }
    fs::write(path, text).map_err(|source| Error::Write { path: path.to_path_buf(), source })
}

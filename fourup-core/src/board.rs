//! Board grid with gravity drops and four-in-a-row detection

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Board height
pub const ROWS: usize = 6;

/// Board width
pub const COLS: usize = 7;

/// Owner of an occupied cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Token {
    Host,
    Challenger,
}

impl Token {
    pub fn opponent(self) -> Self {
        match self {
            Token::Host => Token::Challenger,
            Token::Challenger => Token::Host,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Token::Host => "host",
            Token::Challenger => "challenger",
        }
    }
}

/// One cell of the grid
///
/// Wire shape: the number `0` for an empty cell, the role string
/// (`"host"` / `"challenger"`) for an occupied one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Host,
    Challenger,
}

impl Cell {
    pub fn token(self) -> Option<Token> {
        match self {
            Cell::Empty => None,
            Cell::Host => Some(Token::Host),
            Cell::Challenger => Some(Token::Challenger),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Token> for Cell {
    fn from(token: Token) -> Self {
        match token {
            Token::Host => Cell::Host,
            Token::Challenger => Cell::Challenger,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_u64(0),
            Cell::Host => serializer.serialize_str("host"),
            Cell::Challenger => serializer.serialize_str("challenger"),
        }
    }
}

struct CellVisitor;

impl Visitor<'_> for CellVisitor {
    type Value = Cell;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("0, \"host\" or \"challenger\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Cell, E> {
        match v {
            0 => Ok(Cell::Empty),
            other => Err(E::custom(format!("invalid cell number {other}"))),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Cell, E> {
        match v {
            0 => Ok(Cell::Empty),
            other => Err(E::custom(format!("invalid cell number {other}"))),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Cell, E> {
        match v {
            "host" => Ok(Cell::Host),
            "challenger" => Ok(Cell::Challenger),
            other => Err(E::custom(format!("invalid cell tag {other:?}"))),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellVisitor)
    }
}

/// 6x7 grid, row 0 at the top, row 5 at the bottom
///
/// Invariant: occupied cells form a contiguous stack from the bottom of
/// each column upward. Stored row-major, so the wire shape is an array of
/// 6 arrays of 7 cell values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an all-empty grid
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Drop a token into a column
    ///
    /// Scans the column from the bottom row upward and fills the first
    /// empty cell. A full column is a silent no-op returning false, and so
    /// is an out-of-range column; the board is left untouched either way.
    pub fn drop_token(&mut self, column: usize, token: Token) -> bool {
        if column >= COLS {
            return false;
        }
        for row in (0..ROWS).rev() {
            if self.cells[row][column].is_empty() {
                self.cells[row][column] = Cell::from(token);
                return true;
            }
        }
        false
    }

    /// Find the winner, if any line of four exists
    ///
    /// Rows are checked first, then columns, then both diagonal
    /// orientations band by band from the bottom of the grid upward. The
    /// first match under that order wins; a board with no line (including
    /// a full drawn board) is None.
    pub fn score(&self) -> Option<Token> {
        self.score_rows()
            .or_else(|| self.score_columns())
            .or_else(|| self.score_diagonals())
    }

    fn score_rows(&self) -> Option<Token> {
        for row in 0..ROWS {
            for col in 3..COLS {
                let cell = self.cells[row][col];
                if !cell.is_empty()
                    && self.cells[row][col - 3] == cell
                    && self.cells[row][col - 2] == cell
                    && self.cells[row][col - 1] == cell
                {
                    return cell.token();
                }
            }
        }
        None
    }

    fn score_columns(&self) -> Option<Token> {
        for col in 0..COLS {
            for row in 3..ROWS {
                let cell = self.cells[row][col];
                if !cell.is_empty()
                    && self.cells[row - 3][col] == cell
                    && self.cells[row - 2][col] == cell
                    && self.cells[row - 1][col] == cell
                {
                    return cell.token();
                }
            }
        }
        None
    }

    fn score_diagonals(&self) -> Option<Token> {
        // Row starts are limited to bands where a 4-long diagonal fits on
        // the grid; both orientations are checked within the same window
        // before advancing.
        for row in (0..=ROWS - 4).rev() {
            for col in 3..COLS {
                let up_right = self.cells[row][col];
                if !up_right.is_empty()
                    && self.cells[row + 3][col - 3] == up_right
                    && self.cells[row + 2][col - 2] == up_right
                    && self.cells[row + 1][col - 1] == up_right
                {
                    return up_right.token();
                }
                let up_left = self.cells[row + 3][col];
                if !up_left.is_empty()
                    && self.cells[row + 2][col - 1] == up_left
                    && self.cells[row + 1][col - 2] == up_left
                    && self.cells[row][col - 3] == up_left
                {
                    return up_left.token();
                }
            }
        }
        None
    }

    /// True once every column is topped out
    ///
    /// The engine reports a drawn full board as `score() == None`; callers
    /// that want to distinguish a draw from an ongoing game check this.
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|cell| !cell.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, cells: &[(usize, usize)], token: Token) {
        for &(row, col) in cells {
            board.cells[row][col] = Cell::from(token);
        }
    }

    #[test]
    fn test_empty_board_has_no_score() {
        assert_eq!(Board::new().score(), None);
    }

    #[test]
    fn test_horizontal_victory() {
        let mut b = Board::new();
        place(&mut b, &[(5, 0), (5, 1), (5, 2), (5, 3)], Token::Host);
        assert_eq!(b.score(), Some(Token::Host));
    }

    #[test]
    fn test_no_horizontal_victory() {
        let mut b = Board::new();
        place(&mut b, &[(5, 0), (5, 1), (5, 3)], Token::Host);
        assert_eq!(b.score(), None);
    }

    #[test]
    fn test_broken_row_by_opponent() {
        let mut b = Board::new();
        place(&mut b, &[(5, 0), (5, 1), (5, 3)], Token::Host);
        place(&mut b, &[(5, 2)], Token::Challenger);
        assert_eq!(b.score(), None);
    }

    #[test]
    fn test_vertical_victory() {
        let mut b = Board::new();
        place(&mut b, &[(5, 0), (4, 0), (3, 0), (2, 0)], Token::Challenger);
        assert_eq!(b.score(), Some(Token::Challenger));
    }

    #[test]
    fn test_no_vertical_victory() {
        let mut b = Board::new();
        place(&mut b, &[(5, 0), (3, 0), (2, 0)], Token::Host);
        assert_eq!(b.score(), None);
    }

    #[test]
    fn test_diagonal_right_victory() {
        let mut b = Board::new();
        place(&mut b, &[(5, 0), (4, 1), (3, 2), (2, 3)], Token::Host);
        assert_eq!(b.score(), Some(Token::Host));
    }

    #[test]
    fn test_diagonal_left_victory() {
        let mut b = Board::new();
        place(&mut b, &[(2, 0), (3, 1), (4, 2), (5, 3)], Token::Host);
        assert_eq!(b.score(), Some(Token::Host));
    }

    #[test]
    fn test_no_diagonal_victory() {
        let mut b = Board::new();
        place(&mut b, &[(5, 0), (4, 1), (3, 2), (2, 2)], Token::Host);
        assert_eq!(b.score(), None);
    }

    #[test]
    fn test_diagonal_in_top_band() {
        let mut b = Board::new();
        place(&mut b, &[(3, 3), (2, 4), (1, 5), (0, 6)], Token::Challenger);
        assert_eq!(b.score(), Some(Token::Challenger));
    }

    #[test]
    fn test_drop_fills_bottom_to_top() {
        let mut b = Board::new();
        for expected_row in (0..ROWS).rev() {
            assert!(b.drop_token(3, Token::Host));
            assert_eq!(b.cell(expected_row, 3), Cell::Host);
        }
    }

    #[test]
    fn test_drop_into_full_column_is_a_noop() {
        let mut b = Board::new();
        for _ in 0..ROWS {
            assert!(b.drop_token(0, Token::Host));
        }
        let before = b.clone();
        assert!(!b.drop_token(0, Token::Challenger));
        assert_eq!(b, before);
    }

    #[test]
    fn test_drop_out_of_range_is_a_noop() {
        let mut b = Board::new();
        assert!(!b.drop_token(COLS, Token::Host));
        assert_eq!(b, Board::new());
    }

    #[test]
    fn test_wire_shape() {
        let mut b = Board::new();
        b.drop_token(0, Token::Host);
        b.drop_token(1, Token::Challenger);
        let json = serde_json::to_value(&b).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), ROWS);
        assert_eq!(rows[0].as_array().unwrap().len(), COLS);
        assert_eq!(rows[5][0], "host");
        assert_eq!(rows[5][1], "challenger");
        assert_eq!(rows[5][2], 0);

        let back: Board = serde_json::from_value(json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn test_full_board_without_line_is_a_draw() {
        let mut b = Board::new();
        // Even columns stack HHCCHH bottom-up, odd columns the inverse;
        // every 4-window in every direction stays mixed.
        for col in 0..COLS {
            for row in 0..ROWS {
                let height = ROWS - 1 - row;
                let host = (height % 4 < 2) != (col % 2 == 1);
                let token = if host { Token::Host } else { Token::Challenger };
                b.cells[row][col] = Cell::from(token);
            }
        }
        assert!(b.is_full());
        assert_eq!(b.score(), None);
    }
}

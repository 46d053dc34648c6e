// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The canonical column names produced by role detection.
///
/// Detection renames matched source columns to these names; every
/// derivation stage looks its inputs up by these names and skips itself
/// when they are absent.
pub mod fields {
    pub const STATE: &str = "State";
    pub const CONSTITUENCY: &str = "Constituency";
    pub const CANDIDATE: &str = "Candidate";
    pub const PARTY: &str = "Party";
    pub const GENDER: &str = "Gender";
    pub const VOTES: &str = "Votes";
    pub const TOTAL_VOTES: &str = "Total_Votes";
    pub const YEAR: &str = "Year";
    pub const VOTE_SHARE: &str = "Vote_Share";
    pub const RANK: &str = "Rank";
    pub const WINNER: &str = "Winner";
    pub const SECOND_VOTES: &str = "Second_Votes";
    pub const WINNING_MARGIN: &str = "Winning_Margin";
}

/// A single cell of a table.
///
/// Freshly ingested tables only contain `Text` and `Null` cells; the
/// derivation stages introduce the typed variants. `Null` is also the
/// explicit marker for undefined derived values (a vote share with a zero
/// denominator, a margin without a runner-up).
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// Field values that ingest as missing, so that a votes column with the
// odd "N/A" entry still classifies as numeric-valued.
const NA_MARKERS: [&str; 9] = [
    "", "N/A", "n/a", "NA", "NaN", "nan", "NULL", "null", "None",
];

impl Cell {
    /// A cell parsed from a raw text field: empty fields and the common
    /// not-available markers map to `Null`.
    pub fn from_field(s: &str) -> Cell {
        if NA_MARKERS.contains(&s) {
            Cell::Null
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// True for cells that count towards the numeric-valued column class.
    /// Null cells are skipped by the classification, not counted here.
    pub(crate) fn is_numeric(&self) -> bool {
        match self {
            Cell::Int(_) | Cell::Float(_) => true,
            // A boolean column stays in the numeric class so that a winner
            // flag on an already-derived table cannot shift the positions
            // of the text columns.
            Cell::Bool(_) => true,
            Cell::Text(s) => s.trim().parse::<f64>().is_ok(),
            Cell::Null => false,
        }
    }

    /// The numeric value of the cell, if it has one.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(x) => Some(*x as f64),
            Cell::Float(x) => Some(*x),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Bool(_) | Cell::Null => None,
        }
    }

    /// The integer value of the cell, truncating a fractional part.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(x) => Some(*x),
            Cell::Float(x) if x.is_finite() => Some(*x as i64),
            Cell::Float(_) => None,
            Cell::Text(s) => {
                let t = s.trim();
                t.parse::<i64>()
                    .ok()
                    .or_else(|| t.parse::<f64>().ok().filter(|x| x.is_finite()).map(|x| x as i64))
            }
            Cell::Bool(_) | Cell::Null => None,
        }
    }

    /// The textual form of the cell, as written back to delimited output.
    /// `Null` renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(x) => x.to_string(),
            Cell::Float(x) => x.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Null => String::new(),
        }
    }
}

/// A named column and its cells, in row order.
#[derive(PartialEq, Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: &str, cells: Vec<Cell>) -> Column {
        Column {
            name: name.to_string(),
            cells,
        }
    }
}

/// An in-memory table: an ordered sequence of equal-length columns.
///
/// Tables are immutable once built. Every derivation stage consumes a
/// reference and returns a new table, so the caller's data is never
/// mutated in place.
#[derive(PartialEq, Debug, Clone)]
pub struct Table {
    pub(crate) columns: Vec<Column>,
}

impl Table {
    /// Builds a table from columns, checking that all columns have the
    /// same number of cells.
    pub fn new(columns: Vec<Column>) -> Result<Table, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.cells.len();
            for c in columns.iter() {
                if c.cells.len() != expected {
                    return Err(TableError::ColumnLengthMismatch {
                        column: c.name.clone(),
                        expected,
                        actual: c.cells.len(),
                    });
                }
            }
        }
        Ok(Table { columns })
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The columns, in their original left-to-right order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The first column with this name, if any.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// A copy of this table with one column replaced (by name) or
    /// appended if no column has that name yet.
    pub fn with_column(&self, column: Column) -> Table {
        let mut columns = self.columns.clone();
        match columns.iter_mut().find(|c| c.name == column.name) {
            Some(slot) => *slot = column,
            None => columns.push(column),
        }
        Table { columns }
    }

    /// The cell at (row, column name), if the column exists.
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        self.column(name).and_then(|c| c.cells.get(row))
    }
}

/// Structural errors when assembling a table.
///
/// The derivation pipeline itself has no fatal paths: missing canonical
/// columns skip stages and unparseable cells coerce to defaults.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TableError {
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    RowWidthMismatch {
        expected: usize,
        actual: usize,
    },
    DuplicateColumn(String),
}

impl Error for TableError {}

impl Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::ColumnLengthMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "column {:?} has {} cells, expected {}",
                column, actual, expected
            ),
            TableError::RowWidthMismatch { expected, actual } => {
                write!(f, "row has {} cells, expected {}", actual, expected)
            }
            TableError::DuplicateColumn(name) => {
                write!(f, "duplicate column name {:?}", name)
            }
        }
    }
}

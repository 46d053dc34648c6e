pub use crate::config::*;

/// A builder for assembling tables row by row.
///
/// This is the entry point when the data does not come from a delimited
/// file (tests, programmatic callers).
///
/// ```
/// pub use election_table::builder::Builder;
/// # use election_table::TableError;
///
/// let mut builder = Builder::new()
///     .columns(&["candidate".to_string(), "votes".to_string()])?;
///
/// builder.add_text_row(&["Anna".to_string(), "120".to_string()])?;
/// builder.add_text_row(&["Bob".to_string(), "".to_string()])?;
///
/// let table = builder.build();
/// assert_eq!(table.num_rows(), 2);
///
/// # Ok::<(), TableError>(())
/// ```
pub struct Builder {
    pub(crate) _columns: Vec<Column>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _columns: Vec::new(),
        }
    }

    /// Declares the column names, in left-to-right order.
    pub fn columns(self, names: &[String]) -> Result<Builder, TableError> {
        let mut columns: Vec<Column> = Vec::new();
        for name in names {
            if columns.iter().any(|c| c.name == *name) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
            columns.push(Column::new(name, Vec::new()));
        }
        Ok(Builder { _columns: columns })
    }

    /// Adds a row of raw text fields, in column order. Empty fields and
    /// not-available markers are recorded as null cells, which is the
    /// convention of the ingestion path.
    pub fn add_text_row(&mut self, fields: &[String]) -> Result<(), TableError> {
        let cells: Vec<Cell> = fields.iter().map(|s| Cell::from_field(s)).collect();
        self.add_row(&cells)
    }

    /// Adds a row of already-typed cells, in column order.
    pub fn add_row(&mut self, cells: &[Cell]) -> Result<(), TableError> {
        if cells.len() != self._columns.len() {
            return Err(TableError::RowWidthMismatch {
                expected: self._columns.len(),
                actual: cells.len(),
            });
        }
        for (column, cell) in self._columns.iter_mut().zip(cells.iter()) {
            column.cells.push(cell.clone());
        }
        Ok(())
    }

    pub fn build(self) -> Table {
        // Rows are always added across all columns, so the lengths agree.
        Table {
            columns: self._columns,
        }
    }
}

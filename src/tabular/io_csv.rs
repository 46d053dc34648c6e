// Primitives for reading and writing delimited tables.

use std::fs::File;
use std::io;

use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use snafu::prelude::*;

use election_table::{Cell, Column, Table};

use crate::tabular::*;

pub fn read_table(path: &str, delimiter: u8) -> TabularResult<Table> {
    let file = File::open(path).context(OpeningFileSnafu { path })?;
    read_table_from(file, delimiter)
}

/// Reads a delimited table from any byte stream. The first record is the
/// header row; every field is ingested as raw text, with empty fields and
/// not-available markers recorded as null cells. Ragged rows and encoding
/// problems surface as ingestion errors, the only fatal path of the program.
pub fn read_table_from<R: io::Read>(input: R, delimiter: u8) -> TabularResult<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(input);
    let headers = rdr.headers().context(CsvParseSnafu {})?.clone();
    ensure!(!headers.is_empty(), EmptyInputSnafu);

    let mut columns: Vec<Column> = headers.iter().map(|h| Column::new(h, Vec::new())).collect();
    for record in rdr.records() {
        let record = record.context(CsvParseSnafu {})?;
        for (idx, field) in record.iter().enumerate() {
            if let Some(column) = columns.get_mut(idx) {
                column.cells.push(Cell::from_field(field));
            }
        }
    }
    debug!(
        "read_table_from: parsed {} columns: {:?}",
        columns.len(),
        columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
    );
    Table::new(columns).map_err(|e| {
        MalformedTableSnafu {
            message: e.to_string(),
        }
        .build()
    })
}

/// Renders a table back to delimited UTF-8 text with a header row. Null
/// cells become empty fields, booleans `true`/`false`.
pub fn write_table_string(table: &Table, delimiter: u8) -> TabularResult<String> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    wtr.write_record(&names).context(CsvWriteSnafu {})?;
    for row in 0..table.num_rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.cells[row].render())
            .collect();
        wtr.write_record(&record).context(CsvWriteSnafu {})?;
    }
    let bytes = match wtr.into_inner() {
        Ok(b) => b,
        Err(e) => whatever!("Failed to flush the output buffer: {}", e),
    };
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => whatever!("The rendered output is not valid UTF-8: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_ingest_as_null() {
        let data = "a,b\n1,\n,x\n";
        let table = read_table_from(data.as_bytes(), b',').unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.cell(0, "a"), Some(&Cell::Text("1".to_string())));
        assert_eq!(table.cell(0, "b"), Some(&Cell::Null));
        assert_eq!(table.cell(1, "a"), Some(&Cell::Null));
        assert_eq!(table.cell(1, "b"), Some(&Cell::Text("x".to_string())));
    }

    #[test]
    fn null_cells_render_as_empty_fields() {
        let table = Table::new(vec![
            Column::new("a", vec![Cell::Int(1), Cell::Null]),
            Column::new("b", vec![Cell::Null, Cell::Bool(true)]),
        ])
        .unwrap();
        let rendered = write_table_string(&table, b',').unwrap();
        assert_eq!(rendered, "a,b\n1,\n,true\n");
    }

    #[test]
    fn alternate_delimiters_round_trip() {
        let data = "a;b\nx;1\n";
        let table = read_table_from(data.as_bytes(), b';').unwrap();
        let rendered = write_table_string(&table, b';').unwrap();
        assert_eq!(rendered, data);
    }

    #[test]
    fn ragged_rows_are_ingestion_errors() {
        let data = "a,b\n1\n";
        let res = read_table_from(data.as_bytes(), b',');
        assert!(matches!(res, Err(TabularError::CsvParse { .. })));
    }

    #[test]
    fn empty_input_is_an_ingestion_error() {
        let res = read_table_from("".as_bytes(), b',');
        assert!(matches!(res, Err(TabularError::EmptyInput { .. })));
    }
}

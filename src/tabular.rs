use log::{info, warn};

use election_table::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde::Serialize;
use text_diff::print_diff;

use crate::args::Args;

pub mod io_csv;

#[derive(Debug, Snafu)]
pub enum TabularError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the delimited input"))]
    CsvParse { source: csv::Error },
    #[snafu(display("The input has no header row"))]
    EmptyInput {},
    #[snafu(display("Error rendering the derived table"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error writing output to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Malformed table: {message}"))]
    MalformedTable { message: String },
    #[snafu(display("Error serializing the summary"))]
    SerializingSummary { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TabularResult<T> = Result<T, TabularError>;

/// One line of the JSON digest: the winner row of a single contest.
#[derive(Debug, Clone, Serialize)]
pub struct ContestSummary {
    pub year: String,
    pub constituency: String,
    pub winner: Option<String>,
    pub party: Option<String>,
    pub votes: Option<i64>,
    pub winning_margin: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElectionSummary {
    pub num_rows: usize,
    pub num_contests: usize,
    pub total_votes_polled: Option<i64>,
    // Summed over every candidate row, like the votes total.
    pub total_electors: Option<i64>,
    pub contests: Vec<ContestSummary>,
}

/// Collects the winner row of every contest from a derived table.
///
/// Like the derivation stages, this degrades gracefully: on a table where
/// ranking was skipped there are no contests to report, and the vote total
/// is only present when a Votes column was detected.
pub fn build_summary(table: &Table) -> ElectionSummary {
    let total_votes_polled: Option<i64> = table
        .column(fields::VOTES)
        .map(|c| c.cells.iter().map(|x| x.to_i64().unwrap_or(0)).sum());
    let total_electors: Option<i64> = table
        .column(fields::TOTAL_VOTES)
        .map(|c| c.cells.iter().map(|x| x.to_i64().unwrap_or(0)).sum());

    let mut contests: Vec<ContestSummary> = Vec::new();
    if let Some(winner_col) = table.column(fields::WINNER) {
        for (row, w) in winner_col.cells.iter().enumerate() {
            if *w != Cell::Bool(true) {
                continue;
            }
            contests.push(ContestSummary {
                year: table
                    .cell(row, fields::YEAR)
                    .map(|c| c.render())
                    .unwrap_or_default(),
                constituency: table
                    .cell(row, fields::CONSTITUENCY)
                    .map(|c| c.render())
                    .unwrap_or_default(),
                winner: table.cell(row, fields::CANDIDATE).map(|c| c.render()),
                party: table.cell(row, fields::PARTY).map(|c| c.render()),
                votes: table.cell(row, fields::VOTES).and_then(|c| c.to_i64()),
                winning_margin: table
                    .cell(row, fields::WINNING_MARGIN)
                    .and_then(|c| c.to_i64()),
            });
        }
    }
    ElectionSummary {
        num_rows: table.num_rows(),
        num_contests: contests.len(),
        total_votes_polled,
        total_electors,
        contests,
    }
}

/// Runs the full command: ingest the delimited file, derive, write the
/// output, and optionally emit the JSON summary and check the result
/// against a reference file.
pub fn run_pipeline(args: &Args) -> TabularResult<()> {
    let delimiter = match args.delimiter {
        Some(c) if c.is_ascii() => c as u8,
        Some(c) => whatever!("The delimiter must be a single ASCII character, got {:?}", c),
        None => b',',
    };

    let table = io_csv::read_table(&args.input, delimiter)?;
    info!(
        "run_pipeline: loaded {} rows, {} columns from {}",
        table.num_rows(),
        table.num_columns(),
        args.input
    );

    let derived = derive_results(&table);
    let rendered = io_csv::write_table_string(&derived, delimiter)?;

    match &args.out {
        Some(path) => {
            fs::write(path, &rendered).context(WritingOutputSnafu { path })?;
            info!("run_pipeline: wrote derived table to {}", path);
        }
        None => {
            print!("{}", rendered);
        }
    }

    if args.summary {
        let summary = build_summary(&derived);
        let js = serde_json::to_string_pretty(&summary).context(SerializingSummarySnafu {})?;
        println!("{}", js);
    }

    // The reference output, if provided for comparison
    if let Some(ref_path) = &args.reference {
        let reference = fs::read_to_string(ref_path).context(OpeningFileSnafu { path: ref_path })?;
        if reference != rendered {
            warn!("Found differences with the reference file");
            print_diff(reference.as_str(), rendered.as_str(), "\n");
            whatever!("Difference detected between the derived output and the reference file");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
st_name,pc_name,cand_name,partyname,totvotpoll,electors,year
Kerala,Alappuzha,Anna,P1,1000,2000,2019
Kerala,Alappuzha,Bob,P2,800,2000,2019
Kerala,Ernakulam,Clara,P3,500,1000,2019
";

    #[test]
    fn end_to_end_csv_derivation() {
        let table = io_csv::read_table_from(SAMPLE.as_bytes(), b',').unwrap();
        let derived = derive_results(&table);
        let rendered = io_csv::write_table_string(&derived, b',').unwrap();
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next(),
            Some(
                "State,Constituency,Candidate,Party,Votes,Total_Votes,Year,\
                 Vote_Share,Rank,Winner,Second_Votes,Winning_Margin"
            )
        );
        assert_eq!(
            lines.next(),
            Some("Kerala,Alappuzha,Anna,P1,1000,2000,2019,50,1,true,800,200")
        );
        assert_eq!(
            lines.next(),
            Some("Kerala,Alappuzha,Bob,P2,800,2000,2019,40,2,false,800,")
        );
        assert_eq!(
            lines.next(),
            Some("Kerala,Ernakulam,Clara,P3,500,1000,2019,50,1,true,,")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn summary_reports_contest_winners() {
        let table = io_csv::read_table_from(SAMPLE.as_bytes(), b',').unwrap();
        let derived = derive_results(&table);
        let summary = build_summary(&derived);
        assert_eq!(summary.num_rows, 3);
        assert_eq!(summary.num_contests, 2);
        assert_eq!(summary.total_votes_polled, Some(2300));
        assert_eq!(summary.total_electors, Some(5000));
        assert_eq!(summary.contests[0].winner.as_deref(), Some("Anna"));
        assert_eq!(summary.contests[0].constituency, "Alappuzha");
        assert_eq!(summary.contests[0].winning_margin, Some(200));
        assert_eq!(summary.contests[1].winner.as_deref(), Some("Clara"));
        // Single-candidate contest: the margin stays undefined.
        assert_eq!(summary.contests[1].winning_margin, None);
    }

    #[test]
    fn summary_degrades_on_undetected_tables() {
        let table = io_csv::read_table_from("a,b\nx,y\n".as_bytes(), b',').unwrap();
        let derived = derive_results(&table);
        let summary = build_summary(&derived);
        assert_eq!(summary.num_rows, 1);
        assert_eq!(summary.num_contests, 0);
        assert_eq!(summary.total_votes_polled, None);
        assert!(summary.contests.is_empty());
    }

    #[test]
    fn summary_serializes_nulls_as_json_null() {
        let table = io_csv::read_table_from(SAMPLE.as_bytes(), b',').unwrap();
        let derived = derive_results(&table);
        let summary = build_summary(&derived);
        let js = serde_json::to_string(&summary).unwrap();
        assert!(js.contains("\"winning_margin\":null"));
        assert!(js.contains("\"total_votes_polled\":2300"));
    }
}

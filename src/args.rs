use clap::Parser;

/// Normalizes a delimited election-results table and derives per-contest
/// rankings, winners and margins.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The delimited text file containing the election results. A header row is
    /// required; column names and order are data-dependent, the roles are detected from the
    /// content.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (file path or empty) If specified, the derived table is written in delimited UTF-8 text
    /// to the given location. Otherwise it is printed to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected derived table. If provided,
    /// electable will check that the produced output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (single character, default ',') The field delimiter of the input file. The output uses
    /// the same delimiter.
    #[clap(long, value_parser)]
    pub delimiter: Option<char>,

    /// If passed as an argument, prints a JSON summary of every contest (winner, party, votes,
    /// margin) to the standard output.
    #[clap(long, takes_value = false)]
    pub summary: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

/*!

# Quick start

`election_table` normalizes an arbitrarily-shaped election-results table
into a canonical schema and derives per-contest statistics. The input is
any table with a header row; the engine classifies each column as
numeric-valued or text-valued and maps them to canonical roles by
position: the first four text columns become `State`, `Constituency`,
`Candidate` and `Party` (a fifth becomes `Gender`), and the first three
numeric columns become `Votes`, `Total_Votes` and `Year`.

From there the engine derives, per row:

* `Vote_Share` — votes as a percentage of the contest total,
* `Rank` — position within the (`Year`, `Constituency`) contest, 1 being
  the most votes, ties broken by input order,
* `Winner` — true on the rank-1 row,
* `Second_Votes` — the runner-up's votes, repeated on every row of the
  contest,
* `Winning_Margin` — winner's votes minus the runner-up's, on the winner
  row only.

Columns that cannot be mapped are passed through untouched, and any
derivation whose inputs are missing is skipped rather than failing.

## Using the library

```
use election_table::builder::Builder;
use election_table::{derive_results, fields, Cell};
# use election_table::TableError;

let mut builder = Builder::new().columns(&[
    "state".to_string(),
    "constituency".to_string(),
    "candidate".to_string(),
    "party".to_string(),
    "votes".to_string(),
    "electors".to_string(),
    "year".to_string(),
])?;
builder.add_text_row(&[
    "Kerala".to_string(), "Alappuzha".to_string(), "Anna".to_string(),
    "P1".to_string(), "1000".to_string(), "2000".to_string(), "2019".to_string(),
])?;
builder.add_text_row(&[
    "Kerala".to_string(), "Alappuzha".to_string(), "Bob".to_string(),
    "P2".to_string(), "800".to_string(), "2000".to_string(), "2019".to_string(),
])?;

let derived = derive_results(&builder.build());
assert_eq!(derived.cell(0, fields::WINNING_MARGIN), Some(&Cell::Int(200)));
# Ok::<(), TableError>(())
```

## Using the command line

The `electable` binary wraps the same pipeline for delimited text files:

```bash
electable -i results.csv -o results_derived.csv --summary
```

`--summary` prints a JSON digest of each contest (winner, party, votes,
margin). `--reference <file>` compares the derived output against a
reference file and reports a diff on mismatch.

*/

mod config;
use log::{debug, info};

use std::cmp::Ordering;
use std::collections::HashMap;

pub mod builder;
pub mod quick_start;

pub use crate::config::*;

// **** Private structures ****

// A contest is identified by the rendered forms of its Year and
// Constituency cells, so Text("2020") and Int(2020) land in the same
// group.
type GroupKey = (String, String);

/// Runs the full normalization and derivation pipeline over a raw table.
///
/// The pipeline has five ordered stages: role detection (with header
/// normalization), numeric coercion, vote share, grouped rank/winner, and
/// runner-up margins. Each stage is gated on the presence of the canonical
/// columns it needs and is skipped, without error, when one is absent. The
/// input table is never mutated; a new table is returned with the same row
/// count and the renamed/derived columns attached.
pub fn derive_results(table: &Table) -> Table {
    info!(
        "derive_results: processing table with {} rows, {} columns",
        table.num_rows(),
        table.num_columns()
    );
    let t = normalize_headers(table);
    let t = detect_roles(&t);
    let t = coerce_vote_columns(&t);
    let t = compute_vote_share(&t);
    let t = rank_contests(&t);
    let t = attach_margins(&t);
    info!(
        "derive_results: derived table has {} columns",
        t.num_columns()
    );
    t
}

/// Standardizes the header row: trims whitespace, lowercases, and replaces
/// spaces with underscores.
pub fn normalize_headers(table: &Table) -> Table {
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .map(|c| {
            let name = c.name.trim().to_lowercase().replace(' ', "_");
            Column::new(&name, c.cells.clone())
        })
        .collect();
    Table { columns }
}

/// Partitions columns into numeric-valued and text-valued classes
/// (preserving the original left-to-right order within each class) and
/// renames them to canonical fields by positional priority: the first
/// five text columns become State, Constituency, Candidate, Party and
/// Gender; the first three numeric columns become Votes, Total_Votes and
/// Year. Unmatched columns pass through untouched, and roles without a
/// matching column are simply absent downstream.
pub fn detect_roles(table: &Table) -> Table {
    const TEXT_ROLES: [&str; 5] = [
        fields::STATE,
        fields::CONSTITUENCY,
        fields::CANDIDATE,
        fields::PARTY,
        fields::GENDER,
    ];
    const NUMERIC_ROLES: [&str; 3] = [fields::VOTES, fields::TOTAL_VOTES, fields::YEAR];

    let mut numeric_idx: Vec<usize> = Vec::new();
    let mut text_idx: Vec<usize> = Vec::new();
    for (idx, col) in table.columns().iter().enumerate() {
        if is_numeric_column(col) {
            numeric_idx.push(idx);
        } else {
            text_idx.push(idx);
        }
    }
    debug!(
        "detect_roles: numeric columns {:?}, text columns {:?}",
        numeric_idx, text_idx
    );

    let mut renames: HashMap<usize, &str> = HashMap::new();
    for (&idx, &role) in text_idx.iter().zip(TEXT_ROLES.iter()) {
        renames.insert(idx, role);
    }
    for (&idx, &role) in numeric_idx.iter().zip(NUMERIC_ROLES.iter()) {
        renames.insert(idx, role);
    }

    let columns: Vec<Column> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, c)| match renames.get(&idx) {
            Some(role) => {
                debug!("detect_roles: {:?} -> {:?}", c.name, role);
                Column::new(role, c.cells.clone())
            }
            None => c.clone(),
        })
        .collect();
    Table { columns }
}

/// Coerces the Votes and Total_Votes columns to integers. Cells that do
/// not parse as a number (including blanks) become 0; this is a deliberate
/// lossy default, never an error. Skipped unless both columns exist.
pub fn coerce_vote_columns(table: &Table) -> Table {
    if !(table.has_column(fields::VOTES) && table.has_column(fields::TOTAL_VOTES)) {
        debug!("coerce_vote_columns: Votes or Total_Votes absent, skipping");
        return table.clone();
    }
    let mut result = table.clone();
    for name in [fields::VOTES, fields::TOTAL_VOTES] {
        if let Some(col) = table.column(name) {
            let cells: Vec<Cell> = col
                .cells
                .iter()
                .map(|c| Cell::Int(c.to_i64().unwrap_or(0)))
                .collect();
            result = result.with_column(Column::new(name, cells));
        }
    }
    result
}

/// Computes `Vote_Share = Votes / Total_Votes * 100` row-wise. A zero
/// denominator produces an explicit null marker for that row and the rest
/// of the table is unaffected. Skipped unless both vote columns exist.
pub fn compute_vote_share(table: &Table) -> Table {
    let (votes, total) = match (
        table.column(fields::VOTES),
        table.column(fields::TOTAL_VOTES),
    ) {
        (Some(v), Some(t)) => (v, t),
        _ => {
            debug!("compute_vote_share: Votes or Total_Votes absent, skipping");
            return table.clone();
        }
    };
    let cells: Vec<Cell> = votes
        .cells
        .iter()
        .zip(total.cells.iter())
        .map(|(v, t)| {
            let denom = t.to_f64().unwrap_or(0.0);
            if denom == 0.0 {
                Cell::Null
            } else {
                Cell::Float(v.to_f64().unwrap_or(0.0) / denom * 100.0)
            }
        })
        .collect();
    table.with_column(Column::new(fields::VOTE_SHARE, cells))
}

/// Assigns per-contest ranks and flags winners.
///
/// Rows are grouped by (Year, Constituency) and ranked 1..N within each
/// group by descending Votes. Ties break on first-seen input order (a
/// stable sort, not an averaged rank), so equal-vote rows rank in the
/// order they appeared. Winner is true exactly on the rank-1 row; when
/// first place is an exact tie, only the first-seen row is flagged.
/// Skipped entirely unless Votes, Constituency and Year are all present.
pub fn rank_contests(table: &Table) -> Table {
    let keys = match group_keys(table) {
        Some(keys) => keys,
        None => {
            debug!("rank_contests: Year or Constituency absent, skipping");
            return table.clone();
        }
    };
    let votes_col = match table.column(fields::VOTES) {
        Some(c) => c,
        None => {
            debug!("rank_contests: Votes absent, skipping");
            return table.clone();
        }
    };
    let votes: Vec<f64> = votes_col
        .cells
        .iter()
        .map(|c| c.to_f64().unwrap_or(0.0))
        .collect();

    let n = table.num_rows();
    let mut ranks: Vec<Cell> = vec![Cell::Null; n];
    let mut winners: Vec<Cell> = vec![Cell::Bool(false); n];
    for (key, rows) in group_rows(&keys) {
        let mut sorted = rows;
        // Stable: equal votes keep their first-seen order.
        sorted.sort_by(|&a, &b| votes[b].partial_cmp(&votes[a]).unwrap_or(Ordering::Equal));
        debug!("rank_contests: group {:?}: {} rows", key, sorted.len());
        for (offset, &row) in sorted.iter().enumerate() {
            ranks[row] = Cell::Int((offset + 1) as i64);
            if offset == 0 {
                winners[row] = Cell::Bool(true);
            }
        }
    }
    table
        .with_column(Column::new(fields::RANK, ranks))
        .with_column(Column::new(fields::WINNER, winners))
}

/// Looks up the rank-2 row of each contest and broadcasts its Votes onto
/// every row of the group as Second_Votes (null when the contest has a
/// single candidate). Winning_Margin = Votes - Second_Votes is computed
/// on winner rows only; it stays null on all other rows and on winners
/// without a runner-up. Skipped unless the rank stage ran.
pub fn attach_margins(table: &Table) -> Table {
    let rank_col = match table.column(fields::RANK) {
        Some(c) => c,
        None => {
            debug!("attach_margins: Rank absent, skipping");
            return table.clone();
        }
    };
    let (keys, votes_col) = match (group_keys(table), table.column(fields::VOTES)) {
        (Some(keys), Some(v)) => (keys, v),
        _ => {
            debug!("attach_margins: group key or Votes absent, skipping");
            return table.clone();
        }
    };

    let mut second_by_group: HashMap<GroupKey, i64> = HashMap::new();
    for (row, key) in keys.iter().enumerate() {
        if rank_col.cells[row] == Cell::Int(2) {
            second_by_group.insert(key.clone(), votes_col.cells[row].to_i64().unwrap_or(0));
        }
    }
    debug!(
        "attach_margins: {} groups have a runner-up",
        second_by_group.len()
    );

    let n = table.num_rows();
    let mut second_cells: Vec<Cell> = Vec::with_capacity(n);
    let mut margin_cells: Vec<Cell> = Vec::with_capacity(n);
    for (row, key) in keys.iter().enumerate() {
        let second = second_by_group.get(key).cloned();
        second_cells.push(second.map(Cell::Int).unwrap_or(Cell::Null));
        let is_winner = rank_col.cells[row] == Cell::Int(1);
        let margin = match (is_winner, second) {
            (true, Some(s)) => Cell::Int(votes_col.cells[row].to_i64().unwrap_or(0) - s),
            _ => Cell::Null,
        };
        margin_cells.push(margin);
    }
    table
        .with_column(Column::new(fields::SECOND_VOTES, second_cells))
        .with_column(Column::new(fields::WINNING_MARGIN, margin_cells))
}

// A column is numeric-valued when every non-empty cell parses as a
// number. An all-null column is vacuously numeric, which matches how the
// original data sets type their padding columns.
fn is_numeric_column(column: &Column) -> bool {
    column
        .cells
        .iter()
        .filter(|c| !c.is_null())
        .all(|c| c.is_numeric())
}

fn group_keys(table: &Table) -> Option<Vec<GroupKey>> {
    let year = table.column(fields::YEAR)?;
    let constituency = table.column(fields::CONSTITUENCY)?;
    Some(
        year.cells
            .iter()
            .zip(constituency.cells.iter())
            .map(|(y, c)| (y.render(), c.render()))
            .collect(),
    )
}

// Groups row indices by key, preserving the first-seen order of both the
// groups and the rows within each group.
fn group_rows(keys: &[GroupKey]) -> Vec<(GroupKey, Vec<usize>)> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, Vec<usize>> = HashMap::new();
    for (idx, key) in keys.iter().enumerate() {
        let rows = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            Vec::new()
        });
        rows.push(idx);
    }
    order
        .into_iter()
        .map(|key| {
            let rows = groups.remove(&key).unwrap_or_default();
            (key, rows)
        })
        .collect()
}

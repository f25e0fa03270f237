use thiserror::Error;

// ---------------------------------------------------------------------------
// TableError – structural failures in spectrum data
// ---------------------------------------------------------------------------

/// Shape and alignment errors raised while reading or combining tables.
/// Parse and I/O failures stay as plain `anyhow` errors at the call site.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table contains no data rows")]
    Empty,

    #[error("row {row} has {found} level columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("table has {found} level columns, need at least {needed}")]
    TooFewLevels { needed: usize, found: usize },

    #[error(
        "reference coupling {j_ref} not found in primary coupling column \
         ({rows} rows scanned)"
    )]
    Misaligned { j_ref: f64, rows: usize },

    #[error(
        "{remaining} primary rows from the aligned offset, but reference \
         has {reference} rows"
    )]
    RowCountMismatch { remaining: usize, reference: usize },
}

// ---------------------------------------------------------------------------
// SpectrumTable – one spectrum dataset
// ---------------------------------------------------------------------------

/// A parsed spectrum file: the coupling column plus a rectangular matrix of
/// energy levels, row-major (one row per coupling sample, one column per
/// level index). Rows keep file order; nothing is sorted on load.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumTable {
    /// Coupling values J, one per data row.
    pub j: Vec<f64>,
    /// Energy levels, `levels[row][level]`; every row has `level_count()`
    /// entries.
    pub levels: Vec<Vec<f64>>,
}

impl SpectrumTable {
    /// Build a table, checking the rectangularity invariant.
    pub fn new(j: Vec<f64>, levels: Vec<Vec<f64>>) -> Result<Self, TableError> {
        if j.is_empty() || levels.is_empty() {
            return Err(TableError::Empty);
        }
        let width = levels[0].len();
        for (row, lv) in levels.iter().enumerate() {
            if lv.len() != width {
                return Err(TableError::RaggedRow {
                    row,
                    expected: width,
                    found: lv.len(),
                });
            }
        }
        Ok(SpectrumTable { j, levels })
    }

    /// Number of coupling samples (rows).
    pub fn len(&self) -> usize {
        self.j.len()
    }

    /// Whether the table holds no samples.
    pub fn is_empty(&self) -> bool {
        self.j.is_empty()
    }

    /// Number of level columns.
    pub fn level_count(&self) -> usize {
        self.levels.first().map_or(0, |row| row.len())
    }

    /// The e-th level as a column vector, in row order.
    pub fn level_column(&self, e: usize) -> Vec<f64> {
        self.levels.iter().map(|row| row[e]).collect()
    }

    /// Elementwise `|E0 - Ee|`, the gap between level `e` and the ground
    /// state.
    pub fn gap_column(&self, e: usize) -> Vec<f64> {
        self.levels
            .iter()
            .map(|row| (row[0] - row[e]).abs())
            .collect()
    }

    /// Sort each row's levels ascending. Tolerates a solver that converged
    /// to a permuted or excited ordering; the coupling column is untouched.
    pub fn sort_rows(&mut self) {
        for row in &mut self.levels {
            row.sort_by(f64::total_cmp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_is_absolute_distance_to_ground_state() {
        // Row [0.0, 1.0, 2.0, 4.0]: coupling 0.0, levels 1.0 / 2.0 / 4.0.
        let table = SpectrumTable::new(vec![0.0], vec![vec![1.0, 2.0, 4.0]]).unwrap();
        assert_eq!(table.gap_column(1), vec![1.0]);
        assert_eq!(table.gap_column(2), vec![3.0]);
    }

    #[test]
    fn sort_rows_orders_levels_and_keeps_coupling() {
        let mut table =
            SpectrumTable::new(vec![3.0, 3.0], vec![vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
        table.sort_rows();
        assert_eq!(table.j, vec![3.0, 3.0]);
        assert_eq!(table.levels[0], vec![1.0, 2.0]);
        // an already sorted row is unaffected
        assert_eq!(table.levels[1], vec![1.0, 2.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err =
            SpectrumTable::new(vec![0.0, 0.1], vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        match err {
            TableError::RaggedRow {
                row,
                expected,
                found,
            } => assert_eq!((row, expected, found), (1, 2, 1)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn level_column_extracts_in_row_order() {
        let table =
            SpectrumTable::new(vec![0.0, 0.5], vec![vec![-1.0, 0.5], vec![-2.0, 0.25]])
                .unwrap();
        assert_eq!(table.level_column(0), vec![-1.0, -2.0]);
        assert_eq!(table.level_column(1), vec![0.5, 0.25]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.level_count(), 2);
        assert!(!table.is_empty());
    }
}

//! In-memory tables with named columns and dynamically typed cells.
//!
//! A [`Table`] is the unit every loaded source, per-subject slice and merged
//! view is expressed in: an ordered list of column names plus row-major cells.
//! Tables are read-only after construction; filtering and merging build new
//! tables instead of mutating.

pub mod cell;
pub mod dates;

pub use cell::{Cell, NA_TOKENS};
pub use dates::{detect_date_format, parse_date_string};

use rustc_hash::FxHashMap;

use crate::error::{ProfileReaderError, Result};

/// A rectangular, immutable table of tagged cells
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column names in source order
    columns: Vec<String>,
    /// Name to column position lookup
    index: FxHashMap<String, usize>,
    /// Row-major cell storage, every row as wide as `columns`
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table from column names and rows
    ///
    /// # Arguments
    /// * `columns` - Column names, in order; must be non-empty and unique
    /// * `rows` - Row-major cells; every row must match the column count
    ///
    /// # Returns
    /// * `Result<Table>` - The table, or a `MalformedTable` error when the
    ///   shape does not hold
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ProfileReaderError::MalformedTable(
                "table has no columns".to_string(),
            ));
        }

        let mut index = FxHashMap::default();
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(ProfileReaderError::MalformedTable(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ProfileReaderError::MalformedTable(format!(
                    "row {i} has {} cells, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
        }

        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    /// Create a table and promote numeric columns
    ///
    /// A column is numeric when it has at least one non-null cell and every
    /// non-null cell coerces to a number; its textual cells are then replaced
    /// by their numeric value. Columns mixing numbers with unparseable text
    /// keep their loaded cells.
    pub fn with_inferred_types(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Self::new(columns, rows)?;

        for col in 0..table.columns.len() {
            let mut seen_value = false;
            let all_numeric = table.rows.iter().all(|row| match &row[col] {
                Cell::Null => true,
                cell => {
                    seen_value = true;
                    cell.as_number().is_some()
                }
            });

            if seen_value && all_numeric {
                for row in &mut table.rows {
                    if matches!(&row[col], Cell::Text(_)) {
                        if let Some(n) = row[col].as_number() {
                            row[col] = Cell::Number(n);
                        }
                    }
                }
            }
        }

        Ok(table)
    }

    /// Build a table whose shape is guaranteed by the caller
    pub(crate) fn from_raw(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(!columns.is_empty());
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));

        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self {
            columns,
            index,
            rows,
        }
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in source order
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by exact name
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether a column with this exact name exists
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// First column, in source order, whose name satisfies the predicate
    pub fn find_column<P: Fn(&str) -> bool>(&self, predicate: P) -> Option<usize> {
        self.columns.iter().position(|name| predicate(name))
    }

    /// Cell at the given row and column position
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    /// A single row as a cell slice
    #[must_use]
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.rows[row]
    }

    /// Iterate over rows in table order
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterate over one column's cells in row order
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[col])
    }

    /// Copy the given rows, in the given order, into a new table
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        let rows = indices.iter().map(|&i| self.rows[i].clone()).collect();
        Self::from_raw(self.columns.clone(), rows)
    }
}

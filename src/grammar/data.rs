//! Tabular input data for chart recipes.
//!
//! A [`Dataset`] is an ordered set of equally long named columns. Cells are
//! numbers, text or missing. Discrete columns carry an ordered list of levels
//! that fixes the order of categories along axes and legends.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A numeric value.
    Number(f32),
    /// A text value.
    Text(String),
    /// A missing value.
    Null,
}

impl DataValue {
    /// Get as f32, or None if not a number.
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string, or None if not text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether the value is missing.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Display label used for discrete levels. Whole numbers print without
    /// a fractional part; missing values print as `NA`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            DataValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e9 => format!("{}", *n as i64),
            DataValue::Number(n) => format!("{n}"),
            DataValue::Text(s) => s.clone(),
            DataValue::Null => "NA".to_string(),
        }
    }

    fn parse_cell(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() || cell == "NA" {
            return DataValue::Null;
        }
        match cell.parse::<f32>() {
            Ok(v) => DataValue::Number(v),
            Err(_) => DataValue::Text(cell.to_string()),
        }
    }
}

impl From<f32> for DataValue {
    fn from(v: f32) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(DataValue::Null, Into::into)
    }
}

/// An ordered, rectangular collection of named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Vec<DataValue>>,
    /// Explicit factor levels keyed by column name.
    levels: HashMap<String, Vec<String>>,
    n_rows: usize,
}

impl Dataset {
    /// Create a new empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from x and y arrays (truncated to the shorter one).
    #[must_use]
    pub fn from_xy(x: &[f32], y: &[f32]) -> Self {
        let n = x.len().min(y.len());
        let mut ds = Self::new();
        ds.push("x", x[..n].iter().map(|&v| DataValue::Number(v)).collect());
        ds.push("y", y[..n].iter().map(|&v| DataValue::Number(v)).collect());
        ds
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateColumn`] if the name is taken, [`Error::RaggedColumn`]
    /// if the length differs from the existing columns.
    pub fn add_column<V: Into<DataValue>>(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<()> {
        if self.has_column(name) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        let values: Vec<DataValue> = values.into_iter().map(Into::into).collect();
        if !self.names.is_empty() && values.len() != self.n_rows {
            return Err(Error::RaggedColumn {
                column: name.to_string(),
                expected: self.n_rows,
                actual: values.len(),
            });
        }
        self.push(name, values);
        Ok(())
    }

    /// Builder form of [`Dataset::add_column`].
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::add_column`].
    pub fn with_column<V: Into<DataValue>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.add_column(name, values)?;
        Ok(self)
    }

    /// Append a numeric column.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::add_column`].
    pub fn add_column_f32(&mut self, name: &str, data: &[f32]) -> Result<()> {
        self.add_column(name, data.iter().copied())
    }

    /// Append a text column.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::add_column`].
    pub fn add_column_str(&mut self, name: &str, data: &[&str]) -> Result<()> {
        self.add_column(name, data.iter().copied())
    }

    fn push(&mut self, name: &str, values: Vec<DataValue>) {
        self.n_rows = values.len();
        self.names.push(name.to_string());
        self.columns.push(values);
    }

    /// Fix the level order of a discrete column. Values not listed are
    /// appended after the given levels in order of first appearance.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumn`] if the column does not exist.
    pub fn with_levels(mut self, column: &str, levels: &[&str]) -> Result<Self> {
        if !self.has_column(column) {
            return Err(Error::UnknownColumn(column.to_string()));
        }
        self.levels.insert(
            column.to_string(),
            levels.iter().map(ToString::to_string).collect(),
        );
        Ok(self)
    }

    /// Load a dataset from CSV with a header row.
    ///
    /// Numeric cells become numbers, empty cells and `NA` become missing,
    /// everything else is text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Csv`] on malformed input (including ragged records).
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(ToString::to_string).collect();
        let mut columns: Vec<Vec<DataValue>> = vec![Vec::new(); headers.len()];

        for record in rdr.records() {
            let record = record?;
            for (col, cell) in columns.iter_mut().zip(record.iter()) {
                col.push(DataValue::parse_cell(cell));
            }
        }

        let mut ds = Self::new();
        for (name, values) in headers.iter().zip(columns) {
            ds.add_column(name, values)?;
        }
        Ok(ds)
    }

    /// Load a dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened, otherwise as
    /// [`Dataset::from_csv_reader`].
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    /// Get a column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[DataValue]> {
        self.index_of(name).map(|i| self.columns[i].as_slice())
    }

    /// Get the numeric values of a column (non-numbers skipped).
    #[must_use]
    pub fn get_f32(&self, name: &str) -> Option<Vec<f32>> {
        self.get(name)
            .map(|col| col.iter().filter_map(DataValue::as_f32).collect())
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn ncol(&self) -> usize {
        self.names.len()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Column names in insertion order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    /// Whether a column is discrete: it holds text or has explicit levels.
    #[must_use]
    pub fn is_discrete(&self, name: &str) -> bool {
        if self.levels.contains_key(name) {
            return true;
        }
        self.get(name)
            .is_some_and(|col| col.iter().any(|v| v.as_str().is_some()))
    }

    /// Ordered levels of a column treated as discrete.
    ///
    /// Explicit levels come first. Remaining text values follow in order of
    /// first appearance; purely numeric columns are sorted ascending.
    /// Missing values never form a level.
    #[must_use]
    pub fn levels(&self, name: &str) -> Option<Vec<String>> {
        let col = self.get(name)?;
        let mut out: Vec<String> = self.levels.get(name).cloned().unwrap_or_default();
        let mut seen: HashSet<String> = out.iter().cloned().collect();
        let mut push = |label: String| {
            if seen.insert(label.clone()) {
                out.push(label);
            }
        };

        let has_text = col.iter().any(|v| v.as_str().is_some());
        if has_text {
            for v in col.iter().filter(|v| !v.is_null()) {
                push(v.label());
            }
        } else {
            let mut nums: Vec<f32> = col.iter().filter_map(DataValue::as_f32).collect();
            nums.sort_by(f32::total_cmp);
            nums.dedup();
            for n in nums {
                push(DataValue::Number(n).label());
            }
        }
        Some(out)
    }

    /// Copy of the dataset restricted to `rows` (in the given order).
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|col| rows.iter().filter_map(|&r| col.get(r).cloned()).collect())
            .collect();
        Self {
            names: self.names.clone(),
            columns,
            levels: self.levels.clone(),
            n_rows: rows.iter().filter(|&&r| r < self.n_rows).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species() -> Dataset {
        Dataset::new()
            .with_column("species", ["A", "A", "B"])
            .unwrap()
            .with_column("value", [1.0f32, 2.0, 3.0])
            .unwrap()
    }

    #[test]
    fn test_dataset_from_xy() {
        let ds = Dataset::from_xy(&[1.0, 2.0, 3.0], &[4.0, 5.0]);
        assert_eq!(ds.nrow(), 2);
        assert_eq!(ds.columns(), vec!["x", "y"]);
    }

    #[test]
    fn test_ragged_column_rejected() {
        let mut ds = species();
        let err = ds.add_column("short", [1.0f32]).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedColumn {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut ds = species();
        assert!(matches!(
            ds.add_column("value", [0.0f32, 0.0, 0.0]),
            Err(Error::DuplicateColumn(name)) if name == "value"
        ));
    }

    #[test]
    fn test_levels_first_appearance() {
        let ds = Dataset::new()
            .with_column("g", ["b", "a", "b", "c"])
            .unwrap();
        assert_eq!(ds.levels("g").unwrap(), vec!["b", "a", "c"]);
        assert!(ds.is_discrete("g"));
    }

    #[test]
    fn test_levels_numeric_sorted() {
        let ds = Dataset::new()
            .with_column("cyl", [8.0f32, 4.0, 6.0, 4.0])
            .unwrap();
        assert_eq!(ds.levels("cyl").unwrap(), vec!["4", "6", "8"]);
        assert!(!ds.is_discrete("cyl"));
    }

    #[test]
    fn test_explicit_levels_win() {
        let ds = species().with_levels("species", &["B", "A"]).unwrap();
        assert_eq!(ds.levels("species").unwrap(), vec!["B", "A"]);
        assert!(ds.with_levels("nope", &[]).is_err());
    }

    #[test]
    fn test_nulls_are_not_levels() {
        let ds = Dataset::new()
            .with_column("g", [Some("x"), None, Some("y")])
            .unwrap();
        assert_eq!(ds.levels("g").unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn test_from_csv_reader() {
        let csv = "name,score\nann,1.5\nbob,NA\ncid,\n";
        let ds = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.nrow(), 3);
        let score = ds.get("score").unwrap();
        assert_eq!(score[0], DataValue::Number(1.5));
        assert!(score[1].is_null());
        assert!(score[2].is_null());
        assert_eq!(ds.get("name").unwrap()[1].as_str(), Some("bob"));
    }

    #[test]
    fn test_from_csv_ragged_is_error() {
        let csv = "a,b\n1,2\n3\n";
        assert!(matches!(Dataset::from_csv_reader(csv.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn test_select_rows() {
        let ds = species().select_rows(&[2, 0]);
        assert_eq!(ds.nrow(), 2);
        assert_eq!(ds.get("species").unwrap()[0].as_str(), Some("B"));
    }

    #[test]
    fn test_value_labels() {
        assert_eq!(DataValue::Number(4.0).label(), "4");
        assert_eq!(DataValue::Number(2.5).label(), "2.5");
        assert_eq!(DataValue::Null.label(), "NA");
    }
}

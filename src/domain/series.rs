// ============================================================
// Layer 3 — Raw Dataset
// ============================================================
// An ordered table of observations, stored column-wise.
// Every column has exactly `rows` values; row i of the table
// is the i-th value of every column.
//
// The table is built once at run start and never mutated.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("column '{name}' has {actual} values, expected {expected}")]
    RaggedColumn { name: String, expected: usize, actual: usize },

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("column '{label}' not found (available: {available})")]
    MissingColumn { label: String, available: String },
}

/// One named numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name:   String,
    pub values: Vec<f64>,
}

/// The immutable table a run starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    /// Where the table came from, kept for log lines
    source:  String,
    rows:    usize,
    columns: Vec<Column>,
}

impl RawDataset {
    /// Build a table from columns that must all share one length.
    pub fn new(source: impl Into<String>, columns: Vec<Column>) -> Result<Self, SeriesError> {
        let rows = columns.first().map(|c| c.values.len()).unwrap_or(0);

        for (i, col) in columns.iter().enumerate() {
            if col.values.len() != rows {
                return Err(SeriesError::RaggedColumn {
                    name:     col.name.clone(),
                    expected: rows,
                    actual:   col.values.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(SeriesError::DuplicateColumn(col.name.clone()));
            }
        }

        Ok(Self { source: source.into(), rows, columns })
    }

    pub fn source(&self) -> &str { &self.source }

    /// (rows, columns), in the order a dataframe would report it.
    pub fn shape(&self) -> (usize, usize) { (self.rows, self.columns.len()) }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of the labelled column, in row order.
    pub fn column(&self, label: &str) -> Result<&[f64], SeriesError> {
        self.columns
            .iter()
            .find(|c| c.name == label)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| SeriesError::MissingColumn {
                label:     label.to_string(),
                available: self.column_names().collect::<Vec<_>>().join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, values: &[f64]) -> Column {
        Column { name: name.to_string(), values: values.to_vec() }
    }

    #[test]
    fn test_shape_and_lookup() {
        let ds = RawDataset::new(
            "mem",
            vec![col("Open", &[1.0, 2.0, 3.0]), col("Close", &[4.0, 5.0, 6.0])],
        ).unwrap();

        assert_eq!(ds.shape(), (3, 2));
        assert_eq!(ds.column("Close").unwrap(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_missing_column_lists_available() {
        let ds  = RawDataset::new("mem", vec![col("Open", &[1.0])]).unwrap();
        let err = ds.column("Close").unwrap_err();
        assert_eq!(
            err,
            SeriesError::MissingColumn { label: "Close".into(), available: "Open".into() }
        );
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let err = RawDataset::new("mem", vec![col("a", &[1.0, 2.0]), col("b", &[1.0])]);
        assert!(matches!(err, Err(SeriesError::RaggedColumn { .. })));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let err = RawDataset::new("mem", vec![col("a", &[1.0]), col("a", &[2.0])]);
        assert_eq!(err, Err(SeriesError::DuplicateColumn("a".into())));
    }

    #[test]
    fn test_empty_table() {
        let ds = RawDataset::new("mem", Vec::new()).unwrap();
        assert_eq!(ds.shape(), (0, 0));
    }
}

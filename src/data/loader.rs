// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads a delimited file with a header row into a RawDataset.
//
// Every column whose cells all parse as f64 is kept. Columns
// with any non-numeric cell (dates, tickers, blanks) are
// dropped with a debug log, so a typical price export like
//
//   Date,Open,High,Low,Close
//   2019-01-02,1.1462,1.1497,1.1345,1.1343
//
// becomes a 4-column numeric table.

use anyhow::{Context, Result};
use std::{fs::File, io::Read, path::PathBuf};

use crate::domain::series::{Column, RawDataset};
use crate::domain::traits::SeriesSource;

/// Loads one CSV file. Implements the SeriesSource trait from Layer 3.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeriesSource for CsvLoader {
    fn load(&self) -> Result<RawDataset> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        read_table(file, &self.path.display().to_string())
    }
}

/// Parse CSV text from any reader. `source` only labels errors and logs.
pub fn read_table<R: Read>(reader: R, source: &str) -> Result<RawDataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Cannot read header row of '{source}'"))?
        .iter()
        .map(str::to_string)
        .collect();

    // One Option per column: None once a non-numeric cell was seen
    let mut cells: Vec<Option<Vec<f64>>> = vec![Some(Vec::new()); headers.len()];

    for (line, record) in rdr.records().enumerate() {
        let record = record
            .with_context(|| format!("Malformed record {} in '{source}'", line + 1))?;

        for (idx, column) in cells.iter_mut().enumerate() {
            let parsed = record.get(idx).and_then(|raw| raw.parse::<f64>().ok());
            match (column.as_mut(), parsed) {
                (Some(values), Some(v)) => values.push(v),
                (Some(_), None) => *column = None,
                (None, _) => {}
            }
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(cells)
        .filter_map(|(name, values)| match values {
            Some(values) => Some(Column { name, values }),
            None => {
                tracing::debug!("Skipping non-numeric column '{}' in '{}'", name, source);
                None
            }
        })
        .collect();

    Ok(RawDataset::new(source, columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PRICES: &str = "\
Date,Open,Close
2019-01-02,1.10,1.20
2019-01-03,1.30,1.40
2019-01-04,1.50,1.60
";

    #[test]
    fn test_numeric_columns_kept_dates_dropped() {
        let ds = read_table(PRICES.as_bytes(), "mem").unwrap();
        assert_eq!(ds.shape(), (3, 2));
        assert_eq!(ds.column("Close").unwrap(), &[1.20, 1.40, 1.60]);
        assert!(ds.column("Date").is_err());
    }

    #[test]
    fn test_column_with_blank_cell_is_dropped() {
        let text = "a,b\n1,2\n3,\n";
        let ds   = read_table(text.as_bytes(), "mem").unwrap();
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_header_only_file() {
        let ds = read_table("a,b\n".as_bytes(), "mem").unwrap();
        assert_eq!(ds.shape(), (0, 2));
    }

    #[test]
    fn test_load_from_disk() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        File::create(&path).unwrap().write_all(PRICES.as_bytes()).unwrap();

        let ds = CsvLoader::new(&path).load().unwrap();
        assert_eq!(ds.shape().0, 3);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CsvLoader::new("/definitely/not/here.csv").load().unwrap_err();
        assert!(err.to_string().contains("Cannot open dataset"));
    }
}

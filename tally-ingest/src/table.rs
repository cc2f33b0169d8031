//! Raw statement table: a header row plus text cells, exactly as exported.
//!
//! Bank exports are messy, so loading is lenient: rows may be ragged, bytes
//! may not be UTF-8 (Latin-1 exports decode lossily), and Excel's BOM is dropped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build from already-split cells. Rows are padded/truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Read a CSV with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .byte_headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = String::from_utf8_lossy(h);
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.into_owned()
                }
            })
            .collect();

        let mut rows = Vec::new();
        for record in rdr.byte_records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|cell| String::from_utf8_lossy(cell).into_owned())
                    .collect(),
            );
        }

        debug!(columns = headers.len(), rows = rows.len(), "read statement table");
        Ok(Self::new(headers, rows))
    }

    pub fn from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, delimiter)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cell text, `None` when the column is out of range or the cell is blank.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)?
            .get(column)
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_ragged_rows() {
        let csv = "Dato,Beløp,Tekst\n01.12.2023,-45,Ruter\n02.12.2023\n03.12.2023,10,Kiwi,extra\n";
        let table = RawTable::from_reader(csv.as_bytes(), b',').unwrap();
        assert_eq!(table.headers(), ["Dato", "Beløp", "Tekst"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(1, 1), None);
        assert_eq!(table.cell(2, 2), Some("Kiwi"));
        assert_eq!(table.rows()[2].len(), 3);
    }

    #[test]
    fn test_strips_bom_and_decodes_latin1() {
        let mut bytes = "\u{feff}Date;Text\n2023-12-01;".as_bytes().to_vec();
        bytes.extend_from_slice(b"Str\xf8m\n");
        let table = RawTable::from_reader(bytes.as_slice(), b';').unwrap();
        assert_eq!(table.headers()[0], "Date");
        assert_eq!(table.cell(0, 1), Some("Str\u{fffd}m"));
    }

    #[test]
    fn test_header_only_table() {
        let table = RawTable::from_reader("Date,Amount\n".as_bytes(), b',').unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = RawTable::from_path("/definitely/not/here/statement.csv", b',').unwrap_err();
        assert!(err.is_not_found());
    }
}

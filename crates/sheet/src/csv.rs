use crate::error::{GridError, Result};
use crate::store::Store;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

impl Store {
    /// Write every row as CSV: all fields quoted, embedded quotes doubled,
    /// rows separated by `\n` with no trailing newline.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        let csv = self.to_csv_string()?;
        writer.write_all(csv.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Convert the store to a CSV string
    pub fn to_csv_string(&self) -> Result<String> {
        let mut csv_writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for row in self.rows() {
            csv_writer.write_record(row.cells())?;
        }

        let mut buffer = csv_writer
            .into_inner()
            .map_err(|e| GridError::Serialize(format!("CSV write error: {}", e.error())))?;
        if buffer.last() == Some(&b'\n') {
            buffer.pop();
        }
        String::from_utf8(buffer).map_err(|e| GridError::Serialize(format!("CSV encoding error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_quoted() {
        let store = Store::from_data(&[vec!["a", "1"], vec!["", "x,y"]], 0, 0);
        assert_eq!(store.to_csv_string().unwrap(), "\"a\",\"1\"\n\"\",\"x,y\"");
    }

    #[test]
    fn test_quotes_doubled_and_newlines_kept() {
        let store = Store::from_data(&[vec!["say \"hi\"", "line\nbreak"]], 0, 0);
        assert_eq!(
            store.to_csv_string().unwrap(),
            "\"say \"\"hi\"\"\",\"line\nbreak\""
        );
    }

    #[test]
    fn test_csv_parses_back() {
        let store = Store::from_data(&[vec!["a\"b", "c"], vec!["1", ""]], 0, 0);
        let csv = store.to_csv_string().unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(csv.as_bytes());
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(rows, store.to_array());
    }
}

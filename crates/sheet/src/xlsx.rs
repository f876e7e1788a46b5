use crate::error::{GridError, Result};
use crate::store::Store;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Name of the single worksheet in exported workbooks
pub const SHEET_NAME: &str = "Sheet1";

impl Store {
    /// Encode the store as an XLSX workbook with one sheet named `Sheet1`
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = self.to_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Save the store to an XLSX file
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref())?;
        Ok(())
    }

    fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;
        self.write_to_worksheet(worksheet)?;
        Ok(workbook)
    }

    /// Cells are written as text, exactly as stored; empty cells are skipped
    fn write_to_worksheet(&self, worksheet: &mut Worksheet) -> Result<()> {
        for (row_idx, row) in self.rows().iter().enumerate() {
            let row_num = u32::try_from(row_idx)
                .map_err(|_| GridError::Serialize("Row index overflow".to_string()))?;
            for (col_idx, cell) in row.cells().iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                let col_num = u16::try_from(col_idx)
                    .map_err(|_| GridError::Serialize("Column index overflow".to_string()))?;
                worksheet.write_string(row_num, col_num, cell)?;
            }
        }
        Ok(())
    }
}

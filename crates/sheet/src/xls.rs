//! Legacy `.xls` export as an Excel 2003 XML Spreadsheet.
//!
//! Excel and LibreOffice open this format under an `.xls` name. The workbook
//! has one worksheet, `Sheet1`, and every cell is written as a string.

use crate::error::{GridError, Result};
use crate::store::Store;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;

const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";

impl Store {
    /// Encode the store as SpreadsheetML bytes
    pub fn to_xls_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write(
            &mut writer,
            Event::PI(BytesPI::new(r#"mso-application progid="Excel.Sheet""#)),
        )?;
        write(
            &mut writer,
            Event::Start(
                BytesStart::new("Workbook")
                    .with_attributes([("xmlns", SPREADSHEET_NS), ("xmlns:ss", SPREADSHEET_NS)]),
            ),
        )?;
        write(
            &mut writer,
            Event::Start(BytesStart::new("Worksheet").with_attributes([("ss:Name", "Sheet1")])),
        )?;
        write(&mut writer, Event::Start(BytesStart::new("Table")))?;

        for row in self.rows() {
            write(&mut writer, Event::Start(BytesStart::new("Row")))?;
            for cell in row.cells() {
                if cell.is_empty() {
                    write(&mut writer, Event::Empty(BytesStart::new("Cell")))?;
                    continue;
                }
                write(&mut writer, Event::Start(BytesStart::new("Cell")))?;
                write(
                    &mut writer,
                    Event::Start(BytesStart::new("Data").with_attributes([("ss:Type", "String")])),
                )?;
                write(&mut writer, Event::Text(BytesText::new(cell)))?;
                write(&mut writer, Event::End(BytesEnd::new("Data")))?;
                write(&mut writer, Event::End(BytesEnd::new("Cell")))?;
            }
            write(&mut writer, Event::End(BytesEnd::new("Row")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("Table")))?;
        write(&mut writer, Event::End(BytesEnd::new("Worksheet")))?;
        write(&mut writer, Event::End(BytesEnd::new("Workbook")))?;

        Ok(writer.into_inner())
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| GridError::Serialize(format!("XLS write error: {e}")))
}

//! Spreadsheet-container encoder.
//!
//! One sheet per non-empty table; the sheet name is the table name truncated
//! to the container's 31-character identifier limit. Column order comes from
//! the first record; cells keep their scalar types where the container has
//! one (string, number, boolean), and null or missing values stay blank.

use crate::error::DatasmithError;
use crate::models::{Record, TableSet};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;

/// Sheet name length limit imposed by the container format.
const SHEET_NAME_LIMIT: usize = 31;

/// Encode the table set as a spreadsheet workbook.
pub(crate) fn encode(tables: &TableSet) -> Result<Vec<u8>, DatasmithError> {
    let mut workbook = Workbook::new();

    for (name, rows) in tables {
        let Some(first) = rows.first() else { continue };
        let headers: Vec<&str> = first.keys().map(String::as_str).collect();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(name))?;

        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }
        for (row_idx, row) in rows.iter().enumerate() {
            write_row(worksheet, row_idx as u32 + 1, &headers, row)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_row(
    worksheet: &mut Worksheet,
    row_num: u32,
    headers: &[&str],
    row: &Record,
) -> Result<(), DatasmithError> {
    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        match row.get(*header) {
            // Null and missing cells stay blank.
            None | Some(Value::Null) => {}
            Some(Value::Bool(b)) => {
                worksheet.write_boolean(row_num, col, *b)?;
            }
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) => {
                    worksheet.write_number(row_num, col, f)?;
                }
                None => {
                    worksheet.write_string(row_num, col, n.to_string())?;
                }
            },
            Some(Value::String(s)) => {
                worksheet.write_string(row_num, col, s.as_str())?;
            }
            // Nested values pass through as compact JSON text.
            Some(other) => {
                worksheet.write_string(row_num, col, other.to_string())?;
            }
        }
    }
    Ok(())
}

fn sheet_name(table_name: &str) -> String {
    table_name.chars().take(SHEET_NAME_LIMIT).collect()
}

//! Implements the `Storage` trait for `.xlsx` files. Reading is done with `calamine` and writing
//! with `rust_xlsxwriter`. A save always serializes the whole `Book` to a fresh file next to the
//! target and then renames it into place.

use crate::api::cell::to_serial;
use crate::api::{Book, Cell, Sheet, Storage};
use crate::error::Res;
use crate::utils;
use anyhow::{bail, Context};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Number format applied to date-time cells so they read back as date-times.
const DATE_TIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Largest grid a worksheet can hold.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// A workbook stored as an `.xlsx` file on disk.
#[derive(Debug, Clone)]
pub struct XlsxStorage {
    path: PathBuf,
}

impl XlsxStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Storage for XlsxStorage {
    fn load(&mut self) -> Res<Book> {
        if !self.path.is_file() {
            debug!(
                "{} does not exist, starting with an empty workbook",
                self.path.display()
            );
            return Ok(Book::new());
        }
        read_book(&self.path)
    }

    fn save(&mut self, book: &Book) -> Res<()> {
        let tmp = temp_sibling(&self.path)?;
        if let Err(e) = write_book(book, &tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        utils::rename(&tmp, &self.path)?;
        debug!("Saved workbook to {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

fn read_book(path: &Path) -> Res<Book> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let mut book = Book::new();
    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .with_context(|| format!("Failed to read sheet '{sheet_name}'"))?;

        let mut sheet = Sheet::new(sheet_name.as_str());
        // The range only covers the used area, so its rows are offset from A1.
        if let Some((row0, col0)) = range.start() {
            for (r, row) in range.rows().enumerate() {
                for (c, data) in row.iter().enumerate() {
                    let cell = to_cell(data);
                    if !matches!(cell, Cell::Empty) {
                        sheet.set_cell(row0 as usize + r, col0 as usize + c, cell);
                    }
                }
            }
        }
        trace!(
            "Read sheet '{sheet_name}' with {} rows",
            sheet.height()
        );
        book.push_sheet(sheet)?;
    }
    Ok(book)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::String(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(true) => Cell::from("TRUE"),
        Data::Bool(false) => Cell::from("FALSE"),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => Cell::DateTime(dt),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::String(s.clone()),
    }
}

fn write_book(book: &Book, path: &Path) -> Res<()> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_TIME_NUM_FORMAT);

    for sheet in book.sheets() {
        let worksheet = workbook
            .add_worksheet()
            .set_name(sheet.name())
            .with_context(|| format!("Failed to create sheet '{}'", sheet.name()))?;
        write_sheet(sheet, worksheet, &date_format)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook to {}", path.display()))
}

fn write_sheet(sheet: &Sheet, worksheet: &mut Worksheet, date_format: &Format) -> Res<()> {
    if sheet.height() > MAX_ROWS || sheet.width() > MAX_COLS {
        bail!(
            "Sheet '{}' is larger than a worksheet allows ({} x {})",
            sheet.name(),
            sheet.height(),
            sheet.width()
        );
    }
    for (r, row) in sheet.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r32, c16) = (r as u32, c as u16);
            let written = match cell {
                Cell::Empty => continue,
                Cell::String(s) => worksheet.write_string(r32, c16, s),
                Cell::Number(n) => worksheet.write_number(r32, c16, *n),
                Cell::DateTime(dt) => {
                    worksheet.write_number_with_format(r32, c16, to_serial(*dt), date_format)
                }
            };
            written.with_context(|| {
                format!("Failed to write cell ({r}, {c}) of sheet '{}'", sheet.name())
            })?;
        }
    }
    Ok(())
}

/// A hidden file in the same directory as `path`, so the final rename stays on one filesystem.
fn temp_sibling(path: &Path) -> Res<PathBuf> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Workbook path {} has no file name", path.display()))?;
    Ok(path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let mut storage = XlsxStorage::new(dir.path().join("nope.xlsx"));
        let book = storage.load().unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leave.xlsx");
        let when = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 15)
            .unwrap();

        let mut book = Book::new();
        let mut sheet = Sheet::new("Transactions");
        sheet.set_cell(0, 0, "Staff");
        sheet.set_cell(1, 0, "Bob");
        sheet.set_cell(1, 1, when);
        sheet.set_cell(1, 4, 2.5);
        book.push_sheet(Sheet::new("Summary")).unwrap();
        book.push_sheet(sheet).unwrap();

        let mut storage = XlsxStorage::new(&path);
        storage.save(&book).unwrap();
        assert!(path.is_file());
        assert!(!temp_sibling(&path).unwrap().exists());

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.sheet_names(), vec!["Summary", "Transactions"]);
        let sheet = loaded.sheet("Transactions").unwrap();
        assert_eq!(sheet.cell(0, 0), &Cell::from("Staff"));
        assert_eq!(sheet.cell(1, 0), &Cell::from("Bob"));
        assert_eq!(sheet.cell(1, 1), &Cell::DateTime(when));
        assert_eq!(sheet.cell(1, 4), &Cell::Number(2.5));
        assert!(sheet.cell(1, 2).is_blank());
    }

    #[test]
    fn test_offset_cells_keep_position() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("offset.xlsx");
        let mut book = Book::new();
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(3, 2, "C4");
        book.push_sheet(sheet).unwrap();

        let mut storage = XlsxStorage::new(&path);
        storage.save(&book).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded.sheet("Data").unwrap().cell(3, 2), &Cell::from("C4"));
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leave.xlsx");
        let mut storage = XlsxStorage::new(&path);

        let mut first = Book::new();
        first.push_sheet(Sheet::new("Old")).unwrap();
        storage.save(&first).unwrap();

        let mut second = Book::new();
        second.push_sheet(Sheet::new("New")).unwrap();
        storage.save(&second).unwrap();

        assert_eq!(storage.load().unwrap().sheet_names(), vec!["New"]);
    }
}

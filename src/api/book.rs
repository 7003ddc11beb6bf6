//! The in-memory workbook. A `Book` is an ordered list of named `Sheet`s, and a `Sheet` is a
//! ragged grid of `Cell`s addressed by zero-based `(row, column)`.
//!
//! Sheet names are matched case-insensitively, the way spreadsheet applications treat them.

use crate::api::Cell;
use crate::error::Res;
use anyhow::{bail, Context};
use std::ops::Range;

static EMPTY: Cell = Cell::Empty;

/// An in-memory workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    sheets: Vec<Sheet>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    /// The index of the sheet named `name`, if any.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.sheets
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.position(name).map(|ix| &self.sheets[ix])
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.position(name).map(move |ix| &mut self.sheets[ix])
    }

    /// Like `sheet` but returns an error when the sheet does not exist.
    pub fn require(&self, name: &str) -> Res<&Sheet> {
        self.sheet(name)
            .with_context(|| format!("Sheet '{name}' not found"))
    }

    /// Like `sheet_mut` but returns an error when the sheet does not exist.
    pub fn require_mut(&mut self, name: &str) -> Res<&mut Sheet> {
        self.sheet_mut(name)
            .with_context(|| format!("Sheet '{name}' not found"))
    }

    /// Adds `sheet` at the end of the book.
    pub fn push_sheet(&mut self, sheet: Sheet) -> Res<()> {
        let ix = self.sheets.len();
        self.insert_sheet(ix, sheet)
    }

    /// Inserts `sheet` at `index`. Fails if a sheet with the same name already exists.
    pub fn insert_sheet(&mut self, index: usize, sheet: Sheet) -> Res<()> {
        if self.position(sheet.name()).is_some() {
            bail!("A sheet named '{}' already exists", sheet.name());
        }
        let index = index.min(self.sheets.len());
        self.sheets.insert(index, sheet);
        Ok(())
    }

    /// Renames the sheet `from` to `to`. Renaming a sheet to a different casing of its own name is
    /// allowed.
    pub fn rename_sheet(&mut self, from: &str, to: &str) -> Res<()> {
        let ix = self
            .position(from)
            .with_context(|| format!("Cannot rename missing sheet '{from}'"))?;
        if let Some(existing) = self.position(to) {
            if existing != ix {
                bail!("Cannot rename '{from}' to '{to}', that name is already taken");
            }
        }
        self.sheets[ix].name = to.to_string();
        Ok(())
    }

    /// Moves the sheet named `name` to `index`.
    pub fn move_sheet(&mut self, name: &str, index: usize) -> Res<()> {
        let ix = self
            .position(name)
            .with_context(|| format!("Cannot move missing sheet '{name}'"))?;
        let sheet = self.sheets.remove(ix);
        let index = index.min(self.sheets.len());
        self.sheets.insert(index, sheet);
        Ok(())
    }
}

/// A named, rectangular-ish grid of cells. Rows may have different lengths; missing cells read as
/// `Cell::Empty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The header row, or an empty slice.
    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of rows held, including trailing blank rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// One past the last row that holds any non-blank cell.
    pub fn used_height(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_blank()))
            .map(|ix| ix + 1)
            .unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Writes `value` at `(row, col)`, growing the grid as needed.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<Cell>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let r = &mut self.rows[row];
        if r.len() <= col {
            r.resize_with(col + 1, Cell::default);
        }
        r[col] = value.into();
    }

    /// Writes `cells` into the first unused row and returns that row's index.
    pub fn append_row(&mut self, cells: Vec<Cell>) -> usize {
        let row = self.used_height();
        for (col, cell) in cells.into_iter().enumerate() {
            self.set_cell(row, col, cell);
        }
        row
    }

    /// Inserts an empty column at `col`, shifting cells at and right of `col` one to the right.
    pub fn insert_column(&mut self, col: usize) {
        for row in self.rows.iter_mut() {
            if col <= row.len() {
                row.insert(col, Cell::Empty);
            }
        }
    }

    /// Sets every existing cell inside `rows` x `cols` to `Cell::Empty`. The grid does not grow.
    pub fn clear(&mut self, rows: Range<usize>, cols: Range<usize>) {
        for row in self.rows.iter_mut().take(rows.end).skip(rows.start) {
            for cell in row.iter_mut().take(cols.end).skip(cols.start) {
                *cell = Cell::Empty;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_abc() -> Sheet {
        Sheet::with_rows(
            "Data",
            vec![
                vec!["a".into(), "b".into(), "c".into()],
                vec![1.0.into(), 2.0.into(), 3.0.into()],
            ],
        )
    }

    #[test]
    fn test_set_cell_grows() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(2, 3, "x");
        assert_eq!(sheet.height(), 3);
        assert_eq!(sheet.width(), 4);
        assert_eq!(sheet.cell(2, 3), &Cell::from("x"));
        assert_eq!(sheet.cell(0, 0), &Cell::Empty);
        assert_eq!(sheet.cell(99, 99), &Cell::Empty);
    }

    #[test]
    fn test_append_row_reuses_trailing_blank_rows() {
        let mut sheet = sheet_abc();
        sheet.set_cell(5, 0, "");
        assert_eq!(sheet.height(), 6);
        assert_eq!(sheet.used_height(), 2);
        let row = sheet.append_row(vec!["d".into()]);
        assert_eq!(row, 2);
        assert_eq!(sheet.cell(2, 0), &Cell::from("d"));
        assert_eq!(sheet.used_height(), 3);
    }

    #[test]
    fn test_insert_column() {
        let mut sheet = sheet_abc();
        sheet.insert_column(1);
        assert_eq!(sheet.cell(0, 0), &Cell::from("a"));
        assert_eq!(sheet.cell(0, 1), &Cell::Empty);
        assert_eq!(sheet.cell(0, 2), &Cell::from("b"));
        assert_eq!(sheet.cell(1, 3), &Cell::Number(3.0));
    }

    #[test]
    fn test_clear_does_not_grow() {
        let mut sheet = sheet_abc();
        sheet.clear(0..10, 1..10);
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.width(), 3);
        assert_eq!(sheet.cell(0, 0), &Cell::from("a"));
        assert!(sheet.cell(0, 1).is_blank());
        assert!(sheet.cell(1, 2).is_blank());
    }

    #[test]
    fn test_book_names_are_case_insensitive() {
        let mut book = Book::new();
        book.push_sheet(Sheet::new("Staff")).unwrap();
        assert!(book.sheet("staff").is_some());
        assert!(book.push_sheet(Sheet::new("STAFF")).is_err());
    }

    #[test]
    fn test_rename_and_move() {
        let mut book = Book::new();
        book.push_sheet(Sheet::new("Sheet1")).unwrap();
        book.push_sheet(Sheet::new("Staff")).unwrap();
        book.push_sheet(Sheet::new("Summary")).unwrap();
        assert!(book.rename_sheet("Sheet1", "Staff").is_err());
        book.rename_sheet("Sheet1", "Old").unwrap();
        book.move_sheet("Summary", 0).unwrap();
        assert_eq!(book.sheet_names(), vec!["Summary", "Old", "Staff"]);
        book.rename_sheet("summary", "SUMMARY").unwrap();
        assert_eq!(book.first_sheet().unwrap().name(), "SUMMARY");
    }

    #[test]
    fn test_require_missing_sheet() {
        let book = Book::new();
        let err = book.require("Transactions").unwrap_err();
        assert!(err.to_string().contains("Transactions"));
    }
}

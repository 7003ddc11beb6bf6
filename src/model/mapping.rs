use crate::api::Cell;
use crate::model::TransactionColumn;

/// Resolves where each `TransactionColumn` lives in a Transactions sheet. Built once from the
/// header row and then used unchanged for every row of one read or write.
///
/// Headers are matched by name, ignoring case and surrounding whitespace, so that columns can be
/// reordered in the workbook. A column whose header cannot be found falls back to its canonical
/// position, unless another column's header already sits there, in which case it takes the next
/// free column to the right of the header row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ColumnMap {
    indices: [usize; TransactionColumn::COUNT],
}

impl ColumnMap {
    pub fn new(header: &[Cell]) -> Self {
        let mut found = [None; TransactionColumn::COUNT];
        for column in TransactionColumn::ALL {
            found[column.position()] = header
                .iter()
                .position(|h| TransactionColumn::from_header(&h.to_text()) == Some(column));
        }

        let mut claimed: Vec<usize> = found.iter().flatten().copied().collect();
        let mut next_free = header.len();
        let mut indices = [0; TransactionColumn::COUNT];
        for column in TransactionColumn::ALL {
            indices[column.position()] = match found[column.position()] {
                Some(ix) => ix,
                None if !claimed.contains(&column.position()) => column.position(),
                None => {
                    while claimed.contains(&next_free) {
                        next_free += 1;
                    }
                    next_free
                }
            };
            claimed.push(indices[column.position()]);
        }
        Self { indices }
    }

    /// The sheet column index for `column`.
    pub fn index(&self, column: TransactionColumn) -> usize {
        self.indices[column.position()]
    }

    /// One past the right-most mapped column.
    pub fn width(&self) -> usize {
        self.indices.iter().max().map(|ix| ix + 1).unwrap_or(0)
    }
}

impl Default for ColumnMap {
    /// The canonical layout.
    fn default() -> Self {
        let mut indices = [0; TransactionColumn::COUNT];
        for column in TransactionColumn::ALL {
            indices[column.position()] = column.position();
        }
        Self { indices }
    }
}

//! Read-only, 1-indexed cell grid over one worksheet.

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::spec::{EnumCellValue, EnumSheetSelector, ParseXlsxError, SpecSheetDimensions};
use crate::util::{convert_cell_to_text, convert_excel_serial_to_datetime, parse_datetime_text};

static CELL_EMPTY: EnumCellValue = EnumCellValue::None;

/// Dense snapshot of one worksheet's effective cell values.
///
/// Rows and columns are 1-based. Reads outside the used area yield
/// [`EnumCellValue::None`], so callers never bounds-check.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    sheet_name: String,
    n_rows: usize,
    n_cols: usize,
    l_cells: Vec<EnumCellValue>,
}

impl SheetGrid {
    /// Build a grid from sparse `(row, col, value)` triples (1-based).
    ///
    /// Triples with a zero coordinate or a `None` value are dropped; later
    /// triples overwrite earlier ones at the same position.
    pub fn from_cells<I>(sheet_name: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, EnumCellValue)>,
    {
        let l_triples: Vec<(usize, usize, EnumCellValue)> = cells
            .into_iter()
            .filter(|(n_row, n_col, value)| *n_row > 0 && *n_col > 0 && !value.is_none())
            .collect();

        let n_rows = l_triples.iter().map(|(n_row, _, _)| *n_row).max().unwrap_or(0);
        let n_cols = l_triples.iter().map(|(_, n_col, _)| *n_col).max().unwrap_or(0);

        let mut l_cells = vec![EnumCellValue::None; n_rows * n_cols];
        for (n_row, n_col, value) in l_triples {
            l_cells[(n_row - 1) * n_cols + (n_col - 1)] = value;
        }

        Self {
            sheet_name: sheet_name.into(),
            n_rows,
            n_cols,
            l_cells,
        }
    }

    /// Build a grid from a decoded calamine range, keeping absolute positions.
    pub fn from_range(sheet_name: impl Into<String>, range: &Range<Data>) -> Self {
        let Some((n_row_start, n_col_start)) = range.start() else {
            return Self::from_cells(sheet_name, std::iter::empty());
        };

        let mut l_triples = Vec::new();
        for (n_idx_row, row) in range.rows().enumerate() {
            for (n_idx_col, cell) in row.iter().enumerate() {
                let value = convert_calamine_cell(cell);
                if value.is_none() {
                    continue;
                }
                l_triples.push((
                    n_row_start as usize + n_idx_row + 1,
                    n_col_start as usize + n_idx_col + 1,
                    value,
                ));
            }
        }
        Self::from_cells(sheet_name, l_triples)
    }

    /// Decode a workbook buffer and snapshot the selected worksheet.
    pub fn from_workbook_bytes(
        buffer: &[u8],
        selector: &EnumSheetSelector,
    ) -> Result<Self, ParseXlsxError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(buffer.to_vec()))
            .map_err(|err| ParseXlsxError::WorkbookOpen(err.to_string()))?;

        let l_sheet_names = workbook.sheet_names();
        if l_sheet_names.is_empty() {
            return Err(ParseXlsxError::NoWorksheet);
        }

        let c_sheet_name = match selector {
            EnumSheetSelector::Index(n_idx) => l_sheet_names.get(*n_idx).cloned().ok_or(
                ParseXlsxError::SheetIndexOutOfRange {
                    index: *n_idx,
                    count: l_sheet_names.len(),
                },
            )?,
            EnumSheetSelector::Name(c_name) => l_sheet_names
                .iter()
                .find(|c_sheet| *c_sheet == c_name)
                .cloned()
                .ok_or_else(|| ParseXlsxError::SheetNotFound(c_name.clone()))?,
        };

        let range =
            workbook
                .worksheet_range(&c_sheet_name)
                .map_err(|err| ParseXlsxError::SheetRead {
                    sheet: c_sheet_name.clone(),
                    message: err.to_string(),
                })?;

        log::debug!(
            "[PARSER] Loaded sheet {c_sheet_name:?} out of {} sheet(s)",
            l_sheet_names.len()
        );
        Ok(Self::from_range(c_sheet_name, &range))
    }

    /// Name of the worksheet this grid was read from.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Last used row number.
    pub fn row_count(&self) -> usize {
        self.n_rows
    }

    /// Last used column number.
    pub fn column_count(&self) -> usize {
        self.n_cols
    }

    /// Grid extent.
    pub fn dimensions(&self) -> SpecSheetDimensions {
        SpecSheetDimensions {
            rows: self.n_rows,
            columns: self.n_cols,
        }
    }

    /// Cell at 1-based `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> &EnumCellValue {
        if row == 0 || col == 0 || row > self.n_rows || col > self.n_cols {
            return &CELL_EMPTY;
        }
        &self.l_cells[(row - 1) * self.n_cols + (col - 1)]
    }

    /// Trimmed display text of the cell at `(row, col)`.
    pub fn cell_text(&self, row: usize, col: usize) -> String {
        convert_cell_to_text(self.cell(row, col))
    }

    /// Non-blank cell texts of `row` joined by single spaces.
    pub fn row_text(&self, row: usize) -> String {
        (1..=self.n_cols)
            .map(|n_col| self.cell_text(row, n_col))
            .filter(|c_text| !c_text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether every cell of `row` is blank.
    pub fn is_row_blank(&self, row: usize) -> bool {
        (1..=self.n_cols).all(|n_col| self.cell_text(row, n_col).is_empty())
    }

    /// Non-blank cells in row-major order as `(row, col, value)`.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &EnumCellValue)> + '_ {
        self.l_cells
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_none())
            .map(|(n_idx, value)| (n_idx / self.n_cols + 1, n_idx % self.n_cols + 1, value))
    }
}

fn convert_calamine_cell(cell: &Data) -> EnumCellValue {
    match cell {
        Data::Empty | Data::Error(_) => EnumCellValue::None,
        Data::String(s) => {
            if s.trim().is_empty() {
                EnumCellValue::None
            } else {
                EnumCellValue::String(s.clone())
            }
        }
        Data::Float(f) => EnumCellValue::Number(*f),
        Data::Int(i) => EnumCellValue::Number(*i as f64),
        Data::Bool(b) => EnumCellValue::Boolean(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if dt.is_datetime() {
                convert_excel_serial_to_datetime(serial)
                    .map(EnumCellValue::DateTime)
                    .unwrap_or(EnumCellValue::Number(serial))
            } else {
                EnumCellValue::Number(serial)
            }
        }
        Data::DateTimeIso(s) => parse_datetime_text(s)
            .map(EnumCellValue::DateTime)
            .unwrap_or_else(|| EnumCellValue::String(s.clone())),
        Data::DurationIso(s) => EnumCellValue::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> EnumCellValue {
        EnumCellValue::String(value.to_string())
    }

    #[test]
    fn test_from_cells_addresses_one_based_and_pads_outside() {
        let grid = SheetGrid::from_cells(
            "Sheet1",
            vec![
                (1, 1, text("A1")),
                (3, 2, EnumCellValue::Number(5.0)),
                (2, 4, EnumCellValue::None),
            ],
        );

        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cell(1, 1), &text("A1"));
        assert_eq!(grid.cell_text(3, 2), "5");
        assert!(grid.cell(0, 1).is_none());
        assert!(grid.cell(99, 99).is_none());
        assert!(grid.is_row_blank(2));
        assert!(grid.is_row_blank(150));
    }

    #[test]
    fn test_row_text_joins_non_blank_cells() {
        let grid = SheetGrid::from_cells(
            "Sheet1",
            vec![
                (1, 1, text("TAHUN")),
                (1, 3, EnumCellValue::Number(2025.0)),
            ],
        );
        assert_eq!(grid.row_text(1), "TAHUN 2025");
    }

    #[test]
    fn test_iter_cells_is_row_major() {
        let grid = SheetGrid::from_cells(
            "Sheet1",
            vec![(2, 1, text("b")), (1, 2, text("a")), (2, 2, text("c"))],
        );
        let l_positions: Vec<(usize, usize)> =
            grid.iter_cells().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(l_positions, vec![(1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_convert_calamine_cell_maps_variants() {
        assert_eq!(convert_calamine_cell(&Data::Int(3)), EnumCellValue::Number(3.0));
        assert_eq!(
            convert_calamine_cell(&Data::String("   ".to_string())),
            EnumCellValue::None
        );
        assert!(matches!(
            convert_calamine_cell(&Data::DateTimeIso("2025-03-15T00:00:00".to_string())),
            EnumCellValue::DateTime(_)
        ));
    }

    #[test]
    fn test_from_workbook_bytes_rejects_garbage() {
        let res = SheetGrid::from_workbook_bytes(b"not a workbook", &EnumSheetSelector::default());
        assert!(matches!(res, Err(ParseXlsxError::WorkbookOpen(_))));
    }
}

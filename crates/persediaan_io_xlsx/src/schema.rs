//! Static position-to-field mapping for the fixed report column layout.

use crate::conf::N_COLS_SCHEMA;
use crate::grid::SheetGrid;
use crate::spec::{EnumCellValue, EnumColumnKey};
use crate::util::convert_cell_to_text;

/// Field key of every column `1..=20`, in column order.
pub const TUP_COLUMN_SCHEMA: [EnumColumnKey; N_COLS_SCHEMA] = [
    EnumColumnKey::Number,
    EnumColumnKey::ItemCode,
    EnumColumnKey::ReceiptNumber,
    EnumColumnKey::Description,
    EnumColumnKey::Brand,
    EnumColumnKey::Specification,
    EnumColumnKey::FundSource,
    EnumColumnKey::Unit,
    EnumColumnKey::ProcurementQuantity,
    EnumColumnKey::ProcurementUnitPrice,
    EnumColumnKey::ProcurementTotal,
    EnumColumnKey::ProcurementDate,
    EnumColumnKey::UsageQuantity,
    EnumColumnKey::UsageUnitPrice,
    EnumColumnKey::UsageTotal,
    EnumColumnKey::UsageDate,
    EnumColumnKey::RemainingQuantity,
    EnumColumnKey::RemainingUnitPrice,
    EnumColumnKey::RemainingTotal,
    EnumColumnKey::Remark,
];

/// One physical row viewed through the column schema.
///
/// Sheets narrower than the layout simply read as blank in the missing fields.
#[derive(Debug, Clone, Copy)]
pub struct SpecMappedRow<'a> {
    /// 1-based sheet row.
    pub row: usize,
    l_cells: [&'a EnumCellValue; N_COLS_SCHEMA],
}

impl<'a> SpecMappedRow<'a> {
    /// Raw cell of `key`.
    pub fn get(&self, key: EnumColumnKey) -> &'a EnumCellValue {
        self.l_cells[key as usize]
    }

    /// Trimmed text of `key`.
    pub fn text(&self, key: EnumColumnKey) -> String {
        convert_cell_to_text(self.get(key))
    }
}

/// Map `row` of `grid` onto the canonical fields.
pub fn map_row(grid: &SheetGrid, row: usize) -> SpecMappedRow<'_> {
    SpecMappedRow {
        row,
        l_cells: TUP_COLUMN_SCHEMA.map(|key| grid.cell(row, key.column())),
    }
}

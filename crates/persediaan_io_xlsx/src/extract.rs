//! Data row extractor.
//!
//! Walks the rows below the header, threading the category carry through
//! [`classify_category`] and turning every surviving physical row into one
//! [`SpecInventoryRecord`].

use chrono::NaiveDateTime;

use crate::classify::classify_category;
use crate::conf::N_LEN_DATA_DESCRIPTION_MIN;
use crate::grid::SheetGrid;
use crate::schema::{SpecMappedRow, map_row};
use crate::spec::{
    EnumCategory, EnumCellValue, EnumColumnKey, SpecCategorySignals, SpecDataStartDetection,
    SpecExtraction, SpecInventoryRecord, SpecKeywordRules, SpecMovement, SpecParseOptions,
};
use crate::util::{
    contains_any_keyword, contains_total_word, convert_cell_to_datetime, convert_cell_to_number,
    is_bare_integer,
};

////////////////////////////////////////////////////////////////////////////////
// #region DataStart

/// Whether a mapped row carries all three data-row signals.
///
/// Bare integer row number, item code in the expected family, and a real
/// description (not the header label repeated by a merged sub-header).
pub fn is_data_row_signature(row: &SpecMappedRow<'_>, rules: &SpecKeywordRules) -> bool {
    let c_number = row.text(EnumColumnKey::Number);
    let c_item_code = row.text(EnumColumnKey::ItemCode).to_lowercase();
    let c_description = row.text(EnumColumnKey::Description);

    let if_number = is_bare_integer(&c_number);
    let if_item_code = rules
        .item_code_prefixes
        .iter()
        .any(|c_prefix| !c_prefix.is_empty() && c_item_code.starts_with(&c_prefix.to_lowercase()))
        || contains_any_keyword(&c_item_code, &rules.item_code_markers);
    let if_description = c_description.chars().count() > N_LEN_DATA_DESCRIPTION_MIN
        && !c_description
            .to_lowercase()
            .contains(&rules.description_header_label.to_lowercase());

    if_number && if_item_code && if_description
}

/// Find the first data row below `row_header`.
///
/// Falls back to `row_header + offset_data_start_default` when no row in the
/// scan window carries the data-row signature.
pub fn detect_data_start_row(
    grid: &SheetGrid,
    row_header: usize,
    options: &SpecParseOptions,
) -> SpecDataStartDetection {
    let rules = &options.keyword_rules;
    let n_row_first = row_header.saturating_add(1);
    let n_row_last = row_header.saturating_add(options.rows_data_start_scan);

    for n_row in n_row_first..=n_row_last {
        if is_data_row_signature(&map_row(grid, n_row), rules) {
            log::info!("[PARSER] Data starts at row {n_row}");
            return SpecDataStartDetection {
                row: n_row,
                if_detected: true,
            };
        }
    }

    let n_row_default = row_header.saturating_add(options.offset_data_start_default);
    log::info!(
        "[PARSER] No data row signature in rows {n_row_first}..={n_row_last}, defaulting to row {n_row_default}"
    );
    SpecDataStartDetection {
        row: n_row_default,
        if_detected: false,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RowFilters

/// Whether the lower-cased row text opens the signature block.
pub fn is_footer_row(c_row_text_lower: &str, rules: &SpecKeywordRules) -> bool {
    contains_any_keyword(c_row_text_lower, &rules.footer_markers)
}

/// Whether the row is an in-sheet subtotal line.
pub fn is_total_row(row: &SpecMappedRow<'_>) -> bool {
    contains_total_word(&row.text(EnumColumnKey::Description))
        || contains_total_word(&row.text(EnumColumnKey::Number))
}

/// Whether the row has neither a usable description nor any quantity.
pub fn is_structurally_empty_row(row: &SpecMappedRow<'_>) -> bool {
    let if_description = row.text(EnumColumnKey::Description).chars().count() > 1;
    let if_quantity = [
        EnumColumnKey::ProcurementQuantity,
        EnumColumnKey::UsageQuantity,
        EnumColumnKey::RemainingQuantity,
    ]
    .into_iter()
    .any(|key| !row.get(key).is_none());

    !if_description && !if_quantity
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Records

fn derive_movement(
    row: &SpecMappedRow<'_>,
    key_quantity: EnumColumnKey,
    key_unit_price: EnumColumnKey,
    key_total: EnumColumnKey,
    key_date: Option<EnumColumnKey>,
) -> SpecMovement {
    SpecMovement {
        quantity: convert_cell_to_number(row.get(key_quantity)),
        unit_price: convert_cell_to_number(row.get(key_unit_price)),
        total: convert_cell_to_number(row.get(key_total)),
        date: key_date.and_then(|key| convert_cell_to_datetime(row.get(key))),
    }
}

/// Build the canonical record of one mapped row.
pub fn derive_inventory_record(
    row: &SpecMappedRow<'_>,
    category: EnumCategory,
) -> SpecInventoryRecord {
    SpecInventoryRecord {
        row_source: row.row,
        number: row.text(EnumColumnKey::Number),
        item_code: row.text(EnumColumnKey::ItemCode),
        receipt_number: row.text(EnumColumnKey::ReceiptNumber),
        description: row.text(EnumColumnKey::Description),
        brand: row.text(EnumColumnKey::Brand),
        specification: row.text(EnumColumnKey::Specification),
        fund_source: row.text(EnumColumnKey::FundSource),
        unit: row.text(EnumColumnKey::Unit),
        procurement: derive_movement(
            row,
            EnumColumnKey::ProcurementQuantity,
            EnumColumnKey::ProcurementUnitPrice,
            EnumColumnKey::ProcurementTotal,
            Some(EnumColumnKey::ProcurementDate),
        ),
        usage: derive_movement(
            row,
            EnumColumnKey::UsageQuantity,
            EnumColumnKey::UsageUnitPrice,
            EnumColumnKey::UsageTotal,
            Some(EnumColumnKey::UsageDate),
        ),
        remaining: derive_movement(
            row,
            EnumColumnKey::RemainingQuantity,
            EnumColumnKey::RemainingUnitPrice,
            EnumColumnKey::RemainingTotal,
            None,
        ),
        remark: row.text(EnumColumnKey::Remark),
        category,
    }
}

/// Extract every data record below `row_header`.
///
/// Stops at the first footer marker row. Blank rows are ignored; subtotal and
/// structurally empty rows are dropped but still feed the category carry.
pub fn extract_records(
    grid: &SheetGrid,
    row_header: usize,
    options: &SpecParseOptions,
) -> SpecExtraction {
    let rules = &options.keyword_rules;
    let data_start = detect_data_start_row(grid, row_header, options);
    let n_row_last = usize::max(grid.row_count(), options.rows_data_scan_min);

    let mut l_records = Vec::new();
    let mut row_footer = None;
    let mut category_carry = EnumCategory::default();

    for n_row in data_start.row..=n_row_last {
        if grid.is_row_blank(n_row) {
            continue;
        }

        let c_row_text = grid.row_text(n_row).to_lowercase();
        if is_footer_row(&c_row_text, rules) {
            log::info!("[PARSER] Footer marker at row {n_row}, stopping data extraction");
            row_footer = Some(n_row);
            break;
        }

        let row = map_row(grid, n_row);
        let c_description = row.text(EnumColumnKey::Description);
        let c_item_code = row.text(EnumColumnKey::ItemCode);
        let c_unit = row.text(EnumColumnKey::Unit);
        let decision = classify_category(
            &SpecCategorySignals {
                description: &c_description,
                item_code: &c_item_code,
                unit: &c_unit,
            },
            category_carry,
            rules,
        );
        category_carry = decision.category;
        log::debug!(
            "[PARSER] Row {n_row}: {:?} -> {} ({:?})",
            c_description,
            decision.category,
            decision.rule
        );

        if is_total_row(&row) || is_structurally_empty_row(&row) {
            continue;
        }
        l_records.push(derive_inventory_record(&row, decision.category));
    }

    log::info!("[PARSER] Extracted {} record(s)", l_records.len());
    SpecExtraction {
        records: l_records,
        data_start,
        row_footer,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TransactionDate

/// Latest date-typed value in the transaction date columns below the header.
///
/// Text that merely looks like a date does not count.
pub fn extract_last_transaction_date(
    grid: &SheetGrid,
    row_header: usize,
    options: &SpecParseOptions,
) -> Option<NaiveDateTime> {
    (row_header.saturating_add(2)..=grid.row_count())
        .flat_map(|n_row| {
            options
                .cols_transaction_date
                .iter()
                .map(move |n_col| (n_row, *n_col))
        })
        .filter_map(|(n_row, n_col)| match grid.cell(n_row, n_col) {
            EnumCellValue::DateTime(dt) => Some(*dt),
            _ => None,
        })
        .max()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

//! `persediaan_io_xlsx` v1:
//! Rust-side reader kernel for school inventory expense/stock reports.
//!
//! Module layout:
//! - `conf`      : scan windows, keyword tables and default presets
//! - `spec`      : specs/models/options/errors
//! - `util`      : pure helper functions
//! - `grid`      : 1-indexed worksheet snapshot over `calamine`
//! - `header`    : header row locator
//! - `schema`    : fixed column layout mapping
//! - `classify`  : category classifier fold step
//! - `extract`   : data row extractor
//! - `signer`    : footer signer scanner
//! - `year`      : report year extractor
//! - `reader`    : validator and parse orchestrator
//! - `transform` : downstream row sets, totals and category sections
//! - `frame`     : Polars DataFrame / IPC export
pub mod classify;
pub mod conf;
pub mod extract;
pub mod frame;
pub mod grid;
pub mod header;
pub mod reader;
pub mod schema;
pub mod signer;
pub mod spec;
pub mod transform;
pub mod util;
pub mod year;

pub use classify::classify_category;
pub use conf::{
    N_COL_SIGNER_SPLIT, N_COLS_SCHEMA, N_ROW_HEADER_DEFAULT, N_ROWS_DATA_SCAN_MIN,
    N_ROWS_HEADER_SCAN_MAX, derive_default_keyword_rules, derive_default_parse_options,
};
pub use extract::{detect_data_start_row, extract_last_transaction_date, extract_records};
pub use frame::{derive_records_dataframe, write_records_ipc_bytes};
pub use grid::SheetGrid;
pub use header::detect_header_row;
pub use reader::{InventoryReader, parse_xlsx_bytes, validate_parse_options, validate_records};
pub use schema::{SpecMappedRow, TUP_COLUMN_SCHEMA, map_row};
pub use signer::{collect_signer_candidates, lookup_signer_name, resolve_signers, scan_footer_signers};
pub use spec::{
    EnumCategory, EnumCategoryRule, EnumCellValue, EnumColumnKey, EnumSheetSelector,
    EnumSignerRole, EnumYearFallback, ParseXlsxError, SpecCategoryDecision, SpecCategorySignals,
    SpecDataStartDetection, SpecExtraction, SpecHeaderDetection, SpecInventoryRecord,
    SpecKeywordRules, SpecMovement, SpecParseMetadata, SpecParseOptions, SpecParseResult,
    SpecReportYear, SpecSheetDimensions, SpecSigner, SpecSignerCandidate, SpecSignerInfo,
    SpecValidationReport,
};
pub use transform::{
    SpecCategorySection, SpecOpeningBalance, SpecRemainingItem, SpecStockRow, SpecStockTotals,
    aggregate_remaining_stock, calculate_remaining_totals, calculate_stock_totals,
    derive_category_sections, derive_display_name, derive_stock_rows, filter_remaining_stock,
};
pub use year::extract_report_year;

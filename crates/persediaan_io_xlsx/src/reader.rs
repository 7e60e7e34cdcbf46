//! Validator and parse orchestrator.

use crate::extract::{extract_last_transaction_date, extract_records};
use crate::grid::SheetGrid;
use crate::header::detect_header_row;
use crate::signer::scan_footer_signers;
use crate::spec::{
    ParseXlsxError, SpecInventoryRecord, SpecParseMetadata, SpecParseOptions, SpecParseResult,
    SpecValidationReport,
};
use crate::year::extract_report_year;

/// Validate an extracted record list.
///
/// Records are accepted as they are; only an empty list is a finding.
pub fn validate_records(records: &[SpecInventoryRecord]) -> SpecValidationReport {
    let mut report = SpecValidationReport {
        valid: true,
        ..Default::default()
    };
    if records.is_empty() {
        report.fail("No data found in file");
    }
    report
}

/// Reject options no sheet could be parsed with.
pub fn validate_parse_options(options: &SpecParseOptions) -> Result<(), ParseXlsxError> {
    let l_windows = [
        ("rows_header_scan_max", options.rows_header_scan_max),
        ("row_header_default", options.row_header_default),
        ("rows_data_start_scan", options.rows_data_start_scan),
        ("offset_data_start_default", options.offset_data_start_default),
        ("rows_year_scan_max", options.rows_year_scan_max),
        ("digits_signer_id_min", options.digits_signer_id_min),
    ];
    if let Some((c_name, _)) = l_windows.iter().find(|(_, n_value)| *n_value == 0) {
        return Err(ParseXlsxError::InvalidOptions(format!("{c_name} must be >= 1.")));
    }
    if options.keyword_rules.header_primary.is_empty() {
        return Err(ParseXlsxError::InvalidOptions(
            "keyword_rules.header_primary must not be empty.".to_string(),
        ));
    }
    Ok(())
}

/// Stateless inventory report reader bound to one option set.
#[derive(Debug, Clone, Default)]
pub struct InventoryReader {
    options: SpecParseOptions,
}

impl InventoryReader {
    /// Create a reader after validating `options`.
    pub fn new(options: SpecParseOptions) -> Result<Self, ParseXlsxError> {
        validate_parse_options(&options)?;
        Ok(Self { options })
    }

    /// Options in effect.
    pub fn options(&self) -> &SpecParseOptions {
        &self.options
    }

    /// Decode a workbook buffer and parse the selected sheet.
    pub fn parse_bytes(&self, buffer: &[u8]) -> Result<SpecParseResult, ParseXlsxError> {
        let grid = SheetGrid::from_workbook_bytes(buffer, &self.options.sheet)?;
        Ok(self.parse_grid(&grid))
    }

    /// Parse an already decoded sheet. Never fails: degraded detection and
    /// empty data are recorded in the result.
    pub fn parse_grid(&self, grid: &SheetGrid) -> SpecParseResult {
        let options = &self.options;

        let header = detect_header_row(grid, options);
        let extraction = extract_records(grid, header.row, options);
        let validation = validate_records(&extraction.records);
        let signer_info = scan_footer_signers(grid, options);
        let report_year = extract_report_year(grid, options);
        let last_transaction_date = extract_last_transaction_date(grid, header.row, options);

        let metadata = SpecParseMetadata {
            sheet_name: grid.sheet_name().to_string(),
            row_header: header.row,
            if_header_detected: header.if_detected,
            row_data_start: extraction.data_start.row,
            if_data_start_detected: extraction.data_start.if_detected,
            record_count: extraction.records.len(),
            sheet_dimensions: grid.dimensions(),
            signer_info,
            report_year: report_year.year,
            if_report_year_detected: report_year.if_detected,
            last_transaction_date,
        };
        log::info!(
            "[PARSER] Parsed sheet {:?} ({}): {} record(s), valid={}",
            metadata.sheet_name,
            metadata.sheet_dimensions,
            metadata.record_count,
            validation.valid
        );

        SpecParseResult {
            records: extraction.records,
            metadata,
            validation,
        }
    }
}

/// One-shot parse of a workbook buffer.
pub fn parse_xlsx_bytes(
    buffer: &[u8],
    options: &SpecParseOptions,
) -> Result<SpecParseResult, ParseXlsxError> {
    InventoryReader::new(options.clone())?.parse_bytes(buffer)
}

//! Header row locator.

use crate::conf::{N_HEADER_PRIMARY_PARTIAL_MIN, N_HEADER_SECONDARY_PARTIAL_MIN};
use crate::grid::SheetGrid;
use crate::spec::{SpecHeaderDetection, SpecParseOptions};
use crate::util::count_keyword_matches;

/// Whether keyword hit counts form a header signature.
///
/// A row qualifies with every primary keyword, or with at least two primary
/// and two secondary keywords.
pub fn is_header_signature(n_primary: usize, n_secondary: usize, n_primary_total: usize) -> bool {
    n_primary >= n_primary_total
        || (n_primary >= N_HEADER_PRIMARY_PARTIAL_MIN
            && n_secondary >= N_HEADER_SECONDARY_PARTIAL_MIN)
}

/// Find the header row among the first `rows_header_scan_max` rows.
///
/// First qualifying row wins. Falls back to `row_header_default` instead of failing.
pub fn detect_header_row(grid: &SheetGrid, options: &SpecParseOptions) -> SpecHeaderDetection {
    let rules = &options.keyword_rules;
    let n_rows_scan = usize::min(options.rows_header_scan_max, grid.row_count());

    for n_row in 1..=n_rows_scan {
        let c_row_text = grid.row_text(n_row).to_lowercase();
        if c_row_text.is_empty() {
            continue;
        }

        let n_primary = count_keyword_matches(&c_row_text, &rules.header_primary);
        let n_secondary = count_keyword_matches(&c_row_text, &rules.header_secondary);
        if is_header_signature(n_primary, n_secondary, rules.header_primary.len()) {
            log::info!(
                "[PARSER] Header row detected at row {n_row}: {:?}",
                c_row_text.chars().take(100).collect::<String>()
            );
            return SpecHeaderDetection {
                row: n_row,
                if_detected: true,
            };
        }
    }

    log::info!(
        "[PARSER] Header row not found in first {n_rows_scan} rows, defaulting to row {}",
        options.row_header_default
    );
    SpecHeaderDetection {
        row: options.row_header_default,
        if_detected: false,
    }
}

//! Report year extractor.

use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::grid::SheetGrid;
use crate::spec::{EnumYearFallback, SpecParseOptions, SpecReportYear};

static RE_YEAR_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)TAHUN\s*:?\s*([0-9]{4})").expect("year label pattern is valid"));

/// Year captured from a `TAHUN dddd` / `TAHUN : dddd` label in `text`.
pub fn parse_year_label(text: &str) -> Option<i32> {
    RE_YEAR_LABEL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Resolve the fallback policy to a concrete year.
pub fn resolve_year_fallback(fallback: EnumYearFallback) -> i32 {
    match fallback {
        EnumYearFallback::CurrentYear => Local::now().year(),
        EnumYearFallback::Fixed(n_year) => n_year,
    }
}

/// Find the reporting year in the first `rows_year_scan_max` rows.
pub fn extract_report_year(grid: &SheetGrid, options: &SpecParseOptions) -> SpecReportYear {
    let n_rows_scan = usize::min(options.rows_year_scan_max, grid.row_count());

    for n_row in 1..=n_rows_scan {
        if let Some(n_year) = parse_year_label(&grid.row_text(n_row)) {
            log::info!("[PARSER] Detected year {n_year} at row {n_row}");
            return SpecReportYear {
                year: n_year,
                if_detected: true,
            };
        }
    }

    let n_year = resolve_year_fallback(options.year_fallback);
    log::info!("[PARSER] Year not found, using fallback {n_year}");
    SpecReportYear {
        year: n_year,
        if_detected: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::EnumCellValue;

    fn text(value: &str) -> EnumCellValue {
        EnumCellValue::String(value.to_string())
    }

    #[test]
    fn test_parse_year_label_variants() {
        assert_eq!(parse_year_label("TAHUN 2025"), Some(2025));
        assert_eq!(parse_year_label("Tahun Anggaran : 2024"), None);
        assert_eq!(parse_year_label("SEMESTER II TAHUN : 2024"), Some(2024));
        assert_eq!(parse_year_label("tahun:2023"), Some(2023));
        assert_eq!(parse_year_label("LAPORAN PERSEDIAAN"), None);
    }

    #[test]
    fn test_detects_year_split_across_cells() {
        let grid = SheetGrid::from_cells(
            "Sheet1",
            vec![
                (1, 1, text("LAPORAN BEBAN PERSEDIAAN")),
                (3, 1, text("TAHUN")),
                (3, 2, EnumCellValue::Number(2025.0)),
            ],
        );
        let options = SpecParseOptions {
            year_fallback: EnumYearFallback::Fixed(1999),
            ..Default::default()
        };
        assert_eq!(
            extract_report_year(&grid, &options),
            SpecReportYear {
                year: 2025,
                if_detected: true
            }
        );
    }

    #[test]
    fn test_label_below_scan_window_uses_fixed_fallback() {
        let grid = SheetGrid::from_cells("Sheet1", vec![(25, 1, text("TAHUN 2025"))]);
        let options = SpecParseOptions {
            year_fallback: EnumYearFallback::Fixed(2030),
            ..Default::default()
        };
        assert_eq!(
            extract_report_year(&grid, &options),
            SpecReportYear {
                year: 2030,
                if_detected: false
            }
        );
    }

    #[test]
    fn test_current_year_fallback_reads_the_clock() {
        let grid = SheetGrid::from_cells("Sheet1", vec![(1, 1, text("LAPORAN"))]);
        let report_year = extract_report_year(&grid, &SpecParseOptions::default());
        assert!(!report_year.if_detected);
        assert_eq!(report_year.year, Local::now().year());
    }
}

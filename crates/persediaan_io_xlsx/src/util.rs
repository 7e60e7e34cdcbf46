//! Stateless helper utilities shared by the extraction modules.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::spec::EnumCellValue;

static RE_TOTAL_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\w*total\b").expect("total-word pattern is valid"));

const TUP_DATETIME_TEXT_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const TUP_DATE_TEXT_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Render a cell as trimmed display text; blank for `None`.
///
/// Whole numbers render without a fractional part so that `1.0` reads as `"1"`.
pub fn convert_cell_to_text(value: &EnumCellValue) -> String {
    match value {
        EnumCellValue::None => String::new(),
        EnumCellValue::String(s) => s.trim().to_string(),
        EnumCellValue::Number(n) => {
            if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        EnumCellValue::Boolean(b) => b.to_string(),
        EnumCellValue::DateTime(dt) => dt.format("%Y-%m-%d").to_string(),
    }
}

/// Coerce a cell to a number; anything unreadable becomes `0.0`.
pub fn convert_cell_to_number(value: &EnumCellValue) -> f64 {
    match value {
        EnumCellValue::Number(n) if n.is_finite() => *n,
        EnumCellValue::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        EnumCellValue::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Read a date from a date cell or from date-looking text.
pub fn convert_cell_to_datetime(value: &EnumCellValue) -> Option<NaiveDateTime> {
    match value {
        EnumCellValue::DateTime(dt) => Some(*dt),
        EnumCellValue::String(s) => parse_datetime_text(s),
        _ => None,
    }
}

/// Convert an Excel 1900-system serial number to a timestamp.
pub fn convert_excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    // 2_958_466 is 10000-01-01, the first serial Excel cannot display.
    if !serial.is_finite() || !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let dt_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let n_days = serial.trunc() as i64;
    let n_secs = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    dt_epoch.checked_add_signed(Duration::days(n_days) + Duration::seconds(n_secs))
}

/// Parse ISO timestamps and common day-first date text.
pub fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    let c_text = text.trim();
    if c_text.is_empty() {
        return None;
    }
    for c_fmt in TUP_DATETIME_TEXT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(c_text, c_fmt) {
            return Some(dt);
        }
    }
    for c_fmt in TUP_DATE_TEXT_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(c_text, c_fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TextMatching

/// Count keywords contained in already lower-cased `text_lower`.
pub fn count_keyword_matches(text_lower: &str, keywords: &[String]) -> usize {
    keywords
        .iter()
        .filter(|kw| !kw.is_empty() && text_lower.contains(kw.to_lowercase().as_str()))
        .count()
}

/// Whether lower-cased `text_lower` contains any keyword.
pub fn contains_any_keyword(text_lower: &str, keywords: &[String]) -> bool {
    count_keyword_matches(text_lower, keywords) > 0
}

/// Number of ASCII digits in `text`.
pub fn count_digits(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Whether `text` is a bare non-negative integer.
pub fn is_bare_integer(text: &str) -> bool {
    let c_text = text.trim();
    !c_text.is_empty() && c_text.chars().all(|c| c.is_ascii_digit())
}

/// Whether `text` has a word ending in "total" in any case.
///
/// Covers "Total", "Sub Total" and the one-word "Subtotal"; "Totalizer" does not match.
pub fn contains_total_word(text: &str) -> bool {
    RE_TOTAL_WORD.is_match(text)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_convert_cell_to_text_renders_whole_numbers_without_fraction() {
        assert_eq!(convert_cell_to_text(&EnumCellValue::Number(12.0)), "12");
        assert_eq!(convert_cell_to_text(&EnumCellValue::Number(2.5)), "2.5");
        assert_eq!(
            convert_cell_to_text(&EnumCellValue::String("  Pulpen ".to_string())),
            "Pulpen"
        );
        assert_eq!(convert_cell_to_text(&EnumCellValue::None), "");
    }

    #[test]
    fn test_convert_cell_to_number_falls_back_to_zero() {
        assert_eq!(convert_cell_to_number(&EnumCellValue::Number(7.5)), 7.5);
        assert_eq!(
            convert_cell_to_number(&EnumCellValue::String(" 10 ".to_string())),
            10.0
        );
        assert_eq!(
            convert_cell_to_number(&EnumCellValue::String("Rp 5.000,-".to_string())),
            0.0
        );
        assert_eq!(convert_cell_to_number(&EnumCellValue::Number(f64::NAN)), 0.0);
        assert_eq!(convert_cell_to_number(&EnumCellValue::None), 0.0);
    }

    #[test]
    fn test_convert_excel_serial_to_datetime() {
        let dt = convert_excel_serial_to_datetime(45_731.5).unwrap();
        assert_eq!(dt.to_string(), "2025-03-15 12:00:00");
        assert!(convert_excel_serial_to_datetime(-1.0).is_none());
    }

    #[test]
    fn test_parse_datetime_text_accepts_day_first_dates() {
        let dt = parse_datetime_text("31/12/2025").unwrap();
        assert_eq!(dt.to_string(), "2025-12-31 00:00:00");
        assert!(parse_datetime_text("BNU43").is_none());
    }

    #[test]
    fn test_count_keyword_matches_is_case_insensitive_on_keywords() {
        let l_kw = keywords(&["Kodering", "uraian", "satuan"]);
        assert_eq!(count_keyword_matches("no kodering uraian", &l_kw), 2);
        assert!(!contains_any_keyword("merk", &l_kw));
    }

    #[test]
    fn test_contains_total_word_matches_word_suffix() {
        assert!(contains_total_word("Total"));
        assert!(contains_total_word("SUB TOTAL"));
        assert!(contains_total_word("Subtotal"));
        assert!(contains_total_word("Grandtotal ATK"));
        assert!(contains_total_word("Total Persediaan"));
        assert!(!contains_total_word("Totalizer"));
        assert!(!contains_total_word("Pulpen"));
    }

    #[test]
    fn test_is_bare_integer() {
        assert!(is_bare_integer("12"));
        assert!(!is_bare_integer("1."));
        assert!(!is_bare_integer(""));
    }
}

//! Extraction constants and default preset factories.

use crate::spec::{SpecKeywordRules, SpecParseOptions};

/// Rows scanned from the top for the header signature.
pub const N_ROWS_HEADER_SCAN_MAX: usize = 20;
/// Header row assumed when no signature matches.
pub const N_ROW_HEADER_DEFAULT: usize = 6;
/// Primary keyword hits needed for a partial header match.
pub const N_HEADER_PRIMARY_PARTIAL_MIN: usize = 2;
/// Secondary keyword hits needed for a partial header match.
pub const N_HEADER_SECONDARY_PARTIAL_MIN: usize = 2;
/// Rows below the header scanned for the first data row.
pub const N_ROWS_DATA_START_SCAN: usize = 6;
/// Data start offset from the header when detection fails.
pub const N_OFFSET_DATA_START_DEFAULT: usize = 3;
/// Data descriptions must be longer than this.
pub const N_LEN_DATA_DESCRIPTION_MIN: usize = 5;
/// Last data row scanned is at least this.
pub const N_ROWS_DATA_SCAN_MIN: usize = 200;
/// Width of the fixed report column layout.
pub const N_COLS_SCHEMA: usize = 20;
/// Signer candidates at or left of this column are the principal.
pub const N_COL_SIGNER_SPLIT: usize = 8;
/// Minimum digit count of an identifier cell.
pub const N_DIGITS_SIGNER_ID_MIN: usize = 12;
/// Identifier cells must be shorter than this.
pub const N_LEN_SIGNER_CELL_MAX: usize = 50;
/// Signer names must be longer than this.
pub const N_LEN_SIGNER_NAME_MIN: usize = 3;
/// Rows above an identifier searched for the signer name.
pub const N_ROWS_SIGNER_NAME_LOOKBACK: usize = 2;
/// Rows scanned from the top for the report year.
pub const N_ROWS_YEAR_SCAN_MAX: usize = 20;
/// Procurement date (L) and usage date (P) columns.
pub const TUP_COLS_TRANSACTION_DATE: [usize; 2] = [12, 16];

const TUP_HEADER_PRIMARY: [&str; 3] = ["kodering", "uraian", "satuan"];
const TUP_HEADER_SECONDARY: [&str; 5] = ["pengadaan", "penggunaan", "sisa", "no bukti", "merk"];
const TUP_FOOTER_MARKERS: [&str; 3] = ["mengetahui", "atasan langsung", "kepala sekolah"];
const TUP_ITEM_CODE_PREFIXES: [&str; 1] = ["5."];
const TUP_ITEM_CODE_MARKERS: [&str; 1] = ["5.1.02"];
const TUP_ATK_EXCEPTIONS: [&str; 11] = [
    "amplop",
    "map",
    "stopmap",
    "kertas hvs",
    "kertas f4",
    "kertas a4",
    "label",
    "stiker",
    "sticky note",
    "post-it",
    "kartu nama",
];
const TUP_CETAKAN_PHRASES: [&str; 5] = [
    "cetakan",
    "fotocopy",
    "fotokopi",
    "cetak foto",
    "barang cetakan",
];
const TUP_CODE_KEYWORDS_CETAKAN: [&str; 4] = ["cetak", "fotocopy", "dokumen", "benda pos"];
const TUP_CODE_KEYWORDS_ATK: [&str; 2] = ["alat tulis kantor", "atk"];
const TUP_CODE_KEYWORDS_LAIN_LAIN: [&str; 3] = ["komputer", "kebersihan", "perabot"];
const TUP_SIGNER_LABEL_WORDS: [&str; 3] = ["mengetahui", "pihak", "kepala"];

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Build the keyword tables observed in the school inventory report family.
pub fn derive_default_keyword_rules() -> SpecKeywordRules {
    SpecKeywordRules {
        header_primary: to_owned_list(&TUP_HEADER_PRIMARY),
        header_secondary: to_owned_list(&TUP_HEADER_SECONDARY),
        footer_markers: to_owned_list(&TUP_FOOTER_MARKERS),
        description_header_label: "uraian".to_string(),
        item_code_prefixes: to_owned_list(&TUP_ITEM_CODE_PREFIXES),
        item_code_markers: to_owned_list(&TUP_ITEM_CODE_MARKERS),
        atk_exceptions: to_owned_list(&TUP_ATK_EXCEPTIONS),
        cetakan_phrases: to_owned_list(&TUP_CETAKAN_PHRASES),
        code_keywords_cetakan: to_owned_list(&TUP_CODE_KEYWORDS_CETAKAN),
        code_keywords_atk: to_owned_list(&TUP_CODE_KEYWORDS_ATK),
        code_keywords_lain_lain: to_owned_list(&TUP_CODE_KEYWORDS_LAIN_LAIN),
        signer_id_keyword: "nip".to_string(),
        signer_label_words: to_owned_list(&TUP_SIGNER_LABEL_WORDS),
    }
}

/// Build default parse options.
pub fn derive_default_parse_options() -> SpecParseOptions {
    SpecParseOptions::default()
}

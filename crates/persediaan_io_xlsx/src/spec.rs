//! Shared extraction models, options and errors.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conf::{
    N_COL_SIGNER_SPLIT, N_DIGITS_SIGNER_ID_MIN, N_LEN_SIGNER_CELL_MAX, N_LEN_SIGNER_NAME_MIN,
    N_OFFSET_DATA_START_DEFAULT, N_ROW_HEADER_DEFAULT, N_ROWS_DATA_SCAN_MIN,
    N_ROWS_DATA_START_SCAN, N_ROWS_HEADER_SCAN_MAX, N_ROWS_YEAR_SCAN_MAX,
    TUP_COLS_TRANSACTION_DATE, derive_default_keyword_rules,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellValue

/// Effective value of one worksheet cell (formula cells carry their cached result).
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// Date-typed value.
    DateTime(NaiveDateTime),
}

impl EnumCellValue {
    /// Whether the cell holds nothing.
    pub fn is_none(&self) -> bool {
        matches!(self, EnumCellValue::None)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Category

/// Inventory category assigned by the classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum EnumCategory {
    /// Office supplies (Alat Tulis Kantor).
    #[serde(rename = "ATK")]
    Atk,
    /// Printed goods and printing services.
    #[serde(rename = "Cetakan")]
    Cetakan,
    /// Everything else.
    #[default]
    #[serde(rename = "Lain-lain")]
    LainLain,
}

impl EnumCategory {
    /// All categories in report section order.
    pub const ALL: [EnumCategory; 3] = [
        EnumCategory::Atk,
        EnumCategory::Cetakan,
        EnumCategory::LainLain,
    ];

    /// Short label.
    pub fn label(&self) -> &'static str {
        match self {
            EnumCategory::Atk => "ATK",
            EnumCategory::Cetakan => "Cetakan",
            EnumCategory::LainLain => "Lain-lain",
        }
    }

    /// Section caption used on signed reports.
    pub fn label_full(&self) -> &'static str {
        match self {
            EnumCategory::Atk => "Persediaan Alat Tulis Kantor (ATK)",
            EnumCategory::Cetakan => "Persediaan Barang Cetakan",
            EnumCategory::LainLain => "Persediaan Lain - Lain",
        }
    }
}

impl fmt::Display for EnumCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which classifier rule produced a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCategoryRule {
    /// Description hit the ATK exception list.
    AtkException,
    /// Description carries an explicit printed-goods phrase.
    CetakanPhrase,
    /// Item code carries a printing/document/postal keyword.
    CodeCetakan,
    /// Item code carries an office-supply keyword.
    CodeAtk,
    /// Item code carries a computer/cleaning/furniture keyword.
    CodeLainLain,
    /// No signal; carried forward from the previous row.
    Inherited,
}

/// Raw row fields the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecCategorySignals<'a> {
    /// Item description (column 4).
    pub description: &'a str,
    /// Item code (column 2).
    pub item_code: &'a str,
    /// Unit of measure (column 8). Never used as a classification signal.
    pub unit: &'a str,
}

/// One classifier step result; `category` is also the next carry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecCategoryDecision {
    /// Assigned category.
    pub category: EnumCategory,
    /// Rule that fired.
    pub rule: EnumCategoryRule,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnSchema

/// Canonical field keys for the fixed 20-column report layout.
///
/// Declaration order is column order: `key as usize + 1` is the 1-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnumColumnKey {
    /// A: row number.
    Number,
    /// B: item code (kodering).
    ItemCode,
    /// C: receipt number.
    ReceiptNumber,
    /// D: item description.
    Description,
    /// E: brand.
    Brand,
    /// F: specification / sub-type.
    Specification,
    /// G: fund source.
    FundSource,
    /// H: unit of measure.
    Unit,
    /// I: procurement quantity.
    ProcurementQuantity,
    /// J: procurement unit price.
    ProcurementUnitPrice,
    /// K: procurement total.
    ProcurementTotal,
    /// L: procurement date.
    ProcurementDate,
    /// M: usage quantity.
    UsageQuantity,
    /// N: usage unit price.
    UsageUnitPrice,
    /// O: usage total.
    UsageTotal,
    /// P: usage date.
    UsageDate,
    /// Q: remaining quantity.
    RemainingQuantity,
    /// R: remaining unit price.
    RemainingUnitPrice,
    /// S: remaining total.
    RemainingTotal,
    /// T: remark.
    Remark,
}

impl EnumColumnKey {
    /// 1-based worksheet column of this key.
    pub fn column(&self) -> usize {
        *self as usize + 1
    }

    /// Canonical snake-case field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumColumnKey::Number => "number",
            EnumColumnKey::ItemCode => "item_code",
            EnumColumnKey::ReceiptNumber => "receipt_number",
            EnumColumnKey::Description => "description",
            EnumColumnKey::Brand => "brand",
            EnumColumnKey::Specification => "specification",
            EnumColumnKey::FundSource => "fund_source",
            EnumColumnKey::Unit => "unit",
            EnumColumnKey::ProcurementQuantity => "procurement_quantity",
            EnumColumnKey::ProcurementUnitPrice => "procurement_unit_price",
            EnumColumnKey::ProcurementTotal => "procurement_total",
            EnumColumnKey::ProcurementDate => "procurement_date",
            EnumColumnKey::UsageQuantity => "usage_quantity",
            EnumColumnKey::UsageUnitPrice => "usage_unit_price",
            EnumColumnKey::UsageTotal => "usage_total",
            EnumColumnKey::UsageDate => "usage_date",
            EnumColumnKey::RemainingQuantity => "remaining_quantity",
            EnumColumnKey::RemainingUnitPrice => "remaining_unit_price",
            EnumColumnKey::RemainingTotal => "remaining_total",
            EnumColumnKey::Remark => "remark",
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Records

/// Quantity triple for one stock movement.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SpecMovement {
    /// Item count.
    pub quantity: f64,
    /// Price per unit.
    pub unit_price: f64,
    /// Line total.
    pub total: f64,
    /// Transaction date, when the sheet has one.
    pub date: Option<NaiveDateTime>,
}

/// One surviving data row of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecInventoryRecord {
    /// Physical 1-based sheet row the record came from.
    pub row_source: usize,
    /// Row number text as written in the sheet.
    pub number: String,
    /// Item code (kodering).
    pub item_code: String,
    /// Receipt number.
    pub receipt_number: String,
    /// Item name.
    pub description: String,
    /// Brand.
    pub brand: String,
    /// Optional sub-type.
    pub specification: String,
    /// Fund source.
    pub fund_source: String,
    /// Unit of measure.
    pub unit: String,
    /// Opening/procurement movement.
    pub procurement: SpecMovement,
    /// Usage movement.
    pub usage: SpecMovement,
    /// Remaining-balance movement.
    pub remaining: SpecMovement,
    /// Free-text remark.
    pub remark: String,
    /// Assigned category.
    pub category: EnumCategory,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Signers

/// Name and identifier of one document signer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SpecSigner {
    /// Signer name; empty when not found.
    pub name: String,
    /// Signer identifier (NIP); empty when not found.
    pub id: String,
}

impl SpecSigner {
    /// Whether neither name nor id was recovered.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.id.is_empty()
    }
}

/// Signers recovered from the report footer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SpecSignerInfo {
    /// Left-side signer (kepala sekolah).
    pub principal: SpecSigner,
    /// Right-side signer (pengurus barang).
    pub asset_clerk: SpecSigner,
}

impl SpecSignerInfo {
    /// Mutable slot for `role`.
    pub fn signer_mut(&mut self, role: EnumSignerRole) -> &mut SpecSigner {
        match role {
            EnumSignerRole::Principal => &mut self.principal,
            EnumSignerRole::AssetClerk => &mut self.asset_clerk,
        }
    }
}

/// Signer role, decided by column side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSignerRole {
    /// Left side of the footer.
    Principal,
    /// Right side of the footer.
    AssetClerk,
}

/// One identifier-like cell found anywhere in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSignerCandidate {
    /// 1-based row.
    pub row: usize,
    /// 1-based column.
    pub col: usize,
    /// Cell text as found.
    pub text_raw: String,
    /// Text with a leading `NIP.` prefix removed.
    pub id_clean: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Detection

/// Header locator outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecHeaderDetection {
    /// 1-based header row.
    pub row: usize,
    /// `false` when `row` is the configured fallback.
    pub if_detected: bool,
}

/// Data-start detection outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecDataStartDetection {
    /// 1-based first data row.
    pub row: usize,
    /// `false` when `row` is the configured fallback offset.
    pub if_detected: bool,
}

/// Report year outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecReportYear {
    /// Year value.
    pub year: i32,
    /// `false` when `year` came from the fallback policy.
    pub if_detected: bool,
}

/// Data row extractor output.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecExtraction {
    /// Records in document order.
    pub records: Vec<SpecInventoryRecord>,
    /// Where extraction started.
    pub data_start: SpecDataStartDetection,
    /// Row where the footer marker stopped extraction, if any.
    pub row_footer: Option<usize>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Hand-curated keyword tables driving every heuristic.
///
/// Matching is case-insensitive substring containment against lower-cased text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecKeywordRules {
    /// Header keywords that must all match (or at least two of them).
    pub header_primary: Vec<String>,
    /// Optional header keywords.
    pub header_secondary: Vec<String>,
    /// Phrases marking the start of the signature block.
    pub footer_markers: Vec<String>,
    /// Literal description header label, rejected as a data description.
    pub description_header_label: String,
    /// Item-code prefixes of a real data row.
    pub item_code_prefixes: Vec<String>,
    /// Item-code fragments of a real data row.
    pub item_code_markers: Vec<String>,
    /// Description words that force ATK regardless of unit.
    pub atk_exceptions: Vec<String>,
    /// Description phrases that mean printed goods.
    pub cetakan_phrases: Vec<String>,
    /// Item-code keywords for printed goods.
    pub code_keywords_cetakan: Vec<String>,
    /// Item-code keywords for office supplies.
    pub code_keywords_atk: Vec<String>,
    /// Item-code keywords for other goods.
    pub code_keywords_lain_lain: Vec<String>,
    /// Token marking an identifier cell.
    pub signer_id_keyword: String,
    /// Section captions that are never signer names.
    pub signer_label_words: Vec<String>,
}

impl Default for SpecKeywordRules {
    fn default() -> Self {
        derive_default_keyword_rules()
    }
}

impl SpecKeywordRules {
    /// Load keyword tables from JSON; missing keys keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ParseXlsxError> {
        serde_json::from_str(text)
            .map_err(|err| ParseXlsxError::InvalidOptions(format!("Invalid keyword rules: {err}")))
    }

    /// Serialize keyword tables to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ParseXlsxError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ParseXlsxError::InvalidOptions(format!("Invalid keyword rules: {err}")))
    }
}

/// Which worksheet of the workbook to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumSheetSelector {
    /// Zero-based sheet position.
    Index(usize),
    /// Exact sheet name.
    Name(String),
}

impl Default for EnumSheetSelector {
    fn default() -> Self {
        EnumSheetSelector::Index(0)
    }
}

/// Report year used when no `TAHUN dddd` label is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumYearFallback {
    /// Current local calendar year.
    #[default]
    CurrentYear,
    /// Fixed year.
    Fixed(i32),
}

/// Parse options. Every heuristic constant is a named, injectable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecParseOptions {
    /// Worksheet to read.
    pub sheet: EnumSheetSelector,
    /// Rows scanned from the top for the header signature.
    pub rows_header_scan_max: usize,
    /// Header row used when no signature matches.
    pub row_header_default: usize,
    /// Rows below the header scanned for the first data row.
    pub rows_data_start_scan: usize,
    /// First data row offset from the header when detection fails.
    pub offset_data_start_default: usize,
    /// Lower bound of the last row scanned for data.
    pub rows_data_scan_min: usize,
    /// 1-based columns holding transaction dates.
    pub cols_transaction_date: Vec<usize>,
    /// Candidates at or left of this column belong to the principal.
    pub col_signer_split: usize,
    /// Minimum digit count of an identifier cell.
    pub digits_signer_id_min: usize,
    /// Identifier cells must be shorter than this.
    pub len_signer_cell_max: usize,
    /// Signer names must be longer than this.
    pub len_signer_name_min: usize,
    /// Rows scanned from the top for the report year.
    pub rows_year_scan_max: usize,
    /// Year fallback policy.
    pub year_fallback: EnumYearFallback,
    /// Keyword tables.
    pub keyword_rules: SpecKeywordRules,
}

impl Default for SpecParseOptions {
    fn default() -> Self {
        Self {
            sheet: EnumSheetSelector::default(),
            rows_header_scan_max: N_ROWS_HEADER_SCAN_MAX,
            row_header_default: N_ROW_HEADER_DEFAULT,
            rows_data_start_scan: N_ROWS_DATA_START_SCAN,
            offset_data_start_default: N_OFFSET_DATA_START_DEFAULT,
            rows_data_scan_min: N_ROWS_DATA_SCAN_MIN,
            cols_transaction_date: TUP_COLS_TRANSACTION_DATE.to_vec(),
            col_signer_split: N_COL_SIGNER_SPLIT,
            digits_signer_id_min: N_DIGITS_SIGNER_ID_MIN,
            len_signer_cell_max: N_LEN_SIGNER_CELL_MAX,
            len_signer_name_min: N_LEN_SIGNER_NAME_MIN,
            rows_year_scan_max: N_ROWS_YEAR_SCAN_MAX,
            year_fallback: EnumYearFallback::default(),
            keyword_rules: SpecKeywordRules::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ResultEnvelope

/// Validation outcome of one parse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SpecValidationReport {
    /// Whether the dataset is accepted.
    pub valid: bool,
    /// Fatal findings.
    pub errors: Vec<String>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
}

impl SpecValidationReport {
    /// Add an error message and mark the report invalid.
    pub fn fail(&mut self, msg: impl AsRef<str>) {
        self.valid = false;
        self.errors.push(msg.as_ref().to_string());
    }
}

/// Sheet extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpecSheetDimensions {
    /// Row count.
    pub rows: usize,
    /// Column count.
    pub columns: usize,
}

impl fmt::Display for SpecSheetDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} columns", self.rows, self.columns)
    }
}

/// Metadata assembled next to the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecParseMetadata {
    /// Name of the sheet that was read.
    pub sheet_name: String,
    /// 1-based header row.
    pub row_header: usize,
    /// `false` when the header row is the fallback.
    pub if_header_detected: bool,
    /// 1-based first data row.
    pub row_data_start: usize,
    /// `false` when the data start row is the fallback.
    pub if_data_start_detected: bool,
    /// Number of records.
    pub record_count: usize,
    /// Sheet extent.
    pub sheet_dimensions: SpecSheetDimensions,
    /// Recovered signers.
    pub signer_info: SpecSignerInfo,
    /// Reporting year.
    pub report_year: i32,
    /// `false` when the year is the fallback.
    pub if_report_year_detected: bool,
    /// Latest procurement/usage date.
    pub last_transaction_date: Option<NaiveDateTime>,
}

/// Envelope returned by one parse call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecParseResult {
    /// Extracted records.
    pub records: Vec<SpecInventoryRecord>,
    /// Detection metadata.
    pub metadata: SpecParseMetadata,
    /// Validation outcome.
    pub validation: SpecValidationReport,
}

impl SpecParseResult {
    /// Serialize the whole envelope to JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Fatal parse failures. Degraded detection never lands here.
#[derive(Debug, Error)]
pub enum ParseXlsxError {
    /// Buffer is not a readable workbook.
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),
    /// Workbook has no worksheet at all.
    #[error("No worksheet found in file")]
    NoWorksheet,
    /// Index selection points past the last sheet.
    #[error("Sheet index {index} out of range: workbook has {count} sheet(s)")]
    SheetIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Available sheet count.
        count: usize,
    },
    /// Name selection matches no sheet.
    #[error("Sheet not found: {0:?}")]
    SheetNotFound(String),
    /// Selected sheet could not be decoded.
    #[error("Failed to read sheet {sheet:?}: {message}")]
    SheetRead {
        /// Sheet name.
        sheet: String,
        /// Underlying decoder error text.
        message: String,
    },
    /// Options failed validation.
    #[error("{0}")]
    InvalidOptions(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

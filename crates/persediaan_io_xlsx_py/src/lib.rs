use persediaan_io_xlsx::{
    EnumSheetSelector, EnumYearFallback, ParseXlsxError, SpecKeywordRules, SpecParseMetadata,
    SpecParseOptions, SpecSigner, SpecValidationReport, derive_default_parse_options,
    parse_xlsx_bytes, write_records_ipc_bytes,
};
use pyo3::exceptions::{PyIndexError, PyKeyError, PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyBytes, PyDict};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "persediaan.xlsx.reader.v1";
const C_BRIDGE_TRANSPORT: &str = "polars_ipc";
const C_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn map_parse_xlsx_error(exception: ParseXlsxError) -> PyErr {
    match exception {
        ParseXlsxError::SheetIndexOutOfRange { .. } => {
            PyIndexError::new_err(exception.to_string())
        }
        ParseXlsxError::SheetNotFound(_) => PyKeyError::new_err(exception.to_string()),
        ParseXlsxError::WorkbookOpen(_)
        | ParseXlsxError::NoWorksheet
        | ParseXlsxError::SheetRead { .. }
        | ParseXlsxError::InvalidOptions(_) => PyValueError::new_err(exception.to_string()),
    }
}

fn parse_sheet_selector(sheet: Option<&Bound<'_, PyAny>>) -> PyResult<EnumSheetSelector> {
    let Some(obj) = sheet else {
        return Ok(EnumSheetSelector::default());
    };
    if let Ok(n_idx) = obj.extract::<usize>() {
        return Ok(EnumSheetSelector::Index(n_idx));
    }
    if let Ok(c_name) = obj.extract::<String>() {
        return Ok(EnumSheetSelector::Name(c_name));
    }
    Err(PyTypeError::new_err(
        "`sheet` must be a non-negative int index or a sheet name str.",
    ))
}

fn create_signer_dict<'py>(py: Python<'py>, signer: &SpecSigner) -> PyResult<Bound<'py, PyDict>> {
    let dict_signer = PyDict::new(py);
    dict_signer.set_item("name", signer.name.as_str())?;
    dict_signer.set_item("id", signer.id.as_str())?;
    Ok(dict_signer)
}

fn create_metadata_dict<'py>(
    py: Python<'py>,
    metadata: &SpecParseMetadata,
) -> PyResult<Bound<'py, PyDict>> {
    let dict_signer_info = PyDict::new(py);
    dict_signer_info.set_item(
        "principal",
        create_signer_dict(py, &metadata.signer_info.principal)?,
    )?;
    dict_signer_info.set_item(
        "asset_clerk",
        create_signer_dict(py, &metadata.signer_info.asset_clerk)?,
    )?;

    let dict_metadata = PyDict::new(py);
    dict_metadata.set_item("sheet_name", metadata.sheet_name.as_str())?;
    dict_metadata.set_item("row_header", metadata.row_header)?;
    dict_metadata.set_item("if_header_detected", metadata.if_header_detected)?;
    dict_metadata.set_item("row_data_start", metadata.row_data_start)?;
    dict_metadata.set_item("if_data_start_detected", metadata.if_data_start_detected)?;
    dict_metadata.set_item("record_count", metadata.record_count)?;
    dict_metadata.set_item("sheet_dimensions", metadata.sheet_dimensions.to_string())?;
    dict_metadata.set_item("signer_info", dict_signer_info)?;
    dict_metadata.set_item("report_year", metadata.report_year)?;
    dict_metadata.set_item("if_report_year_detected", metadata.if_report_year_detected)?;
    dict_metadata.set_item(
        "last_transaction_date",
        metadata
            .last_transaction_date
            .map(|dt| dt.format(C_DATE_FORMAT).to_string()),
    )?;
    Ok(dict_metadata)
}

fn create_validation_dict<'py>(
    py: Python<'py>,
    validation: &SpecValidationReport,
) -> PyResult<Bound<'py, PyDict>> {
    let dict_validation = PyDict::new(py);
    dict_validation.set_item("valid", validation.valid)?;
    dict_validation.set_item("errors", validation.errors.clone())?;
    dict_validation.set_item("warnings", validation.warnings.clone())?;
    Ok(dict_validation)
}

#[pyfunction(name = "parse_xlsx_bytes")]
#[pyo3(signature = (
    buffer,
    sheet = None,
    row_header_default = 6,
    year_fallback = None,
    keyword_rules_json = None
))]
fn parse_xlsx_bytes_py<'py>(
    py: Python<'py>,
    buffer: &[u8],
    sheet: Option<&Bound<'_, PyAny>>,
    row_header_default: usize,
    year_fallback: Option<i32>,
    keyword_rules_json: Option<&str>,
) -> PyResult<Bound<'py, PyDict>> {
    let keyword_rules = match keyword_rules_json {
        Some(c_json) => SpecKeywordRules::from_json_str(c_json).map_err(map_parse_xlsx_error)?,
        None => SpecKeywordRules::default(),
    };
    let cfg_options = SpecParseOptions {
        sheet: parse_sheet_selector(sheet)?,
        row_header_default,
        year_fallback: year_fallback
            .map(EnumYearFallback::Fixed)
            .unwrap_or_default(),
        keyword_rules,
        ..derive_default_parse_options()
    };

    let v_buffer = buffer.to_vec();
    let res_parse = py.allow_threads(|| {
        let result = parse_xlsx_bytes(&v_buffer, &cfg_options).map_err(map_parse_xlsx_error)?;
        let v_ipc = write_records_ipc_bytes(&result.records).map_err(|err| {
            PyRuntimeError::new_err(format!("Failed to encode records as IPC: {err}"))
        })?;
        Ok::<_, PyErr>((result, v_ipc))
    });
    let (result, v_ipc) = res_parse?;

    let dict_result = PyDict::new(py);
    dict_result.set_item("metadata", create_metadata_dict(py, &result.metadata)?)?;
    dict_result.set_item("validation", create_validation_dict(py, &result.validation)?)?;
    dict_result.set_item("records_ipc", PyBytes::new(py, &v_ipc))?;
    Ok(dict_result)
}

#[pyfunction(name = "keyword_rules_default_json")]
fn keyword_rules_default_json_py() -> PyResult<String> {
    SpecKeywordRules::default()
        .to_json_string()
        .map_err(map_parse_xlsx_error)
}

#[pymodule]
fn _persediaan_io_xlsx_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(parse_xlsx_bytes_py, module)?)?;
    module.add_function(wrap_pyfunction!(keyword_rules_default_json_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}

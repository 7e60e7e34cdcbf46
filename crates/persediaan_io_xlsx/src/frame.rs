//! Polars export of extracted records.

use chrono::NaiveDateTime;
use polars::prelude::{Column, DataFrame, IpcWriter, PolarsResult, SerWriter};

use crate::spec::{SpecInventoryRecord, SpecMovement};

const C_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_date(date: Option<NaiveDateTime>) -> Option<String> {
    date.map(|dt| dt.format(C_DATE_FORMAT).to_string())
}

fn create_text_column(
    name: &str,
    records: &[SpecInventoryRecord],
    f: impl Fn(&SpecInventoryRecord) -> &str,
) -> Column {
    let l_values: Vec<String> = records.iter().map(|r| f(r).to_string()).collect();
    Column::new(name.into(), l_values)
}

fn create_movement_columns(
    prefix: &str,
    records: &[SpecInventoryRecord],
    f: impl Fn(&SpecInventoryRecord) -> &SpecMovement,
    if_date: bool,
) -> Vec<Column> {
    let l_quantity: Vec<f64> = records.iter().map(|r| f(r).quantity).collect();
    let l_unit_price: Vec<f64> = records.iter().map(|r| f(r).unit_price).collect();
    let l_total: Vec<f64> = records.iter().map(|r| f(r).total).collect();

    let mut l_columns = vec![
        Column::new(format!("{prefix}_quantity").into(), l_quantity),
        Column::new(format!("{prefix}_unit_price").into(), l_unit_price),
        Column::new(format!("{prefix}_total").into(), l_total),
    ];
    if if_date {
        let l_date: Vec<Option<String>> = records.iter().map(|r| format_date(f(r).date)).collect();
        l_columns.push(Column::new(format!("{prefix}_date").into(), l_date));
    }
    l_columns
}

/// One row per record, one column per canonical field.
///
/// Dates become ISO-8601 strings and the category its short label.
pub fn derive_records_dataframe(records: &[SpecInventoryRecord]) -> PolarsResult<DataFrame> {
    let l_row_source: Vec<i64> = records.iter().map(|r| r.row_source as i64).collect();
    let l_category: Vec<String> = records
        .iter()
        .map(|r| r.category.label().to_string())
        .collect();

    let mut l_columns = vec![
        Column::new("row_source".into(), l_row_source),
        create_text_column("number", records, |r| r.number.as_str()),
        create_text_column("item_code", records, |r| r.item_code.as_str()),
        create_text_column("receipt_number", records, |r| r.receipt_number.as_str()),
        create_text_column("description", records, |r| r.description.as_str()),
        create_text_column("brand", records, |r| r.brand.as_str()),
        create_text_column("specification", records, |r| r.specification.as_str()),
        create_text_column("fund_source", records, |r| r.fund_source.as_str()),
        create_text_column("unit", records, |r| r.unit.as_str()),
    ];
    l_columns.extend(create_movement_columns("procurement", records, |r| &r.procurement, true));
    l_columns.extend(create_movement_columns("usage", records, |r| &r.usage, true));
    l_columns.extend(create_movement_columns("remaining", records, |r| &r.remaining, false));
    l_columns.push(create_text_column("remark", records, |r| r.remark.as_str()));
    l_columns.push(Column::new("category".into(), l_category));

    DataFrame::new(l_columns)
}

/// Serialize the records frame to Polars IPC bytes.
pub fn write_records_ipc_bytes(records: &[SpecInventoryRecord]) -> PolarsResult<Vec<u8>> {
    let mut df = derive_records_dataframe(records)?;
    let mut v_buffer: Vec<u8> = Vec::new();
    IpcWriter::new(&mut v_buffer).finish(&mut df)?;
    Ok(v_buffer)
}

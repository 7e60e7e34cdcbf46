//! Downstream shaping of extracted records for report renderers.
//!
//! Nothing here lays out a document; it only derives the row sets, totals and
//! category sections the renderers print.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::spec::{EnumCategory, SpecInventoryRecord, SpecMovement};

const C_UNIT_DEFAULT: &str = "buah";
const TUP_SECTION_LETTERS: [char; 3] = ['A', 'B', 'C'];

////////////////////////////////////////////////////////////////////////////////
// #region Models

/// Caller-supplied opening balance of one item, keyed by its description.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecOpeningBalance {
    /// Item count carried over from the previous period.
    pub quantity: f64,
    /// Price per unit.
    pub unit_price: f64,
}

/// One stock-opname row; exactly one per extracted record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecStockRow {
    /// 1-based row number.
    pub no: usize,
    /// Description with the specification appended.
    pub display_name: String,
    /// Bare description.
    pub description: String,
    /// Specification.
    pub specification: String,
    /// Unit of measure.
    pub unit: String,
    /// Category.
    pub category: EnumCategory,
    /// Opening balance.
    pub opening: SpecMovement,
    /// Procurement movement.
    pub procurement: SpecMovement,
    /// Usage movement.
    pub usage: SpecMovement,
    /// Remaining balance.
    pub remaining: SpecMovement,
}

/// Item still in stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecRemainingItem {
    /// 1-based row number.
    pub no: usize,
    /// Item name.
    pub name: String,
    /// Specification.
    pub specification: String,
    /// Remaining count.
    pub quantity: f64,
    /// Price per unit.
    pub unit_price: f64,
    /// Remaining value.
    pub total: f64,
    /// Unit of measure.
    pub unit: String,
    /// Category.
    pub category: EnumCategory,
}

/// Column sums of a row set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SpecStockTotals {
    /// Opening balance quantity.
    pub opening_quantity: f64,
    /// Opening balance value.
    pub opening_total: f64,
    /// Procured quantity.
    pub procurement_quantity: f64,
    /// Procured value.
    pub procurement_total: f64,
    /// Used quantity.
    pub usage_quantity: f64,
    /// Used value.
    pub usage_total: f64,
    /// Remaining quantity.
    pub remaining_quantity: f64,
    /// Remaining value.
    pub remaining_total: f64,
    /// Number of rows summed.
    pub item_count: usize,
}

/// One lettered category section of a stock-opname report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecCategorySection {
    /// Section category.
    pub category: EnumCategory,
    /// Caption such as "A. Persediaan Alat Tulis Kantor (ATK)".
    pub caption: String,
    /// Rows in input order.
    pub rows: Vec<SpecStockRow>,
    /// Column sums of `rows`.
    pub subtotal: SpecStockTotals,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StockRows

/// `"description - specification"`, or the description alone.
pub fn derive_display_name(description: &str, specification: &str) -> String {
    let c_description = description.trim();
    let c_specification = specification.trim();
    if c_specification.is_empty() {
        c_description.to_string()
    } else {
        format!("{c_description} - {c_specification}")
    }
}

/// Map records 1:1 to numbered stock-opname rows.
///
/// Opening balances are looked up by trimmed description; missing entries
/// read as zero.
pub fn derive_stock_rows(
    records: &[SpecInventoryRecord],
    opening_balances: &BTreeMap<String, SpecOpeningBalance>,
) -> Vec<SpecStockRow> {
    records
        .iter()
        .enumerate()
        .map(|(n_idx, record)| {
            let c_description = record.description.trim();
            let opening = opening_balances
                .get(c_description)
                .copied()
                .unwrap_or_default();

            SpecStockRow {
                no: n_idx + 1,
                display_name: derive_display_name(&record.description, &record.specification),
                description: c_description.to_string(),
                specification: record.specification.trim().to_string(),
                unit: record.unit.clone(),
                category: record.category,
                opening: SpecMovement {
                    quantity: opening.quantity,
                    unit_price: opening.unit_price,
                    total: opening.quantity * opening.unit_price,
                    date: None,
                },
                procurement: record.procurement.clone(),
                usage: record.usage.clone(),
                remaining: record.remaining.clone(),
            }
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RemainingStock

/// Records with a positive remaining quantity, renumbered from 1.
pub fn filter_remaining_stock(records: &[SpecInventoryRecord]) -> Vec<SpecRemainingItem> {
    records
        .iter()
        .filter(|record| record.remaining.quantity > 0.0)
        .enumerate()
        .map(|(n_idx, record)| SpecRemainingItem {
            no: n_idx + 1,
            name: record.description.clone(),
            specification: record.specification.clone(),
            quantity: record.remaining.quantity,
            unit_price: record.remaining.unit_price,
            total: record.remaining.total,
            unit: if record.unit.is_empty() {
                C_UNIT_DEFAULT.to_string()
            } else {
                record.unit.clone()
            },
            category: record.category,
        })
        .collect()
}

/// Merge items sharing name, specification and unit price.
///
/// Keys compare trimmed and case-insensitively; the first item of a group
/// supplies its display text, unit and category. Output is sorted by name
/// and renumbered.
pub fn aggregate_remaining_stock(items: &[SpecRemainingItem]) -> Vec<SpecRemainingItem> {
    let mut dict_group_idx: BTreeMap<(String, String, u64), usize> = BTreeMap::new();
    let mut l_groups: Vec<SpecRemainingItem> = Vec::new();

    for item in items {
        let c_name = item.name.trim();
        let c_specification = item.specification.trim();
        let key = (
            c_name.to_lowercase(),
            c_specification.to_lowercase(),
            // -0.0 and 0.0 are one price.
            (item.unit_price + 0.0).to_bits(),
        );

        let n_idx = *dict_group_idx.entry(key).or_insert_with(|| {
            l_groups.push(SpecRemainingItem {
                no: 0,
                name: c_name.to_string(),
                specification: c_specification.to_string(),
                quantity: 0.0,
                unit_price: item.unit_price,
                total: 0.0,
                unit: item.unit.clone(),
                category: item.category,
            });
            l_groups.len() - 1
        });

        let group = &mut l_groups[n_idx];
        group.quantity += item.quantity;
        group.total += item.total;
    }

    l_groups.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    for (n_idx, group) in l_groups.iter_mut().enumerate() {
        group.no = n_idx + 1;
        let n_total_calc = group.quantity * group.unit_price;
        if n_total_calc != 0.0 {
            group.total = n_total_calc;
        }
    }
    l_groups
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Totals

/// Column sums of stock-opname rows.
pub fn calculate_stock_totals(rows: &[SpecStockRow]) -> SpecStockTotals {
    rows.iter().fold(
        SpecStockTotals {
            item_count: rows.len(),
            ..Default::default()
        },
        |mut acc, row| {
            acc.opening_quantity += row.opening.quantity;
            acc.opening_total += row.opening.total;
            acc.procurement_quantity += row.procurement.quantity;
            acc.procurement_total += row.procurement.total;
            acc.usage_quantity += row.usage.quantity;
            acc.usage_total += row.usage.total;
            acc.remaining_quantity += row.remaining.quantity;
            acc.remaining_total += row.remaining.total;
            acc
        },
    )
}

/// Remaining sums of a remaining-stock list.
pub fn calculate_remaining_totals(items: &[SpecRemainingItem]) -> SpecStockTotals {
    SpecStockTotals {
        remaining_quantity: items.iter().map(|item| item.quantity).sum(),
        remaining_total: items.iter().map(|item| item.total).sum(),
        item_count: items.len(),
        ..Default::default()
    }
}

/// Split rows into the three lettered category sections, in report order.
///
/// Empty sections are kept so callers decide whether to print them.
pub fn derive_category_sections(rows: &[SpecStockRow]) -> Vec<SpecCategorySection> {
    EnumCategory::ALL
        .iter()
        .zip(TUP_SECTION_LETTERS)
        .map(|(category, c_letter)| {
            let l_rows: Vec<SpecStockRow> = rows
                .iter()
                .filter(|row| row.category == *category)
                .cloned()
                .collect();
            SpecCategorySection {
                category: *category,
                caption: format!("{c_letter}. {}", category.label_full()),
                subtotal: calculate_stock_totals(&l_rows),
                rows: l_rows,
            }
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn create_record(
        description: &str,
        specification: &str,
        category: EnumCategory,
        procurement: (f64, f64),
        remaining: (f64, f64),
    ) -> SpecInventoryRecord {
        SpecInventoryRecord {
            row_source: 8,
            number: "1".to_string(),
            item_code: String::new(),
            receipt_number: String::new(),
            description: description.to_string(),
            brand: String::new(),
            specification: specification.to_string(),
            fund_source: "BOS".to_string(),
            unit: "Pcs".to_string(),
            procurement: SpecMovement {
                quantity: procurement.0,
                unit_price: procurement.1,
                total: procurement.0 * procurement.1,
                date: None,
            },
            usage: SpecMovement::default(),
            remaining: SpecMovement {
                quantity: remaining.0,
                unit_price: remaining.1,
                total: remaining.0 * remaining.1,
                date: None,
            },
            remark: String::new(),
            category,
        }
    }

    fn create_records() -> Vec<SpecInventoryRecord> {
        vec![
            create_record("Pulpen", "Hitam", EnumCategory::Atk, (10.0, 5_000.0), (4.0, 5_000.0)),
            create_record("Spanduk", "", EnumCategory::Cetakan, (1.0, 150_000.0), (0.0, 0.0)),
            create_record(" pulpen ", "hitam", EnumCategory::Atk, (6.0, 5_000.0), (2.0, 5_000.0)),
            create_record("Kursi", "", EnumCategory::LainLain, (2.0, 500_000.0), (2.0, 500_000.0)),
        ]
    }

    #[test]
    fn test_derive_display_name() {
        assert_eq!(derive_display_name("Pulpen", "Hitam"), "Pulpen - Hitam");
        assert_eq!(derive_display_name(" Kursi ", "  "), "Kursi");
    }

    #[test]
    fn test_stock_rows_attach_opening_balance_by_description() {
        let mut dict_opening = BTreeMap::new();
        dict_opening.insert(
            "Kursi".to_string(),
            SpecOpeningBalance {
                quantity: 3.0,
                unit_price: 400_000.0,
            },
        );

        let l_rows = derive_stock_rows(&create_records(), &dict_opening);
        assert_eq!(l_rows.len(), 4);
        assert_eq!(l_rows[0].no, 1);
        assert_eq!(l_rows[0].display_name, "Pulpen - Hitam");
        assert_eq!(l_rows[0].opening, SpecMovement::default());
        assert_eq!(l_rows[3].no, 4);
        assert_eq!(l_rows[3].opening.total, 1_200_000.0);
    }

    #[test]
    fn test_filter_remaining_stock_renumbers() {
        let l_items = filter_remaining_stock(&create_records());
        let l_names: Vec<(usize, &str)> =
            l_items.iter().map(|i| (i.no, i.name.as_str())).collect();
        assert_eq!(l_names, vec![(1, "Pulpen"), (2, " pulpen "), (3, "Kursi")]);
        assert_eq!(l_items[0].unit, "Pcs");
    }

    #[test]
    fn test_aggregate_remaining_stock_merges_same_item_and_price() {
        let l_items = aggregate_remaining_stock(&filter_remaining_stock(&create_records()));

        assert_eq!(l_items.len(), 2);
        assert_eq!((l_items[0].no, l_items[0].name.as_str()), (1, "Kursi"));
        let pulpen = &l_items[1];
        assert_eq!((pulpen.no, pulpen.name.as_str()), (2, "Pulpen"));
        assert_eq!(pulpen.quantity, 6.0);
        assert_eq!(pulpen.total, 30_000.0);
    }

    #[test]
    fn test_aggregate_keeps_summed_total_without_unit_price() {
        let l_items = vec![SpecRemainingItem {
            no: 1,
            name: "Tinta".to_string(),
            specification: String::new(),
            quantity: 3.0,
            unit_price: 0.0,
            total: 90_000.0,
            unit: C_UNIT_DEFAULT.to_string(),
            category: EnumCategory::Atk,
        }];
        assert_eq!(aggregate_remaining_stock(&l_items)[0].total, 90_000.0);
    }

    #[test]
    fn test_totals_and_category_sections() {
        let l_rows = derive_stock_rows(&create_records(), &BTreeMap::new());
        let totals = calculate_stock_totals(&l_rows);
        assert_eq!(totals.item_count, 4);
        assert_eq!(totals.procurement_total, 1_230_000.0);
        assert_eq!(totals.remaining_total, 1_030_000.0);

        let l_sections = derive_category_sections(&l_rows);
        let l_captions: Vec<&str> = l_sections.iter().map(|s| s.caption.as_str()).collect();
        assert_eq!(
            l_captions,
            vec![
                "A. Persediaan Alat Tulis Kantor (ATK)",
                "B. Persediaan Barang Cetakan",
                "C. Persediaan Lain - Lain",
            ]
        );
        assert_eq!(l_sections[0].rows.len(), 2);
        assert_eq!(l_sections[0].subtotal.procurement_total, 80_000.0);
        assert_eq!(l_sections[1].subtotal.remaining_total, 0.0);
        assert_eq!(l_sections[2].subtotal.item_count, 1);
    }

    #[test]
    fn test_remaining_totals() {
        let totals = calculate_remaining_totals(&filter_remaining_stock(&create_records()));
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.remaining_total, 1_030_000.0);
        assert_eq!(totals.remaining_quantity, 8.0);
    }
}

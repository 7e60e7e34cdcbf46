//! Footer signer scanner.
//!
//! Three pure steps: collect identifier-like cells anywhere in the sheet,
//! look up the name above a candidate, then resolve candidates to the two
//! signer roles starting from the bottom of the sheet.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::conf::N_ROWS_SIGNER_NAME_LOOKBACK;
use crate::grid::SheetGrid;
use crate::spec::{EnumSignerRole, SpecParseOptions, SpecSignerCandidate, SpecSignerInfo};
use crate::util::{contains_any_keyword, convert_cell_to_text, count_digits};

static RE_SIGNER_ID_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^NIP\.?\s*").expect("signer id prefix pattern is valid"));

/// Whether a cell text looks like a signer identifier.
pub fn is_signer_id_text(text: &str, options: &SpecParseOptions) -> bool {
    let c_keyword = options.keyword_rules.signer_id_keyword.to_lowercase();
    let if_keyword = !c_keyword.is_empty() && text.to_lowercase().contains(&c_keyword);
    let if_digits = count_digits(text) >= options.digits_signer_id_min;

    (if_keyword || if_digits) && text.chars().count() < options.len_signer_cell_max
}

/// Strip a leading `NIP` / `NIP.` label.
pub fn clean_signer_id(text: &str) -> String {
    RE_SIGNER_ID_PREFIX.replace(text.trim(), "").trim().to_string()
}

/// Collect every identifier-like cell in row-major order.
pub fn collect_signer_candidates(
    grid: &SheetGrid,
    options: &SpecParseOptions,
) -> Vec<SpecSignerCandidate> {
    grid.iter_cells()
        .filter_map(|(n_row, n_col, value)| {
            let c_text = convert_cell_to_text(value);
            is_signer_id_text(&c_text, options).then(|| SpecSignerCandidate {
                row: n_row,
                col: n_col,
                id_clean: clean_signer_id(&c_text),
                text_raw: c_text,
            })
        })
        .collect()
}

/// Role owning a candidate in column `col`.
pub fn derive_signer_role(col: usize, options: &SpecParseOptions) -> EnumSignerRole {
    if col <= options.col_signer_split {
        EnumSignerRole::Principal
    } else {
        EnumSignerRole::AssetClerk
    }
}

/// Name written one or two rows above `(row, col)`.
///
/// Too-short texts and section captions ("Mengetahui", "Kepala Sekolah")
/// are passed over in favor of the next row up.
pub fn lookup_signer_name(
    grid: &SheetGrid,
    row: usize,
    col: usize,
    options: &SpecParseOptions,
) -> Option<String> {
    (1..=N_ROWS_SIGNER_NAME_LOOKBACK)
        .filter_map(|n_offset| row.checked_sub(n_offset))
        .map(|n_row| grid.cell_text(n_row, col))
        .find(|c_text| {
            c_text.chars().count() > options.len_signer_name_min
                && !contains_any_keyword(
                    &c_text.to_lowercase(),
                    &options.keyword_rules.signer_label_words,
                )
        })
}

/// Assign candidates to roles, bottom-most first.
///
/// A role keeps the first candidate with a non-empty identifier. Candidates
/// on the same row keep their column order. A bare `NIP.` label cell leaves
/// the identifier open but still fills an empty name, so a label and its
/// digits split over two cells resolve to one signer.
pub fn resolve_signers(
    grid: &SheetGrid,
    candidates: &[SpecSignerCandidate],
    options: &SpecParseOptions,
) -> SpecSignerInfo {
    let mut l_sorted: Vec<&SpecSignerCandidate> = candidates.iter().collect();
    l_sorted.sort_by(|a, b| b.row.cmp(&a.row));

    let mut info = SpecSignerInfo::default();
    for candidate in l_sorted {
        let role = derive_signer_role(candidate.col, options);
        let signer = info.signer_mut(role);
        if !signer.id.is_empty() {
            continue;
        }

        let name = lookup_signer_name(grid, candidate.row, candidate.col, options);
        if candidate.id_clean.is_empty() {
            if signer.name.is_empty() {
                if let Some(c_name) = name {
                    signer.name = c_name;
                }
            }
            continue;
        }

        signer.id = candidate.id_clean.clone();
        if let Some(c_name) = name {
            signer.name = c_name;
        }
    }
    info
}

/// Scan the whole sheet for the two footer signers.
pub fn scan_footer_signers(grid: &SheetGrid, options: &SpecParseOptions) -> SpecSignerInfo {
    let l_candidates = collect_signer_candidates(grid, options);
    log::debug!("[PARSER] Found {} signer id candidate(s)", l_candidates.len());

    let info = resolve_signers(grid, &l_candidates, options);
    log::info!(
        "[PARSER] Signers: principal={:?} asset_clerk={:?}",
        info.principal.name,
        info.asset_clerk.name
    );
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{EnumCellValue, SpecSigner};

    fn text(value: &str) -> EnumCellValue {
        EnumCellValue::String(value.to_string())
    }

    fn create_footer_cells() -> Vec<(usize, usize, EnumCellValue)> {
        vec![
            (8, 4, text("Pulpen Standard")),
            (8, 9, EnumCellValue::Number(10.0)),
            (20, 2, text("Mengetahui,")),
            (20, 14, text("Drawati, 31 Desember 2025")),
            (21, 2, text("Kepala Sekolah")),
            (21, 14, text("Pengurus Barang")),
            (25, 2, text("Dra. Siti Rahmawati")),
            (25, 14, text("Budi Santoso, S.Pd")),
            (26, 2, text("NIP. 196803121990032005")),
            (26, 14, text("198502142010011003")),
        ]
    }

    #[test]
    fn test_resolves_both_roles_with_names_above() {
        let grid = SheetGrid::from_cells("Sheet1", create_footer_cells());
        let info = scan_footer_signers(&grid, &SpecParseOptions::default());

        assert_eq!(
            info.principal,
            SpecSigner {
                name: "Dra. Siti Rahmawati".to_string(),
                id: "196803121990032005".to_string(),
            }
        );
        assert_eq!(
            info.asset_clerk,
            SpecSigner {
                name: "Budi Santoso, S.Pd".to_string(),
                id: "198502142010011003".to_string(),
            }
        );
    }

    #[test]
    fn test_no_candidates_yields_empty_signers() {
        let grid = SheetGrid::from_cells(
            "Sheet1",
            vec![(1, 1, text("LAPORAN")), (8, 4, text("Pulpen"))],
        );
        let info = scan_footer_signers(&grid, &SpecParseOptions::default());
        assert!(info.principal.is_empty());
        assert!(info.asset_clerk.is_empty());
    }

    #[test]
    fn test_bottom_most_candidate_wins_per_role() {
        let mut l_cells = create_footer_cells();
        // An earlier id-like cell in the principal's columns (e.g. a receipt number).
        l_cells.push((9, 3, text("123456789012")));
        let grid = SheetGrid::from_cells("Sheet1", l_cells);

        let info = scan_footer_signers(&grid, &SpecParseOptions::default());
        assert_eq!(info.principal.id, "196803121990032005");
    }

    #[test]
    fn test_caption_above_id_is_not_a_name() {
        let grid = SheetGrid::from_cells(
            "Sheet1",
            vec![
                (10, 2, text("Ani Lestari")),
                (11, 2, text("Kepala Sekolah")),
                (12, 2, text("NIP 197001011995121001")),
            ],
        );
        let options = SpecParseOptions::default();
        assert_eq!(
            lookup_signer_name(&grid, 12, 2, &options).as_deref(),
            Some("Ani Lestari")
        );

        let grid_caption_only = SheetGrid::from_cells(
            "Sheet1",
            vec![
                (10, 2, text("Mengetahui")),
                (11, 2, text("Kepala Sekolah")),
                (12, 2, text("NIP 197001011995121001")),
            ],
        );
        let info = scan_footer_signers(&grid_caption_only, &options);
        assert_eq!(info.principal.id, "197001011995121001");
        assert_eq!(info.principal.name, "");
    }

    #[test]
    fn test_clean_signer_id_strips_label() {
        assert_eq!(clean_signer_id("NIP. 1968 0312"), "1968 0312");
        assert_eq!(clean_signer_id("nip:123"), ":123");
        assert_eq!(clean_signer_id("198502142010011003"), "198502142010011003");
    }

    #[test]
    fn test_is_signer_id_text_limits() {
        let options = SpecParseOptions::default();
        assert!(is_signer_id_text("NIP.", &options));
        assert!(is_signer_id_text("1985 0214 2010 01 1 003", &options));
        assert!(!is_signer_id_text("12345678901", &options));
        assert!(!is_signer_id_text(&"1".repeat(60), &options));
    }

    #[test]
    fn test_label_and_digits_in_adjacent_cells_resolve_to_one_signer() {
        let grid = SheetGrid::from_cells(
            "Sheet1",
            vec![
                (24, 2, text("Dra. Siti Rahmawati")),
                (25, 2, text("NIP.")),
                (25, 3, text("196803121990032005")),
                (24, 14, text("Budi Santoso, S.Pd")),
                (25, 14, text("NIP.")),
                (25, 15, text("198502142010011003")),
            ],
        );
        let info = scan_footer_signers(&grid, &SpecParseOptions::default());

        assert_eq!(
            info.principal,
            SpecSigner {
                name: "Dra. Siti Rahmawati".to_string(),
                id: "196803121990032005".to_string(),
            }
        );
        assert_eq!(
            info.asset_clerk,
            SpecSigner {
                name: "Budi Santoso, S.Pd".to_string(),
                id: "198502142010011003".to_string(),
            }
        );
    }

    #[test]
    fn test_label_only_candidate_does_not_fill_role() {
        let grid = SheetGrid::from_cells(
            "Sheet1",
            vec![
                (20, 2, text("Ani Lestari")),
                (21, 2, text("NIP 197001011995121001")),
                (30, 3, text("NIP.")),
            ],
        );
        let info = scan_footer_signers(&grid, &SpecParseOptions::default());
        assert_eq!(info.principal.id, "197001011995121001");
        assert_eq!(info.principal.name, "Ani Lestari");
    }
}

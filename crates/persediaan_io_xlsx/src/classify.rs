//! Category classifier.
//!
//! One call is one fold step: `(prior category, row signals) -> decision`.
//! The caller threads `decision.category` into the next row, which is how a
//! section header row keeps applying to the item rows below it.

use crate::spec::{
    EnumCategory, EnumCategoryRule, SpecCategoryDecision, SpecCategorySignals, SpecKeywordRules,
};
use crate::util::contains_any_keyword;

/// Classify one row; first matching rule wins, otherwise `category_prior` carries over.
///
/// The unit of measure is never consulted: "lembar" is as common for raw
/// paper stock (ATK) as for printed output.
pub fn classify_category(
    signals: &SpecCategorySignals<'_>,
    category_prior: EnumCategory,
    rules: &SpecKeywordRules,
) -> SpecCategoryDecision {
    let c_description = signals.description.to_lowercase();
    let c_item_code = signals.item_code.to_lowercase();

    let l_rules = [
        (
            contains_any_keyword(&c_description, &rules.atk_exceptions),
            EnumCategory::Atk,
            EnumCategoryRule::AtkException,
        ),
        (
            contains_any_keyword(&c_description, &rules.cetakan_phrases),
            EnumCategory::Cetakan,
            EnumCategoryRule::CetakanPhrase,
        ),
        (
            contains_any_keyword(&c_item_code, &rules.code_keywords_cetakan),
            EnumCategory::Cetakan,
            EnumCategoryRule::CodeCetakan,
        ),
        (
            contains_any_keyword(&c_item_code, &rules.code_keywords_atk),
            EnumCategory::Atk,
            EnumCategoryRule::CodeAtk,
        ),
        (
            contains_any_keyword(&c_item_code, &rules.code_keywords_lain_lain),
            EnumCategory::LainLain,
            EnumCategoryRule::CodeLainLain,
        ),
    ];

    l_rules
        .into_iter()
        .find(|(if_hit, _, _)| *if_hit)
        .map(|(_, category, rule)| SpecCategoryDecision { category, rule })
        .unwrap_or(SpecCategoryDecision {
            category: category_prior,
            rule: EnumCategoryRule::Inherited,
        })
}

/*!
 * Modifier suggestion rules
 *
 * Maps keyword cues in a free-text clinical description to CPT/HCPCS
 * modifier records. The rule table is a fixed, ordered list evaluated top to
 * bottom; precedence between rules is exactly their position in the table.
 */

use std::collections::HashSet;

use crate::data_types::Modifier;
use crate::dataset::CodingDataset;
use crate::{MedcodeError, Result};

/// One keyword rule: if any cue appears in the query, suggest the modifier
pub struct ModifierRule {
    /// Lowercase cue phrases checked as plain substrings of the query
    pub cues: &'static [&'static str],
    /// Code of the modifier to suggest, resolved against the modifier table
    pub modifier_code: &'static str,
}

/// The ordered rule table
///
/// Evaluation order is load-bearing: it determines the order of suggestions
/// in the result, and the first rule to suggest a code wins over later
/// rules targeting the same code.
pub const MODIFIER_RULES: &[ModifierRule] = &[
    // Bilateral procedures
    ModifierRule {
        cues: &["bilateral", "both sides", "both limbs"],
        modifier_code: "50",
    },
    // Left or right
    ModifierRule {
        cues: &["left", "lt"],
        modifier_code: "LT",
    },
    ModifierRule {
        cues: &["right", "rt"],
        modifier_code: "RT",
    },
    // Repeat procedures
    ModifierRule {
        cues: &["repeat", "again"],
        modifier_code: "76",
    },
    // Distinct or separate services
    ModifierRule {
        cues: &["distinct", "different site", "separate session"],
        modifier_code: "59",
    },
    // E/M separate from procedure
    ModifierRule {
        cues: &["evaluation", "e/m"],
        modifier_code: "25",
    },
    // Professional component
    ModifierRule {
        cues: &["interpretation", "professional"],
        modifier_code: "26",
    },
    // Technical component
    ModifierRule {
        cues: &["equipment", "technical"],
        modifier_code: "TC",
    },
];

/// Suggest modifiers for a free-text clinical description
///
/// Rules are evaluated in table order against the lowercased query; each
/// matching rule appends its modifier unless an earlier rule already
/// suggested the same code. Returns an empty list when nothing matches.
///
/// A rule whose code is missing from the modifier table is a
/// [`MedcodeError::DataIntegrity`] defect; dataset validation rejects such
/// tables at startup, so this path is unreachable for a built dataset.
pub fn suggest_modifiers<'a>(dataset: &'a CodingDataset, query: &str) -> Result<Vec<&'a Modifier>> {
    let query = query.to_lowercase();

    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();
    for rule in MODIFIER_RULES {
        if !rule.cues.iter().any(|cue| query.contains(cue)) {
            continue;
        }
        if !seen.insert(rule.modifier_code) {
            continue;
        }
        let modifier = dataset
            .modifier_by_code(rule.modifier_code)
            .ok_or_else(|| MedcodeError::unknown_rule_modifier(rule.modifier_code))?;
        suggestions.push(modifier);
    }

    Ok(suggestions)
}

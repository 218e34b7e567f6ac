/*!
 * NCCI pair-edit checks
 *
 * Looks up an unordered pair of CPT codes in the pair-edit table and builds
 * the determination returned to the caller. Pairs absent from the table are
 * allowed by default.
 */

use crate::constants::NO_KNOWN_EDIT_MESSAGE;
use crate::data_types::{CptCode, EditStatus, NcciResult};
use crate::dataset::CodingDataset;

/// Check a pair of CPT codes against the pair-edit table
///
/// The pair is unordered: callers may supply the codes in either order and
/// receive the same status, message, and modifier flag. The echoed `cpt_a`
/// and `cpt_b` fields preserve the caller's order, not the table's.
pub fn check_ncci_pair(dataset: &CodingDataset, cpt_a: &CptCode, cpt_b: &CptCode) -> NcciResult {
    if let Some(edit) = dataset.pair_edit(cpt_a.as_str(), cpt_b.as_str()) {
        return NcciResult {
            cpt_a: cpt_a.as_str().to_string(),
            cpt_b: cpt_b.as_str().to_string(),
            status: edit.status,
            message: edit.message.clone(),
            modifier_required: edit.modifier_required,
        };
    }

    // Default: allowed
    NcciResult {
        cpt_a: cpt_a.as_str().to_string(),
        cpt_b: cpt_b.as_str().to_string(),
        status: EditStatus::Allowed,
        message: NO_KNOWN_EDIT_MESSAGE.to_string(),
        modifier_required: false,
    }
}

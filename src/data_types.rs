/*!
 * Data type definitions for medical coding records
 *
 * This module contains type-safe representations of the diagnosis-code,
 * modifier, and pair-edit structures served by the lookup components.
 */

use serde::{Deserialize, Serialize};

/// CPT/HCPCS procedure code - 5 character identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CptCode(pub String);

impl CptCode {
    /// Create a new CPT code, trimming whitespace and validating length
    pub fn new(code: &str) -> Result<Self, crate::MedcodeError> {
        let trimmed = code.trim();
        if trimmed.chars().count() != crate::constants::CPT_CODE_LEN {
            return Err(crate::MedcodeError::invalid_cpt_code(trimmed));
        }
        Ok(CptCode(trimmed.to_string()))
    }

    /// Get the code as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CptCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ICD-10-CM diagnosis code record
///
/// Mirrors the structure of the CMS tabular list: each code carries a title
/// plus optional includes/excludes notes and synonym phrases used by the
/// matcher for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcdCode {
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excludes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
}

/// CPT/HCPCS modifier record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub code: String,
    pub title: String,
    pub reason: String,
}

/// Status determination for a pair of procedure codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditStatus {
    Allowed,
    Denied,
}

impl EditStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "allowed" => Some(EditStatus::Allowed),
            "denied" => Some(EditStatus::Denied),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            EditStatus::Allowed => "allowed",
            EditStatus::Denied => "denied",
        }
    }
}

impl std::fmt::Display for EditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// NCCI procedure-to-procedure edit for one unordered pair of CPT codes
///
/// The pair itself is the key in [`crate::dataset::CodingDataset`]; lookups
/// must treat (A,B) and (B,A) as the same edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairEdit {
    pub status: EditStatus,
    pub message: String,
    pub modifier_required: bool,
}

/// Result of an NCCI pair check, echoing the codes in caller order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NcciResult {
    pub cpt_a: String,
    pub cpt_b: String,
    pub status: EditStatus,
    pub message: String,
    #[serde(default)]
    pub modifier_required: bool,
}

/// A diagnosis code paired with its computed match score
///
/// Scores are ephemeral: they are recomputed per query and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub entry: &'a IcdCode,
    pub score: f64,
}

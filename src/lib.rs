/*!
 * # Medcode - Medical Coding Assistance Library
 *
 * A Rust library and HTTP API for medical coding assistance: matching
 * free-text clinical descriptions to ICD-10-CM diagnosis codes, suggesting
 * CPT/HCPCS modifiers from keyword cues, and checking procedure code pairs
 * against NCCI bundling edits.
 *
 * ## Features
 *
 * - **Diagnosis Code Search**: weighted substring and fuzzy matching over
 *   codes, titles, includes/excludes notes and synonyms
 * - **Modifier Suggestions**: an ordered keyword-rule table mapping clinical
 *   cues to modifier records
 * - **NCCI Pair Checks**: symmetric lookups against a pair-edit table with a
 *   safe "allowed" default
 * - **File-Backed Datasets**: built-in sample data, overridable from JSON and
 *   CSV files through a builder
 * - **HTTP API**: a thin warp boundary serving all three components plus a
 *   liveness check
 * - **Type Safe**: validated CPT codes and strongly typed edit statuses
 *
 * ## Quick Start
 *
 * ```
 * use medcode::prelude::*;
 *
 * # fn main() -> Result<()> {
 * // The built-in sample dataset is ready to query
 * let dataset = CodingDataset::builtin();
 *
 * // Search diagnosis codes
 * let matches = search_icd10(&dataset, "knee pain right", 5);
 * for result in &matches {
 *     println!("{} {} (score {:.2})", result.entry.code, result.entry.title, result.score);
 * }
 *
 * // Suggest modifiers for a clinical description
 * let suggestions = suggest_modifiers(&dataset, "bilateral procedure on both sides")?;
 * assert_eq!(suggestions[0].code, "50");
 *
 * // Check a pair of CPT codes for bundling edits
 * let result = check_ncci_pair(
 *     &dataset,
 *     &CptCode::new("11719")?,
 *     &CptCode::new("11720")?,
 * );
 * println!("{}: {}", result.status, result.message);
 * # Ok(())
 * # }
 * ```
 *
 * ## Loading Data
 *
 * ```no_run
 * # use medcode::prelude::*;
 * # fn main() -> Result<()> {
 * let dataset = CodingDatasetBuilder::new()
 *     .icd10_data("data/icd10cm_codes.json")
 *     .modifier_table("data/modifiers.csv")
 *     .pair_edits("data/ncci_ptp_edits.csv")
 *     .build()?;
 * # Ok(())
 * # }
 * ```
 *
 * Datasets are validated once at build time and read-only afterwards; a
 * modifier rule referencing a code missing from the table, or a duplicate
 * code within a dataset, aborts the build.
 *
 * ## Serving the API
 *
 * ```no_run
 * # use medcode::prelude::*;
 * # use std::sync::Arc;
 * # #[tokio::main]
 * # async fn main() -> Result<()> {
 * let config = MedcodeConfig::load();
 * let dataset = Arc::new(CodingDataset::builtin());
 * medcode::api::serve(dataset, config.socket_addr()?).await;
 * # Ok(())
 * # }
 * ```
 */

// Re-export error types from root
pub use error::{MedcodeError, Result};

// Public modules
pub mod advisor;
pub mod api;
pub mod config;
pub mod data_types;
pub mod dataset;
pub mod error;
pub mod matcher;
pub mod ncci;

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```
/// use medcode::prelude::*;
/// ```
pub mod prelude {
    pub use crate::advisor::{suggest_modifiers, ModifierRule, MODIFIER_RULES};
    pub use crate::config::{ConfigBuilder, MedcodeConfig};
    pub use crate::data_types::*;
    pub use crate::dataset::{CodingDataset, CodingDatasetBuilder, DatasetStatistics};
    pub use crate::error::{MedcodeError, Result};
    pub use crate::matcher::{search_icd10, similarity_ratio};
    pub use crate::ncci::check_ncci_pair;
}

/// Scoring weights and fixed limits
pub mod constants {
    /// Length of a CPT/HCPCS procedure code
    pub const CPT_CODE_LEN: usize = 5;

    /// Default number of results returned by a diagnosis code search
    pub const DEFAULT_SEARCH_LIMIT: usize = 5;

    /// Score contribution for a substring hit on the code identifier
    pub const SCORE_CODE_SUBSTRING: f64 = 2.0;

    /// Score contribution for a substring hit on the title
    pub const SCORE_TITLE_SUBSTRING: f64 = 1.5;

    /// Score contribution per matching `includes` entry
    pub const SCORE_INCLUDES_ENTRY: f64 = 1.0;

    /// Score contribution per matching `excludes` entry
    pub const SCORE_EXCLUDES_ENTRY: f64 = 0.5;

    /// Score contribution per matching `synonyms` entry
    pub const SCORE_SYNONYMS_ENTRY: f64 = 1.0;

    /// Message returned for pairs absent from the edit table
    pub const NO_KNOWN_EDIT_MESSAGE: &str =
        "No known NCCI bundling issues between these CPT codes.";
}

/// Common recipes and utility functions
pub mod cookbook {
    use crate::data_types::{CptCode, NcciResult};
    use crate::dataset::CodingDataset;
    use crate::prelude::*;

    /// Check every unordered pair of procedure codes on a claim
    ///
    /// Useful for sweeping a full claim line for bundling issues before
    /// submission. Pairs are checked in claim order; each pair appears once.
    ///
    /// # Example
    /// ```
    /// # use medcode::prelude::*;
    /// # use medcode::cookbook::check_claim_pairs;
    /// # fn main() -> Result<()> {
    /// # let dataset = CodingDataset::builtin();
    /// let codes = vec![
    ///     CptCode::new("11719")?,
    ///     CptCode::new("11720")?,
    ///     CptCode::new("71045")?,
    /// ];
    /// let results = check_claim_pairs(&dataset, &codes);
    /// assert_eq!(results.len(), 3);
    /// # Ok(())
    /// # }
    /// ```
    pub fn check_claim_pairs(dataset: &CodingDataset, codes: &[CptCode]) -> Vec<NcciResult> {
        let mut results = Vec::new();
        for (i, cpt_a) in codes.iter().enumerate() {
            for cpt_b in &codes[i + 1..] {
                results.push(check_ncci_pair(dataset, cpt_a, cpt_b));
            }
        }
        results
    }

    /// Find the diagnosis code record for an exact code identifier
    ///
    /// Case-insensitive; returns `None` when the code is not in the dataset.
    pub fn find_exact_code<'a>(dataset: &'a CodingDataset, code: &str) -> Option<&'a IcdCode> {
        dataset
            .icd10
            .iter()
            .find(|entry| entry.code.eq_ignore_ascii_case(code))
    }
}

#[cfg(test)]
mod tests {
    use crate::data_types::{CptCode, EditStatus};

    #[test]
    fn test_cpt_code_validation() {
        assert!(CptCode::new("11719").is_ok());
        assert!(CptCode::new("  71045 ").is_ok());
        assert!(CptCode::new("G0008").is_ok());
        assert!(CptCode::new("123").is_err());
        assert!(CptCode::new("123456").is_err());
        assert!(CptCode::new("").is_err());
    }

    #[test]
    fn test_edit_status_codes() {
        assert_eq!(EditStatus::from_code("allowed"), Some(EditStatus::Allowed));
        assert_eq!(EditStatus::from_code("denied"), Some(EditStatus::Denied));
        assert_eq!(EditStatus::from_code("bundled"), None);
        assert_eq!(EditStatus::Denied.as_code(), "denied");
    }

    #[test]
    fn test_cookbook_claim_sweep() {
        use crate::cookbook::check_claim_pairs;
        use crate::dataset::CodingDataset;

        let dataset = CodingDataset::builtin();
        let codes = vec![
            CptCode::new("11719").unwrap(),
            CptCode::new("11720").unwrap(),
        ];
        let results = check_claim_pairs(&dataset, &codes);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, EditStatus::Denied);
    }
}

/*!
 * Unified dataset API for medical coding reference data
 *
 * Provides a builder pattern for assembling the three static datasets the
 * lookup components read from: ICD-10-CM diagnosis codes, the CPT/HCPCS
 * modifier table, and the NCCI pair-edit table. Every dataset ships with
 * built-in sample data and can be overridden from files, so a deployment can
 * swap in the full CMS distributions without code changes.
 *
 * Datasets are immutable after `build()`: the builder validates them once
 * and hands back a read-only [`CodingDataset`].
 */

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::advisor::MODIFIER_RULES;
use crate::data_types::*;
use crate::{MedcodeError, Result};

/// Builder for loading a complete coding dataset
///
/// # Example
/// ```no_run
/// # use medcode::dataset::CodingDatasetBuilder;
/// let dataset = CodingDatasetBuilder::new()
///     .icd10_data("data/icd10cm_codes.json")
///     .modifier_table("data/modifiers.csv")
///     .pair_edits("data/ncci_ptp_edits.csv")
///     .build()?;
/// # Ok::<(), medcode::MedcodeError>(())
/// ```
pub struct CodingDatasetBuilder {
    icd10_path: Option<PathBuf>,
    modifiers_path: Option<PathBuf>,
    pair_edits_path: Option<PathBuf>,
}

impl Default for CodingDatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CodingDatasetBuilder {
    /// Create a new dataset builder
    pub fn new() -> Self {
        Self {
            icd10_path: None,
            modifiers_path: None,
            pair_edits_path: None,
        }
    }

    /// Set the path to a JSON file of ICD-10-CM diagnosis codes
    pub fn icd10_data<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.icd10_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the path to a CSV file of modifier definitions
    pub fn modifier_table<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.modifiers_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the path to a CSV file of NCCI pair edits
    pub fn pair_edits<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.pair_edits_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the dataset, loading any overrides and validating the result
    ///
    /// Datasets without an override path keep the built-in sample data.
    /// Validation failures are fatal: a dataset that fails referential
    /// integrity must never serve queries.
    pub fn build(self) -> Result<CodingDataset> {
        let icd10 = match self.icd10_path {
            Some(path) => {
                info!("Loading ICD-10-CM data from: {}", path.display());
                load_icd10_json(&path)?
            }
            None => builtin_icd10(),
        };

        let modifiers = match self.modifiers_path {
            Some(path) => {
                info!("Loading modifier table from: {}", path.display());
                load_modifiers_csv(&path)?
            }
            None => builtin_modifiers(),
        };

        let pair_edits = match self.pair_edits_path {
            Some(path) => {
                info!("Loading NCCI pair edits from: {}", path.display());
                load_pair_edits_csv(&path)?
            }
            None => builtin_pair_edits(),
        };

        let dataset = CodingDataset {
            icd10,
            modifiers,
            pair_edits,
        };
        dataset.validate()?;

        info!(
            "Coding dataset ready: {} diagnosis codes, {} modifiers, {} pair edits",
            dataset.icd10.len(),
            dataset.modifiers.len(),
            dataset.statistics().pair_edit_count
        );
        Ok(dataset)
    }
}

/// Read-only coding reference dataset shared by all lookup components
pub struct CodingDataset {
    /// ICD-10-CM diagnosis code records, in load order
    pub icd10: Vec<IcdCode>,

    /// CPT/HCPCS modifier table
    pub modifiers: Vec<Modifier>,

    /// NCCI pair edits, keyed by one member of the pair then the other
    pub pair_edits: HashMap<String, HashMap<String, PairEdit>>,
}

impl CodingDataset {
    /// Build a dataset from the built-in sample data
    pub fn builtin() -> Self {
        let dataset = Self {
            icd10: builtin_icd10(),
            modifiers: builtin_modifiers(),
            pair_edits: builtin_pair_edits(),
        };
        // A validation failure here is a bug in this module
        dataset
            .validate()
            .expect("built-in sample data failed validation");
        dataset
    }

    /// Look up a modifier by its code
    pub fn modifier_by_code(&self, code: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.code == code)
    }

    /// Look up the edit for an unordered pair of CPT codes
    ///
    /// The relation is symmetric: both (a,b) and (b,a) orderings are checked.
    pub fn pair_edit(&self, a: &str, b: &str) -> Option<&PairEdit> {
        if let Some(edit) = self.pair_edits.get(a).and_then(|inner| inner.get(b)) {
            return Some(edit);
        }
        self.pair_edits.get(b).and_then(|inner| inner.get(a))
    }

    /// Validate dataset invariants
    ///
    /// Checks that `code` is unique within each dataset and that every
    /// advisor rule resolves to a modifier in the table. Violations are
    /// defects in the static data and must abort startup.
    pub fn validate(&self) -> Result<()> {
        let mut seen_icd = HashSet::new();
        for entry in &self.icd10 {
            if !seen_icd.insert(entry.code.as_str()) {
                return Err(MedcodeError::duplicate_code("ICD-10-CM", &entry.code));
            }
        }

        let mut seen_modifiers = HashSet::new();
        for modifier in &self.modifiers {
            if !seen_modifiers.insert(modifier.code.as_str()) {
                return Err(MedcodeError::duplicate_code("modifier", &modifier.code));
            }
        }

        for rule in MODIFIER_RULES {
            if !seen_modifiers.contains(rule.modifier_code) {
                return Err(MedcodeError::unknown_rule_modifier(rule.modifier_code));
            }
        }

        for (a, inner) in &self.pair_edits {
            for b in inner.keys() {
                if a.chars().count() != crate::constants::CPT_CODE_LEN
                    || b.chars().count() != crate::constants::CPT_CODE_LEN
                {
                    warn!("pair edit ({}, {}) has a non-standard code length", a, b);
                }
            }
        }

        Ok(())
    }

    /// Get summary statistics for the loaded datasets
    pub fn statistics(&self) -> DatasetStatistics {
        DatasetStatistics {
            icd10_count: self.icd10.len(),
            modifier_count: self.modifiers.len(),
            pair_edit_count: self.pair_edits.values().map(|inner| inner.len()).sum(),
        }
    }
}

/// Summary statistics for a loaded dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetStatistics {
    pub icd10_count: usize,
    pub modifier_count: usize,
    pub pair_edit_count: usize,
}

impl DatasetStatistics {
    /// Print a human-readable summary to stdout
    pub fn print_summary(&self) {
        println!("Coding Dataset Statistics");
        println!("=========================");
        println!("ICD-10-CM codes:  {}", self.icd10_count);
        println!("Modifiers:        {}", self.modifier_count);
        println!("NCCI pair edits:  {}", self.pair_edit_count);
    }
}

// ---------------------------------------------------------------------------
// File loaders

fn load_icd10_json(path: &Path) -> Result<Vec<IcdCode>> {
    let file = File::open(path).map_err(|err| MedcodeError::Io {
        message: format!("cannot open ICD-10 data file: {}", err),
        source: err,
        path: Some(path.to_path_buf()),
    })?;
    let codes: Vec<IcdCode> = serde_json::from_reader(file)
        .map_err(|err| MedcodeError::dataset_parse(path, err.to_string()))?;
    Ok(codes)
}

/// CSV row shape for the modifier table: `code,title,reason`
#[derive(Debug, Deserialize)]
struct ModifierRow {
    code: String,
    title: String,
    reason: String,
}

fn load_modifiers_csv(path: &Path) -> Result<Vec<Modifier>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut modifiers = Vec::new();
    for row in reader.deserialize() {
        let row: ModifierRow = row?;
        modifiers.push(Modifier {
            code: row.code,
            title: row.title,
            reason: row.reason,
        });
    }
    Ok(modifiers)
}

/// CSV row shape for pair edits: `cpt_a,cpt_b,status,message,modifier_required`
#[derive(Debug, Deserialize)]
struct PairEditRow {
    cpt_a: String,
    cpt_b: String,
    status: String,
    message: String,
    modifier_required: bool,
}

fn load_pair_edits_csv(path: &Path) -> Result<HashMap<String, HashMap<String, PairEdit>>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut pair_edits: HashMap<String, HashMap<String, PairEdit>> = HashMap::new();

    for row in reader.deserialize() {
        let row: PairEditRow = row?;
        let status = EditStatus::from_code(&row.status).ok_or_else(|| {
            MedcodeError::dataset_parse(
                path,
                format!(
                    "unknown edit status '{}' for pair ({}, {})",
                    row.status, row.cpt_a, row.cpt_b
                ),
            )
        })?;

        let duplicate = pair_edits
            .get(&row.cpt_a)
            .map(|inner| inner.contains_key(&row.cpt_b))
            .unwrap_or(false)
            || pair_edits
                .get(&row.cpt_b)
                .map(|inner| inner.contains_key(&row.cpt_a))
                .unwrap_or(false);
        if duplicate {
            return Err(MedcodeError::dataset_parse(
                path,
                format!("duplicate pair edit ({}, {})", row.cpt_a, row.cpt_b),
            ));
        }

        pair_edits.entry(row.cpt_a).or_default().insert(
            row.cpt_b,
            PairEdit {
                status,
                message: row.message,
                modifier_required: row.modifier_required,
            },
        );
    }

    Ok(pair_edits)
}

// ---------------------------------------------------------------------------
// Built-in sample data
//
// A small sample of common diagnoses, the core modifier set, and a handful of
// NCCI edits. A production deployment overrides these with the full CMS
// distributions through the builder.

fn builtin_icd10() -> Vec<IcdCode> {
    vec![
        IcdCode {
            code: "M25.561".to_string(),
            title: "Pain in right knee".to_string(),
            includes: Some(vec!["Right knee pain".to_string()]),
            excludes: Some(vec!["Pain in left knee (M25.562)".to_string()]),
            synonyms: Some(vec![
                "knee pain right".to_string(),
                "arthralgia right knee".to_string(),
            ]),
        },
        IcdCode {
            code: "M25.562".to_string(),
            title: "Pain in left knee".to_string(),
            includes: Some(vec!["Left knee pain".to_string()]),
            excludes: Some(vec!["Pain in right knee (M25.561)".to_string()]),
            synonyms: Some(vec![
                "knee pain left".to_string(),
                "arthralgia left knee".to_string(),
            ]),
        },
        IcdCode {
            code: "J10.1".to_string(),
            title: "Influenza due to other identified influenza virus with other respiratory manifestations"
                .to_string(),
            includes: Some(vec!["Influenza with pneumonia".to_string()]),
            excludes: None,
            synonyms: Some(vec![
                "flu with respiratory manifestations".to_string(),
                "influenza pneumonia".to_string(),
            ]),
        },
        IcdCode {
            code: "M54.5".to_string(),
            title: "Low back pain".to_string(),
            includes: Some(vec!["Lumbago".to_string()]),
            excludes: None,
            synonyms: Some(vec![
                "back pain".to_string(),
                "lower back pain".to_string(),
            ]),
        },
        IcdCode {
            code: "R07.9".to_string(),
            title: "Chest pain, unspecified".to_string(),
            includes: Some(vec!["Chest pain NOS".to_string()]),
            excludes: None,
            synonyms: Some(vec![
                "chest discomfort".to_string(),
                "unspecified chest pain".to_string(),
            ]),
        },
    ]
}

fn builtin_modifiers() -> Vec<Modifier> {
    vec![
        Modifier {
            code: "25".to_string(),
            title: "Significant, separately identifiable evaluation and management service on the same day of the procedure".to_string(),
            reason: "Use when a separately documented E/M service is performed on the same day as another procedure.".to_string(),
        },
        Modifier {
            code: "59".to_string(),
            title: "Distinct procedural service".to_string(),
            reason: "Indicates a procedure or service was distinct or independent from other services performed on the same day.".to_string(),
        },
        Modifier {
            code: "50".to_string(),
            title: "Bilateral procedure".to_string(),
            reason: "Used when the same procedure is performed on both sides of the body during the same session.".to_string(),
        },
        Modifier {
            code: "LT".to_string(),
            title: "Left side".to_string(),
            reason: "Procedures performed on the left side of the body.".to_string(),
        },
        Modifier {
            code: "RT".to_string(),
            title: "Right side".to_string(),
            reason: "Procedures performed on the right side of the body.".to_string(),
        },
        Modifier {
            code: "76".to_string(),
            title: "Repeat procedure or service by same physician".to_string(),
            reason: "Indicates a repeat procedure by the same physician.".to_string(),
        },
        Modifier {
            code: "77".to_string(),
            title: "Repeat procedure by another physician".to_string(),
            reason: "Indicates a repeat procedure by a different physician.".to_string(),
        },
        Modifier {
            code: "26".to_string(),
            title: "Professional component".to_string(),
            reason: "Used when only the professional component of a service is being billed (e.g., interpretation of radiologic studies).".to_string(),
        },
        Modifier {
            code: "TC".to_string(),
            title: "Technical component".to_string(),
            reason: "Used when only the technical component of a service is being billed (e.g., use of equipment).".to_string(),
        },
    ]
}

fn builtin_pair_edits() -> HashMap<String, HashMap<String, PairEdit>> {
    let mut pairs: HashMap<String, HashMap<String, PairEdit>> = HashMap::new();

    // Trimming of non-dystrophic nails bundled into debridement
    pairs.entry("11719".to_string()).or_default().insert(
        "11720".to_string(),
        PairEdit {
            status: EditStatus::Denied,
            message: "CPT 11719 is bundled into 11720; they should not be billed together without appropriate modifier.".to_string(),
            modifier_required: true,
        },
    );

    // Destruction of benign lesions at separate sites
    pairs.entry("17000".to_string()).or_default().insert(
        "17110".to_string(),
        PairEdit {
            status: EditStatus::Allowed,
            message: "CPT 17000 and 17110 may be reported together with modifier 59 if lesions are separate/distinct sites.".to_string(),
            modifier_required: true,
        },
    );

    // Chest X-ray views
    pairs.entry("71045".to_string()).or_default().insert(
        "71046".to_string(),
        PairEdit {
            status: EditStatus::Allowed,
            message: "Two different chest X-ray views are generally allowed together.".to_string(),
            modifier_required: false,
        },
    );

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dataset_validates() {
        let dataset = CodingDataset::builtin();
        assert!(dataset.validate().is_ok());
        let stats = dataset.statistics();
        assert_eq!(stats.icd10_count, 5);
        assert_eq!(stats.modifier_count, 9);
        assert_eq!(stats.pair_edit_count, 3);
    }

    #[test]
    fn test_pair_edit_lookup_is_symmetric() {
        let dataset = CodingDataset::builtin();
        let forward = dataset.pair_edit("11719", "11720");
        let reverse = dataset.pair_edit("11720", "11719");
        assert!(forward.is_some());
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_unknown_pair_has_no_edit() {
        let dataset = CodingDataset::builtin();
        assert!(dataset.pair_edit("99999", "88888").is_none());
    }

    #[test]
    fn test_duplicate_modifier_code_rejected() {
        let mut dataset = CodingDataset::builtin();
        let duplicate = dataset.modifiers[0].clone();
        dataset.modifiers.push(duplicate);
        assert!(matches!(
            dataset.validate(),
            Err(MedcodeError::DataIntegrity { .. })
        ));
    }

    #[test]
    fn test_missing_rule_modifier_rejected() {
        let mut dataset = CodingDataset::builtin();
        dataset.modifiers.retain(|m| m.code != "50");
        assert!(matches!(
            dataset.validate(),
            Err(MedcodeError::DataIntegrity { .. })
        ));
    }
}

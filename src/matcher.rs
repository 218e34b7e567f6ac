/*!
 * Diagnosis code matching
 *
 * Scores every ICD-10-CM record in the dataset against a free-text query
 * using substring hits over the code, title, includes/excludes notes and
 * synonyms, plus a fuzzy similarity ratio against the title. Results come
 * back sorted by descending score with zero-score entries dropped.
 */

use std::cmp::Ordering;

use crate::constants::*;
use crate::data_types::{IcdCode, MatchResult};
use crate::dataset::CodingDataset;

/// Search the diagnosis codes for the best matches to a free-text query
///
/// Returns at most `limit` entries sorted by non-increasing score. Ties keep
/// dataset insertion order (the sort is stable and candidates are scored in
/// load order). An empty result means no entry had any substring or fuzzy
/// overlap with the query.
pub fn search_icd10<'a>(
    dataset: &'a CodingDataset,
    query: &str,
    limit: usize,
) -> Vec<MatchResult<'a>> {
    let query = query.trim().to_lowercase();

    let mut scored: Vec<MatchResult<'a>> = dataset
        .icd10
        .iter()
        .filter_map(|entry| {
            let score = score_entry(entry, &query);
            if score > 0.0 {
                Some(MatchResult { entry, score })
            } else {
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(limit);
    scored
}

/// Score a single diagnosis code record against a lowercased query
fn score_entry(entry: &IcdCode, query: &str) -> f64 {
    let mut score = 0.0;

    // Direct substring match in code or title
    if entry.code.to_lowercase().contains(query) {
        score += SCORE_CODE_SUBSTRING;
    }
    let title_lower = entry.title.to_lowercase();
    if title_lower.contains(query) {
        score += SCORE_TITLE_SUBSTRING;
    }

    // Includes/excludes notes
    for section in entry.includes.iter().flatten() {
        if section.to_lowercase().contains(query) {
            score += SCORE_INCLUDES_ENTRY;
        }
    }
    for section in entry.excludes.iter().flatten() {
        if section.to_lowercase().contains(query) {
            score += SCORE_EXCLUDES_ENTRY;
        }
    }

    // Synonyms
    for synonym in entry.synonyms.iter().flatten() {
        if synonym.to_lowercase().contains(query) {
            score += SCORE_SYNONYMS_ENTRY;
        }
    }

    // Fuzzy ratio on the title, added regardless of substring hits
    score + similarity_ratio(query, &title_lower)
}

/// Fuzzy similarity ratio between two strings, in [0, 1]
///
/// Computed as `2 * LCS(a, b) / (|a| + |b|)` over characters: the classic
/// longest-common-subsequence ratio. Symmetric in its arguments; 1.0 for
/// identical strings, 0.0 when the strings share no characters.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Two-row dynamic program for the LCS length
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    let lcs = prev[b.len()];

    (2.0 * lcs as f64) / (total as f64)
}

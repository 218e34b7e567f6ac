/*!
 * Integration tests for the medcode library and its HTTP boundary
 *
 * Exercises the three lookup components end to end through the warp filter
 * tree, plus dataset loading from files. No network access is required; all
 * requests run against in-process filters.
 */

use std::io::Write;
use std::sync::Arc;

use medcode::api;
use medcode::prelude::*;
use serde_json::Value;
use warp::http::StatusCode;

fn test_routes() -> impl warp::Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone
{
    api::routes(Arc::new(CodingDataset::builtin()))
}

async fn get_json(path: &str) -> (StatusCode, Value) {
    let res = warp::test::request()
        .path(path)
        .reply(&test_routes())
        .await;
    let status = res.status();
    let body: Value = serde_json::from_slice(res.body()).expect("response body should be JSON");
    (status, body)
}

// ---------------------------------------------------------------------------
// Liveness

#[tokio::test]
async fn health_returns_fixed_ok() {
    let (status, body) = get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ---------------------------------------------------------------------------
// Diagnosis code search

#[tokio::test]
async fn search_icd10_leads_with_right_knee() {
    let (status, body) = get_json("/search/icd10?query=knee%20pain%20right&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().expect("array response");
    assert!(!results.is_empty());
    assert_eq!(results[0]["code"], "M25.561");
    assert_eq!(results[0]["title"], "Pain in right knee");
}

#[tokio::test]
async fn search_icd10_respects_limit() {
    let (status, body) = get_json("/search/icd10?query=pain&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().len() <= 2);
}

#[tokio::test]
async fn search_icd10_defaults_limit_to_five() {
    let (status, body) = get_json("/search/icd10?query=pain").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().len() <= 5);
}

#[tokio::test]
async fn search_icd10_unmatched_query_yields_empty_list() {
    let (status, body) = get_json("/search/icd10?query=0000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn search_icd10_rejects_missing_query() {
    let (status, body) = get_json("/search/icd10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn search_icd10_rejects_empty_query() {
    let (status, _) = get_json("/search/icd10?query=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Modifier suggestions

#[tokio::test]
async fn modifier_bilateral_suggests_exactly_50() {
    let (status, body) =
        get_json("/search/modifier?query=bilateral%20procedure%20on%20both%20sides").await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["code"], "50");
}

#[tokio::test]
async fn modifier_rule_order_sets_result_order() {
    let (status, body) = get_json("/search/modifier?query=left%20repeat").await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["LT", "76"]);
}

#[tokio::test]
async fn modifier_unmatched_query_yields_empty_list() {
    let (status, body) = get_json("/search/modifier?query=office%20visit").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn modifier_rejects_missing_query() {
    let (status, _) = get_json("/search/modifier").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// NCCI pair checks

#[tokio::test]
async fn ncci_bundled_pair_is_denied() {
    let (status, body) = get_json("/check/ncci?cpt_a=11719&cpt_b=11720").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "denied");
    assert_eq!(body["modifier_required"], true);
    assert_eq!(body["cpt_a"], "11719");
    assert_eq!(body["cpt_b"], "11720");
}

#[tokio::test]
async fn ncci_check_is_symmetric() {
    let (_, forward) = get_json("/check/ncci?cpt_a=11719&cpt_b=11720").await;
    let (_, reverse) = get_json("/check/ncci?cpt_a=11720&cpt_b=11719").await;
    assert_eq!(forward["status"], reverse["status"]);
    assert_eq!(forward["message"], reverse["message"]);
    assert_eq!(forward["modifier_required"], reverse["modifier_required"]);
    // Echoed codes follow the caller's order
    assert_eq!(reverse["cpt_a"], "11720");
    assert_eq!(reverse["cpt_b"], "11719");
}

#[tokio::test]
async fn ncci_compatible_pair_is_allowed() {
    let (status, body) = get_json("/check/ncci?cpt_a=71045&cpt_b=71046").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "allowed");
    assert_eq!(body["modifier_required"], false);
}

#[tokio::test]
async fn ncci_unknown_pair_defaults_to_allowed() {
    let (status, body) = get_json("/check/ncci?cpt_a=99999&cpt_b=88888").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "allowed");
    assert_eq!(body["modifier_required"], false);
    assert_eq!(
        body["message"],
        "No known NCCI bundling issues between these CPT codes."
    );
}

#[tokio::test]
async fn ncci_rejects_wrong_length_code() {
    let (status, body) = get_json("/check/ncci?cpt_a=117&cpt_b=11720").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("cpt_a"));
}

#[tokio::test]
async fn ncci_rejects_missing_code() {
    let (status, _) = get_json("/check/ncci?cpt_a=11719").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Unknown routes

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, body) = get_json("/search/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

// ---------------------------------------------------------------------------
// File-backed datasets

#[test]
fn dataset_overrides_load_from_files() {
    let dir = tempfile::tempdir().expect("tempdir");

    let icd10_path = dir.path().join("icd10.json");
    let mut icd10_file = std::fs::File::create(&icd10_path).unwrap();
    write!(
        icd10_file,
        r#"[
            {{"code": "E11.9", "title": "Type 2 diabetes mellitus without complications",
              "synonyms": ["type 2 diabetes", "adult-onset diabetes"]}},
            {{"code": "I10", "title": "Essential (primary) hypertension",
              "includes": ["High blood pressure"]}}
        ]"#
    )
    .unwrap();

    // The modifier table must still cover every advisor rule target
    let modifiers_path = dir.path().join("modifiers.csv");
    let mut modifiers_file = std::fs::File::create(&modifiers_path).unwrap();
    writeln!(modifiers_file, "code,title,reason").unwrap();
    for (code, title) in [
        ("50", "Bilateral procedure"),
        ("LT", "Left side"),
        ("RT", "Right side"),
        ("76", "Repeat procedure or service by same physician"),
        ("59", "Distinct procedural service"),
        ("25", "Significant, separately identifiable E/M service"),
        ("26", "Professional component"),
        ("TC", "Technical component"),
    ] {
        writeln!(modifiers_file, "{},\"{}\",\"{}\"", code, title, title).unwrap();
    }

    let pair_edits_path = dir.path().join("pair_edits.csv");
    let mut pair_edits_file = std::fs::File::create(&pair_edits_path).unwrap();
    writeln!(pair_edits_file, "cpt_a,cpt_b,status,message,modifier_required").unwrap();
    writeln!(
        pair_edits_file,
        "93000,93010,denied,\"CPT 93010 is a component of 93000; do not report together.\",true"
    )
    .unwrap();

    let dataset = CodingDatasetBuilder::new()
        .icd10_data(&icd10_path)
        .modifier_table(&modifiers_path)
        .pair_edits(&pair_edits_path)
        .build()
        .expect("dataset should load");

    let matches = search_icd10(&dataset, "diabetes", 5);
    assert_eq!(matches[0].entry.code, "E11.9");

    let result = check_ncci_pair(
        &dataset,
        &CptCode::new("93010").unwrap(),
        &CptCode::new("93000").unwrap(),
    );
    assert_eq!(result.status, EditStatus::Denied);
    assert!(result.modifier_required);
}

#[test]
fn dataset_rejects_unknown_status() {
    let dir = tempfile::tempdir().expect("tempdir");

    let pair_edits_path = dir.path().join("pair_edits.csv");
    let mut pair_edits_file = std::fs::File::create(&pair_edits_path).unwrap();
    writeln!(pair_edits_file, "cpt_a,cpt_b,status,message,modifier_required").unwrap();
    writeln!(pair_edits_file, "11719,11720,bundled,some message,true").unwrap();

    let result = CodingDatasetBuilder::new()
        .pair_edits(&pair_edits_path)
        .build();
    assert!(matches!(result, Err(MedcodeError::DatasetParse { .. })));
}

#[test]
fn dataset_rejects_modifier_table_missing_rule_target() {
    let dir = tempfile::tempdir().expect("tempdir");

    // Drop the "TC" row the advisor rules depend on
    let modifiers_path = dir.path().join("modifiers.csv");
    let mut modifiers_file = std::fs::File::create(&modifiers_path).unwrap();
    writeln!(modifiers_file, "code,title,reason").unwrap();
    for code in ["50", "LT", "RT", "76", "59", "25", "26"] {
        writeln!(modifiers_file, "{},title,reason", code).unwrap();
    }

    let result = CodingDatasetBuilder::new()
        .modifier_table(&modifiers_path)
        .build();
    assert!(matches!(result, Err(MedcodeError::DataIntegrity { .. })));
}

/*!
 * HTTP boundary for the coding lookup components
 *
 * A thin warp filter tree mapping each endpoint to exactly one component
 * call. All input validation (required fields, non-empty queries, 5-character
 * CPT codes) happens here before any component logic runs; violations are
 * answered with a JSON client-error body.
 *
 * Endpoints:
 * - `GET /search/icd10?query=...&limit=N` — diagnosis code search
 * - `GET /search/modifier?query=...` — modifier suggestions
 * - `GET /check/ncci?cpt_a=...&cpt_b=...` — pair-edit check
 * - `GET /health` — liveness check
 */

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info};
use serde::Deserialize;
use serde_json::json;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

use crate::data_types::{CptCode, IcdCode};
use crate::dataset::CodingDataset;
use crate::{advisor, matcher, ncci};

/// Unified return type for the API handlers
type ApiReply = Result<WithStatus<Json>, Rejection>;

/// Query parameters for `GET /search/icd10`
#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
    limit: Option<usize>,
}

/// Query parameters for `GET /search/modifier`
#[derive(Debug, Deserialize)]
struct ModifierParams {
    query: Option<String>,
}

/// Query parameters for `GET /check/ncci`
#[derive(Debug, Deserialize)]
struct NcciParams {
    cpt_a: Option<String>,
    cpt_b: Option<String>,
}

// Helper to inject the dataset into warp filters
fn with_dataset(
    dataset: Arc<CodingDataset>,
) -> impl Filter<Extract = (Arc<CodingDataset>,), Error = Infallible> + Clone {
    warp::any().map(move || dataset.clone())
}

fn client_error(message: String) -> WithStatus<Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({ "error": message })),
        StatusCode::BAD_REQUEST,
    )
}

/// Extract a required, non-empty query string or build the 400 response
fn require_query(raw: Option<&str>) -> Result<String, WithStatus<Json>> {
    match raw {
        Some(query) if !query.trim().is_empty() => Ok(query.to_string()),
        Some(_) => Err(client_error("'query' must not be empty".to_string())),
        None => Err(client_error("missing required parameter 'query'".to_string())),
    }
}

/// Extract a required CPT code parameter or build the 400 response
fn require_cpt(name: &str, raw: Option<&str>) -> Result<CptCode, WithStatus<Json>> {
    let raw = match raw {
        Some(raw) => raw,
        None => {
            return Err(client_error(format!(
                "missing required parameter '{}'",
                name
            )))
        }
    };
    CptCode::new(raw).map_err(|err| client_error(format!("'{}': {}", name, err)))
}

async fn handle_search_icd10(params: SearchParams, dataset: Arc<CodingDataset>) -> ApiReply {
    let query = match require_query(params.query.as_deref()) {
        Ok(query) => query,
        Err(reply) => return Ok(reply),
    };
    let limit = params.limit.unwrap_or(crate::constants::DEFAULT_SEARCH_LIMIT);

    let matches = matcher::search_icd10(&dataset, &query, limit);
    debug!("icd10 search '{}' -> {} matches", query, matches.len());

    // Scores are ephemeral; only the matched records go over the wire
    let codes: Vec<&IcdCode> = matches.iter().map(|m| m.entry).collect();
    Ok(warp::reply::with_status(
        warp::reply::json(&codes),
        StatusCode::OK,
    ))
}

async fn handle_search_modifier(params: ModifierParams, dataset: Arc<CodingDataset>) -> ApiReply {
    let query = match require_query(params.query.as_deref()) {
        Ok(query) => query,
        Err(reply) => return Ok(reply),
    };

    match advisor::suggest_modifiers(&dataset, &query) {
        Ok(suggestions) => {
            debug!(
                "modifier search '{}' -> {} suggestions",
                query,
                suggestions.len()
            );
            Ok(warp::reply::with_status(
                warp::reply::json(&suggestions),
                StatusCode::OK,
            ))
        }
        // Unreachable for a validated dataset; answered as a server defect
        Err(err) => {
            error!("modifier suggestion failed: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&json!({ "error": err.to_string() })),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_check_ncci(params: NcciParams, dataset: Arc<CodingDataset>) -> ApiReply {
    let cpt_a = match require_cpt("cpt_a", params.cpt_a.as_deref()) {
        Ok(code) => code,
        Err(reply) => return Ok(reply),
    };
    let cpt_b = match require_cpt("cpt_b", params.cpt_b.as_deref()) {
        Ok(code) => code,
        Err(reply) => return Ok(reply),
    };

    let result = ncci::check_ncci_pair(&dataset, &cpt_a, &cpt_b);
    debug!(
        "ncci check ({}, {}) -> {}",
        result.cpt_a, result.cpt_b, result.status
    );
    Ok(warp::reply::with_status(
        warp::reply::json(&result),
        StatusCode::OK,
    ))
}

async fn handle_health() -> ApiReply {
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "status": "ok" })),
        StatusCode::OK,
    ))
}

/// Map rejections (unparseable query strings, unknown paths) to JSON bodies
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "resource not found".to_string())
    } else if let Some(invalid) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, invalid.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_string(),
        )
    } else {
        error!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "error": message })),
        status,
    ))
}

/// Build the complete filter tree for the API
///
/// The dataset is shared read-only across requests; handlers never mutate it,
/// so no coordination is needed between concurrent requests.
pub fn routes(
    dataset: Arc<CodingDataset>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let search_icd10 = warp::path!("search" / "icd10")
        .and(warp::get())
        .and(warp::query::<SearchParams>())
        .and(with_dataset(dataset.clone()))
        .and_then(handle_search_icd10);

    let search_modifier = warp::path!("search" / "modifier")
        .and(warp::get())
        .and(warp::query::<ModifierParams>())
        .and(with_dataset(dataset.clone()))
        .and_then(handle_search_modifier);

    let check_ncci = warp::path!("check" / "ncci")
        .and(warp::get())
        .and(warp::query::<NcciParams>())
        .and(with_dataset(dataset))
        .and_then(handle_check_ncci);

    let health = warp::path!("health").and(warp::get()).and_then(handle_health);

    search_icd10
        .or(search_modifier)
        .or(check_ncci)
        .or(health)
        .recover(handle_rejection)
}

/// Serve the API on the given address until the task is cancelled
pub async fn serve(dataset: Arc<CodingDataset>, addr: SocketAddr) {
    info!("medcode API listening on {}", addr);
    let routes = routes(dataset).with(warp::log("medcode::api"));
    warp::serve(routes).run(addr).await;
}

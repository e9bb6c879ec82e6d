use std::sync::OnceLock;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bizval_core::grading::{composite_score, score_to_grade, Grade};
use bizval_core::{ValuationEngine, ValuationForm};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

static ENGINE: OnceLock<ValuationEngine> = OnceLock::new();

/// Engine over the built-in NAICS table, built on first use and shared
/// read-only by every call afterwards.
fn engine() -> NapiResult<&'static ValuationEngine> {
    if let Some(engine) = ENGINE.get() {
        return Ok(engine);
    }
    let engine = ValuationEngine::with_builtin_index().map_err(to_napi_error)?;
    Ok(ENGINE.get_or_init(|| engine))
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// Value an assessment form (camelCase JSON, amounts as strings).
#[napi]
pub fn compute_valuation(form_json: String) -> NapiResult<String> {
    let form: ValuationForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let output = engine()?.compute_from_form(&form).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Value an assessment form and return only the persisted record.
#[napi]
pub fn compute_assessment_record(form_json: String) -> NapiResult<String> {
    let form: ValuationForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let output = engine()?.compute_from_form(&form).map_err(to_napi_error)?;
    serde_json::to_string(&output.result.to_record()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scoring and multipliers
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResponse {
    composite_score: Decimal,
    overall_grade: Grade,
}

/// Composite score for a JSON array of letter grades.
#[napi]
pub fn score_grades(grades_json: String) -> NapiResult<String> {
    let letters: Vec<String> = serde_json::from_str(&grades_json).map_err(to_napi_error)?;
    let grades = letters
        .iter()
        .map(|g| g.parse::<Grade>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_napi_error)?;
    let composite = composite_score(&grades).map_err(to_napi_error)?;
    let response = ScoreResponse {
        composite_score: composite,
        overall_grade: score_to_grade(composite),
    };
    serde_json::to_string(&response).map_err(to_napi_error)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultiplierRequest {
    #[serde(default)]
    naics_code: Option<String>,
    score: Decimal,
}

/// Resolve the multiple for `{ "naicsCode": ..., "score": ... }`.
#[napi]
pub fn resolve_multiplier(request_json: String) -> NapiResult<String> {
    let request: MultiplierRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let resolution = engine()?
        .resolver()
        .resolve_detailed(request.naics_code.as_deref(), request.score);
    serde_json::to_string(&resolution).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// NAICS
// ---------------------------------------------------------------------------

/// Nearest priced NAICS node for a code, or `null` when none exists.
#[napi]
pub fn lookup_naics(code: String) -> NapiResult<String> {
    let node = engine()?.index().lookup_with_fallback(&code);
    serde_json::to_string(&node).map_err(to_napi_error)
}

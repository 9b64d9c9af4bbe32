use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------

#[napi]
pub fn aggregate_costs(input_json: String) -> NapiResult<String> {
    let input: leilao_core::costs::CostInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = leilao_core::costs::calculate_costs(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Decimal string in, "1.234.567,89" out. A missing value gives "".
#[napi]
pub fn format_brl(value: Option<String>) -> NapiResult<String> {
    let amount = value
        .as_deref()
        .map(Decimal::from_str)
        .transpose()
        .map_err(to_napi_error)?;
    Ok(leilao_core::format::format_brl(amount))
}

#[napi]
pub fn parse_brl(text: String) -> NapiResult<String> {
    let amount = leilao_core::format::parse_brl(&text).map_err(to_napi_error)?;
    Ok(amount.to_string())
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

#[napi]
pub fn checklist_steps() -> NapiResult<String> {
    serde_json::to_string(leilao_core::checklist::STEPS).map_err(to_napi_error)
}

#[napi]
pub fn build_report(answers_json: String) -> NapiResult<String> {
    let answers: leilao_core::checklist::ChecklistAnswers =
        serde_json::from_str(&answers_json).map_err(to_napi_error)?;
    let output = leilao_core::checklist::build_report(&answers).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

//! Handler for the legacy math converter.

use axum::Json;
use validator::Validate;

use crate::api::dto::convert::{ConvertRequest, ConvertResponse};
use crate::domain::markup::{trace_legacy_math, transform_legacy_math};
use crate::error::AppError;

/// Converts legacy `<sub>`/`<sup>` math markup to LaTeX.
///
/// # Endpoint
///
/// `POST /api/convert`
///
/// # Request Body
///
/// ```json
/// { "input": "x<sup>2</sup> + α", "trace": true }
/// ```
///
/// With `trace` set, `stages` lists the text after every pipeline stage.
pub async fn convert_handler(
    Json(payload): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError> {
    payload.validate()?;

    let response = if payload.trace {
        let stages = trace_legacy_math(&payload.input);
        let output = stages
            .last()
            .map(|stage| stage.output.clone())
            .unwrap_or_default();
        ConvertResponse {
            output,
            stages: Some(stages),
        }
    } else {
        ConvertResponse {
            output: transform_legacy_math(&payload.input),
            stages: None,
        }
    };

    Ok(Json(response))
}

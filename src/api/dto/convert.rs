//! DTOs for the legacy math converter.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::markup::StageOutput;

/// Text to convert.
#[derive(Debug, Deserialize, Validate)]
pub struct ConvertRequest {
    #[validate(length(max = 1_000_000, message = "Input is too large"))]
    pub input: String,

    /// Include the text after every stage in the response.
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub output: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<StageOutput>>,
}

//! Admin page for the legacy math converter.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use serde::Deserialize;

use crate::domain::markup::{StageOutput, trace_legacy_math, transform_legacy_math};

#[derive(Template, WebTemplate)]
#[template(path = "admin/convert.html")]
pub struct ConvertTemplate {
    input: String,
    output: Option<String>,
    trace: bool,
    stages: Vec<StageOutput>,
}

#[derive(Debug, Deserialize)]
pub struct ConvertForm {
    #[serde(default)]
    pub input: String,
    /// Checkbox; present when ticked.
    pub trace: Option<String>,
}

/// `GET /admin/convert`
pub async fn convert_page_handler() -> ConvertTemplate {
    ConvertTemplate {
        input: String::new(),
        output: None,
        trace: false,
        stages: Vec::new(),
    }
}

/// Converts the submitted text and shows the result, optionally with the
/// text after every stage.
///
/// `POST /admin/convert`
pub async fn convert_submit_handler(Form(form): Form<ConvertForm>) -> ConvertTemplate {
    let trace = form.trace.is_some();
    let (output, stages) = if trace {
        let stages = trace_legacy_math(&form.input);
        let output = stages
            .last()
            .map(|stage| stage.output.clone())
            .unwrap_or_default();
        (output, stages)
    } else {
        (transform_legacy_math(&form.input), Vec::new())
    };

    ConvertTemplate {
        input: form.input,
        output: Some(output),
        trace,
        stages,
    }
}

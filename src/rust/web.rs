//! The statement form served over HTTP.
//!
//! Routes:
//! - `GET /` form page
//! - `POST /predict` classify the submitted `statement`
//! - `GET /health` JSON status
//!
//! When the artifacts failed to load, every route answers with the static
//! error state and no submission is processed.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::pipeline::{InferencePipeline, PipelineError, Prediction};

const LOAD_FAILURE_MESSAGE: &str = "Model files not found or failed to load.";
const EMPTY_INPUT_MESSAGE: &str = "Please enter a statement.";
const PREDICTION_FAILURE_MESSAGE: &str = "The statement could not be classified.";

enum AppMode {
    Ready(InferencePipeline),
    Unavailable,
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    mode: Arc<AppMode>,
}

impl AppState {
    /// State for a successfully loaded pipeline
    pub fn ready(pipeline: InferencePipeline) -> Self {
        Self {
            mode: Arc::new(AppMode::Ready(pipeline)),
        }
    }

    /// State after a failed artifact load; all submissions are refused
    pub fn unavailable() -> Self {
        Self {
            mode: Arc::new(AppMode::Unavailable),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.mode, AppMode::Ready(_))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/predict", post(submit))
        .route("/health", get(health_check))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct StatementForm {
    #[serde(default)]
    pub statement: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub preprocessing: Option<String>,
}

async fn form_page(State(state): State<AppState>) -> Response {
    match &*state.mode {
        AppMode::Ready(_) => Html(render_page("", Outcome::None)).into_response(),
        AppMode::Unavailable => unavailable_response(),
    }
}

async fn submit(
    State(state): State<AppState>,
    form: Result<Form<StatementForm>, FormRejection>,
) -> Response {
    let pipeline = match &*state.mode {
        AppMode::Ready(pipeline) => pipeline,
        AppMode::Unavailable => return unavailable_response(),
    };

    let Form(form) = match form {
        Ok(form) => form,
        Err(e) => {
            warn!("Rejected form submission: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Html(render_page("", Outcome::Failure("Could not read the submitted form."))),
            )
                .into_response();
        }
    };

    match pipeline.predict(&form.statement) {
        Ok(prediction) => {
            info!(
                "Classified statement as {} ({}%)",
                prediction.label,
                prediction.confidence_display()
            );
            Html(render_page(&form.statement, Outcome::Result(&prediction))).into_response()
        }
        Err(PipelineError::EmptyInput) => {
            let page = render_page(&form.statement, Outcome::Warning(EMPTY_INPUT_MESSAGE));
            Html(page).into_response()
        }
        Err(e) => {
            error!("Prediction failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_page(&form.statement, Outcome::Failure(PREDICTION_FAILURE_MESSAGE))),
            )
                .into_response()
        }
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, preprocessing) = match &*state.mode {
        AppMode::Ready(pipeline) => (
            "ok",
            StatusCode::OK,
            Some(pipeline.preprocessing().as_str().to_string()),
        ),
        AppMode::Unavailable => ("unavailable", StatusCode::SERVICE_UNAVAILABLE, None),
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            module: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            preprocessing,
        }),
    )
}

fn unavailable_response() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, Html(render_error_page())).into_response()
}

enum Outcome<'a> {
    None,
    Warning(&'a str),
    Failure(&'a str),
    Result(&'a Prediction),
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_outcome(outcome: Outcome<'_>) -> String {
    match outcome {
        Outcome::None => String::new(),
        Outcome::Warning(msg) => format!(r#"<p class="warning">{}</p>"#, escape_html(msg)),
        Outcome::Failure(msg) => format!(r#"<p class="error">{}</p>"#, escape_html(msg)),
        Outcome::Result(prediction) => format!(
            r#"<section class="result">
        <h2>Prediction Result</h2>
        <p class="label"><strong>Label:</strong> {}</p>
        <p class="confidence"><strong>Confidence:</strong> {}%</p>
    </section>"#,
            escape_html(&prediction.label),
            prediction.confidence_display()
        ),
    }
}

fn page_shell(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Fake News Detection</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 720px;
            margin: 40px auto;
            line-height: 1.6;
        }}
        textarea {{
            width: 100%;
            height: 150px;
        }}
        .warning {{ color: #8a6d3b; }}
        .error {{ color: #a94442; }}
        footer {{ color: #888; font-size: 0.9em; }}
    </style>
</head>
<body>
    <h1>Fake News Detection System</h1>
    {}
    <footer>This tool is for educational purposes only.</footer>
</body>
</html>
"#,
        body
    )
}

fn render_page(statement: &str, outcome: Outcome<'_>) -> String {
    let body = format!(
        r#"<form method="post" action="/predict">
        <label for="statement">Enter the statement:</label>
        <textarea id="statement" name="statement" placeholder="Example: The government announced a new education policy today...">{}</textarea>
        <button type="submit">Predict</button>
    </form>
    {}"#,
        escape_html(statement),
        render_outcome(outcome)
    );
    page_shell(&body)
}

fn render_error_page() -> String {
    page_shell(&format!(r#"<p class="error">{}</p>"#, LOAD_FAILURE_MESSAGE))
}

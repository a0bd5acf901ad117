//! Normalization endpoint.

use axum::{Json, extract::State};
use normform::{
    NormalForm, NormalFormRequest, NormalizationReport, Normalizer, NormalizerConfig,
};
use serde::Deserialize;

use crate::server::error::ApiError;
use crate::server::state::AppState;

fn default_current() -> String {
    "auto".to_string()
}

/// Body of `POST /api/normalize-database`.
#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    /// Sample rows as CSV text, header first.
    pub sample_csv: String,
    /// Primary-key column names.
    #[serde(default)]
    pub keys: Vec<String>,
    /// Dependencies in `X -> Y, Z` form.
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub target_normal_form: String,
    /// A level label, or `auto` to classify the input first.
    #[serde(default = "default_current")]
    pub current_normal_form: String,
    pub relation_name: Option<String>,
}

/// Classify the uploaded sample and decompose it to the requested level.
pub async fn normalize_database(
    State(state): State<AppState>,
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizationReport>, ApiError> {
    if request.sample_csv.trim().is_empty() {
        return Err(ApiError::BadRequest("sample_csv is empty".to_string()));
    }

    let target: NormalForm = request.target_normal_form.parse()?;
    let current: NormalFormRequest = request.current_normal_form.parse()?;

    let config = NormalizerConfig {
        parser: state.parser.clone(),
        relation_name: request
            .relation_name
            .clone()
            .unwrap_or_else(|| state.relation_name.clone()),
        target,
        current,
    };

    tracing::debug!(
        level = %target,
        current = %current,
        keys = request.keys.len(),
        dependencies = request.dependencies.len(),
        "normalize request"
    );

    let report = tokio::task::spawn_blocking(move || {
        let normalizer = Normalizer::with_config(config);
        let relation =
            normalizer.load_str(&request.sample_csv, &request.keys, &request.dependencies)?;
        Ok::<_, normform::NormalizeError>(normalizer.run(relation))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Normalization task failed: {}", e)))??;

    Ok(Json(report))
}

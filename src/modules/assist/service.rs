use quizhub_core::AppError;
use quizhub_models::AssistResponse;

use crate::hints::{HintError, HintProvider};
use crate::metrics::track_hint_generated;

pub struct AssistService;

impl AssistService {
    /// Runs one prompt through the provider. `kind` labels the metric.
    pub async fn generate(
        hints: &dyn HintProvider,
        kind: &'static str,
        prompt: &str,
    ) -> Result<AssistResponse, AppError> {
        let result = hints.generate(prompt).await;
        track_hint_generated(kind, result.is_ok());

        let text = result.map_err(HintError::into_app_error)?;
        Ok(AssistResponse {
            text: text.trim().to_string(),
        })
    }
}

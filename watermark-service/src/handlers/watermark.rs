use crate::dtos::{WatermarkRequest, WatermarkResponse};
use crate::services::record_composition;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{extract::State, Json};
use service_core::error::AppError;
use std::time::Instant;

/// Overlay the configured logo and a QR code for `link` onto `image`.
///
/// Decoding, composition and encoding are CPU-bound and run on the blocking
/// pool.
#[tracing::instrument(skip_all)]
pub async fn watermark_image(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<WatermarkRequest>,
) -> Result<Json<WatermarkResponse>, AppError> {
    tracing::info!(
        image_len = request.image.len(),
        link_len = request.link.len(),
        "Watermark requested"
    );

    let compositor = state.compositor.clone();
    let start = Instant::now();

    let result = tokio::task::spawn_blocking(move || {
        compositor.watermark(&request.image, &request.link)
    })
    .await
    .map_err(|e| {
        tracing::error!("Composition task failed: {}", e);
        AppError::InternalError(anyhow::anyhow!("Composition task failed: {}", e))
    })?;

    match result {
        Ok(image) => {
            record_composition("success", start.elapsed());
            Ok(Json(WatermarkResponse { image }))
        }
        Err(e) => {
            record_composition(e.kind(), start.elapsed());
            if e.status_code().is_server_error() {
                tracing::error!(error = %e, "Watermark composition failed");
            } else {
                tracing::warn!(error = %e, "Watermark request rejected");
            }
            Err(e.into())
        }
    }
}

use crate::config::ErrorCorrection;
use axum::http::StatusCode;
use service_core::error::AppError;
use std::path::PathBuf;
use thiserror::Error;

/// Which overlay a geometry failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Logo,
    Qr,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Logo => f.write_str("logo"),
            Layer::Qr => f.write_str("QR code"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("image is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image could not be decoded: {0}")]
    Decode(#[source] image::ImageError),

    #[error("link of {len} bytes does not fit in a QR code at error correction level {level}")]
    QrCapacity { len: usize, level: ErrorCorrection },

    #[error("QR code could not be generated: {0}")]
    Qr(#[source] qrcode::types::QrError),

    #[error(
        "{layer} ({overlay_width}x{overlay_height}) does not fit on a {base_width}x{base_height} image"
    )]
    OverlayTooLarge {
        layer: Layer,
        overlay_width: u32,
        overlay_height: u32,
        base_width: u32,
        base_height: u32,
    },

    #[error("composite could not be encoded as PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("logo {} could not be loaded: {source}", .path.display())]
    Logo {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl CompositionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CompositionError::Base64(_) | CompositionError::Decode(_) => StatusCode::BAD_REQUEST,
            CompositionError::QrCapacity { .. } | CompositionError::OverlayTooLarge { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CompositionError::Qr(_) | CompositionError::Encode(_) | CompositionError::Logo { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CompositionError::Base64(_) => "base64",
            CompositionError::Decode(_) => "decode",
            CompositionError::QrCapacity { .. } => "qr_capacity",
            CompositionError::Qr(_) => "qr",
            CompositionError::OverlayTooLarge { .. } => "overlay_too_large",
            CompositionError::Encode(_) => "encode",
            CompositionError::Logo { .. } => "logo",
        }
    }
}

impl From<CompositionError> for AppError {
    fn from(err: CompositionError) -> Self {
        match err.status_code() {
            StatusCode::BAD_REQUEST => AppError::BadRequest(anyhow::Error::new(err)),
            StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::UnprocessableEntity(anyhow::Error::new(err))
            }
            _ => AppError::InternalError(anyhow::Error::new(err)),
        }
    }
}

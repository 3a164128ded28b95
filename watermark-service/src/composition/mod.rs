//! Logo + QR composition pipeline.
//!
//! `Compositor` owns the process-wide logo and QR settings. Each call works
//! on its own copy of the base image, so one instance can be shared across
//! concurrent requests.

pub mod codec;
pub mod error;
pub mod overlay;
pub mod qr;

pub use error::{CompositionError, Layer};
pub use overlay::{overlay_logo, overlay_qr, paste};
pub use qr::QrGenerator;

use crate::config::{LogoSettings, QrSettings};
use image::{DynamicImage, GenericImageView, RgbaImage};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Compositor {
    logo: Arc<RgbaImage>,
    qr: QrGenerator,
}

impl Compositor {
    pub fn new(logo: RgbaImage, qr: QrGenerator) -> Self {
        Self {
            logo: Arc::new(logo),
            qr,
        }
    }

    /// Load the logo from disk once; it is only ever read afterwards.
    pub fn from_settings(logo: &LogoSettings, qr: &QrSettings) -> Result<Self, CompositionError> {
        let image = image::open(&logo.path)
            .map_err(|source| CompositionError::Logo {
                path: logo.path.clone(),
                source,
            })?
            .to_rgba8();

        tracing::info!(
            path = %logo.path.display(),
            width = image.width(),
            height = image.height(),
            "Logo loaded"
        );

        Ok(Self::new(image, QrGenerator::new(qr)))
    }

    pub fn logo(&self) -> &RgbaImage {
        &self.logo
    }

    /// Logo at the top-left, QR for `link` at the bottom-right, on a copy of
    /// `base`.
    pub fn compose(&self, base: &RgbaImage, link: &str) -> Result<RgbaImage, CompositionError> {
        let qr = self.qr.generate(link)?;
        let composite = overlay_logo(base.clone(), &self.logo)?;
        overlay_qr(composite, &qr)
    }

    /// Full request transformation: base64 image in, base64 PNG out.
    ///
    /// The output keeps the base image's channel layout: RGB in, RGB out.
    pub fn watermark(&self, image_b64: &str, link: &str) -> Result<String, CompositionError> {
        let start = Instant::now();

        let base = codec::decode_base64_image(image_b64)?;
        let keep_alpha = base.color().has_alpha();
        let composite = self.compose(&base.to_rgba8(), link)?;

        let output = if keep_alpha {
            DynamicImage::ImageRgba8(composite)
        } else {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(composite).to_rgb8())
        };
        let encoded = codec::encode_png_base64(&output)?;

        tracing::info!(
            width = output.width(),
            height = output.height(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Watermark composed"
        );

        Ok(encoded)
    }
}

use super::error::CompositionError;
use super::overlay::paste;
use crate::config::{ErrorCorrection, QrSettings};
use image::{DynamicImage, Luma, Rgba, RgbaImage};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

const MAX_VERSION: i16 = 40;
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Renders links as white QR symbols whose dark modules are transparent.
///
/// The symbol is its own paste mask: luminance is copied into the alpha
/// channel, so pasting it paints the border and light modules white and
/// lets the base show through the dark modules.
#[derive(Debug, Clone)]
pub struct QrGenerator {
    min_version: i16,
    error_correction: ErrorCorrection,
    box_size: u32,
    border: u32,
}

impl QrGenerator {
    pub fn new(settings: &QrSettings) -> Self {
        Self {
            min_version: settings.version.clamp(1, MAX_VERSION),
            error_correction: settings.error_correction,
            box_size: settings.box_size.max(1),
            border: settings.border,
        }
    }

    /// Encode `content` at the smallest version that holds it, starting from
    /// the configured minimum.
    pub fn encode(&self, content: &str) -> Result<QrCode, CompositionError> {
        let level = EcLevel::from(self.error_correction);

        for version in self.min_version..=MAX_VERSION {
            match QrCode::with_version(content, Version::Normal(version), level) {
                Ok(code) => return Ok(code),
                Err(QrError::DataTooLong) => continue,
                Err(e) => return Err(CompositionError::Qr(e)),
            }
        }

        Err(CompositionError::QrCapacity {
            len: content.len(),
            level: self.error_correction,
        })
    }

    /// Side length is `(modules + 2 * border) * box_size` pixels.
    pub fn generate(&self, content: &str) -> Result<RgbaImage, CompositionError> {
        let code = self.encode(content)?;

        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(self.box_size, self.box_size)
            .build();
        let symbol = DynamicImage::ImageLuma8(symbol).to_rgba8();

        let margin = self.border * self.box_size;
        let mut canvas = RgbaImage::from_pixel(
            symbol.width() + 2 * margin,
            symbol.height() + 2 * margin,
            LIGHT,
        );
        paste(&mut canvas, &symbol, margin as i64, margin as i64);

        for pixel in canvas.pixels_mut() {
            pixel.0[3] = pixel.0[0];
        }

        tracing::debug!(
            version = ?code.version(),
            modules = code.width(),
            size = canvas.width(),
            "QR code rendered"
        );

        Ok(canvas)
    }
}

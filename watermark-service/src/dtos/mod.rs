use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct WatermarkRequest {
    /// Base64-encoded image (PNG or any other decodable format).
    #[validate(length(min = 1, message = "image cannot be empty"))]
    pub image: String,
    /// Text encoded into the QR code, usually a URL.
    #[validate(length(min = 1, message = "link cannot be empty"))]
    pub link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WatermarkResponse {
    /// Base64-encoded PNG of the composite.
    pub image: String,
}

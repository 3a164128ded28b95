use super::error::CompositionError;
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat};
use std::io::Cursor;

/// Decode a base64 payload into an image of any format the `image` crate
/// recognises. Embedded whitespace (line-wrapped base64) is ignored.
pub fn decode_base64_image(encoded: &str) -> Result<DynamicImage, CompositionError> {
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let bytes = general_purpose::STANDARD.decode(&compact)?;

    image::load_from_memory(&bytes).map_err(CompositionError::Decode)
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CompositionError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(CompositionError::Encode)?;
    Ok(buffer.into_inner())
}

pub fn encode_png_base64(image: &DynamicImage) -> Result<String, CompositionError> {
    Ok(general_purpose::STANDARD.encode(encode_png(image)?))
}

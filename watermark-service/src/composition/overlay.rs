//! Alpha-masked paste and the two fixed placements built on it.

use super::error::{CompositionError, Layer};
use image::{Rgba, RgbaImage};

/// Paste `layer` onto `base` with its top-left corner at `(x, y)`, using the
/// layer's own alpha channel as the mask.
///
/// Every channel, alpha included, is interpolated by mask value, so alpha 0
/// leaves the base pixel untouched and alpha 255 replaces it. Parts of the layer that
/// fall outside `base` (including negative offsets) are clipped.
pub fn paste(base: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    let (base_width, base_height) = (base.width() as i64, base.height() as i64);

    let src_x0 = (-x).max(0);
    let src_y0 = (-y).max(0);
    let src_x1 = (layer.width() as i64).min(base_width - x);
    let src_y1 = (layer.height() as i64).min(base_height - y);

    if src_x0 >= src_x1 || src_y0 >= src_y1 {
        return;
    }

    for src_y in src_y0..src_y1 {
        for src_x in src_x0..src_x1 {
            let src = *layer.get_pixel(src_x as u32, src_y as u32);
            let dst = base.get_pixel_mut((src_x + x) as u32, (src_y + y) as u32);
            *dst = blend(*dst, src);
        }
    }
}

fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let alpha = src.0[3] as u32;
    match alpha {
        0 => dst,
        255 => src,
        _ => {
            let inverse = 255 - alpha;
            let mix = |s: u8, d: u8| ((s as u32 * alpha + d as u32 * inverse + 127) / 255) as u8;
            Rgba([
                mix(src.0[0], dst.0[0]),
                mix(src.0[1], dst.0[1]),
                mix(src.0[2], dst.0[2]),
                mix(src.0[3], dst.0[3]),
            ])
        }
    }
}

fn ensure_fits(layer: Layer, base: &RgbaImage, overlay: &RgbaImage) -> Result<(), CompositionError> {
    if overlay.width() > base.width() || overlay.height() > base.height() {
        return Err(CompositionError::OverlayTooLarge {
            layer,
            overlay_width: overlay.width(),
            overlay_height: overlay.height(),
            base_width: base.width(),
            base_height: base.height(),
        });
    }
    Ok(())
}

/// Paste the logo at the top-left corner.
pub fn overlay_logo(mut base: RgbaImage, logo: &RgbaImage) -> Result<RgbaImage, CompositionError> {
    ensure_fits(Layer::Logo, &base, logo)?;
    paste(&mut base, logo, 0, 0);
    Ok(base)
}

/// Paste the QR code flush against the bottom-right corner.
pub fn overlay_qr(mut base: RgbaImage, qr: &RgbaImage) -> Result<RgbaImage, CompositionError> {
    ensure_fits(Layer::Qr, &base, qr)?;
    let (x, y) = qr_offset(&base, qr);
    paste(&mut base, qr, x as i64, y as i64);
    Ok(base)
}

/// Right/bottom edge of the base minus the right/bottom edge of the QR.
/// Callers check that the QR fits first.
pub fn qr_offset(base: &RgbaImage, qr: &RgbaImage) -> (u32, u32) {
    (base.width() - qr.width(), base.height() - qr.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    #[test]
    fn opaque_logo_covers_top_left_only() {
        let base = RgbaImage::from_pixel(500, 500, RED);
        let logo = RgbaImage::from_pixel(100, 100, BLUE);

        let composite = overlay_logo(base, &logo).unwrap();

        assert_eq!(*composite.get_pixel(50, 50), BLUE);
        assert_eq!(*composite.get_pixel(0, 0), BLUE);
        assert_eq!(*composite.get_pixel(99, 99), BLUE);
        assert_eq!(*composite.get_pixel(100, 100), RED);
        assert_eq!(*composite.get_pixel(250, 250), RED);
    }

    #[test]
    fn transparent_logo_pixels_keep_base() {
        let base = RgbaImage::from_pixel(200, 200, RED);
        let logo = RgbaImage::from_fn(100, 100, |x, _| if x < 50 { BLUE } else { CLEAR });

        let composite = overlay_logo(base, &logo).unwrap();

        assert_eq!(*composite.get_pixel(10, 10), BLUE);
        assert_eq!(*composite.get_pixel(75, 10), RED);
        assert_eq!(*composite.get_pixel(99, 99), RED);
    }

    #[test]
    fn half_transparent_pixel_interpolates() {
        let mut base = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let layer = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));

        paste(&mut base, &layer, 0, 0);

        let pixel = base.get_pixel(0, 0);
        assert_eq!(pixel.0[0], 128);
        // (128 * 128 + 255 * 127) / 255, rounded
        assert_eq!(pixel.0[3], 191);
    }

    #[test]
    fn alpha_channel_interpolates_on_translucent_base() {
        let mut base = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 100]));
        let layer = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));

        paste(&mut base, &layer, 0, 0);

        assert_eq!(*base.get_pixel(0, 0), Rgba([128, 128, 128, 114]));
    }

    #[test]
    fn extreme_mask_values_keep_or_replace_translucent_base() {
        let mut base = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 40]));
        let layer = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([200, 200, 200, 0])
            } else {
                Rgba([200, 200, 200, 255])
            }
        });

        paste(&mut base, &layer, 0, 0);

        assert_eq!(*base.get_pixel(0, 0), Rgba([10, 20, 30, 40]));
        assert_eq!(*base.get_pixel(1, 0), Rgba([200, 200, 200, 255]));
    }

    #[test]
    fn qr_lands_in_bottom_right_corner() {
        let base = RgbaImage::from_pixel(300, 200, RED);
        let qr = RgbaImage::from_pixel(40, 30, GREEN);

        assert_eq!(qr_offset(&base, &qr), (260, 170));

        let composite = overlay_qr(base, &qr).unwrap();

        assert_eq!(*composite.get_pixel(260, 170), GREEN);
        assert_eq!(*composite.get_pixel(299, 199), GREEN);
        assert_eq!(*composite.get_pixel(259, 170), RED);
        assert_eq!(*composite.get_pixel(260, 169), RED);
    }

    #[test]
    fn qr_matching_base_size_covers_everything() {
        let base = RgbaImage::from_pixel(50, 50, RED);
        let qr = RgbaImage::from_pixel(50, 50, GREEN);

        let composite = overlay_qr(base, &qr).unwrap();

        assert!(composite.pixels().all(|p| *p == GREEN));
    }

    #[test]
    fn oversized_qr_is_rejected() {
        let base = RgbaImage::from_pixel(100, 100, RED);
        let qr = RgbaImage::from_pixel(101, 50, GREEN);

        let err = overlay_qr(base, &qr).unwrap_err();

        match err {
            CompositionError::OverlayTooLarge {
                layer,
                overlay_width,
                base_width,
                ..
            } => {
                assert_eq!(layer, Layer::Qr);
                assert_eq!(overlay_width, 101);
                assert_eq!(base_width, 100);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn oversized_logo_is_rejected() {
        let base = RgbaImage::from_pixel(100, 100, RED);
        let logo = RgbaImage::from_pixel(50, 120, BLUE);

        let err = overlay_logo(base, &logo).unwrap_err();

        assert!(matches!(
            err,
            CompositionError::OverlayTooLarge {
                layer: Layer::Logo,
                ..
            }
        ));
    }

    #[test]
    fn paste_clips_negative_offsets() {
        let mut base = RgbaImage::from_pixel(10, 10, RED);
        let layer = RgbaImage::from_pixel(6, 6, GREEN);

        paste(&mut base, &layer, -3, -3);

        assert_eq!(*base.get_pixel(0, 0), GREEN);
        assert_eq!(*base.get_pixel(2, 2), GREEN);
        assert_eq!(*base.get_pixel(3, 3), RED);
    }

    #[test]
    fn paste_fully_outside_is_a_no_op() {
        let mut base = RgbaImage::from_pixel(10, 10, RED);
        let layer = RgbaImage::from_pixel(4, 4, GREEN);

        paste(&mut base, &layer, 20, 0);
        paste(&mut base, &layer, -4, 0);

        assert!(base.pixels().all(|p| *p == RED));
    }
}

//! Straight-alpha pixel operations shared by the glyph and page composers.

use image::{Rgba, RgbaImage};

/// Scale RGB by `alpha / 255`, leaving the alpha channel alone.
///
/// Used both for tint alpha (glyph and border colors) and for the final
/// premultiply pass over a page.
pub fn scale_rgb(image: &mut RgbaImage, alpha: u8) {
    if alpha == u8::MAX {
        return;
    }
    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = mul_u8(*channel, alpha);
        }
    }
}

/// Rewrite every pixel as `RGB * A / 255`.
pub fn premultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let a = pixel[3];
        for channel in &mut pixel.0[..3] {
            *channel = mul_u8(*channel, a);
        }
    }
}

/// Alpha-composite `top` over `dst` with its origin at (`x`, `y`), clipped to `dst`.
pub fn blit_over(dst: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, src) in top.enumerate_pixels() {
        let (dx, dy) = (x + sx, y + sy);
        if dx >= dst.width() || dy >= dst.height() {
            continue;
        }
        let under = dst.get_pixel(dx, dy).0;
        dst.put_pixel(dx, dy, Rgba(composite_pixel(src.0, under)));
    }
}

/// Copy `src` into `dst` verbatim at (`x`, `y`), clipped to `dst`.
pub fn blit_copy(dst: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    image::imageops::replace(dst, src, i64::from(x), i64::from(y));
}

/// Subtract the alpha of `mask` (placed at `x`, `y`) from `dst`'s alpha, saturating at zero.
pub fn subtract_alpha(dst: &mut RgbaImage, mask: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, m) in mask.enumerate_pixels() {
        let (dx, dy) = (x + sx, y + sy);
        if dx >= dst.width() || dy >= dst.height() {
            continue;
        }
        let px = dst.get_pixel_mut(dx, dy);
        px[3] = px[3].saturating_sub(m[3]);
    }
}

pub fn composite_pixel(top: [u8; 4], bottom: [u8; 4]) -> [u8; 4] {
    let ta = top[3] as f32 / 255.0;
    let ba = bottom[3] as f32 / 255.0;

    if ta == 0.0 {
        return bottom;
    }
    if ta == 1.0 {
        return top;
    }

    let out_a = ta + ba * (1.0 - ta);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let tc = top[i] as f32 / 255.0;
        let bc = bottom[i] as f32 / 255.0;
        let premult = tc * ta + bc * ba * (1.0 - ta);
        let value = (premult / out_a).clamp(0.0, 1.0);
        out[i] = (value * 255.0).round() as u8;
    }

    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

fn mul_u8(value: u8, alpha: u8) -> u8 {
    ((u16::from(value) * u16::from(alpha) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    #[test]
    fn premultiply_keeps_opaque_and_zeroes_transparent() {
        let mut img = ImageBuffer::from_fn(3, 1, |x, _| match x {
            0 => Rgba([200, 100, 50, 255]),
            1 => Rgba([200, 100, 50, 0]),
            _ => Rgba([200, 100, 50, 128]),
        });
        premultiply(&mut img);

        assert_eq!(img.get_pixel(0, 0).0, [200, 100, 50, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
        assert_eq!(img.get_pixel(2, 0).0, [100, 50, 25, 128]);
    }

    #[test]
    fn scale_rgb_leaves_alpha_channel() {
        let mut img = ImageBuffer::from_pixel(1, 1, Rgba([255, 255, 255, 77]));
        scale_rgb(&mut img, 128);
        assert_eq!(img.get_pixel(0, 0).0, [128, 128, 128, 77]);
    }

    #[test]
    fn transparent_top_keeps_bottom() {
        assert_eq!(composite_pixel([9, 9, 9, 0], [1, 2, 3, 4]), [1, 2, 3, 4]);
    }

    #[test]
    fn opaque_top_replaces_bottom() {
        assert_eq!(composite_pixel([9, 8, 7, 255], [1, 2, 3, 4]), [9, 8, 7, 255]);
    }

    #[test]
    fn half_alpha_over_opaque_mixes() {
        let out = composite_pixel([255, 0, 0, 128], [0, 0, 255, 255]);
        assert_eq!(out[3], 255);
        assert!((127..=129).contains(&out[0]));
        assert!((126..=128).contains(&out[2]));
    }

    #[test]
    fn blit_over_clips_to_destination() {
        let mut dst = ImageBuffer::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let top = ImageBuffer::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        blit_over(&mut dst, &top, 1, 1);

        assert_eq!(dst.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(dst.get_pixel(1, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn subtract_alpha_saturates() {
        let mut dst = ImageBuffer::from_pixel(2, 1, Rgba([10, 20, 30, 100]));
        let mask = ImageBuffer::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        subtract_alpha(&mut dst, &mask, 1, 0);

        assert_eq!(dst.get_pixel(0, 0).0, [10, 20, 30, 100]);
        assert_eq!(dst.get_pixel(1, 0).0, [10, 20, 30, 0]);
    }
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! RGB image to YUV channel planes and back.
//!
//! BT.601 full-range conversion. The luma plane is shifted by -128 so it is
//! centered like the chroma planes, which keeps DCT coefficients small.
//! Planes are padded to even dimensions with zeros so a one-level wavelet
//! decomposition never sees an odd axis; the padding is dropped again on the
//! way back to pixels.

use image::RgbImage;

use crate::wavelet::SubRegion;

/// The Y, U, V planes of one image plus the unpadded pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPlanes {
    pub y: SubRegion,
    pub u: SubRegion,
    pub v: SubRegion,
    pub image_width: u32,
    pub image_height: u32,
}

fn rgb_to_yuv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let u = -0.169 * r - 0.331 * g + 0.500 * b + 128.0;
    let v = 0.500 * r - 0.419 * g - 0.081 * b + 128.0;
    (y, u, v)
}

fn yuv_to_rgb(y: f64, u: f64, v: f64) -> (f64, f64, f64) {
    let u = u - 128.0;
    let v = v - 128.0;
    let r = y + 1.402 * v;
    let g = y - 0.344 * u - 0.714 * v;
    let b = y + 1.772 * u;
    (r, g, b)
}

/// Split `img` into centered YUV planes, zero padded to even dimensions.
pub fn image_to_planes(img: &RgbImage) -> ChannelPlanes {
    let (image_width, image_height) = img.dimensions();
    let width = image_width as usize + (image_width as usize & 1);
    let height = image_height as usize + (image_height as usize & 1);

    let mut y_plane = SubRegion::new(width, height);
    let mut u_plane = SubRegion::new(width, height);
    let mut v_plane = SubRegion::new(width, height);

    for (px_x, px_y, px) in img.enumerate_pixels() {
        let (y, u, v) = rgb_to_yuv(px[0] as f64, px[1] as f64, px[2] as f64);
        y_plane.set(px_x as usize, px_y as usize, y - 128.0);
        u_plane.set(px_x as usize, px_y as usize, u);
        v_plane.set(px_x as usize, px_y as usize, v);
    }

    ChannelPlanes { y: y_plane, u: u_plane, v: v_plane, image_width, image_height }
}

/// Rebuild an RGB image from (possibly oversized) planes, undoing the luma
/// shift and clamping each channel to [0, 255].
pub fn planes_to_image(
    y_plane: &SubRegion,
    u_plane: &SubRegion,
    v_plane: &SubRegion,
    image_width: u32,
    image_height: u32,
) -> RgbImage {
    let mut img = RgbImage::new(image_width, image_height);
    for (px_x, px_y, px) in img.enumerate_pixels_mut() {
        let x = px_x as usize;
        let y = px_y as usize;
        let (r, g, b) = yuv_to_rgb(
            y_plane.get(x, y) + 128.0,
            u_plane.get(x, y),
            v_plane.get(x, y),
        );
        *px = image::Rgb([
            r.round().clamp(0.0, 255.0) as u8,
            g.round().clamp(0.0, 255.0) as u8,
            b.round().clamp(0.0, 255.0) as u8,
        ]);
    }
    img
}

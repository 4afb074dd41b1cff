//! Turns a decoded image into the fixed-shape tensor a model variant expects.
//!
//! Both variants collapse the image to grayscale, resize it to 32x32 and
//! scale intensities into `[0, 1]`. The single-channel variant yields a
//! `(1, 32, 32, 1)` NHWC tensor; the replicated-channel variant copies the
//! gray value into three channels, yielding `(1, 32, 32, 3)`.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use ndarray::Array4;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 32;

// BT.601 luma weights in 14-bit fixed point, as used by OpenCV's RGB2GRAY.
const LUMA_SHIFT: u32 = 14;
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;

/// Collapses an image to one luma channel.
///
/// Color images use the BT.601 weighting (`0.299 R + 0.587 G + 0.114 B`)
/// rounded to nearest. Images without color are taken as-is.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if !image.color().has_color() {
        return image.to_luma8();
    }

    let rgb = image.to_rgb8();
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0.map(u32::from);
        let luma = (r * LUMA_R + g * LUMA_G + b * LUMA_B + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT;
        gray.put_pixel(x, y, Luma([luma.min(255) as u8]));
    }
    gray
}

fn grayscale_input(image: &DynamicImage) -> GrayImage {
    let gray = to_grayscale(image);
    imageops::resize(&gray, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
}

/// Preprocessing for the custom CNN: `(1, 32, 32, 1)`.
pub fn single_channel(image: &DynamicImage) -> Array4<f32> {
    fill_channels(&grayscale_input(image), 1)
}

/// Preprocessing for the pretrained backbones: `(1, 32, 32, 3)`.
pub fn replicated_channel(image: &DynamicImage) -> Array4<f32> {
    fill_channels(&grayscale_input(image), 3)
}

fn fill_channels(gray: &GrayImage, channels: usize) -> Array4<f32> {
    let side = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, channels));

    for (x, y, pixel) in gray.enumerate_pixels() {
        let value = pixel[0] as f32 / 255.0;
        for c in 0..channels {
            tensor[[0, y as usize, x as usize, c]] = value;
        }
    }

    tensor
}

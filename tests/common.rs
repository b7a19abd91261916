#![allow(dead_code)]

use morphology_rs::image::Image;

/// Builds a single-channel `width x height` image from row-major byte data
pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Image<u8> {
    Image::from_vec(width, height, 1, false, data)
}

/// Builds a `size x size` single-channel image that is `bg` everywhere except a single `fg`
/// pixel at the centre
pub fn centre_dot(size: u32, bg: u8, fg: u8) -> Image<u8> {
    let mut data = vec![bg; (size * size) as usize];
    let centre = (size / 2 * size + size / 2) as usize;
    data[centre] = fg;
    gray(size, size, data)
}

/// Builds a `width x height` single-channel image with a horizontal line of `fg` pixels at `row`
pub fn horizontal_line(width: u32, height: u32, row: u32, bg: u8, fg: u8) -> Image<u8> {
    let mut data = vec![bg; (width * height) as usize];
    for x in 0..width {
        data[(row * width + x) as usize] = fg;
    }
    gray(width, height, data)
}

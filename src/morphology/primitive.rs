//! The pixel aggregator (C5): one row-parallel sweep of a single kernel over an image,
//! reducing each neighbourhood to an output pixel under one [`Primitive`].

use crate::enums::{ChannelMask, Primitive};
use crate::image::{BaseImage, Image};
use crate::kernel::{Cell, Kernel};
use crate::util::{clamp_channel, EPSILON};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// A single non-masked kernel cell paired with the neighbourhood pixel it aligns with
struct Tap<'a> {
    weight: f64,
    pixel: &'a [u8],
}

/// Returns the weighted, non-masked taps of `kernel` over the neighbourhood of `(x, y)`, walked
/// in the direction `primitive` requires (see [`Primitive::is_reflected_walk`])
fn taps<'a>(image: &'a Image<u8>, kernel: &Kernel, x: u32, y: u32, primitive: Primitive) -> Vec<Tap<'a>> {
    let (origin_x, origin_y) = if primitive.is_reflected_walk() {
        (kernel.width - 1 - kernel.x, kernel.height - 1 - kernel.y)
    } else {
        (kernel.x, kernel.y)
    };

    let neighborhood = image.get_neighborhood_for_kernel(
        x, y, kernel.width, kernel.height, origin_x, origin_y);

    let mut out = Vec::with_capacity((kernel.width * kernel.height) as usize);
    for v in 0..kernel.height {
        for u in 0..kernel.width {
            let cell = if primitive.is_reflected_walk() {
                kernel.cell(kernel.width - 1 - u, kernel.height - 1 - v)
            } else {
                kernel.cell(u, v)
            };

            if let Cell::Finite(weight) = cell {
                out.push(Tap { weight, pixel: neighborhood.data()[(v * kernel.width + u) as usize] });
            }
        }
    }
    out
}

/// A fixed weighted sum of the RGB channels, used by the `*Intensity` primitives to rank
/// neighbourhood pixels by brightness. Channels beyond the first three (opacity, auxiliary) do
/// not contribute.
fn intensity(pixel: &[u8]) -> f64 {
    const WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];
    pixel.iter().take(3).zip(WEIGHTS.iter())
        .map(|(&c, w)| c as f64 * w)
        .sum()
}

/// The channel values a reduction wants to write, and whether they differ from the input pixel
struct Reduction {
    channels: Vec<f64>,
    changed: bool,
}

fn reduce(image: &Image<u8>, kernel: &Kernel, x: u32, y: u32, primitive: Primitive,
          mask: ChannelMask, bias: f64) -> Reduction {
    if matches!(primitive, Primitive::ErodeIntensity | Primitive::DilateIntensity) {
        return select_by_intensity(image, kernel, x, y, primitive == Primitive::ErodeIntensity);
    }

    let input = image.get_pixel(x, y);
    let channels = input.len();

    let result: Vec<f64> = match primitive {
        Primitive::Convolve | Primitive::Correlate => convolve(image, kernel, x, y, mask, bias),
        Primitive::Erode => min_max(image, kernel, x, y, primitive, channels, f64::min, f64::INFINITY),
        Primitive::Dilate => min_max(image, kernel, x, y, primitive, channels, f64::max, f64::NEG_INFINITY),
        Primitive::HitAndMiss => hit_and_miss(image, kernel, x, y, channels),
        Primitive::Thin => {
            let hm = hit_and_miss(image, kernel, x, y, channels);
            input.iter().zip(hm.iter()).map(|(&i, &h)| i as f64 - h).collect()
        }
        Primitive::Thicken => {
            let hm = hit_and_miss(image, kernel, x, y, channels);
            input.iter().zip(hm.iter()).map(|(&i, &h)| (i as f64).max(h)).collect()
        }
        Primitive::Distance => distance(image, kernel, x, y, channels),
        Primitive::ErodeIntensity | Primitive::DilateIntensity => unreachable!(),
    };

    let changed = result.iter().zip(input.iter())
        .any(|(&r, &i)| clamp_channel(r).round() as u8 != i);

    Reduction { channels: result, changed }
}

fn convolve(image: &Image<u8>, kernel: &Kernel, x: u32, y: u32, mask: ChannelMask, bias: f64) -> Vec<f64> {
    let input = image.get_pixel(x, y);
    let n = input.len();
    let has_alpha = image.info().alpha;
    let sync = has_alpha && mask.contains(ChannelMask::SYNC);
    let color_channels = if has_alpha { n - 1 } else { n };

    let mut sums = vec![bias; color_channels];
    let mut alpha_sum = 0.0;
    let mut alpha_weight_sum = 0.0;

    for tap in taps(image, kernel, x, y, Primitive::Convolve) {
        let alpha_component = if has_alpha { tap.pixel[n - 1] as f64 } else { 1.0 };
        let weight = if sync { tap.weight * alpha_component } else { tap.weight };

        for c in 0..color_channels {
            sums[c] += weight * tap.pixel[c] as f64;
        }
        if has_alpha {
            alpha_sum += tap.weight * alpha_component;
        }
        alpha_weight_sum += weight;
    }

    if sync && alpha_weight_sum.abs() > EPSILON {
        for sum in sums.iter_mut() {
            *sum /= alpha_weight_sum;
        }
    }

    if has_alpha {
        sums.push(bias + alpha_sum);
    }
    sums
}

fn min_max(image: &Image<u8>, kernel: &Kernel, x: u32, y: u32, primitive: Primitive,
           channels: usize, combine: fn(f64, f64) -> f64, identity: f64) -> Vec<f64> {
    let mut out = vec![identity; channels];
    let mut touched = vec![false; channels];

    for tap in taps(image, kernel, x, y, primitive) {
        if tap.weight < 0.5 {
            continue;
        }
        for c in 0..channels {
            out[c] = combine(out[c], tap.pixel[c] as f64);
            touched[c] = true;
        }
    }

    let input = image.get_pixel(x, y);
    for c in 0..channels {
        if !touched[c] {
            out[c] = input[c] as f64;
        }
    }
    out
}

fn hit_and_miss(image: &Image<u8>, kernel: &Kernel, x: u32, y: u32, channels: usize) -> Vec<f64> {
    let mut fmin = vec![f64::INFINITY; channels];
    let mut bmax = vec![f64::NEG_INFINITY; channels];
    let mut has_fg = false;
    let mut has_bg = false;

    for tap in taps(image, kernel, x, y, Primitive::HitAndMiss) {
        if tap.weight > 0.7 {
            has_fg = true;
            for c in 0..channels {
                fmin[c] = fmin[c].min(tap.pixel[c] as f64);
            }
        } else if tap.weight < 0.3 {
            has_bg = true;
            for c in 0..channels {
                bmax[c] = bmax[c].max(tap.pixel[c] as f64);
            }
        }
    }

    (0..channels).map(|c| {
        let f = if has_fg { fmin[c] } else { 0.0 };
        let b = if has_bg { bmax[c] } else { 0.0 };
        (f - b).max(0.0)
    }).collect()
}

fn select_by_intensity(image: &Image<u8>, kernel: &Kernel, x: u32, y: u32, least: bool) -> Reduction {
    let input = image.get_pixel(x, y);
    let primitive = if least { Primitive::ErodeIntensity } else { Primitive::DilateIntensity };

    let mut best: Option<(f64, &[u8])> = None;
    for tap in taps(image, kernel, x, y, primitive) {
        if tap.weight < 0.5 {
            continue;
        }
        let score = intensity(tap.pixel);
        let is_better = match best {
            None => true,
            Some((b, _)) => if least { score < b } else { score > b },
        };
        if is_better {
            best = Some((score, tap.pixel));
        }
    }

    let selected = best.map(|(_, p)| p).unwrap_or(input);
    let channels: Vec<f64> = selected.iter().map(|&c| c as f64).collect();
    let changed = selected != input;
    Reduction { channels, changed }
}

fn distance(image: &Image<u8>, kernel: &Kernel, x: u32, y: u32, channels: usize) -> Vec<f64> {
    let mut out = vec![f64::INFINITY; channels];

    for tap in taps(image, kernel, x, y, Primitive::Distance) {
        for c in 0..channels {
            out[c] = out[c].min(tap.weight + tap.pixel[c] as f64);
        }
    }

    out
}

/// Applies `primitive` with `kernel` over `image`, writing results gated by `mask` and clamped
/// to `[0, QMAX]`, except for the `*Intensity` primitives which overwrite the whole pixel
/// unconditionally. Returns the new image and the count of pixels whose output differs from the
/// input.
pub fn apply(image: &Image<u8>, kernel: &Kernel, primitive: Primitive, mask: ChannelMask,
             bias: f64) -> (Image<u8>, u32) {
    let (width, height, channels, alpha) = image.info().whca();
    let is_intensity = matches!(primitive, Primitive::ErodeIntensity | Primitive::DilateIntensity);

    let sweep = |y: u32| -> (Vec<u8>, u32) {
        let mut row = Vec::with_capacity((width * channels as u32) as usize);
        let mut row_changed = 0u32;

        for x in 0..width {
            let reduction = reduce(image, kernel, x, y, primitive, mask, bias);
            let input = image.get_pixel(x, y);

            if reduction.changed {
                row_changed += 1;
            }

            if is_intensity {
                for &v in &reduction.channels {
                    row.push(v.round().clamp(0.0, 255.0) as u8);
                }
            } else {
                for (c, &v) in reduction.channels.iter().enumerate() {
                    if channel_is_masked(mask, c, channels, alpha) {
                        row.push(input[c]);
                    } else {
                        row.push(clamp_channel(v).round() as u8);
                    }
                }
            }
        }

        (row, row_changed)
    };

    #[cfg(feature = "rayon")]
    let rows: Vec<(Vec<u8>, u32)> = (0..height).into_par_iter().map(sweep).collect();

    #[cfg(not(feature = "rayon"))]
    let rows: Vec<(Vec<u8>, u32)> = (0..height).map(sweep).collect();

    let mut data = Vec::with_capacity((width * height * channels as u32) as usize);
    let mut changed = 0u32;
    for (row, row_changed) in rows {
        data.extend(row);
        changed += row_changed;
    }

    (Image::from_vec(width, height, channels, alpha, data), changed)
}

fn channel_is_masked(mask: ChannelMask, index: usize, channels: u8, alpha: bool) -> bool {
    let flag = match index {
        0 => ChannelMask::RED,
        1 => ChannelMask::GREEN,
        2 => ChannelMask::BLUE,
        i if alpha && i as u8 == channels - 1 => ChannelMask::OPACITY,
        _ => ChannelMask::AUXILIARY,
    };
    !mask.contains(flag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelFamily;

    fn flat3(values: [f64; 9]) -> Kernel {
        let cells = values.iter().map(|&v| Cell::Finite(v)).collect();
        Kernel::new(3, 3, 1, 1, cells, KernelFamily::UserDefined).unwrap()
    }

    fn gray_image() -> Image<u8> {
        Image::from_vec(3, 3, 1, false, vec![10, 20, 30, 40, 50, 60, 70, 80, 90])
    }

    #[test]
    fn erode_takes_neighbourhood_minimum() {
        let img = gray_image();
        let kernel = flat3([1.0; 9]);
        let (out, _) = apply(&img, &kernel, Primitive::Erode, ChannelMask::all(1, false), 0.0);
        assert_eq!(out.get_pixel(1, 1)[0], 10);
    }

    #[test]
    fn dilate_takes_neighbourhood_maximum() {
        let img = gray_image();
        let kernel = flat3([1.0; 9]);
        let (out, _) = apply(&img, &kernel, Primitive::Dilate, ChannelMask::all(1, false), 0.0);
        assert_eq!(out.get_pixel(1, 1)[0], 90);
    }

    #[test]
    fn erode_reports_changed_count() {
        let img = gray_image();
        let kernel = flat3([1.0; 9]);
        let (_, changed) = apply(&img, &kernel, Primitive::Erode, ChannelMask::all(1, false), 0.0);
        assert!(changed > 0);
    }

    #[test]
    fn convolve_applies_bias() {
        let img = Image::from_vec(1, 1, 1, false, vec![10u8]);
        let kernel = Kernel::new(1, 1, 0, 0, vec![Cell::Finite(1.0)], KernelFamily::Unity).unwrap();
        let (out, _) = apply(&img, &kernel, Primitive::Convolve, ChannelMask::all(1, false), 5.0);
        assert_eq!(out.get_pixel(0, 0)[0], 15);
    }

    #[test]
    fn channel_mask_preserves_unwritten_channels() {
        let img = Image::from_vec(1, 1, 2, false, vec![10u8, 20u8]);
        let kernel = Kernel::new(1, 1, 0, 0, vec![Cell::Finite(1.0)], KernelFamily::Unity).unwrap();
        let (out, _) = apply(&img, &kernel, Primitive::Dilate, ChannelMask::RED, 0.0);
        assert_eq!(out.get_pixel(0, 0), &[10, 20]);
    }

    #[test]
    fn erode_intensity_copies_darkest_whole_pixel() {
        let img = Image::from_vec(3, 1, 3, false,
            vec![200, 10, 10, 10, 200, 10, 10, 10, 200]);
        let kernel = Kernel::new(3, 1, 1, 0,
            vec![Cell::Finite(1.0), Cell::Finite(1.0), Cell::Finite(1.0)],
            KernelFamily::UserDefined).unwrap();
        let (out, _) = apply(&img, &kernel, Primitive::ErodeIntensity, ChannelMask::all(3, false), 0.0);
        assert_eq!(out.get_pixel(1, 0), &[10, 200, 10]);
    }
}

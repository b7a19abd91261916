//! The method orchestrator (C6): expands one user-visible [`Method`] into a sequence of
//! [`Primitive`] applications over a kernel list, managing iteration, compose-folding, and the
//! reflected-kernel clone that some compound methods need.

use crate::enums::{ChannelMask, Compose, Method, Primitive};
use crate::image::{BaseImage, Image};
use crate::kernel::{transform, Kernel};
use crate::morphology::primitive;

/// One step of a compound method's stage sequence: which primitive to run, and whether it runs
/// against the 180-degree-rotated clone of the kernel rather than the kernel itself
#[derive(Clone, Copy)]
struct Stage {
    primitive: Primitive,
    reflected: bool,
}

const fn stage(primitive: Primitive, reflected: bool) -> Stage {
    Stage { primitive, reflected }
}

/// Whether a method's stages feed one into the next (`Cascade`), or are each evaluated
/// independently against the same input and then combined (`Parallel`, `Edge`'s "dilate minus
/// erode")
#[derive(Clone, Copy, PartialEq, Eq)]
enum StageMode {
    Cascade,
    Parallel,
}

/// What happens to a method's stage output before it becomes the method's result
#[derive(Clone, Copy, PartialEq, Eq)]
enum PostStep {
    None,
    DiffOriginal,
    DiffStages,
}

struct MethodConfig {
    stages: &'static [Stage],
    mode: StageMode,
    post: PostStep,
    default_compose: Compose,
    /// `true`: the primitive loop (innermost) repeats up to the resolved iteration count.
    /// `false`: it runs exactly once (`kernel_limit = 1`), e.g. `HitAndMiss`.
    kernel_limit_is_iterations: bool,
    /// `true`: the method loop (outermost) repeats up to the resolved iteration count, as
    /// `Thin`/`Thicken` do. `false`: the method runs exactly once.
    method_limit_is_iterations: bool,
}

impl MethodConfig {
    fn needs_reflected_kernel(&self) -> bool {
        self.stages.iter().any(|s| s.reflected)
    }
}

use Primitive::*;

fn config_for(method: Method) -> MethodConfig {
    match method {
        Method::Convolve => MethodConfig {
            stages: &[stage(Convolve, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::Correlate => MethodConfig {
            stages: &[stage(Convolve, true)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::Erode => MethodConfig {
            stages: &[stage(Erode, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::Dilate => MethodConfig {
            stages: &[stage(Dilate, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::ErodeIntensity => MethodConfig {
            stages: &[stage(ErodeIntensity, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::DilateIntensity => MethodConfig {
            stages: &[stage(DilateIntensity, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::Open => MethodConfig {
            stages: &[stage(Erode, false), stage(Dilate, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::Close => MethodConfig {
            stages: &[stage(Dilate, true), stage(Erode, true)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        // Stops cleanly after the intensity stages; see the "OpenIntensity falls through into
        // Close" source oddity noted for this method.
        Method::OpenIntensity => MethodConfig {
            stages: &[stage(ErodeIntensity, false), stage(DilateIntensity, false)], mode: StageMode::Cascade,
            post: PostStep::None, default_compose: Compose::None, kernel_limit_is_iterations: true,
            method_limit_is_iterations: false,
        },
        Method::CloseIntensity => MethodConfig {
            stages: &[stage(DilateIntensity, true), stage(ErodeIntensity, true)], mode: StageMode::Cascade,
            post: PostStep::None, default_compose: Compose::None, kernel_limit_is_iterations: true,
            method_limit_is_iterations: false,
        },
        Method::TopHat => MethodConfig {
            stages: &[stage(Erode, false), stage(Dilate, false)], mode: StageMode::Cascade,
            post: PostStep::DiffOriginal, default_compose: Compose::None, kernel_limit_is_iterations: true,
            method_limit_is_iterations: false,
        },
        Method::BottomHat => MethodConfig {
            stages: &[stage(Dilate, true), stage(Erode, true)], mode: StageMode::Cascade,
            post: PostStep::DiffOriginal, default_compose: Compose::None, kernel_limit_is_iterations: true,
            method_limit_is_iterations: false,
        },
        Method::EdgeIn => MethodConfig {
            stages: &[stage(Erode, false)], mode: StageMode::Cascade, post: PostStep::DiffOriginal,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::EdgeOut => MethodConfig {
            stages: &[stage(Dilate, false)], mode: StageMode::Cascade, post: PostStep::DiffOriginal,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::Edge => MethodConfig {
            stages: &[stage(Dilate, false), stage(Erode, false)], mode: StageMode::Parallel,
            post: PostStep::DiffStages, default_compose: Compose::None, kernel_limit_is_iterations: true,
            method_limit_is_iterations: false,
        },
        Method::Smooth => MethodConfig {
            stages: &[stage(Erode, false), stage(Dilate, false), stage(Dilate, true), stage(Erode, true)],
            mode: StageMode::Cascade, post: PostStep::None, default_compose: Compose::None,
            kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
        Method::HitAndMiss => MethodConfig {
            stages: &[stage(HitAndMiss, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::Lighten, kernel_limit_is_iterations: false, method_limit_is_iterations: false,
        },
        Method::Thin => MethodConfig {
            stages: &[stage(Thin, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: false, method_limit_is_iterations: true,
        },
        Method::Thicken => MethodConfig {
            stages: &[stage(Thicken, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: false, method_limit_is_iterations: true,
        },
        Method::Distance => MethodConfig {
            stages: &[stage(Distance, false)], mode: StageMode::Cascade, post: PostStep::None,
            default_compose: Compose::None, kernel_limit_is_iterations: true, method_limit_is_iterations: false,
        },
    }
}

/// Applies `method` to `image` using `kernel_list`, iterating it `iterations` times (negative:
/// bounded by `max(rows, cols)`; zero: no-op). `compose` overrides the method's default
/// multi-kernel fold operator. Returns `None` when `iterations == 0`, mirroring the "zero
/// iterations returns null" boundary behaviour; every other failure mode (bad kernel, I/O) is
/// surfaced earlier, at kernel construction or image load.
pub fn apply(image: &Image<u8>, mask: ChannelMask, method: Method, iterations: i64,
             kernel_list: &Kernel, compose: Option<Compose>, bias: f64) -> Option<Image<u8>> {
    if iterations == 0 {
        return None;
    }

    let config = config_for(method);
    let (width, height) = image.info().wh();
    let resolved = if iterations < 0 { width.max(height) as i64 } else { iterations };

    let kernel_limit = if config.kernel_limit_is_iterations { resolved.max(1) as u32 } else { 1 };
    let method_limit = if config.method_limit_is_iterations { resolved.max(1) as u32 } else { 1 };
    let compose_op = compose.unwrap_or(config.default_compose);

    let reflected_head = if config.needs_reflected_kernel() {
        Some(transform::rotate(kernel_list, 180.0).expect("180 degree rotation is always supported"))
    } else {
        None
    };

    let mut current = image.clone();
    for _ in 0..method_limit {
        let (next, changed) = run_method_iteration(
            &current, image, &config, kernel_list, reflected_head.as_ref(), mask, compose_op, kernel_limit, bias);
        current = next;
        if changed == 0 {
            break;
        }
    }

    Some(current)
}

fn run_method_iteration(current: &Image<u8>, original: &Image<u8>, config: &MethodConfig,
                         kernel_list: &Kernel, reflected_head: Option<&Kernel>, mask: ChannelMask,
                         compose_op: Compose, kernel_limit: u32, bias: f64) -> (Image<u8>, u32) {
    let reflected_list: Vec<&Kernel> = match reflected_head {
        Some(head) => head.iter_list().collect(),
        None => Vec::new(),
    };
    let kernels: Vec<&Kernel> = kernel_list.iter_list().collect();

    if matches!(compose_op, Compose::None) {
        let mut img = current.clone();
        let mut changed = 0;
        for (i, kernel) in kernels.iter().enumerate() {
            let reflected = reflected_list.get(i).copied();
            let (out, c) = run_stages(&img, kernel, reflected, config, mask, kernel_limit, bias, original);
            img = out;
            changed = c;
        }
        (img, changed)
    } else {
        let results: Vec<(Image<u8>, u32)> = kernels.iter().enumerate()
            .map(|(i, kernel)| {
                let reflected = reflected_list.get(i).copied();
                run_stages(current, kernel, reflected, config, mask, kernel_limit, bias, original)
            })
            .collect();

        let images: Vec<&Image<u8>> = results.iter().map(|(img, _)| img).collect();
        let folded = fold(&images, compose_op, mask.without_sync());
        let changed = count_changed(&folded, current);
        (folded, changed)
    }
}

#[allow(clippy::too_many_arguments)]
fn run_stages(input: &Image<u8>, kernel: &Kernel, reflected: Option<&Kernel>, config: &MethodConfig,
              mask: ChannelMask, kernel_limit: u32, bias: f64, original: &Image<u8>) -> (Image<u8>, u32) {
    match config.mode {
        StageMode::Cascade => {
            let mut img = input.clone();
            let mut changed = 0;
            for stage in config.stages {
                let k = if stage.reflected { reflected.expect("reflected kernel precomputed") } else { kernel };
                let (out, c) = run_primitive_loop(&img, k, stage.primitive, mask, kernel_limit, bias);
                img = out;
                changed = c;
            }
            if config.post == PostStep::DiffOriginal {
                img = difference(&img, original, mask);
            }
            (img, changed)
        }
        StageMode::Parallel => {
            let stage_results: Vec<Image<u8>> = config.stages.iter().map(|stage| {
                let k = if stage.reflected { reflected.expect("reflected kernel precomputed") } else { kernel };
                run_primitive_loop(input, k, stage.primitive, mask, kernel_limit, bias).0
            }).collect();

            let result = if config.post == PostStep::DiffStages {
                difference(&stage_results[0], &stage_results[1], mask)
            } else {
                stage_results.into_iter().next().expect("method has at least one stage")
            };
            let changed = count_changed(&result, input);
            (result, changed)
        }
    }
}

/// Runs one primitive up to `kernel_limit` times, feeding each pass's output into the next and
/// stopping early when a pass reports no changed pixels
fn run_primitive_loop(input: &Image<u8>, kernel: &Kernel, primitive: Primitive, mask: ChannelMask,
                       kernel_limit: u32, bias: f64) -> (Image<u8>, u32) {
    let mut img = input.clone();
    let mut changed = 0;
    for _ in 0..kernel_limit {
        let (out, c) = primitive::apply(&img, kernel, primitive, mask, bias);
        img = out;
        changed = c;
        if c == 0 {
            break;
        }
    }
    (img, changed)
}

/// Per-channel absolute difference between `a` and `b`, gated by `mask`; channels outside the
/// mask pass through from `a` unchanged
fn difference(a: &Image<u8>, b: &Image<u8>, mask: ChannelMask) -> Image<u8> {
    let (width, height, channels, alpha) = a.info().whca();
    let mut data = Vec::with_capacity((width * height * channels as u32) as usize);

    for y in 0..height {
        for x in 0..width {
            let pa = a.get_pixel(x, y);
            let pb = b.get_pixel(x, y);
            for c in 0..channels as usize {
                if channel_masked_out(mask, c, channels, alpha) {
                    data.push(pa[c]);
                } else {
                    data.push((pa[c] as i16 - pb[c] as i16).unsigned_abs() as u8);
                }
            }
        }
    }

    Image::from_vec(width, height, channels, alpha, data)
}

/// Folds a multi-kernel compose across `images`, combining masked channels with `compose` and
/// passing unmasked channels through from the first image
fn fold(images: &[&Image<u8>], compose: Compose, mask: ChannelMask) -> Image<u8> {
    let first = images[0];
    let (width, height, channels, alpha) = first.info().whca();
    let mut data = Vec::with_capacity((width * height * channels as u32) as usize);

    for y in 0..height {
        for x in 0..width {
            let pixels: Vec<&[u8]> = images.iter().map(|img| img.get_pixel(x, y)).collect();
            for c in 0..channels as usize {
                if channel_masked_out(mask, c, channels, alpha) {
                    data.push(pixels[0][c]);
                    continue;
                }

                let values = pixels.iter().map(|p| p[c]);
                let combined = match compose {
                    Compose::Lighten => values.max().unwrap_or(0),
                    Compose::Darken => values.min().unwrap_or(0),
                    Compose::Add => values.fold(0u16, |acc, v| acc.saturating_add(v as u16)).min(255) as u8,
                    Compose::Difference => values.fold(None, |acc: Option<u8>, v| Some(match acc {
                        None => v,
                        Some(a) => (a as i16 - v as i16).unsigned_abs() as u8,
                    })).unwrap_or(0),
                    Compose::None => pixels[0][c],
                };
                data.push(combined);
            }
        }
    }

    Image::from_vec(width, height, channels, alpha, data)
}

fn channel_masked_out(mask: ChannelMask, index: usize, channels: u8, alpha: bool) -> bool {
    let flag = match index {
        0 => ChannelMask::RED,
        1 => ChannelMask::GREEN,
        2 => ChannelMask::BLUE,
        i if alpha && i as u8 == channels - 1 => ChannelMask::OPACITY,
        _ => ChannelMask::AUXILIARY,
    };
    !mask.contains(flag)
}

fn count_changed(a: &Image<u8>, b: &Image<u8>) -> u32 {
    let (width, height) = a.info().wh();
    let mut changed = 0;
    for y in 0..height {
        for x in 0..width {
            if a.get_pixel(x, y) != b.get_pixel(x, y) {
                changed += 1;
            }
        }
    }
    changed
}

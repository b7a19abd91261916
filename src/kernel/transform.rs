//! Kernel list transforms: rotation, rotation-set expansion, and scale/normalise (C4)

use crate::error::{KernelError, KernelResult};
use crate::kernel::{Cell, Kernel};
use crate::util::EPSILON;

/// Rotates every kernel in `kernel`'s list by `angle` degrees (clockwise), returning a new list
///
/// Rotation-invariant families (see [`crate::kernel::KernelFamily::is_rotation_invariant`])
/// are returned unchanged. A 45 degree step only applies to a 3x3 kernel; a 90 degree step only
/// applies to a kernel that is square or one cell wide/tall. Anything else is a no-op for angles
/// within 22.5 degrees of zero, and an error otherwise.
pub fn rotate(kernel: &Kernel, angle: f64) -> KernelResult<Kernel> {
    let mut rotated = rotate_one(kernel, angle)?;
    if let Some(next) = &kernel.next {
        rotated.next = Some(Box::new(rotate(next, angle)?));
    }
    Ok(rotated)
}

fn rotate_one(kernel: &Kernel, angle: f64) -> KernelResult<Kernel> {
    let mut k = kernel.clone();
    k.next = None;

    let mut angle = angle.rem_euclid(360.0);
    if angle > 337.5 || angle <= 22.5 {
        return Ok(k);
    }

    if k.family.is_rotation_invariant() {
        return Ok(k);
    }
    if k.family.collapses_180() {
        if angle > 135.0 && angle <= 225.0 {
            return Ok(k);
        }
        if angle > 225.0 && angle <= 315.0 {
            angle -= 180.0;
        }
    }

    if angle.rem_euclid(90.0) > 22.5 && angle.rem_euclid(90.0) <= 67.5 {
        if k.width == 3 && k.height == 3 {
            rotate_3x3_by_45(&mut k);
            angle = (angle + 315.0).rem_euclid(360.0);
            k.angle = (k.angle + 45.0).rem_euclid(360.0);
        } else {
            return Err(KernelError::UnsupportedTransformError(
                "unable to rotate a non-3x3 kernel by 45 degrees".to_string()));
        }
    }

    if angle.rem_euclid(180.0) > 45.0 && angle.rem_euclid(180.0) <= 135.0 {
        if k.width == 1 || k.height == 1 {
            std::mem::swap(&mut k.width, &mut k.height);
            std::mem::swap(&mut k.x, &mut k.y);
            if k.width == 1 {
                angle = (angle + 270.0).rem_euclid(360.0);
                k.angle = (k.angle + 90.0).rem_euclid(360.0);
            } else {
                angle = (angle + 90.0).rem_euclid(360.0);
                k.angle = (k.angle + 270.0).rem_euclid(360.0);
            }
        } else if k.width == k.height {
            rotate_square_by_90(&mut k);
            angle = (angle + 270.0).rem_euclid(360.0);
            k.angle = (k.angle + 90.0).rem_euclid(360.0);
        } else {
            return Err(KernelError::UnsupportedTransformError(
                "unable to rotate a non-square, non-linear kernel by 90 degrees".to_string()));
        }
    }

    if angle > 135.0 && angle <= 225.0 {
        k.values.reverse();
        k.x = k.width - k.x - 1;
        k.y = k.height - k.y - 1;
        k.angle = (k.angle + 180.0).rem_euclid(360.0);
    }

    k.recalculate_statistics();
    Ok(k)
}

/// Permutes the 8 cells surrounding the centre of a 3x3 kernel one clockwise step, leaving the
/// centre in place. The origin is assumed centred; off-centre 3x3 origins are not rotated.
fn rotate_3x3_by_45(k: &mut Kernel) {
    let v = &mut k.values;
    let t = v[0];
    v[0] = v[3];
    v[3] = v[6];
    v[6] = v[7];
    v[7] = v[8];
    v[8] = v[5];
    v[5] = v[2];
    v[2] = v[1];
    v[1] = t;
}

/// Rotates a square array of values 90 degrees, layer by layer, in place
fn rotate_square_by_90(k: &mut Kernel) {
    let width = k.width as usize;
    let height = k.height as usize;

    let mut i = 0usize;
    let mut x = width - 1;
    while i <= x {
        let mut j = 0usize;
        let mut y = height - 1;
        while j < y {
            let t = k.values[i + j * width];
            k.values[i + j * width] = k.values[j + x * width];
            k.values[j + x * width] = k.values[x + y * width];
            k.values[x + y * width] = k.values[y + i * width];
            k.values[y + i * width] = t;
            j += 1;
            y -= 1;
        }
        i += 1;
        if x == 0 {
            break;
        }
        x -= 1;
    }
}

/// Expands a single kernel into the full list of its distinct rotations, stepping by `angle`
/// degrees until a rotation matches the original (cycle detection is always against the
/// original kernel, not the previous list element).
pub fn expand_into_list(kernel: &Kernel, angle: f64) -> KernelResult<Kernel> {
    if kernel.next.is_some() {
        return Err(KernelError::UnsupportedTransformError(
            "cannot expand a kernel that is already the head of a list".to_string()));
    }

    let mut list = vec![kernel.clone()];
    let mut last = kernel.clone();

    let max_steps = (360.0 / angle.abs().max(1.0)).ceil() as usize + 1;
    for _ in 0..max_steps {
        let candidate = rotate_one(&last, angle)?;
        if candidate.approx_eq(kernel) {
            break;
        }
        last = candidate.clone();
        list.push(candidate);
    }

    let mut iter = list.into_iter();
    let mut head = iter.next().expect("list always has at least the original kernel");
    for next in iter {
        head.push_back(next);
    }
    Ok(head)
}

/// Scales (and optionally normalises) every kernel in the list
///
/// Faithfully reproduces the reference implementation's swap of `minimum`/`maximum` when the
/// scaling factor is negative: the value that ends up in `minimum` is the kernel's pre-scale
/// maximum, not a literal constant.
pub fn scale_and_normalise(kernel: &mut Kernel, scale: f64, flags: crate::enums::ScaleFlags) {
    use crate::enums::ScaleFlags;

    let mut pos_scale = 1.0;
    let mut neg_scale;

    if flags.contains(ScaleFlags::NORMALIZE) {
        pos_scale = if (kernel.positive_range + kernel.negative_range).abs() > EPSILON {
            (kernel.positive_range + kernel.negative_range).abs()
        } else {
            kernel.positive_range
        };
    }

    if flags.contains(ScaleFlags::CORRELATE_NORMALIZE) {
        pos_scale = if kernel.positive_range.abs() > EPSILON { kernel.positive_range } else { 1.0 };
        neg_scale = if kernel.negative_range.abs() > EPSILON { -kernel.negative_range } else { 1.0 };
    } else {
        neg_scale = pos_scale;
    }

    pos_scale = scale / pos_scale;
    neg_scale = scale / neg_scale;

    for cell in kernel.values.iter_mut() {
        if let Cell::Finite(v) = cell {
            *v *= if *v >= 0.0 { pos_scale } else { neg_scale };
        }
    }

    kernel.positive_range *= pos_scale;
    kernel.negative_range *= neg_scale;
    kernel.maximum *= if kernel.maximum >= 0.0 { pos_scale } else { neg_scale };
    kernel.minimum *= if kernel.minimum >= 0.0 { pos_scale } else { neg_scale };

    if scale < EPSILON {
        std::mem::swap(&mut kernel.positive_range, &mut kernel.negative_range);
        let old_maximum = kernel.maximum;
        kernel.maximum = kernel.minimum;
        kernel.minimum = old_maximum;
    }

    if let Some(next) = &mut kernel.next {
        scale_and_normalise(next, scale, flags);
    }
}

/// Adds `scale` times the unity kernel (a 1 at the origin, 0 elsewhere) to every kernel in the
/// list, blending in the original image for e.g. sharpening a zero-summing edge kernel
pub fn unity_add(kernel: &mut Kernel, scale: f64) {
    let idx = (kernel.x + kernel.y * kernel.width) as usize;
    if let Cell::Finite(v) = &mut kernel.values[idx] {
        *v += scale;
    } else {
        kernel.values[idx] = Cell::Finite(scale);
    }
    kernel.recalculate_statistics();

    if let Some(next) = &mut kernel.next {
        unity_add(next, scale);
    }
}

/// Replaces every masked cell in the list with a finite zero
pub fn zero_mask(kernel: &mut Kernel) {
    for cell in kernel.values.iter_mut() {
        if cell.is_masked() {
            *cell = Cell::Finite(0.0);
        }
    }
    kernel.recalculate_statistics();

    if let Some(next) = &mut kernel.next {
        zero_mask(next);
    }
}

/// Parses a `convolve:scale`-style geometry string `S[%][!|^][xA[%]]` and applies it: `S` (with
/// any normalization flags) is passed to [`scale_and_normalise`], and `A`, if given, is passed
/// to [`unity_add`].
pub fn scale_geometry(kernel: &mut Kernel, geometry: &str) -> KernelResult<()> {
    let (rho_part, sigma_part) = match geometry.split_once('x').or_else(|| geometry.split_once('X')) {
        Some((rho, sigma)) => (rho, Some(sigma)),
        None => (geometry, None),
    };

    let (rho_str, flags) = strip_scale_flags(rho_part);
    let (rho_str, rho_percent) = strip_percent(rho_str);

    let mut rho: f64 = if rho_str.trim().is_empty() {
        1.0
    } else {
        rho_str.trim().parse().map_err(|_|
            KernelError::ParseError(format!("invalid scale factor '{}'", rho_str)))?
    };
    if rho_percent {
        rho *= 0.01;
    }

    let sigma: Option<f64> = match sigma_part {
        Some(s) if !s.trim().is_empty() => {
            let (s, sigma_percent) = strip_percent(s.trim());
            let mut value: f64 = s.parse().map_err(|_|
                KernelError::ParseError(format!("invalid unity-add factor '{}'", s)))?;
            if sigma_percent {
                value *= 0.01;
            }
            Some(value)
        }
        _ => None,
    };

    scale_and_normalise(kernel, rho, flags);

    if let Some(sigma) = sigma {
        unity_add(kernel, sigma);
    }

    Ok(())
}

/// Strips a trailing `!` (correlate-normalise) or `^` (normalise) flag from the scale component
fn strip_scale_flags(rho_part: &str) -> (&str, crate::enums::ScaleFlags) {
    use crate::enums::ScaleFlags;

    if let Some(stripped) = rho_part.strip_suffix('!') {
        (stripped, ScaleFlags::CORRELATE_NORMALIZE)
    } else if let Some(stripped) = rho_part.strip_suffix('^') {
        (stripped, ScaleFlags::NORMALIZE)
    } else {
        (rho_part, ScaleFlags::NONE)
    }
}

fn strip_percent(part: &str) -> (&str, bool) {
    match part.strip_suffix('%') {
        Some(stripped) => (stripped, true),
        None => (part, false),
    }
}

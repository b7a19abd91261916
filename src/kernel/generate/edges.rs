//! Edge/compass and hit-and-miss generators: Sobel, Roberts, Prewitt, Compass, Kirsch, FreiChen,
//! Edges, Corners, Ridges, LineEnds, LineJunctions, ConvexHull, Skeleton

use std::f64::consts::SQRT_2;

use crate::error::KernelResult;
use crate::kernel::{parse, transform, Kernel, KernelFamily};

fn fixed(text: &str, family: KernelFamily) -> KernelResult<Kernel> {
    let mut k = parse::parse_kernel_list(text)?;
    k.family = family;
    Ok(k)
}

fn rotated(text: &str, family: KernelFamily, theta: f64) -> KernelResult<Kernel> {
    let k = fixed(text, family)?;
    transform::rotate(&k, theta)
}

pub(super) fn sobel(theta: f64) -> KernelResult<Kernel> {
    rotated("3x3+1+1: -1,0,1  -2,0,2  -1,0,1", KernelFamily::Sobel, theta)
}

pub(super) fn roberts(theta: f64) -> KernelResult<Kernel> {
    rotated("3x3+1+1: 0,0,0  -1,1,0  0,0,0", KernelFamily::Roberts, theta)
}

pub(super) fn prewitt(theta: f64) -> KernelResult<Kernel> {
    rotated("3x3+1+1: -1,1,1  0,0,0  -1,1,1", KernelFamily::Prewitt, theta)
}

pub(super) fn compass(theta: f64) -> KernelResult<Kernel> {
    rotated("3x3+1+1: -1,1,1  -1,-2,1  -1,1,1", KernelFamily::Compass, theta)
}

pub(super) fn kirsch(theta: f64) -> KernelResult<Kernel> {
    rotated("3x3+1+1: -3,-3,5  -3,0,5  -3,-3,5", KernelFamily::Kirsch, theta)
}

/// Nine fixed templates from Frei-Chen edge/line detection, each with its own normalising scale
pub(super) fn frei_chen(variant: i64, theta: f64) -> KernelResult<Kernel> {
    use crate::enums::ScaleFlags;

    let (text, overrides, scale): (&str, &[(usize, f64)], f64) = match variant {
        2 => ("3x3+1+1: 1,0,1  2,0,2  1,0,1", &[(3, SQRT_2), (5, SQRT_2)], 0.5 * SQRT_2),
        3 => ("3x3+1+1: 0,-1,2  1,0,-1  -2,1,0", &[(2, SQRT_2), (6, -SQRT_2)], 0.5 * SQRT_2),
        4 => ("3x3+1+1: 2,-1,0  -1,0,1  0,1,-2", &[(0, SQRT_2), (8, -SQRT_2)], 0.5 * SQRT_2),
        5 => ("3x3+1+1: 0,1,0  -1,0,-1  0,1,0", &[], 0.5),
        6 => ("3x3+1+1: -1,0,1  0,0,0  1,0,-1", &[], 0.5),
        7 => ("3x3+1+1: 1,-2,1  -2,4,-2  1,-2,1", &[], 1.0 / 6.0),
        8 => ("3x3+1+1: -2,1,-2  1,4,1  -2,1,-2", &[], 1.0 / 6.0),
        9 => ("3x3+1+1: 1,1,1  1,1,1  1,1,1", &[], 1.0 / 3.0),
        _ => ("3x3+1+1: 1,2,1  0,0,0  -1,2,-1", &[(1, SQRT_2), (7, -SQRT_2)], 0.5 * SQRT_2),
    };

    let mut k = fixed(text, KernelFamily::FreiChen)?;
    for &(index, value) in overrides {
        k.values[index] = crate::kernel::Cell::Finite(value);
    }
    k.recalculate_statistics();
    transform::scale_and_normalise(&mut k, scale, ScaleFlags::NONE);
    transform::rotate(&k, theta)
}

/// `Edges`/`Corners` are a single 3x3 hit-and-miss template expanded through all 4 quarter-turns
pub(super) fn edges() -> KernelResult<Kernel> {
    let k = fixed("3x3+1+1: 0,0,0  -,1,-  1,1,1", KernelFamily::Edges)?;
    transform::expand_into_list(&k, 90.0)
}

pub(super) fn corners() -> KernelResult<Kernel> {
    let k = fixed("3x3+1+1: 0,0,-  0,1,1  -,1,-", KernelFamily::Corners)?;
    transform::expand_into_list(&k, 90.0)
}

pub(super) fn ridges() -> KernelResult<Kernel> {
    let k = fixed("3x3+1+1: -,-,-  0,1,0  -,-,-", KernelFamily::Ridges)?;
    transform::expand_into_list(&k, 45.0)
}

fn concat(mut a: Kernel, b: Kernel) -> Kernel {
    a.push_back(b);
    a
}

pub(super) fn line_ends() -> KernelResult<Kernel> {
    let first = fixed("3x3+1+1: 0,0,0  0,1,0  -,1,-", KernelFamily::LineEnds)?;
    let first = transform::expand_into_list(&first, 90.0)?;

    let second = fixed("3x3+1+1: 0,0,0  0,1,0  0,0,1", KernelFamily::LineEnds)?;
    let second = transform::expand_into_list(&second, 90.0)?;

    Ok(concat(first, second))
}

pub(super) fn line_junctions() -> KernelResult<Kernel> {
    let first = fixed("3x3+1+1: -,1,-  -,1,-  1,-,1", KernelFamily::LineJunctions)?;
    let first = transform::expand_into_list(&first, 45.0)?;

    let second = fixed("3x3+1+1: 1,-,-  -,1,-  1,-,1", KernelFamily::LineJunctions)?;
    let second = transform::expand_into_list(&second, 90.0)?;

    Ok(concat(first, second))
}

pub(super) fn convex_hull() -> KernelResult<Kernel> {
    let first = fixed("3x3+1+1: 1,1,-  1,0,-  1,-,0", KernelFamily::ConvexHull)?;
    let first = transform::expand_into_list(&first, 90.0)?;

    let second = fixed("3x3+1+1: 1,1,1  1,0,0  -,-,0", KernelFamily::ConvexHull)?;
    let second = transform::expand_into_list(&second, 90.0)?;

    Ok(concat(first, second))
}

pub(super) fn skeleton() -> KernelResult<Kernel> {
    let k = fixed("3x3+1+1: 0,0,-  0,1,1  -,1,1", KernelFamily::Skeleton)?;
    transform::expand_into_list(&k, 45.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sobel_is_3x3() {
        let k = sobel(0.0).unwrap();
        assert_eq!((k.width, k.height), (3, 3));
    }

    #[test]
    fn edges_expands_to_four() {
        let k = edges().unwrap();
        assert_eq!(k.list_len(), 4);
    }

    #[test]
    fn line_ends_concatenates_two_rotation_sets() {
        let k = line_ends().unwrap();
        assert_eq!(k.list_len(), 8);
    }

    #[test]
    fn frei_chen_unknown_variant_falls_back_to_first() {
        assert!(frei_chen(1, 0.0).is_ok());
    }

    #[test]
    fn frei_chen_rejects_nothing_but_produces_3x3() {
        let k = frei_chen(5, 0.0).unwrap();
        assert_eq!((k.width, k.height), (3, 3));
    }
}

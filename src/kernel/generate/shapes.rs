//! Boolean and distance-measuring shape generators: Laplacian, Diamond, Square, Rectangle,
//! Disk, Plus, Cross, Ring, Peak, Chebyshev, Manhattan, Euclidean

use crate::error::{KernelError, KernelResult};
use crate::kernel::{parse, Cell, Kernel, KernelFamily};

/// `rho` selects one of nine fixed discrete Laplacian variants
pub(super) fn laplacian(rho: i64) -> KernelResult<Kernel> {
    let text = match rho {
        1 => "3: 0,-1,0  -1,4,-1  0,-1,0",
        2 => "3: -2,1,-2  1,4,1  -2,1,-2",
        3 => "3: 1,-2,1  -2,4,-2  1,-2,1",
        5 => "5: -4,-1,0,-1,-4  -1,2,3,2,-1  0,3,4,3,0  -1,2,3,2,-1  -4,-1,0,-1,-4",
        7 => "7: -10,-5,-2,-1,-2,-5,-10 -5,0,3,4,3,0,-5 -2,3,6,7,6,3,-2 -1,4,7,8,7,4,-1 \
              -2,3,6,7,6,3,-2 -5,0,3,4,3,0,-5 -10,-5,-2,-1,-2,-5,-10",
        15 => "5: 0,0,-1,0,0  0,-1,-2,-1,0  -1,-2,16,-2,-1  0,-1,-2,-1,0  0,0,-1,0,0",
        19 => "9: 0,-1,-1,-2,-2,-2,-1,-1,0  -1,-2,-4,-5,-5,-5,-4,-2,-1 \
               -1,-4,-5,-3,0,-3,-5,-4,-1  -2,-5,-3,12,24,12,-3,-5,-2 \
               -2,-5,0,24,40,24,0,-5,-2  -2,-5,-3,12,24,12,-3,-5,-2 \
               -1,-4,-5,-3,0,-3,-5,-4,-1  -1,-2,-4,-5,-5,-5,-4,-2,-1  0,-1,-1,-2,-2,-2,-1,-1,0",
        _ => "3: -1,-1,-1  -1,8,-1  -1,-1,-1",
    };

    let mut k = parse_fixed(text)?;
    k.family = KernelFamily::Laplacian;
    Ok(k)
}

fn parse_fixed(text: &str) -> KernelResult<Kernel> {
    let (geometry, cells) = text.split_once(':').expect("fixed templates always carry ':'");
    let size: u32 = geometry.trim().parse().expect("fixed template size is a literal digit");
    let origin = (size - 1) / 2;
    parse::parse_kernel_list(&format!("{}x{}+{}+{}:{}", size, size, origin, origin, cells))
}

fn flat_square(half: u32, scale: f64, within: impl Fn(i64, i64) -> bool) -> Kernel {
    let size = half * 2 + 1;
    let mut values = Vec::with_capacity((size * size) as usize);
    let mut positive_range = 0.0;
    for v in -(half as i64)..=half as i64 {
        for u in -(half as i64)..=half as i64 {
            if within(u, v) {
                values.push(Cell::Finite(scale));
                positive_range += scale;
            } else {
                values.push(Cell::Masked);
            }
        }
    }
    let mut k = Kernel::new(size, size, half, half, values, KernelFamily::UserDefined)
        .expect("generator invariants hold");
    k.positive_range = positive_range;
    k.minimum = scale;
    k.maximum = scale;
    k
}

pub(super) fn diamond(rho: f64, scale: f64) -> Kernel {
    let half = if rho < 1.0 { 1 } else { rho as u32 };
    let mut k = flat_square(half, scale, |u, v| u.abs() + v.abs() <= half as i64);
    k.family = KernelFamily::Diamond;
    k
}

pub(super) fn square(rho: f64, scale: f64) -> Kernel {
    let half = if rho < 1.0 { 1 } else { rho as u32 };
    let mut k = flat_square(half, scale, |_, _| true);
    k.family = KernelFamily::Square;
    k
}

/// `Rectangle(width, height, x, y)`: explicit origin, all-ones unless `scale` defaults differ
pub(super) fn rectangle(width: f64, height: f64, x: f64, y: f64) -> KernelResult<Kernel> {
    if width < 1.0 || height < 1.0 {
        return Err(KernelError::InvalidArgError(
            "Rectangle requires width >= 1 and height >= 1".to_string()));
    }
    let width = width as u32;
    let height = height as u32;

    let (origin_x, origin_y) = if x < 0.0 || y < 0.0 {
        ((width - 1) / 2, (height - 1) / 2)
    } else {
        (x as u32, y as u32)
    };
    if origin_x >= width || origin_y >= height {
        return Err(KernelError::InvalidArgError(
            format!("Rectangle origin ({}, {}) lies outside a {}x{} kernel",
                    origin_x, origin_y, width, height)));
    }

    let values = vec![Cell::Finite(1.0); (width * height) as usize];
    let mut k = Kernel::new(width, height, origin_x, origin_y, values, KernelFamily::Rectangle)?;
    k.minimum = 1.0;
    k.maximum = 1.0;
    k.positive_range = (width * height) as f64;
    Ok(k)
}

pub(super) fn disk(rho: f64, scale: f64) -> Kernel {
    let (half, limit) = if rho < 0.1 {
        (3, 10)
    } else {
        (rho as u32, (rho * rho) as i64)
    };
    let mut k = flat_square(half, scale, |u, v| u * u + v * v <= limit);
    k.family = KernelFamily::Disk;
    k
}

pub(super) fn plus(rho: f64, scale: f64) -> Kernel {
    let half = if rho < 1.0 { 2 } else { rho as u32 };
    let mut k = flat_square(half, scale, |u, v| u == 0 || v == 0);
    k.family = KernelFamily::Plus;
    k
}

pub(super) fn cross(rho: f64, scale: f64) -> Kernel {
    let half = if rho < 1.0 { 2 } else { rho as u32 };
    let mut k = flat_square(half, scale, |u, v| u == v || u == -v);
    k.family = KernelFamily::Cross;
    k
}

pub(super) fn ring(rho1: f64, rho2: f64, scale: f64) -> Kernel {
    let (mut half, mut limit1, mut limit2) = if rho1 < rho2 {
        (rho2 as u32, (rho1 * rho1) as i64, (rho2 * rho2) as i64)
    } else {
        (rho1 as u32, (rho2 * rho2) as i64, (rho1 * rho1) as i64)
    };
    if limit2 <= 0 {
        half = 3;
        limit1 = 7;
        limit2 = 11;
    }

    let mut k = flat_square(half, scale, |u, v| {
        let radius = u * u + v * v;
        limit1 < radius && radius <= limit2
    });
    k.family = KernelFamily::Ring;
    // Per the reference generator's own redundant self-assignment, only `minimum` (not
    // `maximum`) is set from `scale` here; `maximum` is left at the flat-square default.
    k.minimum = scale;
    k
}

pub(super) fn peak(rho1: f64, rho2: f64) -> Kernel {
    let mut k = ring(rho1, rho2, 0.0);
    k.family = KernelFamily::Peak;
    let idx = (k.x + k.y * k.width) as usize;
    k.values[idx] = Cell::Finite(1.0);
    k.positive_range = 1.0;
    k.maximum = 1.0;
    k
}

fn distance_square(rho: f64, scale: f64, f: impl Fn(i64, i64) -> f64) -> Kernel {
    let half = if rho < 1.0 { 1 } else { rho as u32 };
    let size = half * 2 + 1;
    let mut values = Vec::with_capacity((size * size) as usize);
    let mut positive_range = 0.0;
    for v in -(half as i64)..=half as i64 {
        for u in -(half as i64)..=half as i64 {
            let value = scale * f(u, v);
            positive_range += value;
            values.push(Cell::Finite(value));
        }
    }
    let mut k = Kernel::new(size, size, half, half, values, KernelFamily::UserDefined)
        .expect("generator invariants hold");
    k.positive_range = positive_range;
    k
}

pub(super) fn chebyshev(rho: f64, scale: f64) -> Kernel {
    let mut k = distance_square(rho, scale, |u, v| u.abs().max(v.abs()) as f64);
    k.family = KernelFamily::Chebyshev;
    k.maximum = k.values[0].value().unwrap_or(0.0);
    k
}

pub(super) fn manhattan(rho: f64, scale: f64) -> Kernel {
    let mut k = distance_square(rho, scale, |u, v| (u.abs() + v.abs()) as f64);
    k.family = KernelFamily::Manhattan;
    k.maximum = k.values[0].value().unwrap_or(0.0);
    k
}

pub(super) fn euclidean(rho: f64, scale: f64) -> Kernel {
    let mut k = distance_square(rho, scale, |u, v| ((u * u + v * v) as f64).sqrt());
    k.family = KernelFamily::Euclidean;
    k.maximum = k.values[0].value().unwrap_or(0.0);
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diamond_masks_corners() {
        let k = diamond(1.0, 1.0);
        assert!(k.cell(0, 0).is_masked());
        assert_eq!(k.cell(1, 0).value(), Some(1.0));
    }

    #[test]
    fn square_has_no_masked_cells() {
        let k = square(1.0, 1.0);
        assert!(k.values.iter().all(|c| !c.is_masked()));
    }

    #[test]
    fn rectangle_rejects_sub_unit_extents() {
        assert!(rectangle(0.0, 3.0, -1.0, -1.0).is_err());
    }

    #[test]
    fn disk_default_is_seven_by_seven() {
        let k = disk(0.0, 1.0);
        assert_eq!((k.width, k.height), (7, 7));
    }

    #[test]
    fn peak_sets_centre_to_one() {
        let k = peak(1.0, 2.0);
        assert_eq!(k.cell(k.x, k.y).value(), Some(1.0));
    }

    #[test]
    fn chebyshev_grows_with_offset() {
        let k = chebyshev(1.0, 1.0);
        assert_eq!(k.cell(2, 1).value(), Some(1.0));
        assert_eq!(k.cell(2, 2).value(), Some(1.0));
    }
}

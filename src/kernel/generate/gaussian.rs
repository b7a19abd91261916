//! Convolution-family generators: Unity, Gaussian, DoG, LoG, Blur, DoB, Comet

use crate::kernel::generate::{correlate_normalise, optimal_width};
use crate::kernel::transform;
use crate::kernel::{Cell, Kernel, KernelFamily};
use crate::util::EPSILON;

use std::f64::consts::PI;

/// Builds a square `2*half+1` kernel whose cell at offset `(u, v)` from the centred origin is
/// `f(u, v)`
fn square(half: u32, family: KernelFamily, f: impl Fn(i64, i64) -> f64) -> Kernel {
    let size = half * 2 + 1;
    let mut values = Vec::with_capacity((size * size) as usize);
    for v in -(half as i64)..=half as i64 {
        for u in -(half as i64)..=half as i64 {
            values.push(Cell::Finite(f(u, v)));
        }
    }
    Kernel::new(size, size, half, half, values, family).expect("generator invariants hold")
}

pub(super) fn unity() -> Kernel {
    let mut k = square(1, KernelFamily::Unity, |_, _| 0.0);
    let idx = (k.x + k.y * k.width) as usize;
    k.values[idx] = Cell::Finite(1.0);
    k.recalculate_statistics();
    k
}

fn half_width(rho: f64, sigma: f64) -> u32 {
    if rho >= 1.0 {
        rho as u32
    } else {
        (optimal_width(sigma) - 1) / 2
    }
}

pub(super) fn gaussian(rho: f64, sigma: f64) -> Kernel {
    let half = half_width(rho, sigma.abs());
    let mut k = gaussian_square(half, sigma.abs(), KernelFamily::Gaussian);
    correlate_normalise(&mut k);
    k
}

fn gaussian_square(half: u32, sigma: f64, family: KernelFamily) -> Kernel {
    if sigma > EPSILON {
        let a = 1.0 / (2.0 * sigma * sigma);
        let b = 1.0 / (2.0 * PI * sigma * sigma);
        square(half, family, |u, v| (-((u * u + v * v) as f64) * a).exp() * b)
    } else {
        unity()
    }
}

pub(super) fn dog(rho: f64, sigma1: f64, sigma2: f64) -> Kernel {
    let half = half_width(rho, sigma1.abs().max(sigma2.abs()));
    let mut positive = gaussian_square(half, sigma1.abs(), KernelFamily::DoG);
    let negative = gaussian_square(half, sigma2.abs(), KernelFamily::DoG);

    for (p, n) in positive.values.iter_mut().zip(negative.values.iter()) {
        if let (Cell::Finite(pv), Cell::Finite(nv)) = (p, n) {
            *pv -= *nv;
        }
    }
    positive.family = KernelFamily::DoG;
    positive.recalculate_statistics();
    correlate_normalise(&mut positive);
    positive
}

pub(super) fn log(rho: f64, sigma: f64) -> Kernel {
    let sigma = sigma.abs();
    let half = half_width(rho, sigma);

    let mut k = if sigma > EPSILON {
        let a = 1.0 / (2.0 * sigma * sigma);
        let b = 1.0 / (PI * sigma.powi(4));
        square(half, KernelFamily::LoG, |u, v| {
            let r = (u * u + v * v) as f64 * a;
            (1.0 - r) * (-r).exp() * b
        })
    } else {
        unity()
    };
    k.family = KernelFamily::LoG;
    correlate_normalise(&mut k);
    k
}

fn line(half: u32, family: KernelFamily, f: impl Fn(i64) -> f64) -> Kernel {
    let size = half * 2 + 1;
    let values = (-(half as i64)..=half as i64).map(|u| Cell::Finite(f(u))).collect();
    Kernel::new(size, 1, half, 0, values, family).expect("generator invariants hold")
}

fn blur_line(half: u32, sigma: f64, family: KernelFamily) -> Kernel {
    if sigma > EPSILON {
        let a = 1.0 / (2.0 * sigma * sigma);
        let b = 1.0 / ((2.0 * PI).sqrt() * sigma);
        line(half, family, |u| (-((u * u) as f64) * a).exp() * b)
    } else {
        let mut k = line(half, family, |_| 0.0);
        let idx = k.x as usize;
        k.values[idx] = Cell::Finite(1.0);
        k.recalculate_statistics();
        k
    }
}

pub(super) fn blur(rho: f64, sigma: f64, theta: f64) -> Kernel {
    let half = half_width(rho, sigma.abs());
    let mut k = blur_line(half, sigma.abs(), KernelFamily::Blur);
    correlate_normalise(&mut k);
    transform::rotate(&k, theta).unwrap_or_else(|_| k.clone())
}

pub(super) fn dob(rho: f64, sigma1: f64, sigma2: f64, theta: f64) -> Kernel {
    let half = half_width(rho, sigma1.abs().max(sigma2.abs()));
    let mut positive = blur_line(half, sigma1.abs(), KernelFamily::DoB);
    let negative = blur_line(half, sigma2.abs(), KernelFamily::DoB);

    for (p, n) in positive.values.iter_mut().zip(negative.values.iter()) {
        if let (Cell::Finite(pv), Cell::Finite(nv)) = (p, n) {
            *pv -= *nv;
        }
    }
    positive.recalculate_statistics();
    correlate_normalise(&mut positive);
    transform::rotate(&positive, theta).unwrap_or_else(|_| positive.clone())
}

pub(super) fn comet(width: f64, sigma: f64, theta: f64) -> Kernel {
    let sigma = sigma.abs();
    let width = if width < 1.0 {
        ((optimal_width(sigma) - 1) / 2) + 1
    } else {
        width as u32
    };

    let mut values = Vec::with_capacity(width as usize);
    if sigma > EPSILON {
        let a = 1.0 / (2.0 * sigma * sigma);
        for u in 0..width as i64 {
            values.push(Cell::Finite((-((u * u) as f64) * a).exp()));
        }
    } else {
        values.push(Cell::Finite(1.0));
        values.extend(std::iter::repeat(Cell::Finite(0.0)).take(width as usize - 1));
    }

    let mut k = Kernel::new(width, 1, 0, 0, values, KernelFamily::Comet)
        .expect("generator invariants hold");

    crate::kernel::transform::scale_and_normalise(&mut k, 1.0, crate::enums::ScaleFlags::NORMALIZE);
    transform::rotate(&k, theta).unwrap_or_else(|_| k.clone())
}

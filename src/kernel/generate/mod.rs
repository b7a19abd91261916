//! Named kernel generators (C3): dispatches a name and up to four real arguments `(rho, sigma,
//! xi, psi)` to a family-specific builder.

mod edges;
mod gaussian;
mod shapes;

use crate::enums::ScaleFlags;
use crate::error::{KernelError, KernelResult};
use crate::kernel::{transform, Kernel};
use crate::util::EPSILON;

/// Dispatches a case-insensitive family name and its argument tuple to the matching generator
pub fn by_name(name: &str, args: [Option<f64>; 4]) -> KernelResult<Kernel> {
    let a = Args::new(args);

    match name.to_ascii_lowercase().as_str() {
        "unity" => Ok(gaussian::unity()),
        "gaussian" => Ok(gaussian::gaussian(a.rho(0.0), a.sigma(1.0))),
        "dog" => Ok(gaussian::dog(a.rho(0.0), a.sigma(1.0), a.xi(0.0))),
        "log" => Ok(gaussian::log(a.rho(0.0), a.sigma(1.0))),
        "blur" => Ok(gaussian::blur(a.rho(0.0), a.sigma(1.0), a.xi(0.0))),
        "dob" => Ok(gaussian::dob(a.rho(0.0), a.sigma(1.0), a.xi(0.0), a.psi(0.0))),
        "comet" => Ok(gaussian::comet(a.rho(0.0), a.sigma(1.0), a.xi(0.0))),
        "laplacian" => shapes::laplacian(a.rho(0.0) as i64),
        "sobel" => Ok(edges::sobel(a.rho(0.0))?),
        "roberts" => Ok(edges::roberts(a.rho(0.0))?),
        "prewitt" => Ok(edges::prewitt(a.rho(0.0))?),
        "compass" => Ok(edges::compass(a.rho(0.0))?),
        "kirsch" => Ok(edges::kirsch(a.rho(0.0))?),
        "freichen" => edges::frei_chen(a.rho(1.0) as i64, a.sigma(0.0)),
        "diamond" => Ok(shapes::diamond(a.rho(1.0), a.sigma(1.0))),
        "square" => Ok(shapes::square(a.rho(1.0), a.sigma(1.0))),
        "rectangle" => shapes::rectangle(a.rho(0.0), a.sigma(0.0), a.xi(-1.0), a.psi(-1.0)),
        "disk" => Ok(shapes::disk(a.rho(0.0), a.sigma(1.0))),
        "plus" => Ok(shapes::plus(a.rho(2.0), a.sigma(1.0))),
        "cross" => Ok(shapes::cross(a.rho(2.0), a.sigma(1.0))),
        "ring" => Ok(shapes::ring(a.rho(0.0), a.sigma(0.0), a.xi(1.0))),
        "peak" => Ok(shapes::peak(a.rho(0.0), a.sigma(0.0))),
        "edges" => Ok(edges::edges()?),
        "corners" => Ok(edges::corners()?),
        "ridges" => Ok(edges::ridges()?),
        "lineends" => Ok(edges::line_ends()?),
        "linejunctions" => Ok(edges::line_junctions()?),
        "convexhull" => Ok(edges::convex_hull()?),
        "skeleton" => Ok(edges::skeleton()?),
        "chebyshev" => Ok(shapes::chebyshev(a.rho(1.0), a.sigma(1.0))),
        "manhattan" => Ok(shapes::manhattan(a.rho(1.0), a.sigma(1.0))),
        "euclidean" => Ok(shapes::euclidean(a.rho(1.0), a.sigma(1.0))),
        _ => Err(KernelError::ParseError(format!("unknown kernel family '{}'", name))),
    }
}

/// Convenience wrapper over the raw `(rho, sigma, xi, psi)` argument tuple with per-call defaults
struct Args([Option<f64>; 4]);

impl Args {
    fn new(args: [Option<f64>; 4]) -> Args {
        Args(args)
    }

    fn rho(&self, default: f64) -> f64 {
        self.0[0].unwrap_or(default)
    }

    fn sigma(&self, default: f64) -> f64 {
        self.0[1].unwrap_or(default)
    }

    fn xi(&self, default: f64) -> f64 {
        self.0[2].unwrap_or(default)
    }

    fn psi(&self, default: f64) -> f64 {
        self.0[3].unwrap_or(default)
    }
}

/// Correlate-normalises a freshly generated convolution-family kernel: kernels with no negative
/// cells get a single normalizing scale, kernels with negative cells get their positive and
/// negative halves scaled independently so the result sums to (approximately) zero
pub(crate) fn correlate_normalise(kernel: &mut Kernel) {
    let flags = if kernel.negative_range.abs() > EPSILON {
        ScaleFlags::CORRELATE_NORMALIZE
    } else {
        ScaleFlags::NORMALIZE
    };
    transform::scale_and_normalise(kernel, 1.0, flags);
}

/// A coarse stand-in for the reference implementation's optimal-width heuristic: a kernel needs
/// to extend roughly 3 standard deviations from the origin to capture the Gaussian's mass
pub(crate) fn optimal_width(sigma: f64) -> u32 {
    let radius = (sigma.abs() * 3.0).ceil().max(1.0) as u32;
    radius * 2 + 1
}

//! A module for the morphology kernel: the numeric window applied to each output pixel
//!
//! A [`Kernel`] carries its shape, its origin, and its cell values, plus a handful of aggregate
//! statistics used by the scaling/normalisation transforms in [`transform`]. Kernels form a
//! singly linked, non-cyclic list via [`Kernel::next`] when more than one kernel is produced by
//! a kernel-list string or a generator's rotation expansion.

pub mod generate;
pub mod parse;
pub mod transform;

use crate::error::{KernelError, KernelResult};
use crate::util::{approx_eq, EPSILON};

/// A single kernel cell: either a finite numeric weight, or a masked ("don't care") position
///
/// The original C implementation this engine is modelled on overlays this distinction onto a
/// single `double` using a NaN sentinel (a masked cell is "not equal to itself"). Rust has sum
/// types, so the mask is represented explicitly here; [`Cell::approx_eq`] keeps the NaN-aware
/// comparison semantics the cycle detector in [`transform::expand_into_list`] depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Finite(f64),
    Masked,
}

impl Cell {
    pub fn is_masked(&self) -> bool {
        matches!(self, Cell::Masked)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Cell::Finite(v) => Some(*v),
            Cell::Masked => None,
        }
    }

    /// Compares two cells the way the kernel's NaN-sentinel design would: two masked cells are
    /// "equal", a masked and a finite cell never are, and two finite cells compare within
    /// [`EPSILON`]
    pub fn approx_eq(&self, other: &Cell) -> bool {
        match (self, other) {
            (Cell::Masked, Cell::Masked) => true,
            (Cell::Finite(a), Cell::Finite(b)) => approx_eq(*a, *b),
            _ => false,
        }
    }
}

/// Which family produced a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelFamily {
    UserDefined,
    Unity,
    Gaussian,
    DoG,
    LoG,
    Blur,
    DoB,
    Comet,
    Laplacian,
    Sobel,
    Roberts,
    Prewitt,
    Compass,
    Kirsch,
    FreiChen,
    Diamond,
    Square,
    Rectangle,
    Disk,
    Plus,
    Cross,
    Ring,
    Peak,
    Edges,
    Corners,
    Ridges,
    LineEnds,
    LineJunctions,
    ConvexHull,
    Skeleton,
    Chebyshev,
    Manhattan,
    Euclidean,
}

impl std::fmt::Display for KernelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            KernelFamily::UserDefined => "Kernel",
            KernelFamily::Unity => "Unity",
            KernelFamily::Gaussian => "Gaussian",
            KernelFamily::DoG => "DoG",
            KernelFamily::LoG => "LoG",
            KernelFamily::Blur => "Blur",
            KernelFamily::DoB => "DoB",
            KernelFamily::Comet => "Comet",
            KernelFamily::Laplacian => "Laplacian",
            KernelFamily::Sobel => "Sobel",
            KernelFamily::Roberts => "Roberts",
            KernelFamily::Prewitt => "Prewitt",
            KernelFamily::Compass => "Compass",
            KernelFamily::Kirsch => "Kirsch",
            KernelFamily::FreiChen => "FreiChen",
            KernelFamily::Diamond => "Diamond",
            KernelFamily::Square => "Square",
            KernelFamily::Rectangle => "Rectangle",
            KernelFamily::Disk => "Disk",
            KernelFamily::Plus => "Plus",
            KernelFamily::Cross => "Cross",
            KernelFamily::Ring => "Ring",
            KernelFamily::Peak => "Peak",
            KernelFamily::Edges => "Edges",
            KernelFamily::Corners => "Corners",
            KernelFamily::Ridges => "Ridges",
            KernelFamily::LineEnds => "LineEnds",
            KernelFamily::LineJunctions => "LineJunctions",
            KernelFamily::ConvexHull => "ConvexHull",
            KernelFamily::Skeleton => "Skeleton",
            KernelFamily::Chebyshev => "Chebyshev",
            KernelFamily::Manhattan => "Manhattan",
            KernelFamily::Euclidean => "Euclidean",
        };
        write!(f, "{}", name)
    }
}

impl KernelFamily {
    /// Families whose shape is invariant under rotation, per spec 4.3 "short-circuit" families
    pub fn is_rotation_invariant(&self) -> bool {
        matches!(self, KernelFamily::Gaussian | KernelFamily::DoG | KernelFamily::Disk
            | KernelFamily::Peak | KernelFamily::Laplacian | KernelFamily::Chebyshev
            | KernelFamily::Manhattan | KernelFamily::Euclidean | KernelFamily::Square
            | KernelFamily::Diamond | KernelFamily::Plus | KernelFamily::Cross)
    }

    /// Families whose 180 degree rotation collapses to the identity
    pub fn collapses_180(&self) -> bool {
        matches!(self, KernelFamily::Blur | KernelFamily::Rectangle)
    }
}

/// A morphology/convolution kernel, and optionally the head of a list of kernels
#[derive(Debug, Clone)]
pub struct Kernel {
    pub width: u32,
    pub height: u32,
    /// Column of the origin cell (the cell aligned with the output pixel), `0 <= x < width`
    pub x: u32,
    /// Row of the origin cell, `0 <= y < height`
    pub y: u32,
    /// `width * height` cells, row-major
    pub values: Vec<Cell>,
    pub minimum: f64,
    pub maximum: f64,
    /// Sum of finite cells `>= 0`
    pub positive_range: f64,
    /// Sum of finite cells `< 0`
    pub negative_range: f64,
    /// Rotation angle accumulated by the transform module; informational only
    pub angle: f64,
    pub family: KernelFamily,
    pub next: Option<Box<Kernel>>,
}

impl Kernel {
    /// Builds a kernel from row-major cell data, validating invariants 1, 2, and 4 of the data
    /// model and computing the aggregate statistics (invariant 3)
    pub fn new(width: u32, height: u32, x: u32, y: u32, values: Vec<Cell>,
               family: KernelFamily) -> KernelResult<Kernel> {
        if (width as u64) * (height as u64) != values.len() as u64 {
            return Err(KernelError::ParseError(
                format!("width*height ({}) does not match cell count ({})",
                        width as u64 * height as u64, values.len())));
        }
        if x >= width || y >= height {
            return Err(KernelError::ParseError(
                format!("origin ({}, {}) lies outside a {}x{} kernel", x, y, width, height)));
        }
        if !values.iter().any(|c| c.value().is_some()) {
            return Err(KernelError::ParseError("kernel has no finite cells".to_string()));
        }

        let mut kernel = Kernel {
            width, height, x, y, values,
            minimum: 0.0, maximum: 0.0, positive_range: 0.0, negative_range: 0.0,
            angle: 0.0, family, next: None,
        };
        kernel.recalculate_statistics();

        Ok(kernel)
    }

    /// Recomputes `minimum`, `maximum`, `positive_range`, and `negative_range` from `values`,
    /// snapping near-zero cells to exactly zero first (so generator round-off doesn't leak into
    /// the zero-sum check `ScaleAndNormalise`'s "correlate-normalise" branch relies on)
    pub fn recalculate_statistics(&mut self) {
        self.minimum = 0.0;
        self.maximum = 0.0;
        self.positive_range = 0.0;
        self.negative_range = 0.0;

        for cell in self.values.iter_mut() {
            if let Cell::Finite(v) = cell {
                if v.abs() < EPSILON {
                    *v = 0.0;
                }
                if *v < 0.0 {
                    self.negative_range += *v;
                } else {
                    self.positive_range += *v;
                }
                self.minimum = self.minimum.min(*v);
                self.maximum = self.maximum.max(*v);
            }
        }
    }

    /// Returns the cell at kernel-local coordinates `(u, v)`
    pub fn cell(&self, u: u32, v: u32) -> Cell {
        self.values[(v * self.width + u) as usize]
    }

    /// Returns `true` if the kernel's finite cells sum to (within epsilon of) zero
    pub fn is_zero_summing(&self) -> bool {
        (self.positive_range + self.negative_range).abs() < EPSILON
    }

    /// Appends `tail` to the end of this kernel's list
    pub fn push_back(&mut self, tail: Kernel) {
        match &mut self.next {
            Some(next) => next.push_back(tail),
            None => self.next = Some(Box::new(tail)),
        }
    }

    /// Returns the number of kernels in this list (at least 1)
    pub fn list_len(&self) -> usize {
        1 + self.next.as_ref().map_or(0, |n| n.list_len())
    }

    /// Returns an iterator over this kernel and every kernel that follows it in the list
    pub fn iter_list(&self) -> KernelListIter<'_> {
        KernelListIter { current: Some(self) }
    }

    /// Structural, NaN-aware equality between two single kernels (not lists): same shape, same
    /// origin, and every cell pairwise equal within epsilon. Mirrors the original's
    /// `SameKernelInfo`, used by `ExpandIntoList`'s cycle detector and by the rotation round-trip
    /// property tests.
    pub fn approx_eq(&self, other: &Kernel) -> bool {
        if self.width != other.width || self.height != other.height
            || self.x != other.x || self.y != other.y {
            return false;
        }

        self.values.iter().zip(other.values.iter()).all(|(a, b)| a.approx_eq(b))
    }

    /// Deep-clones this kernel and every kernel that follows it
    pub fn clone_list(&self) -> Kernel {
        self.clone()
    }
}

/// An iterator over a kernel list, head to tail
pub struct KernelListIter<'a> {
    current: Option<&'a Kernel>,
}

impl<'a> Iterator for KernelListIter<'a> {
    type Item = &'a Kernel;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = current.next.as_deref();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unity() -> Kernel {
        Kernel::new(3, 3, 1, 1,
                    vec![Cell::Finite(0.0), Cell::Finite(0.0), Cell::Finite(0.0),
                         Cell::Finite(0.0), Cell::Finite(1.0), Cell::Finite(0.0),
                         Cell::Finite(0.0), Cell::Finite(0.0), Cell::Finite(0.0)],
                    KernelFamily::Unity).unwrap()
    }

    #[test]
    fn invariants_hold() {
        let k = unity();
        assert_eq!(k.width * k.height, k.values.len() as u32);
        assert!(k.x < k.width && k.y < k.height);
        assert!(k.positive_range >= 0.0 && k.negative_range <= 0.0);
        assert!(k.minimum <= k.maximum);
    }

    #[test]
    fn rejects_all_masked() {
        let result = Kernel::new(1, 1, 0, 0, vec![Cell::Masked], KernelFamily::UserDefined);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_origin_out_of_bounds() {
        let result = Kernel::new(3, 3, 3, 0, vec![Cell::Finite(1.0); 9], KernelFamily::UserDefined);
        assert!(result.is_err());
    }

    #[test]
    fn masked_cell_self_inequality_semantics() {
        assert!(Cell::Masked.approx_eq(&Cell::Masked));
        assert!(!Cell::Finite(1.0).approx_eq(&Cell::Masked));
    }

    #[test]
    fn list_len_and_push() {
        let mut k = unity();
        assert_eq!(k.list_len(), 1);
        k.push_back(unity());
        assert_eq!(k.list_len(), 2);
        assert_eq!(k.iter_list().count(), 2);
    }
}

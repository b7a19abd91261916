//! The `showkernel` diagnostic dump (spec 6): a human-readable rendering of a kernel or kernel
//! list, used to sanity-check a generated or parsed kernel before it is applied.

use std::fmt::Write as _;

use crate::kernel::{Cell, Kernel};
use crate::util::EPSILON;

/// Renders `kernel` and every kernel in its list at `precision` decimal places, matching the
/// reference engine's `showkernel` artifact: one header line, one range-classification line, and
/// a rectangular value table per kernel.
pub fn show_kernel(kernel: &Kernel, precision: usize) -> String {
    let mut out = String::new();

    for k in kernel.iter_list() {
        let angle_suffix = if k.angle.abs() > EPSILON {
            format!("@{}", format_value(k.angle, 0))
        } else {
            String::new()
        };

        writeln!(out, "Kernel \"{}{}\" of size {}x{}+{}+{} with values from {} to {}",
                 k.family, angle_suffix, k.width, k.height, k.x, k.y,
                 format_value(k.minimum, precision), format_value(k.maximum, precision)).unwrap();

        writeln!(out, "{}", range_line(k)).unwrap();

        for v in 0..k.height {
            let mut row = String::new();
            for u in 0..k.width {
                if u > 0 {
                    row.push_str(", ");
                }
                match k.cell(u, v) {
                    Cell::Finite(value) => row.push_str(&format_value(value, precision)),
                    Cell::Masked => row.push_str("nan"),
                }
            }
            writeln!(out, "{}", row).unwrap();
        }
    }

    out
}

fn range_line(k: &Kernel) -> String {
    let sum = k.positive_range + k.negative_range;
    if k.is_zero_summing() {
        "Sum = 0 (zero-summing)".to_string()
    } else if (sum - 1.0).abs() < EPSILON {
        "Normalised (sum = 1)".to_string()
    } else {
        format!("Sum = {}", format_value(sum, 6))
    }
}

fn format_value(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

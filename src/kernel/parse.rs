//! The textual kernel language: string -> [`Kernel`] (C2)
//!
//! ```text
//! kernel-list  := kernel (';' kernel)* ';'?
//! kernel       := named | user-array | legacy-square | e
//! named        := NAME (':' args)?
//! user-array   := geometry ':' cell (SEP cell)*
//! legacy-square:= cell (SEP cell)*     ; count must be a perfect odd square
//! geometry     := W 'x' H ('+' X '+' Y)? ('^' | '@')?
//! cell         := REAL | 'nan' | '-'
//! SEP          := ',' | whitespace
//! ```

use crate::error::{KernelError, KernelResult};
use crate::kernel::{generate, transform, Cell, Kernel};

/// Parses a full kernel-list string (`k1;k2;...`) into the head of a kernel list
///
/// Empty segments (a run of `;;` or a trailing `;`) are skipped. If any element fails to parse,
/// the whole operation fails: no partial list is returned.
pub fn parse_kernel_list(input: &str) -> KernelResult<Kernel> {
    let mut kernels = Vec::new();

    for (index, segment) in input.split(';').enumerate() {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }

        let kernel = parse_single(trimmed).map_err(|e| {
            log::error!("failed to parse kernel at list index {}: {}", index, e);
            e
        })?;
        kernels.push(kernel);
    }

    let mut iter = kernels.into_iter();
    let mut head = iter.next().ok_or_else(||
        KernelError::ParseError("kernel-list contains no kernels".to_string()))?;

    for next in iter {
        head.push_back(next);
    }

    Ok(head)
}

/// Parses one kernel-list element (no `;`)
fn parse_single(token: &str) -> KernelResult<Kernel> {
    let token = token.strip_prefix('\'').unwrap_or(token);

    let (body, expand_angle) = match token.chars().last() {
        Some('^') => (&token[..token.len() - 1], Some(90.0)),
        Some('@') => (&token[..token.len() - 1], Some(45.0)),
        _ => (token, None),
    };
    let body = body.trim();

    let mut kernel = match body.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => parse_named(body)?,
        _ if body.contains(':') => parse_user_array(body)?,
        _ => parse_legacy_square(body)?,
    };

    if let Some(angle) = expand_angle {
        if kernel.next.is_some() {
            return Err(KernelError::ParseError(
                "cannot suffix-expand a kernel family that already expands into a list".to_string()));
        }
        if angle == 45.0 && (kernel.width != 3 || kernel.height != 3) {
            return Err(KernelError::UnsupportedTransformError(
                "'@' 45 degree expansion is only valid for 3x3 kernels".to_string()));
        }
        kernel = transform::expand_into_list(&kernel, angle)?;
    }

    Ok(kernel)
}

/// `NAME(:args)?`, where `args` are up to four comma/whitespace-separated reals `(rho, sigma,
/// xi, psi)` fed to the generator
fn parse_named(body: &str) -> KernelResult<Kernel> {
    let (name, args_str) = match body.split_once(':') {
        Some((name, args)) => (name, Some(args)),
        None => (body, None),
    };

    let mut args = [None; 4];
    if let Some(args_str) = args_str {
        let mut count = 0;
        for tok in args_str.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()) {
            if count >= 4 {
                return Err(KernelError::ParseError(
                    format!("too many arguments for named kernel '{}'", name)));
            }
            let value: f64 = tok.parse().map_err(|_|
                KernelError::ParseError(format!("invalid numeric argument '{}'", tok)))?;
            args[count] = Some(value);
            count += 1;
        }
    }

    generate::by_name(name, args)
}

/// `WxH[+X+Y]:cell,cell,...`
fn parse_user_array(body: &str) -> KernelResult<Kernel> {
    let (geometry, cells_str) = body.split_once(':').ok_or_else(||
        KernelError::ParseError("user-array kernel is missing ':'".to_string()))?;

    let (width, height, x, y) = parse_geometry(geometry)?;

    let cells = parse_cells(cells_str)?;
    let expected = (width as usize) * (height as usize);
    if cells.len() < expected {
        return Err(KernelError::ParseError(
            format!("expected {} cells, found {}", expected, cells.len())));
    }
    if cells.len() > expected {
        return Err(KernelError::ParseError(
            format!("trailing garbage: expected {} cells, found {}", expected, cells.len())));
    }

    Kernel::new(width, height, x, y, cells, crate::kernel::KernelFamily::UserDefined)
}

/// A run of cells with no geometry prefix; count must be a perfect odd square, origin is the
/// geometric centre
fn parse_legacy_square(body: &str) -> KernelResult<Kernel> {
    let cells = parse_cells(body)?;
    let n = cells.len() as u32;
    crate::error::check_square(n, "legacy kernel cell count")?;

    let size = (n as f64).sqrt().round() as u32;
    crate::error::check_odd(size as usize, "legacy kernel size")?;

    let origin = (size - 1) / 2;
    Kernel::new(size, size, origin, origin, cells, crate::kernel::KernelFamily::UserDefined)
}

/// `WxH` or `WxH+X+Y`, dimensions default/clamp per spec 4.1
fn parse_geometry(geometry: &str) -> KernelResult<(u32, u32, u32, u32)> {
    let (dims, origin) = match geometry.find('+') {
        Some(idx) => (&geometry[..idx], Some(&geometry[idx..])),
        None => (geometry, None),
    };

    let (w_str, h_str) = match dims.split_once(|c| c == 'x' || c == 'X') {
        Some((w, h)) => (w, Some(h)),
        None => (dims, None),
    };

    let width: i64 = w_str.trim().parse().map_err(|_|
        KernelError::ParseError(format!("invalid width '{}'", w_str)))?;
    let width = width.max(1) as u32;

    let height = match h_str {
        Some(h) if !h.trim().is_empty() => {
            let h: i64 = h.trim().parse().map_err(|_|
                KernelError::ParseError(format!("invalid height '{}'", h)))?;
            h.max(1) as u32
        }
        _ => width,
    };

    let (x, y) = match origin {
        Some(origin) => {
            let rest = &origin[1..];
            let (x_str, y_str) = rest.split_once('+').ok_or_else(||
                KernelError::ParseError(format!("malformed origin '{}'", origin)))?;

            let x: i64 = x_str.trim().parse().map_err(|_|
                KernelError::ParseError(format!("invalid origin x '{}'", x_str)))?;
            let y: i64 = y_str.trim().parse().map_err(|_|
                KernelError::ParseError(format!("invalid origin y '{}'", y_str)))?;

            crate::error::check_non_neg(x, "kernel origin x")?;
            crate::error::check_non_neg(y, "kernel origin y")?;

            (x as u32, y as u32)
        }
        None => ((width - 1) / 2, (height - 1) / 2),
    };

    if x >= width || y >= height {
        return Err(KernelError::ParseError(
            format!("origin ({}, {}) lies outside a {}x{} kernel", x, y, width, height)));
    }

    Ok((width, height, x, y))
}

/// Splits a cell list on `,` or whitespace and parses each token
fn parse_cells(body: &str) -> KernelResult<Vec<Cell>> {
    body.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_cell)
        .collect()
}

fn parse_cell(token: &str) -> KernelResult<Cell> {
    let token = token.strip_prefix('\'').unwrap_or(token);

    if token.eq_ignore_ascii_case("nan") || token == "-" {
        return Ok(Cell::Masked);
    }

    token.parse::<f64>()
        .map(Cell::Finite)
        .map_err(|_| KernelError::ParseError(format!("invalid kernel cell '{}'", token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_odd_square() {
        let k = parse_kernel_list("0,0,0,0,1,0,0,0,0").unwrap();
        assert_eq!((k.width, k.height, k.x, k.y), (3, 3, 1, 1));
    }

    #[test]
    fn legacy_rejects_non_square_count() {
        assert!(parse_kernel_list("1,2,3,4").is_err());
    }

    #[test]
    fn user_array_with_geometry() {
        let k = parse_kernel_list("3x3+1+1:0,0,0,0,1,0,0,0,0").unwrap();
        assert_eq!((k.width, k.height, k.x, k.y), (3, 3, 1, 1));
    }

    #[test]
    fn user_array_masked_cells() {
        let k = parse_kernel_list("3x1:1,-,nan").unwrap();
        assert!(k.cell(1, 0).is_masked());
        assert!(k.cell(2, 0).is_masked());
        assert_eq!(k.cell(0, 0).value(), Some(1.0));
    }

    #[test]
    fn user_array_missing_cells_is_error() {
        assert!(parse_kernel_list("3x3:1,2,3").is_err());
    }

    #[test]
    fn negative_origin_is_error() {
        assert!(parse_kernel_list("3x3+-1+0:1,1,1,1,1,1,1,1,1").is_err());
    }

    #[test]
    fn list_skips_empty_segments() {
        let k = parse_kernel_list("Unity;;Unity;").unwrap();
        assert_eq!(k.list_len(), 2);
    }

    #[test]
    fn named_with_args() {
        let k = parse_kernel_list("Diamond:1").unwrap();
        assert_eq!(k.width, 3);
        assert_eq!(k.height, 3);
    }

    #[test]
    fn unknown_name_is_error() {
        assert!(parse_kernel_list("NotAKernel").is_err());
    }
}

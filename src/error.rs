//! A module for morphology engine errors

use std::fmt;
use std::io;

/// Type alias for `Result<T, KernelError>`
pub type KernelResult<T> = Result<T, KernelError>;

/// Type alias for `Result<T, ImgIoError>`
pub type ImgIoResult<T> = Result<T, ImgIoError>;

/// An enum for kernel construction and morphology application errors
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// The kernel string did not match the grammar, or an argument was out of range
    ParseError(String),
    /// A generator was called with an invalid argument (e.g. non-positive `Rectangle` extents)
    InvalidArgError(String),
    /// A requested rotation does not apply to the kernel's shape (45 deg on non-3x3, 90 deg on
    /// a non-square, non-1D kernel)
    UnsupportedTransformError(String),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::ParseError(msg) => write!(f, "kernel parse error: {}", msg),
            KernelError::InvalidArgError(msg) => write!(f, "invalid kernel argument: {}", msg),
            KernelError::UnsupportedTransformError(msg) => write!(f, "unsupported kernel transform: {}", msg),
        }
    }
}

impl std::error::Error for KernelError {}

/// An enum for image i/o errors
#[derive(Debug)]
pub enum ImgIoError {
    UnsupportedFileFormatError(String),
    UnsupportedColorTypeError(String),
    IoError(io::Error),
    ImageReaderError(image::error::ImageError),
    OtherError(String),
}

impl fmt::Display for ImgIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImgIoError::UnsupportedFileFormatError(msg) => write!(f, "unsupported file format: {}", msg),
            ImgIoError::UnsupportedColorTypeError(msg) => write!(f, "unsupported color type: {}", msg),
            ImgIoError::IoError(err) => write!(f, "io error: {}", err),
            ImgIoError::ImageReaderError(err) => write!(f, "image decode/encode error: {}", err),
            ImgIoError::OtherError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ImgIoError {}

impl From<io::Error> for ImgIoError {
    fn from(err: io::Error) -> Self {
        ImgIoError::IoError(err)
    }
}

impl From<image::error::ImageError> for ImgIoError {
    fn from(err: image::error::ImageError) -> Self {
        ImgIoError::ImageReaderError(err)
    }
}

impl From<String> for ImgIoError {
    fn from(err: String) -> Self {
        ImgIoError::OtherError(err)
    }
}

pub(crate) fn check_xy(x: u32, y: u32, width: u32, height: u32) {
    if x >= width {
        panic!("index out of bounds: the width is {}, but the x index is {}", width, x)
    }
    if y >= height {
        panic!("index out of bounds: the height is {}, but the y index is {}", height, y)
    }
}

pub(crate) fn check_odd(val: usize, name: &str) -> KernelResult<()> {
    if val % 2 == 0 {
        return Err(KernelError::ParseError(format!("{} must be odd", name)));
    }

    Ok(())
}

pub(crate) fn check_square(val: u32, name: &str) -> KernelResult<()> {
    if !crate::util::is_perfect_square(val) {
        return Err(KernelError::ParseError(format!("{} must be a perfect square", name)));
    }

    Ok(())
}

pub(crate) fn check_non_neg(val: i64, name: &str) -> KernelResult<()> {
    if val < 0 {
        return Err(KernelError::ParseError(format!("{} must be non-negative", name)));
    }

    Ok(())
}

pub(crate) fn check_in_range(val: u32, min: u32, max: u32, name: &str) -> KernelResult<()> {
    if val < min || val > max {
        return Err(KernelError::InvalidArgError(
            format!("{} must be between {} and {} (got {})", name, min, max, val)));
    }

    Ok(())
}

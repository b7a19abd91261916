#![cfg(not(doctest))]
//! A module for image reading/writing
//!
//! This is ambient plumbing around the morphology engine, not part of it: the engine itself
//! only ever consumes an `Image`, never a file path.
//!
//! # Examples
//! ```rust
//! # use morphology_rs::error::ImgIoResult;
//! # use morphology_rs::image::BaseImage;
//! #
//! # fn main() -> ImgIoResult<()> {
//! // Read an image from a path
//! let img = morphology_rs::io::read("path/to/image.png")?;
//!
//! // Print the image information
//! println!("{}", img.info());
//!
//! // Write the image to a path as a PNG
//! morphology_rs::io::write(&img, "path/to/save_image.png")?;
//! # Ok(())
//! # }
//! ```

pub use self::io::*;

mod io;

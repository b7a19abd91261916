use crate::error::{ImgIoError, ImgIoResult};
use crate::image::Image;

use image::{DynamicImage, GenericImageView};

/// Reads an image from a file path into an `Image<u8>`
///
/// The number of channels in the returned image depends on the source image's colour type: RGB
/// images have 3 channels, RGBA images have 4.
pub fn read(path: &str) -> ImgIoResult<Image<u8>> {
    let dynamic = image::open(path)?;
    log::debug!("read {}: {:?}", path, dynamic.color());

    let (width, height) = dynamic.dimensions();

    match dynamic {
        DynamicImage::ImageRgb8(buf) => Ok(Image::from_vec(width, height, 3, false, buf.into_raw())),
        DynamicImage::ImageRgba8(buf) => Ok(Image::from_vec(width, height, 4, true, buf.into_raw())),
        other => {
            let buf = other.to_rgba8();
            Ok(Image::from_vec(width, height, 4, true, buf.into_raw()))
        }
    }
}

/// Writes an `Image<u8>` to a file path, inferring the output format from the extension
pub fn write(img: &Image<u8>, path: &str) -> ImgIoResult<()> {
    let (width, height, channels, alpha) = img.info().whca();

    let dynamic = match (channels, alpha) {
        (3, false) => {
            let buf = image::RgbImage::from_raw(width, height, img.data().to_vec())
                .ok_or_else(|| ImgIoError::OtherError("buffer size mismatch".to_string()))?;
            DynamicImage::ImageRgb8(buf)
        }
        (4, true) => {
            let buf = image::RgbaImage::from_raw(width, height, img.data().to_vec())
                .ok_or_else(|| ImgIoError::OtherError("buffer size mismatch".to_string()))?;
            DynamicImage::ImageRgba8(buf)
        }
        (1, false) => {
            let buf = image::GrayImage::from_raw(width, height, img.data().to_vec())
                .ok_or_else(|| ImgIoError::OtherError("buffer size mismatch".to_string()))?;
            DynamicImage::ImageLuma8(buf)
        }
        (c, a) => return Err(ImgIoError::UnsupportedColorTypeError(
            format!("{} channels, alpha={}", c, a))),
    };

    dynamic.save(path)?;
    log::debug!("wrote {}", path);

    Ok(())
}

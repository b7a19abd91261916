use crate::image::Image;

impl From<Image<u8>> for Image<f64> {
    fn from(img: Image<u8>) -> Image<f64> {
        img.map_channels(|channel| channel as f64)
    }
}

impl From<Image<f64>> for Image<u8> {
    fn from(img: Image<f64>) -> Image<u8> {
        img.map_channels(|channel| channel.round().clamp(0.0, 255.0) as u8)
    }
}

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::fetch::FetchError;
use crate::resource::ResourcePath;

/// Decode a response body as an image. The format is sniffed from the bytes.
pub fn decode_image(path: &ResourcePath, body: &[u8]) -> Result<DynamicImage, FetchError> {
    image::load_from_memory(body).map_err(|e| FetchError::Decode {
        path: path.clone(),
        reason: e.to_string(),
    })
}

/// Decode a response body as UTF-8 text.
pub fn decode_text(path: &ResourcePath, body: Vec<u8>) -> Result<String, FetchError> {
    String::from_utf8(body).map_err(|e| FetchError::Decode {
        path: path.clone(),
        reason: format!("invalid UTF-8: {e}"),
    })
}

/// Encode an image as JPEG.
///
/// JPEG has no alpha channel and no 16-bit depth, so the image is flattened
/// to 8-bit RGB first.
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}

//! Image preparation before upload: size bounding and JPEG re-encoding.

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageEncoder};
use tracing::debug;

use voisinage_core::{Error, Result};

/// An image ready to embed in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl PreparedImage {
    /// `data:` URL carrying the base64-encoded bytes.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!("data:{};base64,{}", self.mime_type, encoded)
    }
}

/// Fit `(width, height)` inside a `max_dimension` square, keeping the ratio.
pub fn bounded_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }
    let scale = max_dimension as f64 / width.max(height) as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Decode an uploaded image, shrink it to fit `max_dimension`, and re-encode
/// it as JPEG at `quality`.
pub fn prepare_image(bytes: &[u8], max_dimension: u32, quality: u8) -> Result<PreparedImage> {
    if bytes.is_empty() {
        return Err(Error::InvalidInput("image is empty".to_string()));
    }
    let detected = infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");
    if !detected.starts_with("image/") {
        return Err(Error::InvalidInput(format!(
            "expected an image, got {}",
            detected
        )));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| Error::InvalidInput(format!("image decode failed: {}", e)))?;
    let (width, height) = decoded.dimensions();
    let (target_w, target_h) = bounded_size(width, height, max_dimension.max(1));

    let resized = if (target_w, target_h) == (width, height) {
        decoded
    } else {
        decoded.resize(target_w, target_h, FilterType::Triangle)
    };

    let rgb = resized.to_rgb8();
    let mut data = Vec::new();
    JpegEncoder::new_with_quality(&mut data, quality.clamp(1, 100))
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ColorType::Rgb8.into(),
        )
        .map_err(|e| Error::Internal(format!("JPEG encoding failed: {}", e)))?;

    debug!(
        subsystem = "inference",
        component = "image_prep",
        source_mime = detected,
        source_width = width,
        source_height = height,
        width = rgb.width(),
        height = rgb.height(),
        input_bytes = bytes.len(),
        output_bytes = data.len(),
        "Image prepared for analysis"
    );

    Ok(PreparedImage {
        data,
        mime_type: "image/jpeg".to_string(),
        width: rgb.width(),
        height: rgb.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_bounded_size_keeps_small_images() {
        assert_eq!(bounded_size(800, 600, 1024), (800, 600));
    }

    #[test]
    fn test_bounded_size_scales_longest_side() {
        assert_eq!(bounded_size(4000, 3000, 1024), (1024, 768));
        assert_eq!(bounded_size(3000, 4000, 1024), (768, 1024));
        assert_eq!(bounded_size(5000, 1, 100), (100, 1));
    }

    #[test]
    fn test_prepare_downscales_and_reencodes() {
        let prepared = prepare_image(&png_bytes(300, 150), 100, 80).unwrap();
        assert_eq!(prepared.mime_type, "image/jpeg");
        assert_eq!((prepared.width, prepared.height), (100, 50));
        assert_eq!(infer::get(&prepared.data).unwrap().mime_type(), "image/jpeg");
    }

    #[test]
    fn test_prepare_keeps_dimensions_when_small() {
        let prepared = prepare_image(&png_bytes(40, 30), 1024, 80).unwrap();
        assert_eq!((prepared.width, prepared.height), (40, 30));
    }

    #[test]
    fn test_prepare_rejects_non_images() {
        let err = prepare_image(b"%PDF-1.4 not an image", 1024, 80).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(matches!(
            prepare_image(&[], 1024, 80),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_data_url_format() {
        let prepared = PreparedImage {
            data: vec![1, 2, 3],
            mime_type: "image/jpeg".to_string(),
            width: 1,
            height: 1,
        };
        assert_eq!(prepared.to_data_url(), "data:image/jpeg;base64,AQID");
    }
}

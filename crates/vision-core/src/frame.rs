//! Owned BGR frame buffers.
//!
//! Frame sources deliver rasters in BGR byte order. A `BgrFrame` owns
//! its pixel data outright; detection, display, and storage paths each
//! borrow or clone it explicitly instead of sharing a mutable image.

use std::path::Path;

use image::RgbImage;

use kinetrack_common::error::{KinetrackError, KinetrackResult};

/// An owned raster frame in BGR byte order, 8 bits per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgrFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BgrFrame {
    /// Create a zeroed (black) frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 3) as usize],
        }
    }

    /// Wrap raw BGR bytes, validating the buffer length.
    pub fn from_bgr_data(width: u32, height: u32, data: Vec<u8>) -> KinetrackResult<Self> {
        let expected = (width * height * 3) as usize;
        if data.len() != expected {
            return Err(KinetrackError::capture(format!(
                "BGR buffer length {} does not match {}x{} frame (expected {})",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw BGR bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The `[b, g, r]` triple at pixel (x, y).
    pub fn bgr_at(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Overwrite the pixel at (x, y) with a `[b, g, r]` triple.
    pub fn set_bgr(&mut self, x: u32, y: u32, bgr: [u8; 3]) {
        let idx = ((y * self.width + x) * 3) as usize;
        self.data[idx..idx + 3].copy_from_slice(&bgr);
    }

    /// Convert to an RGB image (channel swap at the boundary).
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut img = RgbImage::new(self.width, self.height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let [b, g, r] = self.bgr_at(x, y);
            *pixel = image::Rgb([r, g, b]);
        }
        img
    }

    /// Build a frame from an RGB image.
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let mut frame = Self::new(img.width(), img.height());
        for (x, y, pixel) in img.enumerate_pixels() {
            let image::Rgb([r, g, b]) = *pixel;
            frame.set_bgr(x, y, [b, g, r]);
        }
        frame
    }

    /// Load a frame from a PNG (or any format the image crate decodes).
    pub fn load(path: impl AsRef<Path>) -> KinetrackResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KinetrackError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let img = image::open(path)
            .map_err(|e| KinetrackError::capture(format!("failed to decode {}: {e}", path.display())))?
            .to_rgb8();
        Ok(Self::from_rgb_image(&img))
    }

    /// Save the frame as a PNG.
    pub fn save(&self, path: impl AsRef<Path>) -> KinetrackResult<()> {
        let path = path.as_ref();
        self.to_rgb_image()
            .save(path)
            .map_err(|e| KinetrackError::render(format!("failed to write {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_is_black() {
        let frame = BgrFrame::new(4, 3);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.bgr_at(2, 1), [0, 0, 0]);
    }

    #[test]
    fn test_from_bgr_data_validates_length() {
        assert!(BgrFrame::from_bgr_data(2, 2, vec![0; 12]).is_ok());
        assert!(BgrFrame::from_bgr_data(2, 2, vec![0; 11]).is_err());
    }

    #[test]
    fn test_rgb_conversion_swaps_channels() {
        let mut frame = BgrFrame::new(2, 1);
        frame.set_bgr(0, 0, [255, 0, 0]); // pure blue in BGR

        let img = frame.to_rgb_image();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255]);

        let back = BgrFrame::from_rgb_image(&img);
        assert_eq!(back, frame);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("kinetrack_test_frame");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let mut frame = BgrFrame::new(8, 8);
        frame.set_bgr(3, 4, [10, 20, 30]);
        let path = dir.join("frame.png");
        frame.save(&path).unwrap();

        let loaded = BgrFrame::load(&path).unwrap();
        assert_eq!(loaded, frame);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_is_distinct_error() {
        let result = BgrFrame::load("/nonexistent/kinetrack/frame.png");
        assert!(matches!(
            result,
            Err(KinetrackError::FileNotFound { .. })
        ));
    }
}

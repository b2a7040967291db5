//! Outpaint compositor
//!
//! Prepares an image for directional extension: allocates a canvas twice the
//! size of the original along the requested axis, draws the original into one
//! half, and leaves the other half fully transparent. The remote model fills
//! the transparent region; no pixel synthesis happens here.

use std::io::Cursor;

use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::gateway::EncodedImage;

/// Largest canvas edge the compositor will allocate
pub const MAX_CANVAS_DIM: u32 = 16_384;

/// Which edge of the image to extend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    /// Where the original content sits on the extension canvas,
    /// phrased for the remote model
    pub fn position_description(&self) -> &'static str {
        match self {
            Self::Top => "at the bottom half",
            Self::Bottom => "at the top half",
            Self::Left => "in the right half",
            Self::Right => "in the left half",
        }
    }

    /// Parse from a lowercase name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        };
        write!(f, "{}", name)
    }
}

/// A composite ready to hand to the gateway's extend operation
#[derive(Debug, Clone)]
pub struct ExtensionCanvas {
    /// PNG-encoded double-size canvas with the original in one half
    pub composite: EncodedImage,
    /// Where the original content sits, phrased for the remote model
    pub position_description: &'static str,
}

/// Composite `image` onto a double-size transparent canvas for extension
///
/// Purely local and synchronous; fails before any network call is attempted.
pub fn prepare_extension(image: &EncodedImage, direction: Direction) -> Result<ExtensionCanvas> {
    let decoded = image::load_from_memory(&image.data)
        .map_err(|e| Error::ImageDecode(e.to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());

    let (canvas_width, canvas_height, offset_x, offset_y) = match direction {
        Direction::Top => (width, double(height)?, 0i64, height as i64),
        Direction::Bottom => (width, double(height)?, 0, 0),
        Direction::Left => (double(width)?, height, width as i64, 0),
        Direction::Right => (double(width)?, height, 0, 0),
    };

    if canvas_width > MAX_CANVAS_DIM || canvas_height > MAX_CANVAS_DIM {
        return Err(Error::CanvasAllocation(format!(
            "{}x{} exceeds the {} pixel limit",
            canvas_width, canvas_height, MAX_CANVAS_DIM
        )));
    }

    debug!(
        %direction,
        original_width = width,
        original_height = height,
        canvas_width,
        canvas_height,
        "Compositing extension canvas"
    );

    // A fresh RgbaImage is zero-initialized, so the new half is transparent.
    let mut canvas = RgbaImage::new(canvas_width, canvas_height);
    image::imageops::overlay(&mut canvas, &decoded.to_rgba8(), offset_x, offset_y);

    let mut output = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut output, image::ImageFormat::Png)
        .map_err(|e| Error::CanvasAllocation(format!("failed to encode canvas: {}", e)))?;

    Ok(ExtensionCanvas {
        composite: EncodedImage::new(output.into_inner(), "image/png"),
        position_description: direction.position_description(),
    })
}

fn double(dim: u32) -> Result<u32> {
    dim.checked_mul(2).ok_or_else(|| {
        Error::CanvasAllocation(format!("doubling {} overflows canvas dimensions", dim))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    /// A solid red WxH PNG
    fn red_image(width: u32, height: u32) -> EncodedImage {
        let canvas = RgbaImage::from_pixel(width, height, RED);
        let mut output = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut output, image::ImageFormat::Png)
            .unwrap();
        EncodedImage::new(output.into_inner(), "image/png")
    }

    fn decode(canvas: &ExtensionCanvas) -> DynamicImage {
        image::load_from_memory(&canvas.composite.data).unwrap()
    }

    #[test]
    fn test_extend_top_places_original_in_bottom_half() {
        let canvas = prepare_extension(&red_image(4, 2), Direction::Top).unwrap();
        assert_eq!(canvas.position_description, "at the bottom half");

        let img = decode(&canvas);
        assert_eq!(img.dimensions(), (4, 4));
        // new region transparent, original below it
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(0, 2), RED);
    }

    #[test]
    fn test_extend_bottom_places_original_in_top_half() {
        let canvas = prepare_extension(&red_image(4, 2), Direction::Bottom).unwrap();
        assert_eq!(canvas.position_description, "at the top half");

        let img = decode(&canvas);
        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.get_pixel(0, 0), RED);
        assert_eq!(img.get_pixel(0, 3)[3], 0);
    }

    #[test]
    fn test_extend_left_places_original_in_right_half() {
        let canvas = prepare_extension(&red_image(4, 2), Direction::Left).unwrap();
        assert_eq!(canvas.position_description, "in the right half");

        let img = decode(&canvas);
        assert_eq!(img.dimensions(), (8, 2));
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(4, 0), RED);
    }

    #[test]
    fn test_extend_right_places_original_in_left_half() {
        let canvas = prepare_extension(&red_image(4, 2), Direction::Right).unwrap();
        assert_eq!(canvas.position_description, "in the left half");

        let img = decode(&canvas);
        assert_eq!(img.dimensions(), (8, 2));
        assert_eq!(img.get_pixel(0, 0), RED);
        assert_eq!(img.get_pixel(7, 1)[3], 0);
    }

    #[test]
    fn test_composite_is_png() {
        let canvas = prepare_extension(&red_image(2, 2), Direction::Top).unwrap();
        assert_eq!(canvas.composite.mime_type, "image/png");
    }

    #[test]
    fn test_undecodable_image_is_rejected() {
        let bogus = EncodedImage::new(vec![0, 1, 2, 3], "image/png");
        let err = prepare_extension(&bogus, Direction::Top).unwrap_err();
        assert!(matches!(err, Error::ImageDecode(_)));
    }

    #[test]
    fn test_oversized_canvas_is_rejected() {
        // 1x10000 doubles to 1x20000, past the canvas limit
        let tall = red_image(1, 10_000);
        let err = prepare_extension(&tall, Direction::Top).unwrap_err();
        assert!(matches!(err, Error::CanvasAllocation(_)));
    }

    #[test]
    fn test_direction_parse_and_display() {
        for name in ["top", "bottom", "left", "right"] {
            let direction = Direction::parse(name).unwrap();
            assert_eq!(direction.to_string(), name);
        }
        assert!(Direction::parse("diagonal").is_none());
    }
}

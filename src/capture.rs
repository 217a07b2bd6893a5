/*!
 * Capture source contract.
 *
 * Screen and window grabbing are external collaborators; the pipeline only
 * depends on this trait. The one concrete source shipped here loads an
 * imported image file from disk.
 */

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use image::DynamicImage;

use crate::errors::CaptureError;
use crate::preprocess::CropRect;

/// Screen region in absolute corner coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Region {
    /// Create a region; corners may be given in any order
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Convert to the crop rectangle the preprocessor consumes
    pub fn to_crop_rect(&self) -> CropRect {
        CropRect {
            x: self.x1,
            y: self.y1,
            width: self.x2 - self.x1,
            height: self.y2 - self.y1,
        }
    }
}

impl std::str::FromStr for Region {
    type Err = anyhow::Error;

    /// Parse "x1,y1,x2,y2"
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(anyhow!("Expected region as x1,y1,x2,y2, got: {}", s));
        }
        let mut coords = [0u32; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| anyhow!("Invalid region coordinate: {}", part))?;
        }
        Ok(Self::new(coords[0], coords[1], coords[2], coords[3]))
    }
}

/// Produces one image per capture request
pub trait CaptureSource: Send + Sync {
    /// Capture and decode the image
    fn capture(&self) -> Result<DynamicImage, CaptureError>;
}

/// Capture source backed by an image file on disk (file-import flow)
pub struct FileCaptureSource {
    path: PathBuf,
}

impl FileCaptureSource {
    /// Create a source for the given image file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CaptureSource for FileCaptureSource {
    fn capture(&self) -> Result<DynamicImage, CaptureError> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            CaptureError::Failed(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        image::load_from_memory(&bytes).map_err(|e| CaptureError::ImageDecode(e.to_string()))
    }
}

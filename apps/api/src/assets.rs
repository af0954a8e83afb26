//! Static asset lookup by logical name.
//!
//! Assets live in a configured directory; `header` resolves to the first of
//! `header.jpg`, `header.jpeg`, `header.png` that exists. Images are decoded
//! once at startup and shared by every render.

use std::path::{Path, PathBuf};

use image::{ColorType, GenericImageView, ImageFormat};
use lopdf::{dictionary, Stream};
use tracing::{info, warn};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Clone)]
enum ImageData {
    /// Baseline RGB JPEG, embedded as-is with DCTDecode.
    Jpeg(Vec<u8>),
    /// Decoded 8-bit RGB samples.
    Rgb(Vec<u8>),
}

/// A decoded image ready to embed as a PDF XObject.
#[derive(Debug, Clone)]
pub struct HeaderImage {
    pub pixel_width: u32,
    pub pixel_height: u32,
    data: ImageData,
}

impl HeaderImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, image::ImageError> {
        let format = image::guess_format(&bytes)?;
        let img = image::load_from_memory_with_format(&bytes, format)?;
        let (pixel_width, pixel_height) = img.dimensions();

        let data = if format == ImageFormat::Jpeg && img.color() == ColorType::Rgb8 {
            ImageData::Jpeg(bytes)
        } else {
            ImageData::Rgb(img.to_rgb8().into_raw())
        };

        Ok(Self {
            pixel_width,
            pixel_height,
            data,
        })
    }

    #[cfg(test)]
    pub fn from_rgb(pixel_width: u32, pixel_height: u32, samples: Vec<u8>) -> Self {
        Self {
            pixel_width,
            pixel_height,
            data: ImageData::Rgb(samples),
        }
    }

    /// Height divided by width.
    pub fn aspect_ratio(&self) -> f32 {
        if self.pixel_width == 0 {
            return 0.0;
        }
        self.pixel_height as f32 / self.pixel_width as f32
    }

    pub fn to_xobject(&self) -> Stream {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.pixel_width as i64,
            "Height" => self.pixel_height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        match &self.data {
            ImageData::Jpeg(bytes) => {
                dict.set("Filter", "DCTDecode");
                Stream::new(dict, bytes.clone())
            }
            ImageData::Rgb(samples) => Stream::new(dict, samples.clone()),
        }
    }
}

/// Resolves logical asset names against a root directory.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    root: PathBuf,
}

impl AssetCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// First existing `{root}/{name}.{ext}` for the known image extensions.
    pub fn resolve_image(&self, name: &str) -> Option<PathBuf> {
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{name}.{ext}")))
            .find(|p| p.is_file())
    }

    /// Loads the named image. A missing or unreadable asset is logged and
    /// yields `None`; documents then render without it.
    pub fn load_image(&self, name: &str) -> Option<HeaderImage> {
        let Some(path) = self.resolve_image(name) else {
            warn!(
                "Image asset '{name}' not found under {}; rendering without it",
                self.root.display()
            );
            return None;
        };
        match read_image(&path) {
            Ok(image) => {
                info!(
                    "Loaded image asset '{name}' from {} ({}x{})",
                    path.display(),
                    image.pixel_width,
                    image.pixel_height
                );
                Some(image)
            }
            Err(e) => {
                warn!("Failed to load image asset {}: {e}", path.display());
                None
            }
        }
    }
}

fn read_image(path: &Path) -> anyhow::Result<HeaderImage> {
    let bytes = std::fs::read(path)?;
    Ok(HeaderImage::from_bytes(bytes)?)
}

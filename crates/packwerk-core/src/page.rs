// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The page value type: a decoded bitmap plus display metadata.

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{PackwerkError, Result};

/// File extensions accepted as loose page images.
pub const SUPPORTED_IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tiff", "gif"];

/// File extensions accepted as page archives.
pub const SUPPORTED_ARCHIVE_EXTS: &[&str] = &["zip", "cbz"];

/// File extension accepted as a PDF document.
pub const SUPPORTED_PDF_EXT: &str = "pdf";

/// Original codec of a decoded page.
///
/// Retained for display only; export always re-encodes to JPEG regardless
/// of the source codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
    Gif,
}

impl SourceFormat {
    /// Human-readable codec tag for listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Gif => "gif",
        }
    }

    /// Infer the codec from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Map from the `image` crate's format enum.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::WebP => Some(Self::WebP),
            image::ImageFormat::Bmp => Some(Self::Bmp),
            image::ImageFormat::Tiff => Some(Self::Tiff),
            image::ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single page: an exclusively owned decoded bitmap plus metadata.
///
/// `Clone` performs a deep pixel copy; `DynamicImage` buffers are owned
/// `Vec`s, so two pages never alias the same pixel data.
#[derive(Debug, Clone)]
pub struct Page {
    /// Hint filename stem (extension stripped), used for listing and
    /// re-export naming.
    display_name: String,
    /// The decoded bitmap.
    image: DynamicImage,
    /// Original codec tag, display only.
    source_format: SourceFormat,
}

impl Page {
    /// Wrap a decoded bitmap as a page.
    ///
    /// Fails with `DecodeFailed` if the bitmap has a zero dimension; no
    /// partially-built page is ever exposed.
    pub fn new(
        display_name: impl Into<String>,
        image: DynamicImage,
        source_format: SourceFormat,
    ) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(PackwerkError::DecodeFailed(
                "decoded image has a zero dimension".to_string(),
            ));
        }
        Ok(Self {
            display_name: display_name.into(),
            image,
            source_format,
        })
    }

    /// A blank white filler page, for inserting spacers between imports.
    pub fn placeholder() -> Self {
        let blank = RgbImage::from_pixel(600, 800, image::Rgb([255, 255, 255]));
        Self {
            display_name: "blank".to_string(),
            image: DynamicImage::ImageRgb8(blank),
            source_format: SourceFormat::Png,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn source_format(&self) -> SourceFormat {
        self.source_format
    }

    /// Page width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Page height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the decoded bitmap.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Replace the display name, keeping the bitmap.
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    /// Swap in a replacement bitmap.
    ///
    /// Used by the in-place transforms (rotate, cut): the new buffer is
    /// constructed first and swapped in whole, never partially written.
    pub fn replace_image(&mut self, image: DynamicImage) {
        self.image = image;
    }
}

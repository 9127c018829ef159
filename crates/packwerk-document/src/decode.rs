// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Byte decoder: codec sniffing, decoding, and JPEG EXIF orientation
// correction.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;
use tracing::{debug, instrument, warn};

use packwerk_core::{PackwerkError, Page, Result, SourceFormat};

/// Decode raw bytes into a [`Page`].
///
/// The codec is probed from the byte header before committing to a full
/// decode: unrecognized codecs fail with `UnsupportedFormat`, recognized
/// codecs with corrupt payloads fail with `DecodeFailed`. JPEG input gets
/// its EXIF orientation baked into the returned pixel buffer; the other
/// codecs carry no orientation metadata.
///
/// `hint_name` is a filename-like hint; its stem (extension stripped)
/// becomes the page's display name. Container readers supply synthetic
/// hints for entries without a real filesystem path.
#[instrument(skip(bytes), fields(bytes_len = bytes.len(), hint_name))]
pub fn decode_page(bytes: &[u8], hint_name: &str) -> Result<Page> {
    let format = image::guess_format(bytes).map_err(|_| {
        PackwerkError::UnsupportedFormat(format!("{hint_name}: unrecognized image header"))
    })?;
    let source_format = SourceFormat::from_image_format(format).ok_or_else(|| {
        PackwerkError::UnsupportedFormat(format!("{hint_name}: {format:?} is not a page codec"))
    })?;

    let mut decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|err| PackwerkError::DecodeFailed(format!("{hint_name}: {err}")))?;

    if source_format == SourceFormat::Jpeg {
        decoded = apply_exif_orientation(bytes, decoded);
    }

    debug!(
        width = decoded.width(),
        height = decoded.height(),
        format = %source_format,
        "page decoded"
    );

    Page::new(display_stem(hint_name), decoded, source_format)
}

/// Strip the extension from a filename-like hint.
fn display_stem(hint: &str) -> String {
    Path::new(hint)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| hint.to_string())
}

/// Bake the EXIF orientation (tags 1-8) into the pixel buffer.
///
/// Most JPEGs carry no EXIF segment at all; that case and unreadable
/// metadata both leave the image untouched.
fn apply_exif_orientation(bytes: &[u8], image: DynamicImage) -> DynamicImage {
    let mut cursor = Cursor::new(bytes);
    let Ok(metadata) = exif::Reader::new().read_from_container(&mut cursor) else {
        return image;
    };

    let orientation = metadata
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(1);

    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        other => {
            if other != 1 {
                warn!(orientation = other, "unknown EXIF orientation, ignoring");
            }
            image
        }
    }
}

/// Whether an import batch may skip past this error and continue with the
/// remaining entries.
pub(crate) fn is_per_entry_error(err: &PackwerkError) -> bool {
    matches!(
        err,
        PackwerkError::UnsupportedFormat(_) | PackwerkError::DecodeFailed(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([120, 130, 140]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_png_and_strips_extension() {
        let page = decode_page(&png_bytes(3, 2), "photo.png").unwrap();
        assert_eq!(page.display_name(), "photo");
        assert_eq!(page.source_format(), SourceFormat::Png);
        assert_eq!((page.width(), page.height()), (3, 2));
    }

    #[test]
    fn hint_without_extension_is_kept_whole() {
        let page = decode_page(&png_bytes(1, 1), "03_10").unwrap();
        assert_eq!(page.display_name(), "03_10");
    }

    #[test]
    fn unrecognized_header_is_unsupported() {
        let err = decode_page(b"not an image at all", "junk.bin").unwrap_err();
        assert!(matches!(err, PackwerkError::UnsupportedFormat(_)));
    }

    #[test]
    fn recognized_header_with_corrupt_payload_fails_decode() {
        // Valid PNG signature followed by garbage.
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x00, 0x00, 0x00]);
        let err = decode_page(&bytes, "broken.png").unwrap_err();
        assert!(matches!(err, PackwerkError::DecodeFailed(_)));
    }

    #[test]
    fn jpeg_decodes_with_format_tag() {
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let page = decode_page(&jpeg_bytes(img), "scan.jpeg").unwrap();
        assert_eq!(page.source_format(), SourceFormat::Jpeg);
        assert_eq!(page.display_name(), "scan");
    }

    fn jpeg_bytes(img: RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    /// Splice an APP1 segment holding a single-entry little-endian TIFF IFD
    /// with the given Orientation value right after the SOI marker.
    fn with_orientation(jpeg: &[u8], orientation: u8) -> Vec<u8> {
        let tiff: &[u8] = &[
            0x49, 0x49, 0x2A, 0x00, // "II" byte order, TIFF magic
            0x08, 0x00, 0x00, 0x00, // offset of IFD0
            0x01, 0x00, // one IFD entry
            0x12, 0x01, // tag 0x0112, Orientation
            0x03, 0x00, // type SHORT
            0x01, 0x00, 0x00, 0x00, // count 1
            orientation, 0x00, 0x00, 0x00, // value, padded
            0x00, 0x00, 0x00, 0x00, // no next IFD
        ];

        let mut app1 = vec![0xFF, 0xE1];
        let len = (2 + 6 + tiff.len()) as u16;
        app1.extend_from_slice(&len.to_be_bytes());
        app1.extend_from_slice(b"Exif\0\0");
        app1.extend_from_slice(tiff);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn exif_rotation_orientation_swaps_dimensions() {
        // Orientation 6: stored rotated, corrected by a 90 degree turn.
        let img = RgbImage::from_pixel(6, 2, Rgb([80, 80, 80]));
        let bytes = with_orientation(&jpeg_bytes(img), 6);

        let page = decode_page(&bytes, "sideways.jpg").unwrap();
        assert_eq!((page.width(), page.height()), (2, 6));
    }

    #[test]
    fn exif_mirror_orientation_flips_pixels() {
        // Left half black, right half white, aligned to the 8x8 JPEG block
        // grid so the halves survive the lossy round trip cleanly.
        let mut img = RgbImage::from_pixel(16, 8, Rgb([0, 0, 0]));
        for y in 0..8 {
            for x in 8..16 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let bytes = with_orientation(&jpeg_bytes(img), 2);

        // Orientation 2: stored mirrored, corrected by a horizontal flip,
        // so the white half ends up on the left.
        let page = decode_page(&bytes, "mirrored.jpg").unwrap();
        let rgb = page.image().to_rgb8();
        assert!(rgb.get_pixel(0, 0).0[0] > 128);
        assert!(rgb.get_pixel(15, 0).0[0] < 128);
    }

    #[test]
    fn default_exif_orientation_changes_nothing() {
        let img = RgbImage::from_pixel(6, 2, Rgb([80, 80, 80]));
        let bytes = with_orientation(&jpeg_bytes(img), 1);

        let page = decode_page(&bytes, "upright.jpg").unwrap();
        assert_eq!((page.width(), page.height()), (6, 2));
    }
}

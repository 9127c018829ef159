// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Import orchestrator: source dispatch by extension or directory-ness.

use std::fs::{self, File};
use std::io::{BufReader, Cursor};
use std::path::Path;

use tracing::{info, instrument};

use packwerk_core::{
    PackwerkError, Page, Result, SUPPORTED_ARCHIVE_EXTS, SUPPORTED_IMAGE_EXTS, SUPPORTED_PDF_EXT,
};

use crate::archive::read_zip;
use crate::decode::decode_page;
use crate::directory::read_directory;
use crate::export::extension_lower;
use crate::pdf::reader::read_pdf;

/// Import pages from a filesystem path.
///
/// Dispatch: a directory is enumerated non-recursively; `.zip`/`.cbz` go
/// to the archive reader; `.pdf` to the PDF reader; a supported image
/// extension is decoded as a single page. Anything else fails with
/// `UnsupportedFormat`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn import_path(path: impl AsRef<Path>) -> Result<Vec<Page>> {
    let path = path.as_ref();

    if path.is_dir() {
        return read_directory(path);
    }

    let ext = extension_lower(path).ok_or_else(|| {
        PackwerkError::UnsupportedFormat(format!("{}: no file extension", path.display()))
    })?;

    let pages = if SUPPORTED_ARCHIVE_EXTS.contains(&ext.as_str()) {
        let file = File::open(path)?;
        read_zip(BufReader::new(file))?
    } else if ext == SUPPORTED_PDF_EXT {
        let bytes = fs::read(path)?;
        read_pdf(&bytes)?
    } else if SUPPORTED_IMAGE_EXTS.contains(&ext.as_str()) {
        let bytes = fs::read(path)?;
        let hint = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        vec![decode_page(&bytes, &hint)?]
    } else {
        return Err(PackwerkError::UnsupportedFormat(format!(
            "{}: .{ext} is not an importable source",
            path.display()
        )));
    };

    info!(count = pages.len(), "import complete");
    Ok(pages)
}

/// Import pages from an in-memory byte source.
///
/// For container entries, clipboard drops, and other sources without a
/// real filesystem path; `filename` drives the same extension dispatch as
/// [`import_path`].
#[instrument(skip(bytes), fields(bytes_len = bytes.len(), filename))]
pub fn import_bytes(bytes: &[u8], filename: &str) -> Result<Vec<Page>> {
    let ext = extension_lower(Path::new(filename)).unwrap_or_default();

    if SUPPORTED_ARCHIVE_EXTS.contains(&ext.as_str()) {
        return read_zip(Cursor::new(bytes));
    }
    if ext == SUPPORTED_PDF_EXT {
        return read_pdf(bytes);
    }

    // Fall through to the decoder: the header sniff decides, not the name.
    Ok(vec![decode_page(bytes, filename)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([120, 130, 140]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn single_image_path_imports_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("panel.png");
        fs::write(&file, png_bytes(2, 3)).unwrap();

        let pages = import_path(&file).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].display_name(), "panel");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, b"hello").unwrap();

        let err = import_path(&file).unwrap_err();
        assert!(matches!(err, PackwerkError::UnsupportedFormat(_)));
    }

    #[test]
    fn directory_path_dispatches_to_directory_reader() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.png"), png_bytes(2, 2)).unwrap();
        fs::write(dir.path().join("y.png"), png_bytes(2, 2)).unwrap();

        let pages = import_path(dir.path()).unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn bytes_import_decodes_loose_images_by_header() {
        let pages = import_bytes(&png_bytes(2, 2), "drop.png").unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].display_name(), "drop");
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory reader: non-recursive page import from a folder of images.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use packwerk_core::{Page, Result};

use crate::decode::{decode_page, is_per_entry_error};

/// Read every image file directly inside `path`, non-recursively.
///
/// Subdirectories are skipped, not descended. Entries are decoded in file
/// name order, which keeps the result deterministic across platforms (OS
/// directory enumeration order is not). Files that fail to decode are
/// logged and skipped; a failure to enumerate or read is fatal.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_directory(path: impl AsRef<Path>) -> Result<Vec<Page>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(path.as_ref())? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();

    let mut pages = Vec::with_capacity(files.len());
    for file in &files {
        let bytes = fs::read(file)?;
        let hint = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match decode_page(&bytes, &hint) {
            Ok(page) => pages.push(page),
            Err(err) if is_per_entry_error(&err) => {
                warn!(file = %file.display(), %err, "skipping undecodable file");
            }
            Err(err) => return Err(err),
        }
    }

    debug!(count = pages.len(), "directory read");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([120, 130, 140]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn reads_files_in_name_order_skipping_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.png"), png_bytes(2, 2)).unwrap();
        fs::write(dir.path().join("a.png"), png_bytes(2, 2)).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.png"), png_bytes(2, 2)).unwrap();

        let pages = read_directory(dir.path()).unwrap();
        let names: Vec<&str> = pages.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn undecodable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.png"), png_bytes(2, 2)).unwrap();
        fs::write(dir.path().join("notes.txt"), b"plain text").unwrap();

        let pages = read_directory(dir.path()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].display_name(), "good");
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert!(read_directory(&gone).is_err());
    }
}

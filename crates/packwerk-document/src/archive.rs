// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Zip/CBZ container reader and writer.

use std::io::{Read, Seek, Write};
use std::path::Path;

use tracing::{debug, instrument, warn};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use packwerk_core::{ExportOptions, PackwerkError, Page, Result, SUPPORTED_IMAGE_EXTS};

use crate::decode::{decode_page, is_per_entry_error};
use crate::digits::{count_digits, zero_padded};
use crate::export::encode_jpeg_into;

/// Read every supported page image out of a zip/cbz archive.
///
/// Entries are processed in the archive's central-directory order.
/// Directory entries and entries with unsupported extensions are skipped.
/// Internal path separators are flattened to `_` before the entry name is
/// used as the decoder hint, so nested folder structures cannot collide
/// with flat names. Undecodable entries are logged and skipped; a malformed
/// archive is fatal.
#[instrument(skip_all)]
pub fn read_zip<R: Read + Seek>(reader: R) -> Result<Vec<Page>> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|err| PackwerkError::ContainerCorrupt(format!("not a readable zip: {err}")))?;

    let mut pages = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| PackwerkError::ContainerCorrupt(format!("entry {index}: {err}")))?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        if !has_supported_image_ext(&name) {
            continue;
        }

        // The declared entry size is untrusted metadata; let the read grow
        // the buffer instead of preallocating from it.
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;

        let hint = name.replace(['/', '\\'], "_");
        match decode_page(&bytes, &hint) {
            Ok(page) => pages.push(page),
            Err(err) if is_per_entry_error(&err) => {
                warn!(entry = %name, %err, "skipping undecodable archive entry");
            }
            Err(err) => return Err(err),
        }
    }

    debug!(count = pages.len(), "archive read");
    Ok(pages)
}

/// Write pages into a zip/cbz archive, one JPEG entry per page, in order.
///
/// Each entry is named `<displayName>.jpg`; with `prepend_index` set, the
/// page's zero-padded position (width = digit count of the page total) and
/// an underscore are prefixed so lexicographic order equals collection
/// order regardless of the names. Any entry failure aborts the write; a
/// partially-written destination must be discarded by the caller.
#[instrument(skip_all, fields(count = pages.len()))]
pub fn write_zip<W: Write + Seek>(
    pages: &[Page],
    writer: W,
    options: &ExportOptions,
) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let index_width = count_digits(pages.len());

    for (index, page) in pages.iter().enumerate() {
        let mut name = format!("{}.jpg", page.display_name());
        if options.prepend_index {
            name = format!("{}_{}", zero_padded(index, index_width), name);
        }

        zip.start_file(name, SimpleFileOptions::default())
            .map_err(|err| PackwerkError::Io(std::io::Error::other(err)))?;
        encode_jpeg_into(page, &mut zip, options.clamped_quality())?;
    }

    let mut inner = zip
        .finish()
        .map_err(|err| PackwerkError::Io(std::io::Error::other(err)))?;
    inner.flush()?;
    Ok(())
}

/// Whether the entry name carries one of the supported image extensions.
fn has_supported_image_ext(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let lower = ext.to_ascii_lowercase();
            SUPPORTED_IMAGE_EXTS.contains(&lower.as_str())
        })
}

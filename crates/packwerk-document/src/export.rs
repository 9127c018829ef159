// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export orchestrator: JPEG re-encoding and destination dispatch.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use tracing::{info, instrument};

use packwerk_core::{ExportOptions, PackwerkError, Page, Result};

use crate::archive::write_zip;
use crate::pdf::writer::write_pdf;

/// Re-encode one page to JPEG at the given quality into `writer`.
///
/// Every export path funnels through here: the original codec is never
/// preserved on egress.
pub(crate) fn encode_jpeg_into<W: Write>(page: &Page, writer: &mut W, quality: u8) -> Result<()> {
    let encoder = JpegEncoder::new_with_quality(writer, quality);
    page.image()
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|err| {
            PackwerkError::EncodeFailed(format!("{}: {err}", page.display_name()))
        })
}

/// Write a single page as a JPEG stream.
pub fn save_page<W: Write>(page: &Page, writer: &mut W, quality: u8) -> Result<()> {
    encode_jpeg_into(page, writer, quality.clamp(1, 100))
}

/// Write a single page to a file. The content is always JPEG, whatever
/// extension the requested name carries.
#[instrument(skip(page), fields(path = %path.as_ref().display()))]
pub fn save_page_path(page: &Page, path: impl AsRef<Path>, quality: u8) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    save_page(page, &mut writer, quality)?;
    writer.flush()?;
    info!("page saved");
    Ok(())
}

/// Export a page sequence to `path`, dispatching on the destination
/// extension: `.zip`/`.cbz` produce an archive, `.pdf` a PDF document.
///
/// There is no partial-success mode: on error the destination contents
/// are undefined and the caller must treat the export as failed.
#[instrument(skip(pages), fields(path = %path.as_ref().display(), count = pages.len()))]
pub fn export_path(pages: &[Page], path: impl AsRef<Path>, options: &ExportOptions) -> Result<()> {
    let path = path.as_ref();
    let ext = extension_lower(path);

    match ext.as_deref() {
        Some("zip") | Some("cbz") => {
            let file = File::create(path)?;
            write_zip(pages, BufWriter::new(file), options)?;
        }
        Some("pdf") => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            write_pdf(pages, &mut writer, options.clamped_quality())?;
            writer.flush()?;
        }
        _ => {
            return Err(PackwerkError::UnsupportedFormat(format!(
                "export destination must end in .zip, .cbz or .pdf, got {}",
                path.display()
            )));
        }
    }

    info!("export complete");
    Ok(())
}

/// Lowercased extension of a path, if any.
pub(crate) fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

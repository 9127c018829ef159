// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// packwerk-document: format-aware ingestion and egress for the Packwerk
// page editor.
//
// Provides the byte decoder (codec sniffing, EXIF orientation), container
// readers (zip/cbz, directory, PDF raster extraction), container writers
// (zip/cbz, PDF, single JPEG), and the extension-dispatching import/export
// entry points consumed by the shell.

pub mod archive;
pub mod decode;
pub mod directory;
pub mod export;
pub mod import;
pub mod pdf;

mod digits;

pub use archive::{read_zip, write_zip};
pub use decode::decode_page;
pub use directory::read_directory;
pub use export::{export_path, save_page, save_page_path};
pub use import::{import_bytes, import_path};
pub use pdf::reader::read_pdf;
pub use pdf::writer::write_pdf;

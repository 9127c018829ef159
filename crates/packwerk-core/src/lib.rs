// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Packwerk core: shared value types and error definitions.

pub mod error;
pub mod options;
pub mod page;

pub use error::{PackwerkError, Result};
pub use options::ExportOptions;
pub use page::{
    Page, SourceFormat, SUPPORTED_ARCHIVE_EXTS, SUPPORTED_IMAGE_EXTS, SUPPORTED_PDF_EXT,
};

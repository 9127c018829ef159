// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: raster page-image extraction and JPEG page assembly.

pub mod reader;
pub mod writer;

pub use reader::read_pdf;
pub use writer::write_pdf;

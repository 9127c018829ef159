// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-call export settings.

use serde::{Deserialize, Serialize};

/// Settings supplied by the caller on every export call.
///
/// The core keeps no global mutable state: whoever drives an export decides
/// quality and naming each time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExportOptions {
    /// JPEG re-encoding quality, 0-100.
    pub jpeg_quality: u8,
    /// Prefix each archive entry name with its zero-padded position so that
    /// lexicographic order matches collection order.
    pub prepend_index: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            prepend_index: true,
        }
    }
}

impl ExportOptions {
    /// Clamp the quality into the encoder's accepted range (1-100).
    pub fn clamped_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}

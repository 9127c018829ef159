// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// packwerk-collection: the ordered, single-selection sequence of pages
// being edited. Owns all reordering, duplication, splitting, and deletion
// operations together with their selection-adjustment side effects.

pub mod collection;

pub use collection::PageCollection;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The page collection: an ordered list of pages with at most one selected
// index. Insertion order is display order and page order in the exported
// artifact.

use packwerk_core::Page;
use tracing::debug;

/// Ordered sequence of pages with an optional selected index.
///
/// Invariant: `selected` is `None` or strictly less than `pages.len()`.
/// Every mutation that can invalidate the index re-normalizes it before
/// returning. Mutations have no failure mode beyond documented no-ops, so
/// callers never see a partial state.
///
/// The collection is not internally synchronized; it assumes a single
/// logical writer.
#[derive(Debug, Default)]
pub struct PageCollection {
    pages: Vec<Page>,
    selected: Option<usize>,
}

impl PageCollection {
    /// Create an empty collection with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Read access ----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Page> {
        self.pages.get(idx)
    }

    /// All pages in display order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_page(&self) -> Option<&Page> {
        self.selected.map(|idx| &self.pages[idx])
    }

    // -- Selection ------------------------------------------------------------

    /// Select the page at `idx`. Out-of-bounds indices are ignored.
    pub fn select(&mut self, idx: usize) {
        if idx < self.pages.len() {
            self.selected = Some(idx);
        }
    }

    pub fn unselect(&mut self) {
        self.selected = None;
    }

    // -- Mutation -------------------------------------------------------------

    /// Insert pages at the editing point: immediately after the selection,
    /// or appended to the end when nothing is selected. The selection itself
    /// does not move, so repeated imports stack after the viewed page.
    pub fn insert(&mut self, pages: impl IntoIterator<Item = Page>) {
        let incoming: Vec<Page> = pages.into_iter().collect();
        if incoming.is_empty() {
            return;
        }

        debug!(count = incoming.len(), at = ?self.selected, "inserting pages");

        match self.selected {
            None => self.pages.extend(incoming),
            Some(idx) => {
                self.pages.splice(idx + 1..idx + 1, incoming);
            }
        }
    }

    /// Remove the selected page. The selection stays at the same numeric
    /// index (now the next page), or clears when the last page was removed.
    pub fn delete(&mut self) {
        let Some(idx) = self.selected else { return };

        self.pages.remove(idx);
        if idx >= self.pages.len() {
            self.selected = None;
        }
    }

    /// Deep-clone the selected page and insert the clone right after it.
    /// The selection stays on the original.
    pub fn duplicate(&mut self) {
        let Some(idx) = self.selected else { return };

        let copy = self.pages[idx].clone();
        self.pages.insert(idx + 1, copy);
    }

    /// Move the selected page one position towards the front. The first
    /// page wraps around to the end of the sequence.
    pub fn move_up(&mut self) {
        let Some(idx) = self.selected else { return };

        if idx == 0 {
            let page = self.pages.remove(0);
            self.pages.push(page);
            self.selected = Some(self.pages.len() - 1);
        } else {
            self.pages.swap(idx, idx - 1);
            self.selected = Some(idx - 1);
        }
    }

    /// Move the selected page one position towards the back. The last page
    /// wraps around to the front of the sequence.
    pub fn move_down(&mut self) {
        let Some(idx) = self.selected else { return };

        if idx == self.pages.len() - 1 {
            // pop() cannot fail here: a valid selection implies non-empty.
            if let Some(page) = self.pages.pop() {
                self.pages.insert(0, page);
            }
            self.selected = Some(0);
        } else {
            self.pages.swap(idx, idx + 1);
            self.selected = Some(idx + 1);
        }
    }

    /// Rotate the selected page 90 degrees clockwise, in place. The display
    /// name is unchanged.
    pub fn rotate(&mut self) {
        let Some(idx) = self.selected else { return };

        let page = &mut self.pages[idx];
        let rotated = page.image().rotate90();
        page.replace_image(rotated);
    }

    /// Split the selected page vertically at the horizontal midpoint into
    /// two independent pages.
    ///
    /// The selected page becomes the left half (extra column on odd widths)
    /// with `_1` appended to its name; a new page holding the right half is
    /// inserted after it with `_2` appended. The selection stays on the left
    /// half.
    pub fn cut(&mut self) {
        let Some(idx) = self.selected else { return };

        let page = &self.pages[idx];
        let width = page.width();
        let height = page.height();
        if width < 2 {
            return;
        }

        let left_width = width.div_ceil(2);
        let left = page.image().crop_imm(0, 0, left_width, height);
        let right = page.image().crop_imm(left_width, 0, width - left_width, height);
        let base_name = page.display_name().to_string();

        debug!(name = %base_name, width, left_width, "cutting page");

        let mut right_page = page.clone();
        right_page.set_display_name(format!("{base_name}_2"));
        right_page.replace_image(right);

        let left_page = &mut self.pages[idx];
        left_page.set_display_name(format!("{base_name}_1"));
        left_page.replace_image(left);

        self.pages.insert(idx + 1, right_page);
    }

    /// Remove every page and clear the selection.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.selected = None;
    }

    /// Snapshot the pages for export.
    pub fn snapshot(&self) -> Vec<Page> {
        self.pages.to_vec()
    }
}

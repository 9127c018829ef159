// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Zero-padding helpers for generated entry names.

/// Number of decimal digits in `n` (1 for zero).
pub(crate) fn count_digits(mut n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let mut count = 0;
    while n != 0 {
        n /= 10;
        count += 1;
    }
    count
}

/// `n` rendered with zeros padded on the left to `width` digits.
pub(crate) fn zero_padded(n: usize, width: usize) -> String {
    format!("{n:0width$}")
}

//! Changing elements of a row and the search for `b1`/`b2` on the reference line.

/// The columns at which the color changes within one row.
///
/// Even entries turn the row black, odd entries turn it white again. A sealed
/// row always ends with the row width.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChangingElements {
    columns: Vec<usize>,
}

impl ChangingElements {
    /// Turn this into the imaginary all-white line that precedes the first
    /// row of a two-dimensionally coded image.
    pub(crate) fn reset_white(&mut self, width: usize) {
        self.columns.clear();
        self.columns.extend([width, width]);
    }

    /// Make room for `changes` color changes and the two sentinels.
    pub(crate) fn reserve(&mut self, changes: usize) {
        self.columns.reserve(changes.saturating_add(2));
    }

    #[inline(always)]
    pub(crate) fn clear(&mut self) {
        self.columns.clear();
    }

    /// Record a color change. Two changes at the same column cancel out.
    #[inline(always)]
    pub(crate) fn push(&mut self, column: usize) {
        if self.columns.last() == Some(&column) {
            self.columns.pop();
        } else {
            self.columns.push(column);
        }
    }

    pub(crate) fn seal(&mut self, width: usize) {
        self.columns.push(width);
        self.columns.push(width);
    }

    #[inline(always)]
    pub(crate) fn as_slice(&self) -> &[usize] {
        &self.columns
    }
}

/// Finds `b1` and `b2` on the reference line.
///
/// Since `a0` only moves to the right within a row, each search resumes close
/// to where the previous one ended.
#[derive(Debug, Default)]
pub(crate) struct ReferenceScan {
    last: usize,
}

impl ReferenceScan {
    /// Return `(b1, b2)`: the first changing element right of `a0` that
    /// switches to the opposite of the current color, and the one after it.
    /// Both default to `width` when the reference line has no such element.
    pub(crate) fn find(
        &mut self,
        reference: &[usize],
        a0: Option<usize>,
        is_white: bool,
        width: usize,
    ) -> (usize, usize) {
        // While coding white, b1 must turn the reference line black, which
        // is what even entries do.
        let parity = if is_white { 0 } else { 1 };
        let mut i = self.last.saturating_sub(1);
        if i % 2 != parity {
            i += 1;
        }
        // a0 can move left of the previous hit after a vertical-left code.
        while i >= 2 && a0.is_none_or(|a0| reference[i - 2] > a0) {
            i -= 2;
        }

        while i < reference.len() {
            if a0.is_none_or(|a0| reference[i] > a0) {
                self.last = i;
                let b2 = reference.get(i + 1).copied().unwrap_or(width);

                return (reference[i].min(width), b2.min(width));
            }

            i += 2;
        }

        self.last = reference.len();

        (width, width)
    }
}

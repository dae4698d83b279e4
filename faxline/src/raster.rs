//! Packing decoded runs into a 1-bit raster.

use crate::error::ErrorKind;

/// Paint `len` pixels starting at column `start` into a packed row.
///
/// Black pixels are stored as 1 bits, most significant bit first. White runs
/// are no-ops, so the row must be zeroed beforehand. Pixels beyond the end of
/// `row` are ignored.
pub fn paint_run(row: &mut [u8], start: usize, len: usize, is_white: bool) {
    let end = start.saturating_add(len).min(row.len() * 8);

    if is_white || start >= end {
        return;
    }

    let first = start / 8;
    let last = (end - 1) / 8;
    let head = 0xFF_u8 >> (start % 8);
    let tail = 0xFF_u8 << (7 - (end - 1) % 8);

    if first == last {
        row[first] |= head & tail;
    } else {
        row[first] |= head;
        row[first + 1..last].fill(0xFF);
        row[last] |= tail;
    }
}

/// A decoded bi-level image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// The width of the image in pixels.
    pub width: u32,
    /// The number of rows that were decoded.
    pub height: u32,
    /// Packed rows, `stride` bytes each. A set bit is a black pixel.
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Allocate a white bitmap.
    pub(crate) fn new(width: u32, height: u32) -> Result<Self, ErrorKind> {
        let len = stride(width)
            .checked_mul(height as usize)
            .ok_or(ErrorKind::ImageTooLarge)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| ErrorKind::ImageTooLarge)?;
        data.resize(len, 0);

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// The number of bytes per row.
    pub fn stride(&self) -> usize {
        stride(self.width)
    }

    /// The packed bytes of row `y`.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        let stride = self.stride();
        let start = stride * y as usize;

        self.data.get(start..start + stride)
    }

    /// Whether the pixel at `(x, y)` is black.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width {
            return false;
        }

        self.row(y)
            .is_some_and(|row| row[x as usize / 8] & (0x80 >> (x % 8)) != 0)
    }
}

#[inline(always)]
pub(crate) fn stride(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

//! Bit-level cursor over CCITT encoded data.

use crate::error::{DecodeError, ErrorKind};

/// The order in which pixels are packed into the bits of each input byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillOrder {
    /// The first pixel is stored in the most significant bit (TIFF `FillOrder` 1).
    #[default]
    MsbToLsb,
    /// The first pixel is stored in the least significant bit (TIFF `FillOrder` 2).
    LsbToMsb,
}

impl FillOrder {
    /// Map a TIFF `FillOrder` tag value.
    pub fn from_tiff(value: u32) -> Result<Self, DecodeError> {
        match value {
            1 => Ok(Self::MsbToLsb),
            2 => Ok(Self::LsbToMsb),
            _ => Err(ErrorKind::UnsupportedFillOrder.into()),
        }
    }

    #[inline(always)]
    fn apply(self, byte: u8) -> u8 {
        match self {
            Self::MsbToLsb => byte,
            Self::LsbToMsb => byte.reverse_bits(),
        }
    }
}

/// Reverse the bit order of every byte in place.
///
/// This turns LSB-to-MSB data into MSB-to-LSB data and vice versa.
pub fn reverse_bits(data: &mut [u8]) {
    for byte in data {
        *byte = byte.reverse_bits();
    }
}

/// A cursor that reads up to 13 bits at a time.
///
/// Reads past the end of the data yield zero bits, so codes at the very end
/// of a stream can rely on implicit padding.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BitCursor<'a> {
    data: &'a [u8],
    cur_pos: usize,
    fill_order: FillOrder,
}

impl<'a> BitCursor<'a> {
    pub(crate) const MAX_READ: u8 = 13;

    #[inline(always)]
    pub(crate) fn new(data: &'a [u8], fill_order: FillOrder) -> Self {
        Self {
            data,
            cur_pos: 0,
            fill_order,
        }
    }

    #[inline(always)]
    fn byte_at(&self, idx: usize) -> u32 {
        self.data
            .get(idx)
            .map_or(0, |b| u32::from(self.fill_order.apply(*b)))
    }

    /// Return the next `n` bits without advancing.
    #[inline(always)]
    pub(crate) fn peek_bits(&self, n: u8) -> u32 {
        debug_assert!(n <= Self::MAX_READ);

        let byte_pos = self.byte_pos();
        let window = (self.byte_at(byte_pos) << 16)
            | (self.byte_at(byte_pos + 1) << 8)
            | self.byte_at(byte_pos + 2);
        let shift = 24 - self.bit_pos() as u32 - u32::from(n);

        (window >> shift) & ((1 << n) - 1)
    }

    #[inline(always)]
    pub(crate) fn next_bits(&mut self, n: u8) -> u32 {
        let bits = self.peek_bits(n);
        self.cur_pos += usize::from(n);

        bits
    }

    /// Give back bits that were read but not used.
    #[inline(always)]
    pub(crate) fn rewind(&mut self, bits: u8) {
        self.cur_pos = self.cur_pos.saturating_sub(usize::from(bits));
    }

    #[inline(always)]
    pub(crate) fn skip(&mut self, bits: usize) {
        self.cur_pos += bits;
    }

    #[inline(always)]
    pub(crate) fn align(&mut self) {
        self.cur_pos += self.bits_to_boundary();
    }

    /// The number of bits left until the next byte boundary.
    #[inline(always)]
    pub(crate) fn bits_to_boundary(&self) -> usize {
        (8 - self.bit_pos()) & 7
    }

    #[inline(always)]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.byte_pos() >= self.data.len()
    }

    /// Whether only zero bits are left.
    pub(crate) fn at_padding(&self) -> bool {
        let fill = self.bits_to_boundary();
        let rest = self.byte_pos() + usize::from(fill != 0);

        self.peek_bits(fill as u8) == 0
            && self
                .data
                .get(rest..)
                .is_none_or(|rest| rest.iter().all(|b| *b == 0))
    }

    #[inline(always)]
    pub(crate) fn byte_pos(&self) -> usize {
        self.cur_pos >> 3
    }

    #[inline(always)]
    pub(crate) fn bit_pos(&self) -> usize {
        self.cur_pos & 7
    }
}

//! Decoding of run lengths and two-dimensional mode codes.

use crate::cursor::BitCursor;
use crate::error::ErrorKind;
use crate::tables::{
    BLACK_LONG, BLACK_PREFIX, BLACK_SHORT, COMMON_MAKEUP, Entry, Escape, Kind, MODES, Mode, WHITE,
};

impl BitCursor<'_> {
    #[inline(always)]
    fn lookup<const N: usize>(&mut self, table: &[Entry; N]) -> Entry {
        let width = N.trailing_zeros() as u8;
        let entry = table[self.next_bits(width) as usize];
        self.rewind(width - entry.bits);

        entry
    }

    #[inline(always)]
    fn lookup_black(&mut self) -> Entry {
        let entry = self.lookup(&BLACK_PREFIX);

        match entry.kind {
            Kind::Escape(Escape::BlackShort) => self.lookup(&BLACK_SHORT),
            Kind::Escape(Escape::BlackLong) => self.lookup(&BLACK_LONG),
            _ => entry,
        }
    }

    /// Decode one run of the given color, summing make-up codes until a
    /// terminating code is found.
    pub(crate) fn decode_run(&mut self, is_white: bool) -> Result<usize, ErrorKind> {
        let mut total = 0_usize;

        loop {
            let mut entry = if is_white {
                self.lookup(&WHITE)
            } else {
                self.lookup_black()
            };

            if entry.kind == Kind::Escape(Escape::CommonMakeup) {
                entry = self.lookup(&COMMON_MAKEUP);
            }

            match entry.kind {
                Kind::Terminating => return Ok(total + usize::from(entry.value)),
                Kind::Makeup => total += usize::from(entry.value),
                Kind::Eol => return Err(ErrorKind::UnexpectedEol),
                _ => return Err(ErrorKind::InvalidCode),
            }
        }
    }

    #[inline(always)]
    pub(crate) fn decode_mode(&mut self) -> Result<Mode, ErrorKind> {
        match self.lookup(&MODES).kind {
            Kind::Mode(mode) => Ok(mode),
            _ => Err(ErrorKind::InvalidTwoDimCode),
        }
    }
}

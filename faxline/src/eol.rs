//! End-of-line markers and the one-dimensional/two-dimensional tag bit of
//! T.4 coded rows.

use crate::cursor::BitCursor;
use crate::error::ErrorKind;
use crate::{CodingOptions, DecodeSettings, EncodingMode};
use log::warn;

/// Eleven zeros followed by a one.
pub(crate) const EOL: u32 = 0b0000_0000_0001;
pub(crate) const EOL_BITS: u8 = 12;

/// How the next row is coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineStart {
    OneDimensional,
    TwoDimensional,
    /// A return-to-control sequence ended the data.
    EndOfData,
}

/// Reads whatever precedes the code words of a T.4 row.
#[derive(Debug)]
pub(crate) struct LineHeaderReader {
    /// Every row is preceded by an EOL.
    required: bool,
    /// EOLs are padded with zeros so that they end on a byte boundary.
    fill_bits: bool,
    /// Every row carries a tag bit that selects its coding.
    tagged: bool,
    end_of_block: bool,
    /// Rows without EOLs start on a byte boundary.
    byte_align: bool,
}

impl LineHeaderReader {
    pub(crate) fn new(settings: &DecodeSettings) -> Self {
        let fill_bits = settings.options.contains(CodingOptions::FILL_BITS);

        Self {
            required: settings.end_of_line,
            fill_bits,
            tagged: matches!(settings.encoding, EncodingMode::Group3_2D { .. })
                || settings.options.contains(CodingOptions::TWO_DIMENSIONAL),
            end_of_block: settings.end_of_block,
            byte_align: fill_bits && !settings.end_of_line,
        }
    }

    pub(crate) fn read(
        &mut self,
        cursor: &mut BitCursor<'_>,
        row: u32,
    ) -> Result<LineStart, ErrorKind> {
        let found = if self.required {
            self.expect_eol(cursor, row)?;
            true
        } else {
            if self.byte_align {
                cursor.align();
            }

            consume_eol(cursor)
        };

        if found && self.end_of_block && self.rtc_follows(cursor) {
            return Ok(LineStart::EndOfData);
        }

        if !self.tagged {
            return Ok(LineStart::OneDimensional);
        }

        match cursor.next_bits(1) {
            1 => Ok(LineStart::OneDimensional),
            // A two-dimensional row needs a reference row.
            _ if row == 0 => Err(ErrorKind::MalformedEol),
            _ => Ok(LineStart::TwoDimensional),
        }
    }

    fn expect_eol(&mut self, cursor: &mut BitCursor<'_>, row: u32) -> Result<(), ErrorKind> {
        if consume_eol(cursor) {
            return Ok(());
        }

        // Some producers pad EOLs to byte boundaries without saying so. The
        // first EOL reveals this.
        if self.fill_bits || row == 0 {
            let mut ahead = *cursor;

            if skip_fill(&mut ahead) {
                if !self.fill_bits {
                    warn!("EOL is padded to a byte boundary, assuming fill bits");
                    self.fill_bits = true;
                }

                *cursor = ahead;

                return Ok(());
            }
        }

        Err(ErrorKind::MalformedEol)
    }

    /// Whether the EOL that was just read is followed by another one.
    fn rtc_follows(&self, cursor: &BitCursor<'_>) -> bool {
        let mut ahead = *cursor;

        if self.tagged {
            ahead.skip(1);
        }

        consume_eol(&mut ahead) || (self.fill_bits && skip_fill(&mut ahead))
    }
}

/// Consume an EOL if one starts at the cursor.
pub(crate) fn consume_eol(cursor: &mut BitCursor<'_>) -> bool {
    if cursor.peek_bits(EOL_BITS) == EOL {
        cursor.skip(usize::from(EOL_BITS));
        true
    } else {
        false
    }
}

/// Skip zero fill up to a byte boundary and an EOL that ends on a later byte
/// boundary.
fn skip_fill(cursor: &mut BitCursor<'_>) -> bool {
    let fill = cursor.bits_to_boundary();

    if cursor.peek_bits(fill as u8) != 0 {
        return false;
    }

    cursor.skip(fill);
    let mut zeros = fill;

    loop {
        if cursor.is_exhausted() {
            return false;
        }

        match cursor.next_bits(8) {
            0 => zeros += 8,
            1 => return zeros + 7 >= 11,
            _ => return false,
        }
    }
}

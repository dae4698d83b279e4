//! Row decoders and the decoding session that drives them.

use crate::changes::{ChangingElements, ReferenceScan};
use crate::cursor::BitCursor;
use crate::eol::{EOL, EOL_BITS, LineHeaderReader, LineStart};
use crate::error::{DecodeError, ErrorKind, Result};
use crate::raster::{Bitmap, paint_run, stride};
use crate::tables::Mode;
use crate::{CodingOptions, DecodeSettings, EncodingMode};
use core::mem;
use log::{debug, trace, warn};

type LineResult = core::result::Result<(), ErrorKind>;

/// A reusable CCITT decoder.
///
/// The decoder keeps the changing elements of the previous and the current row
/// between calls, so decoding many images does not allocate them again unless
/// an image needs more room.
#[derive(Debug, Default)]
pub struct FaxDecoder {
    reference: ChangingElements,
    coding: ChangingElements,
}

impl FaxDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `data` into a newly allocated bitmap.
    ///
    /// If `settings.rows` is 0, rows are decoded until the data runs out or an
    /// end-of-block marker is found. Otherwise the bitmap always has
    /// `settings.rows` rows, and rows after an early end-of-block stay white.
    pub fn decode(&mut self, data: &[u8], settings: &DecodeSettings) -> Result<Bitmap> {
        if settings.rows > 0 {
            let mut bitmap = Bitmap::new(settings.columns, settings.rows)?;
            self.decode_into(data, settings, &mut bitmap.data)?;

            return Ok(bitmap);
        }

        let mut rows = GrowingRows {
            data: Vec::new(),
            stride: stride(settings.columns),
        };
        let height = self.run(data, settings, &mut rows)?;

        Ok(Bitmap {
            width: settings.columns,
            height,
            data: rows.data,
        })
    }

    /// Decode `data` into `raster`, which must be zeroed and hold rows of
    /// `ceil(columns / 8)` bytes.
    ///
    /// Returns the number of rows that were decoded. If `settings.rows` is 0,
    /// decoding stops once `raster` is full.
    pub fn decode_into(
        &mut self,
        data: &[u8],
        settings: &DecodeSettings,
        raster: &mut [u8],
    ) -> Result<u32> {
        let stride = stride(settings.columns);
        let needed = stride.checked_mul(settings.rows as usize);

        if needed.is_none_or(|needed| raster.len() < needed) {
            return Err(ErrorKind::BufferTooSmall.into());
        }

        self.run(data, settings, &mut FixedRows { data: raster, stride })
    }

    fn prepare(&mut self, width: usize, data: &[u8]) {
        // The reference line of the first row is an imaginary white line.
        self.reference.reset_white(width);
        self.coding.clear();

        // A row cannot change color more often than it has pixels, and every
        // change costs at least one bit of input.
        let changes = width.min(data.len().saturating_mul(8));
        self.reference.reserve(changes);
        self.coding.reserve(changes);
    }

    fn run(
        &mut self,
        data: &[u8],
        settings: &DecodeSettings,
        rows: &mut impl RowSink,
    ) -> Result<u32> {
        let width = settings.columns as usize;

        if width == 0 {
            return Ok(0);
        }

        debug!(
            "decoding {:?} image, {} columns, {} rows",
            settings.encoding, settings.columns, settings.rows
        );

        self.prepare(width, data);

        let mut cursor = BitCursor::new(data, settings.fill_order);
        let mut header = LineHeaderReader::new(settings);
        let fill_bits = settings.options.contains(CodingOptions::FILL_BITS);
        let bounded = settings.rows > 0;
        let mut row = 0;

        while !bounded || row < settings.rows {
            if !bounded && cursor.at_padding() {
                break;
            }

            let start = match settings.encoding {
                EncodingMode::Group4 => {
                    if fill_bits {
                        cursor.align();
                    }

                    if settings.end_of_block && at_eofb(&cursor) {
                        LineStart::EndOfData
                    } else {
                        LineStart::TwoDimensional
                    }
                }
                _ => header
                    .read(&mut cursor, row)
                    .map_err(|kind| DecodeError::at(kind, row, None))?,
            };

            if start == LineStart::EndOfData {
                if bounded {
                    warn!("end of block after {row} of {} rows", settings.rows);
                } else {
                    debug!("end of block after {row} rows");
                }

                break;
            }

            let Some(out) = rows
                .row(row)
                .map_err(|kind| DecodeError::at(kind, row, None))?
            else {
                break;
            };

            let mut line = Line::new(
                out,
                width,
                self.reference.as_slice(),
                &mut self.coding,
                settings.options,
            );

            let result = match start {
                LineStart::OneDimensional => line.decode_1d(&mut cursor),
                _ => line.decode_2d(&mut cursor),
            };

            if let Err(kind) = result {
                return Err(DecodeError::at(kind, row, Some(line.column)));
            }

            trace!("decoded row {row} ({start:?})");

            mem::swap(&mut self.reference, &mut self.coding);
            self.coding.clear();
            row += 1;
        }

        Ok(row)
    }
}

/// Whether an end-of-facsimile-block (two EOLs) starts at the cursor.
fn at_eofb(cursor: &BitCursor<'_>) -> bool {
    let mut ahead = *cursor;

    if ahead.next_bits(EOL_BITS) != EOL {
        return false;
    }

    ahead.peek_bits(EOL_BITS) == EOL
}

/// Provides the output row for each decoded row.
///
/// `None` means that no more rows fit, which ends decoding without an error.
trait RowSink {
    fn row(&mut self, y: u32) -> core::result::Result<Option<&mut [u8]>, ErrorKind>;
}

struct FixedRows<'a> {
    data: &'a mut [u8],
    stride: usize,
}

impl RowSink for FixedRows<'_> {
    fn row(&mut self, y: u32) -> core::result::Result<Option<&mut [u8]>, ErrorKind> {
        let range = self
            .stride
            .checked_mul(y as usize)
            .and_then(|start| Some(start..start.checked_add(self.stride)?));

        match range {
            Some(range) => Ok(self.data.get_mut(range)),
            None => Ok(None),
        }
    }
}

struct GrowingRows {
    data: Vec<u8>,
    stride: usize,
}

impl RowSink for GrowingRows {
    fn row(&mut self, y: u32) -> core::result::Result<Option<&mut [u8]>, ErrorKind> {
        let start = self
            .stride
            .checked_mul(y as usize)
            .ok_or(ErrorKind::ImageTooLarge)?;
        let end = start
            .checked_add(self.stride)
            .ok_or(ErrorKind::ImageTooLarge)?;

        if self.data.len() < end {
            self.data
                .try_reserve(end - self.data.len())
                .map_err(|_| ErrorKind::ImageTooLarge)?;
            self.data.resize(end, 0);
        }

        Ok(self.data.get_mut(start..end))
    }
}

/// The state of the row that is currently being decoded.
struct Line<'a> {
    out: &'a mut [u8],
    width: usize,
    /// The sealed changing elements of the previous row.
    reference: &'a [usize],
    coding: &'a mut ChangingElements,
    scan: ReferenceScan,
    options: CodingOptions,
    /// The column up to which pixels have been decoded. This is `a0` once the
    /// first code of the row has been read.
    column: usize,
    started: bool,
    is_white: bool,
}

impl<'a> Line<'a> {
    fn new(
        out: &'a mut [u8],
        width: usize,
        reference: &'a [usize],
        coding: &'a mut ChangingElements,
        options: CodingOptions,
    ) -> Self {
        Self {
            out,
            width,
            reference,
            coding,
            scan: ReferenceScan::default(),
            options,
            column: 0,
            started: false,
            is_white: true,
        }
    }

    #[inline(always)]
    fn a0(&self) -> Option<usize> {
        self.started.then_some(self.column)
    }

    /// Paint the current color up to `end`.
    #[inline(always)]
    fn fill(&mut self, end: usize) {
        let end = if end > self.width {
            warn!(
                "row overshoots its width ({end} > {}), clamping",
                self.width
            );
            self.width
        } else {
            end
        };

        if end > self.column {
            paint_run(self.out, self.column, end - self.column, self.is_white);
            self.column = end;
        }
    }

    /// Switch to the other color at the current column.
    #[inline(always)]
    fn flip(&mut self) {
        if self.column < self.width {
            self.coding.push(self.column);
        }

        self.is_white = !self.is_white;
    }

    fn set_color(&mut self, is_white: bool) {
        if self.is_white != is_white {
            self.flip();
        }
    }

    /// Decode a Modified Huffman coded row.
    fn decode_1d(&mut self, cursor: &mut BitCursor<'_>) -> LineResult {
        while self.column < self.width {
            let run = cursor.decode_run(self.is_white)?;
            self.fill(self.column.saturating_add(run));
            self.flip();
        }

        self.coding.seal(self.width);

        Ok(())
    }

    /// Decode a row that is coded relative to the reference row.
    fn decode_2d(&mut self, cursor: &mut BitCursor<'_>) -> LineResult {
        while self.column < self.width {
            let (b1, b2) = self
                .scan
                .find(self.reference, self.a0(), self.is_white, self.width);

            match cursor.decode_mode()? {
                // The color stays the same.
                Mode::Pass => self.fill(b2),
                Mode::Horizontal => {
                    for _ in 0..2 {
                        let run = cursor.decode_run(self.is_white)?;
                        self.fill(self.column.saturating_add(run));
                        self.flip();
                    }
                }
                Mode::Vertical(offset) => {
                    let a1 = b1
                        .checked_add_signed(isize::from(offset))
                        .filter(|a1| *a1 >= self.column)
                        .ok_or(ErrorKind::InvalidTwoDimCode)?;

                    self.fill(a1);
                    self.flip();
                }
                Mode::Extension => {
                    if self.options.contains(CodingOptions::UNCOMPRESSED) {
                        self.uncompressed(cursor)?;
                    } else {
                        trace!("ignoring extension code at column {}", self.column);
                        continue;
                    }
                }
            }

            self.started = true;
        }

        self.coding.seal(self.width);

        Ok(())
    }

    /// Decode uncompressed mode up to and including its exit code.
    fn uncompressed(&mut self, cursor: &mut BitCursor<'_>) -> LineResult {
        if cursor.next_bits(3) != 0b111 {
            return Err(ErrorKind::InvalidTwoDimCode);
        }

        loop {
            let mut zeros = 0;

            while cursor.next_bits(1) == 0 {
                zeros += 1;

                if zeros > 10 {
                    return Err(ErrorKind::InvalidTwoDimCode);
                }
            }

            match zeros {
                // `zeros` white pixels followed by one black pixel.
                0..5 => {
                    self.literal(zeros, true);
                    self.literal(1, false);
                }
                5 => self.literal(5, true),
                // Exit code: `zeros - 6` white pixels, then the color of
                // the next run.
                _ => {
                    self.literal(zeros - 6, true);
                    let next_white = cursor.next_bits(1) == 0;
                    self.set_color(next_white);

                    return Ok(());
                }
            }
        }
    }

    fn literal(&mut self, count: usize, is_white: bool) {
        if count > 0 {
            self.set_color(is_white);
            self.fill(self.column + count);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unusual_byte_groupings)]
mod tests {
    use super::*;
    use crate::cursor::FillOrder;

    fn decode_row(
        data: &[u8],
        width: usize,
        reference: &[usize],
        options: CodingOptions,
        two_dimensional: bool,
    ) -> (LineResult, Vec<u8>, Vec<usize>) {
        let mut out = vec![0; width.div_ceil(8)];
        let mut coding = ChangingElements::default();
        let mut cursor = BitCursor::new(data, FillOrder::MsbToLsb);

        let result = {
            let mut line = Line::new(&mut out, width, reference, &mut coding, options);

            if two_dimensional {
                line.decode_2d(&mut cursor)
            } else {
                line.decode_1d(&mut cursor)
            }
        };

        (result, out, coding.as_slice().to_vec())
    }

    #[test]
    fn one_dimensional_row() {
        // White 3 (1000), black 2 (11), white 3 (1000).
        let data = [0b1000_11_10, 0b00_000000];
        let (result, out, changes) = decode_row(&data, 8, &[], CodingOptions::empty(), false);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0b0001_1000]);
        assert_eq!(changes, [3, 5, 8, 8]);
    }

    #[test]
    fn row_starting_black() {
        // White 0 (00110101), black 4 (011), white 4 (1011).
        let data = [0b00110101, 0b011_1011_0];
        let (result, out, changes) = decode_row(&data, 8, &[], CodingOptions::empty(), false);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0b1111_0000]);
        assert_eq!(changes, [0, 4, 8, 8]);
    }

    #[test]
    fn overshoot_is_clamped() {
        // White 3 (1000), black 7 (00011) on a row of 8 pixels.
        let data = [0b1000_0001, 0b1_0000000];
        let (result, out, changes) = decode_row(&data, 8, &[], CodingOptions::empty(), false);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0b0001_1111]);
        assert_eq!(changes, [3, 8, 8]);
    }

    #[test]
    fn vertical_copies_reference() {
        // Reference is black from 2 to 5. V0, V0 reproduces it, then a pass
        // takes the row to its end.
        let reference = [2, 5, 8, 8];
        let data = [0b1_1_0001_00];
        let (result, out, changes) =
            decode_row(&data, 8, &reference, CodingOptions::empty(), true);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0b0011_1000]);
        assert_eq!(changes, [2, 5, 8, 8]);
    }

    #[test]
    fn vertical_offsets() {
        // VR1 (011) then VL1 (010): black from 3 to 4, then pass.
        let reference = [2, 5, 8, 8];
        let data = [0b011_010_00, 0b01_000000];
        let (result, out, changes) =
            decode_row(&data, 8, &reference, CodingOptions::empty(), true);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0b0001_0000]);
        assert_eq!(changes, [3, 4, 8, 8]);
    }

    #[test]
    fn vertical_left_of_a0_is_invalid() {
        // VL3 (0000010) against b1 = 2.
        let reference = [2, 5, 8, 8];
        let data = [0b0000010_0];
        let (result, ..) = decode_row(&data, 8, &reference, CodingOptions::empty(), true);

        assert_eq!(result, Err(ErrorKind::InvalidTwoDimCode));
    }

    #[test]
    fn vertical_right_is_clamped() {
        // White line reference, VR3 puts a1 at width + 3.
        let reference = [8, 8];
        let data = [0b0000011_0];
        let (result, out, changes) =
            decode_row(&data, 8, &reference, CodingOptions::empty(), true);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0]);
        assert_eq!(changes, [8, 8]);
    }

    #[test]
    fn horizontal_mode() {
        // H (001), white 2 (0111), black 3 (10), then V0 (1) against the white
        // reference ends the row.
        let reference = [8, 8];
        let data = [0b001_0111_1, 0b0_1_000000];
        let (result, out, changes) =
            decode_row(&data, 8, &reference, CodingOptions::empty(), true);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0b0011_1000]);
        assert_eq!(changes, [2, 5, 8, 8]);
    }

    #[test]
    fn pass_mode_keeps_color() {
        // Pass (0001) over the black span, then V0 to the end of the row.
        let reference = [2, 5, 8, 8];
        let data = [0b0001_1_000];
        let (result, out, changes) =
            decode_row(&data, 8, &reference, CodingOptions::empty(), true);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0]);
        assert_eq!(changes, [8, 8]);
    }

    #[test]
    fn extension_without_uncompressed_mode() {
        // Extension (0000001) is skipped, then pass (0001).
        let reference = [8, 8];
        let data = [0b0000001_0, 0b001_00000];
        let (result, out, _) = decode_row(&data, 8, &reference, CodingOptions::empty(), true);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0]);
    }

    #[test]
    fn uncompressed_mode() {
        // Extension (0000001) + 111, then 01 (white, black), 1 (black),
        // 000001 (five white) and the exit 0000001 + T=0.
        let reference = [8, 8];
        let data = [0b0000001_1, 0b11_01_1_000, 0b001_00000, 0b01_0_00000];
        let (result, out, changes) =
            decode_row(&data, 8, &reference, CodingOptions::UNCOMPRESSED, true);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0b0110_0000]);
        assert_eq!(changes, [1, 3, 8, 8]);
    }

    #[test]
    fn uncompressed_exit_with_black() {
        // Extension + 111, 00001 (four white, one black), exit with one white
        // (00000001) and T=1. A V0 against the white line then finishes the
        // row in black.
        let reference = [8, 8];
        let data = [0b0000001_1, 0b11_00001_0, 0b0000001_1, 0b1_0000000];
        let (result, out, changes) =
            decode_row(&data, 8, &reference, CodingOptions::UNCOMPRESSED, true);

        assert_eq!(result, Ok(()));
        assert_eq!(out, [0b0000_1011]);
        assert_eq!(changes, [4, 5, 6, 8, 8]);
    }

    #[test]
    fn uncompressed_needs_prefix() {
        let reference = [8, 8];
        let data = [0b0000001_1, 0b10_000000];
        let (result, ..) = decode_row(&data, 8, &reference, CodingOptions::UNCOMPRESSED, true);

        assert_eq!(result, Err(ErrorKind::InvalidTwoDimCode));
    }

    #[test]
    fn session_reuses_buffers() {
        let settings = DecodeSettings {
            columns: 2,
            rows: 1,
            ..DecodeSettings::default()
        };
        let mut decoder = FaxDecoder::new();

        let bitmap = decoder.decode(&[0b0111_0000], &settings);
        assert_eq!(bitmap.map(|b| b.data), Ok(vec![0]));
        assert_eq!(decoder.reference.as_slice(), &[2, 2]);

        let bitmap = decoder.decode(&[0b0111_0000], &settings);
        assert_eq!(bitmap.map(|b| b.data), Ok(vec![0]));
        assert_eq!(decoder.reference.as_slice(), &[2, 2]);

        // White 0 (00110101), black 2 (11), white 1 (000111).
        let settings = DecodeSettings {
            columns: 3,
            ..settings
        };
        let bitmap = decoder.decode(&[0b00110101, 0b11_000111], &settings);
        assert_eq!(bitmap.map(|b| b.data), Ok(vec![0b1100_0000]));
        assert_eq!(decoder.reference.as_slice(), &[0, 2, 3, 3]);
    }

    fn assert_sealed(columns: &[usize], width: usize) {
        let (changes, sentinels) = columns.split_at(columns.len() - 2);

        assert_eq!(sentinels, [width, width]);
        assert!(changes.windows(2).all(|pair| pair[0] < pair[1]), "{columns:?}");
        assert!(changes.iter().all(|column| *column < width), "{columns:?}");
    }

    #[test]
    fn reference_rows_stay_sealed() {
        let inputs: [(&[u8], u16, u32); 2] = [
            (include_bytes!("../tests/fixtures/odd_g4.fax"), 4, 0),
            (include_bytes!("../tests/fixtures/odd_g3_2d.fax"), 3, 1),
        ];
        let mut decoder = FaxDecoder::new();

        for (data, compression, options) in inputs {
            // Stopping after each row leaves that row as the reference.
            for rows in 1..=41 {
                let settings =
                    DecodeSettings::from_tiff(compression, options, 1, 333, rows).unwrap();
                decoder.decode(data, &settings).unwrap();

                assert_sealed(decoder.reference.as_slice(), 333);
            }
        }
    }

    #[test]
    fn buffers_grow_with_the_data() {
        let settings = DecodeSettings::new(u32::MAX, 0);
        let bitmap = FaxDecoder::new().decode(&[], &settings).unwrap();

        assert_eq!(bitmap.height, 0);
        assert!(bitmap.data.is_empty());
    }

    #[test]
    fn eofb_detection() {
        let data = [0b00000000, 0b0001_0000, 0b00000001];
        let cursor = BitCursor::new(&data, FillOrder::MsbToLsb);
        assert!(at_eofb(&cursor));

        let data = [0b00000000, 0b0001_1000, 0b00000001];
        let cursor = BitCursor::new(&data, FillOrder::MsbToLsb);
        assert!(!at_eofb(&cursor));
    }
}

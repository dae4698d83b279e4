/*!
A memory-safe, pure-Rust decoder for CCITT Group 3 and Group 4 fax data.

This crate decodes the bi-level image compression schemes of ITU-T T.4
(Modified Huffman and Modified READ) and ITU-T T.6 (Modified Modified READ),
as found in TIFF files with compression 2, 3 or 4 and in PDF streams using
the `CCITTFaxDecode` filter.

The input is the raw encoded data together with the parameters that the
surrounding container provides, and the output is a packed 1-bit raster in
which set bits are black pixels.

# Example
```rust,no_run
use faxline::{DecodeSettings, EncodingMode};

let data = std::fs::read("page.g4").unwrap();
let settings = DecodeSettings {
    columns: 1728,
    rows: 2200,
    encoding: EncodingMode::Group4,
    ..DecodeSettings::default()
};

let bitmap = faxline::decode(&data, &settings).unwrap();
println!("decoded {}x{} image", bitmap.width, bitmap.height);
```

If you want to decode many images, create a [`FaxDecoder`] once and reuse
it, so that its row buffers are only allocated again when the width changes.

# Cargo features
This crate has one optional feature:
- `image`: Allows converting a [`Bitmap`] into an `image::GrayImage`.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

use bitflags::bitflags;

mod changes;
mod cursor;
mod decode;
mod eol;
mod error;
#[cfg(feature = "image")]
mod integration;
mod raster;
mod run;
mod tables;

pub use cursor::{FillOrder, reverse_bits};
pub use decode::FaxDecoder;
pub use error::{DecodeError, ErrorKind, Result};
pub use raster::{Bitmap, paint_run};

/// The coding scheme of the data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncodingMode {
    /// Group 4 (MMR): every row is coded two-dimensionally and there are no
    /// EOL markers. PDF `K` < 0.
    Group4,
    /// Group 3 one-dimensional (MH): every row is Modified Huffman coded.
    /// PDF `K` = 0.
    Group3_1D,
    /// Group 3 two-dimensional (MR): each row carries a tag bit that selects
    /// one- or two-dimensional coding. PDF `K` > 0, where at most `k - 1`
    /// rows follow each one-dimensional row in two-dimensional coding.
    Group3_2D {
        /// The `K` parameter.
        k: u32,
    },
}

impl EncodingMode {
    /// Map the PDF `K` parameter.
    pub fn from_k(k: i32) -> Self {
        match k {
            ..0 => Self::Group4,
            0 => Self::Group3_1D,
            k => Self::Group3_2D { k: k.unsigned_abs() },
        }
    }

    /// The PDF `K` parameter for this mode.
    pub fn k(&self) -> i32 {
        match self {
            Self::Group4 => -1,
            Self::Group3_1D => 0,
            Self::Group3_2D { k } => i32::try_from(*k).unwrap_or(i32::MAX),
        }
    }
}

bitflags! {
    /// Coding options, laid out like the TIFF `T4Options` field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CodingOptions: u32 {
        /// Rows may be two-dimensionally coded and carry a tag bit.
        const TWO_DIMENSIONAL = 1 << 0;
        /// Uncompressed mode may be entered through the extension code.
        const UNCOMPRESSED = 1 << 1;
        /// EOL markers are padded to end on a byte boundary. Without EOL
        /// markers, every row starts on a byte boundary.
        const FILL_BITS = 1 << 2;
    }
}

impl Default for CodingOptions {
    fn default() -> Self {
        Self::empty()
    }
}

/// Settings that describe the encoded data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecodeSettings {
    /// The width of the image in pixels.
    pub columns: u32,
    /// The number of rows to decode. 0 means that rows are decoded until the
    /// data ends.
    pub rows: u32,
    /// The coding scheme.
    pub encoding: EncodingMode,
    /// Additional coding options.
    pub options: CodingOptions,
    /// The order of pixels within each byte.
    pub fill_order: FillOrder,
    /// Whether every row is preceded by an EOL marker.
    pub end_of_line: bool,
    /// Whether the data may be terminated by an end-of-block marker before
    /// all rows are decoded.
    pub end_of_block: bool,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            columns: 1728,
            rows: 0,
            encoding: EncodingMode::Group3_1D,
            options: CodingOptions::empty(),
            fill_order: FillOrder::MsbToLsb,
            end_of_line: false,
            end_of_block: true,
        }
    }
}

impl DecodeSettings {
    /// Create settings for an image of the given size with default coding
    /// parameters.
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Create settings from the TIFF `Compression`, `T4Options`/`T6Options`
    /// and `FillOrder` fields.
    pub fn from_tiff(
        compression: u16,
        options: u32,
        fill_order: u32,
        columns: u32,
        rows: u32,
    ) -> Result<Self> {
        let options = CodingOptions::from_bits_truncate(options);
        let fill_order = FillOrder::from_tiff(fill_order)?;
        let base = Self {
            columns,
            rows,
            fill_order,
            ..Self::default()
        };

        match compression {
            // Modified Huffman RLE: no EOLs, every row starts on a byte boundary.
            2 => Ok(Self {
                encoding: EncodingMode::Group3_1D,
                options: CodingOptions::FILL_BITS,
                ..base
            }),
            3 => Ok(Self {
                encoding: if options.contains(CodingOptions::TWO_DIMENSIONAL) {
                    EncodingMode::Group3_2D { k: u32::MAX }
                } else {
                    EncodingMode::Group3_1D
                },
                options,
                end_of_line: true,
                ..base
            }),
            4 => Ok(Self {
                encoding: EncodingMode::Group4,
                // T6Options only defines the uncompressed bit.
                options: options & CodingOptions::UNCOMPRESSED,
                ..base
            }),
            _ => Err(ErrorKind::UnsupportedCompression.into()),
        }
    }
}

/// Decode CCITT encoded data into a bitmap.
pub fn decode(data: &[u8], settings: &DecodeSettings) -> Result<Bitmap> {
    FaxDecoder::new().decode(data, settings)
}

//! Flattened lookup tables for the T.4 code words.
//!
//! Each table is indexed by a fixed number of upcoming bits. Short codes are
//! replicated across all slots that share their prefix, and every entry
//! records how many of the read bits actually belong to the code, so the
//! cursor can give back the rest.

/// A two-dimensional coding mode (T.4 Table 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Pass,
    Horizontal,
    Vertical(i8),
    /// The extension code `0000001`, followed by a three-bit selector.
    Extension,
}

/// A pointer to a second-level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Escape {
    CommonMakeup,
    BlackShort,
    BlackLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Terminating,
    Makeup,
    Escape(Escape),
    Mode(Mode),
    Eol,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    /// The run length for run codes.
    pub(crate) value: u16,
    /// The number of bits the code occupies within this table's index.
    pub(crate) bits: u8,
    pub(crate) kind: Kind,
}

impl Entry {
    const INVALID: Self = Self {
        value: 0,
        bits: 0,
        kind: Kind::Invalid,
    };
}

/// A run length with its code word, written out as in the recommendation.
type Code = (u16, &'static str);

/// White terminating codes (T.4 Table 2).
const WHITE_TERMINATING: &[Code] = &[
    (0, "00110101"),
    (1, "000111"),
    (2, "0111"),
    (3, "1000"),
    (4, "1011"),
    (5, "1100"),
    (6, "1110"),
    (7, "1111"),
    (8, "10011"),
    (9, "10100"),
    (10, "00111"),
    (11, "01000"),
    (12, "001000"),
    (13, "000011"),
    (14, "110100"),
    (15, "110101"),
    (16, "101010"),
    (17, "101011"),
    (18, "0100111"),
    (19, "0001100"),
    (20, "0001000"),
    (21, "0010111"),
    (22, "0000011"),
    (23, "0000100"),
    (24, "0101000"),
    (25, "0101011"),
    (26, "0010011"),
    (27, "0100100"),
    (28, "0011000"),
    (29, "00000010"),
    (30, "00000011"),
    (31, "00011010"),
    (32, "00011011"),
    (33, "00010010"),
    (34, "00010011"),
    (35, "00010100"),
    (36, "00010101"),
    (37, "00010110"),
    (38, "00010111"),
    (39, "00101000"),
    (40, "00101001"),
    (41, "00101010"),
    (42, "00101011"),
    (43, "00101100"),
    (44, "00101101"),
    (45, "00000100"),
    (46, "00000101"),
    (47, "00001010"),
    (48, "00001011"),
    (49, "01010010"),
    (50, "01010011"),
    (51, "01010100"),
    (52, "01010101"),
    (53, "00100100"),
    (54, "00100101"),
    (55, "01011000"),
    (56, "01011001"),
    (57, "01011010"),
    (58, "01011011"),
    (59, "01001010"),
    (60, "01001011"),
    (61, "00110010"),
    (62, "00110011"),
    (63, "00110100"),
];

/// White make-up codes (T.4 Table 3a).
const WHITE_MAKEUP: &[Code] = &[
    (64, "11011"),
    (128, "10010"),
    (192, "010111"),
    (256, "0110111"),
    (320, "00110110"),
    (384, "00110111"),
    (448, "01100100"),
    (512, "01100101"),
    (576, "01101000"),
    (640, "01100111"),
    (704, "011001100"),
    (768, "011001101"),
    (832, "011010010"),
    (896, "011010011"),
    (960, "011010100"),
    (1024, "011010101"),
    (1088, "011010110"),
    (1152, "011010111"),
    (1216, "011011000"),
    (1280, "011011001"),
    (1344, "011011010"),
    (1408, "011011011"),
    (1472, "010011000"),
    (1536, "010011001"),
    (1600, "010011010"),
    (1664, "011000"),
    (1728, "010011011"),
];

/// Black terminating codes (T.4 Table 2).
const BLACK_TERMINATING: &[Code] = &[
    (0, "0000110111"),
    (1, "010"),
    (2, "11"),
    (3, "10"),
    (4, "011"),
    (5, "0011"),
    (6, "0010"),
    (7, "00011"),
    (8, "000101"),
    (9, "000100"),
    (10, "0000100"),
    (11, "0000101"),
    (12, "0000111"),
    (13, "00000100"),
    (14, "00000111"),
    (15, "000011000"),
    (16, "0000010111"),
    (17, "0000011000"),
    (18, "0000001000"),
    (19, "00001100111"),
    (20, "00001101000"),
    (21, "00001101100"),
    (22, "00000110111"),
    (23, "00000101000"),
    (24, "00000010111"),
    (25, "00000011000"),
    (26, "000011001010"),
    (27, "000011001011"),
    (28, "000011001100"),
    (29, "000011001101"),
    (30, "000001101000"),
    (31, "000001101001"),
    (32, "000001101010"),
    (33, "000001101011"),
    (34, "000011010010"),
    (35, "000011010011"),
    (36, "000011010100"),
    (37, "000011010101"),
    (38, "000011010110"),
    (39, "000011010111"),
    (40, "000001101100"),
    (41, "000001101101"),
    (42, "000011011010"),
    (43, "000011011011"),
    (44, "000001010100"),
    (45, "000001010101"),
    (46, "000001010110"),
    (47, "000001010111"),
    (48, "000001100100"),
    (49, "000001100101"),
    (50, "000001010010"),
    (51, "000001010011"),
    (52, "000000100100"),
    (53, "000000110111"),
    (54, "000000111000"),
    (55, "000000100111"),
    (56, "000000101000"),
    (57, "000001011000"),
    (58, "000001011001"),
    (59, "000000101011"),
    (60, "000000101100"),
    (61, "000001011010"),
    (62, "000001100110"),
    (63, "000001100111"),
];

/// Black make-up codes (T.4 Table 3a).
const BLACK_MAKEUP: &[Code] = &[
    (64, "0000001111"),
    (128, "000011001000"),
    (192, "000011001001"),
    (256, "000001011011"),
    (320, "000000110011"),
    (384, "000000110100"),
    (448, "000000110101"),
    (512, "0000001101100"),
    (576, "0000001101101"),
    (640, "0000001001010"),
    (704, "0000001001011"),
    (768, "0000001001100"),
    (832, "0000001001101"),
    (896, "0000001110010"),
    (960, "0000001110011"),
    (1024, "0000001110100"),
    (1088, "0000001110101"),
    (1152, "0000001110110"),
    (1216, "0000001110111"),
    (1280, "0000001010010"),
    (1344, "0000001010011"),
    (1408, "0000001010100"),
    (1472, "0000001010101"),
    (1536, "0000001011010"),
    (1600, "0000001011011"),
    (1664, "0000001100100"),
    (1728, "0000001100101"),
];

/// Extended make-up codes shared by both colors (T.4 Table 3b).
const COMMON_MAKEUP_CODES: &[Code] = &[
    (1792, "00000001000"),
    (1856, "00000001100"),
    (1920, "00000001101"),
    (1984, "000000010010"),
    (2048, "000000010011"),
    (2112, "000000010100"),
    (2176, "000000010101"),
    (2240, "000000010110"),
    (2304, "000000010111"),
    (2368, "000000011100"),
    (2432, "000000011101"),
    (2496, "000000011110"),
    (2560, "000000011111"),
];

/// Store `code` in every slot of `table` whose index starts with the part of
/// `code` after `prefix`. Codes that do not start with `prefix` or do not fit
/// are skipped.
const fn place<const N: usize>(
    table: &mut [Entry; N],
    prefix: &str,
    code: &str,
    value: u16,
    kind: Kind,
) {
    let width = N.trailing_zeros() as usize;
    let prefix = prefix.as_bytes();
    let code = code.as_bytes();

    if code.len() <= prefix.len() || code.len() - prefix.len() > width {
        return;
    }

    let mut i = 0;
    while i < prefix.len() {
        if code[i] != prefix[i] {
            return;
        }
        i += 1;
    }

    let len = code.len() - prefix.len();
    let mut index = 0;
    while i < code.len() {
        index = (index << 1) | (code[i] - b'0') as usize;
        i += 1;
    }

    let shift = width - len;
    let mut slot = index << shift;
    let end = (index + 1) << shift;

    while slot < end {
        table[slot] = Entry {
            value,
            bits: len as u8,
            kind,
        };
        slot += 1;
    }
}

const fn place_runs<const N: usize>(table: &mut [Entry; N], prefix: &str, codes: &[Code]) {
    let mut i = 0;
    while i < codes.len() {
        let (run, code) = codes[i];
        let kind = if run < 64 {
            Kind::Terminating
        } else {
            Kind::Makeup
        };
        place(table, prefix, code, run, kind);
        i += 1;
    }
}

const COMMON_ESCAPE: &str = "00000001";
const EOL_PREFIX: &str = "00000000000";

/// White runs, indexed by the next 10 bits.
pub(crate) const WHITE: [Entry; 1 << 10] = {
    let mut table = [Entry::INVALID; 1 << 10];
    place_runs(&mut table, "", WHITE_TERMINATING);
    place_runs(&mut table, "", WHITE_MAKEUP);
    place(&mut table, "", COMMON_ESCAPE, 0, Kind::Escape(Escape::CommonMakeup));
    place(&mut table, "", "0000000000", 0, Kind::Eol);
    table
};

/// Black codes of up to four bits, indexed by the next 4 bits. The
/// prefixes `0001` and `0000` lead to `BLACK_SHORT` and `BLACK_LONG`.
pub(crate) const BLACK_PREFIX: [Entry; 1 << 4] = {
    let mut table = [Entry::INVALID; 1 << 4];
    place_runs(&mut table, "", BLACK_TERMINATING);
    place(&mut table, "", "0001", 0, Kind::Escape(Escape::BlackShort));
    place(&mut table, "", "0000", 0, Kind::Escape(Escape::BlackLong));
    table
};

/// Black codes starting with `0001`, indexed by the following 2 bits.
pub(crate) const BLACK_SHORT: [Entry; 1 << 2] = {
    let mut table = [Entry::INVALID; 1 << 2];
    place_runs(&mut table, "0001", BLACK_TERMINATING);
    table
};

/// Black codes starting with `0000`, indexed by the following 9 bits.
pub(crate) const BLACK_LONG: [Entry; 1 << 9] = {
    let mut table = [Entry::INVALID; 1 << 9];
    place_runs(&mut table, "0000", BLACK_TERMINATING);
    place_runs(&mut table, "0000", BLACK_MAKEUP);
    place(&mut table, "0000", COMMON_ESCAPE, 0, Kind::Escape(Escape::CommonMakeup));
    place(&mut table, "0000", EOL_PREFIX, 0, Kind::Eol);
    table
};

/// Extended make-up codes after `00000001`, indexed by the following 4 bits.
pub(crate) const COMMON_MAKEUP: [Entry; 1 << 4] = {
    let mut table = [Entry::INVALID; 1 << 4];
    place_runs(&mut table, COMMON_ESCAPE, COMMON_MAKEUP_CODES);
    table
};

/// Two-dimensional mode codes, indexed by the next 7 bits.
pub(crate) const MODES: [Entry; 1 << 7] = {
    const CODES: [(&str, Mode); 10] = [
        ("0001", Mode::Pass),
        ("001", Mode::Horizontal),
        ("1", Mode::Vertical(0)),
        ("011", Mode::Vertical(1)),
        ("000011", Mode::Vertical(2)),
        ("0000011", Mode::Vertical(3)),
        ("010", Mode::Vertical(-1)),
        ("000010", Mode::Vertical(-2)),
        ("0000010", Mode::Vertical(-3)),
        ("0000001", Mode::Extension),
    ];

    let mut table = [Entry::INVALID; 1 << 7];
    let mut i = 0;
    while i < CODES.len() {
        let (code, mode) = CODES[i];
        place(&mut table, "", code, 0, Kind::Mode(mode));
        i += 1;
    }
    table
};

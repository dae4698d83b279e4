#![no_main]

use faxline::{CodingOptions, DecodeSettings, EncodingMode, FillOrder};
use libfuzzer_sys::fuzz_target;

// Header layout (8 bytes):
// [0..2]  columns (u16 LE)
// [2..4]  rows (u16 LE, at most 4096, 0 = until the data ends)
// [4]     K parameter (i8)
// [5]     coding options (T4Options bits)
// [6]     bit 0: end_of_line, bit 1: end_of_block, bit 2: LSB-to-MSB fill order
// [7]     reserved
// [8..]   CCITT encoded data

const HEADER_SIZE: usize = 8;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER_SIZE {
        return;
    }

    let flags = data[6];
    let settings = DecodeSettings {
        columns: u32::from(u16::from_le_bytes([data[0], data[1]])),
        rows: u32::from(u16::from_le_bytes([data[2], data[3]]) % 4097),
        encoding: EncodingMode::from_k(i32::from(data[4] as i8)),
        options: CodingOptions::from_bits_truncate(u32::from(data[5])),
        fill_order: if flags & 4 != 0 {
            FillOrder::LsbToMsb
        } else {
            FillOrder::MsbToLsb
        },
        end_of_line: flags & 1 != 0,
        end_of_block: flags & 2 != 0,
    };

    let _ = faxline::decode(&data[HEADER_SIZE..], &settings);
});

//! This example shows you how to convert raw CCITT fax data into a PNG file.

#![allow(missing_docs)]

use std::process::ExitCode;

use faxline::{DecodeSettings, EncodingMode};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if !(5..=6).contains(&args.len()) {
        eprintln!(
            "Usage: {} <input> <output.png> <columns> <K> [rows]",
            args[0]
        );

        return ExitCode::FAILURE;
    }

    let input_path = &args[1];
    let output_path = &args[2];

    let (Ok(columns), Ok(k)) = (args[3].parse::<u32>(), args[4].parse::<i32>()) else {
        eprintln!("Columns and K must be integers");

        return ExitCode::FAILURE;
    };

    let rows = match args.get(5).map(|rows| rows.parse::<u32>()) {
        None => 0,
        Some(Ok(rows)) => rows,
        Some(Err(err)) => {
            eprintln!("Invalid row count: {err}");

            return ExitCode::FAILURE;
        }
    };

    let data = match std::fs::read(input_path) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Failed to read input file: {err}");

            return ExitCode::FAILURE;
        }
    };

    let settings = DecodeSettings {
        columns,
        rows,
        encoding: EncodingMode::from_k(k),
        // Group 3 data in the wild nearly always carries EOLs.
        end_of_line: k >= 0,
        ..DecodeSettings::default()
    };

    let bitmap = match faxline::decode(&data, &settings) {
        Ok(bitmap) => bitmap,
        Err(err) => {
            eprintln!("Failed to decode fax data: {err}");

            return ExitCode::FAILURE;
        }
    };

    println!("Decoded: {}x{} image", bitmap.width, bitmap.height);

    if let Err(err) = bitmap.to_luma8().save(output_path) {
        eprintln!("Failed to save PNG: {err}");

        return ExitCode::FAILURE;
    }

    eprintln!("Saved: {output_path}");

    ExitCode::SUCCESS
}

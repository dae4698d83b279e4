//! Decoding of images produced by libtiff's fax encoder.
//!
//! Run `python3 tests/fixtures/generate.py` to regenerate the inputs.

use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use faxline::{DecodeSettings, FaxDecoder, reverse_bits};

static FIXTURES_PATH: LazyLock<PathBuf> =
    LazyLock::new(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"));

/// Encoded strip, reference image, TIFF compression and T4Options.
const CASES: &[(&str, &str, u16, u32)] = &[
    ("letter_mh", "letter", 2, 0),
    ("letter_g3_1d", "letter", 3, 0),
    ("letter_g3_2d", "letter", 3, 1),
    ("letter_g3_2d_fill", "letter", 3, 0b101),
    ("letter_g4", "letter", 4, 0),
    ("odd_g3_2d", "odd", 3, 1),
    ("odd_g4", "odd", 4, 0),
    ("long_runs_g3_1d", "long_runs", 3, 0),
    ("long_runs_g4", "long_runs", 4, 0),
];

struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Load a binary PBM, whose rows are packed exactly like a decoded bitmap.
fn load_raster(name: &str) -> Raster {
    let file = fs::read(FIXTURES_PATH.join(format!("{name}.pbm"))).unwrap();
    let mut fields = file.splitn(4, |b| b.is_ascii_whitespace());

    assert_eq!(fields.next(), Some(&b"P4"[..]));
    let mut number = || {
        let field = fields.next().unwrap();
        std::str::from_utf8(field).unwrap().parse::<u32>().unwrap()
    };
    let width = number();
    let height = number();
    let data = fields.next().unwrap().to_vec();

    assert_eq!(data.len(), width.div_ceil(8) as usize * height as usize);

    Raster {
        width,
        height,
        data,
    }
}

fn load_encoded(name: &str) -> Vec<u8> {
    fs::read(FIXTURES_PATH.join(format!("{name}.fax"))).unwrap()
}

fn settings(raster: &Raster, compression: u16, options: u32, rows: u32) -> DecodeSettings {
    DecodeSettings::from_tiff(compression, options, 1, raster.width, rows).unwrap()
}

#[test]
fn matches_reference_rasters() {
    let mut decoder = FaxDecoder::new();

    for (name, image, compression, options) in CASES {
        let raster = load_raster(image);
        let data = load_encoded(name);
        let settings = settings(&raster, *compression, *options, raster.height);

        let bitmap = decoder
            .decode(&data, &settings)
            .unwrap_or_else(|err| panic!("{name}: {err}"));

        assert_eq!(bitmap.width, raster.width, "{name}");
        assert_eq!(bitmap.height, raster.height, "{name}");
        assert!(bitmap.data == raster.data, "{name}: raster differs");
    }
}

#[test]
fn decode_into_caller_raster() {
    let raster = load_raster("letter");
    let data = load_encoded("letter_g3_2d");
    let mut out = vec![0; raster.data.len()];

    let rows = FaxDecoder::new()
        .decode_into(&data, &settings(&raster, 3, 1, raster.height), &mut out)
        .unwrap();

    assert_eq!(rows, raster.height);
    assert!(out == raster.data);
}

#[test]
fn group4_height_from_end_of_block() {
    let cases = [
        ("letter_g4", "letter"),
        ("odd_g4", "odd"),
        ("long_runs_g4", "long_runs"),
    ];

    for (name, image) in cases {
        let raster = load_raster(image);
        let data = load_encoded(name);

        let bitmap = faxline::decode(&data, &settings(&raster, 4, 0, 0)).unwrap();

        assert_eq!(bitmap.height, raster.height, "{name}");
        assert!(bitmap.data == raster.data, "{name}: raster differs");
    }
}

#[test]
fn lsb_to_msb_strip() {
    let raster = load_raster("odd");
    let mut data = load_encoded("odd_g4");
    reverse_bits(&mut data);

    let settings = DecodeSettings::from_tiff(4, 0, 2, raster.width, raster.height).unwrap();
    let bitmap = faxline::decode(&data, &settings).unwrap();

    assert!(bitmap.data == raster.data);
}

#[test]
fn truncated_strip_fails_with_position() {
    let raster = load_raster("letter");
    let data = load_encoded("letter_g3_1d");

    let err = faxline::decode(&data[..data.len() / 2], &settings(&raster, 3, 0, raster.height))
        .unwrap_err();

    assert!(err.row().is_some_and(|row| row > 0 && row < raster.height));
}

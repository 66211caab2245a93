/*
    avhrr-l1b
    https://github.com/dbalsom/avhrr-l1b

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    tests/encoding_guess.rs

    Probing the sample encoding of data sets with a blank encoding field
*/
mod common;

use avhrr_l1b::{L1bError, L1bLoader, SampleEncoding};
use common::{sample_value, ContainerBuilder};

fn init() {
    match env_logger::builder().is_test(true).try_init() {
        Ok(_) => {
            println!("Logger initialized. A debug log should follow:");
            log::debug!("Logger initialized.");
        }
        Err(e) => eprintln!("Failed to initialize logger: {}", e),
    }
}

#[test]
fn test_guess_unpacked_8bit() {
    init();
    let builder = ContainerBuilder::new("NK", "GHRR")
        .record_encoding(SampleEncoding::Unpacked8Bit)
        .records(10);

    let mut dataset = L1bLoader::new()
        .with_encoding_guess(true)
        .load_reader(builder.cursor())
        .unwrap();

    assert_eq!(dataset.descriptor().encoding, SampleEncoding::Unpacked8Bit);
    assert!(!dataset.descriptor().encoding_declared);
    assert_eq!(dataset.height(), 10);

    let row = dataset.read_row(4, 6).unwrap();
    assert_eq!(row.samples[3], sample_value(6, 3 * 5 + 4, SampleEncoding::Unpacked8Bit));
}

#[test]
fn test_guess_keeps_packed() {
    init();
    let builder = ContainerBuilder::new("NF", "HRPT").records(6);
    let dataset = L1bLoader::new()
        .with_encoding_guess(true)
        .load_reader(builder.cursor())
        .unwrap();
    assert_eq!(dataset.layout().encoding, SampleEncoding::Packed10Bit);
}

#[test]
fn test_guess_needs_enough_records() {
    init();
    let builder = ContainerBuilder::new("NK", "GHRR").records(2);
    assert!(matches!(
        L1bLoader::new().with_encoding_guess(true).load_reader(builder.cursor()),
        Err(L1bError::UnrecognizedEncoding(_))
    ));

    // Without guessing the blank field means packed samples.
    let dataset = L1bLoader::new().load_reader(builder.cursor()).unwrap();
    assert_eq!(dataset.layout().encoding, SampleEncoding::Packed10Bit);
}

#[test]
fn test_declared_encoding_is_not_guessed() {
    init();
    let builder = ContainerBuilder::new("NK", "GHRR").word_size(b"10").records(2);
    let dataset = L1bLoader::new()
        .with_encoding_guess(true)
        .load_reader(builder.cursor())
        .unwrap();
    assert_eq!(dataset.layout().encoding, SampleEncoding::Packed10Bit);
}

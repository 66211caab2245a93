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

    tests/record.rs

    Record access below the data set level
*/
mod common;

use avhrr_l1b::{
    record::{RecordReader, RasterExtent},
    unpack::{band_row, unpack_samples},
    L1bError,
    ScanDirection,
};
use common::ContainerBuilder;

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
fn test_seek_record_mirrors_ascending() {
    init();
    let builder = ContainerBuilder::new("NL", "HRPT").records(5);
    let plan = builder.plan();
    let extent = RasterExtent::from_container_size(builder.build().len() as u64, &plan);
    assert_eq!(extent.height, 5);

    let descending = RecordReader::new(builder.cursor(), plan, extent, ScanDirection::Descending);
    let ascending = RecordReader::new(builder.cursor(), plan, extent, ScanDirection::Ascending);

    for line in 0..5 {
        let offset = (plan.file_header_size + line * plan.record_size) as u64;
        assert_eq!(descending.seek_record(line).unwrap(), offset);
        assert_eq!(ascending.seek_record(4 - line).unwrap(), offset);
    }
    assert!(matches!(descending.seek_record(5), Err(L1bError::ParameterError(_))));
}

#[test]
fn test_read_record_returns_whole_record() {
    init();
    let builder = ContainerBuilder::new("NL", "HRPT").records(3);
    let plan = builder.plan();
    let extent = RasterExtent::from_container_size(builder.build().len() as u64, &plan);
    let mut reader = RecordReader::new(builder.cursor(), plan, extent, ScanDirection::Descending);

    let record = reader.read_record(2).unwrap();
    assert_eq!(record.line, 2);
    assert_eq!(record.data, builder.record(&plan, 2));
    // Scan line numbers are stored one-based.
    assert_eq!(&record.header(&plan)[0..2], &[0x00, 0x03]);
}

#[test]
fn test_truncated_record() {
    init();
    let builder = ContainerBuilder::new("NK", "GHRR").records(2);
    let plan = builder.plan();
    let mut data = builder.build();
    data.truncate(data.len() - 100);

    // Claim one more line than the container really holds.
    let extent = RasterExtent { width: plan.width, height: 2 };
    let mut reader = RecordReader::new(std::io::Cursor::new(data), plan, extent, ScanDirection::Descending);

    assert!(reader.read_record(0).is_ok());
    match reader.read_record(1) {
        Err(L1bError::TruncatedRecord { line, expected, read }) => {
            assert_eq!(line, 1);
            assert_eq!(expected, plan.record_size);
            assert_eq!(read, plan.record_size - 100);
        }
        other => panic!("expected a truncated record, got {:?}", other.map(|r| r.line)),
    }
    // The reader is still usable after a failed read.
    assert!(reader.read_record(0).is_ok());
}

#[test]
fn test_record_rows_mirror() {
    init();
    let builder = ContainerBuilder::new("NM", "FRAC").word_size(b"16").channels(&[1, 3, 4]).records(1);
    let plan = builder.plan();
    let extent = RasterExtent::from_container_size(builder.build().len() as u64, &plan);
    let mut reader = RecordReader::new(builder.cursor(), plan, extent, ScanDirection::Descending);

    let record = reader.read_record(0).unwrap();
    let samples = unpack_samples(&record, &plan);
    for band in 0..3 {
        let descending = band_row(&samples, band, &plan, ScanDirection::Descending).unwrap();
        let mut ascending = band_row(&samples, band, &plan, ScanDirection::Ascending).unwrap();
        assert_eq!(descending.samples.len(), 2048);
        ascending.samples.reverse();
        assert_eq!(ascending.samples, descending.samples);
    }
}

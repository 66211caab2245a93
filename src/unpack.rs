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

    src/unpack.rs

    Decoding of a scan line record's payload into per-band rows of samples.

    Samples are interleaved by pixel: for a data set with N bands the payload
    holds pixel 0 of every band, then pixel 1 of every band, and so on.
*/
use crate::{
    bits::{extract_packed10_slice, extract_unpacked},
    layout::LayoutPlan,
    record::ScanRecord,
    types::{SampleEncoding, ScanDirection},
    L1bError,
};

/// One band of one scan line, always exactly as wide as the raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandRow {
    /// Zero-based band index within the data set.
    pub band: usize,
    pub samples: Vec<u16>,
}

/// Decode the payload of `record` into a flat, pixel interleaved sample buffer.
pub fn unpack_samples(record: &ScanRecord, plan: &LayoutPlan) -> Vec<u16> {
    let payload = record.payload(plan);

    match plan.encoding {
        SampleEncoding::Packed10Bit => {
            let mut samples = Vec::new();
            extract_packed10_slice(payload, &mut samples);
            samples
        }
        encoding => extract_unpacked(payload, encoding, plan.width * plan.band_count),
    }
}

/// Pull the samples of band `band` out of a flat sample buffer produced by [`unpack_samples`].
///
/// For an ascending pass the pixel order is reversed so that west is always on the left.
pub fn band_row(
    samples: &[u16],
    band: usize,
    plan: &LayoutPlan,
    direction: ScanDirection,
) -> Result<BandRow, L1bError> {
    if band >= plan.band_count {
        return Err(L1bError::ParameterError(format!(
            "band {} out of range ({} bands)",
            band, plan.band_count
        )));
    }

    let stride = plan.band_count;
    // The record layout table guarantees every pixel is present.
    debug_assert!(samples.len() >= plan.width * stride);

    let pixels = samples[band..].iter().step_by(stride).take(plan.width).copied();
    let samples: Vec<u16> = match direction {
        ScanDirection::Descending => pixels.collect(),
        ScanDirection::Ascending => {
            let mut row: Vec<u16> = pixels.collect();
            row.reverse();
            row
        }
    };

    Ok(BandRow { band, samples })
}

/// Decode every band of a record.
pub fn unpack_record(record: &ScanRecord, plan: &LayoutPlan, direction: ScanDirection) -> Result<Vec<BandRow>, L1bError> {
    let samples = unpack_samples(record, plan);
    (0..plan.band_count)
        .map(|band| band_row(&samples, band, plan, direction))
        .collect()
}

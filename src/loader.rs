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

    src/loader.rs

    A builder for opening L1bDataset objects with non-default options.
*/
//! Calling [`L1bDataset::open`] is enough for most uses. [`L1bLoader`] adds control over
//! control point extraction and over how a blank sample encoding field is interpreted.

use crate::{
    gcp::GcpDensity,
    header::FormatDescriptor,
    io::ReadSeek,
    layout::resolve,
    record::{physical_offset, read_record_bytes},
    record_header::scan_line_number,
    types::SampleEncoding,
    util::get_length,
    L1bDataset,
    L1bError,
};
use std::{fs::File, io::BufReader, path::Path};

/// Number of leading records whose scan line numbers must advance evenly for a guessed sample
/// encoding to be accepted.
const GUESS_RECORDS: usize = 5;
const GUESS_ORDER: [SampleEncoding; 3] = [
    SampleEncoding::Packed10Bit,
    SampleEncoding::Unpacked8Bit,
    SampleEncoding::Unpacked16Bit,
];

/// Implements the Builder pattern for [`L1bDataset`] objects.
#[derive(Clone, Debug)]
pub struct L1bLoader {
    /// Extract the ground control points embedded in the records. Has no effect if the data set
    /// header says the records carry none.
    pub(crate) gcps: bool,
    pub(crate) gcp_density: GcpDensity,
    /// If the sample encoding field is blank, probe the records to find the encoding instead of
    /// assuming packed 10-bit samples.
    pub(crate) guess_encoding: bool,
}

impl Default for L1bLoader {
    fn default() -> Self {
        L1bLoader {
            gcps: true,
            gcp_density: GcpDensity::default(),
            guess_encoding: false,
        }
    }
}

impl L1bLoader {
    pub fn new() -> L1bLoader {
        Default::default()
    }

    pub fn with_gcps(mut self, state: bool) -> L1bLoader {
        self.gcps = state;
        self
    }

    /// Set the [`GcpDensity`] used when sampling control points.
    pub fn with_gcp_density(mut self, density: GcpDensity) -> L1bLoader {
        self.gcp_density = density;
        self
    }

    pub fn with_encoding_guess(mut self, state: bool) -> L1bLoader {
        self.guess_encoding = state;
        self
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<L1bDataset<BufReader<File>>, L1bError> {
        let file = File::open(path.as_ref())?;
        log::debug!("load(): opening {}", path.as_ref().display());
        self.load_reader(BufReader::new(file))
    }

    pub fn load_reader<RS: ReadSeek>(&self, source: RS) -> Result<L1bDataset<RS>, L1bError> {
        L1bDataset::open_reader(source, self)
    }
}

/// Try each sample encoding in turn until one produces a record layout whose leading records
/// carry evenly advancing scan line numbers.
pub(crate) fn guess_encoding<RS: ReadSeek>(
    source: &mut RS,
    descriptor: &FormatDescriptor,
) -> Result<FormatDescriptor, L1bError> {
    let container_size = get_length(source)?;

    for encoding in GUESS_ORDER {
        let candidate = descriptor.with_encoding(encoding);
        let plan = match resolve(&candidate) {
            Ok(plan) => plan,
            Err(_) => continue,
        };

        let records = container_size.saturating_sub(plan.file_header_size as u64) / plan.record_size as u64;
        if records < GUESS_RECORDS as u64 {
            log::trace!("guess_encoding(): {}: only {} records", encoding, records);
            continue;
        }

        let mut numbers = Vec::with_capacity(GUESS_RECORDS);
        for i in 0..GUESS_RECORDS {
            let header = read_record_bytes(source, physical_offset(&plan, i), 2, i)?;
            if let Some(n) = scan_line_number(&header) {
                numbers.push(n as i32);
            }
        }

        if evenly_advancing(&numbers) {
            log::debug!("guess_encoding(): sample encoding appears to be {}", encoding);
            return Ok(candidate);
        }
        log::trace!("guess_encoding(): {}: scan line numbers {:?}", encoding, numbers);
    }

    log::error!("guess_encoding(): no sample encoding matches the record structure");
    Err(L1bError::UnrecognizedEncoding("  ".to_string()))
}

/// True if `numbers` has at least two entries that all differ by the same non-zero step.
fn evenly_advancing(numbers: &[i32]) -> bool {
    let mut steps = numbers.windows(2).map(|w| w[1] - w[0]);
    match steps.next() {
        Some(first) if first != 0 => steps.all(|step| step == first),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evenly_advancing() {
        assert!(evenly_advancing(&[1, 2, 3, 4, 5]));
        assert!(evenly_advancing(&[10, 8, 6, 4, 2]));
        assert!(!evenly_advancing(&[1, 1, 1, 1, 1]));
        assert!(!evenly_advancing(&[1, 2, 4, 5, 6]));
        assert!(!evenly_advancing(&[1]));
    }

    #[test]
    fn test_loader_defaults() {
        let loader = L1bLoader::new();
        assert!(loader.gcps);
        assert_eq!(loader.gcp_density, GcpDensity::Sparse);
        assert!(!loader.guess_encoding);
    }
}

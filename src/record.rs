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

    src/record.rs

    Random access to the fixed-size scan line records of a data set.

    Records are stored in acquisition order. Raster line 0 is always the
    northern-most line, so for an ascending pass the record order is reversed
    when mapping raster lines to records.
*/
use crate::{
    io::{ReadSeek, SeekFrom},
    layout::LayoutPlan,
    types::ScanDirection,
    util::read_up_to,
    L1bError,
};

/// The size of the raster a container can supply. The height is derived from the size of the
/// container rather than from any header field, so a truncated or still downloading file can
/// be read up to its last complete record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RasterExtent {
    pub width: usize,
    pub height: usize,
}

impl RasterExtent {
    pub fn from_container_size(container_size: u64, plan: &LayoutPlan) -> RasterExtent {
        let data_size = container_size.saturating_sub(plan.file_header_size as u64);
        let height = (data_size / plan.record_size as u64) as usize;
        let remainder = data_size % plan.record_size as u64;

        if remainder != 0 {
            log::warn!(
                "RasterExtent: ignoring {} trailing bytes of a partial record after line {}",
                remainder,
                height
            );
        }

        RasterExtent {
            width: plan.width,
            height,
        }
    }
}

/// One physical scan line record: the record header followed by the sample payload.
#[derive(Clone, Debug)]
pub struct ScanRecord {
    /// Raster line this record was read for.
    pub line: usize,
    pub data: Vec<u8>,
}

impl ScanRecord {
    pub fn header(&self, plan: &LayoutPlan) -> &[u8] {
        &self.data[..plan.record_header_size]
    }

    pub fn payload(&self, plan: &LayoutPlan) -> &[u8] {
        &self.data[plan.payload_start..plan.payload_end]
    }
}

/// Byte offset of the record at physical (storage order) index `index`.
pub fn physical_offset(plan: &LayoutPlan, index: usize) -> u64 {
    plan.file_header_size as u64 + index as u64 * plan.record_size as u64
}

/// Seek to `offset` and read exactly `len` bytes. A short read is reported as a truncated
/// record for scan line `line`.
pub(crate) fn read_record_bytes<RS: ReadSeek>(
    source: &mut RS,
    offset: u64,
    len: usize,
    line: usize,
) -> Result<Vec<u8>, L1bError> {
    source.seek(SeekFrom::Start(offset))?;

    let mut buf = vec![0u8; len];
    let read = read_up_to(source, &mut buf)?;
    if read < len {
        log::error!(
            "read_record_bytes(): short read at offset {}: expected {} bytes, got {}",
            offset,
            len,
            read
        );
        return Err(L1bError::TruncatedRecord {
            line,
            expected: len,
            read,
        });
    }
    Ok(buf)
}

/// Reads scan line records on demand. Nothing is cached; every call seeks and reads the
/// underlying source again.
///
/// The reader owns the source's seek cursor, so it takes `&mut self` for every read. Sharing
/// one data set between threads requires external locking.
pub struct RecordReader<RS: ReadSeek> {
    source: RS,
    plan: LayoutPlan,
    extent: RasterExtent,
    direction: ScanDirection,
}

impl<RS: ReadSeek> RecordReader<RS> {
    pub fn new(source: RS, plan: LayoutPlan, extent: RasterExtent, direction: ScanDirection) -> Self {
        RecordReader {
            source,
            plan,
            extent,
            direction,
        }
    }

    pub fn plan(&self) -> &LayoutPlan {
        &self.plan
    }

    pub fn extent(&self) -> RasterExtent {
        self.extent
    }

    pub fn direction(&self) -> ScanDirection {
        self.direction
    }

    /// Return the file offset of the record holding raster line `line`.
    pub fn seek_record(&self, line: usize) -> Result<u64, L1bError> {
        if line >= self.extent.height {
            return Err(L1bError::ParameterError(format!(
                "line {} out of range (height {})",
                line, self.extent.height
            )));
        }

        let index = match self.direction {
            ScanDirection::Descending => line,
            ScanDirection::Ascending => self.extent.height - line - 1,
        };
        Ok(physical_offset(&self.plan, index))
    }

    /// Read the full record holding raster line `line`.
    pub fn read_record(&mut self, line: usize) -> Result<ScanRecord, L1bError> {
        let offset = self.seek_record(line)?;
        let data = read_record_bytes(&mut self.source, offset, self.plan.record_size, line)?;
        Ok(ScanRecord { line, data })
    }

    /// Read only the record header of the record at physical index `index`, ignoring the scan
    /// direction.
    pub fn read_physical_header(&mut self, index: usize) -> Result<Vec<u8>, L1bError> {
        let offset = physical_offset(&self.plan, index);
        read_record_bytes(&mut self.source, offset, self.plan.record_header_size, index)
    }

    pub fn into_inner(self) -> RS {
        self.source
    }
}

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

    src/record_header.rs

    Generation specific decoding of the per-record header: the scan time code,
    the earth location (scan direction) indicator and the embedded table of
    latitude/longitude control points.

    NOAA-9 through NOAA-14 records pack the time code into a byte oriented
    bitfield starting at byte 2:

        byte 2     byte 3     bytes 4-7                      byte 8
        YYYYYYYD   DDDDDDDD   _____MMM MMMMMMMM MMMMMMMM ...  ______L_

    NOAA-15 and later records use big-endian 16-bit words instead.
*/
use crate::{
    io::Cursor,
    layout::{GcpEncoding, LayoutPlan},
    types::{ScanDirection, SpacecraftGeneration},
    L1bError,
};
use binrw::{binrw, BinRead, BinReaderExt};
use std::{
    fmt,
    fmt::{Display, Formatter},
};

/// Acquisition time of a scan line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScanTime {
    pub year: u16,
    pub day: u16,
    pub millisecond: u32,
}

impl Display for ScanTime {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "year: {}, day: {}, millisecond: {}", self.year, self.day, self.millisecond)
    }
}

/// A raw control point as stored in the record header, in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct RawGcp {
    pub lat: f64,
    pub lon: f64,
}

pub(crate) trait RecordHeaderFormat {
    /// Decode the scan time and earth location indicator of a record header.
    fn scan_info(&self, header: &[u8]) -> Result<(ScanTime, ScanDirection), L1bError>;

    /// Number of control points in the record's table, capped at the plan's points per line.
    fn gcp_count(&self, header: &[u8], plan: &LayoutPlan) -> usize;

    /// Decode the first `count` latitude/longitude pairs of the record's control point table.
    fn gcp_pairs(&self, header: &[u8], plan: &LayoutPlan, count: usize) -> Result<Vec<RawGcp>, L1bError> {
        let mut cursor = Cursor::new(header);
        cursor.set_position(plan.gcp_table_offset as u64);

        let scale = plan.gcp_encoding.scale();
        let mut pairs = Vec::with_capacity(count);
        for _ in 0..count {
            let (lat, lon) = match plan.gcp_encoding {
                GcpEncoding::Fixed16 => (
                    cursor.read_be::<i16>()? as f64,
                    cursor.read_be::<i16>()? as f64,
                ),
                GcpEncoding::Fixed32 => (
                    cursor.read_be::<i32>()? as f64,
                    cursor.read_be::<i32>()? as f64,
                ),
            };
            pairs.push(RawGcp {
                lat: lat / scale,
                lon: lon / scale,
            });
        }
        Ok(pairs)
    }
}

pub(crate) struct Noaa9RecordHeader;

impl RecordHeaderFormat for Noaa9RecordHeader {
    fn scan_info(&self, header: &[u8]) -> Result<(ScanTime, ScanDirection), L1bError> {
        if header.len() < 9 {
            return Err(L1bError::IoError("record header too short for time code".to_string()));
        }

        let year = ((header[2] >> 1) & 0x7F) as u16;
        // Two digit year. Anything past 77 is in the 1900s.
        let year = if year > 77 { year + 1900 } else { year + 2000 };
        let day = ((header[2] & 0x01) as u16) << 8 | header[3] as u16;
        let millisecond = ((header[4] & 0x07) as u32) << 24
            | (header[5] as u32) << 16
            | (header[6] as u32) << 8
            | header[7] as u32;

        let direction = if header[8] & 0x02 == 0 {
            ScanDirection::Ascending
        }
        else {
            ScanDirection::Descending
        };

        Ok((ScanTime { year, day, millisecond }, direction))
    }

    fn gcp_count(&self, header: &[u8], plan: &LayoutPlan) -> usize {
        plan.gcp_count_offset
            .and_then(|offset| header.get(offset))
            .map_or(0, |&count| (count as usize).min(plan.gcps_per_line))
    }
}

#[allow(dead_code)]
#[derive(Debug)]
#[binrw]
#[brw(big)]
struct Noaa15TimeCode {
    scan_line: u16,
    year: u16,
    day: u16,
    clock_drift: u16,
    ms_high: u16,
    ms_low: u16,
    scan_status: u16,
}

pub(crate) struct Noaa15RecordHeader;

impl RecordHeaderFormat for Noaa15RecordHeader {
    fn scan_info(&self, header: &[u8]) -> Result<(ScanTime, ScanDirection), L1bError> {
        let code = Noaa15TimeCode::read(&mut Cursor::new(header))?;

        let time = ScanTime {
            year: code.year,
            day: code.day,
            millisecond: (code.ms_high as u32) << 16 | code.ms_low as u32,
        };
        let direction = if code.scan_status & 0x8000 == 0 {
            ScanDirection::Ascending
        }
        else {
            ScanDirection::Descending
        };

        Ok((time, direction))
    }

    fn gcp_count(&self, _header: &[u8], plan: &LayoutPlan) -> usize {
        plan.gcps_per_line
    }
}

pub(crate) fn header_format(generation: SpacecraftGeneration) -> &'static dyn RecordHeaderFormat {
    match generation {
        SpacecraftGeneration::Noaa9To14 => &Noaa9RecordHeader,
        SpacecraftGeneration::Noaa15ToMetop => &Noaa15RecordHeader,
    }
}

/// The scan line number stored big-endian in the first word of every record header.
pub(crate) fn scan_line_number(header: &[u8]) -> Option<u16> {
    header.get(..2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

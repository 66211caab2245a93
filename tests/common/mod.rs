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

    tests/common/mod.rs

    Builders for synthetic Level 1b containers
*/
#![allow(dead_code)]

use avhrr_l1b::{
    header::classify,
    layout::{resolve, LayoutPlan},
    ContainerKind,
    SampleEncoding,
    SpacecraftGeneration,
};
use std::io::Cursor;

pub const GCPS_PER_LINE: usize = 51;

/// Sample value stored at flat payload index `index` of scan line record `line`.
pub fn sample_value(line: usize, index: usize, encoding: SampleEncoding) -> u16 {
    let v = index + line * 7;
    match encoding {
        SampleEncoding::Unpacked8Bit => (v % 256) as u16,
        _ => (v % 1024) as u16,
    }
}

/// Latitude and longitude of control point `k` of record `line`.
pub fn gcp_position(line: usize, k: usize) -> (f64, f64) {
    (40.0 - line as f64 * 0.25, -30.0 + k as f64 * 0.5)
}

/// Millisecond of day stamped on record `line`.
pub fn record_millisecond(line: usize) -> u32 {
    60_000 + line as u32 * 500
}

fn to_ebcdic(c: u8) -> u8 {
    match c {
        b'.' => 0x4B,
        b'0'..=b'9' => 0xF0 + (c - b'0'),
        b'A'..=b'I' => 0xC1 + (c - b'A'),
        b'J'..=b'R' => 0xD1 + (c - b'J'),
        b'S'..=b'Z' => 0xE2 + (c - b'S'),
        _ => 0x40,
    }
}

#[derive(Clone, Debug)]
pub struct ContainerBuilder {
    pub center: String,
    pub product: String,
    pub spacecraft: String,
    pub revolution: String,
    pub station: String,
    pub word_size: [u8; 2],
    /// Zero-based channel indices marked present in the channel map.
    pub channels: Vec<usize>,
    pub gcp_flag: bool,
    pub ebcdic: bool,
    pub ascending: bool,
    pub records: usize,
    /// Lay the records out for this encoding, regardless of the header.
    pub record_encoding: Option<SampleEncoding>,
    /// Index of a control point to store with an invalid longitude.
    pub bad_gcp: Option<usize>,
    pub trailing_bytes: usize,
    pub container: ContainerKind,
    /// Instrument status word written to the dataset header record.
    pub instrument_status: u32,
}

impl ContainerBuilder {
    pub fn new(spacecraft: &str, product: &str) -> Self {
        ContainerBuilder {
            center: "NSS".to_string(),
            product: product.to_string(),
            spacecraft: spacecraft.to_string(),
            revolution: "01234".to_string(),
            station: "GC".to_string(),
            word_size: *b"  ",
            channels: vec![0, 1, 2, 3, 4],
            gcp_flag: true,
            ebcdic: false,
            ascending: false,
            records: 2,
            record_encoding: None,
            bad_gcp: None,
            trailing_bytes: 0,
            container: ContainerKind::Tbm,
            instrument_status: 0,
        }
    }

    pub fn word_size(mut self, code: &[u8; 2]) -> Self {
        self.word_size = *code;
        self
    }

    pub fn channels(mut self, channels: &[usize]) -> Self {
        self.channels = channels.to_vec();
        self
    }

    pub fn gcps(mut self, state: bool) -> Self {
        self.gcp_flag = state;
        self
    }

    pub fn ebcdic(mut self, state: bool) -> Self {
        self.ebcdic = state;
        self
    }

    pub fn ascending(mut self, state: bool) -> Self {
        self.ascending = state;
        self
    }

    pub fn records(mut self, records: usize) -> Self {
        self.records = records;
        self
    }

    pub fn record_encoding(mut self, encoding: SampleEncoding) -> Self {
        self.record_encoding = Some(encoding);
        self
    }

    pub fn bad_gcp(mut self, k: usize) -> Self {
        self.bad_gcp = Some(k);
        self
    }

    pub fn trailing_bytes(mut self, n: usize) -> Self {
        self.trailing_bytes = n;
        self
    }

    pub fn container(mut self, container: ContainerKind) -> Self {
        self.container = container;
        self
    }

    pub fn instrument_status(mut self, status: u32) -> Self {
        self.instrument_status = status;
        self
    }

    pub fn dataset_name(&self) -> String {
        format!(
            "{}.{}.{}.D99001.S0000.E0100.B{}56.{}",
            self.center, self.product, self.spacecraft, self.revolution, self.station
        )
    }

    pub fn header(&self) -> Vec<u8> {
        match self.container {
            ContainerKind::Tbm => self.tbm_header(),
            ContainerKind::Ars => {
                let mut header = vec![b' '; 512];
                for &channel in &self.channels {
                    header[97 + channel] = b'Y';
                }
                header[117..119].copy_from_slice(&self.word_size);
                header.extend(self.dataset_record());
                header
            }
            ContainerKind::Headerless => self.dataset_record(),
        }
    }

    /// The 992-byte binary dataset header record.
    pub fn dataset_record(&self) -> Vec<u8> {
        let mut record = vec![0u8; 992];
        record[0..3].copy_from_slice(self.center.as_bytes());
        record[22..64].copy_from_slice(self.dataset_name().as_bytes());

        let spacecraft_id: u16 = match self.spacecraft.as_str() {
            "NL" => 2,
            "NK" => 4,
            "NM" => 6,
            "NN" => 7,
            "M2" => 12,
            _ => 0,
        };
        let data_type: u16 = match self.product.as_str() {
            "LHRR" => 1,
            "GHRR" => 2,
            "HRPT" => 3,
            "FRAC" => 13,
            _ => 0,
        };
        let station: u16 = match self.station.as_str() {
            "GC" => 1,
            "WI" => 2,
            "SO" => 3,
            "SV" => 4,
            "MO" => 5,
            _ => 0,
        };
        record[72..74].copy_from_slice(&spacecraft_id.to_be_bytes());
        record[76..78].copy_from_slice(&data_type.to_be_bytes());
        record[116..120].copy_from_slice(&self.instrument_status.to_be_bytes());
        record[154..156].copy_from_slice(&station.to_be_bytes());
        record
    }

    fn tbm_header(&self) -> Vec<u8> {
        let mut header = vec![0u8; 122];

        let name = self.dataset_name();
        assert_eq!(name.len(), 42);
        let name: Vec<u8> = if self.ebcdic {
            name.bytes().map(to_ebcdic).collect()
        }
        else {
            name.into_bytes()
        };
        header[30..72].copy_from_slice(&name);

        header[96] = if self.gcp_flag { b'Y' } else { b'N' };
        for &channel in &self.channels {
            header[97 + channel] = 1;
        }
        header[117..119].copy_from_slice(&self.word_size);
        header
    }

    /// The layout the records are built with.
    pub fn plan(&self) -> LayoutPlan {
        let mut descriptor = classify(&self.header()).unwrap();
        if let Some(encoding) = self.record_encoding {
            descriptor = descriptor.with_encoding(encoding);
        }
        resolve(&descriptor).unwrap()
    }

    pub fn record(&self, plan: &LayoutPlan, line: usize) -> Vec<u8> {
        let mut record = vec![0u8; plan.record_size];
        record[0..2].copy_from_slice(&((line + 1) as u16).to_be_bytes());

        let ms = record_millisecond(line);
        match plan.generation {
            SpacecraftGeneration::Noaa9To14 => {
                // 1999, day 1
                record[2] = 99 << 1;
                record[3] = 1;
                record[4..8].copy_from_slice(&ms.to_be_bytes());
                record[8] = if self.ascending { 0x00 } else { 0x02 };
                record[52] = GCPS_PER_LINE as u8;
            }
            SpacecraftGeneration::Noaa15ToMetop => {
                record[2..4].copy_from_slice(&2001u16.to_be_bytes());
                record[4..6].copy_from_slice(&45u16.to_be_bytes());
                record[8..10].copy_from_slice(&((ms >> 16) as u16).to_be_bytes());
                record[10..12].copy_from_slice(&((ms & 0xFFFF) as u16).to_be_bytes());
                let status: u16 = if self.ascending { 0x0000 } else { 0x8000 };
                record[12..14].copy_from_slice(&status.to_be_bytes());
            }
        }

        for k in 0..GCPS_PER_LINE {
            let (lat, mut lon) = gcp_position(line, k);
            if self.bad_gcp == Some(k) {
                lon = 200.0;
            }
            match plan.generation {
                SpacecraftGeneration::Noaa9To14 => {
                    let offset = 104 + k * 4;
                    record[offset..offset + 2].copy_from_slice(&((lat * 128.0) as i16).to_be_bytes());
                    record[offset + 2..offset + 4].copy_from_slice(&((lon * 128.0) as i16).to_be_bytes());
                }
                SpacecraftGeneration::Noaa15ToMetop => {
                    let offset = 640 + k * 8;
                    record[offset..offset + 4].copy_from_slice(&((lat * 10000.0) as i32).to_be_bytes());
                    record[offset + 4..offset + 8].copy_from_slice(&((lon * 10000.0) as i32).to_be_bytes());
                }
            }
        }

        let payload = &mut record[plan.payload_start..plan.payload_end];
        match plan.encoding {
            SampleEncoding::Packed10Bit => {
                for (w, chunk) in payload.chunks_exact_mut(4).enumerate() {
                    let s: Vec<u32> = (0..3)
                        .map(|i| sample_value(line, w * 3 + i, plan.encoding) as u32)
                        .collect();
                    let word = (s[0] << 20) | (s[1] << 10) | s[2];
                    chunk.copy_from_slice(&word.to_be_bytes());
                }
            }
            SampleEncoding::Unpacked8Bit => {
                for j in 0..plan.width * plan.band_count {
                    payload[j] = sample_value(line, j, plan.encoding) as u8;
                }
            }
            SampleEncoding::Unpacked16Bit => {
                for j in 0..plan.width * plan.band_count {
                    payload[j * 2..j * 2 + 2].copy_from_slice(&sample_value(line, j, plan.encoding).to_be_bytes());
                }
            }
        }
        record
    }

    pub fn build(&self) -> Vec<u8> {
        let plan = self.plan();
        let mut data = self.header();
        data.resize(plan.file_header_size, 0);
        for line in 0..self.records {
            data.extend(self.record(&plan, line));
        }
        data.extend(std::iter::repeat(0u8).take(self.trailing_bytes));
        data
    }

    pub fn cursor(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.build())
    }
}

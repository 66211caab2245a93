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

    src/dataset.rs

    The raster view of an AVHRR Level 1b data set: dimensions, per band scan
    lines, ground control points and descriptive metadata.
*/
use crate::{
    gcp::{sample_gcps, ControlPoint},
    header::{read_descriptor, FormatDescriptor},
    io::ReadSeek,
    layout::{resolve, LayoutPlan},
    loader::{guess_encoding, L1bLoader},
    record::{physical_offset, read_record_bytes, RasterExtent, RecordReader},
    record_header::{header_format, ScanTime},
    types::{ScanDirection, Spacecraft, SpacecraftGeneration},
    unpack::{band_row, unpack_samples, BandRow},
    util::get_length,
    L1bError,
};
use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

/// Geodetic reference system of the embedded control points: WGS 72 (EPSG:4322).
pub const WGS72_WKT: &str = "GEOGCS[\"WGS 72\",DATUM[\"WGS_1972\",SPHEROID[\"WGS 72\",6378135,298.26,\
AUTHORITY[\"EPSG\",7043]],TOWGS84[0,0,4.5,0,0,0.554,0.2263],AUTHORITY[\"EPSG\",6322]],\
PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",8901]],UNIT[\"degree\",0.0174532925199433,\
AUTHORITY[\"EPSG\",9108]],AUTHORITY[\"EPSG\",4322]]";

pub const METADATA_KEYS: [&str; 9] = [
    "DATASET_NAME",
    "SATELLITE",
    "DATA_TYPE",
    "REVOLUTION",
    "SOURCE",
    "PROCESSING_CENTER",
    "START",
    "STOP",
    "LOCATION",
];

/// An open AVHRR Level 1b data set.
///
/// Scan lines are read from the source on every call and nothing is cached. All reads go
/// through the same seek cursor, so a data set must not be shared between threads without a
/// lock around it.
pub struct L1bDataset<RS: ReadSeek> {
    descriptor: FormatDescriptor,
    reader: RecordReader<RS>,
    start_time: ScanTime,
    stop_time: ScanTime,
    gcps: Vec<ControlPoint>,
}

impl L1bDataset<BufReader<File>> {
    /// Open the data set at `path` with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, L1bError> {
        L1bLoader::new().load(path)
    }
}

impl<RS: ReadSeek> L1bDataset<RS> {
    pub(crate) fn open_reader(mut source: RS, options: &L1bLoader) -> Result<Self, L1bError> {
        // Phase 1: classify the header, resolve the layout, and learn the scan direction and
        // the swath times from the first and last records.
        let mut descriptor = read_descriptor(&mut source)?;
        if !descriptor.encoding_declared && options.guess_encoding {
            descriptor = guess_encoding(&mut source, &descriptor)?;
        }

        let plan = resolve(&descriptor)?;
        let container_size = get_length(&mut source)?;
        let extent = RasterExtent::from_container_size(container_size, &plan);
        log::debug!(
            "open_reader(): container size: {} raster: {}x{}",
            container_size,
            extent.width,
            extent.height
        );

        if extent.height == 0 {
            log::error!("open_reader(): no complete scan line records");
            return Err(L1bError::NoScanLines);
        }

        let format = header_format(plan.generation);
        let last = extent.height - 1;
        let first_header = read_record_bytes(&mut source, physical_offset(&plan, 0), plan.record_header_size, 0)?;
        let last_header = read_record_bytes(&mut source, physical_offset(&plan, last), plan.record_header_size, last)?;
        let (start_time, direction) = format.scan_info(&first_header)?;
        let (stop_time, _) = format.scan_info(&last_header)?;
        log::debug!(
            "open_reader(): {} pass, start: {} stop: {}",
            direction,
            start_time,
            stop_time
        );

        // Phase 2: the direction is fixed from here on.
        let mut reader = RecordReader::new(source, plan, extent, direction);

        let gcps = if descriptor.has_gcps && options.gcps {
            sample_gcps(&mut reader, options.gcp_density)?
        }
        else {
            Vec::new()
        };

        Ok(L1bDataset {
            descriptor,
            reader,
            start_time,
            stop_time,
            gcps,
        })
    }

    pub fn width(&self) -> usize {
        self.reader.extent().width
    }

    pub fn height(&self) -> usize {
        self.reader.extent().height
    }

    pub fn band_count(&self) -> usize {
        self.reader.plan().band_count
    }

    pub fn descriptor(&self) -> &FormatDescriptor {
        &self.descriptor
    }

    pub fn layout(&self) -> &LayoutPlan {
        self.reader.plan()
    }

    pub fn scan_direction(&self) -> ScanDirection {
        self.reader.direction()
    }

    pub fn start_time(&self) -> ScanTime {
        self.start_time
    }

    pub fn stop_time(&self) -> ScanTime {
        self.stop_time
    }

    /// Read one band of raster line `line`. Line 0 is the northern-most line.
    pub fn read_row(&mut self, band: usize, line: usize) -> Result<BandRow, L1bError> {
        if band >= self.band_count() {
            return Err(L1bError::ParameterError(format!(
                "band {} out of range ({} bands)",
                band,
                self.band_count()
            )));
        }

        let record = self.reader.read_record(line)?;
        let plan = *self.reader.plan();
        let samples = unpack_samples(&record, &plan);
        band_row(&samples, band, &plan, self.reader.direction())
    }

    /// Read every band of raster line `line`, decoding the record once.
    pub fn read_rows(&mut self, line: usize) -> Result<Vec<BandRow>, L1bError> {
        let record = self.reader.read_record(line)?;
        let plan = *self.reader.plan();
        let samples = unpack_samples(&record, &plan);
        (0..plan.band_count)
            .map(|band| band_row(&samples, band, &plan, self.reader.direction()))
            .collect()
    }

    pub fn gcps(&self) -> &[ControlPoint] {
        &self.gcps
    }

    /// The coordinate system of the control points as WKT, or an empty string if there are no
    /// control points.
    pub fn gcp_projection(&self) -> &'static str {
        if self.gcps.is_empty() {
            ""
        }
        else {
            WGS72_WKT
        }
    }

    pub fn metadata(&self) -> BTreeMap<&'static str, String> {
        METADATA_KEYS
            .iter()
            .filter_map(|&key| self.metadata_item(key).map(|value| (key, value)))
            .collect()
    }

    pub fn metadata_item(&self, key: &str) -> Option<String> {
        let d = &self.descriptor;
        let value = match key {
            "DATASET_NAME" => d.dataset_name.clone(),
            "SATELLITE" => d.spacecraft.to_string(),
            "DATA_TYPE" => d.product.description().to_string(),
            "REVOLUTION" => d.revolution.clone(),
            "SOURCE" => d.station.to_string(),
            "PROCESSING_CENTER" => d.center.to_string(),
            "START" => self.start_time.to_string(),
            "STOP" => self.stop_time.to_string(),
            "LOCATION" => self.scan_direction().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Describe the AVHRR channel carried by band `band`.
    pub fn band_description(&self, band: usize) -> Option<&'static str> {
        let channel = self.descriptor.channels.channel_indices().nth(band)?;
        channel_description(self.descriptor.spacecraft, channel, self.descriptor.instrument_status)
    }

    pub fn into_inner(self) -> RS {
        self.reader.into_inner()
    }
}

const CH1: &str = "AVHRR Channel 1:  0.58  micrometers -- 0.68 micrometers";
const CH2: &str = "AVHRR Channel 2:  0.725 micrometers -- 1.10 micrometers";
const CH3: &str = "AVHRR Channel 3:  3.55  micrometers -- 3.93 micrometers";
const CH3A: &str = "AVHRR Channel 3A: 1.58  micrometers -- 1.64 micrometers";
const CH3B: &str = "AVHRR Channel 3B: 3.55  micrometers -- 3.93 micrometers";
const CH3AB: &str = "AVHRR Channel 3A: 1.58  micrometers -- 1.64 micrometers / 3B: 3.55 micrometers -- 3.93 micrometers";
const CH4: &str = "AVHRR Channel 4:  10.3  micrometers -- 11.3 micrometers";
const CH5: &str = "AVHRR Channel 5:  11.5  micrometers -- 12.5 micrometers";
const CH5_NOAA13: &str = "AVHRR Channel 5:  11.4  micrometers -- 12.4 micrometers";

// Instrument status bit set while channel 3B is active.
const STATUS_CHANNEL_3B: u32 = 0x0400;

/// Wavelength description of zero-based AVHRR channel `channel` on `spacecraft`. When the
/// instrument status word is known, the active half of channel 3 is reported; otherwise both.
pub fn channel_description(
    spacecraft: Spacecraft,
    channel: usize,
    instrument_status: Option<u32>,
) -> Option<&'static str> {
    let description = match channel {
        0 => CH1,
        1 => CH2,
        2 => match spacecraft.generation() {
            SpacecraftGeneration::Noaa9To14 => CH3,
            SpacecraftGeneration::Noaa15ToMetop => match instrument_status {
                Some(status) if status & STATUS_CHANNEL_3B != 0 => CH3B,
                Some(_) => CH3A,
                None => CH3AB,
            },
        },
        3 => CH4,
        4 => match spacecraft {
            Spacecraft::Noaa13 => CH5_NOAA13,
            // Four channel instruments repeat channel 4.
            Spacecraft::Noaa6 | Spacecraft::Noaa8 | Spacecraft::Noaa10 => CH4,
            _ => CH5,
        },
        _ => return None,
    };
    Some(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_descriptions() {
        assert_eq!(channel_description(Spacecraft::Noaa14, 0, None), Some(CH1));
        assert_eq!(channel_description(Spacecraft::Noaa14, 2, None), Some(CH3));
        assert_eq!(channel_description(Spacecraft::Noaa16, 2, None), Some(CH3AB));
        assert_eq!(channel_description(Spacecraft::Noaa13, 4, None), Some(CH5_NOAA13));
        assert_eq!(channel_description(Spacecraft::Noaa10, 4, None), Some(CH4));
        assert_eq!(channel_description(Spacecraft::Noaa11, 4, None), Some(CH5));
        assert_eq!(channel_description(Spacecraft::Noaa11, 12, None), None);
    }

    #[test]
    fn test_channel_3_from_instrument_status() {
        assert_eq!(channel_description(Spacecraft::Noaa18, 2, Some(0x0400)), Some(CH3B));
        assert_eq!(channel_description(Spacecraft::Noaa18, 2, Some(0x0bff)), Some(CH3A));
        assert_eq!(channel_description(Spacecraft::Noaa18, 2, Some(0)), Some(CH3A));
        // Earlier instruments have a single channel 3 whatever the status says.
        assert_eq!(channel_description(Spacecraft::Noaa14, 2, Some(0x0400)), Some(CH3));
    }

    #[test]
    fn test_wkt_is_wgs72() {
        assert!(WGS72_WKT.starts_with("GEOGCS[\"WGS 72\""));
        assert!(WGS72_WKT.ends_with("AUTHORITY[\"EPSG\",4322]]"));
        assert!(!WGS72_WKT.contains('\n'));
    }
}

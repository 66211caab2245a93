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

    src/layout.rs

    Resolution of a FormatDescriptor into the physical record layout.

    Record sizes do not follow a single formula. Each generation has its own
    record header overhead and its own padding rules, so the sizes are kept
    as a table keyed by (product path, generation, encoding, channel count).
*/
use crate::{
    header::{FormatDescriptor, ARS_HEADER_SIZE},
    types::{ContainerKind, ProductType, SampleEncoding, SpacecraftGeneration},
    L1bError,
    MAX_CHANNELS,
    TBM_HEADER_SIZE,
};
// Short names for the record size table.
use ProductPath::{FullResolution as FULL, GlobalArea as GAC};
use SampleEncoding::{Packed10Bit as P10, Unpacked16Bit as U16, Unpacked8Bit as U8};
use SpacecraftGeneration::{Noaa15ToMetop as N15, Noaa9To14 as N9};

/// Products sharing a record layout. HRPT, LAC and FRAC are all full resolution 2048 pixel
/// scans; GAC is resampled on board to 409 pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProductPath {
    FullResolution,
    GlobalArea,
}

impl From<ProductType> for ProductPath {
    fn from(product: ProductType) -> Self {
        match product {
            ProductType::Hrpt | ProductType::Lac | ProductType::Frac => ProductPath::FullResolution,
            ProductType::Gac => ProductPath::GlobalArea,
        }
    }
}

impl ProductPath {
    pub fn width(&self) -> usize {
        match self {
            ProductPath::FullResolution => 2048,
            ProductPath::GlobalArea => 409,
        }
    }

    /// Zero-based pixel of the first embedded control point, and the pixel distance between
    /// control points along a scan line.
    fn gcp_sampling(&self) -> (usize, usize) {
        match self {
            ProductPath::FullResolution => (25 - 1, 40),
            ProductPath::GlobalArea => (5 - 1, 8),
        }
    }

    /// Number of records between the TBM header and the first scan line.
    fn header_records(&self, generation: SpacecraftGeneration) -> usize {
        match (self, generation) {
            (ProductPath::GlobalArea, SpacecraftGeneration::Noaa9To14) => 2,
            _ => 1,
        }
    }
}

/// Storage format of the embedded latitude/longitude pairs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GcpEncoding {
    /// Signed 16-bit big-endian, degrees * 128.
    Fixed16,
    /// Signed 32-bit big-endian, degrees * 10000.
    Fixed32,
}

impl GcpEncoding {
    pub fn scale(&self) -> f64 {
        match self {
            GcpEncoding::Fixed16 => 128.0,
            GcpEncoding::Fixed32 => 10000.0,
        }
    }

    /// Size in bytes of one latitude/longitude pair.
    pub fn pair_size(&self) -> usize {
        match self {
            GcpEncoding::Fixed16 => 4,
            GcpEncoding::Fixed32 => 8,
        }
    }
}

/// The physical layout of a data set. Every field is derived from a [`FormatDescriptor`] by
/// [`resolve`], so two equal descriptors always produce equal plans.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayoutPlan {
    pub generation: SpacecraftGeneration,
    pub encoding: SampleEncoding,
    pub band_count: usize,
    /// Pixels per scan line.
    pub width: usize,
    pub record_size: usize,
    /// Byte range of the sample payload within a record.
    pub payload_start: usize,
    pub payload_end: usize,
    /// Offset of the first scan line record from the start of the file.
    pub file_header_size: usize,
    /// Size of the per-record metadata preceding the payload.
    pub record_header_size: usize,
    pub gcp_start_pixel: usize,
    pub gcp_stride: usize,
    pub gcps_per_line: usize,
    /// Offset of the control point table within the record header.
    pub gcp_table_offset: usize,
    /// Offset of the one byte count of valid control points within the record header. Records
    /// of the later generation have no such count.
    pub gcp_count_offset: Option<usize>,
    pub gcp_encoding: GcpEncoding,
}

impl LayoutPlan {
    /// Number of samples one record's payload decodes to.
    pub fn payload_samples(&self) -> usize {
        match self.encoding.sample_size() {
            Some(_) => self.width * self.band_count,
            None => (self.payload_end - self.payload_start) / 4 * 3,
        }
    }
}

struct GenerationLayout {
    record_header_size: usize,
    gcp_table_offset: usize,
    gcp_count_offset: Option<usize>,
    gcp_encoding: GcpEncoding,
}

const NOAA9_LAYOUT: GenerationLayout = GenerationLayout {
    record_header_size: 448,
    gcp_table_offset: 104,
    gcp_count_offset: Some(52),
    gcp_encoding: GcpEncoding::Fixed16,
};

// The later record format may not carry a count of valid control points at all; the full
// table is assumed valid.
const NOAA15_LAYOUT: GenerationLayout = GenerationLayout {
    record_header_size: 1264,
    gcp_table_offset: 640,
    gcp_count_offset: None,
    gcp_encoding: GcpEncoding::Fixed32,
};

const GCPS_PER_LINE: usize = 51;

struct RecordSize {
    path: ProductPath,
    generation: SpacecraftGeneration,
    encoding: SampleEncoding,
    bands: usize,
    record_size: usize,
    payload_end: usize,
}

const fn rs(
    path: ProductPath,
    generation: SpacecraftGeneration,
    encoding: SampleEncoding,
    bands: usize,
    record_size: usize,
    payload_end: usize,
) -> RecordSize {
    RecordSize {
        path,
        generation,
        encoding,
        bands,
        record_size,
        payload_end,
    }
}

// Packed records always carry all five channels, so their size does not depend on the
// channel count.
#[rustfmt::skip]
static RECORD_SIZES: [RecordSize; 60] = [
    rs(FULL, N9,  P10, 1, 14800, 14104),
    rs(FULL, N9,  P10, 2, 14800, 14104),
    rs(FULL, N9,  P10, 3, 14800, 14104),
    rs(FULL, N9,  P10, 4, 14800, 14104),
    rs(FULL, N9,  P10, 5, 14800, 14104),
    rs(FULL, N9,  U16, 1,  4544,  4544),
    rs(FULL, N9,  U16, 2,  8640,  8640),
    rs(FULL, N9,  U16, 3, 12736, 12736),
    rs(FULL, N9,  U16, 4, 16832, 16832),
    rs(FULL, N9,  U16, 5, 20928, 20928),
    rs(FULL, N9,  U8,  1,  2496,  2496),
    rs(FULL, N9,  U8,  2,  4544,  4544),
    rs(FULL, N9,  U8,  3,  6592,  6592),
    rs(FULL, N9,  U8,  4,  8640,  8640),
    rs(FULL, N9,  U8,  5, 10688, 10688),

    rs(FULL, N15, P10, 1, 15872, 14920),
    rs(FULL, N15, P10, 2, 15872, 14920),
    rs(FULL, N15, P10, 3, 15872, 14920),
    rs(FULL, N15, P10, 4, 15872, 14920),
    rs(FULL, N15, P10, 5, 15872, 14920),
    rs(FULL, N15, U16, 1,  6144,  5360),
    rs(FULL, N15, U16, 2, 10240,  9456),
    rs(FULL, N15, U16, 3, 14336, 13552),
    rs(FULL, N15, U16, 4, 18432, 17648),
    rs(FULL, N15, U16, 5, 22528, 21744),
    rs(FULL, N15, U8,  1,  4096,  3312),
    rs(FULL, N15, U8,  2,  6144,  5360),
    rs(FULL, N15, U8,  3,  8192,  7408),
    rs(FULL, N15, U8,  4, 10240,  9456),
    rs(FULL, N15, U8,  5, 12288, 11504),

    rs(GAC,  N9,  P10, 1,  3220,  3176),
    rs(GAC,  N9,  P10, 2,  3220,  3176),
    rs(GAC,  N9,  P10, 3,  3220,  3176),
    rs(GAC,  N9,  P10, 4,  3220,  3176),
    rs(GAC,  N9,  P10, 5,  3220,  3176),
    rs(GAC,  N9,  U16, 1,  1268,  1266),
    rs(GAC,  N9,  U16, 2,  2084,  2084),
    rs(GAC,  N9,  U16, 3,  2904,  2902),
    rs(GAC,  N9,  U16, 4,  3720,  3720),
    rs(GAC,  N9,  U16, 5,  4540,  4538),
    rs(GAC,  N9,  U8,  1,   860,   858),
    rs(GAC,  N9,  U8,  2,  1268,  1266),
    rs(GAC,  N9,  U8,  3,  1676,  1676),
    rs(GAC,  N9,  U8,  4,  2084,  2084),
    rs(GAC,  N9,  U8,  5,  2496,  2494),

    rs(GAC,  N15, P10, 1,  4608,  3992),
    rs(GAC,  N15, P10, 2,  4608,  3992),
    rs(GAC,  N15, P10, 3,  4608,  3992),
    rs(GAC,  N15, P10, 4,  4608,  3992),
    rs(GAC,  N15, P10, 5,  4608,  3992),
    rs(GAC,  N15, U16, 1,  2360,  2082),
    rs(GAC,  N15, U16, 2,  3176,  2900),
    rs(GAC,  N15, U16, 3,  3992,  3718),
    rs(GAC,  N15, U16, 4,  4816,  4536),
    rs(GAC,  N15, U16, 5,  5632,  5354),
    rs(GAC,  N15, U8,  1,  1952,  1673),
    rs(GAC,  N15, U8,  2,  2360,  2082),
    rs(GAC,  N15, U8,  3,  2768,  2491),
    rs(GAC,  N15, U8,  4,  3176,  2900),
    rs(GAC,  N15, U8,  5,  3584,  3309),
];

fn lookup_record_size(
    path: ProductPath,
    generation: SpacecraftGeneration,
    encoding: SampleEncoding,
    bands: usize,
) -> Option<&'static RecordSize> {
    RECORD_SIZES
        .iter()
        .find(|e| e.path == path && e.generation == generation && e.encoding == encoding && e.bands == bands)
}

/// Resolve the physical layout of a data set from its descriptor.
pub fn resolve(descriptor: &FormatDescriptor) -> Result<LayoutPlan, L1bError> {
    let path = ProductPath::from(descriptor.product);
    let generation = descriptor.generation;
    let bands = descriptor.band_count();

    let unsupported = || L1bError::UnsupportedCombination {
        product: descriptor.product,
        generation,
        encoding: descriptor.encoding,
        bands,
    };

    if !(1..=MAX_CHANNELS).contains(&bands) {
        log::error!("resolve(): unsupported channel count {}", bands);
        return Err(unsupported());
    }

    let generation_layout = match generation {
        SpacecraftGeneration::Noaa9To14 => &NOAA9_LAYOUT,
        SpacecraftGeneration::Noaa15ToMetop => &NOAA15_LAYOUT,
    };

    let entry = lookup_record_size(path, generation, descriptor.encoding, bands).ok_or_else(unsupported)?;
    let (gcp_start_pixel, gcp_stride) = path.gcp_sampling();

    // Only TBM containers hold pre-NOAA-15 data; the other kinds are led by a dataset header
    // record, which that generation does not have.
    let file_header_size = match (descriptor.container, generation) {
        (ContainerKind::Tbm, _) => TBM_HEADER_SIZE + entry.record_size * path.header_records(generation),
        (ContainerKind::Ars, SpacecraftGeneration::Noaa15ToMetop) => ARS_HEADER_SIZE + entry.record_size,
        (ContainerKind::Headerless, SpacecraftGeneration::Noaa15ToMetop) => entry.payload_end,
        (container, SpacecraftGeneration::Noaa9To14) => {
            log::error!("resolve(): {} container with pre-NOAA-15 data", container);
            return Err(unsupported());
        }
    };

    let plan = LayoutPlan {
        generation,
        encoding: descriptor.encoding,
        band_count: bands,
        width: path.width(),
        record_size: entry.record_size,
        payload_start: generation_layout.record_header_size,
        payload_end: entry.payload_end,
        file_header_size,
        record_header_size: generation_layout.record_header_size,
        gcp_start_pixel,
        gcp_stride,
        gcps_per_line: GCPS_PER_LINE,
        gcp_table_offset: generation_layout.gcp_table_offset,
        gcp_count_offset: generation_layout.gcp_count_offset,
        gcp_encoding: generation_layout.gcp_encoding,
    };

    log::debug!(
        "resolve(): record size: {} payload: {}..{} data offset: {} width: {}",
        plan.record_size,
        plan.payload_start,
        plan.payload_end,
        plan.file_header_size,
        plan.width
    );

    Ok(plan)
}

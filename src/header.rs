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

    src/header.rs

    Classification of the leading header of a data set.

    Three container kinds are recognized: a 122-byte TBM header, a 512-byte
    ARS header followed by the 992-byte dataset header record, and the bare
    dataset header record written by AAPP.

    The TBM header carries the dataset name as a 42 character string at offset
    30, for example:

        NSS.GHRR.NK.D99001.S0000.E0100.B0123456.GC
        |   |    |  |      |     |     |        +- receiving station
        |   |    |  |      |     |     +---------- revolution (5 digits after 'B')
        |   |    |  |      |     +---------------- stop time
        |   |    |  |      +---------------------- start time
        |   |    |  +----------------------------- year and day
        |   |    +-------------------------------- spacecraft
        |   +------------------------------------- product type
        +----------------------------------------- processing center

    There is no real signature. The only structural check available is that
    the seven '.' separators of the name are where they should be.
*/
use crate::{
    io::{Cursor, ReadSeek, SeekFrom},
    types::{
        ChannelMask,
        ContainerKind,
        NameEncoding,
        ProcessingCenter,
        ProductType,
        ReceivingStation,
        SampleEncoding,
        Spacecraft,
        SpacecraftGeneration,
    },
    util::{code_string, read_up_to},
    L1bError,
    MAX_CHANNELS,
    TBM_HEADER_SIZE,
};
use binrw::{binrw, BinRead};

pub const DATASET_NAME_OFFSET: usize = 30;
pub const DATASET_NAME_SIZE: usize = 42;
/// Length of the Archive Retrieval System header.
pub const ARS_HEADER_SIZE: usize = 512;
/// Length of the binary dataset header record of NOAA-15 and later data sets.
pub const DATASET_RECORD_SIZE: usize = 992;
// Dataset name offset within the dataset header record.
const RECORD_NAME_OFFSET: usize = 22;
/// Number of leading bytes that is enough to classify any container kind.
pub const DETECT_SIZE: usize = ARS_HEADER_SIZE + DATASET_RECORD_SIZE;

// Offsets below are relative to the start of the dataset name.
const NAME_SEPARATORS: [usize; 7] = [3, 8, 11, 18, 24, 30, 39];
const NAME_CENTER: std::ops::Range<usize> = 0..3;
const NAME_PRODUCT: std::ops::Range<usize> = 4..8;
const NAME_SPACECRAFT: std::ops::Range<usize> = 9..11;
const NAME_REVOLUTION: std::ops::Range<usize> = 32..37;
const NAME_STATION: std::ops::Range<usize> = 40..42;

const ASCII_SEPARATOR: u8 = b'.';
// '.' in EBCDIC, which happens to be 'K' in ASCII.
const EBCDIC_SEPARATOR: u8 = 0x4B;

#[allow(dead_code)]
#[derive(Debug)]
#[binrw]
#[brw(big)]
pub(crate) struct TbmHeader {
    preamble: [u8; 30],
    dataset_name: [u8; 42], // offset 30
    reserved: [u8; 24],     // offset 72
    gcp_flag: u8,           // offset 96: 'Y' when the records carry earth location
    channel_map: [u8; 20],  // offset 97: one byte per channel, 1 or 'Y' when selected
    word_size: [u8; 2],     // offset 117: "10", "16", "08" or blank
    trailer: [u8; 3],
}

// Only the fields used for classification are named. Bit 10 of the instrument status is set
// when channel 3B is active rather than 3A.
#[allow(dead_code)]
#[derive(Debug)]
#[binrw]
#[brw(big)]
pub(crate) struct DatasetHeaderRecord {
    site: [u8; 3], // offset 0: processing center
    reserved0: [u8; 19],
    dataset_name: [u8; 42], // offset 22
    reserved1: [u8; 8],
    spacecraft_id: u16, // offset 72
    reserved2: u16,
    data_type: u16, // offset 76
    reserved3: [u8; 38],
    instrument_status: u32, // offset 116
    reserved4: [u8; 34],
    station: u16, // offset 154
}

/// Everything the leading header says about a data set. Created once when a data set is opened
/// and never modified afterwards; the record layout is derived from it by
/// [`crate::layout::resolve`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    pub generation: SpacecraftGeneration,
    pub spacecraft: Spacecraft,
    pub product: ProductType,
    pub encoding: SampleEncoding,
    /// False if the sample encoding field was blank and `encoding` is the Packed10Bit default.
    pub encoding_declared: bool,
    pub channels: ChannelMask,
    pub station: ReceivingStation,
    pub center: ProcessingCenter,
    /// Whether the records carry embedded ground control points.
    pub has_gcps: bool,
    pub name_encoding: NameEncoding,
    /// The dataset name, converted to ASCII if it was stored in EBCDIC.
    pub dataset_name: String,
    pub revolution: String,
    pub container: ContainerKind,
    /// AVHRR instrument status word of the dataset header record. TBM containers carry none.
    pub instrument_status: Option<u32>,
}

impl FormatDescriptor {
    pub fn band_count(&self) -> usize {
        self.channels.band_count()
    }

    /// Return a copy of this descriptor with a different sample encoding.
    pub fn with_encoding(&self, encoding: SampleEncoding) -> FormatDescriptor {
        FormatDescriptor {
            encoding,
            ..self.clone()
        }
    }
}

/// Check the separator markers of a dataset name, returning the character set they were
/// written in.
fn detect_name_encoding(name: &[u8]) -> Option<NameEncoding> {
    if NAME_SEPARATORS.iter().all(|&i| name[i] == ASCII_SEPARATOR) {
        Some(NameEncoding::Ascii)
    }
    else if NAME_SEPARATORS.iter().all(|&i| name[i] == EBCDIC_SEPARATOR) {
        Some(NameEncoding::Ebcdic)
    }
    else {
        None
    }
}

fn name_at(header: &[u8], offset: usize) -> Option<&[u8]> {
    header.get(offset..offset + DATASET_NAME_SIZE)
}

/// Work out the container kind from where a well-formed dataset name is found. The ARS layout
/// is tried first, then the TBM header, then a bare dataset header record.
pub fn detect_container(header: &[u8]) -> Option<(ContainerKind, NameEncoding)> {
    if name_at(header, ARS_HEADER_SIZE + RECORD_NAME_OFFSET).and_then(detect_name_encoding) == Some(NameEncoding::Ascii) {
        return Some((ContainerKind::Ars, NameEncoding::Ascii));
    }
    if let Some(encoding) = name_at(header, DATASET_NAME_OFFSET).and_then(detect_name_encoding) {
        return Some((ContainerKind::Tbm, encoding));
    }
    match name_at(header, RECORD_NAME_OFFSET).and_then(detect_name_encoding) {
        Some(NameEncoding::Ascii) => Some((ContainerKind::Headerless, NameEncoding::Ascii)),
        _ => None,
    }
}

/// Return true if the source looks like an AVHRR Level 1b data set. Only the structural
/// check of the leading header is performed; the codes themselves are not validated.
pub fn identify<RS: ReadSeek>(source: &mut RS) -> bool {
    let mut buf = [0u8; DETECT_SIZE];

    if source.seek(SeekFrom::Start(0)).is_err() {
        return false;
    }
    match read_up_to(source, &mut buf) {
        Ok(n) if n >= TBM_HEADER_SIZE => detect_container(&buf[..n]).is_some(),
        _ => false,
    }
}

/// Read the leading header from the start of `source` and classify it.
pub fn read_descriptor<RS: ReadSeek>(source: &mut RS) -> Result<FormatDescriptor, L1bError> {
    let mut buf = [0u8; DETECT_SIZE];
    source.seek(SeekFrom::Start(0))?;
    let read = read_up_to(source, &mut buf)?;
    classify(&buf[..read])
}

/// Classify the leading header of a container. `header` must hold at least the first 122 bytes
/// of the container, and all of the dataset header record for the ARS and headerless kinds.
/// Anything beyond that is ignored.
pub fn classify(header: &[u8]) -> Result<FormatDescriptor, L1bError> {
    if header.len() < TBM_HEADER_SIZE {
        log::error!("classify(): container holds only {} bytes", header.len());
        return Err(L1bError::MalformedContainer(header.len()));
    }

    let (container, name_encoding) = detect_container(header).ok_or(L1bError::UnknownFormat)?;
    let record_offset = match container {
        ContainerKind::Tbm => 0,
        ContainerKind::Ars => ARS_HEADER_SIZE,
        ContainerKind::Headerless => 0,
    };
    if container != ContainerKind::Tbm && header.len() < record_offset + DATASET_RECORD_SIZE {
        log::error!(
            "classify(): {} container holds only {} bytes, dataset header record is incomplete",
            container,
            header.len()
        );
        return Err(L1bError::MalformedContainer(header.len()));
    }

    let descriptor = match container {
        ContainerKind::Tbm => classify_tbm(header, name_encoding)?,
        ContainerKind::Ars => classify_dataset_record(
            ContainerKind::Ars,
            &header[record_offset..],
            Some(&header[..TBM_HEADER_SIZE]),
        )?,
        ContainerKind::Headerless => classify_dataset_record(ContainerKind::Headerless, header, None)?,
    };

    log::debug!(
        "classify(): {} container: {} ({}) {} {} channels: {} ({})",
        descriptor.container,
        descriptor.spacecraft,
        descriptor.generation,
        descriptor.product,
        descriptor.encoding,
        descriptor.band_count(),
        if descriptor.encoding_declared { "declared" } else { "default" }
    );

    Ok(descriptor)
}

fn classify_tbm(header: &[u8], name_encoding: NameEncoding) -> Result<FormatDescriptor, L1bError> {
    let tbm = TbmHeader::read(&mut Cursor::new(&header[..TBM_HEADER_SIZE]))?;

    let mut name = tbm.dataset_name;
    if name_encoding == NameEncoding::Ebcdic {
        log::debug!("classify_tbm(): dataset name is EBCDIC encoded");
        for b in name.iter_mut() {
            *b = EBCDIC_TO_ASCII[*b as usize];
        }
    }

    let spacecraft = Spacecraft::from_code(&name[NAME_SPACECRAFT]).ok_or_else(|| {
        let code = code_string(&name[NAME_SPACECRAFT]);
        log::error!("classify_tbm(): unknown spacecraft code {:?}", code);
        L1bError::UnrecognizedSpacecraft(code)
    })?;

    let product = ProductType::from_code(&name[NAME_PRODUCT]).ok_or_else(|| {
        let code = code_string(&name[NAME_PRODUCT]);
        log::error!("classify_tbm(): unknown product type code {:?}", code);
        L1bError::UnrecognizedProductType(code)
    })?;

    let channels = decode_channel_map(&tbm.channel_map);
    let (encoding, encoding_declared) = decode_word_size(tbm.word_size)?;

    Ok(FormatDescriptor {
        generation: spacecraft.generation(),
        spacecraft,
        product,
        encoding,
        encoding_declared,
        channels,
        station: ReceivingStation::from_code(&name[NAME_STATION]),
        center: ProcessingCenter::from_code(&name[NAME_CENTER]),
        has_gcps: tbm.gcp_flag == b'Y',
        name_encoding,
        dataset_name: String::from_utf8_lossy(&name).into_owned(),
        revolution: String::from_utf8_lossy(&name[NAME_REVOLUTION]).into_owned(),
        container: ContainerKind::Tbm,
        instrument_status: None,
    })
}

/// Classify a container led by a binary dataset header record. For ARS containers `ars` holds
/// the ARS header, which supplies the channel map and word size.
fn classify_dataset_record(
    container: ContainerKind,
    record: &[u8],
    ars: Option<&[u8]>,
) -> Result<FormatDescriptor, L1bError> {
    let rec = DatasetHeaderRecord::read(&mut Cursor::new(&record[..DATASET_RECORD_SIZE]))?;

    let spacecraft = Spacecraft::from_id(rec.spacecraft_id).ok_or_else(|| {
        log::error!("classify_dataset_record(): unknown spacecraft id {}", rec.spacecraft_id);
        L1bError::UnrecognizedSpacecraft(format!("id {}", rec.spacecraft_id))
    })?;

    let product = ProductType::from_id(rec.data_type).ok_or_else(|| {
        log::error!("classify_dataset_record(): unknown data type {}", rec.data_type);
        L1bError::UnrecognizedProductType(format!("id {}", rec.data_type))
    })?;

    let (channels, (encoding, encoding_declared)) = match ars {
        Some(ars) => {
            let ars = TbmHeader::read(&mut Cursor::new(&ars[..TBM_HEADER_SIZE]))?;
            (decode_channel_map(&ars.channel_map), decode_word_size(ars.word_size)?)
        }
        // AAPP writes all five channels, packed.
        None => (ChannelMask::ALL, (SampleEncoding::Packed10Bit, true)),
    };

    let name = rec.dataset_name;
    Ok(FormatDescriptor {
        generation: spacecraft.generation(),
        spacecraft,
        product,
        encoding,
        encoding_declared,
        channels,
        station: ReceivingStation::from_id(rec.station),
        center: ProcessingCenter::from_code(&rec.site),
        // Every record of this generation carries earth location.
        has_gcps: true,
        name_encoding: NameEncoding::Ascii,
        dataset_name: String::from_utf8_lossy(&name).into_owned(),
        revolution: String::from_utf8_lossy(&name[NAME_REVOLUTION]).into_owned(),
        container,
        instrument_status: Some(rec.instrument_status),
    })
}

/// Decode the sensor word size field. A blank field is reported as an undeclared Packed10Bit
/// encoding.
fn decode_word_size(word_size: [u8; 2]) -> Result<(SampleEncoding, bool), L1bError> {
    match word_size {
        [b' ', b' '] | [0, _] => Ok((SampleEncoding::Packed10Bit, false)),
        code => match SampleEncoding::from_code(&code) {
            Some(encoding) => Ok((encoding, true)),
            None => {
                let code = code_string(&code);
                log::error!("decode_word_size(): unknown sample encoding code {:?}", code);
                Err(L1bError::UnrecognizedEncoding(code))
            }
        },
    }
}

/// Decode the channel presence bitmap. An empty bitmap, or one claiming more channels than the
/// instrument has, is treated as "all five channels present".
fn decode_channel_map(map: &[u8]) -> ChannelMask {
    let bits = map
        .iter()
        .enumerate()
        .filter(|(_, &b)| b == 1 || b == b'Y')
        .fold(0u32, |acc, (i, _)| acc | (1 << i));

    let mask = ChannelMask::from_bits_retain(bits);
    match mask.band_count() {
        1..=MAX_CHANNELS => mask,
        n => {
            log::warn!("decode_channel_map(): {} channels selected, assuming all five", n);
            ChannelMask::ALL
        }
    }
}

#[rustfmt::skip]
static EBCDIC_TO_ASCII: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x9C, 0x09, 0x86, 0x7F, 0x97, 0x8D, 0x8E, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    0x10, 0x11, 0x12, 0x13, 0x9D, 0x85, 0x08, 0x87, 0x18, 0x19, 0x92, 0x8F, 0x1C, 0x1D, 0x1E, 0x1F,
    0x80, 0x81, 0x82, 0x83, 0x84, 0x0A, 0x17, 0x1B, 0x88, 0x89, 0x8A, 0x8B, 0x8C, 0x05, 0x06, 0x07,
    0x90, 0x91, 0x16, 0x93, 0x94, 0x95, 0x96, 0x04, 0x98, 0x99, 0x9A, 0x9B, 0x14, 0x15, 0x9E, 0x1A,
    0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xA2, 0x2E, 0x3C, 0x28, 0x2B, 0x7C,
    0x26, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x21, 0x24, 0x2A, 0x29, 0x3B, 0xAC,
    0x2D, 0x2F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xA6, 0x2C, 0x25, 0x5F, 0x3E, 0x3F,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x60, 0x3A, 0x23, 0x40, 0x27, 0x3D, 0x22,
    0x00, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x7E, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x7B, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x7D, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x5C, 0x00, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x00, 0x00, 0x00, 0x00, 0x00, 0x9F,
];

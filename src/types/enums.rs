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

    src/types/enums.rs

    Defines the closed code tables of the leading header: spacecraft, product type,
    sample encoding, receiving station and processing center.
*/
use std::{
    fmt,
    fmt::{Display, Formatter},
};

/// The two structurally distinct families of AVHRR Level 1b records.
///
/// * `Noaa9To14` records (TIROS-N through NOAA-14) pack their time code into a byte-oriented
///   bitfield and store control points as 16-bit fixed point values.
/// * `Noaa15ToMetop` records (NOAA-15 and later, including METOP) use 16-bit big-endian words
///   for the time code and 32-bit fixed point control points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum SpacecraftGeneration {
    Noaa9To14,
    Noaa15ToMetop,
}

impl Display for SpacecraftGeneration {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SpacecraftGeneration::Noaa9To14 => write!(f, "NOAA-9/14"),
            SpacecraftGeneration::Noaa15ToMetop => write!(f, "NOAA-15/METOP"),
        }
    }
}

/// Spacecraft carrying the AVHRR instrument. NOAA satellites are given a letter before launch
/// and a number after launch; the two letter code in the dataset name uses the letter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum Spacecraft {
    TirosN,
    Noaa6,
    NoaaB,
    Noaa7,
    Noaa8,
    Noaa9,
    Noaa10,
    Noaa11,
    Noaa12,
    Noaa13,
    Noaa14,
    Noaa15,
    Noaa16,
    Noaa17,
    Noaa18,
    Metop2,
}

impl Spacecraft {
    /// The two letter code used in the dataset name at TBM header offset 39.
    pub fn code(&self) -> &'static str {
        use Spacecraft::*;
        match self {
            TirosN => "TN",
            Noaa6 => "NA",
            NoaaB => "NB",
            Noaa7 => "NC",
            Noaa8 => "NE",
            Noaa9 => "NF",
            Noaa10 => "NG",
            Noaa11 => "NH",
            Noaa12 => "ND",
            Noaa13 => "NI",
            Noaa14 => "NJ",
            Noaa15 => "NK",
            Noaa16 => "NL",
            Noaa17 => "NM",
            Noaa18 => "NN",
            Metop2 => "M2",
        }
    }

    pub fn from_code(code: &[u8]) -> Option<Spacecraft> {
        use Spacecraft::*;
        match code {
            b"TN" => Some(TirosN),
            b"NA" => Some(Noaa6),
            b"NB" => Some(NoaaB),
            b"NC" => Some(Noaa7),
            b"NE" => Some(Noaa8),
            b"NF" => Some(Noaa9),
            b"NG" => Some(Noaa10),
            b"NH" => Some(Noaa11),
            b"ND" => Some(Noaa12),
            b"NI" => Some(Noaa13),
            b"NJ" => Some(Noaa14),
            b"NK" => Some(Noaa15),
            b"NL" => Some(Noaa16),
            b"NM" => Some(Noaa17),
            b"NN" => Some(Noaa18),
            b"M2" => Some(Metop2),
            _ => None,
        }
    }

    /// Decode the numeric spacecraft ID of a NOAA-15 and later dataset header record.
    pub fn from_id(id: u16) -> Option<Spacecraft> {
        use Spacecraft::*;
        match id {
            2 => Some(Noaa16),
            4 => Some(Noaa15),
            6 => Some(Noaa17),
            7 => Some(Noaa18),
            12 => Some(Metop2),
            _ => None,
        }
    }

    pub fn generation(&self) -> SpacecraftGeneration {
        if *self <= Spacecraft::Noaa14 {
            SpacecraftGeneration::Noaa9To14
        }
        else {
            SpacecraftGeneration::Noaa15ToMetop
        }
    }
}

impl Display for Spacecraft {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        use Spacecraft::*;
        match self {
            TirosN => write!(f, "TIROS-N"),
            Noaa6 => write!(f, "NOAA-6(A)"),
            NoaaB => write!(f, "NOAA-B"),
            Noaa7 => write!(f, "NOAA-7(C)"),
            Noaa8 => write!(f, "NOAA-8(E)"),
            Noaa9 => write!(f, "NOAA-9(F)"),
            Noaa10 => write!(f, "NOAA-10(G)"),
            Noaa11 => write!(f, "NOAA-11(H)"),
            Noaa12 => write!(f, "NOAA-12(D)"),
            Noaa13 => write!(f, "NOAA-13(I)"),
            Noaa14 => write!(f, "NOAA-14(J)"),
            Noaa15 => write!(f, "NOAA-15(K)"),
            Noaa16 => write!(f, "NOAA-16(L)"),
            Noaa17 => write!(f, "NOAA-17(M)"),
            Noaa18 => write!(f, "NOAA-18(N)"),
            Metop2 => write!(f, "METOP-A(2)"),
        }
    }
}

/// AVHRR product type.
///
/// * `Hrpt`: High Resolution Picture Transmission, full resolution direct readout.
/// * `Lac`: Local Area Coverage, full resolution recorded on board.
/// * `Gac`: Global Area Coverage, reduced resolution (409 pixels per line).
/// * `Frac`: Full Resolution Area Coverage (METOP).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum ProductType {
    Hrpt,
    Lac,
    Gac,
    Frac,
}

impl ProductType {
    /// The four letter code used in the dataset name at TBM header offset 34.
    pub fn code(&self) -> &'static str {
        match self {
            ProductType::Hrpt => "HRPT",
            ProductType::Lac => "LHRR",
            ProductType::Gac => "GHRR",
            ProductType::Frac => "FRAC",
        }
    }

    pub fn from_code(code: &[u8]) -> Option<ProductType> {
        match code {
            b"HRPT" => Some(ProductType::Hrpt),
            b"LHRR" => Some(ProductType::Lac),
            b"GHRR" => Some(ProductType::Gac),
            b"FRAC" => Some(ProductType::Frac),
            _ => None,
        }
    }

    /// Decode the numeric data type of a NOAA-15 and later dataset header record.
    pub fn from_id(id: u16) -> Option<ProductType> {
        match id {
            1 => Some(ProductType::Lac),
            2 => Some(ProductType::Gac),
            3 => Some(ProductType::Hrpt),
            // Documented as 4, but real data sets carry 13.
            4 | 13 => Some(ProductType::Frac),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProductType::Hrpt => "AVHRR HRPT",
            ProductType::Lac => "AVHRR LAC",
            ProductType::Gac => "AVHRR GAC",
            ProductType::Frac => "AVHRR FRAC",
        }
    }
}

impl Display for ProductType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ProductType::Hrpt => write!(f, "HRPT"),
            ProductType::Lac => write!(f, "LAC"),
            ProductType::Gac => write!(f, "GAC"),
            ProductType::Frac => write!(f, "FRAC"),
        }
    }
}

/// How sensor samples are stored in the payload of each record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum SampleEncoding {
    /// Three 10-bit samples packed into each big-endian 32-bit word.
    Packed10Bit,
    /// One byte per sample.
    Unpacked8Bit,
    /// One big-endian 16-bit word per sample.
    Unpacked16Bit,
}

impl SampleEncoding {
    /// The two character code used at TBM header offset 117.
    pub fn code(&self) -> &'static str {
        match self {
            SampleEncoding::Packed10Bit => "10",
            SampleEncoding::Unpacked8Bit => "08",
            SampleEncoding::Unpacked16Bit => "16",
        }
    }

    pub fn from_code(code: &[u8]) -> Option<SampleEncoding> {
        match code {
            b"10" => Some(SampleEncoding::Packed10Bit),
            b"08" => Some(SampleEncoding::Unpacked8Bit),
            b"16" => Some(SampleEncoding::Unpacked16Bit),
            _ => None,
        }
    }

    /// Size in bytes of one sample for the unpacked encodings. Packed samples do not occupy
    /// a whole number of bytes and return None.
    pub fn sample_size(&self) -> Option<usize> {
        match self {
            SampleEncoding::Packed10Bit => None,
            SampleEncoding::Unpacked8Bit => Some(1),
            SampleEncoding::Unpacked16Bit => Some(2),
        }
    }
}

impl Display for SampleEncoding {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SampleEncoding::Packed10Bit => write!(f, "10-bit packed"),
            SampleEncoding::Unpacked8Bit => write!(f, "8-bit unpacked"),
            SampleEncoding::Unpacked16Bit => write!(f, "16-bit unpacked"),
        }
    }
}

/// Station that received the data from the spacecraft. Metadata only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReceivingStation {
    Dundee,
    GilmoreCreek,
    Honolulu,
    Monterey,
    WesternEurope,
    Socc,
    WallopsIsland,
    Svalbard,
    #[default]
    Unknown,
}

impl ReceivingStation {
    pub fn from_code(code: &[u8]) -> ReceivingStation {
        use ReceivingStation::*;
        match code {
            b"DU" => Dundee,
            b"GC" => GilmoreCreek,
            b"HO" => Honolulu,
            b"MO" => Monterey,
            b"WE" => WesternEurope,
            b"SO" => Socc,
            b"WI" => WallopsIsland,
            b"SV" => Svalbard,
            _ => Unknown,
        }
    }

    pub fn from_id(id: u16) -> ReceivingStation {
        use ReceivingStation::*;
        match id {
            1 => GilmoreCreek,
            2 => WallopsIsland,
            3 => Socc,
            4 => Svalbard,
            5 => Monterey,
            _ => Unknown,
        }
    }
}

impl Display for ReceivingStation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        use ReceivingStation::*;
        match self {
            Dundee => write!(f, "Dundee, Scotland, UK"),
            GilmoreCreek => write!(f, "Fairbanks, Alaska, USA (formerly Gilmore Creek)"),
            Honolulu => write!(f, "Honolulu, Hawaii, USA"),
            Monterey => write!(f, "Monterey, California, USA"),
            WesternEurope => write!(f, "Western Europe CDA, Lannion, France"),
            Socc => write!(
                f,
                "SOCC (Satellite Operations Control Center), Suitland, Maryland, USA"
            ),
            WallopsIsland => write!(f, "Wallops Island, Virginia, USA"),
            Svalbard => write!(f, "Svalbard, Norway"),
            Unknown => write!(f, "Unknown receiving station"),
        }
    }
}

/// Center that processed the raw data into a Level 1b data set. Metadata only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProcessingCenter {
    Cms,
    Dss,
    Nss,
    Ukm,
    #[default]
    Unknown,
}

impl ProcessingCenter {
    pub fn from_code(code: &[u8]) -> ProcessingCenter {
        match code {
            b"CMS" => ProcessingCenter::Cms,
            b"DSS" => ProcessingCenter::Dss,
            b"NSS" => ProcessingCenter::Nss,
            b"UKM" => ProcessingCenter::Ukm,
            _ => ProcessingCenter::Unknown,
        }
    }
}

impl Display for ProcessingCenter {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ProcessingCenter::Cms => write!(f, "Centre de Meteorologie Spatiale - Lannion, France"),
            ProcessingCenter::Dss => write!(f, "Dundee Satellite Receiving Station - Dundee, Scotland, UK"),
            ProcessingCenter::Nss => write!(f, "NOAA/NESDIS - Suitland, Maryland, USA"),
            ProcessingCenter::Ukm => write!(f, "United Kingdom Meteorological Office - Bracknell, England, UK"),
            ProcessingCenter::Unknown => write!(f, "Unknown processing center"),
        }
    }
}

/// Direction of the spacecraft over the ground during the swath. Records are always stored in
/// acquisition order; an ascending pass is flipped on both axes so that north is up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanDirection {
    Ascending,
    #[default]
    Descending,
}

impl Display for ScanDirection {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ScanDirection::Ascending => write!(f, "Ascending"),
            ScanDirection::Descending => write!(f, "Descending"),
        }
    }
}

/// The leading header structure of a data set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// 122-byte Terabit memory header, with the dataset name coded as text.
    #[default]
    Tbm,
    /// 512-byte Archive Retrieval System header followed by a binary dataset header record.
    Ars,
    /// Binary dataset header record only, as written by AAPP.
    Headerless,
}

impl Display for ContainerKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ContainerKind::Tbm => write!(f, "TBM"),
            ContainerKind::Ars => write!(f, "ARS"),
            ContainerKind::Headerless => write!(f, "headerless"),
        }
    }
}

/// Character set of the dataset name in the TBM header.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NameEncoding {
    #[default]
    Ascii,
    Ebcdic,
}

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
*/

//! # avhrr-l1b
//!
//! A reader for NOAA polar orbiter AVHRR Level 1b data sets, as distributed by NOAA/NESDIS
//! and a number of European receiving stations.
//!
//! A Level 1b file is a leading header followed by a sequence of fixed-size records, one per
//! scan line. Nothing in the file states the record size directly - it must be derived from
//! the spacecraft, the product type (HRPT, LAC, GAC or FRAC), the sample encoding and the number
//! of channels present. Most archives code these as short strings in a 122-byte TBM header;
//! ARS and AAPP output carry them in a binary dataset header record instead (see
//! [`ContainerKind`]).
//!
//! Opening a file happens in two phases:
//! 1. The header is classified into a [`FormatDescriptor`] and resolved into a [`LayoutPlan`].
//!    The first and last record headers are read to learn the scan direction and the start
//!    and stop times of the swath.
//! 2. Ground control points are sampled from a sparse set of scan lines. Scan lines are then
//!    decoded on demand with [`L1bDataset::read_row`].
//!
//! ```no_run
//! use avhrr_l1b::{GcpDensity, L1bLoader};
//!
//! let mut dataset = L1bLoader::new()
//!     .with_gcp_density(GcpDensity::Sparse)
//!     .load("NSS.GHRR.NK.D99001.S0000.E0100.B0123456.GC")?;
//!
//! let row = dataset.read_row(0, 0)?;
//! println!("{} samples, {} gcps", row.samples.len(), dataset.gcps().len());
//! # Ok::<(), avhrr_l1b::L1bError>(())
//! ```

pub mod bits;
pub mod dataset;
pub mod gcp;
pub mod header;
pub mod io;
pub mod layout;
pub mod loader;
pub mod record;
mod record_header;
pub mod types;
pub mod unpack;
mod util;

use thiserror::Error;

pub use crate::{
    dataset::L1bDataset,
    gcp::{ControlPoint, GcpDensity},
    header::{identify, FormatDescriptor},
    layout::LayoutPlan,
    loader::L1bLoader,
    record::{RasterExtent, ScanRecord},
    record_header::ScanTime,
    types::{
        ChannelMask,
        ContainerKind,
        NameEncoding,
        ProcessingCenter,
        ProductType,
        ReceivingStation,
        SampleEncoding,
        ScanDirection,
        Spacecraft,
        SpacecraftGeneration,
    },
    unpack::BandRow,
};

/// Length of the Terabit memory (TBM) header that leads every data set.
pub const TBM_HEADER_SIZE: usize = 122;

/// Maximum number of AVHRR channels that can be present in a data set.
pub const MAX_CHANNELS: usize = 5;

#[derive(Debug, Error)]
pub enum L1bError {
    #[error("An IO error occurred reading the data set: {0}")]
    IoError(String),
    #[error("The container is too short to hold its leading header ({0} bytes)")]
    MalformedContainer(usize),
    #[error("The container does not have the structure of an AVHRR Level 1b data set")]
    UnknownFormat,
    #[error("Unrecognized spacecraft code: {0:?}")]
    UnrecognizedSpacecraft(String),
    #[error("Unrecognized product type code: {0:?}")]
    UnrecognizedProductType(String),
    #[error("Unrecognized sample encoding code: {0:?}")]
    UnrecognizedEncoding(String),
    #[error("No record layout for {product} data from a {generation} spacecraft with {encoding} samples and {bands} channels")]
    UnsupportedCombination {
        product: ProductType,
        generation: SpacecraftGeneration,
        encoding: SampleEncoding,
        bands: usize,
    },
    #[error("Record for scan line {line} is truncated: expected {expected} bytes, read {read}")]
    TruncatedRecord { line: usize, expected: usize, read: usize },
    #[error("The data set does not contain a single complete scan line")]
    NoScanLines,
    #[error("Invalid parameters were specified to a library function: {0}")]
    ParameterError(String),
}

impl From<std::io::Error> for L1bError {
    fn from(err: std::io::Error) -> Self {
        L1bError::IoError(err.to_string())
    }
}

impl From<binrw::Error> for L1bError {
    fn from(err: binrw::Error) -> Self {
        L1bError::IoError(err.to_string())
    }
}

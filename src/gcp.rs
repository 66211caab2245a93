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

    src/gcp.rs

    Sampling of the ground control points embedded in the record headers.

    Every record carries a table of up to 51 latitude/longitude pairs taken
    at fixed pixel positions along the scan line. Using all of them for every
    line would produce far more control points than a warper needs, so only a
    subset of lines is read and each line is thinned out.
*/
use crate::{
    io::ReadSeek,
    layout::LayoutPlan,
    record::RecordReader,
    record_header::{header_format, RawGcp},
    types::ScanDirection,
    L1bError,
};

/// Number of lines sampled by the sparse strategy, including the first and last line.
pub const SPARSE_TARGET_LINES: usize = 20;
/// Maximum number of control points kept per line by the sparse strategy.
pub const SPARSE_POINTS_PER_LINE: usize = 11;

/// A correspondence between a raster position and a geodetic position.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ControlPoint {
    /// Raster column, measured to the centre of the pixel.
    pub pixel: f64,
    /// Raster row, measured to the centre of the line.
    pub line: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    pub elevation: f64,
}

/// How many control points to extract.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GcpDensity {
    /// About 20 lines of at most 11 points each.
    #[default]
    Sparse,
    /// Every point of enough lines to give roughly even spacing in both directions.
    Dense,
}

/// Choose which physical records to sample. The last record is always included, and the
/// result is strictly increasing.
pub fn select_lines(height: usize, width: usize, gcps_per_line: usize, density: GcpDensity) -> Vec<usize> {
    if height == 0 {
        return Vec::new();
    }

    let target = match density {
        GcpDensity::Sparse => SPARSE_TARGET_LINES.min(height),
        GcpDensity::Dense => {
            if height < gcps_per_line {
                height
            }
            else {
                let line_step = if height >= width {
                    width / gcps_per_line
                }
                else {
                    height / gcps_per_line
                };
                height / line_step.max(1)
            }
        }
    };

    if target <= 1 {
        return vec![height - 1];
    }

    let step = height / (target - 1);
    let mut lines: Vec<usize> = Vec::with_capacity(target);
    for i in 0..target {
        let line = if i == target - 1 { height - 1 } else { i * step };
        if lines.last() != Some(&line) {
            lines.push(line);
        }
    }
    lines
}

/// Keep at most `desired` evenly strided items from `items`: the first, every
/// `(n - 1) / (desired - 1)`th after it, and always the last.
pub fn downsample<T: Copy>(items: &[T], desired: usize) -> Vec<T> {
    let n = items.len();
    let desired = desired.min(n);
    match desired {
        0 => Vec::new(),
        1 => vec![items[n - 1]],
        _ => {
            let step = ((n - 1) / (desired - 1)).max(1);
            (0..desired)
                .map(|i| if i == desired - 1 { items[n - 1] } else { items[i * step] })
                .collect()
        }
    }
}

/// Raster column of the `n`th accepted control point of a line.
fn gcp_pixel(plan: &LayoutPlan, n: usize, direction: ScanDirection) -> f64 {
    let offset = (plan.gcp_start_pixel + plan.gcp_stride * n) as f64 + 0.5;
    match direction {
        ScanDirection::Descending => offset,
        ScanDirection::Ascending => plan.width as f64 - offset,
    }
}

/// Raster row of the control points stored in physical record `record_index`.
fn gcp_line(record_index: usize, height: usize, direction: ScanDirection) -> f64 {
    let line = match direction {
        ScanDirection::Descending => record_index,
        ScanDirection::Ascending => height - record_index - 1,
    };
    line as f64 + 0.5
}

/// Turn the raw control point table of one record into control points, dropping any pair that
/// is not a valid geodetic position. Pixel positions are assigned to the surviving points in
/// order, so a dropped pair shifts the ones after it down by one stride.
pub(crate) fn line_points(
    raw: &[RawGcp],
    plan: &LayoutPlan,
    record_index: usize,
    height: usize,
    direction: ScanDirection,
) -> Vec<ControlPoint> {
    let line = gcp_line(record_index, height, direction);

    let points: Vec<ControlPoint> = raw
        .iter()
        .filter(|gcp| (-180.0..=180.0).contains(&gcp.lon) && (-90.0..=90.0).contains(&gcp.lat))
        .enumerate()
        .map(|(n, gcp)| ControlPoint {
            pixel: gcp_pixel(plan, n, direction),
            line,
            lon: gcp.lon,
            lat: gcp.lat,
            elevation: 0.0,
        })
        .collect();

    if points.len() < raw.len() {
        log::warn!(
            "line_points(): dropped {} out of range control points on record {}",
            raw.len() - points.len(),
            record_index
        );
    }
    points
}

/// Read the control points of the sampled records. `reader` must already carry the scan
/// direction of the swath.
pub fn sample_gcps<RS: ReadSeek>(reader: &mut RecordReader<RS>, density: GcpDensity) -> Result<Vec<ControlPoint>, L1bError> {
    let plan = *reader.plan();
    let extent = reader.extent();
    let direction = reader.direction();
    let format = header_format(plan.generation);

    let lines = select_lines(extent.height, extent.width, plan.gcps_per_line, density);
    let mut gcps = Vec::new();

    for record_index in lines {
        let header = reader.read_physical_header(record_index)?;
        let count = format.gcp_count(&header, &plan);
        let raw = format.gcp_pairs(&header, &plan, count)?;
        let points = line_points(&raw, &plan, record_index, extent.height, direction);

        let kept = match density {
            GcpDensity::Sparse => downsample(&points, SPARSE_POINTS_PER_LINE),
            GcpDensity::Dense => points,
        };

        log::trace!(
            "sample_gcps(): record {}: declared {} kept {}",
            record_index,
            count,
            kept.len()
        );
        gcps.extend(kept);
    }

    log::debug!("sample_gcps(): {} control points", gcps.len());
    Ok(gcps)
}

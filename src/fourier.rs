//! Fourier analysis report parser.
//!
//! Reads the text a SPICE `.four` analysis leaves behind:
//!
//! ```text
//! Fourier analysis for v(out):
//!   No. Harmonics: 10, THD: 2.8391 %, Gridsize: 200, Interpolation Degree: 1
//!
//! Harmonic Frequency   Magnitude   Phase       Norm. Mag   Norm. Phase
//! -------- ---------   ---------   -----       ---------   -----------
//!  0       0           -1.2e-05    0           0           0
//!  1       1000        0.99        -0.00134    1           0
//!  ...
//! ```
//!
//! The header and the rows are extracted by two independent passes. A report
//! without the header is rejected; any number of rows is accepted.

use std::collections::BTreeMap;
use std::path::Path;

use nom::bytes::complete::tag;
use nom::character::complete::{
    char, multispace0, space0, space1, u32 as dec_u32, u64 as dec_u64,
};
use nom::combinator::eof;
use nom::number::complete::double;
use nom::IResult;
use nom::Parser;

use crate::error::{DiodelabError, Result};
use crate::ir::{HarmonicAnalysis, HarmonicRecord};

const REPORT_MARKER: &str = "Fourier analysis for";
const COUNT_MARKER: &str = "No. Harmonics:";

/// Read and parse one report file.
pub fn read_report(path: impl AsRef<Path>) -> Result<HarmonicAnalysis> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    parse_report(&path.display().to_string(), &text)
}

/// Parse report text. `source` names the report in errors and logs.
pub fn parse_report(source: &str, text: &str) -> Result<HarmonicAnalysis> {
    let (n, thd) = find_header(text).ok_or_else(|| DiodelabError::Format {
        source_name: source.to_string(),
    })?;
    let harmonics = harmonic_rows(text);
    if harmonics.len() != n as usize {
        tracing::debug!(source, declared = n, found = harmonics.len(), "row count differs from header");
    }
    tracing::debug!(source, n, thd, "parsed Fourier report");
    Ok(HarmonicAnalysis::new(source, n, thd, harmonics))
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Declared harmonic count and THD percent from the report header.
pub fn find_header(text: &str) -> Option<(u32, f64)> {
    let start = text.find(REPORT_MARKER)?;
    let body = &text[start + REPORT_MARKER.len()..];
    body.match_indices(COUNT_MARKER)
        .find_map(|(at, _)| header_fields(&body[at + COUNT_MARKER.len()..]).ok())
        .map(|(_, fields)| fields)
}

/// `<n>, THD: <percent> %`
fn header_fields(input: &str) -> IResult<&str, (u32, f64)> {
    let (rest, (_, n, _, _, _, _, thd, _, _)) = (
        space0,
        dec_u32,
        char(','),
        space0,
        tag("THD:"),
        space0,
        double,
        space0,
        char('%'),
    )
        .parse(input)?;
    Ok((rest, (n, thd)))
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Every six-field harmonic row in `text`, keyed by harmonic index.
pub fn harmonic_rows(text: &str) -> BTreeMap<u32, HarmonicRecord> {
    text.lines()
        .filter_map(|line| harmonic_row(line).ok())
        .map(|(_, row)| (row.index, row))
        .collect()
}

fn harmonic_row(input: &str) -> IResult<&str, HarmonicRecord> {
    let (rest, (_, index, _, frequency, _, magnitude, _, phase, _, norm_magnitude, _, norm_phase, _, _)) = (
        space0, dec_u32, space1, dec_u64, space1, double, space1, double, space1, double, space1, double,
        multispace0, eof,
    )
        .parse(input)?;
    Ok((
        rest,
        HarmonicRecord {
            index,
            frequency,
            magnitude,
            phase,
            norm_magnitude,
            norm_phase,
        },
    ))
}

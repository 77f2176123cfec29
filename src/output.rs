//! Results output formatting (CSV and model cards).

use crate::cents::ScaleDegree;
use crate::error::Result;
use crate::ir::{spice_number, DiodeModel, HarmonicAnalysis};
use crate::schema::Param;
use std::io::Write;

/// Write one canonical `.MODEL` card per line.
pub fn write_models<W: Write>(models: &[DiodeModel], writer: &mut W) -> Result<()> {
    for model in models {
        writeln!(writer, "{}", model)?;
    }
    Ok(())
}

/// Write the cumulative THD series as CSV.
///
/// Format:
/// ```csv
/// Harmonic,Magnitude,THD,Delta
/// 2,0.01,1.0,1.0
/// 3,0.005,1.118,0.118
/// ```
///
/// Figures that could not be computed are left empty.
pub fn write_thd_series_csv<W: Write>(analysis: &HarmonicAnalysis, writer: &mut W) -> Result<()> {
    writeln!(writer, "Harmonic,Magnitude,THD,Delta")?;
    for step in analysis.thd_series() {
        writeln!(
            writer,
            "{},{},{},{}",
            step.index,
            optional(step.magnitude),
            optional(step.thd),
            optional(step.delta)
        )?;
    }
    Ok(())
}

/// Write one flattened row for a diode pair: the declared THD followed by the
/// normalized magnitude of every harmonic from 2 up.
///
/// Format:
/// ```csv
/// 1N4148, 1N4148, 2.8391, 0.0283910, 0.0012000
/// ```
pub fn write_flat_row<W: Write>(
    positive: &str,
    negative: &str,
    analysis: &HarmonicAnalysis,
    writer: &mut W,
) -> Result<()> {
    let harmonics: Vec<String> = analysis
        .harmonics()
        .range(2u32..)
        .map(|(_, h)| format!("{:9.7}", h.norm_magnitude))
        .collect();
    // Debug keeps the decimal point on whole numbers: `10.0`, not `10`.
    writeln!(
        writer,
        "{}, {}, {:?}, {}",
        positive,
        negative,
        analysis.thd(),
        harmonics.join(", ")
    )?;
    Ok(())
}

/// Write the harmonic to scale degree table as CSV, cents truncated to integers.
pub fn write_degree_table<W: Write>(degrees: &[ScaleDegree], writer: &mut W) -> Result<()> {
    writeln!(writer, "Harmonic,Degree,Cents")?;
    for d in degrees {
        writeln!(writer, "{},{},{}", d.harmonic, d.degree, d.cents.trunc() as i64)?;
    }
    Ok(())
}

/// Write the parameter schema as CSV.
pub fn write_param_table<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "Name,Default,Unit,Description")?;
    for p in Param::ALL {
        writeln!(
            writer,
            "{},{},{},{}",
            p.name(),
            spice_number(p.default_value()),
            p.unit(),
            p.description()
        )?;
    }
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

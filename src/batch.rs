//! Parallel analysis of many harmonic reports.
//!
//! Reports are independent, so each is parsed on the rayon pool and its outcome
//! returned alongside it. A failed report is logged and does not stop the batch.

use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;
use crate::fourier;
use crate::ir::HarmonicAnalysis;

pub const REPORT_EXTENSION: &str = "four";

/// Outcome for one diode pair.
#[derive(Debug)]
pub struct PairReport {
    pub positive: String,
    pub negative: String,
    pub path: PathBuf,
    pub analysis: Result<HarmonicAnalysis>,
}

/// `<folder>/<positive>__<negative>.four`
pub fn pair_report_path(folder: impl AsRef<Path>, positive: &str, negative: &str) -> PathBuf {
    folder
        .as_ref()
        .join(format!("{positive}__{negative}.{REPORT_EXTENSION}"))
}

/// Each model paired with itself, the usual single-diode clipper.
pub fn self_pairs<S: AsRef<str>>(models: &[S]) -> Vec<(String, String)> {
    models
        .iter()
        .map(|m| (m.as_ref().to_string(), m.as_ref().to_string()))
        .collect()
}

/// Every ordered combination of models, including self pairs.
pub fn all_pairs<S: AsRef<str>>(models: &[S]) -> Vec<(String, String)> {
    models
        .iter()
        .flat_map(|p| {
            models
                .iter()
                .map(move |n| (p.as_ref().to_string(), n.as_ref().to_string()))
        })
        .collect()
}

/// Parse every report in `paths`. Results are in input order.
pub fn analyze_reports<P>(paths: &[P]) -> Vec<Result<HarmonicAnalysis>>
where
    P: AsRef<Path> + Sync,
{
    let span = tracing::info_span!("analyze_reports", reports = paths.len());
    paths
        .par_iter()
        .map(|path| {
            // Worker threads do not inherit the caller's current span.
            span.in_scope(|| {
                let path = path.as_ref();
                fourier::read_report(path).inspect_err(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "report failed");
                })
            })
        })
        .collect()
}

/// Locate and parse the report of every `(positive, negative)` pair under `folder`.
pub fn analyze_pairs(folder: impl AsRef<Path>, pairs: &[(String, String)]) -> Vec<PairReport> {
    let folder = folder.as_ref();
    let span = tracing::info_span!("analyze_pairs", folder = %folder.display(), pairs = pairs.len());
    pairs
        .par_iter()
        .map(|(positive, negative)| {
            span.in_scope(|| {
                let path = pair_report_path(folder, positive, negative);
                let analysis = analyze_pair(&path);
                if let Err(e) = &analysis {
                    tracing::warn!(positive = %positive, negative = %negative, error = %e, "pair skipped");
                }
                PairReport {
                    positive: positive.clone(),
                    negative: negative.clone(),
                    path,
                    analysis,
                }
            })
        })
        .collect()
}

fn analyze_pair(path: &Path) -> Result<HarmonicAnalysis> {
    if !path.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no report at {}", path.display()),
        )
        .into());
    }
    fourier::read_report(path)
}

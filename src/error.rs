//! Error and diagnostic types.
//!
//! [`DiodelabError`] aborts one model or one report. [`LookupGap`] and
//! [`NotComputable`] are returned as values from distortion queries.
//! [`Warning`]s never abort anything.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiodelabError {
    #[error("line {line}: model {model}: could not decode {parameter}={value}: {source}")]
    ParameterDecode {
        model: String,
        parameter: String,
        value: String,
        line: usize,
        #[source]
        source: DecodeError,
    },

    #[error("{source_name} does not look like a Fourier analysis report")]
    Format { source_name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DiodelabError>;

/// A numeric literal that no notation could make sense of.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode '{token}' as a number")]
pub struct DecodeError {
    pub token: String,
}

/// A harmonic index referenced by a distortion computation is absent from the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("harmonic {index} is not present in the report")]
pub struct LookupGap {
    pub index: u32,
}

/// Why a distortion figure could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotComputable {
    #[error(transparent)]
    Gap(#[from] LookupGap),

    #[error("fundamental magnitude is zero")]
    ZeroFundamental,
}

/// Non-fatal diagnostics. Logged when raised; model-level ones are kept on the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("ignoring parameter {parameter}={value} in {model}")]
    UnknownParameter {
        model: String,
        parameter: String,
        value: String,
    },

    #[error("'{suffix}' is not a known scale suffix in '{token}', treating the value as unscaled")]
    ScaleSuffix { token: String, suffix: String },

    #[error("line {line}: continuation line has no preceding line to extend")]
    OrphanContinuation { line: usize },
}

//! Diode model library parser.
//!
//! Streams [`DiodeModel`]s out of a SPICE model library.
//!
//! # Supported syntax
//!
//! ```text
//! * comment line                      (ignored)
//! .MODEL name D(KEY=value ...)        (diode model card)
//! .model name d KEY=value, ...        (parentheses optional)
//! + KEY=value ...)                    (continuation of the previous line)
//! .SUBCKT name nodes... / .ENDS       (body skipped, one nesting level)
//! ```
//!
//! Keys are case-insensitive. Values use the notations in [`crate::units`].
//! Unknown keys are dropped with a warning; an undecodable value fails the
//! whole card with [`DiodelabError::ParameterDecode`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_till, take_while1};
use nom::character::complete::{char, one_of, space0, space1};
use nom::combinator::{eof, opt, peek, recognize};
use nom::IResult;
use nom::Parser;

use crate::error::{DiodelabError, Result, Warning};
use crate::ir::DiodeModel;
use crate::netlist::{self, InMemory, LogicalLines, SubcircuitFilter};
use crate::schema::{self, DiodeParams, Key};
use crate::units;

/// What to do when one card fails to decode during eager collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return the first decode error.
    #[default]
    Abort,
    /// Log the failure and keep going with the next card.
    Skip,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse every diode model in an in-memory library.
pub fn parse(input: &str, policy: ErrorPolicy) -> Result<Vec<DiodeModel>> {
    collect_models(models_from_reader(input.as_bytes()), policy)
}

/// Open, parse and close a model library file.
pub fn read_models(path: impl AsRef<Path>, policy: ErrorPolicy) -> Result<Vec<DiodeModel>> {
    let path = path.as_ref();
    let _span = tracing::info_span!("read_models", path = %path.display()).entered();
    let models = collect_models(open_models(path)?, policy)?;
    tracing::info!(count = models.len(), "model library parsed");
    Ok(models)
}

/// Lazily parse a model library file. The file closes when the stream is dropped.
pub fn open_models(path: impl AsRef<Path>) -> Result<DiodeModels<io::Lines<BufReader<File>>>> {
    let file = File::open(path)?;
    Ok(models_from_reader(BufReader::new(file)))
}

/// Lazily parse models from an open reader.
pub fn models_from_reader<R: BufRead>(reader: R) -> DiodeModels<io::Lines<R>> {
    DiodeModels::new(netlist::scan_reader(reader))
}

/// Lazily parse models from physical lines held in memory.
pub fn models_from_lines<L, S>(lines: L) -> DiodeModels<InMemory<L::IntoIter>>
where
    L: IntoIterator<Item = S>,
    S: Into<String>,
{
    DiodeModels::new(netlist::scan_lines(lines))
}

/// Drain a model stream according to `policy`. I/O errors always abort.
pub fn collect_models<I>(models: I, policy: ErrorPolicy) -> Result<Vec<DiodeModel>>
where
    I: Iterator<Item = Result<DiodeModel>>,
{
    let mut collected = Vec::new();
    for model in models {
        match model {
            Ok(model) => collected.push(model),
            Err(e @ DiodelabError::ParameterDecode { .. }) if policy == ErrorPolicy::Skip => {
                tracing::warn!(error = %e, "skipping model");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(collected)
}

// ---------------------------------------------------------------------------
// Model stream
// ---------------------------------------------------------------------------

/// Pull-based sequence of models: scanner, subcircuit filter, card match, build.
pub struct DiodeModels<I> {
    lines: SubcircuitFilter<LogicalLines<I>>,
}

impl<I> DiodeModels<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: LogicalLines<I>) -> Self {
        Self {
            lines: SubcircuitFilter::new(lines),
        }
    }
}

impl<I> Iterator for DiodeModels<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<DiodeModel>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if let Some(card) = match_model_line(&line.text) {
                return Some(build_model(card.name, card.params, line.line));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// .MODEL card matching
// ---------------------------------------------------------------------------

/// The name and raw parameter text of a diode `.MODEL` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCard<'a> {
    pub name: &'a str,
    pub params: &'a str,
}

/// Match `.MODEL <name> D [(] <params> [)]`. Other lines, including
/// non-diode models, yield `None`.
pub fn match_model_line(line: &str) -> Option<ModelCard<'_>> {
    model_line(line)
        .ok()
        .map(|(_, (name, params))| ModelCard { name, params })
}

fn model_line(input: &str) -> IResult<&str, (&str, &str)> {
    let (rest, (_, _, _, name, _, _)) = (
        space0,
        tag_no_case(".model"),
        space1,
        element_name,
        space1,
        tag_no_case("d"),
    )
        .parse(input)?;
    // The type letter must stand alone: `D(`, `D ` or end of line.
    let (rest, _) = alt((eof, peek(recognize(one_of("( \t"))))).parse(rest)?;
    let (rest, (_, _, params, _, _, _)) = (
        space0,
        opt(char('(')),
        take_till(|c: char| c == ')'),
        opt(char(')')),
        space0,
        eof,
    )
        .parse(rest)?;
    Ok((rest, (name, params.trim())))
}

/// Everything up to the first whitespace.
fn element_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace()).parse(input)
}

// ---------------------------------------------------------------------------
// Parameter list
// ---------------------------------------------------------------------------

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn param_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)
}

fn param_value(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_separator(c)).parse(input)
}

/// `KEY = value`, spaces around `=` allowed.
fn param_pair(input: &str) -> IResult<&str, (&str, &str)> {
    let (rest, (key, _, _, _, value)) =
        (param_key, space0, char('='), space0, param_value).parse(input)?;
    Ok((rest, (key, value)))
}

/// Split a parameter list into `(key, value)` pairs. Tokens that are not
/// pairs are logged and skipped.
pub fn param_pairs(params: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    let mut rest = params;
    loop {
        rest = rest.trim_start_matches(is_separator);
        if rest.is_empty() {
            break;
        }
        match param_pair(rest) {
            Ok((r, pair)) => {
                pairs.push(pair);
                rest = r;
            }
            Err(_) => {
                let end = rest.find(is_separator).unwrap_or(rest.len());
                tracing::warn!(token = &rest[..end], "ignoring malformed model parameter");
                rest = &rest[end..];
            }
        }
    }
    pairs
}

// ---------------------------------------------------------------------------
// Model construction
// ---------------------------------------------------------------------------

/// Build one model from its name and raw parameter text.
pub fn build_model(name: &str, params: &str, line: usize) -> Result<DiodeModel> {
    let mut values = DiodeParams::default();
    let mut info = BTreeMap::new();
    let mut warnings = Vec::new();

    for (key, raw) in param_pairs(params) {
        let key = key.to_ascii_uppercase();
        let param = match schema::resolve(&key) {
            Some(Key::Informational(canonical)) => {
                info.insert(canonical.to_string(), raw.to_string());
                continue;
            }
            Some(Key::Numeric(param)) => param,
            None => {
                let warning = Warning::UnknownParameter {
                    model: name.to_string(),
                    parameter: key,
                    value: raw.to_string(),
                };
                tracing::warn!(line, "{warning}");
                warnings.push(warning);
                continue;
            }
        };

        let decoded = units::classify(raw).map_err(|source| DiodelabError::ParameterDecode {
            model: name.to_string(),
            parameter: key.clone(),
            value: raw.to_string(),
            line,
            source,
        })?;
        if let Some(warning) = decoded.warning(raw) {
            tracing::warn!(line, model = name, "{warning}");
            warnings.push(warning);
        }
        values.set(param, decoded.value);
    }

    tracing::debug!(model = name, line, "built diode model");
    Ok(DiodeModel {
        name: name.to_string(),
        params: values,
        info,
        line,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

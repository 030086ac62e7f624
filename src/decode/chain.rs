//! Decode chain engine.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::decoder::{DecodeError, Decoder};

/// Successful run of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Output of the last stage.
    pub bytes: Vec<u8>,
    /// Names of the stages that ran, in order.
    pub applied: Vec<&'static str>,
}

impl Decoded {
    /// Stage names joined the way they appear in the capture log.
    pub fn steps(&self) -> String {
        self.applied.join(" -> ")
    }
}

/// A stage failed; nothing from the chain is usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} decode failed at stage {index}: {source}")]
pub struct ChainError {
    /// Position of the failing selector in the chain (0-based).
    pub index: usize,
    /// Name of the failing decoder.
    pub stage: &'static str,
    /// Stages that completed before the failure.
    pub applied: Vec<&'static str>,
    #[source]
    pub source: DecodeError,
}

/// A selector string contained a character outside the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown decoder: '{0}'")]
pub struct ChainParseError(pub char);

/// Apply `selectors` to `input` left to right.
///
/// Selectors that do not name a decoder are skipped.
pub fn apply_chain(input: &[u8], selectors: &str) -> Result<Decoded, ChainError> {
    run(
        input,
        selectors
            .chars()
            .enumerate()
            .filter_map(|(i, c)| Decoder::from_selector(c).map(|d| (i, d))),
    )
}

fn run(
    input: &[u8],
    stages: impl Iterator<Item = (usize, Decoder)>,
) -> Result<Decoded, ChainError> {
    let mut current = input.to_vec();
    let mut applied = Vec::new();

    for (index, decoder) in stages {
        match decoder.apply(&current) {
            Ok(next) => {
                current = next;
                applied.push(decoder.name());
            }
            Err(source) => {
                return Err(ChainError {
                    index,
                    stage: decoder.name(),
                    applied,
                    source,
                });
            }
        }
    }

    Ok(Decoded {
        bytes: current,
        applied,
    })
}

/// Validated, ordered list of decoders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeChain {
    stages: Vec<Decoder>,
}

impl DecodeChain {
    pub fn new(stages: Vec<Decoder>) -> Self {
        Self { stages }
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn stages(&self) -> &[Decoder] {
        &self.stages
    }

    /// Run every stage over `input`.
    pub fn apply(&self, input: &[u8]) -> Result<Decoded, ChainError> {
        run(input, self.stages.iter().copied().enumerate())
    }

    /// `Hex -> Base64` style description.
    pub fn describe(&self) -> String {
        self.stages
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl FromStr for DecodeChain {
    type Err = ChainParseError;

    fn from_str(selectors: &str) -> Result<Self, Self::Err> {
        selectors
            .chars()
            .map(|c| Decoder::try_from(c).map_err(ChainParseError))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

impl fmt::Display for DecodeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decoder in &self.stages {
            write!(f, "{}", decoder.selector())?;
        }
        Ok(())
    }
}

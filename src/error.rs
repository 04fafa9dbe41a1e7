//! Error type shared by every stage of the profiling pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    /// No chromosomes were supplied, either by the caller's ordering or by
    /// the signal source itself.
    #[error("empty source: {0}")]
    EmptySource(String),

    /// Two tracks (or a track and its own length table) disagree about the
    /// length of a chromosome.
    #[error(
        "chromosome length mismatch for {chrom}: expected {expected}, found \
         {found}"
    )]
    ChromosomeLengthMismatch {
        chrom:    String,
        expected: usize,
        found:    usize,
    },

    #[error("unknown chromosome: {0}")]
    UnknownChromosome(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Fragments with fewer than two samples cannot be interpolated.
    #[error("fragment of length {len} is too short to interpolate")]
    DegenerateFragment { len: usize },

    /// Normalization over a signal without spread (zero standard deviation
    /// or zero range).
    #[error("degenerate signal: {0}")]
    DegenerateSignal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

impl ProfileError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

impl From<csv::Error> for ProfileError {
    fn from(value: csv::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;

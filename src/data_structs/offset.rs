use std::ops::Range;

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::PosType;
use crate::error::{
    ProfileError,
    Result,
};

/// Location of one chromosome inside a flat signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromSpan {
    pub offset: PosType,
    pub length: PosType,
}

impl ChromSpan {
    pub fn end(&self) -> PosType {
        self.offset + self.length
    }
}

/// Maps every chromosome to the index its values start at in a
/// [`FlatSignal`](crate::data_structs::FlatSignal).
///
/// Entries keep concatenation order. The first chromosome starts at 0 and
/// each following chromosome starts where the previous one ends, so
/// `offset(c) + length(c) == offset(next(c))` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromOffsetTable {
    entries: IndexMap<String, ChromSpan>,
    total:   PosType,
}

impl ChromOffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(chromosome, length)` pairs in concatenation
    /// order.
    pub fn from_lengths<I, S>(lengths: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, PosType)>,
        S: Into<String>, {
        let mut table = Self::new();
        for (chrom, length) in lengths {
            table.push(chrom, length)?;
        }
        Ok(table)
    }

    /// Appends a chromosome after the current last one.
    pub fn push<S: Into<String>>(
        &mut self,
        chrom: S,
        length: PosType,
    ) -> Result<ChromSpan> {
        let chrom = chrom.into();
        if self.entries.contains_key(&chrom) {
            return Err(ProfileError::invalid_parameter(format!(
                "chromosome {chrom} appears twice in the chromosome order"
            )));
        }
        let span = ChromSpan {
            offset: self.total,
            length,
        };
        self.entries.insert(chrom, span);
        self.total += length;
        Ok(span)
    }

    pub fn span(
        &self,
        chrom: &str,
    ) -> Option<ChromSpan> {
        self.entries.get(chrom).copied()
    }

    pub fn offset(
        &self,
        chrom: &str,
    ) -> Option<PosType> {
        self.span(chrom).map(|s| s.offset)
    }

    pub fn length(
        &self,
        chrom: &str,
    ) -> Option<PosType> {
        self.span(chrom).map(|s| s.length)
    }

    /// Sum of all chromosome lengths, i.e. the length of the flat signal.
    pub fn total_length(&self) -> PosType {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn chroms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ChromSpan)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Translates `start..end` on `chrom` into a range of flat-signal
    /// indices.
    ///
    /// Fails with [`ProfileError::UnknownChromosome`] for chromosomes not in
    /// the table and with [`ProfileError::InvalidParameter`] when
    /// `start >= end` or `end` runs past the chromosome.
    pub fn locate(
        &self,
        chrom: &str,
        start: PosType,
        end: PosType,
    ) -> Result<Range<PosType>> {
        let span = self
            .span(chrom)
            .ok_or_else(|| ProfileError::UnknownChromosome(chrom.to_string()))?;
        if start >= end {
            return Err(ProfileError::invalid_parameter(format!(
                "interval {chrom}:{start}-{end} is empty or inverted"
            )));
        }
        if end > span.length {
            return Err(ProfileError::invalid_parameter(format!(
                "interval {chrom}:{start}-{end} exceeds chromosome length {}",
                span.length
            )));
        }
        Ok(span.offset + start..span.offset + end)
    }

    /// Maps a flat-signal index back to `(chromosome, position)`.
    pub fn resolve(
        &self,
        flat_index: PosType,
    ) -> Option<(&str, PosType)> {
        if flat_index >= self.total {
            return None;
        }
        // Offsets are sorted, so the owning chromosome is the last one
        // starting at or before the index.
        let spans = self.entries.values().collect::<Vec<_>>();
        let idx = spans.partition_point(|s| s.offset <= flat_index) - 1;
        let (chrom, span) = self.entries.get_index(idx)?;
        Some((chrom.as_str(), flat_index - span.offset))
    }
}

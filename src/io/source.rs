use indexmap::IndexMap;

use crate::data_structs::typedef::{
    PosType,
    SignalType,
};
use crate::error::{
    ProfileError,
    Result,
};

/// Ordered chromosome → length table.
pub type ChromLengths = IndexMap<String, PosType>;

/// A per-chromosome signal track, e.g. a coverage file.
///
/// Implementations report missing data as `NaN`; the core sanitizes those
/// values when it copies them. The core only ever reads through this trait.
pub trait SignalSource {
    /// Chromosome lengths in the source's own order.
    fn chrom_lengths(&self) -> ChromLengths;

    /// Values for `start..end` on `chrom`; must return `end - start` values.
    fn values_in_range(
        &self,
        chrom: &str,
        start: PosType,
        end: PosType,
    ) -> Result<Vec<SignalType>>;
}

impl<T: SignalSource + ?Sized> SignalSource for &T {
    fn chrom_lengths(&self) -> ChromLengths {
        (**self).chrom_lengths()
    }

    fn values_in_range(
        &self,
        chrom: &str,
        start: PosType,
        end: PosType,
    ) -> Result<Vec<SignalType>> {
        (**self).values_in_range(chrom, start, end)
    }
}

impl<T: SignalSource + ?Sized> SignalSource for Box<T> {
    fn chrom_lengths(&self) -> ChromLengths {
        (**self).chrom_lengths()
    }

    fn values_in_range(
        &self,
        chrom: &str,
        start: PosType,
        end: PosType,
    ) -> Result<Vec<SignalType>> {
        (**self).values_in_range(chrom, start, end)
    }
}

/// Signal source backed by owned, dense per-chromosome arrays.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    chroms: IndexMap<String, Vec<SignalType>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a chromosome. Its length is the number of values.
    pub fn with_chrom<S: Into<String>>(
        mut self,
        chrom: S,
        values: Vec<SignalType>,
    ) -> Self {
        self.chroms.insert(chrom.into(), values);
        self
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<SignalType>)> for InMemorySource {
    fn from_iter<T: IntoIterator<Item = (S, Vec<SignalType>)>>(iter: T) -> Self {
        Self {
            chroms: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        }
    }
}

impl SignalSource for InMemorySource {
    fn chrom_lengths(&self) -> ChromLengths {
        self.chroms
            .iter()
            .map(|(k, v)| (k.clone(), v.len()))
            .collect()
    }

    fn values_in_range(
        &self,
        chrom: &str,
        start: PosType,
        end: PosType,
    ) -> Result<Vec<SignalType>> {
        let values = self
            .chroms
            .get(chrom)
            .ok_or_else(|| ProfileError::UnknownChromosome(chrom.to_string()))?;
        if start > end || end > values.len() {
            return Err(ProfileError::invalid_parameter(format!(
                "range {chrom}:{start}-{end} outside of chromosome length {}",
                values.len()
            )));
        }
        Ok(values[start..end].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_source_ranges() {
        let source = InMemorySource::new()
            .with_chrom("chrI", vec![1.0, 2.0, 3.0])
            .with_chrom("chrII", vec![f64::NAN]);
        let lengths = source.chrom_lengths();
        assert_eq!(
            lengths.iter().collect::<Vec<_>>(),
            vec![(&"chrI".to_string(), &3), (&"chrII".to_string(), &1)]
        );
        assert_eq!(source.values_in_range("chrI", 1, 3).unwrap(), vec![2.0, 3.0]);
        assert!(source.values_in_range("chrII", 0, 1).unwrap()[0].is_nan());
        assert!(source.values_in_range("chrI", 0, 4).is_err());
        assert!(matches!(
            source.values_in_range("chrX", 0, 1),
            Err(ProfileError::UnknownChromosome(_))
        ));
    }
}

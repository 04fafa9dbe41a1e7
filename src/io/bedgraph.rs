use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use itertools::Itertools;
use log::{
    debug,
    warn,
};
use rust_lapper::{
    Interval,
    Lapper,
};

use crate::data_structs::typedef::{
    PosType,
    SignalType,
};
use crate::error::{
    ProfileError,
    Result,
};
use crate::io::{
    ChromLengths,
    SignalSource,
};

/// Covered intervals of one chromosome. Lapper values index into `values`.
#[derive(Debug, Clone)]
struct ChromTrack {
    intervals: Lapper<PosType, usize>,
    values:    Vec<SignalType>,
}

/// [`SignalSource`] over a bedGraph file (`chrom start end value`,
/// 0-based half-open).
///
/// Chromosome lengths come from a separate table since bedGraph does not
/// store them. Positions without an entry read as `NaN`.
#[derive(Debug, Clone)]
pub struct BedGraphSource {
    lengths: ChromLengths,
    tracks:  HashMap<String, ChromTrack>,
}

impl BedGraphSource {
    /// Parses the whole file. `track`, `browser` and `#` lines are skipped.
    /// Entries on chromosomes missing from `lengths` are dropped with a
    /// warning; entries past a chromosome end are a parse error.
    pub fn from_reader<R: Read>(
        reader: R,
        lengths: ChromLengths,
    ) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut entries: Vec<(String, PosType, PosType, SignalType)> = Vec::new();
        for record in reader.records() {
            let record = record?;
            let first = record.get(0).unwrap_or_default();
            if first.starts_with("track") || first.starts_with("browser") {
                continue;
            }
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or_default();
            if record.len() < 4 {
                return Err(ProfileError::parse(format!(
                    "line {line}: expected 4 bedGraph columns, found {}",
                    record.len()
                )));
            }
            let parse_pos = |idx: usize| {
                record[idx].trim().parse::<PosType>().map_err(|e| {
                    ProfileError::parse(format!("line {line}: bad position '{}': {e}", &record[idx]))
                })
            };
            let start = parse_pos(1)?;
            let end = parse_pos(2)?;
            let value = record[3].trim().parse::<SignalType>().map_err(|e| {
                ProfileError::parse(format!("line {line}: bad value '{}': {e}", &record[3]))
            })?;
            entries.push((first.to_string(), start, end, value));
        }

        let mut tracks = HashMap::new();
        for (chrom, chrom_entries) in entries
            .into_iter()
            .into_group_map_by(|(chrom, ..)| chrom.clone())
        {
            let Some(&length) = lengths.get(&chrom) else {
                warn!(
                    "Skipping {} bedGraph entries on {chrom}: chromosome has no length",
                    chrom_entries.len()
                );
                continue;
            };
            let mut intervals = Vec::with_capacity(chrom_entries.len());
            let mut values = Vec::with_capacity(chrom_entries.len());
            for (_, start, end, value) in chrom_entries {
                if start >= end || end > length {
                    return Err(ProfileError::parse(format!(
                        "bedGraph entry {chrom}:{start}-{end} is outside of \
                         chromosome length {length}"
                    )));
                }
                intervals.push(Interval {
                    start,
                    stop: end,
                    val: values.len(),
                });
                values.push(value);
            }
            debug!("{chrom}: {} bedGraph entries", values.len());
            tracks.insert(
                chrom,
                ChromTrack {
                    intervals: Lapper::new(intervals),
                    values,
                },
            );
        }

        Ok(Self { lengths, tracks })
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
        lengths: ChromLengths,
    ) -> Result<Self> {
        Self::from_reader(File::open(path)?, lengths)
    }

    /// Number of chromosomes with at least one entry.
    pub fn n_covered(&self) -> usize {
        self.tracks.len()
    }
}

impl SignalSource for BedGraphSource {
    fn chrom_lengths(&self) -> ChromLengths {
        self.lengths.clone()
    }

    fn values_in_range(
        &self,
        chrom: &str,
        start: PosType,
        end: PosType,
    ) -> Result<Vec<SignalType>> {
        let length = *self
            .lengths
            .get(chrom)
            .ok_or_else(|| ProfileError::UnknownChromosome(chrom.to_string()))?;
        if start > end || end > length {
            return Err(ProfileError::invalid_parameter(format!(
                "range {chrom}:{start}-{end} outside of chromosome length {length}"
            )));
        }

        let mut out = vec![SignalType::NAN; end - start];
        if let Some(track) = self.tracks.get(chrom) {
            for interval in track.intervals.find(start, end) {
                let value = track.values[interval.val];
                let from = interval.start.max(start) - start;
                let to = interval.stop.min(end) - start;
                out[from..to].fill(value);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEDGRAPH: &str = "track type=bedGraph name=cpd\n\
                            chrI\t0\t3\t1.5\n\
                            chrI\t5\t8\t2\n\
                            chrII\t1\t2\t-1\n\
                            chrM\t0\t2\t9\n";

    fn lengths() -> ChromLengths {
        ChromLengths::from_iter([("chrI".to_string(), 10), ("chrII".to_string(), 4)])
    }

    #[test]
    fn dense_values_with_gaps() {
        let source = BedGraphSource::from_reader(BEDGRAPH.as_bytes(), lengths()).unwrap();
        assert_eq!(source.n_covered(), 2);

        let values = source.values_in_range("chrI", 0, 10).unwrap();
        assert_eq!(&values[..3], &[1.5; 3]);
        assert!(values[3].is_nan() && values[4].is_nan());
        assert_eq!(&values[5..8], &[2.0; 3]);
        assert!(values[9].is_nan());

        assert_eq!(
            source.values_in_range("chrI", 2, 6).unwrap()[..1],
            [1.5]
        );
        let partial = source.values_in_range("chrII", 0, 4).unwrap();
        assert_eq!(partial[1], -1.0);
    }

    #[test]
    fn lengths_come_from_table() {
        let source = BedGraphSource::from_reader(BEDGRAPH.as_bytes(), lengths()).unwrap();
        assert_eq!(source.chrom_lengths(), lengths());
        assert!(matches!(
            source.values_in_range("chrM", 0, 1),
            Err(ProfileError::UnknownChromosome(_))
        ));
        assert!(source.values_in_range("chrI", 0, 11).is_err());
    }

    #[test]
    fn malformed_lines() {
        assert!(matches!(
            BedGraphSource::from_reader("chrI\t0\t3\n".as_bytes(), lengths()),
            Err(ProfileError::Parse(_))
        ));
        assert!(matches!(
            BedGraphSource::from_reader("chrI\t0\tx\t1\n".as_bytes(), lengths()),
            Err(ProfileError::Parse(_))
        ));
        assert!(matches!(
            BedGraphSource::from_reader("chrI\t8\t12\t1\n".as_bytes(), lengths()),
            Err(ProfileError::Parse(_))
        ));
    }
}
